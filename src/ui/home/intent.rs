//! Events the presentation layer sends to the home view model.

use crate::model::{Feed, Post};
use crate::ui::mvi::Intent;

#[derive(Debug, Clone)]
pub enum HomeEvent {
    /// Start the live posts and feeds queries. Sent automatically on create.
    LoadContent,

    /// Pull-to-refresh: refresh every feed from its source.
    SwipeToRefresh,

    /// Show only posts from this feed.
    FeedSelected(Feed),

    /// Show posts from every feed.
    HomeSelected,

    AddClicked,

    PostClicked(Post),
}

impl HomeEvent {
    pub fn name(&self) -> &'static str {
        match self {
            HomeEvent::LoadContent => "load_content",
            HomeEvent::SwipeToRefresh => "swipe_to_refresh",
            HomeEvent::FeedSelected(_) => "feed_selected",
            HomeEvent::HomeSelected => "home_selected",
            HomeEvent::AddClicked => "add_clicked",
            HomeEvent::PostClicked(_) => "post_clicked",
        }
    }
}

impl Intent for HomeEvent {}
