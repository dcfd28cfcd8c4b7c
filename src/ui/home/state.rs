//! State of the home screen.

use serde::Serialize;

use crate::model::{Feed, Post};
use crate::ui::mvi::UiState;

/// Whether a refresh of all feeds is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeLoadingState {
    #[default]
    Idle,
    Loading,
}

/// Everything the home screen needs to render.
///
/// Replaced wholesale on every change.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HomeState {
    /// Posts for `selected_feed`, or for every feed when none is selected.
    pub posts: Vec<Post>,
    pub feeds: Vec<Feed>,
    /// `None` shows every feed.
    pub selected_feed: Option<Feed>,
    pub loading_state: HomeLoadingState,
}

impl HomeState {
    /// Initial state: nothing loaded, nothing selected, idle.
    pub const DEFAULT: HomeState = HomeState {
        posts: Vec::new(),
        feeds: Vec::new(),
        selected_feed: None,
        loading_state: HomeLoadingState::Idle,
    };

    pub fn is_loading(&self) -> bool {
        self.loading_state == HomeLoadingState::Loading
    }

    /// Link of the selected feed, used as the posts query filter.
    pub fn selected_feed_link(&self) -> Option<String> {
        self.selected_feed.as_ref().map(|f| f.link.clone())
    }
}

impl UiState for HomeState {}
