//! Reducer for home screen state transitions.

use crate::model::{Feed, Post};
use crate::ui::mvi::{Intent, Reducer};

use super::state::{HomeLoadingState, HomeState};

/// State changes produced by the home view model's handlers and pipelines.
#[derive(Debug, Clone)]
pub enum HomeMutation {
    SelectFeed(Feed),
    ClearSelection,
    PostsLoaded(Vec<Post>),
    FeedsLoaded(Vec<Feed>),
    RefreshStarted,
    RefreshFinished,
}

impl Intent for HomeMutation {}

pub struct HomeReducer;

impl Reducer for HomeReducer {
    type State = HomeState;
    type Intent = HomeMutation;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            HomeMutation::SelectFeed(feed) => HomeState {
                selected_feed: Some(feed),
                ..state
            },

            HomeMutation::ClearSelection => HomeState {
                selected_feed: None,
                ..state
            },

            HomeMutation::PostsLoaded(posts) => HomeState { posts, ..state },

            HomeMutation::FeedsLoaded(feeds) => HomeState { feeds, ..state },

            HomeMutation::RefreshStarted => HomeState {
                loading_state: HomeLoadingState::Loading,
                ..state
            },

            HomeMutation::RefreshFinished => HomeState {
                loading_state: HomeLoadingState::Idle,
                ..state
            },
        }
    }
}
