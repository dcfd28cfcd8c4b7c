//! Reducer trait for MVI architecture.

use super::intent::Intent;
use super::state::UiState;

/// Reducer transforms state based on intents.
///
/// Every synchronous state transition goes through a reducer. The view
/// model owns the asynchronous work and feeds its results back in as
/// intents, so the reducer stays a pure function: (State, Intent) -> State
pub trait Reducer {
    /// The state type this reducer operates on.
    type State: UiState;

    /// The intent type this reducer handles.
    type Intent: Intent;

    /// Consume the previous state and return its replacement.
    ///
    /// Must not touch anything outside its arguments.
    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}
