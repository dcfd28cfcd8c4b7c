//! Home screen feature module.
//!
//! Lists posts from every feed or from one selected feed, supports
//! pull-to-refresh, and emits navigation effects.
//!
//! # Architecture
//!
//! Uses MVI (Model-View-Intent) pattern:
//! - `state.rs` - Screen state snapshot
//! - `intent.rs` - Events from the presentation layer
//! - `effect.rs` - One-shot navigation effects
//! - `reducer.rs` - State transitions
//! - `view_model.rs` - Event routing, live queries, refresh

mod effect;
mod intent;
mod reducer;
mod state;
mod view_model;

pub use effect::HomeEffect;
pub use intent::HomeEvent;
pub use reducer::{HomeMutation, HomeReducer};
pub use state::{HomeLoadingState, HomeState};
pub use view_model::HomeViewModel;
