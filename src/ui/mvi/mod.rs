//! Model-View-Intent (MVI) architecture primitives.
//!
//! This module provides base traits for implementing unidirectional
//! data flow in the UI layer.
//!
//! # Architecture
//!
//! ```text
//! Intent ──→ ViewModel ──→ Reducer ──→ State ──→ View
//!    ↑            │                              │
//!    │            └────→ Effect ─────────────────┤
//!    └───────────────────────────────────────────┘
//! ```
//!
//! - **State**: Immutable representation of UI state
//! - **Intent**: User actions or system events
//! - **Reducer**: Pure function that transforms state based on intents
//! - **Effect**: One-shot instruction for the view, never stored in state

mod effect;
mod intent;
mod reducer;
mod state;

pub use effect::Effect;
pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
