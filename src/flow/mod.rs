//! Reactive plumbing shared by view models.
//!
//! - [`StateFlow`]: current-value observable with counted subscriptions
//! - [`EffectFlow`]: bounded, drop-oldest broadcast of one-shot effects
//! - [`TaskScope`]: registry of owned tasks, cancelled as a unit
//! - [`switch_latest`]: cancel-then-replace subscription keyed by a value
//! - [`share_while`]: suspends upstream work while nobody observes

mod effect_flow;
mod share;
mod state_flow;
mod switch;
mod task_scope;

pub use effect_flow::{EffectFlow, EffectSubscriber};
pub use share::{share_while, SharingPolicy};
pub use state_flow::{StateFlow, StateSubscription};
pub use switch::switch_latest;
pub use task_scope::TaskScope;
