//! Base trait for intents (user/system actions) in MVI architecture.

/// Marker trait for intent objects.
///
/// Intents represent:
/// - User actions (item taps, pull-to-refresh)
/// - System events (lifecycle callbacks, repository emissions)
///
/// Intents are either routed to handlers by a view model or processed
/// by reducers to produce new states.
pub trait Intent: Send + 'static {}
