//! Base trait for one-shot side effects in MVI architecture.

/// Marker trait for effect objects.
///
/// Effects are instructions for the view (navigation, transitions) that
/// are not part of the state. They are delivered to whoever is listening
/// when they happen and are never replayed to observers that show up
/// after they were consumed.
pub trait Effect: Clone + Send + Sync + 'static {}
