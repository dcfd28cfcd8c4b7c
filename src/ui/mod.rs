//! Presentation-facing state containers.
//!
//! - [`mvi`]: architecture primitives shared by every screen
//! - [`home`]: the home screen (post list, feed filter, refresh)

pub mod home;
pub mod mvi;
