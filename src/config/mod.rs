//! Configuration loading.
//!
//! A TOML file under the platform config directory; every field is
//! optional and falls back to its default.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{Config, HomeConfig, LoggingConfig, RefreshPolicy, SharingMode};
