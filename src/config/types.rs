use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::flow::SharingPolicy;

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub home: HomeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Behaviour of the home screen view model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeConfig {
    /// How long upstream queries keep running with no state observer (default: 5000).
    #[serde(default = "default_stop_timeout_ms")]
    pub stop_timeout_ms: u64,
    /// Effects kept for observers that have not consumed them yet (default: 10).
    #[serde(default = "default_effects_buffer")]
    pub effects_buffer: usize,
    /// "while_subscribed" or "eagerly".
    #[serde(default)]
    pub sharing: SharingMode,
    /// "concurrent" or "skip_while_in_flight".
    #[serde(default)]
    pub refresh: RefreshPolicy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SharingMode {
    #[default]
    WhileSubscribed,
    Eagerly,
}

/// What a pull-to-refresh does while another refresh is still running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Start another refresh; loading stays on until all of them finish.
    #[default]
    Concurrent,
    /// Ignore the request.
    SkipWhileInFlight,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset (default: "info").
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_stop_timeout_ms() -> u64 {
    5000
}

fn default_effects_buffer() -> usize {
    10
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl HomeConfig {
    pub fn sharing_policy(&self) -> SharingPolicy {
        match self.sharing {
            SharingMode::WhileSubscribed => SharingPolicy::WhileSubscribed {
                stop_timeout: Duration::from_millis(self.stop_timeout_ms),
            },
            SharingMode::Eagerly => SharingPolicy::Eagerly,
        }
    }
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            stop_timeout_ms: default_stop_timeout_ms(),
            effects_buffer: default_effects_buffer(),
            sharing: SharingMode::default(),
            refresh: RefreshPolicy::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}
