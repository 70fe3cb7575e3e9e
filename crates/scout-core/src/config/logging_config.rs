//! Logging configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_LOG_FILTER;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive. `RUST_LOG` takes precedence. Default: "info".
    pub filter: Option<String>,
    /// Include the event target in output. Default: true.
    pub with_target: Option<bool>,
}

impl LoggingConfig {
    pub fn effective_filter(&self) -> &str {
        self.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    pub fn effective_with_target(&self) -> bool {
        self.with_target.unwrap_or(true)
    }
}
