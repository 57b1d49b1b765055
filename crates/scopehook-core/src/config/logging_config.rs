//! Logging configuration

use serde::{Deserialize, Serialize};

use crate::error::{ScopeError, ScopeResult};

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const FORMATS: [&str; 3] = ["pretty", "compact", "json"];

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (pretty, compact, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> ScopeResult<()> {
        if !LEVELS.contains(&self.level.to_ascii_lowercase().as_str()) {
            return Err(ScopeError::config_with_context(
                format!("Invalid log level '{}'", self.level),
                format!("Expected one of: {}", LEVELS.join(", ")),
            ));
        }
        if !FORMATS.contains(&self.format.to_ascii_lowercase().as_str()) {
            return Err(ScopeError::config_with_context(
                format!("Invalid log format '{}'", self.format),
                format!("Expected one of: {}", FORMATS.join(", ")),
            ));
        }
        Ok(())
    }
}
