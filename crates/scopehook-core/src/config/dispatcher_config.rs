//! Dispatcher configuration

use serde::{Deserialize, Serialize};

use super::logging_config::LoggingConfig;
use crate::error::ScopeResult;
use crate::scope::ScopeDescriptor;

/// Settings shared by a registry and the dispatchers built on it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Priority given to registrations that do not set one
    pub default_priority: i32,
    /// Treat every hook as critical, so the first failure aborts a dispatch
    pub fail_fast: bool,
    /// Scopes that fire no hooks, written as `phase:subject`
    pub disabled_scopes: Vec<ScopeDescriptor>,
    pub logging: LoggingConfig,
}

impl DispatcherConfig {
    pub fn validate(&self) -> ScopeResult<()> {
        self.logging.validate()
    }

    pub fn is_disabled(&self, scope: &ScopeDescriptor) -> bool {
        self.disabled_scopes.contains(scope)
    }
}
