//! Logging hook for debugging dispatches

use async_trait::async_trait;

use crate::envelope::ContextEnvelope;
use crate::hooks::traits::{HookResult, ScopeHook};

/// A simple logging hook for debugging
pub struct LoggingHook {
    name: String,
}

impl LoggingHook {
    pub fn new() -> Self {
        Self {
            name: "logging".to_string(),
        }
    }

    /// Create a logging hook with a custom name
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for LoggingHook {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScopeHook for LoggingHook {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, envelope: &mut ContextEnvelope) -> HookResult {
        tracing::debug!(
            hook = %self.name,
            scope = ?envelope.scope().map(|s| s.to_string()),
            payload = envelope.payload().type_name(),
            annotations = envelope.annotations().len(),
            tags = %envelope.tags(),
            "Scope hook triggered"
        );
        Ok(())
    }
}
