//! Closure-backed hook

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use super::traits::{HookResult, ScopeHook};
use crate::envelope::ContextEnvelope;

/// Rust callback hook
pub struct CallbackHook {
    name: String,
    callback: Arc<dyn Fn(&mut ContextEnvelope) -> HookResult + Send + Sync>,
}

impl CallbackHook {
    /// Create a new callback hook
    pub fn new<F>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&mut ContextEnvelope) -> HookResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            callback: Arc::new(callback),
        }
    }
}

impl Clone for CallbackHook {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            callback: Arc::clone(&self.callback),
        }
    }
}

impl fmt::Debug for CallbackHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackHook")
            .field("name", &self.name)
            .finish()
    }
}

#[async_trait]
impl ScopeHook for CallbackHook {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, envelope: &mut ContextEnvelope) -> HookResult {
        (self.callback)(envelope)
    }
}
