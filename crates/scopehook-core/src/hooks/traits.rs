//! Scope hook trait

use async_trait::async_trait;

use crate::envelope::ContextEnvelope;

/// Result returned by a hook; any error is captured as a failure outcome
pub type HookResult = anyhow::Result<()>;

/// A callback that runs when a scope fires
///
/// Hooks of one dispatch run strictly one after another, so a hook may
/// freely read and write the envelope's annotations or request an abort.
#[async_trait]
pub trait ScopeHook: Send + Sync {
    /// Name of the hook for logging and failure reports
    fn name(&self) -> &str;

    /// Execute the hook
    async fn run(&self, envelope: &mut ContextEnvelope) -> HookResult;
}
