//! Per-hook outcomes

use serde::{Deserialize, Serialize};

use crate::scope::ScopeDescriptor;

/// How one hook invocation ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Succeeded,
    Failed { error: String },
}

/// Record of one hook invocation within a dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookOutcome {
    /// Registration id, as returned in the registration handle
    pub registration_id: u64,
    /// Hook name
    pub hook: String,
    /// Scope being dispatched
    pub scope: ScopeDescriptor,
    /// Whether the hook ran as critical
    pub critical: bool,
    /// Serialized inline as `status` (plus `error` on failure)
    #[serde(flatten)]
    pub status: OutcomeStatus,
    /// Reason given if the hook set the envelope's abort flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abort_reason: Option<String>,
    pub elapsed_ms: u64,
}

impl HookOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Succeeded)
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Error text of a failed hook
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            OutcomeStatus::Succeeded => None,
            OutcomeStatus::Failed { error } => Some(error),
        }
    }

    pub fn abort_requested(&self) -> bool {
        self.abort_reason.is_some()
    }

    /// Whether this outcome stops the dispatch
    pub fn triggers_abort(&self) -> bool {
        self.abort_requested() || (self.critical && self.is_failure())
    }
}
