//! Result aggregation

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::outcome::HookOutcome;
use crate::error::{ScopeError, ScopeResult};
use crate::scope::ScopeDescriptor;

/// Overall status of one dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStatus {
    /// Every hook succeeded (or none matched)
    Completed,
    /// At least one hook failed, but the dispatch ran to the end
    Partial,
    /// A critical hook failed or a hook requested an abort
    Aborted,
}

impl fmt::Display for DispatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Partial => write!(f, "partial"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

/// Aggregated result of one dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchResult {
    scope: ScopeDescriptor,
    status: DispatchStatus,
    outcomes: Vec<HookOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    abort_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    elapsed_ms: u64,
}

impl DispatchResult {
    /// A dispatch that ran no hooks because the envelope was already aborted
    pub(crate) fn aborted_before_start(scope: &ScopeDescriptor, reason: impl Into<String>) -> Self {
        Self {
            scope: scope.clone(),
            status: DispatchStatus::Aborted,
            outcomes: Vec::new(),
            abort_reason: Some(reason.into()),
            started_at: None,
            elapsed_ms: 0,
        }
    }

    pub(crate) fn timed(mut self, started_at: DateTime<Utc>, elapsed_ms: u64) -> Self {
        self.started_at = Some(started_at);
        self.elapsed_ms = elapsed_ms;
        self
    }

    pub fn scope(&self) -> &ScopeDescriptor {
        &self.scope
    }

    pub fn status(&self) -> DispatchStatus {
        self.status
    }

    /// Outcomes in the order hooks ran
    pub fn outcomes(&self) -> &[HookOutcome] {
        &self.outcomes
    }

    pub fn failures(&self) -> impl Iterator<Item = &HookOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }

    /// The outcome that stopped the dispatch, if any
    pub fn aborted_by(&self) -> Option<&HookOutcome> {
        self.outcomes.iter().find(|o| o.triggers_abort())
    }

    pub fn abort_reason(&self) -> Option<&str> {
        self.abort_reason.as_deref()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn is_success(&self) -> bool {
        self.status == DispatchStatus::Completed
    }

    pub fn is_aborted(&self) -> bool {
        self.status == DispatchStatus::Aborted
    }

    /// Convert a non-completed dispatch into an error for scenario reporting
    pub fn into_result(self) -> ScopeResult<Self> {
        match self.status {
            DispatchStatus::Completed => Ok(self),
            DispatchStatus::Aborted => Err(ScopeError::Aborted {
                scope: self.scope.to_string(),
                hook: self.aborted_by().map(|o| o.hook.clone()),
                reason: self
                    .abort_reason
                    .clone()
                    .unwrap_or_else(|| "dispatch aborted".to_string()),
            }),
            DispatchStatus::Partial => {
                let failures = self.failures().count();
                let first = self
                    .failures()
                    .next()
                    .map(|o| (o.hook.clone(), o.error().unwrap_or_default().to_string()))
                    .unwrap_or_default();
                Err(ScopeError::HookFailed {
                    scope: self.scope.to_string(),
                    hook: first.0,
                    message: first.1,
                    failures,
                })
            }
        }
    }
}

impl fmt::Display for DispatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({} hook(s), {} failed)",
            self.scope,
            self.status,
            self.outcomes.len(),
            self.failures().count()
        )?;
        if let Some(reason) = &self.abort_reason {
            write!(f, ", abort reason: {}", reason)?;
        }
        for outcome in self.failures() {
            write!(
                f,
                "\n  - {}#{} at {}: {}",
                outcome.hook,
                outcome.registration_id,
                outcome.scope,
                outcome.error().unwrap_or_default()
            )?;
        }
        Ok(())
    }
}

/// Folds hook outcomes into a dispatch result
pub struct ResultAggregator;

impl ResultAggregator {
    /// Deterministic, side-effect free fold over the outcomes of a dispatch
    pub fn aggregate(scope: &ScopeDescriptor, outcomes: Vec<HookOutcome>) -> DispatchResult {
        let trigger = outcomes.iter().find(|o| o.triggers_abort());
        let (status, abort_reason) = match trigger {
            Some(outcome) => (
                DispatchStatus::Aborted,
                outcome
                    .abort_reason
                    .clone()
                    .or_else(|| outcome.error().map(str::to_string)),
            ),
            None if outcomes.iter().any(HookOutcome::is_failure) => (DispatchStatus::Partial, None),
            None => (DispatchStatus::Completed, None),
        };

        DispatchResult {
            scope: scope.clone(),
            status,
            outcomes,
            abort_reason,
            started_at: None,
            elapsed_ms: 0,
        }
    }
}
