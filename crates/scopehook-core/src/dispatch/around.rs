//! Around dispatch
//!
//! Wraps an operation in an `around_start`/`around_end` pair. Hooks on the
//! opening scope may veto the operation by aborting the dispatch.

use std::future::Future;

use tracing::info;

use super::aggregate::DispatchResult;
use super::dispatcher::Dispatcher;
use crate::envelope::ContextEnvelope;
use crate::error::ScopeResult;
use crate::scope::{Phase, ScopeDescriptor};

/// Result of wrapping an operation in around hooks
#[derive(Debug)]
pub struct AroundOutcome<T> {
    /// Dispatch of the `around_start` scope
    pub start: DispatchResult,
    /// Operation output; `None` when vetoed
    pub output: Option<T>,
    /// Dispatch of the `around_end` scope; `None` when vetoed
    pub end: Option<DispatchResult>,
}

impl<T> AroundOutcome<T> {
    pub fn vetoed(&self) -> bool {
        self.output.is_none()
    }

    /// Whether both halves of the scope completed without failures
    pub fn is_success(&self) -> bool {
        self.start.is_success() && self.end.as_ref().is_some_and(DispatchResult::is_success)
    }
}

impl Dispatcher {
    /// Run `operation` between the around scopes of `subject`
    ///
    /// The operation is skipped when the opening dispatch aborts. The same
    /// envelope is used for both halves, so annotations written before the
    /// operation are visible to closing hooks.
    pub async fn around<F, Fut, T>(
        &self,
        subject: &str,
        envelope: &mut ContextEnvelope,
        operation: F,
    ) -> ScopeResult<AroundOutcome<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let start_scope = ScopeDescriptor::new(Phase::AroundStart, subject)?;
        let start = self.fire(&start_scope, envelope).await;

        if start.is_aborted() {
            info!(
                scope = %start_scope,
                reason = start.abort_reason(),
                "Operation vetoed by around hook"
            );
            return Ok(AroundOutcome {
                start,
                output: None,
                end: None,
            });
        }

        let output = operation().await;
        let end_scope = start_scope.with_phase(Phase::AroundEnd);
        let end = self.fire(&end_scope, envelope).await;

        Ok(AroundOutcome {
            start,
            output: Some(output),
            end: Some(end),
        })
    }
}
