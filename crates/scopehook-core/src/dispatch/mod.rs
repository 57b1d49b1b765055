//! Hook dispatch
//!
//! The [`Dispatcher`] fires a scope: it resolves the matching registrations,
//! runs them one after another against a shared envelope and folds their
//! outcomes into a [`DispatchResult`] through the [`ResultAggregator`].

mod aggregate;
mod around;
mod dispatcher;
mod outcome;

pub use aggregate::{DispatchResult, DispatchStatus, ResultAggregator};
pub use around::AroundOutcome;
pub use dispatcher::Dispatcher;
pub use outcome::{HookOutcome, OutcomeStatus};
