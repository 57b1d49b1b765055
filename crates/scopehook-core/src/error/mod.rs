//! Error types for scopehook
//!
//! Errors surfaced synchronously by registry, dispatch and configuration
//! operations. Failures raised by hooks themselves are never returned from
//! `fire`; they are captured in the dispatch result and only become a
//! `ScopeError` when a caller asks for it via `DispatchResult::into_result`.

mod constructors;
mod types;

pub use types::{ScopeError, ScopeResult};
