//! Scopehook Core Library
//!
//! Scenario-hook dispatch for behavior-driven test runners. Test-support code
//! registers hooks against named lifecycle scopes ("before an entity of kind
//! K is created"); the runner fires those scopes and gets back one aggregated
//! result per dispatch.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use scopehook_core::{
//!     CallbackHook, ContextEnvelope, DispatchStatus, Dispatcher, HookRegistry, ScopeDescriptor,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = HookRegistry::new();
//! let scope = ScopeDescriptor::before_entity_create("dataset")?;
//! registry.register(
//!     scope.clone(),
//!     Arc::new(CallbackHook::new("default_author", |envelope| {
//!         envelope.set_annotation("author", "admin");
//!         Ok(())
//!     })),
//! );
//!
//! let dispatcher = Dispatcher::new(registry);
//! let mut envelope = ContextEnvelope::new("Crime statistics 2024");
//! let result = dispatcher.fire(&scope, &mut envelope).await;
//!
//! assert_eq!(result.status(), DispatchStatus::Completed);
//! assert_eq!(envelope.annotation("author"), Some(&serde_json::json!("admin")));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod hooks;
pub mod registry;
pub mod scope;
pub mod tags;

// Re-export commonly used types
pub use config::{DispatcherConfig, LoggingConfig};
pub use dispatch::{
    AroundOutcome, DispatchResult, DispatchStatus, Dispatcher, HookOutcome, OutcomeStatus,
    ResultAggregator,
};
pub use envelope::{ContextEnvelope, Payload};
pub use error::{ScopeError, ScopeResult};
pub use hooks::builtin::LoggingHook;
pub use hooks::{CallbackHook, HookResult, ScopeHook};
pub use registry::{HookRegistration, HookRegistry, RegistrationHandle, RegistrationOptions};
pub use scope::{EntityOperation, Phase, ScopeDescriptor};
pub use tags::TagSet;
