//! Core error types

use thiserror::Error;

/// Result type alias for scopehook operations
pub type ScopeResult<T> = Result<T, ScopeError>;

/// Main error type for scopehook
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    /// A scope descriptor could not be built from its parts
    #[error("Invalid scope: {message}")]
    Construction {
        message: String,
        field: Option<String>,
    },

    /// The registry or dispatcher was used with input it cannot act on
    #[error("Registry misuse: {message}")]
    RegistryMisuse {
        message: String,
        context: Option<String>,
    },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// One or more non-critical hooks failed during a dispatch
    #[error("Hook {hook} failed at {scope}: {message}")]
    HookFailed {
        scope: String,
        hook: String,
        message: String,
        failures: usize,
    },

    /// A dispatch stopped early
    #[error("Dispatch of {scope} aborted{}: {reason}", by_hook(.hook))]
    Aborted {
        scope: String,
        hook: Option<String>,
        reason: String,
    },
}

fn by_hook(hook: &Option<String>) -> String {
    hook.as_ref().map(|h| format!(" by {}", h)).unwrap_or_default()
}

impl ScopeError {
    /// Stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Construction { .. } => "SCOPE_CONSTRUCTION",
            Self::RegistryMisuse { .. } => "SCOPE_REGISTRY_MISUSE",
            Self::Config { .. } => "SCOPE_CONFIG",
            Self::HookFailed { .. } => "SCOPE_HOOK_FAILED",
            Self::Aborted { .. } => "SCOPE_ABORTED",
        }
    }

    /// Optional context about where the error occurred
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::Construction { field, .. } => field.as_deref(),
            Self::RegistryMisuse { context, .. } => context.as_deref(),
            Self::Config { context, .. } => context.as_deref(),
            Self::HookFailed { .. } | Self::Aborted { .. } => None,
        }
    }
}
