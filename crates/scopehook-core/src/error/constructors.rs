//! Constructor methods for ScopeError

use super::types::ScopeError;

impl ScopeError {
    /// Create a construction error
    pub fn construction(message: impl Into<String>) -> Self {
        Self::Construction {
            message: message.into(),
            field: None,
        }
    }

    /// Create a construction error naming the offending field
    pub fn construction_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Construction {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a registry misuse error
    pub fn misuse(message: impl Into<String>) -> Self {
        Self::RegistryMisuse {
            message: message.into(),
            context: None,
        }
    }

    /// Create a registry misuse error with context
    pub fn misuse_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::RegistryMisuse {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }
}
