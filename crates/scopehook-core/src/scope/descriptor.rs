//! Scope descriptor

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::phase::Phase;
use crate::error::{ScopeError, ScopeResult};

/// Immutable identity of a hook point
///
/// Two descriptors are equal iff their phase and subject match exactly;
/// subjects compare case-sensitively. The text form is `phase:subject`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScopeDescriptor {
    phase: Phase,
    subject: String,
}

impl ScopeDescriptor {
    /// Create a descriptor, rejecting an empty subject
    pub fn new(phase: Phase, subject: impl Into<String>) -> ScopeResult<Self> {
        let subject = subject.into();
        if subject.trim().is_empty() {
            return Err(ScopeError::construction_field(
                format!("subject must not be empty (phase {})", phase),
                "subject",
            ));
        }
        Ok(Self { phase, subject })
    }

    pub fn before(subject: impl Into<String>) -> ScopeResult<Self> {
        Self::new(Phase::Before, subject)
    }

    pub fn after(subject: impl Into<String>) -> ScopeResult<Self> {
        Self::new(Phase::After, subject)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Scope name, i.e. the phase name (`before`, `after`, ...)
    pub fn name(&self) -> &'static str {
        self.phase.name()
    }

    /// The same subject at a different phase
    pub fn with_phase(&self, phase: Phase) -> Self {
        Self {
            phase,
            subject: self.subject.clone(),
        }
    }
}

impl fmt::Display for ScopeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.phase, self.subject)
    }
}

impl FromStr for ScopeDescriptor {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (phase, subject) = s.split_once(':').ok_or_else(|| {
            ScopeError::construction(format!("scope key '{}' is not of the form phase:subject", s))
        })?;
        Self::new(phase.parse()?, subject)
    }
}

impl TryFrom<String> for ScopeDescriptor {
    type Error = ScopeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ScopeDescriptor> for String {
    fn from(scope: ScopeDescriptor) -> Self {
        scope.to_string()
    }
}
