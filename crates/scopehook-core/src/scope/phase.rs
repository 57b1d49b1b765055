//! Phase definitions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScopeError;

/// Phases at which a scope can fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Before the subject operation runs
    Before,
    /// After the subject operation has run
    After,
    /// Opening half of an around scope; hooks here may veto the operation
    AroundStart,
    /// Closing half of an around scope
    AroundEnd,
}

impl Phase {
    /// All phases, in lifecycle order
    pub const ALL: [Phase; 4] = [
        Phase::Before,
        Phase::AroundStart,
        Phase::AroundEnd,
        Phase::After,
    ];

    /// Lowercase scope name for this phase
    pub fn name(&self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
            Self::AroundStart => "around_start",
            Self::AroundEnd => "around_end",
        }
    }

    /// Whether this phase is one half of an around scope
    pub fn is_around(&self) -> bool {
        matches!(self, Self::AroundStart | Self::AroundEnd)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Phase {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ScopeError::construction_field("phase must not be empty", "phase"));
        }
        Phase::ALL
            .into_iter()
            .find(|phase| phase.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                ScopeError::construction_field(format!("unknown phase '{}'", trimmed), "phase")
            })
    }
}
