//! Entity lifecycle scopes
//!
//! Test-support code for content entities (datasets, resources, groups...)
//! fires scopes whose subject is `entity.<operation>.<kind>`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::descriptor::ScopeDescriptor;
use super::phase::Phase;
use crate::error::{ScopeError, ScopeResult};

/// Operations on a tracked entity that can be hooked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityOperation {
    Create,
    Update,
    Delete,
}

impl EntityOperation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for EntityOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ScopeDescriptor {
    /// Scope for an operation on an entity of the given kind
    pub fn entity(phase: Phase, operation: EntityOperation, kind: &str) -> ScopeResult<Self> {
        if kind.trim().is_empty() {
            return Err(ScopeError::construction_field(
                "entity kind must not be empty",
                "subject",
            ));
        }
        Self::new(phase, format!("entity.{}.{}", operation, kind))
    }

    /// Scope fired before an entity of `kind` is created
    pub fn before_entity_create(kind: &str) -> ScopeResult<Self> {
        Self::entity(Phase::Before, EntityOperation::Create, kind)
    }

    /// Scope fired after an entity of `kind` has been created
    pub fn after_entity_create(kind: &str) -> ScopeResult<Self> {
        Self::entity(Phase::After, EntityOperation::Create, kind)
    }
}
