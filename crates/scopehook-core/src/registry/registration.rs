//! Registration records and handles

use std::fmt;
use std::sync::Arc;

use crate::hooks::ScopeHook;
use crate::scope::ScopeDescriptor;
use crate::tags::TagSet;

/// Opaque handle returned by `register`, used to unregister
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistrationHandle {
    pub(crate) registry_id: u64,
    pub(crate) id: u64,
    pub(crate) scope: ScopeDescriptor,
}

impl RegistrationHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn scope(&self) -> &ScopeDescriptor {
        &self.scope
    }
}

/// Options applied at registration time
#[derive(Debug, Clone, Default)]
pub struct RegistrationOptions {
    pub(crate) priority: Option<i32>,
    pub(crate) tags: TagSet,
    pub(crate) critical: bool,
}

impl RegistrationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower priorities run first
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Only run for scenarios carrying at least one of these tags
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = tags.into_iter().collect();
        self
    }

    /// A failure of a critical hook aborts the dispatch
    pub fn critical(mut self) -> Self {
        self.critical = true;
        self
    }
}

/// One hook registered under one scope
#[derive(Clone)]
pub struct HookRegistration {
    pub(crate) registry_id: u64,
    pub(crate) id: u64,
    pub(crate) scope: ScopeDescriptor,
    pub(crate) hook: Arc<dyn ScopeHook>,
    pub(crate) priority: i32,
    pub(crate) tags: TagSet,
    pub(crate) critical: bool,
}

impl HookRegistration {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn scope(&self) -> &ScopeDescriptor {
        &self.scope
    }

    pub fn name(&self) -> &str {
        self.hook.name()
    }

    pub fn hook(&self) -> &Arc<dyn ScopeHook> {
        &self.hook
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn is_critical(&self) -> bool {
        self.critical
    }

    /// Handle that would unregister this registration
    pub fn handle(&self) -> RegistrationHandle {
        RegistrationHandle {
            registry_id: self.registry_id,
            id: self.id,
            scope: self.scope.clone(),
        }
    }
}

impl fmt::Debug for HookRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistration")
            .field("id", &self.id)
            .field("scope", &self.scope)
            .field("hook", &self.hook.name())
            .field("priority", &self.priority)
            .field("tags", &self.tags)
            .field("critical", &self.critical)
            .finish()
    }
}

impl fmt::Display for HookRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{} ({})", self.hook.name(), self.id, self.scope)
    }
}
