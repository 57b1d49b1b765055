//! Hook registry
//!
//! Maps scope descriptors to their ordered registrations. The registry is an
//! explicitly constructed, cheaply cloneable handle; clones share state, so
//! setup code and every dispatcher can hold their own copy.

mod registration;

pub use registration::{HookRegistration, RegistrationHandle, RegistrationOptions};

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::debug;

use crate::config::DispatcherConfig;
use crate::hooks::ScopeHook;
use crate::scope::ScopeDescriptor;

/// Process-wide source of registry identities
static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Default)]
struct RegistryState {
    /// Buckets stay sorted by priority, then insertion order
    buckets: HashMap<ScopeDescriptor, Vec<HookRegistration>>,
    next_id: u64,
}

/// Registry for managing scope hooks
#[derive(Clone)]
pub struct HookRegistry {
    /// Shared by clones; handles from other registries never match
    registry_id: u64,
    state: Arc<RwLock<RegistryState>>,
    default_priority: i32,
}

impl HookRegistry {
    /// Create a new empty hook registry
    pub fn new() -> Self {
        Self {
            registry_id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            state: Arc::new(RwLock::new(RegistryState::default())),
            default_priority: 0,
        }
    }

    /// Create a registry whose registrations default to `priority`
    pub fn with_default_priority(priority: i32) -> Self {
        Self {
            default_priority: priority,
            ..Self::new()
        }
    }

    /// Create a registry using the configured default priority
    pub fn from_config(config: &DispatcherConfig) -> Self {
        Self::with_default_priority(config.default_priority)
    }

    pub fn default_priority(&self) -> i32 {
        self.default_priority
    }

    /// Register a hook with default options
    pub fn register(&self, scope: ScopeDescriptor, hook: Arc<dyn ScopeHook>) -> RegistrationHandle {
        self.register_with(scope, hook, RegistrationOptions::default())
    }

    /// Register a hook
    ///
    /// Never fails. Registering the same hook twice under one scope yields
    /// two registrations, and both fire.
    pub fn register_with(
        &self,
        scope: ScopeDescriptor,
        hook: Arc<dyn ScopeHook>,
        options: RegistrationOptions,
    ) -> RegistrationHandle {
        let mut state = self.state.write();
        let id = state.next_id;
        state.next_id += 1;

        let registration = HookRegistration {
            registry_id: self.registry_id,
            id,
            scope: scope.clone(),
            hook,
            priority: options.priority.unwrap_or(self.default_priority),
            tags: options.tags,
            critical: options.critical,
        };
        debug!(
            scope = %scope,
            hook = registration.name(),
            id,
            priority = registration.priority,
            critical = registration.critical,
            "Registered scope hook"
        );

        let bucket = state.buckets.entry(scope.clone()).or_default();
        bucket.push(registration);
        // Stable sort keeps insertion order among equal priorities
        bucket.sort_by_key(|r| r.priority);

        RegistrationHandle {
            registry_id: self.registry_id,
            id,
            scope,
        }
    }

    /// Remove a registration; returns whether anything was removed
    ///
    /// Unknown or already removed handles are ignored, as are handles
    /// issued by another registry.
    pub fn unregister(&self, handle: &RegistrationHandle) -> bool {
        if handle.registry_id != self.registry_id {
            debug!(scope = %handle.scope, id = handle.id, "Ignoring handle from another registry");
            return false;
        }
        let mut state = self.state.write();
        let Some(bucket) = state.buckets.get_mut(&handle.scope) else {
            return false;
        };
        let before = bucket.len();
        bucket.retain(|r| r.id != handle.id);
        let removed = bucket.len() != before;
        if bucket.is_empty() {
            state.buckets.remove(&handle.scope);
        }
        if removed {
            debug!(scope = %handle.scope, id = handle.id, "Unregistered scope hook");
        }
        removed
    }

    /// Registrations for `scope`, lowest priority first, then by insertion
    ///
    /// The returned list is a snapshot; later registry changes do not
    /// affect it.
    pub fn resolve(&self, scope: &ScopeDescriptor) -> Vec<HookRegistration> {
        self.state
            .read()
            .buckets
            .get(scope)
            .cloned()
            .unwrap_or_default()
    }

    /// Check if any hooks are registered for a scope
    pub fn has_hooks(&self, scope: &ScopeDescriptor) -> bool {
        self.state
            .read()
            .buckets
            .get(scope)
            .is_some_and(|bucket| !bucket.is_empty())
    }

    /// All scopes with at least one registration, sorted
    pub fn list_scopes(&self) -> Vec<ScopeDescriptor> {
        let mut scopes: Vec<ScopeDescriptor> = self
            .state
            .read()
            .buckets
            .iter()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(scope, _)| scope.clone())
            .collect();
        scopes.sort();
        scopes
    }

    /// Get the number of registrations
    pub fn count(&self) -> usize {
        self.state.read().buckets.values().map(Vec::len).sum()
    }

    /// Remove every registration
    pub fn clear(&self) {
        self.state.write().buckets.clear();
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("id", &self.registry_id)
            .field("registrations", &self.count())
            .field("default_priority", &self.default_priority)
            .finish()
    }
}
