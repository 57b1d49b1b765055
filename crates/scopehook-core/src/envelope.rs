//! Per-dispatch context envelope
//!
//! An envelope carries the payload that triggered a dispatch together with
//! the annotations hooks share with each other. Annotation writes made by
//! one hook are visible to every hook that runs after it in the same
//! dispatch. A fresh envelope is built for every `fire` call.

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::scope::ScopeDescriptor;
use crate::tags::TagSet;

/// Opaque payload handed through to hooks unexamined
///
/// Cloning shares the underlying value, so identity is stable for the
/// whole dispatch.
#[derive(Clone)]
pub struct Payload {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Payload {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// Borrow the payload as `T` if that is its concrete type
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Type name recorded at construction, for logs
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether two payload handles share the same value
    pub fn ptr_eq(&self, other: &Payload) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Context passed to every hook of one dispatch
#[derive(Debug, Clone)]
pub struct ContextEnvelope {
    payload: Payload,
    annotations: HashMap<String, Value>,
    tags: TagSet,
    abort: Option<String>,
    scope: Option<ScopeDescriptor>,
}

impl ContextEnvelope {
    /// Wrap a payload in a new envelope
    pub fn new<T: Any + Send + Sync>(payload: T) -> Self {
        Self::from_payload(Payload::new(payload))
    }

    /// Build an envelope around an existing payload handle
    pub fn from_payload(payload: Payload) -> Self {
        Self {
            payload,
            annotations: HashMap::new(),
            tags: TagSet::new(),
            abort: None,
            scope: None,
        }
    }

    /// An envelope with no meaningful payload
    pub fn empty() -> Self {
        Self::new(())
    }

    /// Set the active scenario tags
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Seed an annotation before dispatch
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Borrow the payload as `T`
    pub fn payload_as<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// Scope currently being dispatched, if any
    pub fn scope(&self) -> Option<&ScopeDescriptor> {
        self.scope.as_ref()
    }

    pub(crate) fn enter_scope(&mut self, scope: &ScopeDescriptor) {
        self.scope = Some(scope.clone());
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn annotation(&self, key: &str) -> Option<&Value> {
        self.annotations.get(key)
    }

    /// Write an annotation, returning the previous value
    pub fn set_annotation(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.annotations.insert(key.into(), value.into())
    }

    pub fn remove_annotation(&mut self, key: &str) -> Option<Value> {
        self.annotations.remove(key)
    }

    pub fn annotations(&self) -> &HashMap<String, Value> {
        &self.annotations
    }

    /// Ask the dispatcher to skip every hook after the current one
    pub fn request_abort(&mut self, reason: impl Into<String>) {
        self.abort = Some(reason.into());
    }

    pub fn abort_requested(&self) -> bool {
        self.abort.is_some()
    }

    pub fn abort_reason(&self) -> Option<&str> {
        self.abort.as_deref()
    }
}

impl Default for ContextEnvelope {
    fn default() -> Self {
        Self::empty()
    }
}
