//! Dispatcher state machine

use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use chrono::Utc;
use futures::FutureExt;
use tracing::{debug, error, info, warn};

use super::aggregate::{DispatchResult, ResultAggregator};
use super::outcome::{HookOutcome, OutcomeStatus};
use crate::config::DispatcherConfig;
use crate::envelope::ContextEnvelope;
use crate::error::{ScopeError, ScopeResult};
use crate::registry::{HookRegistration, HookRegistry};
use crate::scope::ScopeDescriptor;

/// Fires scopes against a hook registry
///
/// Stateless across calls: each `fire` runs to its own Completed, Partial
/// or Aborted result, so one dispatcher can be shared by concurrent test
/// workers as long as each uses its own envelope.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: HookRegistry,
    fail_fast: bool,
    disabled: HashSet<ScopeDescriptor>,
}

impl Dispatcher {
    /// Create a dispatcher over the given registry
    pub fn new(registry: HookRegistry) -> Self {
        Self {
            registry,
            fail_fast: false,
            disabled: HashSet::new(),
        }
    }

    /// Create a dispatcher applying `fail_fast` and `disabled_scopes`
    pub fn with_config(registry: HookRegistry, config: &DispatcherConfig) -> Self {
        Self {
            registry,
            fail_fast: config.fail_fast,
            disabled: config.disabled_scopes.iter().cloned().collect(),
        }
    }

    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    /// Fire a scope
    ///
    /// Hook failures never make this fail; they are captured in the result.
    pub async fn fire(&self, scope: &ScopeDescriptor, envelope: &mut ContextEnvelope) -> DispatchResult {
        let started_at = Utc::now();
        let clock = Instant::now();
        envelope.enter_scope(scope);

        if let Some(reason) = envelope.abort_reason() {
            warn!(scope = %scope, reason, "Envelope already aborted, skipping hooks");
            return DispatchResult::aborted_before_start(scope, reason).timed(started_at, 0);
        }

        if self.disabled.contains(scope) {
            debug!(scope = %scope, "Scope disabled by configuration");
            return ResultAggregator::aggregate(scope, Vec::new()).timed(started_at, 0);
        }

        // Snapshot first: registry changes made while hooks run apply to
        // later dispatches only.
        let registrations: Vec<HookRegistration> = self
            .registry
            .resolve(scope)
            .into_iter()
            .filter(|r| r.tags().selects(envelope.tags()))
            .collect();

        if registrations.is_empty() {
            debug!(scope = %scope, "No hooks registered for scope");
            return ResultAggregator::aggregate(scope, Vec::new()).timed(started_at, 0);
        }

        info!(scope = %scope, count = registrations.len(), "Dispatching scope hooks");

        let mut outcomes = Vec::with_capacity(registrations.len());
        for registration in &registrations {
            let outcome = self.run_hook(registration, envelope).await;
            let stop = outcome.triggers_abort();
            outcomes.push(outcome);
            if stop {
                break;
            }
        }

        let result = ResultAggregator::aggregate(scope, outcomes)
            .timed(started_at, clock.elapsed().as_millis() as u64);
        if result.is_aborted() {
            warn!(
                scope = %scope,
                hook = result.aborted_by().map(|o| o.hook.as_str()),
                reason = result.abort_reason(),
                skipped = registrations.len() - result.outcomes().len(),
                "Dispatch aborted"
            );
        } else {
            debug!(scope = %scope, status = %result.status(), "Dispatch finished");
        }
        result
    }

    /// Parse a `phase:subject` scope key and fire it
    pub async fn fire_scope(&self, key: &str, envelope: &mut ContextEnvelope) -> ScopeResult<DispatchResult> {
        let scope: ScopeDescriptor = key.parse().map_err(|e: ScopeError| {
            ScopeError::misuse_with_context(
                format!("cannot fire malformed scope '{}'", key),
                e.to_string(),
            )
        })?;
        Ok(self.fire(&scope, envelope).await)
    }

    /// Run one hook, isolating errors and panics
    async fn run_hook(&self, registration: &HookRegistration, envelope: &mut ContextEnvelope) -> HookOutcome {
        let critical = registration.is_critical() || self.fail_fast;
        let clock = Instant::now();
        debug!(hook = %registration, critical, "Executing scope hook");

        let run = AssertUnwindSafe(registration.hook().run(envelope)).catch_unwind().await;
        let status = match run {
            Ok(Ok(())) => OutcomeStatus::Succeeded,
            Ok(Err(e)) => OutcomeStatus::Failed {
                error: format!("{:#}", e),
            },
            Err(panic) => OutcomeStatus::Failed {
                error: format!("hook panicked: {}", panic_message(panic.as_ref())),
            },
        };

        match &status {
            OutcomeStatus::Succeeded => debug!(hook = %registration, "Hook succeeded"),
            OutcomeStatus::Failed { error } => {
                error!(hook = %registration, critical, "Hook failed: {}", error)
            }
        }

        HookOutcome {
            registration_id: registration.id(),
            hook: registration.name().to_string(),
            scope: registration.scope().clone(),
            critical,
            status,
            abort_reason: envelope.abort_reason().map(str::to_string),
            elapsed_ms: clock.elapsed().as_millis() as u64,
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DispatchStatus;
    use crate::hooks::{CallbackHook, HookResult, ScopeHook};
    use crate::registry::{RegistrationHandle, RegistrationOptions};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::Arc;

    type Journal = Arc<Mutex<Vec<String>>>;

    /// Records its name, then behaves as configured
    struct RecordingHook {
        name: String,
        journal: Journal,
        fail: bool,
        abort: bool,
    }

    impl RecordingHook {
        fn ok(name: &str, journal: &Journal) -> Arc<dyn ScopeHook> {
            Self::build(name, journal, false, false)
        }

        fn failing(name: &str, journal: &Journal) -> Arc<dyn ScopeHook> {
            Self::build(name, journal, true, false)
        }

        fn aborting(name: &str, journal: &Journal) -> Arc<dyn ScopeHook> {
            Self::build(name, journal, false, true)
        }

        fn build(name: &str, journal: &Journal, fail: bool, abort: bool) -> Arc<dyn ScopeHook> {
            Arc::new(Self {
                name: name.to_string(),
                journal: journal.clone(),
                fail,
                abort,
            })
        }
    }

    #[async_trait]
    impl ScopeHook for RecordingHook {
        fn name(&self) -> &str {
            &self.name
        }

        async fn run(&self, envelope: &mut ContextEnvelope) -> HookResult {
            self.journal.lock().push(self.name.clone());
            if self.abort {
                envelope.request_abort(format!("{} stopped the dispatch", self.name));
            }
            if self.fail {
                anyhow::bail!("{} failed", self.name);
            }
            Ok(())
        }
    }

    fn scope() -> ScopeDescriptor {
        ScopeDescriptor::before_entity_create("dataset").unwrap()
    }

    fn journal() -> Journal {
        Arc::new(Mutex::new(Vec::new()))
    }

    #[tokio::test]
    async fn test_fire_without_hooks() {
        let dispatcher = Dispatcher::new(HookRegistry::new());
        let mut envelope = ContextEnvelope::empty();
        let result = dispatcher.fire(&scope(), &mut envelope).await;

        assert_eq!(result.status(), DispatchStatus::Completed);
        assert!(result.outcomes().is_empty());
        assert_eq!(envelope.scope(), Some(&scope()));
    }

    #[tokio::test]
    async fn test_fire_priority_order() {
        let registry = HookRegistry::new();
        let journal = journal();
        registry.register_with(scope(), RecordingHook::ok("a", &journal), RegistrationOptions::new().priority(5));
        registry.register_with(scope(), RecordingHook::ok("b", &journal), RegistrationOptions::new().priority(1));
        registry.register_with(scope(), RecordingHook::ok("c", &journal), RegistrationOptions::new().priority(5));

        let dispatcher = Dispatcher::new(registry);
        let result = dispatcher.fire(&scope(), &mut ContextEnvelope::empty()).await;

        assert_eq!(*journal.lock(), vec!["b", "a", "c"]);
        let hooks: Vec<&str> = result.outcomes().iter().map(|o| o.hook.as_str()).collect();
        assert_eq!(hooks, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_non_critical_failure_is_isolated() {
        let registry = HookRegistry::new();
        let journal = journal();
        registry.register(scope(), RecordingHook::failing("broken", &journal));
        registry.register(scope(), RecordingHook::ok("next", &journal));

        let result = Dispatcher::new(registry)
            .fire(&scope(), &mut ContextEnvelope::empty())
            .await;

        assert_eq!(*journal.lock(), vec!["broken", "next"]);
        assert_eq!(result.status(), DispatchStatus::Partial);
        let failures: Vec<_> = result.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].hook, "broken");
        assert_eq!(failures[0].error(), Some("broken failed"));
        assert_eq!(failures[0].scope, scope());
    }

    #[tokio::test]
    async fn test_critical_failure_aborts() {
        let registry = HookRegistry::new();
        let journal = journal();
        registry.register(scope(), RecordingHook::ok("first", &journal));
        registry.register_with(
            scope(),
            RecordingHook::failing("gate", &journal),
            RegistrationOptions::new().critical(),
        );
        registry.register(scope(), RecordingHook::ok("never", &journal));

        let result = Dispatcher::new(registry)
            .fire(&scope(), &mut ContextEnvelope::empty())
            .await;

        assert_eq!(*journal.lock(), vec!["first", "gate"]);
        assert_eq!(result.status(), DispatchStatus::Aborted);
        assert_eq!(result.outcomes().len(), 2);
        assert_eq!(result.aborted_by().unwrap().hook, "gate");
        assert_eq!(result.abort_reason(), Some("gate failed"));
    }

    #[tokio::test]
    async fn test_critical_success_does_not_abort() {
        let registry = HookRegistry::new();
        let journal = journal();
        registry.register_with(scope(), RecordingHook::ok("gate", &journal), RegistrationOptions::new().critical());
        registry.register(scope(), RecordingHook::ok("after", &journal));

        let result = Dispatcher::new(registry)
            .fire(&scope(), &mut ContextEnvelope::empty())
            .await;
        assert_eq!(result.status(), DispatchStatus::Completed);
        assert_eq!(result.outcomes().len(), 2);
    }

    #[tokio::test]
    async fn test_abort_flag_stops_dispatch() {
        let registry = HookRegistry::new();
        let journal = journal();
        registry.register(scope(), RecordingHook::aborting("stopper", &journal));
        registry.register(scope(), RecordingHook::ok("skipped", &journal));

        let mut envelope = ContextEnvelope::empty();
        let result = Dispatcher::new(registry).fire(&scope(), &mut envelope).await;

        assert_eq!(*journal.lock(), vec!["stopper"]);
        assert_eq!(result.status(), DispatchStatus::Aborted);
        assert!(result.outcomes()[0].is_success());
        assert_eq!(result.abort_reason(), Some("stopper stopped the dispatch"));
        assert!(envelope.abort_requested());
    }

    #[tokio::test]
    async fn test_already_aborted_envelope_runs_nothing() {
        let registry = HookRegistry::new();
        let journal = journal();
        registry.register(scope(), RecordingHook::ok("never", &journal));

        let mut envelope = ContextEnvelope::empty();
        envelope.request_abort("scenario skipped");
        let result = Dispatcher::new(registry).fire(&scope(), &mut envelope).await;

        assert!(journal.lock().is_empty());
        assert_eq!(result.status(), DispatchStatus::Aborted);
        assert_eq!(result.abort_reason(), Some("scenario skipped"));
        assert!(result.aborted_by().is_none());
    }

    #[tokio::test]
    async fn test_annotations_flow_between_hooks() {
        let registry = HookRegistry::new();
        registry.register(
            scope(),
            Arc::new(CallbackHook::new("writer", |envelope| {
                envelope.set_annotation("seen", true);
                Ok(())
            })),
        );
        registry.register(
            scope(),
            Arc::new(CallbackHook::new("reader", |envelope| {
                anyhow::ensure!(envelope.annotation("seen") == Some(&json!(true)), "seen not set");
                envelope.set_annotation("checked", true);
                Ok(())
            })),
        );

        let mut envelope = ContextEnvelope::empty();
        let result = Dispatcher::new(registry).fire(&scope(), &mut envelope).await;

        assert!(result.is_success());
        assert_eq!(envelope.annotation("checked"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn test_registry_changes_during_fire_apply_to_next_dispatch() {
        let registry = HookRegistry::new();
        let journal = journal();
        let sibling: Arc<Mutex<Option<RegistrationHandle>>> = Arc::new(Mutex::new(None));

        let late = RecordingHook::ok("late", &journal);
        let mutator = {
            let registry = registry.clone();
            let sibling = sibling.clone();
            CallbackHook::new("mutator", move |_| {
                // Only the first dispatch edits the registry
                if let Some(handle) = sibling.lock().take() {
                    anyhow::ensure!(registry.unregister(&handle), "sibling already gone");
                    registry.register(scope(), late.clone());
                }
                Ok(())
            })
        };
        registry.register(scope(), Arc::new(mutator));
        *sibling.lock() = Some(registry.register(scope(), RecordingHook::ok("sibling", &journal)));

        let dispatcher = Dispatcher::new(registry.clone());
        let hooks = |result: &DispatchResult| -> Vec<String> {
            result.outcomes().iter().map(|o| o.hook.clone()).collect()
        };

        let first = dispatcher.fire(&scope(), &mut ContextEnvelope::empty()).await;
        assert!(first.is_success());
        assert_eq!(hooks(&first), vec!["mutator", "sibling"]);
        assert_eq!(*journal.lock(), vec!["sibling"]);

        let second = dispatcher.fire(&scope(), &mut ContextEnvelope::empty()).await;
        assert!(second.is_success());
        assert_eq!(hooks(&second), vec!["mutator", "late"]);
        assert_eq!(*journal.lock(), vec!["sibling", "late"]);
        assert_eq!(registry.count(), 2);
    }

    #[tokio::test]
    async fn test_panic_is_captured() {
        let registry = HookRegistry::new();
        let journal = journal();
        registry.register(
            scope(),
            Arc::new(CallbackHook::new("panics", |_| panic!("fixture exploded"))),
        );
        registry.register(scope(), RecordingHook::ok("survivor", &journal));

        let result = Dispatcher::new(registry)
            .fire(&scope(), &mut ContextEnvelope::empty())
            .await;

        assert_eq!(result.status(), DispatchStatus::Partial);
        assert_eq!(
            result.outcomes()[0].error(),
            Some("hook panicked: fixture exploded")
        );
        assert_eq!(*journal.lock(), vec!["survivor"]);
    }

    #[tokio::test]
    async fn test_error_chain_is_kept() {
        let registry = HookRegistry::new();
        registry.register(
            scope(),
            Arc::new(CallbackHook::new("chained", |_| {
                let inner: anyhow::Result<()> = Err(anyhow::anyhow!("connection refused"));
                anyhow::Context::context(inner, "creating dataset fixture")
            })),
        );

        let result = Dispatcher::new(registry)
            .fire(&scope(), &mut ContextEnvelope::empty())
            .await;
        assert_eq!(
            result.outcomes()[0].error(),
            Some("creating dataset fixture: connection refused")
        );
    }

    #[tokio::test]
    async fn test_tag_selection() {
        let registry = HookRegistry::new();
        let journal = journal();
        registry.register(scope(), RecordingHook::ok("always", &journal));
        registry.register_with(scope(), RecordingHook::ok("api_only", &journal), RegistrationOptions::new().tags(["@api"]));
        registry.register_with(scope(), RecordingHook::ok("ui_only", &journal), RegistrationOptions::new().tags(["@ui"]));

        let dispatcher = Dispatcher::new(registry);
        let mut envelope = ContextEnvelope::empty().with_tags(["@api"]);
        let result = dispatcher.fire(&scope(), &mut envelope).await;

        assert_eq!(*journal.lock(), vec!["always", "api_only"]);
        assert_eq!(result.outcomes().len(), 2);

        journal.lock().clear();
        dispatcher.fire(&scope(), &mut ContextEnvelope::empty()).await;
        assert_eq!(*journal.lock(), vec!["always"]);
    }

    #[tokio::test]
    async fn test_fail_fast_config() {
        let registry = HookRegistry::new();
        let journal = journal();
        registry.register(scope(), RecordingHook::failing("first", &journal));
        registry.register(scope(), RecordingHook::ok("second", &journal));

        let config = DispatcherConfig {
            fail_fast: true,
            ..DispatcherConfig::default()
        };
        let result = Dispatcher::with_config(registry, &config)
            .fire(&scope(), &mut ContextEnvelope::empty())
            .await;

        assert_eq!(result.status(), DispatchStatus::Aborted);
        assert!(result.outcomes()[0].critical);
        assert_eq!(*journal.lock(), vec!["first"]);
    }

    #[tokio::test]
    async fn test_disabled_scope() {
        let registry = HookRegistry::new();
        let journal = journal();
        registry.register(scope(), RecordingHook::ok("muted", &journal));

        let config = DispatcherConfig {
            disabled_scopes: vec![scope()],
            ..DispatcherConfig::default()
        };
        let result = Dispatcher::with_config(registry, &config)
            .fire(&scope(), &mut ContextEnvelope::empty())
            .await;

        assert!(result.is_success());
        assert!(result.outcomes().is_empty());
        assert!(journal.lock().is_empty());
    }

    #[tokio::test]
    async fn test_fire_scope_parses_key() {
        let registry = HookRegistry::new();
        let journal = journal();
        registry.register(scope(), RecordingHook::ok("keyed", &journal));
        let dispatcher = Dispatcher::new(registry);

        let result = dispatcher
            .fire_scope("before:entity.create.dataset", &mut ContextEnvelope::empty())
            .await
            .unwrap();
        assert_eq!(result.outcomes().len(), 1);

        let err = dispatcher
            .fire_scope("entity.create.dataset", &mut ContextEnvelope::empty())
            .await
            .unwrap_err();
        assert!(matches!(err, ScopeError::RegistryMisuse { .. }));
        assert!(err.context().is_some());
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(boxed.as_ref()), "static");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(boxed.as_ref()), "owned");
        let boxed: Box<dyn Any + Send> = Box::new(5u8);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic payload");
    }
}
