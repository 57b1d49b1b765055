//! Suite-scoped registry and dispatcher

use std::path::Path;

use scopehook_core::config::load_from_file;
use scopehook_core::{DispatcherConfig, Dispatcher, HookRegistry, ScopeResult};
use tracing::info;

/// Registry and dispatcher owned by one test suite
///
/// Built during suite setup and torn down at the end, so hooks registered
/// for one suite never leak into the next.
#[derive(Debug)]
pub struct HookSuite {
    config: DispatcherConfig,
    registry: HookRegistry,
    dispatcher: Dispatcher,
}

impl HookSuite {
    pub fn new(config: DispatcherConfig) -> Self {
        let registry = HookRegistry::from_config(&config);
        let dispatcher = Dispatcher::with_config(registry.clone(), &config);
        Self {
            config,
            registry,
            dispatcher,
        }
    }

    /// Build a suite from a TOML, YAML or JSON config file
    pub fn load(path: &Path) -> ScopeResult<Self> {
        let config = load_from_file(path)?;
        info!(path = %path.display(), "Loaded hook suite configuration");
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Registry for setup code
    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    /// Dispatcher for the code that fires scopes
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Drop every registration; returns how many were removed
    pub fn teardown(self) -> usize {
        let count = self.registry.count();
        self.registry.clear();
        info!(registrations = count, "Hook suite torn down");
        count
    }
}

impl Default for HookSuite {
    fn default() -> Self {
        Self::new(DispatcherConfig::default())
    }
}
