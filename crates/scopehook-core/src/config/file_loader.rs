//! File-based configuration loading

use std::fs;
use std::path::Path;

use tracing::debug;

use super::dispatcher_config::DispatcherConfig;
use crate::error::{ScopeError, ScopeResult};

/// Formats recognised by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Anything that is not `.toml`, `.yaml` or `.yml` is read as JSON
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::Toml,
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Yaml => "YAML",
            Self::Json => "JSON",
        }
    }

    fn parse(self, content: &str) -> Result<DispatcherConfig, String> {
        match self {
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// Load dispatcher configuration from a TOML, YAML or JSON file
///
/// A missing file is not an error; defaults are returned instead. The
/// loaded configuration is validated before it is handed back.
pub fn load_from_file(path: &Path) -> ScopeResult<DispatcherConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file not found, using defaults");
        return Ok(DispatcherConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        ScopeError::config_with_context(
            format!("cannot read hook config: {}", e),
            format!("reading '{}'", path.display()),
        )
    })?;

    let format = ConfigFormat::of(path);
    let config = format.parse(&content).map_err(|reason| {
        ScopeError::config_with_context(
            format!("invalid {} hook config: {}", format.label(), reason),
            format!("loading '{}'", path.display()),
        )
    })?;
    debug!(path = %path.display(), format = format.label(), "Loaded hook config");

    config.validate()?;
    Ok(config)
}
