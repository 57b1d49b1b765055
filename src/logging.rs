//! Logging initialisation

use scopehook_core::{LoggingConfig, ScopeError, ScopeResult};
use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Fails if the
/// configuration is invalid or a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> ScopeResult<()> {
    config.validate()?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_ascii_lowercase()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match config.format.to_ascii_lowercase().as_str() {
        "json" => builder.json().try_init(),
        "compact" => builder.compact().try_init(),
        _ => builder.pretty().try_init(),
    };
    result.map_err(|e| {
        ScopeError::config_with_context(
            format!("Failed to initialise logging: {}", e),
            "Installing global tracing subscriber",
        )
    })
}
