//! Built-in hooks

mod logging;

pub use logging::LoggingHook;
