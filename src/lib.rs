//! Scopehook
//!
//! Scenario-hook dispatch for behavior-driven test runners. This crate
//! re-exports [`scopehook_core`] and adds the pieces a runner needs at
//! suite level: logging initialisation and a [`HookSuite`] bundling a
//! registry and dispatcher for the duration of one test suite.

pub mod logging;
mod suite;

pub use logging::init_logging;
pub use scopehook_core::*;
pub use suite::HookSuite;
