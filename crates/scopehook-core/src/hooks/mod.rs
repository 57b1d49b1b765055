//! Hook capability and built-in hooks

pub mod builtin;
mod callback;
mod traits;

pub use callback::CallbackHook;
pub use traits::{HookResult, ScopeHook};
