//! Scope descriptors
//!
//! A scope names one point in a test lifecycle at which hooks may run. It is
//! a closed [`Phase`] crossed with a free-form subject, compared structurally.

mod descriptor;
mod entity;
mod phase;

pub use descriptor::ScopeDescriptor;
pub use entity::EntityOperation;
pub use phase::Phase;
