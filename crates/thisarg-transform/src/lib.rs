//! Lowering of explicit receivers to standard JavaScript
//!
//! This crate contains the tree-to-tree pass that runs after binding:
//! - Receiver guards (construction and missing receiver)
//! - Receiver bindings (`const name = this;`)
//! - Carrying receiver types and decorators over as a `this` annotation

pub mod guard;
pub mod lower;

// Re-export main transformation functions
pub use guard::RuntimeErrorKind;
pub use lower::{lower, lower_receivers, LowerOptions, LowerStats};
