//! Name resolution for programs with explicit receivers.
//!
//! The binder builds a lexical [`ScopeTree`], injects each receiver name into
//! its function's scope (before the parameters) and decides, for every `this`
//! expression, which function owns it. Where the owning function renamed or
//! destructured its receiver, `this` is reported as an illegal reference.

pub mod binder;
pub mod scope;

pub use binder::{bind, BindResult};
pub use scope::{Binding, BindingKind, Scope, ScopeId, ScopeKind, ScopeTree, ThisRule};
