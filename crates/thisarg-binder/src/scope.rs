//! Scope arena.
//!
//! Scopes live in one vector and point at their parent by index. Function
//! scopes carry a [`ThisRule`] describing what a `this` expression means
//! inside them; arrow functions get a scope without one, so `this` lookups
//! pass straight through them to the enclosing function.

use std::collections::HashMap;
use thisarg_diagnostics::Span;

/// Index of a [`Scope`] in the [`ScopeTree`].
pub type ScopeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Script or module top level.
    Program,
    /// Function, method, accessor, arrow, field initializer or static block.
    Function,
    /// `{ ... }`, loop heads with lexical declarations, switch bodies.
    Block,
    /// `catch (param) { ... }`
    Catch,
    /// Holds the inner binding of a named class.
    Class,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Param,
    Var,
    Let,
    Const,
    Function,
    Class,
    Catch,
    Import,
    /// A name bound by an explicit receiver declaration.
    Receiver,
}

impl BindingKind {
    pub fn is_function_scoped(self) -> bool {
        matches!(self, BindingKind::Var | BindingKind::Function)
    }
}

#[derive(Debug, Clone)]
pub struct Binding {
    pub name: String,
    pub kind: BindingKind,
    /// Span of the declaring identifier.
    pub span: Span,
    pub scope: ScopeId,
    /// Number of resolved references.
    pub references: u32,
}

/// Meaning of `this` inside a function scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThisRule {
    /// No explicit receiver: `this` is whatever the call supplies.
    Dynamic,
    /// `this` is the declared, unnamed receiver.
    Receiver,
    /// The receiver was renamed or destructured; `this` is a static error.
    Forbidden {
        /// Span of the receiver declaration.
        receiver: Span,
        /// Name to suggest instead of `this`, for named receivers.
        replacement: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    pub bindings: HashMap<String, Binding>,
    /// Present on every function scope except arrows, and on the program.
    pub this_rule: Option<ThisRule>,
    /// Code owned by this scope's `this` rule references `this`.
    pub uses_this: bool,
    pub span: Span,
}

impl Scope {
    pub(crate) fn new(
        id: ScopeId,
        kind: ScopeKind,
        parent: Option<ScopeId>,
        this_rule: Option<ThisRule>,
        span: Span,
    ) -> Self {
        Self {
            id,
            kind,
            parent,
            children: Vec::new(),
            bindings: HashMap::new(),
            this_rule,
            uses_this: false,
            span,
        }
    }

    /// Whether `var` declarations hoist to this scope.
    pub fn is_var_boundary(&self) -> bool {
        matches!(self.kind, ScopeKind::Program | ScopeKind::Function)
    }
}

/// Result of binding one program.
#[derive(Debug, Default)]
pub struct ScopeTree {
    pub scopes: Vec<Scope>,
    /// Identifier reference span to the scope that declares it; `None` for
    /// globals and other unresolved names.
    pub resolutions: HashMap<Span, Option<ScopeId>>,
}

impl ScopeTree {
    pub const ROOT: ScopeId = 0;

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id]
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Walk from `scope` to the root looking for `name`.
    pub fn lookup(&self, mut scope: ScopeId, name: &str) -> Option<&Binding> {
        loop {
            let s = &self.scopes[scope];
            if let Some(binding) = s.bindings.get(name) {
                return Some(binding);
            }
            scope = s.parent?;
        }
    }

    /// Binding an identifier reference resolved to.
    pub fn resolved_binding(&self, reference: Span, name: &str) -> Option<&Binding> {
        let scope = (*self.resolutions.get(&reference)?)?;
        self.scopes[scope].bindings.get(name)
    }

    /// Nearest scope, starting at `scope`, that decides what `this` means.
    pub fn this_scope(&self, mut scope: ScopeId) -> ScopeId {
        loop {
            let s = &self.scopes[scope];
            if s.this_rule.is_some() {
                return scope;
            }
            match s.parent {
                Some(parent) => scope = parent,
                None => return scope,
            }
        }
    }

    /// All bindings introduced by explicit receivers.
    pub fn receiver_bindings(&self) -> impl Iterator<Item = &Binding> {
        self.scopes
            .iter()
            .flat_map(|s| s.bindings.values())
            .filter(|b| b.kind == BindingKind::Receiver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> ScopeTree {
        let mut tree = ScopeTree::default();
        tree.scopes.push(Scope::new(
            0,
            ScopeKind::Program,
            None,
            Some(ThisRule::Dynamic),
            Span::DUMMY,
        ));
        tree.scopes.push(Scope::new(
            1,
            ScopeKind::Function,
            Some(0),
            Some(ThisRule::Receiver),
            Span::DUMMY,
        ));
        tree.scopes.push(Scope::new(2, ScopeKind::Function, Some(1), None, Span::DUMMY));
        tree.scopes[0].bindings.insert(
            "x".to_string(),
            Binding {
                name: "x".to_string(),
                kind: BindingKind::Var,
                span: Span::DUMMY,
                scope: 0,
                references: 0,
            },
        );
        tree
    }

    #[test]
    fn test_lookup_walks_parents() {
        let tree = tree();
        assert_eq!(tree.lookup(2, "x").map(|b| b.scope), Some(0));
        assert!(tree.lookup(2, "y").is_none());
    }

    #[test]
    fn test_this_scope_skips_arrows() {
        let tree = tree();
        assert_eq!(tree.this_scope(2), 1);
        assert_eq!(tree.this_scope(0), 0);
    }
}
