//! Walks a parsed program, builds the [`ScopeTree`] and enforces the
//! receiver rules.
//!
//! Bindings are hoisted before the statements of each scope are visited:
//! `var` and top-level function declarations go to the nearest function (or
//! program) scope, lexical declarations to the current scope. References are
//! then resolved innermost-first along the scope stack.

use crate::scope::{Binding, BindingKind, Scope, ScopeId, ScopeKind, ScopeTree, ThisRule};
use thisarg_diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, Span};
use thisarg_parser::ast::*;

/// Scope tree and receiver diagnostics for one program.
#[derive(Debug)]
pub struct BindResult {
    pub tree: ScopeTree,
    pub diagnostics: Diagnostics,
}

/// Bind `program`. The tree is always complete; check the diagnostics for
/// errors.
pub fn bind(program: &Program) -> BindResult {
    let mut binder = Binder::new();
    binder.bind_program(program);
    log::debug!(
        "bound {} scopes ({} diagnostics)",
        binder.tree.len(),
        binder.diagnostics.len()
    );
    BindResult {
        tree: binder.tree,
        diagnostics: binder.diagnostics,
    }
}

struct Binder {
    tree: ScopeTree,
    /// Active scopes, innermost last.
    stack: Vec<ScopeId>,
    /// Function scopes whose parameter defaults are being visited.
    default_zones: Vec<ScopeId>,
    diagnostics: Diagnostics,
}

/// Globals the injected receiver guards refer to by name.
const GUARD_GLOBALS: [&str; 2] = ["TypeError", "globalThis"];

impl Binder {
    fn new() -> Self {
        Self {
            tree: ScopeTree::default(),
            stack: Vec::new(),
            default_zones: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    // ── scope management ────────────────────────────────────────────────────

    fn push_scope(&mut self, kind: ScopeKind, this_rule: Option<ThisRule>, span: Span) -> ScopeId {
        let parent = self.stack.last().copied();
        let id = self.tree.scopes.len();
        self.tree
            .scopes
            .push(Scope::new(id, kind, parent, this_rule, span));
        if let Some(parent) = parent {
            self.tree.scopes[parent].children.push(id);
        }
        self.stack.push(id);
        id
    }

    fn pop_scope(&mut self) {
        self.stack.pop();
    }

    fn current(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(ScopeTree::ROOT)
    }

    fn nearest_var_scope(&self) -> ScopeId {
        self.stack
            .iter()
            .rev()
            .copied()
            .find(|&id| self.tree.scopes[id].is_var_boundary())
            .unwrap_or(ScopeTree::ROOT)
    }

    // ── declarations ────────────────────────────────────────────────────────

    fn declare(&mut self, ident: &Ident, kind: BindingKind, scope: ScopeId) {
        if let Some(existing) = self.tree.scopes[scope].bindings.get(&ident.name) {
            let receiver_span = existing.span;
            match (existing.kind, kind) {
                (BindingKind::Receiver, BindingKind::Param) => {
                    self.diagnostics.push(
                        Diagnostic::error(
                            DiagnosticCode::DuplicateParameter,
                            format!("parameter `{}` has the same name as the receiver", ident.name),
                        )
                        .with_span(ident.span)
                        .with_label(receiver_span, "receiver bound here")
                        .build(),
                    );
                }
                (BindingKind::Receiver, BindingKind::Receiver) => {
                    self.diagnostics.push(
                        Diagnostic::error(
                            DiagnosticCode::DuplicateParameter,
                            format!("`{}` is bound twice by the receiver pattern", ident.name),
                        )
                        .with_span(ident.span)
                        .with_label(receiver_span, "first bound here")
                        .build(),
                    );
                }
                (BindingKind::Receiver, _) => {
                    self.diagnostics.push(
                        Diagnostic::error(
                            DiagnosticCode::RedeclaredReceiver,
                            format!("`{}` is already bound to the receiver", ident.name),
                        )
                        .with_span(ident.span)
                        .with_label(receiver_span, "receiver bound here")
                        .with_help("rename either the declaration or the receiver")
                        .build(),
                    );
                }
                // ordinary redeclarations are the engine's business
                _ => {}
            }
            return;
        }

        log::trace!("declare {:?} `{}` in scope {}", kind, ident.name, scope);
        self.tree.scopes[scope].bindings.insert(
            ident.name.clone(),
            Binding {
                name: ident.name.clone(),
                kind,
                span: ident.span,
                scope,
                references: 0,
            },
        );
    }

    fn declare_pat(&mut self, pat: &Pat, kind: BindingKind, scope: ScopeId) {
        for ident in pat.bound_names() {
            self.declare(ident, kind, scope);
        }
    }

    /// Register the declarations of a statement list before visiting it.
    /// `var`s are collected once, from the body of their function, so nested
    /// blocks only hoist their lexical declarations.
    fn hoist(&mut self, stmts: &[Stmt], with_vars: bool) {
        let lexical = self.current();
        let var = self.nearest_var_scope();
        for stmt in stmts {
            self.hoist_lexical(stmt, lexical);
            if with_vars {
                self.hoist_vars(stmt, var);
            }
        }
    }

    fn hoist_lexical(&mut self, stmt: &Stmt, scope: ScopeId) {
        match stmt {
            Stmt::Var(decl) if decl.kind != VarKind::Var => {
                let kind = if decl.kind == VarKind::Let {
                    BindingKind::Let
                } else {
                    BindingKind::Const
                };
                for d in &decl.decls {
                    self.declare_pat(&d.target, kind, scope);
                }
            }
            Stmt::Function(f) => {
                if let Some(name) = &f.name {
                    self.declare(name, BindingKind::Function, scope);
                }
            }
            Stmt::Class(c) => {
                if let Some(name) = &c.name {
                    self.declare(name, BindingKind::Class, scope);
                }
            }
            Stmt::Import(import) => {
                for spec in &import.specifiers {
                    self.declare(spec.local(), BindingKind::Import, scope);
                }
            }
            Stmt::Export(ExportDecl::Decl { decl, .. })
            | Stmt::Export(ExportDecl::DefaultDecl { decl, .. }) => self.hoist_lexical(decl, scope),
            _ => {}
        }
    }

    fn hoist_vars(&mut self, stmt: &Stmt, scope: ScopeId) {
        match stmt {
            Stmt::Var(decl) if decl.kind == VarKind::Var => {
                for d in &decl.decls {
                    self.declare_pat(&d.target, BindingKind::Var, scope);
                }
            }
            Stmt::Block(block) => {
                for s in &block.stmts {
                    self.hoist_vars(s, scope);
                }
            }
            Stmt::If { cons, alt, .. } => {
                self.hoist_vars(cons, scope);
                if let Some(alt) = alt {
                    self.hoist_vars(alt, scope);
                }
            }
            Stmt::For { init, body, .. } => {
                if let Some(ForInit::Var(decl)) = init {
                    self.hoist_vars(&Stmt::Var(decl.clone()), scope);
                }
                self.hoist_vars(body, scope);
            }
            Stmt::ForIn { left, body, .. } | Stmt::ForOf { left, body, .. } => {
                if let ForHead::Var(decl) = left {
                    self.hoist_vars(&Stmt::Var(decl.clone()), scope);
                }
                self.hoist_vars(body, scope);
            }
            Stmt::While { body, .. } | Stmt::DoWhile { body, .. } | Stmt::Labeled { body, .. } => {
                self.hoist_vars(body, scope)
            }
            Stmt::Try {
                block,
                handler,
                finalizer,
                ..
            } => {
                for s in &block.stmts {
                    self.hoist_vars(s, scope);
                }
                if let Some(handler) = handler {
                    for s in &handler.body.stmts {
                        self.hoist_vars(s, scope);
                    }
                }
                if let Some(finalizer) = finalizer {
                    for s in &finalizer.stmts {
                        self.hoist_vars(s, scope);
                    }
                }
            }
            Stmt::Switch { cases, .. } => {
                for case in cases {
                    for s in &case.body {
                        self.hoist_vars(s, scope);
                    }
                }
            }
            Stmt::Export(ExportDecl::Decl { decl, .. }) => self.hoist_vars(decl, scope),
            _ => {}
        }
    }

    // ── references ──────────────────────────────────────────────────────────

    fn resolve(&mut self, ident: &Ident) {
        let found = self
            .stack
            .iter()
            .rev()
            .copied()
            .find(|&id| self.tree.scopes[id].bindings.contains_key(&ident.name));

        if let Some(scope) = found {
            if let Some(binding) = self.tree.scopes[scope].bindings.get_mut(&ident.name) {
                binding.references += 1;
                if binding.kind == BindingKind::Receiver && self.default_zones.contains(&scope) {
                    let receiver = binding.span;
                    self.diagnostics.push(
                        Diagnostic::error(
                            DiagnosticCode::ReceiverInDefault,
                            format!(
                                "receiver `{}` is not yet bound while parameter defaults run",
                                ident.name
                            ),
                        )
                        .with_span(ident.span)
                        .with_label(receiver, "receiver bound here")
                        .with_help("move the computation into the function body")
                        .build(),
                    );
                }
            }
        }
        self.tree.resolutions.insert(ident.span, found);
    }

    /// Report declarations that would capture a name the receiver guard of
    /// the function owning `scope` relies on.
    fn check_guard_globals(&mut self, f: &Function, scope: ScopeId) {
        let Some(receiver) = &f.receiver else {
            return;
        };
        for name in GUARD_GLOBALS {
            // strict functions never compare against the global object
            if name == "globalThis" && f.strict {
                continue;
            }
            let Some(binding) = self.tree.lookup(scope, name) else {
                continue;
            };
            let span = binding.span;
            self.diagnostics.push(
                Diagnostic::error(
                    DiagnosticCode::ShadowedGuardName,
                    format!("`{}` is rebound here but the receiver check needs the global", name),
                )
                .with_span(span)
                .with_label(receiver.span, "receiver declared here")
                .with_help(format!("rename this `{}`", name))
                .build(),
            );
        }
    }

    fn check_this(&mut self, span: Span) {
        let owner = self.tree.this_scope(self.current());
        let scope = &mut self.tree.scopes[owner];
        scope.uses_this = true;

        if let Some(ThisRule::Forbidden {
            receiver,
            replacement,
        }) = &scope.this_rule
        {
            let (label, help) = match replacement {
                Some(name) => (
                    format!("receiver renamed to `{}` here", name),
                    format!("use `{}` instead of `this`", name),
                ),
                None => (
                    "receiver destructured here".to_string(),
                    "declare a named receiver such as `this self` to use the whole object"
                        .to_string(),
                ),
            };
            let receiver = *receiver;
            self.diagnostics.push(
                Diagnostic::error(
                    DiagnosticCode::IllegalThisReference,
                    "`this` is not available in a function that names its receiver",
                )
                .with_span(span)
                .with_label(receiver, label)
                .with_help(help)
                .build(),
            );
        }
    }

    // ── traversal ───────────────────────────────────────────────────────────

    fn bind_program(&mut self, program: &Program) {
        self.push_scope(ScopeKind::Program, Some(ThisRule::Dynamic), program.span);
        self.hoist(&program.body, true);
        self.visit_stmts(&program.body);
        self.pop_scope();
    }

    fn visit_stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.visit_stmt(stmt);
        }
    }

    fn visit_block(&mut self, block: &Block) {
        self.push_scope(ScopeKind::Block, None, block.span);
        self.hoist(&block.stmts, false);
        self.visit_stmts(&block.stmts);
        self.pop_scope();
    }

    fn visit_var_decl(&mut self, decl: &VarDecl) {
        for d in &decl.decls {
            self.visit_pat(&d.target, false);
            if let Some(init) = &d.init {
                self.visit_expr(init);
            }
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr { expr, .. } => self.visit_expr(expr),
            Stmt::Var(decl) => self.visit_var_decl(decl),
            Stmt::Function(f) => self.visit_function(f),
            Stmt::Class(c) => self.visit_class(c),
            Stmt::Return { arg, .. } => {
                if let Some(arg) = arg {
                    self.visit_expr(arg);
                }
            }
            Stmt::Throw { arg, .. } => self.visit_expr(arg),
            Stmt::If {
                test, cons, alt, ..
            } => {
                self.visit_expr(test);
                self.visit_stmt(cons);
                if let Some(alt) = alt {
                    self.visit_stmt(alt);
                }
            }
            Stmt::Block(block) => self.visit_block(block),
            Stmt::For {
                init,
                test,
                update,
                body,
                span,
            } => {
                self.push_scope(ScopeKind::Block, None, *span);
                match init {
                    Some(ForInit::Var(decl)) => {
                        if decl.kind != VarKind::Var {
                            self.hoist_lexical(&Stmt::Var(decl.clone()), self.current());
                        }
                        self.visit_var_decl(decl);
                    }
                    Some(ForInit::Expr(expr)) => self.visit_expr(expr),
                    None => {}
                }
                if let Some(test) = test {
                    self.visit_expr(test);
                }
                if let Some(update) = update {
                    self.visit_expr(update);
                }
                self.visit_stmt(body);
                self.pop_scope();
            }
            Stmt::ForIn {
                left,
                right,
                body,
                span,
            }
            | Stmt::ForOf {
                left,
                right,
                body,
                span,
                ..
            } => {
                self.push_scope(ScopeKind::Block, None, *span);
                match left {
                    ForHead::Var(decl) => {
                        if decl.kind != VarKind::Var {
                            self.hoist_lexical(&Stmt::Var(decl.clone()), self.current());
                        }
                        self.visit_var_decl(decl);
                    }
                    ForHead::Pat(pat) => self.visit_pat(pat, true),
                }
                self.visit_expr(right);
                self.visit_stmt(body);
                self.pop_scope();
            }
            Stmt::While { test, body, .. } | Stmt::DoWhile { body, test, .. } => {
                self.visit_expr(test);
                self.visit_stmt(body);
            }
            Stmt::Try {
                block,
                handler,
                finalizer,
                ..
            } => {
                self.visit_block(block);
                if let Some(handler) = handler {
                    self.push_scope(ScopeKind::Catch, None, handler.span);
                    if let Some(param) = &handler.param {
                        let scope = self.current();
                        self.declare_pat(param, BindingKind::Catch, scope);
                        self.visit_pat(param, false);
                    }
                    self.visit_block(&handler.body);
                    self.pop_scope();
                }
                if let Some(finalizer) = finalizer {
                    self.visit_block(finalizer);
                }
            }
            Stmt::Switch {
                discriminant,
                cases,
                span,
            } => {
                self.visit_expr(discriminant);
                self.push_scope(ScopeKind::Block, None, *span);
                for case in cases {
                    self.hoist(&case.body, false);
                }
                for case in cases {
                    if let Some(test) = &case.test {
                        self.visit_expr(test);
                    }
                    self.visit_stmts(&case.body);
                }
                self.pop_scope();
            }
            Stmt::Labeled { body, .. } => self.visit_stmt(body),
            Stmt::Export(export) => match export {
                ExportDecl::Decl { decl, .. } | ExportDecl::DefaultDecl { decl, .. } => {
                    self.visit_stmt(decl)
                }
                ExportDecl::DefaultExpr { expr, .. } => self.visit_expr(expr),
                ExportDecl::Named {
                    specifiers,
                    source: None,
                    ..
                } => {
                    for spec in specifiers {
                        self.resolve(&spec.local);
                    }
                }
                ExportDecl::Named { .. } | ExportDecl::All { .. } => {}
            },
            Stmt::Break { .. }
            | Stmt::Continue { .. }
            | Stmt::Empty(_)
            | Stmt::Debugger(_)
            | Stmt::Import(_) => {}
        }
    }

    /// Visit the expressions inside a pattern. With `references` set the
    /// pattern is an assignment target and its identifiers are references;
    /// otherwise they are declarations handled elsewhere.
    fn visit_pat(&mut self, pat: &Pat, references: bool) {
        match pat {
            Pat::Ident(ident) => {
                if references {
                    self.resolve(ident);
                }
            }
            Pat::Array { elems, .. } => {
                for elem in elems.iter().flatten() {
                    self.visit_pat(elem, references);
                }
            }
            Pat::Object { props, .. } => {
                for prop in props {
                    match prop {
                        ObjectPatProp::KeyValue { key, value, .. } => {
                            self.visit_prop_key(key);
                            self.visit_pat(value, references);
                        }
                        ObjectPatProp::Shorthand { name, default, .. } => {
                            if references {
                                self.resolve(name);
                            }
                            if let Some(default) = default {
                                self.visit_expr(default);
                            }
                        }
                        ObjectPatProp::Rest { arg, .. } => self.visit_pat(arg, references),
                    }
                }
            }
            Pat::Assign { left, right, .. } => {
                self.visit_pat(left, references);
                self.visit_expr(right);
            }
            Pat::Rest { arg, .. } => self.visit_pat(arg, references),
            Pat::Expr(expr) => self.visit_expr(expr),
        }
    }

    fn visit_prop_key(&mut self, key: &PropKey) {
        if let PropKey::Computed(expr) = key {
            self.visit_expr(expr);
        }
    }

    fn visit_decorators(&mut self, decorators: &[Decorator]) {
        for decorator in decorators {
            self.visit_expr(&decorator.expr);
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(ident) => self.resolve(ident),
            Expr::This(span) => self.check_this(*span),
            Expr::Super(_) | Expr::Lit(_) | Expr::MetaProp { .. } => {}
            Expr::Template(tpl) => {
                for e in &tpl.exprs {
                    self.visit_expr(e);
                }
            }
            Expr::TaggedTemplate { tag, tpl, .. } => {
                self.visit_expr(tag);
                for e in &tpl.exprs {
                    self.visit_expr(e);
                }
            }
            Expr::Array { elems, .. } => {
                for elem in elems.iter().flatten() {
                    self.visit_expr(&elem.expr);
                }
            }
            Expr::Object { props, .. } => {
                for prop in props {
                    match prop {
                        Prop::KeyValue { key, value, .. } => {
                            self.visit_prop_key(key);
                            self.visit_expr(value);
                        }
                        Prop::Shorthand { name, default, .. } => {
                            self.resolve(name);
                            if let Some(default) = default {
                                self.visit_expr(default);
                            }
                        }
                        Prop::Method { key, function, .. } => {
                            self.visit_prop_key(key);
                            self.visit_function(function);
                        }
                        Prop::Spread { expr, .. } => self.visit_expr(expr),
                    }
                }
            }
            Expr::Function(f) => match &f.name {
                // the name of a function expression is visible only inside it
                Some(name) => {
                    self.push_scope(ScopeKind::Block, None, f.span);
                    let scope = self.current();
                    self.declare(name, BindingKind::Function, scope);
                    self.visit_function(f);
                    self.pop_scope();
                }
                None => self.visit_function(f),
            },
            Expr::Arrow(f) => self.visit_function(f),
            Expr::Class(c) => self.visit_class(c),
            Expr::Unary { arg, .. } | Expr::Update { arg, .. } | Expr::Await { arg, .. } => {
                self.visit_expr(arg)
            }
            Expr::Binary { left, right, .. } => {
                self.visit_expr(left);
                self.visit_expr(right);
            }
            Expr::Assign { target, value, .. } => {
                match &**target {
                    AssignTarget::Simple(expr) => self.visit_expr(expr),
                    AssignTarget::Pat(pat) => self.visit_pat(pat, true),
                }
                self.visit_expr(value);
            }
            Expr::Cond {
                test, cons, alt, ..
            } => {
                self.visit_expr(test);
                self.visit_expr(cons);
                self.visit_expr(alt);
            }
            Expr::Call { callee, args, .. } => {
                self.visit_expr(callee);
                for arg in args {
                    self.visit_expr(&arg.expr);
                }
            }
            Expr::New { callee, args, .. } => {
                self.visit_expr(callee);
                for arg in args.iter().flatten() {
                    self.visit_expr(&arg.expr);
                }
            }
            Expr::Member { object, prop, .. } => {
                self.visit_expr(object);
                if let MemberProp::Computed(expr) = prop {
                    self.visit_expr(expr);
                }
            }
            Expr::Seq { exprs, .. } => {
                for e in exprs {
                    self.visit_expr(e);
                }
            }
            Expr::Yield { arg, .. } => {
                if let Some(arg) = arg {
                    self.visit_expr(arg);
                }
            }
            Expr::Paren { expr, .. } => self.visit_expr(expr),
        }
    }

    fn visit_function(&mut self, f: &Function) {
        // decorators run in the enclosing scope
        if let Some(receiver) = &f.receiver {
            self.visit_decorators(&receiver.decorators);
        }
        for param in &f.params {
            self.visit_decorators(&param.decorators);
        }

        let final_rule = match (f.kind, &f.receiver) {
            (FunctionKind::Arrow, _) => None,
            (_, None) => Some(ThisRule::Dynamic),
            (_, Some(receiver)) => Some(match &receiver.binding {
                ReceiverBinding::Unnamed => ThisRule::Receiver,
                ReceiverBinding::Named(ident) => ThisRule::Forbidden {
                    receiver: receiver.span,
                    replacement: Some(ident.name.clone()),
                },
                ReceiverBinding::Destructured(_) => ThisRule::Forbidden {
                    receiver: receiver.span,
                    replacement: None,
                },
            }),
        };

        // Defaults inside a destructured receiver pattern still see `this`
        // as the receiver itself; the rename takes effect after them.
        let initial_rule = match &final_rule {
            Some(ThisRule::Forbidden { .. }) => Some(ThisRule::Receiver),
            other => other.clone(),
        };
        let scope = self.push_scope(ScopeKind::Function, initial_rule, f.span);

        if let Some(receiver) = &f.receiver {
            match &receiver.binding {
                ReceiverBinding::Unnamed => {}
                ReceiverBinding::Named(ident) => {
                    log::trace!("receiver `{}` injected into scope {}", ident.name, scope);
                    self.declare(ident, BindingKind::Receiver, scope);
                }
                ReceiverBinding::Destructured(pat) => {
                    self.declare_pat(pat, BindingKind::Receiver, scope);
                }
            }
        }
        for param in &f.params {
            self.declare_pat(&param.pat, BindingKind::Param, scope);
        }

        // The receiver pattern is destructured in the body, after every
        // parameter is bound, so its defaults may read parameters.
        if let Some(ReceiverParam {
            binding: ReceiverBinding::Destructured(pat),
            ..
        }) = &f.receiver
        {
            self.visit_pat(pat, false);
        }
        self.tree.scopes[scope].this_rule = final_rule;

        self.default_zones.push(scope);
        for param in &f.params {
            self.visit_pat(&param.pat, false);
            if let Some(default) = &param.default {
                self.visit_expr(default);
            }
        }
        self.default_zones.pop();

        match &f.body {
            FunctionBody::Block(block) => {
                self.hoist(&block.stmts, true);
                self.check_guard_globals(f, scope);
                self.visit_stmts(&block.stmts);
            }
            FunctionBody::Expr(expr) => {
                self.check_guard_globals(f, scope);
                self.visit_expr(expr);
            }
        }
        self.pop_scope();

        if let Some(ReceiverParam {
            binding: ReceiverBinding::Named(ident),
            ..
        }) = &f.receiver
        {
            let unused = self.tree.scopes[scope]
                .bindings
                .get(&ident.name)
                .map_or(false, |b| b.kind == BindingKind::Receiver && b.references == 0);
            if unused {
                self.diagnostics.push(
                    Diagnostic::hint(
                        DiagnosticCode::UnusedReceiver,
                        format!("receiver `{}` is never used", ident.name),
                    )
                    .with_span(ident.span)
                    .with_help("declare an unnamed receiver with a bare `this` if only the check is wanted")
                    .build(),
                );
            }
        }
    }

    fn visit_class(&mut self, class: &Class) {
        self.visit_decorators(&class.decorators);
        if let Some(super_class) = &class.super_class {
            self.visit_expr(super_class);
        }

        // the class scope has no `this` rule: computed keys see the
        // enclosing function's receiver
        self.push_scope(ScopeKind::Class, None, class.span);
        if let Some(name) = &class.name {
            let scope = self.current();
            self.declare(name, BindingKind::Class, scope);
        }

        for member in &class.body {
            match member {
                ClassMember::Method {
                    decorators,
                    key,
                    function,
                    ..
                } => {
                    self.visit_decorators(decorators);
                    self.visit_prop_key(key);
                    self.visit_function(function);
                }
                ClassMember::Field {
                    decorators,
                    key,
                    value,
                    span,
                    ..
                } => {
                    self.visit_decorators(decorators);
                    self.visit_prop_key(key);
                    if let Some(value) = value {
                        self.push_scope(ScopeKind::Function, Some(ThisRule::Dynamic), *span);
                        self.visit_expr(value);
                        self.pop_scope();
                    }
                }
                ClassMember::StaticBlock { body, span } => {
                    self.push_scope(ScopeKind::Function, Some(ThisRule::Dynamic), *span);
                    self.hoist(&body.stmts, true);
                    self.visit_stmts(&body.stmts);
                    self.pop_scope();
                }
            }
        }
        self.pop_scope();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thisarg_parser::{parse_program, Syntax};

    fn bind_source(source: &str) -> BindResult {
        let parsed = parse_program(source, Syntax::default());
        assert!(
            !parsed.has_errors(),
            "parse errors: {:?}",
            parsed.diagnostics.iter().map(|d| &d.message).collect::<Vec<_>>()
        );
        bind(&parsed.program)
    }

    fn error_codes(result: &BindResult) -> Vec<DiagnosticCode> {
        result
            .diagnostics
            .iter()
            .filter(|d| d.is_error())
            .map(|d| d.code)
            .collect()
    }

    #[test]
    fn test_unnamed_receiver_keeps_this() {
        let result = bind_source("function f(this) { console.log(this) }");
        assert!(result.diagnostics.is_empty());
        let function_scope = result
            .tree
            .scopes
            .iter()
            .find(|s| s.kind == ScopeKind::Function)
            .unwrap();
        assert_eq!(function_scope.this_rule, Some(ThisRule::Receiver));
        assert!(function_scope.uses_this);
    }

    #[test]
    fn test_arrow_inherits_renamed_receiver() {
        let source = "function cb(this elem, e) { setTimeout(() => this.value = '') }";
        let result = bind_source(source);
        assert_eq!(error_codes(&result), vec![DiagnosticCode::IllegalThisReference]);

        let diag = result.diagnostics.iter().next().unwrap();
        let at = source.find("this.value").unwrap() as u32;
        assert_eq!(diag.span.start, at);
        assert_eq!(diag.span.end, at + 4);
        assert_eq!(diag.help.as_deref(), Some("use `elem` instead of `this`"));
    }

    #[test]
    fn test_nested_ordinary_function_is_exempt() {
        let result = bind_source(
            "function outer(this o) { o.x = 1; function inner() { return this; } const m = { f() { return this; } }; }",
        );
        assert!(error_codes(&result).is_empty());
    }

    #[test]
    fn test_every_illegal_this_is_reported() {
        let result = bind_source(
            "function f(this self) { this.a; () => () => this.b; return self; }",
        );
        assert_eq!(
            error_codes(&result),
            vec![
                DiagnosticCode::IllegalThisReference,
                DiagnosticCode::IllegalThisReference
            ]
        );
    }

    #[test]
    fn test_destructured_receiver_bindings() {
        let result = bind_source("function area(this { width, height }) { return width * height; }");
        assert!(result.diagnostics.is_empty());
        let names: Vec<_> = {
            let mut names: Vec<_> = result
                .tree
                .receiver_bindings()
                .map(|b| b.name.clone())
                .collect();
            names.sort();
            names
        };
        assert_eq!(names, vec!["height", "width"]);
        assert!(result.tree.scopes.iter().all(|s| !s.bindings.contains_key("this")));
    }

    #[test]
    fn test_destructured_receiver_forbids_this_in_body() {
        let result = bind_source("function f(this { a }) { return this.b + a; }");
        assert_eq!(error_codes(&result), vec![DiagnosticCode::IllegalThisReference]);
        let diag = result.diagnostics.iter().next().unwrap();
        assert_eq!(diag.labels[0].message, "receiver destructured here");
    }

    #[test]
    fn test_this_allowed_in_receiver_pattern_defaults() {
        let result = bind_source("function f(this { a = this.fallback }) { return a; }");
        assert!(error_codes(&result).is_empty());
    }

    #[test]
    fn test_receiver_shadows_outer_binding() {
        let source = "const user = 1; function f(this user) { return user; }";
        let result = bind_source(source);
        let at = source.rfind("user").unwrap() as u32;
        let span = *result
            .tree
            .resolutions
            .keys()
            .find(|s| s.start == at)
            .unwrap();
        let binding = result.tree.resolved_binding(span, "user").unwrap();
        assert_eq!(binding.kind, BindingKind::Receiver);
    }

    #[test]
    fn test_class_elements_are_boundaries() {
        let result = bind_source(
            "function f(this r) { return class extends r.Base { x = this.y; static { this.z; } m() { this; } [r.key]() {} }; }",
        );
        assert!(error_codes(&result).is_empty());
    }

    #[test]
    fn test_computed_key_in_forbidden_zone() {
        let result = bind_source("function f(this r) { r; return class { [this.k]() {} }; }");
        assert_eq!(error_codes(&result), vec![DiagnosticCode::IllegalThisReference]);
    }

    #[test]
    fn test_parameter_named_like_receiver() {
        let result = bind_source("function f(this a, a) { return a; }");
        assert_eq!(error_codes(&result), vec![DiagnosticCode::DuplicateParameter]);
    }

    #[test]
    fn test_body_redeclares_receiver() {
        let result = bind_source("function f(this a) { let a = 1; { var a; } }");
        assert_eq!(
            error_codes(&result),
            vec![
                DiagnosticCode::RedeclaredReceiver,
                DiagnosticCode::RedeclaredReceiver
            ]
        );
    }

    #[test]
    fn test_block_scoped_shadowing_is_fine() {
        let result = bind_source("function f(this a) { { let a = 2; a; } return a; }");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_unused_receiver_hint() {
        let result = bind_source("function f(this unused) { return 1; }");
        assert!(error_codes(&result).is_empty());
        assert_eq!(result.diagnostics.codes(), vec![DiagnosticCode::UnusedReceiver]);
    }

    #[test]
    fn test_receiver_read_in_parameter_default() {
        let source = "const self = 1; function f(this self, x = self.y) { return x; }";
        let result = bind_source(source);
        assert_eq!(error_codes(&result), vec![DiagnosticCode::ReceiverInDefault]);
        let diag = result.diagnostics.iter().next().unwrap();
        assert_eq!(diag.span.start as usize, source.find("self.y").unwrap());
    }

    #[test]
    fn test_receiver_captured_by_closure_in_default() {
        let result = bind_source("function f(this { a }, g = () => a) { return g(); }");
        assert_eq!(error_codes(&result), vec![DiagnosticCode::ReceiverInDefault]);
    }

    #[test]
    fn test_receiver_pattern_defaults_see_parameters() {
        let source = "function f(this { a = fallback }, fallback) { return a; }";
        let result = bind_source(source);
        assert!(error_codes(&result).is_empty());
        let at = source.find("fallback }").unwrap() as u32;
        let span = *result
            .tree
            .resolutions
            .keys()
            .find(|s| s.start == at)
            .unwrap();
        let binding = result.tree.resolved_binding(span, "fallback").unwrap();
        assert_eq!(binding.kind, BindingKind::Param);
    }

    #[test]
    fn test_guard_globals_must_not_be_rebound() {
        let result =
            bind_source("function f(this a) { let TypeError = 1; let globalThis = 2; return a; }");
        assert_eq!(
            error_codes(&result),
            vec![
                DiagnosticCode::ShadowedGuardName,
                DiagnosticCode::ShadowedGuardName
            ]
        );
    }

    #[test]
    fn test_outer_rebinding_of_guard_global() {
        let result = bind_source("class TypeError {} function f(this a) { return a; }");
        assert_eq!(error_codes(&result), vec![DiagnosticCode::ShadowedGuardName]);
    }

    #[test]
    fn test_strict_guard_ignores_global_object() {
        let result = bind_source(
            "function f(this a) { 'use strict'; const globalThis = {}; return [a, globalThis]; }",
        );
        assert!(error_codes(&result).is_empty());
    }

    #[test]
    fn test_guard_globals_free_without_receiver() {
        let result = bind_source("function g() { let TypeError = 1; return TypeError; }");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_no_receivers_no_diagnostics() {
        let result = bind_source("var self = this; function g() { return this; } (() => this)();");
        assert!(result.diagnostics.is_empty());
    }
}
