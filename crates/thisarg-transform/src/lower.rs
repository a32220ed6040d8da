//! Receiver lowering pass.
//!
//! Every function that declares an explicit receiver loses the declaration
//! and gains, after its directive prologue:
//! 1. a construction guard (ordinary functions only),
//! 2. a missing-receiver guard,
//! 3. `const <name or pattern> = this;` for named and destructured receivers.
//!
//! Generators and async functions would only run these statements on the
//! first `next()` or inside the returned promise. Their body moves into an
//! inner generator or async arrow, so the outer function checks its receiver
//! at the call itself. Generator methods that use `super` cannot move their
//! body out and keep the guards inline.
//!
//! Functions are lowered independently, so nested receivers each get their
//! own guard. Functions without a receiver are left untouched.

use crate::guard::{construct_guard, delegate_body, receiver_binding, receiver_guard};
use thisarg_diagnostics::Span;
use thisarg_parser::ast::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LowerOptions {
    /// In sloppy-mode functions, treat a `globalThis` receiver as missing.
    /// A bare call in sloppy code receives the global object instead of
    /// `undefined`.
    pub guard_global_receiver: bool,
}

impl Default for LowerOptions {
    fn default() -> Self {
        Self {
            guard_global_receiver: true,
        }
    }
}

/// Counts reported by a lowering run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LowerStats {
    /// Functions whose receiver was lowered
    pub functions: usize,
    /// Of those, functions that got a binding statement
    pub bindings: usize,
    /// Generators and async functions whose body moved into a delegate
    pub delegated: usize,
}

/// Lower every explicit receiver in `program` in place.
///
/// The program must be free of static errors; receivers the parser already
/// rejected (constructors, arrows) never reach this pass.
pub fn lower_receivers(program: &mut Program, options: &LowerOptions) -> LowerStats {
    let mut lowerer = Lowerer {
        options: *options,
        stats: LowerStats::default(),
        saw_super: false,
    };
    lowerer.lower_stmts(&mut program.body);
    log::debug!(
        "lowered {} receivers ({} bindings)",
        lowerer.stats.functions,
        lowerer.stats.bindings
    );
    lowerer.stats
}

/// Lower a copy of `program`, leaving the input untouched.
pub fn lower(program: &Program, options: &LowerOptions) -> (Program, LowerStats) {
    let mut lowered = program.clone();
    let stats = lower_receivers(&mut lowered, options);
    (lowered, stats)
}

/// The body as a block, wrapping a concise body in `return`.
fn block_body(body: &mut FunctionBody) -> &mut Block {
    if let FunctionBody::Expr(expr) = body {
        let span = expr.span();
        let arg = std::mem::replace(&mut **expr, Expr::This(Span::DUMMY));
        *body = FunctionBody::Block(Block {
            stmts: vec![Stmt::Return {
                arg: Some(arg),
                span,
            }],
            span,
        });
    }
    match body {
        FunctionBody::Block(block) => block,
        FunctionBody::Expr(_) => unreachable!("concise body converted above"),
    }
}

struct Lowerer {
    options: LowerOptions,
    stats: LowerStats,
    /// `super` seen since entering the innermost non-arrow function
    saw_super: bool,
}

impl Lowerer {
    fn lower_function(&mut self, f: &mut Function, name_hint: Option<&str>) {
        let outer_super = std::mem::replace(&mut self.saw_super, false);
        for param in &mut f.params {
            self.lower_pat(&mut param.pat);
            if let Some(default) = &mut param.default {
                self.lower_expr(default);
            }
        }
        match &mut f.body {
            FunctionBody::Block(block) => self.lower_stmts(&mut block.stmts),
            FunctionBody::Expr(expr) => self.lower_expr(expr),
        }
        let uses_super = self.saw_super;
        // arrows share `super` with the function around them
        self.saw_super = outer_super || (f.kind == FunctionKind::Arrow && uses_super);

        let Some(receiver) = f.receiver.take() else {
            return;
        };

        let display = f
            .name
            .as_ref()
            .map(|n| n.name.as_str())
            .or(name_hint)
            .unwrap_or("anonymous function")
            .to_string();
        log::trace!("lowering receiver of `{}`", display);

        let delegate = (f.is_async || f.is_generator) && !(f.is_generator && uses_super);
        let mut prologue = Vec::new();
        if f.kind == FunctionKind::Ordinary && (delegate || (!f.is_async && !f.is_generator)) {
            prologue.push(construct_guard(&display));
        }
        let sloppy_global = self.options.guard_global_receiver && !f.strict;
        prologue.push(receiver_guard(&display, sloppy_global));

        match receiver.binding {
            ReceiverBinding::Unnamed => {}
            ReceiverBinding::Named(ident) => {
                prologue.push(receiver_binding(Pat::Ident(ident)));
                self.stats.bindings += 1;
            }
            ReceiverBinding::Destructured(pat) => {
                prologue.push(receiver_binding(pat));
                self.stats.bindings += 1;
            }
        }

        if !receiver.decorators.is_empty() || receiver.type_ann.is_some() {
            f.this_annotation = Some(ThisAnnotation {
                decorators: receiver.decorators,
                type_ann: receiver.type_ann,
                span: receiver.span,
            });
        }

        let block = block_body(&mut f.body);
        let prologue_end = block
            .stmts
            .iter()
            .take_while(|s| s.directive().is_some())
            .count();
        if delegate {
            let body = block.stmts.split_off(prologue_end);
            prologue.push(Stmt::Return {
                arg: Some(delegate_body(body, f.is_async, f.is_generator, f.strict)),
                span: Span::DUMMY,
            });
            f.is_async = false;
            f.is_generator = false;
            self.stats.delegated += 1;
        }
        block.stmts.splice(prologue_end..prologue_end, prologue);
        self.stats.functions += 1;
    }

    fn lower_stmts(&mut self, stmts: &mut [Stmt]) {
        for stmt in stmts {
            self.lower_stmt(stmt);
        }
    }

    fn lower_var_decl(&mut self, decl: &mut VarDecl) {
        for d in &mut decl.decls {
            self.lower_pat(&mut d.target);
            if let Some(init) = &mut d.init {
                let hint = match &d.target {
                    Pat::Ident(id) => Some(id.name.clone()),
                    _ => None,
                };
                self.lower_expr_named(init, hint.as_deref());
            }
        }
    }

    fn lower_stmt(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::Expr { expr, .. } => self.lower_expr(expr),
            Stmt::Var(decl) => self.lower_var_decl(decl),
            Stmt::Function(f) => self.lower_function(f, None),
            Stmt::Class(c) => self.lower_class(c),
            Stmt::Return { arg, .. } => {
                if let Some(arg) = arg {
                    self.lower_expr(arg);
                }
            }
            Stmt::Throw { arg, .. } => self.lower_expr(arg),
            Stmt::If {
                test, cons, alt, ..
            } => {
                self.lower_expr(test);
                self.lower_stmt(cons);
                if let Some(alt) = alt {
                    self.lower_stmt(alt);
                }
            }
            Stmt::Block(block) => self.lower_stmts(&mut block.stmts),
            Stmt::For {
                init,
                test,
                update,
                body,
                ..
            } => {
                match init {
                    Some(ForInit::Var(decl)) => self.lower_var_decl(decl),
                    Some(ForInit::Expr(expr)) => self.lower_expr(expr),
                    None => {}
                }
                if let Some(test) = test {
                    self.lower_expr(test);
                }
                if let Some(update) = update {
                    self.lower_expr(update);
                }
                self.lower_stmt(body);
            }
            Stmt::ForIn {
                left, right, body, ..
            }
            | Stmt::ForOf {
                left, right, body, ..
            } => {
                match left {
                    ForHead::Var(decl) => self.lower_var_decl(decl),
                    ForHead::Pat(pat) => self.lower_pat(pat),
                }
                self.lower_expr(right);
                self.lower_stmt(body);
            }
            Stmt::While { test, body, .. } | Stmt::DoWhile { body, test, .. } => {
                self.lower_expr(test);
                self.lower_stmt(body);
            }
            Stmt::Try {
                block,
                handler,
                finalizer,
                ..
            } => {
                self.lower_stmts(&mut block.stmts);
                if let Some(handler) = handler {
                    if let Some(param) = &mut handler.param {
                        self.lower_pat(param);
                    }
                    self.lower_stmts(&mut handler.body.stmts);
                }
                if let Some(finalizer) = finalizer {
                    self.lower_stmts(&mut finalizer.stmts);
                }
            }
            Stmt::Switch {
                discriminant,
                cases,
                ..
            } => {
                self.lower_expr(discriminant);
                for case in cases {
                    if let Some(test) = &mut case.test {
                        self.lower_expr(test);
                    }
                    self.lower_stmts(&mut case.body);
                }
            }
            Stmt::Labeled { body, .. } => self.lower_stmt(body),
            Stmt::Export(export) => match export {
                ExportDecl::Decl { decl, .. } => self.lower_stmt(decl),
                ExportDecl::DefaultDecl { decl, .. } => match &mut **decl {
                    Stmt::Function(f) if f.name.is_none() => self.lower_function(f, Some("default")),
                    other => self.lower_stmt(other),
                },
                ExportDecl::DefaultExpr { expr, .. } => self.lower_expr_named(expr, Some("default")),
                ExportDecl::Named { .. } | ExportDecl::All { .. } => {}
            },
            Stmt::Break { .. }
            | Stmt::Continue { .. }
            | Stmt::Empty(_)
            | Stmt::Debugger(_)
            | Stmt::Import(_) => {}
        }
    }

    fn lower_class(&mut self, class: &mut Class) {
        for decorator in &mut class.decorators {
            self.lower_expr(&mut decorator.expr);
        }
        if let Some(super_class) = &mut class.super_class {
            self.lower_expr(super_class);
        }
        for member in &mut class.body {
            match member {
                ClassMember::Method {
                    decorators,
                    key,
                    function,
                    ..
                } => {
                    for decorator in decorators {
                        self.lower_expr(&mut decorator.expr);
                    }
                    self.lower_prop_key(key);
                    let hint = key.static_name().map(str::to_string);
                    self.lower_function(function, hint.as_deref());
                }
                ClassMember::Field {
                    decorators,
                    key,
                    value,
                    ..
                } => {
                    for decorator in decorators {
                        self.lower_expr(&mut decorator.expr);
                    }
                    self.lower_prop_key(key);
                    if let Some(value) = value {
                        self.lower_expr(value);
                    }
                }
                ClassMember::StaticBlock { body, .. } => self.lower_stmts(&mut body.stmts),
            }
        }
    }

    fn lower_prop_key(&mut self, key: &mut PropKey) {
        if let PropKey::Computed(expr) = key {
            self.lower_expr(expr);
        }
    }

    fn lower_pat(&mut self, pat: &mut Pat) {
        match pat {
            Pat::Ident(_) => {}
            Pat::Array { elems, .. } => {
                for elem in elems.iter_mut().flatten() {
                    self.lower_pat(elem);
                }
            }
            Pat::Object { props, .. } => {
                for prop in props {
                    match prop {
                        ObjectPatProp::KeyValue { key, value, .. } => {
                            self.lower_prop_key(key);
                            self.lower_pat(value);
                        }
                        ObjectPatProp::Shorthand { default, .. } => {
                            if let Some(default) = default {
                                self.lower_expr(default);
                            }
                        }
                        ObjectPatProp::Rest { arg, .. } => self.lower_pat(arg),
                    }
                }
            }
            Pat::Assign { left, right, .. } => {
                self.lower_pat(left);
                self.lower_expr(right);
            }
            Pat::Rest { arg, .. } => self.lower_pat(arg),
            Pat::Expr(expr) => self.lower_expr(expr),
        }
    }

    fn lower_expr(&mut self, expr: &mut Expr) {
        self.lower_expr_named(expr, None);
    }

    /// `name_hint` names anonymous functions in guard messages, e.g. the
    /// variable a function expression is assigned to.
    fn lower_expr_named(&mut self, expr: &mut Expr, name_hint: Option<&str>) {
        match expr {
            Expr::Function(f) => self.lower_function(f, name_hint),
            Expr::Arrow(f) => self.lower_function(f, name_hint),
            Expr::Class(c) => self.lower_class(c),
            Expr::Paren { expr, .. } => self.lower_expr_named(expr, name_hint),
            Expr::Super(_) => self.saw_super = true,
            Expr::Ident(_)
            | Expr::This(_)
            | Expr::Lit(_)
            | Expr::MetaProp { .. } => {}
            Expr::Template(tpl) => {
                for e in &mut tpl.exprs {
                    self.lower_expr(e);
                }
            }
            Expr::TaggedTemplate { tag, tpl, .. } => {
                self.lower_expr(tag);
                for e in &mut tpl.exprs {
                    self.lower_expr(e);
                }
            }
            Expr::Array { elems, .. } => {
                for elem in elems.iter_mut().flatten() {
                    self.lower_expr(&mut elem.expr);
                }
            }
            Expr::Object { props, .. } => {
                for prop in props {
                    match prop {
                        Prop::KeyValue { key, value, .. } => {
                            self.lower_prop_key(key);
                            let hint = key.static_name().map(str::to_string);
                            self.lower_expr_named(value, hint.as_deref());
                        }
                        Prop::Shorthand { default, .. } => {
                            if let Some(default) = default {
                                self.lower_expr(default);
                            }
                        }
                        Prop::Method { key, function, .. } => {
                            self.lower_prop_key(key);
                            let hint = key.static_name().map(str::to_string);
                            self.lower_function(function, hint.as_deref());
                        }
                        Prop::Spread { expr, .. } => self.lower_expr(expr),
                    }
                }
            }
            Expr::Unary { arg, .. } | Expr::Update { arg, .. } | Expr::Await { arg, .. } => {
                self.lower_expr(arg)
            }
            Expr::Binary { left, right, .. } => {
                self.lower_expr(left);
                self.lower_expr(right);
            }
            Expr::Assign { target, value, .. } => {
                let hint = match &mut **target {
                    AssignTarget::Simple(Expr::Ident(id)) => Some(id.name.clone()),
                    AssignTarget::Simple(expr) => {
                        self.lower_expr(expr);
                        None
                    }
                    AssignTarget::Pat(pat) => {
                        self.lower_pat(pat);
                        None
                    }
                };
                self.lower_expr_named(value, hint.as_deref());
            }
            Expr::Cond {
                test, cons, alt, ..
            } => {
                self.lower_expr(test);
                self.lower_expr(cons);
                self.lower_expr(alt);
            }
            Expr::Call { callee, args, .. } => {
                self.lower_expr(callee);
                for arg in args {
                    self.lower_expr(&mut arg.expr);
                }
            }
            Expr::New { callee, args, .. } => {
                self.lower_expr(callee);
                for arg in args.iter_mut().flatten() {
                    self.lower_expr(&mut arg.expr);
                }
            }
            Expr::Member { object, prop, .. } => {
                self.lower_expr(object);
                if let MemberProp::Computed(expr) = prop {
                    self.lower_expr(expr);
                }
            }
            Expr::Seq { exprs, .. } => {
                for e in exprs {
                    self.lower_expr(e);
                }
            }
            Expr::Yield { arg, .. } => {
                if let Some(arg) = arg {
                    self.lower_expr(arg);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thisarg_parser::{parse_program, Syntax};

    fn parse(source: &str) -> Program {
        let result = parse_program(source, Syntax::default());
        assert!(!result.has_errors(), "unexpected parse errors in {source}");
        result.program
    }

    fn function(program: &Program, index: usize) -> &Function {
        match &program.body[index] {
            Stmt::Function(f) => f,
            other => panic!("expected a function, found {:?}", other),
        }
    }

    #[test]
    fn test_named_receiver_gets_guards_and_binding() {
        let mut program = parse("function fullName(this user) { return user.first }");
        let stats = lower_receivers(&mut program, &LowerOptions::default());
        assert_eq!(
            stats,
            LowerStats {
                functions: 1,
                bindings: 1,
                delegated: 0,
            }
        );

        let f = function(&program, 0);
        assert!(f.receiver.is_none());
        let stmts = f.body_stmts();
        assert_eq!(stmts.len(), 4);
        assert!(matches!(&stmts[0], Stmt::If { .. }));
        assert!(matches!(&stmts[1], Stmt::If { .. }));
        let Stmt::Var(decl) = &stmts[2] else {
            panic!("expected the receiver binding");
        };
        assert_eq!(decl.kind, VarKind::Const);
        assert!(matches!(&decl.decls[0].target, Pat::Ident(id) if id.name == "user"));
        assert!(matches!(decl.decls[0].init, Some(Expr::This(_))));
        assert!(matches!(&stmts[3], Stmt::Return { .. }));
    }

    #[test]
    fn test_unnamed_receiver_gets_guard_only() {
        let mut program = parse("function f(this) { console.log(this) }");
        let stats = lower_receivers(&mut program, &LowerOptions::default());
        assert_eq!(stats.bindings, 0);
        let stmts = function(&program, 0).body_stmts();
        assert_eq!(stmts.len(), 3);
        assert!(stmts[..2].iter().all(|s| matches!(s, Stmt::If { .. })));
    }

    #[test]
    fn test_destructured_receiver_binds_pattern() {
        let mut program = parse("function area(this { width, height }) { return width * height; }");
        lower_receivers(&mut program, &LowerOptions::default());
        let Stmt::Var(decl) = &function(&program, 0).body_stmts()[2] else {
            panic!("expected the receiver binding");
        };
        let names: Vec<_> = decl.decls[0]
            .target
            .bound_names()
            .into_iter()
            .map(|id| id.name.as_str())
            .collect();
        assert_eq!(names, vec!["width", "height"]);
    }

    #[test]
    fn test_no_receivers_is_a_no_op() {
        let source = "function g(a) { return this.x + a; } const h = () => this; class K { m() { return this; } }";
        let program = parse(source);
        let (lowered, stats) = lower(&program, &LowerOptions::default());
        assert_eq!(stats, LowerStats::default());
        assert_eq!(lowered, program);
    }

    #[test]
    fn test_lowering_twice_changes_nothing() {
        let program = parse("function f(this a) { return function g(this b) { return a + b; }; }");
        let (once, stats) = lower(&program, &LowerOptions::default());
        assert_eq!(stats.functions, 2);
        let (twice, stats) = lower(&once, &LowerOptions::default());
        assert_eq!(stats.functions, 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_nested_functions_lowered_independently() {
        let mut program = parse("function outer(this o) { function inner(this i) { return i; } return o; }");
        lower_receivers(&mut program, &LowerOptions::default());
        let outer = function(&program, 0);
        let Stmt::Function(inner) = &outer.body_stmts()[3] else {
            panic!("inner function stays after the prologue");
        };
        assert!(inner.receiver.is_none());
        assert_eq!(inner.body_stmts().len(), 4);
    }

    #[test]
    fn test_directives_stay_first() {
        let mut program = parse("function f(this a) { 'use strict'; return a; }");
        lower_receivers(&mut program, &LowerOptions::default());
        let stmts = function(&program, 0).body_stmts();
        assert_eq!(stmts[0].directive(), Some("use strict"));
        assert!(matches!(&stmts[1], Stmt::If { .. }));
    }

    #[test]
    fn test_methods_skip_construct_guard() {
        let mut program = parse("const o = { get size(this s) { return s.n; } };");
        lower_receivers(&mut program, &LowerOptions::default());
        let Stmt::Var(decl) = &program.body[0] else {
            panic!("expected a declaration");
        };
        let Some(Expr::Object { props, .. }) = &decl.decls[0].init else {
            panic!("expected an object literal");
        };
        let Prop::Method { function, .. } = &props[0] else {
            panic!("expected a getter");
        };
        // receiver guard, binding, return
        assert_eq!(function.body_stmts().len(), 3);
    }

    #[test]
    fn test_strict_functions_do_not_check_global() {
        let mut program = parse("'use strict'; function f(this a) { return a; }");
        lower_receivers(&mut program, &LowerOptions::default());
        let Stmt::If { test, .. } = &function(&program, 1).body_stmts()[1] else {
            panic!("expected the receiver guard");
        };
        assert!(matches!(test, Expr::Binary { op: BinaryOp::EqEq, .. }));
    }

    #[test]
    fn test_generator_body_moves_into_delegate() {
        let mut program = parse("function* ids(this seq) { yield seq.next(); }");
        let stats = lower_receivers(&mut program, &LowerOptions::default());
        assert_eq!(stats.delegated, 1);

        let f = function(&program, 0);
        assert!(!f.is_generator);
        let stmts = f.body_stmts();
        // construct guard, receiver guard, binding, return of the delegate
        assert_eq!(stmts.len(), 4);
        let Stmt::Return {
            arg: Some(Expr::Call { callee, .. }),
            ..
        } = &stmts[3]
        else {
            panic!("expected the delegating return");
        };
        let Expr::Member { object, .. } = &**callee else {
            panic!("expected `.apply`");
        };
        let Expr::Function(inner) = &**object else {
            panic!("expected the inner generator");
        };
        assert!(inner.is_generator);
        assert!(matches!(&inner.body_stmts()[0], Stmt::Expr { .. }));
    }

    #[test]
    fn test_async_method_delegates_to_arrow() {
        let mut program = parse("class A { async load(this a) { return await super.load(a); } }");
        lower_receivers(&mut program, &LowerOptions::default());
        let Stmt::Class(class) = &program.body[0] else {
            panic!("expected a class");
        };
        let ClassMember::Method { function, .. } = &class.body[0] else {
            panic!("expected a method");
        };
        assert!(!function.is_async);
        let stmts = function.body_stmts();
        // receiver guard, binding, return of the delegate
        assert_eq!(stmts.len(), 3);
        assert!(matches!(
            &stmts[2],
            Stmt::Return { arg: Some(Expr::Call { callee, .. }), .. }
                if matches!(&**callee, Expr::Arrow(f) if f.is_async)
        ));
    }

    #[test]
    fn test_generator_method_using_super_keeps_inline_guard() {
        let mut program =
            parse("class A extends B { *items(this a) { yield* super.items(); return a; } }");
        let stats = lower_receivers(&mut program, &LowerOptions::default());
        assert_eq!(stats.delegated, 0);
        let Stmt::Class(class) = &program.body[0] else {
            panic!("expected a class");
        };
        let ClassMember::Method { function, .. } = &class.body[0] else {
            panic!("expected a method");
        };
        assert!(function.is_generator);
        assert_eq!(function.body_stmts().len(), 4);
    }

    #[test]
    fn test_receiver_type_moves_to_annotation() {
        let syntax = Syntax {
            typescript: true,
            ..Syntax::default()
        };
        let mut program = parse_program("function f(this u: User) { return u; }", syntax).program;
        lower_receivers(&mut program, &LowerOptions::default());
        let annotation = function(&program, 0).this_annotation.as_ref().unwrap();
        assert_eq!(annotation.type_ann.as_ref().map(|t| t.text.as_str()), Some("User"));
    }
}
