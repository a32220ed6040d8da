//! JavaScript printer.
//!
//! Prints an AST back to source text. Parentheses are taken from the tree
//! (`Expr::Paren`) and added wherever operator precedence or statement-start
//! ambiguity requires them, so synthesized nodes print correctly too.

use thisarg_parser::ast::*;

/// Formatting switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitOptions {
    /// Spaces per indentation level
    pub indent: usize,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

/// Print a whole program.
pub fn print_program(program: &Program, options: &EmitOptions) -> String {
    let mut printer = Printer::new(*options);
    for stmt in &program.body {
        printer.stmt(stmt);
    }
    printer.out
}

/// Print a single expression, e.g. for messages and tests.
pub fn print_expr(expr: &Expr) -> String {
    let mut printer = Printer::new(EmitOptions::default());
    printer.expr(expr, prec::SEQ);
    printer.out
}

// ─────────────────────────────────────────────────────────────────────────────
// Precedence levels
// ─────────────────────────────────────────────────────────────────────────────

mod prec {
    pub const SEQ: u8 = 0;
    /// Assignment, arrow functions, `yield`
    pub const ASSIGN: u8 = 1;
    pub const COND: u8 = 2;
    /// Binary operators occupy `BINARY + op.precedence()`
    pub const BINARY: u8 = 2;
    pub const UNARY: u8 = 16;
    pub const UPDATE: u8 = 17;
    /// `new X` without arguments
    pub const NEW: u8 = 18;
    /// Member access, calls, `new X()`
    pub const CALL: u8 = 19;
    pub const PRIMARY: u8 = 20;
}

fn expr_prec(expr: &Expr) -> u8 {
    match expr {
        Expr::Seq { .. } => prec::SEQ,
        Expr::Assign { .. } | Expr::Arrow(_) | Expr::Yield { .. } => prec::ASSIGN,
        Expr::Cond { .. } => prec::COND,
        Expr::Binary { op, .. } => prec::BINARY + op.precedence(),
        Expr::Unary { .. } | Expr::Await { .. } => prec::UNARY,
        Expr::Update { .. } => prec::UPDATE,
        Expr::New { args: None, .. } => prec::NEW,
        Expr::New { .. } | Expr::Call { .. } | Expr::Member { .. } | Expr::TaggedTemplate { .. } => {
            prec::CALL
        }
        Expr::MetaProp { .. } => prec::CALL,
        _ => prec::PRIMARY,
    }
}

fn is_logical(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Binary {
            op: BinaryOp::LogicalOr | BinaryOp::LogicalAnd,
            ..
        }
    )
}

/// Leftmost sub-expression, the one whose first token starts the output.
fn leftmost(expr: &Expr) -> &Expr {
    match expr {
        Expr::Binary { left, .. } => leftmost(left),
        Expr::Call { callee, .. } => leftmost(callee),
        Expr::Member { object, .. } => leftmost(object),
        Expr::TaggedTemplate { tag, .. } => leftmost(tag),
        Expr::Cond { test, .. } => leftmost(test),
        Expr::Seq { exprs, .. } => exprs.first().map_or(expr, leftmost),
        Expr::Update {
            prefix: false, arg, ..
        } => leftmost(arg),
        Expr::Assign { target, .. } => match &**target {
            AssignTarget::Simple(target) => leftmost(target),
            AssignTarget::Pat(_) => expr,
        },
        _ => expr,
    }
}

/// An expression statement may not start with `{`, `function`, `class` or
/// `let [`.
fn needs_statement_parens(expr: &Expr) -> bool {
    match leftmost(expr) {
        Expr::Object { .. } | Expr::Function(_) | Expr::Class(_) => true,
        Expr::Assign { target, .. } => matches!(&**target, AssignTarget::Pat(Pat::Object { .. })),
        Expr::Member { object, .. } => {
            matches!(&**object, Expr::Ident(id) if id.name == "let")
        }
        _ => false,
    }
}

fn contains_call(expr: &Expr) -> bool {
    match expr {
        Expr::Call { .. } => true,
        Expr::Member { object, .. } => contains_call(object),
        Expr::TaggedTemplate { tag, .. } => contains_call(tag),
        _ => false,
    }
}

struct Printer {
    out: String,
    level: usize,
    options: EmitOptions,
}

impl Printer {
    fn new(options: EmitOptions) -> Self {
        Self {
            out: String::new(),
            level: 0,
            options,
        }
    }

    fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        self.out.push('\n');
    }

    fn indent(&mut self) {
        for _ in 0..self.level * self.options.indent {
            self.out.push(' ');
        }
    }

    fn comma_list<T>(&mut self, items: &[T], mut each: impl FnMut(&mut Self, &T)) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            each(self, item);
        }
    }

    // ── statements ──────────────────────────────────────────────────────────

    fn stmt(&mut self, stmt: &Stmt) {
        self.indent();
        self.stmt_inline(stmt);
        self.newline();
    }

    /// Print a statement at the current position, without indentation or a
    /// trailing newline.
    fn stmt_inline(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr { expr, .. } => {
                if needs_statement_parens(expr) {
                    self.write("(");
                    self.expr(expr, prec::SEQ);
                    self.write(")");
                } else {
                    self.expr(expr, prec::SEQ);
                }
                self.write(";");
            }
            Stmt::Var(decl) => {
                self.var_decl(decl);
                self.write(";");
            }
            Stmt::Function(f) => self.function(f, None),
            Stmt::Class(c) => self.class(c),
            Stmt::Return { arg, .. } => {
                self.write("return");
                if let Some(arg) = arg {
                    self.write(" ");
                    self.expr(arg, prec::SEQ);
                }
                self.write(";");
            }
            Stmt::Throw { arg, .. } => {
                self.write("throw ");
                self.expr(arg, prec::SEQ);
                self.write(";");
            }
            Stmt::If {
                test, cons, alt, ..
            } => {
                self.write("if (");
                self.expr(test, prec::SEQ);
                self.write(")");
                // an `if` without `else` would capture our `else`
                let wrap = alt.is_some() && matches!(&**cons, Stmt::If { alt: None, .. });
                if wrap {
                    self.write(" {");
                    self.newline();
                    self.level += 1;
                    self.stmt(cons);
                    self.level -= 1;
                    self.indent();
                    self.write("}");
                } else {
                    self.body(cons);
                }
                if let Some(alt) = alt {
                    if matches!(&**cons, Stmt::Block(_)) || wrap {
                        self.write(" ");
                    } else {
                        self.newline();
                        self.indent();
                    }
                    self.write("else");
                    self.body(alt);
                }
            }
            Stmt::Block(block) => self.block(block),
            Stmt::For {
                init,
                test,
                update,
                body,
                ..
            } => {
                self.write("for (");
                match init {
                    Some(ForInit::Var(decl)) => self.var_decl(decl),
                    Some(ForInit::Expr(expr)) => self.expr(expr, prec::SEQ),
                    None => {}
                }
                self.write(";");
                if let Some(test) = test {
                    self.write(" ");
                    self.expr(test, prec::SEQ);
                }
                self.write(";");
                if let Some(update) = update {
                    self.write(" ");
                    self.expr(update, prec::SEQ);
                }
                self.write(")");
                self.body(body);
            }
            Stmt::ForIn {
                left, right, body, ..
            } => {
                self.write("for (");
                self.for_head(left);
                self.write(" in ");
                self.expr(right, prec::SEQ);
                self.write(")");
                self.body(body);
            }
            Stmt::ForOf {
                left,
                right,
                body,
                is_await,
                ..
            } => {
                self.write(if *is_await { "for await (" } else { "for (" });
                self.for_head(left);
                self.write(" of ");
                self.expr(right, prec::ASSIGN);
                self.write(")");
                self.body(body);
            }
            Stmt::While { test, body, .. } => {
                self.write("while (");
                self.expr(test, prec::SEQ);
                self.write(")");
                self.body(body);
            }
            Stmt::DoWhile { body, test, .. } => {
                self.write("do");
                self.body(body);
                if matches!(&**body, Stmt::Block(_)) {
                    self.write(" ");
                } else {
                    self.newline();
                    self.indent();
                }
                self.write("while (");
                self.expr(test, prec::SEQ);
                self.write(");");
            }
            Stmt::Break { label, .. } => {
                self.write("break");
                if let Some(label) = label {
                    self.write(" ");
                    self.write(&label.name);
                }
                self.write(";");
            }
            Stmt::Continue { label, .. } => {
                self.write("continue");
                if let Some(label) = label {
                    self.write(" ");
                    self.write(&label.name);
                }
                self.write(";");
            }
            Stmt::Try {
                block,
                handler,
                finalizer,
                ..
            } => {
                self.write("try ");
                self.block(block);
                if let Some(handler) = handler {
                    self.write(" catch ");
                    if let Some(param) = &handler.param {
                        self.write("(");
                        self.pat(param);
                        self.write(") ");
                    }
                    self.block(&handler.body);
                }
                if let Some(finalizer) = finalizer {
                    self.write(" finally ");
                    self.block(finalizer);
                }
            }
            Stmt::Switch {
                discriminant,
                cases,
                ..
            } => {
                self.write("switch (");
                self.expr(discriminant, prec::SEQ);
                self.write(") {");
                self.newline();
                self.level += 1;
                for case in cases {
                    self.indent();
                    match &case.test {
                        Some(test) => {
                            self.write("case ");
                            self.expr(test, prec::SEQ);
                            self.write(":");
                        }
                        None => self.write("default:"),
                    }
                    self.newline();
                    self.level += 1;
                    for stmt in &case.body {
                        self.stmt(stmt);
                    }
                    self.level -= 1;
                }
                self.level -= 1;
                self.indent();
                self.write("}");
            }
            Stmt::Labeled { label, body, .. } => {
                self.write(&label.name);
                self.write(": ");
                self.stmt_inline(body);
            }
            Stmt::Empty(_) => self.write(";"),
            Stmt::Debugger(_) => self.write("debugger;"),
            Stmt::Import(import) => self.import(import),
            Stmt::Export(export) => self.export(export),
        }
    }

    /// Body of a control statement: blocks stay on the line, anything else
    /// goes on the same line after a space.
    fn body(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Empty(_) => self.write(";"),
            _ => {
                self.write(" ");
                self.stmt_inline(stmt);
            }
        }
    }

    fn block(&mut self, block: &Block) {
        self.block_stmts(&block.stmts);
    }

    fn block_stmts(&mut self, stmts: &[Stmt]) {
        if stmts.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.newline();
        self.level += 1;
        for stmt in stmts {
            self.stmt(stmt);
        }
        self.level -= 1;
        self.indent();
        self.write("}");
    }

    fn var_decl(&mut self, decl: &VarDecl) {
        self.write(decl.kind.as_str());
        self.write(" ");
        self.comma_list(&decl.decls, |p, d| {
            p.pat(&d.target);
            p.type_ann(d.type_ann.as_ref());
            if let Some(init) = &d.init {
                p.write(" = ");
                p.expr(init, prec::ASSIGN);
            }
        });
    }

    fn for_head(&mut self, head: &ForHead) {
        match head {
            ForHead::Var(decl) => self.var_decl(decl),
            ForHead::Pat(pat) => self.pat(pat),
        }
    }

    fn import(&mut self, import: &ImportDecl) {
        self.write("import ");
        let mut named = Vec::new();
        let mut leading = Vec::new();
        for spec in &import.specifiers {
            match spec {
                ImportSpecifier::Default(local) => leading.push(local.name.clone()),
                ImportSpecifier::Namespace(local) => leading.push(format!("* as {}", local.name)),
                ImportSpecifier::Named { imported, local } => named.push(match imported {
                    Some(imported) => format!("{} as {}", imported.name, local.name),
                    None => local.name.clone(),
                }),
            }
        }
        if !named.is_empty() {
            leading.push(format!("{{ {} }}", named.join(", ")));
        }
        if !leading.is_empty() {
            self.write(&leading.join(", "));
            self.write(" from ");
        }
        self.write(&import.source.raw);
        self.write(";");
    }

    fn export(&mut self, export: &ExportDecl) {
        match export {
            ExportDecl::Decl { decl, .. } => {
                self.write("export ");
                self.stmt_inline(decl);
            }
            ExportDecl::DefaultDecl { decl, .. } => {
                self.write("export default ");
                self.stmt_inline(decl);
            }
            ExportDecl::DefaultExpr { expr, .. } => {
                self.write("export default ");
                if needs_statement_parens(expr) {
                    self.write("(");
                    self.expr(expr, prec::ASSIGN);
                    self.write(")");
                } else {
                    self.expr(expr, prec::ASSIGN);
                }
                self.write(";");
            }
            ExportDecl::Named {
                specifiers, source, ..
            } => {
                self.write("export { ");
                self.comma_list(specifiers, |p, spec| {
                    p.write(&spec.local.name);
                    if let Some(exported) = &spec.exported {
                        p.write(" as ");
                        p.write(&exported.name);
                    }
                });
                self.write(if specifiers.is_empty() { "}" } else { " }" });
                if let Some(source) = source {
                    self.write(" from ");
                    self.write(&source.raw);
                }
                self.write(";");
            }
            ExportDecl::All {
                exported, source, ..
            } => {
                self.write("export *");
                if let Some(exported) = exported {
                    self.write(" as ");
                    self.write(&exported.name);
                }
                self.write(" from ");
                self.write(&source.raw);
                self.write(";");
            }
        }
    }

    // ── functions and classes ───────────────────────────────────────────────

    fn decorators(&mut self, decorators: &[Decorator], separator: &str) {
        for decorator in decorators {
            self.write("@");
            self.expr(&decorator.expr, prec::CALL);
            self.write(separator);
        }
    }

    fn type_ann(&mut self, ann: Option<&TypeAnn>) {
        if let Some(ann) = ann {
            self.write(": ");
            self.write(&ann.text);
        }
    }

    /// `key` is set for methods, accessors and object-literal methods.
    fn function(&mut self, f: &Function, key: Option<&PropKey>) {
        match key {
            Some(key) => {
                if f.is_async {
                    self.write("async ");
                }
                match f.kind {
                    FunctionKind::Getter => self.write("get "),
                    FunctionKind::Setter => self.write("set "),
                    _ => {}
                }
                if f.is_generator {
                    self.write("*");
                }
                self.prop_key(key);
            }
            None => {
                if f.is_async {
                    self.write("async ");
                }
                self.write("function");
                if f.is_generator {
                    self.write("*");
                }
                if let Some(name) = &f.name {
                    self.write(" ");
                    self.write(&name.name);
                }
            }
        }
        self.params(f);
        self.type_ann(f.return_type.as_ref());
        self.write(" ");
        self.function_body(&f.body);
    }

    fn params(&mut self, f: &Function) {
        self.write("(");
        let mut first = true;
        if let Some(annotation) = &f.this_annotation {
            self.decorators(&annotation.decorators, " ");
            self.write("this");
            self.type_ann(annotation.type_ann.as_ref());
            first = false;
        }
        for param in &f.params {
            if !first {
                self.write(", ");
            }
            first = false;
            self.decorators(&param.decorators, " ");
            if param.rest {
                self.write("...");
            }
            self.pat(&param.pat);
            self.type_ann(param.type_ann.as_ref());
            if let Some(default) = &param.default {
                self.write(" = ");
                self.expr(default, prec::ASSIGN);
            }
        }
        self.write(")");
    }

    fn function_body(&mut self, body: &FunctionBody) {
        match body {
            FunctionBody::Block(block) => self.block(block),
            FunctionBody::Expr(expr) => {
                if matches!(leftmost(expr), Expr::Object { .. }) {
                    self.write("(");
                    self.expr(expr, prec::ASSIGN);
                    self.write(")");
                } else {
                    self.expr(expr, prec::ASSIGN);
                }
            }
        }
    }

    fn arrow(&mut self, f: &Function) {
        if f.is_async {
            self.write("async ");
        }
        self.params(f);
        self.write(" => ");
        self.function_body(&f.body);
    }

    fn class(&mut self, class: &Class) {
        self.decorators(&class.decorators, " ");
        self.write("class");
        if let Some(name) = &class.name {
            self.write(" ");
            self.write(&name.name);
        }
        if let Some(super_class) = &class.super_class {
            self.write(" extends ");
            self.expr(super_class, prec::CALL);
        }
        self.write(" ");
        if class.body.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.newline();
        self.level += 1;
        for member in &class.body {
            self.indent();
            match member {
                ClassMember::Method {
                    decorators,
                    key,
                    function,
                    is_static,
                    ..
                } => {
                    self.decorators(decorators, " ");
                    if *is_static {
                        self.write("static ");
                    }
                    self.function(function, Some(key));
                }
                ClassMember::Field {
                    decorators,
                    key,
                    value,
                    is_static,
                    ..
                } => {
                    self.decorators(decorators, " ");
                    if *is_static {
                        self.write("static ");
                    }
                    self.prop_key(key);
                    if let Some(value) = value {
                        self.write(" = ");
                        self.expr(value, prec::ASSIGN);
                    }
                    self.write(";");
                }
                ClassMember::StaticBlock { body, .. } => {
                    self.write("static ");
                    self.block(body);
                }
            }
            self.newline();
        }
        self.level -= 1;
        self.indent();
        self.write("}");
    }

    fn prop_key(&mut self, key: &PropKey) {
        match key {
            PropKey::Ident(id) => self.write(&id.name),
            PropKey::Str(s) => self.write(&s.raw),
            PropKey::Num(n) => self.write(&n.raw),
            PropKey::Private(id) => {
                self.write("#");
                self.write(&id.name);
            }
            PropKey::Computed(expr) => {
                self.write("[");
                self.expr(expr, prec::ASSIGN);
                self.write("]");
            }
        }
    }

    // ── patterns ────────────────────────────────────────────────────────────

    fn pat(&mut self, pat: &Pat) {
        match pat {
            Pat::Ident(id) => self.write(&id.name),
            Pat::Array { elems, .. } => {
                self.write("[");
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    if let Some(elem) = elem {
                        self.pat(elem);
                    }
                }
                // a trailing hole needs its own comma
                if matches!(elems.last(), Some(None)) {
                    self.write(",");
                }
                self.write("]");
            }
            Pat::Object { props, .. } => {
                if props.is_empty() {
                    self.write("{}");
                    return;
                }
                self.write("{ ");
                self.comma_list(props, |p, prop| match prop {
                    ObjectPatProp::KeyValue { key, value, .. } => {
                        p.prop_key(key);
                        p.write(": ");
                        p.pat(value);
                    }
                    ObjectPatProp::Shorthand { name, default, .. } => {
                        p.write(&name.name);
                        if let Some(default) = default {
                            p.write(" = ");
                            p.expr(default, prec::ASSIGN);
                        }
                    }
                    ObjectPatProp::Rest { arg, .. } => {
                        p.write("...");
                        p.pat(arg);
                    }
                });
                self.write(" }");
            }
            Pat::Assign { left, right, .. } => {
                self.pat(left);
                self.write(" = ");
                self.expr(right, prec::ASSIGN);
            }
            Pat::Rest { arg, .. } => {
                self.write("...");
                self.pat(arg);
            }
            Pat::Expr(expr) => self.expr(expr, prec::CALL),
        }
    }

    // ── expressions ─────────────────────────────────────────────────────────

    fn expr(&mut self, expr: &Expr, min_prec: u8) {
        if expr_prec(expr) < min_prec {
            self.write("(");
            self.expr_unwrapped(expr);
            self.write(")");
        } else {
            self.expr_unwrapped(expr);
        }
    }

    fn expr_unwrapped(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(id) => self.write(&id.name),
            Expr::This(_) => self.write("this"),
            Expr::Super(_) => self.write("super"),
            Expr::Lit(lit) => self.lit(lit),
            Expr::Template(tpl) => self.template(tpl),
            Expr::TaggedTemplate { tag, tpl, .. } => {
                self.expr(tag, prec::CALL);
                self.template(tpl);
            }
            Expr::Array { elems, .. } => {
                self.write("[");
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    if let Some(elem) = elem {
                        self.spread(elem);
                    }
                }
                if matches!(elems.last(), Some(None)) {
                    self.write(",");
                }
                self.write("]");
            }
            Expr::Object { props, .. } => self.object(props),
            Expr::Function(f) => self.function(f, None),
            Expr::Arrow(f) => self.arrow(f),
            Expr::Class(c) => self.class(c),
            Expr::Unary { op, arg, .. } => {
                self.write(op.as_str());
                let word = matches!(op, UnaryOp::Typeof | UnaryOp::Void | UnaryOp::Delete);
                let clash = match (op, &**arg) {
                    (UnaryOp::Minus, Expr::Unary { op: UnaryOp::Minus, .. })
                    | (UnaryOp::Plus, Expr::Unary { op: UnaryOp::Plus, .. }) => true,
                    (
                        UnaryOp::Minus,
                        Expr::Update {
                            op: UpdateOp::Decrement,
                            prefix: true,
                            ..
                        },
                    )
                    | (
                        UnaryOp::Plus,
                        Expr::Update {
                            op: UpdateOp::Increment,
                            prefix: true,
                            ..
                        },
                    ) => true,
                    _ => false,
                };
                if word || clash {
                    self.write(" ");
                }
                self.expr(arg, prec::UNARY);
            }
            Expr::Update {
                op, prefix, arg, ..
            } => {
                if *prefix {
                    self.write(op.as_str());
                    self.expr(arg, prec::UNARY);
                } else {
                    self.expr(arg, prec::CALL);
                    self.write(op.as_str());
                }
            }
            Expr::Binary {
                op, left, right, ..
            } => self.binary(*op, left, right),
            Expr::Assign {
                op, target, value, ..
            } => {
                match &**target {
                    AssignTarget::Simple(target) => self.expr(target, prec::CALL),
                    AssignTarget::Pat(pat) => self.pat(pat),
                }
                self.write(" ");
                self.write(op.as_str());
                self.write(" ");
                self.expr(value, prec::ASSIGN);
            }
            Expr::Cond {
                test, cons, alt, ..
            } => {
                self.expr(test, prec::COND + 1);
                self.write(" ? ");
                self.expr(cons, prec::ASSIGN);
                self.write(" : ");
                self.expr(alt, prec::ASSIGN);
            }
            Expr::Call {
                callee,
                args,
                optional,
                ..
            } => {
                self.expr(callee, prec::CALL);
                if *optional {
                    self.write("?.");
                }
                self.args(args);
            }
            Expr::New { callee, args, .. } => {
                self.write("new ");
                if contains_call(callee) {
                    self.write("(");
                    self.expr(callee, prec::SEQ);
                    self.write(")");
                } else {
                    self.expr(callee, prec::CALL);
                }
                if let Some(args) = args {
                    self.args(args);
                }
            }
            Expr::Member {
                object,
                prop,
                optional,
                ..
            } => {
                if matches!(&**object, Expr::Lit(Lit::Num(_))) {
                    self.write("(");
                    self.expr(object, prec::SEQ);
                    self.write(")");
                } else {
                    self.expr(object, prec::CALL);
                }
                match prop {
                    MemberProp::Ident(id) => {
                        self.write(if *optional { "?." } else { "." });
                        self.write(&id.name);
                    }
                    MemberProp::Private(id) => {
                        self.write(if *optional { "?.#" } else { ".#" });
                        self.write(&id.name);
                    }
                    MemberProp::Computed(expr) => {
                        self.write(if *optional { "?.[" } else { "[" });
                        self.expr(expr, prec::SEQ);
                        self.write("]");
                    }
                }
            }
            Expr::Seq { exprs, .. } => {
                self.comma_list(exprs, |p, e| p.expr(e, prec::ASSIGN));
            }
            Expr::Yield { arg, delegate, .. } => {
                self.write(if *delegate { "yield*" } else { "yield" });
                if let Some(arg) = arg {
                    self.write(" ");
                    self.expr(arg, prec::ASSIGN);
                }
            }
            Expr::Await { arg, .. } => {
                self.write("await ");
                self.expr(arg, prec::UNARY);
            }
            Expr::Paren { expr, .. } => {
                self.write("(");
                self.expr(expr, prec::SEQ);
                self.write(")");
            }
            Expr::MetaProp { meta, prop, .. } => {
                self.write(&meta.name);
                self.write(".");
                self.write(&prop.name);
            }
        }
    }

    fn binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) {
        let own = prec::BINARY + op.precedence();
        let (left_min, right_min) = if op == BinaryOp::Exp {
            // `-a ** b` is a syntax error, so unary operands need parens
            (prec::UPDATE, own)
        } else {
            (own, own + 1)
        };

        // `??` cannot mix with `||`/`&&` without parentheses
        let mixes = |e: &Expr| {
            (op == BinaryOp::NullishCoalescing && is_logical(e))
                || (matches!(op, BinaryOp::LogicalOr | BinaryOp::LogicalAnd)
                    && matches!(
                        e,
                        Expr::Binary {
                            op: BinaryOp::NullishCoalescing,
                            ..
                        }
                    ))
        };

        if mixes(left) {
            self.write("(");
            self.expr(left, prec::SEQ);
            self.write(")");
        } else {
            self.expr(left, left_min);
        }
        self.write(" ");
        self.write(op.as_str());
        self.write(" ");
        if mixes(right) {
            self.write("(");
            self.expr(right, prec::SEQ);
            self.write(")");
        } else {
            self.expr(right, right_min);
        }
    }

    fn spread(&mut self, elem: &ExprOrSpread) {
        if elem.spread {
            self.write("...");
        }
        self.expr(&elem.expr, prec::ASSIGN);
    }

    fn args(&mut self, args: &[ExprOrSpread]) {
        self.write("(");
        self.comma_list(args, |p, arg| p.spread(arg));
        self.write(")");
    }

    fn object(&mut self, props: &[Prop]) {
        if props.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{ ");
        self.comma_list(props, |p, prop| match prop {
            Prop::KeyValue { key, value, .. } => {
                p.prop_key(key);
                p.write(": ");
                p.expr(value, prec::ASSIGN);
            }
            Prop::Shorthand { name, default, .. } => {
                p.write(&name.name);
                if let Some(default) = default {
                    p.write(" = ");
                    p.expr(default, prec::ASSIGN);
                }
            }
            Prop::Method { key, function, .. } => p.function(function, Some(key)),
            Prop::Spread { expr, .. } => {
                p.write("...");
                p.expr(expr, prec::ASSIGN);
            }
        });
        self.write(" }");
    }

    fn template(&mut self, tpl: &Template) {
        self.write("`");
        for (i, quasi) in tpl.quasis.iter().enumerate() {
            self.write(quasi);
            if let Some(expr) = tpl.exprs.get(i) {
                self.write("${");
                self.expr(expr, prec::SEQ);
                self.write("}");
            }
        }
        self.write("`");
    }

    fn lit(&mut self, lit: &Lit) {
        match lit {
            Lit::Str(s) => self.write(&s.raw),
            Lit::Num(n) | Lit::BigInt(n) => self.write(&n.raw),
            Lit::Bool(value, _) => self.write(if *value { "true" } else { "false" }),
            Lit::Null(_) => self.write("null"),
            Lit::Regex { raw, .. } => self.write(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thisarg_diagnostics::Span;
    use thisarg_parser::{parse_program, Syntax};

    fn roundtrip(source: &str) -> String {
        let result = parse_program(source, Syntax::default());
        assert!(!result.has_errors(), "unexpected parse errors in {source}");
        print_program(&result.program, &EmitOptions::default())
    }

    #[test]
    fn test_function_layout() {
        assert_eq!(
            roundtrip("function add(a, b = 1, ...rest) { return a + b; }"),
            "function add(a, b = 1, ...rest) {\n  return a + b;\n}\n"
        );
    }

    #[test]
    fn test_indent_width() {
        let result = parse_program("if (a) { b(); }", Syntax::default());
        let out = print_program(&result.program, &EmitOptions { indent: 4 });
        assert_eq!(out, "if (a) {\n    b();\n}\n");
    }

    #[test]
    fn test_source_parens_are_kept() {
        assert_eq!(roundtrip("x = (a + b) * c;"), "x = (a + b) * c;\n");
    }

    #[test]
    fn test_synthesized_precedence() {
        let sum = Expr::Binary {
            op: BinaryOp::Add,
            left: Box::new(Expr::ident("a")),
            right: Box::new(Expr::ident("b")),
            span: Span::DUMMY,
        };
        let product = Expr::Binary {
            op: BinaryOp::Mul,
            left: Box::new(sum.clone()),
            right: Box::new(Expr::ident("c")),
            span: Span::DUMMY,
        };
        assert_eq!(print_expr(&product), "(a + b) * c");

        let right_nested = Expr::Binary {
            op: BinaryOp::Sub,
            left: Box::new(Expr::ident("c")),
            right: Box::new(sum),
            span: Span::DUMMY,
        };
        assert_eq!(print_expr(&right_nested), "c - (a + b)");
    }

    #[test]
    fn test_statement_start_ambiguity() {
        let object = Expr::Object {
            props: Vec::new(),
            span: Span::DUMMY,
        };
        let call = Expr::Call {
            callee: Box::new(Expr::member(object, "toString")),
            args: Vec::new(),
            optional: false,
            span: Span::DUMMY,
        };
        let mut program = parse_program("", Syntax::default()).program;
        program.body.push(Stmt::Expr {
            expr: call,
            span: Span::DUMMY,
        });
        assert_eq!(
            print_program(&program, &EmitOptions::default()),
            "({}.toString());\n"
        );
    }

    #[test]
    fn test_arrow_object_body() {
        assert_eq!(roundtrip("f = () => ({ a: 1 });"), "f = () => ({ a: 1 });\n");
    }

    #[test]
    fn test_classes_and_members() {
        let out = roundtrip("class A extends B { static #n = 1; get v() { return 2; } static { init(); } }");
        assert_eq!(
            out,
            "class A extends B {\n  static #n = 1;\n  get v() {\n    return 2;\n  }\n  static {\n    init();\n  }\n}\n"
        );
    }

    #[test]
    fn test_templates_and_optional_chains() {
        assert_eq!(roundtrip("x = `a${b}c${d}`;"), "x = `a${b}c${d}`;\n");
        assert_eq!(roundtrip("a?.b?.[c]?.(d);"), "a?.b?.[c]?.(d);\n");
    }

    #[test]
    fn test_control_flow() {
        assert_eq!(
            roundtrip("for (let i = 0; i < n; i++) if (i) continue; else break;"),
            "for (let i = 0; i < n; i++) if (i) continue;\nelse break;\n"
        );
        assert_eq!(
            roundtrip("try { a(); } catch { b(); } finally { c(); }"),
            "try {\n  a();\n} catch {\n  b();\n} finally {\n  c();\n}\n"
        );
    }

    #[test]
    fn test_unary_spacing() {
        assert_eq!(roundtrip("x = - -y;"), "x = - -y;\n");
        assert_eq!(roundtrip("x = typeof y;"), "x = typeof y;\n");
    }

    #[test]
    fn test_this_annotation_printed_as_parameter() {
        let mut program = parse_program("function f(a) {}", Syntax::default()).program;
        let Stmt::Function(f) = &mut program.body[0] else {
            panic!("expected a function");
        };
        f.this_annotation = Some(ThisAnnotation {
            decorators: Vec::new(),
            type_ann: Some(TypeAnn {
                text: "User".to_string(),
                span: Span::DUMMY,
            }),
            span: Span::DUMMY,
        });
        assert_eq!(
            print_program(&program, &EmitOptions::default()),
            "function f(this: User, a) {}\n"
        );
    }
}
