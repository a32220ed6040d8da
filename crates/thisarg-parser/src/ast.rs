//! Syntax tree for JavaScript extended with explicit receiver parameters.
//!
//! The tree is a plain owned structure: the binder reads it and the lowering
//! pass rewrites it in place. Every node carries a [`Span`]; nodes the
//! lowering pass synthesizes use [`Span::DUMMY`].

use thisarg_diagnostics::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramKind {
    Script,
    Module,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub kind: ProgramKind,
    pub body: Vec<Stmt>,
    /// Module code, or a script that starts with a `"use strict"` directive
    pub strict: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Functions and receivers
// ─────────────────────────────────────────────────────────────────────────────

/// What kind of callable a [`Function`] is. Every kind except `Arrow` owns
/// its own receiver; `Constructor` owns one but may not declare it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Ordinary,
    Method,
    Getter,
    Setter,
    Constructor,
    Arrow,
}

impl FunctionKind {
    pub fn owns_receiver(self) -> bool {
        self != FunctionKind::Arrow
    }

    /// Whether an explicit receiver may be declared at all.
    pub fn accepts_explicit_receiver(self) -> bool {
        !matches!(self, FunctionKind::Arrow | FunctionKind::Constructor)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub kind: FunctionKind,
    pub name: Option<Ident>,
    pub receiver: Option<ReceiverParam>,
    /// Decorators and type annotation that were attached to a lowered
    /// receiver; printed as a leading `this: Type` parameter.
    pub this_annotation: Option<ThisAnnotation>,
    pub params: Vec<Param>,
    pub body: FunctionBody,
    pub return_type: Option<TypeAnn>,
    pub is_async: bool,
    pub is_generator: bool,
    /// Body runs in strict mode, inherited or from a directive
    pub strict: bool,
    pub span: Span,
}

impl Function {
    /// True when no parameter uses a default, rest element, or pattern.
    pub fn has_simple_params(&self) -> bool {
        self.params
            .iter()
            .all(|p| p.default.is_none() && !p.rest && matches!(p.pat, Pat::Ident(_)))
    }

    /// Block body statements; empty for concise arrow bodies.
    pub fn body_stmts(&self) -> &[Stmt] {
        match &self.body {
            FunctionBody::Block(block) => &block.stmts,
            FunctionBody::Expr(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FunctionBody {
    Block(Block),
    /// Concise arrow body
    Expr(Box<Expr>),
}

/// An explicit receiver declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiverParam {
    pub binding: ReceiverBinding,
    pub decorators: Vec<Decorator>,
    pub type_ann: Option<TypeAnn>,
    pub spelling: ReceiverSpelling,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReceiverBinding {
    /// `function f(this)`
    Unnamed,
    /// `function f(this user)` or `function f::user()`
    Named(Ident),
    /// `function f(this {a, b})`
    Destructured(Pat),
}

impl ReceiverBinding {
    /// Whether `this` stays usable in the body.
    pub fn keeps_this(&self) -> bool {
        matches!(self, ReceiverBinding::Unnamed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverSpelling {
    /// Leading `this` parameter
    Parameter,
    /// `function name::receiver(...)`
    BindOperator,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThisAnnotation {
    pub decorators: Vec<Decorator>,
    pub type_ann: Option<TypeAnn>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub decorators: Vec<Decorator>,
    pub pat: Pat,
    pub type_ann: Option<TypeAnn>,
    pub default: Option<Expr>,
    pub rest: bool,
    pub span: Span,
}

/// Type annotation text, carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAnn {
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decorator {
    pub expr: Expr,
    pub span: Span,
}

// ─────────────────────────────────────────────────────────────────────────────
// Patterns
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Pat {
    Ident(Ident),
    Array {
        elems: Vec<Option<Pat>>,
        span: Span,
    },
    Object {
        props: Vec<ObjectPatProp>,
        span: Span,
    },
    /// `target = default` inside a pattern
    Assign {
        left: Box<Pat>,
        right: Box<Expr>,
        span: Span,
    },
    Rest {
        arg: Box<Pat>,
        span: Span,
    },
    /// Member expression target, only in assignment patterns
    Expr(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectPatProp {
    KeyValue {
        key: PropKey,
        value: Pat,
        span: Span,
    },
    Shorthand {
        name: Ident,
        default: Option<Expr>,
        span: Span,
    },
    Rest {
        arg: Pat,
        span: Span,
    },
}

impl Pat {
    pub fn span(&self) -> Span {
        match self {
            Pat::Ident(id) => id.span,
            Pat::Array { span, .. }
            | Pat::Object { span, .. }
            | Pat::Assign { span, .. }
            | Pat::Rest { span, .. } => *span,
            Pat::Expr(expr) => expr.span(),
        }
    }

    /// Names this pattern binds, in source order.
    pub fn bound_names(&self) -> Vec<&Ident> {
        let mut out = Vec::new();
        self.collect_bound_names(&mut out);
        out
    }

    fn collect_bound_names<'a>(&'a self, out: &mut Vec<&'a Ident>) {
        match self {
            Pat::Ident(id) => out.push(id),
            Pat::Array { elems, .. } => {
                for elem in elems.iter().flatten() {
                    elem.collect_bound_names(out);
                }
            }
            Pat::Object { props, .. } => {
                for prop in props {
                    match prop {
                        ObjectPatProp::KeyValue { value, .. } => value.collect_bound_names(out),
                        ObjectPatProp::Shorthand { name, .. } => out.push(name),
                        ObjectPatProp::Rest { arg, .. } => arg.collect_bound_names(out),
                    }
                }
            }
            Pat::Assign { left, .. } => left.collect_bound_names(out),
            Pat::Rest { arg, .. } => arg.collect_bound_names(out),
            Pat::Expr(_) => {}
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Classes
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub decorators: Vec<Decorator>,
    pub name: Option<Ident>,
    pub super_class: Option<Box<Expr>>,
    pub body: Vec<ClassMember>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    /// Methods, accessors and the constructor; the kind lives on the function
    Method {
        decorators: Vec<Decorator>,
        key: PropKey,
        function: Box<Function>,
        is_static: bool,
        span: Span,
    },
    Field {
        decorators: Vec<Decorator>,
        key: PropKey,
        value: Option<Expr>,
        is_static: bool,
        span: Span,
    },
    StaticBlock {
        body: Block,
        span: Span,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropKey {
    Ident(Ident),
    Str(Str),
    Num(Number),
    Private(Ident),
    Computed(Box<Expr>),
}

impl PropKey {
    pub fn span(&self) -> Span {
        match self {
            PropKey::Ident(id) | PropKey::Private(id) => id.span,
            PropKey::Str(s) => s.span,
            PropKey::Num(n) => n.span,
            PropKey::Computed(e) => e.span(),
        }
    }

    /// Static key name, if the key is not computed.
    pub fn static_name(&self) -> Option<&str> {
        match self {
            PropKey::Ident(id) => Some(&id.name),
            PropKey::Str(s) => Some(&s.value),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Statements
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VarKind::Var => "var",
            VarKind::Let => "let",
            VarKind::Const => "const",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub kind: VarKind,
    pub decls: Vec<VarDeclarator>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    pub target: Pat,
    pub type_ann: Option<TypeAnn>,
    pub init: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Var(VarDecl),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForHead {
    Var(VarDecl),
    Pat(Pat),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub param: Option<Pat>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// `None` for `default:`
    pub test: Option<Expr>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr {
        expr: Expr,
        span: Span,
    },
    Var(VarDecl),
    Function(Box<Function>),
    Class(Box<Class>),
    Return {
        arg: Option<Expr>,
        span: Span,
    },
    If {
        test: Expr,
        cons: Box<Stmt>,
        alt: Option<Box<Stmt>>,
        span: Span,
    },
    Block(Block),
    For {
        init: Option<ForInit>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
        span: Span,
    },
    ForIn {
        left: ForHead,
        right: Expr,
        body: Box<Stmt>,
        span: Span,
    },
    ForOf {
        left: ForHead,
        right: Expr,
        body: Box<Stmt>,
        is_await: bool,
        span: Span,
    },
    While {
        test: Expr,
        body: Box<Stmt>,
        span: Span,
    },
    DoWhile {
        body: Box<Stmt>,
        test: Expr,
        span: Span,
    },
    Break {
        label: Option<Ident>,
        span: Span,
    },
    Continue {
        label: Option<Ident>,
        span: Span,
    },
    Throw {
        arg: Expr,
        span: Span,
    },
    Try {
        block: Block,
        handler: Option<CatchClause>,
        finalizer: Option<Block>,
        span: Span,
    },
    Switch {
        discriminant: Expr,
        cases: Vec<SwitchCase>,
        span: Span,
    },
    Labeled {
        label: Ident,
        body: Box<Stmt>,
        span: Span,
    },
    Empty(Span),
    Debugger(Span),
    Import(ImportDecl),
    Export(ExportDecl),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Expr { span, .. }
            | Stmt::Return { span, .. }
            | Stmt::If { span, .. }
            | Stmt::For { span, .. }
            | Stmt::ForIn { span, .. }
            | Stmt::ForOf { span, .. }
            | Stmt::While { span, .. }
            | Stmt::DoWhile { span, .. }
            | Stmt::Break { span, .. }
            | Stmt::Continue { span, .. }
            | Stmt::Throw { span, .. }
            | Stmt::Try { span, .. }
            | Stmt::Switch { span, .. }
            | Stmt::Labeled { span, .. }
            | Stmt::Empty(span)
            | Stmt::Debugger(span) => *span,
            Stmt::Var(decl) => decl.span,
            Stmt::Function(f) => f.span,
            Stmt::Class(c) => c.span,
            Stmt::Block(b) => b.span,
            Stmt::Import(i) => i.span,
            Stmt::Export(e) => e.span(),
        }
    }

    /// The string of a directive prologue entry (`"use strict";`).
    pub fn directive(&self) -> Option<&str> {
        match self {
            Stmt::Expr {
                expr: Expr::Lit(Lit::Str(s)),
                ..
            } => Some(&s.value),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Modules
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub specifiers: Vec<ImportSpecifier>,
    pub source: Str,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportSpecifier {
    Default(Ident),
    Namespace(Ident),
    Named { imported: Option<Ident>, local: Ident },
}

impl ImportSpecifier {
    pub fn local(&self) -> &Ident {
        match self {
            ImportSpecifier::Default(id) | ImportSpecifier::Namespace(id) => id,
            ImportSpecifier::Named { local, .. } => local,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSpecifier {
    pub local: Ident,
    pub exported: Option<Ident>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportDecl {
    /// `export var|let|const|function|class ...`
    Decl { decl: Box<Stmt>, span: Span },
    /// `export default function ...` / `export default class ...`
    DefaultDecl { decl: Box<Stmt>, span: Span },
    /// `export default <expr>;`
    DefaultExpr { expr: Expr, span: Span },
    /// `export { a, b as c } [from "m"];`
    Named {
        specifiers: Vec<ExportSpecifier>,
        source: Option<Str>,
        span: Span,
    },
    /// `export * [as ns] from "m";`
    All {
        exported: Option<Ident>,
        source: Str,
        span: Span,
    },
}

impl ExportDecl {
    pub fn span(&self) -> Span {
        match self {
            ExportDecl::Decl { span, .. }
            | ExportDecl::DefaultDecl { span, .. }
            | ExportDecl::DefaultExpr { span, .. }
            | ExportDecl::Named { span, .. }
            | ExportDecl::All { span, .. } => *span,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Expressions
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Str {
    /// Decoded value
    pub value: String,
    /// Source text including quotes
    pub raw: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Number {
    pub raw: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Lit {
    Str(Str),
    Num(Number),
    BigInt(Number),
    Bool(bool, Span),
    Null(Span),
    Regex { raw: String, span: Span },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// Raw text of each chunk between substitutions
    pub quasis: Vec<String>,
    pub exprs: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprOrSpread {
    pub spread: bool,
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Prop {
    KeyValue {
        key: PropKey,
        value: Expr,
        span: Span,
    },
    /// `{ a }`, and `{ a = 1 }` when the literal becomes a pattern
    Shorthand {
        name: Ident,
        default: Option<Box<Expr>>,
        span: Span,
    },
    /// Methods and accessors
    Method {
        key: PropKey,
        function: Box<Function>,
        span: Span,
    },
    Spread {
        expr: Expr,
        span: Span,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberProp {
    Ident(Ident),
    Private(Ident),
    Computed(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Minus,
    Plus,
    Not,
    BitNot,
    Typeof,
    Void,
    Delete,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Minus => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::Typeof => "typeof",
            UnaryOp::Void => "void",
            UnaryOp::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

impl UpdateOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateOp::Increment => "++",
            UpdateOp::Decrement => "--",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    NullishCoalescing,
    LogicalOr,
    LogicalAnd,
    BitOr,
    BitXor,
    BitAnd,
    EqEq,
    NotEq,
    EqEqEq,
    NotEqEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    In,
    InstanceOf,
    LShift,
    RShift,
    ZeroFillRShift,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        use BinaryOp::*;
        match self {
            NullishCoalescing => "??",
            LogicalOr => "||",
            LogicalAnd => "&&",
            BitOr => "|",
            BitXor => "^",
            BitAnd => "&",
            EqEq => "==",
            NotEq => "!=",
            EqEqEq => "===",
            NotEqEq => "!==",
            Lt => "<",
            Gt => ">",
            LtEq => "<=",
            GtEq => ">=",
            In => "in",
            InstanceOf => "instanceof",
            LShift => "<<",
            RShift => ">>",
            ZeroFillRShift => ">>>",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Exp => "**",
        }
    }

    /// Binding power; higher binds tighter.
    pub fn precedence(self) -> u8 {
        use BinaryOp::*;
        match self {
            NullishCoalescing => 1,
            LogicalOr => 2,
            LogicalAnd => 3,
            BitOr => 4,
            BitXor => 5,
            BitAnd => 6,
            EqEq | NotEq | EqEqEq | NotEqEq => 7,
            Lt | Gt | LtEq | GtEq | In | InstanceOf => 8,
            LShift | RShift | ZeroFillRShift => 9,
            Add | Sub => 10,
            Mul | Div | Mod => 11,
            Exp => 12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    ExpAssign,
    LShiftAssign,
    RShiftAssign,
    ZeroFillRShiftAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    AndAssign,
    OrAssign,
    NullishAssign,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        use AssignOp::*;
        match self {
            Assign => "=",
            AddAssign => "+=",
            SubAssign => "-=",
            MulAssign => "*=",
            DivAssign => "/=",
            ModAssign => "%=",
            ExpAssign => "**=",
            LShiftAssign => "<<=",
            RShiftAssign => ">>=",
            ZeroFillRShiftAssign => ">>>=",
            BitAndAssign => "&=",
            BitOrAssign => "|=",
            BitXorAssign => "^=",
            AndAssign => "&&=",
            OrAssign => "||=",
            NullishAssign => "??=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    /// Identifier or member expression
    Simple(Expr),
    /// Destructuring assignment
    Pat(Pat),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(Ident),
    This(Span),
    Super(Span),
    Lit(Lit),
    Template(Template),
    TaggedTemplate {
        tag: Box<Expr>,
        tpl: Template,
        span: Span,
    },
    Array {
        elems: Vec<Option<ExprOrSpread>>,
        span: Span,
    },
    Object {
        props: Vec<Prop>,
        span: Span,
    },
    Function(Box<Function>),
    Arrow(Box<Function>),
    Class(Box<Class>),
    Unary {
        op: UnaryOp,
        arg: Box<Expr>,
        span: Span,
    },
    Update {
        op: UpdateOp,
        prefix: bool,
        arg: Box<Expr>,
        span: Span,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    Assign {
        op: AssignOp,
        target: Box<AssignTarget>,
        value: Box<Expr>,
        span: Span,
    },
    Cond {
        test: Box<Expr>,
        cons: Box<Expr>,
        alt: Box<Expr>,
        span: Span,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<ExprOrSpread>,
        optional: bool,
        span: Span,
    },
    New {
        callee: Box<Expr>,
        args: Option<Vec<ExprOrSpread>>,
        span: Span,
    },
    Member {
        object: Box<Expr>,
        prop: MemberProp,
        optional: bool,
        span: Span,
    },
    Seq {
        exprs: Vec<Expr>,
        span: Span,
    },
    Yield {
        arg: Option<Box<Expr>>,
        delegate: bool,
        span: Span,
    },
    Await {
        arg: Box<Expr>,
        span: Span,
    },
    Paren {
        expr: Box<Expr>,
        span: Span,
    },
    /// `new.target`, `import.meta`
    MetaProp {
        meta: Ident,
        prop: Ident,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Ident(id) => id.span,
            Expr::This(span) | Expr::Super(span) => *span,
            Expr::Lit(lit) => match lit {
                Lit::Str(s) => s.span,
                Lit::Num(n) | Lit::BigInt(n) => n.span,
                Lit::Bool(_, span) | Lit::Null(span) | Lit::Regex { span, .. } => *span,
            },
            Expr::Template(t) => t.span,
            Expr::Function(f) | Expr::Arrow(f) => f.span,
            Expr::Class(c) => c.span,
            Expr::TaggedTemplate { span, .. }
            | Expr::Array { span, .. }
            | Expr::Object { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Update { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Assign { span, .. }
            | Expr::Cond { span, .. }
            | Expr::Call { span, .. }
            | Expr::New { span, .. }
            | Expr::Member { span, .. }
            | Expr::Seq { span, .. }
            | Expr::Yield { span, .. }
            | Expr::Await { span, .. }
            | Expr::Paren { span, .. }
            | Expr::MetaProp { span, .. } => *span,
        }
    }

    /// Synthesized identifier reference.
    pub fn ident(name: &str) -> Expr {
        Expr::Ident(Ident::new(name, Span::DUMMY))
    }

    /// Synthesized string literal with double quotes.
    pub fn string(value: &str) -> Expr {
        let escaped: String = value
            .chars()
            .flat_map(|c| match c {
                '"' => vec!['\\', '"'],
                '\\' => vec!['\\', '\\'],
                '\n' => vec!['\\', 'n'],
                c => vec![c],
            })
            .collect();
        Expr::Lit(Lit::Str(Str {
            value: value.to_string(),
            raw: format!("\"{}\"", escaped),
            span: Span::DUMMY,
        }))
    }

    /// Synthesized `a.b` member access.
    pub fn member(object: Expr, prop: &str) -> Expr {
        Expr::Member {
            object: Box::new(object),
            prop: MemberProp::Ident(Ident::new(prop, Span::DUMMY)),
            optional: false,
            span: Span::DUMMY,
        }
    }

    /// Strip any number of parentheses.
    pub fn unparen(&self) -> &Expr {
        match self {
            Expr::Paren { expr, .. } => expr.unparen(),
            other => other,
        }
    }
}
