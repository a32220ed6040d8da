//! Functions, parameter lists, explicit receivers, arrows and classes.

use super::{Context, PResult, Parser};
use crate::ast::*;
use crate::token::TokenKind;
use thisarg_diagnostics::{Diagnostic, DiagnosticCode, Span};

/// Everything known about a function before its parameter list.
pub(super) struct FunctionHead {
    pub kind: FunctionKind,
    pub name: Option<Ident>,
    /// Receiver from the `name::receiver` spelling
    pub bound_receiver: Option<ReceiverParam>,
    pub is_async: bool,
    pub is_generator: bool,
    pub start: Span,
}

/// Modifiers and key shared by class members and object literal methods.
pub(super) struct MethodHead {
    pub is_async: bool,
    pub is_generator: bool,
    pub accessor: Option<FunctionKind>,
    pub key: PropKey,
}

impl<'src> Parser<'src> {
    /// `function [*] [name] [::receiver] (params) { body }`, positioned at
    /// the `function` keyword.
    pub(super) fn parse_function(
        &mut self,
        is_async: bool,
        start: Span,
        require_name: bool,
    ) -> PResult<Function> {
        self.expect(TokenKind::Function, "`function`")?;
        let is_generator = self.eat(TokenKind::Star);

        let name = if self.at(TokenKind::Identifier) {
            Some(self.parse_binding_ident()?)
        } else if require_name {
            return Err(self.unexpected("a function name"));
        } else {
            None
        };

        let bound_receiver = if self.at(TokenKind::ColonColon) {
            let colons = self.bump().span;
            let ident = self.parse_binding_ident()?;
            Some(ReceiverParam {
                span: colons.to(ident.span),
                binding: ReceiverBinding::Named(ident),
                decorators: Vec::new(),
                type_ann: None,
                spelling: ReceiverSpelling::BindOperator,
            })
        } else {
            None
        };

        self.skip_type_params();

        self.parse_function_rest(FunctionHead {
            kind: FunctionKind::Ordinary,
            name,
            bound_receiver,
            is_async,
            is_generator,
            start,
        })
    }

    /// Parameter list, optional return type and block body.
    pub(super) fn parse_function_rest(&mut self, head: FunctionHead) -> PResult<Function> {
        let ctx = Context {
            strict: self.ctx.strict,
            in_function: true,
            in_async: head.is_async,
            in_generator: head.is_generator,
            no_in: false,
        };

        self.with_context(ctx, |p| {
            let (receiver, params) = p.parse_params(head.kind)?;
            let receiver = p.merge_receivers(head.bound_receiver, receiver);

            let return_type = if p.syntax.typescript && p.eat(TokenKind::Colon) {
                Some(p.skip_type(true)?)
            } else {
                None
            };

            let open = p.expect(TokenKind::LBrace, "`{`")?.span;
            let stmts = p.parse_directives_and_statements(TokenKind::RBrace);
            p.expect(TokenKind::RBrace, "`}`")?;
            let body = FunctionBody::Block(Block {
                stmts,
                span: p.span_from(open),
            });

            Ok(Function {
                kind: head.kind,
                name: head.name,
                receiver,
                this_annotation: None,
                params,
                body,
                return_type,
                is_async: head.is_async,
                is_generator: head.is_generator,
                strict: p.ctx.strict,
                span: p.span_from(head.start),
            })
        })
    }

    /// `name::receiver` and a `this` parameter together declare the receiver
    /// twice; the first spelling wins.
    fn merge_receivers(
        &mut self,
        bound: Option<ReceiverParam>,
        param: Option<ReceiverParam>,
    ) -> Option<ReceiverParam> {
        match (bound, param) {
            (Some(bound), Some(param)) => {
                self.push(
                    Diagnostic::error(
                        DiagnosticCode::DuplicateReceiver,
                        "receiver declared twice",
                    )
                    .with_span(param.span)
                    .with_label(bound.span, "receiver already declared here")
                    .with_help("keep either the `::` spelling or the `this` parameter")
                    .build(),
                );
                Some(bound)
            }
            (bound, param) => bound.or(param),
        }
    }

    /// `( [receiver,] params )`. Receivers the function kind does not allow
    /// are reported and dropped.
    pub(super) fn parse_params(
        &mut self,
        kind: FunctionKind,
    ) -> PResult<(Option<ReceiverParam>, Vec<Param>)> {
        self.expect(TokenKind::LParen, "`(`")?;

        let mut receiver: Option<ReceiverParam> = None;
        let mut params = Vec::new();
        let mut index = 0usize;

        while !self.at(TokenKind::RParen) && !self.at(TokenKind::Eof) {
            let start = self.cur().span;
            let decorators = self.parse_decorators()?;

            if self.at(TokenKind::This) {
                let parsed = self.parse_receiver(decorators, start)?;
                if !kind.accepts_explicit_receiver() {
                    self.reject_receiver(kind, &parsed);
                } else if let Some(first) = &receiver {
                    let first_span = first.span;
                    self.push(
                        Diagnostic::error(
                            DiagnosticCode::DuplicateReceiver,
                            "receiver declared twice",
                        )
                        .with_span(parsed.span)
                        .with_label(first_span, "receiver already declared here")
                        .build(),
                    );
                } else if index > 0 {
                    self.push(
                        Diagnostic::error(
                            DiagnosticCode::MisplacedReceiver,
                            "a `this` receiver must be the first parameter",
                        )
                        .with_span(parsed.span)
                        .with_help("move the receiver to the front of the parameter list")
                        .build(),
                    );
                } else {
                    receiver = Some(parsed);
                }
            } else {
                let param = self.parse_param(decorators, start)?;
                params.push(param);
            }

            index += 1;
            if !self.at(TokenKind::RParen) {
                self.expect(TokenKind::Comma, "`,` or `)`")?;
            }
        }
        self.expect(TokenKind::RParen, "`)`")?;

        Ok((receiver, params))
    }

    fn reject_receiver(&mut self, kind: FunctionKind, receiver: &ReceiverParam) {
        let diagnostic = if kind == FunctionKind::Constructor {
            Diagnostic::error(
                DiagnosticCode::ConstructorReceiver,
                "class constructors cannot declare an explicit receiver",
            )
            .with_help("a constructor's receiver is the object under construction; remove the `this` parameter")
        } else {
            Diagnostic::error(
                DiagnosticCode::ArrowReceiver,
                "arrow functions cannot declare an explicit receiver",
            )
            .with_help("arrow functions inherit `this`; use a function expression to declare a receiver")
        };
        self.push(diagnostic.with_span(receiver.span).build());
    }

    /// `this`, `this name` or `this {pattern}` with optional type annotation.
    fn parse_receiver(
        &mut self,
        decorators: Vec<Decorator>,
        start: Span,
    ) -> PResult<ReceiverParam> {
        self.expect(TokenKind::This, "`this`")?;

        let binding = match self.kind() {
            TokenKind::Identifier => ReceiverBinding::Named(self.parse_binding_ident()?),
            TokenKind::LBrace | TokenKind::LBracket => {
                ReceiverBinding::Destructured(self.parse_binding_target()?)
            }
            _ => ReceiverBinding::Unnamed,
        };
        let type_ann = self.parse_type_annotation()?;

        if self.at(TokenKind::Eq) {
            let eq = self.bump().span;
            let default = self.with_in(|p| p.parse_assign())?;
            self.error(
                DiagnosticCode::ParseError,
                eq.to(default.span()),
                "a receiver cannot have a default value",
            );
        }

        Ok(ReceiverParam {
            binding,
            decorators,
            type_ann,
            spelling: ReceiverSpelling::Parameter,
            span: self.span_from(start),
        })
    }

    fn parse_param(&mut self, decorators: Vec<Decorator>, start: Span) -> PResult<Param> {
        let rest = self.eat(TokenKind::Ellipsis);
        let pat = self.parse_binding_target()?;
        if self.syntax.typescript {
            // optional marker
            self.eat(TokenKind::Question);
        }
        let type_ann = self.parse_type_annotation()?;

        let default = if !rest && self.eat(TokenKind::Eq) {
            Some(self.with_in(|p| p.parse_assign())?)
        } else {
            None
        };

        Ok(Param {
            decorators,
            pat,
            type_ann,
            default,
            rest,
            span: self.span_from(start),
        })
    }

    /// `<T, U extends V>` after a function or class name; dropped.
    pub(super) fn skip_type_params(&mut self) {
        if !self.syntax.typescript || !self.at(TokenKind::Lt) {
            return;
        }
        let mut depth = 0usize;
        loop {
            match self.kind() {
                TokenKind::Lt => depth += 1,
                TokenKind::Gt => depth = depth.saturating_sub(1),
                TokenKind::Shr => depth = depth.saturating_sub(2),
                TokenKind::Eof => return,
                _ => {}
            }
            self.bump();
            if depth == 0 {
                return;
            }
        }
    }

    // ── arrows ──────────────────────────────────────────────────────────────

    /// Token after the closing bracket that matches the opener at `index`.
    fn matching_close(&self, index: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (i, token) in self.tokens.iter().enumerate().skip(index) {
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                TokenKind::Eof => return None,
                _ => {}
            }
        }
        None
    }

    fn arrow_follows(&self, close: usize) -> bool {
        self.tokens
            .get(close + 1)
            .map_or(false, |t| t.kind == TokenKind::Arrow && !t.newline_before)
    }

    /// Whether an arrow function starts at the current token.
    pub(super) fn is_arrow_ahead(&self) -> bool {
        let next = self.peek_token(1);
        match self.kind() {
            TokenKind::Identifier => {
                if next.kind == TokenKind::Arrow && !next.newline_before {
                    return true;
                }
                if self.cur_text() == "async" && !next.newline_before {
                    if next.kind == TokenKind::Identifier && self.peek_kind(2) == TokenKind::Arrow {
                        return true;
                    }
                    if next.kind == TokenKind::LParen {
                        return self
                            .matching_close(self.pos + 1)
                            .map_or(false, |close| self.arrow_follows(close));
                    }
                }
                false
            }
            // `this => ...`, rejected once parsed
            TokenKind::This => next.kind == TokenKind::Arrow,
            TokenKind::LParen => self
                .matching_close(self.pos)
                .map_or(false, |close| self.arrow_follows(close)),
            _ => false,
        }
    }

    pub(super) fn parse_arrow(&mut self) -> PResult<Expr> {
        let start = self.cur().span;
        let is_async = self.at_contextual("async") && self.peek_kind(1) != TokenKind::Arrow;
        if is_async {
            self.bump();
        }

        let ctx = Context {
            strict: self.ctx.strict,
            in_function: true,
            in_async: is_async,
            in_generator: false,
            no_in: self.ctx.no_in,
        };

        let function = self.with_context(ctx, |p| {
            let params = match p.kind() {
                TokenKind::Identifier => {
                    let ident = p.parse_binding_ident()?;
                    vec![Param {
                        decorators: Vec::new(),
                        span: ident.span,
                        pat: Pat::Ident(ident),
                        type_ann: None,
                        default: None,
                        rest: false,
                    }]
                }
                TokenKind::This => {
                    let this_span = p.bump().span;
                    let receiver = ReceiverParam {
                        binding: ReceiverBinding::Unnamed,
                        decorators: Vec::new(),
                        type_ann: None,
                        spelling: ReceiverSpelling::Parameter,
                        span: this_span,
                    };
                    p.reject_receiver(FunctionKind::Arrow, &receiver);
                    Vec::new()
                }
                _ => p.parse_params(FunctionKind::Arrow)?.1,
            };

            p.expect(TokenKind::Arrow, "`=>`")?;

            let body = if p.at(TokenKind::LBrace) {
                let open = p.bump().span;
                let ctx = Context {
                    no_in: false,
                    ..p.ctx
                };
                let stmts = p.with_context(ctx, |p| {
                    let stmts = p.parse_directives_and_statements(TokenKind::RBrace);
                    (stmts, p.ctx.strict)
                });
                p.expect(TokenKind::RBrace, "`}`")?;
                p.ctx.strict = stmts.1;
                FunctionBody::Block(Block {
                    stmts: stmts.0,
                    span: p.span_from(open),
                })
            } else {
                FunctionBody::Expr(Box::new(p.parse_assign()?))
            };

            Ok(Function {
                kind: FunctionKind::Arrow,
                name: None,
                receiver: None,
                this_annotation: None,
                params,
                body,
                return_type: None,
                is_async,
                is_generator: false,
                strict: p.ctx.strict,
                span: p.span_from(start),
            })
        })?;

        Ok(Expr::Arrow(Box::new(function)))
    }

    // ── classes ─────────────────────────────────────────────────────────────

    /// `class [name] [extends expr] { members }`, positioned at `class`.
    pub(super) fn parse_class(
        &mut self,
        decorators: Vec<Decorator>,
        require_name: bool,
    ) -> PResult<Class> {
        let start = decorators
            .first()
            .map(|d| d.span)
            .unwrap_or_else(|| self.cur().span);
        self.expect(TokenKind::Class, "`class`")?;

        // class code is strict from the name onwards
        let ctx = Context {
            strict: true,
            ..self.ctx
        };
        self.with_context(ctx, |p| {
            let name = if p.at(TokenKind::Identifier) && !p.at_contextual("implements") {
                Some(p.parse_binding_ident()?)
            } else if require_name {
                return Err(p.unexpected("a class name"));
            } else {
                None
            };
            p.skip_type_params();

            let super_class = if p.eat(TokenKind::Extends) {
                Some(Box::new(p.parse_lhs_expr()?))
            } else {
                None
            };

            if p.syntax.typescript && p.at_contextual("implements") {
                p.bump();
                loop {
                    p.skip_type(true)?;
                    if !p.eat(TokenKind::Comma) {
                        break;
                    }
                }
            }

            p.expect(TokenKind::LBrace, "`{`")?;
            let mut body = Vec::new();
            while !p.at(TokenKind::RBrace) && !p.at(TokenKind::Eof) {
                let start_pos = p.pos;
                match p.parse_class_member() {
                    Ok(Some(member)) => body.push(member),
                    Ok(None) => {}
                    Err(_) => p.synchronize(start_pos),
                }
            }
            p.expect(TokenKind::RBrace, "`}`")?;

            Ok(Class {
                decorators,
                name,
                super_class,
                body,
                span: p.span_from(start),
            })
        })
    }

    fn parse_class_member(&mut self) -> PResult<Option<ClassMember>> {
        if self.eat(TokenKind::Semicolon) {
            return Ok(None);
        }

        let start = self.cur().span;
        let decorators = self.parse_decorators()?;

        let mut is_static = false;
        if self.at_contextual("static") && !ends_member_name(self.peek_kind(1)) {
            if self.peek_kind(1) == TokenKind::LBrace {
                self.bump();
                let ctx = Context {
                    strict: true,
                    ..Context::default()
                };
                let body = self.with_context(ctx, |p| p.parse_block())?;
                return Ok(Some(ClassMember::StaticBlock {
                    body,
                    span: self.span_from(start),
                }));
            }
            self.bump();
            is_static = true;
        }

        if self.syntax.typescript {
            while self.at(TokenKind::Identifier)
                && matches!(
                    self.cur_text(),
                    "public" | "private" | "protected" | "readonly" | "abstract" | "override" | "declare"
                )
                && !ends_member_name(self.peek_kind(1))
            {
                self.bump();
            }
        }

        let head = self.parse_method_head()?;

        if self.at(TokenKind::LParen) || self.at(TokenKind::Lt) {
            let is_constructor = !is_static
                && head.accessor.is_none()
                && !head.is_async
                && !head.is_generator
                && matches!(&head.key, PropKey::Ident(_) | PropKey::Str(_))
                && head.key.static_name() == Some("constructor");
            let kind = if is_constructor {
                FunctionKind::Constructor
            } else {
                head.accessor.unwrap_or(FunctionKind::Method)
            };

            self.skip_type_params();
            let function = self.parse_function_rest(FunctionHead {
                kind,
                name: None,
                bound_receiver: None,
                is_async: head.is_async,
                is_generator: head.is_generator,
                start: head.key.span(),
            })?;

            return Ok(Some(ClassMember::Method {
                decorators,
                key: head.key,
                function: Box::new(function),
                is_static,
                span: self.span_from(start),
            }));
        }

        if self.syntax.typescript && (self.at(TokenKind::Question) || self.at(TokenKind::Bang)) {
            self.bump();
        }
        self.parse_type_annotation()?;

        let value = if self.eat(TokenKind::Eq) {
            // initializers run with the instance (or class) as receiver
            let ctx = Context {
                strict: true,
                in_function: true,
                ..Context::default()
            };
            Some(self.with_context(ctx, |p| p.parse_assign())?)
        } else {
            None
        };
        self.consume_semicolon()?;

        Ok(Some(ClassMember::Field {
            decorators,
            key: head.key,
            value,
            is_static,
            span: self.span_from(start),
        }))
    }

    /// `[async] [*] [get|set] key`
    pub(super) fn parse_method_head(&mut self) -> PResult<MethodHead> {
        let mut is_async = false;
        let mut is_generator = false;
        let mut accessor = None;

        if self.at_contextual("async")
            && !self.peek_token(1).newline_before
            && !ends_member_name(self.peek_kind(1))
        {
            self.bump();
            is_async = true;
        }
        if self.eat(TokenKind::Star) {
            is_generator = true;
        }
        if !is_async && !is_generator && !ends_member_name(self.peek_kind(1)) {
            if self.at_contextual("get") {
                self.bump();
                accessor = Some(FunctionKind::Getter);
            } else if self.at_contextual("set") {
                self.bump();
                accessor = Some(FunctionKind::Setter);
            }
        }

        let key = self.parse_prop_key()?;
        Ok(MethodHead {
            is_async,
            is_generator,
            accessor,
            key,
        })
    }

    pub(super) fn parse_prop_key(&mut self) -> PResult<PropKey> {
        let token = self.cur();
        match token.kind {
            TokenKind::String => Ok(PropKey::Str(self.parse_string()?)),
            TokenKind::Number | TokenKind::BigInt => {
                self.bump();
                Ok(PropKey::Num(Number {
                    raw: self.text(token.span).to_string(),
                    span: token.span,
                }))
            }
            TokenKind::PrivateName => {
                self.bump();
                let name = &self.text(token.span)[1..];
                Ok(PropKey::Private(Ident::new(name, token.span)))
            }
            TokenKind::LBracket => {
                self.bump();
                let expr = self.with_in(|p| p.parse_assign())?;
                self.expect(TokenKind::RBracket, "`]`")?;
                Ok(PropKey::Computed(Box::new(expr)))
            }
            _ => Ok(PropKey::Ident(self.parse_ident_name()?)),
        }
    }
}

/// Tokens that end a member name, so a preceding modifier word is the name.
fn ends_member_name(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::LParen
            | TokenKind::Eq
            | TokenKind::Semicolon
            | TokenKind::RBrace
            | TokenKind::Colon
            | TokenKind::Comma
            | TokenKind::Question
            | TokenKind::Eof
    )
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parser::tests::{parse, parse_ok};
    use crate::parser::Parser;
    use crate::Syntax;
    use thisarg_diagnostics::{DiagnosticCode, FileId};

    fn first_function(program: &Program) -> &Function {
        match &program.body[0] {
            Stmt::Function(f) => f,
            other => panic!("expected a function declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_named_receiver() {
        let program = parse_ok("function cb(this elem, e) { return elem; }");
        let f = first_function(&program);
        let receiver = f.receiver.as_ref().unwrap();
        assert!(matches!(&receiver.binding, ReceiverBinding::Named(id) if id.name == "elem"));
        assert_eq!(receiver.spelling, ReceiverSpelling::Parameter);
        assert_eq!(f.params.len(), 1);
    }

    #[test]
    fn test_unnamed_receiver() {
        let program = parse_ok("function f(this, a, b) {}");
        let f = first_function(&program);
        assert!(matches!(
            f.receiver.as_ref().map(|r| &r.binding),
            Some(ReceiverBinding::Unnamed)
        ));
        assert_eq!(f.params.len(), 2);
    }

    #[test]
    fn test_destructured_receiver() {
        let program = parse_ok("function area(this {width, height = 1}) { return width * height; }");
        let f = first_function(&program);
        let Some(ReceiverParam {
            binding: ReceiverBinding::Destructured(pat),
            ..
        }) = &f.receiver
        else {
            panic!("expected destructured receiver");
        };
        let names: Vec<_> = pat.bound_names().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["width", "height"]);
    }

    #[test]
    fn test_bind_operator_spelling() {
        let program = parse_ok("function format::user(style) { return user.name; }");
        let f = first_function(&program);
        let receiver = f.receiver.as_ref().unwrap();
        assert_eq!(receiver.spelling, ReceiverSpelling::BindOperator);
        assert!(matches!(&receiver.binding, ReceiverBinding::Named(id) if id.name == "user"));
        assert_eq!(f.name.as_ref().unwrap().name, "format");
    }

    #[test]
    fn test_bind_operator_with_this_param_is_duplicate() {
        let (_, diags) = parse("function f::a(this b) {}");
        assert_eq!(diags.codes(), vec![DiagnosticCode::DuplicateReceiver]);
    }

    #[test]
    fn test_misplaced_receiver() {
        let (program, diags) = parse("function f(a, this b) {}");
        assert_eq!(diags.codes(), vec![DiagnosticCode::MisplacedReceiver]);
        assert!(first_function(&program).receiver.is_none());
    }

    #[test]
    fn test_constructor_receiver_rejected() {
        let (program, diags) = parse("class C { constructor(this x) { } }");
        assert_eq!(diags.codes(), vec![DiagnosticCode::ConstructorReceiver]);
        let Stmt::Class(class) = &program.body[0] else {
            panic!("expected class");
        };
        let ClassMember::Method { function, .. } = &class.body[0] else {
            panic!("expected constructor");
        };
        assert_eq!(function.kind, FunctionKind::Constructor);
        assert!(function.receiver.is_none());
    }

    #[test]
    fn test_arrow_receiver_rejected() {
        let (_, diags) = parse("const g = (this x) => x;");
        assert_eq!(diags.codes(), vec![DiagnosticCode::ArrowReceiver]);
        let (_, diags) = parse("const g = this => 1;");
        assert_eq!(diags.codes(), vec![DiagnosticCode::ArrowReceiver]);
    }

    #[test]
    fn test_every_receiver_error_is_reported() {
        let (_, diags) = parse(
            "class C { constructor(this) {} }\nconst a = (this) => 1;\nfunction f(x, this) {}",
        );
        assert_eq!(
            diags.codes(),
            vec![
                DiagnosticCode::ConstructorReceiver,
                DiagnosticCode::ArrowReceiver,
                DiagnosticCode::MisplacedReceiver
            ]
        );
    }

    #[test]
    fn test_receivers_on_methods_and_accessors() {
        let program = parse_ok(
            "class C { m(this self) {} get g(this s) { return 1; } set v(this s, x) {} static s(this) {} }",
        );
        let Stmt::Class(class) = &program.body[0] else {
            panic!("expected class");
        };
        let kinds: Vec<_> = class
            .body
            .iter()
            .map(|m| match m {
                ClassMember::Method { function, .. } => {
                    assert!(function.receiver.is_some());
                    function.kind
                }
                _ => panic!("expected method"),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                FunctionKind::Method,
                FunctionKind::Getter,
                FunctionKind::Setter,
                FunctionKind::Method
            ]
        );
    }

    #[test]
    fn test_object_method_receiver() {
        let program = parse_ok("const o = { m(this self, x) { return self; }, get: 1 };");
        let Stmt::Var(decl) = &program.body[0] else {
            panic!("expected declaration");
        };
        let Some(Expr::Object { props, .. }) = &decl.decls[0].init else {
            panic!("expected object");
        };
        assert!(matches!(&props[0], Prop::Method { function, .. } if function.receiver.is_some()));
        assert!(matches!(&props[1], Prop::KeyValue { .. }));
    }

    #[test]
    fn test_receiver_default_is_error() {
        let (_, diags) = parse("function f(this x = 1) {}");
        assert_eq!(diags.codes(), vec![DiagnosticCode::ParseError]);
    }

    #[test]
    fn test_arrow_forms() {
        let program = parse_ok("a = x => x; b = async (x, ...y) => { await x; }; c = () => ({});");
        assert_eq!(program.body.len(), 3);
    }

    #[test]
    fn test_typed_receiver_and_decorators() {
        let syntax = Syntax {
            typescript: true,
            decorators: true,
            ..Syntax::default()
        };
        let (program, diags) = Parser::new(
            "function f(@bound this el: HTMLElement, n: number): void {}",
            FileId(0),
            syntax,
        )
        .parse();
        assert!(diags.is_empty(), "{:?}", diags);
        let f = first_function(&program);
        let receiver = f.receiver.as_ref().unwrap();
        assert_eq!(receiver.decorators.len(), 1);
        assert_eq!(receiver.type_ann.as_ref().unwrap().text, "HTMLElement");
        assert_eq!(f.params[0].type_ann.as_ref().unwrap().text, "number");
        assert_eq!(f.return_type.as_ref().unwrap().text, "void");
    }

    #[test]
    fn test_typescript_this_parameter_is_unnamed_receiver() {
        let syntax = Syntax {
            typescript: true,
            ..Syntax::default()
        };
        let (program, diags) = Parser::new("function f(this: Window) {}", FileId(0), syntax).parse();
        assert!(diags.is_empty());
        let receiver = first_function(&program).receiver.as_ref().unwrap();
        assert!(matches!(receiver.binding, ReceiverBinding::Unnamed));
        assert_eq!(receiver.type_ann.as_ref().unwrap().text, "Window");
    }

    #[test]
    fn test_class_elements() {
        let program = parse_ok(
            "class A extends B { #x = 1; static y; static { init(); } [k]() {} async *gen() {} 'constructor'() {} }",
        );
        let Stmt::Class(class) = &program.body[0] else {
            panic!("expected class");
        };
        assert_eq!(class.body.len(), 6);
        assert!(class.super_class.is_some());
        assert!(matches!(&class.body[2], ClassMember::StaticBlock { .. }));
        assert!(matches!(
            &class.body[5],
            ClassMember::Method { function, .. } if function.kind == FunctionKind::Constructor
        ));
    }

    #[test]
    fn test_methods_are_strict() {
        let program = parse_ok("class A { m() {} }\nfunction f() {}");
        let Stmt::Class(class) = &program.body[0] else {
            panic!("expected class");
        };
        let ClassMember::Method { function, .. } = &class.body[0] else {
            panic!("expected method");
        };
        assert!(function.strict);
        let Stmt::Function(f) = &program.body[1] else {
            panic!("expected function");
        };
        assert!(!f.strict);
    }
}
