//! Expressions, by descending precedence: sequence, assignment,
//! conditional, binary, unary, postfix, call/member, primary.

use super::functions::FunctionHead;
use super::{PResult, ParseFailure, Parser};
use crate::ast::*;
use crate::token::TokenKind;
use thisarg_diagnostics::{DiagnosticCode, Span};

impl<'src> Parser<'src> {
    pub(super) fn parse_expression(&mut self) -> PResult<Expr> {
        let start = self.cur().span;
        let first = self.parse_assign()?;
        if !self.at(TokenKind::Comma) {
            return Ok(first);
        }

        let mut exprs = vec![first];
        while self.eat(TokenKind::Comma) {
            exprs.push(self.parse_assign()?);
        }
        Ok(Expr::Seq {
            exprs,
            span: self.span_from(start),
        })
    }

    pub(super) fn parse_assign(&mut self) -> PResult<Expr> {
        if self.is_arrow_ahead() {
            return self.parse_arrow();
        }
        if self.ctx.in_generator && self.at_contextual("yield") {
            return self.parse_yield();
        }

        let start = self.cur().span;
        let lhs = self.parse_conditional()?;

        let Some(op) = assign_op(self.kind()) else {
            return Ok(lhs);
        };
        self.bump();

        let target = if op == AssignOp::Assign
            && matches!(lhs, Expr::Array { .. } | Expr::Object { .. })
        {
            AssignTarget::Pat(self.expr_to_pat(lhs)?)
        } else if is_simple_target(&lhs) {
            AssignTarget::Simple(lhs)
        } else {
            self.error(
                DiagnosticCode::ParseError,
                lhs.span(),
                "invalid assignment target",
            );
            return Err(ParseFailure);
        };

        let value = self.parse_assign()?;
        Ok(Expr::Assign {
            op,
            target: Box::new(target),
            value: Box::new(value),
            span: self.span_from(start),
        })
    }

    fn parse_yield(&mut self) -> PResult<Expr> {
        let start = self.bump().span;
        let delegate = !self.cur().newline_before && self.eat(TokenKind::Star);

        let ends = self.cur().newline_before
            || matches!(
                self.kind(),
                TokenKind::RParen
                    | TokenKind::RBracket
                    | TokenKind::RBrace
                    | TokenKind::Comma
                    | TokenKind::Semicolon
                    | TokenKind::Colon
                    | TokenKind::TemplateMiddle
                    | TokenKind::TemplateTail
                    | TokenKind::Eof
            );
        let arg = if delegate || !ends {
            Some(Box::new(self.parse_assign()?))
        } else {
            None
        };

        Ok(Expr::Yield {
            arg,
            delegate,
            span: self.span_from(start),
        })
    }

    fn parse_conditional(&mut self) -> PResult<Expr> {
        let start = self.cur().span;
        let test = self.parse_binary(1)?;
        if !self.eat(TokenKind::Question) {
            return Ok(test);
        }

        let cons = self.with_in(|p| p.parse_assign())?;
        self.expect(TokenKind::Colon, "`:`")?;
        let alt = self.parse_assign()?;
        Ok(Expr::Cond {
            test: Box::new(test),
            cons: Box::new(cons),
            alt: Box::new(alt),
            span: self.span_from(start),
        })
    }

    /// Precedence climbing; `**` is right-associative.
    fn parse_binary(&mut self, min_prec: u8) -> PResult<Expr> {
        let start = self.cur().span;
        let mut left = self.parse_unary()?;

        loop {
            let op = match binary_op(self.kind()) {
                Some(BinaryOp::In) if self.ctx.no_in => break,
                Some(op) => op,
                None => break,
            };
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.bump();

            let next_min = if op == BinaryOp::Exp { prec } else { prec + 1 };
            let right = self.parse_binary(next_min)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span: self.span_from(start),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        let start = self.cur().span;
        let op = match self.kind() {
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Minus => Some(UnaryOp::Minus),
            TokenKind::Typeof => Some(UnaryOp::Typeof),
            TokenKind::Void => Some(UnaryOp::Void),
            TokenKind::Delete => Some(UnaryOp::Delete),
            _ => None,
        };
        if let Some(op) = op {
            self.bump();
            let arg = self.parse_unary()?;
            return Ok(Expr::Unary {
                op,
                arg: Box::new(arg),
                span: self.span_from(start),
            });
        }

        if matches!(self.kind(), TokenKind::PlusPlus | TokenKind::MinusMinus) {
            let op = if self.bump().kind == TokenKind::PlusPlus {
                UpdateOp::Increment
            } else {
                UpdateOp::Decrement
            };
            let arg = self.parse_unary()?;
            self.check_update_target(&arg)?;
            return Ok(Expr::Update {
                op,
                prefix: true,
                arg: Box::new(arg),
                span: self.span_from(start),
            });
        }

        if self.at_contextual("await")
            && (self.ctx.in_async || (self.syntax.module && !self.ctx.in_function))
        {
            self.bump();
            let arg = self.parse_unary()?;
            return Ok(Expr::Await {
                arg: Box::new(arg),
                span: self.span_from(start),
            });
        }

        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> PResult<Expr> {
        let start = self.cur().span;
        let expr = self.parse_lhs_expr()?;

        let token = self.cur();
        if matches!(token.kind, TokenKind::PlusPlus | TokenKind::MinusMinus) && !token.newline_before
        {
            self.check_update_target(&expr)?;
            self.bump();
            let op = if token.kind == TokenKind::PlusPlus {
                UpdateOp::Increment
            } else {
                UpdateOp::Decrement
            };
            return Ok(Expr::Update {
                op,
                prefix: false,
                arg: Box::new(expr),
                span: self.span_from(start),
            });
        }
        Ok(expr)
    }

    fn check_update_target(&mut self, expr: &Expr) -> PResult<()> {
        if is_simple_target(expr) {
            return Ok(());
        }
        self.error(
            DiagnosticCode::ParseError,
            expr.span(),
            "invalid increment/decrement operand",
        );
        Err(ParseFailure)
    }

    /// Call and member expressions, including `new`, `super` and `import`.
    pub(super) fn parse_lhs_expr(&mut self) -> PResult<Expr> {
        let start = self.cur().span;
        let expr = match self.kind() {
            TokenKind::New => self.parse_new()?,
            TokenKind::Super => Expr::Super(self.bump().span),
            TokenKind::Import => self.parse_import_expr()?,
            _ => self.parse_primary()?,
        };
        self.parse_call_tail(expr, start, true)
    }

    fn parse_call_tail(&mut self, mut expr: Expr, start: Span, allow_call: bool) -> PResult<Expr> {
        loop {
            match self.kind() {
                TokenKind::Dot => {
                    self.bump();
                    let prop = self.parse_member_prop()?;
                    expr = Expr::Member {
                        object: Box::new(expr),
                        prop,
                        optional: false,
                        span: self.span_from(start),
                    };
                }
                TokenKind::QuestionDot if allow_call => {
                    self.bump();
                    expr = match self.kind() {
                        TokenKind::LParen => {
                            let args = self.parse_arguments()?;
                            Expr::Call {
                                callee: Box::new(expr),
                                args,
                                optional: true,
                                span: self.span_from(start),
                            }
                        }
                        TokenKind::LBracket => {
                            let prop = self.parse_computed_member()?;
                            Expr::Member {
                                object: Box::new(expr),
                                prop,
                                optional: true,
                                span: self.span_from(start),
                            }
                        }
                        _ => {
                            let prop = self.parse_member_prop()?;
                            Expr::Member {
                                object: Box::new(expr),
                                prop,
                                optional: true,
                                span: self.span_from(start),
                            }
                        }
                    };
                }
                TokenKind::LBracket => {
                    let prop = self.parse_computed_member()?;
                    expr = Expr::Member {
                        object: Box::new(expr),
                        prop,
                        optional: false,
                        span: self.span_from(start),
                    };
                }
                TokenKind::LParen if allow_call => {
                    let args = self.parse_arguments()?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                        optional: false,
                        span: self.span_from(start),
                    };
                }
                TokenKind::Template | TokenKind::TemplateHead => {
                    let tpl = self.parse_template()?;
                    expr = Expr::TaggedTemplate {
                        tag: Box::new(expr),
                        tpl,
                        span: self.span_from(start),
                    };
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_member_prop(&mut self) -> PResult<MemberProp> {
        let token = self.cur();
        if token.kind == TokenKind::PrivateName {
            self.bump();
            let name = &self.text(token.span)[1..];
            return Ok(MemberProp::Private(Ident::new(name, token.span)));
        }
        Ok(MemberProp::Ident(self.parse_ident_name()?))
    }

    fn parse_computed_member(&mut self) -> PResult<MemberProp> {
        self.expect(TokenKind::LBracket, "`[`")?;
        let expr = self.with_in(|p| p.parse_expression())?;
        self.expect(TokenKind::RBracket, "`]`")?;
        Ok(MemberProp::Computed(Box::new(expr)))
    }

    fn parse_new(&mut self) -> PResult<Expr> {
        let start = self.bump().span;

        if self.eat(TokenKind::Dot) {
            let prop = self.parse_ident_name()?;
            if prop.name != "target" {
                self.error(
                    DiagnosticCode::ParseError,
                    prop.span,
                    "the only valid meta property for `new` is `new.target`",
                );
                return Err(ParseFailure);
            }
            if !self.ctx.in_function {
                self.error(
                    DiagnosticCode::ParseError,
                    start.to(prop.span),
                    "`new.target` is only valid inside functions",
                );
            }
            return Ok(Expr::MetaProp {
                meta: Ident::new("new", start),
                span: start.to(prop.span),
                prop,
            });
        }

        let callee_start = self.cur().span;
        let callee = match self.kind() {
            TokenKind::New => self.parse_new()?,
            TokenKind::Super => Expr::Super(self.bump().span),
            _ => self.parse_primary()?,
        };
        let callee = self.parse_call_tail(callee, callee_start, false)?;

        let args = if self.at(TokenKind::LParen) {
            Some(self.parse_arguments()?)
        } else {
            None
        };

        Ok(Expr::New {
            callee: Box::new(callee),
            args,
            span: self.span_from(start),
        })
    }

    fn parse_import_expr(&mut self) -> PResult<Expr> {
        let start = self.bump().span;
        if self.eat(TokenKind::Dot) {
            let prop = self.parse_ident_name()?;
            return Ok(Expr::MetaProp {
                meta: Ident::new("import", start),
                span: start.to(prop.span),
                prop,
            });
        }
        if !self.at(TokenKind::LParen) {
            return Err(self.unexpected("`(` or `.` after `import`"));
        }
        let args = self.parse_arguments()?;
        Ok(Expr::Call {
            callee: Box::new(Expr::Ident(Ident::new("import", start))),
            args,
            optional: false,
            span: self.span_from(start),
        })
    }

    fn parse_arguments(&mut self) -> PResult<Vec<ExprOrSpread>> {
        self.expect(TokenKind::LParen, "`(`")?;
        let mut args = Vec::new();
        while !self.at(TokenKind::RParen) && !self.at(TokenKind::Eof) {
            let spread = self.eat(TokenKind::Ellipsis);
            let expr = self.with_in(|p| p.parse_assign())?;
            args.push(ExprOrSpread { spread, expr });
            if !self.at(TokenKind::RParen) {
                self.expect(TokenKind::Comma, "`,` or `)`")?;
            }
        }
        self.expect(TokenKind::RParen, "`)`")?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        let token = self.cur();
        let span = token.span;

        match token.kind {
            TokenKind::This => {
                self.bump();
                Ok(Expr::This(span))
            }
            TokenKind::Identifier => {
                if self.at_contextual("async")
                    && self.peek_kind(1) == TokenKind::Function
                    && !self.peek_token(1).newline_before
                {
                    self.bump();
                    let f = self.parse_function(true, span, false)?;
                    return Ok(Expr::Function(Box::new(f)));
                }
                self.bump();
                Ok(Expr::Ident(Ident::new(self.text(span), span)))
            }
            TokenKind::Number | TokenKind::BigInt => {
                self.bump();
                let number = Number {
                    raw: self.text(span).to_string(),
                    span,
                };
                Ok(Expr::Lit(if token.kind == TokenKind::Number {
                    Lit::Num(number)
                } else {
                    Lit::BigInt(number)
                }))
            }
            TokenKind::String => Ok(Expr::Lit(Lit::Str(self.parse_string()?))),
            TokenKind::Regex => {
                self.bump();
                Ok(Expr::Lit(Lit::Regex {
                    raw: self.text(span).to_string(),
                    span,
                }))
            }
            TokenKind::True | TokenKind::False => {
                self.bump();
                Ok(Expr::Lit(Lit::Bool(token.kind == TokenKind::True, span)))
            }
            TokenKind::Null => {
                self.bump();
                Ok(Expr::Lit(Lit::Null(span)))
            }
            TokenKind::Template | TokenKind::TemplateHead => {
                Ok(Expr::Template(self.parse_template()?))
            }
            TokenKind::LParen => {
                self.bump();
                let expr = self.with_in(|p| p.parse_expression())?;
                self.expect(TokenKind::RParen, "`)`")?;
                Ok(Expr::Paren {
                    expr: Box::new(expr),
                    span: self.span_from(span),
                })
            }
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_object_literal(),
            TokenKind::Function => {
                let f = self.parse_function(false, span, false)?;
                Ok(Expr::Function(Box::new(f)))
            }
            TokenKind::Class => Ok(Expr::Class(Box::new(self.parse_class(Vec::new(), false)?))),
            TokenKind::At => {
                let decorators = self.parse_decorators()?;
                Ok(Expr::Class(Box::new(self.parse_class(decorators, false)?)))
            }
            _ => Err(self.unexpected("an expression")),
        }
    }

    fn parse_template(&mut self) -> PResult<Template> {
        let first = self.bump();
        let start = first.span;
        let text = self.text(first.span);

        if first.kind == TokenKind::Template {
            return Ok(Template {
                quasis: vec![template_chunk(text).to_string()],
                exprs: Vec::new(),
                span: start,
            });
        }

        let mut quasis = vec![template_chunk(text).to_string()];
        let mut exprs = Vec::new();
        loop {
            exprs.push(self.with_in(|p| p.parse_expression())?);
            let part = self.cur();
            match part.kind {
                TokenKind::TemplateMiddle | TokenKind::TemplateTail => {
                    self.bump();
                    quasis.push(template_chunk(self.text(part.span)).to_string());
                    if part.kind == TokenKind::TemplateTail {
                        break;
                    }
                }
                _ => return Err(self.unexpected("`}` closing a template substitution")),
            }
        }

        Ok(Template {
            quasis,
            exprs,
            span: self.span_from(start),
        })
    }

    fn parse_array_literal(&mut self) -> PResult<Expr> {
        let start = self.bump().span;
        let mut elems = Vec::new();

        while !self.at(TokenKind::RBracket) && !self.at(TokenKind::Eof) {
            if self.eat(TokenKind::Comma) {
                elems.push(None);
                continue;
            }
            let spread = self.eat(TokenKind::Ellipsis);
            let expr = self.with_in(|p| p.parse_assign())?;
            elems.push(Some(ExprOrSpread { spread, expr }));
            if !self.at(TokenKind::RBracket) {
                self.expect(TokenKind::Comma, "`,` or `]`")?;
            }
        }
        self.expect(TokenKind::RBracket, "`]`")?;

        Ok(Expr::Array {
            elems,
            span: self.span_from(start),
        })
    }

    fn parse_object_literal(&mut self) -> PResult<Expr> {
        let start = self.bump().span;
        let mut props = Vec::new();

        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            props.push(self.parse_object_prop()?);
            if !self.at(TokenKind::RBrace) {
                self.expect(TokenKind::Comma, "`,` or `}`")?;
            }
        }
        self.expect(TokenKind::RBrace, "`}`")?;

        Ok(Expr::Object {
            props,
            span: self.span_from(start),
        })
    }

    fn parse_object_prop(&mut self) -> PResult<Prop> {
        let start = self.cur().span;

        if self.eat(TokenKind::Ellipsis) {
            let expr = self.with_in(|p| p.parse_assign())?;
            return Ok(Prop::Spread {
                expr,
                span: self.span_from(start),
            });
        }

        let key_token = self.cur();
        let head = self.parse_method_head()?;

        if self.at(TokenKind::LParen)
            || head.is_async
            || head.is_generator
            || head.accessor.is_some()
        {
            let kind = head.accessor.unwrap_or(FunctionKind::Method);
            let function = self.parse_function_rest(FunctionHead {
                kind,
                name: None,
                bound_receiver: None,
                is_async: head.is_async,
                is_generator: head.is_generator,
                start: head.key.span(),
            })?;
            return Ok(Prop::Method {
                key: head.key,
                function: Box::new(function),
                span: self.span_from(start),
            });
        }

        if self.eat(TokenKind::Colon) {
            let value = self.with_in(|p| p.parse_assign())?;
            return Ok(Prop::KeyValue {
                key: head.key,
                value,
                span: self.span_from(start),
            });
        }

        let name = match head.key {
            PropKey::Ident(id) if key_token.kind == TokenKind::Identifier => id,
            other => return Err(self.unexpected_at(other.span(), "`:` after property key")),
        };

        let default = if self.eat(TokenKind::Eq) {
            Some(Box::new(self.with_in(|p| p.parse_assign())?))
        } else {
            None
        };
        let span = self.span_from(start);
        if default.is_some() {
            self.cover_initializers.push(span);
        }
        Ok(Prop::Shorthand {
            name,
            default,
            span,
        })
    }

    fn unexpected_at(&mut self, span: Span, expected: &str) -> ParseFailure {
        self.error(
            DiagnosticCode::ParseError,
            span,
            format!("expected {}", expected),
        );
        ParseFailure
    }

    /// `name`, `a.b.c`, `(expr)`, each optionally called.
    pub(super) fn parse_decorator_expr(&mut self) -> PResult<Expr> {
        let start = self.cur().span;
        let mut expr = if self.at(TokenKind::LParen) {
            self.bump();
            let inner = self.with_in(|p| p.parse_expression())?;
            self.expect(TokenKind::RParen, "`)`")?;
            Expr::Paren {
                expr: Box::new(inner),
                span: self.span_from(start),
            }
        } else {
            Expr::Ident(self.parse_binding_ident()?)
        };

        while self.eat(TokenKind::Dot) {
            let prop = self.parse_member_prop()?;
            expr = Expr::Member {
                object: Box::new(expr),
                prop,
                optional: false,
                span: self.span_from(start),
            };
        }

        if self.at(TokenKind::LParen) {
            let args = self.parse_arguments()?;
            expr = Expr::Call {
                callee: Box::new(expr),
                args,
                optional: false,
                span: self.span_from(start),
            };
        }
        Ok(expr)
    }
}

/// Raw text between the delimiters of one template token.
fn template_chunk(text: &str) -> &str {
    let text = text
        .strip_prefix('`')
        .or_else(|| text.strip_prefix('}'))
        .unwrap_or(text);
    text.strip_suffix("${")
        .or_else(|| text.strip_suffix('`'))
        .unwrap_or(text)
}

fn is_simple_target(expr: &Expr) -> bool {
    match expr {
        Expr::Ident(_) => true,
        Expr::Member { optional, .. } => !optional,
        Expr::Paren { expr, .. } => is_simple_target(expr),
        _ => false,
    }
}

fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    use TokenKind::*;
    Some(match kind {
        Eq => AssignOp::Assign,
        PlusEq => AssignOp::AddAssign,
        MinusEq => AssignOp::SubAssign,
        StarEq => AssignOp::MulAssign,
        SlashEq => AssignOp::DivAssign,
        PercentEq => AssignOp::ModAssign,
        StarStarEq => AssignOp::ExpAssign,
        ShlEq => AssignOp::LShiftAssign,
        ShrEq => AssignOp::RShiftAssign,
        UShrEq => AssignOp::ZeroFillRShiftAssign,
        AmpEq => AssignOp::BitAndAssign,
        PipeEq => AssignOp::BitOrAssign,
        CaretEq => AssignOp::BitXorAssign,
        AmpAmpEq => AssignOp::AndAssign,
        PipePipeEq => AssignOp::OrAssign,
        QuestionQuestionEq => AssignOp::NullishAssign,
        _ => return None,
    })
}

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    use TokenKind::*;
    Some(match kind {
        QuestionQuestion => BinaryOp::NullishCoalescing,
        PipePipe => BinaryOp::LogicalOr,
        AmpAmp => BinaryOp::LogicalAnd,
        Pipe => BinaryOp::BitOr,
        Caret => BinaryOp::BitXor,
        Amp => BinaryOp::BitAnd,
        EqEq => BinaryOp::EqEq,
        NotEq => BinaryOp::NotEq,
        EqEqEq => BinaryOp::EqEqEq,
        NotEqEq => BinaryOp::NotEqEq,
        Lt => BinaryOp::Lt,
        Gt => BinaryOp::Gt,
        LtEq => BinaryOp::LtEq,
        GtEq => BinaryOp::GtEq,
        In => BinaryOp::In,
        Instanceof => BinaryOp::InstanceOf,
        Shl => BinaryOp::LShift,
        Shr => BinaryOp::RShift,
        UShr => BinaryOp::ZeroFillRShift,
        Plus => BinaryOp::Add,
        Minus => BinaryOp::Sub,
        Star => BinaryOp::Mul,
        Slash => BinaryOp::Div,
        Percent => BinaryOp::Mod,
        StarStar => BinaryOp::Exp,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parser::tests::{parse, parse_ok};

    fn expr_of(source: &str) -> Expr {
        let program = parse_ok(source);
        match program.body.into_iter().next() {
            Some(Stmt::Expr { expr, .. }) => expr,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_precedence() {
        let Expr::Binary { op, right, .. } = expr_of("a + b * c;") else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Add);
        assert!(matches!(*right, Expr::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn test_exponent_is_right_associative() {
        let Expr::Binary { op, right, .. } = expr_of("a ** b ** c;") else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Exp);
        assert!(matches!(*right, Expr::Binary { op: BinaryOp::Exp, .. }));
    }

    #[test]
    fn test_new_target_and_calls() {
        let program = parse_ok("function F() { if (new.target) new a.B(1).c(); new X; }");
        let Stmt::Function(f) = &program.body[0] else {
            panic!("expected function");
        };
        let Stmt::If { test, cons, .. } = &f.body_stmts()[0] else {
            panic!("expected if");
        };
        assert!(matches!(test, Expr::MetaProp { meta, prop, .. } if meta.name == "new" && prop.name == "target"));
        let Stmt::Expr { expr: Expr::Call { callee, .. }, .. } = &**cons else {
            panic!("expected call");
        };
        assert!(matches!(&**callee, Expr::Member { object, .. } if matches!(**object, Expr::New { .. })));
    }

    #[test]
    fn test_new_target_outside_function() {
        let (_, diags) = parse("new.target;");
        assert!(diags.has_errors());
    }

    #[test]
    fn test_optional_chaining() {
        let expr = expr_of("a?.b?.[c]?.(d);");
        assert!(matches!(expr, Expr::Call { optional: true, .. }));
    }

    #[test]
    fn test_template_literal() {
        let Expr::Template(tpl) = expr_of("`a${b}c${d + 1}`;") else {
            panic!("expected template");
        };
        assert_eq!(tpl.quasis, vec!["a", "c", ""]);
        assert_eq!(tpl.exprs.len(), 2);
        let Expr::TaggedTemplate { .. } = expr_of("tag`x`;") else {
            panic!("expected tagged template");
        };
    }

    #[test]
    fn test_generators_and_async() {
        parse_ok("function* g() { const x = yield; yield* other(); }\nasync function h() { await p; }");
        // outside generators `yield` is an identifier
        parse_ok("var yield = 1;");
    }

    #[test]
    fn test_object_literal_forms() {
        let Expr::Paren { expr, .. } = expr_of("({ a, 'b': 1, [c]: 2, ...d, get e() { return 1; }, async f() {}, *g() {} });") else {
            panic!("expected parens");
        };
        let Expr::Object { props, .. } = *expr else {
            panic!("expected object");
        };
        assert_eq!(props.len(), 7);
    }

    #[test]
    fn test_this_is_an_expression() {
        assert!(matches!(expr_of("this;"), Expr::This(_)));
    }

    #[test]
    fn test_in_operator_inside_for_parens() {
        parse_ok("for (var i = ('x' in o) ? 1 : 0; i < 2; i++) {}");
    }
}
