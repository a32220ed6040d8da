//! Binding patterns and the expression-to-pattern reinterpretation used by
//! destructuring assignment.

use super::{PResult, ParseFailure, Parser};
use crate::ast::*;
use crate::token::TokenKind;
use thisarg_diagnostics::DiagnosticCode;

impl<'src> Parser<'src> {
    /// Identifier, array pattern or object pattern.
    pub(super) fn parse_binding_target(&mut self) -> PResult<Pat> {
        match self.kind() {
            TokenKind::LBracket => self.parse_array_pattern(),
            TokenKind::LBrace => self.parse_object_pattern(),
            _ => Ok(Pat::Ident(self.parse_binding_ident()?)),
        }
    }

    /// Target with an optional `= default`.
    fn parse_binding_element(&mut self) -> PResult<Pat> {
        let start = self.cur().span;
        let target = self.parse_binding_target()?;
        if self.eat(TokenKind::Eq) {
            let right = self.with_in(|p| p.parse_assign())?;
            return Ok(Pat::Assign {
                left: Box::new(target),
                right: Box::new(right),
                span: self.span_from(start),
            });
        }
        Ok(target)
    }

    fn parse_array_pattern(&mut self) -> PResult<Pat> {
        let start = self.expect(TokenKind::LBracket, "`[`")?.span;
        let mut elems = Vec::new();

        while !self.at(TokenKind::RBracket) && !self.at(TokenKind::Eof) {
            if self.eat(TokenKind::Comma) {
                elems.push(None);
                continue;
            }
            if self.at(TokenKind::Ellipsis) {
                let rest_start = self.bump().span;
                let arg = self.parse_binding_target()?;
                elems.push(Some(Pat::Rest {
                    arg: Box::new(arg),
                    span: self.span_from(rest_start),
                }));
            } else {
                elems.push(Some(self.parse_binding_element()?));
            }
            if !self.at(TokenKind::RBracket) {
                self.expect(TokenKind::Comma, "`,` or `]`")?;
            }
        }
        self.expect(TokenKind::RBracket, "`]`")?;

        Ok(Pat::Array {
            elems,
            span: self.span_from(start),
        })
    }

    fn parse_object_pattern(&mut self) -> PResult<Pat> {
        let start = self.expect(TokenKind::LBrace, "`{`")?.span;
        let mut props = Vec::new();

        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            let prop_start = self.cur().span;
            if self.eat(TokenKind::Ellipsis) {
                let arg = Pat::Ident(self.parse_binding_ident()?);
                props.push(ObjectPatProp::Rest {
                    arg,
                    span: self.span_from(prop_start),
                });
            } else {
                let shorthand = self.at(TokenKind::Identifier);
                let key = self.parse_prop_key()?;
                if self.eat(TokenKind::Colon) {
                    let value = self.parse_binding_element()?;
                    props.push(ObjectPatProp::KeyValue {
                        key,
                        value,
                        span: self.span_from(prop_start),
                    });
                } else {
                    let name = match key {
                        PropKey::Ident(id) if shorthand => id,
                        other => {
                            self.error(
                                DiagnosticCode::ParseError,
                                other.span(),
                                "expected `:` after a non-identifier pattern key",
                            );
                            return Err(ParseFailure);
                        }
                    };
                    let default = if self.eat(TokenKind::Eq) {
                        Some(self.with_in(|p| p.parse_assign())?)
                    } else {
                        None
                    };
                    props.push(ObjectPatProp::Shorthand {
                        name,
                        default,
                        span: self.span_from(prop_start),
                    });
                }
            }
            if !self.at(TokenKind::RBrace) {
                self.expect(TokenKind::Comma, "`,` or `}`")?;
            }
        }
        self.expect(TokenKind::RBrace, "`}`")?;

        Ok(Pat::Object {
            props,
            span: self.span_from(start),
        })
    }

    /// Reinterpret an already parsed expression as an assignment pattern
    /// (`[a, b] = ...`, `for ({x} of xs)`).
    pub(super) fn expr_to_pat(&mut self, expr: Expr) -> PResult<Pat> {
        let parenthesized_target = matches!(
            &expr,
            Expr::Paren { expr: inner, .. }
                if matches!(inner.unparen(), Expr::Ident(_) | Expr::Member { .. })
        );
        if parenthesized_target {
            return Ok(Pat::Expr(Box::new(expr)));
        }

        match expr {
            Expr::Ident(id) => Ok(Pat::Ident(id)),
            Expr::Member { optional: false, .. } => Ok(Pat::Expr(Box::new(expr))),
            Expr::Array { elems, span } => {
                let mut pats = Vec::with_capacity(elems.len());
                for elem in elems {
                    pats.push(match elem {
                        None => None,
                        Some(ExprOrSpread { spread: true, expr }) => {
                            let span = expr.span();
                            Some(Pat::Rest {
                                arg: Box::new(self.expr_to_pat(expr)?),
                                span,
                            })
                        }
                        Some(ExprOrSpread { expr, .. }) => Some(self.expr_to_pat(expr)?),
                    });
                }
                Ok(Pat::Array { elems: pats, span })
            }
            Expr::Object { props, span } => {
                let mut pats = Vec::with_capacity(props.len());
                for prop in props {
                    pats.push(match prop {
                        Prop::KeyValue { key, value, span } => ObjectPatProp::KeyValue {
                            key,
                            value: self.expr_to_pat(value)?,
                            span,
                        },
                        Prop::Shorthand {
                            name,
                            default,
                            span,
                        } => {
                            self.cover_initializers.retain(|s| *s != span);
                            ObjectPatProp::Shorthand {
                                name,
                                default: default.map(|d| *d),
                                span,
                            }
                        }
                        Prop::Spread { expr, span } => ObjectPatProp::Rest {
                            arg: self.expr_to_pat(expr)?,
                            span,
                        },
                        Prop::Method { span, .. } => {
                            self.error(
                                DiagnosticCode::ParseError,
                                span,
                                "a method cannot appear in a destructuring pattern",
                            );
                            return Err(ParseFailure);
                        }
                    });
                }
                Ok(Pat::Object { props: pats, span })
            }
            Expr::Assign {
                op: AssignOp::Assign,
                target,
                value,
                span,
            } => {
                let left = match *target {
                    AssignTarget::Pat(pat) => pat,
                    AssignTarget::Simple(expr) => self.expr_to_pat(expr)?,
                };
                Ok(Pat::Assign {
                    left: Box::new(left),
                    right: value,
                    span,
                })
            }
            other => {
                self.error(
                    DiagnosticCode::ParseError,
                    other.span(),
                    "invalid destructuring target",
                );
                Err(ParseFailure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parser::tests::{parse, parse_ok};
    use thisarg_diagnostics::DiagnosticCode;

    fn first_decl_target(program: &Program) -> &Pat {
        match &program.body[0] {
            Stmt::Var(decl) => &decl.decls[0].target,
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_binding_pattern_names() {
        let program = parse_ok("const { a, b: [c, , ...d], e: { f = 1 }, ...g } = obj;");
        let names: Vec<_> = first_decl_target(&program)
            .bound_names()
            .iter()
            .map(|id| id.name.clone())
            .collect();
        assert_eq!(names, vec!["a", "c", "d", "f", "g"]);
    }

    #[test]
    fn test_destructuring_assignment() {
        let program = parse_ok("[a, b.c] = [b.c, a];\n({ x, y = 2, ...rest } = point);");
        match &program.body[0] {
            Stmt::Expr {
                expr: Expr::Assign { target, .. },
                ..
            } => assert!(matches!(**target, AssignTarget::Pat(Pat::Array { .. }))),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_shorthand_initializer_outside_pattern() {
        let (_, diags) = parse("f({ a = 1 });");
        assert_eq!(diags.codes(), vec![DiagnosticCode::ParseError]);
        parse_ok("({ a = 1 } = {});");
    }

    #[test]
    fn test_invalid_assignment_target() {
        let (_, diags) = parse("a + b = c;");
        assert_eq!(diags.codes(), vec![DiagnosticCode::ParseError]);
    }
}
