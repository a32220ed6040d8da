//! Statements, declarations and module items.

use super::{Context, PResult, ParseFailure, Parser};
use crate::ast::*;
use crate::token::TokenKind;
use thisarg_diagnostics::DiagnosticCode;

impl<'src> Parser<'src> {
    /// Statement list up to `end`, honoring a leading `"use strict"`
    /// directive. Errors are reported and skipped.
    pub(super) fn parse_directives_and_statements(&mut self, end: TokenKind) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        let mut prologue = true;

        while !self.at(end) && !self.at(TokenKind::Eof) {
            let start_pos = self.pos;
            match self.parse_statement() {
                Ok(stmt) => {
                    if prologue {
                        match &stmt {
                            Stmt::Expr {
                                expr: Expr::Lit(Lit::Str(s)),
                                ..
                            } => {
                                if s.raw == "'use strict'" || s.raw == "\"use strict\"" {
                                    self.ctx.strict = true;
                                }
                            }
                            _ => prologue = false,
                        }
                    }
                    stmts.push(stmt);
                }
                Err(ParseFailure) => {
                    prologue = false;
                    self.synchronize(start_pos);
                }
            }
        }
        stmts
    }

    pub(super) fn parse_block(&mut self) -> PResult<Block> {
        let start = self.expect(TokenKind::LBrace, "`{`")?.span;
        let mut stmts = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            let start_pos = self.pos;
            match self.parse_statement() {
                Ok(stmt) => stmts.push(stmt),
                Err(ParseFailure) => self.synchronize(start_pos),
            }
        }
        self.expect(TokenKind::RBrace, "`}`")?;
        Ok(Block {
            stmts,
            span: self.span_from(start),
        })
    }

    pub(super) fn parse_statement(&mut self) -> PResult<Stmt> {
        let token = self.cur();
        let start = token.span;

        match token.kind {
            TokenKind::LBrace => Ok(Stmt::Block(self.parse_block()?)),
            TokenKind::Semicolon => {
                self.bump();
                Ok(Stmt::Empty(start))
            }
            TokenKind::Var => self.parse_var_statement(VarKind::Var),
            TokenKind::Const => self.parse_var_statement(VarKind::Const),
            TokenKind::Identifier if self.at_let_declaration() => {
                self.parse_var_statement(VarKind::Let)
            }
            TokenKind::Function => {
                let f = self.parse_function(false, start, true)?;
                Ok(Stmt::Function(Box::new(f)))
            }
            TokenKind::Identifier if self.at_async_function() => {
                self.bump();
                let f = self.parse_function(true, start, true)?;
                Ok(Stmt::Function(Box::new(f)))
            }
            TokenKind::Class => Ok(Stmt::Class(Box::new(self.parse_class(Vec::new(), true)?))),
            TokenKind::At => {
                let decorators = self.parse_decorators()?;
                if self.at(TokenKind::Export) {
                    return self.parse_export(decorators);
                }
                Ok(Stmt::Class(Box::new(self.parse_class(decorators, true)?)))
            }
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::While => {
                self.bump();
                let test = self.parse_paren_expression()?;
                let body = Box::new(self.parse_statement()?);
                Ok(Stmt::While {
                    test,
                    body,
                    span: self.span_from(start),
                })
            }
            TokenKind::Do => {
                self.bump();
                let body = Box::new(self.parse_statement()?);
                self.expect(TokenKind::While, "`while`")?;
                let test = self.parse_paren_expression()?;
                self.eat(TokenKind::Semicolon);
                Ok(Stmt::DoWhile {
                    body,
                    test,
                    span: self.span_from(start),
                })
            }
            TokenKind::Break | TokenKind::Continue => {
                self.bump();
                let label = if self.at(TokenKind::Identifier) && !self.cur().newline_before {
                    Some(self.parse_ident_name()?)
                } else {
                    None
                };
                self.consume_semicolon()?;
                let span = self.span_from(start);
                Ok(if token.kind == TokenKind::Break {
                    Stmt::Break { label, span }
                } else {
                    Stmt::Continue { label, span }
                })
            }
            TokenKind::Return => {
                self.bump();
                if !self.ctx.in_function {
                    self.error(
                        DiagnosticCode::ParseError,
                        start,
                        "`return` outside of a function",
                    );
                }
                let arg = if self.at_expression_end() {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.consume_semicolon()?;
                Ok(Stmt::Return {
                    arg,
                    span: self.span_from(start),
                })
            }
            TokenKind::Throw => {
                self.bump();
                if self.cur().newline_before {
                    self.error(
                        DiagnosticCode::ParseError,
                        self.cur().span,
                        "line break is not allowed after `throw`",
                    );
                    return Err(ParseFailure);
                }
                let arg = self.parse_expression()?;
                self.consume_semicolon()?;
                Ok(Stmt::Throw {
                    arg,
                    span: self.span_from(start),
                })
            }
            TokenKind::Try => self.parse_try(),
            TokenKind::Switch => self.parse_switch(),
            TokenKind::Debugger => {
                self.bump();
                self.consume_semicolon()?;
                Ok(Stmt::Debugger(self.span_from(start)))
            }
            TokenKind::With => {
                self.bump();
                self.parse_paren_expression()?;
                self.parse_statement()?;
                let span = self.span_from(start);
                self.error(
                    DiagnosticCode::ParseError,
                    span,
                    "`with` statements are not supported",
                );
                Ok(Stmt::Empty(span))
            }
            TokenKind::Import
                if !matches!(self.peek_kind(1), TokenKind::LParen | TokenKind::Dot) =>
            {
                self.check_module_item(start);
                self.parse_import()
            }
            TokenKind::Export => {
                self.check_module_item(start);
                self.parse_export(Vec::new())
            }
            TokenKind::Identifier if self.peek_kind(1) == TokenKind::Colon => {
                let label = self.parse_ident_name()?;
                self.bump();
                let body = Box::new(self.parse_statement()?);
                Ok(Stmt::Labeled {
                    label,
                    body,
                    span: self.span_from(start),
                })
            }
            _ => {
                let expr = self.parse_expression()?;
                self.consume_semicolon()?;
                Ok(Stmt::Expr {
                    expr,
                    span: self.span_from(start),
                })
            }
        }
    }

    fn check_module_item(&mut self, start: thisarg_diagnostics::Span) {
        if !self.syntax.module {
            self.error(
                DiagnosticCode::ParseError,
                start,
                "`import` and `export` are only allowed in modules",
            );
        } else if self.ctx.in_function {
            self.error(
                DiagnosticCode::ParseError,
                start,
                "`import` and `export` are only allowed at the top level",
            );
        }
    }

    /// `let` starts a declaration only when a binding follows it.
    fn at_let_declaration(&self) -> bool {
        self.at_contextual("let")
            && matches!(
                self.peek_kind(1),
                TokenKind::Identifier | TokenKind::LBracket | TokenKind::LBrace
            )
    }

    fn at_async_function(&self) -> bool {
        self.at_contextual("async")
            && self.peek_kind(1) == TokenKind::Function
            && !self.peek_token(1).newline_before
    }

    fn at_expression_end(&self) -> bool {
        let token = self.cur();
        token.newline_before
            || matches!(
                token.kind,
                TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
            )
    }

    fn parse_paren_expression(&mut self) -> PResult<Expr> {
        self.expect(TokenKind::LParen, "`(`")?;
        let expr = self.with_in(|p| p.parse_expression())?;
        self.expect(TokenKind::RParen, "`)`")?;
        Ok(expr)
    }

    fn parse_var_statement(&mut self, kind: VarKind) -> PResult<Stmt> {
        let decl = self.parse_var_decl(kind)?;
        self.consume_semicolon()?;
        Ok(Stmt::Var(decl))
    }

    /// Declarator list, positioned at `var`, `let` or `const`.
    fn parse_var_decl(&mut self, kind: VarKind) -> PResult<VarDecl> {
        let start = self.bump().span;
        let mut decls = Vec::new();
        loop {
            let decl_start = self.cur().span;
            let target = self.parse_binding_target()?;
            if self.syntax.typescript {
                // definite assignment marker
                self.eat(TokenKind::Bang);
            }
            let type_ann = self.parse_type_annotation()?;
            let init = if self.eat(TokenKind::Eq) {
                Some(self.parse_assign()?)
            } else {
                None
            };
            decls.push(VarDeclarator {
                target,
                type_ann,
                init,
                span: self.span_from(decl_start),
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok(VarDecl {
            kind,
            decls,
            span: self.span_from(start),
        })
    }

    fn parse_if(&mut self) -> PResult<Stmt> {
        let start = self.bump().span;
        let test = self.parse_paren_expression()?;
        let cons = Box::new(self.parse_statement()?);
        let alt = if self.eat(TokenKind::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(Stmt::If {
            test,
            cons,
            alt,
            span: self.span_from(start),
        })
    }

    fn parse_for(&mut self) -> PResult<Stmt> {
        let start = self.bump().span;
        let is_await = if self.at_contextual("await") {
            self.bump();
            true
        } else {
            false
        };
        self.expect(TokenKind::LParen, "`(`")?;

        let head_ctx = Context {
            no_in: true,
            ..self.ctx
        };

        let init = if self.at(TokenKind::Semicolon) {
            None
        } else if self.at(TokenKind::Var) || self.at(TokenKind::Const) || self.at_let_declaration() {
            let kind = match self.kind() {
                TokenKind::Var => VarKind::Var,
                TokenKind::Const => VarKind::Const,
                _ => VarKind::Let,
            };
            let decl = self.with_context(head_ctx, |p| p.parse_var_decl(kind))?;
            let single = decl.decls.len() == 1 && decl.decls[0].init.is_none();
            if single && (self.at(TokenKind::In) || self.at_contextual("of")) {
                return self.parse_for_in_of(start, ForHead::Var(decl), is_await);
            }
            Some(ForInit::Var(decl))
        } else {
            let expr = self.with_context(head_ctx, |p| p.parse_expression())?;
            if self.at(TokenKind::In) || self.at_contextual("of") {
                let pat = self.expr_to_pat(expr)?;
                return self.parse_for_in_of(start, ForHead::Pat(pat), is_await);
            }
            Some(ForInit::Expr(expr))
        };

        self.expect(TokenKind::Semicolon, "`;`")?;
        let test = if self.at(TokenKind::Semicolon) {
            None
        } else {
            Some(self.with_in(|p| p.parse_expression())?)
        };
        self.expect(TokenKind::Semicolon, "`;`")?;
        let update = if self.at(TokenKind::RParen) {
            None
        } else {
            Some(self.with_in(|p| p.parse_expression())?)
        };
        self.expect(TokenKind::RParen, "`)`")?;
        let body = Box::new(self.parse_statement()?);

        Ok(Stmt::For {
            init,
            test,
            update,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_for_in_of(
        &mut self,
        start: thisarg_diagnostics::Span,
        left: ForHead,
        is_await: bool,
    ) -> PResult<Stmt> {
        let is_of = self.at_contextual("of");
        self.bump();
        let right = if is_of {
            self.with_in(|p| p.parse_assign())?
        } else {
            self.with_in(|p| p.parse_expression())?
        };
        self.expect(TokenKind::RParen, "`)`")?;
        let body = Box::new(self.parse_statement()?);
        let span = self.span_from(start);

        if is_of {
            Ok(Stmt::ForOf {
                left,
                right,
                body,
                is_await,
                span,
            })
        } else {
            Ok(Stmt::ForIn {
                left,
                right,
                body,
                span,
            })
        }
    }

    fn parse_try(&mut self) -> PResult<Stmt> {
        let start = self.bump().span;
        let block = self.parse_block()?;

        let handler = if self.at(TokenKind::Catch) {
            let catch_start = self.bump().span;
            let param = if self.eat(TokenKind::LParen) {
                let pat = self.parse_binding_target()?;
                self.parse_type_annotation()?;
                self.expect(TokenKind::RParen, "`)`")?;
                Some(pat)
            } else {
                None
            };
            let body = self.parse_block()?;
            Some(CatchClause {
                param,
                body,
                span: self.span_from(catch_start),
            })
        } else {
            None
        };

        let finalizer = if self.eat(TokenKind::Finally) {
            Some(self.parse_block()?)
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return Err(self.unexpected("`catch` or `finally`"));
        }

        Ok(Stmt::Try {
            block,
            handler,
            finalizer,
            span: self.span_from(start),
        })
    }

    fn parse_switch(&mut self) -> PResult<Stmt> {
        let start = self.bump().span;
        let discriminant = self.parse_paren_expression()?;
        self.expect(TokenKind::LBrace, "`{`")?;

        let mut cases = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            let case_start = self.cur().span;
            let test = if self.eat(TokenKind::Case) {
                Some(self.with_in(|p| p.parse_expression())?)
            } else {
                self.expect(TokenKind::Default, "`case` or `default`")?;
                None
            };
            self.expect(TokenKind::Colon, "`:`")?;

            let mut body = Vec::new();
            while !matches!(
                self.kind(),
                TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::Eof
            ) {
                let start_pos = self.pos;
                match self.parse_statement() {
                    Ok(stmt) => body.push(stmt),
                    Err(ParseFailure) => self.synchronize(start_pos),
                }
            }
            cases.push(SwitchCase {
                test,
                body,
                span: self.span_from(case_start),
            });
        }
        self.expect(TokenKind::RBrace, "`}`")?;

        Ok(Stmt::Switch {
            discriminant,
            cases,
            span: self.span_from(start),
        })
    }

    // ── modules ─────────────────────────────────────────────────────────────

    fn parse_import(&mut self) -> PResult<Stmt> {
        let start = self.bump().span;
        let mut specifiers = Vec::new();

        if !self.at(TokenKind::String) {
            if self.at(TokenKind::Identifier) {
                specifiers.push(ImportSpecifier::Default(self.parse_binding_ident()?));
                if !self.eat(TokenKind::Comma) {
                    return self.finish_import(start, specifiers);
                }
            }

            if self.eat(TokenKind::Star) {
                self.expect_contextual("as")?;
                specifiers.push(ImportSpecifier::Namespace(self.parse_binding_ident()?));
            } else {
                self.expect(TokenKind::LBrace, "`{`")?;
                while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
                    let imported = self.parse_ident_name()?;
                    let spec = if self.at_contextual("as") {
                        self.bump();
                        ImportSpecifier::Named {
                            imported: Some(imported),
                            local: self.parse_binding_ident()?,
                        }
                    } else {
                        ImportSpecifier::Named {
                            imported: None,
                            local: imported,
                        }
                    };
                    specifiers.push(spec);
                    if !self.at(TokenKind::RBrace) {
                        self.expect(TokenKind::Comma, "`,` or `}`")?;
                    }
                }
                self.expect(TokenKind::RBrace, "`}`")?;
            }
        }

        self.finish_import(start, specifiers)
    }

    fn finish_import(
        &mut self,
        start: thisarg_diagnostics::Span,
        specifiers: Vec<ImportSpecifier>,
    ) -> PResult<Stmt> {
        if !specifiers.is_empty() {
            self.expect_contextual("from")?;
        }
        let source = self.parse_string()?;
        self.consume_semicolon()?;
        Ok(Stmt::Import(ImportDecl {
            specifiers,
            source,
            span: self.span_from(start),
        }))
    }

    fn expect_contextual(&mut self, word: &str) -> PResult<()> {
        if self.at_contextual(word) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected(&format!("`{}`", word)))
        }
    }

    fn parse_export(&mut self, decorators: Vec<Decorator>) -> PResult<Stmt> {
        let start = decorators
            .first()
            .map(|d| d.span)
            .unwrap_or_else(|| self.cur().span);
        self.expect(TokenKind::Export, "`export`")?;

        let decl = match self.kind() {
            TokenKind::Default => {
                self.bump();
                let item_start = self.cur().span;
                if self.at(TokenKind::Function) {
                    let f = self.parse_function(false, item_start, false)?;
                    ExportDecl::DefaultDecl {
                        decl: Box::new(Stmt::Function(Box::new(f))),
                        span: self.span_from(start),
                    }
                } else if self.at_async_function() {
                    self.bump();
                    let f = self.parse_function(true, item_start, false)?;
                    ExportDecl::DefaultDecl {
                        decl: Box::new(Stmt::Function(Box::new(f))),
                        span: self.span_from(start),
                    }
                } else if self.at(TokenKind::Class) || self.at(TokenKind::At) {
                    let mut decorators = decorators;
                    decorators.extend(self.parse_decorators()?);
                    let class = self.parse_class(decorators, false)?;
                    ExportDecl::DefaultDecl {
                        decl: Box::new(Stmt::Class(Box::new(class))),
                        span: self.span_from(start),
                    }
                } else {
                    let expr = self.with_in(|p| p.parse_assign())?;
                    self.consume_semicolon()?;
                    ExportDecl::DefaultExpr {
                        expr,
                        span: self.span_from(start),
                    }
                }
            }
            TokenKind::Star => {
                self.bump();
                let exported = if self.at_contextual("as") {
                    self.bump();
                    Some(self.parse_ident_name()?)
                } else {
                    None
                };
                self.expect_contextual("from")?;
                let source = self.parse_string()?;
                self.consume_semicolon()?;
                ExportDecl::All {
                    exported,
                    source,
                    span: self.span_from(start),
                }
            }
            TokenKind::LBrace => {
                self.bump();
                let mut specifiers = Vec::new();
                while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
                    let local = self.parse_ident_name()?;
                    let exported = if self.at_contextual("as") {
                        self.bump();
                        Some(self.parse_ident_name()?)
                    } else {
                        None
                    };
                    specifiers.push(ExportSpecifier { local, exported });
                    if !self.at(TokenKind::RBrace) {
                        self.expect(TokenKind::Comma, "`,` or `}`")?;
                    }
                }
                self.expect(TokenKind::RBrace, "`}`")?;
                let source = if self.at_contextual("from") {
                    self.bump();
                    Some(self.parse_string()?)
                } else {
                    None
                };
                self.consume_semicolon()?;
                ExportDecl::Named {
                    specifiers,
                    source,
                    span: self.span_from(start),
                }
            }
            TokenKind::Class | TokenKind::At => {
                let mut decorators = decorators;
                decorators.extend(self.parse_decorators()?);
                let class = self.parse_class(decorators, true)?;
                ExportDecl::Decl {
                    decl: Box::new(Stmt::Class(Box::new(class))),
                    span: self.span_from(start),
                }
            }
            TokenKind::Var | TokenKind::Const | TokenKind::Function => {
                let decl = self.parse_statement()?;
                ExportDecl::Decl {
                    decl: Box::new(decl),
                    span: self.span_from(start),
                }
            }
            TokenKind::Identifier if self.at_let_declaration() || self.at_async_function() => {
                let decl = self.parse_statement()?;
                ExportDecl::Decl {
                    decl: Box::new(decl),
                    span: self.span_from(start),
                }
            }
            _ => return Err(self.unexpected("a declaration after `export`")),
        };

        Ok(Stmt::Export(decl))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parser::tests::{parse, parse_ok};
    use crate::parser::Parser;
    use crate::Syntax;
    use thisarg_diagnostics::{DiagnosticCode, FileId};

    fn parse_module(source: &str) -> Program {
        let syntax = Syntax {
            module: true,
            ..Syntax::default()
        };
        let (program, diags) = Parser::new(source, FileId(0), syntax).parse();
        assert!(diags.is_empty(), "{:?}", diags);
        program
    }

    #[test]
    fn test_control_flow_statements() {
        let program = parse_ok(
            r#"
            outer: for (let i = 0, j = 1; i < n; i++) {
                if (i in obj) continue outer; else break;
            }
            for (const k in obj) {}
            for ([a, b] of pairs) {}
            while (x) x--;
            do { y++ } while (y < 3)
            switch (v) { case 1: f(); break; default: g(); }
            try { risky(); } catch ({ message }) { log(message); } finally { done(); }
            try { a(); } catch { }
            "#,
        );
        assert_eq!(program.body.len(), 8);
        assert!(matches!(program.body[0], Stmt::Labeled { .. }));
        assert!(matches!(program.body[1], Stmt::ForIn { .. }));
        assert!(matches!(
            program.body[2],
            Stmt::ForOf {
                left: ForHead::Pat(Pat::Array { .. }),
                ..
            }
        ));
    }

    #[test]
    fn test_asi() {
        let program = parse_ok("let a = 1\nlet b = a\n++b\nreturnValue()");
        assert_eq!(program.body.len(), 4);
    }

    #[test]
    fn test_return_is_restricted() {
        let program = parse_ok("function f() { return\n42 }");
        let Stmt::Function(f) = &program.body[0] else {
            panic!("expected function");
        };
        assert!(matches!(f.body_stmts()[0], Stmt::Return { arg: None, .. }));
        assert_eq!(f.body_stmts().len(), 2);
    }

    #[test]
    fn test_return_outside_function() {
        let (_, diags) = parse("return 1;");
        assert_eq!(diags.codes(), vec![DiagnosticCode::ParseError]);
    }

    #[test]
    fn test_let_as_identifier() {
        let program = parse_ok("let = 5; let\n(x);");
        assert!(matches!(program.body[0], Stmt::Expr { .. }));
    }

    #[test]
    fn test_module_items() {
        let program = parse_module(
            r#"
            import def, { a as b, c } from "./m.js";
            import * as ns from "ns";
            import "side-effect";
            export function f(this el) {}
            export default class {}
            export { b as default, c };
            export * as all from "./all.js";
            export const x = import.meta.url;
            "#,
        );
        assert_eq!(program.body.len(), 8);
        let Stmt::Import(import) = &program.body[0] else {
            panic!("expected import");
        };
        assert_eq!(import.specifiers.len(), 3);
        assert_eq!(import.source.value, "./m.js");
    }

    #[test]
    fn test_import_in_script_is_error() {
        let (_, diags) = parse("import x from 'y';");
        assert_eq!(diags.codes(), vec![DiagnosticCode::ParseError]);
    }

    #[test]
    fn test_nested_use_strict() {
        let program = parse_ok("function f() { 'use strict'; return 1; }");
        let Stmt::Function(f) = &program.body[0] else {
            panic!("expected function");
        };
        assert!(f.strict);
        assert!(!program.strict);
    }
}
