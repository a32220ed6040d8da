//! Recursive-descent parser over the token vector produced by the lexer.
//!
//! Errors never abort the parse. Each one becomes a diagnostic, the failing
//! production unwinds with [`ParseFailure`], and the statement loop
//! resynchronizes at the next statement boundary.

mod expressions;
mod functions;
mod patterns;
mod statements;

use crate::ast::{Decorator, Ident, Program, ProgramKind, Str, TypeAnn};
use crate::lexer::{Lexer, LexerOptions};
use crate::token::{Token, TokenKind};
use crate::Syntax;
use thisarg_diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, FileId, Span};

/// Marker for a production that already reported its error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ParseFailure;

pub(crate) type PResult<T> = Result<T, ParseFailure>;

/// Flags that change meaning at function and class boundaries.
#[derive(Debug, Clone, Copy, Default)]
struct Context {
    strict: bool,
    in_function: bool,
    in_async: bool,
    in_generator: bool,
    /// `in` is not a binary operator (for-statement heads)
    no_in: bool,
}

pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    syntax: Syntax,
    ctx: Context,
    /// `{ a = 1 }` shorthands not yet claimed by a destructuring pattern
    cover_initializers: Vec<Span>,
    diagnostics: Diagnostics,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, file_id: FileId, syntax: Syntax) -> Self {
        let (tokens, lex_errors) = Lexer::new(
            source,
            file_id,
            LexerOptions {
                bind_operator: syntax.bind_operator,
            },
        )
        .tokenize();

        let mut diagnostics = Diagnostics::new();
        for (error, span) in lex_errors {
            diagnostics.push(
                Diagnostic::error(DiagnosticCode::ParseError, error.to_string())
                    .with_span(span)
                    .build(),
            );
        }

        Self {
            source,
            tokens,
            pos: 0,
            syntax,
            ctx: Context {
                strict: syntax.module,
                ..Context::default()
            },
            cover_initializers: Vec::new(),
            diagnostics,
        }
    }

    /// Parse the whole unit. Always produces a program; check the returned
    /// diagnostics for errors.
    pub fn parse(mut self) -> (Program, Diagnostics) {
        let start = self.cur().span;
        let kind = if self.syntax.module {
            ProgramKind::Module
        } else {
            ProgramKind::Script
        };

        let body = self.parse_directives_and_statements(TokenKind::Eof);
        for span in std::mem::take(&mut self.cover_initializers) {
            self.error(
                DiagnosticCode::ParseError,
                span,
                "shorthand property initializers are only valid in destructuring patterns",
            );
        }
        let strict = self.ctx.strict;
        let span = start.to(self.cur().span);

        log::debug!(
            "parsed {} top-level statements ({} diagnostics)",
            body.len(),
            self.diagnostics.len()
        );

        (
            Program {
                kind,
                body,
                strict,
                span,
            },
            self.diagnostics,
        )
    }

    // ── token cursor ────────────────────────────────────────────────────────

    fn cur(&self) -> Token {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_token(&self, n: usize) -> Token {
        self.tokens[(self.pos + n).min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> TokenKind {
        self.cur().kind
    }

    fn peek_kind(&self, n: usize) -> TokenKind {
        self.peek_token(n).kind
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    fn bump(&mut self) -> Token {
        let token = self.cur();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> PResult<Token> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            Err(self.unexpected(what))
        }
    }

    /// Span of the most recently consumed token.
    fn prev_span(&self) -> Span {
        if self.pos == 0 {
            return self.cur().span.shrink_to_lo();
        }
        self.tokens[self.pos - 1].span
    }

    fn span_from(&self, start: Span) -> Span {
        start.to(self.prev_span())
    }

    fn text(&self, span: Span) -> &'src str {
        &self.source[span.start as usize..span.end as usize]
    }

    fn cur_text(&self) -> &'src str {
        self.text(self.cur().span)
    }

    /// Identifier token with exactly this text (contextual keywords).
    fn at_contextual(&self, word: &str) -> bool {
        self.at(TokenKind::Identifier) && self.cur_text() == word
    }

    // ── diagnostics ─────────────────────────────────────────────────────────

    fn error(&mut self, code: DiagnosticCode, span: Span, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::error(code, message).with_span(span).build());
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Report the current token as unexpected and return the failure marker.
    fn unexpected(&mut self, expected: &str) -> ParseFailure {
        let token = self.cur();
        let found = if token.kind == TokenKind::Eof {
            "end of input".to_string()
        } else {
            format!("`{}`", self.text(token.span))
        };
        self.error(
            DiagnosticCode::ParseError,
            token.span,
            format!("expected {}, found {}", expected, found),
        );
        ParseFailure
    }

    /// Skip to the end of the current statement after an error.
    fn synchronize(&mut self, start_pos: usize) {
        if self.pos == start_pos {
            self.bump();
        }
        let mut depth = 0usize;
        loop {
            let token = self.cur();
            match token.kind {
                TokenKind::Eof => return,
                TokenKind::Semicolon if depth == 0 => {
                    self.bump();
                    return;
                }
                TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RBrace if depth == 0 => return,
                TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => {
                    depth = depth.saturating_sub(1);
                }
                _ if depth == 0 && token.newline_before => return,
                _ => {}
            }
            self.bump();
        }
    }

    /// Automatic semicolon insertion.
    fn consume_semicolon(&mut self) -> PResult<()> {
        if self.eat(TokenKind::Semicolon) {
            return Ok(());
        }
        let token = self.cur();
        if token.kind == TokenKind::RBrace || token.kind == TokenKind::Eof || token.newline_before {
            return Ok(());
        }
        Err(self.unexpected("`;`"))
    }

    /// Run `f` with a modified context, restoring the old one afterwards.
    fn with_context<T>(&mut self, ctx: Context, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.ctx, ctx);
        let result = f(self);
        self.ctx = saved;
        result
    }

    /// Re-allow `in` inside brackets and other grouping.
    fn with_in<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let ctx = Context {
            no_in: false,
            ..self.ctx
        };
        self.with_context(ctx, f)
    }

    // ── shared leaves ───────────────────────────────────────────────────────

    /// A binding identifier. Contextual keywords are accepted.
    fn parse_binding_ident(&mut self) -> PResult<Ident> {
        if self.at(TokenKind::Identifier) {
            let token = self.bump();
            let name = self.text(token.span);
            if self.ctx.strict && matches!(name, "eval" | "arguments") {
                self.error(
                    DiagnosticCode::ParseError,
                    token.span,
                    format!("`{}` cannot be bound in strict mode code", name),
                );
            }
            return Ok(Ident::new(name, token.span));
        }
        Err(self.unexpected("an identifier"))
    }

    /// Any identifier name, reserved words included (property names,
    /// export aliases).
    fn parse_ident_name(&mut self) -> PResult<Ident> {
        if self.kind().is_identifier_name() {
            let token = self.bump();
            return Ok(Ident::new(self.text(token.span), token.span));
        }
        Err(self.unexpected("a name"))
    }

    fn parse_string(&mut self) -> PResult<Str> {
        let token = self.expect(TokenKind::String, "a string literal")?;
        let raw = self.text(token.span);
        Ok(Str {
            value: decode_string(raw),
            raw: raw.to_string(),
            span: token.span,
        })
    }

    /// `@expr` decorators, when the dialect has them.
    fn parse_decorators(&mut self) -> PResult<Vec<Decorator>> {
        let mut decorators = Vec::new();
        while self.at(TokenKind::At) {
            let start = self.bump().span;
            if !self.syntax.decorators {
                self.error(
                    DiagnosticCode::ParseError,
                    start,
                    "decorators are not enabled for this dialect",
                );
            }
            let expr = self.parse_decorator_expr()?;
            decorators.push(Decorator {
                expr,
                span: self.span_from(start),
            });
        }
        Ok(decorators)
    }

    /// `: Type` when the dialect has type annotations.
    fn parse_type_annotation(&mut self) -> PResult<Option<TypeAnn>> {
        if !self.syntax.typescript || !self.at(TokenKind::Colon) {
            return Ok(None);
        }
        self.bump();
        self.skip_type(false).map(Some)
    }

    /// Consume a type and return its source text. Types are not modelled;
    /// only their extent matters. `return_position` stops at a `{` that
    /// starts a function body.
    fn skip_type(&mut self, return_position: bool) -> PResult<TypeAnn> {
        use TokenKind::*;

        let first = self.cur();
        let mut depth: usize = 0;
        let mut last: Option<Token> = None;

        loop {
            let token = self.cur();
            if depth == 0 {
                let stop = match token.kind {
                    Eof | Comma | RParen | RBracket | RBrace | Eq | Semicolon => true,
                    LBrace if return_position => last.map_or(false, |t| !continues_type(t.kind)),
                    _ => false,
                };
                let asi = token.newline_before
                    && last.map_or(false, |t| !continues_type(t.kind))
                    && !matches!(token.kind, Pipe | Amp | Arrow | Dot | LBracket);
                if stop || asi {
                    break;
                }
            }
            match token.kind {
                LParen | LBracket | LBrace | Lt => depth += 1,
                RParen | RBracket | RBrace | Gt => depth = depth.saturating_sub(1),
                Shr => depth = depth.saturating_sub(2),
                UShr => depth = depth.saturating_sub(3),
                Eof => break,
                _ => {}
            }
            last = Some(self.bump());
        }

        match last {
            Some(end) => {
                let span = first.span.to(end.span);
                Ok(TypeAnn {
                    text: self.text(span).to_string(),
                    span,
                })
            }
            None => Err(self.unexpected("a type")),
        }
    }
}

/// Tokens after which a type continues on the next line.
fn continues_type(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        Colon | Pipe | Amp | Arrow | Lt | Comma | LParen | LBracket | LBrace | Question | Dot
    )
}

/// Decode the escapes of a quoted string literal.
pub(crate) fn decode_string(raw: &str) -> String {
    let inner = raw
        .get(1..raw.len().saturating_sub(1).max(1))
        .unwrap_or_default();
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                if let Some(c) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    out.push(c);
                }
            }
            Some('u') => {
                let hex: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    chars.by_ref().take_while(|&c| c != '}').collect()
                } else {
                    chars.by_ref().take(4).collect()
                };
                if let Some(c) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    out.push(c);
                }
            }
            // line continuation
            Some('\r') => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            Some('\n') | Some('\u{2028}') | Some('\u{2029}') => {}
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;

    pub(crate) fn parse(source: &str) -> (Program, Diagnostics) {
        Parser::new(source, FileId(0), Syntax::default()).parse()
    }

    pub(crate) fn parse_ok(source: &str) -> Program {
        let (program, diags) = parse(source);
        assert!(
            !diags.has_errors(),
            "unexpected diagnostics for {:?}: {:?}",
            source,
            diags.iter().map(|d| &d.message).collect::<Vec<_>>()
        );
        program
    }

    #[test]
    fn test_decode_string_escapes() {
        assert_eq!(decode_string(r#""a\nb""#), "a\nb");
        assert_eq!(decode_string(r#"'\x41B\u{43}'"#), "ABC");
        assert_eq!(decode_string(r#""it\'s""#), "it's");
    }

    #[test]
    fn test_recovers_and_reports_every_error() {
        let (program, diags) = parse("var = 1;\nfoo();\nvar ) x;\nbar();");
        assert_eq!(diags.error_count(), 2);
        let calls = program
            .body
            .iter()
            .filter(|s| matches!(s, Stmt::Expr { expr: Expr::Call { .. }, .. }))
            .count();
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_use_strict_directive() {
        assert!(parse_ok("'use strict';\nfoo();").strict);
        assert!(!parse_ok("foo();\n'use strict';").strict);
    }

    #[test]
    fn test_module_is_strict() {
        let syntax = Syntax {
            module: true,
            ..Syntax::default()
        };
        let (program, diags) = Parser::new("export const x = 1;", FileId(0), syntax).parse();
        assert!(diags.is_empty());
        assert!(program.strict);
        assert_eq!(program.kind, ProgramKind::Module);
    }

    #[test]
    fn test_lex_errors_become_parse_diagnostics() {
        let (_, diags) = parse("let s = 'abc\n");
        assert_eq!(diags.codes(), vec![DiagnosticCode::ParseError]);
    }
}
