//! JavaScript lexer.
//!
//! Tokenizes a whole compilation unit up front. Template literals are split
//! into head/middle/tail tokens with the help of a brace stack, and a `/`
//! is read as a regular expression whenever the previous token cannot end an
//! operand.

use crate::token::{Token, TokenKind};
use thiserror::Error;
use thisarg_diagnostics::{FileId, Span};

/// Lexical errors. The lexer records them and keeps scanning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated template literal")]
    UnterminatedTemplate,
    #[error("unterminated regular expression literal")]
    UnterminatedRegex,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("invalid numeric literal")]
    InvalidNumber,
    #[error("unexpected character `{0}`")]
    UnexpectedChar(char),
}

/// Lexer options.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexerOptions {
    /// Produce [`TokenKind::ColonColon`] for `::`.
    pub bind_operator: bool,
}

pub struct Lexer<'src> {
    source: &'src str,
    bytes: &'src [u8],
    pos: usize,
    file_id: FileId,
    options: LexerOptions,
    /// One entry per open `{`; `true` when it was opened by `${` in a template.
    braces: Vec<bool>,
    newline_before: bool,
    last_kind: Option<TokenKind>,
    errors: Vec<(LexError, Span)>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, file_id: FileId, options: LexerOptions) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            file_id,
            options,
            braces: Vec::new(),
            newline_before: false,
            last_kind: None,
            errors: Vec::new(),
        }
    }

    /// Tokenize everything. The returned vector always ends with
    /// [`TokenKind::Eof`].
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<(LexError, Span)>) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            tokens.push(token);
            if token.kind == TokenKind::Eof {
                break;
            }
        }
        log::trace!("lexed {} tokens", tokens.len());
        (tokens, self.errors)
    }

    fn span(&self, start: usize) -> Span {
        Span::new(self.file_id, start as u32, self.pos as u32)
    }

    fn error(&mut self, error: LexError, start: usize) {
        let span = self.span(start);
        self.errors.push((error, span));
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, n: usize) -> Option<u8> {
        self.bytes.get(self.pos + n).copied()
    }

    fn current_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn bump_char(&mut self) -> Option<char> {
        let c = self.current_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn next_token(&mut self) -> Token {
        self.newline_before = false;
        let (kind, start) = loop {
            self.skip_trivia();
            let start = self.pos;
            match self.current_char() {
                None => break (TokenKind::Eof, start),
                Some(c) => {
                    if let Some(kind) = self.scan(c, start) {
                        break (kind, start);
                    }
                }
            }
        };

        let token = Token {
            kind,
            span: self.span(start),
            newline_before: self.newline_before,
        };
        self.last_kind = Some(kind);
        token
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.current_char() {
            match c {
                '\n' | '\r' | '\u{2028}' | '\u{2029}' => {
                    self.newline_before = true;
                    self.bump_char();
                }
                c if c.is_whitespace() || c == '\u{feff}' => {
                    self.bump_char();
                }
                '/' if self.peek_at(1) == Some(b'/') => {
                    while let Some(c) = self.current_char() {
                        if matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}') {
                            break;
                        }
                        self.bump_char();
                    }
                }
                '/' if self.peek_at(1) == Some(b'*') => {
                    let start = self.pos;
                    self.pos += 2;
                    loop {
                        match self.current_char() {
                            None => {
                                self.error(LexError::UnterminatedComment, start);
                                return;
                            }
                            Some('*') if self.peek_at(1) == Some(b'/') => {
                                self.pos += 2;
                                break;
                            }
                            Some(c) => {
                                if matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}') {
                                    self.newline_before = true;
                                }
                                self.bump_char();
                            }
                        }
                    }
                }
                '#' if self.pos == 0 && self.peek_at(1) == Some(b'!') => {
                    // hashbang line
                    while let Some(c) = self.current_char() {
                        if c == '\n' {
                            break;
                        }
                        self.bump_char();
                    }
                }
                _ => break,
            }
        }
    }

    /// Scan one token starting at `c`. `None` means the character was
    /// rejected and scanning should resume after it.
    fn scan(&mut self, c: char, start: usize) -> Option<TokenKind> {
        use TokenKind::*;

        if is_id_start(c) {
            self.scan_identifier_tail();
            let text = &self.source[start..self.pos];
            return Some(TokenKind::keyword(text).unwrap_or(Identifier));
        }
        if c.is_ascii_digit() || (c == '.' && self.peek_at(1).map_or(false, |b| b.is_ascii_digit()))
        {
            return Some(self.scan_number(start));
        }

        let kind = match c {
            '"' | '\'' => self.scan_string(c, start),
            '`' => {
                self.pos += 1;
                self.scan_template_part(start, Template, TemplateHead)
            }
            '#' => {
                self.pos += 1;
                if self.current_char().map_or(false, is_id_start) {
                    self.scan_identifier_tail();
                    PrivateName
                } else {
                    Hash
                }
            }
            '{' => {
                self.pos += 1;
                self.braces.push(false);
                LBrace
            }
            '}' => {
                if self.braces.pop() == Some(true) {
                    self.pos += 1;
                    self.scan_template_part(start, TemplateTail, TemplateMiddle)
                } else {
                    self.pos += 1;
                    RBrace
                }
            }
            '/' if !self.last_kind.map_or(false, TokenKind::ends_operand) => {
                self.scan_regex(start)
            }
            _ => return self.scan_punctuator(c, start),
        };
        Some(kind)
    }

    fn scan_identifier_tail(&mut self) {
        while let Some(c) = self.current_char() {
            if is_id_continue(c) {
                self.bump_char();
            } else if c == '\\' && self.peek_at(1) == Some(b'u') {
                // unicode escape inside an identifier; keep it verbatim
                self.pos += 2;
                if self.peek() == Some(b'{') {
                    while let Some(b) = self.peek() {
                        self.pos += 1;
                        if b == b'}' {
                            break;
                        }
                    }
                } else {
                    self.pos += 4.min(self.bytes.len() - self.pos);
                }
            } else {
                break;
            }
        }
    }

    fn scan_number(&mut self, start: usize) -> TokenKind {
        let radix_digits = |b: u8, radix: u8| match radix {
            16 => b.is_ascii_hexdigit(),
            8 => (b'0'..=b'7').contains(&b),
            2 => b == b'0' || b == b'1',
            _ => b.is_ascii_digit(),
        };

        if self.peek() == Some(b'0') {
            let radix = match self.peek_at(1) {
                Some(b'x' | b'X') => 16,
                Some(b'o' | b'O') => 8,
                Some(b'b' | b'B') => 2,
                _ => 10,
            };
            if radix != 10 {
                self.pos += 2;
                let digits_start = self.pos;
                while let Some(b) = self.peek() {
                    if radix_digits(b, radix) || b == b'_' {
                        self.pos += 1;
                    } else {
                        break;
                    }
                }
                if self.pos == digits_start {
                    self.error(LexError::InvalidNumber, start);
                }
                return self.finish_number(start, true);
            }
        }

        let mut integer = true;
        self.eat_decimal_digits();
        if self.peek() == Some(b'.') {
            integer = false;
            self.pos += 1;
            self.eat_decimal_digits();
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let sign = matches!(self.peek_at(1), Some(b'+' | b'-')) as usize;
            if self.peek_at(1 + sign).map_or(false, |b| b.is_ascii_digit()) {
                integer = false;
                self.pos += 1 + sign;
                self.eat_decimal_digits();
            } else {
                self.pos += 1;
                self.error(LexError::InvalidNumber, start);
            }
        }
        self.finish_number(start, integer)
    }

    fn eat_decimal_digits(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_digit() || b == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn finish_number(&mut self, start: usize, integer: bool) -> TokenKind {
        let kind = if integer && self.peek() == Some(b'n') {
            self.pos += 1;
            TokenKind::BigInt
        } else {
            TokenKind::Number
        };
        if self.current_char().map_or(false, is_id_start) {
            self.scan_identifier_tail();
            self.error(LexError::InvalidNumber, start);
        }
        kind
    }

    fn scan_string(&mut self, quote: char, start: usize) -> TokenKind {
        self.pos += 1;
        loop {
            match self.bump_char() {
                None | Some('\n') | Some('\r') => {
                    self.error(LexError::UnterminatedString, start);
                    break;
                }
                Some('\\') => {
                    // line continuations included
                    if self.bump_char() == Some('\r') && self.peek() == Some(b'\n') {
                        self.pos += 1;
                    }
                }
                Some(c) if c == quote => break,
                Some(_) => {}
            }
        }
        TokenKind::String
    }

    /// Scan template characters after the opening `` ` `` or `}` up to the
    /// closing `` ` `` (`closed`) or a `${` (`open`).
    fn scan_template_part(&mut self, start: usize, closed: TokenKind, open: TokenKind) -> TokenKind {
        loop {
            match self.bump_char() {
                None => {
                    self.error(LexError::UnterminatedTemplate, start);
                    return closed;
                }
                Some('`') => return closed,
                Some('\\') => {
                    self.bump_char();
                }
                Some('$') if self.peek() == Some(b'{') => {
                    self.pos += 1;
                    self.braces.push(true);
                    return open;
                }
                Some(_) => {}
            }
        }
    }

    fn scan_regex(&mut self, start: usize) -> TokenKind {
        self.pos += 1;
        let mut in_class = false;
        loop {
            match self.bump_char() {
                None | Some('\n') | Some('\r') => {
                    self.error(LexError::UnterminatedRegex, start);
                    return TokenKind::Regex;
                }
                Some('\\') => {
                    self.bump_char();
                }
                Some('[') => in_class = true,
                Some(']') => in_class = false,
                Some('/') if !in_class => break,
                Some(_) => {}
            }
        }
        while self.current_char().map_or(false, is_id_continue) {
            self.bump_char();
        }
        TokenKind::Regex
    }

    fn scan_punctuator(&mut self, c: char, start: usize) -> Option<TokenKind> {
        use TokenKind::*;

        // Longest match first.
        const TABLE: &[(&str, TokenKind)] = &[
            (">>>=", UShrEq),
            ("...", Ellipsis),
            ("===", EqEqEq),
            ("!==", NotEqEq),
            ("**=", StarStarEq),
            ("<<=", ShlEq),
            (">>=", ShrEq),
            (">>>", UShr),
            ("&&=", AmpAmpEq),
            ("||=", PipePipeEq),
            ("??=", QuestionQuestionEq),
            ("=>", Arrow),
            ("==", EqEq),
            ("!=", NotEq),
            ("<=", LtEq),
            (">=", GtEq),
            ("+=", PlusEq),
            ("-=", MinusEq),
            ("*=", StarEq),
            ("/=", SlashEq),
            ("%=", PercentEq),
            ("&=", AmpEq),
            ("|=", PipeEq),
            ("^=", CaretEq),
            ("**", StarStar),
            ("++", PlusPlus),
            ("--", MinusMinus),
            ("<<", Shl),
            (">>", Shr),
            ("&&", AmpAmp),
            ("||", PipePipe),
            ("??", QuestionQuestion),
            ("::", ColonColon),
            ("(", LParen),
            (")", RParen),
            ("[", LBracket),
            ("]", RBracket),
            (";", Semicolon),
            (",", Comma),
            (".", Dot),
            ("?", Question),
            (":", Colon),
            ("@", At),
            ("<", Lt),
            (">", Gt),
            ("+", Plus),
            ("-", Minus),
            ("*", Star),
            ("/", Slash),
            ("%", Percent),
            ("&", Amp),
            ("|", Pipe),
            ("^", Caret),
            ("!", Bang),
            ("~", Tilde),
            ("=", Eq),
        ];

        let rest = &self.source[self.pos..];

        // `?.` followed by a digit is a conditional and a number (`a?.5:b`).
        if rest.starts_with("?.") && !self.peek_at(2).map_or(false, |b| b.is_ascii_digit()) {
            self.pos += 2;
            return Some(QuestionDot);
        }

        for (text, kind) in TABLE {
            if *kind == ColonColon && !self.options.bind_operator {
                continue;
            }
            if rest.starts_with(text) {
                self.pos += text.len();
                return Some(*kind);
            }
        }

        self.bump_char();
        self.error(LexError::UnexpectedChar(c), start);
        None
    }
}

fn is_id_start(c: char) -> bool {
    c == '$' || c == '_' || c.is_alphabetic()
}

fn is_id_continue(c: char) -> bool {
    c == '$' || c == '_' || c == '\u{200c}' || c == '\u{200d}' || c.is_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn kinds(source: &str, bind: bool) -> Vec<TokenKind> {
        let (tokens, errors) = Lexer::new(
            source,
            FileId(0),
            LexerOptions {
                bind_operator: bind,
            },
        )
        .tokenize();
        assert!(errors.is_empty(), "unexpected lex errors: {:?}", errors);
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_this_is_a_keyword_token() {
        assert_eq!(
            kinds("function f(this user) {}", false),
            vec![Function, Identifier, LParen, This, Identifier, RParen, LBrace, RBrace, Eof]
        );
    }

    #[test]
    fn test_colon_colon_needs_bind_option() {
        assert_eq!(
            kinds("function f::r() {}", true)[..4],
            [Function, Identifier, ColonColon, Identifier]
        );
        assert_eq!(
            kinds("function f::r() {}", false)[..4],
            [Function, Identifier, Colon, Colon]
        );
    }

    #[test]
    fn test_regex_versus_division() {
        assert_eq!(kinds("a / b / c", false), vec![Identifier, Slash, Identifier, Slash, Identifier, Eof]);
        assert_eq!(kinds("x = /ab+c/gi.test(y)", false)[..3], [Identifier, Eq, Regex]);
        assert_eq!(kinds("return /[/]/", false)[..2], [Return, Regex]);
    }

    #[test]
    fn test_template_with_nested_braces() {
        assert_eq!(
            kinds("`a${ {b: 1}.b }c${d}e`", false),
            vec![
                TemplateHead,
                LBrace,
                Identifier,
                Colon,
                Number,
                RBrace,
                Dot,
                Identifier,
                TemplateMiddle,
                Identifier,
                TemplateTail,
                Eof
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("0x1F 1_000 .5 1e-3 10n 0b101", false),
            vec![Number, Number, Number, Number, BigInt, Number, Eof]
        );
    }

    #[test]
    fn test_newline_tracking() {
        let (tokens, _) = Lexer::new("a\n/* x\n */ b // c\nc", FileId(0), LexerOptions::default()).tokenize();
        let flags: Vec<bool> = tokens.iter().map(|t| t.newline_before).collect();
        assert_eq!(flags, vec![false, true, true, false]);
    }

    #[test]
    fn test_errors_are_collected() {
        let (tokens, errors) =
            Lexer::new("'abc\nlet x = 1", FileId(0), LexerOptions::default()).tokenize();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, LexError::UnterminatedString);
        assert_eq!(tokens.last().map(|t| t.kind), Some(Eof));
    }

    #[test]
    fn test_optional_chain_versus_conditional() {
        assert_eq!(kinds("a?.b", false), vec![Identifier, QuestionDot, Identifier, Eof]);
        assert_eq!(kinds("a?.5:1", false), vec![Identifier, Question, Number, Colon, Number, Eof]);
    }
}
