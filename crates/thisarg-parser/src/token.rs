//! Token kinds produced by the [`Lexer`](crate::lexer::Lexer).

use thisarg_diagnostics::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals and names
    Identifier,
    PrivateName,
    Number,
    BigInt,
    String,
    Regex,
    /// `` `...` `` with no substitutions
    Template,
    /// `` `...${ ``
    TemplateHead,
    /// `` }...${ ``
    TemplateMiddle,
    /// `` }...` ``
    TemplateTail,

    // Reserved words
    Break,
    Case,
    Catch,
    Class,
    Const,
    Continue,
    Debugger,
    Default,
    Delete,
    Do,
    Else,
    Export,
    Extends,
    False,
    Finally,
    For,
    Function,
    If,
    Import,
    In,
    Instanceof,
    New,
    Null,
    Return,
    Super,
    Switch,
    This,
    Throw,
    True,
    Try,
    Typeof,
    Var,
    Void,
    While,
    With,

    // Punctuators
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Ellipsis,
    Question,
    QuestionDot,
    Colon,
    /// `::`, only produced when the bind-operator spelling is enabled
    ColonColon,
    Arrow,
    At,
    Hash,

    Lt,
    Gt,
    LtEq,
    GtEq,
    EqEq,
    NotEq,
    EqEqEq,
    NotEqEq,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    StarStar,
    PlusPlus,
    MinusMinus,
    Shl,
    Shr,
    UShr,
    Amp,
    Pipe,
    Caret,
    Bang,
    Tilde,
    AmpAmp,
    PipePipe,
    QuestionQuestion,

    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    StarStarEq,
    ShlEq,
    ShrEq,
    UShrEq,
    AmpEq,
    PipeEq,
    CaretEq,
    AmpAmpEq,
    PipePipeEq,
    QuestionQuestionEq,

    Eof,
}

impl TokenKind {
    /// Reserved word for an identifier-shaped lexeme, if any.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        use TokenKind::*;
        Some(match text {
            "break" => Break,
            "case" => Case,
            "catch" => Catch,
            "class" => Class,
            "const" => Const,
            "continue" => Continue,
            "debugger" => Debugger,
            "default" => Default,
            "delete" => Delete,
            "do" => Do,
            "else" => Else,
            "export" => Export,
            "extends" => Extends,
            "false" => False,
            "finally" => Finally,
            "for" => For,
            "function" => Function,
            "if" => If,
            "import" => Import,
            "in" => In,
            "instanceof" => Instanceof,
            "new" => New,
            "null" => Null,
            "return" => Return,
            "super" => Super,
            "switch" => Switch,
            "this" => This,
            "throw" => Throw,
            "true" => True,
            "try" => Try,
            "typeof" => Typeof,
            "var" => Var,
            "void" => Void,
            "while" => While,
            "with" => With,
            _ => return None,
        })
    }

    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Break
                | Case
                | Catch
                | Class
                | Const
                | Continue
                | Debugger
                | Default
                | Delete
                | Do
                | Else
                | Export
                | Extends
                | False
                | Finally
                | For
                | Function
                | If
                | Import
                | In
                | Instanceof
                | New
                | Null
                | Return
                | Super
                | Switch
                | This
                | Throw
                | True
                | Try
                | Typeof
                | Var
                | Void
                | While
                | With
        )
    }

    /// Identifier or reserved word; both are valid property names.
    pub fn is_identifier_name(self) -> bool {
        self == TokenKind::Identifier || self.is_keyword()
    }

    /// True when a `/` after this token starts a division rather than a
    /// regular expression literal.
    pub fn ends_operand(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Identifier
                | PrivateName
                | Number
                | BigInt
                | String
                | Regex
                | Template
                | TemplateTail
                | This
                | Super
                | Null
                | True
                | False
                | RParen
                | RBracket
                | RBrace
                | PlusPlus
                | MinusMinus
        )
    }

    pub fn is_assign_op(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Eq | PlusEq
                | MinusEq
                | StarEq
                | SlashEq
                | PercentEq
                | StarStarEq
                | ShlEq
                | ShrEq
                | UShrEq
                | AmpEq
                | PipeEq
                | CaretEq
                | AmpAmpEq
                | PipePipeEq
                | QuestionQuestionEq
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// A line terminator appeared between the previous token and this one.
    /// Drives automatic semicolon insertion and restricted productions.
    pub newline_before: bool,
}
