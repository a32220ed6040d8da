//! Diagnostic records produced by the parser and the binder.

use crate::span::{Label, Span};
use serde::{Deserialize, Serialize};

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Suggestion, never blocks lowering
    Hint,
    /// Suspicious but lowerable
    Warning,
    /// Blocks lowering of the whole unit
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Hint => "hint",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic codes, grouped by the phase that reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    // Grammar (P0xx)
    /// Source text does not match the grammar
    ParseError,
    /// `this` parameter somewhere other than the first position
    MisplacedReceiver,
    /// Both `name::recv` and a `this` parameter on one function
    DuplicateReceiver,

    // Receiver rules (X0xx)
    /// Explicit receiver declared on a class constructor
    ConstructorReceiver,
    /// Explicit receiver declared on an arrow function
    ArrowReceiver,
    /// `this` used where an explicit receiver renamed it away
    IllegalThisReference,

    // Bindings (R0xx)
    /// A parameter name bound twice by the same parameter list
    DuplicateParameter,
    /// A receiver name redeclared at the top of the function body
    RedeclaredReceiver,
    /// A named receiver that the body never reads
    UnusedReceiver,
    /// A receiver binding read from a parameter default, before it exists
    ReceiverInDefault,
    /// `TypeError` or `globalThis` rebound where the injected guard needs it
    ShadowedGuardName,

    // Output (V0xx)
    /// Emitted JavaScript failed to re-parse as standard syntax
    OutputVerification,

    // Internal (I0xx)
    InternalError,
}

impl DiagnosticCode {
    /// Stable code string, e.g. `"X003"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParseError => "P001",
            Self::MisplacedReceiver => "P002",
            Self::DuplicateReceiver => "P003",

            Self::ConstructorReceiver => "X001",
            Self::ArrowReceiver => "X002",
            Self::IllegalThisReference => "X003",

            Self::DuplicateParameter => "R001",
            Self::RedeclaredReceiver => "R002",
            Self::UnusedReceiver => "R003",
            Self::ReceiverInDefault => "R004",
            Self::ShadowedGuardName => "R005",

            Self::OutputVerification => "V001",

            Self::InternalError => "I001",
        }
    }

    /// The name the error taxonomy uses for this code.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ParseError => "ParseError",
            Self::MisplacedReceiver => "MisplacedReceiverError",
            Self::DuplicateReceiver => "DuplicateReceiverError",
            Self::ConstructorReceiver => "ConstructorReceiverError",
            Self::ArrowReceiver => "ArrowReceiverError",
            Self::IllegalThisReference => "IllegalThisReferenceError",
            Self::DuplicateParameter => "DuplicateParameterError",
            Self::RedeclaredReceiver => "RedeclaredReceiverError",
            Self::UnusedReceiver => "UnusedReceiver",
            Self::ReceiverInDefault => "ReceiverInDefaultError",
            Self::ShadowedGuardName => "ShadowedGuardNameError",
            Self::OutputVerification => "OutputVerification",
            Self::InternalError => "InternalError",
        }
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            Self::ParseError
            | Self::MisplacedReceiver
            | Self::DuplicateReceiver
            | Self::ConstructorReceiver
            | Self::ArrowReceiver
            | Self::IllegalThisReference
            | Self::DuplicateParameter
            | Self::RedeclaredReceiver
            | Self::ReceiverInDefault
            | Self::ShadowedGuardName
            | Self::InternalError => Severity::Error,

            Self::OutputVerification => Severity::Warning,

            Self::UnusedReceiver => Severity::Hint,
        }
    }

    /// Parse a code string back into a code (used by `explain`).
    pub fn from_code_str(code: &str) -> Option<DiagnosticCode> {
        ALL_CODES
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(code))
    }
}

/// Every code, in declaration order.
pub const ALL_CODES: &[DiagnosticCode] = &[
    DiagnosticCode::ParseError,
    DiagnosticCode::MisplacedReceiver,
    DiagnosticCode::DuplicateReceiver,
    DiagnosticCode::ConstructorReceiver,
    DiagnosticCode::ArrowReceiver,
    DiagnosticCode::IllegalThisReference,
    DiagnosticCode::DuplicateParameter,
    DiagnosticCode::RedeclaredReceiver,
    DiagnosticCode::UnusedReceiver,
    DiagnosticCode::ReceiverInDefault,
    DiagnosticCode::ShadowedGuardName,
    DiagnosticCode::OutputVerification,
    DiagnosticCode::InternalError,
];

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    /// Single-line message
    pub message: String,
    /// Optional `help:` line
    pub help: Option<String>,
    /// Where the problem is
    pub span: Span,
    /// Related locations
    pub labels: Vec<Label>,
}

impl Diagnostic {
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code, Severity::Error, message)
    }

    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code, Severity::Warning, message)
    }

    pub fn hint(code: DiagnosticCode, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code, Severity::Hint, message)
    }

    /// Create a diagnostic with the code's default severity.
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code, code.default_severity(), message)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    pub fn is_hint(&self) -> bool {
        self.severity == Severity::Hint
    }
}

/// Fluent builder returned by the [`Diagnostic`] constructors.
pub struct DiagnosticBuilder {
    inner: Diagnostic,
}

impl DiagnosticBuilder {
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            inner: Diagnostic {
                code,
                severity,
                message: message.into(),
                help: None,
                span: Span::DUMMY,
                labels: Vec::new(),
            },
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.inner.span = span;
        self
    }

    /// Point at a related location, e.g. the receiver declaration.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.inner.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.inner.help = Some(help.into());
        self
    }

    pub fn build(self) -> Diagnostic {
        self.inner
    }
}

/// The diagnostics of one or more compilation units.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.items.extend(diagnostics);
    }

    /// Stable sort into ascending source order. Diagnostics without a span
    /// keep their relative order and go last.
    pub fn sort_by_position(&mut self) {
        self.items
            .sort_by_key(|d| (d.span.is_dummy(), d.span.file_id, d.span.start));
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|d| d.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_warning()).count()
    }

    pub fn hint_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_hint()).count()
    }

    /// Codes in reporting order, convenient in tests.
    pub fn codes(&self) -> Vec<DiagnosticCode> {
        self.items.iter().map(|d| d.code).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::FileId;

    #[test]
    fn test_codes_round_trip_through_strings() {
        for code in ALL_CODES {
            assert_eq!(DiagnosticCode::from_code_str(code.as_str()), Some(*code));
        }
        assert_eq!(
            DiagnosticCode::from_code_str("x003"),
            Some(DiagnosticCode::IllegalThisReference)
        );
        assert_eq!(DiagnosticCode::from_code_str("Z999"), None);
    }

    #[test]
    fn test_sort_by_position_is_stable() {
        let file = FileId(0);
        let mut diags = Diagnostics::new();
        diags.push(
            Diagnostic::new(DiagnosticCode::IllegalThisReference, "late")
                .with_span(Span::new(file, 40, 44))
                .build(),
        );
        diags.push(Diagnostic::new(DiagnosticCode::InternalError, "nowhere").build());
        diags.push(
            Diagnostic::new(DiagnosticCode::ArrowReceiver, "early")
                .with_span(Span::new(file, 3, 7))
                .build(),
        );
        diags.push(
            Diagnostic::new(DiagnosticCode::ParseError, "same place")
                .with_span(Span::new(file, 3, 5))
                .build(),
        );
        diags.sort_by_position();
        let messages: Vec<&str> = diags.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["early", "same place", "late", "nowhere"]);
    }

    #[test]
    fn test_counts_by_severity() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::new(DiagnosticCode::ConstructorReceiver, "a").build());
        diags.push(Diagnostic::new(DiagnosticCode::OutputVerification, "b").build());
        diags.push(Diagnostic::new(DiagnosticCode::UnusedReceiver, "c").build());
        assert!(diags.has_errors());
        assert_eq!(diags.error_count(), 1);
        assert_eq!(diags.warning_count(), 1);
        assert_eq!(diags.hint_count(), 1);
    }
}
