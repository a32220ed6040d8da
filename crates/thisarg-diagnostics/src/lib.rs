//! Diagnostic infrastructure for the thisarg transformer.
//!
//! Parser and binder never abort on a source error; they push a
//! [`Diagnostic`] into a [`Diagnostics`] list and keep going. Callers sort the
//! list with [`Diagnostics::sort_by_position`] and render it through one of
//! the [`DiagnosticEmitter`] implementations.
//!
//! # Example
//!
//! ```
//! use thisarg_diagnostics::{
//!     Diagnostic, DiagnosticCode, DiagnosticEmitter, SimpleEmitter, SourceCache, Span,
//! };
//!
//! let mut cache = SourceCache::new();
//! let file = cache.add_file("a.js", "class C { constructor(this) {} }".to_string());
//!
//! let diag = Diagnostic::new(
//!     DiagnosticCode::ConstructorReceiver,
//!     "constructors cannot declare an explicit receiver",
//! )
//! .with_span(Span::new(file, 22, 26))
//! .build();
//!
//! let mut out = Vec::new();
//! SimpleEmitter::new(&mut out).emit(&diag, &cache).unwrap();
//! assert!(String::from_utf8(out).unwrap().starts_with("a.js:1:23: error"));
//! ```

pub mod diagnostic;
pub mod emitter;
pub mod source_cache;
pub mod span;

pub use diagnostic::{
    Diagnostic, DiagnosticBuilder, DiagnosticCode, Diagnostics, Severity, ALL_CODES,
};
pub use emitter::{DiagnosticEmitter, JsonEmitter, SimpleEmitter, TerminalEmitter};
pub use source_cache::{SourceCache, SourceFile};
pub use span::{FileId, Label, LabelStyle, Location, Span};
