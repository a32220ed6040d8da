//! Parser for JavaScript extended with explicit receiver parameters.
//!
//! A function may name its receiver as a leading `this` parameter:
//!
//! ```text
//! function onClick(this button, event) { button.disabled = true; }
//! function area(this { width, height }) { return width * height; }
//! function format::user(style) { ... }   // bind-operator spelling
//! ```
//!
//! Parsing never stops at the first problem: every error in the unit is
//! returned as a diagnostic alongside a best-effort syntax tree.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

use thisarg_diagnostics::{Diagnostics, FileId, SourceCache};

pub use parser::Parser;

/// Dialect switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Syntax {
    /// Accept `function name::receiver(...)`
    pub bind_operator: bool,
    /// Accept `: Type` annotations on parameters, variables and returns
    pub typescript: bool,
    /// Accept `@decorator` on classes, members and parameters
    pub decorators: bool,
    /// Parse as an ES module (strict, `import`/`export` allowed)
    pub module: bool,
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            bind_operator: true,
            typescript: false,
            decorators: false,
            module: false,
        }
    }
}

/// Result of parsing one compilation unit.
#[derive(Debug)]
pub struct ParseResult {
    /// The parsed program, partial when diagnostics contain errors
    pub program: ast::Program,
    /// The file ID in the source cache
    pub file_id: FileId,
    /// Parse errors, in the order they were found
    pub diagnostics: Diagnostics,
}

impl ParseResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

/// Parse source code, registering it in the source cache for diagnostics.
pub fn parse_with_cache(
    source: &str,
    filename: &str,
    syntax: Syntax,
    cache: &mut SourceCache,
) -> ParseResult {
    let file_id = cache.add_file(filename, source.to_string());
    log::debug!("parsing {} ({:?})", filename, syntax);
    let (program, diagnostics) = Parser::new(source, file_id, syntax).parse();
    ParseResult {
        program,
        file_id,
        diagnostics,
    }
}

/// Parse source code that is not tracked in a source cache.
pub fn parse_program(source: &str, syntax: Syntax) -> ParseResult {
    let file_id = FileId(0);
    let (program, diagnostics) = Parser::new(source, file_id, syntax).parse();
    ParseResult {
        program,
        file_id,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ReceiverBinding, Stmt};

    #[test]
    fn test_parse_with_cache() {
        let source = "function cb(this elem, e) { elem.value = ''; }";
        let mut cache = SourceCache::new();

        let result = parse_with_cache(source, "cb.js", Syntax::default(), &mut cache);

        assert!(!result.has_errors());
        assert_eq!(result.program.body.len(), 1);
        assert!(cache.get_file(result.file_id).is_some());
    }

    #[test]
    fn test_parse_error_keeps_going() {
        let mut cache = SourceCache::new();
        let result = parse_with_cache(
            "let x = ;\nfunction f(this a) { return a; }",
            "bad.js",
            Syntax::default(),
            &mut cache,
        );

        assert_eq!(result.diagnostics.error_count(), 1);
        let Some(Stmt::Function(f)) = result.program.body.last() else {
            panic!("function after the error should still parse");
        };
        assert!(matches!(
            f.receiver.as_ref().map(|r| &r.binding),
            Some(ReceiverBinding::Named(_))
        ));
    }

    #[test]
    fn test_bind_operator_can_be_disabled() {
        let syntax = Syntax {
            bind_operator: false,
            ..Syntax::default()
        };
        let result = parse_program("function f::r() {}", syntax);
        assert!(result.has_errors());
    }
}
