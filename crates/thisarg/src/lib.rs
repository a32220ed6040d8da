//! thisarg - explicit receiver parameters for JavaScript
//!
//! Runs one compilation unit through the whole pipeline:
//!
//! 1. parse the extended grammar ([`thisarg_parser`]),
//! 2. bind scopes and check `this` references ([`thisarg_binder`]),
//! 3. lower receivers to guards and bindings ([`thisarg_transform`]),
//! 4. print (and optionally re-parse) standard JavaScript ([`thisarg_codegen`]).
//!
//! Static errors from steps 1 and 2 are all collected; a unit with any error
//! produces no output.

pub mod config;

use thisarg_binder::bind;
use thisarg_codegen::{print_program, verify_output, EmitOptions, VerifyError, VerifyTarget};
use thisarg_diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, FileId, SourceCache};
use thisarg_parser::{ast::Program, parse_with_cache, Syntax};
use thisarg_transform::{lower_receivers, LowerOptions, LowerStats};

pub use config::{Config, ConfigError};

/// Settings for one run of the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub syntax: Syntax,
    pub lower: LowerOptions,
    pub emit: EmitOptions,
    /// Re-parse the printed code with SWC
    pub verify: bool,
}

/// Result of compiling one unit.
#[derive(Debug)]
pub struct CompileOutput {
    pub file_id: FileId,
    /// Lowered program; `None` when the unit has static errors
    pub program: Option<Program>,
    /// Printed JavaScript; `None` when the unit has static errors
    pub code: Option<String>,
    pub stats: LowerStats,
    /// Every diagnostic of the unit, in source order
    pub diagnostics: Diagnostics,
}

impl CompileOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

/// Run `source` through the pipeline, registering it in `cache` for
/// diagnostic rendering.
pub fn transform_source(
    source: &str,
    filename: &str,
    options: &CompileOptions,
    cache: &mut SourceCache,
) -> CompileOutput {
    let parsed = parse_with_cache(source, filename, options.syntax, cache);
    let mut diagnostics = parsed.diagnostics;

    let bound = bind(&parsed.program);
    diagnostics.extend(bound.diagnostics);
    diagnostics.sort_by_position();

    if diagnostics.has_errors() {
        log::debug!(
            "{}: {} error(s), no output",
            filename,
            diagnostics.error_count()
        );
        return CompileOutput {
            file_id: parsed.file_id,
            program: None,
            code: None,
            stats: LowerStats::default(),
            diagnostics,
        };
    }

    let mut program = parsed.program;
    let stats = lower_receivers(&mut program, &options.lower);
    let code = print_program(&program, &options.emit);

    if options.verify {
        let target = VerifyTarget {
            typescript: options.syntax.typescript,
            module: options.syntax.module,
        };
        if let Err(VerifyError::Syntax { message, offset }) = verify_output(&code, target) {
            diagnostics.push(
                Diagnostic::warning(
                    DiagnosticCode::OutputVerification,
                    format!("lowered output does not re-parse: {}", message),
                )
                .with_help(format!("the problem is at byte {} of the emitted code", offset))
                .build(),
            );
        }
    }

    CompileOutput {
        file_id: parsed.file_id,
        program: Some(program),
        code: Some(code),
        stats,
        diagnostics,
    }
}

/// Run `source` through the pipeline without a caller-owned source cache.
pub fn transform(source: &str, options: &CompileOptions) -> CompileOutput {
    let mut cache = SourceCache::new();
    transform_source(source, "<input>", options, &mut cache)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_unit_produces_code() {
        let output = transform(
            "function fullName(this user) { return user.first }",
            &CompileOptions::default(),
        );
        assert!(!output.has_errors());
        assert_eq!(output.stats.functions, 1);
        assert!(output.code.unwrap().contains("const user = this;"));
    }

    #[test]
    fn test_errors_suppress_output() {
        let output = transform(
            "function cb(this elem, e) { setTimeout(() => this.value = '') }",
            &CompileOptions::default(),
        );
        assert!(output.has_errors());
        assert!(output.program.is_none());
        assert!(output.code.is_none());
    }

    #[test]
    fn test_verification_of_clean_output() {
        let options = CompileOptions {
            verify: true,
            ..CompileOptions::default()
        };
        let output = transform("function f(this { a, b = 2 }) { return a + b; }", &options);
        assert!(output.diagnostics.is_empty());
    }
}
