//! Re-parse emitted JavaScript with SWC to confirm it is standard syntax.

use swc_common::{input::StringInput, sync::Lrc, FileName, SourceMap, Spanned};
use swc_ecma_parser::{lexer::Lexer, EsSyntax, Parser, Syntax, TsSyntax};
use thiserror::Error;

/// Which grammar the emitted code is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyTarget {
    /// Check as TypeScript (the input carried type annotations)
    pub typescript: bool,
    /// Parse as a module rather than a script
    pub module: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    /// The output does not parse; `offset` is a byte offset into it.
    #[error("emitted code does not parse at offset {offset}: {message}")]
    Syntax { message: String, offset: u32 },
}

/// Parse `code`, returning the first error SWC reports, fatal or recovered.
pub fn verify_output(code: &str, target: VerifyTarget) -> Result<(), VerifyError> {
    let source_map: Lrc<SourceMap> = Default::default();
    let source_file = source_map.new_source_file(
        Lrc::new(FileName::Custom("output.js".to_string())),
        code.to_string(),
    );
    let base = source_file.start_pos.0;

    let syntax = if target.typescript {
        Syntax::Typescript(TsSyntax {
            decorators: true,
            ..Default::default()
        })
    } else {
        Syntax::Es(EsSyntax {
            decorators: true,
            ..Default::default()
        })
    };

    let lexer = Lexer::new(
        syntax,
        swc_ecma_ast::EsVersion::Es2022,
        StringInput::from(&*source_file),
        None,
    );
    let mut parser = Parser::new_from(lexer);

    let to_error = |e: swc_ecma_parser::error::Error| VerifyError::Syntax {
        message: e.kind().msg().to_string(),
        offset: e.span().lo.0.saturating_sub(base),
    };

    if target.module {
        parser.parse_module().map_err(to_error)?;
    } else {
        parser.parse_script().map_err(to_error)?;
    }

    match parser.take_errors().into_iter().next() {
        Some(error) => Err(to_error(error)),
        None => {
            log::debug!("verified {} bytes of output", code.len());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: VerifyTarget = VerifyTarget {
        typescript: false,
        module: false,
    };

    #[test]
    fn test_valid_output_passes() {
        let code = "function f() {\n  if (new.target !== void 0) throw new TypeError(\"x\");\n  const a = this;\n  return a;\n}\n";
        assert_eq!(verify_output(code, SCRIPT), Ok(()));
    }

    #[test]
    fn test_receiver_syntax_is_rejected() {
        let code = "function f(this a) {}";
        let Err(VerifyError::Syntax { message, offset }) = verify_output(code, SCRIPT) else {
            panic!("receiver syntax is not standard JavaScript");
        };
        assert!(!message.is_empty());
        assert!((offset as usize) < code.len());
    }

    #[test]
    fn test_typescript_this_parameter() {
        let target = VerifyTarget {
            typescript: true,
            module: false,
        };
        assert_eq!(verify_output("function f(this: User, a: number) {}", target), Ok(()));
    }
}
