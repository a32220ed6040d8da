//! JavaScript output for lowered programs
//!
//! Prints the lowered AST back to source text and, optionally, re-parses
//! the result with SWC to prove it is standard JavaScript (or TypeScript,
//! when the input carried annotations).

pub mod printer;
pub mod verify;

pub use printer::{print_expr, print_program, EmitOptions};
pub use verify::{verify_output, VerifyError, VerifyTarget};
