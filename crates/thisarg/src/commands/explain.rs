//! Explain command - explain diagnostic and runtime error codes

use anyhow::{anyhow, Result};
use clap::Args;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct ExplainArgs {
    /// Code to explain (e.g., X003, R001, X101)
    pub code: String,
}

struct ErrorExplanation {
    code: &'static str,
    title: &'static str,
    description: &'static str,
    example: Option<&'static str>,
    suggestion: Option<&'static str>,
    related: &'static [&'static str],
}

const ERROR_EXPLANATIONS: &[ErrorExplanation] = &[
    // Grammar
    ErrorExplanation {
        code: "P001",
        title: "ParseError",
        description: "The source does not match the grammar. Parsing continues after the error so that every problem in the file is reported at once.",
        example: Some("let x = ;  // missing value"),
        suggestion: Some("Fix the reported syntax; later errors may disappear with it."),
        related: &[],
    },
    ErrorExplanation {
        code: "P002",
        title: "MisplacedReceiverError",
        description: "A `this` parameter may only appear first in the parameter list.",
        example: Some("function f(a, this b) {}"),
        suggestion: Some("Move the receiver to the front: function f(this b, a) {}"),
        related: &["P003"],
    },
    ErrorExplanation {
        code: "P003",
        title: "DuplicateReceiverError",
        description: "A function declares its receiver twice, either with two `this` parameters or with both the `name::receiver` spelling and a `this` parameter.",
        example: Some("function f::a(this b) {}"),
        suggestion: Some("Keep one receiver declaration."),
        related: &["P002"],
    },
    // Receiver rules
    ErrorExplanation {
        code: "X001",
        title: "ConstructorReceiverError",
        description: "Class constructors cannot declare an explicit receiver: `this` in a constructor is the object under construction, not a caller-supplied receiver.",
        example: Some("class C { constructor(this) {} }"),
        suggestion: Some("Remove the receiver; use `this` directly inside the constructor."),
        related: &["X002"],
    },
    ErrorExplanation {
        code: "X002",
        title: "ArrowReceiverError",
        description: "Arrow functions take `this` from the enclosing function and cannot declare a receiver of their own.",
        example: Some("const f = (this a) => a;"),
        suggestion: Some("Use a function expression, or name the receiver on the enclosing function."),
        related: &["X001", "X003"],
    },
    ErrorExplanation {
        code: "X003",
        title: "IllegalThisReferenceError",
        description: r#"A function that renames or destructures its receiver gives up the `this` keyword.
Arrow functions inside it inherit that rule, since they share its receiver.
Nested ordinary functions, methods, field initializers and static blocks have
their own `this` and are not affected."#,
        example: Some(r#"function cb(this elem, e) {
  setTimeout(() => this.value = '');  // error: use `elem`
}"#),
        suggestion: Some("Refer to the receiver by its declared name."),
        related: &["X002", "R003"],
    },
    // Bindings
    ErrorExplanation {
        code: "R001",
        title: "DuplicateParameterError",
        description: "A parameter has the same name as the receiver, or a destructured receiver binds one name twice.",
        example: Some("function f(this a, a) {}"),
        suggestion: Some("Rename the parameter or the receiver."),
        related: &["R002"],
    },
    ErrorExplanation {
        code: "R002",
        title: "RedeclaredReceiverError",
        description: "The receiver name is declared again in the function body. The lowered `const` binding would collide with the declaration.",
        example: Some("function f(this a) { let a = 1; }"),
        suggestion: Some("Rename the inner declaration, or move it into a nested block."),
        related: &["R001"],
    },
    ErrorExplanation {
        code: "R003",
        title: "UnusedReceiver",
        description: "A named receiver is never read. The receiver check still runs, but the binding is dead.",
        example: Some("function f(this unused) { return 1; }"),
        suggestion: Some("Declare a bare `this` receiver to keep only the check."),
        related: &["X003"],
    },
    ErrorExplanation {
        code: "R004",
        title: "ReceiverInDefaultError",
        description: r#"Parameter defaults are evaluated before the function body, and the receiver
binding is created by the body's first statements. A default that reads the
receiver's name would see an outer variable of that name instead."#,
        example: Some("function f(this self, x = self.y) {}"),
        suggestion: Some("Compute the value in the body: function f(this self, x) { x ??= self.y; }"),
        related: &["X003"],
    },
    ErrorExplanation {
        code: "R005",
        title: "ShadowedGuardNameError",
        description: r#"The receiver checks injected into a lowered function throw `TypeError`, and
sloppy-mode checks compare against `globalThis`. Declaring either name in the
function, or in a scope around it, would make the check use the wrong value or
hit an uninitialized `let`."#,
        example: Some("function f(this a) { let TypeError = 1; return a; }"),
        suggestion: Some("Rename the declaration."),
        related: &["X101", "X102"],
    },
    // Output
    ErrorExplanation {
        code: "V001",
        title: "OutputVerification",
        description: "With --verify, the lowered code is re-parsed as standard JavaScript (or TypeScript). This warning means the printer produced something the reference parser rejects.",
        example: None,
        suggestion: Some("Please report the input that triggers this."),
        related: &[],
    },
    ErrorExplanation {
        code: "I001",
        title: "InternalError",
        description: "An invariant of the transformer itself was violated.",
        example: None,
        suggestion: Some("Please report the input that triggers this."),
        related: &[],
    },
    // Runtime
    ErrorExplanation {
        code: "X101",
        title: "MissingReceiverError",
        description: r#"Thrown as a TypeError by lowered code when a function with an explicit receiver
is called without one: a bare call, or a call with an undefined or null receiver.
In sloppy-mode code a receiver equal to globalThis also counts as missing (see
`[lower] guard_global_receiver`)."#,
        example: Some(r#"function fullName(this user) { return user.first; }
fullName();  // throws"#),
        suggestion: Some("Call it as a method or with .call(receiver)."),
        related: &["X102"],
    },
    ErrorExplanation {
        code: "X102",
        title: "ConstructedReceiverError",
        description: "Thrown as a TypeError by lowered code when a function with an explicit receiver is invoked with `new`.",
        example: Some(r#"function f(this a) {}
new f();  // throws"#),
        suggestion: Some("Use a class if instances are wanted."),
        related: &["X101"],
    },
];

pub fn run(args: ExplainArgs, format: OutputFormat, use_color: bool) -> Result<()> {
    let code = args.code.to_uppercase();

    let explanation = ERROR_EXPLANATIONS
        .iter()
        .find(|e| e.code == code)
        .ok_or_else(|| anyhow!("Unknown error code: {}", code))?;

    match format {
        OutputFormat::Text => {
            if use_color {
                println!(
                    "\n{}: {}\n{}",
                    console::style(&code).bold().cyan(),
                    console::style(explanation.title).bold(),
                    "=".repeat(code.len() + explanation.title.len() + 2)
                );
            } else {
                println!(
                    "\n{}: {}\n{}",
                    code,
                    explanation.title,
                    "=".repeat(code.len() + explanation.title.len() + 2)
                );
            }

            println!("\n{}\n", explanation.description);

            if let Some(example) = explanation.example {
                if use_color {
                    println!("{}:", console::style("Example").bold());
                } else {
                    println!("Example:");
                }
                for line in example.lines() {
                    println!("  {}", line);
                }
                println!();
            }

            if let Some(suggestion) = explanation.suggestion {
                if use_color {
                    println!("{}:", console::style("Suggestion").bold().green());
                } else {
                    println!("Suggestion:");
                }
                for line in suggestion.lines() {
                    println!("  {}", line);
                }
                println!();
            }

            if !explanation.related.is_empty() {
                if use_color {
                    println!(
                        "{}: {}",
                        console::style("Related").dim(),
                        explanation.related.join(", ")
                    );
                } else {
                    println!("Related: {}", explanation.related.join(", "));
                }
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "code": explanation.code,
                "title": explanation.title,
                "description": explanation.description,
                "example": explanation.example,
                "suggestion": explanation.suggestion,
                "related": explanation.related,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use thisarg_diagnostics::ALL_CODES;
    use thisarg_transform::RuntimeErrorKind;

    #[test]
    fn test_every_code_is_explained() {
        for code in ALL_CODES {
            let entry = ERROR_EXPLANATIONS
                .iter()
                .find(|e| e.code == code.as_str())
                .unwrap_or_else(|| panic!("no explanation for {}", code));
            assert_eq!(entry.title, code.name());
        }
        for kind in [
            RuntimeErrorKind::MissingReceiver,
            RuntimeErrorKind::ConstructedReceiver,
        ] {
            let entry = ERROR_EXPLANATIONS.iter().find(|e| e.code == kind.code()).unwrap();
            assert_eq!(entry.title, kind.name());
        }
    }
}
