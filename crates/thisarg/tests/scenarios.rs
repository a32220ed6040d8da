//! End-to-end behavior of the pipeline on small units.

use thisarg::{transform, CompileOptions};
use thisarg_diagnostics::DiagnosticCode;
use thisarg_parser::Syntax;
use thisarg_transform::LowerOptions;

fn lower_ok(source: &str) -> String {
    lower_with(source, &CompileOptions::default())
}

fn lower_with(source: &str, options: &CompileOptions) -> String {
    let output = transform(source, options);
    assert!(
        !output.has_errors(),
        "unexpected errors: {:?}",
        output
            .diagnostics
            .iter()
            .map(|d| format!("{} {}", d.code, d.message))
            .collect::<Vec<_>>()
    );
    output.code.expect("clean units produce code")
}

fn error_codes(source: &str) -> Vec<DiagnosticCode> {
    let output = transform(source, &CompileOptions::default());
    assert!(output.code.is_none(), "units with errors produce no code");
    output
        .diagnostics
        .iter()
        .filter(|d| d.is_error())
        .map(|d| d.code)
        .collect()
}

#[test]
fn named_receiver_lowers_to_guards_and_binding() {
    let code = lower_ok("function fullName(this user) { return user.first }");
    assert_eq!(
        code,
        concat!(
            "function fullName() {\n",
            "  if (new.target !== void 0) throw new TypeError(\"ConstructedReceiverError: fullName cannot be called with new\");\n",
            "  if (this == null || this === globalThis) throw new TypeError(\"MissingReceiverError: fullName must be called with a receiver\");\n",
            "  const user = this;\n",
            "  return user.first;\n",
            "}\n",
        )
    );
}

#[test]
fn receiver_is_removed_from_parameter_list() {
    let code = lower_ok("function zip(this array, other) { return array.map((a,i)=>[a, other[i]]) }");
    assert!(code.starts_with("function zip(other) {\n"));
    assert!(code.contains("  const array = this;\n"));
    assert!(code.contains("  return array.map((a, i) => [a, other[i]]);\n"));
}

#[test]
fn unnamed_receiver_keeps_this() {
    let code = lower_ok("function f(this) { console.log(this) }");
    assert!(code.contains("MissingReceiverError"));
    assert!(!code.contains("const "));
    assert!(code.contains("  console.log(this);\n"));
}

#[test]
fn arrow_inherits_renamed_receiver() {
    let source = "function cb(this elem, e) { setTimeout(() => this.value = '') }";
    let output = transform(source, &CompileOptions::default());
    assert!(output.code.is_none());

    let errors: Vec<_> = output.diagnostics.iter().filter(|d| d.is_error()).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, DiagnosticCode::IllegalThisReference);
    assert_eq!(errors[0].span.start as usize, source.find("this.value").unwrap());
}

#[test]
fn constructor_cannot_declare_receiver() {
    assert_eq!(
        error_codes("class C { constructor(this) {} }"),
        vec![DiagnosticCode::ConstructorReceiver]
    );
}

#[test]
fn destructured_receiver_binds_pattern() {
    let code = lower_ok("function area(this { width, height = 1 }) { return width * height; }");
    assert!(code.contains("  const { width, height = 1 } = this;\n"));
}

#[test]
fn guards_precede_every_body_statement() {
    let code = lower_ok("function f(this a) { sideEffect(); return a; }");
    let construct = code.find("new.target").unwrap();
    let missing = code.find("this == null").unwrap();
    let binding = code.find("const a = this;").unwrap();
    let effect = code.find("sideEffect()").unwrap();
    assert!(construct < missing && missing < binding && binding < effect);
}

#[test]
fn programs_without_receivers_are_unchanged() {
    let source = "function g(a) {\n  return this.x + a;\n}\nconst h = () => this;\n";
    assert_eq!(lower_ok(source), source);
}

#[test]
fn lowering_is_idempotent() {
    let once = lower_ok("function f(this a) { return function g(this b) { return a + b; }; }");
    let output = transform(&once, &CompileOptions::default());
    assert_eq!(output.stats.functions, 0);
    assert_eq!(output.code.as_deref(), Some(once.as_str()));
}

#[test]
fn nested_functions_have_their_own_this() {
    let code = lower_ok(
        "function outer(this o) { return { m() { return this; }, f: function () { return this; } }; }",
    );
    assert!(code.contains("const o = this;"));
}

#[test]
fn nested_receivers_are_lowered_independently() {
    let code = lower_ok("function outer(this o) { function inner(this i) { return [o, i]; } return inner; }");
    assert_eq!(code.matches("MissingReceiverError").count(), 2);
    assert!(code.contains("const o = this;"));
    assert!(code.contains("const i = this;"));
}

#[test]
fn arrow_inside_arrow_still_inherits() {
    assert_eq!(
        error_codes("function f(this self) { return () => () => this; }"),
        vec![DiagnosticCode::IllegalThisReference]
    );
}

#[test]
fn errors_are_reported_in_source_order() {
    let source = "function a(this x) { () => this; }\nclass C { constructor(this) {} }\nconst g = (this y) => y;\n";
    assert_eq!(
        error_codes(source),
        vec![
            DiagnosticCode::IllegalThisReference,
            DiagnosticCode::ConstructorReceiver,
            DiagnosticCode::ArrowReceiver,
        ]
    );
}

#[test]
fn misplaced_receiver_is_a_parse_error() {
    assert_eq!(
        error_codes("function f(a, this b) {}"),
        vec![DiagnosticCode::MisplacedReceiver]
    );
}

#[test]
fn bind_operator_spelling() {
    let code = lower_ok("function format::user(style) { return user.name + style; }");
    assert!(code.starts_with("function format(style) {\n"));
    assert!(code.contains("const user = this;"));
}

#[test]
fn methods_and_accessors_take_receivers() {
    let code = lower_ok("class Box { get area(this { w, h }) { return w * h; } }");
    assert!(code.contains("get area() {"));
    assert!(code.contains("const { w, h } = this;"));
    assert!(!code.contains("new.target"));
}

#[test]
fn strict_code_skips_global_check() {
    let options = CompileOptions {
        syntax: Syntax {
            module: true,
            ..Syntax::default()
        },
        ..CompileOptions::default()
    };
    let code = lower_with("export function f(this a) { return a; }", &options);
    assert!(code.starts_with("export function f() {\n"));
    assert!(code.contains("if (this == null) throw"));
    assert!(!code.contains("globalThis"));
}

#[test]
fn global_receiver_check_can_be_disabled() {
    let options = CompileOptions {
        lower: LowerOptions {
            guard_global_receiver: false,
        },
        ..CompileOptions::default()
    };
    let code = lower_with("function f(this a) { return a; }", &options);
    assert!(!code.contains("globalThis"));
}

#[test]
fn typescript_receiver_type_is_carried() {
    let options = CompileOptions {
        syntax: Syntax {
            typescript: true,
            ..Syntax::default()
        },
        verify: true,
        ..CompileOptions::default()
    };
    let output = transform("function f(this u: User, n: number) { return u.name + n; }", &options);
    assert!(!output.has_errors());
    let code = output.code.unwrap();
    assert!(code.starts_with("function f(this: User, n: number) {\n"));
    assert!(code.contains("const u = this;"));
    assert!(output
        .diagnostics
        .iter()
        .all(|d| d.code != DiagnosticCode::OutputVerification));
}

#[test]
fn unused_receiver_is_only_a_hint() {
    let output = transform("function f(this unused) { return 1; }", &CompileOptions::default());
    assert!(!output.has_errors());
    assert!(output.code.is_some());
    assert_eq!(output.diagnostics.codes(), vec![DiagnosticCode::UnusedReceiver]);
}

#[test]
fn receiver_in_later_parameter_default_is_rejected() {
    let source = "const self = 1; function f(this self, x = self.y) { return x; }";
    assert_eq!(error_codes(source), vec![DiagnosticCode::ReceiverInDefault]);
}

#[test]
fn this_in_ordinary_parameter_default_is_rejected() {
    assert_eq!(
        error_codes("function f(this self, x = this.y) { return [self, x]; }"),
        vec![DiagnosticCode::IllegalThisReference]
    );
}

#[test]
fn receiver_pattern_default_may_read_parameters() {
    let code = lower_ok("function f(this { a = b }, b) { return a; }");
    assert!(code.starts_with("function f(b) {\n"));
    assert!(code.contains("  const { a = b } = this;\n"));
}

#[test]
fn body_rebinding_guard_globals_is_rejected() {
    assert_eq!(
        error_codes("function f(this a) { let TypeError = 1; let globalThis = 2; return a; }"),
        vec![
            DiagnosticCode::ShadowedGuardName,
            DiagnosticCode::ShadowedGuardName
        ]
    );
}

#[test]
fn local_undefined_does_not_affect_guard() {
    let code = lower_ok("function f(this a) { let undefined = 1; return a; }");
    assert!(code.contains("if (new.target !== void 0) throw"));
    assert!(code.contains("  let undefined = 1;\n"));
}

#[test]
fn async_function_checks_receiver_at_call() {
    let options = CompileOptions {
        verify: true,
        ..CompileOptions::default()
    };
    let code = lower_with(
        "async function load(this api, id) { return await api.get(id); }",
        &options,
    );
    assert!(code.starts_with("function load(id) {\n"));
    assert!(code.contains("ConstructedReceiverError: load"));
    assert!(code.contains("  const api = this;\n"));
    assert!(code.contains("  return (async () => {\n"));
    assert!(code.contains("    return await api.get(id);\n"));

    let output = transform(
        "async function load(this api, id) { return await api.get(id); }",
        &options,
    );
    assert!(output
        .diagnostics
        .iter()
        .all(|d| d.code != DiagnosticCode::OutputVerification));
}

#[test]
fn generator_checks_receiver_at_call() {
    let options = CompileOptions {
        verify: true,
        ..CompileOptions::default()
    };
    let output = transform("function* each(this list) { yield* list; }", &options);
    assert!(!output.has_errors());
    assert!(output
        .diagnostics
        .iter()
        .all(|d| d.code != DiagnosticCode::OutputVerification));
    let code = output.code.unwrap();
    assert!(code.starts_with("function each() {\n"));
    assert!(code.contains("  return function*() {\n"));
    assert!(code.contains(".apply(this, arguments);\n"));
    assert_eq!(output.stats.delegated, 1);
}
