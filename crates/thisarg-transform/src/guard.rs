//! Guard and binding statements injected at the top of a lowered body.

use thisarg_diagnostics::Span;
use thisarg_parser::ast::{
    BinaryOp, Block, Expr, ExprOrSpread, Function, FunctionBody, FunctionKind, Ident, Lit,
    MemberProp, Number, Pat, Stmt, UnaryOp, VarDecl, VarDeclarator, VarKind,
};

/// Errors the injected guards throw at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    /// Called without a receiver (bare call, `undefined`/`null` receiver)
    MissingReceiver,
    /// Invoked with `new`
    ConstructedReceiver,
}

impl RuntimeErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            RuntimeErrorKind::MissingReceiver => "X101",
            RuntimeErrorKind::ConstructedReceiver => "X102",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RuntimeErrorKind::MissingReceiver => "MissingReceiverError",
            RuntimeErrorKind::ConstructedReceiver => "ConstructedReceiverError",
        }
    }

    /// Text of the `TypeError` thrown for `function`.
    pub fn message(self, function: &str) -> String {
        match self {
            RuntimeErrorKind::MissingReceiver => {
                format!("{}: {} must be called with a receiver", self.name(), function)
            }
            RuntimeErrorKind::ConstructedReceiver => {
                format!("{}: {} cannot be called with new", self.name(), function)
            }
        }
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        span: Span::DUMMY,
    }
}

fn this() -> Expr {
    Expr::This(Span::DUMMY)
}

/// `void 0`, which a local `undefined` cannot capture.
fn void_zero() -> Expr {
    Expr::Unary {
        op: UnaryOp::Void,
        arg: Box::new(Expr::Lit(Lit::Num(Number {
            raw: "0".to_string(),
            span: Span::DUMMY,
        }))),
        span: Span::DUMMY,
    }
}

/// `if (<test>) throw new TypeError("<message>");`
fn throw_if(test: Expr, kind: RuntimeErrorKind, function: &str) -> Stmt {
    let error = Expr::New {
        callee: Box::new(Expr::ident("TypeError")),
        args: Some(vec![ExprOrSpread {
            spread: false,
            expr: Expr::string(&kind.message(function)),
        }]),
        span: Span::DUMMY,
    };
    Stmt::If {
        test,
        cons: Box::new(Stmt::Throw {
            arg: error,
            span: Span::DUMMY,
        }),
        alt: None,
        span: Span::DUMMY,
    }
}

/// `if (new.target !== void 0) throw ...`
pub fn construct_guard(function: &str) -> Stmt {
    let new_target = Expr::MetaProp {
        meta: Ident::new("new", Span::DUMMY),
        prop: Ident::new("target", Span::DUMMY),
        span: Span::DUMMY,
    };
    throw_if(
        binary(BinaryOp::NotEqEq, new_target, void_zero()),
        RuntimeErrorKind::ConstructedReceiver,
        function,
    )
}

/// `if (this == null) throw ...`, widened with `|| this === globalThis`
/// where a sloppy bare call would substitute the global object.
pub fn receiver_guard(function: &str, global_counts_as_missing: bool) -> Stmt {
    let mut test = binary(BinaryOp::EqEq, this(), Expr::Lit(Lit::Null(Span::DUMMY)));
    if global_counts_as_missing {
        test = binary(
            BinaryOp::LogicalOr,
            test,
            binary(BinaryOp::EqEqEq, this(), Expr::ident("globalThis")),
        );
    }
    throw_if(test, RuntimeErrorKind::MissingReceiver, function)
}

/// `const <target> = this;`
pub fn receiver_binding(target: Pat) -> Stmt {
    Stmt::Var(VarDecl {
        kind: VarKind::Const,
        decls: vec![VarDeclarator {
            target,
            type_ann: None,
            init: Some(this()),
            span: Span::DUMMY,
        }],
        span: Span::DUMMY,
    })
}

/// Call expression that runs `stmts` as the body of a generator or async
/// function and returns its iterator or promise.
///
/// Async bodies become an async arrow so `super`, `arguments` and `this`
/// keep their meaning. Generators have no arrow form and are applied to the
/// current `this` and `arguments` instead.
pub fn delegate_body(stmts: Vec<Stmt>, is_async: bool, is_generator: bool, strict: bool) -> Expr {
    let inner = Function {
        kind: if is_generator {
            FunctionKind::Ordinary
        } else {
            FunctionKind::Arrow
        },
        name: None,
        receiver: None,
        this_annotation: None,
        params: Vec::new(),
        body: FunctionBody::Block(Block {
            stmts,
            span: Span::DUMMY,
        }),
        return_type: None,
        is_async,
        is_generator,
        strict,
        span: Span::DUMMY,
    };

    if !is_generator {
        return Expr::Call {
            callee: Box::new(Expr::Arrow(Box::new(inner))),
            args: Vec::new(),
            optional: false,
            span: Span::DUMMY,
        };
    }
    let apply = Expr::Member {
        object: Box::new(Expr::Function(Box::new(inner))),
        prop: MemberProp::Ident(Ident::new("apply", Span::DUMMY)),
        optional: false,
        span: Span::DUMMY,
    };
    Expr::Call {
        callee: Box::new(apply),
        args: vec![
            ExprOrSpread {
                spread: false,
                expr: this(),
            },
            ExprOrSpread {
                spread: false,
                expr: Expr::ident("arguments"),
            },
        ],
        optional: false,
        span: Span::DUMMY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_error() {
        assert_eq!(
            RuntimeErrorKind::MissingReceiver.message("fullName"),
            "MissingReceiverError: fullName must be called with a receiver"
        );
        assert_eq!(RuntimeErrorKind::ConstructedReceiver.code(), "X102");
    }

    #[test]
    fn test_sloppy_guard_checks_global() {
        let Stmt::If { test, .. } = receiver_guard("f", true) else {
            panic!("guard is an if statement");
        };
        assert!(matches!(
            test,
            Expr::Binary {
                op: BinaryOp::LogicalOr,
                ..
            }
        ));

        let Stmt::If { test, cons, .. } = receiver_guard("f", false) else {
            panic!("guard is an if statement");
        };
        assert!(matches!(test, Expr::Binary { op: BinaryOp::EqEq, .. }));
        assert!(matches!(*cons, Stmt::Throw { .. }));
    }

    #[test]
    fn test_construct_guard_avoids_undefined_name() {
        let Stmt::If { test, .. } = construct_guard("f") else {
            panic!("guard is an if statement");
        };
        let Expr::Binary { right, .. } = test else {
            panic!("guard compares new.target");
        };
        assert!(matches!(*right, Expr::Unary { op: UnaryOp::Void, .. }));
    }

    #[test]
    fn test_delegate_shapes() {
        let async_call = delegate_body(Vec::new(), true, false, false);
        let Expr::Call { callee, args, .. } = async_call else {
            panic!("delegate is a call");
        };
        assert!(args.is_empty());
        assert!(matches!(&*callee, Expr::Arrow(f) if f.is_async));

        let generator_call = delegate_body(Vec::new(), false, true, false);
        let Expr::Call { callee, args, .. } = generator_call else {
            panic!("delegate is a call");
        };
        assert_eq!(args.len(), 2);
        assert!(matches!(&*callee, Expr::Member { object, .. }
            if matches!(&**object, Expr::Function(f) if f.is_generator)));
    }
}
