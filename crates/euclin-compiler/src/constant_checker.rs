//! Compile-time constant verification.
//!
//! An expression is constant when it can be evaluated from literals and
//! pure functions alone. Promotion of a bare value into a function value is
//! only allowed for constants, so the check gates every promotion the
//! [`FunctionCompiler`](crate::FunctionCompiler) performs.
//!
//! | Expression              | Constant?                                  |
//! |-------------------------|--------------------------------------------|
//! | `Int`, `Real`, `Bool`   | yes                                        |
//! | `f(a, b, ...)`          | `f` is pure and every argument is constant |
//! | `_`                     | never, it is an unbound parameter          |
//! | anything else           | no                                         |

use euclin_core::ast::{Expr, LiteralKind};
use euclin_core::{CompilationError, FunctionTable, Result};

/// Answers whether an expression is a compile-time constant.
///
/// Stateless apart from its borrowed inputs: checking the same node twice
/// gives the same answer.
pub struct ConstantChecker<'a> {
    functions: &'a FunctionTable,
    max_depth: u32,
}

impl<'a> ConstantChecker<'a> {
    /// Create a checker over the visible functions.
    pub fn new(functions: &'a FunctionTable, max_depth: u32) -> Self {
        Self {
            functions,
            max_depth,
        }
    }

    /// Whether `expr` is constant.
    ///
    /// Expressions nested deeper than the configured ceiling are treated as
    /// non-constant.
    pub fn is_constant(&self, expr: &Expr<'_>) -> bool {
        self.check(expr, 0)
    }

    /// Fail with `NonConstantExpression` unless `expr` is constant.
    pub fn assert_constant(&self, expr: &Expr<'_>) -> Result<()> {
        if self.is_constant(expr) {
            Ok(())
        } else {
            Err(CompilationError::NonConstantExpression {
                text: expr.text().to_string(),
                span: expr.span(),
            })
        }
    }

    fn check(&self, expr: &Expr<'_>, depth: u32) -> bool {
        if depth > self.max_depth {
            return false;
        }

        match expr {
            Expr::Literal(lit) => matches!(
                lit.kind,
                LiteralKind::Int(_) | LiteralKind::Float(_) | LiteralKind::Bool(_)
            ),
            Expr::Call(call) => {
                let pure = self
                    .functions
                    .get(call.callee.name)
                    .is_some_and(|f| f.is_pure());
                pure && call.args.iter().all(|arg| self.check(arg, depth + 1))
            }
            Expr::LambdaVar(_) => false,
            Expr::Couple(_) | Expr::Var(_) | Expr::Lambda(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use euclin_core::ast::AstBuilder;
    use euclin_core::{Argument, FunctionSignature, TypeDefinition};

    fn functions() -> FunctionTable {
        [
            FunctionSignature::new(
                "sin",
                vec![Argument::new("x", TypeDefinition::Real)],
                TypeDefinition::Real,
                "Std",
            )
            .with_pure(true),
            FunctionSignature::new(
                "add",
                vec![
                    Argument::new("a", TypeDefinition::Real),
                    Argument::new("b", TypeDefinition::Real),
                ],
                TypeDefinition::Real,
                "Std",
            )
            .with_pure(true),
            FunctionSignature::new("random", vec![], TypeDefinition::Real, "Std"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn literals() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let functions = functions();
        let checker = ConstantChecker::new(&functions, 64);

        assert!(checker.is_constant(&ast.int(1)));
        assert!(checker.is_constant(&ast.float(1.5)));
        assert!(checker.is_constant(&ast.bool(true)));
        assert!(!checker.is_constant(&ast.string("s")));
        assert!(!checker.is_constant(&ast.unit()));
    }

    #[test]
    fn pure_calls_with_constant_arguments() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let functions = functions();
        let checker = ConstantChecker::new(&functions, 64);

        let nested = ast.call("add", &[ast.call("sin", &[ast.float(1.0)]), ast.int(2)]);
        assert!(checker.is_constant(&nested));
    }

    #[test]
    fn impure_or_unknown_calls() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let functions = functions();
        let checker = ConstantChecker::new(&functions, 64);

        assert!(!checker.is_constant(&ast.call("random", &[])));
        assert!(!checker.is_constant(&ast.call("sin", &[ast.call("random", &[])])));
        assert!(!checker.is_constant(&ast.call("nope", &[])));
    }

    #[test]
    fn placeholder_and_names_are_not_constant() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let functions = functions();
        let checker = ConstantChecker::new(&functions, 64);

        assert!(!checker.is_constant(&ast.placeholder()));
        assert!(!checker.is_constant(&ast.call("sin", &[ast.placeholder()])));
        assert!(!checker.is_constant(&ast.var("sin")));
        assert!(!checker.is_constant(&ast.couple(ast.int(1), ast.int(2))));
        assert!(!checker.is_constant(&ast.lambda(ast.float(1.0))));
    }

    #[test]
    fn assert_constant_reports_text() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let functions = functions();
        let checker = ConstantChecker::new(&functions, 64);

        assert!(checker.assert_constant(&ast.float(2.0)).is_ok());
        let err = checker
            .assert_constant(&ast.call("sin", &[ast.call("random", &[])]))
            .unwrap_err();
        assert!(matches!(
            err,
            CompilationError::NonConstantExpression { ref text, .. } if text == "sin(random())"
        ));
    }

    #[test]
    fn repeated_checks_agree() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let functions = functions();
        let checker = ConstantChecker::new(&functions, 64);

        for expr in [
            ast.call("sin", &[ast.float(1.0)]),
            ast.call("random", &[]),
            ast.placeholder(),
        ] {
            assert_eq!(checker.is_constant(&expr), checker.is_constant(&expr));
        }
    }

    #[test]
    fn depth_ceiling() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let functions = functions();

        let deep = ast.call("sin", &[ast.call("sin", &[ast.call("sin", &[ast.float(1.0)])])]);
        assert!(ConstantChecker::new(&functions, 8).is_constant(&deep));
        assert!(!ConstantChecker::new(&functions, 2).is_constant(&deep));
    }
}
