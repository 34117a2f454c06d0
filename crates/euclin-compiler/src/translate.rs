//! Expression type translation.
//!
//! [`ExprTranslator`] answers "what type would this expression produce?"
//! without emitting anything. The function compiler asks before it commits
//! to code (pair element checks, argument promotion) and the lambda hoister
//! uses it to type lambda bodies. Translation has no side effects, so it can
//! be repeated on the same node with the same answer.
//!
//! ## Rules
//!
//! - literals: their canonical type
//! - `(a, b)`: `IntPoint` when both are `Int`, `RealPoint` otherwise; the
//!   element types must match
//! - names: a local's type, else the function type of a known function
//! - `_`: `Real`
//! - `{ body }`: `(Real) -> T` where `T` is the body's type; lambda bodies
//!   only see `_` and functions, never the enclosing locals
//! - calls: the callee's return type

use euclin_core::ast::{Expr, LiteralKind};
use euclin_core::{CompilationError, FunctionSignature, FunctionTable, Result, TypeDefinition};

use crate::lambda::LambdaTable;
use crate::scope::LocalScope;

/// Result of translating an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    /// Type the expression produces.
    pub ty: TypeDefinition,
    /// Signature behind a function-valued expression, when known.
    pub signature: Option<FunctionSignature>,
}

impl Translation {
    fn of(ty: TypeDefinition) -> Self {
        Self { ty, signature: None }
    }
}

/// Computes expression types against the visible functions and locals.
pub struct ExprTranslator<'a> {
    functions: &'a FunctionTable,
    locals: Option<&'a LocalScope>,
    lambdas: Option<&'a LambdaTable>,
    max_depth: u32,
}

impl<'a> ExprTranslator<'a> {
    /// Create a translator that only knows about functions.
    pub fn new(functions: &'a FunctionTable, max_depth: u32) -> Self {
        Self {
            functions,
            locals: None,
            lambdas: None,
            max_depth,
        }
    }

    /// Resolve names against these locals first.
    pub fn with_locals(mut self, locals: &'a LocalScope) -> Self {
        self.locals = Some(locals);
        self
    }

    /// Report hoisted signatures for lambda literals.
    pub fn with_lambdas(mut self, lambdas: &'a LambdaTable) -> Self {
        self.lambdas = Some(lambdas);
        self
    }

    /// Translate an expression.
    pub fn translate(&self, expr: &Expr<'_>) -> Result<Translation> {
        self.translate_at(expr, self.locals, 0)
    }

    fn translate_at(
        &self,
        expr: &Expr<'_>,
        locals: Option<&LocalScope>,
        depth: u32,
    ) -> Result<Translation> {
        if depth > self.max_depth {
            return Err(CompilationError::NestingTooDeep {
                limit: self.max_depth,
                span: expr.span(),
            });
        }

        match expr {
            Expr::Literal(lit) => Ok(Translation::of(literal_type(&lit.kind))),

            Expr::Couple(couple) => {
                let first = self.translate_at(&couple.first, locals, depth + 1)?.ty;
                let second = self.translate_at(&couple.second, locals, depth + 1)?.ty;
                pair_type(&first, &second, couple.span).map(Translation::of)
            }

            Expr::Var(var) => {
                let name = var.ident.name;
                if let Some(local) = locals.and_then(|l| l.get(name)) {
                    return Ok(Translation::of(local.ty.clone()));
                }
                match self.functions.get(name) {
                    Some(signature) => Ok(Translation {
                        ty: signature.to_type(),
                        signature: Some(signature.clone()),
                    }),
                    None => Err(CompilationError::UnknownIdentifier {
                        name: name.to_string(),
                        span: var.ident.span,
                    }),
                }
            }

            Expr::LambdaVar(_) => Ok(Translation::of(TypeDefinition::Real)),

            Expr::Lambda(lambda) => {
                let body = self.translate_at(&lambda.body, None, depth + 1)?.ty;
                Ok(Translation {
                    ty: TypeDefinition::function(vec![TypeDefinition::Real], body),
                    signature: self
                        .lambdas
                        .and_then(|table| table.get(lambda.text))
                        .cloned(),
                })
            }

            Expr::Call(call) => match self.functions.get(call.callee.name) {
                Some(signature) => Ok(Translation::of(signature.return_type().clone())),
                None => Err(CompilationError::UnknownIdentifier {
                    name: call.callee.name.to_string(),
                    span: call.callee.span,
                }),
            },
        }
    }
}

/// Canonical type of a literal.
pub fn literal_type(kind: &LiteralKind<'_>) -> TypeDefinition {
    match kind {
        LiteralKind::Int(_) => TypeDefinition::Integer,
        LiteralKind::Float(_) => TypeDefinition::Real,
        LiteralKind::Bool(_) => TypeDefinition::Boolean,
        LiteralKind::String(_) => TypeDefinition::String,
        LiteralKind::Unit => TypeDefinition::NoValue,
    }
}

/// Composite type of a pair with the given element types.
pub fn pair_type(
    first: &TypeDefinition,
    second: &TypeDefinition,
    span: euclin_core::Span,
) -> Result<TypeDefinition> {
    if first != second {
        return Err(CompilationError::CoupleTypeMismatch {
            first: first.to_string(),
            second: second.to_string(),
            span,
        });
    }
    Ok(match first {
        TypeDefinition::Integer => TypeDefinition::IntegerPair,
        _ => TypeDefinition::RealPair,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use euclin_core::Argument;
    use euclin_core::Span;
    use euclin_core::ast::AstBuilder;

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
                "print",
                vec![Argument::new("s", TypeDefinition::String)],
                TypeDefinition::NoValue,
                "Std",
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn literals_and_pairs() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let functions = functions();
        let translator = ExprTranslator::new(&functions, 64);

        let ty = |e| translator.translate(&e).unwrap().ty;
        assert_eq!(ty(ast.int(1)), TypeDefinition::Integer);
        assert_eq!(ty(ast.unit()), TypeDefinition::NoValue);
        assert_eq!(ty(ast.couple(ast.int(1), ast.int(2))), TypeDefinition::IntegerPair);
        assert_eq!(ty(ast.couple(ast.float(1.0), ast.float(2.0))), TypeDefinition::RealPair);
    }

    #[test]
    fn mismatched_pair() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let functions = functions();
        let translator = ExprTranslator::new(&functions, 64);

        let err = translator
            .translate(&ast.couple(ast.int(1), ast.float(2.0)))
            .unwrap_err();
        assert!(matches!(err, CompilationError::CoupleTypeMismatch { .. }));
    }

    #[test]
    fn names_resolve_locals_then_functions() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let functions = functions();
        let mut locals = LocalScope::new();
        locals
            .declare("sin", TypeDefinition::Integer, "f", Span::default())
            .unwrap();

        let plain = ExprTranslator::new(&functions, 64);
        let translation = plain.translate(&ast.var("sin")).unwrap();
        assert_eq!(
            translation.ty,
            TypeDefinition::function(vec![TypeDefinition::Real], TypeDefinition::Real)
        );
        assert_eq!(translation.signature.map(|s| s.name().to_string()), Some("sin".into()));

        let scoped = ExprTranslator::new(&functions, 64).with_locals(&locals);
        assert_eq!(scoped.translate(&ast.var("sin")).unwrap().ty, TypeDefinition::Integer);

        let err = plain.translate(&ast.var("nope")).unwrap_err();
        assert!(matches!(err, CompilationError::UnknownIdentifier { ref name, .. } if name == "nope"));
    }

    #[test]
    fn lambdas_and_calls() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let functions = functions();
        let translator = ExprTranslator::new(&functions, 64);

        let lambda = ast.lambda(ast.call("sin", &[ast.placeholder()]));
        let translation = translator.translate(&lambda).unwrap();
        assert_eq!(
            translation.ty,
            TypeDefinition::function(vec![TypeDefinition::Real], TypeDefinition::Real)
        );
        assert!(translation.signature.is_none());

        let call = ast.call("print", &[ast.string("hi")]);
        assert_eq!(translator.translate(&call).unwrap().ty, TypeDefinition::NoValue);
    }

    #[test]
    fn lambda_bodies_do_not_see_locals() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let functions = functions();
        let mut locals = LocalScope::new();
        locals
            .declare("x", TypeDefinition::Real, "f", Span::default())
            .unwrap();
        let translator = ExprTranslator::new(&functions, 64).with_locals(&locals);

        let err = translator.translate(&ast.lambda(ast.var("x"))).unwrap_err();
        assert!(matches!(err, CompilationError::UnknownIdentifier { .. }));
    }

    #[test]
    fn depth_ceiling() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let functions = functions();
        let translator = ExprTranslator::new(&functions, 2);

        let deep = ast.couple(
            ast.couple(ast.couple(ast.int(1), ast.int(1)), ast.couple(ast.int(1), ast.int(1))),
            ast.int(1),
        );
        let err = translator.translate(&deep).unwrap_err();
        assert!(matches!(err, CompilationError::NestingTooDeep { limit: 2, .. }));
    }

    #[test]
    fn translation_is_repeatable() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let functions = functions();
        let translator = ExprTranslator::new(&functions, 64);
        let expr = ast.call("sin", &[ast.float(0.5)]);

        assert_eq!(translator.translate(&expr).unwrap(), translator.translate(&expr).unwrap());
    }
}
