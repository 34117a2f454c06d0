//! Names, the lambda placeholder, and lambda literals.
//!
//! A name resolves to an argument slot first and to a known function
//! second. Referencing a function by name does not call it: it produces a
//! bound function value, the same value a lambda literal or a promoted
//! constant produces.

use euclin_core::ast::{LambdaExpr, LambdaVarExpr, VarExpr};
use euclin_core::{CompilationError, FunctionSignature, Result, TypeDefinition};

use crate::bytecode::{FunctionValue, ValueKind};
use crate::function_compiler::FunctionCompiler;

/// Compile a variable or function-name reference.
pub(super) fn compile_var(compiler: &mut FunctionCompiler<'_, '_>, var: &VarExpr<'_>) -> Result<()> {
    let name = var.ident.name;

    if let Some(local) = compiler.locals().get(name) {
        let slot = local.slot;
        let ty = local.ty.clone();
        compiler.emitter().emit_load(ValueKind::of(&ty), slot);
        compiler.stack().push(ty);
        return Ok(());
    }

    match compiler.functions().get(name) {
        Some(signature) => {
            compile_function_value(compiler, signature);
            Ok(())
        }
        None => Err(CompilationError::UnknownIdentifier {
            name: name.to_string(),
            span: var.ident.span,
        }),
    }
}

/// Compile the lambda placeholder `_`.
///
/// Only valid inside a hoisted lambda, whose single `Real` argument is
/// named `_` and lives in slot 0.
pub(super) fn compile_placeholder(
    compiler: &mut FunctionCompiler<'_, '_>,
    placeholder: &LambdaVarExpr,
) -> Result<()> {
    let slot = match compiler.locals().get(LambdaVarExpr::TEXT) {
        Some(local) if local.ty == TypeDefinition::Real => local.slot,
        _ => {
            return Err(CompilationError::UnknownIdentifier {
                name: LambdaVarExpr::TEXT.to_string(),
                span: placeholder.span,
            });
        }
    };

    compiler.emitter().emit_load(ValueKind::Real, slot);
    compiler.stack().push(TypeDefinition::Real);
    Ok(())
}

/// Compile an inline lambda in value position.
///
/// The lambda must have been hoisted; a miss means the hoister did not run
/// over the enclosing block.
pub(super) fn compile_lambda(
    compiler: &mut FunctionCompiler<'_, '_>,
    lambda: &LambdaExpr<'_>,
) -> Result<()> {
    let signature = compiler.lambdas().get(lambda.text).ok_or_else(|| {
        CompilationError::internal("lambda was not hoisted", lambda.text, lambda.span)
    })?;

    compile_function_value(compiler, signature);
    Ok(())
}

/// Emit a bound function value over `signature` and push its function type.
pub(super) fn compile_function_value(
    compiler: &mut FunctionCompiler<'_, '_>,
    signature: &FunctionSignature,
) {
    let ty = signature.to_type();
    compiler.emitter().emit_bind_function(FunctionValue {
        target: signature.hash(),
        name: signature.name().to_string(),
        ty: ty.clone(),
    });
    compiler.stack().push(ty);
}

#[cfg(test)]
mod tests {
    use crate::bytecode::{Constant, OpCode};
    use crate::testing::Fixture;
    use bumpalo::Bump;
    use euclin_core::CompilationError;
    use euclin_core::ast::AstBuilder;

    #[test]
    fn argument_loads_follow_type() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let fixture = Fixture::new();

        fixture
            .compile("count", &[ast.expr(ast.var("n"))])
            .unwrap()
            .assert_opcodes(&[OpCode::LoadInt, OpCode::ReturnInt]);
    }

    #[test]
    fn function_name_is_a_value() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let fixture = Fixture::new();

        let module = fixture
            .compile_module("pick", &[ast.expr(ast.var("sin"))])
            .unwrap();
        module
            .bytecode("pick")
            .unwrap()
            .assert_opcodes(&[OpCode::BindFunction, OpCode::ReturnRef]);

        let bound = module.constants().constants().iter().find_map(|c| match c {
            Constant::FunctionValue(value) => Some(value),
            _ => None,
        });
        let bound = bound.unwrap();
        assert_eq!(bound.name, "sin");
        assert_eq!(bound.ty.to_string(), "(Real) -> Real");
    }

    #[test]
    fn unknown_name() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let fixture = Fixture::new();

        let err = fixture
            .compile("area", &[ast.expr(ast.var("width"))])
            .unwrap_err();
        assert!(matches!(err, CompilationError::UnknownIdentifier { ref name, .. } if name == "width"));
    }

    #[test]
    fn placeholder_outside_a_lambda() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let fixture = Fixture::new();

        let err = fixture
            .compile("area", &[ast.expr(ast.placeholder())])
            .unwrap_err();
        assert!(matches!(err, CompilationError::UnknownIdentifier { ref name, .. } if name == "_"));
    }

    #[test]
    fn unhoisted_lambda_is_internal() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let fixture = Fixture::new();

        let err = fixture
            .compile("pick", &[ast.expr(ast.lambda(ast.placeholder()))])
            .unwrap_err();
        assert!(err.is_internal());
        assert!(err.to_string().contains("{_}"));
    }
}
