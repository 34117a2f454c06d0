//! Function call compilation.
//!
//! Arguments are matched against the callee's formals by position. An
//! argument whose type equals the formal type is compiled as is. An
//! argument that does not match, passed where a function `(P...) -> T` is
//! expected, is promoted when its own type is `T`: the expression must be a
//! constant, and is wrapped into a synthetic function
//! `_lambda_<n>$constant(P...) -> T` that ignores its arguments and returns
//! the constant. The wrapper is compiled on the spot by a nested
//! [`FunctionCompiler`] and passed as a bound function value.
//!
//! Wrappers are deduplicated per compilation unit by expected type and
//! expression text, so promoting `1.0` twice yields one wrapper.

use euclin_core::ast::{CallExpr, Expr, Instruction, ReturnInstr};
use euclin_core::{
    Argument, CompilationError, FunctionSignature, FunctionType, Result, TypeDefinition,
};
use log::debug;

use super::identifiers::compile_function_value;
use crate::constant_checker::ConstantChecker;
use crate::function_compiler::FunctionCompiler;
use crate::module::FunctionFlags;

/// Compile a call to a named function.
pub(super) fn compile_call(compiler: &mut FunctionCompiler<'_, '_>, call: &CallExpr<'_>) -> Result<()> {
    let callee = compiler.functions().get(call.callee.name).ok_or_else(|| {
        CompilationError::UnknownIdentifier {
            name: call.callee.name.to_string(),
            span: call.callee.span,
        }
    })?;

    if call.args.len() != callee.arity() {
        return Err(CompilationError::ArgumentCountMismatch {
            function: callee.name().to_string(),
            expected: callee.arity(),
            actual: call.args.len(),
            span: call.span,
        });
    }

    for (position, (arg, formal)) in call.args.iter().zip(callee.arguments()).enumerate() {
        compile_argument(compiler, callee, position, arg, formal)?;
    }

    let arg_count = u8::try_from(call.args.len())
        .map_err(|_| CompilationError::internal("too many call arguments", call.text, call.span))?;
    let returns = callee.return_type();

    compiler
        .emitter()
        .emit_call(callee.hash(), arg_count, !returns.is_no_value());
    if !returns.is_no_value() {
        compiler.stack().push(returns.clone());
    }
    Ok(())
}

fn compile_argument(
    compiler: &mut FunctionCompiler<'_, '_>,
    callee: &FunctionSignature,
    position: usize,
    arg: &Expr<'_>,
    formal: &Argument,
) -> Result<()> {
    let actual = compiler.translator().translate(arg)?.ty;

    if actual == formal.ty {
        compiler.compile_operand(arg)?;
        return Ok(());
    }

    match formal.ty.as_function() {
        Some(expected) if *expected.returns == actual => {
            promote_constant(compiler, arg, &formal.ty, expected)?;
            compiler.stack().pop(arg.text(), arg.span())?;
            Ok(())
        }
        _ => Err(CompilationError::ArgumentTypeMismatch {
            function: callee.name().to_string(),
            position,
            argument: formal.name.clone(),
            expected: formal.ty.to_string(),
            actual: actual.to_string(),
            span: arg.span(),
        }),
    }
}

/// Wrap a constant into a function value of type `expected`.
///
/// Leaves the function type on the type stack for the caller to consume.
fn promote_constant(
    compiler: &mut FunctionCompiler<'_, '_>,
    expr: &Expr<'_>,
    expected_ty: &TypeDefinition,
    expected: &FunctionType,
) -> Result<()> {
    let key = format!("{}:{}", expected_ty.descriptor(), expr.text());

    if let Some(existing) = compiler.unit().constant_wrapper(&key).cloned() {
        debug!("reusing {} for constant {}", existing.name(), expr.text());
        compile_function_value(compiler, &existing);
        return Ok(());
    }

    ConstantChecker::new(compiler.functions(), compiler.options().max_nesting_depth)
        .assert_constant(expr)?;

    let id = compiler.unit().next_synthetic_id();
    let arguments = expected
        .params
        .iter()
        .enumerate()
        .map(|(i, ty)| {
            let name = if i == 0 {
                "_".to_string()
            } else {
                format!("_{}", i)
            };
            Argument::new(name, ty.clone())
        })
        .collect();
    let owner = compiler.unit().owner();
    let signature = FunctionSignature::new(
        format!("_lambda_{}$constant", id),
        arguments,
        (*expected.returns).clone(),
        owner,
    )
    .with_pure(true);

    let span = expr.span();
    let body = [Instruction::Return(ReturnInstr { value: *expr, span })];
    let depth = compiler.depth() + 1;
    let (unit, constants, lambdas) = compiler.nested_parts();
    FunctionCompiler::new(
        unit,
        constants,
        lambdas,
        signature.clone(),
        FunctionFlags::synthetic(),
        span,
        depth,
    )?
    .compile_body(&body)?;

    debug!(
        "promoted constant {} to {}{}",
        expr.text(),
        signature.name(),
        signature.descriptor()
    );
    compiler
        .unit()
        .remember_constant_wrapper(key, signature.clone());
    compile_function_value(compiler, &signature);
    Ok(())
}
