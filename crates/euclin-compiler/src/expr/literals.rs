//! Literal expression compilation.
//!
//! Compiles literal values (integers, reals, strings, booleans, unit).

use euclin_core::Result;
use euclin_core::ast::{LiteralExpr, LiteralKind};

use crate::function_compiler::FunctionCompiler;
use crate::translate::literal_type;

/// Compile a literal expression.
pub(super) fn compile_literal(
    compiler: &mut FunctionCompiler<'_, '_>,
    lit: &LiteralExpr<'_>,
) -> Result<()> {
    let emitter = compiler.emitter();
    match lit.kind {
        LiteralKind::Int(value) => emitter.emit_int(value),
        LiteralKind::Float(value) => emitter.emit_real(value),
        LiteralKind::Bool(value) => emitter.emit_bool(value),
        LiteralKind::String(value) => emitter.emit_string(value),
        LiteralKind::Unit => emitter.emit_unit(),
    }

    compiler.stack().push(literal_type(&lit.kind));
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::bytecode::{Constant, OpCode};
    use crate::testing::Fixture;
    use bumpalo::Bump;
    use euclin_core::ast::AstBuilder;

    #[test]
    fn literals_in_a_unit_function() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let fixture = Fixture::new();

        let module = fixture
            .compile_module(
                "main",
                &[
                    ast.expr(ast.int(7)),
                    ast.expr(ast.float(0.5)),
                    ast.expr(ast.bool(true)),
                    ast.expr(ast.string("hi")),
                    ast.expr(ast.unit()),
                ],
            )
            .unwrap();

        module.bytecode("main").unwrap().assert_opcodes(&[
            OpCode::Constant,
            OpCode::Pop,
            OpCode::Constant,
            OpCode::Pop,
            OpCode::PushTrue,
            OpCode::Pop,
            OpCode::Constant,
            OpCode::Pop,
            OpCode::PushUnit,
            OpCode::ReturnRef,
        ]);

        let constants = module.constants();
        assert_eq!(constants.get(0), Some(&Constant::Int(7)));
        assert_eq!(constants.get(1), Some(&Constant::Real(0.5.into())));
        assert_eq!(constants.get(2), Some(&Constant::StringData(b"hi".to_vec())));
    }

    #[test]
    fn false_literal() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let fixture = Fixture::new();

        fixture
            .compile("is_zero", &[ast.ret(ast.bool(false))])
            .unwrap()
            .assert_opcodes(&[OpCode::PushFalse, OpCode::ReturnBool]);
    }
}
