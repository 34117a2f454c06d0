//! Instruction compilation.
//!
//! A function body is a flat list of instructions: bare expressions,
//! explicit returns, and (rejected) nested function declarations. The
//! driver in [`FunctionCompiler`] discards what each non-final instruction
//! leaves on the stack and synthesizes the return of the last one.

mod return_stmt;

use euclin_core::ast::Instruction;
use euclin_core::{CompilationError, Result};

use crate::function_compiler::FunctionCompiler;

impl<'a, 'u> FunctionCompiler<'a, 'u> {
    /// Compile one instruction of the body.
    pub(crate) fn compile_instruction(&mut self, instr: &Instruction<'_>) -> Result<()> {
        match instr {
            Instruction::Expr(expr) => self.compile_expr(expr),
            Instruction::Return(ret) => self.compile_return(ret),
            Instruction::FunctionDecl(decl) => Err(CompilationError::NestedDeclarationForbidden {
                name: decl.name.name.to_string(),
                span: decl.span,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::Fixture;
    use bumpalo::Bump;
    use euclin_core::CompilationError;
    use euclin_core::ast::AstBuilder;

    #[test]
    fn nested_declaration_is_rejected() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let fixture = Fixture::new();

        let err = fixture
            .compile(
                "main",
                &[ast.function("inner", &[ast.expr(ast.unit())])],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            CompilationError::NestedDeclarationForbidden { ref name, .. } if name == "inner"
        ));
    }
}
