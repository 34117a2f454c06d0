//! Euclin Compiler
//!
//! Function-body code generator and lambda hoisting pass for Euclin.
//!
//! ## Architecture
//!
//! - **Hoisting**: every inline lambda of a block is lifted into a
//!   deduplicated synthetic function and compiled first
//! - **Compilation**: each function body is compiled to stack-machine
//!   bytecode while an abstract operand type stack verifies every sequence
//!
//! ## Modules
//!
//! - [`bytecode`]: Bytecode types (OpCode, BytecodeChunk, ConstantPool)
//! - [`constant_checker`]: Compile-time constant verification
//! - [`context`]: State shared by every compiler of one unit
//! - [`emit`]: High-level bytecode emitter
//! - [`function_compiler`]: Per-function compilation driver
//! - [`lambda`]: Lambda hoisting
//! - [`module`]: Entry points and the output module
//! - [`options`]: Compiler configuration
//! - [`scope`]: Argument slot table
//! - [`translate`]: Expression type translation
//! - [`type_stack`]: Abstract operand type stack

pub mod bytecode;
pub mod constant_checker;
pub mod context;
pub mod emit;
mod expr;
pub mod function_compiler;
pub mod lambda;
pub mod module;
pub mod options;
pub mod scope;
mod stmt;
pub mod translate;
pub mod type_stack;

#[cfg(test)]
mod testing;

pub use constant_checker::ConstantChecker;
pub use context::CompilationUnit;
pub use emit::BytecodeEmitter;
pub use function_compiler::FunctionCompiler;
pub use lambda::{LambdaHoister, LambdaTable};
pub use module::{CompiledFunction, EntryPoints, FunctionFlags, OutputModule};
pub use options::CompilerOptions;
pub use scope::{LocalScope, LocalVar};
pub use translate::{ExprTranslator, Translation};
pub use type_stack::TypeStack;

// Re-export CompilationError from core for convenience
pub use euclin_core::CompilationError;

use euclin_core::ast::{CodeBlock, FunctionDecl};
use euclin_core::{FunctionTable, Result};

use crate::bytecode::ConstantPool;

/// Result of compilation.
#[derive(Debug)]
pub struct CompilationResult {
    /// The compiled module.
    pub module: OutputModule,
    /// Any errors that occurred.
    pub errors: Vec<CompilationError>,
}

impl CompilationResult {
    /// Check if compilation succeeded (no errors).
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The main compiler entry point.
pub struct Compiler;

impl Compiler {
    /// Compile a code block.
    ///
    /// Lambdas are hoisted first. Each top-level function declaration is
    /// then compiled against its signature in `functions`; a function that
    /// fails is left out of the module and its error recorded, and its
    /// siblings are still compiled. A hoisting failure stops the block.
    ///
    /// Top-level bare instructions are only walked for lambdas.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_block(
        block: &CodeBlock<'_>,
        functions: &FunctionTable,
        options: &CompilerOptions,
    ) -> CompilationResult {
        let mut unit = CompilationUnit::new(functions, options);
        let mut constants = ConstantPool::new();
        let mut errors = Vec::new();

        let hoisted = LambdaHoister::new(&mut unit, &mut constants).hoist(block);
        match hoisted {
            Ok(lambdas) => {
                for decl in block.functions() {
                    if let Err(err) = Self::compile_function(&mut unit, &mut constants, &lambdas, decl)
                    {
                        log::debug!("function {} failed: {}", decl.name.name, err);
                        errors.push(err);
                    }
                }
            }
            Err(err) => {
                log::debug!("lambda hoisting failed: {}", err);
                errors.push(err);
            }
        }

        CompilationResult {
            module: OutputModule::new(unit.owner(), constants, unit.into_entries()),
            errors,
        }
    }

    fn compile_function(
        unit: &mut CompilationUnit<'_>,
        constants: &mut ConstantPool,
        lambdas: &LambdaTable,
        decl: &FunctionDecl<'_>,
    ) -> Result<()> {
        let signature = unit
            .functions()
            .get(decl.name.name)
            .cloned()
            .ok_or_else(|| CompilationError::UnknownIdentifier {
                name: decl.name.name.to_string(),
                span: decl.name.span,
            })?;

        FunctionCompiler::new(
            unit,
            constants,
            lambdas,
            signature,
            FunctionFlags::user(),
            decl.span,
            0,
        )?
        .compile_body(decl.body.instructions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::OpCode;
    use crate::testing::standard_functions;
    use bumpalo::Bump;
    use euclin_core::ast::AstBuilder;

    #[test]
    fn lambdas_resolve_in_function_bodies() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let functions: FunctionTable = standard_functions().into_iter().collect();
        let options = CompilerOptions::default();

        let block = ast.block(&[ast.function(
            "area",
            &[ast.expr(ast.call(
                "apply",
                &[ast.lambda(ast.call("sin", &[ast.placeholder()]))],
            ))],
        )]);

        let result = Compiler::compile_block(&block, &functions, &options);
        assert!(result.is_success(), "{:?}", result.errors);

        let names: Vec<&str> = result.module.functions().map(|f| f.name()).collect();
        assert_eq!(names, ["_lambda_0", "area"]);
        result.module.bytecode("area").unwrap().assert_opcodes(&[
            OpCode::BindFunction,
            OpCode::Call,
            OpCode::ReturnReal,
        ]);
    }

    #[test]
    fn failures_do_not_stop_siblings() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let functions: FunctionTable = standard_functions().into_iter().collect();
        let options = CompilerOptions::default();

        let block = ast.block(&[
            ast.function("area", &[ast.expr(ast.int(1))]),
            ast.function("ghost", &[]),
            ast.function("count", &[ast.expr(ast.var("n"))]),
        ]);

        let result = Compiler::compile_block(&block, &functions, &options);
        assert_eq!(result.errors.len(), 2);
        assert!(matches!(result.errors[0], CompilationError::ReturnTypeMismatch { .. }));
        assert!(matches!(
            result.errors[1],
            CompilationError::UnknownIdentifier { ref name, .. } if name == "ghost"
        ));

        assert!(result.module.function("area").is_none());
        assert!(result.module.bytecode("count").is_some());
    }

    #[test]
    fn duplicate_declaration() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let functions: FunctionTable = standard_functions().into_iter().collect();
        let options = CompilerOptions::default();

        let block = ast.block(&[
            ast.function("main", &[]),
            ast.function("main", &[]),
        ]);

        let result = Compiler::compile_block(&block, &functions, &options);
        assert!(matches!(
            result.errors.as_slice(),
            [CompilationError::DuplicateFunction { .. }]
        ));
        assert!(result.module.bytecode("main").is_some());
    }

    #[test]
    fn hoisting_failure_stops_the_block() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let functions: FunctionTable = standard_functions().into_iter().collect();
        let options = CompilerOptions::default();

        let block = ast.block(&[
            ast.function("main", &[]),
            ast.expr(ast.lambda(ast.var("nowhere"))),
        ]);

        let result = Compiler::compile_block(&block, &functions, &options);
        assert_eq!(result.errors.len(), 1);
        assert!(result.module.is_empty());
    }

    #[test]
    fn module_takes_the_owner_name() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let functions: FunctionTable = standard_functions().into_iter().collect();
        let options = CompilerOptions::default().with_owner("Shapes");

        let block = ast.block(&[ast.function("main", &[])]);
        let result = Compiler::compile_block(&block, &functions, &options);
        assert_eq!(result.module.name(), "Shapes");
    }
}
