//! Euclin
//!
//! Code generation for Euclin function bodies: type-checked stack-machine
//! bytecode, lambda hoisting, and constant promotion.
//!
//! This crate re-exports [`euclin_core`] (AST, types, signatures, errors)
//! and [`euclin_compiler`] (bytecode, hoister, function compiler, driver).
//!
//! # Example
//!
//! ```
//! use euclin::prelude::*;
//!
//! let arena = Bump::new();
//! let ast = AstBuilder::new(&arena);
//!
//! let functions: FunctionTable = [FunctionSignature::new(
//!     "area",
//!     vec![Argument::new("side", TypeDefinition::Real)],
//!     TypeDefinition::Real,
//!     "Main",
//! )]
//! .into_iter()
//! .collect();
//!
//! let block = ast.block(&[ast.function("area", &[ast.expr(ast.var("side"))])]);
//! let result = Compiler::compile_block(&block, &functions, &CompilerOptions::default());
//!
//! assert!(result.is_success());
//! assert!(result.module.bytecode("area").is_some());
//! ```

pub use euclin_compiler as compiler;
pub use euclin_core as core;

// Re-export main types
pub mod prelude {
    pub use bumpalo::Bump;
    pub use euclin_compiler::bytecode::{BytecodeChunk, Constant, OpCode};
    pub use euclin_compiler::{
        CompilationResult, Compiler, CompilerOptions, FunctionFlags, LambdaTable, OutputModule,
    };
    pub use euclin_core::ast::AstBuilder;
    pub use euclin_core::{
        Argument, CompilationError, FunctionSignature, FunctionTable, TypeDefinition,
    };
}
