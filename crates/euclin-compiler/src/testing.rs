//! Shared fixtures for unit tests.

use euclin_core::ast::Instruction;
use euclin_core::{
    Argument, CompilationError, FunctionSignature, FunctionTable, Result, Span, TypeDefinition,
};

use crate::bytecode::{BytecodeChunk, ConstantPool};
use crate::context::CompilationUnit;
use crate::function_compiler::FunctionCompiler;
use crate::lambda::LambdaTable;
use crate::module::{FunctionFlags, OutputModule};
use crate::options::CompilerOptions;

/// `name(args: Real...) -> Real`, owned by `Main`.
pub(crate) fn real_fn(name: &str, args: &[&str]) -> FunctionSignature {
    FunctionSignature::new(
        name,
        args.iter()
            .map(|a| Argument::new(*a, TypeDefinition::Real))
            .collect(),
        TypeDefinition::Real,
        "Main",
    )
}

fn real_to_real() -> TypeDefinition {
    TypeDefinition::function(vec![TypeDefinition::Real], TypeDefinition::Real)
}

/// User functions under test plus a small standard library.
pub(crate) fn standard_functions() -> Vec<FunctionSignature> {
    use TypeDefinition::*;

    vec![
        real_fn("area", &["side"]),
        FunctionSignature::new("corner", vec![Argument::new("side", Real)], RealPair, "Main"),
        FunctionSignature::new("cell", vec![], IntegerPair, "Main"),
        FunctionSignature::new("count", vec![Argument::new("n", Integer)], Integer, "Main"),
        FunctionSignature::new("is_zero", vec![], Boolean, "Main"),
        FunctionSignature::new("main", vec![], NoValue, "Main"),
        FunctionSignature::new("pick", vec![], real_to_real(), "Main"),
        FunctionSignature::new("sin", vec![Argument::new("x", Real)], Real, "Std").with_pure(true),
        FunctionSignature::new("random", vec![], Real, "Std"),
        FunctionSignature::new("print", vec![Argument::new("s", String)], NoValue, "Std"),
        FunctionSignature::new("apply", vec![Argument::new("g", real_to_real())], Real, "Std"),
    ]
}

/// Compiles single functions against [`standard_functions`].
pub(crate) struct Fixture {
    functions: FunctionTable,
    options: CompilerOptions,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        Self::with_options(CompilerOptions::default())
    }

    pub(crate) fn with_options(options: CompilerOptions) -> Self {
        Self {
            functions: standard_functions().into_iter().collect(),
            options,
        }
    }

    pub(crate) fn with_functions(extra: Vec<FunctionSignature>) -> Self {
        let mut fixture = Self::new();
        for signature in extra {
            fixture.functions.insert(signature);
        }
        fixture
    }

    /// Compile `name` with `body` and return its bytecode.
    pub(crate) fn compile(&self, name: &str, body: &[Instruction<'_>]) -> Result<BytecodeChunk> {
        let module = self.compile_module(name, body)?;
        module
            .bytecode(name)
            .cloned()
            .ok_or_else(|| CompilationError::internal("function was not defined", name, Span::default()))
    }

    /// Compile `name` with `body` and return the whole module, wrappers included.
    pub(crate) fn compile_module(&self, name: &str, body: &[Instruction<'_>]) -> Result<OutputModule> {
        let signature = self.functions.get(name).cloned().ok_or_else(|| {
            CompilationError::UnknownIdentifier {
                name: name.to_string(),
                span: Span::default(),
            }
        })?;

        let mut unit = CompilationUnit::new(&self.functions, &self.options);
        let mut constants = ConstantPool::new();
        let lambdas = LambdaTable::new();

        FunctionCompiler::new(
            &mut unit,
            &mut constants,
            &lambdas,
            signature,
            FunctionFlags::user(),
            Span::default(),
            0,
        )?
        .compile_body(body)?;

        Ok(OutputModule::new(unit.owner(), constants, unit.into_entries()))
    }
}
