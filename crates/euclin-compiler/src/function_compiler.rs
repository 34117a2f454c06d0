//! Function compiler for generating bytecode from function bodies.
//!
//! This module provides [`FunctionCompiler`] which compiles a single function's
//! body to bytecode. It handles:
//!
//! - Registering the entry point before the body is compiled
//! - Assigning argument slots and parameter records
//! - Compiling each instruction while tracking operand types
//! - Discarding statement residue between instructions
//! - Synthesizing the return of the last instruction
//!
//! Constant promotion compiles its wrapper with a nested `FunctionCompiler`
//! that borrows the same unit and constant pool; the outer compiler resumes
//! once the wrapper is defined.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use euclin_compiler::bytecode::{ConstantPool, OpCode};
//! use euclin_compiler::{CompilationUnit, CompilerOptions, FunctionCompiler, FunctionFlags, LambdaTable};
//! use euclin_core::ast::AstBuilder;
//! use euclin_core::{Argument, FunctionSignature, FunctionTable, Span, TypeDefinition};
//!
//! let arena = Bump::new();
//! let ast = AstBuilder::new(&arena);
//! let area = FunctionSignature::new(
//!     "area",
//!     vec![Argument::new("side", TypeDefinition::Real)],
//!     TypeDefinition::Real,
//!     "Main",
//! );
//! let functions: FunctionTable = [area.clone()].into_iter().collect();
//! let options = CompilerOptions::default();
//! let mut unit = CompilationUnit::new(&functions, &options);
//! let mut constants = ConstantPool::new();
//! let lambdas = LambdaTable::new();
//!
//! FunctionCompiler::new(&mut unit, &mut constants, &lambdas, area, FunctionFlags::user(), Span::default(), 0)?
//!     .compile_body(&[ast.expr(ast.var("side"))])?;
//!
//! let chunk = unit.entries().get("area").and_then(|f| f.bytecode.as_ref()).unwrap();
//! chunk.assert_opcodes(&[OpCode::LoadReal, OpCode::ReturnReal]);
//! # Ok::<(), euclin_core::CompilationError>(())
//! ```

use euclin_core::ast::Instruction;
use euclin_core::{
    CompilationError, FunctionSignature, FunctionTable, Result, Span, TypeDefinition,
};

use crate::bytecode::{ConstantPool, LocalRange, ParamRecord, ValueKind};
use crate::context::CompilationUnit;
use crate::emit::BytecodeEmitter;
use crate::lambda::LambdaTable;
use crate::module::FunctionFlags;
use crate::options::CompilerOptions;
use crate::scope::LocalScope;
use crate::translate::ExprTranslator;
use crate::type_stack::TypeStack;

/// Compiles a single function body to bytecode.
///
/// Built for one signature, consumed by [`compile_body`](Self::compile_body).
pub struct FunctionCompiler<'a, 'u> {
    /// Shared compilation unit (function table, entry points, counters)
    unit: &'a mut CompilationUnit<'u>,
    /// Bytecode emitter over the module constant pool
    emitter: BytecodeEmitter<'a>,
    /// Lambdas hoisted from the enclosing block
    lambdas: &'a LambdaTable,
    /// Signature being compiled
    signature: FunctionSignature,
    /// Declaration site, used for prologue and epilogue errors
    span: Span,
    /// Argument slots
    locals: LocalScope,
    /// Types of the values on the operand stack
    stack: TypeStack,
    /// Current nesting depth (expressions and nested compilers)
    depth: u32,
}

impl<'a, 'u> FunctionCompiler<'a, 'u> {
    /// Create a compiler and register the function's entry point.
    ///
    /// # Arguments
    ///
    /// * `unit` - Compilation unit shared by every compiler of the block
    /// * `constants` - Constant pool of the output module
    /// * `lambdas` - Lambdas hoisted from the enclosing block
    /// * `signature` - Signature of the function to compile
    /// * `flags` - Entry-point flags
    /// * `span` - Declaration site
    /// * `depth` - Nesting depth the compiler starts at
    ///
    /// Fails with `DuplicateFunction` when an entry point of that name exists.
    pub fn new(
        unit: &'a mut CompilationUnit<'u>,
        constants: &'a mut ConstantPool,
        lambdas: &'a LambdaTable,
        signature: FunctionSignature,
        flags: FunctionFlags,
        span: Span,
        depth: u32,
    ) -> Result<Self> {
        unit.entries_mut().declare(&signature, flags, span)?;

        Ok(Self {
            unit,
            emitter: BytecodeEmitter::new(constants),
            lambdas,
            signature,
            span,
            locals: LocalScope::new(),
            stack: TypeStack::new(),
            depth,
        })
    }

    /// Compile the body and define the entry point.
    ///
    /// On failure the entry point is abandoned, so the module never holds a
    /// declared function without code.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_body(mut self, instructions: &[Instruction<'_>]) -> Result<()> {
        let result = self.compile_instructions(instructions);

        let FunctionCompiler {
            unit,
            emitter,
            signature,
            span,
            locals,
            ..
        } = self;

        match result {
            Ok(()) => {
                let chunk = emitter.finish(locals.max_locals());
                unit.entries_mut().define(signature.name(), chunk, span)
            }
            Err(err) => {
                log::trace!("abandoning {}: {}", signature.name(), err);
                unit.entries_mut().abandon(signature.name());
                Err(err)
            }
        }
    }

    fn compile_instructions(&mut self, instructions: &[Instruction<'_>]) -> Result<()> {
        let debug_info = self.options().emit_debug_info;

        for arg in self.signature.arguments() {
            self.locals
                .declare(&arg.name, arg.ty.clone(), self.signature.name(), self.span)?;
            if debug_info {
                self.emitter.declare_param(ParamRecord {
                    name: arg.name.clone(),
                    descriptor: arg.ty.descriptor(),
                });
            }
        }

        let entry = self.emitter.emit_label();

        let mut returned = false;
        for (index, instr) in instructions.iter().enumerate() {
            if debug_info {
                self.emitter.set_line(instr.span().line);
            }
            self.compile_instruction(instr)?;

            if index + 1 == instructions.len() {
                returned = matches!(instr, Instruction::Return(_));
            } else {
                self.discard_residue(instr)?;
            }
            debug_assert_eq!(self.emitter.depth(), self.stack.len());
        }

        if !returned {
            let span = instructions.last().map_or(self.span, |i| i.span());
            self.compile_implicit_return(span)?;
        }

        let exit = self.emitter.emit_label();

        if debug_info {
            let start = self.emitter.label_offset(entry).unwrap_or(0);
            let end = self
                .emitter
                .label_offset(exit)
                .unwrap_or_else(|| self.emitter.current_offset());
            for local in self.locals.iter() {
                self.emitter.declare_local_range(LocalRange {
                    name: local.name.clone(),
                    descriptor: local.ty.descriptor(),
                    slot: local.slot,
                    start,
                    end,
                });
            }
        }

        Ok(())
    }

    /// Pop every value a statement left behind.
    fn discard_residue(&mut self, instr: &Instruction<'_>) -> Result<()> {
        while !self.stack.is_empty() {
            self.stack.pop("statement residue", instr.span())?;
            self.emitter.emit_pop();
        }
        Ok(())
    }

    // ==========================================================================
    // Shared helpers for the expr/ and stmt/ submodules
    // ==========================================================================

    /// Type translator over this function's locals and the hoisted lambdas.
    pub(crate) fn translator(&self) -> ExprTranslator<'_> {
        ExprTranslator::new(self.functions(), self.options().max_nesting_depth)
            .with_locals(&self.locals)
            .with_lambdas(self.lambdas)
    }

    /// Enter one nesting level.
    pub(crate) fn enter(&mut self, span: Span) -> Result<()> {
        let limit = self.options().max_nesting_depth;
        if self.depth > limit {
            return Err(CompilationError::NestingTooDeep { limit, span });
        }
        self.depth += 1;
        Ok(())
    }

    /// Leave one nesting level.
    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Emit a typed return of the value on top of the stack.
    pub(crate) fn emit_typed_return(&mut self, ty: &TypeDefinition) {
        self.emitter.emit_return(ValueKind::of(ty));
    }

    /// Replace the value on top of the stack by the unit value and return it.
    pub(crate) fn emit_unit_return(&mut self) {
        self.emitter.emit_pop();
        self.emitter.emit_unit();
        self.emitter.emit_return(ValueKind::Ref);
    }

    /// Signature being compiled.
    pub fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    /// Argument slots.
    pub fn locals(&self) -> &LocalScope {
        &self.locals
    }
}

// Field access for the expr/ and stmt/ submodules.
impl<'a, 'u> FunctionCompiler<'a, 'u> {
    pub(crate) fn unit(&mut self) -> &mut CompilationUnit<'u> {
        &mut *self.unit
    }

    pub(crate) fn functions(&self) -> &'u FunctionTable {
        self.unit.functions()
    }

    pub(crate) fn options(&self) -> &'u CompilerOptions {
        self.unit.options()
    }

    pub(crate) fn emitter(&mut self) -> &mut BytecodeEmitter<'a> {
        &mut self.emitter
    }

    pub(crate) fn stack(&mut self) -> &mut TypeStack {
        &mut self.stack
    }

    pub(crate) fn lambdas(&self) -> &'a LambdaTable {
        self.lambdas
    }

    pub(crate) fn depth(&self) -> u32 {
        self.depth
    }

    /// Split borrow used to start a nested compiler over the same unit and pool.
    pub(crate) fn nested_parts(
        &mut self,
    ) -> (
        &mut CompilationUnit<'u>,
        &mut ConstantPool,
        &'a LambdaTable,
    ) {
        (&mut *self.unit, self.emitter.constants_mut(), self.lambdas)
    }
}
