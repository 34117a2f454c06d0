//! Lambda hoisting.
//!
//! Every inline lambda `{ body }` of a block is lifted into a top-level
//! synthetic function taking one `Real` argument named `_`. Lambdas are
//! deduplicated by their literal source text: the second `{sin(_)}` in a
//! block resolves to the function compiled for the first.
//!
//! Naming:
//!
//! - `_lambda_identity` for a lambda whose body is the bare placeholder
//! - `_lambda_<n>` otherwise, `n` drawn from the unit's synthetic counter
//!
//! The walk is post-order, so a lambda nested in another lambda's body is
//! compiled before its parent and the parent body can reference it.
//!
//! The hoister must run over a block before any function of that block is
//! compiled; the resulting [`LambdaTable`] is what the function compiler
//! resolves lambda literals against.

use euclin_core::ast::{CodeBlock, Expr, Instruction, LambdaExpr, ReturnInstr};
use euclin_core::{
    Argument, CompilationError, FunctionSignature, Result, Span, TypeDefinition,
};
use log::debug;
use rustc_hash::FxHashMap;

use crate::bytecode::ConstantPool;
use crate::context::CompilationUnit;
use crate::function_compiler::FunctionCompiler;
use crate::module::FunctionFlags;
use crate::translate::ExprTranslator;

/// Name of the hoisted identity lambda `{_}`.
pub const IDENTITY_LAMBDA: &str = "_lambda_identity";

/// Hoisted lambdas keyed by their literal source text.
#[derive(Debug, Clone, Default)]
pub struct LambdaTable {
    by_text: FxHashMap<String, FunctionSignature>,
}

impl LambdaTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signature hoisted for a lambda's source text.
    pub fn get(&self, text: &str) -> Option<&FunctionSignature> {
        self.by_text.get(text)
    }

    /// Whether a lambda with this source text was hoisted.
    pub fn contains(&self, text: &str) -> bool {
        self.by_text.contains_key(text)
    }

    /// Record a hoisted lambda.
    pub fn insert(&mut self, text: impl Into<String>, signature: FunctionSignature) {
        self.by_text.insert(text.into(), signature);
    }

    /// Number of distinct lambda texts.
    pub fn len(&self) -> usize {
        self.by_text.len()
    }

    /// Whether nothing was hoisted.
    pub fn is_empty(&self) -> bool {
        self.by_text.is_empty()
    }

    /// Iterate over `(text, signature)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FunctionSignature)> {
        self.by_text.iter().map(|(text, sig)| (text.as_str(), sig))
    }
}

/// Walks a block once and compiles every distinct lambda it finds.
pub struct LambdaHoister<'a, 'u> {
    unit: &'a mut CompilationUnit<'u>,
    constants: &'a mut ConstantPool,
    table: LambdaTable,
    /// The identity lambda, shared by every `{_}` spelling.
    identity: Option<FunctionSignature>,
}

impl<'a, 'u> LambdaHoister<'a, 'u> {
    /// Create a hoister writing into the unit's entry points and pool.
    pub fn new(unit: &'a mut CompilationUnit<'u>, constants: &'a mut ConstantPool) -> Self {
        Self {
            unit,
            constants,
            table: LambdaTable::new(),
            identity: None,
        }
    }

    /// Hoist every lambda of `block`.
    ///
    /// Stops at the first lambda that fails to compile; lambdas compiled
    /// before it stay in the module.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn hoist(mut self, block: &CodeBlock<'_>) -> Result<LambdaTable> {
        for instr in block.instructions {
            match instr {
                Instruction::FunctionDecl(decl) => self.visit_body(decl.body.instructions, 0)?,
                _ => self.visit_instruction(instr, 0)?,
            }
        }
        debug!("hoisted {} lambda(s)", self.table.len());
        Ok(self.table)
    }

    fn visit_instruction(&mut self, instr: &Instruction<'_>, depth: u32) -> Result<()> {
        self.check_depth(depth, instr.span())?;

        match instr {
            Instruction::Expr(expr) => self.visit_expr(expr, depth),
            Instruction::Return(ret) => self.visit_expr(&ret.value, depth),
            Instruction::FunctionDecl(decl) => self.visit_body(decl.body.instructions, depth + 1),
        }
    }

    /// Bodies of top-level declarations start at depth 0; each nested
    /// declaration adds a level.
    fn visit_body(&mut self, instructions: &[Instruction<'_>], depth: u32) -> Result<()> {
        for instr in instructions {
            self.visit_instruction(instr, depth)?;
        }
        Ok(())
    }

    fn visit_expr(&mut self, expr: &Expr<'_>, depth: u32) -> Result<()> {
        self.check_depth(depth, expr.span())?;

        match expr {
            Expr::Couple(couple) => {
                self.visit_expr(&couple.first, depth + 1)?;
                self.visit_expr(&couple.second, depth + 1)
            }
            Expr::Call(call) => {
                for arg in call.args {
                    self.visit_expr(arg, depth + 1)?;
                }
                Ok(())
            }
            Expr::Lambda(lambda) => {
                self.visit_expr(&lambda.body, depth + 1)?;
                self.hoist_lambda(lambda)
            }
            Expr::Literal(_) | Expr::Var(_) | Expr::LambdaVar(_) => Ok(()),
        }
    }

    fn check_depth(&self, depth: u32, span: Span) -> Result<()> {
        let limit = self.unit.options().max_nesting_depth;
        if depth > limit {
            return Err(CompilationError::NestingTooDeep { limit, span });
        }
        Ok(())
    }

    fn hoist_lambda(&mut self, lambda: &LambdaExpr<'_>) -> Result<()> {
        if let Some(existing) = self.table.get(lambda.text) {
            debug!("reusing {} for lambda {}", existing.name(), lambda.text);
            return Ok(());
        }

        let is_identity = matches!(lambda.body, Expr::LambdaVar(_));

        if is_identity && let Some(identity) = self.identity.clone() {
            debug!("reusing {} for lambda {}", identity.name(), lambda.text);
            self.table.insert(lambda.text, identity);
            return Ok(());
        }

        let id = self.unit.next_synthetic_id();

        let name = if is_identity {
            IDENTITY_LAMBDA.to_string()
        } else {
            format!("_lambda_{}", id)
        };

        let returns = ExprTranslator::new(
            self.unit.functions(),
            self.unit.options().max_nesting_depth,
        )
        .with_lambdas(&self.table)
        .translate(&lambda.body)?
        .ty;

        let signature = FunctionSignature::new(
            name,
            vec![Argument::new("_", TypeDefinition::Real)],
            returns,
            self.unit.owner(),
        );

        self.compile(&signature, lambda.body, lambda.span)?;

        debug!(
            "hoisted lambda {} as {}{}",
            lambda.text,
            signature.name(),
            signature.descriptor()
        );
        if is_identity {
            self.identity = Some(signature.clone());
        }
        self.table.insert(lambda.text, signature);
        Ok(())
    }

    fn compile(&mut self, signature: &FunctionSignature, body: Expr<'_>, span: Span) -> Result<()> {
        let instructions = [Instruction::Return(ReturnInstr { value: body, span })];
        FunctionCompiler::new(
            &mut *self.unit,
            &mut *self.constants,
            &self.table,
            signature.clone(),
            FunctionFlags::synthetic(),
            span,
            0,
        )?
        .compile_body(&instructions)
    }
}
