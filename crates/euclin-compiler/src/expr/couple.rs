//! Pair construction `(a, b)`.
//!
//! Both element types are translated before anything is emitted, so a
//! mismatch leaves no code behind. The pair is then built as:
//!
//! ```text
//! NewPair kind     ; allocate
//! Dup              ; keep a reference for the initializer
//! <a>
//! <b>
//! InitPair kind    ; consumes reference, a, b
//! ```

use euclin_core::{Result, TypeDefinition};
use euclin_core::ast::CoupleExpr;

use crate::bytecode::PairKind;
use crate::function_compiler::FunctionCompiler;
use crate::translate::pair_type;

/// Compile a pair construction.
pub(super) fn compile_couple(
    compiler: &mut FunctionCompiler<'_, '_>,
    couple: &CoupleExpr<'_>,
) -> Result<()> {
    let pair = {
        let translator = compiler.translator();
        let first = translator.translate(&couple.first)?.ty;
        let second = translator.translate(&couple.second)?.ty;
        pair_type(&first, &second, couple.span)?
    };

    let kind = match pair {
        TypeDefinition::IntegerPair => PairKind::Int,
        _ => PairKind::Real,
    };

    compiler.emitter().emit_new_pair(kind);
    compiler.emitter().emit_dup();
    compiler.compile_operand(&couple.first)?;
    compiler.compile_operand(&couple.second)?;
    compiler.emitter().emit_init_pair(kind);

    compiler.stack().push(pair);
    Ok(())
}
