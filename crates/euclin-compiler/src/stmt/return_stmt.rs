//! Return compilation.
//!
//! Explicit and implicit returns follow two separate rules:
//!
//! - An explicit `return value` is accepted when the declared type accepts
//!   the value by assignment (equal, or the function returns `Unit`).
//! - The implicit return of a body's last expression first requires the
//!   value's type to equal the declared type, and otherwise falls back to
//!   discarding the value when the function returns `Unit`.
//!
//! Neither rule widens `Int` to `Real`. Both leave the operand stack empty.

use euclin_core::ast::ReturnInstr;
use euclin_core::{CompilationError, Result, Span, TypeDefinition};

use crate::function_compiler::FunctionCompiler;

impl<'a, 'u> FunctionCompiler<'a, 'u> {
    /// Compile an explicit `return`.
    pub(crate) fn compile_return(&mut self, ret: &ReturnInstr<'_>) -> Result<()> {
        let actual = self.compile_operand(&ret.value)?;
        let declared = self.signature().return_type().clone();

        if !declared.accepts_assign(&actual) {
            return Err(self.return_mismatch(&declared, &actual, ret.span));
        }

        if declared.is_no_value() && !actual.is_no_value() {
            self.emit_unit_return();
        } else {
            self.emit_typed_return(&declared);
        }

        self.stack().ensure_empty(ret.value.text(), ret.span)
    }

    /// Return whatever the last instruction left on the stack.
    pub(crate) fn compile_implicit_return(&mut self, span: Span) -> Result<()> {
        let declared = self.signature().return_type().clone();
        let name = self.signature().name().to_string();

        match self.stack().len() {
            0 => {
                if !declared.is_no_value() {
                    return Err(CompilationError::internal(
                        format!("body of a function returning '{}' left no value", declared),
                        name,
                        span,
                    ));
                }
                self.emitter().emit_unit();
                self.emit_typed_return(&TypeDefinition::NoValue);
                Ok(())
            }
            1 => {
                let actual = self.stack().pop(&name, span)?;
                if actual == declared {
                    self.emit_typed_return(&declared);
                } else if declared.accepts_discarding(&actual) {
                    self.emit_unit_return();
                } else {
                    return Err(self.return_mismatch(&declared, &actual, span));
                }
                Ok(())
            }
            _ => self.stack().ensure_empty(&name, span),
        }
    }

    fn return_mismatch(
        &self,
        declared: &TypeDefinition,
        actual: &TypeDefinition,
        span: Span,
    ) -> CompilationError {
        CompilationError::ReturnTypeMismatch {
            function: self.signature().name().to_string(),
            expected: declared.to_string(),
            actual: actual.to_string(),
            span,
        }
    }
}
