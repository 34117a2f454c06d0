//! Abstract operand type stack.
//!
//! Mirrors, at compile time, the types of the values the target machine
//! will hold on its operand stack. It must be empty at every return and at
//! function exit; a mismatch is a compiler bug and surfaces as
//! `CompilationError::Internal`.

use euclin_core::{CompilationError, Result, Span, TypeDefinition};

/// Types of the values currently on the operand stack.
#[derive(Debug, Default)]
pub struct TypeStack {
    types: Vec<TypeDefinition>,
}

impl TypeStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push the type of a freshly produced value.
    pub fn push(&mut self, ty: TypeDefinition) {
        self.types.push(ty);
    }

    /// Pop the top type.
    ///
    /// `context` is the source text of the node being compiled, carried into
    /// the internal error on underflow.
    pub fn pop(&mut self, context: &str, span: Span) -> Result<TypeDefinition> {
        self.types
            .pop()
            .ok_or_else(|| CompilationError::internal("operand stack underflow", context, span))
    }

    /// Top type, if any.
    pub fn peek(&self) -> Option<&TypeDefinition> {
        self.types.last()
    }

    /// Fail unless the stack is empty.
    pub fn ensure_empty(&self, context: &str, span: Span) -> Result<()> {
        if self.types.is_empty() {
            Ok(())
        } else {
            Err(CompilationError::internal(
                format!("operand stack not empty: {}", self.describe()),
                context,
                span,
            ))
        }
    }

    /// Number of tracked values.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn describe(&self) -> String {
        let names: Vec<String> = self.types.iter().map(|t| t.to_string()).collect();
        format!("[{}]", names.join(", "))
    }
}
