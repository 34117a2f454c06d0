//! Compilation error types.
//!
//! Every error is fatal to the function (or lambda) being compiled. The
//! variants split into two families:
//!
//! ```text
//! CompilationError
//! ├── user-facing   - UnknownIdentifier, ArgumentTypeMismatch, ArgumentCountMismatch,
//! │                   CoupleTypeMismatch, ReturnTypeMismatch, NonConstantExpression,
//! │                   NestedDeclarationForbidden, ArgumentRedeclaration, NestingTooDeep
//! ├── program error - DuplicateFunction
//! └── Internal      - invariant breach inside the compiler itself
//! ```
//!
//! `Internal` means the compiler is broken (hoisting order, stack tracking),
//! not that the input is wrong. It carries the source text of the expression
//! being compiled so the failure can be traced back to the AST.

use thiserror::Error;

use crate::Span;

/// Errors that occur while generating code for a function body.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompilationError {
    /// A name is neither a local variable nor a known function.
    #[error("at {span}: unknown identifier '{name}'")]
    UnknownIdentifier {
        /// The name that could not be resolved.
        name: String,
        /// Where the name was referenced.
        span: Span,
    },

    /// A call argument does not match the formal parameter type and cannot
    /// be promoted to a function value.
    #[error(
        "at {span}: argument {position} ('{argument}') of '{function}' expects '{expected}', got '{actual}'"
    )]
    ArgumentTypeMismatch {
        /// The called function.
        function: String,
        /// Zero-based argument position.
        position: usize,
        /// Formal parameter name.
        argument: String,
        /// Formal parameter type.
        expected: String,
        /// Type of the actual expression.
        actual: String,
        /// Where the argument appears.
        span: Span,
    },

    /// A call supplies a different number of arguments than the callee declares.
    #[error("at {span}: '{function}' takes {expected} argument(s) but {actual} were supplied")]
    ArgumentCountMismatch {
        /// The called function.
        function: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        actual: usize,
        /// Where the call appears.
        span: Span,
    },

    /// Both elements of a pair must share the same type.
    #[error("at {span}: pair elements must have the same type, got '{first}' and '{second}'")]
    CoupleTypeMismatch {
        /// Type of the first element.
        first: String,
        /// Type of the second element.
        second: String,
        /// Where the pair appears.
        span: Span,
    },

    /// A returned value is incompatible with the declared return type.
    #[error("at {span}: '{function}' returns '{expected}' but the value has type '{actual}'")]
    ReturnTypeMismatch {
        /// The function being compiled.
        function: String,
        /// Declared return type.
        expected: String,
        /// Type of the returned value.
        actual: String,
        /// Where the return happens.
        span: Span,
    },

    /// An expression promoted to a function value is not a compile-time constant.
    #[error("at {span}: expression '{text}' is not a constant")]
    NonConstantExpression {
        /// Source text of the offending expression.
        text: String,
        /// Where the expression appears.
        span: Span,
    },

    /// Function declarations are only allowed at the top level.
    #[error("at {span}: function '{name}' cannot be declared inside another function")]
    NestedDeclarationForbidden {
        /// Name of the nested function.
        name: String,
        /// Where the declaration appears.
        span: Span,
    },

    /// Two arguments of the same function share a name.
    #[error("at {span}: argument '{name}' of '{function}' is declared twice")]
    ArgumentRedeclaration {
        /// The function being compiled.
        function: String,
        /// The repeated argument name.
        name: String,
        /// Where the function was declared.
        span: Span,
    },

    /// An entry point with the same name was already registered in the module.
    #[error("at {span}: function '{name}' is already defined in this module")]
    DuplicateFunction {
        /// The duplicated function name.
        name: String,
        /// Where the second definition was requested.
        span: Span,
    },

    /// The AST nests deeper than the configured ceiling.
    #[error("at {span}: expression nesting exceeds the limit of {limit}")]
    NestingTooDeep {
        /// The configured ceiling.
        limit: u32,
        /// Where the limit was hit.
        span: Span,
    },

    /// A compiler invariant was violated.
    #[error("at {span}: internal compiler error: {message} (while compiling '{context}')")]
    Internal {
        /// What went wrong.
        message: String,
        /// Source text of the node being compiled.
        context: String,
        /// Where the node appears.
        span: Span,
    },
}

impl CompilationError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            CompilationError::UnknownIdentifier { span, .. } => *span,
            CompilationError::ArgumentTypeMismatch { span, .. } => *span,
            CompilationError::ArgumentCountMismatch { span, .. } => *span,
            CompilationError::CoupleTypeMismatch { span, .. } => *span,
            CompilationError::ReturnTypeMismatch { span, .. } => *span,
            CompilationError::NonConstantExpression { span, .. } => *span,
            CompilationError::NestedDeclarationForbidden { span, .. } => *span,
            CompilationError::ArgumentRedeclaration { span, .. } => *span,
            CompilationError::DuplicateFunction { span, .. } => *span,
            CompilationError::NestingTooDeep { span, .. } => *span,
            CompilationError::Internal { span, .. } => *span,
        }
    }

    /// Whether this error signals a compiler bug rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, CompilationError::Internal { .. })
    }

    /// Build an internal error for the node with the given source text.
    pub fn internal(message: impl Into<String>, context: impl Into<String>, span: Span) -> Self {
        CompilationError::Internal {
            message: message.into(),
            context: context.into(),
            span,
        }
    }
}
