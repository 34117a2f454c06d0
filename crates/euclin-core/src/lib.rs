//! Euclin Core
//!
//! Shared types for the Euclin code generator.
//!
//! ## Modules
//!
//! - [`ast`]: Arena-allocated expression and instruction nodes, plus [`ast::AstBuilder`]
//! - [`error`]: [`CompilationError`] and its span accessor
//! - [`function_hash`]: Deterministic entry-point identity
//! - [`signature`]: [`FunctionSignature`], [`Argument`] and [`FunctionTable`]
//! - [`span`]: Source locations
//! - [`types`]: The [`TypeDefinition`] lattice

pub mod ast;
pub mod error;
pub mod function_hash;
pub mod signature;
pub mod span;
pub mod types;

pub use error::CompilationError;
pub use function_hash::FunctionHash;
pub use signature::{Argument, FunctionSignature, FunctionTable};
pub use span::Span;
pub use types::{FunctionType, TypeDefinition};

/// Result alias used throughout the compiler.
pub type Result<T> = std::result::Result<T, CompilationError>;
