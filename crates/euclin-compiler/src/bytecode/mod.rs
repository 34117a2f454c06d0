//! Bytecode types for the Euclin code generator.
//!
//! This module contains the core bytecode types:
//!
//! - [`OpCode`] - The instruction set of the target stack machine
//! - [`BytecodeChunk`] - Compiled bytecode and debug metadata for a function
//! - [`Constant`] and [`ConstantPool`] - Module-level constant storage

mod chunk;
mod constant;
mod opcode;

pub use chunk::{BytecodeChunk, Label, LocalRange, ParamRecord};
pub use constant::{Constant, ConstantPool, FunctionValue};
pub use opcode::{OpCode, PairKind, ValueKind};
