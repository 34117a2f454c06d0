//! Constant pool for compiled modules.
//!
//! The constant pool stores values that are referenced by bytecode
//! instructions: numeric literals, string data, call targets and bound
//! function values.

use euclin_core::{FunctionHash, TypeDefinition};
use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;

/// A first-class reference to a statically known entry point.
///
/// Materialized at runtime by `BindFunction`: invoking the value with its
/// parameters dispatches to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionValue {
    /// Entry point the value dispatches to.
    pub target: FunctionHash,
    /// Entry-point name, for diagnostics and disassembly.
    pub name: String,
    /// Structural type of the value.
    pub ty: TypeDefinition,
}

/// Values stored in the constant pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    /// Integer.
    Int(i64),
    /// Real. Wrapped so the pool can hash and deduplicate it.
    Real(OrderedFloat<f64>),
    /// Raw string literal bytes.
    StringData(Vec<u8>),
    /// Call target.
    Function(FunctionHash),
    /// Bound function value.
    FunctionValue(FunctionValue),
}

/// Module-level constant pool with deduplication.
///
/// Shared across all functions in a module to avoid duplicate values.
#[derive(Debug, Clone, Default)]
pub struct ConstantPool {
    /// The actual constants.
    constants: Vec<Constant>,
    /// Deduplication index: maps constant to its index.
    index: FxHashMap<Constant, u32>,
}

impl ConstantPool {
    /// Create a new empty constant pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or get existing constant, returns index.
    ///
    /// Deduplicates identical constants.
    pub fn add(&mut self, constant: Constant) -> u32 {
        if let Some(&idx) = self.index.get(&constant) {
            return idx;
        }

        let idx = self.constants.len() as u32;
        self.constants.push(constant.clone());
        self.index.insert(constant, idx);
        idx
    }

    /// Add an integer constant.
    pub fn add_int(&mut self, value: i64) -> u32 {
        self.add(Constant::Int(value))
    }

    /// Add a real constant.
    pub fn add_real(&mut self, value: f64) -> u32 {
        self.add(Constant::Real(OrderedFloat(value)))
    }

    /// Add string data.
    pub fn add_string(&mut self, data: Vec<u8>) -> u32 {
        self.add(Constant::StringData(data))
    }

    /// Add a call target.
    pub fn add_function(&mut self, hash: FunctionHash) -> u32 {
        self.add(Constant::Function(hash))
    }

    /// Add a bound function value.
    pub fn add_function_value(&mut self, value: FunctionValue) -> u32 {
        self.add(Constant::FunctionValue(value))
    }

    /// Get constant by index.
    pub fn get(&self, index: u32) -> Option<&Constant> {
        self.constants.get(index as usize)
    }

    /// Get all constants.
    pub fn constants(&self) -> &[Constant] {
        &self.constants
    }

    /// Number of constants.
    pub fn len(&self) -> usize {
        self.constants.len()
    }

    /// Check if the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }
}
