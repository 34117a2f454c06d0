//! Bytecode operation codes.
//!
//! This module defines the instruction set of the Euclin stack machine.
//! Each opcode is a single byte, with operands following inline.

use euclin_core::TypeDefinition;

/// Bytecode operation codes.
///
/// The target is a stack machine: loads push, stores and returns pop,
/// and calls replace their arguments with the callee's result (if any).
/// Typed variants exist for loads, stores and returns so the verifier
/// downstream can check slot and stack types without inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    // =========================================================================
    // Constants
    // =========================================================================
    /// Push constant from pool (8-bit index).
    /// Operand: u8 constant index
    Constant = 0,
    /// Push constant from pool (16-bit index).
    /// Operand: u16 constant index (big-endian)
    ConstantWide,
    /// Push boolean true.
    PushTrue,
    /// Push boolean false.
    PushFalse,
    /// Push the no-value singleton.
    PushUnit,

    // =========================================================================
    // Stack Operations
    // =========================================================================
    /// Pop top of stack.
    Pop,
    /// Duplicate top of stack.
    Dup,

    // =========================================================================
    // Local Slots
    // =========================================================================
    /// Load an integer slot.
    /// Operand: u16 slot index
    LoadInt,
    /// Load a real slot.
    /// Operand: u16 slot index
    LoadReal,
    /// Load a boolean slot.
    /// Operand: u16 slot index
    LoadBool,
    /// Load a reference slot (strings, pairs, functions, unit).
    /// Operand: u16 slot index
    LoadRef,
    /// Store into an integer slot.
    /// Operand: u16 slot index
    StoreInt,
    /// Store into a real slot.
    /// Operand: u16 slot index
    StoreReal,
    /// Store into a boolean slot.
    /// Operand: u16 slot index
    StoreBool,
    /// Store into a reference slot.
    /// Operand: u16 slot index
    StoreRef,

    // =========================================================================
    // Pairs
    // =========================================================================
    /// Allocate an uninitialized pair.
    /// Operand: u8 pair kind (see `PairKind`)
    NewPair,
    /// Initialize a pair from the two values above it.
    /// Stack: [pair, pair, a, b] -> [pair]
    /// Operand: u8 pair kind
    InitPair,

    // =========================================================================
    // Functions
    // =========================================================================
    /// Call a statically known function.
    /// Operands: u16 constant index (function hash), u8 arg count
    Call,
    /// Push a bound function value.
    /// Operand: u16 constant index (function value)
    BindFunction,

    // =========================================================================
    // Returns
    // =========================================================================
    /// Return an integer.
    ReturnInt,
    /// Return a real.
    ReturnReal,
    /// Return a boolean.
    ReturnBool,
    /// Return a reference.
    ReturnRef,
}

impl OpCode {
    /// Every opcode, indexed by its byte value.
    const ALL: [OpCode; 23] = [
        OpCode::Constant,
        OpCode::ConstantWide,
        OpCode::PushTrue,
        OpCode::PushFalse,
        OpCode::PushUnit,
        OpCode::Pop,
        OpCode::Dup,
        OpCode::LoadInt,
        OpCode::LoadReal,
        OpCode::LoadBool,
        OpCode::LoadRef,
        OpCode::StoreInt,
        OpCode::StoreReal,
        OpCode::StoreBool,
        OpCode::StoreRef,
        OpCode::NewPair,
        OpCode::InitPair,
        OpCode::Call,
        OpCode::BindFunction,
        OpCode::ReturnInt,
        OpCode::ReturnReal,
        OpCode::ReturnBool,
        OpCode::ReturnRef,
    ];

    /// Convert from u8, returning None for invalid values.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Get the size of operands for this opcode in bytes.
    ///
    /// This does NOT include the opcode byte itself.
    pub fn operand_size(&self) -> usize {
        match self {
            OpCode::PushTrue
            | OpCode::PushFalse
            | OpCode::PushUnit
            | OpCode::Pop
            | OpCode::Dup
            | OpCode::ReturnInt
            | OpCode::ReturnReal
            | OpCode::ReturnBool
            | OpCode::ReturnRef => 0,

            OpCode::Constant // u8 constant index
            | OpCode::NewPair // u8 pair kind
            | OpCode::InitPair => 1,

            OpCode::ConstantWide
            | OpCode::LoadInt
            | OpCode::LoadReal
            | OpCode::LoadBool
            | OpCode::LoadRef
            | OpCode::StoreInt
            | OpCode::StoreReal
            | OpCode::StoreBool
            | OpCode::StoreRef
            | OpCode::BindFunction => 2,

            // u16 constant index + u8 arg count
            OpCode::Call => 3,
        }
    }

    /// Net change in stack depth caused by this opcode.
    ///
    /// `None` for [`OpCode::Call`], whose effect depends on its argument
    /// count and on whether the callee returns a value.
    pub fn stack_effect(&self) -> Option<i32> {
        let effect = match self {
            OpCode::Constant
            | OpCode::ConstantWide
            | OpCode::PushTrue
            | OpCode::PushFalse
            | OpCode::PushUnit
            | OpCode::Dup
            | OpCode::LoadInt
            | OpCode::LoadReal
            | OpCode::LoadBool
            | OpCode::LoadRef
            | OpCode::NewPair
            | OpCode::BindFunction => 1,

            OpCode::Pop
            | OpCode::StoreInt
            | OpCode::StoreReal
            | OpCode::StoreBool
            | OpCode::StoreRef
            | OpCode::ReturnInt
            | OpCode::ReturnReal
            | OpCode::ReturnBool
            | OpCode::ReturnRef => -1,

            OpCode::InitPair => -3,

            OpCode::Call => return None,
        };
        Some(effect)
    }

    /// Whether this opcode ends the function.
    pub fn is_return(&self) -> bool {
        matches!(
            self,
            OpCode::ReturnInt | OpCode::ReturnReal | OpCode::ReturnBool | OpCode::ReturnRef
        )
    }

    /// Get the name of this opcode for debugging.
    pub fn name(&self) -> &'static str {
        match self {
            OpCode::Constant => "CONSTANT",
            OpCode::ConstantWide => "CONSTANT_WIDE",
            OpCode::PushTrue => "PUSH_TRUE",
            OpCode::PushFalse => "PUSH_FALSE",
            OpCode::PushUnit => "PUSH_UNIT",
            OpCode::Pop => "POP",
            OpCode::Dup => "DUP",
            OpCode::LoadInt => "LOAD_INT",
            OpCode::LoadReal => "LOAD_REAL",
            OpCode::LoadBool => "LOAD_BOOL",
            OpCode::LoadRef => "LOAD_REF",
            OpCode::StoreInt => "STORE_INT",
            OpCode::StoreReal => "STORE_REAL",
            OpCode::StoreBool => "STORE_BOOL",
            OpCode::StoreRef => "STORE_REF",
            OpCode::NewPair => "NEW_PAIR",
            OpCode::InitPair => "INIT_PAIR",
            OpCode::Call => "CALL",
            OpCode::BindFunction => "BIND_FUNCTION",
            OpCode::ReturnInt => "RETURN_INT",
            OpCode::ReturnReal => "RETURN_REAL",
            OpCode::ReturnBool => "RETURN_BOOL",
            OpCode::ReturnRef => "RETURN_REF",
        }
    }
}

/// Machine representation of a value, selecting the typed load/store/return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// 64-bit integer
    Int,
    /// 64-bit float
    Real,
    /// Boolean
    Bool,
    /// Heap reference
    Ref,
}

impl ValueKind {
    /// Machine representation of a value of type `ty`.
    pub fn of(ty: &TypeDefinition) -> Self {
        match ty {
            TypeDefinition::Integer => ValueKind::Int,
            TypeDefinition::Real => ValueKind::Real,
            TypeDefinition::Boolean => ValueKind::Bool,
            TypeDefinition::String
            | TypeDefinition::NoValue
            | TypeDefinition::IntegerPair
            | TypeDefinition::RealPair
            | TypeDefinition::Function(_) => ValueKind::Ref,
        }
    }

    /// The load opcode for this kind.
    pub fn load_op(self) -> OpCode {
        match self {
            ValueKind::Int => OpCode::LoadInt,
            ValueKind::Real => OpCode::LoadReal,
            ValueKind::Bool => OpCode::LoadBool,
            ValueKind::Ref => OpCode::LoadRef,
        }
    }

    /// The store opcode for this kind.
    pub fn store_op(self) -> OpCode {
        match self {
            ValueKind::Int => OpCode::StoreInt,
            ValueKind::Real => OpCode::StoreReal,
            ValueKind::Bool => OpCode::StoreBool,
            ValueKind::Ref => OpCode::StoreRef,
        }
    }

    /// The return opcode for this kind.
    pub fn return_op(self) -> OpCode {
        match self {
            ValueKind::Int => OpCode::ReturnInt,
            ValueKind::Real => OpCode::ReturnReal,
            ValueKind::Bool => OpCode::ReturnBool,
            ValueKind::Ref => OpCode::ReturnRef,
        }
    }
}

/// Element kind of a pair, encoded as the operand of `NewPair`/`InitPair`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PairKind {
    /// Pair of integers
    Int = 0,
    /// Pair of reals
    Real = 1,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_repr() {
        assert_eq!(OpCode::Constant as u8, 0);
        assert_eq!(OpCode::ConstantWide as u8, 1);
    }

    #[test]
    fn opcode_from_u8() {
        assert_eq!(OpCode::from_u8(0), Some(OpCode::Constant));
        assert_eq!(OpCode::from_u8(OpCode::BindFunction as u8), Some(OpCode::BindFunction));
        assert_eq!(OpCode::from_u8(255), None);
    }

    #[test]
    fn table_matches_discriminants() {
        for (i, op) in OpCode::ALL.iter().enumerate() {
            assert_eq!(*op as u8 as usize, i, "{} out of place", op.name());
        }
        assert_eq!(OpCode::from_u8(OpCode::ReturnRef as u8 + 1), None);
    }

    #[test]
    fn operand_sizes() {
        assert_eq!(OpCode::Pop.operand_size(), 0);
        assert_eq!(OpCode::ReturnReal.operand_size(), 0);
        assert_eq!(OpCode::Constant.operand_size(), 1);
        assert_eq!(OpCode::NewPair.operand_size(), 1);
        assert_eq!(OpCode::LoadReal.operand_size(), 2);
        assert_eq!(OpCode::BindFunction.operand_size(), 2);
        assert_eq!(OpCode::Call.operand_size(), 3);
    }

    #[test]
    fn stack_effects() {
        assert_eq!(OpCode::LoadInt.stack_effect(), Some(1));
        assert_eq!(OpCode::InitPair.stack_effect(), Some(-3));
        assert_eq!(OpCode::ReturnRef.stack_effect(), Some(-1));
        assert_eq!(OpCode::Call.stack_effect(), None);
    }

    #[test]
    fn value_kinds() {
        assert_eq!(ValueKind::of(&TypeDefinition::Integer), ValueKind::Int);
        assert_eq!(ValueKind::of(&TypeDefinition::NoValue), ValueKind::Ref);
        assert_eq!(ValueKind::of(&TypeDefinition::RealPair), ValueKind::Ref);
    }

    #[test]
    fn typed_variants() {
        assert_eq!(ValueKind::Real.load_op(), OpCode::LoadReal);
        assert_eq!(ValueKind::Ref.store_op(), OpCode::StoreRef);
        assert_eq!(ValueKind::Bool.return_op(), OpCode::ReturnBool);
        assert!(ValueKind::Int.return_op().is_return());
        assert!(!OpCode::Pop.is_return());
    }
}
