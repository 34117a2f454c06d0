//! Bytecode emitter for the Euclin code generator.
//!
//! The [`BytecodeEmitter`] provides a high-level API for generating the
//! bytecode of one function. It interns constants into the shared module
//! pool and tracks the operand stack depth of everything it writes, so the
//! finished chunk carries its own `max_stack`.
//!
//! # Example
//!
//! ```
//! use euclin_compiler::bytecode::{ConstantPool, OpCode, ValueKind};
//! use euclin_compiler::emit::BytecodeEmitter;
//!
//! let mut constants = ConstantPool::new();
//! let mut emitter = BytecodeEmitter::new(&mut constants);
//!
//! emitter.set_line(1);
//! emitter.emit_real(2.5);
//! emitter.emit_return(ValueKind::Real);
//!
//! let chunk = emitter.finish(0);
//! chunk.assert_opcodes(&[OpCode::Constant, OpCode::ReturnReal]);
//! assert_eq!(chunk.max_stack(), 1);
//! ```

use euclin_core::FunctionHash;

use crate::bytecode::{
    BytecodeChunk, Constant, ConstantPool, FunctionValue, Label, LocalRange, OpCode, PairKind,
    ParamRecord, ValueKind,
};

/// Emits bytecode instructions.
///
/// Uses a shared module-level constant pool for deduplication across functions.
/// Each `BytecodeEmitter` produces bytecode for a single function.
pub struct BytecodeEmitter<'pool> {
    /// The bytecode chunk being built (per-function)
    chunk: BytecodeChunk,

    /// Shared module-level constant pool (deduplicated)
    constants: &'pool mut ConstantPool,

    /// Current source line for debug info (0 = unknown)
    current_line: u32,

    /// Operand stack depth after the last emitted instruction
    depth: i32,

    /// Highest depth seen so far
    max_depth: i32,
}

impl<'pool> BytecodeEmitter<'pool> {
    /// Create a new bytecode emitter.
    ///
    /// # Arguments
    /// * `constants` - The shared module-level constant pool
    pub fn new(constants: &'pool mut ConstantPool) -> Self {
        Self {
            chunk: BytecodeChunk::new(),
            constants,
            current_line: 0,
            depth: 0,
            max_depth: 0,
        }
    }

    /// Set current source line for debug info.
    ///
    /// All subsequent instructions will be associated with this line number.
    pub fn set_line(&mut self, line: u32) {
        self.current_line = line;
    }

    /// Get current source line.
    pub fn current_line(&self) -> u32 {
        self.current_line
    }

    /// Reborrow the shared constant pool, for a nested emitter.
    pub fn constants_mut(&mut self) -> &mut ConstantPool {
        self.constants
    }

    /// Operand stack depth at the current position.
    pub fn depth(&self) -> usize {
        self.depth.max(0) as usize
    }

    fn adjust(&mut self, effect: i32) {
        self.depth += effect;
        debug_assert!(self.depth >= 0, "operand stack underflow in emitted code");
        self.max_depth = self.max_depth.max(self.depth);
    }

    // ==========================================================================
    // Basic Emission
    // ==========================================================================

    /// Emit a single opcode with no operands.
    pub fn emit(&mut self, op: OpCode) {
        self.chunk.write_op(op, self.current_line);
        self.adjust(op.stack_effect().unwrap_or(0));
    }

    /// Emit opcode with 8-bit operand.
    pub fn emit_byte(&mut self, op: OpCode, byte: u8) {
        self.emit(op);
        self.chunk.write_byte(byte, self.current_line);
    }

    /// Emit opcode with 16-bit operand.
    pub fn emit_u16(&mut self, op: OpCode, value: u16) {
        self.emit(op);
        self.chunk.write_u16(value, self.current_line);
    }

    /// Emit a constant load instruction.
    ///
    /// Uses narrow (8-bit) or wide (16-bit) index based on pool size.
    pub fn emit_constant(&mut self, constant: Constant) {
        let index = self.constants.add(constant);
        if index < 256 {
            self.emit_byte(OpCode::Constant, index as u8);
        } else {
            self.emit_u16(OpCode::ConstantWide, index as u16);
        }
    }

    // ==========================================================================
    // Literals
    // ==========================================================================

    /// Emit an integer constant.
    pub fn emit_int(&mut self, value: i64) {
        self.emit_constant(Constant::Int(value));
    }

    /// Emit a real constant.
    pub fn emit_real(&mut self, value: f64) {
        self.emit_constant(Constant::Real(value.into()));
    }

    /// Emit a string constant.
    pub fn emit_string(&mut self, value: &str) {
        self.emit_constant(Constant::StringData(value.as_bytes().to_vec()));
    }

    /// Emit boolean.
    pub fn emit_bool(&mut self, value: bool) {
        self.emit(if value {
            OpCode::PushTrue
        } else {
            OpCode::PushFalse
        });
    }

    /// Emit the no-value singleton.
    pub fn emit_unit(&mut self) {
        self.emit(OpCode::PushUnit);
    }

    // ==========================================================================
    // Local Slots
    // ==========================================================================

    /// Emit a typed load from a local slot.
    pub fn emit_load(&mut self, kind: ValueKind, slot: u16) {
        self.emit_u16(kind.load_op(), slot);
    }

    /// Emit a typed store into a local slot.
    pub fn emit_store(&mut self, kind: ValueKind, slot: u16) {
        self.emit_u16(kind.store_op(), slot);
    }

    // ==========================================================================
    // Pairs
    // ==========================================================================

    /// Emit pair allocation.
    pub fn emit_new_pair(&mut self, kind: PairKind) {
        self.emit_byte(OpCode::NewPair, kind as u8);
    }

    /// Emit pair initialization.
    pub fn emit_init_pair(&mut self, kind: PairKind) {
        self.emit_byte(OpCode::InitPair, kind as u8);
    }

    // ==========================================================================
    // Functions
    // ==========================================================================

    /// Emit a static call.
    ///
    /// Pops `arg_count` values and pushes one result when `returns_value`.
    pub fn emit_call(&mut self, func_hash: FunctionHash, arg_count: u8, returns_value: bool) {
        let index = self.constants.add_function(func_hash);
        self.chunk.write_op(OpCode::Call, self.current_line);
        self.chunk.write_u16(index as u16, self.current_line);
        self.chunk.write_byte(arg_count, self.current_line);
        self.adjust(i32::from(returns_value) - i32::from(arg_count));
    }

    /// Emit creation of a bound function value.
    pub fn emit_bind_function(&mut self, value: FunctionValue) {
        let index = self.constants.add_function_value(value);
        self.emit_u16(OpCode::BindFunction, index as u16);
    }

    /// Emit a typed return.
    pub fn emit_return(&mut self, kind: ValueKind) {
        self.emit(kind.return_op());
    }

    // ==========================================================================
    // Stack Operations
    // ==========================================================================

    /// Emit pop.
    pub fn emit_pop(&mut self) {
        self.emit(OpCode::Pop);
    }

    /// Emit dup.
    pub fn emit_dup(&mut self) {
        self.emit(OpCode::Dup);
    }

    // ==========================================================================
    // Debug Metadata
    // ==========================================================================

    /// Place a label at the current offset.
    pub fn emit_label(&mut self) -> Label {
        self.chunk.add_label()
    }

    /// Record a parameter declaration.
    pub fn declare_param(&mut self, record: ParamRecord) {
        self.chunk.add_param(record);
    }

    /// Record a local-variable live range.
    pub fn declare_local_range(&mut self, range: LocalRange) {
        self.chunk.add_local_range(range);
    }

    /// Offset of a previously placed label.
    pub fn label_offset(&self, label: Label) -> Option<usize> {
        self.chunk.label_offset(label)
    }

    /// Get current code offset.
    pub fn current_offset(&self) -> usize {
        self.chunk.current_offset()
    }

    // ==========================================================================
    // Finalization
    // ==========================================================================

    /// Finish and return the bytecode chunk with its frame sizing.
    pub fn finish(mut self, max_locals: u16) -> BytecodeChunk {
        let max_stack = u16::try_from(self.max_depth).unwrap_or(u16::MAX);
        self.chunk.set_frame(max_stack, max_locals);
        self.chunk
    }
}
