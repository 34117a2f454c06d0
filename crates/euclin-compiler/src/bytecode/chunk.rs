//! Bytecode chunk for compiled functions.
//!
//! A `BytecodeChunk` contains the compiled bytecode for a single function,
//! along with its debug metadata: a per-byte line table, label offsets,
//! parameter records and local-variable live ranges. Frame sizing
//! (`max_stack`, `max_locals`) is filled in when the emitter finishes.

use super::OpCode;

/// A marker at a bytecode offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label(pub(crate) usize);

impl Label {
    /// Index of this label in its chunk.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Debug record for one declared parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamRecord {
    /// Parameter name.
    pub name: String,
    /// Type descriptor (`R`, `F(R)R`, ...).
    pub descriptor: String,
}

/// Live range of a local slot, as bytecode offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRange {
    /// Variable name.
    pub name: String,
    /// Type descriptor.
    pub descriptor: String,
    /// Slot index.
    pub slot: u16,
    /// First offset where the slot is live.
    pub start: usize,
    /// Offset past the last instruction where the slot is live.
    pub end: usize,
}

/// A chunk of compiled bytecode for a single function.
///
/// Constants are stored at module level in a `ConstantPool`, not per-function.
#[derive(Debug, Clone, Default)]
pub struct BytecodeChunk {
    /// The bytecode instructions.
    code: Vec<u8>,
    /// Line numbers for debugging (parallel to code).
    /// Each entry corresponds to a byte in `code`.
    lines: Vec<u32>,
    /// Label offsets, indexed by `Label`.
    labels: Vec<usize>,
    params: Vec<ParamRecord>,
    locals: Vec<LocalRange>,
    max_stack: u16,
    max_locals: u16,
}

impl BytecodeChunk {
    /// Create a new empty bytecode chunk.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write an opcode.
    pub fn write_op(&mut self, op: OpCode, line: u32) {
        self.code.push(op as u8);
        self.lines.push(line);
    }

    /// Write a byte operand.
    pub fn write_byte(&mut self, byte: u8, line: u32) {
        self.code.push(byte);
        self.lines.push(line);
    }

    /// Write a 16-bit operand (big-endian).
    pub fn write_u16(&mut self, value: u16, line: u32) {
        for byte in value.to_be_bytes() {
            self.write_byte(byte, line);
        }
    }

    /// Get current code offset.
    pub fn current_offset(&self) -> usize {
        self.code.len()
    }

    /// Place a label at the current offset.
    pub fn add_label(&mut self) -> Label {
        self.labels.push(self.code.len());
        Label(self.labels.len() - 1)
    }

    /// Offset of a label.
    pub fn label_offset(&self, label: Label) -> Option<usize> {
        self.labels.get(label.0).copied()
    }

    /// Number of labels.
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Record a parameter declaration.
    pub fn add_param(&mut self, record: ParamRecord) {
        self.params.push(record);
    }

    /// Record a local-variable live range.
    pub fn add_local_range(&mut self, range: LocalRange) {
        self.locals.push(range);
    }

    /// Declared parameters.
    pub fn params(&self) -> &[ParamRecord] {
        &self.params
    }

    /// Local-variable live ranges.
    pub fn local_ranges(&self) -> &[LocalRange] {
        &self.locals
    }

    /// Set frame sizing.
    pub fn set_frame(&mut self, max_stack: u16, max_locals: u16) {
        self.max_stack = max_stack;
        self.max_locals = max_locals;
    }

    /// Maximum operand stack depth.
    pub fn max_stack(&self) -> u16 {
        self.max_stack
    }

    /// Number of local slots.
    pub fn max_locals(&self) -> u16 {
        self.max_locals
    }

    /// Get the bytecode.
    pub fn code(&self) -> &[u8] {
        &self.code
    }

    /// Get the line numbers.
    pub fn lines(&self) -> &[u32] {
        &self.lines
    }

    /// Get the line number for a given offset.
    pub fn line_at(&self, offset: usize) -> Option<u32> {
        self.lines.get(offset).copied()
    }

    /// Get the length of the bytecode.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Check if the chunk is empty.
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Read a byte at the given offset.
    pub fn read_byte(&self, offset: usize) -> Option<u8> {
        self.code.get(offset).copied()
    }

    /// Read a u16 at the given offset (big-endian).
    pub fn read_u16(&self, offset: usize) -> Option<u16> {
        match self.code.get(offset..offset + 2) {
            Some(&[hi, lo]) => Some(u16::from_be_bytes([hi, lo])),
            _ => None,
        }
    }

    /// Read an opcode at the given offset.
    pub fn read_op(&self, offset: usize) -> Option<OpCode> {
        self.code.get(offset).and_then(|&b| OpCode::from_u8(b))
    }

    /// Decode every instruction as `(offset, opcode)`, skipping operands.
    pub fn instructions(&self) -> Vec<(usize, OpCode)> {
        let mut out = Vec::new();
        let mut offset = 0;

        while offset < self.code.len() {
            if let Some(op) = self.read_op(offset) {
                out.push((offset, op));
                offset += 1 + op.operand_size();
            } else {
                // Invalid opcode, skip one byte
                offset += 1;
            }
        }

        out
    }

    /// Extract all opcodes from the chunk, skipping operands.
    ///
    /// This is useful for testing bytecode sequences without worrying about
    /// specific operand values or instruction offsets.
    pub fn opcodes(&self) -> Vec<OpCode> {
        self.instructions().into_iter().map(|(_, op)| op).collect()
    }

    /// Check if this chunk contains exactly the given opcode sequence.
    ///
    /// This ignores operand values, only checking the opcodes themselves.
    /// Panics with a descriptive message if the sequences don't match.
    #[track_caller]
    pub fn assert_opcodes(&self, expected: &[OpCode]) {
        let actual = self.opcodes();
        assert_eq!(
            actual,
            expected,
            "Bytecode mismatch.\nExpected: {:?}\nActual:   {:?}",
            expected.iter().map(|op| op.name()).collect::<Vec<_>>(),
            actual.iter().map(|op| op.name()).collect::<Vec<_>>(),
        );
    }

    /// Check if this chunk contains the given opcodes (in order, but not necessarily contiguous).
    #[track_caller]
    pub fn assert_contains_opcodes(&self, expected: &[OpCode]) {
        let actual = self.opcodes();
        let mut expected_iter = expected.iter().peekable();

        for op in &actual {
            if expected_iter.peek() == Some(&op) {
                expected_iter.next();
            }
        }

        if expected_iter.peek().is_some() {
            let remaining: Vec<_> = expected_iter.map(|op| op.name()).collect();
            panic!(
                "Missing opcodes in sequence.\nExpected to find: {:?}\nActual bytecode:  {:?}",
                remaining,
                actual.iter().map(|op| op.name()).collect::<Vec<_>>(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_chunk_is_empty() {
        let chunk = BytecodeChunk::new();
        assert!(chunk.is_empty());
        assert_eq!(chunk.max_stack(), 0);
    }

    #[test]
    fn write_u16_is_big_endian() {
        let mut chunk = BytecodeChunk::new();
        chunk.write_u16(0x1234, 5);

        assert_eq!(chunk.code(), &[0x12, 0x34]);
        assert_eq!(chunk.read_u16(0), Some(0x1234));
        assert_eq!(chunk.read_u16(1), None);
        assert_eq!(chunk.line_at(1), Some(5));
    }

    #[test]
    fn labels_record_offsets() {
        let mut chunk = BytecodeChunk::new();
        let entry = chunk.add_label();
        chunk.write_op(OpCode::PushUnit, 1);
        chunk.write_op(OpCode::ReturnRef, 1);
        let exit = chunk.add_label();

        assert_eq!(chunk.label_offset(entry), Some(0));
        assert_eq!(chunk.label_offset(exit), Some(2));
        assert_eq!(chunk.label_count(), 2);
    }

    #[test]
    fn opcodes_skip_operands() {
        let mut chunk = BytecodeChunk::new();
        chunk.write_op(OpCode::LoadReal, 1);
        chunk.write_u16(0, 1);
        chunk.write_op(OpCode::Call, 1);
        chunk.write_u16(3, 1);
        chunk.write_byte(1, 1);
        chunk.write_op(OpCode::ReturnReal, 1);

        assert_eq!(
            chunk.instructions(),
            vec![(0, OpCode::LoadReal), (3, OpCode::Call), (7, OpCode::ReturnReal)]
        );
        chunk.assert_opcodes(&[OpCode::LoadReal, OpCode::Call, OpCode::ReturnReal]);
        chunk.assert_contains_opcodes(&[OpCode::LoadReal, OpCode::ReturnReal]);
    }

    #[test]
    #[should_panic(expected = "Bytecode mismatch")]
    fn assert_opcodes_failure() {
        let mut chunk = BytecodeChunk::new();
        chunk.write_op(OpCode::PushTrue, 1);
        chunk.assert_opcodes(&[OpCode::PushFalse]);
    }

    #[test]
    #[should_panic(expected = "Missing opcodes")]
    fn assert_contains_opcodes_failure() {
        let mut chunk = BytecodeChunk::new();
        chunk.write_op(OpCode::PushTrue, 1);
        chunk.assert_contains_opcodes(&[OpCode::PushTrue, OpCode::Pop]);
    }
}
