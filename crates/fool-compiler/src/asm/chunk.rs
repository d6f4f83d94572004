//! Instruction sequences.
//!
//! A `CodeBlock` holds the instructions of one routine (or of the main
//! program), along with the source line each instruction came from.

use super::Instruction;

/// An ordered list of instructions with a parallel source-line table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBlock {
    /// The instructions.
    code: Vec<Instruction>,
    /// Source line of each instruction (parallel to `code`).
    lines: Vec<u32>,
}

impl CodeBlock {
    /// Create an empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a block with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            code: Vec::with_capacity(capacity),
            lines: Vec::with_capacity(capacity),
        }
    }

    /// Append an instruction.
    pub fn push(&mut self, instruction: Instruction, line: u32) {
        self.code.push(instruction);
        self.lines.push(line);
    }

    /// Move every instruction of `other` to the end of this block.
    pub fn append(&mut self, other: &mut CodeBlock) {
        self.code.append(&mut other.code);
        self.lines.append(&mut other.lines);
    }

    /// Number of entries, label definitions included.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.code
    }

    pub fn lines(&self) -> &[u32] {
        &self.lines
    }

    /// Source line of the entry at `index`.
    pub fn line_at(&self, index: usize) -> Option<u32> {
        self.lines.get(index).copied()
    }

    /// Split into instructions and line table.
    pub fn into_parts(self) -> (Vec<Instruction>, Vec<u32>) {
        (self.code, self.lines)
    }
}
