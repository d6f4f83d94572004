//! Instruction emitter for the FOOL compiler.
//!
//! [`Emitter`] appends instructions to a [`CodeBlock`], stamping each with
//! the current source line, and bundles the short instruction sequences the
//! code generator repeats: static-chain walks, the heap bump and the call
//! protocol.
//!
//! # Example
//!
//! ```
//! use fool_compiler::emit::Emitter;
//!
//! let mut emitter = Emitter::new();
//! emitter.set_line(1);
//! emitter.push(1);
//! emitter.push(2);
//! emitter.add();
//! emitter.print();
//!
//! let block = emitter.finish();
//! assert_eq!(block.len(), 4);
//! ```

mod labels;

pub use labels::LabelAllocator;

use crate::asm::{CodeBlock, Instruction, Label};

/// Emits instructions into one code block.
#[derive(Debug)]
pub struct Emitter {
    block: CodeBlock,
    current_line: u32,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter {
    pub fn new() -> Self {
        Self {
            block: CodeBlock::new(),
            current_line: 1,
        }
    }

    /// Set current source line.
    ///
    /// All subsequent instructions will be associated with this line number.
    pub fn set_line(&mut self, line: u32) {
        self.current_line = line;
    }

    pub fn current_line(&self) -> u32 {
        self.current_line
    }

    /// Number of entries emitted so far.
    pub fn len(&self) -> usize {
        self.block.len()
    }

    pub fn is_empty(&self) -> bool {
        self.block.is_empty()
    }

    /// Finish emission and return the block.
    pub fn finish(self) -> CodeBlock {
        self.block
    }

    // ==========================================================================
    // Basic Emission
    // ==========================================================================

    pub fn emit(&mut self, instruction: Instruction) {
        self.block.push(instruction, self.current_line);
    }

    /// Define `label` at the current position.
    pub fn label(&mut self, label: Label) {
        self.emit(Instruction::Label(label));
    }

    pub fn push(&mut self, value: i32) {
        self.emit(Instruction::Push(value));
    }

    pub fn push_label(&mut self, label: Label) {
        self.emit(Instruction::PushLabel(label));
    }

    pub fn pop(&mut self) {
        self.emit(Instruction::Pop);
    }

    /// Emit `count` pops.
    pub fn pop_n(&mut self, count: usize) {
        for _ in 0..count {
            self.pop();
        }
    }

    pub fn add(&mut self) {
        self.emit(Instruction::Add);
    }

    pub fn sub(&mut self) {
        self.emit(Instruction::Sub);
    }

    pub fn mult(&mut self) {
        self.emit(Instruction::Mult);
    }

    pub fn div(&mut self) {
        self.emit(Instruction::Div);
    }

    pub fn print(&mut self) {
        self.emit(Instruction::Print);
    }

    pub fn halt(&mut self) {
        self.emit(Instruction::Halt);
    }

    pub fn branch(&mut self, target: Label) {
        self.emit(Instruction::Branch(target));
    }

    pub fn branch_eq(&mut self, target: Label) {
        self.emit(Instruction::BranchEq(target));
    }

    pub fn branch_less_eq(&mut self, target: Label) {
        self.emit(Instruction::BranchLessEq(target));
    }

    pub fn load_word(&mut self) {
        self.emit(Instruction::LoadWord);
    }

    pub fn store_word(&mut self) {
        self.emit(Instruction::StoreWord);
    }

    pub fn load_fp(&mut self) {
        self.emit(Instruction::LoadFp);
    }

    pub fn store_fp(&mut self) {
        self.emit(Instruction::StoreFp);
    }

    pub fn copy_fp(&mut self) {
        self.emit(Instruction::CopyFp);
    }

    pub fn load_ra(&mut self) {
        self.emit(Instruction::LoadRa);
    }

    pub fn store_ra(&mut self) {
        self.emit(Instruction::StoreRa);
    }

    pub fn load_tm(&mut self) {
        self.emit(Instruction::LoadTm);
    }

    pub fn store_tm(&mut self) {
        self.emit(Instruction::StoreTm);
    }

    pub fn load_hp(&mut self) {
        self.emit(Instruction::LoadHp);
    }

    pub fn store_hp(&mut self) {
        self.emit(Instruction::StoreHp);
    }

    pub fn jump_subroutine(&mut self) {
        self.emit(Instruction::JumpSubroutine);
    }

    // ==========================================================================
    // Sequences
    // ==========================================================================

    /// Follow the static chain `hops` times from the current frame:
    /// `lfp` then one `lw` per hop.
    pub fn frame_of(&mut self, hops: u32) {
        self.load_fp();
        for _ in 0..hops {
            self.load_word();
        }
    }

    /// Load the word at `offset` from the address on top of the stack.
    pub fn load_at_offset(&mut self, offset: i32) {
        self.push(offset);
        self.add();
        self.load_word();
    }

    /// Pop a value and store it at the heap pointer, then bump the heap
    /// pointer by one cell.
    pub fn store_on_heap(&mut self) {
        self.load_hp();
        self.store_word();
        self.bump_heap();
    }

    /// `hp = hp + 1`
    pub fn bump_heap(&mut self) {
        self.load_hp();
        self.push(1);
        self.add();
        self.store_hp();
    }

    /// Keep the address on top of the stack as the access link and leave a
    /// second copy above it: `stm ltm ltm`.
    pub fn duplicate_via_tm(&mut self) {
        self.store_tm();
        self.load_tm();
        self.load_tm();
    }

    /// Turn a preceding conditional branch to `target` into a value:
    /// `push fallthrough; b end; target: push taken; end:`.
    pub fn materialize_bool(&mut self, target: Label, end: Label, fallthrough: i32, taken: i32) {
        self.push(fallthrough);
        self.branch(end);
        self.label(target);
        self.push(taken);
        self.label(end);
    }
}
