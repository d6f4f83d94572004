//! Assembly types for the FOOL compiler.
//!
//! - [`Instruction`] and [`Label`] - the target machine's instruction set
//! - [`CodeBlock`] - an instruction sequence with source lines
//! - [`Assembly`] - a finished program, printable as assembly text

mod chunk;
mod instruction;

use std::fmt;

pub use chunk::CodeBlock;
pub use instruction::{Instruction, Label, LabelKind, ParseInstructionError};

/// A complete program for the target machine.
///
/// Layout: preamble and main code ending in `halt`, followed by the body of
/// every function and method, each starting with its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    code: Vec<Instruction>,
    lines: Option<Vec<u32>>,
}

impl Assembly {
    /// Build from a finished block, optionally keeping its line table.
    pub fn new(block: CodeBlock, keep_lines: bool) -> Self {
        let (code, lines) = block.into_parts();
        Self {
            code,
            lines: keep_lines.then_some(lines),
        }
    }

    /// Read assembly text, one instruction per line. Blank lines are
    /// skipped; no line table is kept.
    pub fn parse(text: &str) -> Result<Self, ParseInstructionError> {
        let code = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::parse::<Instruction>)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { code, lines: None })
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.code
    }

    /// Source line of every instruction, if the table was kept.
    pub fn lines(&self) -> Option<&[u32]> {
        self.lines.as_deref()
    }

    /// Number of entries, label definitions included.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// One instruction per line, each terminated by `\n`.
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity(self.code.len() * 6);
        for instruction in &self.code {
            text.push_str(&instruction.to_string());
            text.push('\n');
        }
        text
    }
}

impl fmt::Display for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in &self.code {
            writeln!(f, "{instruction}")?;
        }
        Ok(())
    }
}
