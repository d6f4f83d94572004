//! Target machine instructions.
//!
//! This module defines the instruction set of the stack machine the code
//! generator targets. Every instruction prints as one line of assembly
//! text and parses back from it.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Kind of a code label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    /// Branch target inside a routine.
    Branch,
    /// Entry point of a function or method.
    Function,
}

/// A code label, printed as `label<N>` or `function<N>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label {
    pub kind: LabelKind,
    pub index: u32,
}

impl Label {
    pub fn branch(index: u32) -> Self {
        Self {
            kind: LabelKind::Branch,
            index,
        }
    }

    pub fn function(index: u32) -> Self {
        Self {
            kind: LabelKind::Function,
            index,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LabelKind::Branch => write!(f, "label{}", self.index),
            LabelKind::Function => write!(f, "function{}", self.index),
        }
    }
}

impl FromStr for Label {
    type Err = ParseInstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, digits) = if let Some(rest) = s.strip_prefix("function") {
            (LabelKind::Function, rest)
        } else if let Some(rest) = s.strip_prefix("label") {
            (LabelKind::Branch, rest)
        } else {
            return Err(ParseInstructionError::InvalidLabel(s.to_string()));
        };
        let index = digits
            .parse()
            .map_err(|_| ParseInstructionError::InvalidLabel(s.to_string()))?;
        Ok(Self { kind, index })
    }
}

/// One machine instruction, or a label definition.
///
/// Unless noted, operands come from the top of the stack and results are
/// pushed back. For binary operations `v1` is the top and `v2` the value
/// beneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    // =========================================================================
    // Stack
    // =========================================================================
    /// Push an integer.
    Push(i32),
    /// Push the code address of a label.
    PushLabel(Label),
    /// Discard the top of stack.
    Pop,

    // =========================================================================
    // Arithmetic
    // =========================================================================
    /// `v2 + v1`
    Add,
    /// `v2 - v1`
    Sub,
    /// `v2 * v1`
    Mult,
    /// `v2 / v1`
    Div,

    // =========================================================================
    // Control Flow
    // =========================================================================
    /// Unconditional branch.
    Branch(Label),
    /// Pop two values, branch if `v2 == v1`.
    BranchEq(Label),
    /// Pop two values, branch if `v2 <= v1`.
    BranchLessEq(Label),
    /// Pop an address, save the next instruction address in `ra`, jump.
    JumpSubroutine,
    /// Print the top of stack without popping it.
    Print,
    /// Stop the machine.
    Halt,

    // =========================================================================
    // Memory
    // =========================================================================
    /// Pop an address, push the word stored there.
    LoadWord,
    /// Pop an address, pop a value, store the value at the address.
    StoreWord,

    // =========================================================================
    // Registers
    // =========================================================================
    /// Push `fp`.
    LoadFp,
    /// Pop into `fp`.
    StoreFp,
    /// Copy `sp` into `fp`.
    CopyFp,
    /// Push `ra`.
    LoadRa,
    /// Pop into `ra`.
    StoreRa,
    /// Push `tm`.
    LoadTm,
    /// Pop into `tm`.
    StoreTm,
    /// Push `hp`.
    LoadHp,
    /// Pop into `hp`.
    StoreHp,

    /// Label definition; occupies no code address.
    Label(Label),
}

impl Instruction {
    /// Mnemonic of this instruction (the label text for a definition).
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Push(_) | Instruction::PushLabel(_) => "push",
            Instruction::Pop => "pop",
            Instruction::Add => "add",
            Instruction::Sub => "sub",
            Instruction::Mult => "mult",
            Instruction::Div => "div",
            Instruction::Branch(_) => "b",
            Instruction::BranchEq(_) => "beq",
            Instruction::BranchLessEq(_) => "bleq",
            Instruction::JumpSubroutine => "js",
            Instruction::Print => "print",
            Instruction::Halt => "halt",
            Instruction::LoadWord => "lw",
            Instruction::StoreWord => "sw",
            Instruction::LoadFp => "lfp",
            Instruction::StoreFp => "sfp",
            Instruction::CopyFp => "cfp",
            Instruction::LoadRa => "lra",
            Instruction::StoreRa => "sra",
            Instruction::LoadTm => "ltm",
            Instruction::StoreTm => "stm",
            Instruction::LoadHp => "lhp",
            Instruction::StoreHp => "shp",
            Instruction::Label(_) => "",
        }
    }

    /// Whether this is a label definition rather than an executable
    /// instruction.
    pub fn is_label(&self) -> bool {
        matches!(self, Instruction::Label(_))
    }

    /// Label this instruction refers to or defines.
    pub fn label(&self) -> Option<Label> {
        match self {
            Instruction::PushLabel(label)
            | Instruction::Branch(label)
            | Instruction::BranchEq(label)
            | Instruction::BranchLessEq(label)
            | Instruction::Label(label) => Some(*label),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Push(value) => write!(f, "push {value}"),
            Instruction::PushLabel(label)
            | Instruction::Branch(label)
            | Instruction::BranchEq(label)
            | Instruction::BranchLessEq(label) => write!(f, "{} {label}", self.mnemonic()),
            Instruction::Label(label) => write!(f, "{label}:"),
            other => f.write_str(other.mnemonic()),
        }
    }
}

/// Error reading an instruction from assembly text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseInstructionError {
    #[error("empty instruction")]
    Empty,
    #[error("unknown mnemonic '{0}'")]
    UnknownMnemonic(String),
    #[error("'{0}' expects an operand")]
    MissingOperand(&'static str),
    #[error("'{0}' takes no operand")]
    UnexpectedOperand(String),
    #[error("invalid label '{0}'")]
    InvalidLabel(String),
}

impl FromStr for Instruction {
    type Err = ParseInstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        if let Some(label) = line.strip_suffix(':') {
            return Ok(Instruction::Label(label.parse()?));
        }

        let mut parts = line.split_whitespace();
        let mnemonic = parts.next().ok_or(ParseInstructionError::Empty)?;
        let operand = parts.next();
        if let Some(extra) = parts.next() {
            return Err(ParseInstructionError::UnexpectedOperand(extra.to_string()));
        }

        let with_label = |make: fn(Label) -> Instruction,
                          name: &'static str|
         -> Result<Instruction, ParseInstructionError> {
            let operand = operand.ok_or(ParseInstructionError::MissingOperand(name))?;
            Ok(make(operand.parse()?))
        };

        let instruction = match mnemonic {
            "push" => {
                let operand = operand.ok_or(ParseInstructionError::MissingOperand("push"))?;
                return match operand.parse::<i32>() {
                    Ok(value) => Ok(Instruction::Push(value)),
                    Err(_) => Ok(Instruction::PushLabel(operand.parse()?)),
                };
            }
            "b" => return with_label(Instruction::Branch, "b"),
            "beq" => return with_label(Instruction::BranchEq, "beq"),
            "bleq" => return with_label(Instruction::BranchLessEq, "bleq"),
            "pop" => Instruction::Pop,
            "add" => Instruction::Add,
            "sub" => Instruction::Sub,
            "mult" => Instruction::Mult,
            "div" => Instruction::Div,
            "js" => Instruction::JumpSubroutine,
            "print" => Instruction::Print,
            "halt" => Instruction::Halt,
            "lw" => Instruction::LoadWord,
            "sw" => Instruction::StoreWord,
            "lfp" => Instruction::LoadFp,
            "sfp" => Instruction::StoreFp,
            "cfp" => Instruction::CopyFp,
            "lra" => Instruction::LoadRa,
            "sra" => Instruction::StoreRa,
            "ltm" => Instruction::LoadTm,
            "stm" => Instruction::StoreTm,
            "lhp" => Instruction::LoadHp,
            "shp" => Instruction::StoreHp,
            other => return Err(ParseInstructionError::UnknownMnemonic(other.to_string())),
        };

        match operand {
            Some(extra) => Err(ParseInstructionError::UnexpectedOperand(extra.to_string())),
            None => Ok(instruction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_machine_text() {
        assert_eq!(Instruction::Push(-1).to_string(), "push -1");
        assert_eq!(
            Instruction::PushLabel(Label::function(3)).to_string(),
            "push function3"
        );
        assert_eq!(Instruction::BranchEq(Label::branch(0)).to_string(), "beq label0");
        assert_eq!(Instruction::Label(Label::branch(7)).to_string(), "label7:");
        assert_eq!(Instruction::CopyFp.to_string(), "cfp");
        assert_eq!(Instruction::JumpSubroutine.to_string(), "js");
    }

    #[test]
    fn parse_reads_what_display_writes() {
        let all = [
            Instruction::Push(42),
            Instruction::PushLabel(Label::function(1)),
            Instruction::Pop,
            Instruction::Mult,
            Instruction::Branch(Label::branch(2)),
            Instruction::BranchLessEq(Label::branch(9)),
            Instruction::StoreWord,
            Instruction::StoreHp,
            Instruction::Label(Label::function(0)),
        ];
        for instruction in all {
            let text = instruction.to_string();
            assert_eq!(text.parse::<Instruction>(), Ok(instruction), "{text}");
        }
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<Instruction>(), Err(ParseInstructionError::Empty));
        assert!(matches!(
            "jump label1".parse::<Instruction>(),
            Err(ParseInstructionError::UnknownMnemonic(m)) if m == "jump"
        ));
        assert_eq!(
            "beq".parse::<Instruction>(),
            Err(ParseInstructionError::MissingOperand("beq"))
        );
        assert!(matches!(
            "pop 3".parse::<Instruction>(),
            Err(ParseInstructionError::UnexpectedOperand(_))
        ));
        assert!(matches!(
            "push here".parse::<Instruction>(),
            Err(ParseInstructionError::InvalidLabel(_))
        ));
    }
}
