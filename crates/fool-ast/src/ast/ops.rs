//! Operator definitions for expressions.

use std::fmt;

/// Binary operators.
///
/// Organized by precedence from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Logical
    /// `||`
    Or,
    /// `&&`
    And,

    // Comparison
    /// `==`
    Eq,
    /// `<=`
    Le,
    /// `>=`
    Ge,

    // Additive
    /// `+`
    Add,
    /// `-`
    Sub,

    // Multiplicative
    /// `*`
    Mul,
    /// `/`
    Div,
}

/// Operand contract of a binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorClass {
    /// Both operands `int`, result `int`.
    Arithmetic,
    /// Both operands `int`, result `bool`.
    Comparison,
    /// Both operands `bool`, result `bool`.
    Logical,
    /// Either operand a subtype of the other, result `bool`.
    Equality,
}

impl BinaryOp {
    /// Source spelling of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }

    /// The operand contract this operator follows.
    pub fn class(&self) -> OperatorClass {
        match self {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
                OperatorClass::Arithmetic
            }
            BinaryOp::Le | BinaryOp::Ge => OperatorClass::Comparison,
            BinaryOp::And | BinaryOp::Or => OperatorClass::Logical,
            BinaryOp::Eq => OperatorClass::Equality,
        }
    }

    /// Human-readable name used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            BinaryOp::Or => "or",
            BinaryOp::And => "and",
            BinaryOp::Eq => "equal",
            BinaryOp::Le => "less-equal",
            BinaryOp::Ge => "greater-equal",
            BinaryOp::Add => "sum",
            BinaryOp::Sub => "minus",
            BinaryOp::Mul => "multiplication",
            BinaryOp::Div => "division",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
