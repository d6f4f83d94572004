//! Expression nodes.
//!
//! Provides nodes for all expression kinds:
//! - Literals (integers, booleans, `null`)
//! - Identifier references
//! - Binary operations (arithmetic, comparison, logical, equality)
//! - Logical negation
//! - Conditionals and `print`
//! - Function calls, qualified method calls and object construction

use fool_core::{NodeId, Span};

use crate::ast::{BinaryOp, Ident};

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// Integer literal
    Int(IntLit),
    /// Boolean literal
    Bool(BoolLit),
    /// `null`
    Null(NullLit),
    /// Identifier reference
    Ident(IdentExpr<'ast>),
    /// Binary operation
    Binary(&'ast BinaryExpr<'ast>),
    /// `!e`
    Not(&'ast NotExpr<'ast>),
    /// `if c then { t } else { e }`
    If(&'ast IfExpr<'ast>),
    /// `print(e)`
    Print(&'ast PrintExpr<'ast>),
    /// `f(args)`
    Call(&'ast CallExpr<'ast>),
    /// `obj.m(args)`
    MethodCall(&'ast MethodCallExpr<'ast>),
    /// `new C(args)`
    New(&'ast NewExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Get the node identifier of this expression.
    pub fn id(&self) -> NodeId {
        match self {
            Self::Int(e) => e.id,
            Self::Bool(e) => e.id,
            Self::Null(e) => e.id,
            Self::Ident(e) => e.id,
            Self::Binary(e) => e.id,
            Self::Not(e) => e.id,
            Self::If(e) => e.id,
            Self::Print(e) => e.id,
            Self::Call(e) => e.id,
            Self::MethodCall(e) => e.id,
            Self::New(e) => e.id,
        }
    }

    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Int(e) => e.span,
            Self::Bool(e) => e.span,
            Self::Null(e) => e.span,
            Self::Ident(e) => e.span,
            Self::Binary(e) => e.span,
            Self::Not(e) => e.span,
            Self::If(e) => e.span,
            Self::Print(e) => e.span,
            Self::Call(e) => e.span,
            Self::MethodCall(e) => e.span,
            Self::New(e) => e.span,
        }
    }
}

/// An integer literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntLit {
    pub id: NodeId,
    pub value: i32,
    pub span: Span,
}

/// A boolean literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoolLit {
    pub id: NodeId,
    pub value: bool,
    pub span: Span,
}

/// The `null` literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NullLit {
    pub id: NodeId,
    pub span: Span,
}

/// An identifier expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentExpr<'ast> {
    /// Node identifier
    pub id: NodeId,
    /// The referenced name
    pub name: &'ast str,
    /// Source location
    pub span: Span,
}

/// A binary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    /// Node identifier
    pub id: NodeId,
    /// Left operand
    pub left: &'ast Expr<'ast>,
    /// Operator
    pub op: BinaryOp,
    /// Right operand
    pub right: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// Logical negation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotExpr<'ast> {
    pub id: NodeId,
    pub operand: &'ast Expr<'ast>,
    pub span: Span,
}

/// A conditional expression; both branches are mandatory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfExpr<'ast> {
    /// Node identifier
    pub id: NodeId,
    /// Guard
    pub condition: &'ast Expr<'ast>,
    /// Value when the guard holds
    pub then_branch: &'ast Expr<'ast>,
    /// Value otherwise
    pub else_branch: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// Print the value of an expression, which is also the result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintExpr<'ast> {
    pub id: NodeId,
    pub value: &'ast Expr<'ast>,
    pub span: Span,
}

/// A call of a function, or of a method of the enclosing class, by name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallExpr<'ast> {
    /// Node identifier
    pub id: NodeId,
    /// Called name
    pub callee: Ident<'ast>,
    /// Arguments, in source order
    pub args: &'ast [Expr<'ast>],
    /// Source location
    pub span: Span,
}

/// A late-bound method call on a named object: `receiver.method(args)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodCallExpr<'ast> {
    /// Node identifier
    pub id: NodeId,
    /// Variable holding the receiving object
    pub receiver: Ident<'ast>,
    /// Method name
    pub method: Ident<'ast>,
    /// Arguments, in source order
    pub args: &'ast [Expr<'ast>],
    /// Source location
    pub span: Span,
}

/// Object construction: `new Class(args)`, one argument per field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewExpr<'ast> {
    /// Node identifier
    pub id: NodeId,
    /// Class name
    pub class: Ident<'ast>,
    /// Field values, in field order
    pub args: &'ast [Expr<'ast>],
    /// Source location
    pub span: Span,
}
