//! Type annotation nodes.

use fool_core::{NodeId, Span};

/// A type annotation as written in source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeExpr<'ast> {
    /// Node identifier
    pub id: NodeId,
    /// The annotated type
    pub kind: TypeExprKind<'ast>,
    /// Source location
    pub span: Span,
}

/// The kind of type annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeExprKind<'ast> {
    /// `int`
    Int,
    /// `bool`
    Bool,
    /// A class name, denoting a reference to an object of that class
    Class(&'ast str),
}
