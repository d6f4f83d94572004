//! Declaration nodes.
//!
//! Provides nodes for:
//! - Variables and functions (any block)
//! - Parameters
//! - Classes, with their fields and methods (top level only)

use fool_core::{NodeId, Span};

use crate::ast::expr::Expr;
use crate::ast::types::TypeExpr;
use crate::ast::Ident;

/// A declaration inside a `let ... in` block or a function body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decl<'ast> {
    /// `var x: T = e;`
    Var(&'ast VarDecl<'ast>),
    /// `fun f: T (params) let ... in e;`
    Fun(&'ast FunDecl<'ast>),
}

impl<'ast> Decl<'ast> {
    /// Get the node identifier of this declaration.
    pub fn id(&self) -> NodeId {
        match self {
            Self::Var(d) => d.id,
            Self::Fun(d) => d.id,
        }
    }

    /// Get the declared name.
    pub fn name(&self) -> &'ast str {
        match self {
            Self::Var(d) => d.name.name,
            Self::Fun(d) => d.name.name,
        }
    }

    /// Get the span of this declaration.
    pub fn span(&self) -> Span {
        match self {
            Self::Var(d) => d.span,
            Self::Fun(d) => d.span,
        }
    }
}

/// A variable declaration with a mandatory initializer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarDecl<'ast> {
    pub id: NodeId,
    pub name: Ident<'ast>,
    pub ty: TypeExpr<'ast>,
    pub init: &'ast Expr<'ast>,
    pub span: Span,
}

/// A function declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunDecl<'ast> {
    /// Node identifier
    pub id: NodeId,
    /// Function name
    pub name: Ident<'ast>,
    /// Declared return type
    pub ret: TypeExpr<'ast>,
    /// Parameters
    pub params: &'ast [Param<'ast>],
    /// Local declarations
    pub decls: &'ast [Decl<'ast>],
    /// Body expression
    pub body: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A function or method parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Param<'ast> {
    pub id: NodeId,
    pub name: Ident<'ast>,
    pub ty: TypeExpr<'ast>,
    pub span: Span,
}

/// A class declaration.
///
/// The field list doubles as the constructor signature: `new C(a, b)`
/// supplies one value per field, inherited fields included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassDecl<'ast> {
    /// Node identifier
    pub id: NodeId,
    /// Class name
    pub name: Ident<'ast>,
    /// Optional superclass (`extends`)
    pub superclass: Option<Ident<'ast>>,
    /// Fields, in declaration order
    pub fields: &'ast [FieldDecl<'ast>],
    /// Methods, in declaration order
    pub methods: &'ast [MethodDecl<'ast>],
    /// Source location
    pub span: Span,
}

/// A class field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDecl<'ast> {
    pub id: NodeId,
    pub name: Ident<'ast>,
    pub ty: TypeExpr<'ast>,
    pub span: Span,
}

/// A class method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodDecl<'ast> {
    /// Node identifier
    pub id: NodeId,
    /// Method name
    pub name: Ident<'ast>,
    /// Declared return type
    pub ret: TypeExpr<'ast>,
    /// Parameters
    pub params: &'ast [Param<'ast>],
    /// Local declarations
    pub decls: &'ast [Decl<'ast>],
    /// Body expression
    pub body: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}
