//! Abstract Syntax Tree (AST) for FOOL.
//!
//! All nodes borrow from an arena allocator and remain valid for the
//! lifetime of the arena. Every node carries a [`NodeId`] that the compiler
//! passes use to key their side tables, and a [`Span`] whose line is used in
//! diagnostics.
//!
//! Trees are normally built with [`AstBuilder`](crate::AstBuilder).

pub mod decl;
pub mod expr;
pub mod ops;
pub mod types;

pub use decl::*;
pub use expr::*;
pub use ops::*;
pub use types::*;

use fool_core::{NodeId, Span};

/// A name as written in source, with its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident<'ast> {
    pub name: &'ast str,
    pub span: Span,
}

impl<'ast> Ident<'ast> {
    /// Create a new identifier.
    pub fn new(name: &'ast str, span: Span) -> Self {
        Self { name, span }
    }
}

/// A complete program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Program<'ast> {
    /// Node identifier
    pub id: NodeId,
    /// Program shape
    pub kind: ProgramKind<'ast>,
    /// Source location
    pub span: Span,
}

/// The two program shapes: `let ... in e` or a bare expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgramKind<'ast> {
    /// `let <classes> <decls> in <body>`
    LetIn {
        classes: &'ast [ClassDecl<'ast>],
        decls: &'ast [Decl<'ast>],
        body: &'ast Expr<'ast>,
    },
    /// A single expression.
    Expr(&'ast Expr<'ast>),
}

impl<'ast> Program<'ast> {
    /// Class declarations of this program (empty for a bare expression).
    pub fn classes(&self) -> &'ast [ClassDecl<'ast>] {
        match self.kind {
            ProgramKind::LetIn { classes, .. } => classes,
            ProgramKind::Expr(_) => &[],
        }
    }

    /// Top-level declarations of this program (empty for a bare expression).
    pub fn decls(&self) -> &'ast [Decl<'ast>] {
        match self.kind {
            ProgramKind::LetIn { decls, .. } => decls,
            ProgramKind::Expr(_) => &[],
        }
    }

    /// The main expression.
    pub fn body(&self) -> &'ast Expr<'ast> {
        match self.kind {
            ProgramKind::LetIn { body, .. } => body,
            ProgramKind::Expr(body) => body,
        }
    }
}
