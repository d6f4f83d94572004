//! FOOL syntax tree crate.
//!
//! This crate provides the tree every compiler pass consumes:
//! - AST node definitions for programs, declarations, classes and expressions
//! - [`AstBuilder`] for allocating trees in a `bumpalo` arena
//!
//! Nodes are immutable once built. Information computed by the passes is
//! kept in side tables keyed by each node's [`NodeId`](fool_core::NodeId).

pub mod ast;
mod builder;

pub use ast::*;
pub use builder::AstBuilder;
