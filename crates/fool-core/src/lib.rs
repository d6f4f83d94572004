//! Shared vocabulary of the FOOL compiler back end.
//!
//! - [`span`]: source locations carried by every tree node
//! - [`ids`]: stable node identifiers used to key side tables
//! - [`types`]: the closed set of language types
//! - [`entry`]: symbol table entries (nesting level, type, offset)
//! - [`error`]: compilation errors and their categories

pub mod entry;
pub mod error;
pub mod ids;
pub mod span;
pub mod types;

pub use entry::SymbolEntry;
pub use error::{CompilationError, DeclKind, ErrorCategory, MemberKind, RefKind};
pub use ids::NodeId;
pub use span::Span;
pub use types::{ArrowType, ClassType, Type};
