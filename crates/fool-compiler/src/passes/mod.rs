//! Compiler passes.
//!
//! - [`resolution`]: Pass 1 - bind names, allocate offsets, build the class table
//! - [`type_check`]: Pass 2 - compute and check the type of every node
//! - [`codegen`]: Pass 3 - emit stack machine assembly

pub mod codegen;
pub mod resolution;
pub mod type_check;

pub use codegen::{CodegenOutput, CodegenPass};
pub use resolution::{ResolutionOutput, ResolutionPass};
pub use type_check::{TypeCheckOutput, TypeCheckPass};
