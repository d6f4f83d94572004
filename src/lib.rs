//! FOOL compiler back end.
//!
//! This crate bundles the workspace crates behind one name:
//!
//! - [`core`]: spans, node ids, types, symbol entries and errors
//! - [`ast`]: the syntax tree and its builder
//! - [`compiler`]: the passes, the assembly model and the [`Compiler`] driver
//!
//! # Example
//!
//! ```
//! use fool::prelude::*;
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let x = b.var("x", b.int_type(), b.int(5));
//! let program = b.let_in(&[], &[x], b.print(b.add(b.ident("x"), b.int(1))));
//!
//! let result = Compiler::new().compile(&program);
//! assert_eq!(result.program_type, Some(Type::Int));
//! assert!(result.assembly.is_some());
//! ```

pub use fool_ast as ast;
pub use fool_compiler as compiler;
pub use fool_core as core;

pub use fool_compiler::{
    Assembly, CompilationError, CompilationResult, Compiler, CompilerOptions, Instruction, Pass,
};

// Re-export main types
pub mod prelude {
    pub use bumpalo::Bump;
    pub use fool_ast::{AstBuilder, Program};
    pub use fool_compiler::{
        Assembly, CompilationResult, Compiler, CompilerOptions, Instruction, Label, Pass,
    };
    pub use fool_core::{CompilationError, ErrorCategory, Span, Type};
}
