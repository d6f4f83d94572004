//! FOOL Compiler
//!
//! The back end of the FOOL compiler: it takes a syntax tree and produces
//! assembly for the FOOL stack machine.
//!
//! ## Architecture
//!
//! - **Pass 1 (Resolution)**: Bind every name, allocate offsets and build the class table
//! - **Pass 2 (Type checking)**: Check every declaration and expression
//! - **Pass 3 (Code generation)**: Emit instructions, routines out of line
//!
//! Each pass only runs if the previous one reported no errors.
//!
//! ## Modules
//!
//! - [`asm`]: Instruction set, code blocks and finished assembly
//! - [`class_table`]: Classes, their virtual tables and the class hierarchy
//! - [`emit`]: Instruction emitter and label allocation
//! - [`options`]: Compiler configuration
//! - [`passes`]: The three passes
//! - [`scope`]: Stack of scope frames used during resolution
//! - [`tables`]: Side tables keyed by node
//! - [`type_rels`]: Subtyping, overriding and common ancestors
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use fool_ast::AstBuilder;
//! use fool_compiler::Compiler;
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let program = b.program(b.print(b.add(b.int(1), b.int(2))));
//!
//! let result = Compiler::new().compile(&program);
//! assert!(result.is_success());
//! let text = result.assembly.map(|a| a.to_text()).unwrap_or_default();
//! assert_eq!(text, "push 1\npush 2\nadd\nprint\nhalt\n");
//! ```

pub mod asm;
pub mod class_table;
pub mod emit;
pub mod options;
pub mod passes;
pub mod scope;
pub mod tables;
pub mod type_rels;

use std::fmt;

pub use asm::{Assembly, CodeBlock, Instruction, Label, LabelKind, ParseInstructionError};
pub use class_table::{ClassHierarchy, ClassInfo, ClassTable, VirtualTable};
pub use emit::{Emitter, LabelAllocator};
pub use options::{CompilerOptions, DEFAULT_MEMORY_SIZE};
pub use passes::{
    CodegenOutput, CodegenPass, ResolutionOutput, ResolutionPass, TypeCheckOutput, TypeCheckPass,
};
pub use scope::{Frame, ScopeStack};
pub use tables::{Bindings, SideTable, Use};
pub use type_rels::{is_subtype, is_valid_override, lowest_common_ancestor};

// Re-export CompilationError from core for convenience
pub use fool_core::CompilationError;

use fool_ast::Program;
use fool_core::Type;
use tracing::{debug, info_span};

/// A compiler pass, as reported by [`CompilationResult::failed_pass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Resolution,
    TypeCheck,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Pass::Resolution => "scope resolution",
            Pass::TypeCheck => "type checking",
        })
    }
}

/// Result of compilation.
#[derive(Debug)]
pub struct CompilationResult {
    /// The generated program, if every pass succeeded.
    pub assembly: Option<Assembly>,
    /// Type of the main expression, if type checking ran and succeeded on it.
    pub program_type: Option<Type>,
    /// What scope resolution attached to the tree.
    pub bindings: Bindings,
    /// Every declared class.
    pub class_table: ClassTable,
    /// Errors of the pass that failed.
    pub errors: Vec<CompilationError>,
    /// The pass that reported errors, if any.
    pub failed_pass: Option<Pass>,
}

impl CompilationResult {
    /// Check if compilation succeeded (no errors).
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

/// The main compiler entry point.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompilerOptions,
}

impl Compiler {
    /// A compiler with default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CompilerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile a program, stopping after the first pass that reports errors.
    pub fn compile(&self, program: &Program<'_>) -> CompilationResult {
        let _span = info_span!("compile", program = %program.id).entered();

        let resolved = ResolutionPass::new().run(program);
        if !resolved.is_success() {
            debug!(errors = resolved.error_count(), "stopping after scope resolution");
            return CompilationResult {
                assembly: None,
                program_type: None,
                bindings: resolved.bindings,
                class_table: resolved.class_table,
                errors: resolved.errors,
                failed_pass: Some(Pass::Resolution),
            };
        }

        let checked = TypeCheckPass::new(&resolved.bindings, &resolved.class_table).run(program);
        if !checked.is_success() {
            debug!(errors = checked.error_count(), "stopping after type checking");
            return CompilationResult {
                assembly: None,
                program_type: checked.program_type,
                bindings: resolved.bindings,
                class_table: resolved.class_table,
                errors: checked.errors,
                failed_pass: Some(Pass::TypeCheck),
            };
        }

        let generated =
            CodegenPass::new(&resolved.bindings, &resolved.class_table, &self.options).run(program);
        debug!(
            instructions = generated.instructions,
            routines = generated.routines,
            "compilation finished"
        );

        CompilationResult {
            assembly: Some(generated.assembly),
            program_type: checked.program_type,
            bindings: resolved.bindings,
            class_table: resolved.class_table,
            errors: Vec::new(),
            failed_pass: None,
        }
    }
}
