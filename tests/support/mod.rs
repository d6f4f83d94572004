//! Test support for the pipeline tests: compile a tree, run the result.

pub mod svm;

use fool::prelude::*;

pub use svm::StackVm;

/// Compile `program`, failing the test if any pass reports errors.
pub fn compile(program: &Program<'_>) -> Assembly {
    let result = Compiler::new().compile(program);
    assert!(
        result.is_success(),
        "compilation failed in {:?}: {:?}",
        result.failed_pass,
        result.errors
    );
    result.assembly.expect("successful compilation produces assembly")
}

/// Compile and run `program`, returning everything it printed.
pub fn run(program: &Program<'_>) -> Vec<i32> {
    let assembly = compile(program);
    StackVm::new(&assembly, fool::compiler::DEFAULT_MEMORY_SIZE)
        .run()
        .unwrap_or_else(|err| panic!("machine error: {err:?}\n{assembly}"))
}
