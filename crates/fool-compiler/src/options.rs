//! Compiler configuration.

/// Size of the target machine's memory, and therefore the address the
/// global frame starts at.
pub const DEFAULT_MEMORY_SIZE: i32 = 10000;

/// Options threaded through the compiler pipeline into code generation.
///
/// # Example
///
/// ```
/// use fool_compiler::CompilerOptions;
///
/// let options = CompilerOptions::new()
///     .with_memory_size(2048)
///     .with_line_table(false);
/// assert_eq!(options.memory_size, 2048);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Memory size of the target machine. The machine starts with its frame
    /// and stack pointers at this address, so it is also the base of the
    /// global frame.
    pub memory_size: i32,
    /// Keep the per-instruction source line table in the produced assembly.
    pub emit_line_table: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
            emit_line_table: true,
        }
    }
}

impl CompilerOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target machine's memory size.
    pub fn with_memory_size(mut self, memory_size: i32) -> Self {
        self.memory_size = memory_size;
        self
    }

    /// Keep or drop the source line table.
    pub fn with_line_table(mut self, emit: bool) -> Self {
        self.emit_line_table = emit;
        self
    }
}
