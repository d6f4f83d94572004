//! Fresh label allocation.

use crate::asm::Label;

/// Hands out unique labels for one code generation run.
///
/// Branch labels and routine entry labels are numbered independently.
#[derive(Debug, Default)]
pub struct LabelAllocator {
    branches: u32,
    functions: u32,
}

impl LabelAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh `label<N>`.
    pub fn branch(&mut self) -> Label {
        let label = Label::branch(self.branches);
        self.branches += 1;
        label
    }

    /// A fresh `function<N>`.
    pub fn function(&mut self) -> Label {
        let label = Label::function(self.functions);
        self.functions += 1;
        label
    }

    /// Number of routine labels handed out.
    pub fn function_count(&self) -> u32 {
        self.functions
    }
}
