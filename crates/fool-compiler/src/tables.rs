//! Side tables keyed by syntax tree node.
//!
//! The tree is immutable, so everything a pass learns about a node is kept
//! here instead: the entry a declaration produced, the entry a use site
//! resolved to, and so on. Each table is write-once per node.

use fool_core::{NodeId, SymbolEntry};
use rustc_hash::FxHashMap;

/// A write-once map from node to value.
#[derive(Debug, Clone)]
pub struct SideTable<T> {
    entries: FxHashMap<NodeId, T>,
}

impl<T> Default for SideTable<T> {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }
}

impl<T> SideTable<T> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` for `id`.
    ///
    /// The first value recorded for a node wins. A node shared between two
    /// places in the tree is visited twice and resolves the same way both
    /// times, so later writes are dropped.
    pub fn insert(&mut self, id: NodeId, value: T) {
        self.entries.entry(id).or_insert(value);
    }

    /// Value recorded for `id`, if any.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.entries.get(&id)
    }

    /// Whether a value was recorded for `id`.
    pub fn contains(&self, id: NodeId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all recorded values, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &T)> {
        self.entries.iter().map(|(id, value)| (*id, value))
    }
}

impl<T: PartialEq> PartialEq for SideTable<T> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

/// A resolved use site: the declaration's entry plus the nesting level the
/// name was used at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Use {
    /// Entry of the declaration the name resolved to.
    pub entry: SymbolEntry,
    /// Nesting level of the use site.
    pub nesting_level: u32,
}

impl Use {
    /// Number of static-chain hops from the use site to the declaring frame.
    pub fn hops(&self) -> u32 {
        self.nesting_level.saturating_sub(self.entry.nesting_level)
    }
}

/// Everything scope resolution attaches to the tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    /// Declaration node (variable, function, parameter, field, method,
    /// class) to the entry it produced.
    pub decls: SideTable<SymbolEntry>,
    /// Identifier and call node to the entry the name resolved to. For a
    /// qualified method call this is the receiver.
    pub uses: SideTable<Use>,
    /// Qualified method call node to the method's entry in the receiver
    /// class's virtual table.
    pub methods: SideTable<SymbolEntry>,
    /// `new` node to the name of the constructed class.
    pub classes: SideTable<String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }
}
