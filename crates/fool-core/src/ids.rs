//! Stable identifiers for syntax tree nodes.
//!
//! The syntax tree is immutable once built. Every pass that needs to attach
//! information to a node (resolved entries, offsets, labels) does so in a
//! side table keyed by the node's [`NodeId`].

use std::fmt;

/// Identifies a single node of a syntax tree.
///
/// Identifiers are handed out densely, in creation order, by the tree
/// builder, so they can be used as arena indices.
///
/// # Example
///
/// ```
/// use fool_core::NodeId;
///
/// let id = NodeId::new(3);
/// assert_eq!(id.index(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Create a node ID with the given index.
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the underlying index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node_{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(index: u32) -> Self {
        Self::new(index)
    }
}

impl From<NodeId> for u32 {
    fn from(id: NodeId) -> Self {
        id.0
    }
}
