use fnv::FnvHashMap;

use crate::error::FpError;
use crate::item::Rank;

/// Stable index of a node in the tree's arena. Parents are always allocated
/// before their children, so a parent id is strictly smaller than any of its
/// descendants' ids.
pub(crate) type NodeId = usize;

/// The arena slot of the root node.
pub(crate) const ROOT: NodeId = 0;

/// One position in the prefix tree.
///
/// A node takes part in two link structures at once: the parent/child tree,
/// and the per-item sibling chain threaded through every node carrying the
/// same rank. Both use arena indices.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    /// `None` only for the root.
    pub(crate) item: Option<Rank>,
    /// `None` only for the root.
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: FnvHashMap<Rank, NodeId>,
    /// Number of transactions whose sorted prefix passes through this node.
    pub(crate) count: u32,
    /// Portion of `count` already attributed to a conditional pattern base
    /// during the current extraction. Never exceeds `count`.
    pub(crate) read: u32,
    /// Next node with the same rank, in creation order.
    pub(crate) next: Option<NodeId>,
}

impl Node {
    pub(crate) fn new_root() -> Node {
        Node {
            item: None,
            parent: None,
            children: FnvHashMap::default(),
            count: 0,
            read: 0,
            next: None,
        }
    }

    pub(crate) fn new_child(item: Rank, parent: NodeId) -> Node {
        Node {
            item: Some(item),
            parent: Some(parent),
            children: FnvHashMap::default(),
            count: 1,
            read: 0,
            next: None,
        }
    }

    pub(crate) fn bump(&mut self) {
        self.count += 1;
    }

    /// The transaction weight not yet attributed during this extraction.
    pub(crate) fn adjusted(&self) -> u32 {
        self.count - self.read
    }

    /// Attributes `by` more transactions' worth of this node's weight.
    /// Exceeding the traversal count means the structure is corrupt.
    pub(crate) fn add_read(&mut self, by: u32) -> Result<(), FpError> {
        let read = self.read + by;
        if read > self.count {
            return Err(FpError::AccountingViolation(format!(
                "read count {} would exceed traversal count {}",
                read, self.count
            )));
        }
        self.read = read;
        Ok(())
    }

    pub(crate) fn clear_read(&mut self) {
        self.read = 0;
    }
}
