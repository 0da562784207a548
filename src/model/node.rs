//! Node identifiers.

use serde::{Deserialize, Serialize};

/// Dense node identifier.
///
/// Ids are slot indices: a removed node leaves a tombstoned slot whose id
/// may later be handed out again by `insert_node`. In a region graph the id
/// of a node is the region label it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for NodeId {
    fn from(index: usize) -> Self {
        NodeId(index)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Directed node pair `(source, target)`.
pub type NodePair = (NodeId, NodeId);

/// Generation-checked reference to a node slot.
///
/// A plain [`NodeId`] cannot tell whether the slot it names was tombstoned
/// and reused in the meantime. A handle remembers the slot generation at the
/// time it was taken, so `AdjacencyGraph::is_handle_live` rejects it once the
/// node is gone, even if the same id is valid again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    pub id: NodeId,
    pub generation: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_order_and_display() {
        let a = NodeId::from(3);
        let b = NodeId(7);
        assert!(a < b);
        assert_eq!(a.index(), 3);
        assert_eq!(b.to_string(), "7");
    }

    #[test]
    fn test_node_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&NodeId(42)).unwrap();
        assert_eq!(json, "42");
        let back: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, NodeId(42));
    }
}
