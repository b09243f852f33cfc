//! Stable ID newtypes for network entities.
//!
//! [`NodeId`] addresses a node slot in the graph arena; [`VariableId`] names
//! the underlying random variable in the flat exported form. Both are
//! distinct newtype wrappers over `u32` so one cannot stand in for the other.

use std::fmt;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

/// Arena handle for a node. Maps to a petgraph `NodeIndex<u32>`.
///
/// Slots freed by node deletion may be reused by later insertions, so a
/// `NodeId` must not be held across the deletion of the node it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Identity of a variable inside a flat model.
///
/// Function descriptors list their dependencies by `VariableId`, which is
/// how the import pass matches a function to its variable and its parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariableId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Bridge between NodeId and petgraph's NodeIndex<u32>.

impl From<NodeIndex<u32>> for NodeId {
    fn from(idx: NodeIndex<u32>) -> Self {
        NodeId(idx.index() as u32)
    }
}

impl From<NodeId> for NodeIndex<u32> {
    fn from(id: NodeId) -> Self {
        NodeIndex::new(id.0 as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_to_node_index_roundtrip() {
        let idx = NodeIndex::<u32>::new(42);
        let node_id = NodeId::from(idx);
        assert_eq!(node_id.0, 42);

        let back: NodeIndex<u32> = node_id.into();
        assert_eq!(back.index(), 42);
    }

    #[test]
    fn display_prints_inner_value() {
        assert_eq!(format!("{}", NodeId(7)), "7");
        assert_eq!(format!("{}", VariableId(99)), "99");
    }

    #[test]
    fn serde_roundtrip() {
        let var = VariableId(42);
        let json = serde_json::to_string(&var).unwrap();
        assert_eq!(json, "42");
        let back: VariableId = serde_json::from_str(&json).unwrap();
        assert_eq!(var, back);
    }
}
