//! Graph node types for the filter graph engine.
//!
//! Each node in the arena has a [`NodeId`], a [`NodeState`] and a kind: a leaf
//! wrapping a filter, or a composite group packaging a subgraph. The
//! `NodeData` struct bundles the kind with the bookkeeping the engine needs:
//! the ordered target list, the reverse source lookup, and the reference count.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};

use crate::filter_with_params::FilterWithParams;

/// Unique identifier for a node in the filter graph.
///
/// Node IDs are assigned sequentially and never reused within a graph instance,
/// so a stale ID of a freed node reports [`NodeNotFound`](super::GraphError::NodeNotFound)
/// instead of aliasing a newer node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for NodeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Lifecycle state of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeState {
    /// Allocated but not yet initialized; cannot receive frames.
    Allocated,
    /// Initialized and able to receive frames.
    Ready,
    /// Initialization failed; the node never receives frames.
    Failed,
}

/// A group parameter that forwards to a member's parameter.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ExposedParam {
    pub member: NodeId,
    pub index: usize,
    pub name: &'static str,
    pub short_name: &'static str,
    pub string_id: &'static str,
}

/// Topology of a composite group.
pub(crate) struct GroupData {
    pub name: &'static str,
    /// Members in acquisition order. Each entry holds one reference.
    pub members: Vec<NodeId>,
    /// Member that receives frames injected into the group.
    pub entry: NodeId,
    /// Member whose targets are the group's targets. `None` = incomplete.
    pub terminal: Option<NodeId>,
    pub exposed: Vec<ExposedParam>,
}

/// The closed set of node variants.
pub(crate) enum NodeKind {
    /// Wraps a leaf filter.
    Leaf(Box<dyn FilterWithParams + Send>),
    /// Packages a subgraph behind an entry and a terminal member.
    Group(GroupData),
}

/// Internal bookkeeping for a node in the arena.
pub(crate) struct NodeData {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Downstream nodes in fan-out order. Duplicates are separate edges.
    pub targets: Vec<NodeId>,
    /// Producers with an edge into this node, one entry per edge.
    pub sources: Vec<NodeId>,
    /// Holders of this node: its creator, each incoming edge, each group
    /// membership, and every explicit `retain`.
    pub ref_count: u32,
    pub state: NodeState,
}

impl NodeData {
    /// Creates a node with a single reference.
    pub fn new(id: NodeId, kind: NodeKind, state: NodeState) -> Self {
        Self {
            id,
            kind,
            targets: Vec::new(),
            sources: Vec::new(),
            ref_count: 1,
            state,
        }
    }

    /// Type name of the filter, or the group's name.
    pub fn name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Leaf(filter) => filter.name(),
            NodeKind::Group(group) => group.name,
        }
    }
}

/// Removes the first occurrence of `id` from `list`. Returns whether one was found.
pub(crate) fn remove_first(list: &mut Vec<NodeId>, id: NodeId) -> bool {
    if let Some(pos) = list.iter().position(|&n| n == id) {
        list.remove(pos);
        true
    } else {
        false
    }
}
