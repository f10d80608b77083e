//! Errors that can occur during graph operations.
//!
//! Structural errors (allocation, initialization, cycles, arity) are fatal to
//! the call that raised them and leave the topology exactly as it was before the
//! call. Runtime errors (`ProcessingFailure`, `FrameNotReady`, `NotInitialized`)
//! abort only the current frame's traversal; the graph stays usable.

#[cfg(not(feature = "std"))]
use alloc::string::String;

use crate::filter::FilterError;

use super::node::NodeId;

/// Errors that can occur during graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The specified node was not found in the graph.
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    /// A group member could not be constructed.
    #[error("group member #{index} could not be allocated: {source}")]
    AllocationFailure {
        /// Position of the member in the group builder.
        index: usize,
        /// Error reported by the member's factory.
        #[source]
        source: FilterError,
    },

    /// A node's `init` reported failure.
    #[error("node {node} ({name}) failed to initialize: {source}")]
    InitFailure {
        /// Node that failed.
        node: NodeId,
        /// Filter type name.
        name: &'static str,
        /// Error reported by the filter.
        #[source]
        source: FilterError,
    },

    /// Wiring would create a loop in the processing or ownership graph.
    #[error("wiring {from} -> {to} would create a cycle")]
    CycleDetected {
        /// Producer side of the rejected edge.
        from: NodeId,
        /// Consumer side of the rejected edge.
        to: NodeId,
    },

    /// A leaf transformation failed on a frame.
    #[error("node {node} ({name}) failed to process a frame: {source}")]
    ProcessingFailure {
        /// Node that failed.
        node: NodeId,
        /// Filter type name.
        name: &'static str,
        /// Error reported by the filter.
        #[source]
        source: FilterError,
    },

    /// A composite group has no terminal node designated.
    #[error("group {0} has no terminal node")]
    IncompleteGroup(NodeId),

    /// A frame was delivered to a node that is not `Ready`.
    #[error("node {0} is not initialized")]
    NotInitialized(NodeId),

    /// The target accepts a single producer and already has one.
    #[error("node {node} already has producer {producer} and accepts a single input")]
    InputOccupied {
        /// Node that rejected the edge.
        node: NodeId,
        /// Its existing producer.
        producer: NodeId,
    },

    /// The node is not a member of the group.
    #[error("node {member} is not a member of group {group}")]
    NotAMember {
        /// The group.
        group: NodeId,
        /// The node that was expected to be a member.
        member: NodeId,
    },

    /// The node is a leaf where a group was required.
    #[error("node {0} is not a group")]
    NotAGroup(NodeId),

    /// A group description is malformed.
    #[error("invalid group: {0}")]
    InvalidGroup(String),

    /// A frame reached a node before its producer signalled readiness.
    #[error("frame delivered to node {0} is not ready")]
    FrameNotReady(NodeId),

    /// A parameter index is out of range for the node.
    #[error("parameter #{index} out of range for node {node}")]
    ParamOutOfRange {
        /// Node queried.
        node: NodeId,
        /// Offending index.
        index: usize,
    },
}
