//! Core Filter trait and related types.
//!
//! The [`Filter`] trait is the contract between the graph engine and a leaf
//! transformation. The engine never looks inside a filter: it calls
//! [`init()`](Filter::init) once, then [`apply()`](Filter::apply) once per
//! delivered frame, and forwards whatever frame comes back.
//!
//! ## Design Decisions
//!
//! - **Zero-or-one output**: `apply` returns `Ok(None)` to drop a frame (for
//!   example a gate rejecting frames below a threshold). Targets are only
//!   invoked when a frame is produced.
//!
//! - **No graph access**: a filter receives a [`ProcessContext`], not the graph.
//!   Rewiring the graph from inside a transformation is therefore impossible
//!   rather than merely undefined.
//!
//! - **Object-safe**: the graph stores `Box<dyn FilterWithParams + Send>`
//!   (see [`FilterWithParams`](crate::FilterWithParams)).

#[cfg(not(feature = "std"))]
use alloc::string::String;

use crate::frame::{Frame, FrameBuffer, FrameDescriptor, PixelFormat};
use crate::graph::{FramePool, NodeId};

/// Errors reported by a leaf filter.
///
/// The graph wraps these as the source of
/// [`GraphError::InitFailure`](crate::GraphError::InitFailure) or
/// [`GraphError::ProcessingFailure`](crate::GraphError::ProcessingFailure).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FilterError {
    /// The input frame has a pixel layout this filter cannot read.
    #[error("{filter} cannot read {found} frames")]
    UnsupportedFormat {
        /// Filter that rejected the frame.
        filter: &'static str,
        /// Format of the rejected frame.
        found: PixelFormat,
    },

    /// The input frame is malformed for this filter (e.g., empty).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A resource the filter needs could not be obtained.
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// Any other failure.
    #[error("{0}")]
    Failed(String),
}

/// Per-invocation context handed to [`Filter::apply()`].
pub struct ProcessContext<'a> {
    node: NodeId,
    source: Option<NodeId>,
    pool: &'a mut FramePool,
}

impl<'a> ProcessContext<'a> {
    /// Creates a context for one invocation of `node`.
    pub fn new(node: NodeId, source: Option<NodeId>, pool: &'a mut FramePool) -> Self {
        Self { node, source, pool }
    }

    /// Creates a context for running a filter outside any graph.
    ///
    /// [`node()`](Self::node) then returns an ID that never names a live node.
    pub fn standalone(pool: &'a mut FramePool) -> Self {
        Self::new(NodeId(u32::MAX), None, pool)
    }

    /// The node being invoked.
    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The producer that delivered this frame, or `None` for an injected frame.
    ///
    /// Multi-input filters use this to tell their inputs apart.
    #[inline]
    pub fn source(&self) -> Option<NodeId> {
        self.source
    }

    /// Returns a zeroed, ready output buffer, reusing a pooled one when possible.
    pub fn output_buffer(&mut self, descriptor: FrameDescriptor) -> FrameBuffer {
        self.pool.acquire(descriptor)
    }
}

/// Core trait for all leaf filters.
///
/// # Example
///
/// ```rust
/// use lumen_core::{Filter, FilterError, Frame, ProcessContext};
///
/// struct Passthrough;
///
/// impl Filter for Passthrough {
///     fn name(&self) -> &'static str {
///         "passthrough"
///     }
///
///     fn apply(
///         &mut self,
///         input: &Frame,
///         _ctx: &mut ProcessContext<'_>,
///     ) -> Result<Option<Frame>, FilterError> {
///         Ok(Some(input.acquire()))
///     }
/// }
/// ```
pub trait Filter {
    /// Short type name used in logs and errors.
    fn name(&self) -> &'static str;

    /// One-time setup, called by the graph before the first frame.
    ///
    /// A failure is terminal for the node: it moves to
    /// [`NodeState::Failed`](crate::NodeState::Failed) and never receives frames.
    fn init(&mut self) -> Result<(), FilterError> {
        Ok(())
    }

    /// Transforms one input frame.
    ///
    /// Returns `Ok(Some(frame))` to forward a frame to every target,
    /// `Ok(None)` to drop it, or an error to abort this frame's traversal.
    fn apply(
        &mut self,
        input: &Frame,
        ctx: &mut ProcessContext<'_>,
    ) -> Result<Option<Frame>, FilterError>;

    /// Whether more than one distinct producer may target this filter.
    ///
    /// Defaults to `false`: a second producer is rejected at wiring time with
    /// [`GraphError::InputOccupied`](crate::GraphError::InputOccupied).
    fn accepts_multiple_inputs(&self) -> bool {
        false
    }

    /// Releases filter-owned resources. Called once, when the node is freed.
    fn teardown(&mut self) {}
}
