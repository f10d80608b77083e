//! Filter graph engine.
//!
//! [`FilterGraph`] owns every node in an arena and is the only way to touch
//! them: allocate, initialize, wire, push frames, release. Nodes come in two
//! variants behind one ID type:
//!
//! - **Leaf**: wraps a boxed [`Filter`](crate::Filter). Receives one frame at a
//!   time, produces zero or one frame, forwards it to every target.
//! - **Group**: packages a subgraph of members behind an entry (where frames go
//!   in) and a terminal (whose targets are the group's targets). Built
//!   atomically from a [`GroupBuilder`].
//!
//! # Ownership
//!
//! Each node has a reference count: one for the caller that allocated it, one
//! per incoming edge, one per group membership, one per
//! [`retain()`](FilterGraph::retain). Release walks down the ownership graph and
//! frees every node whose count reaches zero, children in reverse acquisition
//! order.
//!
//! # Acyclicity
//!
//! [`add_target()`](FilterGraph::add_target) refuses any edge whose target can
//! already reach its source, so frame propagation is a plain recursive call
//! tree with no runtime loop guard.
//!
//! # Example
//!
//! ```rust,ignore
//! use lumen_core::graph::FilterGraph;
//!
//! let mut graph = FilterGraph::new();
//! let gray = graph.create_filter(Box::new(Grayscale::new()))?;
//! let blur = graph.create_filter(Box::new(GaussianBlur::new()))?;
//! let invert = graph.create_filter(Box::new(Invert::new()))?;
//!
//! // gray -> blur -> invert
//! graph.wire(gray).add_target(blur)?.add_target(invert)?;
//!
//! let report = graph.push_frame(gray, frame)?;
//! let result = report.output_of(invert);
//! ```

pub mod error;
pub mod filter_graph;
pub mod group;
mod lifecycle;
pub mod node;
mod params;
pub mod pool;
mod propagate;
#[cfg(test)]
pub(crate) mod testing;

pub use error::GraphError;
pub use filter_graph::{FilterGraph, Wiring};
pub use group::{GroupBuilder, MemberFactory, MemberRef};
pub use node::{NodeId, NodeState};
pub use pool::{DEFAULT_POOL_CAPACITY, FramePool};
pub use propagate::{PushReport, SinkOutput};
