//! Lumen Core - filter graph engine for frame processing pipelines
//!
//! This crate provides the engine that runs image transformations over
//! streamed frames: a directed acyclic graph of filter nodes, composite groups
//! that present a subgraph as one node, reference-counted ownership with
//! deterministic teardown, and depth-first synchronous frame propagation.
//!
//! # Core Abstractions
//!
//! ## Frames
//!
//! - [`Frame`] - Reference-counted, copy-on-write frame handle
//! - [`FrameBuffer`] - Owned pixel storage with a readiness flag
//! - [`FrameDescriptor`] / [`PixelFormat`] - Size and layout
//! - [`FramePool`] - Buffer recycling between frames
//!
//! ## Filters
//!
//! - [`Filter`] - Object-safe trait for leaf transformations
//! - [`ParameterInfo`] / [`ParamDescriptor`] - Runtime parameter introspection
//! - [`FilterWithParams`] - Both of the above behind one vtable
//!
//! ## Graph
//!
//! - [`FilterGraph`] - Node arena, wiring, lifecycle, propagation
//! - [`GroupBuilder`] - Atomic construction of composite groups
//! - [`PushReport`] - Invocation trace and sink outputs of one pushed frame
//! - [`GraphError`] - Structural and runtime errors
//!
//! # no_std Support
//!
//! The engine is `no_std` compatible with `alloc`. Disable the default `std`
//! feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! lumen-core = { version = "0.1", default-features = false }
//! ```
//!
//! Enable the `tracing` feature to get `debug!` events for every structural
//! change (`graph_add`, `graph_wire`, `graph_free`, `group_build`, ...).

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod filter;
pub mod filter_with_params;
pub mod frame;
pub mod graph;
pub mod param_info;

// Re-export main types at crate root
pub use filter::{Filter, FilterError, ProcessContext};
pub use filter_with_params::FilterWithParams;
pub use frame::{Frame, FrameBuffer, FrameDescriptor, PixelFormat};
pub use graph::{
    DEFAULT_POOL_CAPACITY, FilterGraph, FramePool, GraphError, GroupBuilder, MemberFactory,
    MemberRef, NodeId, NodeState, PushReport, SinkOutput, Wiring,
};
pub use param_info::{ParamDescriptor, ParamId, ParamUnit, ParameterInfo};
