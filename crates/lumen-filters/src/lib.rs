//! Lumen Filters - CPU image filter implementations
//!
//! This crate provides the leaf filters that plug into a
//! [`FilterGraph`](lumen_core::FilterGraph) and the composite groups built
//! from them:
//!
//! - [`Grayscale`] - RGBA to luminance
//! - [`GaussianBlur`] - Separable single-component Gaussian blur
//! - [`DirectionalSobel`] - Gradient magnitude plus snapped direction
//! - [`DirectionalNonMaximumSuppression`] - Edge thinning with a soft threshold
//! - [`WeakPixelInclusion`] - Hysteresis: keep weak edges touching strong ones
//! - [`Invert`] - Colour inversion
//! - [`LuminanceGate`] - Drops frames darker than a threshold
//! - [`canny_edge_detection()`] - The five stages above as one group
//!
//! Every filter works on `f32` samples in `[0, 1]` and reads neighbours with
//! clamp-to-edge addressing.
//!
//! ## Example
//!
//! ```rust
//! use lumen_core::{FilterGraph, Frame, FrameBuffer, FrameDescriptor};
//! use lumen_filters::{Invert, canny_edge_detection};
//!
//! let mut graph = FilterGraph::new();
//! let edges = graph.build_group(canny_edge_detection()).unwrap();
//! let invert = graph.create_filter(Box::new(Invert::new())).unwrap();
//! graph.add_target(edges, invert).unwrap();
//!
//! let frame = Frame::new(FrameBuffer::new(FrameDescriptor::rgba(16, 16)));
//! let report = graph.push_frame(edges, frame).unwrap();
//! assert!(report.output_of(invert).is_some());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod canny;
pub mod gaussian_blur;
pub mod grayscale;
pub mod invert;
pub mod kernel;
pub mod luminance_gate;
pub mod non_max_suppression;
pub mod sobel;
pub mod weak_pixel;

// Re-export main types at crate root
pub use canny::{CANNY_GROUP_NAME, canny_edge_detection};
pub use gaussian_blur::GaussianBlur;
pub use grayscale::Grayscale;
pub use invert::Invert;
pub use luminance_gate::LuminanceGate;
pub use non_max_suppression::DirectionalNonMaximumSuppression;
pub use sobel::DirectionalSobel;
pub use weak_pixel::WeakPixelInclusion;
