//! Filter registry and factory for lumen image filters.
//!
//! This crate provides a centralized registry for discovering and
//! instantiating filters by ID. Leaf filters and composite groups are
//! registered side by side, so callers building graphs from text (pipeline
//! files, command lines) never need to know which kind they asked for.
//!
//! # Features
//!
//! - **Filter Discovery**: List all available filters with metadata
//! - **Factory Pattern**: Create filters by ID at runtime
//! - **Graph Instantiation**: Allocate and initialize leaves or groups in one call
//! - **Parameter Info**: Access parameter descriptors without building a graph
//!
//! # Example
//!
//! ```rust
//! use lumen_core::FilterGraph;
//! use lumen_registry::{FilterCategory, FilterRegistry};
//!
//! let registry = FilterRegistry::new();
//!
//! for filter in registry.all_filters() {
//!     println!("{}: {}", filter.id, filter.description);
//! }
//!
//! // Leaves and composites instantiate the same way.
//! let mut graph = FilterGraph::new();
//! let edges = registry.instantiate(&mut graph, "canny_edge_detection").unwrap();
//! let invert = registry.instantiate(&mut graph, "invert").unwrap();
//! graph.add_target(edges, invert).unwrap();
//!
//! for filter in registry.filters_in_category(FilterCategory::EdgeDetection) {
//!     println!("edge filter: {}", filter.name);
//! }
//! ```
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! lumen-registry = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, string::String, string::ToString, vec::Vec};

use lumen_core::{FilterGraph, FilterWithParams, GraphError, GroupBuilder, NodeId, ParamDescriptor};
use lumen_filters::{
    DirectionalNonMaximumSuppression, DirectionalSobel, GaussianBlur, Grayscale, Invert,
    LuminanceGate, WeakPixelInclusion, canny_edge_detection,
};

/// Category of image filter for organization and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterCategory {
    /// Colour-space conversions and per-pixel colour operations
    Color,
    /// Smoothing and blurring
    Blur,
    /// Gradient, suppression and edge-map stages
    EdgeDetection,
    /// Frame gating and other flow control
    Utility,
}

impl FilterCategory {
    /// Returns a human-readable name for the category.
    pub const fn name(&self) -> &'static str {
        match self {
            FilterCategory::Color => "Color",
            FilterCategory::Blur => "Blur",
            FilterCategory::EdgeDetection => "Edge Detection",
            FilterCategory::Utility => "Utility",
        }
    }

    /// Returns a description of the category.
    pub const fn description(&self) -> &'static str {
        match self {
            FilterCategory::Color => "Grayscale conversion, inversion and other colour operations",
            FilterCategory::Blur => "Gaussian and other smoothing filters",
            FilterCategory::EdgeDetection => "Edge detectors and their individual stages",
            FilterCategory::Utility => "Frame gates and flow-control filters",
        }
    }
}

/// Whether an entry instantiates as one node or as a composite group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// A single leaf node.
    Leaf,
    /// A group of member nodes presented as one.
    Composite,
}

/// Describes a filter in the registry.
#[derive(Debug, Clone)]
pub struct FilterDescriptor {
    /// Unique identifier for the filter (snake_case).
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Brief description of the filter.
    pub description: &'static str,
    /// Category for organization.
    pub category: FilterCategory,
    /// Leaf or composite.
    pub kind: FilterKind,
    /// Number of parameters the instantiated node publishes.
    pub param_count: usize,
}

/// Errors from [`FilterRegistry`] operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No filter is registered under this ID.
    #[error("unknown filter: {0}")]
    UnknownFilter(String),

    /// The graph rejected the new node.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

type LeafFactory = fn() -> Box<dyn FilterWithParams + Send>;
type CompositeFactory = fn() -> GroupBuilder;

enum Factory {
    Leaf(LeafFactory),
    Composite(CompositeFactory),
}

/// Internal entry in the registry.
struct RegistryEntry {
    descriptor: FilterDescriptor,
    factory: Factory,
}

/// Registry of all available filters.
///
/// All built-in filters are registered by [`new()`](Self::new).
pub struct FilterRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterRegistry {
    /// Create a new registry with all built-in filters registered.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::with_capacity(8),
        };
        registry.register_builtin_filters();
        registry
    }

    fn register_builtin_filters(&mut self) {
        self.register_leaf(
            FilterDescriptor {
                id: "grayscale",
                name: "Grayscale",
                description: "RGBA to luminance using Rec. 709 weights",
                category: FilterCategory::Color,
                kind: FilterKind::Leaf,
                param_count: 0,
            },
            || Box::new(Grayscale::new()),
        );

        self.register_leaf(
            FilterDescriptor {
                id: "invert",
                name: "Invert",
                description: "Colour inversion, alpha preserved",
                category: FilterCategory::Color,
                kind: FilterKind::Leaf,
                param_count: 0,
            },
            || Box::new(Invert::new()),
        );

        self.register_leaf(
            FilterDescriptor {
                id: "gaussian_blur",
                name: "Gaussian Blur",
                description: "Separable single-component Gaussian blur",
                category: FilterCategory::Blur,
                kind: FilterKind::Leaf,
                param_count: 2,
            },
            || Box::new(GaussianBlur::new()),
        );

        self.register_leaf(
            FilterDescriptor {
                id: "directional_sobel",
                name: "Directional Sobel",
                description: "Gradient magnitude with direction snapped to eight neighbours",
                category: FilterCategory::EdgeDetection,
                kind: FilterKind::Leaf,
                param_count: 1,
            },
            || Box::new(DirectionalSobel::new()),
        );

        self.register_leaf(
            FilterDescriptor {
                id: "directional_nms",
                name: "Non-Maximum Suppression",
                description: "Thins gradients to local maxima with a soft double threshold",
                category: FilterCategory::EdgeDetection,
                kind: FilterKind::Leaf,
                param_count: 2,
            },
            || Box::new(DirectionalNonMaximumSuppression::new()),
        );

        self.register_leaf(
            FilterDescriptor {
                id: "weak_pixel_inclusion",
                name: "Weak Pixel Inclusion",
                description: "Keeps weak edge pixels adjacent to strong ones",
                category: FilterCategory::EdgeDetection,
                kind: FilterKind::Leaf,
                param_count: 0,
            },
            || Box::new(WeakPixelInclusion::new()),
        );

        self.register_leaf(
            FilterDescriptor {
                id: "luminance_gate",
                name: "Luminance Gate",
                description: "Drops frames whose mean luminance is below a threshold",
                category: FilterCategory::Utility,
                kind: FilterKind::Leaf,
                param_count: 1,
            },
            || Box::new(LuminanceGate::new()),
        );

        self.register_composite(
            FilterDescriptor {
                id: "canny_edge_detection",
                name: "Canny Edge Detection",
                description: "Grayscale, blur, Sobel, suppression and hysteresis as one group",
                category: FilterCategory::EdgeDetection,
                kind: FilterKind::Composite,
                param_count: 5,
            },
            canny_edge_detection,
        );
    }

    fn register_leaf(&mut self, descriptor: FilterDescriptor, factory: LeafFactory) {
        self.entries.push(RegistryEntry {
            descriptor,
            factory: Factory::Leaf(factory),
        });
    }

    fn register_composite(&mut self, descriptor: FilterDescriptor, factory: CompositeFactory) {
        self.entries.push(RegistryEntry {
            descriptor,
            factory: Factory::Composite(factory),
        });
    }

    fn entry(&self, id: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.descriptor.id == id)
    }

    /// Returns descriptors for all registered filters.
    pub fn all_filters(&self) -> Vec<&FilterDescriptor> {
        self.entries.iter().map(|e| &e.descriptor).collect()
    }

    /// Returns descriptors for filters in a specific category.
    pub fn filters_in_category(&self, category: FilterCategory) -> Vec<&FilterDescriptor> {
        self.entries
            .iter()
            .filter(|e| e.descriptor.category == category)
            .map(|e| &e.descriptor)
            .collect()
    }

    /// Get a descriptor by filter ID.
    pub fn get(&self, id: &str) -> Option<&FilterDescriptor> {
        self.entry(id).map(|e| &e.descriptor)
    }

    /// Create a leaf filter instance by ID.
    ///
    /// Returns `None` for unknown IDs and for composites, which only exist
    /// inside a graph; use [`instantiate()`](Self::instantiate) for those.
    pub fn create(&self, id: &str) -> Option<Box<dyn FilterWithParams + Send>> {
        match self.entry(id)?.factory {
            Factory::Leaf(factory) => Some(factory()),
            Factory::Composite(_) => None,
        }
    }

    /// Returns a fresh builder for a composite filter.
    pub fn group_builder(&self, id: &str) -> Option<GroupBuilder> {
        match self.entry(id)?.factory {
            Factory::Composite(factory) => Some(factory()),
            Factory::Leaf(_) => None,
        }
    }

    /// Allocates and initializes filter `id` in `graph`.
    ///
    /// Leaves go through [`FilterGraph::create_filter()`], composites through
    /// [`FilterGraph::build_group()`]. Either way the returned node is `Ready`
    /// and the caller holds its one reference; on error nothing is left in
    /// the graph.
    pub fn instantiate(&self, graph: &mut FilterGraph, id: &str) -> Result<NodeId, RegistryError> {
        let entry = self
            .entry(id)
            .ok_or_else(|| RegistryError::UnknownFilter(id.to_string()))?;
        let node = match entry.factory {
            Factory::Leaf(factory) => graph.create_filter(factory())?,
            Factory::Composite(factory) => graph.build_group(factory())?,
        };
        Ok(node)
    }

    /// Parameter descriptors of filter `id`, in index order.
    ///
    /// Composites report their exposed parameters. Builds a throwaway
    /// instance to read them.
    pub fn params(&self, id: &str) -> Result<Vec<ParamDescriptor>, RegistryError> {
        let entry = self
            .entry(id)
            .ok_or_else(|| RegistryError::UnknownFilter(id.to_string()))?;
        match entry.factory {
            Factory::Leaf(factory) => {
                let filter = factory();
                Ok((0..filter.filter_param_count())
                    .filter_map(|i| filter.filter_param_info(i))
                    .collect())
            }
            Factory::Composite(_) => {
                let mut graph = FilterGraph::new();
                let node = self.instantiate(&mut graph, id)?;
                Ok(graph.params(node)?)
            }
        }
    }

    /// Find a parameter index by name for a given filter type.
    ///
    /// Matches the full name, short name or string ID, case-insensitively.
    /// Returns `None` if the filter or parameter is not found.
    pub fn param_index_by_name(&self, filter_id: &str, param_name: &str) -> Option<usize> {
        self.params(filter_id)
            .ok()?
            .iter()
            .position(|desc| desc.matches(param_name))
    }

    /// Returns the number of registered filters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no filters are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{Filter, Frame, FrameBuffer, FrameDescriptor, NodeState};

    #[test]
    fn test_registry_creation() {
        let registry = FilterRegistry::new();
        assert_eq!(registry.len(), 8);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_get_filter() {
        let registry = FilterRegistry::new();

        let blur = registry.get("gaussian_blur").unwrap();
        assert_eq!(blur.name, "Gaussian Blur");
        assert_eq!(blur.category, FilterCategory::Blur);
        assert_eq!(blur.kind, FilterKind::Leaf);

        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_filters_by_category() {
        let registry = FilterRegistry::new();
        assert_eq!(registry.filters_in_category(FilterCategory::Color).len(), 2);
        assert_eq!(registry.filters_in_category(FilterCategory::Blur).len(), 1);
        assert_eq!(
            registry
                .filters_in_category(FilterCategory::EdgeDetection)
                .len(),
            4
        );
        assert_eq!(registry.filters_in_category(FilterCategory::Utility).len(), 1);
    }

    #[test]
    fn test_create_leaf_only() {
        let registry = FilterRegistry::new();
        let sobel = registry.create("directional_sobel").unwrap();
        assert_eq!(sobel.name(), "directional_sobel");
        assert!(registry.create("canny_edge_detection").is_none());
        assert!(registry.group_builder("canny_edge_detection").is_some());
        assert!(registry.group_builder("invert").is_none());
    }

    #[test]
    fn test_descriptor_param_counts_match_instances() {
        let registry = FilterRegistry::new();
        for descriptor in registry.all_filters() {
            let params = registry.params(descriptor.id).unwrap();
            assert_eq!(
                params.len(),
                descriptor.param_count,
                "param count mismatch for {}",
                descriptor.id
            );
        }
    }

    #[test]
    fn test_all_filters_instantiate_ready() {
        let registry = FilterRegistry::new();
        let mut graph = FilterGraph::new();
        for descriptor in registry.all_filters() {
            let node = registry.instantiate(&mut graph, descriptor.id).unwrap();
            assert_eq!(graph.state(node), Some(NodeState::Ready), "{}", descriptor.id);
            assert_eq!(
                graph.is_group(node),
                descriptor.kind == FilterKind::Composite
            );
        }
    }

    #[test]
    fn test_instantiated_filters_process_frames() {
        let registry = FilterRegistry::new();
        for descriptor in registry.all_filters() {
            let mut graph = FilterGraph::new();
            let node = registry.instantiate(&mut graph, descriptor.id).unwrap();
            let mut buffer = FrameBuffer::new(FrameDescriptor::rgba(8, 8));
            buffer.fill(0.5);
            let result = graph.push_frame(node, Frame::new(buffer));
            // A uniform RGBA frame is valid input for every stage.
            assert!(result.is_ok(), "{} failed: {:?}", descriptor.id, result.err());
        }
    }

    #[test]
    fn test_unknown_filter_is_an_error() {
        let registry = FilterRegistry::new();
        let mut graph = FilterGraph::new();
        assert!(matches!(
            registry.instantiate(&mut graph, "sharpen"),
            Err(RegistryError::UnknownFilter(id)) if id == "sharpen"
        ));
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn test_param_index_by_name() {
        let registry = FilterRegistry::new();
        assert_eq!(registry.param_index_by_name("gaussian_blur", "sigma"), Some(1));
        assert_eq!(
            registry.param_index_by_name("canny_edge_detection", "lower_threshold"),
            Some(4)
        );
        assert_eq!(
            registry.param_index_by_name("canny_edge_detection", "Upper Threshold"),
            Some(3)
        );
        assert_eq!(registry.param_index_by_name("invert", "amount"), None);
        assert_eq!(registry.param_index_by_name("nonexistent", "x"), None);
    }
}
