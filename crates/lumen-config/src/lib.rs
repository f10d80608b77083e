//! Pipeline configuration for lumen filter graphs.
//!
//! A pipeline file names a set of filter nodes, their parameters and the
//! edges between them. This crate loads, saves and validates such files and
//! turns them into a wired, ready [`FilterGraph`](lumen_core::FilterGraph).
//!
//! # Features
//!
//! - **Pipeline Files**: Load and save pipelines as TOML
//! - **Validation**: Check every node, edge and parameter, reporting all problems at once
//! - **Graph Construction**: Instantiate through the registry and wire with cycle checks
//! - **Paths**: Platform-specific user pipeline directory
//! - **Factory Pipelines**: Built-in pipelines for common edge-detection setups
//!
//! # Example
//!
//! ```rust
//! use lumen_config::{NodeConfig, Pipeline};
//! use lumen_core::{Frame, FrameBuffer, FrameDescriptor};
//! use lumen_registry::FilterRegistry;
//!
//! let pipeline = Pipeline::new("Negative edges")
//!     .with_node(
//!         NodeConfig::new("edges", "canny_edge_detection")
//!             .with_param("upper_threshold", "45%")
//!             .with_target("invert"),
//!     )
//!     .with_node(NodeConfig::new("invert", "invert"));
//!
//! let mut built = pipeline.build(&FilterRegistry::new()).unwrap();
//! let frame = Frame::new(FrameBuffer::new(FrameDescriptor::rgba(16, 16)));
//! let report = built.push(frame).unwrap();
//! assert_eq!(report.outputs.len(), 1);
//! ```

mod build;
mod error;
mod node_config;
mod pipeline;

/// Platform-specific paths for pipeline files.
pub mod paths;

/// Pipeline validation.
pub mod validation;

/// Factory pipelines bundled with the library.
pub mod factory_pipelines;

pub use build::BuiltPipeline;
pub use error::ConfigError;
pub use factory_pipelines::{
    FACTORY_PIPELINE_NAMES, factory_pipeline_names, factory_pipelines, get_factory_pipeline,
    is_factory_pipeline,
};
pub use node_config::{NodeConfig, parse_param_value};
pub use paths::{
    ensure_user_pipelines_dir, find_pipeline, list_user_pipelines, load_pipeline,
    pipeline_name_from_path, user_config_dir, user_pipelines_dir,
};
pub use pipeline::Pipeline;
pub use validation::{PipelineValidator, ValidationError, ValidationResult, validate_pipeline};

/// Re-export commonly used types from lumen-registry
pub use lumen_registry::{FilterCategory, FilterDescriptor, FilterKind, FilterRegistry};
