//! Checks a [`Pipeline`] against the registry before anything is built.
//!
//! Validation looks at the whole description and reports every problem it
//! finds, so a pipeline file can be fixed in one pass:
//!
//! - the pipeline has at least one node and node IDs are unique
//! - every filter type is registered
//! - every target and the `source` name an existing node, and no node
//!   targets itself
//! - every parameter exists on its filter, parses, and lies within range
//!
//! Cycles longer than a self-edge and single-input violations depend on
//! group redirection, so they are left to the graph and surface as
//! [`GraphError`](lumen_core::GraphError)s when the pipeline is built.
//!
//! # Example
//!
//! ```rust
//! use lumen_config::{NodeConfig, Pipeline, validate_pipeline};
//!
//! let pipeline = Pipeline::new("p")
//!     .with_node(NodeConfig::new("blur", "gaussian_blur").with_param("radius", "99px"));
//! assert!(validate_pipeline(&pipeline).is_err());
//! ```

use lumen_core::ParamDescriptor;
use lumen_registry::FilterRegistry;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::node_config::parse_param_value;
use crate::pipeline::Pipeline;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The pipeline has no nodes.
    #[error("pipeline has no nodes")]
    EmptyPipeline,

    /// Two nodes share an ID.
    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    /// Unknown filter type.
    #[error("node '{node}' has unknown filter type '{filter}'")]
    UnknownFilter {
        /// Node ID.
        node: String,
        /// The unregistered filter type.
        filter: String,
    },

    /// A target names a node that does not exist.
    #[error("node '{node}' targets unknown node '{target}'")]
    UnknownTarget {
        /// Node ID.
        node: String,
        /// The missing target ID.
        target: String,
    },

    /// A node lists itself as a target.
    #[error("node '{0}' targets itself")]
    SelfTarget(String),

    /// `source` names a node that does not exist.
    #[error("source '{0}' is not a node of the pipeline")]
    UnknownSource(String),

    /// Unknown parameter name.
    #[error("unknown parameter '{param}' for node '{node}' ({filter})")]
    UnknownParameter {
        /// Node ID.
        node: String,
        /// Filter type of the node.
        filter: String,
        /// Name of the unrecognized parameter.
        param: String,
    },

    /// Parameter value could not be parsed.
    #[error("invalid value '{value}' for parameter '{param}' of node '{node}'")]
    InvalidFormat {
        /// Node ID.
        node: String,
        /// Name of the parameter.
        param: String,
        /// The unparsable text.
        value: String,
    },

    /// Parameter value out of range.
    #[error("parameter '{param}' of node '{node}': value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Node ID.
        node: String,
        /// Name of the parameter.
        param: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Multiple validation errors.
    #[error("{} problems: {}", .0.len(), .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Every individual problem, with [`Multiple`](Self::Multiple) unpacked.
    pub fn into_problems(self) -> Vec<ValidationError> {
        match self {
            ValidationError::Multiple(errors) => errors,
            other => vec![other],
        }
    }

    fn collect(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ValidationError::Multiple(errors)),
        }
    }
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validator for pipelines and their parameters.
///
/// Parameter descriptors are looked up once per filter type and cached.
pub struct PipelineValidator<'r> {
    registry: &'r FilterRegistry,
    param_cache: HashMap<String, Vec<ParamDescriptor>>,
}

impl<'r> PipelineValidator<'r> {
    /// Create a validator over `registry`.
    pub fn new(registry: &'r FilterRegistry) -> Self {
        Self {
            registry,
            param_cache: HashMap::new(),
        }
    }

    /// The registry filter types are checked against.
    pub fn registry(&self) -> &'r FilterRegistry {
        self.registry
    }

    /// Parameter descriptors of a filter type, or `None` if it is unknown.
    pub fn params(&mut self, filter_type: &str) -> Option<&[ParamDescriptor]> {
        if !self.param_cache.contains_key(filter_type) {
            let params = self.registry.params(filter_type).ok()?;
            self.param_cache.insert(filter_type.to_string(), params);
        }
        self.param_cache.get(filter_type).map(Vec::as_slice)
    }

    /// Descriptor of the parameter called `name` on a filter type.
    pub fn find_param(&mut self, filter_type: &str, name: &str) -> Option<ParamDescriptor> {
        self.params(filter_type)?
            .iter()
            .find(|desc| desc.matches(name))
            .copied()
    }

    /// Parses and range-checks one parameter of `node`.
    ///
    /// Returns the parsed value.
    pub fn validate_param(
        &mut self,
        node: &str,
        filter_type: &str,
        param: &str,
        value: &str,
    ) -> ValidationResult<f32> {
        let desc = self
            .find_param(filter_type, param)
            .ok_or_else(|| ValidationError::UnknownParameter {
                node: node.to_string(),
                filter: filter_type.to_string(),
                param: param.to_string(),
            })?;

        let parsed = parse_param_value(value).ok_or_else(|| ValidationError::InvalidFormat {
            node: node.to_string(),
            param: param.to_string(),
            value: value.to_string(),
        })?;

        if desc.contains(parsed) {
            Ok(parsed)
        } else {
            Err(ValidationError::OutOfRange {
                node: node.to_string(),
                param: param.to_string(),
                value: parsed,
                min: desc.min,
                max: desc.max,
            })
        }
    }

    /// Validates a whole pipeline, collecting every problem.
    pub fn validate_pipeline(&mut self, pipeline: &Pipeline) -> ValidationResult<()> {
        if pipeline.is_empty() {
            return Err(ValidationError::EmptyPipeline);
        }

        let mut errors = Vec::new();
        let mut seen = HashSet::new();
        for node in &pipeline.nodes {
            if !seen.insert(node.id.as_str()) {
                errors.push(ValidationError::DuplicateNode(node.id.clone()));
            }
        }

        if let Some(source) = &pipeline.source
            && !seen.contains(source.as_str())
        {
            errors.push(ValidationError::UnknownSource(source.clone()));
        }

        for node in &pipeline.nodes {
            for target in &node.targets {
                if *target == node.id {
                    errors.push(ValidationError::SelfTarget(node.id.clone()));
                } else if !seen.contains(target.as_str()) {
                    errors.push(ValidationError::UnknownTarget {
                        node: node.id.clone(),
                        target: target.clone(),
                    });
                }
            }

            if self.registry.get(&node.filter_type).is_none() {
                errors.push(ValidationError::UnknownFilter {
                    node: node.id.clone(),
                    filter: node.filter_type.clone(),
                });
                continue;
            }

            for (param, value) in &node.params {
                if let Err(e) = self.validate_param(&node.id, &node.filter_type, param, value) {
                    errors.push(e);
                }
            }
        }

        ValidationError::collect(errors)
    }
}

/// Validate a pipeline against the built-in registry.
///
/// This is a convenience function that creates a registry and validator
/// internally. For repeated validation, use [`PipelineValidator`] directly.
pub fn validate_pipeline(pipeline: &Pipeline) -> ValidationResult<()> {
    let registry = FilterRegistry::new();
    PipelineValidator::new(&registry).validate_pipeline(pipeline)
}
