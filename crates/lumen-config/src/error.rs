//! Error types for configuration operations.

use std::path::PathBuf;
use thiserror::Error;

use lumen_core::GraphError;
use lumen_registry::RegistryError;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Pipeline not found by name or path
    #[error("pipeline not found: {0}")]
    PipelineNotFound(String),

    /// Unknown filter type
    #[error("unknown filter type: {0}")]
    UnknownFilter(String),

    /// A node names a target or source that does not exist
    #[error("node '{node}' references unknown node '{reference}'")]
    UnknownNode {
        /// Node holding the reference (or the pipeline name for `source`).
        node: String,
        /// The missing node ID.
        reference: String,
    },

    /// Invalid parameter
    #[error("invalid parameter '{param}' for node '{node}': {reason}")]
    InvalidParameter {
        /// Node containing the invalid parameter.
        node: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of why the parameter is invalid.
        reason: String,
    },

    /// Validation errors
    #[error("validation failed: {0}")]
    Validation(#[from] crate::validation::ValidationError),

    /// The graph rejected a node or an edge
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
}

impl From<RegistryError> for ConfigError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UnknownFilter(id) => ConfigError::UnknownFilter(id),
            RegistryError::Graph(err) => ConfigError::Graph(err),
        }
    }
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}
