//! Pipeline file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::node_config::NodeConfig;

/// Pipeline file format: a named graph of filter nodes.
///
/// # TOML Format
///
/// ```toml
/// name = "Edges"
/// description = "Canny edge map"
/// source = "edges"
///
/// [[nodes]]
/// id = "edges"
/// type = "canny_edge_detection"
/// targets = ["invert"]
/// [nodes.params]
/// upper_threshold = "0.45"
///
/// [[nodes]]
/// id = "invert"
/// type = "invert"
/// ```
///
/// `source` names the node frames are injected into and defaults to the
/// first node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pipeline {
    /// Name of the pipeline.
    pub name: String,

    /// Optional description of the pipeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// ID of the injection node. Defaults to the first node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Nodes in declaration order. Edges are wired in this order.
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

impl Pipeline {
    /// Create a new empty pipeline.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            source: None,
            nodes: Vec::new(),
        }
    }

    /// Create a pipeline with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the injection node.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Add a node to the pipeline.
    pub fn with_node(mut self, node: NodeConfig) -> Self {
        self.nodes.push(node);
        self
    }

    /// Add multiple nodes to the pipeline.
    pub fn with_nodes(mut self, nodes: impl IntoIterator<Item = NodeConfig>) -> Self {
        self.nodes.extend(nodes);
        self
    }

    /// Linear pipeline of the given filter types, each node named after its type.
    ///
    /// Repeated types get a numeric suffix (`invert`, `invert_2`).
    pub fn from_filter_types(name: impl Into<String>, types: &[&str]) -> Self {
        let ids: Vec<String> = types
            .iter()
            .enumerate()
            .map(|(i, filter_type)| {
                let repeats = types[..i].iter().filter(|t| *t == filter_type).count();
                if repeats == 0 {
                    (*filter_type).to_string()
                } else {
                    format!("{filter_type}_{}", repeats + 1)
                }
            })
            .collect();

        let nodes = types.iter().zip(&ids).enumerate().map(|(i, (filter_type, id))| {
            let node = NodeConfig::new(id.clone(), *filter_type);
            match ids.get(i + 1) {
                Some(next) => node.with_target(next.clone()),
                None => node,
            }
        });
        Self::new(name).with_nodes(nodes)
    }

    /// Load a pipeline from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let pipeline: Pipeline = toml::from_str(&content)?;
        Ok(pipeline)
    }

    /// Load a pipeline from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the pipeline to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the pipeline to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// ID of the injection node: `source` if set, else the first node's.
    pub fn source_id(&self) -> Option<&str> {
        self.source
            .as_deref()
            .or_else(|| self.nodes.first().map(|n| n.id.as_str()))
    }

    /// Get the number of nodes in the pipeline.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the pipeline has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by ID.
    pub fn get(&self, id: &str) -> Option<&NodeConfig> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut NodeConfig> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Iterate over nodes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeConfig> {
        self.nodes.iter()
    }

    /// Node IDs in declaration order.
    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    /// Filter types in declaration order.
    pub fn filter_types(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.filter_type.as_str()).collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
