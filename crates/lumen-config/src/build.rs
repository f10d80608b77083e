//! Turning a [`Pipeline`] description into a running graph.

use lumen_core::{FilterGraph, Frame, GraphError, NodeId, PushReport};
use lumen_registry::FilterRegistry;

use crate::error::ConfigError;
use crate::node_config::parse_param_value;
use crate::pipeline::Pipeline;
use crate::validation::{PipelineValidator, ValidationError};

/// A pipeline instantiated into its own [`FilterGraph`].
///
/// Every configured node is `Ready`, parameterized and wired. The graph holds
/// one reference per node on behalf of the pipeline, so dropping the
/// `BuiltPipeline` tears everything down.
pub struct BuiltPipeline {
    name: String,
    graph: FilterGraph,
    nodes: Vec<(String, NodeId)>,
    source: NodeId,
}

impl Pipeline {
    /// Validates this pipeline and builds it into a new graph.
    ///
    /// Nodes are instantiated through `registry` in declaration order, then
    /// their parameters are applied through the graph's parameter API, so
    /// parameters of composite filters reach the right member. Edges are
    /// wired last, in declaration order, with [`FilterGraph::add_target()`].
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Validation`] with every problem the validator found
    /// - [`ConfigError::Graph`] if a node fails to initialize or an edge is
    ///   rejected (a cycle, or a second producer for a single-input filter)
    pub fn build(&self, registry: &FilterRegistry) -> Result<BuiltPipeline, ConfigError> {
        PipelineValidator::new(registry).validate_pipeline(self)?;

        let mut graph = FilterGraph::new();
        let mut nodes: Vec<(String, NodeId)> = Vec::with_capacity(self.nodes.len());

        for config in &self.nodes {
            let id = registry.instantiate(&mut graph, &config.filter_type)?;
            for (param, text) in &config.params {
                let invalid = |reason: &str| ConfigError::InvalidParameter {
                    node: config.id.clone(),
                    param: param.clone(),
                    reason: reason.to_string(),
                };
                let index = graph
                    .find_param(id, param)?
                    .ok_or_else(|| invalid("no such parameter"))?;
                let value = parse_param_value(text).ok_or_else(|| invalid("not a number"))?;
                let applied = graph.set_param(id, index, value)?;
                tracing::debug!(node = %config.id, param = %param, value = applied, "param_set");
            }
            nodes.push((config.id.clone(), id));
        }

        let lookup = |owner: &str, name: &str| {
            nodes
                .iter()
                .find(|(n, _)| n == name)
                .map(|&(_, id)| id)
                .ok_or_else(|| ConfigError::UnknownNode {
                    node: owner.to_string(),
                    reference: name.to_string(),
                })
        };

        let mut edges = 0;
        for config in &self.nodes {
            let from = lookup(&config.id, &config.id)?;
            for target in &config.targets {
                let to = lookup(&config.id, target)?;
                graph.add_target(from, to)?;
                edges += 1;
            }
        }

        let source_name = self
            .source_id()
            .ok_or(ConfigError::Validation(ValidationError::EmptyPipeline))?;
        let source = lookup(&self.name, source_name)?;

        tracing::info!(
            pipeline = %self.name,
            nodes = nodes.len(),
            edges,
            source = source_name,
            "pipeline_built"
        );

        Ok(BuiltPipeline {
            name: self.name.clone(),
            graph,
            nodes,
            source,
        })
    }
}

impl BuiltPipeline {
    /// Pipeline name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The graph the pipeline was built into.
    pub fn graph(&self) -> &FilterGraph {
        &self.graph
    }

    /// Mutable access to the graph, e.g. to adjust parameters between frames.
    pub fn graph_mut(&mut self) -> &mut FilterGraph {
        &mut self.graph
    }

    /// The injection node.
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Graph node of a configured node ID.
    pub fn node(&self, id: &str) -> Option<NodeId> {
        self.nodes.iter().find(|(n, _)| n == id).map(|&(_, node)| node)
    }

    /// Configured node IDs with their graph nodes, in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = (&str, NodeId)> + '_ {
        self.nodes.iter().map(|(n, id)| (n.as_str(), *id))
    }

    /// Configured nodes whose output leaves the pipeline, in declaration order.
    pub fn sinks(&self) -> Vec<(&str, NodeId)> {
        self.nodes()
            .filter(|&(_, id)| {
                self.graph
                    .resolve_terminal(id)
                    .ok()
                    .and_then(|leaf| self.graph.targets(leaf))
                    .is_some_and(<[NodeId]>::is_empty)
            })
            .collect()
    }

    /// Runs one frame through the pipeline from its source.
    pub fn push(&mut self, frame: Frame) -> Result<PushReport, GraphError> {
        self.graph.push_frame(self.source, frame)
    }

    /// Frames produced by each sink during `report`, keyed by configured node ID.
    ///
    /// A sink that is a composite produces through its terminal member; its
    /// frames are attributed to the composite's configured ID. Sinks that
    /// produced nothing (a dropped frame) are omitted.
    pub fn sink_outputs<'a>(&'a self, report: &'a PushReport) -> Vec<(&'a str, &'a Frame)> {
        let mut outputs = Vec::new();
        for (name, id) in self.sinks() {
            let Ok(leaf) = self.graph.resolve_terminal(id) else {
                continue;
            };
            outputs.extend(report.outputs_of(leaf).map(|frame| (name, frame)));
        }
        outputs
    }
}

impl core::fmt::Debug for BuiltPipeline {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BuiltPipeline")
            .field("name", &self.name)
            .field("nodes", &self.nodes)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
