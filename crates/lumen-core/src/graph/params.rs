//! Parameter access by node.
//!
//! Leaves answer from their filter's [`ParameterInfo`](crate::ParameterInfo)
//! implementation. Groups publish only the member parameters named with
//! [`GroupBuilder::expose_param()`](super::GroupBuilder::expose_param); each one
//! forwards to its member, recursively through nested groups.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::param_info::ParamDescriptor;

use super::error::GraphError;
use super::filter_graph::FilterGraph;
use super::node::{NodeId, NodeKind};

/// Where a parameter index on a node actually lives.
enum ParamTarget {
    Leaf(NodeId, usize),
    Forward {
        member: NodeId,
        index: usize,
        name: &'static str,
        short_name: &'static str,
        string_id: &'static str,
    },
}

impl FilterGraph {
    /// Number of parameters a node publishes.
    pub fn param_count(&self, id: NodeId) -> Result<usize, GraphError> {
        Ok(match &self.node(id)?.kind {
            NodeKind::Leaf(filter) => filter.filter_param_count(),
            NodeKind::Group(group) => group.exposed.len(),
        })
    }

    /// Descriptor of parameter `index` on a node.
    ///
    /// Group parameters carry the group's published names and the member's
    /// range, unit and default.
    pub fn param_info(&self, id: NodeId, index: usize) -> Result<ParamDescriptor, GraphError> {
        match self.param_target(id, index)? {
            ParamTarget::Leaf(leaf, index) => match &self.node(leaf)?.kind {
                NodeKind::Leaf(filter) => filter
                    .filter_param_info(index)
                    .ok_or(GraphError::ParamOutOfRange { node: id, index }),
                NodeKind::Group(_) => Err(GraphError::ParamOutOfRange { node: id, index }),
            },
            ParamTarget::Forward {
                member,
                index,
                name,
                short_name,
                string_id,
            } => Ok(self
                .param_info(member, index)?
                .renamed(name, short_name, string_id)),
        }
    }

    /// Every parameter descriptor of a node, in index order.
    pub fn params(&self, id: NodeId) -> Result<Vec<ParamDescriptor>, GraphError> {
        (0..self.param_count(id)?)
            .map(|i| self.param_info(id, i))
            .collect()
    }

    /// Current value of parameter `index`.
    pub fn get_param(&self, id: NodeId, index: usize) -> Result<f32, GraphError> {
        match self.param_target(id, index)? {
            ParamTarget::Leaf(leaf, index) => match &self.node(leaf)?.kind {
                NodeKind::Leaf(filter) => Ok(filter.filter_get_param(index)),
                NodeKind::Group(_) => Err(GraphError::ParamOutOfRange { node: id, index }),
            },
            ParamTarget::Forward { member, index, .. } => self.get_param(member, index),
        }
    }

    /// Sets parameter `index`, clamped to its descriptor's range.
    ///
    /// Returns the value actually applied.
    pub fn set_param(&mut self, id: NodeId, index: usize, value: f32) -> Result<f32, GraphError> {
        match self.param_target(id, index)? {
            ParamTarget::Leaf(leaf, index) => {
                let desc = self.param_info(leaf, index)?;
                let value = desc.clamp(value);
                if let NodeKind::Leaf(filter) = &mut self.node_mut(leaf)?.kind {
                    filter.filter_set_param(index, value);
                }
                Ok(value)
            }
            ParamTarget::Forward { member, index, .. } => self.set_param(member, index, value),
        }
    }

    /// Index of the parameter whose name, short name or string ID matches
    /// `name` (case-insensitive).
    pub fn find_param(&self, id: NodeId, name: &str) -> Result<Option<usize>, GraphError> {
        Ok(self.params(id)?.iter().position(|desc| desc.matches(name)))
    }

    fn param_target(&self, id: NodeId, index: usize) -> Result<ParamTarget, GraphError> {
        match &self.node(id)?.kind {
            NodeKind::Leaf(filter) if index < filter.filter_param_count() => {
                Ok(ParamTarget::Leaf(id, index))
            }
            NodeKind::Group(group) => match group.exposed.get(index) {
                Some(p) => Ok(ParamTarget::Forward {
                    member: p.member,
                    index: p.index,
                    name: p.name,
                    short_name: p.short_name,
                    string_id: p.string_id,
                }),
                None => Err(GraphError::ParamOutOfRange { node: id, index }),
            },
            NodeKind::Leaf(_) => Err(GraphError::ParamOutOfRange { node: id, index }),
        }
    }
}
