//! Frame propagation.
//!
//! Propagation is a depth-first, synchronous push: a node applies its filter and
//! then hands the result to each of its targets, in target-list order, before
//! returning to its own caller. Every target's whole downstream subtree is
//! finished before the next target starts.
//!
//! A node reachable along two paths is invoked once per path. Nothing is merged
//! or deduplicated, so diamond-shaped graphs run their shared tail twice.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::filter::ProcessContext;
use crate::frame::Frame;

use super::error::GraphError;
use super::filter_graph::FilterGraph;
use super::node::{NodeId, NodeKind, NodeState};

/// A frame produced by a node with no targets.
#[derive(Debug, Clone)]
pub struct SinkOutput {
    /// Leaf that produced the frame.
    pub node: NodeId,
    /// The produced frame.
    pub frame: Frame,
}

/// What happened while one injected frame ran through the graph.
#[derive(Debug, Default)]
pub struct PushReport {
    /// Leaves invoked, in invocation order. A node appears once per delivery.
    pub processed: Vec<NodeId>,
    /// Number of invocations that produced no frame.
    pub dropped: usize,
    /// Frames produced by nodes without targets, in production order.
    pub outputs: Vec<SinkOutput>,
}

impl PushReport {
    /// How many times `node` was invoked.
    pub fn invocations(&self, node: NodeId) -> usize {
        self.processed.iter().filter(|&&n| n == node).count()
    }

    /// First frame produced by sink `node`.
    pub fn output_of(&self, node: NodeId) -> Option<&Frame> {
        self.outputs.iter().find(|o| o.node == node).map(|o| &o.frame)
    }

    /// Every frame produced by sink `node`, in production order.
    pub fn outputs_of(&self, node: NodeId) -> impl Iterator<Item = &Frame> + '_ {
        self.outputs
            .iter()
            .filter(move |o| o.node == node)
            .map(|o| &o.frame)
    }
}

impl FilterGraph {
    /// Injects `frame` at `source` and runs it through everything reachable.
    ///
    /// If `source` is a group the frame is delivered to its entry. Returns once
    /// every reachable node has been invoked.
    ///
    /// # Errors
    ///
    /// The first failure aborts the traversal and is returned; frames already
    /// forwarded to earlier targets are not undone. The graph itself is left
    /// untouched and can take the next frame.
    ///
    /// - [`GraphError::NodeNotFound`] if `source` doesn't exist
    /// - [`GraphError::IncompleteGroup`] if a group on the way has no terminal
    /// - [`GraphError::NotInitialized`] if a reached node is not `Ready`
    /// - [`GraphError::FrameNotReady`] if a delivered frame is not ready
    /// - [`GraphError::ProcessingFailure`] if a filter fails
    pub fn push_frame(&mut self, source: NodeId, frame: Frame) -> Result<PushReport, GraphError> {
        let mut report = PushReport::default();
        self.deliver(source, None, &frame, &mut report)?;

        #[cfg(feature = "tracing")]
        tracing::trace!(
            source = %source,
            processed = report.processed.len(),
            dropped = report.dropped,
            outputs = report.outputs.len(),
            "push"
        );

        self.pool.recycle(frame);
        Ok(report)
    }

    fn deliver(
        &mut self,
        id: NodeId,
        producer: Option<NodeId>,
        frame: &Frame,
        report: &mut PushReport,
    ) -> Result<(), GraphError> {
        let leaf = self.injection_point(id)?;

        let node = self.node(leaf)?;
        if node.state != NodeState::Ready {
            return Err(GraphError::NotInitialized(leaf));
        }
        if !frame.is_ready() {
            return Err(GraphError::FrameNotReady(leaf));
        }

        let Self { nodes, pool, .. } = &mut *self;
        let Some(node) = nodes.get_mut(leaf.0 as usize).and_then(Option::as_mut) else {
            return Err(GraphError::NodeNotFound(leaf));
        };
        let NodeKind::Leaf(filter) = &mut node.kind else {
            return Err(GraphError::NotInitialized(leaf));
        };

        let mut ctx = ProcessContext::new(leaf, producer, pool);
        let result = filter.apply(frame, &mut ctx);
        report.processed.push(leaf);

        let output = match result {
            Ok(Some(output)) => output,
            Ok(None) => {
                report.dropped += 1;
                return Ok(());
            }
            Err(source) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(node = %leaf, error = %source, "push_failed");
                return Err(GraphError::ProcessingFailure {
                    node: leaf,
                    name: filter.name(),
                    source,
                });
            }
        };

        let target_count = node.targets.len();
        if target_count == 0 {
            report.outputs.push(SinkOutput {
                node: leaf,
                frame: output,
            });
            return Ok(());
        }

        // Filters get no graph access, so the target list is stable here.
        for i in 0..target_count {
            let target = self.node(leaf)?.targets[i];
            self.deliver(target, Some(leaf), &output, report)?;
        }

        self.pool.recycle(output);
        Ok(())
    }

    /// The leaf that receives frames delivered to `id`, refusing incomplete groups.
    fn injection_point(&self, id: NodeId) -> Result<NodeId, GraphError> {
        let mut current = id;
        while self.is_group(current) {
            if self.terminal_of(current)?.is_none() {
                return Err(GraphError::IncompleteGroup(current));
            }
            current = self.entry_of(current)?;
        }
        self.node(current).map(|_| current)
    }
}
