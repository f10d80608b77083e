//! Reference counting and deterministic teardown.
//!
//! A node is freed when its last holder lets go. Freeing a node tears down its
//! filter, detaches it from the sources of its targets, and then releases, in
//! reverse order of acquisition, every reference the node itself held: one per
//! outgoing edge for a leaf, one per member for a group. Those releases can in
//! turn free further nodes, which is handled with an explicit worklist so
//! arbitrarily deep chains never grow the call stack.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use super::error::GraphError;
use super::filter_graph::FilterGraph;
use super::node::{NodeId, NodeKind, remove_first};

impl FilterGraph {
    /// Adds a reference to a node, e.g. to share it with another owner.
    ///
    /// Returns the new reference count.
    pub fn retain(&mut self, id: NodeId) -> Result<u32, GraphError> {
        let node = self.node_mut(id)?;
        node.ref_count += 1;
        Ok(node.ref_count)
    }

    /// Gives up one reference to a node.
    ///
    /// Returns `true` if this was the last reference and the node (and any
    /// children only it was holding) has been freed.
    pub fn release(&mut self, id: NodeId) -> Result<bool, GraphError> {
        self.node(id)?;
        Ok(self.drop_reference(id))
    }

    /// Decrements a node's reference count, freeing it and cascading at zero.
    ///
    /// Unknown IDs are ignored. Returns whether `id` itself was freed.
    pub(super) fn drop_reference(&mut self, id: NodeId) -> bool {
        let mut pending = vec![id];
        let mut freed_root = false;

        while let Some(current) = pending.pop() {
            let Ok(node) = self.node_mut(current) else {
                continue;
            };
            node.ref_count = node.ref_count.saturating_sub(1);
            if node.ref_count > 0 {
                continue;
            }

            let Some(mut data) = self.nodes[current.0 as usize].take() else {
                continue;
            };
            if current == id {
                freed_root = true;
            }

            #[cfg(feature = "tracing")]
            tracing::debug!(node = %current, name = data.name(), "graph_free");

            let children: Vec<NodeId> = match &mut data.kind {
                NodeKind::Leaf(filter) => {
                    filter.teardown();
                    let targets = core::mem::take(&mut data.targets);
                    for &target in &targets {
                        if let Ok(t) = self.node_mut(target) {
                            remove_first(&mut t.sources, current);
                        }
                    }
                    targets
                }
                NodeKind::Group(group) => core::mem::take(&mut group.members),
            };

            // Pushed in acquisition order, popped in reverse.
            pending.extend(children);
        }

        freed_root
    }
}
