//! Filter graph: node arena, wiring API, cycle detection and introspection.
//!
//! [`FilterGraph`] is the main entry point of the engine. It owns every node in
//! an arena indexed by [`NodeId`], provides the wiring methods
//! ([`add_target()`](FilterGraph::add_target), [`fan_out()`](FilterGraph::fan_out),
//! [`remove_target()`](FilterGraph::remove_target)), and rejects any edge that
//! would close a loop at wiring time, so propagation can be a plain recursive
//! call tree.
//!
//! Lifecycle (`retain`/`release`), composite groups, frame propagation and
//! parameter access live in sibling modules as further `impl FilterGraph`
//! blocks.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, collections::BTreeSet, vec, vec::Vec};
#[cfg(feature = "std")]
use std::collections::BTreeSet;

use crate::filter::FilterError;
use crate::filter_with_params::FilterWithParams;

use super::error::GraphError;
use super::node::{NodeData, NodeId, NodeKind, NodeState, remove_first};
use super::pool::FramePool;

/// Directed acyclic graph of filters and composite groups.
///
/// # Usage
///
/// 1. Allocate nodes: [`add_filter()`](Self::add_filter) then
///    [`init_node()`](Self::init_node), or [`create_filter()`](Self::create_filter)
///    for both at once, or [`build_group()`](Self::build_group) for a composite.
/// 2. Wire them: [`add_target()`](Self::add_target), or fluently with
///    [`wire()`](Self::wire).
/// 3. Push frames: [`push_frame()`](Self::push_frame).
/// 4. Drop handles with [`release()`](Self::release).
///
/// # Ownership
///
/// Every node carries a reference count. The caller that allocates a node holds
/// one reference; every incoming edge, every group membership and every
/// [`retain()`](Self::retain) adds one. A node is freed, and releases its own
/// targets and members in reverse acquisition order, when the count reaches zero.
pub struct FilterGraph {
    pub(super) nodes: Vec<Option<NodeData>>,
    pub(super) next_node_slot: u32,
    pub(super) pool: FramePool,
}

impl Default for FilterGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterGraph {
    /// Creates an empty graph with a default-sized frame pool.
    pub fn new() -> Self {
        Self::with_pool(FramePool::default())
    }

    /// Creates an empty graph that recycles buffers through `pool`.
    pub fn with_pool(pool: FramePool) -> Self {
        Self {
            nodes: Vec::new(),
            next_node_slot: 0,
            pool,
        }
    }

    // --- Allocation ---

    /// Allocates a leaf node for `filter`. Returns the new node's ID.
    ///
    /// The node starts in [`NodeState::Allocated`] with one reference, held by
    /// the caller. It must be initialized with [`init_node()`](Self::init_node)
    /// before it can receive frames.
    pub fn add_filter(&mut self, filter: Box<dyn FilterWithParams + Send>) -> NodeId {
        let id = self.insert_node(NodeKind::Leaf(filter), NodeState::Allocated);
        #[cfg(feature = "tracing")]
        tracing::debug!(node = %id, name = self.name(id).unwrap_or("?"), "graph_add");
        id
    }

    /// Allocates and initializes a leaf node.
    ///
    /// On initialization failure the node is released again and the error is
    /// returned, so no failed node is left behind.
    pub fn create_filter(
        &mut self,
        filter: Box<dyn FilterWithParams + Send>,
    ) -> Result<NodeId, GraphError> {
        let id = self.add_filter(filter);
        if let Err(err) = self.init_node(id) {
            self.drop_reference(id);
            return Err(err);
        }
        Ok(id)
    }

    /// Runs one-time setup for a node.
    ///
    /// `Allocated` moves to `Ready` on success and to `Failed` on error.
    /// Calling it on a `Ready` node is a no-op; calling it on a `Failed` node
    /// reports the failure again.
    pub fn init_node(&mut self, id: NodeId) -> Result<(), GraphError> {
        let node = self.node_mut(id)?;
        match node.state {
            NodeState::Ready => Ok(()),
            NodeState::Failed => Err(GraphError::InitFailure {
                node: id,
                name: node.name(),
                source: FilterError::Failed("initialization previously failed".into()),
            }),
            NodeState::Allocated => {
                let result = match &mut node.kind {
                    NodeKind::Leaf(filter) => filter.init(),
                    NodeKind::Group(_) => Ok(()),
                };
                match result {
                    Ok(()) => {
                        node.state = NodeState::Ready;
                        Ok(())
                    }
                    Err(source) => {
                        node.state = NodeState::Failed;
                        #[cfg(feature = "tracing")]
                        tracing::warn!(node = %id, error = %source, "graph_init_failed");
                        Err(GraphError::InitFailure {
                            node: id,
                            name: node.name(),
                            source,
                        })
                    }
                }
            }
        }
    }

    // --- Wiring ---

    /// Appends `to` to the target list of `from` and returns `to`.
    ///
    /// Returning the target (not `from`) makes chained calls build a linear
    /// chain; use [`wire()`](Self::wire) for the fluent form or
    /// [`fan_out()`](Self::fan_out) to give one node several targets.
    ///
    /// If `from` is a composite group, the edge is added to the group's terminal
    /// node (resolved recursively through nested groups). Duplicate edges are
    /// permitted and each one delivers its own copy of every frame.
    ///
    /// # Errors
    ///
    /// - [`GraphError::NodeNotFound`] if either node doesn't exist
    /// - [`GraphError::IncompleteGroup`] if either side is a group without a
    ///   terminal
    /// - [`GraphError::CycleDetected`] if `to` can already reach `from`, or
    ///   already owns it (as a member, transitively, or through edges)
    /// - [`GraphError::InputOccupied`] if the leaf that receives frames for
    ///   `to` accepts a single producer and already has a different one,
    ///   whether that edge was added to the leaf or to a group it is the
    ///   entry of
    ///
    /// On error the graph is unchanged.
    pub fn add_target(&mut self, from: NodeId, to: NodeId) -> Result<NodeId, GraphError> {
        let producer = self.resolve_terminal(from)?;
        if self.is_group(to) {
            self.resolve_terminal(to)?;
        } else {
            self.node(to)?;
        }

        // The edge makes the producer a holder of `to`, so `to` must neither
        // reach nor hold the producer already.
        if self.can_reach(to, producer) || self.owns(to, producer) {
            return Err(GraphError::CycleDetected { from: producer, to });
        }
        self.check_input_arity(producer, to)?;

        self.link(producer, to);
        Ok(to)
    }

    /// Starts a fluent linear chain at `node`.
    ///
    /// ```rust,ignore
    /// // a -> b -> c
    /// graph.wire(a).add_target(b)?.add_target(c)?;
    /// ```
    pub fn wire(&mut self, node: NodeId) -> Wiring<'_> {
        Wiring { graph: self, node }
    }

    /// Wires `nodes[0] -> nodes[1] -> ... -> nodes[n-1]` and returns the last node.
    ///
    /// All-or-nothing: if any edge fails, the edges added so far are removed.
    pub fn chain(&mut self, nodes: &[NodeId]) -> Result<Option<NodeId>, GraphError> {
        let mut wired: Vec<(NodeId, NodeId)> = Vec::with_capacity(nodes.len());
        for pair in nodes.windows(2) {
            if let Err(err) = self.add_target(pair[0], pair[1]) {
                self.unwire_all(&wired);
                return Err(err);
            }
            wired.push((pair[0], pair[1]));
        }
        Ok(nodes.last().copied())
    }

    /// Adds every node in `targets` as a target of `from`, in order.
    ///
    /// Unlike chaining, all edges leave `from` (or its terminal). All-or-nothing:
    /// if any edge fails, the edges added so far are removed.
    pub fn fan_out(&mut self, from: NodeId, targets: &[NodeId]) -> Result<(), GraphError> {
        let mut wired: Vec<(NodeId, NodeId)> = Vec::with_capacity(targets.len());
        for &to in targets {
            if let Err(err) = self.add_target(from, to) {
                self.unwire_all(&wired);
                return Err(err);
            }
            wired.push((from, to));
        }
        Ok(())
    }

    /// Removes one `from -> to` edge and drops the reference it held.
    ///
    /// Group sources are redirected to their terminal exactly like
    /// [`add_target()`](Self::add_target). Returns `Ok(false)` (a no-op) if no
    /// such edge exists. If the edge was the last reference to `to`, `to` is freed.
    pub fn remove_target(&mut self, from: NodeId, to: NodeId) -> Result<bool, GraphError> {
        let producer = self.resolve_terminal(from)?;
        if !self.unlink(producer, to) {
            return Ok(false);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(from = %producer, to = %to, "graph_unwire");
        self.drop_reference(to);
        Ok(true)
    }

    /// Removes edges added during a failed multi-edge operation, newest first.
    pub(super) fn unwire_all(&mut self, wired: &[(NodeId, NodeId)]) {
        for &(from, to) in wired.iter().rev() {
            // Every pair was wired successfully a moment ago.
            let _ = self.remove_target(from, to);
        }
    }

    // --- Introspection ---

    /// Returns the number of live nodes (leaves and groups).
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Returns true if `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    /// Iterates over live node IDs in allocation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().flatten().map(|n| n.id)
    }

    /// Returns the target list of a node, in fan-out order.
    ///
    /// For a group this is its own (always empty) list; edges added through a
    /// group live on its terminal, see [`resolve_terminal()`](Self::resolve_terminal).
    pub fn targets(&self, id: NodeId) -> Option<&[NodeId]> {
        self.node(id).ok().map(|n| n.targets.as_slice())
    }

    /// Returns the producers with an edge into a node, one entry per edge.
    pub fn sources(&self, id: NodeId) -> Option<&[NodeId]> {
        self.node(id).ok().map(|n| n.sources.as_slice())
    }

    /// Returns the number of holders of a node.
    pub fn ref_count(&self, id: NodeId) -> Option<u32> {
        self.node(id).ok().map(|n| n.ref_count)
    }

    /// Returns the lifecycle state of a node.
    pub fn state(&self, id: NodeId) -> Option<NodeState> {
        self.node(id).ok().map(|n| n.state)
    }

    /// Returns true if the node is a composite group.
    pub fn is_group(&self, id: NodeId) -> bool {
        self.node(id)
            .is_ok_and(|n| matches!(n.kind, NodeKind::Group(_)))
    }

    /// Returns the filter type name, or the group name.
    pub fn name(&self, id: NodeId) -> Option<&'static str> {
        self.node(id).ok().map(NodeData::name)
    }

    /// Returns the frame pool.
    pub fn pool(&self) -> &FramePool {
        &self.pool
    }

    /// Returns the frame pool mutably (e.g., to resize it).
    pub fn pool_mut(&mut self) -> &mut FramePool {
        &mut self.pool
    }

    // --- Internal helpers ---

    pub(super) fn insert_node(&mut self, kind: NodeKind, state: NodeState) -> NodeId {
        let id = NodeId(self.next_node_slot);
        self.next_node_slot += 1;

        let idx = id.0 as usize;
        if idx >= self.nodes.len() {
            self.nodes.resize_with(idx + 1, || None);
        }
        self.nodes[idx] = Some(NodeData::new(id, kind, state));
        id
    }

    pub(super) fn node(&self, id: NodeId) -> Result<&NodeData, GraphError> {
        self.nodes
            .get(id.0 as usize)
            .and_then(|n| n.as_ref())
            .ok_or(GraphError::NodeNotFound(id))
    }

    pub(super) fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData, GraphError> {
        self.nodes
            .get_mut(id.0 as usize)
            .and_then(|n| n.as_mut())
            .ok_or(GraphError::NodeNotFound(id))
    }

    /// Records a `from -> to` edge. Both nodes must exist.
    fn link(&mut self, from: NodeId, to: NodeId) {
        if let Ok(node) = self.node_mut(from) {
            node.targets.push(to);
        }
        if let Ok(node) = self.node_mut(to) {
            node.sources.push(from);
            node.ref_count += 1;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(from = %from, to = %to, "graph_wire");
    }

    /// Forgets one `from -> to` edge without touching reference counts.
    pub(super) fn unlink(&mut self, from: NodeId, to: NodeId) -> bool {
        let removed = self
            .node_mut(from)
            .is_ok_and(|node| remove_first(&mut node.targets, to));
        if removed && let Ok(node) = self.node_mut(to) {
            remove_first(&mut node.sources, from);
        }
        removed
    }

    /// Nodes a frame delivered to `id` is handed to next.
    ///
    /// A leaf hands frames to its targets; a group hands them to its entry.
    fn successors(&self, id: NodeId) -> Vec<NodeId> {
        match self.node(id) {
            Ok(node) => match &node.kind {
                NodeKind::Leaf(_) => node.targets.clone(),
                NodeKind::Group(group) => vec![group.entry],
            },
            Err(_) => Vec::new(),
        }
    }

    /// Nodes `id` holds a reference to: its targets and, for a group, its
    /// members.
    fn owned(&self, id: NodeId) -> Vec<NodeId> {
        match self.node(id) {
            Ok(node) => {
                let mut owned = node.targets.clone();
                if let NodeKind::Group(group) = &node.kind {
                    owned.extend_from_slice(&group.members);
                }
                owned
            }
            Err(_) => Vec::new(),
        }
    }

    /// Checks if `to` is reachable from `from` by following frame delivery.
    pub(super) fn can_reach(&self, from: NodeId, to: NodeId) -> bool {
        self.search(from, to, Self::successors)
    }

    /// Checks if `from` holds `to`, directly or through the nodes it holds.
    pub(super) fn owns(&self, from: NodeId, to: NodeId) -> bool {
        from != to && self.search(from, to, Self::owned)
    }

    /// Depth-first search; the visited set only grows with live nodes seen.
    fn search(&self, from: NodeId, to: NodeId, next: fn(&Self, NodeId) -> Vec<NodeId>) -> bool {
        let mut visited = BTreeSet::new();
        let mut stack = vec![from];

        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            stack.extend(next(self, current));
        }
        false
    }

    /// Whether `id` (or, for a group, its entry) accepts several producers.
    pub(super) fn accepts_multiple_inputs(&self, id: NodeId) -> Result<bool, GraphError> {
        let leaf = self.resolve_entry(id)?;
        match &self.node(leaf)?.kind {
            NodeKind::Leaf(filter) => Ok(filter.accepts_multiple_inputs()),
            NodeKind::Group(_) => Ok(false),
        }
    }

    /// Producers of every edge whose frames end up at entry leaf `leaf`:
    /// edges into the leaf itself and into each group it is the entry of.
    fn input_producers(&self, leaf: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .flatten()
            .filter(move |n| self.resolve_entry(n.id).is_ok_and(|entry| entry == leaf))
            .flat_map(|n| n.sources.iter().copied())
    }

    /// Enforces at most one distinct producer for single-input nodes.
    ///
    /// The slot is the resolved entry leaf, so an edge into a group and an
    /// edge into its entry compete for the same input.
    fn check_input_arity(&self, producer: NodeId, to: NodeId) -> Result<(), GraphError> {
        if self.accepts_multiple_inputs(to)? {
            return Ok(());
        }
        let leaf = self.resolve_entry(to)?;
        match self.input_producers(leaf).find(|&s| s != producer) {
            Some(existing) => Err(GraphError::InputOccupied {
                node: to,
                producer: existing,
            }),
            None => Ok(()),
        }
    }
}

/// Fluent linear-chain builder returned by [`FilterGraph::wire()`].
///
/// Each [`add_target()`](Self::add_target) moves the cursor to the node just
/// added, so `wire(a).add_target(b)?.add_target(c)?` wires `a -> b -> c`.
pub struct Wiring<'g> {
    graph: &'g mut FilterGraph,
    node: NodeId,
}

impl<'g> Wiring<'g> {
    /// Adds `target` after the current node and moves the cursor to it.
    pub fn add_target(self, target: NodeId) -> Result<Wiring<'g>, GraphError> {
        let node = self.graph.add_target(self.node, target)?;
        Ok(Wiring {
            graph: self.graph,
            node,
        })
    }

    /// The node the cursor is on.
    pub fn id(&self) -> NodeId {
        self.node
    }
}
