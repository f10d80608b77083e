//! Composite groups: a subgraph addressed as a single node.
//!
//! A group is pure topology packaging. It owns a list of members, names one of
//! them the **entry** (where frames injected into the group are delivered) and
//! one the **terminal** (whose target list stands in for the group's own), and
//! has no processing logic of its own.
//!
//! Groups are constructed from a [`GroupBuilder`] by
//! [`FilterGraph::build_group()`], which either returns a ready group or an
//! error with every partially-acquired member released again:
//!
//! ```rust,ignore
//! let mut builder = GroupBuilder::new("edges");
//! let gray = builder.filter(Box::new(Grayscale::new()));
//! let blur = builder.filter(Box::new(GaussianBlur::new()));
//! let sobel = builder.filter(Box::new(DirectionalSobel::new()));
//! builder.chain(&[gray, blur, sobel]);
//! builder.terminal(sobel);
//! builder.expose_param(blur, 0, "Blur Radius", "blur_radius");
//!
//! let edges = graph.build_group(builder)?;
//! graph.add_target(edges, sink)?; // wires sobel -> sink
//! ```

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, format, vec::Vec};

use crate::filter::FilterError;
use crate::filter_with_params::FilterWithParams;

use super::error::GraphError;
use super::filter_graph::FilterGraph;
use super::node::{ExposedParam, GroupData, NodeId, NodeKind, NodeState};

/// Deferred constructor for an exclusively-owned group member.
pub type MemberFactory =
    Box<dyn FnOnce() -> Result<Box<dyn FilterWithParams + Send>, FilterError> + Send>;

/// Position of a member inside a [`GroupBuilder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemberRef(usize);

impl MemberRef {
    /// Zero-based position in acquisition order.
    pub fn index(self) -> usize {
        self.0
    }
}

enum MemberSlot {
    Allocate(MemberFactory),
    Nested(GroupBuilder),
    Share(NodeId),
}

struct ExposeRequest {
    member: MemberRef,
    index: usize,
    name: &'static str,
    string_id: &'static str,
}

/// Construction-time description of a composite group.
///
/// Members are acquired in the order they are added, and released in the
/// reverse order when the group is freed.
pub struct GroupBuilder {
    name: &'static str,
    slots: Vec<MemberSlot>,
    edges: Vec<(MemberRef, MemberRef)>,
    entry: Option<MemberRef>,
    terminal: Option<MemberRef>,
    exposed: Vec<ExposeRequest>,
}

impl GroupBuilder {
    /// Starts an empty group description.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            slots: Vec::new(),
            edges: Vec::new(),
            entry: None,
            terminal: None,
            exposed: Vec::new(),
        }
    }

    /// Adds an exclusively-owned member from an already constructed filter.
    pub fn filter(&mut self, filter: Box<dyn FilterWithParams + Send>) -> MemberRef {
        self.allocate(move || Ok(filter))
    }

    /// Adds an exclusively-owned member constructed when the group is built.
    ///
    /// A factory error fails the build with [`GraphError::AllocationFailure`].
    pub fn allocate<F>(&mut self, factory: F) -> MemberRef
    where
        F: FnOnce() -> Result<Box<dyn FilterWithParams + Send>, FilterError> + Send + 'static,
    {
        self.push(MemberSlot::Allocate(Box::new(factory)))
    }

    /// Adds a nested group, built (and owned) together with this one.
    pub fn group(&mut self, builder: GroupBuilder) -> MemberRef {
        self.push(MemberSlot::Nested(builder))
    }

    /// Adds an existing, ready node as a shared member.
    ///
    /// The group takes its own reference; the node stays alive until both the
    /// group and its other holders have let go.
    pub fn share(&mut self, node: NodeId) -> MemberRef {
        self.push(MemberSlot::Share(node))
    }

    /// Records a `from -> to` edge between members. Returns `to`, so calls chain
    /// linearly like [`FilterGraph::add_target()`].
    pub fn connect(&mut self, from: MemberRef, to: MemberRef) -> MemberRef {
        self.edges.push((from, to));
        to
    }

    /// Records edges between consecutive members.
    pub fn chain(&mut self, members: &[MemberRef]) -> &mut Self {
        for pair in members.windows(2) {
            self.connect(pair[0], pair[1]);
        }
        self
    }

    /// Sets the member that receives injected frames. Defaults to the first member.
    pub fn entry(&mut self, member: MemberRef) -> &mut Self {
        self.entry = Some(member);
        self
    }

    /// Sets the member whose targets are the group's targets.
    ///
    /// A group built without a terminal is incomplete: it rejects frames and
    /// outgoing edges until [`FilterGraph::set_terminal()`] is called.
    pub fn terminal(&mut self, member: MemberRef) -> &mut Self {
        self.terminal = Some(member);
        self
    }

    /// Re-publishes parameter `index` of `member` as the next group parameter.
    pub fn expose_param(
        &mut self,
        member: MemberRef,
        index: usize,
        name: &'static str,
        string_id: &'static str,
    ) -> &mut Self {
        self.exposed.push(ExposeRequest {
            member,
            index,
            name,
            string_id,
        });
        self
    }

    /// Number of members added so far.
    pub fn member_count(&self) -> usize {
        self.slots.len()
    }

    /// The group's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    fn push(&mut self, slot: MemberSlot) -> MemberRef {
        self.slots.push(slot);
        MemberRef(self.slots.len() - 1)
    }

    fn validate(&self, graph: &FilterGraph) -> Result<(), GraphError> {
        let len = self.slots.len();
        if len == 0 {
            return Err(GraphError::InvalidGroup(format!("group '{}' has no members", self.name)));
        }

        let refs = self
            .edges
            .iter()
            .flat_map(|&(a, b)| [a, b])
            .chain(self.entry)
            .chain(self.terminal)
            .chain(self.exposed.iter().map(|e| e.member));
        for member in refs {
            if member.0 >= len {
                return Err(GraphError::InvalidGroup(format!(
                    "group '{}' refers to member #{} but has {len}",
                    self.name, member.0
                )));
            }
        }

        let mut shared: Vec<NodeId> = Vec::new();
        for slot in &self.slots {
            if let MemberSlot::Share(id) = *slot {
                let node = graph.node(id)?;
                if node.state != NodeState::Ready {
                    return Err(GraphError::NotInitialized(id));
                }
                if shared.contains(&id) {
                    return Err(GraphError::InvalidGroup(format!(
                        "group '{}' shares {id} twice",
                        self.name
                    )));
                }
                shared.push(id);
            }
        }
        Ok(())
    }
}

impl FilterGraph {
    /// Builds a composite group and returns its ID.
    ///
    /// Members are acquired in builder order (allocated, built, or retained),
    /// newly allocated ones are initialized, internal edges are wired with
    /// [`add_target()`](Self::add_target), and exposed parameters are checked.
    /// The group starts `Ready` with one reference held by the caller.
    ///
    /// # Errors
    ///
    /// Any member allocation, initialization or wiring failure fails the whole
    /// build. Edges wired so far are removed and every acquired member is
    /// released in reverse order, so exclusively-owned members are freed and
    /// shared members return to their previous reference count.
    pub fn build_group(&mut self, builder: GroupBuilder) -> Result<NodeId, GraphError> {
        builder.validate(self)?;

        let GroupBuilder {
            name,
            slots,
            edges,
            entry,
            terminal,
            exposed,
        } = builder;

        let mut acquired: Vec<NodeId> = Vec::with_capacity(slots.len());
        let mut wired: Vec<(NodeId, NodeId)> = Vec::with_capacity(edges.len());

        // Phase 1: acquire members.
        for (index, slot) in slots.into_iter().enumerate() {
            let result = match slot {
                MemberSlot::Allocate(factory) => factory()
                    .map(|filter| self.add_filter(filter))
                    .map_err(|source| GraphError::AllocationFailure { index, source }),
                MemberSlot::Nested(nested) => self.build_group(nested),
                MemberSlot::Share(id) => self.retain(id).map(|_| id),
            };
            match result {
                Ok(id) => acquired.push(id),
                Err(err) => return Err(self.rollback(name, &wired, &acquired, err)),
            }
        }

        // Phase 2: initialize what was allocated.
        for &member in &acquired {
            if let Err(err) = self.init_node(member) {
                return Err(self.rollback(name, &wired, &acquired, err));
            }
        }

        // Phase 3: internal wiring.
        for (from, to) in edges {
            let (from, to) = (acquired[from.0], acquired[to.0]);
            match self.add_target(from, to) {
                Ok(_) => wired.push((from, to)),
                Err(err) => return Err(self.rollback(name, &wired, &acquired, err)),
            }
        }

        // Phase 4: entry, terminal, exposed parameters.
        let entry = acquired[entry.map_or(0, |m| m.0)];
        let terminal = terminal.map(|m| acquired[m.0]);
        let mut params = Vec::with_capacity(exposed.len());
        let resolved = self.resolve_entry(entry).and_then(|_| match terminal {
            Some(t) => self.resolve_terminal(t).map(|_| ()),
            None => Ok(()),
        });
        if let Err(err) = resolved {
            return Err(self.rollback(name, &wired, &acquired, err));
        }
        for request in exposed {
            let member = acquired[request.member.0];
            match self.param_info(member, request.index) {
                Ok(desc) => params.push(ExposedParam {
                    member,
                    index: request.index,
                    name: request.name,
                    short_name: desc.short_name,
                    string_id: request.string_id,
                }),
                Err(err) => return Err(self.rollback(name, &wired, &acquired, err)),
            }
        }

        // Phase 5: publish. Member references transfer to the group.
        let id = self.insert_node(
            NodeKind::Group(GroupData {
                name,
                members: acquired,
                entry,
                terminal,
                exposed: params,
            }),
            NodeState::Ready,
        );
        #[cfg(feature = "tracing")]
        tracing::debug!(group = %id, name, "group_build");
        Ok(id)
    }

    /// Undoes a partial build and hands back the error that caused it.
    fn rollback(
        &mut self,
        name: &'static str,
        wired: &[(NodeId, NodeId)],
        acquired: &[NodeId],
        err: GraphError,
    ) -> GraphError {
        #[cfg(feature = "tracing")]
        tracing::debug!(name, error = %err, members = acquired.len(), "group_rollback");
        #[cfg(not(feature = "tracing"))]
        let _ = name;

        self.unwire_all(wired);
        for &member in acquired.iter().rev() {
            self.drop_reference(member);
        }
        err
    }

    /// Designates `member` as the terminal of `group`.
    ///
    /// Edges already added through the group stay on the previous terminal;
    /// only later [`add_target()`](Self::add_target) calls are redirected to
    /// the new one.
    pub fn set_terminal(&mut self, group: NodeId, member: NodeId) -> Result<(), GraphError> {
        let data = self.group_data(group)?;
        if !data.members.contains(&member) {
            return Err(GraphError::NotAMember { group, member });
        }
        if self.is_group(member) {
            self.resolve_terminal(member)?;
        }
        if let NodeKind::Group(data) = &mut self.node_mut(group)?.kind {
            data.terminal = Some(member);
        }
        Ok(())
    }

    /// Follows entry designations down to the leaf that receives frames
    /// delivered to `id`. A leaf resolves to itself.
    pub fn resolve_entry(&self, id: NodeId) -> Result<NodeId, GraphError> {
        self.resolve(id, |group, _| Ok(group.entry))
    }

    /// Follows terminal designations down to the leaf whose targets are the
    /// outputs of `id`. A leaf resolves to itself.
    ///
    /// # Errors
    ///
    /// [`GraphError::IncompleteGroup`] if a group on the way has no terminal.
    pub fn resolve_terminal(&self, id: NodeId) -> Result<NodeId, GraphError> {
        self.resolve(id, |group, current| {
            group.terminal.ok_or(GraphError::IncompleteGroup(current))
        })
    }

    /// Members of a group in acquisition order.
    pub fn members(&self, group: NodeId) -> Result<&[NodeId], GraphError> {
        Ok(&self.group_data(group)?.members)
    }

    /// The entry member of a group (one level, not resolved).
    pub fn entry_of(&self, group: NodeId) -> Result<NodeId, GraphError> {
        Ok(self.group_data(group)?.entry)
    }

    /// The terminal member of a group (one level, not resolved), if designated.
    pub fn terminal_of(&self, group: NodeId) -> Result<Option<NodeId>, GraphError> {
        Ok(self.group_data(group)?.terminal)
    }

    pub(super) fn group_data(&self, id: NodeId) -> Result<&GroupData, GraphError> {
        match &self.node(id)?.kind {
            NodeKind::Group(data) => Ok(data),
            NodeKind::Leaf(_) => Err(GraphError::NotAGroup(id)),
        }
    }

    fn resolve<F>(&self, id: NodeId, mut step: F) -> Result<NodeId, GraphError>
    where
        F: FnMut(&GroupData, NodeId) -> Result<NodeId, GraphError>,
    {
        let mut current = id;
        // Group nesting is acyclic by construction, so any chain longer than
        // the arena means corrupted state.
        for _ in 0..=self.nodes.len() {
            match &self.node(current)?.kind {
                NodeKind::Leaf(_) => return Ok(current),
                NodeKind::Group(group) => current = step(group, current)?,
            }
        }
        Err(GraphError::CycleDetected {
            from: id,
            to: current,
        })
    }
}
