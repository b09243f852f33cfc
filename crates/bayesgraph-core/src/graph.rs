//! BayesGraph: the editable structure of a Bayesian network.
//!
//! [`BayesGraph`] is the single entry point for building and editing a
//! network. It owns every node, their parent/child arcs, and a flat exported
//! copy of the whole model that is refreshed after each mutation.
//!
//! # Storage
//!
//! Nodes live in a `StableGraph` arena addressed by [`NodeId`]. An arc
//! `parent -> child` is an arena edge; the child's ordered parent list is
//! kept in the node itself because its order fixes the table layout. Both
//! are always updated together, so they stay mutual inverses. Graph order
//! (insertion order minus deletions) is tracked separately because arena
//! slots are recycled.
//!
//! # Mutation protocol
//!
//! Every public mutation validates its arguments first, then applies, in
//! order: the adjacency change, a table resync for each affected node, and
//! one refresh of the flat model. Holding `&mut self` for the whole call
//! means no caller can observe anything in between.

use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableGraph;
use petgraph::Directed;
use petgraph::Direction::Outgoing;

use crate::config::GraphConfig;
use crate::cycle;
use crate::distribution::{current_layout, Distribution, TableFactory, TableLayout};
use crate::error::GraphError;
use crate::flat::{FlatModel, FunctionDescriptor, VariableDescriptor};
use crate::id::{NodeId, VariableId};
use crate::names;
use crate::network::NetworkInfo;
use crate::node::{Node, DEFAULT_VALUE};

/// The arena type: nodes carry their data, arcs carry nothing.
pub(crate) type Dag<T> = StableGraph<Node<T>, (), Directed, u32>;

#[derive(Debug, Clone)]
pub struct BayesGraph<F: TableFactory> {
    pub(crate) dag: Dag<F::Table>,
    /// Graph order. Determines the position of each node in the flat model.
    order: IndexSet<NodeId>,
    network: NetworkInfo,
    exported: FlatModel<F::Table>,
    pub(crate) factory: F,
    config: GraphConfig,
    /// Next variable id handed to a created node, unless a live node
    /// already holds it.
    next_variable: u32,
}

impl<F: TableFactory> BayesGraph<F> {
    /// Creates an empty network with the default configuration.
    pub fn new(factory: F) -> Self {
        Self::with_config(GraphConfig::default(), factory)
    }

    /// Creates an empty network.
    pub fn with_config(config: GraphConfig, factory: F) -> Self {
        let network = NetworkInfo::new(config.network_name.clone());
        BayesGraph {
            dag: StableGraph::default(),
            order: IndexSet::new(),
            exported: FlatModel::new(network.name.clone()),
            network,
            factory,
            config,
            next_variable: 0,
        }
    }

    /// Builds a network from a flat model with the default configuration.
    pub fn from_flat(model: FlatModel<F::Table>, factory: F) -> Result<Self, GraphError> {
        Self::from_flat_with_config(model, GraphConfig::default(), factory)
    }

    /// Builds a network from a flat model.
    ///
    /// Each variable is paired with the first function whose first
    /// dependency is that variable; functions no variable claims are
    /// ignored. Parents come from each function's remaining dependencies, in
    /// order. The whole model is validated before anything is built, and an
    /// error leaves nothing behind.
    pub fn from_flat_with_config(
        model: FlatModel<F::Table>,
        config: GraphConfig,
        factory: F,
    ) -> Result<Self, GraphError> {
        // Pass 0: validate and pair every variable with its function.
        let mut seen_ids = HashSet::new();
        let mut seen_names = HashSet::new();
        let mut pairing = Vec::with_capacity(model.variables.len());
        for variable in &model.variables {
            if !seen_ids.insert(variable.id) {
                return Err(GraphError::DuplicateVariable { id: variable.id });
            }
            let sanitized = names::validate_value(&variable.name);
            if variable.values.is_empty() {
                return Err(GraphError::EmptyDomain { name: sanitized });
            }
            if !seen_names.insert(sanitized.clone()) {
                return Err(GraphError::DuplicateName { name: sanitized });
            }
            let function = model.function_index_for(variable.id).ok_or_else(|| {
                GraphError::InconsistentModel {
                    variable: variable.name.clone(),
                }
            })?;
            pairing.push(function);
        }

        let FlatModel {
            name,
            properties,
            variables,
            functions,
        } = model;

        let mut graph = BayesGraph::with_config(config, factory);
        graph.network = NetworkInfo { name, properties };

        // Pass 1: one node per variable/function pair.
        let mut functions: Vec<Option<FunctionDescriptor<F::Table>>> =
            functions.into_iter().map(Some).collect();
        let mut by_variable = HashMap::with_capacity(variables.len());
        let mut declared = Vec::with_capacity(variables.len());
        for (variable, function_idx) in variables.into_iter().zip(pairing) {
            let Some(function) = functions[function_idx].take() else {
                // Unreachable: variable ids are unique and each function has
                // a single first dependency.
                return Err(GraphError::InconsistentModel {
                    variable: variable.name,
                });
            };
            // Provisional layout; settled once parents are known.
            let layout = TableLayout::new(vec![variable.id], vec![variable.values.len()]);
            let node = Node::new(
                variable.id,
                names::validate_value(&variable.name),
                variable.values,
                variable.properties,
                Distribution::new(layout, function.table),
            );
            let id = NodeId::from(graph.dag.add_node(node));
            graph.order.insert(id);
            by_variable.insert(variable.id, id);
            declared.push((id, function.dependencies));
            graph.next_variable = graph.next_variable.max(variable.id.0.saturating_add(1));
        }

        // Pass 2: parents and children from dependency order.
        for (id, dependencies) in &declared {
            for dependency in dependencies.iter().skip(1) {
                let parent = match by_variable.get(dependency) {
                    Some(&parent) if parent != *id => parent,
                    _ => {
                        tracing::warn!(
                            node = %graph.node_name(*id),
                            dependency = %dependency,
                            "skipping dependency that names no other variable"
                        );
                        continue;
                    }
                };
                if graph.dag[NodeIndex::from(*id)].has_parent(parent) {
                    tracing::warn!(
                        node = %graph.node_name(*id),
                        dependency = %dependency,
                        "skipping repeated dependency"
                    );
                    continue;
                }
                graph.dag[NodeIndex::from(*id)].parents.push(parent);
                graph.dag.add_edge(parent.into(), (*id).into(), ());
            }
        }

        if let Err(cycle) = petgraph::algo::toposort(&graph.dag, None) {
            return Err(GraphError::CyclicModel {
                variable: graph.node_name(cycle.node_id().into()).to_string(),
            });
        }

        // Pass 3: settle layouts. Supplied tables are kept when the declared
        // dependencies survived intact; otherwise the table is rebuilt.
        for (id, dependencies) in declared {
            let Some(layout) = current_layout(&graph.dag, id) else {
                continue;
            };
            if layout.dependencies() == dependencies.as_slice() {
                graph.dag[NodeIndex::from(id)].distribution.layout = layout;
            } else {
                graph.resync(id);
            }
        }

        graph.refresh_export();
        tracing::debug!(
            network = %graph.network.name,
            nodes = graph.node_count(),
            arcs = graph.arc_count(),
            "imported flat model"
        );

        #[cfg(debug_assertions)]
        graph.assert_consistency();

        Ok(graph)
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Looks up a node by ID.
    pub fn node(&self, id: NodeId) -> Option<&Node<F::Table>> {
        self.dag.node_weight(id.into())
    }

    /// Looks up a node by its exact name.
    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.order
            .iter()
            .copied()
            .find(|&id| self.node_name(id) == name)
    }

    /// Node IDs in graph order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order.iter().copied()
    }

    /// Nodes in graph order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node<F::Table>)> + '_ {
        self.order
            .iter()
            .filter_map(|&id| self.dag.node_weight(id.into()).map(|node| (id, node)))
    }

    /// Position of a node in graph order (and in the flat model).
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.order.get_index_of(&id)
    }

    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    pub fn arc_count(&self) -> usize {
        self.dag.edge_count()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.order.contains(&id)
    }

    /// Parents of `id` in table order. Empty if the node does not exist.
    pub fn parents(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::parents).unwrap_or(&[])
    }

    /// Children of `id`, listed in graph order. Empty if the node does not
    /// exist.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut children: Vec<NodeId> = self
            .dag
            .neighbors_directed(id.into(), Outgoing)
            .map(NodeId::from)
            .collect();
        children.sort_by_key(|child| self.position(*child));
        children
    }

    /// Whether the arc `parent -> child` exists.
    pub fn has_arc(&self, parent: NodeId, child: NodeId) -> bool {
        self.node(child).is_some_and(|node| node.has_parent(parent))
    }

    /// Whether adding `parent -> child` would close a directed cycle.
    ///
    /// Advisory: [`create_arc`](Self::create_arc) does not run this check
    /// unless [`GraphConfig::enforce_acyclic`] is set.
    pub fn would_cycle(&self, parent: NodeId, child: NodeId) -> Result<bool, GraphError> {
        self.ensure(parent)?;
        self.ensure(child)?;
        Ok(cycle::would_cycle(&self.dag, parent, child))
    }

    // -----------------------------------------------------------------------
    // Names
    // -----------------------------------------------------------------------

    /// Replaces spaces with underscores.
    pub fn validate_value(&self, value: &str) -> String {
        names::validate_value(value)
    }

    /// Returns the sanitized name if no node uses it, `None` otherwise.
    pub fn check_name(&self, value: &str) -> Option<String> {
        names::check_name(value, &self.taken_names())
    }

    fn taken_names(&self) -> HashSet<&str> {
        self.dag.node_weights().map(Node::name).collect()
    }

    /// Hands out the counter's id, or the smallest id no live node uses
    /// once the counter runs into an id that is already taken.
    fn allocate_variable(&mut self) -> VariableId {
        let live: HashSet<VariableId> = self.dag.node_weights().map(Node::variable).collect();
        let mut variable = VariableId(self.next_variable);
        if live.contains(&variable) {
            // At most `u32::MAX` nodes fit in the arena, so a free id exists.
            variable = (0..=u32::MAX)
                .map(VariableId)
                .find(|v| !live.contains(v))
                .unwrap_or(variable);
        }
        self.next_variable = variable.0.saturating_add(1);
        variable
    }

    fn node_name(&self, id: NodeId) -> &str {
        self.node(id).map(Node::name).unwrap_or("<missing>")
    }

    // -----------------------------------------------------------------------
    // Network metadata
    // -----------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.network.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.network.name = name.into();
        self.exported.name = self.network.name.clone();
    }

    pub fn network_properties(&self) -> &[String] {
        &self.network.properties
    }

    pub fn set_network_properties(&mut self, properties: Vec<String>) {
        self.network.properties = properties;
        self.exported.properties = self.network.properties.clone();
    }

    pub fn add_network_property(&mut self, property: impl Into<String>) {
        self.network.add_property(property);
        self.exported.properties = self.network.properties.clone();
    }

    /// Removes the network property at `index`; `None` if out of range.
    pub fn remove_network_property(&mut self, index: usize) -> Option<String> {
        let removed = self.network.remove_property(index);
        self.exported.properties = self.network.properties.clone();
        removed
    }

    // -----------------------------------------------------------------------
    // Structural mutations
    // -----------------------------------------------------------------------

    /// Adds a node with a generated name, one value and no arcs.
    pub fn create_node(&mut self) -> NodeId {
        let name = names::generate_name(0, &self.taken_names());
        let variable = self.allocate_variable();

        let domain = vec![DEFAULT_VALUE.to_string()];
        let layout = TableLayout::new(vec![variable], vec![domain.len()]);
        let table = self.factory.create(&layout);
        let node = Node::new(
            variable,
            name,
            domain,
            Vec::new(),
            Distribution::new(layout, table),
        );
        let id = NodeId::from(self.dag.add_node(node));
        self.order.insert(id);

        tracing::debug!(node = %self.node_name(id), id = %id, "created node");
        self.refresh_export();

        #[cfg(debug_assertions)]
        self.assert_consistency();

        id
    }

    /// Adds the arc `parent -> child`.
    ///
    /// Returns `Ok(false)` without changing anything if `parent` already is
    /// a parent of `child`. Only the child's table is rebuilt; gaining a
    /// dependent does not change the parent's table.
    ///
    /// Cycles are the caller's concern: query [`would_cycle`](Self::would_cycle)
    /// first. With [`GraphConfig::enforce_acyclic`] set, a cyclic arc is
    /// refused with [`GraphError::WouldCycle`] instead.
    pub fn create_arc(&mut self, parent: NodeId, child: NodeId) -> Result<bool, GraphError> {
        self.ensure(parent)?;
        self.ensure(child)?;

        if self.has_arc(parent, child) {
            return Ok(false);
        }
        if self.config.enforce_acyclic && cycle::would_cycle(&self.dag, parent, child) {
            return Err(GraphError::WouldCycle {
                parent: self.node_name(parent).to_string(),
                child: self.node_name(child).to_string(),
            });
        }

        self.dag.add_edge(parent.into(), child.into(), ());
        self.dag[NodeIndex::from(child)].parents.push(parent);

        tracing::debug!(
            parent = %self.node_name(parent),
            child = %self.node_name(child),
            "created arc"
        );
        self.resync(child);
        self.refresh_export();

        #[cfg(debug_assertions)]
        self.assert_consistency();

        Ok(true)
    }

    /// Removes the arc `parent -> child` if present and rebuilds the child's
    /// table.
    pub fn delete_arc(&mut self, parent: NodeId, child: NodeId) -> Result<(), GraphError> {
        self.ensure(parent)?;
        self.ensure(child)?;

        if let Some(edge) = self.dag.find_edge(parent.into(), child.into()) {
            self.dag.remove_edge(edge);
        }
        self.dag[NodeIndex::from(child)].parents.retain(|p| *p != parent);

        tracing::debug!(
            parent = %self.node_name(parent),
            child = %self.node_name(child),
            "deleted arc"
        );
        self.resync(child);
        self.refresh_export();

        #[cfg(debug_assertions)]
        self.assert_consistency();

        Ok(())
    }

    /// Removes a node and every arc touching it, rebuilding the tables of
    /// its former children. Returns the removed node.
    ///
    /// The ID becomes invalid; its arena slot may be reused by a later
    /// [`create_node`](Self::create_node).
    pub fn delete_node(&mut self, id: NodeId) -> Result<Node<F::Table>, GraphError> {
        self.ensure(id)?;

        let children = self.children(id);
        for &child in &children {
            self.dag[NodeIndex::from(child)].parents.retain(|p| *p != id);
            self.resync(child);
        }

        // Removing the arena node drops its arcs to parents and children.
        let node = self
            .dag
            .remove_node(id.into())
            .ok_or(GraphError::NodeNotFound { id })?;
        self.order.shift_remove(&id);

        tracing::debug!(node = %node.name(), children = children.len(), "deleted node");
        self.refresh_export();

        #[cfg(debug_assertions)]
        self.assert_consistency();

        Ok(node)
    }

    /// Replaces the value labels of a variable.
    ///
    /// With the same number of values only the labels change and no table is
    /// touched. Otherwise the node's table and those of its direct children
    /// are rebuilt.
    pub fn change_domain(&mut self, id: NodeId, values: Vec<String>) -> Result<(), GraphError> {
        self.ensure(id)?;
        if values.is_empty() {
            return Err(GraphError::EmptyDomain {
                name: self.node_name(id).to_string(),
            });
        }

        let resized = self.dag[NodeIndex::from(id)].cardinality() != values.len();
        self.dag[NodeIndex::from(id)].domain = values;

        if resized {
            tracing::debug!(
                node = %self.node_name(id),
                cardinality = self.dag[NodeIndex::from(id)].cardinality(),
                "resized domain"
            );
            self.resync(id);
            for child in self.children(id) {
                self.resync(child);
            }
        } else {
            tracing::debug!(node = %self.node_name(id), "relabeled domain");
        }
        self.refresh_export();

        #[cfg(debug_assertions)]
        self.assert_consistency();

        Ok(())
    }

    /// Renames a node after sanitizing the name.
    ///
    /// Returns the applied name, or `Ok(None)` if another node (or this one)
    /// already uses it.
    pub fn rename_node(&mut self, id: NodeId, name: &str) -> Result<Option<String>, GraphError> {
        self.ensure(id)?;
        let Some(name) = self.check_name(name) else {
            return Ok(None);
        };

        let old = std::mem::replace(&mut self.dag[NodeIndex::from(id)].name, name.clone());
        tracing::debug!(from = %old, to = %name, "renamed node");
        self.refresh_export();

        #[cfg(debug_assertions)]
        self.assert_consistency();

        Ok(Some(name))
    }

    /// Replaces the free-form properties of a node.
    pub fn set_node_properties(
        &mut self,
        id: NodeId,
        properties: Vec<String>,
    ) -> Result<(), GraphError> {
        self.ensure(id)?;
        self.dag[NodeIndex::from(id)].properties = properties;
        self.refresh_export();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Flat model
    // -----------------------------------------------------------------------

    /// The flat model as of the last mutation.
    pub fn flat_model(&self) -> &FlatModel<F::Table> {
        &self.exported
    }

    /// Builds a fresh flat model from the current graph, one entry per node
    /// in graph order.
    pub fn export(&self) -> FlatModel<F::Table> {
        let (variables, functions): (Vec<_>, Vec<_>) = self
            .nodes()
            .map(|(_, node)| {
                let variable = VariableDescriptor {
                    id: node.variable(),
                    name: node.name().to_string(),
                    values: node.domain().to_vec(),
                    properties: node.properties().to_vec(),
                };
                let function = FunctionDescriptor {
                    dependencies: node.distribution().layout().dependencies().to_vec(),
                    table: node.distribution().table().clone(),
                };
                (variable, function)
            })
            .unzip();

        FlatModel {
            name: self.network.name.clone(),
            properties: self.network.properties.clone(),
            variables,
            functions,
        }
    }

    fn refresh_export(&mut self) {
        self.exported = self.export();
        tracing::trace!(variables = self.exported.len(), "refreshed flat model");
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn ensure(&self, id: NodeId) -> Result<(), GraphError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(GraphError::NodeNotFound { id })
        }
    }

    // -----------------------------------------------------------------------
    // Debug consistency assertion
    // -----------------------------------------------------------------------

    /// Verifies graph order, arc symmetry, table layouts, name uniqueness and
    /// the flat model against the arena.
    ///
    /// Only called in debug builds (via `cfg(debug_assertions)`).
    #[cfg(debug_assertions)]
    fn assert_consistency(&self) {
        assert_eq!(
            self.order.len(),
            self.dag.node_count(),
            "graph order and arena disagree on node count"
        );

        let mut seen = HashSet::new();
        for (id, node) in self.nodes() {
            assert!(seen.insert(node.name()), "duplicate node name {:?}", node.name());

            for &parent in node.parents() {
                assert!(
                    self.dag.find_edge(parent.into(), id.into()).is_some(),
                    "node {:?} lists parent {:?} without an arc",
                    node.name(),
                    parent
                );
            }
            for child in self.dag.neighbors_directed(id.into(), Outgoing) {
                assert!(
                    self.dag[child].has_parent(id),
                    "arc from {:?} to {:?} missing from parent list",
                    node.name(),
                    self.dag[child].name()
                );
            }

            let expected = current_layout(&self.dag, id);
            assert_eq!(
                Some(node.distribution().layout()),
                expected.as_ref(),
                "stale table layout on {:?}",
                node.name()
            );
        }

        assert_eq!(self.exported.variables.len(), self.order.len());
        assert_eq!(self.exported.functions.len(), self.order.len());
    }
}
