//! Distribution handles and their structural resync.
//!
//! The numeric content of a probability table belongs to an external
//! collaborator. This module only tracks the *layout* each table was built
//! for (dependency order and cardinalities) and asks a [`TableFactory`] for a
//! fresh table whenever that layout changes.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::graph::{BayesGraph, Dag};
use crate::id::{NodeId, VariableId};

/// Dependency order and per-dependency cardinality of a table.
///
/// `dependencies[0]` is the variable the table belongs to; the remaining
/// entries are its parents in parent order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableLayout {
    dependencies: Vec<VariableId>,
    cardinalities: Vec<usize>,
}

impl TableLayout {
    /// Creates a layout. Both vectors are expected to have the same length.
    pub fn new(dependencies: Vec<VariableId>, cardinalities: Vec<usize>) -> Self {
        debug_assert_eq!(dependencies.len(), cardinalities.len());
        TableLayout {
            dependencies,
            cardinalities,
        }
    }

    pub fn dependencies(&self) -> &[VariableId] {
        &self.dependencies
    }

    pub fn cardinalities(&self) -> &[usize] {
        &self.cardinalities
    }

    /// The variable owning the table, if the layout is non-empty.
    pub fn variable(&self) -> Option<VariableId> {
        self.dependencies.first().copied()
    }

    /// Number of entries a dense table with this layout holds.
    pub fn size(&self) -> usize {
        self.cardinalities.iter().product()
    }
}

/// Produces tables for a given layout.
///
/// Implemented by whoever owns table semantics (inference, serialization).
/// Called once per node on creation and again after every structural change
/// touching that node; prior contents are never carried over.
pub trait TableFactory {
    type Table: Clone + fmt::Debug;

    fn create(&mut self, layout: &TableLayout) -> Self::Table;
}

/// A node's table together with the layout it was built for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution<T> {
    pub(crate) layout: TableLayout,
    table: T,
}

impl<T> Distribution<T> {
    pub fn new(layout: TableLayout, table: T) -> Self {
        Distribution { layout, table }
    }

    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    pub fn table(&self) -> &T {
        &self.table
    }
}

/// Dense table shared between the graph and its collaborators.
pub type SharedTable = Arc<RwLock<Vec<f64>>>;

/// Factory for zero-filled [`SharedTable`]s.
///
/// Cloning a handle out of the flat model shares content with the graph, so
/// a collaborator filling in probabilities is seen by every other holder.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedTables;

impl TableFactory for SharedTables {
    type Table = SharedTable;

    fn create(&mut self, layout: &TableLayout) -> SharedTable {
        Arc::new(RwLock::new(vec![0.0; layout.size()]))
    }
}

/// Factory for callers that only track structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutOnly;

impl TableFactory for LayoutOnly {
    type Table = ();

    fn create(&mut self, _layout: &TableLayout) {}
}

/// Computes the layout a node's table must have right now: the node itself
/// followed by its parents in order.
///
/// Returns `None` if `id` or one of its parents is not in the arena.
pub(crate) fn current_layout<T>(dag: &Dag<T>, id: NodeId) -> Option<TableLayout> {
    let node = dag.node_weight(id.into())?;
    let mut dependencies = Vec::with_capacity(node.parents().len() + 1);
    let mut cardinalities = Vec::with_capacity(node.parents().len() + 1);
    dependencies.push(node.variable());
    cardinalities.push(node.cardinality());
    for &parent in node.parents() {
        let parent = dag.node_weight(parent.into())?;
        dependencies.push(parent.variable());
        cardinalities.push(parent.cardinality());
    }
    Some(TableLayout::new(dependencies, cardinalities))
}

impl<F: TableFactory> BayesGraph<F> {
    /// Rebuilds `id`'s distribution for its current domain and parents,
    /// discarding the previous table.
    pub(crate) fn resync(&mut self, id: NodeId) {
        let Some(layout) = current_layout(&self.dag, id) else {
            return;
        };
        let table = self.factory.create(&layout);
        if let Some(node) = self.dag.node_weight_mut(id.into()) {
            tracing::trace!(node = %node.name(), size = layout.size(), "reinitialized distribution");
            node.distribution = Distribution::new(layout, table);
        }
    }
}
