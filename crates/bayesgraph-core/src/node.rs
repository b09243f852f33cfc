//! The node stored in each arena slot.
//!
//! A [`Node`] is one random variable: its name, its ordered domain, its
//! ordered parent list, free-form properties and the distribution handle
//! built for its current structure. Children are not stored here; they are
//! the outgoing arcs of the arena, kept in step with `parents` by
//! [`BayesGraph`](crate::graph::BayesGraph).

use smallvec::SmallVec;

use crate::distribution::Distribution;
use crate::id::{NodeId, VariableId};

/// Label of the single value a newly created variable has.
pub const DEFAULT_VALUE: &str = "value";

#[derive(Debug, Clone)]
pub struct Node<T> {
    pub(crate) variable: VariableId,
    pub(crate) name: String,
    pub(crate) domain: Vec<String>,
    /// Order is significant: it fixes the positional layout of the table.
    pub(crate) parents: SmallVec<[NodeId; 4]>,
    pub(crate) properties: Vec<String>,
    pub(crate) distribution: Distribution<T>,
}

impl<T> Node<T> {
    pub(crate) fn new(
        variable: VariableId,
        name: String,
        domain: Vec<String>,
        properties: Vec<String>,
        distribution: Distribution<T>,
    ) -> Self {
        Node {
            variable,
            name,
            domain,
            parents: SmallVec::new(),
            properties,
            distribution,
        }
    }

    /// Identity of the variable in the flat exported form.
    pub fn variable(&self) -> VariableId {
        self.variable
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered value labels.
    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    /// Number of values the variable can take.
    pub fn cardinality(&self) -> usize {
        self.domain.len()
    }

    /// Parents in table order.
    pub fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    pub fn has_parent(&self, parent: NodeId) -> bool {
        self.parents.contains(&parent)
    }

    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    pub fn distribution(&self) -> &Distribution<T> {
        &self.distribution
    }
}
