//! Error types for bayesgraph-core.
//!
//! Uses `thiserror` for structured, matchable variants. Only conditions that
//! abort an operation live here: a duplicate arc or a taken name are ordinary
//! outcomes and come back as `Ok(false)` / `None` from the graph methods.

use crate::id::{NodeId, VariableId};
use thiserror::Error;

/// Errors produced by the bayesgraph-core crate.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A node id does not name a live node in the graph.
    #[error("node not found: NodeId({id})", id = id.0)]
    NodeNotFound { id: NodeId },

    /// A flat model variable has no function whose first dependency is it.
    #[error("inconsistent flat model: variable '{variable}' has no probability function")]
    InconsistentModel { variable: String },

    /// Two variables in a flat model share the same id.
    #[error("inconsistent flat model: VariableId({id}) is declared twice", id = id.0)]
    DuplicateVariable { id: VariableId },

    /// Two variables in a flat model share the same (sanitized) name.
    #[error("duplicate variable name: '{name}'")]
    DuplicateName { name: String },

    /// The dependency arcs of a flat model contain a directed cycle.
    #[error("inconsistent flat model: dependency cycle through '{variable}'")]
    CyclicModel { variable: String },

    /// A variable was given an empty list of values.
    #[error("variable '{name}' must have at least one value")]
    EmptyDomain { name: String },

    /// The arc would close a directed cycle. Only raised when acyclicity is
    /// enforced through [`GraphConfig`](crate::config::GraphConfig).
    #[error("arc {parent} -> {child} would create a cycle")]
    WouldCycle { parent: String, child: String },

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}
