//! Structural core of a Bayesian network editor.
//!
//! [`BayesGraph`] owns a DAG of variable nodes and keeps three things in step
//! on every edit: the parent/child arcs, each node's distribution layout, and
//! a flat, index-aligned [`FlatModel`] that serialization and inference code
//! consume.
//!
//! # Modules
//!
//! - [`graph`]: the graph, its edits, and import/export of the flat model
//! - [`node`]: per-node data
//! - [`distribution`]: table layouts and the [`TableFactory`] capability
//! - [`cycle`]: the advisory cycle query for candidate arcs
//! - [`names`]: generated and sanitized node names
//! - [`flat`]: the flat exported form
//! - [`network`]: network name and properties
//! - [`config`]: construction settings
//! - [`error`]: [`GraphError`]

pub mod config;
pub mod cycle;
pub mod distribution;
pub mod error;
pub mod flat;
pub mod graph;
pub mod id;
pub mod names;
pub mod network;
pub mod node;

// Re-export commonly used types
pub use config::GraphConfig;
pub use distribution::{Distribution, LayoutOnly, SharedTable, SharedTables, TableFactory, TableLayout};
pub use error::GraphError;
pub use flat::{FlatModel, FunctionDescriptor, VariableDescriptor};
pub use graph::BayesGraph;
pub use id::{NodeId, VariableId};
pub use network::NetworkInfo;
pub use node::Node;
