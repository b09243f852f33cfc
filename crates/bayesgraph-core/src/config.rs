//! Graph construction settings.
//!
//! [`GraphConfig`] can be built in code, parsed from JSON, or read from the
//! environment:
//! - `BAYESGRAPH_NETWORK_NAME`: name given to new networks (default: "InternalNetwork")
//! - `BAYESGRAPH_ENFORCE_ACYCLIC`: reject cyclic arcs inside `create_arc` (default: off)

use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// Name given to a network that was not imported from a flat model.
pub const DEFAULT_NETWORK_NAME: &str = "InternalNetwork";

const NETWORK_NAME_VAR: &str = "BAYESGRAPH_NETWORK_NAME";
const ENFORCE_ACYCLIC_VAR: &str = "BAYESGRAPH_ENFORCE_ACYCLIC";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Name of a freshly created network.
    pub network_name: String,
    /// When set, `create_arc` runs the cycle check itself and returns
    /// [`GraphError::WouldCycle`] instead of adding the arc. Off by default:
    /// callers are expected to query `would_cycle` first.
    pub enforce_acyclic: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        GraphConfig {
            network_name: DEFAULT_NETWORK_NAME.to_string(),
            enforce_acyclic: false,
        }
    }
}

impl GraphConfig {
    /// Reads overrides from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = GraphConfig::default();
        if let Ok(name) = std::env::var(NETWORK_NAME_VAR) {
            config.network_name = name;
        }
        if let Ok(flag) = std::env::var(ENFORCE_ACYCLIC_VAR) {
            config.enforce_acyclic = parse_flag(&flag);
        }
        config
    }

    /// Parses a JSON object; missing fields take their defaults.
    pub fn from_json(source: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(source)?)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
