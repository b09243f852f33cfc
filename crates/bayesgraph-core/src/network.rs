//! Network-level metadata carried alongside the graph.
//!
//! The name and property strings are opaque here; they are stored, edited
//! and copied into the flat model untouched.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub name: String,
    pub properties: Vec<String>,
}

impl NetworkInfo {
    pub fn new(name: impl Into<String>) -> Self {
        NetworkInfo {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn add_property(&mut self, property: impl Into<String>) {
        self.properties.push(property.into());
    }

    /// Removes and returns the property at `index`, or `None` if out of range.
    pub fn remove_property(&mut self, index: usize) -> Option<String> {
        if index < self.properties.len() {
            Some(self.properties.remove(index))
        } else {
            None
        }
    }
}
