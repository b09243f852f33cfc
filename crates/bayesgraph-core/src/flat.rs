//! The flat exported form of a network.
//!
//! [`FlatModel`] is the contract surface toward serialization and inference
//! code: two index-aligned sequences where `variables[i]` and `functions[i]`
//! describe the same node. It is plain data, fully separate from the graph
//! it was exported from.

use serde::{Deserialize, Serialize};

use crate::id::VariableId;

/// One random variable: identity, name, ordered values and properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDescriptor {
    pub id: VariableId,
    pub name: String,
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<String>,
}

/// One probability function: its dependency order and its table handle.
///
/// `dependencies[0]` is the owning variable, the rest are its parents in
/// table order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDescriptor<T> {
    pub dependencies: Vec<VariableId>,
    pub table: T,
}

impl<T> FunctionDescriptor<T> {
    /// The variable this function belongs to.
    pub fn variable(&self) -> Option<VariableId> {
        self.dependencies.first().copied()
    }

    /// The parent variables, in table order.
    pub fn parents(&self) -> &[VariableId] {
        self.dependencies.get(1..).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatModel<T> {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<String>,
    pub variables: Vec<VariableDescriptor>,
    pub functions: Vec<FunctionDescriptor<T>>,
}

impl<T> FlatModel<T> {
    pub fn new(name: impl Into<String>) -> Self {
        FlatModel {
            name: name.into(),
            properties: Vec::new(),
            variables: Vec::new(),
            functions: Vec::new(),
        }
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Looks up a variable by name.
    pub fn variable(&self, name: &str) -> Option<&VariableDescriptor> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Index of the first function whose first dependency is `variable`.
    pub fn function_index_for(&self, variable: VariableId) -> Option<usize> {
        self.functions
            .iter()
            .position(|f| f.variable() == Some(variable))
    }

    /// The first function whose first dependency is `variable`.
    pub fn function_for(&self, variable: VariableId) -> Option<&FunctionDescriptor<T>> {
        self.function_index_for(variable)
            .map(|idx| &self.functions[idx])
    }

    /// Iterates `(variable, function)` pairs by position.
    pub fn entries(&self) -> impl Iterator<Item = (&VariableDescriptor, &FunctionDescriptor<T>)> {
        self.variables.iter().zip(self.functions.iter())
    }
}
