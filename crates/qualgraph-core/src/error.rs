use crate::{CategoryId, NodeKey};
use thiserror::Error;

/// Ways a category/code hierarchy can fail to produce a drawable graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("Node {node} refers to parent category {parent}, which is not in the working set")]
    DanglingParent { node: NodeKey, parent: CategoryId },
    #[error("Node {node} is part of a parent cycle")]
    Cycle { node: NodeKey },
    #[error("{} node(s) could not be positioned: {}", .nodes.len(), format_keys(.nodes))]
    Unpositioned { nodes: Vec<NodeKey> },
    #[error("Subtree root {0} does not exist")]
    UnknownRoot(NodeKey),
}

fn format_keys(keys: &[NodeKey]) -> String {
    keys.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Failure reported by a [`crate::CodingStore`] implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct StoreError(pub String);

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Malformed hierarchy: {0}")]
    MalformedHierarchy(#[from] HierarchyError),
    #[error("Coding store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Could not save memo for {node}: {reason}")]
    MemoPersistFailure { node: NodeKey, reason: String },
    #[error("Node {0} is not on the canvas")]
    UnknownNode(NodeKey),
    #[error("Node {0} is not a code")]
    NotACode(NodeKey),
    #[error("Position for {0} is not a finite point")]
    NonFinitePosition(NodeKey),
}

impl GraphError {
    /// Layout and indexing errors abort the whole render pass.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GraphError::MalformedHierarchy(_) | GraphError::StoreUnavailable(_)
        )
    }
}

impl From<StoreError> for GraphError {
    fn from(err: StoreError) -> Self {
        GraphError::StoreUnavailable(err.0)
    }
}
