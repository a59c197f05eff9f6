//! DOM Node Operations
//!
//! Error type shared by appendChild, removeChild, insertBefore, cloneNode
//! and attachShadow.

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node not found (destroyed or never allocated)
    #[error("Node not found: {0:?}")]
    NotFound(NodeId),
    /// Hierarchy error (e.g., inserting an ancestor into its descendant)
    #[error("Hierarchy request error")]
    HierarchyRequest,
    /// Invalid node type for the operation
    #[error("Invalid node type")]
    InvalidNodeType,
    /// Reference node is not a child of the parent
    #[error("Node is not a child")]
    NotAChild,
    /// Operation not supported on this node (e.g., second shadow root)
    #[error("Operation not supported: {0}")]
    NotSupported(&'static str),
}
