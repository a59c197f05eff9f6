//! Error types
//!
//! None of these escape the engine: they mark the inert paths (no shadow
//! root yet, unrecognized mode) and are logged where they are swallowed.

use shade_dom::{DomError, NodeId};

/// Result type for synchronization steps
pub type Result<T> = std::result::Result<T, SyncError>;

/// Synchronization errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// Element has no open shadow root to inject into
    #[error("element {0:?} has no open shadow root")]
    NoShadowRoot(NodeId),

    /// Underlying DOM operation failed
    #[error("DOM operation failed: {0}")]
    Dom(#[from] DomError),
}

/// Mode attribute parsing error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModeError {
    #[error("unrecognized style mode: {0:?}")]
    Unrecognized(String),
}
