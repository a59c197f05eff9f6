//! Shadow DOM
//!
//! Shadow root modes and the attach entry point. Shadow root creation goes
//! through a replaceable [`ShadowAttacher`] so embedders can decorate it
//! once at startup.

use crate::{Document, DomResult, NodeId};

/// Shadow root mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowRootMode {
    #[default]
    Open,
    Closed,
}

/// Shadow root initialization options
#[derive(Debug, Clone, Default)]
pub struct ShadowRootInit {
    pub mode: ShadowRootMode,
}

impl ShadowRootInit {
    pub fn open() -> Self {
        Self { mode: ShadowRootMode::Open }
    }

    pub fn closed() -> Self {
        Self { mode: ShadowRootMode::Closed }
    }
}

/// Shadow root creation entry point
///
/// `Document::attach_shadow` always dispatches through the document's
/// current attacher. Decorators hold the attacher they replaced and
/// delegate to it.
pub trait ShadowAttacher {
    fn attach(&self, doc: &mut Document, host: NodeId, init: &ShadowRootInit) -> DomResult<NodeId>;
}

/// Default attacher: creates the shadow root in the document's tree
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformAttacher;

impl ShadowAttacher for PlatformAttacher {
    fn attach(&self, doc: &mut Document, host: NodeId, init: &ShadowRootInit) -> DomResult<NodeId> {
        let root = doc.tree.create_shadow_root(host, init.mode)?;
        tracing::trace!("Attached {:?} shadow root {:?} to {:?}", init.mode, root, host);
        Ok(root)
    }
}
