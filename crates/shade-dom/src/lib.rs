//! shade DOM - Document Object Model
//!
//! Arena-backed DOM tree with the platform pieces the style synchronizer
//! consumes: shadow roots, mutation observers, a microtask queue and custom
//! element lifecycle reactions.

mod node;
mod tree;
mod operations;
mod document;
mod shadow;
mod observer;
mod event_loop;
mod custom_elements;
mod weak;

pub use node::{Node, NodeData, ElementData, Attribute, ShadowRootData};
pub use tree::{Children, DomTree};
pub use operations::{DomError, DomResult};
pub use document::Document;
pub use shadow::{ShadowRootMode, ShadowRootInit, ShadowAttacher, PlatformAttacher};
pub use observer::{
    MutationCallback, MutationObserverInit, MutationRecord, MutationType, ObserverId,
};
pub use event_loop::{EventLoop, Microtask};
pub use custom_elements::{
    CallbackError, CustomElement, CustomElementError, CustomElementRegistry, LifecycleCallback,
};
pub use weak::WeakNodeMap;

/// Node identifier (generational index into the arena)
///
/// A freed slot bumps its generation, so an id held past its node's
/// destruction never resolves to whatever reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Null node
    pub const NONE: NodeId = NodeId { index: u32::MAX, generation: 0 };

    /// Build an id from its raw parts
    pub const fn from_raw_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Arena slot index
    #[inline]
    pub fn index(self) -> u32 {
        self.index
    }

    /// Slot generation this id was issued for
    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }

    /// Check this is not the null node
    #[inline]
    pub fn is_valid(self) -> bool {
        self.index != u32::MAX
    }

    #[inline]
    pub(crate) fn or_none(self) -> Option<NodeId> {
        if self.is_valid() { Some(self) } else { None }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::NONE
    }
}
