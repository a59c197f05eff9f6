//! Tracked-element set
//!
//! Insertion-ordered, duplicate-free. Ids of destroyed elements are pruned
//! before every resync pass.

use shade_dom::{DomTree, NodeId};

#[derive(Debug, Clone, Default)]
pub(crate) struct TrackedElements {
    elements: Vec<NodeId>,
}

impl TrackedElements {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns false if already tracked
    pub(crate) fn insert(&mut self, element: NodeId) -> bool {
        if self.elements.contains(&element) {
            return false;
        }
        self.elements.push(element);
        true
    }

    pub(crate) fn remove(&mut self, element: NodeId) -> bool {
        let before = self.elements.len();
        self.elements.retain(|&e| e != element);
        before != self.elements.len()
    }

    pub(crate) fn contains(&self, element: NodeId) -> bool {
        self.elements.contains(&element)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.elements.iter().copied()
    }

    /// Forget elements that no longer exist in `tree`
    pub(crate) fn prune(&mut self, tree: &DomTree) -> usize {
        let before = self.elements.len();
        self.elements.retain(|&e| tree.contains(e));
        before - self.elements.len()
    }
}
