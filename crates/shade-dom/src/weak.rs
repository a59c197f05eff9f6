//! Weak node collections
//!
//! Maps keyed by `NodeId` that only answer for nodes still alive in
//! a given tree. Entries never keep a node alive; dead entries are invisible
//! and can be dropped with `prune`.

use std::collections::HashMap;

use crate::{DomTree, NodeId};

/// Node-keyed map with non-owning keys
#[derive(Debug, Clone)]
pub struct WeakNodeMap<V> {
    entries: HashMap<NodeId, V>,
}

impl<V> Default for WeakNodeMap<V> {
    fn default() -> Self {
        Self { entries: HashMap::new() }
    }
}

impl<V> WeakNodeMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `node`, if the node is still alive
    pub fn get(&self, tree: &DomTree, node: NodeId) -> Option<&V> {
        if !tree.contains(node) {
            return None;
        }
        self.entries.get(&node)
    }

    pub fn insert(&mut self, node: NodeId, value: V) -> Option<V> {
        self.entries.insert(node, value)
    }

    pub fn remove(&mut self, node: NodeId) -> Option<V> {
        self.entries.remove(&node)
    }

    pub fn contains(&self, tree: &DomTree, node: NodeId) -> bool {
        self.get(tree, node).is_some()
    }

    /// Drop entries whose node has been destroyed
    pub fn prune(&mut self, tree: &DomTree) -> usize {
        let before = self.entries.len();
        self.entries.retain(|node, _| tree.contains(*node));
        before - self.entries.len()
    }

    /// Stored entries, including any not yet pruned
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;

    #[test]
    fn test_entries_vanish_with_node() {
        let mut doc = Document::new();
        let a = doc.create_element("x-a");
        let b = doc.create_element("x-b");

        let mut map = WeakNodeMap::new();
        map.insert(a, "anchors-a");
        map.insert(b, "anchors-b");
        assert_eq!(map.get(doc.tree(), a), Some(&"anchors-a"));

        doc.destroy(a).unwrap();
        assert_eq!(map.get(doc.tree(), a), None);
        assert_eq!(map.len(), 2);
        assert_eq!(map.prune(doc.tree()), 1);
        assert_eq!(map.len(), 1);
        assert!(map.contains(doc.tree(), b));
    }

    #[test]
    fn test_reused_slot_does_not_alias() {
        let mut doc = Document::new();
        let a = doc.create_element("x-a");
        let mut map = WeakNodeMap::new();
        assert_eq!(map.insert(a, 1), None);
        assert_eq!(map.insert(a, 2), Some(1));

        doc.destroy(a).unwrap();
        let c = doc.create_element("x-c");
        assert_eq!(a.index(), c.index());
        assert!(!map.contains(doc.tree(), c));
        assert!(!map.contains(doc.tree(), a));
    }
}
