//! Anchor Registry
//!
//! Each synchronized shadow root gets two empty text nodes prepended to it.
//! Everything strictly between them belongs to the synchronizer. Pairs are
//! created on first use and cached per host, keyed weakly so a destroyed
//! host's entry stops resolving.

use shade_dom::{Document, DomTree, NodeId, WeakNodeMap};

use crate::error::{Result, SyncError};

/// Start/end markers of the managed region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AnchorPair {
    pub(crate) start: NodeId,
    pub(crate) end: NodeId,
}

#[derive(Debug, Default)]
pub(crate) struct AnchorRegistry {
    pairs: WeakNodeMap<AnchorPair>,
}

impl AnchorRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Cached pair for `host`, without creating one
    pub(crate) fn get(&self, doc: &Document, host: NodeId) -> Option<AnchorPair> {
        self.pairs.get(doc.tree(), host).copied()
    }

    /// Cached pair for `host`, prepending a fresh one to its open shadow
    /// root on first call
    pub(crate) fn get_or_create(&mut self, doc: &mut Document, host: NodeId) -> Result<AnchorPair> {
        if let Some(pair) = self.get(doc, host) {
            return Ok(pair);
        }

        let root = doc.shadow_root(host).ok_or(SyncError::NoShadowRoot(host))?;
        let pair = AnchorPair {
            start: doc.create_text(""),
            end: doc.create_text(""),
        };
        doc.prepend(root, &[pair.start, pair.end])?;
        self.pairs.insert(host, pair);

        tracing::trace!("Created anchors {:?} for {:?}", pair, host);
        Ok(pair)
    }

    /// Drop pairs of destroyed hosts
    pub(crate) fn prune(&mut self, tree: &DomTree) -> usize {
        self.pairs.prune(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shade_dom::ShadowRootInit;

    fn host_with_shadow(doc: &mut Document) -> (NodeId, NodeId) {
        let host = doc.create_element("x-card");
        let root = doc.attach_shadow(host, ShadowRootInit::open()).unwrap();
        (host, root)
    }

    #[test]
    fn test_anchors_prepended_once() {
        let mut doc = Document::new();
        let (host, root) = host_with_shadow(&mut doc);
        let content = doc.create_element("p");
        doc.append_child(root, content).unwrap();

        let mut registry = AnchorRegistry::new();
        let pair = registry.get_or_create(&mut doc, host).unwrap();
        let again = registry.get_or_create(&mut doc, host).unwrap();
        assert_eq!(pair, again);

        let children: Vec<_> = doc.tree().children(root).collect();
        assert_eq!(children, vec![pair.start, pair.end, content]);
        assert_eq!(doc.tree().text_content(pair.start), "");
    }

    #[test]
    fn test_missing_shadow_root() {
        let mut doc = Document::new();
        let host = doc.create_element("x-card");
        let mut registry = AnchorRegistry::new();

        assert_eq!(
            registry.get_or_create(&mut doc, host),
            Err(SyncError::NoShadowRoot(host))
        );
        assert!(registry.get(&doc, host).is_none());

        // Closed roots are not reachable either
        doc.attach_shadow(host, ShadowRootInit::closed()).unwrap();
        assert_eq!(
            registry.get_or_create(&mut doc, host),
            Err(SyncError::NoShadowRoot(host))
        );
    }

    #[test]
    fn test_destroyed_host_entry_pruned() {
        let mut doc = Document::new();
        let (host, _) = host_with_shadow(&mut doc);
        let mut registry = AnchorRegistry::new();
        registry.get_or_create(&mut doc, host).unwrap();

        doc.destroy(host).unwrap();
        assert!(registry.get(&doc, host).is_none());
        assert_eq!(registry.prune(doc.tree()), 1);
        assert_eq!(registry.prune(doc.tree()), 0);
    }
}
