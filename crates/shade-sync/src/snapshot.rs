//! Style Snapshot
//!
//! The ordered list of style sources currently found in the shared scope.

use shade_dom::{Document, DomTree, NodeId};

/// Whether `node` is a `<style>` or a `<link rel="stylesheet">`
pub(crate) fn is_style_source(tree: &DomTree, node: NodeId) -> bool {
    let Some(element) = tree.element(node) else {
        return false;
    };
    if element.has_name("style") {
        return true;
    }
    element.has_name("link")
        && element
            .get_attr("rel")
            .is_some_and(|rel| rel.eq_ignore_ascii_case("stylesheet"))
}

/// Style sources below `scope` in document order, keeping only those with
/// `marker` when one is given
pub(crate) fn collect(doc: &Document, scope: NodeId, marker: Option<&str>) -> Vec<NodeId> {
    let tree = doc.tree();
    tree.descendants(scope)
        .into_iter()
        .filter(|&node| is_style_source(tree, node))
        .filter(|&node| marker.is_none_or(|name| doc.has_attribute(node, name)))
        .collect()
}

#[derive(Debug, Clone, Default)]
pub(crate) struct StyleSnapshot {
    nodes: Vec<NodeId>,
}

impl StyleSnapshot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Recompute from `scope`, replacing the previous list wholesale
    pub(crate) fn refresh(&mut self, doc: &Document, scope: NodeId, marker: Option<&str>) {
        self.nodes = collect(doc, scope, marker);
        tracing::trace!("Style snapshot holds {} sources", self.nodes.len());
    }

    pub(crate) fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }
}
