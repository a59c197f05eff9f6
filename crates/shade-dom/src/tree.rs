//! DOM Tree (generational arena)
//!
//! Nodes live in a slot arena with a free list. Freeing a slot bumps its
//! generation so stale `NodeId`s stop resolving instead of aliasing the
//! next node that reuses the slot.
//!
//! Mutating operations here are crate-private and unobserved; `Document`
//! wraps them with mutation records and custom element reactions.

use crate::node::{ElementData, Node, NodeData, ShadowRootData};
use crate::operations::{DomError, DomResult};
use crate::shadow::ShadowRootMode;
use crate::NodeId;

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena-based DOM tree
#[derive(Debug, Default)]
pub struct DomTree {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    live: usize,
}

impl DomTree {
    /// Create a new empty DOM tree
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        self.live += 1;
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId::from_raw_parts(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot { generation: 0, node: Some(node) });
            NodeId::from_raw_parts(index, 0)
        }
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if !id.is_valid() {
            return None;
        }
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if !id.is_valid() {
            return None;
        }
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut())
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    /// Whether `id` still names a live node
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes in the tree
    pub fn len(&self) -> usize {
        self.live
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    // --- Creation ---

    pub(crate) fn create_document(&mut self) -> NodeId {
        self.alloc(Node::new(NodeData::Document))
    }

    pub(crate) fn create_element(&mut self, name: &str) -> NodeId {
        self.alloc(Node::new(NodeData::Element(ElementData::new(name))))
    }

    pub(crate) fn create_text(&mut self, content: &str) -> NodeId {
        self.alloc(Node::new(NodeData::Text(content.to_string())))
    }

    pub(crate) fn create_comment(&mut self, content: &str) -> NodeId {
        self.alloc(Node::new(NodeData::Comment(content.to_string())))
    }

    /// Allocate a shadow root and link it to `host`
    pub(crate) fn create_shadow_root(
        &mut self,
        host: NodeId,
        mode: ShadowRootMode,
    ) -> DomResult<NodeId> {
        let elem = self.node(host)?.as_element().ok_or(DomError::InvalidNodeType)?;
        if elem.shadow_root.is_valid() {
            return Err(DomError::NotSupported("shadow root already attached"));
        }
        let root = self.alloc(Node::new(NodeData::ShadowRoot(ShadowRootData { host, mode })));
        if let Some(elem) = self.get_mut(host).and_then(Node::as_element_mut) {
            elem.shadow_root = root;
        }
        Ok(root)
    }

    // --- Navigation ---

    /// Parent node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent.or_none())
    }

    /// First child
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.first_child.or_none())
    }

    /// Last child
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.last_child.or_none())
    }

    /// Next sibling
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling.or_none())
    }

    /// Previous sibling
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling.or_none())
    }

    /// Iterate over the children of a node
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE),
        }
    }

    /// Element data for `id`
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    /// Shadow root attached to `host`, whatever its mode
    pub fn shadow_root_of(&self, host: NodeId) -> Option<NodeId> {
        self.element(host).and_then(ElementData::shadow_root)
    }

    /// Host of a shadow root
    pub fn host_of(&self, shadow_root: NodeId) -> Option<NodeId> {
        self.get(shadow_root)
            .and_then(Node::as_shadow_root)
            .map(|s| s.host)
    }

    /// Root of the tree containing `id` (does not cross shadow boundaries)
    pub fn root_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Root reached by walking parents and shadow hosts
    pub fn shadow_including_root(&self, id: NodeId) -> NodeId {
        let mut root = self.root_of(id);
        while let Some(host) = self.host_of(root) {
            root = self.root_of(host);
        }
        root
    }

    /// Check `ancestor` is `node` or one of its ancestors in the same tree
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Like `is_inclusive_ancestor`, but continues from a shadow root to its host
    pub fn is_host_including_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id).or_else(|| self.host_of(id));
        }
        false
    }

    /// Descendants of `root` in document order, excluding `root` and
    /// without entering shadow trees
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = Vec::new();
        self.push_children_rev(root, &mut stack);
        while let Some(id) = stack.pop() {
            out.push(id);
            self.push_children_rev(id, &mut stack);
        }
        out
    }

    /// `root` and its descendants in shadow-including preorder: a host's
    /// shadow tree is visited right after the host, before its children
    pub fn shadow_including_inclusive_descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(root) {
            return out;
        }
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            self.push_children_rev(id, &mut stack);
            if let Some(shadow) = self.shadow_root_of(id) {
                stack.push(shadow);
            }
        }
        out
    }

    fn push_children_rev(&self, id: NodeId, stack: &mut Vec<NodeId>) {
        let mut child = self.last_child(id);
        while let Some(c) = child {
            stack.push(c);
            child = self.prev_sibling(c);
        }
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.get(id).and_then(Node::character_data) {
            return text.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|d| self.get(d).and_then(Node::as_text))
            .collect()
    }

    // --- Mutation (unobserved) ---

    /// Validate an insertion of `child` into `parent` before `reference`
    pub(crate) fn check_insert(
        &self,
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
    ) -> DomResult<()> {
        if !self.node(parent)?.is_container() {
            return Err(DomError::HierarchyRequest);
        }
        match self.node(child)?.data {
            NodeData::Document | NodeData::ShadowRoot(_) => {
                return Err(DomError::HierarchyRequest);
            }
            _ => {}
        }
        if self.is_host_including_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }
        if reference.is_valid() && self.node(reference)?.parent != parent {
            return Err(DomError::NotAChild);
        }
        Ok(())
    }

    /// Link a detached `child` into `parent` before `reference` (NONE appends)
    pub(crate) fn link_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        let prev = if reference.is_valid() {
            self.get(reference).map(|n| n.prev_sibling).unwrap_or(NodeId::NONE)
        } else {
            self.get(parent).map(|n| n.last_child).unwrap_or(NodeId::NONE)
        };

        if let Some(node) = self.get_mut(child) {
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = reference;
        }

        if let Some(prev_node) = self.get_mut(prev) {
            prev_node.next_sibling = child;
        } else if let Some(parent_node) = self.get_mut(parent) {
            parent_node.first_child = child;
        }

        if let Some(ref_node) = self.get_mut(reference) {
            ref_node.prev_sibling = child;
        } else if let Some(parent_node) = self.get_mut(parent) {
            parent_node.last_child = child;
        }
    }

    /// Unlink `child` from its parent, leaving it a detached root
    pub(crate) fn unlink(&mut self, child: NodeId) {
        let Some(node) = self.get(child) else { return };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }

        if let Some(prev_node) = self.get_mut(prev) {
            prev_node.next_sibling = next;
        } else if let Some(parent_node) = self.get_mut(parent) {
            parent_node.first_child = next;
        }

        if let Some(next_node) = self.get_mut(next) {
            next_node.prev_sibling = prev;
        } else if let Some(parent_node) = self.get_mut(parent) {
            parent_node.last_child = prev;
        }

        if let Some(node) = self.get_mut(child) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    pub(crate) fn set_character_data(&mut self, id: NodeId, content: &str) -> DomResult<String> {
        match self.get_mut(id).map(|n| &mut n.data) {
            Some(NodeData::Text(t)) | Some(NodeData::Comment(t)) => {
                Ok(std::mem::replace(t, content.to_string()))
            }
            Some(_) => Err(DomError::InvalidNodeType),
            None => Err(DomError::NotFound(id)),
        }
    }

    pub(crate) fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        self.get_mut(id)
            .ok_or(DomError::NotFound(id))?
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType)
    }

    /// Copy a node (and with `deep`, its children) into a new detached tree.
    /// Shadow roots are never copied.
    pub(crate) fn clone_subtree(&mut self, id: NodeId, deep: bool) -> DomResult<NodeId> {
        let data = match &self.node(id)?.data {
            NodeData::Document | NodeData::ShadowRoot(_) => {
                return Err(DomError::NotSupported("node cannot be cloned"));
            }
            NodeData::Element(elem) => {
                let mut elem = elem.clone();
                elem.shadow_root = NodeId::NONE;
                NodeData::Element(elem)
            }
            other => other.clone(),
        };
        let copy = self.alloc(Node::new(data));

        if deep {
            let children: Vec<NodeId> = self.children(id).collect();
            for child in children {
                let child_copy = self.clone_subtree(child, true)?;
                self.link_before(copy, child_copy, NodeId::NONE);
            }
        }
        Ok(copy)
    }

    /// Free `id`, its descendants and any shadow trees below it
    pub(crate) fn free(&mut self, id: NodeId) {
        let doomed = self.shadow_including_inclusive_descendants(id);
        self.unlink(id);
        for node in doomed {
            let slot = &mut self.slots[node.index() as usize];
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free_list.push(node.index());
                self.live -= 1;
            }
        }
    }
}

/// Iterator over a node's children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next.or_none()?;
        self.next = self.tree.get(current).map(|n| n.next_sibling).unwrap_or(NodeId::NONE);
        Some(current)
    }
}
