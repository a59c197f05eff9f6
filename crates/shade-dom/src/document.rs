//! Document - High-level document API
//!
//! Every tree mutation made through `Document` queues mutation records for
//! interested observers and runs custom element reactions for nodes whose
//! connectedness changed.

use std::rc::Rc;

use crate::custom_elements::{CustomElement, CustomElementError, CustomElementRegistry, LifecycleCallback};
use crate::event_loop::EventLoop;
use crate::observer::{MutationCallback, MutationObserverInit, MutationRecord, ObserverId, ObserverRegistry};
use crate::shadow::{PlatformAttacher, ShadowAttacher, ShadowRootInit, ShadowRootMode};
use crate::{DomError, DomResult, DomTree, NodeId};

/// HTML Document
pub struct Document {
    /// The DOM tree
    pub(crate) tree: DomTree,
    /// Document node
    root: NodeId,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    event_loop: EventLoop,
    observers: ObserverRegistry,
    /// A notification microtask is already queued
    mutation_notify_queued: bool,
    registry: CustomElementRegistry,
    attacher: Rc<dyn ShadowAttacher>,
}

impl Document {
    /// Create a new document with `<html>`, `<head>` and `<body>`
    pub fn new() -> Self {
        let mut doc = Self::empty();
        let tree = &mut doc.tree;

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        tree.link_before(doc.root, html, NodeId::NONE);
        tree.link_before(html, head, NodeId::NONE);
        tree.link_before(html, body, NodeId::NONE);

        doc.html_element = html;
        doc.head_element = head;
        doc.body_element = body;
        doc
    }

    /// Create an empty document (no structure)
    pub fn empty() -> Self {
        let mut tree = DomTree::new();
        let root = tree.create_document();
        Self {
            tree,
            root,
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            event_loop: EventLoop::new(),
            observers: ObserverRegistry::default(),
            mutation_notify_queued: false,
            registry: CustomElementRegistry::new(),
            attacher: Rc::new(PlatformAttacher),
        }
    }

    /// Locate `<html>`, `<head>` and `<body>` after building the tree by hand
    pub fn finalize(&mut self) {
        fn find(tree: &DomTree, parent: NodeId, name: &str) -> NodeId {
            tree.children(parent)
                .find(|&c| tree.element(c).is_some_and(|e| e.has_name(name)))
                .unwrap_or(NodeId::NONE)
        }

        self.html_element = find(&self.tree, self.root, "html");
        self.head_element = find(&self.tree, self.html_element, "head");
        self.body_element = find(&self.tree, self.html_element, "body");
    }

    /// Document node
    pub fn document_node(&self) -> NodeId {
        self.root
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn event_loop(&self) -> &EventLoop {
        &self.event_loop
    }

    pub fn custom_elements(&self) -> &CustomElementRegistry {
        &self.registry
    }

    // --- Node creation ---

    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.tree.create_element(name)
    }

    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.tree.create_text(content)
    }

    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.tree.create_comment(content)
    }

    /// Copy a node; with `deep`, its descendants too. Shadow roots are not copied.
    pub fn clone_node(&mut self, node: NodeId, deep: bool) -> DomResult<NodeId> {
        self.tree.clone_subtree(node, deep)
    }

    // --- Attributes ---

    pub fn get_attribute(&self, element: NodeId, name: &str) -> Option<&str> {
        self.tree.element(element).and_then(|e| e.get_attr(name))
    }

    pub fn has_attribute(&self, element: NodeId, name: &str) -> bool {
        self.tree.element(element).is_some_and(|e| e.has_attr(name))
    }

    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) -> DomResult<()> {
        let old = self.tree.element_mut(element)?.set_attr(name, value);
        self.queue_mutation_record(MutationRecord::attributes(element, name, old));
        Ok(())
    }

    /// Remove an attribute; only an existing attribute produces a record
    pub fn remove_attribute(&mut self, element: NodeId, name: &str) -> DomResult<Option<String>> {
        let old = self.tree.element_mut(element)?.remove_attr(name);
        if old.is_some() {
            self.queue_mutation_record(MutationRecord::attributes(element, name, old.clone()));
        }
        Ok(old)
    }

    // --- Tree mutation ---

    /// Append a child node
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Insert before a reference node (`None` appends). A child that already
    /// has a parent is removed from it first.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        let mut reference = reference.unwrap_or(NodeId::NONE);
        if reference == child {
            reference = self.tree.next_sibling(child).unwrap_or(NodeId::NONE);
        }
        self.tree.check_insert(parent, child, reference)?;

        if self.tree.parent(child).is_some() {
            self.remove(child)?;
        }

        let previous_sibling = if reference.is_valid() {
            self.tree.prev_sibling(reference)
        } else {
            self.tree.last_child(parent)
        };
        self.tree.link_before(parent, child, reference);
        self.queue_mutation_record(MutationRecord::child_list(
            parent,
            vec![child],
            Vec::new(),
            previous_sibling,
            reference.or_none(),
        ));

        if self.is_connected(child) {
            let nodes = self.tree.shadow_including_inclusive_descendants(child);
            self.run_reactions(nodes, LifecycleCallback::Connected);
        }
        Ok(child)
    }

    /// Insert `nodes` in order before the current first child of `parent`.
    /// Each insertion produces its own record.
    pub fn prepend(&mut self, parent: NodeId, nodes: &[NodeId]) -> DomResult<()> {
        let first = self.tree.first_child(parent);
        for &node in nodes {
            self.insert_before(parent, node, first)?;
        }
        Ok(())
    }

    /// Detach `node` from its parent; a detached node is left alone
    pub fn remove(&mut self, node: NodeId) -> DomResult<()> {
        if !self.tree.contains(node) {
            return Err(DomError::NotFound(node));
        }
        let Some(parent) = self.tree.parent(node) else {
            return Ok(());
        };

        let was_connected = self.is_connected(node);
        let previous_sibling = self.tree.prev_sibling(node);
        let next_sibling = self.tree.next_sibling(node);
        self.tree.unlink(node);
        self.queue_mutation_record(MutationRecord::child_list(
            parent,
            Vec::new(),
            vec![node],
            previous_sibling,
            next_sibling,
        ));

        if was_connected {
            let nodes = self.tree.shadow_including_inclusive_descendants(node);
            self.run_reactions(nodes, LifecycleCallback::Disconnected);
        }
        Ok(())
    }

    /// Replace the data of a text or comment node
    pub fn set_text(&mut self, node: NodeId, content: &str) -> DomResult<()> {
        let old = self.tree.set_character_data(node, content)?;
        self.queue_mutation_record(MutationRecord::character_data(node, old));
        Ok(())
    }

    /// Remove `node` if attached, then free it with its descendants and
    /// shadow trees. Ids held elsewhere stop resolving.
    pub fn destroy(&mut self, node: NodeId) -> DomResult<()> {
        match self.tree.get(node).map(|n| &n.data) {
            None => return Err(DomError::NotFound(node)),
            Some(crate::NodeData::Document) | Some(crate::NodeData::ShadowRoot(_)) => {
                return Err(DomError::NotSupported("node cannot be destroyed directly"));
            }
            Some(_) => {}
        }
        self.remove(node)?;
        self.tree.free(node);
        Ok(())
    }

    /// Whether the node's shadow-including root is this document
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.tree.contains(node) && self.tree.shadow_including_root(node) == self.root
    }

    // --- Shadow DOM ---

    /// Attach a shadow root through the current attacher
    pub fn attach_shadow(&mut self, host: NodeId, init: ShadowRootInit) -> DomResult<NodeId> {
        let attacher = Rc::clone(&self.attacher);
        attacher.attach(self, host, &init)
    }

    /// Open shadow root of `host`; closed roots are not exposed here
    pub fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        let root = self.tree.shadow_root_of(host)?;
        match self.tree.get(root)?.as_shadow_root()?.mode {
            ShadowRootMode::Open => Some(root),
            ShadowRootMode::Closed => None,
        }
    }

    /// Current shadow root attacher
    pub fn shadow_attacher(&self) -> Rc<dyn ShadowAttacher> {
        Rc::clone(&self.attacher)
    }

    /// Install a new attacher, returning the one it replaces
    pub fn set_shadow_attacher(&mut self, attacher: Rc<dyn ShadowAttacher>) -> Rc<dyn ShadowAttacher> {
        std::mem::replace(&mut self.attacher, attacher)
    }

    // --- Mutation observers ---

    pub fn create_mutation_observer(&mut self, callback: MutationCallback) -> ObserverId {
        self.observers.create(callback)
    }

    pub fn observe(
        &mut self,
        observer: ObserverId,
        target: NodeId,
        options: MutationObserverInit,
    ) -> DomResult<()> {
        if !self.tree.contains(target) {
            return Err(DomError::NotFound(target));
        }
        if !self.observers.observe(observer, target, options) {
            return Err(DomError::NotSupported("unknown mutation observer"));
        }
        Ok(())
    }

    /// Stop observing all targets and drop queued records
    pub fn disconnect_observer(&mut self, observer: ObserverId) {
        self.observers.disconnect(observer);
    }

    /// Drop an observer and its callback
    pub fn remove_mutation_observer(&mut self, observer: ObserverId) -> bool {
        self.observers.remove(observer)
    }

    /// Take queued records without waiting for delivery
    pub fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord> {
        self.observers.take_records(observer)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn queue_mutation_record(&mut self, record: MutationRecord) {
        if self.observers.queue(&self.tree, &record) && !self.mutation_notify_queued {
            self.mutation_notify_queued = true;
            self.queue_microtask(|doc| doc.notify_mutation_observers());
        }
    }

    fn notify_mutation_observers(&mut self) {
        self.mutation_notify_queued = false;
        for id in self.observers.pending() {
            let Some((records, mut callback)) = self.observers.begin_delivery(id) else {
                continue;
            };
            tracing::trace!("Delivering {} mutation records to {:?}", records.len(), id);
            callback(&records, self);
            self.observers.end_delivery(id, callback);
        }
    }

    // --- Microtasks ---

    /// Queue a microtask
    pub fn queue_microtask(&mut self, task: impl FnOnce(&mut Document) + 'static) {
        self.event_loop.queue_microtask(Box::new(task));
    }

    /// Run queued microtasks until the queue is empty, including ones queued
    /// along the way. Returns how many ran; a nested call returns 0.
    pub fn perform_microtask_checkpoint(&mut self) -> usize {
        if !self.event_loop.begin_checkpoint() {
            return 0;
        }
        let mut ran = 0;
        while let Some(task) = self.event_loop.next_microtask() {
            task(self);
            ran += 1;
        }
        self.event_loop.end_checkpoint();
        ran
    }

    // --- Custom elements ---

    /// Define a custom element and upgrade matching connected elements
    pub fn define(
        &mut self,
        name: &str,
        behavior: Rc<dyn CustomElement>,
    ) -> Result<(), CustomElementError> {
        self.registry.define(name, behavior)?;
        tracing::debug!("Defined custom element <{}>", name);

        let upgrades: Vec<NodeId> = self.tree
            .shadow_including_inclusive_descendants(self.root)
            .into_iter()
            .filter(|&id| self.tree.element(id).is_some_and(|e| e.name == name))
            .collect();
        self.run_reactions(upgrades, LifecycleCallback::Connected);
        Ok(())
    }

    fn run_reactions(&mut self, nodes: Vec<NodeId>, callback: LifecycleCallback) {
        for node in nodes {
            let Some(name) = self.tree.element(node).map(|e| e.name.clone()) else {
                continue;
            };
            let Some(behavior) = self.registry.get(&name) else {
                continue;
            };
            let result = match callback {
                LifecycleCallback::Connected => behavior.connected(self, node),
                LifecycleCallback::Disconnected => behavior.disconnected(self, node),
            };
            if let Err(err) = result {
                tracing::warn!("{:?} callback of <{}> failed: {}", callback, name, err);
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
