//! Style synchronizer entry point

use std::rc::Rc;

use shade_dom::{CustomElement, Document, NodeId, ShadowAttacher};

use crate::attach::TrackingAttacher;
use crate::config::SyncConfig;
use crate::lifecycle::OpenStylable;
use crate::mode::StyleMode;
use crate::sync::{Shared, SyncState};
use crate::watcher;

/// Installed style synchronizer for one document
pub struct StyleSync {
    shared: Shared,
    /// Our decorator and the attacher it replaced (push modes)
    attacher: Option<(Rc<dyn ShadowAttacher>, Rc<dyn ShadowAttacher>)>,
}

impl StyleSync {
    /// Install with default attribute names, scoped to `<head>`
    pub fn install(doc: &mut Document) -> Self {
        Self::install_with(doc, SyncConfig::default())
    }

    /// Read the mode from the document element and wire the synchronizer
    /// into `doc`. An absent or unrecognized mode installs nothing.
    pub fn install_with(doc: &mut Document, config: SyncConfig) -> Self {
        let mode = resolve_mode(doc, &config);
        let scope = config.scope.unwrap_or_else(|| doc.head());
        let shared = SyncState::new(config, mode, scope).into_shared();
        let mut sync = Self { shared, attacher: None };

        let Some(mode) = mode else {
            return sync;
        };
        if !doc.tree().contains(scope) {
            tracing::warn!("Style scope {:?} does not exist, style sync inert", scope);
            return sync;
        }

        sync.shared.borrow_mut().refresh_snapshot(doc);
        if let Err(err) = watcher::watch(doc, &sync.shared) {
            tracing::warn!("Failed to observe style scope: {}", err);
        }

        if mode.is_push() {
            let previous = doc.shadow_attacher();
            let ours: Rc<dyn ShadowAttacher> =
                Rc::new(TrackingAttacher::new(Rc::clone(&previous), Rc::clone(&sync.shared)));
            doc.set_shadow_attacher(Rc::clone(&ours));
            sync.attacher = Some((ours, previous));
        }

        tracing::info!(
            "Style sync installed in {} mode ({} sources)",
            mode,
            sync.shared.borrow().snapshot().len()
        );
        sync
    }

    /// Active mode, `None` when inert
    pub fn mode(&self) -> Option<StyleMode> {
        self.shared.borrow().mode()
    }

    /// Wrap a custom element behaviour with the lifecycle adapter
    pub fn open_stylable<B: CustomElement + ?Sized>(&self, inner: Rc<B>) -> Rc<OpenStylable<B>> {
        Rc::new(OpenStylable::new(Rc::clone(&self.shared), inner))
    }

    pub fn is_tracked(&self, element: NodeId) -> bool {
        self.shared.borrow().tracked().contains(element)
    }

    /// Tracked elements in insertion order
    pub fn tracked(&self) -> Vec<NodeId> {
        self.shared.borrow().tracked().iter().collect()
    }

    /// Current style sources in injection order
    pub fn snapshot(&self) -> Vec<NodeId> {
        self.shared.borrow().snapshot().nodes().to_vec()
    }

    /// Nodes injected into `element`'s shadow root
    pub fn managed_nodes(&self, doc: &Document, element: NodeId) -> Vec<NodeId> {
        self.shared.borrow().managed_nodes(doc, element)
    }

    /// Run a watcher pass now instead of waiting for a mutation
    pub fn resync(&self, doc: &mut Document) {
        if self.mode().is_some() {
            self.shared.borrow_mut().resync(doc);
        }
    }

    /// Stop observing the scope and restore the previous shadow attacher.
    /// Injected nodes stay where they are.
    pub fn uninstall(self, doc: &mut Document) {
        watcher::unwatch(doc, &self.shared);

        if let Some((ours, previous)) = self.attacher {
            if Rc::ptr_eq(&doc.shadow_attacher(), &ours) {
                doc.set_shadow_attacher(previous);
            } else {
                tracing::warn!("Shadow attacher was replaced after install, leaving it in place");
            }
        }
        tracing::debug!("Style sync uninstalled");
    }
}

fn resolve_mode(doc: &Document, config: &SyncConfig) -> Option<StyleMode> {
    let value = doc.get_attribute(doc.document_element(), &config.mode_attribute)?;
    match value.parse::<StyleMode>() {
        Ok(mode) => Some(mode),
        Err(err) => {
            tracing::warn!("{}, style sync inert", err);
            None
        }
    }
}

impl std::fmt::Debug for StyleSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleSync")
            .field("state", &self.shared)
            .field("intercepting", &self.attacher.is_some())
            .finish()
    }
}
