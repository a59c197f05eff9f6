//! Lifecycle Adapter
//!
//! [`OpenStylable`] overlays style tracking on any custom element behaviour.
//! The wrapped hook always runs first and its result is returned unchanged,
//! but the overlay runs whether it succeeded or not.
//!
//! In pull modes a connected element is tracked and synced. If its shadow
//! root does not exist yet (it is commonly attached a microtask later), the
//! sync is deferred by one microtask and the element counts as delayed until
//! every deferred sync queued for it has run. A disconnect of a delayed
//! element defers its clear the same way, so the clear always lands after
//! the pending syncs.

use std::rc::Rc;

use shade_dom::{CallbackError, CustomElement, Document, NodeId};

use crate::sync::{log_skipped, Shared, SyncState};

pub struct OpenStylable<B: ?Sized> {
    shared: Shared,
    inner: Rc<B>,
}

impl<B: CustomElement + ?Sized> OpenStylable<B> {
    pub(crate) fn new(shared: Shared, inner: Rc<B>) -> Self {
        Self { shared, inner }
    }

    fn on_connected(&self, doc: &mut Document, element: NodeId) {
        let Ok(mut state) = self.shared.try_borrow_mut() else {
            tracing::warn!("Style sync busy, ignoring connect of {:?}", element);
            return;
        };
        if !state.is_pull() {
            return;
        }

        state.tracked.insert(element);
        if doc.shadow_root(element).is_some() {
            if let Err(err) = state.maybe_apply(doc, element) {
                log_skipped(element, &err);
            }
            return;
        }

        tracing::trace!("Deferring initial style sync of {:?}", element);
        state.defer_sync(element);
        drop(state);

        let shared = Rc::clone(&self.shared);
        doc.queue_microtask(move |doc| {
            let mut state = shared.borrow_mut();
            state.finish_deferred(element);
            if let Err(err) = state.maybe_apply(doc, element) {
                log_skipped(element, &err);
            }
        });
    }

    fn on_disconnected(&self, doc: &mut Document, element: NodeId) {
        let Ok(mut state) = self.shared.try_borrow_mut() else {
            tracing::warn!("Style sync busy, ignoring disconnect of {:?}", element);
            return;
        };
        if !state.is_pull() {
            return;
        }

        state.tracked.remove(element);
        if !state.is_delayed(doc.tree(), element) {
            clear_logged(&mut state, doc, element);
            return;
        }
        drop(state);

        let shared = Rc::clone(&self.shared);
        doc.queue_microtask(move |doc| {
            let mut state = shared.borrow_mut();
            clear_logged(&mut state, doc, element);
        });
    }
}

fn clear_logged(state: &mut SyncState, doc: &mut Document, element: NodeId) {
    if let Err(err) = state.clear(doc, element) {
        log_skipped(element, &err);
    }
}

impl<B: CustomElement + ?Sized> CustomElement for OpenStylable<B> {
    fn connected(&self, doc: &mut Document, element: NodeId) -> Result<(), CallbackError> {
        let result = self.inner.connected(doc, element);
        self.on_connected(doc, element);
        result
    }

    fn disconnected(&self, doc: &mut Document, element: NodeId) -> Result<(), CallbackError> {
        let result = self.inner.disconnected(doc, element);
        self.on_disconnected(doc, element);
        result
    }
}

impl<B: ?Sized> std::fmt::Debug for OpenStylable<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenStylable").finish_non_exhaustive()
    }
}
