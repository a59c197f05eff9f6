//! Global attach interception
//!
//! Push modes decorate the document's shadow-root attacher so that every
//! element attaching a shadow root gets tracked, whether or not its
//! definition uses the lifecycle adapter.

use std::rc::Rc;

use shade_dom::{Document, DomResult, NodeId, ShadowAttacher, ShadowRootInit};

use crate::sync::{log_skipped, Shared};

pub(crate) struct TrackingAttacher {
    inner: Rc<dyn ShadowAttacher>,
    shared: Shared,
}

impl TrackingAttacher {
    pub(crate) fn new(inner: Rc<dyn ShadowAttacher>, shared: Shared) -> Self {
        Self { inner, shared }
    }
}

impl ShadowAttacher for TrackingAttacher {
    fn attach(&self, doc: &mut Document, host: NodeId, init: &ShadowRootInit) -> DomResult<NodeId> {
        let root = self.inner.attach(doc, host, init)?;

        self.shared.borrow_mut().tracked.insert(host);
        let shared = Rc::clone(&self.shared);
        doc.queue_microtask(move |doc| {
            if let Err(err) = shared.borrow_mut().maybe_apply(doc, host) {
                log_skipped(host, &err);
            }
        });
        Ok(root)
    }
}

impl std::fmt::Debug for TrackingAttacher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackingAttacher").finish_non_exhaustive()
    }
}
