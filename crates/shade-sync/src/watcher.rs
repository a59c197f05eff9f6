//! Mutation Watcher
//!
//! One mutation observer on the shared scope. Every delivered batch triggers
//! a full resync; the records themselves are only counted.

use std::rc::Rc;

use shade_dom::{Document, DomResult, MutationObserverInit, MutationRecord, ObserverId};

use crate::sync::Shared;

/// Observe the scope of `shared` and resync on every batch
pub(crate) fn watch(doc: &mut Document, shared: &Shared) -> DomResult<ObserverId> {
    let scope = shared.borrow().scope();
    let state = Rc::clone(shared);
    let observer = doc.create_mutation_observer(Box::new(
        move |records: &[MutationRecord], doc: &mut Document| {
            tracing::trace!("Style scope changed ({} records)", records.len());
            state.borrow_mut().resync(doc);
        },
    ));

    if let Err(err) = doc.observe(observer, scope, MutationObserverInit::everything()) {
        doc.remove_mutation_observer(observer);
        return Err(err);
    }
    shared.borrow_mut().observer = Some(observer);
    Ok(observer)
}

/// Drop the watcher's observer, if one was installed
pub(crate) fn unwatch(doc: &mut Document, shared: &Shared) {
    let observer = shared.borrow_mut().observer.take();
    if let Some(observer) = observer {
        doc.remove_mutation_observer(observer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncConfig;
    use crate::mode::StyleMode;
    use crate::sync::SyncState;
    use shade_dom::{NodeId, ShadowRootInit};

    fn setup() -> (Document, Shared, NodeId) {
        let mut doc = Document::new();
        let head = doc.head();
        let shared = SyncState::new(SyncConfig::default(), Some(StyleMode::PAGE_PUSH), head).into_shared();

        let host = doc.create_element("x-card");
        doc.attach_shadow(host, ShadowRootInit::open()).unwrap();
        shared.borrow_mut().tracked.insert(host);
        (doc, shared, host)
    }

    #[test]
    fn test_batch_resyncs() {
        let (mut doc, shared, host) = setup();
        watch(&mut doc, &shared).unwrap();
        let head = doc.head();

        // Several mutations, one delivery
        for css in ["a {}", "b {}"] {
            let style = doc.create_element("style");
            doc.append_child(head, style).unwrap();
            let text = doc.create_text(css);
            doc.append_child(style, text).unwrap();
        }
        let style = doc.tree().first_child(head).unwrap();
        doc.set_attribute(style, "media", "print").unwrap();
        assert!(shared.borrow().managed_nodes(&doc, host).is_empty());

        doc.perform_microtask_checkpoint();
        let state = shared.borrow();
        assert_eq!(state.snapshot().len(), 2);
        assert_eq!(state.managed_nodes(&doc, host).len(), 2);
    }

    #[test]
    fn test_character_data_change() {
        let (mut doc, shared, host) = setup();
        let head = doc.head();
        let style = doc.create_element("style");
        let text = doc.create_text("a {}");
        doc.append_child(style, text).unwrap();
        doc.append_child(head, style).unwrap();
        watch(&mut doc, &shared).unwrap();

        doc.set_text(text, "a { color: red }").unwrap();
        doc.perform_microtask_checkpoint();

        let state = shared.borrow();
        let managed = state.managed_nodes(&doc, host);
        assert_eq!(managed.len(), 1);
        assert_eq!(doc.tree().text_content(managed[0]), "a { color: red }");
    }

    #[test]
    fn test_unwatch() {
        let (mut doc, shared, host) = setup();
        watch(&mut doc, &shared).unwrap();
        assert_eq!(doc.observer_count(), 1);
        unwatch(&mut doc, &shared);
        assert_eq!(doc.observer_count(), 0);

        let style = doc.create_element("style");
        doc.append_child(doc.head(), style).unwrap();
        doc.perform_microtask_checkpoint();
        assert!(shared.borrow().managed_nodes(&doc, host).is_empty());
    }
}
