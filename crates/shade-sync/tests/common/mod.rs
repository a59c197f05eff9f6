//! Shared fixtures for style sync integration tests

#![allow(dead_code)]

use std::rc::Rc;

use shade_dom::{CallbackError, CustomElement, Document, NodeId, ShadowRootInit};
use shade_sync::StyleSync;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Parse `html` and install the synchronizer
pub fn setup(html: &str) -> (Document, StyleSync) {
    init_tracing();
    let mut doc = shade_html::parse(html).expect("fixture parses");
    let sync = StyleSync::install(&mut doc);
    (doc, sync)
}

/// Text of every node injected into `host`, in order
pub fn injected(doc: &Document, sync: &StyleSync, host: NodeId) -> Vec<String> {
    sync.managed_nodes(doc, host)
        .into_iter()
        .map(|node| doc.tree().text_content(node))
        .collect()
}

/// Element children of `parent` with the given name
pub fn elements(doc: &Document, parent: NodeId, name: &str) -> Vec<NodeId> {
    doc.tree()
        .children(parent)
        .filter(|&c| doc.tree().element(c).is_some_and(|e| e.has_name(name)))
        .collect()
}

pub fn by_id(doc: &Document, id: &str) -> NodeId {
    doc.tree()
        .shadow_including_inclusive_descendants(doc.document_node())
        .into_iter()
        .find(|&n| doc.get_attribute(n, "id") == Some(id))
        .unwrap_or_else(|| panic!("no element with id {id}"))
}

pub fn add_style(doc: &mut Document, css: &str) -> NodeId {
    let style = doc.create_element("style");
    let text = doc.create_text(css);
    doc.append_child(style, text).unwrap();
    let head = doc.head();
    doc.append_child(head, style).unwrap();
    style
}

/// Attaches an open shadow root while connecting
pub struct Card;

impl CustomElement for Card {
    fn connected(&self, doc: &mut Document, element: NodeId) -> Result<(), CallbackError> {
        if doc.shadow_root(element).is_none() {
            doc.attach_shadow(element, ShadowRootInit::open())
                .map_err(|e| CallbackError::new(e.to_string()))?;
        }
        Ok(())
    }
}

/// Attaches its shadow root one microtask after connecting
pub struct LateCard;

impl CustomElement for LateCard {
    fn connected(&self, doc: &mut Document, element: NodeId) -> Result<(), CallbackError> {
        doc.queue_microtask(move |doc| {
            if doc.shadow_root(element).is_none() {
                let _ = doc.attach_shadow(element, ShadowRootInit::open());
            }
        });
        Ok(())
    }
}

/// Never attaches a shadow root itself
pub struct Bare;

impl CustomElement for Bare {}

/// Connected hook that always fails after attaching
pub struct Broken;

impl CustomElement for Broken {
    fn connected(&self, doc: &mut Document, element: NodeId) -> Result<(), CallbackError> {
        Card.connected(doc, element)?;
        Err(CallbackError::new("broken component"))
    }
}

pub fn define(doc: &mut Document, sync: &StyleSync, name: &str, behavior: impl CustomElement + 'static) {
    doc.define(name, sync.open_stylable(Rc::new(behavior))).unwrap();
}
