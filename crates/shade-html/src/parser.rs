//! HTML5 Parser implementation
//!
//! Parses with html5ever into an RcDom and converts the result into a
//! `shade_dom::Document`. A `<template shadowrootmode>` becomes a shadow
//! root on its parent element.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use shade_dom::{Document, NodeId, ShadowRootInit};

use crate::HtmlError;

/// HTML5 parser
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse an HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, HtmlError> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        let mut document = Document::empty();
        let root = document.document_node();
        self.convert_children(&dom.document, &mut document, root)?;
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }

    fn convert_children(&self, handle: &Handle, doc: &mut Document, parent: NodeId) -> Result<(), HtmlError> {
        for child in handle.children.borrow().iter() {
            self.convert_node(child, doc, parent)?;
        }
        Ok(())
    }

    fn convert_node(&self, handle: &Handle, doc: &mut Document, parent: NodeId) -> Result<(), HtmlError> {
        match &handle.data {
            RcNodeData::Document => self.convert_children(handle, doc, parent)?,
            RcNodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                if !text.trim().is_empty() {
                    let id = doc.create_text(&text);
                    doc.append_child(parent, id)?;
                }
            }
            RcNodeData::Comment { contents } => {
                let id = doc.create_comment(contents);
                doc.append_child(parent, id)?;
            }
            RcNodeData::Element { name, attrs, template_contents, .. } => {
                let local: &str = &name.local;
                let attrs = attrs.borrow();

                if local == "template" {
                    let mode = attrs
                        .iter()
                        .find(|a| &*a.name.local == "shadowrootmode")
                        .map(|a| a.value.to_ascii_lowercase());
                    let contents = template_contents.borrow();
                    if let (Some(mode), Some(contents)) = (mode, contents.as_ref()) {
                        return self.convert_shadow_root(&mode, contents, doc, parent);
                    }
                    // Inert template content is not part of the tree
                    let id = doc.create_element(local);
                    for attr in attrs.iter() {
                        doc.set_attribute(id, &attr.name.local, &attr.value)?;
                    }
                    doc.append_child(parent, id)?;
                    return Ok(());
                }

                let id = doc.create_element(local);
                for attr in attrs.iter() {
                    doc.set_attribute(id, &attr.name.local, &attr.value)?;
                }
                doc.append_child(parent, id)?;
                self.convert_children(handle, doc, id)?;
            }
            RcNodeData::Doctype { .. } | RcNodeData::ProcessingInstruction { .. } => {}
        }
        Ok(())
    }

    /// Declarative shadow root: attach to `host` and fill from the template
    fn convert_shadow_root(
        &self,
        mode: &str,
        contents: &Handle,
        doc: &mut Document,
        host: NodeId,
    ) -> Result<(), HtmlError> {
        let init = match mode {
            "open" => ShadowRootInit::open(),
            "closed" => ShadowRootInit::closed(),
            other => {
                tracing::warn!("Ignoring template with shadowrootmode={:?}", other);
                return Ok(());
            }
        };
        let root = match doc.attach_shadow(host, init) {
            Ok(root) => root,
            Err(err) => {
                tracing::warn!("Declarative shadow root on {:?} failed: {}", host, err);
                return Ok(());
            }
        };
        self.convert_children(contents, doc, root)
    }
}
