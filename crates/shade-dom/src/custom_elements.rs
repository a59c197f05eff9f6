//! Custom Elements
//!
//! Custom element registry and lifecycle callbacks.

use std::collections::HashMap;
use std::rc::Rc;

use crate::{Document, NodeId};

/// Behaviour attached to a custom element name
///
/// Hooks default to doing nothing, so an implementation only overrides the
/// callbacks it cares about.
pub trait CustomElement {
    /// Element became connected to the document
    fn connected(&self, _doc: &mut Document, _element: NodeId) -> Result<(), CallbackError> {
        Ok(())
    }

    /// Element was disconnected from the document
    fn disconnected(&self, _doc: &mut Document, _element: NodeId) -> Result<(), CallbackError> {
        Ok(())
    }
}

/// Error raised by a lifecycle callback
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct CallbackError(String);

impl CallbackError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Custom element lifecycle callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleCallback {
    Connected,
    Disconnected,
}

/// Custom elements registry
#[derive(Default)]
pub struct CustomElementRegistry {
    definitions: HashMap<String, Rc<dyn CustomElement>>,
}

impl CustomElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a custom element
    pub fn define(
        &mut self,
        name: &str,
        behavior: Rc<dyn CustomElement>,
    ) -> Result<(), CustomElementError> {
        if !Self::is_valid_name(name) {
            return Err(CustomElementError::InvalidName(name.to_string()));
        }

        if self.definitions.contains_key(name) {
            return Err(CustomElementError::AlreadyDefined(name.to_string()));
        }

        self.definitions.insert(name.to_string(), behavior);
        Ok(())
    }

    /// Get element definition
    pub fn get(&self, name: &str) -> Option<Rc<dyn CustomElement>> {
        self.definitions.get(name).cloned()
    }

    /// Valid names are lowercase, start with a letter, contain a hyphen
    /// and are not one of the names SVG/MathML reserve
    fn is_valid_name(name: &str) -> bool {
        const RESERVED: [&str; 8] = [
            "annotation-xml", "color-profile", "font-face", "font-face-src",
            "font-face-uri", "font-face-format", "font-face-name", "missing-glyph",
        ];
        name.starts_with(|c: char| c.is_ascii_lowercase())
            && name.contains('-')
            && !name.chars().any(|c| c.is_ascii_uppercase())
            && !RESERVED.contains(&name)
    }
}

impl std::fmt::Debug for CustomElementRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.definitions.keys().collect();
        names.sort();
        f.debug_struct("CustomElementRegistry")
            .field("definitions", &names)
            .finish()
    }
}

/// Custom element errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CustomElementError {
    #[error("Invalid custom element name: {0}")]
    InvalidName(String),
    #[error("Custom element already defined: {0}")]
    AlreadyDefined(String),
}
