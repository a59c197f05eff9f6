//! shade sync - Style propagation into shadow roots
//!
//! Clones the document's global `<style>` and `<link rel="stylesheet">`
//! nodes into the shadow roots of custom elements and keeps those clones in
//! step with the originals.
//!
//! ```ignore
//! let mut doc = shade_html::parse(html)?;
//! let sync = StyleSync::install(&mut doc);
//! doc.define("x-card", sync.open_stylable(Rc::new(Card)))?;
//! doc.perform_microtask_checkpoint();
//! ```
//!
//! The mode comes from the `shadow-style-mode` attribute of `<html>`:
//! pull modes only sync elements defined through [`StyleSync::open_stylable`],
//! push modes sync every element that attaches a shadow root.

mod anchors;
mod attach;
mod config;
mod engine;
mod error;
mod lifecycle;
mod mode;
mod snapshot;
mod sync;
mod tracked;
mod watcher;

pub use config::{SyncConfig, MODE_ATTRIBUTE, SOURCE_MARKER, TARGET_MARKER};
pub use engine::StyleSync;
pub use error::{ModeError, Result, SyncError};
pub use lifecycle::OpenStylable;
pub use mode::{Direction, SourceSelection, StyleMode, TargetSelection};
