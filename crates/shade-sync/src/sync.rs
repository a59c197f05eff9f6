//! Sync Primitives
//!
//! `SyncState` holds everything the synchronizer remembers between turns and
//! implements the clear/apply primitives on top of the anchor registry and
//! the style snapshot. It is shared as [`Shared`] by the watcher, the
//! lifecycle overlay and the attach decorator. Borrows never outlive a
//! single primitive, and no primitive calls back into user code: the nodes
//! it inserts and removes are `style`/`link` clones, which can never be
//! custom elements.

use std::cell::RefCell;
use std::rc::Rc;

use shade_dom::{Document, DomTree, NodeId, ObserverId, WeakNodeMap};

use crate::anchors::AnchorRegistry;
use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::mode::{SourceSelection, StyleMode, TargetSelection};
use crate::snapshot::StyleSnapshot;
use crate::tracked::TrackedElements;

/// Synchronizer state shared between its entry points
pub(crate) type Shared = Rc<RefCell<SyncState>>;

#[derive(Debug)]
pub(crate) struct SyncState {
    config: SyncConfig,
    /// `None` when the mode attribute was missing or unrecognized
    mode: Option<StyleMode>,
    scope: NodeId,
    pub(crate) tracked: TrackedElements,
    anchors: AnchorRegistry,
    /// Deferred initial syncs still queued, per element
    delayed: WeakNodeMap<usize>,
    snapshot: StyleSnapshot,
    pub(crate) observer: Option<ObserverId>,
}

impl SyncState {
    pub(crate) fn new(config: SyncConfig, mode: Option<StyleMode>, scope: NodeId) -> Self {
        Self {
            config,
            mode,
            scope,
            tracked: TrackedElements::new(),
            anchors: AnchorRegistry::new(),
            delayed: WeakNodeMap::new(),
            snapshot: StyleSnapshot::new(),
            observer: None,
        }
    }

    pub(crate) fn into_shared(self) -> Shared {
        Rc::new(RefCell::new(self))
    }

    pub(crate) fn mode(&self) -> Option<StyleMode> {
        self.mode
    }

    pub(crate) fn scope(&self) -> NodeId {
        self.scope
    }

    pub(crate) fn tracked(&self) -> &TrackedElements {
        &self.tracked
    }

    pub(crate) fn snapshot(&self) -> &StyleSnapshot {
        &self.snapshot
    }

    pub(crate) fn is_pull(&self) -> bool {
        self.mode.is_some_and(StyleMode::is_pull)
    }

    /// Record one more deferred initial sync queued for `element`
    pub(crate) fn defer_sync(&mut self, element: NodeId) {
        let pending = self.delayed.remove(element).unwrap_or(0);
        self.delayed.insert(element, pending + 1);
    }

    /// A deferred initial sync of `element` has run
    pub(crate) fn finish_deferred(&mut self, element: NodeId) {
        match self.delayed.remove(element) {
            Some(pending) if pending > 1 => {
                self.delayed.insert(element, pending - 1);
            }
            _ => {}
        }
    }

    /// Whether a deferred initial sync of `element` is still queued
    pub(crate) fn is_delayed(&self, tree: &DomTree, element: NodeId) -> bool {
        self.delayed.contains(tree, element)
    }

    fn source_marker(&self) -> Option<&str> {
        match self.mode?.sources() {
            SourceSelection::All => None,
            SourceSelection::Marked => Some(self.config.source_marker.as_str()),
        }
    }

    /// Recompute the snapshot from the scope under the active source filter
    pub(crate) fn refresh_snapshot(&mut self, doc: &Document) {
        let marker = self.source_marker().map(str::to_owned);
        self.snapshot.refresh(doc, self.scope, marker.as_deref());
    }

    /// Remove every node strictly between `element`'s anchors
    ///
    /// Stops early if the end anchor is no longer a following sibling of the
    /// start anchor. Returns how many nodes were removed.
    pub(crate) fn clear(&mut self, doc: &mut Document, element: NodeId) -> Result<usize> {
        let pair = self.anchors.get_or_create(doc, element)?;
        let mut removed = 0;
        while let Some(next) = doc.tree().next_sibling(pair.start) {
            if next == pair.end {
                break;
            }
            doc.destroy(next)?;
            removed += 1;
        }
        Ok(removed)
    }

    /// Insert a deep clone of every snapshot node before the end anchor, in
    /// snapshot order. Returns how many clones were inserted.
    pub(crate) fn apply(&mut self, doc: &mut Document, element: NodeId) -> Result<usize> {
        let pair = self.anchors.get_or_create(doc, element)?;
        let root = doc
            .tree()
            .parent(pair.end)
            .ok_or(SyncError::NoShadowRoot(element))?;

        let mut inserted = 0;
        for &source in self.snapshot.nodes() {
            // Destroyed since the last refresh; the pending watcher pass
            // will catch up
            if !doc.tree().contains(source) {
                continue;
            }
            let clone = doc.clone_node(source, true)?;
            if let Err(err) = doc.insert_before(root, clone, Some(pair.end)) {
                let _ = doc.destroy(clone);
                return Err(err.into());
            }
            inserted += 1;
        }
        Ok(inserted)
    }

    /// `apply`, unless targets are opt-in and `element` lacks the target
    /// marker. Returns whether it applied.
    pub(crate) fn maybe_apply(&mut self, doc: &mut Document, element: NodeId) -> Result<bool> {
        if let Some(mode) = self.mode {
            if mode.targets() == TargetSelection::Select
                && !doc.has_attribute(element, &self.config.target_marker)
            {
                return Ok(false);
            }
        }
        self.apply(doc, element)?;
        Ok(true)
    }

    /// Refresh the snapshot, then clear and re-apply every tracked element
    pub(crate) fn resync(&mut self, doc: &mut Document) {
        self.refresh_snapshot(doc);

        let tree = doc.tree();
        let pruned = self.tracked.prune(tree);
        self.anchors.prune(tree);
        self.delayed.prune(tree);
        if pruned > 0 {
            tracing::debug!("Dropped {} destroyed elements from tracking", pruned);
        }

        let elements: Vec<NodeId> = self.tracked.iter().collect();
        tracing::debug!(
            "Resyncing {} elements with {} style sources",
            elements.len(),
            self.snapshot.len()
        );
        for element in elements {
            let result = self
                .clear(doc, element)
                .and_then(|_| self.maybe_apply(doc, element));
            if let Err(err) = result {
                log_skipped(element, &err);
            }
        }
    }

    /// Nodes currently between `element`'s anchors, without creating anchors
    pub(crate) fn managed_nodes(&self, doc: &Document, element: NodeId) -> Vec<NodeId> {
        let Some(pair) = self.anchors.get(doc, element) else {
            return Vec::new();
        };
        let tree = doc.tree();
        let mut nodes = Vec::new();
        let mut current = tree.next_sibling(pair.start);
        while let Some(node) = current {
            if node == pair.end {
                break;
            }
            nodes.push(node);
            current = tree.next_sibling(node);
        }
        nodes
    }
}

/// Log a primitive failure that is being swallowed
pub(crate) fn log_skipped(element: NodeId, err: &SyncError) {
    match err {
        SyncError::NoShadowRoot(_) => {
            tracing::debug!("Skipping {:?}: {}", element, err);
        }
        SyncError::Dom(_) => {
            tracing::warn!("Style sync of {:?} failed: {}", element, err);
        }
    }
}
