//! Mutation Observers
//!
//! Records are queued per observer while a task mutates the tree and are
//! delivered as one batch per observer from a single notification
//! microtask, so bursts of synchronous mutations collapse into one
//! callback.

use crate::{Document, DomTree, NodeId};

/// Mutation observer handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u32);

/// Observer callback: the delivered batch and the document
pub type MutationCallback = Box<dyn FnMut(&[MutationRecord], &mut Document)>;

/// Mutation observer options
#[derive(Debug, Clone, Default)]
pub struct MutationObserverInit {
    pub child_list: bool,
    pub attributes: bool,
    pub character_data: bool,
    pub subtree: bool,
    pub attribute_old_value: bool,
    pub character_data_old_value: bool,
    pub attribute_filter: Option<Vec<String>>,
}

impl MutationObserverInit {
    /// Every kind of change anywhere below the target
    pub fn everything() -> Self {
        Self {
            child_list: true,
            attributes: true,
            character_data: true,
            subtree: true,
            ..Default::default()
        }
    }

    fn wants(&self, record: &MutationRecord) -> bool {
        match record.mutation_type {
            MutationType::ChildList => self.child_list,
            MutationType::CharacterData => self.character_data,
            MutationType::Attributes => {
                self.attributes
                    && match (&self.attribute_filter, &record.attribute_name) {
                        (Some(filter), Some(name)) => filter.contains(name),
                        _ => true,
                    }
            }
        }
    }

    fn keeps_old_value(&self, mutation_type: MutationType) -> bool {
        match mutation_type {
            MutationType::Attributes => self.attribute_old_value,
            MutationType::CharacterData => self.character_data_old_value,
            MutationType::ChildList => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    Attributes,
    CharacterData,
    ChildList,
}

/// Mutation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub mutation_type: MutationType,
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub previous_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub attribute_name: Option<String>,
    pub old_value: Option<String>,
}

impl MutationRecord {
    pub fn child_list(
        target: NodeId,
        added_nodes: Vec<NodeId>,
        removed_nodes: Vec<NodeId>,
        previous_sibling: Option<NodeId>,
        next_sibling: Option<NodeId>,
    ) -> Self {
        Self {
            mutation_type: MutationType::ChildList,
            target,
            added_nodes,
            removed_nodes,
            previous_sibling,
            next_sibling,
            attribute_name: None,
            old_value: None,
        }
    }

    pub fn attributes(target: NodeId, name: &str, old_value: Option<String>) -> Self {
        Self {
            mutation_type: MutationType::Attributes,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            previous_sibling: None,
            next_sibling: None,
            attribute_name: Some(name.to_string()),
            old_value,
        }
    }

    pub fn character_data(target: NodeId, old_value: String) -> Self {
        Self {
            mutation_type: MutationType::CharacterData,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            previous_sibling: None,
            next_sibling: None,
            attribute_name: None,
            old_value: Some(old_value),
        }
    }
}

struct Registration {
    target: NodeId,
    options: MutationObserverInit,
}

struct Observer {
    id: ObserverId,
    registrations: Vec<Registration>,
    records: Vec<MutationRecord>,
    /// Taken out while the observer's batch is being delivered
    callback: Option<MutationCallback>,
}

/// All observers of a document, in creation order
#[derive(Default)]
pub(crate) struct ObserverRegistry {
    observers: Vec<Observer>,
    next_id: u32,
}

impl ObserverRegistry {
    pub fn create(&mut self, callback: MutationCallback) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push(Observer {
            id,
            registrations: Vec::new(),
            records: Vec::new(),
            callback: Some(callback),
        });
        id
    }

    fn get_mut(&mut self, id: ObserverId) -> Option<&mut Observer> {
        self.observers.iter_mut().find(|o| o.id == id)
    }

    /// Register `target`; observing the same target again replaces its options
    pub fn observe(&mut self, id: ObserverId, target: NodeId, options: MutationObserverInit) -> bool {
        let Some(observer) = self.get_mut(id) else { return false };
        match observer.registrations.iter_mut().find(|r| r.target == target) {
            Some(existing) => existing.options = options,
            None => observer.registrations.push(Registration { target, options }),
        }
        true
    }

    pub fn disconnect(&mut self, id: ObserverId) {
        if let Some(observer) = self.get_mut(id) {
            observer.registrations.clear();
            observer.records.clear();
        }
    }

    pub fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| o.id != id);
        before != self.observers.len()
    }

    pub fn take_records(&mut self, id: ObserverId) -> Vec<MutationRecord> {
        self.get_mut(id)
            .map(|o| std::mem::take(&mut o.records))
            .unwrap_or_default()
    }

    /// Queue `record` for every interested observer. Returns whether any
    /// observer took it.
    pub fn queue(&mut self, tree: &DomTree, record: &MutationRecord) -> bool {
        let mut queued = false;
        for observer in &mut self.observers {
            let interested = observer.registrations.iter().find(|reg| {
                (reg.target == record.target
                    || (reg.options.subtree && tree.is_inclusive_ancestor(reg.target, record.target)))
                    && reg.options.wants(record)
            });
            if let Some(reg) = interested {
                let mut copy = record.clone();
                if !reg.options.keeps_old_value(record.mutation_type) {
                    copy.old_value = None;
                }
                observer.records.push(copy);
                queued = true;
            }
        }
        queued
    }

    /// Observers with queued records
    pub fn pending(&self) -> Vec<ObserverId> {
        self.observers
            .iter()
            .filter(|o| !o.records.is_empty())
            .map(|o| o.id)
            .collect()
    }

    pub fn begin_delivery(&mut self, id: ObserverId) -> Option<(Vec<MutationRecord>, MutationCallback)> {
        let observer = self.get_mut(id)?;
        if observer.records.is_empty() {
            return None;
        }
        let callback = observer.callback.take()?;
        Some((std::mem::take(&mut observer.records), callback))
    }

    /// Hand the callback back; dropped if the observer was removed meanwhile
    pub fn end_delivery(&mut self, id: ObserverId, callback: MutationCallback) {
        if let Some(observer) = self.get_mut(id) {
            observer.callback = Some(callback);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
