//! Event Loop
//!
//! Microtask queue (Promise jobs, queueMicrotask, mutation observer
//! notification). Tasks receive the document they were queued on.

use std::collections::VecDeque;

use crate::Document;

/// Queued microtask
pub type Microtask = Box<dyn FnOnce(&mut Document)>;

/// Microtask queue
#[derive(Default)]
pub struct EventLoop {
    /// Microtask queue, FIFO
    microtasks: VecDeque<Microtask>,
    /// Set while a checkpoint is draining the queue
    performing_checkpoint: bool,
    /// Microtasks run since creation
    executed: u64,
}

impl EventLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a microtask
    pub fn queue_microtask(&mut self, task: Microtask) {
        self.microtasks.push_back(task);
    }

    /// Pop the next microtask
    pub(crate) fn next_microtask(&mut self) -> Option<Microtask> {
        let task = self.microtasks.pop_front()?;
        self.executed += 1;
        Some(task)
    }

    /// Enter a checkpoint; false if one is already running
    pub(crate) fn begin_checkpoint(&mut self) -> bool {
        !std::mem::replace(&mut self.performing_checkpoint, true)
    }

    pub(crate) fn end_checkpoint(&mut self) {
        self.performing_checkpoint = false;
    }

    /// Number of queued microtasks
    pub fn pending(&self) -> usize {
        self.microtasks.len()
    }

    /// Check if there's pending work
    pub fn has_pending_work(&self) -> bool {
        !self.microtasks.is_empty()
    }

    /// Microtasks run so far
    pub fn executed(&self) -> u64 {
        self.executed
    }
}

impl std::fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoop")
            .field("microtasks", &self.microtasks.len())
            .field("performing_checkpoint", &self.performing_checkpoint)
            .field("executed", &self.executed)
            .finish()
    }
}
