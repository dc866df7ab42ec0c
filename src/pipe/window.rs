use std::collections::VecDeque;

use crate::pipe::instruction::{Instruction, Timestamp};

/// One in-flight instruction held by the instruction window.
///
/// `executed` is monotonic: it is set exactly once, by the in-order
/// execute pass, and never cleared. An executed entry is permanently
/// transparent to later execute scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowEntry {
    pub instr: Instruction,
    pub scheduled: bool,
    pub executed: bool,
    pub completed: bool,
    /// Earliest simulated time at which execution may begin.
    pub ready_time: Timestamp,
    /// Time at which results become visible; `None` while a memory
    /// access is still outstanding in the load/store queue.
    pub completion_time: Option<Timestamp>,
}

impl WindowEntry {
    pub fn new(instr: Instruction) -> Self {
        Self {
            instr,
            scheduled: false,
            executed: false,
            completed: false,
            ready_time: 0,
            completion_time: None,
        }
    }
}

/// The instruction window (reorder buffer). Entries are kept in strict
/// program order, oldest at the front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    entries: VecDeque<WindowEntry>,
    capacity: usize,
}

impl Window {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn push(&mut self, entry: WindowEntry) {
        assert!(!self.is_full(), "window overrun");
        self.entries.push_back(entry);
    }

    pub fn front(&self) -> Option<&WindowEntry> {
        self.entries.front()
    }

    pub fn pop_front(&mut self) -> Option<WindowEntry> {
        self.entries.pop_front()
    }

    /// Oldest-to-youngest iteration.
    pub fn iter(&self) -> impl Iterator<Item = &WindowEntry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut WindowEntry> {
        self.entries.iter_mut()
    }

    pub fn find_mut(&mut self, seq: u64) -> Option<&mut WindowEntry> {
        self.entries.iter_mut().find(|e| e.instr.seq == seq)
    }
}
