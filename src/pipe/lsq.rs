use std::collections::VecDeque;

use crate::pipe::instruction::Timestamp;

#[derive(Debug, Clone, PartialEq, Eq)]
struct LsqSlot {
    seq: u64,
    ready_at: Timestamp,
}

/// Simplified load/store queue: each accepted access occupies a slot
/// until its memory latency has elapsed, then moves to the completed
/// list for the memory-return pass to drain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lsq {
    slots: VecDeque<LsqSlot>,
    completed: VecDeque<u64>,
    capacity: usize,
}

impl Lsq {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: VecDeque::with_capacity(capacity),
            completed: VecDeque::new(),
            capacity,
        }
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    pub fn occupancy(&self) -> usize {
        self.slots.len()
    }

    /// Returns false when the queue is full; the caller falls back to a
    /// fixed retry latency instead of occupying a slot.
    pub fn push(&mut self, seq: u64, ready_at: Timestamp) -> bool {
        if self.is_full() {
            return false;
        }
        self.slots.push_back(LsqSlot { seq, ready_at });
        true
    }

    /// Advance the queue: accesses whose latency has elapsed move to the
    /// completed list. Returns the number of accesses that finished.
    pub fn operate(&mut self, now: Timestamp) -> u64 {
        let mut finished = 0;
        let completed = &mut self.completed;
        self.slots.retain(|slot| {
            if slot.ready_at <= now {
                completed.push_back(slot.seq);
                finished += 1;
                false
            } else {
                true
            }
        });
        finished
    }

    pub fn pop_completed(&mut self) -> Option<u64> {
        self.completed.pop_front()
    }

    pub fn has_completed(&self) -> bool {
        !self.completed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::Lsq;

    #[test]
    fn access_completes_after_latency() {
        let mut lsq = Lsq::new(4);
        assert!(lsq.push(1, 100));
        assert_eq!(lsq.operate(50), 0);
        assert!(!lsq.has_completed());
        assert_eq!(lsq.operate(100), 1);
        assert_eq!(lsq.pop_completed(), Some(1));
    }

    #[test]
    fn rejects_when_full() {
        let mut lsq = Lsq::new(1);
        assert!(lsq.push(1, 10));
        assert!(!lsq.push(2, 10));
        lsq.operate(10);
        assert!(lsq.push(2, 20), "slot freed after completion");
    }
}
