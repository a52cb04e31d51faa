//! Bounded FIFO of process indices used by Round Robin.

use std::collections::VecDeque;
use std::fmt;

use crate::types::ProcIdx;

/// Largest number of processes the ready queue holds at once.
pub const MAX_PROCESSES: usize = 500;

/// Returned when an enqueue would exceed the queue's capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFull {
    /// The index that was dropped.
    pub idx: ProcIdx,
    pub capacity: usize,
}

impl fmt::Display for QueueFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ready queue overflow: capacity {} reached, dropped process slot {}",
            self.capacity, self.idx.0
        )
    }
}

impl std::error::Error for QueueFull {}

/// Ring buffer of registry indices with a fixed capacity.
#[derive(Debug, Clone)]
pub struct ReadyQueue {
    slots: VecDeque<ProcIdx>,
    capacity: usize,
}

impl Default for ReadyQueue {
    fn default() -> Self {
        Self::with_capacity(MAX_PROCESSES)
    }
}

impl ReadyQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        ReadyQueue {
            slots: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append to the rear. Fails without modifying the queue when full.
    pub fn enqueue(&mut self, idx: ProcIdx) -> Result<(), QueueFull> {
        if self.slots.len() >= self.capacity {
            return Err(QueueFull {
                idx,
                capacity: self.capacity,
            });
        }
        self.slots.push_back(idx);
        Ok(())
    }

    /// Remove from the front, or None when empty.
    pub fn dequeue(&mut self) -> Option<ProcIdx> {
        self.slots.pop_front()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProcIdx> {
        self.slots.iter()
    }
}
