//! The kernel's event calendar: a priority queue of pending wake-ups.
//!
//! Entries are ordered by `(time, priority, seq)`. The sequence counter is
//! assigned at insertion, so entries with equal time and priority drain in
//! FIFO order — the stability guarantee deterministic runs depend on.
//!
//! Cancellation is lazy: `cancel` records a tombstone and the entry is
//! discarded when it surfaces at the top of the heap. Cancelling an entry
//! that already fired is a no-op.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use crate::event::{Action, EventHandle, Scheduled};
use crate::time::SimTime;
use crate::types::Priority;

/// Min-heap calendar of [`Scheduled`] entries.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Reverse<Scheduled>>,
    cancelled: HashSet<EventHandle>,
    next_seq: u64,
    next_handle: u64,
    last_popped: Option<SimTime>,
}

impl EventQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `action` to fire at `time` with the given priority.
    ///
    /// Returns a handle that can be passed to [`EventQueue::cancel`].
    pub fn schedule(&mut self, time: SimTime, priority: Priority, action: Action) -> EventHandle {
        let handle = EventHandle(self.next_handle);
        self.next_handle += 1;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Scheduled {
            time,
            priority,
            seq,
            handle,
            action,
        }));
        handle
    }

    /// Cancels a pending entry. No-op if the entry already fired.
    pub fn cancel(&mut self, handle: EventHandle) {
        if handle.0 < self.next_handle {
            self.cancelled.insert(handle);
        }
    }

    /// Removes and returns the earliest live entry.
    ///
    /// Drains in non-decreasing `(time, priority, seq)` order; a pop that
    /// would go backwards in time indicates a corrupted calendar and is
    /// asserted rather than repaired.
    pub fn pop_earliest(&mut self) -> Option<Scheduled> {
        while let Some(Reverse(entry)) = self.heap.pop() {
            if self.cancelled.remove(&entry.handle) {
                continue;
            }
            debug_assert!(
                self.last_popped.map_or(true, |prev| prev <= entry.time),
                "calendar drained out of order: {} after {}",
                entry.time,
                self.last_popped.unwrap(),
            );
            self.last_popped = Some(entry.time);
            return Some(entry);
        }
        None
    }

    /// Returns the time of the earliest live entry without removing it.
    pub fn next_time(&mut self) -> Option<SimTime> {
        while let Some(Reverse(entry)) = self.heap.peek() {
            if self.cancelled.contains(&entry.handle) {
                let handle = entry.handle;
                self.heap.pop();
                self.cancelled.remove(&handle);
                continue;
            }
            return Some(entry.time);
        }
        None
    }

    /// Number of live entries.
    ///
    /// Walks the heap to skip tombstones; intended for tests and
    /// diagnostics, not the hot path.
    pub fn len(&self) -> usize {
        self.heap
            .iter()
            .filter(|Reverse(e)| !self.cancelled.contains(&e.handle))
            .count()
    }

    /// Whether the queue holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
