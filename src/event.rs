//! Scheduled-event definitions for the kernel's calendar.
//!
//! A [`Scheduled`] entry is a pending wake-up: it carries the time slot it
//! fires in, a priority, a stable insertion sequence number, and the
//! [`Action`] the scheduler performs when the entry is drained.

use std::cmp::Ordering;

use crate::sync::EventKey;
use crate::time::SimTime;
use crate::types::{Priority, ProcessId, SignalId, Value};

/// Reserved priority for bridge-injected external value changes.
///
/// Strictly lower than [`PRI_NORMAL`], so within one `(time, delta)` slot
/// external changes are drained before ordinary process wake-ups. This
/// matches RTL delta-cycle precedence: the changed value is buffered before
/// dependent process logic runs.
pub const PRI_EXTERNAL: Priority = -1;

/// Default priority for process wake-ups.
pub const PRI_NORMAL: Priority = 0;

/// Opaque handle to a scheduled event, used for cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EventHandle(pub(crate) u64);

/// The reason a process is being resumed, passed to `Process::resume`.
#[derive(Clone, Debug)]
pub enum Wake {
    /// First resumption after spawn.
    Start,
    /// A `Wait::Until` or `Wait::Delta` expired.
    Timer,
    /// A watched signal changed with a matching edge.
    Edge {
        /// The signal whose buffered write was just applied.
        signal: SignalId,
    },
    /// A named rendezvous event fired.
    Event {
        /// The rendezvous that fired.
        event: EventKey,
        /// Optional payload passed to `fire`, cloned per waiter.
        data: Option<serde_json::Value>,
    },
    /// The wait's timeout bound expired before the condition occurred.
    TimedOut,
}

/// What the scheduler does when a calendar entry is drained.
#[derive(Clone, Debug)]
pub enum Action {
    /// Resume the given process with the given wake reason.
    Wake(ProcessId, Wake),
    /// Buffer a value change reported by the external engine.
    ///
    /// The write lands in the signal's pending slot like any process write
    /// and is applied at the end of the current micro-step.
    ExternalChange {
        /// The changed signal.
        signal: SignalId,
        /// The new value reported by the engine.
        value: Value,
    },
}

/// A calendar entry: `(time, priority, seq)` keyed, stable FIFO at ties.
#[derive(Clone, Debug)]
pub struct Scheduled {
    /// When the entry fires.
    pub time: SimTime,
    /// Tie-break after time; lower fires earlier.
    pub priority: Priority,
    /// Monotonic insertion counter; equal `(time, priority)` entries fire
    /// in insertion order, which is what makes runs reproducible.
    pub seq: u64,
    /// Handle for cancellation.
    pub handle: EventHandle,
    /// What to do when drained.
    pub action: Action,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then(self.priority.cmp(&other.priority))
            .then(self.seq.cmp(&other.seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(time: SimTime, priority: Priority, seq: u64) -> Scheduled {
        Scheduled {
            time,
            priority,
            seq,
            handle: EventHandle(seq),
            action: Action::Wake(0, Wake::Timer),
        }
    }

    #[test]
    fn test_time_dominates_priority() {
        let early = entry(SimTime::at(1), PRI_NORMAL, 10);
        let late = entry(SimTime::at(2), PRI_EXTERNAL, 0);
        assert!(early < late);
    }

    #[test]
    fn test_external_priority_first_within_slot() {
        let ext = entry(SimTime::at(5), PRI_EXTERNAL, 9);
        let proc = entry(SimTime::at(5), PRI_NORMAL, 1);
        assert!(ext < proc);
    }

    #[test]
    fn test_sequence_breaks_full_ties() {
        let a = entry(SimTime::at(5), PRI_NORMAL, 1);
        let b = entry(SimTime::at(5), PRI_NORMAL, 2);
        assert!(a < b);
    }

    #[test]
    fn test_delta_orders_within_macro_time() {
        let d0 = entry(SimTime::at(5), PRI_NORMAL, 2);
        let d1 = entry(SimTime::at(5).next_delta(), PRI_EXTERNAL, 1);
        assert!(d0 < d1);
    }
}
