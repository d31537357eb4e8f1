//! Named signals with buffered (non-blocking) write semantics.
//!
//! Writing a signal during process execution only stages a pending value;
//! the observable value changes when the scheduler applies all pending
//! writes at the micro-step boundary. Readers within the same micro-step
//! therefore always see the pre-update value, which is the delta-cycle
//! guarantee that makes multi-driver testbench logic race-free.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{SignalId, Value};

/// Edge predicate for signal-change waits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Low-to-high: `0` to any nonzero value.
    Rising,
    /// High-to-low: any nonzero value to `0`.
    Falling,
    /// Any change of value.
    Any,
}

impl EdgeKind {
    /// Whether the transition `old -> new` satisfies this predicate.
    ///
    /// A transition to the same value never matches any edge.
    pub fn matches(self, old: Value, new: Value) -> bool {
        if old == new {
            return false;
        }
        match self {
            EdgeKind::Rising => old == 0 && new != 0,
            EdgeKind::Falling => old != 0 && new == 0,
            EdgeKind::Any => true,
        }
    }
}

/// An applied value change on a signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalChange {
    /// The changed signal.
    pub signal: SignalId,
    /// Value before the micro-step boundary.
    pub old: Value,
    /// Value after the micro-step boundary.
    pub new: Value,
}

#[derive(Debug)]
struct Signal {
    name: String,
    current: Value,
    pending: Option<Value>,
    external: bool,
}

/// The kernel's signal table.
///
/// Signals are allocated sequentially and addressed by [`SignalId`]; the
/// external engine shares the same id space for its bound signals.
#[derive(Debug, Default)]
pub struct SignalStore {
    signals: Vec<Signal>,
    by_name: HashMap<String, SignalId>,
    dirty: Vec<SignalId>,
}

impl SignalStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a signal with the given initial value.
    ///
    /// Returns `None` if the name is already taken.
    pub fn add(&mut self, name: &str, init: Value, external: bool) -> Option<SignalId> {
        if self.by_name.contains_key(name) {
            return None;
        }
        let id = self.signals.len() as SignalId;
        self.signals.push(Signal {
            name: name.to_string(),
            current: init,
            pending: None,
            external,
        });
        self.by_name.insert(name.to_string(), id);
        Some(id)
    }

    /// Looks up a signal id by name.
    pub fn id(&self, name: &str) -> Option<SignalId> {
        self.by_name.get(name).copied()
    }

    /// Returns the signal's name, if the id is valid.
    pub fn name(&self, id: SignalId) -> Option<&str> {
        self.signals.get(id as usize).map(|s| s.name.as_str())
    }

    /// Whether the id names a signal in this store.
    pub fn contains(&self, id: SignalId) -> bool {
        (id as usize) < self.signals.len()
    }

    /// Whether the signal is bound to the external engine.
    pub fn is_external(&self, id: SignalId) -> bool {
        self.signals
            .get(id as usize)
            .map_or(false, |s| s.external)
    }

    /// Reads the observable value. Pending writes are not visible.
    pub fn read(&self, id: SignalId) -> Option<Value> {
        self.signals.get(id as usize).map(|s| s.current)
    }

    /// Stages a write, applied at the next micro-step boundary.
    ///
    /// A later write in the same micro-step overwrites an earlier one.
    /// Returns `false` if the id is unknown.
    pub fn write(&mut self, id: SignalId, value: Value) -> bool {
        match self.signals.get_mut(id as usize) {
            Some(sig) => {
                if sig.pending.is_none() {
                    self.dirty.push(id);
                }
                sig.pending = Some(value);
                true
            }
            None => false,
        }
    }

    /// Whether any write is staged.
    pub fn has_pending(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Applies all staged writes atomically and returns the changes.
    ///
    /// Writes that leave the value unchanged produce no change record (and
    /// therefore no edge notification). Changes are returned in ascending
    /// signal-id order, independent of write order, so notification order
    /// is deterministic.
    pub fn apply_pending(&mut self) -> Vec<SignalChange> {
        let mut dirty = std::mem::take(&mut self.dirty);
        dirty.sort_unstable();
        dirty.dedup();

        let mut changes = Vec::new();
        for id in dirty {
            let sig = &mut self.signals[id as usize];
            if let Some(new) = sig.pending.take() {
                if new != sig.current {
                    changes.push(SignalChange {
                        signal: id,
                        old: sig.current,
                        new,
                    });
                    sig.current = new;
                }
            }
        }
        changes
    }

    /// Number of signals in the store.
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_predicates() {
        assert!(EdgeKind::Rising.matches(0, 1));
        assert!(EdgeKind::Rising.matches(0, 0xff));
        assert!(!EdgeKind::Rising.matches(1, 0));
        assert!(!EdgeKind::Rising.matches(1, 2));

        assert!(EdgeKind::Falling.matches(1, 0));
        assert!(!EdgeKind::Falling.matches(0, 1));

        assert!(EdgeKind::Any.matches(3, 4));
        assert!(!EdgeKind::Any.matches(4, 4));
        assert!(!EdgeKind::Rising.matches(0, 0));
    }

    #[test]
    fn test_read_sees_pre_update_value() {
        let mut store = SignalStore::new();
        let s = store.add("s", 0, false).unwrap();

        assert!(store.write(s, 1));
        assert_eq!(store.read(s), Some(0));

        let changes = store.apply_pending();
        assert_eq!(changes, vec![SignalChange { signal: s, old: 0, new: 1 }]);
        assert_eq!(store.read(s), Some(1));
    }

    #[test]
    fn test_last_write_in_step_wins() {
        let mut store = SignalStore::new();
        let s = store.add("s", 0, false).unwrap();

        store.write(s, 1);
        store.write(s, 2);
        let changes = store.apply_pending();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].new, 2);
    }

    #[test]
    fn test_write_of_same_value_is_no_change() {
        let mut store = SignalStore::new();
        let s = store.add("s", 7, false).unwrap();

        store.write(s, 7);
        assert!(store.apply_pending().is_empty());
        assert!(!store.has_pending());
    }

    #[test]
    fn test_changes_sorted_by_id() {
        let mut store = SignalStore::new();
        let a = store.add("a", 0, false).unwrap();
        let b = store.add("b", 0, false).unwrap();
        let c = store.add("c", 0, false).unwrap();

        store.write(c, 1);
        store.write(a, 1);
        store.write(b, 1);
        let ids: Vec<_> = store.apply_pending().iter().map(|ch| ch.signal).collect();
        assert_eq!(ids, vec![a, b, c]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut store = SignalStore::new();
        assert!(store.add("clk", 0, false).is_some());
        assert!(store.add("clk", 0, false).is_none());
    }

    #[test]
    fn test_lookup_by_name() {
        let mut store = SignalStore::new();
        let s = store.add("rst_n", 1, true).unwrap();
        assert_eq!(store.id("rst_n"), Some(s));
        assert_eq!(store.name(s), Some("rst_n"));
        assert!(store.is_external(s));
        assert_eq!(store.id("missing"), None);
    }
}
