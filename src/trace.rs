//! Passive observers of applied signal changes.
//!
//! Observers see every change exactly when its buffered write is applied,
//! in deterministic order. They are read-only: waveform dumps, logging
//! sinks, and the replay-comparison used by the determinism tests all hang
//! off this trait.

use serde::{Deserialize, Serialize};

use crate::signal::SignalChange;
use crate::time::SimTime;

/// A read-only sink for applied signal changes.
pub trait ChangeObserver: Send {
    /// Called once per applied change, after the micro-step boundary.
    fn on_change(&mut self, time: SimTime, change: &SignalChange);
}

/// One observed change with its simulation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// When the change was applied.
    pub time: SimTime,
    /// The change itself.
    pub change: SignalChange,
}

/// An in-memory recorder of every signal change, in application order.
///
/// Two runs with identical stimuli produce byte-identical traces.
#[derive(Debug, Default)]
pub struct ChangeTrace {
    records: Vec<TraceRecord>,
}

impl ChangeTrace {
    /// Creates an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded changes, in application order.
    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    /// Number of recorded changes.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serializes the trace as a JSON array.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.records).unwrap_or(serde_json::Value::Null)
    }
}

impl ChangeObserver for ChangeTrace {
    fn on_change(&mut self, time: SimTime, change: &SignalChange) {
        self.records.push(TraceRecord {
            time,
            change: *change,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut trace = ChangeTrace::new();
        let c1 = SignalChange { signal: 0, old: 0, new: 1 };
        let c2 = SignalChange { signal: 1, old: 1, new: 0 };
        trace.on_change(SimTime::at(5), &c1);
        trace.on_change(SimTime::at(5).next_delta(), &c2);

        assert_eq!(trace.len(), 2);
        assert_eq!(trace.records()[0].change, c1);
        assert_eq!(trace.records()[1].time, SimTime::at(5).next_delta());
    }

    #[test]
    fn test_json_export() {
        let mut trace = ChangeTrace::new();
        trace.on_change(
            SimTime::at(3),
            &SignalChange { signal: 2, old: 0, new: 4 },
        );
        let json = trace.to_json();
        assert_eq!(json[0]["change"]["signal"], 2);
        assert_eq!(json[0]["time"]["time"], 3);
    }
}
