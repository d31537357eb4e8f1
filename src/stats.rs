//! Run statistics collected by the kernel.

use serde::{Deserialize, Serialize};

/// Counters accumulated over a run.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct KernelStats {
    /// Calendar entries scheduled.
    pub events_scheduled: u64,
    /// Calendar entries drained and acted on.
    pub events_fired: u64,
    /// Calendar entries cancelled before firing.
    pub events_cancelled: u64,
    /// Micro-steps (delta cycles) executed.
    pub micro_steps: u64,
    /// Macro time slots settled.
    pub slots_settled: u64,
    /// Processes spawned.
    pub processes_spawned: u64,
    /// Processes that ran to completion.
    pub processes_completed: u64,
    /// Processes killed before completion.
    pub processes_killed: u64,
    /// Recorded non-fatal process faults.
    pub process_faults: u64,
    /// Signal changes applied at micro-step boundaries.
    pub signal_changes: u64,
    /// Bridge handshakes with the external engine.
    pub external_syncs: u64,
    /// Value changes injected from the external engine.
    pub external_changes: u64,
}

impl KernelStats {
    /// Exports the counters as a JSON object.
    pub fn export(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
