//! Simulation time with delta-cycle tracking.
//!
//! [`SimTime`] pairs a macro time with a delta (micro-step) index. Events
//! are ordered first by macro time, then by delta, which is what lets the
//! kernel settle zero-duration signal propagation before time advances.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Time;

/// A point in simulated time: macro time plus delta-cycle index.
///
/// The derived ordering compares `time` first and `delta` second, giving
/// the macro-ascending / micro-ascending order the scheduler relies on.
/// The delta index resets to 0 whenever macro time advances, which
/// [`SimTime::at`] enforces by construction.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SimTime {
    /// Macro simulation time, visible to the external engine.
    pub time: Time,
    /// Delta-cycle (micro-step) index within this macro time.
    pub delta: u32,
}

impl SimTime {
    /// Time zero, delta zero.
    pub const ZERO: SimTime = SimTime { time: 0, delta: 0 };

    /// Creates a time point at macro time `time`, delta 0.
    pub fn at(time: Time) -> Self {
        Self { time, delta: 0 }
    }

    /// Returns the next delta cycle at the same macro time.
    pub fn next_delta(self) -> Self {
        Self {
            time: self.time,
            delta: self.delta + 1,
        }
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.delta == 0 {
            write!(f, "{}", self.time)
        } else {
            write!(f, "{}+d{}", self.time, self.delta)
        }
    }
}
