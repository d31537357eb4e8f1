//! Error taxonomy for the simulation kernel.
//!
//! Fatal conditions ([`SimError`]) abort the run: the kernel never repairs
//! a violated scheduling or causality invariant, since silent recovery
//! would corrupt reproducibility. Per-process failures ([`ProcessError`])
//! are isolated and recorded; they only end the run when the kernel is
//! configured to abort on fault.

use serde::Serialize;
use thiserror::Error;

use crate::time::SimTime;
use crate::types::{SignalId, Time};

/// Fatal kernel errors. Returned from `Kernel::run`; the run is over.
#[derive(Debug, Error)]
pub enum SimError {
    /// The delta-cycle settle loop at one macro time exceeded the
    /// configured bound without the calendar advancing — some process keeps
    /// rescheduling itself in the same macro time.
    #[error(
        "delta cycle overflow at t={time}: exceeded {limit} micro-steps, \
         last resumed process '{process}'"
    )]
    DeltaOverflow {
        /// Macro time at which settlement never converged.
        time: Time,
        /// Identity of the most recently resumed process.
        process: String,
        /// The configured micro-step bound.
        limit: u32,
    },

    /// The external engine reported a time earlier than one it already
    /// acknowledged.
    #[error(
        "causality violation: external engine reported t={reported} after \
         acknowledging t={acknowledged}"
    )]
    Causality {
        /// The regressed time report.
        reported: Time,
        /// The last acknowledged external time.
        acknowledged: Time,
    },

    /// The external engine itself failed.
    #[error("external engine: {0}")]
    Engine(#[from] EngineError),

    /// A process fault with `abort_on_fault` configured.
    #[error("process '{process}' faulted at {time}: {source}")]
    ProcessFault {
        /// Name of the faulted process.
        process: String,
        /// Simulation time of the fault.
        time: SimTime,
        /// The underlying failure.
        source: ProcessError,
    },
}

/// Failure of the external engine behind the [`crate::bridge::RtlEngine`]
/// contract.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct EngineError(pub String);

impl EngineError {
    /// Creates an engine error from any message.
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Per-process failures, surfaced to the scheduler from `resume`.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The process read, wrote, or waited on a signal id that names no
    /// signal.
    #[error("unknown signal id {0}")]
    UnknownSignal(SignalId),

    /// The process waited on or fired a rendezvous that was never declared.
    #[error("unknown event '{0}'")]
    UnknownEvent(String),

    /// An application-level failure inside the process body.
    #[error("{0}")]
    Fault(String),
}

impl ProcessError {
    /// Creates an application-level fault.
    pub fn fault(msg: impl Into<String>) -> Self {
        ProcessError::Fault(msg.into())
    }
}

/// A recorded, non-fatal process failure.
#[derive(Debug, Clone, Serialize)]
pub struct FaultRecord {
    /// Name of the faulted process.
    pub process: String,
    /// Simulation time of the fault.
    pub time: SimTime,
    /// Rendered failure message.
    pub message: String,
}
