//! Simulation processes: cooperative, resumable tasks.
//!
//! A process is a state machine driven entirely by the scheduler: each
//! `resume` call runs until the process yields its next [`Wait`] condition
//! (or finishes). There are no OS threads anywhere — "concurrency" is
//! deterministic interleaving, so a fixed stimulus schedule always replays
//! the same run.
//!
//! Closures can be used directly via [`Kernel::spawn_fn`]; stateful agents
//! implement [`Process`] themselves, like the stock drivers in
//! [`crate::procs`].
//!
//! [`Kernel::spawn_fn`]: crate::scheduler::Kernel::spawn_fn

use crate::error::ProcessError;
use crate::scheduler::SimContext;
use crate::signal::EdgeKind;
use crate::sync::EventKey;
use crate::types::{SignalId, Time};

/// The wait condition a process yields when it suspends.
///
/// This is the kernel's entire wait vocabulary: a process never blocks on
/// anything else. The closed set keeps the scheduler loop exhaustively
/// matchable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wait {
    /// Resume at the given absolute macro time (delta 0).
    ///
    /// A time at or before the current macro time resumes at the next
    /// micro-step instead.
    Until(Time),

    /// Resume when the signal's applied value satisfies the edge predicate.
    Edge {
        /// The watched signal.
        signal: SignalId,
        /// Which transitions wake the process.
        edge: EdgeKind,
        /// Optional watchdog: absolute macro time at which the process is
        /// resumed with `Wake::TimedOut` even if no edge occurred.
        timeout: Option<Time>,
    },

    /// Resume when the named rendezvous fires.
    Event {
        /// The declared rendezvous to wait on.
        event: EventKey,
        /// Optional watchdog, as for [`Wait::Edge`].
        timeout: Option<Time>,
    },

    /// Resume in the next micro-step of the same macro time.
    Delta,

    /// The process body is complete; the scheduler destroys it.
    Done,
}

impl Wait {
    /// Wait for an absolute macro time.
    pub fn until(time: Time) -> Self {
        Wait::Until(time)
    }

    /// Wait for a rising edge (`0` to nonzero) on `signal`.
    pub fn rising(signal: SignalId) -> Self {
        Wait::Edge {
            signal,
            edge: EdgeKind::Rising,
            timeout: None,
        }
    }

    /// Wait for a falling edge (nonzero to `0`) on `signal`.
    pub fn falling(signal: SignalId) -> Self {
        Wait::Edge {
            signal,
            edge: EdgeKind::Falling,
            timeout: None,
        }
    }

    /// Wait for any value change on `signal`.
    pub fn any_edge(signal: SignalId) -> Self {
        Wait::Edge {
            signal,
            edge: EdgeKind::Any,
            timeout: None,
        }
    }

    /// Wait for a rendezvous to fire.
    pub fn event(event: EventKey) -> Self {
        Wait::Event {
            event,
            timeout: None,
        }
    }

    /// Bounds an edge or event wait with a watchdog deadline.
    ///
    /// Has no effect on `Until`, `Delta`, or `Done`.
    pub fn with_timeout(mut self, deadline: Time) -> Self {
        match &mut self {
            Wait::Edge { timeout, .. } | Wait::Event { timeout, .. } => {
                *timeout = Some(deadline);
            }
            _ => {}
        }
        self
    }
}

/// A cooperative simulation process.
///
/// `resume` is called exactly when the previously yielded wait condition is
/// satisfied (or its watchdog expires); the wake reason is available via
/// `ctx.wake()`. Returning an error isolates the process: the kernel
/// records the fault and terminates the process without touching the
/// calendar.
pub trait Process: Send {
    /// Runs the process until its next suspension point.
    fn resume(&mut self, ctx: &mut SimContext<'_>) -> Result<Wait, ProcessError>;
}

/// Adapter turning a closure into a [`Process`].
///
/// The closure holds its own state across resumptions; `ctx.wake()` tells
/// it why it was resumed.
pub struct FnProcess<F>(F);

impl<F> FnProcess<F>
where
    F: FnMut(&mut SimContext<'_>) -> Result<Wait, ProcessError> + Send,
{
    /// Wraps a closure as a process.
    pub fn new(body: F) -> Self {
        Self(body)
    }
}

impl<F> Process for FnProcess<F>
where
    F: FnMut(&mut SimContext<'_>) -> Result<Wait, ProcessError> + Send,
{
    fn resume(&mut self, ctx: &mut SimContext<'_>) -> Result<Wait, ProcessError> {
        (self.0)(ctx)
    }
}
