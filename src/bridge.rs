//! Synchronization bridge to the external RTL simulator.
//!
//! The bridge keeps the internal calendar and the external engine's notion
//! of time causally consistent. Between settled time slots the scheduler
//! asks the bridge to advance the engine to the earliest internal wake
//! time; the engine evaluates, reports how far it actually got and which
//! signals changed, and those changes are injected back into the calendar
//! as external events. If the engine stops short of the internal wake time
//! the injected events sort first and macro time follows the engine — the
//! kernel never runs ahead of the RTL side.
//!
//! The engine itself is opaque: only the [`RtlEngine`] contract and
//! monotonic, causal time reporting are assumed.

use crate::error::{EngineError, SimError};
use crate::signal::SignalChange;
use crate::types::{SignalId, Time, Value};

/// The consumed external-simulator contract.
///
/// Implemented by the built-in [`crate::fallback::FallbackEngine`] and by
/// adapters for real RTL simulators.
pub trait RtlEngine: Send {
    /// Evaluates up to at most `time`.
    ///
    /// Returns the time actually reached (which may be earlier if the
    /// engine had its own event first, and must never regress below a
    /// previously returned time) together with the value changes produced.
    fn advance_to(&mut self, time: Time) -> Result<(Time, Vec<SignalChange>), EngineError>;

    /// Reads a signal value from the engine.
    fn read(&mut self, signal: SignalId) -> Result<Value, EngineError>;

    /// Queues a write, applied at the engine's own next settle.
    fn write(&mut self, signal: SignalId, value: Value) -> Result<(), EngineError>;

    /// Shuts the engine down.
    fn terminate(&mut self) -> Result<(), EngineError>;
}

/// Counters for bridge activity, exported with the kernel stats.
#[derive(Clone, Copy, Debug, Default)]
pub struct BridgeStats {
    /// Number of advance handshakes performed.
    pub syncs: u64,
    /// Value changes reported by the engine.
    pub changes_in: u64,
    /// Writes forwarded to the engine.
    pub writes_out: u64,
}

/// The handshake state between the kernel and one [`RtlEngine`].
///
/// `acknowledged` is the engine-side time token: the engine has evaluated
/// up to this macro time. It is owned here and never exposed to processes.
pub struct Bridge {
    engine: Box<dyn RtlEngine>,
    acknowledged: Time,
    stats: BridgeStats,
}

impl Bridge {
    /// Wraps an engine with a fresh handshake state.
    pub fn new(engine: Box<dyn RtlEngine>) -> Self {
        Self {
            engine,
            acknowledged: 0,
            stats: BridgeStats::default(),
        }
    }

    /// Replaces the engine. Only meaningful before the run starts.
    pub fn set_engine(&mut self, engine: Box<dyn RtlEngine>) {
        self.engine = engine;
        self.acknowledged = 0;
    }

    /// The last macro time the engine acknowledged.
    pub fn acknowledged(&self) -> Time {
        self.acknowledged
    }

    /// Bridge activity counters.
    pub fn stats(&self) -> BridgeStats {
        self.stats
    }

    /// Advances the engine to at most `target` and returns its report.
    ///
    /// A reported time earlier than the acknowledged time is a fatal
    /// causality violation: the kernel aborts rather than silently
    /// reordering events.
    pub fn advance(&mut self, target: Time) -> Result<(Time, Vec<SignalChange>), SimError> {
        let (reported, changes) = self.engine.advance_to(target)?;
        if reported < self.acknowledged {
            return Err(SimError::Causality {
                reported,
                acknowledged: self.acknowledged,
            });
        }
        self.acknowledged = reported;
        self.stats.syncs += 1;
        self.stats.changes_in += changes.len() as u64;
        tracing::trace!(target = target, reached = reported, changes = changes.len(), "engine sync");
        Ok((reported, changes))
    }

    /// Forwards an applied kernel-side write to the engine.
    pub fn forward_write(&mut self, signal: SignalId, value: Value) -> Result<(), SimError> {
        self.engine.write(signal, value)?;
        self.stats.writes_out += 1;
        Ok(())
    }

    /// Reads a value directly from the engine.
    pub fn read(&mut self, signal: SignalId) -> Result<Value, SimError> {
        Ok(self.engine.read(signal)?)
    }

    /// Terminates the engine.
    pub fn terminate(&mut self) -> Result<(), SimError> {
        Ok(self.engine.terminate()?)
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("acknowledged", &self.acknowledged)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Engine that replays a scripted list of `(reached, changes)` reports.
    struct ScriptedEngine {
        script: Vec<(Time, Vec<SignalChange>)>,
        next: usize,
    }

    impl ScriptedEngine {
        fn new(script: Vec<(Time, Vec<SignalChange>)>) -> Self {
            Self { script, next: 0 }
        }
    }

    impl RtlEngine for ScriptedEngine {
        fn advance_to(&mut self, time: Time) -> Result<(Time, Vec<SignalChange>), EngineError> {
            match self.script.get(self.next) {
                Some((t, changes)) => {
                    self.next += 1;
                    Ok((*t, changes.clone()))
                }
                None => Ok((time, Vec::new())),
            }
        }

        fn read(&mut self, _signal: SignalId) -> Result<Value, EngineError> {
            Ok(0)
        }

        fn write(&mut self, _signal: SignalId, _value: Value) -> Result<(), EngineError> {
            Ok(())
        }

        fn terminate(&mut self) -> Result<(), EngineError> {
            Ok(())
        }
    }

    #[test]
    fn test_acknowledged_tracks_reports() {
        let mut bridge = Bridge::new(Box::new(ScriptedEngine::new(vec![
            (5, vec![]),
            (9, vec![]),
        ])));

        let (t, _) = bridge.advance(10).unwrap();
        assert_eq!(t, 5);
        assert_eq!(bridge.acknowledged(), 5);

        let (t, _) = bridge.advance(10).unwrap();
        assert_eq!(t, 9);
        assert_eq!(bridge.acknowledged(), 9);
    }

    #[test]
    fn test_time_regression_is_fatal() {
        let mut bridge = Bridge::new(Box::new(ScriptedEngine::new(vec![
            (8, vec![]),
            (3, vec![]),
        ])));

        bridge.advance(10).unwrap();
        let err = bridge.advance(10).unwrap_err();
        assert!(matches!(
            err,
            SimError::Causality {
                reported: 3,
                acknowledged: 8
            }
        ));
    }

    #[test]
    fn test_engine_failure_propagates() {
        struct BrokenEngine;
        impl RtlEngine for BrokenEngine {
            fn advance_to(
                &mut self,
                _time: Time,
            ) -> Result<(Time, Vec<SignalChange>), EngineError> {
                Err(EngineError::new("pipe closed"))
            }
            fn read(&mut self, _signal: SignalId) -> Result<Value, EngineError> {
                Err(EngineError::new("pipe closed"))
            }
            fn write(&mut self, _signal: SignalId, _value: Value) -> Result<(), EngineError> {
                Err(EngineError::new("pipe closed"))
            }
            fn terminate(&mut self) -> Result<(), EngineError> {
                Ok(())
            }
        }

        let mut bridge = Bridge::new(Box::new(BrokenEngine));
        assert!(matches!(bridge.advance(10), Err(SimError::Engine(_))));
    }
}
