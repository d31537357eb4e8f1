//! Mock process implementations for testing.
//!
//! These processes provide simple, predictable behaviors useful for
//! observing kernel scheduling from tests: they record what happened and
//! when into shared logs that outlive the kernel run.

use std::sync::{Arc, Mutex};

use crate::error::ProcessError;
use crate::event::Wake;
use crate::process::{Process, Wait};
use crate::scheduler::SimContext;
use crate::signal::EdgeKind;
use crate::sync::EventKey;
use crate::time::SimTime;
use crate::types::SignalId;

/// Records the time of every matching edge on a signal.
#[derive(Debug)]
pub struct EdgeCounter {
    /// The watched signal
    pub signal: SignalId,
    /// Which transitions are recorded
    pub edge: EdgeKind,
    times: Arc<Mutex<Vec<SimTime>>>,
    started: bool,
}

impl EdgeCounter {
    /// Creates an edge counter on `signal`.
    pub fn new(signal: SignalId, edge: EdgeKind) -> Self {
        Self {
            signal,
            edge,
            times: Arc::new(Mutex::new(Vec::new())),
            started: false,
        }
    }

    /// A shared handle to the recorded edge times; clone it before
    /// handing the counter to the kernel.
    pub fn times(&self) -> Arc<Mutex<Vec<SimTime>>> {
        Arc::clone(&self.times)
    }
}

impl Process for EdgeCounter {
    fn resume(&mut self, ctx: &mut SimContext<'_>) -> Result<Wait, ProcessError> {
        if self.started {
            self.times
                .lock()
                .map_err(|_| ProcessError::fault("edge log poisoned"))?
                .push(ctx.now());
        } else {
            self.started = true;
        }
        Ok(Wait::Edge {
            signal: self.signal,
            edge: self.edge,
            timeout: None,
        })
    }
}

/// Records every firing of a rendezvous, with its payload.
#[derive(Debug)]
pub struct EventRecorder {
    /// The watched rendezvous
    pub event: EventKey,
    log: Arc<Mutex<Vec<(SimTime, Option<serde_json::Value>)>>>,
    started: bool,
}

impl EventRecorder {
    /// Creates a recorder on `event`.
    pub fn new(event: EventKey) -> Self {
        Self {
            event,
            log: Arc::new(Mutex::new(Vec::new())),
            started: false,
        }
    }

    /// A shared handle to the recorded firings.
    pub fn log(&self) -> Arc<Mutex<Vec<(SimTime, Option<serde_json::Value>)>>> {
        Arc::clone(&self.log)
    }
}

impl Process for EventRecorder {
    fn resume(&mut self, ctx: &mut SimContext<'_>) -> Result<Wait, ProcessError> {
        if self.started {
            let data = match ctx.wake() {
                Wake::Event { data, .. } => data.clone(),
                _ => None,
            };
            self.log
                .lock()
                .map_err(|_| ProcessError::fault("event log poisoned"))?
                .push((ctx.now(), data));
        } else {
            self.started = true;
        }
        Ok(Wait::event(self.event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Kernel;

    #[test]
    fn test_edge_counter_ignores_non_matching_edges() {
        let mut k = Kernel::new();
        let s = k.add_signal("s", 0).unwrap();
        let counter = EdgeCounter::new(s, EdgeKind::Falling);
        let times = counter.times();
        k.spawn("counter", Box::new(counter));

        let mut step = 0;
        k.spawn_fn("toggler", move |ctx| {
            let s = ctx.signal("s").unwrap();
            step += 1;
            match step {
                1 => {
                    ctx.write(s, 1)?;
                    Ok(Wait::until(10))
                }
                2 => {
                    ctx.write(s, 0)?;
                    Ok(Wait::until(20))
                }
                3 => {
                    ctx.write(s, 1)?;
                    Ok(Wait::Done)
                }
                _ => Ok(Wait::Done),
            }
        });

        k.run(30).unwrap();
        let seen: Vec<_> = times.lock().unwrap().iter().map(|t| t.time).collect();
        assert_eq!(seen, vec![10]);
    }

    #[test]
    fn test_event_recorder_captures_payload() {
        let mut k = Kernel::new();
        let ev = k.declare_event("data_ready");
        let recorder = EventRecorder::new(ev);
        let log = recorder.log();
        k.spawn("recorder", Box::new(recorder));

        let mut fired = false;
        k.spawn_fn("producer", move |ctx| {
            if !fired {
                fired = true;
                return Ok(Wait::until(12));
            }
            let ev = ctx.event("data_ready").unwrap();
            ctx.fire_with(ev, serde_json::json!({"word": 0xbeef}))?;
            Ok(Wait::Done)
        });

        k.run(20).unwrap();
        let log = log.lock().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].0.time, 12);
        assert_eq!(log[0].1, Some(serde_json::json!({"word": 0xbeef})));
    }
}
