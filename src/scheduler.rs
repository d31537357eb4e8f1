//! The simulation kernel: cooperative scheduler and delta-cycle settle loop.
//!
//! [`Kernel`] owns the event calendar, the signal table, all processes, and
//! the bridge to the RTL engine. Its run loop alternates two phases:
//!
//! 1. **Settle**: at the earliest queued macro time, drain all events of the
//!    current micro-step, apply buffered signal writes, wake edge waiters in
//!    the next micro-step, and repeat until the time slot produces no more
//!    same-time work. A slot that never converges within the configured
//!    micro-step bound aborts the run.
//! 2. **Sync**: ask the external engine to advance to the earliest internal
//!    wake time; inject its reported value changes back into the calendar as
//!    external events. If the engine stops earlier, those events sort first
//!    and macro time follows the engine.
//!
//! Exactly one process executes at a time and every suspension point is one
//! of the [`Wait`] variants, so a fixed stimulus schedule replays
//! identically.

use std::collections::{HashMap, HashSet};

use tracing::{debug, error, info, warn};

use crate::bridge::{Bridge, RtlEngine};
use crate::config::SimulationParams;
use crate::error::{FaultRecord, ProcessError, SimError};
use crate::event::{Action, EventHandle, Wake, PRI_EXTERNAL, PRI_NORMAL};
use crate::fallback::FallbackEngine;
use crate::process::{FnProcess, Process, Wait};
use crate::queue::EventQueue;
use crate::signal::{EdgeKind, SignalChange, SignalStore};
use crate::stats::KernelStats;
use crate::sync::{EventKey, EventRegistry, Waiter};
use crate::time::SimTime;
use crate::trace::{ChangeObserver, ChangeTrace};
use crate::types::{Priority, ProcessId, SignalId, Time, Value};

/// Lifecycle state of a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessState {
    /// A wake-up for the process is queued.
    Runnable,
    /// Registered on a signal, an event, or a timer.
    Waiting,
    /// Completed, faulted, or killed.
    Terminated,
}

/// Where a waiting process is registered, so the wait can be torn down
/// when the process is woken by a sibling condition or killed.
#[derive(Debug, Default)]
enum WaitReg {
    #[default]
    None,
    Queue(EventHandle),
    Edge {
        signal: SignalId,
        timeout: Option<EventHandle>,
    },
    Event {
        key: EventKey,
        timeout: Option<EventHandle>,
    },
}

struct ProcSlot {
    name: String,
    body: Option<Box<dyn Process>>,
    state: ProcessState,
    reg: WaitReg,
}

#[derive(Clone, Copy, Debug)]
struct EdgeWaiter {
    pid: ProcessId,
    edge: EdgeKind,
    timeout: Option<EventHandle>,
}

enum Command {
    Fire {
        key: EventKey,
        data: Option<serde_json::Value>,
    },
    Spawn {
        name: String,
        body: Box<dyn Process>,
    },
}

/// Execution context handed to a process on every resumption.
///
/// This is the entire surface a process body may touch: signal reads and
/// buffered writes, rendezvous firing, spawning, and the current time and
/// wake reason. Everything else belongs to the kernel.
pub struct SimContext<'a> {
    now: SimTime,
    wake: Wake,
    pid: ProcessId,
    signals: &'a mut SignalStore,
    events: &'a EventRegistry,
    cmds: &'a mut Vec<Command>,
}

impl SimContext<'_> {
    /// Current simulation time.
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Why the process was resumed.
    pub fn wake(&self) -> &Wake {
        &self.wake
    }

    /// The running process's id.
    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    /// Reads a signal's observable value.
    pub fn read(&self, signal: SignalId) -> Result<Value, ProcessError> {
        self.signals
            .read(signal)
            .ok_or(ProcessError::UnknownSignal(signal))
    }

    /// Stages a write, applied at the next micro-step boundary.
    pub fn write(&mut self, signal: SignalId, value: Value) -> Result<(), ProcessError> {
        if self.signals.write(signal, value) {
            Ok(())
        } else {
            Err(ProcessError::UnknownSignal(signal))
        }
    }

    /// Looks up a signal by name.
    pub fn signal(&self, name: &str) -> Option<SignalId> {
        self.signals.id(name)
    }

    /// Looks up a declared rendezvous by name.
    pub fn event(&self, name: &str) -> Option<EventKey> {
        self.events.key(name)
    }

    /// Fires a rendezvous, releasing all current waiters in this
    /// micro-step.
    pub fn fire(&mut self, event: EventKey) -> Result<(), ProcessError> {
        self.fire_inner(event, None)
    }

    /// Fires a rendezvous with a payload delivered to every waiter.
    pub fn fire_with(
        &mut self,
        event: EventKey,
        data: serde_json::Value,
    ) -> Result<(), ProcessError> {
        self.fire_inner(event, Some(data))
    }

    fn fire_inner(
        &mut self,
        event: EventKey,
        data: Option<serde_json::Value>,
    ) -> Result<(), ProcessError> {
        if !self.events.contains(event) {
            return Err(ProcessError::UnknownEvent(format!("#{}", event.0)));
        }
        self.cmds.push(Command::Fire { key: event, data });
        Ok(())
    }

    /// Spawns a child process, first resumed in this micro-step.
    pub fn spawn(&mut self, name: impl Into<String>, body: Box<dyn Process>) {
        self.cmds.push(Command::Spawn {
            name: name.into(),
            body,
        });
    }

    /// Spawns a closure-bodied child process.
    pub fn spawn_fn<F>(&mut self, name: impl Into<String>, body: F)
    where
        F: FnMut(&mut SimContext<'_>) -> Result<Wait, ProcessError> + Send + 'static,
    {
        self.spawn(name, Box::new(FnProcess::new(body)));
    }
}

/// The discrete-event simulation kernel.
pub struct Kernel {
    now: SimTime,
    queue: EventQueue,
    signals: SignalStore,
    events: EventRegistry,
    procs: Vec<ProcSlot>,
    edge_waiters: HashMap<SignalId, Vec<EdgeWaiter>>,
    bridge: Bridge,
    params: SimulationParams,
    observers: Vec<Box<dyn ChangeObserver>>,
    trace: Option<ChangeTrace>,
    stats: KernelStats,
    faults: Vec<FaultRecord>,
    cmds: Vec<Command>,
    last_resumed: Option<ProcessId>,
    // Signals whose pending write came from the engine this micro-step;
    // their application must not be echoed back over the bridge.
    ext_in: HashSet<SignalId>,
}

impl Default for Kernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel {
    /// Creates a kernel with default parameters and the built-in fallback
    /// engine.
    pub fn new() -> Self {
        Self::with_params(SimulationParams::default())
    }

    /// Creates a kernel with the given parameters and the built-in
    /// fallback engine.
    pub fn with_params(params: SimulationParams) -> Self {
        Self {
            now: SimTime::ZERO,
            queue: EventQueue::new(),
            signals: SignalStore::new(),
            events: EventRegistry::new(),
            procs: Vec::new(),
            edge_waiters: HashMap::new(),
            bridge: Bridge::new(Box::new(FallbackEngine::new())),
            params,
            observers: Vec::new(),
            trace: None,
            stats: KernelStats::default(),
            faults: Vec::new(),
            cmds: Vec::new(),
            last_resumed: None,
            ext_in: HashSet::new(),
        }
    }

    /// Replaces the fallback engine with an external RTL engine.
    ///
    /// Call before the first `run`.
    pub fn attach_engine(&mut self, engine: Box<dyn RtlEngine>) {
        self.bridge.set_engine(engine);
    }

    /// Registers a passive signal-change observer.
    pub fn add_observer(&mut self, observer: Box<dyn ChangeObserver>) {
        self.observers.push(observer);
    }

    /// Enables the built-in change trace.
    pub fn enable_trace(&mut self) {
        if self.trace.is_none() {
            self.trace = Some(ChangeTrace::new());
        }
    }

    /// The built-in change trace, if enabled.
    pub fn trace(&self) -> Option<&ChangeTrace> {
        self.trace.as_ref()
    }

    /// Current simulation time.
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Run statistics so far.
    pub fn stats(&self) -> &KernelStats {
        &self.stats
    }

    /// Non-fatal process faults recorded so far.
    pub fn faults(&self) -> &[FaultRecord] {
        &self.faults
    }

    /// Adds a kernel-internal signal. `None` if the name is taken.
    pub fn add_signal(&mut self, name: &str, init: Value) -> Option<SignalId> {
        self.signals.add(name, init, false)
    }

    /// Adds a signal bound to the external engine. `None` if the name is
    /// taken.
    ///
    /// Applied writes are forwarded to the engine, and the engine's change
    /// reports for this id are injected back as external events.
    pub fn add_external_signal(&mut self, name: &str, init: Value) -> Option<SignalId> {
        self.signals.add(name, init, true)
    }

    /// Looks up a signal by name.
    pub fn signal_id(&self, name: &str) -> Option<SignalId> {
        self.signals.id(name)
    }

    /// Declares a named rendezvous event (idempotent).
    pub fn declare_event(&mut self, name: &str) -> EventKey {
        self.events.declare(name)
    }

    /// Looks up a declared rendezvous by name.
    pub fn event_key(&self, name: &str) -> Option<EventKey> {
        self.events.key(name)
    }

    /// Reads a signal's observable value.
    pub fn read_signal(&self, signal: SignalId) -> Option<Value> {
        self.signals.read(signal)
    }

    /// Stages a write, applied at the next micro-step boundary.
    ///
    /// Before the first `run` this is how testbenches preinitialize
    /// signals; the write observes the same delta semantics as a process
    /// write. Returns `false` for an unknown id.
    pub fn write_signal(&mut self, signal: SignalId, value: Value) -> bool {
        self.signals.write(signal, value)
    }

    /// Fires a rendezvous from outside any process.
    pub fn fire_event(&mut self, event: EventKey, data: Option<serde_json::Value>) {
        self.fire_now(event, data);
    }

    /// Lifecycle state of a process.
    pub fn process_state(&self, pid: ProcessId) -> Option<ProcessState> {
        self.procs.get(pid as usize).map(|s| s.state)
    }

    /// Spawns a process; it is first resumed in the current micro-step.
    pub fn spawn(&mut self, name: impl Into<String>, body: Box<dyn Process>) -> ProcessId {
        let pid = self.procs.len() as ProcessId;
        let name = name.into();
        let handle = self.sched(self.now, PRI_NORMAL, Action::Wake(pid, Wake::Start));
        debug!(process = %name, pid, "spawn");
        self.procs.push(ProcSlot {
            name,
            body: Some(body),
            state: ProcessState::Runnable,
            reg: WaitReg::Queue(handle),
        });
        self.stats.processes_spawned += 1;
        pid
    }

    /// Spawns a closure-bodied process.
    pub fn spawn_fn<F>(&mut self, name: impl Into<String>, body: F) -> ProcessId
    where
        F: FnMut(&mut SimContext<'_>) -> Result<Wait, ProcessError> + Send + 'static,
    {
        self.spawn(name, Box::new(FnProcess::new(body)))
    }

    /// Kills a process: its pending wait is removed from the calendar.
    ///
    /// Signal writes it already committed are not rolled back.
    pub fn kill(&mut self, pid: ProcessId) {
        let Some(slot) = self.procs.get_mut(pid as usize) else {
            return;
        };
        if slot.state == ProcessState::Terminated {
            return;
        }
        let reg = std::mem::take(&mut slot.reg);
        slot.state = ProcessState::Terminated;
        slot.body = None;
        let name = slot.name.clone();
        self.clear_registration(pid, reg, None);
        self.stats.processes_killed += 1;
        debug!(process = %name, pid, "killed");
    }

    /// Shuts down the attached engine.
    pub fn terminate(&mut self) -> Result<(), SimError> {
        self.bridge.terminate()
    }

    /// Runs the simulation until macro time `until`.
    ///
    /// May be called repeatedly with increasing bounds to continue a run.
    /// Fatal errors ([`SimError`]) end the run; recoverable process faults
    /// are recorded in [`Kernel::faults`] unless `abort_on_fault` is set.
    pub fn run(&mut self, until: Time) -> Result<(), SimError> {
        if until < self.now.time {
            return Ok(());
        }
        info!(from = self.now.time, until, "run");
        loop {
            // Initial and inter-slot buffered writes settle at the current
            // macro time before the engine is consulted.
            if self.signals.has_pending() {
                self.settle_at(self.now.time)?;
                continue;
            }

            let t_internal = self
                .queue
                .next_time()
                .map(|t| t.time)
                .unwrap_or(until)
                .min(until);
            let reached = self.sync_external(t_internal)?;

            match self.queue.next_time() {
                // Settle only once the engine has acknowledged the slot's
                // time, so the kernel never runs ahead of the RTL side.
                Some(t) if t.time <= until && reached >= t.time => {
                    self.settle_at(t.time)?;
                }
                Some(t) if t.time <= until => {
                    // Engine stopped short of the next slot without visible
                    // changes; ask again from where it got to.
                    debug_assert!(reached < t.time);
                }
                _ => {
                    if reached >= t_internal {
                        // Engine is caught up and nothing is left inside
                        // the bound.
                        if self.now.time < until {
                            self.now = SimTime::at(until);
                        }
                        break;
                    }
                }
            }
        }
        info!(now = self.now.time, "run complete");
        Ok(())
    }

    fn sched(&mut self, time: SimTime, priority: Priority, action: Action) -> EventHandle {
        self.stats.events_scheduled += 1;
        self.queue.schedule(time, priority, action)
    }

    fn cancel(&mut self, handle: EventHandle) {
        self.stats.events_cancelled += 1;
        self.queue.cancel(handle);
    }

    /// Advances the engine to at most `target`; injects reported changes.
    fn sync_external(&mut self, target: Time) -> Result<Time, SimError> {
        let (reached, changes) = self.bridge.advance(target)?;
        self.stats.external_syncs += 1;
        if changes.is_empty() {
            return Ok(reached);
        }
        // External changes land at the reported macro time. If the engine
        // lands on the kernel's current macro time, that slot's current
        // micro-step is already drained, so they go one micro-step later.
        let slot = if reached <= self.now.time {
            self.now.next_delta()
        } else {
            SimTime::at(reached)
        };
        for ch in changes {
            if !self.signals.contains(ch.signal) {
                warn!(signal = ch.signal, "external change for unknown signal dropped");
                continue;
            }
            self.sched(
                slot,
                PRI_EXTERNAL,
                Action::ExternalChange {
                    signal: ch.signal,
                    value: ch.new,
                },
            );
            self.stats.external_changes += 1;
        }
        Ok(reached)
    }

    /// Settles one macro time slot: drains micro-steps until quiescent.
    fn settle_at(&mut self, t: Time) -> Result<(), SimError> {
        debug_assert!(t >= self.now.time, "settle going backwards");
        if t > self.now.time {
            self.now = SimTime::at(t);
        }
        self.stats.slots_settled += 1;

        loop {
            if self.now.delta >= self.params.max_delta_cycles {
                let process = self
                    .last_resumed
                    .and_then(|pid| self.procs.get(pid as usize))
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| "<none>".to_string());
                error!(time = t, process = %process, "delta cycle overflow");
                return Err(SimError::DeltaOverflow {
                    time: t,
                    process,
                    limit: self.params.max_delta_cycles,
                });
            }

            // Drain everything in the current micro-step, including entries
            // scheduled into it while draining (rendezvous fires, spawns).
            while let Some(next) = self.queue.next_time() {
                if next != self.now {
                    debug_assert!(next > self.now, "calendar behind current time");
                    break;
                }
                let Some(entry) = self.queue.pop_earliest() else {
                    break;
                };
                self.stats.events_fired += 1;
                match entry.action {
                    Action::ExternalChange { signal, value } => {
                        if self.signals.write(signal, value) {
                            self.ext_in.insert(signal);
                        }
                    }
                    Action::Wake(pid, wake) => {
                        self.run_process(pid, wake, entry.handle)?
                    }
                }
            }
            self.stats.micro_steps += 1;

            // Micro-step boundary: all buffered writes become observable at
            // once, then dependents are notified for the next micro-step.
            let changes = self.signals.apply_pending();
            if !changes.is_empty() {
                self.stats.signal_changes += changes.len() as u64;
                self.commit_changes(&changes)?;
            }
            self.ext_in.clear();

            let more_here = self
                .queue
                .next_time()
                .map_or(false, |next| next.time == t);
            if !more_here {
                break;
            }
            self.now = self.now.next_delta();
        }
        Ok(())
    }

    /// Publishes applied changes: observers, engine write-back, and edge
    /// waiter wake-ups in the next micro-step.
    fn commit_changes(&mut self, changes: &[SignalChange]) -> Result<(), SimError> {
        let wake_at = self.now.next_delta();
        for ch in changes {
            for obs in &mut self.observers {
                obs.on_change(self.now, ch);
            }
            if let Some(trace) = &mut self.trace {
                trace.on_change(self.now, ch);
            }
            if self.signals.is_external(ch.signal) && !self.ext_in.contains(&ch.signal) {
                self.bridge.forward_write(ch.signal, ch.new)?;
            }

            let mut matched = Vec::new();
            if let Some(list) = self.edge_waiters.get_mut(&ch.signal) {
                list.retain(|w| {
                    if w.edge.matches(ch.old, ch.new) {
                        matched.push(*w);
                        false
                    } else {
                        true
                    }
                });
            }
            for w in matched {
                if let Some(h) = w.timeout {
                    self.cancel(h);
                }
                let handle = self.sched(
                    wake_at,
                    PRI_NORMAL,
                    Action::Wake(w.pid, Wake::Edge { signal: ch.signal }),
                );
                if let Some(slot) = self.procs.get_mut(w.pid as usize) {
                    slot.reg = WaitReg::Queue(handle);
                    slot.state = ProcessState::Runnable;
                }
            }
        }
        Ok(())
    }

    /// Resumes one process and applies its next wait condition.
    ///
    /// `fired` is the calendar entry that delivered this wake; teardown of
    /// the previous registration must not tombstone it, since it has
    /// already been popped.
    fn run_process(
        &mut self,
        pid: ProcessId,
        wake: Wake,
        fired: EventHandle,
    ) -> Result<(), SimError> {
        let Some(slot) = self.procs.get_mut(pid as usize) else {
            return Ok(());
        };
        if slot.state == ProcessState::Terminated {
            return Ok(());
        }
        let reg = std::mem::take(&mut slot.reg);
        let Some(mut body) = slot.body.take() else {
            return Ok(());
        };
        slot.state = ProcessState::Runnable;
        let name = slot.name.clone();
        // Tear down any sibling registration (e.g. the watchdog of an edge
        // wait that just fired, or the waiter entry of a wait that timed
        // out).
        self.clear_registration(pid, reg, Some(fired));
        self.last_resumed = Some(pid);

        let mut cmds = std::mem::take(&mut self.cmds);
        let result = {
            let mut ctx = SimContext {
                now: self.now,
                wake,
                pid,
                signals: &mut self.signals,
                events: &self.events,
                cmds: &mut cmds,
            };
            body.resume(&mut ctx)
        };
        self.cmds = cmds;
        if let Some(slot) = self.procs.get_mut(pid as usize) {
            slot.body = Some(body);
        }
        self.drain_commands();

        match result {
            Ok(wait) => self.apply_wait(pid, &name, wait),
            Err(err) => self.record_fault(pid, &name, err),
        }
    }

    fn drain_commands(&mut self) {
        let mut cmds = std::mem::take(&mut self.cmds);
        for cmd in cmds.drain(..) {
            match cmd {
                Command::Fire { key, data } => self.fire_now(key, data),
                Command::Spawn { name, body } => {
                    self.spawn(name, body);
                }
            }
        }
        // Nested commands are not possible: fire/spawn only enqueue.
        self.cmds = cmds;
    }

    /// Releases all current waiters of a rendezvous in the current
    /// micro-step.
    fn fire_now(&mut self, key: EventKey, data: Option<serde_json::Value>) {
        let waiters = self.events.take_waiters(key);
        for w in waiters {
            if let Some(h) = w.timeout {
                self.cancel(h);
            }
            let handle = self.sched(
                self.now,
                PRI_NORMAL,
                Action::Wake(
                    w.pid,
                    Wake::Event {
                        event: key,
                        data: data.clone(),
                    },
                ),
            );
            if let Some(slot) = self.procs.get_mut(w.pid as usize) {
                slot.reg = WaitReg::Queue(handle);
                slot.state = ProcessState::Runnable;
            }
        }
    }

    /// Registers the wait condition a process yielded.
    ///
    /// Unknown signal or event targets are reported here, at schedule time.
    fn apply_wait(&mut self, pid: ProcessId, name: &str, wait: Wait) -> Result<(), SimError> {
        match wait {
            Wait::Done => {
                if let Some(slot) = self.procs.get_mut(pid as usize) {
                    slot.state = ProcessState::Terminated;
                    slot.body = None;
                }
                self.stats.processes_completed += 1;
                debug!(process = %name, pid, "completed");
            }
            Wait::Delta => {
                let handle = self.sched(
                    self.now.next_delta(),
                    PRI_NORMAL,
                    Action::Wake(pid, Wake::Timer),
                );
                self.set_waiting(pid, WaitReg::Queue(handle));
            }
            Wait::Until(t) => {
                let at = if t <= self.now.time {
                    self.now.next_delta()
                } else {
                    SimTime::at(t)
                };
                let handle = self.sched(at, PRI_NORMAL, Action::Wake(pid, Wake::Timer));
                self.set_waiting(pid, WaitReg::Queue(handle));
            }
            Wait::Edge {
                signal,
                edge,
                timeout,
            } => {
                if !self.signals.contains(signal) {
                    return self.record_fault(pid, name, ProcessError::UnknownSignal(signal));
                }
                let th = timeout.map(|d| self.schedule_watchdog(pid, d));
                self.edge_waiters
                    .entry(signal)
                    .or_default()
                    .push(EdgeWaiter {
                        pid,
                        edge,
                        timeout: th,
                    });
                self.set_waiting(pid, WaitReg::Edge { signal, timeout: th });
            }
            Wait::Event { event, timeout } => {
                if !self.events.contains(event) {
                    return self.record_fault(
                        pid,
                        name,
                        ProcessError::UnknownEvent(format!("#{}", event.0)),
                    );
                }
                let th = timeout.map(|d| self.schedule_watchdog(pid, d));
                self.events.add_waiter(event, Waiter { pid, timeout: th });
                self.set_waiting(pid, WaitReg::Event { key: event, timeout: th });
            }
        }
        Ok(())
    }

    fn schedule_watchdog(&mut self, pid: ProcessId, deadline: Time) -> EventHandle {
        let at = if deadline <= self.now.time {
            self.now.next_delta()
        } else {
            SimTime::at(deadline)
        };
        self.sched(at, PRI_NORMAL, Action::Wake(pid, Wake::TimedOut))
    }

    fn set_waiting(&mut self, pid: ProcessId, reg: WaitReg) {
        if let Some(slot) = self.procs.get_mut(pid as usize) {
            slot.state = ProcessState::Waiting;
            slot.reg = reg;
        }
    }

    fn clear_registration(&mut self, pid: ProcessId, reg: WaitReg, fired: Option<EventHandle>) {
        match reg {
            WaitReg::None => {}
            WaitReg::Queue(handle) => {
                if Some(handle) != fired {
                    self.cancel(handle);
                }
            }
            WaitReg::Edge { signal, timeout } => {
                if let Some(list) = self.edge_waiters.get_mut(&signal) {
                    list.retain(|w| w.pid != pid);
                }
                if let Some(h) = timeout {
                    if Some(h) != fired {
                        self.cancel(h);
                    }
                }
            }
            WaitReg::Event { key, timeout } => {
                self.events.remove_waiter(key, pid);
                if let Some(h) = timeout {
                    if Some(h) != fired {
                        self.cancel(h);
                    }
                }
            }
        }
    }

    /// Isolates a failed process: record, terminate it, keep running
    /// unless configured to abort.
    fn record_fault(
        &mut self,
        pid: ProcessId,
        name: &str,
        err: ProcessError,
    ) -> Result<(), SimError> {
        if let Some(slot) = self.procs.get_mut(pid as usize) {
            slot.state = ProcessState::Terminated;
            slot.body = None;
        }
        self.stats.process_faults += 1;
        warn!(process = %name, time = %self.now, error = %err, "process fault");
        self.faults.push(FaultRecord {
            process: name.to_string(),
            time: self.now,
            message: err.to_string(),
        });
        if self.params.abort_on_fault {
            return Err(SimError::ProcessFault {
                process: name.to_string(),
                time: self.now,
                source: err,
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kernel")
            .field("now", &self.now)
            .field("queued", &self.queue.len())
            .field("signals", &self.signals.len())
            .field("processes", &self.procs.len())
            .finish_non_exhaustive()
    }
}
