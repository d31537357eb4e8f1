//! Built-in fallback engine for runs without an external RTL simulator.
//!
//! [`FallbackEngine`] implements the [`RtlEngine`] contract entirely
//! in-process: a value table, writes buffered until the next `advance_to`,
//! and combinational rules settled to a fixpoint. Rule outputs computed in
//! one settle iteration are applied simultaneously before the next
//! iteration, so the fallback observes the same delta-cycle semantics as
//! the kernel's own signal model.

use std::collections::HashMap;

use crate::bridge::RtlEngine;
use crate::error::EngineError;
use crate::signal::SignalChange;
use crate::types::{SignalId, Time, Value};

/// Iteration bound for combinational settlement.
const SETTLE_LIMIT: u32 = 1000;

type RuleFn = Box<dyn Fn(&[Value]) -> Value + Send>;

struct CombRule {
    inputs: Vec<SignalId>,
    output: SignalId,
    func: RuleFn,
}

/// A pure in-kernel stand-in for an external RTL simulator.
///
/// Signals default to 0 on first touch; bind the same [`SignalId`]s the
/// kernel allocated so both sides name the same wires.
#[derive(Default)]
pub struct FallbackEngine {
    values: HashMap<SignalId, Value>,
    pending: Vec<(SignalId, Value)>,
    rules: Vec<CombRule>,
}

impl FallbackEngine {
    /// Creates an empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Presets a signal value (before the run starts).
    pub fn set(&mut self, signal: SignalId, value: Value) {
        self.values.insert(signal, value);
    }

    /// Adds a combinational rule: `output = func(inputs)`.
    ///
    /// Rules are re-evaluated on every settle iteration until no output
    /// changes.
    pub fn add_rule(
        &mut self,
        inputs: impl Into<Vec<SignalId>>,
        output: SignalId,
        func: impl Fn(&[Value]) -> Value + Send + 'static,
    ) {
        self.rules.push(CombRule {
            inputs: inputs.into(),
            output,
            func: Box::new(func),
        });
    }

    fn value(&self, signal: SignalId) -> Value {
        self.values.get(&signal).copied().unwrap_or(0)
    }

    /// Applies one batch of simultaneous updates, recording first-old /
    /// last-new per signal.
    fn commit(
        &mut self,
        batch: Vec<(SignalId, Value)>,
        changes: &mut HashMap<SignalId, (Value, Value)>,
    ) {
        for (signal, new) in batch {
            let old = self.value(signal);
            if old == new {
                continue;
            }
            self.values.insert(signal, new);
            changes
                .entry(signal)
                .and_modify(|(_, last)| *last = new)
                .or_insert((old, new));
        }
    }

    fn settle(&mut self, changes: &mut HashMap<SignalId, (Value, Value)>) -> Result<(), EngineError> {
        for _ in 0..SETTLE_LIMIT {
            let mut batch = Vec::new();
            for rule in &self.rules {
                let inputs: Vec<Value> = rule.inputs.iter().map(|&s| self.value(s)).collect();
                let out = (rule.func)(&inputs);
                if out != self.value(rule.output) {
                    batch.push((rule.output, out));
                }
            }
            if batch.is_empty() {
                return Ok(());
            }
            self.commit(batch, changes);
        }
        Err(EngineError::new(format!(
            "combinational logic did not settle within {SETTLE_LIMIT} iterations"
        )))
    }
}

impl RtlEngine for FallbackEngine {
    fn advance_to(&mut self, time: Time) -> Result<(Time, Vec<SignalChange>), EngineError> {
        let mut merged: HashMap<SignalId, (Value, Value)> = HashMap::new();

        let writes = std::mem::take(&mut self.pending);
        self.commit(writes, &mut merged);
        self.settle(&mut merged)?;

        let mut changes: Vec<SignalChange> = merged
            .into_iter()
            .filter(|(_, (old, new))| old != new)
            .map(|(signal, (old, new))| SignalChange { signal, old, new })
            .collect();
        changes.sort_unstable_by_key(|c| c.signal);

        // The fallback has no events of its own; it always reaches the
        // requested time.
        Ok((time, changes))
    }

    fn read(&mut self, signal: SignalId) -> Result<Value, EngineError> {
        Ok(self.value(signal))
    }

    fn write(&mut self, signal: SignalId, value: Value) -> Result<(), EngineError> {
        self.pending.push((signal, value));
        Ok(())
    }

    fn terminate(&mut self) -> Result<(), EngineError> {
        self.pending.clear();
        Ok(())
    }
}

impl std::fmt::Debug for FallbackEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackEngine")
            .field("signals", &self.values.len())
            .field("rules", &self.rules.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}
