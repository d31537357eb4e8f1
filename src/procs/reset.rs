//! Power-on reset stimulus.

use crate::error::ProcessError;
use crate::process::{Process, Wait};
use crate::scheduler::SimContext;
use crate::types::{SignalId, Time};

/// Holds a signal low, then releases it high after a delay.
///
/// The usual driver for active-low resets: assert at time zero, release
/// once the design has seen a few clock edges.
#[derive(Debug)]
pub struct PullUpDriver {
    /// The driven reset signal
    pub signal: SignalId,
    /// How long the signal is held low
    pub delay: Time,
    asserted: bool,
}

impl PullUpDriver {
    /// Creates a pull-up on `signal`, released after `delay` time units.
    pub fn new(signal: SignalId, delay: Time) -> Self {
        Self {
            signal,
            delay,
            asserted: false,
        }
    }
}

impl Process for PullUpDriver {
    fn resume(&mut self, ctx: &mut SimContext<'_>) -> Result<Wait, ProcessError> {
        if !self.asserted {
            self.asserted = true;
            ctx.write(self.signal, 0)?;
            return Ok(Wait::until(ctx.now().time + self.delay));
        }
        ctx.write(self.signal, 1)?;
        Ok(Wait::Done)
    }
}

/// Holds a signal high, then releases it low after a delay.
#[derive(Debug)]
pub struct PullDownDriver {
    /// The driven reset signal
    pub signal: SignalId,
    /// How long the signal is held high
    pub delay: Time,
    asserted: bool,
}

impl PullDownDriver {
    /// Creates a pull-down on `signal`, released after `delay` time units.
    pub fn new(signal: SignalId, delay: Time) -> Self {
        Self {
            signal,
            delay,
            asserted: false,
        }
    }
}

impl Process for PullDownDriver {
    fn resume(&mut self, ctx: &mut SimContext<'_>) -> Result<Wait, ProcessError> {
        if !self.asserted {
            self.asserted = true;
            ctx.write(self.signal, 1)?;
            return Ok(Wait::until(ctx.now().time + self.delay));
        }
        ctx.write(self.signal, 0)?;
        Ok(Wait::Done)
    }
}
