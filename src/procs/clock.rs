//! Free-running clock stimulus.

use crate::error::ProcessError;
use crate::process::{Process, Wait};
use crate::scheduler::SimContext;
use crate::types::{SignalId, Time, Value};

/// Drives a signal as a free-running clock.
///
/// On start the clock writes 0, holds it for the optional initial wait
/// plus half a period, then toggles every half period. With period `p`
/// and no initial wait, rising edges land at `p/2`, `3p/2`, `5p/2`, ...
///
/// The period should be even; an odd period loses one time unit per half
/// cycle to truncation.
#[derive(Debug)]
pub struct ClockDriver {
    /// The driven clock signal
    pub signal: SignalId,
    /// Full clock period
    pub period: Time,
    /// Extra delay before the first rising edge
    pub init_wait: Time,
    level: Value,
    started: bool,
}

impl ClockDriver {
    /// Creates a clock on `signal` with the given full period.
    pub fn new(signal: SignalId, period: Time) -> Self {
        Self {
            signal,
            period,
            init_wait: 0,
            level: 0,
            started: false,
        }
    }

    /// Delays the first rising edge by `init_wait` time units.
    pub fn with_init_wait(mut self, init_wait: Time) -> Self {
        self.init_wait = init_wait;
        self
    }
}

impl Process for ClockDriver {
    fn resume(&mut self, ctx: &mut SimContext<'_>) -> Result<Wait, ProcessError> {
        if !self.started {
            self.started = true;
            self.level = 0;
            ctx.write(self.signal, 0)?;
            return Ok(Wait::until(
                ctx.now().time + self.init_wait + self.period / 2,
            ));
        }
        self.level = if self.level == 0 { 1 } else { 0 };
        ctx.write(self.signal, self.level)?;
        Ok(Wait::until(ctx.now().time + self.period / 2))
    }
}
