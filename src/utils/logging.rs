use std::fmt;
use std::time::{Duration, Instant};

use log::{log_enabled, trace, warn, Level};

/// Stages of one world tick, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickPhase {
    Detect,
    Solve,
    React,
    Integrate,
    Gravity,
    Merge,
    Cleanup,
}

impl TickPhase {
    pub const ALL: [TickPhase; 7] = [
        TickPhase::Detect,
        TickPhase::Solve,
        TickPhase::React,
        TickPhase::Integrate,
        TickPhase::Gravity,
        TickPhase::Merge,
        TickPhase::Cleanup,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TickPhase::Detect => "detect",
            TickPhase::Solve => "solve",
            TickPhase::React => "react",
            TickPhase::Integrate => "integrate",
            TickPhase::Gravity => "gravity",
            TickPhase::Merge => "merge",
            TickPhase::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for TickPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Traces entry and exit of one phase of tick `tick`; `None` covers the whole tick.
pub struct ScopedTimer {
    tick: u64,
    phase: Option<TickPhase>,
    start: Instant,
}

impl ScopedTimer {
    pub fn tick(tick: u64) -> Self {
        Self::start(tick, None)
    }

    pub fn phase(tick: u64, phase: TickPhase) -> Self {
        Self::start(tick, Some(phase))
    }

    fn start(tick: u64, phase: Option<TickPhase>) -> Self {
        let timer = Self {
            tick,
            phase,
            start: Instant::now(),
        };
        if log_enabled!(Level::Trace) {
            trace!("tick {} {} start", timer.tick, timer.scope());
        }
        timer
    }

    fn scope(&self) -> &'static str {
        self.phase.map_or("step", TickPhase::label)
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        if log_enabled!(Level::Trace) {
            trace!(
                "tick {} {} end ({} µs)",
                self.tick,
                self.scope(),
                self.elapsed().as_micros()
            );
        }
    }
}

/// Warns when a single tick ran longer than the configured budget.
pub fn warn_if_tick_budget_exceeded(tick: u64, duration: Duration, budget_ms: f64) -> bool {
    let elapsed_ms = duration.as_secs_f64() * 1000.0;
    let exceeded = elapsed_ms > budget_ms;
    if exceeded {
        warn!("tick {tick} exceeded budget: {elapsed_ms:.2} ms > {budget_ms:.2} ms");
    }
    exceeded
}
