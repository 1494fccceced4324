use std::time::{Duration, Instant};

use super::logging::TickPhase;

/// Per-phase timings and population counters for the last tick.
#[derive(Debug, Default, Clone, Copy)]
pub struct TickProfiler {
    pub detect_time: Duration,
    pub solve_time: Duration,
    pub react_time: Duration,
    pub integrate_time: Duration,
    pub gravity_time: Duration,
    pub merge_time: Duration,
    pub cleanup_time: Duration,
    pub total_tick_time: Duration,

    pub body_count: usize,
    pub contact_count: usize,
    pub spawned_count: usize,
    pub removed_count: usize,
}

impl TickProfiler {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn phase_time(&self, phase: TickPhase) -> Duration {
        match phase {
            TickPhase::Detect => self.detect_time,
            TickPhase::Solve => self.solve_time,
            TickPhase::React => self.react_time,
            TickPhase::Integrate => self.integrate_time,
            TickPhase::Gravity => self.gravity_time,
            TickPhase::Merge => self.merge_time,
            TickPhase::Cleanup => self.cleanup_time,
        }
    }

    pub fn report(&self) {
        let total_us = self.total_tick_time.as_micros() as f64;
        if total_us < 1.0 {
            return;
        }

        log::info!(
            "bodies: {}, contacts: {}, spawned: {}, removed: {}, tick: {:.2} ms",
            self.body_count,
            self.contact_count,
            self.spawned_count,
            self.removed_count,
            self.total_tick_time.as_secs_f64() * 1000.0
        );

        for phase in TickPhase::ALL {
            let time = self.phase_time(phase);
            log::info!(
                "  {:<10} {:.3} ms ({:.1}%)",
                phase.label(),
                time.as_secs_f64() * 1000.0,
                (time.as_micros() as f64 / total_us) * 100.0
            );
        }
    }
}

/// Adds the lifetime of the guard to the referenced duration.
pub struct PhaseTimer<'a> {
    start: Instant,
    output: &'a mut Duration,
}

impl<'a> PhaseTimer<'a> {
    pub fn new(output: &'a mut Duration) -> Self {
        Self {
            start: Instant::now(),
            output,
        }
    }
}

impl<'a> Drop for PhaseTimer<'a> {
    fn drop(&mut self) {
        *self.output += self.start.elapsed();
    }
}
