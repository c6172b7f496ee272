//! Fixed-tick timing utilities
//!
//! The collision core is advanced by exactly one logical step per fixed tick.
//! [`TickClock`] converts wall-clock frame time into a whole number of due
//! ticks; [`Stopwatch`] measures how long a step took for diagnostics.

use std::time::{Duration, Instant};

/// Upper bound on ticks released by a single `advance` call, so a long stall
/// cannot queue an unbounded catch-up burst.
pub const MAX_CATCH_UP_TICKS: u32 = 8;

/// Fixed-timestep accumulator
#[derive(Debug, Clone)]
pub struct TickClock {
    tick_duration: f64,
    accumulator: f64,
    tick: u64,
}

impl TickClock {
    /// Create a clock producing ticks of `tick_duration` seconds
    pub fn new(tick_duration: f64) -> Self {
        Self {
            tick_duration: tick_duration.max(f64::EPSILON),
            accumulator: 0.0,
            tick: 0,
        }
    }

    /// Create a clock from a tick rate in Hz
    pub fn from_rate(ticks_per_second: u32) -> Self {
        Self::new(1.0 / f64::from(ticks_per_second.max(1)))
    }

    /// Seconds per tick
    pub fn tick_duration(&self) -> f64 {
        self.tick_duration
    }

    /// Number of ticks released so far
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Feed elapsed seconds, returning how many ticks are now due
    pub fn advance(&mut self, elapsed: f64) -> u32 {
        self.accumulator += elapsed.max(0.0);
        let mut due = 0;
        while self.accumulator >= self.tick_duration && due < MAX_CATCH_UP_TICKS {
            self.accumulator -= self.tick_duration;
            self.tick += 1;
            due += 1;
        }
        if due == MAX_CATCH_UP_TICKS {
            // drop the backlog rather than spiralling
            self.accumulator = self.accumulator.min(self.tick_duration);
        }
        due
    }

    /// Fraction of the next tick already accumulated, for interpolation
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.tick_duration
    }
}

/// Simple stopwatch for measuring elapsed time
pub struct Stopwatch {
    start_time: Instant,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::start_new()
    }
}

impl Stopwatch {
    /// Create a stopwatch that is already running
    pub fn start_new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Restart from zero
    pub fn restart(&mut self) {
        self.start_time = Instant::now();
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Get the elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }
}
