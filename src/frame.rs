//! Frame-rate cap for the main loop.

use std::cell::Cell;
use std::thread;
use std::time::{Duration, Instant};

/// Source of monotonic time, in seconds since an arbitrary epoch.
pub trait Clock {
    fn now(&self) -> f64;
}

pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Hand-driven clock for tests.
#[derive(Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, secs: f64) {
        self.now.set(secs);
    }

    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

pub fn frame_budget(fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / fps.max(1) as f64)
}

/// Tracks when the current frame began and sleeps away whatever is left of
/// its budget.
pub struct FramePacer<C: Clock = SystemClock> {
    clock: C,
    budget: Duration,
    frame_start: f64,
}

impl FramePacer<SystemClock> {
    pub fn new(fps: u32) -> Self {
        Self::with_clock(fps, SystemClock::new())
    }
}

impl<C: Clock> FramePacer<C> {
    pub fn with_clock(fps: u32, clock: C) -> Self {
        let frame_start = clock.now();
        Self {
            clock,
            budget: frame_budget(fps),
            frame_start,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Marks the start of a frame and returns its timestamp.
    pub fn begin_frame(&mut self) -> f64 {
        self.frame_start = self.clock.now();
        self.frame_start
    }

    /// Time left in this frame's budget; zero once overrun.
    pub fn remaining(&self) -> Duration {
        let spent = (self.clock.now() - self.frame_start).max(0.0);
        self.budget.saturating_sub(Duration::from_secs_f64(spent))
    }

    pub fn wait(&self) {
        let left = self.remaining();
        if !left.is_zero() {
            thread::sleep(left);
        }
    }
}
