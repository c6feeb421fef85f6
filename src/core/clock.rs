use std::time::{Duration, Instant};

/// Longest delta a single frame may report, in seconds
pub const DEFAULT_MAX_DELTA: f32 = 0.25;

/// Frame-to-frame delta timer.
///
/// Deltas are capped at `max_delta` so a stall (window drag, breakpoint,
/// suspended laptop) doesn't turn into one huge time step.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    last_tick: Instant,
    max_delta: f32,
}

impl Clock {
    pub fn new() -> Self {
        Self::with_max_delta(DEFAULT_MAX_DELTA)
    }

    pub fn with_max_delta(max_delta: f32) -> Self {
        Self {
            last_tick: Instant::now(),
            max_delta: max_delta.max(0.0),
        }
    }

    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }

    /// Seconds since the previous tick (or creation), capped
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = self.step(now.saturating_duration_since(self.last_tick));
        self.last_tick = now;
        delta
    }

    fn step(&self, elapsed: Duration) -> f32 {
        elapsed.as_secs_f32().min(self.max_delta)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
