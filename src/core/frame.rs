use std::time::Instant;

use super::clock::Clock;

/// Frame metadata - carries frame number and timing info
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    /// Seconds since the iterator started
    pub time: f32,
    /// Seconds since the previous frame
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32) -> Self {
        Self { number, time, delta }
    }
}

/// Infinite iterator that yields frame information
/// Pull one item per rendered frame
#[derive(Debug)]
pub struct FrameIterator {
    frame_number: u64,
    start_time: Instant,
    clock: Clock,
}

impl FrameIterator {
    pub fn new() -> Self {
        Self {
            frame_number: 0,
            start_time: Instant::now(),
            clock: Clock::new(),
        }
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    pub fn time(&self) -> f32 {
        self.start_time.elapsed().as_secs_f32()
    }
}

impl Default for FrameIterator {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for FrameIterator {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        let delta = self.clock.tick();
        let info = FrameInfo::new(self.frame_number, self.time(), delta);
        self.frame_number += 1;
        Some(info)
    }
}
