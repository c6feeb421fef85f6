/// How often the FPS readout refreshes
pub const FPS_UPDATE_HZ: f32 = 2.0;

/// Frames-per-second averaged over each refresh window
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window: f32,
    frames: u32,
    elapsed: f32,
    fps: f32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::with_rate(FPS_UPDATE_HZ)
    }

    /// Refresh `hz` times per second
    pub fn with_rate(hz: f32) -> Self {
        Self {
            window: 1.0 / hz.max(f32::EPSILON),
            frames: 0,
            elapsed: 0.0,
            fps: 0.0,
        }
    }

    /// Count one frame. Returns the new reading when the window closes.
    pub fn record(&mut self, delta: f32) -> Option<f32> {
        self.frames += 1;
        self.elapsed += delta;

        if self.elapsed < self.window {
            return None;
        }

        self.fps = self.frames as f32 / self.elapsed;
        self.frames = 0;
        self.elapsed = 0.0;
        Some(self.fps)
    }

    /// Latest reading
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
