use std::f32::consts::{FRAC_PI_2, PI};

use crate::camera::Camera;

/// Radians of rotation per pixel of mouse motion at pointer speed 1
pub const POINTER_SENSITIVITY: f32 = 0.002;

/// Mouse-look while the cursor is captured.
///
/// Motion is ignored until [`PointerLockControls::lock`] is called; the host
/// owns the actual cursor grab and calls `lock`/`unlock` to mirror it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerLockControls {
    locked: bool,
    pub pointer_speed: f32,
    /// Polar angles measured down from +Y
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
}

impl PointerLockControls {
    pub fn new(pointer_speed: f32) -> Self {
        Self {
            locked: false,
            pointer_speed,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Returns true if this changed the lock state
    pub fn lock(&mut self) -> bool {
        let changed = !self.locked;
        self.locked = true;
        if changed {
            log::info!("Pointer locked");
        }
        changed
    }

    /// Returns true if this changed the lock state
    pub fn unlock(&mut self) -> bool {
        let changed = self.locked;
        self.locked = false;
        if changed {
            log::info!("Pointer unlocked");
        }
        changed
    }

    /// Rotate `camera` by a raw mouse delta. Returns false if unlocked.
    pub fn on_mouse_motion(&self, camera: &mut Camera, dx: f32, dy: f32) -> bool {
        if !self.locked {
            return false;
        }

        let scale = POINTER_SENSITIVITY * self.pointer_speed;
        camera.yaw -= dx * scale;

        let min_pitch = FRAC_PI_2 - self.max_polar_angle;
        let max_pitch = FRAC_PI_2 - self.min_polar_angle;
        camera.set_pitch((camera.pitch - dy * scale).clamp(min_pitch, max_pitch));
        true
    }
}

impl Default for PointerLockControls {
    fn default() -> Self {
        Self::new(1.0)
    }
}
