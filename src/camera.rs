use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;

use crate::scene::types::CameraUniform;

pub const DEFAULT_FOV_DEGREES: f32 = 45.0;
pub const DEFAULT_NEAR: f32 = 1.0;
pub const DEFAULT_FAR: f32 = 100.0;

/// Keeps the camera from ever facing exactly along the up axis
const PITCH_LIMIT: f32 = FRAC_PI_2 - 1e-3;

/// What the movement resolver needs from a camera: where it is looking,
/// and write access to where it is.
pub trait FacingCamera {
    /// Normalized world-space facing direction
    fn world_direction(&self) -> Vec3;

    fn position_mut(&mut self) -> &mut Vec3;
}

/// Perspective camera with yaw/pitch orientation and no roll.
///
/// Yaw 0 faces +Z, yaw π faces -Z; positive pitch looks up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical field of view in radians
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: PI,
            pitch: 0.0,
            fov: DEFAULT_FOV_DEGREES.to_radians(),
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
        }
    }

    pub fn with_projection(mut self, fov_degrees: f32, near: f32, far: f32) -> Self {
        self.fov = fov_degrees.to_radians();
        self.near = near;
        self.far = far;
        self
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize_or_zero()
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward()).normalize_or_zero()
    }

    /// Face along `direction`. A zero direction leaves orientation untouched.
    pub fn look_to(&mut self, direction: Vec3) {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return;
        }
        self.yaw = dir.x.atan2(dir.z);
        self.pitch = dir.y.clamp(-1.0, 1.0).asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.look_to(target - self.position);
    }

    /// Set pitch, clamped short of straight up/down
    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn to_uniform(&self, aspect: f32) -> CameraUniform {
        CameraUniform {
            position: self.position.to_array(),
            tan_half_fov: (self.fov * 0.5).tan(),
            forward: self.forward().to_array(),
            aspect,
            right: self.right().to_array(),
            near: self.near,
            up: self.up().to_array(),
            far: self.far,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(-1.5, 1.0, 5.5))
    }
}

impl FacingCamera for Camera {
    fn world_direction(&self) -> Vec3 {
        self.forward()
    }

    fn position_mut(&mut self) -> &mut Vec3 {
        &mut self.position
    }
}
