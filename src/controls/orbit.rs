use std::f32::consts::{PI, TAU};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;

/// Keeps the polar angle off the poles, where azimuth is undefined
const POLAR_EPSILON: f32 = 1e-6;

/// Base zoom factor per wheel step at zoom speed 1
const ZOOM_BASE: f32 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitSettings {
    pub target: Vec3,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub enable_rotate: bool,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Radians from +Y
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_zoom: true,
            enable_pan: true,
            enable_rotate: true,
            zoom_speed: 0.6,
            pan_speed: 0.5,
            rotate_speed: 0.4,
            min_distance: 2.0,
            max_distance: 100.0,
            min_polar_angle: 0.0,
            max_polar_angle: PI / 1.75,
            enable_damping: true,
            damping_factor: 0.05,
        }
    }
}

/// Offset from the orbit target in spherical coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    /// Polar angle from +Y
    pub phi: f32,
    /// Azimuth around +Y, 0 on +Z
    pub theta: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self {
                radius,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            theta: offset.x.atan2(offset.z),
        }
    }

    pub fn to_offset(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

/// Orbit, dolly and pan around a target point
#[derive(Debug, Clone)]
pub struct OrbitControls {
    settings: OrbitSettings,
    target: Vec3,
    spherical: Spherical,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    pan_offset: Vec3,
}

impl OrbitControls {
    /// Start orbiting from wherever `camera` currently is
    pub fn new(settings: OrbitSettings, camera: &Camera) -> Self {
        Self {
            target: settings.target,
            spherical: Spherical::from_offset(camera.position - settings.target),
            settings,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }

    pub fn settings(&self) -> &OrbitSettings {
        &self.settings
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn spherical(&self) -> Spherical {
        self.spherical
    }

    /// Queue a rotation from a cursor drag of `dx`,`dy` pixels
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        if !self.settings.enable_rotate {
            return;
        }
        let h = viewport_height.max(1.0);
        self.delta_theta -= TAU * dx / h * self.settings.rotate_speed;
        self.delta_phi -= TAU * dy / h * self.settings.rotate_speed;
    }

    /// Queue a dolly. Positive steps move toward the target.
    pub fn zoom(&mut self, steps: f32) {
        if !self.settings.enable_zoom || steps == 0.0 {
            return;
        }
        let factor = ZOOM_BASE.powf(self.settings.zoom_speed * steps.abs());
        if steps > 0.0 {
            self.scale *= factor;
        } else {
            self.scale /= factor;
        }
    }

    /// Queue a pan so the point under the cursor follows a drag of `dx`,`dy`
    pub fn pan(&mut self, camera: &Camera, dx: f32, dy: f32, viewport_height: f32) {
        if !self.settings.enable_pan {
            return;
        }
        let h = viewport_height.max(1.0);
        let target_distance = self.spherical.radius * (camera.fov * 0.5).tan();
        let left = 2.0 * dx * target_distance / h * self.settings.pan_speed;
        let up = 2.0 * dy * target_distance / h * self.settings.pan_speed;
        self.pan_offset += camera.up() * up - camera.right() * left;
    }

    /// Apply queued input and place the camera. Call once per frame.
    pub fn update(&mut self, camera: &mut Camera) {
        let s = &self.settings;
        let damping = if s.enable_damping {
            s.damping_factor.clamp(0.0, 1.0)
        } else {
            1.0
        };

        self.spherical.theta += self.delta_theta * damping;
        self.spherical.phi += self.delta_phi * damping;

        let min_phi = s.min_polar_angle.max(POLAR_EPSILON);
        let max_phi = s.max_polar_angle.min(PI - POLAR_EPSILON).max(min_phi);
        self.spherical.phi = self.spherical.phi.clamp(min_phi, max_phi);

        let max_distance = s.max_distance.max(s.min_distance);
        self.spherical.radius = (self.spherical.radius * self.scale).clamp(s.min_distance, max_distance);

        self.target += self.pan_offset * damping;

        camera.position = self.target + self.spherical.to_offset();
        camera.look_at(self.target);

        let keep = 1.0 - damping;
        self.delta_theta *= keep;
        self.delta_phi *= keep;
        self.pan_offset *= keep;
        self.scale = 1.0;
    }
}
