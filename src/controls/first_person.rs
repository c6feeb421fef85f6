use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::FacingCamera;
use crate::input::SharedKeyState;
use crate::math::{horizontal_projection, WorkingVectors};

pub const DEFAULT_MOVE_SPEED: f32 = 0.1;

/// Whether `move_speed` is a distance per frame or per second
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpeedMode {
    /// Fixed step every tick; speed depends on frame rate
    #[default]
    PerFrame,
    /// Step scaled by frame delta time
    PerSecond,
}

/// Key names bound to the four movement directions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementKeys {
    pub forward: String,
    pub back: String,
    pub left: String,
    pub right: String,
}

impl MovementKeys {
    /// Lowercase all bindings to match how key state stores them
    pub fn normalized(self) -> Self {
        Self {
            forward: self.forward.to_lowercase(),
            back: self.back.to_lowercase(),
            left: self.left.to_lowercase(),
            right: self.right.to_lowercase(),
        }
    }

    pub fn all(&self) -> [&str; 4] {
        [
            self.forward.as_str(),
            self.back.as_str(),
            self.left.as_str(),
            self.right.as_str(),
        ]
    }
}

impl Default for MovementKeys {
    fn default() -> Self {
        Self {
            forward: "w".into(),
            back: "s".into(),
            left: "a".into(),
            right: "d".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirstPersonSettings {
    pub move_speed: f32,
    pub speed_mode: SpeedMode,
    pub keys: MovementKeys,
    /// Look sensitivity multiplier while the pointer is locked
    pub pointer_speed: f32,
}

impl Default for FirstPersonSettings {
    fn default() -> Self {
        Self {
            move_speed: DEFAULT_MOVE_SPEED,
            speed_mode: SpeedMode::PerFrame,
            keys: MovementKeys::default(),
            pointer_speed: 1.0,
        }
    }
}

/// WASD-style walking confined to the ground plane.
///
/// Each tick turns the held movement keys into a direction relative to the
/// camera's horizontal facing and moves the camera along it. Holding several
/// keys never moves faster than holding one.
#[derive(Debug)]
pub struct FirstPersonController {
    keys: SharedKeyState,
    bindings: MovementKeys,
    workspace: WorkingVectors,
    move_speed: f32,
    speed_mode: SpeedMode,
}

impl FirstPersonController {
    pub fn new(keys: SharedKeyState, settings: &FirstPersonSettings) -> Self {
        Self {
            keys,
            bindings: settings.keys.clone().normalized(),
            workspace: WorkingVectors::new(),
            move_speed: settings.move_speed,
            speed_mode: settings.speed_mode,
        }
    }

    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    pub fn set_move_speed(&mut self, move_speed: f32) {
        self.move_speed = move_speed;
    }

    pub fn speed_mode(&self) -> SpeedMode {
        self.speed_mode
    }

    pub fn bindings(&self) -> &MovementKeys {
        &self.bindings
    }

    /// Advance one frame. `delta` is the frame time in seconds and only
    /// matters in [`SpeedMode::PerSecond`]. Returns the displacement applied.
    pub fn tick<C: FacingCamera + ?Sized>(&mut self, camera: &mut C, delta: f32) -> Vec3 {
        let ws = &mut self.workspace;
        ws.move_direction = Vec3::ZERO;

        ws.forward = horizontal_projection(camera.world_direction(), ws.up);
        ws.right = ws.forward.cross(ws.up).normalize_or_zero();

        {
            let keys = self.keys.borrow();
            if keys.is_down(&self.bindings.forward) {
                ws.move_direction += ws.forward;
            }
            if keys.is_down(&self.bindings.back) {
                ws.move_direction -= ws.forward;
            }
            if keys.is_down(&self.bindings.left) {
                ws.move_direction -= ws.right;
            }
            if keys.is_down(&self.bindings.right) {
                ws.move_direction += ws.right;
            }
        }

        if ws.move_direction.length_squared() == 0.0 {
            return Vec3::ZERO;
        }
        ws.move_direction = ws.move_direction.normalize();

        let step = match self.speed_mode {
            SpeedMode::PerFrame => self.move_speed,
            SpeedMode::PerSecond => self.move_speed * delta,
        };
        let displacement = ws.move_direction * step;
        *camera.position_mut() += displacement;
        displacement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::input::KeyState;

    fn controller(settings: FirstPersonSettings) -> (SharedKeyState, FirstPersonController) {
        let keys = KeyState::shared();
        let controller = FirstPersonController::new(keys.clone(), &settings);
        (keys, controller)
    }

    #[test]
    fn test_no_keys_no_movement() {
        let (_, mut fps) = controller(FirstPersonSettings::default());
        let mut camera = Camera::new(Vec3::ONE);

        let moved = fps.tick(&mut camera, 1.0 / 60.0);

        assert_eq!(moved, Vec3::ZERO);
        assert_eq!(camera.position, Vec3::ONE);
    }

    #[test]
    fn test_strafe_right_is_positive_x_when_facing_negative_z() {
        let (keys, mut fps) = controller(FirstPersonSettings::default());
        let mut camera = Camera::new(Vec3::ZERO);
        camera.look_to(Vec3::NEG_Z);
        keys.borrow_mut().press("d");

        fps.tick(&mut camera, 0.0);

        assert!(camera.position.abs_diff_eq(Vec3::new(0.1, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn test_per_second_scales_by_delta() {
        let settings = FirstPersonSettings {
            move_speed: 2.0,
            speed_mode: SpeedMode::PerSecond,
            ..Default::default()
        };
        let (keys, mut fps) = controller(settings);
        let mut camera = Camera::new(Vec3::ZERO);
        camera.look_to(Vec3::NEG_Z);
        keys.borrow_mut().press("w");

        let moved = fps.tick(&mut camera, 0.5);

        assert!(moved.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-5));
    }

    #[test]
    fn test_custom_bindings_are_lowercased() {
        let settings = FirstPersonSettings {
            keys: MovementKeys {
                forward: "ArrowUp".into(),
                back: "ArrowDown".into(),
                left: "ArrowLeft".into(),
                right: "ArrowRight".into(),
            },
            ..Default::default()
        };
        let (keys, mut fps) = controller(settings);
        let mut camera = Camera::new(Vec3::ZERO);
        camera.look_to(Vec3::NEG_Z);
        keys.borrow_mut().press("ArrowUp");

        fps.tick(&mut camera, 0.0);

        assert_eq!(fps.bindings().forward, "arrowup");
        assert!(camera.position.z < 0.0);
    }

    #[test]
    fn test_vertical_camera_does_not_move() {
        let (keys, mut fps) = controller(FirstPersonSettings::default());
        keys.borrow_mut().press("w");
        keys.borrow_mut().press("d");

        struct StraightUp(Vec3);
        impl FacingCamera for StraightUp {
            fn world_direction(&self) -> Vec3 {
                Vec3::Y
            }
            fn position_mut(&mut self) -> &mut Vec3 {
                &mut self.0
            }
        }

        let mut camera = StraightUp(Vec3::ZERO);
        assert_eq!(fps.tick(&mut camera, 0.0), Vec3::ZERO);
        assert_eq!(camera.0, Vec3::ZERO);
    }

    #[test]
    fn test_set_move_speed() {
        let (keys, mut fps) = controller(FirstPersonSettings::default());
        fps.set_move_speed(0.5);
        keys.borrow_mut().press("s");
        let mut camera = Camera::new(Vec3::ZERO);
        camera.look_to(Vec3::NEG_Z);

        fps.tick(&mut camera, 0.0);

        assert_eq!(fps.move_speed(), 0.5);
        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 0.0, 0.5), 1e-5));
    }
}
