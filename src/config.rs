use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::{Camera, DEFAULT_FAR, DEFAULT_FOV_DEGREES, DEFAULT_NEAR};
use crate::cli::Cli;
use crate::controls::{ControlsMode, FirstPersonSettings, OrbitSettings, SpeedMode};
use crate::math::Rgb;
use crate::scene::{CloudParams, CubeFieldSettings};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: Vec3,
    /// Initial look-at point
    pub target: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: Vec3::new(-1.5, 1.0, 5.5),
            target: Vec3::ZERO,
            fov: DEFAULT_FOV_DEGREES,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
        }
    }
}

impl CameraSettings {
    pub fn build(&self) -> Camera {
        let mut camera = Camera::new(self.position).with_projection(self.fov, self.near, self.far);
        camera.look_at(self.target);
        camera
    }
}

/// Everything the viewer can be configured with. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub camera: CameraSettings,
    pub background: Rgb,
    pub controls: ControlsMode,
    pub first_person: FirstPersonSettings,
    pub orbit: OrbitSettings,
    pub cubes: CubeFieldSettings,
    pub cloud: CloudParams,
    /// Scene seed; random when absent
    pub seed: Option<u64>,
    pub show_ui: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            camera: CameraSettings::default(),
            background: Rgb::WHITE,
            controls: ControlsMode::Orbit,
            first_person: FirstPersonSettings::default(),
            orbit: OrbitSettings::default(),
            cubes: CubeFieldSettings::default(),
            cloud: CloudParams::default(),
            seed: None,
            show_ui: true,
        }
    }
}

impl ViewerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ViewerConfig = serde_json::from_str(json).context("Failed to parse viewer config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Defaults or the `--config` file, with command-line overrides applied
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                Self::load(path)?
            }
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(mode) = cli.controls {
            self.controls = mode;
        }
        if let Some(seed) = cli.seed {
            self.seed = Some(seed);
        }
        if cli.no_ui {
            self.show_ui = false;
        }
        if cli.per_second {
            self.first_person.speed_mode = SpeedMode::PerSecond;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let cam = &self.camera;
        ensure!(cam.fov > 0.0 && cam.fov < 180.0, "camera.fov must be in (0, 180), got {}", cam.fov);
        ensure!(
            cam.near > 0.0 && cam.near < cam.far,
            "camera.near must be positive and below camera.far (near {}, far {})",
            cam.near,
            cam.far
        );

        let fp = &self.first_person;
        ensure!(
            fp.move_speed.is_finite() && fp.move_speed >= 0.0,
            "first_person.move_speed must be a non-negative number, got {}",
            fp.move_speed
        );
        ensure!(
            fp.keys.all().iter().all(|key| !key.is_empty()),
            "first_person.keys must all be non-empty"
        );

        let orbit = &self.orbit;
        ensure!(
            orbit.min_distance >= 0.0 && orbit.min_distance <= orbit.max_distance,
            "orbit.min_distance must be within [0, max_distance] (min {}, max {})",
            orbit.min_distance,
            orbit.max_distance
        );
        ensure!(
            orbit.min_polar_angle <= orbit.max_polar_angle,
            "orbit.min_polar_angle must not exceed orbit.max_polar_angle"
        );

        ensure!(self.cubes.spread >= 0.0, "cubes.spread must be non-negative");
        ensure!(self.cubes.size > 0.0, "cubes.size must be positive");
        Ok(())
    }

    /// The configured seed, or a fresh random one
    pub fn scene_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ViewerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = ViewerConfig::from_json("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_partial_json_overrides() {
        let config = ViewerConfig::from_json(
            r##"{
                "controls": "first-person",
                "first_person": { "move_speed": 0.25, "speed_mode": "per-second" },
                "cubes": { "count": 5 },
                "background": "#202020"
            }"##,
        )
        .unwrap();

        assert_eq!(config.controls, ControlsMode::FirstPerson);
        assert_eq!(config.first_person.move_speed, 0.25);
        assert_eq!(config.first_person.speed_mode, SpeedMode::PerSecond);
        assert_eq!(config.first_person.keys.forward, "w");
        assert_eq!(config.cubes.count, 5);
        assert_eq!(config.cubes.spread, 20.0);
        assert_eq!(config.background.to_string(), "#202020");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(ViewerConfig::from_json(r#"{ "camera": { "near": 10.0, "far": 5.0 } }"#).is_err());
        assert!(ViewerConfig::from_json(r#"{ "first_person": { "move_speed": -1.0 } }"#).is_err());
        assert!(ViewerConfig::from_json(r#"{ "orbit": { "min_distance": 50.0, "max_distance": 10.0 } }"#).is_err());
        assert!(ViewerConfig::from_json(r#"{ "background": "not-a-color" }"#).is_err());
        assert!(ViewerConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = ViewerConfig::default();
        let cli = Cli {
            controls: Some(ControlsMode::FirstPerson),
            seed: Some(9),
            no_ui: true,
            per_second: true,
            ..Default::default()
        };

        config.apply_cli(&cli);

        assert_eq!(config.controls, ControlsMode::FirstPerson);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.scene_seed(), 9);
        assert!(!config.show_ui);
        assert_eq!(config.first_person.speed_mode, SpeedMode::PerSecond);
    }

    #[test]
    fn test_camera_settings_build_looks_at_target() {
        let settings = CameraSettings::default();
        let camera = settings.build();
        let expected = (settings.target - settings.position).normalize();
        assert!(camera.forward().abs_diff_eq(expected, 1e-5));
        assert!((camera.fov - 45f32.to_radians()).abs() < 1e-6);
    }
}
