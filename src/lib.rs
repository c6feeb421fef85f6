pub mod camera;
pub mod cli;
pub mod config;
pub mod controls;
pub mod core;
pub mod input;
pub mod math;
pub mod renderer;
pub mod scene;

pub use camera::{Camera, FacingCamera};
pub use config::ViewerConfig;
pub use controls::{Controls, ControlsMode, FirstPersonController, SpeedMode};
pub use input::{InputTracker, KeyEvent, KeyEventHub, KeyState, SharedKeyState};
