pub mod cloud;
pub mod cubes;
pub mod types;

pub use cloud::{Cloud, CloudParams};
pub use cubes::{Cube, CubeField, CubeFieldSettings};
pub use types::{BoxData, CameraUniform, PuffData, SceneUniform};
