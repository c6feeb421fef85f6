mod color;
mod projection;
mod workspace;

pub use color::Rgb;
pub use projection::horizontal_projection;
pub use workspace::WorkingVectors;
