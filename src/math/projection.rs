use glam::Vec3;

/// Squared length below which a projected vector counts as degenerate
const DEGENERATE_LENGTH_SQUARED: f32 = 1e-10;

/// Remove the `up` component of `v` and renormalize.
///
/// Returns the zero vector when nothing is left after projection, i.e. when
/// `v` is (anti)parallel to `up`.
pub fn horizontal_projection(v: Vec3, up: Vec3) -> Vec3 {
    let flat = v - up * v.dot(up);
    if flat.length_squared() < DEGENERATE_LENGTH_SQUARED {
        Vec3::ZERO
    } else {
        flat.normalize()
    }
}
