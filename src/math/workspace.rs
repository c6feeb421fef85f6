use glam::Vec3;

/// Scratch vectors reused by the movement resolver every frame.
///
/// `up` never changes; the other three are overwritten on each tick and
/// carry nothing from one frame to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkingVectors {
    pub move_direction: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl WorkingVectors {
    pub const fn new() -> Self {
        Self {
            move_direction: Vec3::ZERO,
            forward: Vec3::ZERO,
            right: Vec3::ZERO,
            up: Vec3::Y,
        }
    }

    /// Zero the scratch vectors, leaving `up` alone
    pub fn clear(&mut self) {
        self.move_direction = Vec3::ZERO;
        self.forward = Vec3::ZERO;
        self.right = Vec3::ZERO;
    }
}

impl Default for WorkingVectors {
    fn default() -> Self {
        Self::new()
    }
}
