/// Camera uniform buffer data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub position: [f32; 3],
    pub tan_half_fov: f32,
    pub forward: [f32; 3],
    pub aspect: f32,
    pub right: [f32; 3],
    pub near: f32,
    pub up: [f32; 3],
    pub far: f32,
}

/// Per-frame scene parameters for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    pub background: [f32; 3],
    pub time: f32,
    pub box_count: u32,
    pub puff_count: u32,
    pub _pad: [u32; 2],
}

impl SceneUniform {
    pub fn new(background: [f32; 3], time: f32, box_count: usize, puff_count: usize) -> Self {
        Self {
            background,
            time,
            box_count: box_count as u32,
            puff_count: puff_count as u32,
            _pad: [0; 2],
        }
    }
}

/// Axis-aligned box primitive for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BoxData {
    pub min: [f32; 3],
    pub _pad1: f32,
    pub max: [f32; 3],
    pub _pad2: f32,
    pub color: [f32; 3],
    pub _pad3: f32,
}

impl BoxData {
    pub const fn new(min: [f32; 3], max: [f32; 3], color: [f32; 3]) -> Self {
        Self {
            min,
            _pad1: 0.0,
            max,
            _pad2: 0.0,
            color,
            _pad3: 0.0,
        }
    }
}

/// Soft sphere making up part of a cloud
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PuffData {
    pub center: [f32; 3],
    pub radius: f32,
    pub color: [f32; 3],
    pub opacity: f32,
}
