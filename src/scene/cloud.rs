use std::f32::consts::TAU;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::types::PuffData;
use crate::math::Rgb;

/// Upper bound on segments, and the capacity of the GPU puff buffer
pub const MAX_SEGMENTS: u32 = 80;

/// World radius of a puff per unit of `volume`
pub const PUFF_SCALE: f32 = 0.1;

/// Tunable cloud parameters. Ranges are enforced by [`CloudParams::clamped`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudParams {
    /// 1..=100
    pub seed: u32,
    /// 1..=MAX_SEGMENTS
    pub segments: u32,
    /// 0..=100
    pub volume: f32,
    /// 0..=1
    pub opacity: f32,
    /// Camera distance below which puffs fade out, 0..=400 (0 disables)
    pub fade: f32,
    /// 0..=20
    pub growth: f32,
    /// 0..=1
    pub speed: f32,
    /// Extent of the box puffs are scattered in, each axis 0..=100
    pub bounds: Vec3,
    pub color: Rgb,
    pub position: Vec3,
}

impl Default for CloudParams {
    fn default() -> Self {
        Self {
            seed: 2,
            segments: 20,
            volume: 6.0,
            opacity: 0.8,
            fade: 10.0,
            growth: 4.0,
            speed: 0.1,
            bounds: Vec3::new(6.0, 1.0, 1.0),
            color: Rgb([238.0 / 255.0, 208.0 / 255.0, 208.0 / 255.0]),
            position: Vec3::ZERO,
        }
    }
}

impl CloudParams {
    pub fn clamped(self) -> Self {
        Self {
            seed: self.seed.clamp(1, 100),
            segments: self.segments.clamp(1, MAX_SEGMENTS),
            volume: self.volume.clamp(0.0, 100.0),
            opacity: self.opacity.clamp(0.0, 1.0),
            fade: self.fade.clamp(0.0, 400.0),
            growth: self.growth.clamp(0.0, 20.0),
            speed: self.speed.clamp(0.0, 1.0),
            bounds: self.bounds.clamp(Vec3::ZERO, Vec3::splat(100.0)),
            ..self
        }
    }

    /// Whether switching to `other` changes the puff layout, not just styling
    fn layout_differs(&self, other: &CloudParams) -> bool {
        self.seed != other.seed || self.segments != other.segments || self.bounds != other.bounds
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    /// Offset from the cloud position
    offset: Vec3,
    /// Growth cycle phase in radians
    phase: f32,
    /// Per-segment size variation, 0.5..1
    scale: f32,
}

/// Procedural cloud: a seeded cluster of soft puffs that breathe over time
#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    params: CloudParams,
    segments: Vec<Segment>,
}

impl Cloud {
    pub fn new(params: CloudParams) -> Self {
        let params = params.clamped();
        Self {
            segments: Self::layout(&params),
            params,
        }
    }

    fn layout(params: &CloudParams) -> Vec<Segment> {
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed as u64);
        (0..params.segments)
            .map(|_| Segment {
                offset: Vec3::new(
                    (rng.gen::<f32>() - 0.5) * params.bounds.x,
                    (rng.gen::<f32>() - 0.5) * params.bounds.y,
                    (rng.gen::<f32>() - 0.5) * params.bounds.z,
                ),
                phase: rng.gen::<f32>() * TAU,
                scale: 0.5 + rng.gen::<f32>() * 0.5,
            })
            .collect()
    }

    pub fn params(&self) -> &CloudParams {
        &self.params
    }

    /// Apply new parameters, re-scattering puffs only if the layout changed
    pub fn set_params(&mut self, params: CloudParams) {
        let params = params.clamped();
        if params == self.params {
            return;
        }
        if params.layout_differs(&self.params) {
            log::debug!(
                "Cloud layout regenerated: seed {}, {} segments",
                params.seed,
                params.segments
            );
            self.segments = Self::layout(&params);
        }
        self.params = params;
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Puffs as seen at `time` seconds from a camera at `eye`
    pub fn puffs(&self, time: f32, eye: Vec3) -> Vec<PuffData> {
        let p = &self.params;
        self.segments
            .iter()
            .map(|segment| {
                let center = p.position + segment.offset;
                let breath = ((time * p.speed * TAU + segment.phase).sin() + 1.0) * 0.5;
                let radius = (p.volume + p.growth * breath) * segment.scale * PUFF_SCALE;

                let fade = if p.fade > 0.0 {
                    (center.distance(eye) / p.fade).min(1.0)
                } else {
                    1.0
                };

                PuffData {
                    center: center.to_array(),
                    radius,
                    color: p.color.to_array(),
                    opacity: p.opacity * fade,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_segments() {
        let cloud = Cloud::new(CloudParams::default());
        assert_eq!(cloud.segment_count(), 20);
    }

    #[test]
    fn test_clamped_ranges() {
        let params = CloudParams {
            seed: 0,
            segments: 500,
            volume: -1.0,
            opacity: 2.0,
            fade: 1000.0,
            growth: 50.0,
            speed: -0.5,
            bounds: Vec3::new(-1.0, 200.0, 5.0),
            ..Default::default()
        }
        .clamped();

        assert_eq!(params.seed, 1);
        assert_eq!(params.segments, MAX_SEGMENTS);
        assert_eq!(params.volume, 0.0);
        assert_eq!(params.opacity, 1.0);
        assert_eq!(params.fade, 400.0);
        assert_eq!(params.growth, 20.0);
        assert_eq!(params.speed, 0.0);
        assert_eq!(params.bounds, Vec3::new(0.0, 100.0, 5.0));
    }

    #[test]
    fn test_puffs_inside_bounds() {
        let params = CloudParams {
            position: Vec3::new(0.0, 5.0, 0.0),
            ..Default::default()
        };
        let cloud = Cloud::new(params);
        let half = params.bounds * 0.5;

        for puff in cloud.puffs(0.0, Vec3::new(0.0, 0.0, 100.0)) {
            let offset = Vec3::from(puff.center) - params.position;
            assert!(offset.abs().cmple(half).all(), "{:?} outside {:?}", offset, half);
        }
    }

    #[test]
    fn test_radius_breathes_with_growth() {
        let params = CloudParams {
            segments: 1,
            speed: 0.25,
            ..Default::default()
        };
        let cloud = Cloud::new(params);
        let eye = Vec3::splat(100.0);

        let radii: Vec<f32> = (0..8)
            .map(|i| cloud.puffs(i as f32, eye)[0].radius)
            .collect();
        let min = radii.iter().cloned().fold(f32::MAX, f32::min);
        let max = radii.iter().cloned().fold(f32::MIN, f32::max);

        assert!(max > min);
        // volume 6, growth 4, scale <= 1
        assert!(max <= 10.0 * PUFF_SCALE + 1e-5);
        assert!(min >= 6.0 * 0.5 * PUFF_SCALE - 1e-5);
    }

    #[test]
    fn test_zero_speed_is_static() {
        let params = CloudParams {
            speed: 0.0,
            ..Default::default()
        };
        let cloud = Cloud::new(params);
        let eye = Vec3::splat(50.0);
        assert_eq!(cloud.puffs(0.0, eye), cloud.puffs(12.5, eye));
    }

    #[test]
    fn test_near_puffs_fade() {
        let params = CloudParams {
            segments: 1,
            bounds: Vec3::ZERO,
            fade: 10.0,
            opacity: 0.8,
            ..Default::default()
        };
        let cloud = Cloud::new(params);

        let far = cloud.puffs(0.0, Vec3::new(0.0, 0.0, 50.0))[0];
        let near = cloud.puffs(0.0, Vec3::new(0.0, 0.0, 5.0))[0];

        assert!((far.opacity - 0.8).abs() < 1e-6);
        assert!((near.opacity - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_fade_disabled() {
        let params = CloudParams {
            segments: 1,
            bounds: Vec3::ZERO,
            fade: 0.0,
            ..Default::default()
        };
        let cloud = Cloud::new(params);
        let puff = cloud.puffs(0.0, Vec3::ZERO)[0];
        assert_eq!(puff.opacity, params.opacity);
    }

    #[test]
    fn test_style_change_keeps_layout() {
        let mut cloud = Cloud::new(CloudParams::default());
        let before: Vec<[f32; 3]> = cloud.puffs(0.0, Vec3::ZERO).iter().map(|p| p.center).collect();

        cloud.set_params(CloudParams {
            opacity: 0.3,
            ..CloudParams::default()
        });
        let after: Vec<[f32; 3]> = cloud.puffs(0.0, Vec3::ZERO).iter().map(|p| p.center).collect();

        assert_eq!(before, after);
        assert_eq!(cloud.params().opacity, 0.3);
    }

    #[test]
    fn test_seed_change_moves_puffs() {
        let mut cloud = Cloud::new(CloudParams::default());
        let before = cloud.puffs(0.0, Vec3::ZERO);

        cloud.set_params(CloudParams {
            seed: 42,
            segments: 30,
            ..CloudParams::default()
        });

        assert_eq!(cloud.segment_count(), 30);
        assert_ne!(before[0].center, cloud.puffs(0.0, Vec3::ZERO)[0].center);
    }
}
