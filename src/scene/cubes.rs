use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::types::BoxData;
use crate::math::Rgb;

/// How the random cube field is laid out
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubeFieldSettings {
    pub count: usize,
    /// Edge length of the cube that positions are drawn from
    pub spread: f32,
    /// Edge length of each cube
    pub size: f32,
    pub color: Rgb,
}

impl Default for CubeFieldSettings {
    fn default() -> Self {
        Self {
            count: 20,
            spread: 20.0,
            size: 1.0,
            color: Rgb::RED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cube {
    pub center: Vec3,
    pub size: f32,
    pub color: Rgb,
}

impl Cube {
    pub fn to_box_data(&self) -> BoxData {
        let half = Vec3::splat(self.size * 0.5);
        BoxData::new(
            (self.center - half).to_array(),
            (self.center + half).to_array(),
            self.color.to_array(),
        )
    }
}

/// Cubes scattered uniformly at random, generated once and kept
#[derive(Debug, Clone, PartialEq)]
pub struct CubeField {
    cubes: Vec<Cube>,
}

impl CubeField {
    pub fn generate(settings: &CubeFieldSettings, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let cubes = (0..settings.count)
            .map(|_| Cube {
                center: random_position(&mut rng, settings.spread),
                size: settings.size,
                color: settings.color,
            })
            .collect();

        Self { cubes }
    }

    pub fn cubes(&self) -> &[Cube] {
        &self.cubes
    }

    pub fn len(&self) -> usize {
        self.cubes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    pub fn to_box_data(&self) -> Vec<BoxData> {
        self.cubes.iter().map(Cube::to_box_data).collect()
    }
}

/// Point drawn uniformly from `[-spread/2, spread/2)` on each axis
pub fn random_position<R: Rng>(rng: &mut R, spread: f32) -> Vec3 {
    Vec3::new(
        (rng.gen::<f32>() - 0.5) * spread,
        (rng.gen::<f32>() - 0.5) * spread,
        (rng.gen::<f32>() - 0.5) * spread,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_field_has_twenty_red_cubes() {
        let field = CubeField::generate(&CubeFieldSettings::default(), 7);
        assert_eq!(field.len(), 20);
        assert!(field.cubes().iter().all(|c| c.color == Rgb::RED && c.size == 1.0));
    }

    #[test]
    fn test_positions_within_spread() {
        let settings = CubeFieldSettings {
            count: 500,
            ..Default::default()
        };
        let field = CubeField::generate(&settings, 99);
        for cube in field.cubes() {
            assert!(cube.center.cmpge(Vec3::splat(-10.0)).all());
            assert!(cube.center.cmplt(Vec3::splat(10.0)).all());
        }
    }

    #[test]
    fn test_same_seed_same_field() {
        let settings = CubeFieldSettings::default();
        assert_eq!(CubeField::generate(&settings, 3), CubeField::generate(&settings, 3));
        assert_ne!(CubeField::generate(&settings, 3), CubeField::generate(&settings, 4));
    }

    #[test]
    fn test_empty_field() {
        let settings = CubeFieldSettings {
            count: 0,
            ..Default::default()
        };
        let field = CubeField::generate(&settings, 1);
        assert!(field.is_empty());
        assert!(field.to_box_data().is_empty());
    }

    #[test]
    fn test_cube_box_data_bounds() {
        let cube = Cube {
            center: Vec3::new(1.0, 2.0, 3.0),
            size: 1.0,
            color: Rgb::RED,
        };
        let data = cube.to_box_data();
        assert_eq!(data.min, [0.5, 1.5, 2.5]);
        assert_eq!(data.max, [1.5, 2.5, 3.5]);
        assert_eq!(data.color, [1.0, 0.0, 0.0]);
    }
}
