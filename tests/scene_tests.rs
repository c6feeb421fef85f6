use glam::Vec3;
use scene_viewer::scene::cloud::{MAX_SEGMENTS, PUFF_SCALE};
use scene_viewer::scene::{Cloud, CloudParams, CubeField, CubeFieldSettings};

#[cfg(test)]
mod scene_tests {
    use super::*;

    #[test]
    fn test_default_field_is_twenty_red_unit_cubes() {
        let field = CubeField::generate(&CubeFieldSettings::default(), 42);

        assert_eq!(field.len(), 20);
        for cube in field.cubes() {
            assert_eq!(cube.size, 1.0);
            assert_eq!(cube.color.to_array(), [1.0, 0.0, 0.0]);
            for axis in cube.center.to_array() {
                assert!((-10.0..10.0).contains(&axis), "{:?}", cube.center);
            }
        }
    }

    #[test]
    fn test_field_is_reproducible_per_seed() {
        let settings = CubeFieldSettings::default();
        assert_eq!(CubeField::generate(&settings, 7), CubeField::generate(&settings, 7));
        assert_ne!(CubeField::generate(&settings, 7), CubeField::generate(&settings, 8));
    }

    #[test]
    fn test_box_data_brackets_each_cube() {
        let field = CubeField::generate(&CubeFieldSettings::default(), 3);
        for (cube, data) in field.cubes().iter().zip(field.to_box_data()) {
            let min = Vec3::from_array(data.min);
            let max = Vec3::from_array(data.max);
            assert!(((min + max) * 0.5).abs_diff_eq(cube.center, 1e-5));
            assert!((max - min).abs_diff_eq(Vec3::ONE, 1e-5));
        }
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
    fn test_puffs_stay_inside_bounds() {
        let cloud = Cloud::new(CloudParams::default());
        let bounds = cloud.params().bounds;

        for puff in cloud.puffs(0.0, Vec3::new(0.0, 0.0, 50.0)) {
            let center = Vec3::from_array(puff.center);
            assert!(center.abs().cmple(bounds * 0.5 + 1e-5).all(), "{:?}", center);
        }
    }

    #[test]
    fn test_puff_radius_breathes_within_growth() {
        let params = CloudParams::default();
        let cloud = Cloud::new(params);
        let min = params.volume * 0.5 * PUFF_SCALE;
        let max = (params.volume + params.growth) * PUFF_SCALE;

        for step in 0..50 {
            let time = step as f32 * 0.37;
            for puff in cloud.puffs(time, Vec3::new(0.0, 0.0, 50.0)) {
                assert!(puff.radius >= min - 1e-5 && puff.radius <= max + 1e-5);
            }
        }
    }

    #[test]
    fn test_puffs_fade_near_camera() {
        let cloud = Cloud::new(CloudParams::default());

        let far = cloud.puffs(0.0, Vec3::new(0.0, 0.0, 100.0));
        let near = cloud.puffs(0.0, Vec3::ZERO);

        for puff in &far {
            assert!((puff.opacity - 0.8).abs() < 1e-6);
        }
        let near_total: f32 = near.iter().map(|p| p.opacity).sum();
        let far_total: f32 = far.iter().map(|p| p.opacity).sum();
        assert!(near_total < far_total);
    }

    #[test]
    fn test_changing_look_keeps_layout() {
        let mut cloud = Cloud::new(CloudParams::default());
        let before: Vec<[f32; 3]> = cloud.puffs(0.0, Vec3::Z * 50.0).iter().map(|p| p.center).collect();

        let mut params = *cloud.params();
        params.opacity = 0.3;
        params.growth = 10.0;
        cloud.set_params(params);

        let after: Vec<[f32; 3]> = cloud.puffs(0.0, Vec3::Z * 50.0).iter().map(|p| p.center).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_changing_seed_rescatters() {
        let mut cloud = Cloud::new(CloudParams::default());
        let before: Vec<[f32; 3]> = cloud.puffs(0.0, Vec3::Z * 50.0).iter().map(|p| p.center).collect();

        let mut params = *cloud.params();
        params.seed = 50;
        cloud.set_params(params);

        let after: Vec<[f32; 3]> = cloud.puffs(0.0, Vec3::Z * 50.0).iter().map(|p| p.center).collect();
        assert_ne!(before, after);
    }

    #[test]
    fn test_segment_count_follows_params() {
        let mut cloud = Cloud::new(CloudParams::default());
        let mut params = *cloud.params();
        params.segments = 500;
        cloud.set_params(params);

        assert_eq!(cloud.segment_count(), MAX_SEGMENTS as usize);
        assert_eq!(cloud.puffs(1.0, Vec3::ZERO).len(), MAX_SEGMENTS as usize);
    }
}
