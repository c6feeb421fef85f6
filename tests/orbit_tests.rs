use std::f32::consts::PI;

use glam::Vec3;
use scene_viewer::camera::Camera;
use scene_viewer::controls::{Controls, ControlsMode, FirstPersonSettings, OrbitControls, OrbitSettings};
use scene_viewer::input::{KeyEvent, KeyEventHub, PointerState};
use winit::event::MouseButton;

#[cfg(test)]
mod orbit_tests {
    use super::*;

    #[test]
    fn test_default_camera_orbits_origin() {
        let mut camera = Camera::default();
        let mut orbit = OrbitControls::new(OrbitSettings::default(), &camera);
        let distance = camera.position.length();

        for _ in 0..10 {
            orbit.update(&mut camera);
        }

        assert!((camera.position.length() - distance).abs() < 1e-4);
        assert!(camera.forward().abs_diff_eq(-camera.position.normalize(), 1e-4));
    }

    #[test]
    fn test_damped_rotation_converges_to_full_drag() {
        let settings = OrbitSettings::default();
        let mut camera = Camera::new(Vec3::new(0.0, 0.0, 10.0));
        let mut orbit = OrbitControls::new(settings, &camera);
        let start = orbit.spherical().theta;

        orbit.rotate(80.0, 0.0, 800.0);
        for _ in 0..400 {
            orbit.update(&mut camera);
        }

        let full = -2.0 * PI * 80.0 / 800.0 * settings.rotate_speed;
        assert!((orbit.spherical().theta - start - full).abs() < 1e-3);
    }

    #[test]
    fn test_camera_never_dips_below_polar_limit() {
        let mut camera = Camera::new(Vec3::new(0.0, 5.0, 5.0));
        let mut orbit = OrbitControls::new(OrbitSettings::default(), &camera);

        for _ in 0..100 {
            orbit.rotate(0.0, -200.0, 600.0);
            orbit.update(&mut camera);
            assert!(orbit.spherical().phi <= PI / 1.75 + 1e-5);
        }
    }

    #[test]
    fn test_controls_route_pointer_drags_to_orbit() {
        let mut hub = KeyEventHub::new();
        let mut camera = Camera::new(Vec3::new(0.0, 0.0, 10.0));
        let mut controls = Controls::new(
            ControlsMode::Orbit,
            &OrbitSettings {
                enable_damping: false,
                ..Default::default()
            },
            &FirstPersonSettings::default(),
            &camera,
            &mut hub,
        );

        let mut pointer = PointerState::new();
        pointer.on_cursor_moved(400.0, 300.0);
        pointer.reset_deltas();
        pointer.on_button(MouseButton::Left, true);
        pointer.on_cursor_moved(500.0, 300.0);

        controls.update(&mut camera, &pointer, 600.0, 1.0 / 60.0);

        assert!((camera.position.length() - 10.0).abs() < 1e-4);
        assert!(camera.position.x < 0.0);
    }

    #[test]
    fn test_orbit_ignores_movement_keys() {
        let mut hub = KeyEventHub::new();
        let mut camera = Camera::new(Vec3::new(0.0, 0.0, 10.0));
        let mut controls = Controls::new(
            ControlsMode::Orbit,
            &OrbitSettings::default(),
            &FirstPersonSettings::default(),
            &camera,
            &mut hub,
        );

        hub.dispatch(&KeyEvent::down("w"));
        controls.update(&mut camera, &PointerState::new(), 600.0, 1.0 / 60.0);

        assert!((camera.position.length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_switching_back_to_orbit_resumes_from_camera() {
        let mut hub = KeyEventHub::new();
        let mut camera = Camera::new(Vec3::new(0.0, 0.0, 10.0));
        let orbit = OrbitSettings {
            enable_damping: false,
            ..Default::default()
        };
        let first_person = FirstPersonSettings::default();
        let mut controls = Controls::new(ControlsMode::FirstPerson, &orbit, &first_person, &camera, &mut hub);

        hub.dispatch(&KeyEvent::down("s"));
        controls.update(&mut camera, &PointerState::new(), 600.0, 1.0 / 60.0);
        hub.dispatch(&KeyEvent::up("s"));
        let walked = camera.position;

        controls.switch(ControlsMode::Orbit, &orbit, &first_person, &camera, &mut hub);
        controls.update(&mut camera, &PointerState::new(), 600.0, 1.0 / 60.0);

        assert!((camera.position.length() - walked.length()).abs() < 1e-4);
        assert_eq!(hub.listener_count(), 0);
    }
}
