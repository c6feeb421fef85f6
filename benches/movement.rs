use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use scene_viewer::camera::Camera;
use scene_viewer::controls::{FirstPersonController, FirstPersonSettings};
use scene_viewer::input::{InputTracker, KeyEvent, KeyEventHub};
use scene_viewer::scene::{Cloud, CloudParams, CubeField, CubeFieldSettings};

fn bench_movement_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("movement_tick");

    for held in [0usize, 1, 2, 4] {
        let mut hub = KeyEventHub::new();
        let mut tracker = InputTracker::new();
        tracker.mount(&mut hub);
        for key in ["w", "d", "s", "a"].iter().take(held) {
            hub.dispatch(&KeyEvent::down(*key));
        }

        let mut controller = FirstPersonController::new(tracker.key_state(), &FirstPersonSettings::default());
        let mut camera = Camera::new(Vec3::ZERO);
        camera.look_to(Vec3::new(0.3, 0.4, -1.0));

        group.bench_with_input(BenchmarkId::new("keys_held", held), &held, |b, _| {
            b.iter(|| controller.tick(black_box(&mut camera), black_box(1.0 / 60.0)))
        });
    }

    group.finish();
}

fn bench_key_dispatch(c: &mut Criterion) {
    let mut hub = KeyEventHub::new();
    let mut tracker = InputTracker::new();
    tracker.mount(&mut hub);
    let down = KeyEvent::down("w");
    let up = KeyEvent::up("w");

    c.bench_function("key_dispatch_press_release", |b| {
        b.iter(|| {
            hub.dispatch(black_box(&down));
            hub.dispatch(black_box(&up));
        })
    });
}

fn bench_scene(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene");

    group.bench_function("cube_field_generate", |b| {
        let settings = CubeFieldSettings::default();
        b.iter(|| CubeField::generate(black_box(&settings), black_box(42)))
    });

    for segments in [20u32, 80] {
        let cloud = Cloud::new(CloudParams {
            segments,
            ..Default::default()
        });
        group.bench_with_input(BenchmarkId::new("cloud_puffs", segments), &segments, |b, _| {
            b.iter(|| cloud.puffs(black_box(1.5), black_box(Vec3::new(-1.5, 1.0, 5.5))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_movement_tick, bench_key_dispatch, bench_scene);
criterion_main!(benches);
