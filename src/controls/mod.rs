pub mod first_person;
pub mod orbit;
pub mod pointer_lock;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::input::{InputTracker, KeyEventHub, PointerState};

pub use first_person::{FirstPersonController, FirstPersonSettings, MovementKeys, SpeedMode};
pub use orbit::{OrbitControls, OrbitSettings};
pub use pointer_lock::PointerLockControls;

/// Which navigation scheme drives the camera
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ControlsMode {
    #[default]
    Orbit,
    FirstPerson,
}

impl ControlsMode {
    pub fn toggled(self) -> Self {
        match self {
            ControlsMode::Orbit => ControlsMode::FirstPerson,
            ControlsMode::FirstPerson => ControlsMode::Orbit,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ControlsMode::Orbit => "Orbit",
            ControlsMode::FirstPerson => "First person",
        }
    }
}

/// Keyboard walking plus pointer-lock look, sharing one key state
#[derive(Debug)]
pub struct FirstPersonRig {
    pub tracker: InputTracker,
    pub look: PointerLockControls,
    pub movement: FirstPersonController,
}

impl FirstPersonRig {
    /// Build the rig and subscribe its tracker to `hub`
    pub fn mount(settings: &FirstPersonSettings, hub: &mut KeyEventHub) -> Self {
        let mut tracker = InputTracker::new();
        tracker.mount(hub);
        let movement = FirstPersonController::new(tracker.key_state(), settings);
        Self {
            tracker,
            look: PointerLockControls::new(settings.pointer_speed),
            movement,
        }
    }
}

/// Active camera navigation
#[derive(Debug)]
pub enum Controls {
    Orbit(OrbitControls),
    FirstPerson(FirstPersonRig),
}

impl Controls {
    pub fn new(
        mode: ControlsMode,
        orbit: &OrbitSettings,
        first_person: &FirstPersonSettings,
        camera: &Camera,
        hub: &mut KeyEventHub,
    ) -> Self {
        log::info!("Controls: {}", mode.label());
        match mode {
            ControlsMode::Orbit => Controls::Orbit(OrbitControls::new(*orbit, camera)),
            ControlsMode::FirstPerson => Controls::FirstPerson(FirstPersonRig::mount(first_person, hub)),
        }
    }

    pub fn mode(&self) -> ControlsMode {
        match self {
            Controls::Orbit(_) => ControlsMode::Orbit,
            Controls::FirstPerson(_) => ControlsMode::FirstPerson,
        }
    }

    /// Release anything subscribed to `hub`. Call before dropping.
    pub fn teardown(&mut self, hub: &mut KeyEventHub) {
        if let Controls::FirstPerson(rig) = self {
            rig.look.unlock();
            rig.tracker.unmount(hub);
        }
    }

    /// Swap to another scheme, tearing the current one down first
    pub fn switch(
        &mut self,
        mode: ControlsMode,
        orbit: &OrbitSettings,
        first_person: &FirstPersonSettings,
        camera: &Camera,
        hub: &mut KeyEventHub,
    ) {
        if mode == self.mode() {
            return;
        }
        self.teardown(hub);
        *self = Controls::new(mode, orbit, first_person, camera, hub);
    }

    /// Per-frame update
    pub fn update(&mut self, camera: &mut Camera, pointer: &PointerState, viewport_height: f32, delta: f32) {
        match self {
            Controls::Orbit(orbit) => {
                let (dx, dy) = pointer.delta();
                if pointer.primary_down() {
                    orbit.rotate(dx, dy, viewport_height);
                } else if pointer.secondary_down() {
                    orbit.pan(camera, dx, dy, viewport_height);
                }
                orbit.zoom(pointer.wheel());
                orbit.update(camera);
            }
            Controls::FirstPerson(rig) => {
                rig.movement.tick(camera, delta);
            }
        }
    }

    /// Raw mouse motion, used for look while the pointer is locked
    pub fn on_mouse_motion(&mut self, camera: &mut Camera, dx: f32, dy: f32) {
        if let Controls::FirstPerson(rig) = self {
            rig.look.on_mouse_motion(camera, dx, dy);
        }
    }

    pub fn pointer_locked(&self) -> bool {
        match self {
            Controls::FirstPerson(rig) => rig.look.is_locked(),
            Controls::Orbit(_) => false,
        }
    }

    pub fn lock_pointer(&mut self) -> bool {
        match self {
            Controls::FirstPerson(rig) => rig.look.lock(),
            Controls::Orbit(_) => false,
        }
    }

    pub fn unlock_pointer(&mut self) -> bool {
        match self {
            Controls::FirstPerson(rig) => rig.look.unlock(),
            Controls::Orbit(_) => false,
        }
    }

    /// Forget held keys, e.g. after losing window focus
    pub fn release_keys(&self) {
        if let Controls::FirstPerson(rig) = self {
            rig.tracker.release_all();
        }
    }
}
