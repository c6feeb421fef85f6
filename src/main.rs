use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{CursorGrabMode, Window, WindowId},
};

use scene_viewer::cli::Cli;
use scene_viewer::config::ViewerConfig;
use scene_viewer::controls::{Controls, ControlsMode};
use scene_viewer::core::{FpsCounter, FrameIterator};
use scene_viewer::input::winit_adapter::{self, Hotkey, KeyRoute};
use scene_viewer::input::{KeyEventHub, PointerState};
use scene_viewer::renderer::{Overlay, SceneRenderer};
use scene_viewer::scene::{Cloud, CubeField};
use scene_viewer::Camera;

const INITIAL_WINDOW_WIDTH: u32 = 1280;
const INITIAL_WINDOW_HEIGHT: u32 = 720;

struct App {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    renderer: Option<SceneRenderer>,
    camera: Camera,
    controls: Controls,
    hub: KeyEventHub,
    pointer: PointerState,
    cubes: CubeField,
    cloud: Cloud,
    frames: FrameIterator,
    fps: FpsCounter,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        let seed = config.scene_seed();
        log::info!("Scene seed: {}", seed);

        let camera = config.camera.build();
        let mut hub = KeyEventHub::new();
        let controls = Controls::new(
            config.controls,
            &config.orbit,
            &config.first_person,
            &camera,
            &mut hub,
        );

        Self {
            cubes: CubeField::generate(&config.cubes, seed),
            cloud: Cloud::new(config.cloud),
            window: None,
            renderer: None,
            camera,
            controls,
            hub,
            pointer: PointerState::new(),
            frames: FrameIterator::new(),
            fps: FpsCounter::new(),
            config,
        }
    }

    fn switch_controls(&mut self) {
        let mode = self.controls.mode().toggled();
        self.release_cursor();
        self.controls.switch(
            mode,
            &self.config.orbit,
            &self.config.first_person,
            &self.camera,
            &mut self.hub,
        );
    }

    fn grab_cursor(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
        match grabbed {
            Ok(()) => {
                window.set_cursor_visible(false);
                self.controls.lock_pointer();
            }
            Err(e) => log::warn!("Failed to grab cursor: {}", e),
        }
    }

    fn release_cursor(&mut self) {
        if !self.controls.unlock_pointer() {
            return;
        }
        if let Some(window) = &self.window {
            if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                log::warn!("Failed to release cursor: {}", e);
            }
            window.set_cursor_visible(true);
        }
    }

    fn on_key(&mut self, event_loop: &ActiveEventLoop, event: &winit::event::KeyEvent, ui_consumed: bool) {
        let route = winit_adapter::route_key(
            &event.logical_key,
            event.state == ElementState::Pressed,
            event.repeat,
            ui_consumed,
            self.controls.pointer_locked(),
        );

        match route {
            KeyRoute::Hotkey(Hotkey::ToggleControls) => self.switch_controls(),
            KeyRoute::Hotkey(Hotkey::Escape) => {
                if self.controls.pointer_locked() {
                    self.release_cursor();
                } else {
                    event_loop.exit();
                }
            }
            KeyRoute::Dispatch => {
                if let Some(key_event) = winit_adapter::translate(event) {
                    self.hub.dispatch(&key_event);
                }
            }
            KeyRoute::Ignore => {}
        }
    }

    fn redraw(&mut self) {
        let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) else {
            return;
        };
        let Some(frame) = self.frames.next() else {
            return;
        };
        if let Some(fps) = self.fps.record(frame.delta) {
            log::trace!("{:.1} fps", fps);
        }

        let viewport_height = renderer.size().height as f32;
        self.controls
            .update(&mut self.camera, &self.pointer, viewport_height, frame.delta);
        self.pointer.reset_deltas();

        let puffs = self.cloud.puffs(frame.time, self.camera.position);
        let mut cloud_params = *self.cloud.params();
        let overlay = Overlay {
            visible: self.config.show_ui,
            fps: self.fps.fps(),
            mode: self.controls.mode(),
            pointer_locked: self.controls.pointer_locked(),
            cloud: &mut cloud_params,
        };

        match renderer.render(window, &self.camera, &puffs, frame.time, overlay) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => renderer.reconfigure(),
            Err(e) => log::error!("Render error: {}", e),
        }
        self.cloud.set_params(cloud_params);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title("Scene Viewer")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    INITIAL_WINDOW_WIDTH,
                    INITIAL_WINDOW_HEIGHT,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let boxes = self.cubes.to_box_data();
        let background = self.config.background.to_array();
        let renderer = match pollster::block_on(SceneRenderer::new(window.clone(), &boxes, background)) {
            Ok(r) => r,
            Err(e) => {
                log::error!("Failed to initialize renderer: {:#}", e);
                event_loop.exit();
                return;
            }
        };

        self.window = Some(window);
        self.renderer = Some(renderer);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        // egui gets first pick, except while looking around with a locked cursor
        let mut ui_consumed = false;
        if !self.controls.pointer_locked() {
            if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
                ui_consumed = renderer.handle_event(window, &event);
            }
        }

        // Keys are routed separately: hotkeys and releases must get through
        if let WindowEvent::KeyboardInput { event, .. } = &event {
            self.on_key(event_loop, event, ui_consumed);
            return;
        }
        if ui_consumed {
            return;
        }

        if let Some(renderer) = &self.renderer {
            let over_ui = renderer.wants_pointer() && self.config.show_ui;
            let is_pointer_event = matches!(
                event,
                WindowEvent::MouseInput { .. } | WindowEvent::MouseWheel { .. }
            );
            if !(over_ui && is_pointer_event) {
                self.pointer.process_event(&event);
            }
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size);
                }
            }
            WindowEvent::Focused(false) => {
                self.controls.release_keys();
                self.release_cursor();
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                let over_ui = self.config.show_ui
                    && self.renderer.as_ref().is_some_and(|r| r.wants_pointer());
                if self.controls.mode() == ControlsMode::FirstPerson
                    && !self.controls.pointer_locked()
                    && !over_ui
                {
                    self.grab_cursor();
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.controls
                .on_mouse_motion(&mut self.camera, dx as f32, dy as f32);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.controls.teardown(&mut self.hub);
        log::info!("Rendered {} frames", self.frames.frame_number());
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = ViewerConfig::resolve(&cli)?;

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);

    log::info!("Scene Viewer - Tab switches controls, Escape releases the cursor or quits");
    event_loop.run_app(&mut app)?;

    Ok(())
}
