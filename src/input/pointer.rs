use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// Pixels of touchpad scroll that count as one wheel step
const PIXELS_PER_WHEEL_STEP: f32 = 50.0;

/// Mouse buttons, cursor motion and wheel accumulated between frames.
///
/// Drives the orbit controls; pointer-lock look uses raw device motion
/// instead.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    primary_down: bool,
    secondary_down: bool,
    position: Option<(f32, f32)>,
    delta: (f32, f32),
    wheel: f32,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a winit window event and update internal state
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                self.on_button(*button, *state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.on_cursor_moved(position.x as f32, position.y as f32);
            }
            WindowEvent::CursorLeft { .. } => {
                self.position = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_WHEEL_STEP,
                };
                self.on_wheel(steps);
            }
            _ => {}
        }
    }

    pub fn on_button(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.primary_down = pressed,
            MouseButton::Right | MouseButton::Middle => self.secondary_down = pressed,
            _ => {}
        }
    }

    pub fn on_cursor_moved(&mut self, x: f32, y: f32) {
        if let Some((old_x, old_y)) = self.position {
            self.delta.0 += x - old_x;
            self.delta.1 += y - old_y;
        }
        self.position = Some((x, y));
    }

    /// Positive steps scroll away from the user
    pub fn on_wheel(&mut self, steps: f32) {
        self.wheel += steps;
    }

    /// Reset per-frame state (cursor delta and wheel)
    pub fn reset_deltas(&mut self) {
        self.delta = (0.0, 0.0);
        self.wheel = 0.0;
    }

    pub fn primary_down(&self) -> bool {
        self.primary_down
    }

    pub fn secondary_down(&self) -> bool {
        self.secondary_down
    }

    pub fn position(&self) -> Option<(f32, f32)> {
        self.position
    }

    /// Cursor motion accumulated since the last reset
    pub fn delta(&self) -> (f32, f32) {
        self.delta
    }

    /// Wheel steps accumulated since the last reset
    pub fn wheel(&self) -> f32 {
        self.wheel
    }
}
