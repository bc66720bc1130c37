// Pointer (mouse / touch) state tracking

use glam::Vec2;
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};

/// Snapshot of the pointer for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    /// Whether the pointer is currently pressed / touching
    pub active: bool,
    /// Last known position in window pixels (origin top-left, y down)
    pub position: Vec2,
}

impl PointerState {
    /// A pressed pointer at the given window position
    pub fn pressed_at(position: Vec2) -> Self {
        Self {
            active: true,
            position,
        }
    }
}

/// Folds winit window events into a `PointerState`
#[derive(Debug, Default)]
pub struct PointerInput {
    state: PointerState,
    /// Finger that currently owns the pointer, if touch input is in use
    touch_id: Option<u64>,
}

impl PointerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a window event into the pointer state
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.move_to(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.press(self.state.position),
                ElementState::Released => self.release(),
            },
            WindowEvent::Touch(touch) => {
                let position = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                self.touch(touch.id, touch.phase, position);
            }
            WindowEvent::Focused(false) => self.release(),
            _ => {}
        }
    }

    /// Pointer pressed at a window position
    pub fn press(&mut self, position: Vec2) {
        self.state = PointerState::pressed_at(position);
    }

    /// Pointer moved, pressed or not
    pub fn move_to(&mut self, position: Vec2) {
        self.state.position = position;
    }

    /// Pointer released
    pub fn release(&mut self) {
        self.state.active = false;
        self.touch_id = None;
    }

    /// Touch events: the first finger down drives the pointer until lifted
    pub fn touch(&mut self, id: u64, phase: TouchPhase, position: Vec2) {
        match phase {
            TouchPhase::Started => {
                if self.touch_id.is_none() {
                    self.touch_id = Some(id);
                    self.press(position);
                }
            }
            TouchPhase::Moved => {
                if self.touch_id == Some(id) {
                    self.move_to(position);
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                if self.touch_id == Some(id) {
                    self.release();
                }
            }
        }
    }

    /// Current pointer snapshot
    pub fn state(&self) -> PointerState {
        self.state
    }
}
