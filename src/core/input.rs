//! Input state tracking
//!
//! `InputState` follows winit events for the lifetime of the window. Once per tick
//! the frame loop takes a [`MoveInput`] snapshot, which is all the locomotion
//! controller ever sees.

use std::collections::HashSet;
use glam::Vec2;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Read-only per-tick snapshot of movement intent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    /// Pointer motion since the previous tick (pixels).
    pub look_delta: Vec2,
}

impl MoveInput {
    pub const IDLE: Self = Self {
        forward: false,
        back: false,
        left: false,
        right: false,
        look_delta: Vec2::ZERO,
    };

    /// Snapshot with only forward held.
    pub fn forward() -> Self {
        Self { forward: true, ..Self::IDLE }
    }

    /// True if any directional key is held.
    pub fn wants_move(&self) -> bool {
        self.forward || self.back || self.left || self.right
    }
}

/// Tracks keyboard and mouse input state
pub struct InputState {
    /// Currently pressed keys
    keys_pressed: HashSet<KeyCode>,
    /// Mouse movement delta since last frame
    mouse_delta: (f32, f32),
    /// Accumulated raw mouse motion (for when cursor is grabbed)
    mouse_delta_accumulated: (f32, f32),
    /// Current mouse position
    mouse_position: (f32, f32),
    /// Whether mouse is captured
    mouse_captured: bool,
}

impl InputState {
    /// Create new input state
    pub fn new() -> Self {
        Self {
            keys_pressed: HashSet::new(),
            mouse_delta: (0.0, 0.0),
            mouse_delta_accumulated: (0.0, 0.0),
            mouse_position: (0.0, 0.0),
            mouse_captured: false,
        }
    }

    /// Process a window event
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    physical_key: PhysicalKey::Code(key_code),
                    state,
                    ..
                },
                ..
            } => {
                match state {
                    ElementState::Pressed => {
                        self.keys_pressed.insert(*key_code);
                    }
                    ElementState::Released => {
                        self.keys_pressed.remove(key_code);
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let new_pos = (position.x as f32, position.y as f32);
                if !self.mouse_captured {
                    self.mouse_delta.0 += new_pos.0 - self.mouse_position.0;
                    self.mouse_delta.1 += new_pos.1 - self.mouse_position.1;
                }
                self.mouse_position = new_pos;
            }
            // Focus loss drops key-up events; release everything.
            WindowEvent::Focused(false) => {
                self.keys_pressed.clear();
            }
            _ => {}
        }
    }

    /// Process device event for raw mouse motion (when cursor is grabbed)
    pub fn process_mouse_motion(&mut self, delta: (f64, f64)) {
        self.mouse_delta_accumulated.0 += delta.0 as f32;
        self.mouse_delta_accumulated.1 += delta.1 as f32;
    }

    /// Press or release a key directly (scripted input, tests)
    pub fn set_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.keys_pressed.insert(key);
        } else {
            self.keys_pressed.remove(&key);
        }
    }

    /// Check if key is currently pressed
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Build the movement snapshot for this tick.
    pub fn snapshot(&self) -> MoveInput {
        let held = |a: KeyCode, b: KeyCode| self.is_key_pressed(a) || self.is_key_pressed(b);
        let delta = if self.mouse_captured {
            self.mouse_delta_accumulated
        } else {
            self.mouse_delta
        };

        MoveInput {
            forward: held(KeyCode::KeyW, KeyCode::ArrowUp),
            back: held(KeyCode::KeyS, KeyCode::ArrowDown),
            left: held(KeyCode::KeyA, KeyCode::ArrowLeft),
            right: held(KeyCode::KeyD, KeyCode::ArrowRight),
            look_delta: Vec2::new(delta.0, delta.1),
        }
    }

    /// Call at end of frame to reset per-frame state
    pub fn end_frame(&mut self) {
        self.mouse_delta = (0.0, 0.0);
        self.mouse_delta_accumulated = (0.0, 0.0);
    }

    /// Get current mouse position
    pub fn mouse_position(&self) -> (f32, f32) {
        self.mouse_position
    }

    /// Set mouse captured state
    pub fn set_mouse_captured(&mut self, captured: bool) {
        self.mouse_captured = captured;
        if captured {
            self.mouse_delta = (0.0, 0.0);
            self.mouse_delta_accumulated = (0.0, 0.0);
        }
    }

    /// Check if mouse is captured
    pub fn is_mouse_captured(&self) -> bool {
        self.mouse_captured
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
