// Keyboard and mouse state for the demo, rebuilt from winit events each frame.
//
// Held keys persist across frames; presses, drag motion and scroll only
// cover the frame since the last end_frame().

use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Pixel scroll is normalised so one notch of a line-based wheel ≈ 100 px.
const PIXELS_PER_LINE: f32 = 100.0;

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<KeyCode>,
    pressed: HashSet<KeyCode>,

    pub cursor: Vec2,
    /// Cursor motion while the left button was down, this frame.
    pub drag_delta: Vec2,
    dragging: bool,

    /// Vertical scroll this frame in wheel lines; positive zooms in.
    pub scroll_delta: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(key) = event.physical_key else {
                    return;
                };
                match event.state {
                    ElementState::Pressed => {
                        // Auto-repeat does not count as a fresh press.
                        if self.held.insert(key) {
                            self.pressed.insert(key);
                        }
                    }
                    ElementState::Released => {
                        self.held.remove(&key);
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let cursor = Vec2::new(position.x as f32, position.y as f32);
                if self.dragging {
                    self.drag_delta += cursor - self.cursor;
                }
                self.cursor = cursor;
            }
            WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                self.dragging = *state == ElementState::Pressed;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
            }
            WindowEvent::Focused(false) => {
                self.held.clear();
                self.dragging = false;
            }
            _ => {}
        }
    }

    /// Drop this frame's presses, drag motion and scroll.
    pub fn end_frame(&mut self) {
        self.pressed.clear();
        self.drag_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// True only on the frame the key went down.
    pub fn was_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}
