//! Window input tracking.
//!
//! The `Input` struct turns raw winit window events into per-frame state:
//! instantaneous events (button just pressed) and continuous state (button
//! held), plus cursor motion and scroll accumulated since the last frame.
//! The orbit controls read it once per frame.

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    fn from_winit(btn: WinitMouseButton) -> Option<Self> {
        match btn {
            WinitMouseButton::Left => Some(MouseButton::Left),
            WinitMouseButton::Right => Some(MouseButton::Right),
            WinitMouseButton::Middle => Some(MouseButton::Middle),
            _ => None,
        }
    }
}

/// Keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Toggles the instructions drawer.
    H,
    /// Closes the window.
    Escape,
    Other(u32),
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::KeyH => KeyCode::H,
            WinitKeyCode::Escape => KeyCode::Escape,
            _ => KeyCode::Other(key as u32),
        }
    }
}

/// Pixels of a `PixelDelta` scroll that count as one wheel line.
const PIXELS_PER_LINE: f32 = 100.0;

/// Input state tracking for keyboard and mouse.
#[derive(Debug, Default)]
pub struct Input {
    // Key state
    keys_held: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,

    // Mouse button state
    mouse_held: HashSet<MouseButton>,

    // Cursor
    mouse_position: Vec2,
    mouse_delta: Vec2,
    cursor_seen: bool,

    // Scroll, in wheel lines
    scroll_delta: f32,

    window_size: (u32, u32),
}

impl Input {
    pub fn new() -> Self {
        Self {
            window_size: (1280, 720),
            ..Default::default()
        }
    }

    // ========== Key Queries ==========

    /// Check if a key was pressed this frame (just went down).
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    // ========== Mouse Button Queries ==========

    /// Check if a mouse button is currently held down.
    pub fn mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    // ========== Cursor Queries ==========

    /// Cursor movement since the last frame, in pixels.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Wheel movement this frame in lines. Positive is away from the user.
    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    // ========== Frame bookkeeping ==========

    /// Clear per-frame state. Call after the frame has consumed it.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
    }

    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    /// Process a winit window event.
    ///
    /// Returns the mouse button if the event was a press, so the caller can
    /// react to clicks without polling.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<MouseButton> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    let key = KeyCode::from(keycode);
                    match event.state {
                        ElementState::Pressed => {
                            // Only fire pressed event if not already held (no repeat)
                            if self.keys_held.insert(key) {
                                self.keys_pressed.insert(key);
                            }
                        }
                        ElementState::Released => {
                            self.keys_held.remove(&key);
                        }
                    }
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let btn = MouseButton::from_winit(*button)?;
                match state {
                    ElementState::Pressed => {
                        self.mouse_held.insert(btn);
                        return Some(btn);
                    }
                    ElementState::Released => {
                        self.mouse_held.remove(&btn);
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.move_cursor(Vec2::new(position.x as f32, position.y as f32));
            }

            WindowEvent::CursorLeft { .. } => {
                self.cursor_seen = false;
            }

            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
            }

            WindowEvent::Resized(size) => {
                self.set_window_size(size.width, size.height);
            }

            _ => {}
        }
        None
    }

    fn move_cursor(&mut self, new_pos: Vec2) {
        // The first position after entering the window is not a movement
        if self.cursor_seen {
            self.mouse_delta += new_pos - self.mouse_position;
        }
        self.cursor_seen = true;
        self.mouse_position = new_pos;
    }

    /// Release every held button, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.mouse_held.clear();
        self.keys_held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;
    use winit::event::{DeviceId, TouchPhase};

    fn device() -> DeviceId {
        // SAFETY: only compared, never passed back to the platform
        unsafe { DeviceId::dummy() }
    }

    fn mouse(button: WinitMouseButton, state: ElementState) -> WindowEvent {
        WindowEvent::MouseInput {
            device_id: device(),
            state,
            button,
        }
    }

    fn cursor(x: f64, y: f64) -> WindowEvent {
        WindowEvent::CursorMoved {
            device_id: device(),
            position: PhysicalPosition::new(x, y),
        }
    }

    #[test]
    fn test_press_reports_button() {
        let mut input = Input::new();
        assert_eq!(
            input.handle_event(&mouse(WinitMouseButton::Left, ElementState::Pressed)),
            Some(MouseButton::Left)
        );
        assert_eq!(
            input.handle_event(&mouse(WinitMouseButton::Right, ElementState::Pressed)),
            Some(MouseButton::Right)
        );
        assert_eq!(
            input.handle_event(&mouse(WinitMouseButton::Middle, ElementState::Pressed)),
            Some(MouseButton::Middle)
        );
        assert!(input.mouse_held(MouseButton::Left));
        assert!(input.mouse_held(MouseButton::Right));
    }

    #[test]
    fn test_release_and_other_events_report_nothing() {
        let mut input = Input::new();
        input.handle_event(&mouse(WinitMouseButton::Left, ElementState::Pressed));

        assert_eq!(input.handle_event(&mouse(WinitMouseButton::Left, ElementState::Released)), None);
        assert!(!input.mouse_held(MouseButton::Left));

        assert_eq!(input.handle_event(&mouse(WinitMouseButton::Back, ElementState::Pressed)), None);
        assert_eq!(input.handle_event(&cursor(4.0, 4.0)), None);
        assert_eq!(
            input.handle_event(&WindowEvent::MouseWheel {
                device_id: device(),
                delta: MouseScrollDelta::LineDelta(0.0, 2.0),
                phase: TouchPhase::Moved,
            }),
            None
        );
        assert_eq!(input.scroll_delta(), 2.0);
    }

    #[test]
    fn test_held_survives_begin_frame() {
        let mut input = Input::new();
        input.handle_event(&mouse(WinitMouseButton::Left, ElementState::Pressed));
        input.begin_frame();
        assert!(input.mouse_held(MouseButton::Left));
    }

    #[test]
    fn test_cursor_delta_accumulates() {
        let mut input = Input::new();
        input.handle_event(&cursor(100.0, 100.0));
        assert_eq!(input.mouse_delta(), Vec2::ZERO);

        input.handle_event(&cursor(110.0, 95.0));
        input.handle_event(&cursor(115.0, 90.0));
        assert_eq!(input.mouse_delta(), Vec2::new(15.0, -10.0));

        input.begin_frame();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_pixel_scroll_converts_to_lines() {
        let mut input = Input::new();
        input.handle_event(&WindowEvent::MouseWheel {
            device_id: device(),
            delta: MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 250.0)),
            phase: TouchPhase::Moved,
        });
        assert_eq!(input.scroll_delta(), 2.5);
    }

    #[test]
    fn test_release_all() {
        let mut input = Input::new();
        input.mouse_held.insert(MouseButton::Right);
        input.keys_held.insert(KeyCode::H);
        input.release_all();
        assert!(!input.mouse_held(MouseButton::Right));
        assert!(input.keys_held.is_empty());
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(KeyCode::from(WinitKeyCode::KeyH), KeyCode::H);
        assert_eq!(KeyCode::from(WinitKeyCode::Escape), KeyCode::Escape);
        assert!(matches!(KeyCode::from(WinitKeyCode::KeyQ), KeyCode::Other(_)));
    }
}
