//! Translate window events into gallery input.

use glam::Vec2;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Press and release further apart than this (in pixels) is a drag.
pub const CLICK_SLOP: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to a position in normalized device coordinates.
    PointerMoved(Vec2),
    PointerLeft,
    /// Primary button clicked at a position in normalized device coordinates.
    Click(Vec2),
    Back,
    Forward,
    Exit,
}

/// Pointer and keyboard state of one window.
#[derive(Debug)]
pub struct InputState {
    size: PhysicalSize<u32>,
    pointer: Option<Vec2>,
    pressed_at: Option<Vec2>,
    shift: bool,
}

impl InputState {
    pub fn new(size: PhysicalSize<u32>) -> Self {
        Self {
            size,
            pointer: None,
            pressed_at: None,
            shift: false,
        }
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.size = size;
    }

    pub fn process(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                Some(self.pointer_moved(Vec2::new(position.x as f32, position.y as f32)))
            }
            WindowEvent::CursorLeft { .. } => Some(self.pointer_left()),
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self.button(*state == ElementState::Pressed),
            WindowEvent::ModifiersChanged(modifiers) => {
                self.shift = modifiers.state().shift_key();
                None
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat: false,
                        ..
                    },
                ..
            } => self.key(*code),
            _ => None,
        }
    }

    /// Pointer moved to `position` in window pixels.
    pub fn pointer_moved(&mut self, position: Vec2) -> InputEvent {
        self.pointer = Some(position);
        InputEvent::PointerMoved(to_ndc(position, self.size))
    }

    pub fn pointer_left(&mut self) -> InputEvent {
        self.pointer = None;
        self.pressed_at = None;
        InputEvent::PointerLeft
    }

    /// Primary button changed. A release close to its press is a click.
    pub fn button(&mut self, pressed: bool) -> Option<InputEvent> {
        let pointer = self.pointer?;
        if pressed {
            self.pressed_at = Some(pointer);
            return None;
        }
        let start = self.pressed_at.take()?;
        (start.distance(pointer) <= CLICK_SLOP)
            .then(|| InputEvent::Click(to_ndc(pointer, self.size)))
    }

    pub fn set_shift(&mut self, shift: bool) {
        self.shift = shift;
    }

    pub fn key(&mut self, code: KeyCode) -> Option<InputEvent> {
        match code {
            KeyCode::Escape => Some(InputEvent::Exit),
            KeyCode::Backspace if self.shift => Some(InputEvent::Forward),
            KeyCode::Backspace | KeyCode::BrowserBack => Some(InputEvent::Back),
            KeyCode::BrowserForward => Some(InputEvent::Forward),
            _ => None,
        }
    }
}

/// Window pixels (origin top-left, y down) to normalized device coordinates.
pub fn to_ndc(position: Vec2, size: PhysicalSize<u32>) -> Vec2 {
    let w = size.width.max(1) as f32;
    let h = size.height.max(1) as f32;
    Vec2::new(position.x / w * 2.0 - 1.0, 1.0 - position.y / h * 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> InputState {
        InputState::new(PhysicalSize::new(800, 600))
    }

    #[test]
    fn test_to_ndc_corners() {
        let size = PhysicalSize::new(800, 600);
        assert_eq!(to_ndc(Vec2::ZERO, size), Vec2::new(-1.0, 1.0));
        assert_eq!(to_ndc(Vec2::new(800.0, 600.0), size), Vec2::new(1.0, -1.0));
        assert_eq!(to_ndc(Vec2::new(400.0, 300.0), size), Vec2::ZERO);
    }

    #[test]
    fn test_press_release_in_place_clicks() {
        let mut input = state();
        input.pointer_moved(Vec2::new(400.0, 300.0));
        assert_eq!(input.button(true), None);
        assert_eq!(input.button(false), Some(InputEvent::Click(Vec2::ZERO)));
    }

    #[test]
    fn test_drag_is_not_a_click() {
        let mut input = state();
        input.pointer_moved(Vec2::new(100.0, 100.0));
        input.button(true);
        input.pointer_moved(Vec2::new(140.0, 100.0));
        assert_eq!(input.button(false), None);
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let mut input = state();
        input.pointer_moved(Vec2::new(10.0, 10.0));
        assert_eq!(input.button(false), None);
        assert_eq!(input.pointer_left(), InputEvent::PointerLeft);
        assert_eq!(input.button(true), None);
    }

    #[test]
    fn test_history_keys() {
        let mut input = state();
        assert_eq!(input.key(KeyCode::Backspace), Some(InputEvent::Back));
        input.set_shift(true);
        assert_eq!(input.key(KeyCode::Backspace), Some(InputEvent::Forward));
        assert_eq!(input.key(KeyCode::Escape), Some(InputEvent::Exit));
        assert_eq!(input.key(KeyCode::KeyA), None);
    }
}
