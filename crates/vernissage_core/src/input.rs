use std::collections::HashSet;

/// Re-exported key and mouse enums from `winit` so callers don't need to
/// depend on winit directly.
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

/// State of the keyboard and mouse at a given moment.
///
/// The runner drives this structure by feeding it the events coming from
/// `winit`; the camera controller queries it once per frame.
#[derive(Default)]
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    mouse_buttons: HashSet<MouseButton>,
    mouse_pos: Option<(f64, f64)>,
    /// movement accumulated since the last `consume_mouse_delta`
    mouse_delta: (f32, f32),
}

impl InputState {
    pub fn new() -> Self {
        Default::default()
    }

    /// Called by the event loop when a keyboard event arrives.
    pub fn update_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.keys_down.insert(key);
        } else {
            self.keys_down.remove(&key);
        }
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Called by the event loop when a mouse button event arrives.
    pub fn update_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.mouse_buttons.insert(button);
        } else {
            self.mouse_buttons.remove(&button);
        }
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }

    /// Update the cursor position (window coordinates).
    ///
    /// The first position after startup produces no delta.
    pub fn set_mouse_position(&mut self, x: f64, y: f64) {
        if let Some((px, py)) = self.mouse_pos {
            self.mouse_delta.0 += (x - px) as f32;
            self.mouse_delta.1 += (y - py) as f32;
        }
        self.mouse_pos = Some((x, y));
    }

    pub fn mouse_position(&self) -> Option<(f64, f64)> {
        self.mouse_pos
    }

    /// Retrieve and reset the mouse movement (in pixels) since the last call.
    pub fn consume_mouse_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.mouse_delta)
    }

    /// Forget held keys and buttons, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.keys_down.clear();
        self.mouse_buttons.clear();
        self.mouse_delta = (0.0, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_tracking() {
        let mut state = InputState::new();
        assert!(!state.is_key_pressed(KeyCode::KeyW));
        state.update_key(KeyCode::KeyW, true);
        assert!(state.is_key_pressed(KeyCode::KeyW));
        state.update_key(KeyCode::KeyW, false);
        assert!(!state.is_key_pressed(KeyCode::KeyW));
    }

    #[test]
    fn mouse_delta_accumulates_until_consumed() {
        let mut state = InputState::new();
        state.set_mouse_position(10.0, 20.0);
        assert_eq!(state.consume_mouse_delta(), (0.0, 0.0));
        state.set_mouse_position(15.0, 25.0);
        state.set_mouse_position(16.0, 24.0);
        assert_eq!(state.consume_mouse_delta(), (6.0, 4.0));
        assert_eq!(state.consume_mouse_delta(), (0.0, 0.0));
        assert_eq!(state.mouse_position(), Some((16.0, 24.0)));
    }

    #[test]
    fn clear_releases_everything() {
        let mut state = InputState::new();
        state.update_key(KeyCode::KeyA, true);
        state.update_mouse_button(MouseButton::Left, true);
        state.clear();
        assert!(!state.is_key_pressed(KeyCode::KeyA));
        assert!(!state.is_button_down(MouseButton::Left));
    }
}
