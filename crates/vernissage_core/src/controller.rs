use std::collections::HashMap;

use glam::Vec3;

use crate::input::{InputState, KeyCode};

/// Maps keys to camera-space movement directions and stores the fly-camera
/// motion parameters.
///
/// # Example
/// ```rust,ignore
/// use vernissage_core::{FlyController, KeyCode};
/// use glam::Vec3;
///
/// let mut controller = FlyController::with_default_wasd();
/// controller.bind(KeyCode::ArrowUp, Vec3::new(0.0, 0.0, 1.0));
/// controller.speed = 10.0;
/// ```
#[derive(Debug, Clone)]
pub struct FlyController {
    /// Key → camera-space unit direction (+Z forward, +X right, +Y up).
    mappings: HashMap<KeyCode, Vec3>,

    /// Translation speed in world-units per second.
    ///
    /// Default: `20.0`
    pub speed: f32,

    /// Mouse-look sensitivity in radians per pixel.
    ///
    /// Default: `0.004`
    pub mouse_sensitivity: f32,

    /// Keyboard look speed (arrow keys) in radians per second.
    ///
    /// Default: `1.5`
    pub turn_speed: f32,
}

impl Default for FlyController {
    fn default() -> Self {
        Self::new()
    }
}

impl FlyController {
    /// Creates a controller with no key bindings and default parameters.
    pub fn new() -> Self {
        Self {
            mappings: HashMap::new(),
            speed: 20.0,
            mouse_sensitivity: 0.004,
            turn_speed: 1.5,
        }
    }

    /// WASD for planar movement, E/Q for up/down.
    pub fn with_default_wasd() -> Self {
        let mut ctl = Self::new();
        ctl.bind(KeyCode::KeyW, Vec3::new(0.0, 0.0, 1.0));
        ctl.bind(KeyCode::KeyS, Vec3::new(0.0, 0.0, -1.0));
        ctl.bind(KeyCode::KeyA, Vec3::new(-1.0, 0.0, 0.0));
        ctl.bind(KeyCode::KeyD, Vec3::new(1.0, 0.0, 0.0));
        ctl.bind(KeyCode::KeyE, Vec3::new(0.0, 1.0, 0.0));
        ctl.bind(KeyCode::KeyQ, Vec3::new(0.0, -1.0, 0.0));
        ctl
    }

    /// Binds `key` to a camera-space direction, replacing any old binding.
    pub fn bind(&mut self, key: KeyCode, dir: Vec3) {
        self.mappings.insert(key, dir);
    }

    pub fn unbind(&mut self, key: KeyCode) {
        self.mappings.remove(&key);
    }

    /// Sum of the bound directions whose keys are held.
    ///
    /// Not normalised; multiply by [`speed`](Self::speed) and `dt`.
    pub fn direction(&self, input: &InputState) -> Vec3 {
        self.mappings
            .iter()
            .filter(|(key, _)| input.is_key_pressed(**key))
            .map(|(_, dir)| *dir)
            .sum()
    }

    /// Yaw/pitch change requested by the arrow keys for this frame.
    pub fn keyboard_turn(&self, input: &InputState, dt: f32) -> (f32, f32) {
        let axis = |neg: KeyCode, pos: KeyCode| {
            let mut v = 0.0;
            if input.is_key_pressed(pos) {
                v += 1.0;
            }
            if input.is_key_pressed(neg) {
                v -= 1.0;
            }
            v
        };
        let yaw = axis(KeyCode::ArrowLeft, KeyCode::ArrowRight);
        let pitch = axis(KeyCode::ArrowDown, KeyCode::ArrowUp);
        (yaw * self.turn_speed * dt, pitch * self.turn_speed * dt)
    }
}
