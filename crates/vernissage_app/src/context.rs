use vernissage_core::{Camera, InputState, Time};
use vernissage_renderer::WgpuDevice;
use winit::window::Window;

/// Everything an app callback can reach during one call.
pub struct AppContext<'a> {
    pub input: &'a InputState,
    pub time: Time,
    pub window_size: (u32, u32),
    pub window: &'a Window,
    pub device: &'a mut WgpuDevice,
    pub camera: &'a mut Camera,
    pub(crate) exit_requested: bool,
}

impl AppContext<'_> {
    /// Stops the event loop after the current callback.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn width(&self) -> u32 {
        self.window_size.0
    }

    pub fn height(&self) -> u32 {
        self.window_size.1
    }

    pub fn aspect(&self) -> f32 {
        aspect_ratio(self.window_size)
    }
}

/// Width over height, 1.0 for degenerate sizes.
pub fn aspect_ratio((width, height): (u32, u32)) -> f32 {
    if width == 0 || height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_of_degenerate_sizes_is_one() {
        assert_eq!(aspect_ratio((1280, 720)), 1280.0 / 720.0);
        assert_eq!(aspect_ratio((0, 720)), 1.0);
        assert_eq!(aspect_ratio((640, 0)), 1.0);
    }
}
