//! Fly camera and the read-only matrix handle handed to renderables.
//!
//! The camera is the single owner of the projection and view matrices.  It
//! publishes them into a shared cell after every change; renderables hold a
//! [`CameraHandle`] and can only read what was last published.

use std::cell::Cell;
use std::f32::consts::FRAC_PI_2;
use std::rc::Rc;

use glam::{Mat4, Vec3};

use crate::controller::FlyController;
use crate::input::{InputState, MouseButton};

/// Projection and view matrices as last published by a [`Camera`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMatrices {
    pub projection: Mat4,
    pub view: Mat4,
}

impl Default for CameraMatrices {
    fn default() -> Self {
        Self {
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
        }
    }
}

/// Read-only view onto a camera's published matrices.
///
/// Cloning is cheap; every clone observes the same camera.
#[derive(Debug, Clone)]
pub struct CameraHandle {
    shared: Rc<Cell<CameraMatrices>>,
}

impl CameraHandle {
    /// A handle that is not driven by any camera, publishing fixed matrices.
    pub fn fixed(matrices: CameraMatrices) -> Self {
        Self {
            shared: Rc::new(Cell::new(matrices)),
        }
    }

    pub fn projection(&self) -> Mat4 {
        self.shared.get().projection
    }

    pub fn view(&self) -> Mat4 {
        self.shared.get().view
    }

    pub fn matrices(&self) -> CameraMatrices {
        self.shared.get()
    }
}

/// Free-flying perspective camera (right-handed, +Y up).
#[derive(Debug, Clone)]
pub struct Camera {
    // --- view parameters --------------------------------------------------
    pub eye: Vec3,
    /// Radians around +Y; 0 looks down -Z.
    pub yaw: f32,
    /// Radians above the horizon, clamped just short of straight up/down.
    pub pitch: f32,
    // --- projection parameters --------------------------------------------
    pub fovy: f32,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
    // --- input controller -------------------------------------------------
    pub controller: FlyController,

    published: Rc<Cell<CameraMatrices>>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 15.0, 90.0), 16.0 / 9.0)
    }
}

impl Camera {
    const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

    pub fn new(eye: Vec3, aspect: f32) -> Self {
        let camera = Self {
            eye,
            yaw: 0.0,
            pitch: 0.0,
            fovy: 45.0f32.to_radians(),
            aspect,
            znear: 0.1,
            zfar: 1000.0,
            controller: FlyController::with_default_wasd(),
            published: Rc::new(Cell::new(CameraMatrices::default())),
        };
        camera.publish();
        camera
    }

    /// Returns a read-only handle onto the published matrices.
    pub fn handle(&self) -> CameraHandle {
        CameraHandle {
            shared: Rc::clone(&self.published),
        }
    }

    /// Unit vector the camera looks along.
    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(sy * cp, sp, -cy * cp)
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize_or_zero()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.eye, self.forward(), Vec3::Y)
    }

    /// Update the aspect ratio and republish the projection.
    ///
    /// Renderables that captured the previous projection keep it until the
    /// owner pushes it again.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
            self.publish();
        }
    }

    /// Apply one frame of fly-camera input and republish the view matrix.
    ///
    /// Mouse look is active while the left button is held.
    pub fn update(&mut self, input: &mut InputState, dt: f32) {
        let (mdx, mdy) = input.consume_mouse_delta();
        if input.is_button_down(MouseButton::Left) {
            self.turn(
                mdx * self.controller.mouse_sensitivity,
                -mdy * self.controller.mouse_sensitivity,
            );
        }
        let (kyaw, kpitch) = self.controller.keyboard_turn(input, dt);
        self.turn(kyaw, kpitch);

        let dir = self.controller.direction(input);
        if dir != Vec3::ZERO {
            let step = self.controller.speed * dt;
            self.eye += (self.right() * dir.x + Vec3::Y * dir.y + self.forward() * dir.z) * step;
        }
        self.publish();
    }

    fn turn(&mut self, dyaw: f32, dpitch: f32) {
        self.yaw += dyaw;
        self.pitch = (self.pitch + dpitch).clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
    }

    fn publish(&self) {
        self.published.set(CameraMatrices {
            projection: self.projection_matrix(),
            view: self.view_matrix(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;

    #[test]
    fn handle_sees_published_matrices() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), 1.0);
        let handle = camera.handle();
        assert!(handle.view().abs_diff_eq(camera.view_matrix(), 1e-6));
        assert!(handle.projection().abs_diff_eq(camera.projection_matrix(), 1e-6));

        let mut camera = camera;
        camera.set_aspect(2.0);
        let both = handle.matrices();
        assert!(both.projection.abs_diff_eq(camera.projection_matrix(), 1e-6));
        assert!(both.view.abs_diff_eq(camera.view_matrix(), 1e-6));
    }

    #[test]
    fn moving_forward_updates_the_handle_view() {
        let mut camera = Camera::new(Vec3::ZERO, 1.0);
        let handle = camera.handle();
        let before = handle.view();

        let mut input = InputState::new();
        input.update_key(KeyCode::KeyW, true);
        camera.update(&mut input, 0.1);

        assert!(camera.eye.z < 0.0, "default yaw looks down -Z");
        assert!(!handle.view().abs_diff_eq(before, 1e-6));
    }

    #[test]
    fn aspect_change_republishes_projection() {
        let mut camera = Camera::new(Vec3::ZERO, 1.0);
        let handle = camera.handle();
        let before = handle.projection();
        camera.set_aspect(2.0);
        assert!(!handle.projection().abs_diff_eq(before, 1e-6));

        camera.set_aspect(0.0);
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::new(Vec3::ZERO, 1.0);
        camera.turn(0.0, 10.0);
        assert!(camera.pitch < FRAC_PI_2);
        assert!(camera.forward().is_finite());
    }
}
