// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Perspective camera whose aspect ratio is derived from viewport dimensions.

use core::f32::consts::PI;
use glam::{Mat4, Quat, Vec2, Vec3};

/// Vertical field of view used by every viewer camera.
pub const DEFAULT_FOV_Y_DEGREES: f32 = 55.0;
/// Near clipping plane.
pub const DEFAULT_NEAR: f32 = 0.1;
/// Far clipping plane.
pub const DEFAULT_FAR: f32 = 1000.0;
/// Distance along +Z that frames a unit-sized asset at the origin.
pub const DEFAULT_CAMERA_DISTANCE: f32 = 4.0;
/// Pitch clamp for look controls (just shy of straight up/down).
pub const MAX_PITCH: f32 = PI * 0.5 - 0.01;

/// Perspective camera.
///
/// The aspect ratio is never set directly: it is derived through
/// [`PerspectiveCamera::set_viewport`] so it always matches the most recent
/// measured dimensions. Until the first measurement it is `0.0` and the
/// projection stays at identity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Camera position in world space.
    pub position: Vec3,
    /// Look orientation (identity looks down -Z).
    pub orientation: Quat,
    aspect: f32,
    pitch: f32,
    projection: Mat4,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(DEFAULT_FOV_Y_DEGREES, DEFAULT_NEAR, DEFAULT_FAR)
    }
}

impl PerspectiveCamera {
    /// Create a camera at the origin with an underived (zero) aspect ratio.
    pub fn new(fov_y_degrees: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y_degrees,
            near,
            far,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            aspect: 0.0,
            pitch: 0.0,
            projection: Mat4::IDENTITY,
        }
    }

    /// Current aspect ratio (`0.0` before the first measurement).
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Accumulated look pitch in radians.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Derive the aspect ratio from viewport dimensions and refresh the projection.
    ///
    /// Returns `false` (leaving the camera untouched) when either dimension is zero.
    #[allow(clippy::cast_precision_loss)]
    pub fn set_viewport(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.aspect = width as f32 / height as f32;
        self.update_projection_matrix();
        true
    }

    /// Recompute the cached projection matrix from fov/aspect/near/far.
    pub fn update_projection_matrix(&mut self) {
        if self.aspect <= 0.0 || !self.aspect.is_finite() {
            self.projection = Mat4::IDENTITY;
            return;
        }
        self.projection = Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }

    /// Cached projection matrix.
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// World-to-view matrix.
    pub fn view(&self) -> Mat4 {
        let forward = self.orientation * -Vec3::Z;
        let up = self.orientation * Vec3::Y;
        Mat4::look_to_rh(self.position, forward, up)
    }

    /// Combined projection * view.
    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view()
    }

    /// Unit forward vector.
    pub fn forward(&self) -> Vec3 {
        self.orientation * -Vec3::Z
    }

    /// Apply a pointer delta as yaw (around world up) and clamped pitch.
    pub fn rotate_by_look(&mut self, delta: Vec2, sensitivity: f32, invert_x: bool, invert_y: bool) {
        let yaw_delta = -delta.x * sensitivity * if invert_x { -1.0 } else { 1.0 };
        let pitch_delta = -delta.y * sensitivity * if invert_y { -1.0 } else { 1.0 };

        self.orientation = Quat::from_axis_angle(Vec3::Y, yaw_delta) * self.orientation;

        let new_pitch = (self.pitch + pitch_delta).clamp(-MAX_PITCH, MAX_PITCH);
        let applied = new_pitch - self.pitch;
        if applied.abs() > 1e-6 {
            let right = self.orientation * Vec3::X;
            self.orientation = Quat::from_axis_angle(right, applied) * self.orientation;
            self.pitch = new_pitch;
        }
        self.orientation = self.orientation.normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn aspect_is_zero_until_measured() {
        let cam = PerspectiveCamera::default();
        assert_eq!(cam.aspect(), 0.0);
        assert_eq!(cam.projection(), Mat4::IDENTITY);
    }

    #[test]
    fn set_viewport_derives_aspect_and_projection() {
        let mut cam = PerspectiveCamera::default();
        assert!(cam.set_viewport(400, 300));
        assert_relative_eq!(cam.aspect(), 400.0 / 300.0);
        let expected =
            Mat4::perspective_rh(55f32.to_radians(), 400.0 / 300.0, DEFAULT_NEAR, DEFAULT_FAR);
        assert_eq!(cam.projection(), expected);
    }

    #[test]
    fn zero_dimension_is_ignored() {
        let mut cam = PerspectiveCamera::default();
        assert!(cam.set_viewport(800, 600));
        assert!(!cam.set_viewport(0, 600));
        assert!(!cam.set_viewport(800, 0));
        assert_relative_eq!(cam.aspect(), 800.0 / 600.0);
    }

    #[test]
    fn look_pitch_is_clamped() {
        let mut cam = PerspectiveCamera::default();
        for _ in 0..100 {
            cam.rotate_by_look(Vec2::new(0.0, -500.0), 0.0025, false, false);
        }
        assert!(cam.pitch() <= MAX_PITCH + 1e-6);
        assert!(cam.orientation.is_normalized());
    }

    #[test]
    fn horizontal_look_keeps_pitch() {
        let mut cam = PerspectiveCamera::default();
        cam.rotate_by_look(Vec2::new(120.0, 0.0), 0.0025, false, false);
        assert_eq!(cam.pitch(), 0.0);
        assert_relative_eq!(cam.forward().y, 0.0, epsilon = 1e-6);
        assert!(cam.forward().x > 0.0);
    }
}
