//! First-person viewpoint
//!
//! Exactly one viewpoint exists per session. Its height is owned by the
//! locomotion controller, which pins it to the eye height every tick.

use crate::core::types::{Mat4, Quat, Vec2, Vec3};

/// Pitch limit in radians (keeps the look vector off the poles).
const PITCH_LIMIT: f32 = 1.5;

/// Observer position and look direction.
#[derive(Clone, Debug)]
pub struct Viewpoint {
    /// World position
    pub position: Vec3,
    /// Rotation around Y in radians (0 looks down -Z)
    yaw: f32,
    /// Rotation around X in radians
    pitch: f32,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Pointer sensitivity multiplier
    pub sensitivity: f32,
}

impl Viewpoint {
    /// Create a viewpoint at `position` looking down -Z.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            fov_y: 75.0_f32.to_radians(),
            sensitivity: 1.0,
        }
    }

    /// Create a viewpoint facing a ground-plane heading.
    pub fn facing(position: Vec3, yaw: f32) -> Self {
        let mut view = Self::new(position);
        view.set_orientation(yaw, 0.0);
        view
    }

    /// Rotation as quaternion
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(glam::EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Look direction (negative Z in view space)
    pub fn forward(&self) -> Vec3 {
        self.rotation() * -Vec3::Z
    }

    /// Look direction projected onto the ground plane.
    ///
    /// Zero when looking straight up or down.
    pub fn ground_forward(&self) -> Vec3 {
        let f = self.forward();
        Vec3::new(f.x, 0.0, f.z).normalize_or_zero()
    }

    /// Strafe-left direction on the ground plane (`up × forward`).
    pub fn ground_left(&self) -> Vec3 {
        Vec3::Y.cross(self.ground_forward()).normalize_or_zero()
    }

    /// Apply a pointer delta (pixels) to yaw and pitch.
    pub fn look(&mut self, delta: Vec2) {
        if delta == Vec2::ZERO {
            return;
        }
        self.yaw -= delta.x * self.sensitivity * 0.001;
        self.pitch = (self.pitch - delta.y * self.sensitivity * 0.001)
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Set orientation from angles (in radians)
    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Get view matrix (world to view space)
    pub fn view_matrix(&self) -> Mat4 {
        let rotation_matrix = Mat4::from_quat(self.rotation().conjugate());
        let translation_matrix = Mat4::from_translation(-self.position);
        rotation_matrix * translation_matrix
    }
}

impl Default for Viewpoint {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_default_looks_down_negative_z() {
        let view = Viewpoint::default();
        assert!((view.forward() - Vec3::NEG_Z).length() < 1e-5);
        assert!((view.ground_left() - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn test_facing_positive_x() {
        let view = Viewpoint::facing(Vec3::ZERO, -FRAC_PI_2);
        assert!((view.ground_forward() - Vec3::X).length() < 1e-5);
        // Left of +X is -Z
        assert!((view.ground_left() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_ground_forward_ignores_pitch() {
        let mut view = Viewpoint::new(Vec3::ZERO);
        view.set_orientation(0.3, 1.2);
        let f = view.ground_forward();
        assert_eq!(f.y, 0.0);
        assert!((f.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut view = Viewpoint::default();
        view.look(Vec2::new(0.0, -1.0e6));
        assert!((view.pitch() - PITCH_LIMIT).abs() < 1e-6);
    }

    #[test]
    fn test_view_matrix_translation() {
        let view = Viewpoint::new(Vec3::new(10.0, 0.0, 0.0));
        let origin_in_view = view.view_matrix().transform_point3(Vec3::ZERO);
        assert!((origin_in_view.x - (-10.0)).abs() < 0.001);
    }
}
