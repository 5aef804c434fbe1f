//! Math utilities and types
//!
//! Provides the fundamental f32 math types used by poses and bounding volumes.

pub use nalgebra::{
    Vector3,
    Quaternion,
    Unit,
    UnitQuaternion,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Pi / 4
    pub const QUARTER_PI: f32 = PI * 0.25;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::*;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Component-wise degrees to radians
    pub fn vec_deg_to_rad(degrees: Vec3) -> Vec3 {
        degrees * constants::DEG_TO_RAD
    }
}

/// Extension trait for Quat with Euler-angle and validity helpers
pub trait QuatExt: Sized {
    /// Build a rotation from XYZ-order Euler angles in radians
    /// (rotation about X, then Y, then Z, composed as `qx * qy * qz`)
    fn from_euler_xyz(angles: Vec3) -> Self;

    /// Decompose into XYZ-order Euler angles in radians
    fn to_euler_xyz(&self) -> Vec3;

    /// Rotation of `angle` radians about `axis`, or `None` for a zero-length axis
    fn try_from_axis_angle(axis: Vec3, angle: f32) -> Option<Self>;

    /// True when the underlying quaternion is zero, non-finite, or otherwise
    /// unusable as a rotation (e.g. default-constructed or deserialized garbage)
    fn is_degenerate(&self) -> bool;
}

impl QuatExt for Quat {
    fn from_euler_xyz(angles: Vec3) -> Self {
        let qx = Quat::from_axis_angle(&Vec3::x_axis(), angles.x);
        let qy = Quat::from_axis_angle(&Vec3::y_axis(), angles.y);
        let qz = Quat::from_axis_angle(&Vec3::z_axis(), angles.z);
        qx * qy * qz
    }

    fn to_euler_xyz(&self) -> Vec3 {
        let rotation = self.to_rotation_matrix();
        let m = rotation.matrix();
        let m13 = m[(0, 2)].clamp(-1.0, 1.0);
        let y = m13.asin();
        if m13.abs() < 0.999_999_9 {
            Vec3::new((-m[(1, 2)]).atan2(m[(2, 2)]), y, (-m[(0, 1)]).atan2(m[(0, 0)]))
        } else {
            // gimbal lock: roll folds into X
            Vec3::new(m[(2, 1)].atan2(m[(1, 1)]), y, 0.0)
        }
    }

    fn try_from_axis_angle(axis: Vec3, angle: f32) -> Option<Self> {
        Unit::try_new(axis, f32::EPSILON).map(|axis| Quat::from_axis_angle(&axis, angle))
    }

    fn is_degenerate(&self) -> bool {
        let norm_squared = self.coords.norm_squared();
        !norm_squared.is_finite() || norm_squared < 1e-12
    }
}
