//! Pose state: position, orientation and velocities of a node
//!
//! Every node carries three poses (initial, relative, absolute). This module
//! holds the record itself and the operators that compose a relative pose
//! onto its parent, integrate a pose over a timestep, and apply scripted
//! move / rotate commands.

use crate::foundation::math::{constants, utils, Quat, QuatExt, Vec3};

/// Maximum rotation a single integration step may apply (radians)
///
/// Larger per-step rotations alias the orientation, so the angular speed is
/// reduced until `ω·dt` fits.
pub const ANGULAR_MOTION_MAX: f32 = constants::QUARTER_PI;

/// Below this angular speed the Taylor expansion of sinc is used
const SMALL_ANGULAR_SPEED: f32 = 1e-3;

/// Position, orientation, linear velocity and angular velocity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Position of the center of mass
    pub position: Vec3,
    /// Orientation
    pub orientation: Quat,
    /// Linear velocity (units per second)
    pub linear_velocity: Vec3,
    /// Angular velocity (radians per second, axis-scaled)
    pub angular_velocity: Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            orientation: Quat::identity(),
            linear_velocity: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
        }
    }
}

impl Pose {
    /// Create a pose at a position with identity orientation and no motion
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a pose from position and orientation
    pub fn from_position_orientation(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
            ..Default::default()
        }
    }

    /// Replace a degenerate (zero or non-finite) orientation with identity
    ///
    /// Returns true if a substitution happened.
    pub fn ensure_orientation(&mut self) -> bool {
        if self.orientation.is_degenerate() {
            self.orientation = Quat::identity();
            true
        } else {
            false
        }
    }

    /// Compose a relative pose onto its parent's absolute pose
    pub fn from_relative(relative: &Self, parent: &Self) -> Self {
        let mut rel = *relative;
        let mut par = *parent;
        rel.ensure_orientation();
        par.ensure_orientation();

        Self {
            orientation: rel.orientation * par.orientation,
            position: par.orientation * rel.position + par.position,
            linear_velocity: rel.orientation * rel.linear_velocity + par.linear_velocity,
            angular_velocity: rel.orientation * rel.angular_velocity + par.angular_velocity,
        }
    }

    /// Compose like [`Pose::from_relative`], then replace the linear velocity
    /// with the positional displacement from `previous`
    ///
    /// Scripted motion edits relative positions directly, so the velocity it
    /// carries is not trustworthy; the displacement is what the swept bounds
    /// must cover.
    pub fn from_relative_capturing_velocity(
        relative: &Self,
        parent: Option<&Self>,
        previous: &Self,
    ) -> Self {
        let mut abs = match parent {
            Some(parent) => Self::from_relative(relative, parent),
            None => {
                let mut root = *relative;
                root.ensure_orientation();
                root
            }
        };
        abs.linear_velocity = abs.position - previous.position;
        abs
    }

    /// Advance the orientation by the angular velocity over `dt`
    ///
    /// The applied rotation never exceeds [`ANGULAR_MOTION_MAX`] and the
    /// result is renormalized.
    pub fn step_by_angular_velocity(&mut self, dt: f32) {
        self.ensure_orientation();

        let mut speed = self.angular_velocity.norm();
        if speed == 0.0 || dt <= 0.0 {
            return;
        }
        let mut angular_velocity = self.angular_velocity;
        if speed * dt > ANGULAR_MOTION_MAX {
            let clamped = ANGULAR_MOTION_MAX / dt;
            angular_velocity *= clamped / speed;
            speed = clamped;
        }

        let half_angle = 0.5 * speed * dt;
        let axis = if speed < SMALL_ANGULAR_SPEED {
            // third-order Taylor expansion of sin(0.5·ω·dt)/ω
            angular_velocity * (0.5 * dt - (dt * dt * dt) * (speed * speed) / 48.0)
        } else {
            angular_velocity * (half_angle.sin() / speed)
        };

        let delta = nalgebra::Quaternion::new(half_angle.cos(), axis.x, axis.y, axis.z);
        let rotated = delta * self.orientation.into_inner();
        self.orientation = Quat::new_normalize(rotated);
    }

    /// Advance the position by the linear velocity over `dt`
    pub fn step_by_linear_velocity(&mut self, dt: f32) {
        self.position += self.linear_velocity * dt;
    }

    // ---------------------------------------------------------------------
    // Moving

    /// Translate by `delta`, recording it as the linear velocity so scripted
    /// motion is tracked by the swept bounds
    pub fn move_by(&mut self, delta: Vec3) {
        self.linear_velocity = delta;
        self.position += delta;
    }

    /// Move `dist` along a local axis (rotated by the current orientation)
    ///
    /// The axis is normalized first; a zero axis leaves the pose unchanged.
    pub fn move_on_axis(&mut self, axis: Vec3, dist: f32) {
        if let Some(direction) = axis.try_normalize(f32::EPSILON) {
            self.move_by(self.orientation * direction * dist);
        }
    }

    /// Move `dist` along an axis in absolute coordinates (orientation ignored)
    pub fn move_on_axis_abs(&mut self, axis: Vec3, dist: f32) {
        if let Some(direction) = axis.try_normalize(f32::EPSILON) {
            self.move_by(direction * dist);
        }
    }

    // ---------------------------------------------------------------------
    // Rotating

    /// Set the orientation from XYZ Euler angles in degrees
    pub fn set_euler_rotation(&mut self, degrees: Vec3) {
        self.set_euler_rotation_rad(utils::vec_deg_to_rad(degrees));
    }

    /// Set the orientation from XYZ Euler angles in radians
    pub fn set_euler_rotation_rad(&mut self, radians: Vec3) {
        self.orientation = Quat::from_euler_xyz(radians);
    }

    /// Current orientation as XYZ Euler angles in degrees
    pub fn euler_rotation(&self) -> Vec3 {
        self.euler_rotation_rad() * constants::RAD_TO_DEG
    }

    /// Current orientation as XYZ Euler angles in radians
    pub fn euler_rotation_rad(&self) -> Vec3 {
        self.orientation.to_euler_xyz()
    }

    /// Set the orientation from an axis and angle in degrees
    pub fn set_axis_rotation(&mut self, axis: Vec3, degrees: f32) {
        self.set_axis_rotation_rad(axis, utils::deg_to_rad(degrees));
    }

    /// Set the orientation from an axis and angle in radians
    pub fn set_axis_rotation_rad(&mut self, axis: Vec3, radians: f32) {
        if let Some(rotation) = Quat::try_from_axis_angle(axis, radians) {
            self.orientation = rotation;
        }
    }

    /// Rotate about a local axis by an angle in degrees
    pub fn rotate_on_axis(&mut self, axis: Vec3, degrees: f32) {
        self.rotate_on_axis_rad(axis, utils::deg_to_rad(degrees));
    }

    /// Rotate about a local axis by an angle in radians
    pub fn rotate_on_axis_rad(&mut self, axis: Vec3, radians: f32) {
        if let Some(rotation) = Quat::try_from_axis_angle(axis, radians) {
            self.orientation *= rotation;
        }
    }

    /// Rotate by XYZ Euler angles in degrees, relative to the current orientation
    pub fn rotate_euler(&mut self, degrees: Vec3) {
        self.rotate_euler_rad(utils::vec_deg_to_rad(degrees));
    }

    /// Rotate by XYZ Euler angles in radians, relative to the current orientation
    pub fn rotate_euler_rad(&mut self, radians: Vec3) {
        self.orientation *= Quat::from_euler_xyz(radians);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{constants::{HALF_PI, PI, QUARTER_PI}, Quaternion};
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    fn sample_pose() -> Pose {
        Pose {
            position: Vec3::new(1.0, 2.0, 3.0),
            orientation: Quat::from_axis_angle(&Vec3::z_axis(), 0.4),
            linear_velocity: Vec3::new(0.5, 0.0, -1.0),
            angular_velocity: Vec3::new(0.0, 0.3, 0.0),
        }
    }

    #[test]
    fn test_compose_with_identity_parent_is_identity() {
        let rel = sample_pose();
        let abs = Pose::from_relative(&rel, &Pose::default());

        assert_relative_eq!(abs.position, rel.position, epsilon = EPSILON);
        assert_relative_eq!(abs.orientation, rel.orientation, epsilon = EPSILON);
        // velocities are expressed through the relative orientation
        assert_relative_eq!(abs.linear_velocity, rel.orientation * rel.linear_velocity, epsilon = EPSILON);
    }

    #[test]
    fn test_compose_rotates_position_by_parent() {
        let parent = Pose::from_position_orientation(
            Vec3::new(10.0, 0.0, 0.0),
            Quat::from_axis_angle(&Vec3::y_axis(), HALF_PI),
        );
        let rel = Pose::from_position(Vec3::new(1.0, 0.0, 0.0));
        let abs = Pose::from_relative(&rel, &parent);

        // +X rotated 90° about Y is -Z
        assert_relative_eq!(abs.position, Vec3::new(10.0, 0.0, -1.0), epsilon = 1e-5);
        assert_relative_eq!(abs.orientation, parent.orientation, epsilon = EPSILON);
    }

    #[test]
    fn test_compose_adds_parent_velocities() {
        let mut parent = Pose::default();
        parent.linear_velocity = Vec3::new(1.0, 0.0, 0.0);
        parent.angular_velocity = Vec3::new(0.0, 0.0, 2.0);
        let mut rel = Pose::default();
        rel.linear_velocity = Vec3::new(0.0, 1.0, 0.0);

        let abs = Pose::from_relative(&rel, &parent);
        assert_relative_eq!(abs.linear_velocity, Vec3::new(1.0, 1.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(abs.angular_velocity, Vec3::new(0.0, 0.0, 2.0), epsilon = EPSILON);
    }

    #[test]
    fn test_degenerate_orientation_replaced_before_composition() {
        let zero = Quat::new_unchecked(Quaternion::new(0.0, 0.0, 0.0, 0.0));
        let rel = Pose::from_position_orientation(Vec3::new(1.0, 0.0, 0.0), zero);
        let parent = Pose::from_position_orientation(Vec3::new(0.0, 1.0, 0.0), zero);

        let abs = Pose::from_relative(&rel, &parent);
        assert_relative_eq!(abs.orientation, Quat::identity(), epsilon = EPSILON);
        assert_relative_eq!(abs.position, Vec3::new(1.0, 1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_velocity_capture_uses_displacement() {
        let previous = Pose::from_position(Vec3::new(0.0, 0.0, 5.0));
        let mut rel = Pose::from_position(Vec3::new(0.0, 0.0, 4.5));
        rel.linear_velocity = Vec3::new(100.0, 0.0, 0.0);

        let abs = Pose::from_relative_capturing_velocity(&rel, None, &previous);
        assert_relative_eq!(abs.linear_velocity, Vec3::new(0.0, 0.0, -0.5), epsilon = EPSILON);
    }

    #[test]
    fn test_linear_step() {
        let mut pose = Pose::from_position(Vec3::new(0.0, 0.0, 5.0));
        pose.linear_velocity = Vec3::new(0.0, 0.0, -1.0);
        pose.step_by_linear_velocity(1.0);
        assert_relative_eq!(pose.position, Vec3::new(0.0, 0.0, 4.0), epsilon = EPSILON);
    }

    #[test]
    fn test_quarter_turns_about_y() {
        let mut pose = Pose::default();
        pose.angular_velocity = Vec3::new(0.0, HALF_PI, 0.0);

        // each half-second step rotates exactly π/4, inside the clamp
        pose.step_by_angular_velocity(0.5);
        pose.step_by_angular_velocity(0.5);

        let expected = Quat::from_axis_angle(&Vec3::y_axis(), HALF_PI);
        assert_relative_eq!(pose.orientation, expected, epsilon = 1e-4);
        assert_relative_eq!(pose.orientation.coords.norm(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_angular_step_is_clamped() {
        let start = Quat::from_axis_angle(&Vec3::x_axis(), 0.3);
        for speed in [PI, 10.0, 1000.0] {
            let mut pose = Pose::from_position_orientation(Vec3::zeros(), start);
            pose.angular_velocity = Vec3::new(0.0, speed, 0.0);
            pose.step_by_angular_velocity(1.0);

            let applied = pose.orientation * start.inverse();
            assert!(applied.angle() <= QUARTER_PI + 1e-5, "speed {speed}: applied {}", applied.angle());
            assert_relative_eq!(applied.angle(), QUARTER_PI, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_small_angular_velocity_uses_taylor_branch() {
        let mut pose = Pose::default();
        pose.angular_velocity = Vec3::new(0.0, 0.0, 1e-4);
        pose.step_by_angular_velocity(1.0);

        // vector part is sin(ω·dt/2) about Z
        assert_relative_eq!(pose.orientation.coords[2], 5e-5, epsilon = 1e-8);
        assert!(pose.orientation.coords.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn test_zero_angular_velocity_keeps_orientation() {
        let mut pose = sample_pose();
        pose.angular_velocity = Vec3::zeros();
        let before = pose.orientation;
        pose.step_by_angular_velocity(0.1);
        assert_eq!(pose.orientation, before);
    }

    #[test]
    fn test_move_on_axis_follows_orientation() {
        let mut pose = Pose::default();
        pose.set_axis_rotation(Vec3::new(0.0, 1.0, 0.0), 90.0);
        pose.move_on_axis(Vec3::new(2.0, 0.0, 0.0), 3.0);

        assert_relative_eq!(pose.position, Vec3::new(0.0, 0.0, -3.0), epsilon = 1e-5);
        assert_relative_eq!(pose.linear_velocity, pose.position, epsilon = EPSILON);
    }

    #[test]
    fn test_move_on_axis_abs_ignores_orientation() {
        let mut pose = Pose::default();
        pose.set_axis_rotation(Vec3::new(0.0, 1.0, 0.0), 90.0);
        pose.move_on_axis_abs(Vec3::new(1.0, 0.0, 0.0), 2.0);
        assert_relative_eq!(pose.position, Vec3::new(2.0, 0.0, 0.0), epsilon = EPSILON);

        // zero axis is ignored
        pose.move_on_axis_abs(Vec3::zeros(), 2.0);
        assert_relative_eq!(pose.position, Vec3::new(2.0, 0.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_rotate_on_axis_accumulates() {
        let mut pose = Pose::default();
        pose.rotate_on_axis(Vec3::new(0.0, 0.0, 1.0), 30.0);
        pose.rotate_on_axis(Vec3::new(0.0, 0.0, 1.0), 60.0);
        assert_relative_eq!(pose.euler_rotation(), Vec3::new(0.0, 0.0, 90.0), epsilon = 1e-3);
    }

    #[test]
    fn test_euler_rotation_roundtrip_degrees() {
        let mut pose = Pose::default();
        pose.set_euler_rotation(Vec3::new(10.0, 20.0, 30.0));
        assert_relative_eq!(pose.euler_rotation(), Vec3::new(10.0, 20.0, 30.0), epsilon = 1e-3);

        pose.rotate_euler(Vec3::new(0.0, 0.0, 15.0));
        let expected = Quat::from_euler_xyz(Vec3::new(10.0, 20.0, 45.0) * constants::DEG_TO_RAD);
        assert_relative_eq!(pose.orientation, expected, epsilon = 1e-5);
    }
}
