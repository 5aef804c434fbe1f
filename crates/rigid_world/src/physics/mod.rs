//! Rigid-body physics: poses, bounds, shapes and the broad phase
//!
//! Nothing here resolves contacts; the broad phase only reports which body
//! pairs may touch during the next step.

pub mod bounds;
pub mod collision;
pub mod pose;
pub mod shape;

pub use bounds::{Aabb, BoundingSphere, BoundingVolume};
pub use collision::{candidates_between, Contact, Contacts};
pub use pose::{Pose, ANGULAR_MOTION_MAX};
pub use shape::{Body, Shape, Surface};
