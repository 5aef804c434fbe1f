//! # Rigid World
//!
//! The kinematic core of a virtual-world physics engine: a tree of rigid
//! bodies whose poses are propagated parent to child, whose bounding volumes
//! are swept along their velocity and aggregated per group, and whose
//! broad-phase collision candidates come from box tests that skip whole
//! subtrees.
//!
//! ## Features
//!
//! - **Pose propagation**: initial, relative and absolute poses per node
//! - **Integration**: linear and clamped angular velocity steps
//! - **Swept bounds**: velocity-projected AABBs aggregated bottom-up
//! - **Broad phase**: dynamic-vs-static and dynamic-vs-dynamic candidate lists
//! - **Authoring**: worlds described in RON or TOML
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rigid_world::prelude::*;
//!
//! fn main() -> Result<(), WorldError> {
//!     let mut world = World::new("RoomWorld");
//!     let root = world.root();
//!     let room = world.add_group(root, "room1")?;
//!     world.add_box(room, "back-wall", Vec3::new(10.0, 2.0, 0.2), Vec3::new(0.0, 1.0, -5.0))?;
//!
//!     let emer = world.add_group(root, "emer")?;
//!     let body = world.add_box(emer, "body", Vec3::new(0.4, 1.0, 0.15), Vec3::new(0.0, 0.5, 0.0))?;
//!     world.set_dynamic(body, true)?;
//!     world.init();
//!
//!     for _ in 0..10 {
//!         world.get_mut(emer)?.relative.move_on_axis(Vec3::new(0.0, 0.0, 1.0), -0.2);
//!         world.relative_to_absolute();
//!         for contacts in world.collide(DynamicLayout::TopLevel) {
//!             println!("{} candidates", contacts.len());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod physics;
pub mod scene;

/// Common imports for world users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, DynamicLayout, WorldConfig},
        foundation::math::{Quat, QuatExt, Vec3},
        physics::{Aabb, Body, BoundingVolume, Contact, Contacts, Pose, Shape, Surface},
        scene::{Node, NodeId, NodeKind, TreeChange, Visit, World, WorldDescription, WorldError},
    };
}
