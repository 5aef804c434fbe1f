//! The world tree
//!
//! Nodes live in an arena owned by [`World`] and refer to each other by
//! [`NodeId`]. Groups own children; bodies and joints are leaves.
//!
//! ```text
//! World (root group)
//!  ├── room1 (group, static)
//!  │    ├── left-wall (body)
//!  │    └── right-wall (body)
//!  └── emer (group, dynamic)
//!       ├── body (body, dynamic)
//!       └── head (group)
//! ```

mod description;
mod node;
mod view;
mod world;

#[cfg(test)]
mod tests;

pub use description::{NodeDescription, NodeKindDescription, WorldDescription};
pub use node::{Node, NodeId, NodeKind};
pub use view::{CapturePose, TreeChange};
pub use world::{Visit, World, WorldError};
