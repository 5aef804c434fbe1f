//! What a view layer needs from the world
//!
//! A renderer mirrors the tree into its own scene graph. It reads poses,
//! shapes and display hints through [`World::node`], re-syncs structure from
//! [`World::drain_changes`], and positions offscreen cameras with
//! [`World::capture_pose`].
//!
//! Change tracking is off by default. A view turns it on with
//! [`World::track_changes`] and must drain the log regularly; the world never
//! discards pending changes on its own.

use crate::foundation::math::{Quat, Vec3};

use super::node::NodeId;
use super::world::World;

/// Structural edit since the last drain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeChange {
    /// A node was attached
    Added {
        /// New node
        id: NodeId,
        /// Group it was attached to
        parent: NodeId,
        /// Its name, which views match on
        name: String,
    },
    /// A subtree was detached and dropped
    Removed {
        /// Former subtree root
        id: NodeId,
        /// Its name
        name: String,
    },
}

/// Camera placement taken from a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapturePose {
    /// World-space eye position
    pub position: Vec3,
    /// World-space orientation
    pub orientation: Quat,
}

impl World {
    /// Start or stop recording structural changes
    ///
    /// Stopping drops anything not yet drained.
    pub fn track_changes(&mut self, enabled: bool) {
        self.track_changes = enabled;
        if !enabled {
            self.changes.clear();
        }
    }

    /// Whether structural changes are being recorded
    pub fn is_tracking_changes(&self) -> bool {
        self.track_changes
    }

    /// Take the structural changes recorded since the last call
    pub fn drain_changes(&mut self) -> Vec<TreeChange> {
        std::mem::take(&mut self.changes)
    }

    pub(super) fn record_change(&mut self, change: TreeChange) {
        if self.track_changes {
            self.changes.push(change);
        }
    }

    /// Absolute pose of a body, for a camera attached to it
    ///
    /// `None` for unknown handles and for non-body nodes.
    pub fn capture_pose(&self, id: NodeId) -> Option<CapturePose> {
        let node = self.node(id)?;
        node.body()?;
        Some(CapturePose {
            position: node.absolute.position,
            orientation: node.absolute.orientation,
        })
    }
}
