//! Tree nodes: groups, bodies and joints
//!
//! A node owns its three poses and its bounding volume. Structure (parent,
//! children) and the dynamic flag are maintained by [`World`](super::World)
//! so the group invariants cannot be broken from outside.

use crate::foundation::math::{Quat, Vec3};
use crate::physics::{Body, BoundingVolume, Pose, Shape};

slotmap::new_key_type! {
    /// Stable handle of a node inside a [`World`](super::World)
    pub struct NodeId;
}

/// What a node is
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Container whose bounds and dynamic flag aggregate its children
    Group,
    /// Rigid body with a shape
    Body(Body),
    /// Connection between bodies; declared only, it has no behaviour yet
    Joint,
}

impl NodeKind {
    /// Tag for logging and view dispatch
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Body(body) => body.shape.kind_name(),
            Self::Joint => "joint",
        }
    }
}

/// A node of the world tree
#[derive(Debug, Clone)]
pub struct Node {
    /// Name, unique among siblings by convention; the view layer syncs on it
    pub name: String,
    /// Variant-specific data
    pub kind: NodeKind,
    /// Authored pose relative to the parent. Only read by [`World::init`](super::World::init)
    pub initial: Pose,
    /// Current pose relative to the parent; the one to edit for scripted motion
    pub relative: Pose,
    /// World-space pose, recomputed by the world passes
    pub absolute: Pose,
    /// World-space bounds, recomputed by the world passes
    pub bounds: BoundingVolume,
    pub(crate) dynamic: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(name: impl Into<String>, kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            name: name.into(),
            kind,
            initial: Pose::default(),
            relative: Pose::default(),
            absolute: Pose::default(),
            bounds: BoundingVolume::default(),
            dynamic: false,
            parent,
            children: Vec::new(),
        }
    }

    /// Parent handle; `None` for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child handles in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether the node moves. For groups this is the OR over their children
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// True for [`NodeKind::Group`]
    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group)
    }

    /// The body data, if this node is a body
    pub fn body(&self) -> Option<&Body> {
        match &self.kind {
            NodeKind::Body(body) => Some(body),
            _ => None,
        }
    }

    /// Mutable body data, if this node is a body
    pub fn body_mut(&mut self) -> Option<&mut Body> {
        match &mut self.kind {
            NodeKind::Body(body) => Some(body),
            _ => None,
        }
    }

    /// Shape, if this node is a body
    pub fn shape(&self) -> Option<&Shape> {
        self.body().map(|body| &body.shape)
    }

    /// Set the authored position
    pub fn set_initial_position(&mut self, position: Vec3) -> &mut Self {
        self.initial.position = position;
        self
    }

    /// Set the authored orientation
    pub fn set_initial_orientation(&mut self, orientation: Quat) -> &mut Self {
        self.initial.orientation = orientation;
        self
    }

    /// Set the authored linear velocity
    pub fn set_initial_linear_velocity(&mut self, velocity: Vec3) -> &mut Self {
        self.initial.linear_velocity = velocity;
        self
    }

    /// Set the authored angular velocity
    pub fn set_initial_angular_velocity(&mut self, velocity: Vec3) -> &mut Self {
        self.initial.angular_velocity = velocity;
        self
    }

    /// Recompute a body's bounds from its shape and absolute pose
    ///
    /// `step` is the velocity projection: `None` leaves the swept box equal
    /// to the static one. Non-body nodes are left untouched.
    pub(crate) fn update_body_bounds(&mut self, step: Option<f32>) {
        let NodeKind::Body(body) = &self.kind else {
            return;
        };
        let (min, max) = body.shape.local_bounds();
        self.bounds.set_bounds(min, max);
        self.bounds
            .transform_to_world(&self.absolute.orientation, self.absolute.position);
        match step {
            Some(dt) => self.bounds.project_by_velocity(self.absolute.linear_velocity, dt),
            None => self.bounds.project_static(),
        }
    }
}
