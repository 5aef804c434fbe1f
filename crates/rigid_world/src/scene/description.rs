//! Data-driven world authoring
//!
//! A [`WorldDescription`] is the serializable form of a world's authored
//! state: tree structure, initial poses, shapes and display hints. It loads
//! from `.ron` or `.toml` through [`Config`](crate::config::Config).
//!
//! ```ron
//! (
//!     name: "RoomWorld",
//!     children: [
//!         (
//!             name: "room1",
//!             kind: Group(children: [
//!                 (name: "left-wall", position: (-5.0, 1.0, 0.0), kind: Box(size: (0.2, 2.0, 15.0))),
//!             ]),
//!         ),
//!     ],
//! )
//! ```

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::foundation::math::{utils, Quat, QuatExt, Vec3};
use crate::physics::{Body, Shape, Surface};

use super::node::{NodeId, NodeKind};
use super::world::{World, WorldError};

fn zero() -> Vec3 {
    Vec3::zeros()
}

/// Authored world: a named root group and its children
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldDescription {
    /// Root group name
    pub name: String,
    /// Top-level nodes
    pub children: Vec<NodeDescription>,
}

impl Config for WorldDescription {}

/// One authored node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescription {
    /// Node name
    pub name: String,
    /// Initial position relative to the parent
    #[serde(default = "zero")]
    pub position: Vec3,
    /// Initial orientation as XYZ Euler angles in degrees
    #[serde(default = "zero")]
    pub rotation: Vec3,
    /// Initial linear velocity
    #[serde(default = "zero")]
    pub linear_velocity: Vec3,
    /// Initial angular velocity (radians per second)
    #[serde(default = "zero")]
    pub angular_velocity: Vec3,
    /// Whether the body moves; groups derive this from their children
    #[serde(default)]
    pub dynamic: bool,
    /// Surface properties for bodies
    #[serde(default)]
    pub surface: Option<Surface>,
    /// Visualization library entry for bodies
    #[serde(default)]
    pub vis: String,
    /// Display color for bodies
    #[serde(default)]
    pub color: String,
    /// What the node is
    pub kind: NodeKindDescription,
}

/// Authored node variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKindDescription {
    /// Group with nested nodes
    Group {
        /// Child nodes
        #[serde(default)]
        children: Vec<NodeDescription>,
    },
    /// Box of the given full size
    Box {
        /// Edge lengths
        size: Vec3,
    },
    /// Sphere
    Sphere {
        /// Radius
        radius: f32,
    },
    /// Cylinder or cone
    Cylinder {
        /// Height along Y
        height: f32,
        /// Radius at +Y
        top_radius: f32,
        /// Radius at -Y
        bottom_radius: f32,
    },
    /// Capsule
    Capsule {
        /// Height of the cylindrical part
        height: f32,
        /// Top cap radius
        top_radius: f32,
        /// Bottom cap radius
        bottom_radius: f32,
    },
    /// Joint placeholder
    Joint,
}

impl NodeKindDescription {
    fn shape(&self) -> Option<Shape> {
        match *self {
            Self::Box { size } => Some(Shape::cuboid(size)),
            Self::Sphere { radius } => Some(Shape::Sphere { radius }),
            Self::Cylinder { height, top_radius, bottom_radius } => {
                Some(Shape::Cylinder { height, top_radius, bottom_radius })
            }
            Self::Capsule { height, top_radius, bottom_radius } => {
                Some(Shape::Capsule { height, top_radius, bottom_radius })
            }
            Self::Group { .. } | Self::Joint => None,
        }
    }

    fn from_shape(shape: &Shape) -> Self {
        match *shape {
            Shape::Box { half_extents } => Self::Box { size: half_extents * 2.0 },
            Shape::Sphere { radius } => Self::Sphere { radius },
            Shape::Cylinder { height, top_radius, bottom_radius } => {
                Self::Cylinder { height, top_radius, bottom_radius }
            }
            Shape::Capsule { height, top_radius, bottom_radius } => {
                Self::Capsule { height, top_radius, bottom_radius }
            }
        }
    }
}

impl World {
    /// Build a world from its description
    ///
    /// The world is not initialized; call [`World::init`] afterwards.
    pub fn from_description(description: &WorldDescription) -> Result<Self, WorldError> {
        let mut world = World::new(description.name.clone());
        let root = world.root();
        for child in &description.children {
            world.add_described(root, child)?;
        }
        log::debug!(
            "Built world '{}' from description: {} nodes",
            world.name(),
            world.node_count()
        );
        Ok(world)
    }

    /// Add a described node (and its subtree) under `parent`
    pub fn add_described(&mut self, parent: NodeId, description: &NodeDescription) -> Result<NodeId, WorldError> {
        let id = match description.kind.shape() {
            Some(shape) => {
                let mut body = Body::new(shape);
                body.surface = description.surface.unwrap_or_default();
                body.vis = description.vis.clone();
                body.color = description.color.clone();
                self.add_body(parent, &description.name, body, description.position)?
            }
            None if description.kind == NodeKindDescription::Joint => self.add_joint(parent, &description.name)?,
            None => self.add_group(parent, &description.name)?,
        };

        let node = self.get_mut(id)?;
        node.set_initial_position(description.position)
            .set_initial_orientation(Quat::from_euler_xyz(utils::vec_deg_to_rad(description.rotation)))
            .set_initial_linear_velocity(description.linear_velocity)
            .set_initial_angular_velocity(description.angular_velocity);

        if description.dynamic {
            self.set_dynamic(id, true)?;
        }
        if let NodeKindDescription::Group { children } = &description.kind {
            for child in children {
                self.add_described(id, child)?;
            }
        }
        Ok(id)
    }

    /// Describe the authored state of the world
    pub fn to_description(&self) -> WorldDescription {
        let children = self
            .node(self.root())
            .map(|root| root.children().iter().filter_map(|&id| self.describe_node(id)).collect())
            .unwrap_or_default();
        WorldDescription {
            name: self.name().to_string(),
            children,
        }
    }

    fn describe_node(&self, id: NodeId) -> Option<NodeDescription> {
        let node = self.node(id)?;
        let (kind, dynamic, surface, vis, color) = match &node.kind {
            NodeKind::Group => {
                let children = node.children().iter().filter_map(|&child| self.describe_node(child)).collect();
                (NodeKindDescription::Group { children }, false, None, String::new(), String::new())
            }
            NodeKind::Body(body) => (
                NodeKindDescription::from_shape(&body.shape),
                node.is_dynamic(),
                Some(body.surface),
                body.vis.clone(),
                body.color.clone(),
            ),
            NodeKind::Joint => (NodeKindDescription::Joint, false, None, String::new(), String::new()),
        };
        Some(NodeDescription {
            name: node.name.clone(),
            position: node.initial.position,
            rotation: node.initial.euler_rotation(),
            linear_velocity: node.initial.linear_velocity,
            angular_velocity: node.initial.angular_velocity,
            dynamic,
            surface,
            vis,
            color,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ROOM: &str = r#"(
        name: "RoomWorld",
        children: [
            (
                name: "room1",
                kind: Group(children: [
                    (name: "left-wall", position: (-5.0, 1.0, 0.0), color: "red", kind: Box(size: (0.2, 2.0, 15.0))),
                    (name: "right-wall", position: (5.0, 1.0, 0.0), color: "green", kind: Box(size: (0.2, 2.0, 15.0))),
                ]),
            ),
            (
                name: "emer",
                rotation: (0.0, 30.0, 0.0),
                kind: Group(children: [
                    (
                        name: "body",
                        position: (0.0, 0.5, 0.0),
                        dynamic: true,
                        surface: Some((friction: 0.5, bounce: 0.1)),
                        kind: Box(size: (0.4, 1.0, 0.15)),
                    ),
                    (name: "hinge", kind: Joint),
                ]),
            ),
        ],
    )"#;

    #[test]
    fn test_build_world_from_ron() {
        let description: WorldDescription = ron::from_str(ROOM).unwrap();
        let world = World::from_description(&description).unwrap();

        assert_eq!(world.name(), "RoomWorld");
        assert_eq!(world.node_count(), 7);

        let room = world.find_by_name("room1").unwrap();
        let emer = world.find_by_name("emer").unwrap();
        assert!(!world.get(room).unwrap().is_dynamic());
        assert!(world.get(emer).unwrap().is_dynamic());

        let wall = world.child_by_name(room, "left-wall").unwrap();
        let wall = world.get(wall).unwrap();
        assert_eq!(wall.body().unwrap().color, "red");
        assert_relative_eq!(wall.shape().unwrap().size(), Vec3::new(0.2, 2.0, 15.0), epsilon = 1e-6);

        let body = world.get(world.child_by_name(emer, "body").unwrap()).unwrap();
        assert_relative_eq!(body.body().unwrap().surface.friction, 0.5);
        assert_relative_eq!(world.get(emer).unwrap().initial.euler_rotation(), Vec3::new(0.0, 30.0, 0.0), epsilon = 1e-3);
    }

    #[test]
    fn test_dynamic_group_is_rejected() {
        let description = WorldDescription {
            name: "bad".to_string(),
            children: vec![NodeDescription {
                name: "mover".to_string(),
                position: Vec3::zeros(),
                rotation: Vec3::zeros(),
                linear_velocity: Vec3::zeros(),
                angular_velocity: Vec3::zeros(),
                dynamic: true,
                surface: None,
                vis: String::new(),
                color: String::new(),
                kind: NodeKindDescription::Group { children: Vec::new() },
            }],
        };

        let result = World::from_description(&description);
        assert_eq!(result.err(), Some(WorldError::NotABody("mover".to_string())));
    }

    #[test]
    fn test_description_reflects_authored_state() {
        let description: WorldDescription = ron::from_str(ROOM).unwrap();
        let mut world = World::from_description(&description).unwrap();
        // passes must not leak into the authored state
        world.init();
        world.step_phys(1.0);

        let described = world.to_description();
        let rebuilt = World::from_description(&described).unwrap();
        assert_eq!(rebuilt.node_count(), world.node_count());
        assert_eq!(described.children[0].name, "room1");
        assert!(matches!(described.children[1].kind, NodeKindDescription::Group { .. }));
        let body = rebuilt.get(rebuilt.find_by_name("body").unwrap()).unwrap();
        assert!(body.is_dynamic());
        assert_relative_eq!(body.initial.position, Vec3::new(0.0, 0.5, 0.0));
    }
}
