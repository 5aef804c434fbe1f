//! The world tree
//!
//! A [`World`] owns every node in a slot-map arena and drives the passes a
//! simulation loop calls in order:
//!
//! 1. [`World::init`] seeds relative and absolute poses from the authored
//!    initial ones and builds all bounds.
//! 2. [`World::relative_to_absolute`] for scripted motion (edit `relative`,
//!    then propagate) or [`World::step_phys`] to integrate velocities.
//! 3. [`World::collide`](crate::physics::collision) for broad-phase candidates.
//!
//! Passes 1 and 2 end with a bottom-up aggregation so every group's bounds
//! enclose its children's.

use slotmap::SlotMap;

use crate::foundation::math::Vec3;
use crate::physics::{Body, Pose, Shape};

use super::node::{Node, NodeId, NodeKind};
use super::view::TreeChange;

/// Traversal callback result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Descend into the children
    Continue,
    /// Skip the children (and the post-order callback of this node)
    Prune,
}

/// Errors from structural edits
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// Handle does not resolve to a node of this world
    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),

    /// Only groups may have children
    #[error("Node '{0}' is not a group and cannot have children")]
    NotAGroup(String),

    /// Operation only applies to bodies
    #[error("Node '{0}' is not a body")]
    NotABody(String),

    /// The root group lives as long as the world
    #[error("The root node cannot be removed")]
    RootRemoval,
}

/// Hierarchical rigid-body world
#[derive(Debug, Clone)]
pub struct World {
    pub(super) nodes: SlotMap<NodeId, Node>,
    pub(super) root: NodeId,
    pub(super) changes: Vec<TreeChange>,
    pub(super) track_changes: bool,
}

impl World {
    /// Create a world with an empty root group
    pub fn new(name: impl Into<String>) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(name, NodeKind::Group, None));
        Self {
            nodes,
            root,
            changes: Vec::new(),
            track_changes: false,
        }
    }

    // ---------------------------------------------------------------------
    // Lookup

    /// Root group handle
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Name of the root group
    pub fn name(&self) -> &str {
        self.nodes.get(self.root).map_or("", |root| root.name.as_str())
    }

    /// Node by handle
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Mutable node by handle, for editing poses and body parameters
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Node by handle, or [`WorldError::UnknownNode`]
    pub fn get(&self, id: NodeId) -> Result<&Node, WorldError> {
        self.nodes.get(id).ok_or(WorldError::UnknownNode(id))
    }

    /// Mutable node by handle, or [`WorldError::UnknownNode`]
    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, WorldError> {
        self.nodes.get_mut(id).ok_or(WorldError::UnknownNode(id))
    }

    /// Number of nodes including the root
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Direct child of `parent` with the given name
    pub fn child_by_name(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        let parent = self.nodes.get(parent)?;
        parent
            .children
            .iter()
            .copied()
            .find(|&child| self.nodes.get(child).is_some_and(|node| node.name == name))
    }

    /// First node with the given name in pre-order
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        let mut found = None;
        self.walk(self.root, |id, node| {
            if found.is_some() {
                return Visit::Prune;
            }
            if node.name == name {
                found = Some(id);
                return Visit::Prune;
            }
            Visit::Continue
        });
        found
    }

    /// All bodies in the subtree rooted at `start`, in tree order
    pub fn bodies_under(&self, start: NodeId) -> Vec<NodeId> {
        let mut bodies = Vec::new();
        self.walk(start, |id, node| {
            if node.body().is_some() {
                bodies.push(id);
            }
            Visit::Continue
        });
        bodies
    }

    // ---------------------------------------------------------------------
    // Building

    fn attach(&mut self, parent: NodeId, name: &str, kind: NodeKind) -> Result<NodeId, WorldError> {
        let parent_node = self.get(parent)?;
        if !parent_node.is_group() {
            return Err(WorldError::NotAGroup(parent_node.name.clone()));
        }

        let id = self.nodes.insert(Node::new(name, kind, Some(parent)));
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(id);
        }
        self.record_change(TreeChange::Added {
            id,
            parent,
            name: name.to_string(),
        });
        log::trace!("Added '{}' under {:?}", name, parent);
        Ok(id)
    }

    /// Add an empty group
    pub fn add_group(&mut self, parent: NodeId, name: &str) -> Result<NodeId, WorldError> {
        self.attach(parent, name, NodeKind::Group)
    }

    /// Add a body at an initial position relative to its parent
    pub fn add_body(
        &mut self,
        parent: NodeId,
        name: &str,
        body: impl Into<Body>,
        position: Vec3,
    ) -> Result<NodeId, WorldError> {
        let id = self.attach(parent, name, NodeKind::Body(body.into()))?;
        if let Some(node) = self.nodes.get_mut(id) {
            node.set_initial_position(position);
        }
        Ok(id)
    }

    /// Add a box of the given full size
    pub fn add_box(&mut self, parent: NodeId, name: &str, size: Vec3, position: Vec3) -> Result<NodeId, WorldError> {
        self.add_body(parent, name, Shape::cuboid(size), position)
    }

    /// Add a sphere
    pub fn add_sphere(&mut self, parent: NodeId, name: &str, radius: f32, position: Vec3) -> Result<NodeId, WorldError> {
        self.add_body(parent, name, Shape::sphere(radius), position)
    }

    /// Add a cylinder along Y
    pub fn add_cylinder(
        &mut self,
        parent: NodeId,
        name: &str,
        height: f32,
        radius: f32,
        position: Vec3,
    ) -> Result<NodeId, WorldError> {
        self.add_body(parent, name, Shape::cylinder(height, radius), position)
    }

    /// Add a cone along Y, pointing up
    pub fn add_cone(
        &mut self,
        parent: NodeId,
        name: &str,
        height: f32,
        bottom_radius: f32,
        position: Vec3,
    ) -> Result<NodeId, WorldError> {
        self.add_body(parent, name, Shape::cone(height, bottom_radius), position)
    }

    /// Add a capsule along Y
    pub fn add_capsule(
        &mut self,
        parent: NodeId,
        name: &str,
        height: f32,
        radius: f32,
        position: Vec3,
    ) -> Result<NodeId, WorldError> {
        self.add_body(parent, name, Shape::capsule(height, radius), position)
    }

    /// Add a joint placeholder
    pub fn add_joint(&mut self, parent: NodeId, name: &str) -> Result<NodeId, WorldError> {
        self.attach(parent, name, NodeKind::Joint)
    }

    /// Detach and drop a whole subtree
    pub fn remove(&mut self, id: NodeId) -> Result<(), WorldError> {
        if id == self.root {
            return Err(WorldError::RootRemoval);
        }
        let node = self.get(id)?;
        let name = node.name.clone();
        let parent = node.parent;

        let doomed = self.subtree(id);
        for &doomed_id in &doomed {
            self.nodes.remove(doomed_id);
        }
        if let Some(parent) = parent {
            if let Some(parent_node) = self.nodes.get_mut(parent) {
                parent_node.children.retain(|&child| child != id);
            }
            self.refresh_dynamic_from(parent);
        }

        log::trace!("Removed '{}' ({} nodes)", name, doomed.len());
        self.record_change(TreeChange::Removed { id, name });
        Ok(())
    }

    /// Mark a body as moving (or not); ancestors follow immediately
    pub fn set_dynamic(&mut self, id: NodeId, dynamic: bool) -> Result<(), WorldError> {
        let node = self.get_mut(id)?;
        if node.body().is_none() {
            return Err(WorldError::NotABody(node.name.clone()));
        }
        node.dynamic = dynamic;
        let parent = node.parent;
        if let Some(parent) = parent {
            self.refresh_dynamic_from(parent);
        }
        Ok(())
    }

    /// Re-derive group dynamic flags from `start` up to the root
    fn refresh_dynamic_from(&mut self, start: NodeId) {
        let mut current = Some(start);
        while let Some(id) = current {
            let dynamic = self.group_dynamic(id);
            let Some(node) = self.nodes.get_mut(id) else {
                break;
            };
            if !node.is_group() || node.dynamic == dynamic {
                break;
            }
            node.dynamic = dynamic;
            current = node.parent;
        }
    }

    /// OR of the children's dynamic flags
    fn group_dynamic(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|node| {
            node.children
                .iter()
                .any(|&child| self.nodes.get(child).is_some_and(Node::is_dynamic))
        })
    }

    fn subtree(&self, start: NodeId) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.walk(start, |id, _| {
            ids.push(id);
            Visit::Continue
        });
        ids
    }

    // ---------------------------------------------------------------------
    // Traversal

    /// Depth-first traversal with mutable access
    ///
    /// `pre` runs before a node's children and decides whether to descend;
    /// `post` runs after all of them. Children are read after `pre` returns,
    /// so `pre` may edit structure. A child handle that no longer resolves is
    /// skipped.
    pub fn traverse<Pre, Post>(&mut self, start: NodeId, mut pre: Pre, mut post: Post)
    where
        Pre: FnMut(&mut Self, NodeId) -> Visit,
        Post: FnMut(&mut Self, NodeId),
    {
        self.traverse_node(start, &mut pre, &mut post);
    }

    fn traverse_node<Pre, Post>(&mut self, id: NodeId, pre: &mut Pre, post: &mut Post)
    where
        Pre: FnMut(&mut Self, NodeId) -> Visit,
        Post: FnMut(&mut Self, NodeId),
    {
        if !self.nodes.contains_key(id) {
            log::trace!("Skipping stale node handle {:?}", id);
            return;
        }
        if pre(self, id) == Visit::Prune {
            return;
        }
        let children = match self.nodes.get(id) {
            Some(node) => node.children.clone(),
            None => return,
        };
        for child in children {
            self.traverse_node(child, pre, post);
        }
        if self.nodes.contains_key(id) {
            post(self, id);
        }
    }

    /// Read-only pre-order traversal
    pub fn walk<F>(&self, start: NodeId, mut visit: F)
    where
        F: FnMut(NodeId, &Node) -> Visit,
    {
        self.walk_node(start, &mut visit);
    }

    fn walk_node<F>(&self, id: NodeId, visit: &mut F)
    where
        F: FnMut(NodeId, &Node) -> Visit,
    {
        let Some(node) = self.nodes.get(id) else {
            log::trace!("Skipping stale node handle {:?}", id);
            return;
        };
        if visit(id, node) == Visit::Prune {
            return;
        }
        for &child in &node.children {
            self.walk_node(child, visit);
        }
    }

    // ---------------------------------------------------------------------
    // Passes

    fn parent_absolute(&self, id: NodeId) -> Option<Pose> {
        let parent = self.nodes.get(id)?.parent?;
        self.nodes.get(parent).map(|parent| parent.absolute)
    }

    /// Seed every node from its initial pose and rebuild all bounds
    ///
    /// Call once after building, and again to reset the world.
    pub fn init(&mut self) {
        let root = self.root;
        self.traverse(
            root,
            |world, id| {
                world.init_node(id);
                Visit::Continue
            },
            |world, id| world.aggregate_group(id),
        );
        log::debug!(
            "Initialized world '{}': {} nodes, dynamic: {}",
            self.name(),
            self.nodes.len(),
            self.nodes.get(root).is_some_and(Node::is_dynamic)
        );
    }

    fn init_node(&mut self, id: NodeId) {
        let parent = self.parent_absolute(id);
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.initial.ensure_orientation() {
            log::trace!("'{}': initial orientation was degenerate, using identity", node.name);
        }
        node.relative = node.initial;
        node.absolute = match parent {
            Some(parent) => Pose::from_relative(&node.initial, &parent),
            None => node.initial,
        };
        node.update_body_bounds(None);
    }

    /// Propagate edited relative poses of dynamic nodes to absolute ones
    ///
    /// The absolute linear velocity becomes the displacement since the last
    /// update, and bodies sweep their bounds over one unit step.
    pub fn relative_to_absolute(&mut self) {
        let root = self.root;
        self.traverse(
            root,
            |world, id| {
                if !world.nodes.get(id).is_some_and(Node::is_dynamic) {
                    return Visit::Prune;
                }
                world.relative_to_absolute_node(id);
                Visit::Continue
            },
            |_, _| {},
        );
        self.aggregate_dynamic_bounds();
    }

    fn relative_to_absolute_node(&mut self, id: NodeId) {
        let parent = self.parent_absolute(id);
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.absolute = Pose::from_relative_capturing_velocity(&node.relative, parent.as_ref(), &node.absolute);
        node.update_body_bounds(Some(1.0));
    }

    /// Integrate the absolute pose of every dynamic body over `dt`
    ///
    /// Groups are not integrated.
    pub fn step_phys(&mut self, dt: f32) {
        let root = self.root;
        self.traverse(
            root,
            |world, id| {
                let Some(node) = world.nodes.get_mut(id) else {
                    return Visit::Prune;
                };
                if !node.dynamic {
                    return Visit::Prune;
                }
                if node.body().is_some() {
                    node.absolute.step_by_angular_velocity(dt);
                    node.absolute.step_by_linear_velocity(dt);
                    node.update_body_bounds(Some(dt));
                }
                Visit::Continue
            },
            |_, _| {},
        );
        self.aggregate_dynamic_bounds();
    }

    /// Bottom-up group bounds over the dynamic part of the tree
    pub fn aggregate_dynamic_bounds(&mut self) {
        let root = self.root;
        self.traverse(
            root,
            |world, id| {
                if world.nodes.get(id).is_some_and(Node::is_dynamic) {
                    Visit::Continue
                } else {
                    Visit::Prune
                }
            },
            |world, id| world.aggregate_group(id),
        );
    }

    /// Union the children's boxes into a group and recompute its dynamic flag
    fn aggregate_group(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if !node.is_group() {
            return;
        }

        let mut bounds = node.bounds;
        bounds.clear();
        let mut dynamic = false;
        for &child in &node.children {
            let Some(child) = self.nodes.get(child) else {
                continue;
            };
            bounds.expand_by(&child.bounds);
            dynamic |= child.dynamic;
        }
        bounds.update_from_aabb();

        if let Some(node) = self.nodes.get_mut(id) {
            node.bounds = bounds;
            node.dynamic = dynamic;
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new("world")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_world() -> (World, NodeId, NodeId, NodeId) {
        let mut world = World::new("test");
        let root = world.root();
        let group = world.add_group(root, "group").unwrap();
        let a = world.add_box(group, "a", Vec3::repeat(1.0), Vec3::new(-2.0, 0.0, 0.0)).unwrap();
        let b = world.add_sphere(group, "b", 0.5, Vec3::new(2.0, 0.0, 0.0)).unwrap();
        (world, group, a, b)
    }

    #[test]
    fn test_builders_link_parent_and_children() {
        let (world, group, a, b) = small_world();

        assert_eq!(world.node_count(), 4);
        assert_eq!(world.get(group).unwrap().children(), &[a, b]);
        assert_eq!(world.get(a).unwrap().parent(), Some(group));
        assert_eq!(world.get(world.root()).unwrap().parent(), None);
        assert_eq!(world.child_by_name(group, "b"), Some(b));
        assert_eq!(world.find_by_name("a"), Some(a));
        assert_eq!(world.find_by_name("missing"), None);
        assert_eq!(world.bodies_under(world.root()), vec![a, b]);
    }

    #[test]
    fn test_children_only_under_groups() {
        let (mut world, _, a, _) = small_world();
        let result = world.add_group(a, "nested");
        assert_eq!(result, Err(WorldError::NotAGroup("a".to_string())));
    }

    #[test]
    fn test_set_dynamic_only_on_bodies() {
        let (mut world, group, _, _) = small_world();
        let joint = world.add_joint(group, "hinge").unwrap();

        assert_eq!(world.set_dynamic(group, true), Err(WorldError::NotABody("group".to_string())));
        assert_eq!(world.set_dynamic(joint, true), Err(WorldError::NotABody("hinge".to_string())));
    }

    #[test]
    fn test_remove_subtree() {
        let (mut world, group, a, _) = small_world();

        assert_eq!(world.remove(world.root()), Err(WorldError::RootRemoval));
        world.remove(group).unwrap();

        assert_eq!(world.node_count(), 1);
        assert!(world.node(a).is_none());
        assert!(world.get(world.root()).unwrap().children().is_empty());
        assert_eq!(world.remove(group), Err(WorldError::UnknownNode(group)));
    }

    #[test]
    fn test_traverse_orders_pre_and_post() {
        let (mut world, group, a, b) = small_world();
        let root = world.root();
        let mut pre = Vec::new();
        let mut post = Vec::new();

        world.traverse(
            root,
            |_, id| {
                pre.push(id);
                Visit::Continue
            },
            |_, id| post.push(id),
        );

        assert_eq!(pre, vec![root, group, a, b]);
        assert_eq!(post, vec![a, b, group, root]);
    }

    #[test]
    fn test_prune_skips_children_and_post() {
        let (mut world, group, _, _) = small_world();
        let root = world.root();
        let mut post = Vec::new();

        world.traverse(
            root,
            |_, id| if id == group { Visit::Prune } else { Visit::Continue },
            |_, id| post.push(id),
        );

        assert_eq!(post, vec![root]);
    }

    #[test]
    fn test_stale_child_is_skipped_during_traversal() {
        let (mut world, group, a, b) = small_world();
        let root = world.root();
        let mut visited = Vec::new();

        // the first child removes its sibling before the sibling is reached
        world.traverse(
            root,
            |world, id| {
                visited.push(id);
                if id == a {
                    world.remove(b).unwrap();
                }
                Visit::Continue
            },
            |_, _| {},
        );

        assert_eq!(visited, vec![root, group, a]);
    }
}
