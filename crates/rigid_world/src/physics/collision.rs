//! Broad-phase collision search over the world tree
//!
//! Candidates are body pairs whose velocity-swept boxes overlap. Group boxes
//! enclose their children's, so a subtree whose group box misses the body
//! being tested is skipped as a whole.

use crate::config::DynamicLayout;
use crate::foundation::math::Vec3;
use crate::physics::BoundingVolume;
use crate::scene::{NodeId, Visit, World};

/// A potential contact between two bodies
///
/// Only `a` and `b` are filled by the broad phase; the geometric fields are
/// left zeroed for a narrow phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Body from the moving object
    pub a: NodeId,
    /// Body it may hit
    pub b: NodeId,
    /// Normal pointing from the center of `b` to the center of `a`
    pub normal_b: Vec3,
    /// Point on the bounding sphere of `b` where `a` touches
    pub point_b: Vec3,
    /// Distance from `point_b` along `normal_b` to the sphere of `a`
    pub distance: f32,
}

impl Contact {
    /// Candidate pair with empty narrow-phase data
    pub fn new(a: NodeId, b: NodeId) -> Self {
        Self {
            a,
            b,
            normal_b: Vec3::zeros(),
            point_b: Vec3::zeros(),
            distance: 0.0,
        }
    }
}

/// Contacts found for one moving object
pub type Contacts = Vec<Contact>;

/// Candidate pairs between the bodies under `a` and the bodies under `b`
///
/// Every body of `a` is tested against `b` top-down: a node whose swept box
/// misses the body's ends that branch, and a body that overlaps is recorded
/// without descending further. `a` and `b` may be the same subtree or
/// different ones.
pub fn candidates_between(world: &World, a: NodeId, b: NodeId) -> Contacts {
    let mut contacts = Contacts::new();
    world.walk(a, |body, node| {
        if node.body().is_some() {
            collect_candidates(world, body, &node.bounds, b, &mut contacts);
        }
        Visit::Continue
    });
    contacts
}

fn collect_candidates(world: &World, body: NodeId, bounds: &BoundingVolume, start: NodeId, contacts: &mut Contacts) {
    world.walk(start, |other, node| {
        if !bounds.intersects_velocity(&node.bounds) {
            return Visit::Prune;
        }
        if node.body().is_some() {
            contacts.push(Contact::new(body, other));
            return Visit::Prune;
        }
        Visit::Continue
    });
}

impl World {
    /// Broad-phase query over the whole world
    ///
    /// Root children are split by their dynamic flag. With
    /// [`DynamicLayout::Nested`] the moving objects are the children of the
    /// dynamic root children instead. Each moving object is tested against
    /// every static object and every moving object before it in tree order.
    /// One list is returned per moving object that has any candidate.
    pub fn collide(&self, layout: DynamicLayout) -> Vec<Contacts> {
        let Some(root) = self.node(self.root()) else {
            return Vec::new();
        };

        let (mut dynamic, fixed): (Vec<NodeId>, Vec<NodeId>) = root
            .children()
            .iter()
            .copied()
            .filter(|&id| self.node(id).is_some())
            .partition(|&id| self.node(id).is_some_and(|node| node.is_dynamic()));

        if layout == DynamicLayout::Nested {
            dynamic = dynamic
                .iter()
                .filter_map(|&id| self.node(id))
                .flat_map(|node| node.children().iter().copied())
                .filter(|&id| self.node(id).is_some())
                .collect();
        }

        let mut result = Vec::new();
        for (i, &object) in dynamic.iter().enumerate() {
            let mut contacts = Contacts::new();
            for &other in &fixed {
                contacts.extend(candidates_between(self, object, other));
            }
            for &other in &dynamic[..i] {
                contacts.extend(candidates_between(self, object, other));
            }
            if !contacts.is_empty() {
                for contact in &contacts {
                    log::trace!(
                        "Contact candidate: '{}' / '{}'",
                        self.node(contact.a).map_or("?", |n| n.name.as_str()),
                        self.node(contact.b).map_or("?", |n| n.name.as_str())
                    );
                }
                result.push(contacts);
            }
        }

        log::debug!(
            "Broad phase: {} moving, {} static, {} with candidates",
            dynamic.len(),
            fixed.len(),
            result.len()
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_boxes(gap: f32) -> (World, NodeId, NodeId) {
        let mut world = World::new("pair");
        let root = world.root();
        let left = world.add_group(root, "left").unwrap();
        let right = world.add_group(root, "right").unwrap();
        let a = world.add_box(left, "a", Vec3::repeat(1.0), Vec3::zeros()).unwrap();
        world
            .add_box(right, "b", Vec3::repeat(1.0), Vec3::new(1.0 + gap, 0.0, 0.0))
            .unwrap();
        world.set_dynamic(a, true).unwrap();
        world.init();
        (world, left, right)
    }

    #[test]
    fn test_candidates_between_overlapping_subtrees() {
        let (world, left, right) = two_boxes(-0.5);
        let contacts = candidates_between(&world, left, right);

        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].a, world.find_by_name("a").unwrap());
        assert_eq!(contacts[0].b, world.find_by_name("b").unwrap());
        assert_eq!(contacts[0].distance, 0.0);
    }

    #[test]
    fn test_candidates_between_disjoint_subtrees() {
        let (world, left, right) = two_boxes(0.5);
        assert!(candidates_between(&world, left, right).is_empty());
    }

    #[test]
    fn test_collide_pairs_dynamic_with_static() {
        let (world, _, _) = two_boxes(0.0);
        let contacts = world.collide(DynamicLayout::TopLevel);

        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].len(), 1);
    }

    #[test]
    fn test_collide_without_dynamic_objects_is_empty() {
        let mut world = World::new("still");
        let root = world.root();
        world.add_box(root, "a", Vec3::repeat(1.0), Vec3::zeros()).unwrap();
        world.add_box(root, "b", Vec3::repeat(1.0), Vec3::zeros()).unwrap();
        world.init();

        assert!(world.collide(DynamicLayout::TopLevel).is_empty());
        assert!(world.collide(DynamicLayout::Nested).is_empty());
    }
}
