//! Bounding volumes used for broad-phase pruning
//!
//! Bodies compute a box in local space from their shape, move it into world
//! space with their absolute pose, then sweep it along their velocity. Groups
//! aggregate their children's boxes so whole subtrees can be skipped.

use crate::foundation::math::{Quat, Vec3};

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// The empty box: contains nothing, intersects nothing, and is the
    /// identity for [`Aabb::expand_by_box`]
    pub fn empty() -> Self {
        Self {
            min: Vec3::repeat(f32::INFINITY),
            max: Vec3::repeat(f32::NEG_INFINITY),
        }
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// True if min exceeds max on any axis
    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Full edge lengths; zero for an empty box
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::zeros()
        } else {
            self.max - self.min
        }
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if this AABB fully contains another (an empty box is contained by anything)
    pub fn contains_box(&self, other: &Aabb) -> bool {
        other.is_empty() || (self.contains_point(other.min) && self.contains_point(other.max))
    }

    /// Check if this AABB intersects another AABB (touching counts)
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Grow this box to enclose another
    pub fn expand_by_box(&mut self, other: &Aabb) {
        self.min = self.min.inf(&other.min);
        self.max = self.max.sup(&other.max);
    }

    /// Smallest box enclosing both
    pub fn union(&self, other: &Aabb) -> Aabb {
        let mut result = *self;
        result.expand_by_box(other);
        result
    }

    /// Box shifted by an offset
    pub fn translate(&self, offset: Vec3) -> Aabb {
        if self.is_empty() {
            return *self;
        }
        Aabb::new(self.min + offset, self.max + offset)
    }

    /// Conservative axis-aligned box around this box rotated about the origin
    pub fn rotate(&self, rotation: &Quat) -> Aabb {
        if self.is_empty() {
            return *self;
        }
        let mut result = Aabb::empty();
        for corner in 0..8 {
            let point = Vec3::new(
                if corner & 1 != 0 { self.max.x } else { self.min.x },
                if corner & 2 != 0 { self.max.y } else { self.min.y },
                if corner & 4 != 0 { self.max.z } else { self.min.z },
            );
            let rotated = rotation * point;
            result.min = result.min.inf(&rotated);
            result.max = result.max.sup(&rotated);
        }
        result
    }
}

/// A bounding sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// The center position of the sphere
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl Default for BoundingSphere {
    fn default() -> Self {
        Self::new(Vec3::zeros(), 0.0)
    }
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Sphere through the corners of a box
    pub fn from_box(aabb: &Aabb) -> Self {
        if aabb.is_empty() {
            return Self::default();
        }
        Self::new(aabb.center(), aabb.size().norm() * 0.5)
    }

    /// Move the center by an offset
    pub fn translate(&mut self, offset: Vec3) {
        self.center += offset;
    }

    /// Check if this sphere intersects with another
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared <= radius_sum * radius_sum
    }
}

/// Bounding box, velocity-swept box, sphere and gross size statistics
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingVolume {
    /// Box in world coordinates (aggregated for groups)
    pub aabb: Aabb,
    /// Box extended to cover the motion over the next step; collision
    /// candidates are decided on this one
    pub velocity_aabb: Aabb,
    /// Sphere around the box
    pub sphere: BoundingSphere,
    /// Sum of edge lengths times two, `2·(sx+sy+sz)`
    ///
    /// Not the surface area. Kept as-is since nothing here relies on it
    /// being physical.
    pub area: f32,
    /// `sx·sy·sz`
    pub volume: f32,
}

impl BoundingVolume {
    /// Store the box and derive the sphere, area and volume from it
    pub fn set_bounds(&mut self, min: Vec3, max: Vec3) {
        self.aabb = Aabb::new(min, max);
        self.update_from_aabb();
    }

    /// Re-derive sphere, area and volume from the current box
    pub fn update_from_aabb(&mut self) {
        self.sphere = BoundingSphere::from_box(&self.aabb);
        let size = self.aabb.size();
        self.area = 2.0 * size.x + 2.0 * size.y + 2.0 * size.z;
        self.volume = size.x * size.y * size.z;
    }

    /// Move a local-space box into world space: rotate, then translate
    pub fn transform_to_world(&mut self, orientation: &Quat, position: Vec3) {
        self.aabb = self.aabb.rotate(orientation).translate(position);
        self.sphere.translate(position);
    }

    /// Sweep the box along `velocity · dt`
    pub fn project_by_velocity(&mut self, velocity: Vec3, dt: f32) {
        let swept = self.aabb.translate(velocity * dt);
        self.velocity_aabb = self.aabb.union(&swept);
    }

    /// Non-moving bodies sweep nothing
    pub fn project_static(&mut self) {
        self.velocity_aabb = self.aabb;
    }

    /// Reset both boxes to empty before aggregation
    pub fn clear(&mut self) {
        self.aabb = Aabb::empty();
        self.velocity_aabb = Aabb::empty();
    }

    /// Union another volume's boxes into this one
    pub fn expand_by(&mut self, other: &BoundingVolume) {
        self.aabb.expand_by_box(&other.aabb);
        self.velocity_aabb.expand_by_box(&other.velocity_aabb);
    }

    /// Whether the velocity-swept boxes overlap
    pub fn intersects_velocity(&self, other: &BoundingVolume) -> bool {
        self.velocity_aabb.intersects(&other.velocity_aabb)
    }
}
