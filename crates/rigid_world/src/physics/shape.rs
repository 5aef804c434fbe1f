//! Body shapes and surface properties
//!
//! Shapes are stored in model space; their local box is recomputed from the
//! shape parameters whenever a body is re-bounded and then transformed with
//! the body's absolute pose.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

/// Collision/visual shape of a body (model space, centered on the origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Box given by half of its size in each dimension
    Box {
        /// Half extents along X, Y, Z
        half_extents: Vec3,
    },
    /// Sphere
    Sphere {
        /// Radius
        radius: f32,
    },
    /// Generalized cylinder along Y with separate top and bottom radii;
    /// a cone has a zero radius at one end
    Cylinder {
        /// Height along Y
        height: f32,
        /// Radius at +Y
        top_radius: f32,
        /// Radius at -Y
        bottom_radius: f32,
    },
    /// Cylinder along Y capped by hemispheres
    Capsule {
        /// Height of the cylindrical part
        height: f32,
        /// Radius of the top hemisphere
        top_radius: f32,
        /// Radius of the bottom hemisphere
        bottom_radius: f32,
    },
}

impl Shape {
    /// Box from its full size
    pub fn cuboid(size: Vec3) -> Self {
        Self::Box { half_extents: size * 0.5 }
    }

    /// Sphere of given radius
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Cylinder with equal end radii
    pub fn cylinder(height: f32, radius: f32) -> Self {
        Self::Cylinder { height, top_radius: radius, bottom_radius: radius }
    }

    /// Cone: zero top radius
    pub fn cone(height: f32, bottom_radius: f32) -> Self {
        Self::Cylinder { height, top_radius: 0.0, bottom_radius }
    }

    /// Capsule with equal hemisphere radii
    pub fn capsule(height: f32, radius: f32) -> Self {
        Self::Capsule { height, top_radius: radius, bottom_radius: radius }
    }

    /// Local-space bounding box corners `(min, max)`
    ///
    /// Round shapes use the larger of their two radii on X and Z so that
    /// cones and tapered capsules stay enclosed.
    pub fn local_bounds(&self) -> (Vec3, Vec3) {
        let half = match *self {
            Self::Box { half_extents } => half_extents.abs(),
            Self::Sphere { radius } => Vec3::repeat(radius.abs()),
            Self::Cylinder { height, top_radius, bottom_radius } => {
                let radius = top_radius.abs().max(bottom_radius.abs());
                Vec3::new(radius, height.abs() * 0.5, radius)
            }
            Self::Capsule { height, top_radius, bottom_radius } => {
                let radius = top_radius.abs().max(bottom_radius.abs());
                let total = height.abs() + top_radius.abs() + bottom_radius.abs();
                Vec3::new(radius, total * 0.5, radius)
            }
        };
        (-half, half)
    }

    /// Full size of the local bounding box
    pub fn size(&self) -> Vec3 {
        let (min, max) = self.local_bounds();
        max - min
    }

    /// Short tag for picking a visual mesh
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Box { .. } => "box",
            Self::Sphere { .. } => "sphere",
            Self::Cylinder { .. } => "cylinder",
            Self::Capsule { .. } => "capsule",
        }
    }
}

/// Physical surface properties
///
/// Informational here; nothing in this crate resolves contacts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Surface {
    /// Coulomb friction coefficient (mu). 0 = frictionless
    pub friction: f32,
    /// How bouncy the surface is, 0 (hard) to 1 (maximum)
    pub bounce: f32,
}

/// A rigid body: shape plus surface and display hints
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Geometry
    pub shape: Shape,
    /// Friction and bounce
    pub surface: Surface,
    /// Visualization library entry for the view layer; empty means "use the node name"
    pub vis: String,
    /// Default display color name
    pub color: String,
}

impl Body {
    /// Body with default surface and no display hints
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            surface: Surface::default(),
            vis: String::new(),
            color: String::new(),
        }
    }

    /// Set the display color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Set the surface properties
    pub fn with_surface(mut self, surface: Surface) -> Self {
        self.surface = surface;
        self
    }
}

impl From<Shape> for Body {
    fn from(shape: Shape) -> Self {
        Self::new(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_box_bounds_from_size() {
        let shape = Shape::cuboid(Vec3::new(2.0, 4.0, 0.2));
        let (min, max) = shape.local_bounds();
        assert_relative_eq!(min, Vec3::new(-1.0, -2.0, -0.1));
        assert_relative_eq!(max, Vec3::new(1.0, 2.0, 0.1));
        assert_relative_eq!(shape.size(), Vec3::new(2.0, 4.0, 0.2));
    }

    #[test]
    fn test_sphere_bounds() {
        let (min, max) = Shape::sphere(1.5).local_bounds();
        assert_relative_eq!(min, Vec3::repeat(-1.5));
        assert_relative_eq!(max, Vec3::repeat(1.5));
    }

    #[test]
    fn test_cone_bounds_cover_wide_end() {
        let (min, max) = Shape::cone(2.0, 0.5).local_bounds();
        assert_relative_eq!(min, Vec3::new(-0.5, -1.0, -0.5));
        assert_relative_eq!(max, Vec3::new(0.5, 1.0, 0.5));
    }

    #[test]
    fn test_capsule_bounds_include_caps() {
        let shape = Shape::Capsule { height: 1.0, top_radius: 0.25, bottom_radius: 0.5 };
        let (min, max) = shape.local_bounds();
        assert_relative_eq!(min, Vec3::new(-0.5, -0.875, -0.5));
        assert_relative_eq!(max, Vec3::new(0.5, 0.875, 0.5));
    }

    #[test]
    fn test_surface_defaults_to_frictionless_and_hard() {
        assert_eq!(Surface::default(), Surface { friction: 0.0, bounce: 0.0 });
        let partial: Surface = ron::from_str("(bounce: 0.3)").unwrap();
        assert_eq!(partial, Surface { friction: 0.0, bounce: 0.3 });
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Shape::cuboid(Vec3::repeat(1.0)).kind_name(), "box");
        assert_eq!(Shape::sphere(1.0).kind_name(), "sphere");
        assert_eq!(Shape::cylinder(1.0, 1.0).kind_name(), "cylinder");
        assert_eq!(Shape::capsule(1.0, 1.0).kind_name(), "capsule");
    }
}
