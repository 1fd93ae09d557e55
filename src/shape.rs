//! Shapes, bodies, and their opaque stable identifiers.

use glam::DVec3;

use crate::hull::ConvexPolyhedron;
use crate::transform::Transform;

/// Opaque stable identifier for a shape within a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeId(pub u64);

/// Opaque stable identifier for a body in a [`crate::world::World`].
///
/// Totally ordered so that pairs `(a, b)` with `a < b` are canonical — the
/// broad phase is responsible for handing this crate only canonical pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub u64);

/// A collidable shape, tagged by exactly three variants.
#[derive(Debug, Clone)]
pub enum Shape {
    /// An implicit half-space. Its outward normal in local frame is +Z, so
    /// the world normal is `rotate(transform.quaternion, (0, 0, 1))`.
    Plane,
    /// A sphere centered at the shape transform's origin.
    Sphere { radius: f64 },
    /// An arbitrary convex polyhedron.
    Convex(ConvexPolyhedron),
}

impl Shape {
    /// World-space normal of a [`Shape::Plane`] whose local-frame outward
    /// normal is +Z: `rotate(transform.quaternion, (0, 0, 1))`. Takes the
    /// plane's world transform directly rather than `&self`, since the
    /// caller already knows it's dispatching the `Plane` variant by the time
    /// it reaches for the normal.
    #[inline]
    pub fn plane_world_normal(transform: &Transform) -> DVec3 {
        transform.vector_to_world_frame(DVec3::Z)
    }
}

/// A rigid body: a pose plus an ordered collection of shapes, each with its
/// own body-local transform.
///
/// A separate-`shapes`-and-`shapeTransforms` layout keyed by `ShapeId` was
/// considered and rejected: every narrow-phase lookup needs a shape and its
/// transform together, and shape iteration order must be preserved for
/// [`crate::world::World::get_contacts`]'s deterministic output order, so
/// they're combined into one ordered `Vec` instead.
#[derive(Debug, Clone)]
pub struct Body {
    pub position: DVec3,
    pub quaternion: glam::DQuat,
    pub shapes: Vec<(ShapeId, Shape, Transform)>,
}

impl Body {
    pub fn new(position: DVec3, quaternion: glam::DQuat) -> Self {
        Self {
            position,
            quaternion,
            shapes: Vec::new(),
        }
    }

    /// This body's pose as a [`Transform`].
    pub fn transform(&self) -> Transform {
        Transform::new(self.position, self.quaternion)
    }

    /// Attach a shape at the given body-local transform.
    pub fn add_shape(&mut self, id: ShapeId, shape: Shape, local_transform: Transform) -> &mut Self {
        self.shapes.push((id, shape, local_transform));
        self
    }

    /// World transform of a shape: the body's transform composed with the
    /// shape's body-local transform.
    pub fn shape_world_transform(&self, local_transform: &Transform) -> Transform {
        self.transform().compose(local_transform)
    }
}
