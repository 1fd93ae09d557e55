//! Walks a broad-phase pair set and accumulates narrow-phase contacts.

use std::collections::HashMap;

use crate::config::NarrowPhaseConfig;
use crate::contact::ContactEquation;
use crate::dispatch::dispatch_shape_pair;
use crate::shape::{Body, BodyId};

/// A snapshot of rigid bodies plus the broad-phase's candidate pair set.
///
/// `pairs` is a `Vec`, not a set, so that insertion order from the
/// (external) broad phase is preserved into [`World::get_contacts`]'s
/// output — contact order is otherwise unspecified, but must be
/// deterministic given the same bodies and the same pair order.
#[derive(Debug, Clone, Default)]
pub struct World {
    pub bodies: HashMap<BodyId, Body>,
    pub pairs: Vec<(BodyId, BodyId)>,
    pub config: NarrowPhaseConfig,
}

impl World {
    pub fn new(config: NarrowPhaseConfig) -> Self {
        Self {
            bodies: HashMap::new(),
            pairs: Vec::new(),
            config,
        }
    }

    pub fn insert_body(&mut self, id: BodyId, body: Body) {
        self.bodies.insert(id, body);
    }

    /// Marks `(a, b)` as a candidate pair for the next [`World::get_contacts`]
    /// call. Order is preserved verbatim; canonicalizing `a < b` is the
    /// broad phase's responsibility, not this crate's.
    pub fn add_pair(&mut self, a: BodyId, b: BodyId) {
        self.pairs.push((a, b));
    }

    /// Computes every contact equation across all shape pairs of every
    /// candidate body pair, in a fully deterministic order: pair order,
    /// then body1's shape order, then body2's shape order, then the order
    /// each generator appends within itself.
    ///
    /// A pair naming a body id absent from `bodies` is silently skipped —
    /// the broad phase and this crate's body set are allowed to fall
    /// briefly out of sync across a frame boundary.
    pub fn get_contacts(&self) -> Vec<ContactEquation> {
        let mut out = Vec::new();
        for &(body_id1, body_id2) in &self.pairs {
            let (Some(body1), Some(body2)) =
                (self.bodies.get(&body_id1), self.bodies.get(&body_id2))
            else {
                continue;
            };
            let span = tracing::debug_span!(
                "narrowphase_pair",
                body1 = body_id1.0,
                body2 = body_id2.0
            );
            let _enter = span.enter();

            for (_, shape1, local1) in &body1.shapes {
                let transform1 = body1.shape_world_transform(local1);
                for (_, shape2, local2) in &body2.shapes {
                    let transform2 = body2.shape_world_transform(local2);
                    dispatch_shape_pair(
                        body_id1,
                        body1.position,
                        shape1,
                        &transform1,
                        body_id2,
                        body2.position,
                        shape2,
                        &transform2,
                        &self.config,
                        &mut out,
                    );
                }
            }
            tracing::debug!(contacts = out.len(), "pair processed");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{Shape, ShapeId};
    use crate::transform::Transform;
    use glam::{DQuat, DVec3};

    #[test]
    fn missing_body_in_pair_is_silently_skipped() {
        let mut world = World::new(NarrowPhaseConfig::default());
        let mut body = Body::new(DVec3::ZERO, DQuat::IDENTITY);
        body.add_shape(ShapeId(0), Shape::Sphere { radius: 1.0 }, Transform::IDENTITY);
        world.insert_body(BodyId(1), body);
        world.add_pair(BodyId(1), BodyId(2));

        assert!(world.get_contacts().is_empty());
    }

    #[test]
    fn two_touching_spheres_produce_one_contact() {
        let mut world = World::new(NarrowPhaseConfig::default());

        let mut b1 = Body::new(DVec3::ZERO, DQuat::IDENTITY);
        b1.add_shape(ShapeId(0), Shape::Sphere { radius: 1.0 }, Transform::IDENTITY);
        world.insert_body(BodyId(1), b1);

        let mut b2 = Body::new(DVec3::new(1.5, 0.0, 0.0), DQuat::IDENTITY);
        b2.add_shape(ShapeId(0), Shape::Sphere { radius: 1.0 }, Transform::IDENTITY);
        world.insert_body(BodyId(2), b2);

        world.add_pair(BodyId(1), BodyId(2));

        let contacts = world.get_contacts();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].body_id1, BodyId(1));
        assert_eq!(contacts[0].body_id2, BodyId(2));
    }

    #[test]
    fn repeated_calls_produce_the_same_contacts() {
        let mut world = World::new(NarrowPhaseConfig::default());
        let mut b1 = Body::new(DVec3::ZERO, DQuat::IDENTITY);
        b1.add_shape(ShapeId(0), Shape::Plane, Transform::IDENTITY);
        world.insert_body(BodyId(1), b1);

        let mut b2 = Body::new(DVec3::new(0.0, 0.0, 0.8), DQuat::IDENTITY);
        b2.add_shape(ShapeId(0), Shape::Sphere { radius: 1.0 }, Transform::IDENTITY);
        world.insert_body(BodyId(2), b2);

        world.add_pair(BodyId(1), BodyId(2));

        let first = world.get_contacts();
        let second = world.get_contacts();
        assert_eq!(first, second);
    }

    #[test]
    fn multi_shape_bodies_produce_contacts_per_shape_pair() {
        let mut world = World::new(NarrowPhaseConfig::default());

        let mut ground = Body::new(DVec3::ZERO, DQuat::IDENTITY);
        ground.add_shape(ShapeId(0), Shape::Plane, Transform::IDENTITY);
        world.insert_body(BodyId(1), ground);

        let mut compound = Body::new(DVec3::new(0.0, 0.0, 0.8), DQuat::IDENTITY);
        compound.add_shape(ShapeId(0), Shape::Sphere { radius: 1.0 }, Transform::IDENTITY);
        compound.add_shape(
            ShapeId(1),
            Shape::Sphere { radius: 1.0 },
            Transform::from_position(DVec3::new(5.0, 0.0, 0.0)),
        );
        world.insert_body(BodyId(2), compound);

        world.add_pair(BodyId(1), BodyId(2));

        // Only the first (un-offset) sphere touches the plane.
        let contacts = world.get_contacts();
        assert_eq!(contacts.len(), 1);
    }
}
