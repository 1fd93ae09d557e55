//! Drops a box onto a ground plane and a sphere onto the box, then prints
//! the contact equations the narrow-phase core produces for one frame.
//!
//! Run with: cargo run -p rein-narrowphase-demo

use glam::{DQuat, DVec3};
use rein_narrowphase::{Body, BodyId, ConvexPolyhedron, NarrowPhaseConfig, Shape, ShapeId, Transform, World};

fn main() {
    let mut world = World::new(NarrowPhaseConfig::default());

    let mut ground = Body::new(DVec3::ZERO, DQuat::IDENTITY);
    ground.add_shape(ShapeId(0), Shape::Plane, Transform::IDENTITY);
    world.insert_body(BodyId(0), ground);

    let mut crate_box = Body::new(DVec3::new(0.0, 0.0, 0.45), DQuat::IDENTITY);
    crate_box.add_shape(
        ShapeId(0),
        Shape::Convex(ConvexPolyhedron::from_box(DVec3::splat(0.5))),
        Transform::IDENTITY,
    );
    world.insert_body(BodyId(1), crate_box);

    let mut ball = Body::new(DVec3::new(0.0, 0.0, 1.95), DQuat::IDENTITY);
    ball.add_shape(ShapeId(0), Shape::Sphere { radius: 1.0 }, Transform::IDENTITY);
    world.insert_body(BodyId(2), ball);

    world.add_pair(BodyId(0), BodyId(1));
    world.add_pair(BodyId(1), BodyId(2));

    for contact in world.get_contacts() {
        println!(
            "{:?} <-> {:?}: ni={:?} ri={:?} rj={:?}",
            contact.body_id1, contact.body_id2, contact.ni, contact.ri, contact.rj
        );
    }
}
