//! The output record produced by this crate: [`ContactEquation`].

use glam::DVec3;

use crate::shape::BodyId;

/// A single contact point between two bodies, ready for a constraint
/// solver to consume.
///
/// Contact equations are created per call to [`crate::world::World`]'s
/// `get_contacts`, owned by the caller, and never mutated afterward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEquation {
    pub body_id1: BodyId,
    pub body_id2: BodyId,
    /// Unit contact normal, pointing from body1 toward body2.
    pub ni: DVec3,
    /// World-space vector from body1's position to the contact point on body1.
    pub ri: DVec3,
    /// World-space vector from body2's position to the contact point on body2.
    pub rj: DVec3,
    /// Fixed at 0 in this core; populated downstream per contacting
    /// materials.
    pub restitution: f64,
}

impl ContactEquation {
    pub fn new(body_id1: BodyId, body_id2: BodyId, ni: DVec3, ri: DVec3, rj: DVec3) -> Self {
        Self {
            body_id1,
            body_id2,
            ni,
            ri,
            rj,
            restitution: 0.0,
        }
    }
}
