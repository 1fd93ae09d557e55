//! Narrow-phase collision detection core for a 3D rigid-body physics engine.
//!
//! # Architecture
//!
//! Given a world of rigid bodies whose bounding volumes have already been
//! paired by an external broad phase, this crate computes the precise set of
//! contact equations a downstream constraint solver needs to resolve
//! penetration and apply impulses.
//!
//! The pipeline, leaves-first:
//!
//! 1. [`vecmath`] / [`transform`] — vectors, quaternions, rigid transforms.
//! 2. [`hull`] — convex polyhedron queries: face normals, separating-axis
//!    search, face-against-hull clipping.
//! 3. [`dispatch`] — per-shape-pair contact generators.
//! 4. [`world`] — walks the broad-phase pair set and accumulates contacts.
//!
//! Broad-phase pair generation, the iterative constraint solver, time
//! integration, body construction, and force/torque accumulation are all
//! external collaborators; this crate only consumes or produces their data.

pub mod config;
pub mod contact;
pub mod dispatch;
pub mod error;
pub mod hull;
pub mod shape;
pub mod transform;
pub mod vecmath;
pub mod world;

pub use config::NarrowPhaseConfig;
pub use contact::ContactEquation;
pub use error::HullError;
pub use hull::{ConvexPolyhedron, Face};
pub use shape::{Body, BodyId, Shape, ShapeId};
pub use transform::Transform;
pub use world::World;
