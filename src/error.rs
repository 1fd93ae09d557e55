//! Typed errors for the one fallible construction path in this crate.
//!
//! Per-tick queries (separating-axis search, clipping, shape dispatch) never
//! fail — they fold invariant violations into "no contact" instead. Only
//! building a [`crate::hull::ConvexPolyhedron`] from raw vertex/face data can
//! discover that the caller's invariants don't hold.

use thiserror::Error;

/// Reasons a [`crate::hull::ConvexPolyhedron`] failed to validate.
#[derive(Debug, Error, PartialEq)]
pub enum HullError {
    #[error("hull has no vertices")]
    NoVertices,

    #[error("hull has no faces")]
    NoFaces,

    #[error("face {face_index} has {count} vertices, a face needs at least 3")]
    DegenerateFace { face_index: usize, count: usize },

    #[error("face {face_index} references vertex index {index}, out of bounds for {vertex_count} vertices")]
    VertexIndexOutOfRange {
        face_index: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("face {face_index} has a near-zero normal")]
    DegenerateNormal { face_index: usize },
}
