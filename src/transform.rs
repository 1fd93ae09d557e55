//! Rigid transforms: position + unit quaternion, local-to-world mapping.

use glam::{DQuat, DVec3};

/// A rigid transform: a rotation followed by a translation.
///
/// `quaternion` is assumed to be unit norm; narrow-phase math never
/// renormalizes it — callers are expected to hand in valid rigid
/// transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: DVec3,
    pub quaternion: DQuat,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: DVec3::ZERO,
        quaternion: DQuat::IDENTITY,
    };

    pub fn new(position: DVec3, quaternion: DQuat) -> Self {
        Self {
            position,
            quaternion,
        }
    }

    pub fn from_position(position: DVec3) -> Self {
        Self {
            position,
            quaternion: DQuat::IDENTITY,
        }
    }

    /// Maps a point from this transform's local frame to world space:
    /// `rotate(quaternion, p) + position`.
    #[inline]
    pub fn point_to_world_frame(&self, p: DVec3) -> DVec3 {
        self.quaternion * p + self.position
    }

    /// Maps a direction (no translation) from local frame to world space.
    #[inline]
    pub fn vector_to_world_frame(&self, v: DVec3) -> DVec3 {
        self.quaternion * v
    }

    /// Composes two transforms: `self` applied within the frame produced by
    /// `outer`, i.e. a shape-local transform expressed in a body's frame.
    ///
    /// `outer.compose(inner)` is the transform that first applies `inner`,
    /// then `outer` — equivalent to `outer * inner` in matrix notation.
    pub fn compose(&self, inner: &Transform) -> Transform {
        Transform {
            position: self.point_to_world_frame(inner.position),
            quaternion: self.quaternion * inner.quaternion,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
