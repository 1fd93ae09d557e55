//! Pure vector and quaternion helpers shared by the rest of the crate.
//!
//! Every function here is a deterministic function of its inputs (modulo
//! IEEE-754 rounding of the host) and performs no allocation.

use glam::DVec3;

/// Unit vector pointing from `b` toward `a`.
///
/// Undefined (NaN-producing) when `a == b`; callers must short-circuit via a
/// distance check before calling this, as the spec does not define a
/// fallback direction for coincident points.
#[inline]
pub fn direction(a: DVec3, b: DVec3) -> DVec3 {
    (a - b).normalize()
}

/// Normalizes `v`, falling back to `fallback` when `v` is too close to the
/// zero vector to normalize safely, per `epsilon_sq`
/// (`NarrowPhaseConfig::zero_vector_epsilon_sq`).
///
/// Grounded in the teacher's `narrowphase::sphere_sphere`, which falls back
/// to `Vec3::Y` when two sphere centers nearly coincide rather than letting
/// a zero-length normalize produce NaNs.
#[inline]
pub fn normalize_or(v: DVec3, fallback: DVec3, epsilon_sq: f64) -> DVec3 {
    if is_near_zero(v, epsilon_sq) {
        fallback
    } else {
        v.normalize()
    }
}

/// Returns `true` when `v`'s squared length is below `epsilon_sq`.
///
/// Used in place of a bare `v.length() < eps` comparison so call sites read
/// as "is this effectively the zero vector" rather than repeating the
/// square-root.
#[inline]
pub fn is_near_zero(v: DVec3, epsilon_sq: f64) -> bool {
    v.length_squared() < epsilon_sq
}
