//! Per-shape-pair contact generators.
//!
//! Dispatch is a nine-way match on the tagged shape-pair. Non-symmetric
//! pairs (anything involving `Plane` or `Sphere` paired with a different
//! variant) are handled by a single canonical generator that always takes
//! its arguments in a fixed role order; the swapped call site negates the
//! normal and exchanges `ri`/`rj` so the emitted contact always has `ni`
//! pointing from `body1` toward `body2`, matching how the caller passed the
//! pair in. `(Plane, Plane)` is an explicit no-op.

use glam::DVec3;
use smallvec::SmallVec;

use crate::config::NarrowPhaseConfig;
use crate::contact::ContactEquation;
use crate::hull::{self, ConvexPolyhedron};
use crate::shape::{BodyId, Shape};
use crate::transform::Transform;
use crate::vecmath::{is_near_zero, normalize_or};

/// Computes and appends all contacts between two shapes to `out`.
///
/// `body1_position`/`body2_position` are the owning bodies' world positions
/// (used as the origin `ri`/`rj` are measured from); `transform1`/
/// `transform2` are each shape's full world transform (body transform
/// composed with the shape's body-local transform).
#[allow(clippy::too_many_arguments)]
pub fn dispatch_shape_pair(
    body_id1: BodyId,
    body1_position: DVec3,
    shape1: &Shape,
    transform1: &Transform,
    body_id2: BodyId,
    body2_position: DVec3,
    shape2: &Shape,
    transform2: &Transform,
    config: &NarrowPhaseConfig,
    out: &mut Vec<ContactEquation>,
) {
    match (shape1, shape2) {
        (Shape::Plane, Shape::Plane) => {}

        (Shape::Plane, Shape::Sphere { radius }) => {
            let sphere_center = transform2.point_to_world_frame(DVec3::ZERO);
            if let Some((ni, ri, rj)) =
                plane_sphere(transform1, body1_position, sphere_center, body2_position, *radius)
            {
                out.push(ContactEquation::new(body_id1, body_id2, ni, ri, rj));
            }
        }
        (Shape::Sphere { radius }, Shape::Plane) => {
            let sphere_center = transform1.point_to_world_frame(DVec3::ZERO);
            if let Some((ni, ri, rj)) =
                plane_sphere(transform2, body2_position, sphere_center, body1_position, *radius)
            {
                out.push(ContactEquation::new(body_id1, body_id2, -ni, rj, ri));
            }
        }

        (Shape::Plane, Shape::Convex(hull)) => {
            for (ni, ri, rj) in
                plane_convex(transform1, body1_position, hull, transform2, body2_position)
            {
                out.push(ContactEquation::new(body_id1, body_id2, ni, ri, rj));
            }
        }
        (Shape::Convex(hull), Shape::Plane) => {
            for (ni, ri, rj) in
                plane_convex(transform2, body2_position, hull, transform1, body1_position)
            {
                out.push(ContactEquation::new(body_id1, body_id2, -ni, rj, ri));
            }
        }

        (Shape::Sphere { radius: r1 }, Shape::Sphere { radius: r2 }) => {
            let c1 = transform1.point_to_world_frame(DVec3::ZERO);
            let c2 = transform2.point_to_world_frame(DVec3::ZERO);
            if let Some((ni, ri, rj)) = sphere_sphere(c1, *r1, c2, *r2, config) {
                out.push(ContactEquation::new(body_id1, body_id2, ni, ri, rj));
            }
        }

        (Shape::Sphere { radius }, Shape::Convex(hull)) => {
            let c = transform1.point_to_world_frame(DVec3::ZERO);
            if let Some((ni, ri, rj)) =
                sphere_convex(c, *radius, hull, transform2, body2_position, config)
            {
                out.push(ContactEquation::new(body_id1, body_id2, ni, ri, rj));
            }
        }
        (Shape::Convex(hull), Shape::Sphere { radius }) => {
            let c = transform2.point_to_world_frame(DVec3::ZERO);
            if let Some((ni, ri, rj)) =
                sphere_convex(c, *radius, hull, transform1, body1_position, config)
            {
                out.push(ContactEquation::new(body_id1, body_id2, -ni, rj, ri));
            }
        }

        (Shape::Convex(hull_a), Shape::Convex(hull_b)) => {
            for (ni, ri, rj) in convex_convex(
                body1_position,
                transform1,
                hull_a,
                body2_position,
                transform2,
                hull_b,
                config,
            ) {
                out.push(ContactEquation::new(body_id1, body_id2, ni, ri, rj));
            }
        }
    }
}

/// Canonical plane-vs-convex generator; emits one contact per penetrating
/// hull vertex, oriented with the plane in the body1 role.
fn plane_convex(
    plane_transform: &Transform,
    plane_body_position: DVec3,
    hull: &ConvexPolyhedron,
    convex_transform: &Transform,
    convex_body_position: DVec3,
) -> SmallVec<[(DVec3, DVec3, DVec3); 8]> {
    let n = Shape::plane_world_normal(plane_transform);
    let mut out = SmallVec::new();
    for &local_vertex in &hull.vertices {
        let w = convex_transform.point_to_world_frame(local_vertex);
        let d = n.dot(w - plane_transform.position);
        if d <= 0.0 {
            let ri = (w - d * n) - plane_body_position;
            let rj = w - convex_body_position;
            out.push((n, ri, rj));
        }
    }
    out
}

/// Canonical plane-vs-sphere generator, plane in the body1 role.
fn plane_sphere(
    plane_transform: &Transform,
    plane_body_position: DVec3,
    sphere_center: DVec3,
    sphere_body_position: DVec3,
    radius: f64,
) -> Option<(DVec3, DVec3, DVec3)> {
    let n = Shape::plane_world_normal(plane_transform);
    let w = sphere_center - radius * n;
    let d = n.dot(w - plane_transform.position);
    if d > 0.0 {
        return None;
    }
    let ri = (w - d * n) - plane_body_position;
    let rj = w - sphere_body_position;
    Some((n, ri, rj))
}

/// Canonical sphere-vs-sphere generator. `ni` points from the body owning
/// `c1`/`r1` toward the body owning `c2`/`r2`.
///
/// No-contact is strictly `|c2-c1| > r1+r2` per spec §4.3: the exact-touch
/// case (`dist == r1+r2`) still emits a contact, matching §9's "comparisons
/// must be implemented exactly as the spec states" — the solver tolerates a
/// zero-overlap contact as valid.
fn sphere_sphere(
    c1: DVec3,
    r1: f64,
    c2: DVec3,
    r2: f64,
    config: &NarrowPhaseConfig,
) -> Option<(DVec3, DVec3, DVec3)> {
    let diff = c2 - c1;
    let dist_sq = diff.length_squared();
    let min_dist = r1 + r2;
    if dist_sq > min_dist * min_dist {
        return None;
    }
    let ni = normalize_or(diff, DVec3::Y, config.zero_vector_epsilon_sq);
    let ri = r1 * ni;
    let rj = -r2 * ni;
    Some((ni, ri, rj))
}

/// Canonical sphere-vs-convex generator: a three-stage search (vertices,
/// faces, edges) maintaining a running best `(point, penetration)`,
/// initialized `(None, 0)`. A candidate wins only when its penetration is
/// `>=` the running best, so later candidates win ties — faces take
/// precedence over vertices, and edges (tested only when their owning
/// face's plane is crossed but the projection falls outside the face) take
/// precedence over the face that spawned them.
///
/// The edge stage for a face only runs when that face's plane is crossed
/// (`side > 0 && pen >= best_penetration`) and the projected sphere center
/// falls outside the face polygon. If no face plane is crossed at all, no
/// edges are tested — this mirrors the source behavior exactly and can miss
/// edge-only contacts for small spheres grazing a hull corner whose
/// adjacent faces the sphere center never projects onto. Known limitation,
/// preserved intentionally rather than "fixed".
fn sphere_convex(
    c: DVec3,
    radius: f64,
    hull: &ConvexPolyhedron,
    hull_transform: &Transform,
    convex_body_position: DVec3,
    config: &NarrowPhaseConfig,
) -> Option<(DVec3, DVec3, DVec3)> {
    let mut best_point: Option<DVec3> = None;
    let mut best_penetration = 0.0_f64;

    // Stage 1: vertices.
    for &local_vertex in &hull.vertices {
        let w = hull_transform.point_to_world_frame(local_vertex);
        let pen = radius - (w - c).length();
        if pen >= best_penetration {
            best_penetration = pen;
            best_point = Some(w);
        }
    }

    // Stage 2: faces (+ stage 3 edges, nested per rejected face).
    for face in &hull.faces {
        if face.vertex_indices.len() < 3 {
            // Degenerate face: no face contact, not even a candidate for edges.
            continue;
        }
        let world_normal = hull_transform.vector_to_world_frame(face.normal).normalize();
        let world_vertex0 =
            hull_transform.point_to_world_frame(hull.vertices[face.vertex_indices[0]]);
        let pen = world_normal.dot((c - radius * world_normal) - world_vertex0);
        let side = world_normal.dot(c - world_vertex0);

        if side <= 0.0 || pen < best_penetration {
            continue;
        }

        let polygon: SmallVec<[DVec3; 8]> = face
            .vertex_indices
            .iter()
            .map(|&i| hull_transform.point_to_world_frame(hull.vertices[i]))
            .collect();

        if point_in_polygon(&polygon, world_normal, c) {
            best_penetration = pen;
            best_point = Some(c + (pen - radius) * world_normal);
            continue;
        }

        // Stage 3: edges of this face's ring.
        let n = polygon.len();
        for i in 0..n {
            let curr = polygon[i];
            let prev = polygon[(i + n - 1) % n];
            let e = curr - prev;
            let e_len_sq = e.length_squared();
            if is_near_zero(e, config.zero_vector_epsilon_sq) {
                continue;
            }
            let u = e / e_len_sq.sqrt();
            let s = (c - prev).dot(u);
            if s > 0.0 && s * s < e_len_sq {
                let q = prev + s * u;
                let pen_edge = radius - (q - c).length();
                if pen_edge >= best_penetration {
                    best_penetration = pen_edge;
                    best_point = Some(q);
                }
            }
        }
    }

    let best_point = best_point?;
    let ni = normalize_or(best_point - c, DVec3::Y, config.zero_vector_epsilon_sq);
    let ri = (best_point - c) + best_penetration * ni;
    let rj = best_point - convex_body_position;
    Some((ni, ri, rj))
}

/// `true` iff `p` lies inside the planar ring `vertices` (with outward
/// `normal`). Returns `false` for fewer than three vertices. For each
/// consecutive ring pair `(v, prev)`, the sign of `(v - prev) x normal .
/// (p - prev)` must be consistent — all strictly positive, or all
/// non-positive — across every edge; the first edge fixes which.
pub fn point_in_polygon(vertices: &[DVec3], normal: DVec3, p: DVec3) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut want_positive: Option<bool> = None;
    for i in 0..n {
        let v = vertices[i];
        let prev = vertices[(i + n - 1) % n];
        let edge = v - prev;
        let s = edge.cross(normal).dot(p - prev);
        let is_positive = s > 0.0;
        match want_positive {
            None => want_positive = Some(is_positive),
            Some(want) if is_positive != want => return false,
            _ => {}
        }
    }
    true
}

/// Canonical convex-vs-convex generator via SAT + Sutherland-Hodgman
/// clipping. `ni` is the negated separating axis (found from hullA toward
/// hullB), matching the source's sign convention for this pair exactly.
#[allow(clippy::too_many_arguments)]
fn convex_convex(
    body1_position: DVec3,
    ta: &Transform,
    hull_a: &ConvexPolyhedron,
    body2_position: DVec3,
    tb: &Transform,
    hull_b: &ConvexPolyhedron,
    config: &NarrowPhaseConfig,
) -> SmallVec<[(DVec3, DVec3, DVec3); 8]> {
    let mut out = SmallVec::new();

    let Some(sep_axis) = hull::find_separating_axis(ta, hull_a, tb, hull_b, config) else {
        return out;
    };

    let clipped = hull::clip_against_hull(
        ta,
        hull_a,
        tb,
        hull_b,
        sep_axis,
        config.clip_min_distance,
        config.clip_max_distance,
    );

    let ni = -sep_axis;
    for contact in clipped {
        let q = -contact.depth * contact.normal;
        let ri = (contact.point + q) - body1_position;
        let rj = contact.point - body2_position;
        out.push((ni, ri, rj));
    }
    out
}
