//! Convex polyhedron data model and queries: face normals, supporting
//! features, face-against-hull clipping, separating-axis search.

use glam::DVec3;
use smallvec::SmallVec;

use crate::config::NarrowPhaseConfig;
use crate::error::HullError;
use crate::transform::Transform;

/// A planar, convex face of a [`ConvexPolyhedron`].
///
/// `vertex_indices` is an ordered ring into the hull's vertex list, wound so
/// that `normal` points outward from the hull interior.
#[derive(Debug, Clone)]
pub struct Face {
    pub vertex_indices: Vec<usize>,
    pub normal: DVec3,
}

/// An immutable convex polyhedron in local frame.
///
/// Invariants (checked by [`ConvexPolyhedron::try_new`], assumed by
/// [`ConvexPolyhedron::from_box`]): every face normal points outward and the
/// centroid is interior to every face plane; every edge is shared by exactly
/// two faces; `vertex_indices` are wound consistently.
#[derive(Debug, Clone)]
pub struct ConvexPolyhedron {
    pub vertices: Vec<DVec3>,
    pub faces: Vec<Face>,
    /// De-duplicated unique edge directions (local frame, unit length),
    /// precomputed once at construction so SAT doesn't rebuild it per call.
    pub edge_directions: Vec<DVec3>,
    /// Average of `vertices`; used only to orient a found separating axis
    /// from hull A toward hull B.
    centroid: DVec3,
}

/// A contact produced by clipping an incident face against a hull's side
/// planes and reference-face distance bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipContact {
    pub point: DVec3,
    pub normal: DVec3,
    pub depth: f64,
}

const DEDUP_DIRECTION_EPSILON: f64 = 1e-9;

impl ConvexPolyhedron {
    /// Validates and builds a hull from raw vertex/face data.
    pub fn try_new(vertices: Vec<DVec3>, faces: Vec<Face>) -> Result<Self, HullError> {
        if vertices.is_empty() {
            return Err(HullError::NoVertices);
        }
        if faces.is_empty() {
            return Err(HullError::NoFaces);
        }
        for (face_index, face) in faces.iter().enumerate() {
            if face.vertex_indices.len() < 3 {
                return Err(HullError::DegenerateFace {
                    face_index,
                    count: face.vertex_indices.len(),
                });
            }
            for &index in &face.vertex_indices {
                if index >= vertices.len() {
                    return Err(HullError::VertexIndexOutOfRange {
                        face_index,
                        index,
                        vertex_count: vertices.len(),
                    });
                }
            }
            if face.normal.length_squared() < 1e-12 {
                return Err(HullError::DegenerateNormal { face_index });
            }
        }

        let centroid = vertices.iter().copied().sum::<DVec3>() / vertices.len() as f64;
        let edge_directions = compute_edge_directions(&vertices, &faces);

        Ok(Self {
            vertices,
            faces,
            edge_directions,
            centroid,
        })
    }

    /// Constructs a six-faced axis-aligned box of the given half-extents at
    /// the origin. Face normals are the six unit axis directions.
    pub fn from_box(half_extents: DVec3) -> Self {
        let h = half_extents;
        let vertices = vec![
            DVec3::new(-h.x, -h.y, -h.z), // 0
            DVec3::new(h.x, -h.y, -h.z),  // 1
            DVec3::new(h.x, h.y, -h.z),   // 2
            DVec3::new(-h.x, h.y, -h.z),  // 3
            DVec3::new(-h.x, -h.y, h.z),  // 4
            DVec3::new(h.x, -h.y, h.z),   // 5
            DVec3::new(h.x, h.y, h.z),    // 6
            DVec3::new(-h.x, h.y, h.z),   // 7
        ];

        let faces = vec![
            Face {
                vertex_indices: vec![0, 3, 2, 1],
                normal: DVec3::new(0.0, 0.0, -1.0),
            },
            Face {
                vertex_indices: vec![4, 5, 6, 7],
                normal: DVec3::new(0.0, 0.0, 1.0),
            },
            Face {
                vertex_indices: vec![0, 1, 5, 4],
                normal: DVec3::new(0.0, -1.0, 0.0),
            },
            Face {
                vertex_indices: vec![2, 3, 7, 6],
                normal: DVec3::new(0.0, 1.0, 0.0),
            },
            Face {
                vertex_indices: vec![1, 2, 6, 5],
                normal: DVec3::new(1.0, 0.0, 0.0),
            },
            Face {
                vertex_indices: vec![3, 0, 4, 7],
                normal: DVec3::new(-1.0, 0.0, 0.0),
            },
        ];

        let edge_directions = compute_edge_directions(&vertices, &faces);

        Self {
            vertices,
            faces,
            edge_directions,
            centroid: DVec3::ZERO,
        }
    }

    /// Iterates faces in stored order, folding `visitor(acc, world_normal,
    /// world_vertex_of_face, face_index)` into an accumulator.
    pub fn fold_face_normals<Acc>(
        &self,
        transform: &Transform,
        seed: Acc,
        mut visitor: impl FnMut(Acc, DVec3, DVec3, usize) -> Acc,
    ) -> Acc {
        let mut acc = seed;
        for (face_index, face) in self.faces.iter().enumerate() {
            let world_normal = transform.vector_to_world_frame(face.normal).normalize();
            let world_vertex =
                transform.point_to_world_frame(self.vertices[face.vertex_indices[0]]);
            acc = visitor(acc, world_normal, world_vertex, face_index);
        }
        acc
    }

    /// World-space vertex ring of a face.
    fn world_face_polygon(&self, face: &Face, transform: &Transform) -> SmallVec<[DVec3; 8]> {
        face.vertex_indices
            .iter()
            .map(|&i| transform.point_to_world_frame(self.vertices[i]))
            .collect()
    }

    /// Indices of faces sharing an edge with `face_index`.
    fn adjacent_faces(&self, face_index: usize) -> SmallVec<[usize; 8]> {
        let target_edges = ring_edges(&self.faces[face_index].vertex_indices);
        self.faces
            .iter()
            .enumerate()
            .filter(|(i, f)| {
                *i != face_index
                    && ring_edges(&f.vertex_indices)
                        .iter()
                        .any(|e| target_edges.contains(e))
            })
            .map(|(i, _)| i)
            .collect()
    }

    fn min_max_projection(&self, transform: &Transform, axis: DVec3) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in &self.vertices {
            let d = transform.point_to_world_frame(v).dot(axis);
            min = min.min(d);
            max = max.max(d);
        }
        (min, max)
    }
}

/// Unordered edge key for membership testing, independent of winding.
fn ring_edges(vertex_indices: &[usize]) -> SmallVec<[(usize, usize); 8]> {
    let n = vertex_indices.len();
    (0..n)
        .map(|i| {
            let a = vertex_indices[i];
            let b = vertex_indices[(i + 1) % n];
            (a.min(b), a.max(b))
        })
        .collect()
}

/// De-duplicated unit edge directions across all faces. Opposite directions
/// (`v` and `-v`) are treated as the same axis since SAT only cares about
/// the line they span.
fn compute_edge_directions(vertices: &[DVec3], faces: &[Face]) -> Vec<DVec3> {
    let mut dirs: Vec<DVec3> = Vec::new();
    for face in faces {
        let n = face.vertex_indices.len();
        for i in 0..n {
            let a = vertices[face.vertex_indices[i]];
            let b = vertices[face.vertex_indices[(i + 1) % n]];
            let edge = b - a;
            if edge.length_squared() < 1e-12 {
                continue;
            }
            let dir = edge.normalize();
            let is_dup = dirs.iter().any(|&d| {
                (d - dir).length_squared() < DEDUP_DIRECTION_EPSILON
                    || (d + dir).length_squared() < DEDUP_DIRECTION_EPSILON
            });
            if !is_dup {
                dirs.push(dir);
            }
        }
    }
    dirs
}

/// Searches for a single axis that separates `hull_a` from `hull_b`.
///
/// Candidate axes, in order: hullA's world face normals, hullB's world face
/// normals, then every normalized cross product of an edge of hullA with an
/// edge of hullB (near-zero crosses skipped). Returns `None` as soon as any
/// candidate yields a non-positive overlap — the hulls are separated.
/// Otherwise returns the candidate with the smallest positive overlap,
/// oriented to point from hullA toward hullB, ties broken by iteration
/// order.
pub fn find_separating_axis(
    ta: &Transform,
    hull_a: &ConvexPolyhedron,
    tb: &Transform,
    hull_b: &ConvexPolyhedron,
    config: &NarrowPhaseConfig,
) -> Option<DVec3> {
    let mut best_axis: Option<DVec3> = None;
    let mut best_overlap = f64::INFINITY;

    macro_rules! test_axis {
        ($axis:expr) => {{
            let axis = $axis;
            let (min_a, max_a) = hull_a.min_max_projection(ta, axis);
            let (min_b, max_b) = hull_b.min_max_projection(tb, axis);
            let overlap = (max_a - min_b).min(max_b - min_a);
            if overlap <= 0.0 {
                return None;
            }
            if overlap < best_overlap {
                best_overlap = overlap;
                best_axis = Some(axis);
            }
        }};
    }

    for face in &hull_a.faces {
        test_axis!(ta.vector_to_world_frame(face.normal).normalize());
    }
    for face in &hull_b.faces {
        test_axis!(tb.vector_to_world_frame(face.normal).normalize());
    }
    for &ea in &hull_a.edge_directions {
        let world_ea = ta.vector_to_world_frame(ea);
        for &eb in &hull_b.edge_directions {
            let world_eb = tb.vector_to_world_frame(eb);
            let cross = world_ea.cross(world_eb);
            if cross.length_squared() < config.sat_parallel_edge_epsilon_sq {
                continue;
            }
            test_axis!(cross.normalize());
        }
    }

    let mut axis = best_axis?;
    let center_a = ta.point_to_world_frame(hull_a.centroid);
    let center_b = tb.point_to_world_frame(hull_b.centroid);
    if axis.dot(center_b - center_a) < 0.0 {
        axis = -axis;
    }
    Some(axis)
}

/// Clips the best incident face of `hull_b` against the side planes of
/// `hull_a`'s reference face, producing a contact manifold.
///
/// `sep_axis` must point from `hull_a` toward `hull_b` (as returned by
/// [`find_separating_axis`]). `min_dist`/`max_dist` bound the signed
/// distance (from the reference plane) a clipped vertex may have to survive
/// into the output.
pub fn clip_against_hull(
    ta: &Transform,
    hull_a: &ConvexPolyhedron,
    tb: &Transform,
    hull_b: &ConvexPolyhedron,
    sep_axis: DVec3,
    min_dist: f64,
    max_dist: f64,
) -> Vec<ClipContact> {
    let incident_face_index = hull_b
        .faces
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            let da = tb.vector_to_world_frame(a.normal).normalize().dot(sep_axis);
            let db = tb.vector_to_world_frame(b.normal).normalize().dot(sep_axis);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .expect("hull_b has at least one face");

    let incident_polygon =
        hull_b.world_face_polygon(&hull_b.faces[incident_face_index], tb);

    let reference_face_index = hull_a
        .faces
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| {
            let da = ta.vector_to_world_frame(a.normal).normalize().dot(sep_axis);
            let db = ta.vector_to_world_frame(b.normal).normalize().dot(sep_axis);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .expect("hull_a has at least one face");

    clip_face_against_hull(
        ta,
        hull_a,
        reference_face_index,
        &incident_polygon,
        min_dist,
        max_dist,
    )
}

/// Same operation as [`clip_against_hull`], exposed with a caller-supplied
/// incident polygon instead of deriving it from a second hull.
pub fn clip_face_against_hull(
    ta: &Transform,
    hull_a: &ConvexPolyhedron,
    reference_face_index: usize,
    incident_polygon: &[DVec3],
    min_dist: f64,
    max_dist: f64,
) -> Vec<ClipContact> {
    let reference_face = &hull_a.faces[reference_face_index];
    let reference_normal = ta
        .vector_to_world_frame(reference_face.normal)
        .normalize();
    let reference_point =
        ta.point_to_world_frame(hull_a.vertices[reference_face.vertex_indices[0]]);

    let mut polygon: SmallVec<[DVec3; 8]> = incident_polygon.iter().copied().collect();

    for adjacent_index in hull_a.adjacent_faces(reference_face_index) {
        let face = &hull_a.faces[adjacent_index];
        let plane_normal = ta.vector_to_world_frame(face.normal).normalize();
        let plane_point = ta.point_to_world_frame(hull_a.vertices[face.vertex_indices[0]]);
        polygon = clip_polygon_against_plane(&polygon, plane_point, plane_normal);
        if polygon.is_empty() {
            return Vec::new();
        }
    }

    polygon
        .iter()
        .filter_map(|&v| {
            let d = reference_normal.dot(v - reference_point);
            if d < min_dist || d > max_dist {
                return None;
            }
            Some(ClipContact {
                point: v - d * reference_normal,
                normal: reference_normal,
                depth: -d,
            })
        })
        .collect()
}

/// Sutherland-Hodgman clip of `polygon` against the half-space `{x : (x -
/// plane_point) . plane_normal <= 0}`.
fn clip_polygon_against_plane(
    polygon: &[DVec3],
    plane_point: DVec3,
    plane_normal: DVec3,
) -> SmallVec<[DVec3; 8]> {
    let mut output = SmallVec::new();
    let n = polygon.len();
    if n == 0 {
        return output;
    }

    for i in 0..n {
        let current = polygon[i];
        let prev = polygon[(i + n - 1) % n];
        let current_inside = plane_normal.dot(current - plane_point) <= 0.0;
        let prev_inside = plane_normal.dot(prev - plane_point) <= 0.0;

        if current_inside != prev_inside {
            if let Some(ix) = segment_plane_intersection(prev, current, plane_point, plane_normal)
            {
                output.push(ix);
            }
        }
        if current_inside {
            output.push(current);
        }
    }

    output
}

fn segment_plane_intersection(
    a: DVec3,
    b: DVec3,
    plane_point: DVec3,
    plane_normal: DVec3,
) -> Option<DVec3> {
    let da = plane_normal.dot(a - plane_point);
    let db = plane_normal.dot(b - plane_point);
    let denom = da - db;
    if denom.abs() < 1e-12 {
        return None;
    }
    let t = da / denom;
    Some(a + (b - a) * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn from_box_has_six_outward_faces() {
        let hull = ConvexPolyhedron::from_box(DVec3::splat(0.5));
        assert_eq!(hull.faces.len(), 6);
        for face in &hull.faces {
            assert_relative_eq!(face.normal.length(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn from_box_edge_directions_are_deduped_to_three() {
        let hull = ConvexPolyhedron::from_box(DVec3::splat(0.5));
        // A box has edges along only 3 unique directions (x, y, z axes).
        assert_eq!(hull.edge_directions.len(), 3);
    }

    #[test]
    fn try_new_rejects_degenerate_face() {
        let vertices = vec![DVec3::ZERO, DVec3::X, DVec3::Y];
        let faces = vec![Face {
            vertex_indices: vec![0, 1],
            normal: DVec3::Z,
        }];
        let err = ConvexPolyhedron::try_new(vertices, faces).unwrap_err();
        assert_eq!(
            err,
            HullError::DegenerateFace {
                face_index: 0,
                count: 2
            }
        );
    }

    #[test]
    fn try_new_rejects_out_of_range_index() {
        let vertices = vec![DVec3::ZERO, DVec3::X, DVec3::Y];
        let faces = vec![Face {
            vertex_indices: vec![0, 1, 5],
            normal: DVec3::Z,
        }];
        let err = ConvexPolyhedron::try_new(vertices, faces).unwrap_err();
        assert_eq!(
            err,
            HullError::VertexIndexOutOfRange {
                face_index: 0,
                index: 5,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn separated_boxes_return_none() {
        let hull = ConvexPolyhedron::from_box(DVec3::splat(0.5));
        let ta = Transform::IDENTITY;
        let tb = Transform::from_position(DVec3::new(3.0, 0.0, 0.0));
        let config = NarrowPhaseConfig::default();
        assert!(find_separating_axis(&ta, &hull, &tb, &hull, &config).is_none());
    }

    #[test]
    fn overlapping_boxes_return_axis_with_min_overlap() {
        // Two unit boxes (half-extents 0.5) overlapping 0.1 along X, per S4.
        let hull = ConvexPolyhedron::from_box(DVec3::splat(0.5));
        let ta = Transform::IDENTITY;
        let tb = Transform::from_position(DVec3::new(0.9, 0.0, 0.0));
        let config = NarrowPhaseConfig::default();
        let axis = find_separating_axis(&ta, &hull, &tb, &hull, &config).unwrap();
        assert_relative_eq!(axis, DVec3::new(1.0, 0.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn clip_overlapping_boxes_produces_four_contacts() {
        let hull = ConvexPolyhedron::from_box(DVec3::splat(0.5));
        let ta = Transform::IDENTITY;
        let tb = Transform::from_position(DVec3::new(0.9, 0.0, 0.0));
        let config = NarrowPhaseConfig::default();
        let axis = find_separating_axis(&ta, &hull, &tb, &hull, &config).unwrap();
        let contacts = clip_against_hull(
            &ta,
            &hull,
            &tb,
            &hull,
            axis,
            config.clip_min_distance,
            config.clip_max_distance,
        );
        assert_eq!(contacts.len(), 4);
        for c in &contacts {
            assert_relative_eq!(c.depth, 0.1, epsilon = 1e-9);
            assert_relative_eq!(c.normal, DVec3::new(1.0, 0.0, 0.0), epsilon = 1e-9);
        }
    }

    #[test]
    fn clip_box_on_plane_produces_four_bottom_vertices() {
        // S3: unit box (half-extents 0.5) centered at z=0.45 above a ground
        // plane hull represented as a very large flat box, reference face
        // is the box's bottom face when the plane's role is played by hullA.
        let box_hull = ConvexPolyhedron::from_box(DVec3::splat(0.5));
        let ground_hull = ConvexPolyhedron::from_box(DVec3::new(50.0, 50.0, 0.5));
        let ground_t = Transform::from_position(DVec3::new(0.0, 0.0, -0.5));
        let box_t = Transform::from_position(DVec3::new(0.0, 0.0, 0.45));
        let config = NarrowPhaseConfig::default();

        let axis = find_separating_axis(&ground_t, &ground_hull, &box_t, &box_hull, &config)
            .expect("boxes overlap");
        let contacts = clip_against_hull(
            &ground_t,
            &ground_hull,
            &box_t,
            &box_hull,
            axis,
            config.clip_min_distance,
            config.clip_max_distance,
        );
        assert_eq!(contacts.len(), 4);
        for c in &contacts {
            assert_relative_eq!(c.depth, 0.05, epsilon = 1e-9);
        }
    }
}
