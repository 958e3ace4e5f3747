//! Pure containment, ray and barycentric predicates over polygon sets.
//!
//! Polygons with a degenerate plane are skipped everywhere: they carry no
//! usable orientation and would make every answer meaningless.

use crate::mesh::{Polygon, Vertex};
use crate::tolerance::{EPSILON, EPSILON_LOWER_2, Real};
use crate::vector::Vector3;
use std::fmt::Debug;

/// How deep `point` sits inside the convex polyhedron bounded by `polygons`.
///
/// Returns the smallest signed distance to any bounding plane, positive
/// inside. A value above `+ε` is strictly inside, within `±ε` is on the
/// boundary, below `-ε` is outside. An empty (or fully degenerate) set
/// contains nothing and reports [`Real::MIN`].
pub fn polyhedron_contains_point_distance<S: Clone + Send + Sync + Debug>(
    polygons: &[Polygon<S>],
    point: Vector3,
) -> Real {
    polygons
        .iter()
        .filter(|p| !p.plane.is_degenerate())
        .map(|p| -p.plane.distance_to_point(point))
        .min()
        .unwrap_or(Real::MIN)
}

/// `point` lies inside or on the polyhedron, with 1e-3 slack.
pub fn polyhedron_contains_point<S: Clone + Send + Sync + Debug>(
    polygons: &[Polygon<S>],
    point: Vector3,
) -> bool {
    polyhedron_contains_point_distance(polygons, point) >= -EPSILON_LOWER_2
}

/// Every vertex of every `inner` polygon lies inside or on `outer`.
pub fn polyhedron_contains_polyhedron<S, T>(outer: &[Polygon<S>], inner: &[Polygon<T>]) -> bool
where
    S: Clone + Send + Sync + Debug,
    T: Clone + Send + Sync + Debug,
{
    inner
        .iter()
        .flat_map(|p| p.vertices.iter())
        .all(|v| polyhedron_contains_point(outer, v.pos))
}

/// `point` (assumed near the polygon's plane) lies inside every edge of the
/// convex `polygon`, allowing `tolerance` of overshoot.
fn polygon_contains_point_on_plane<S: Clone + Send + Sync + Debug>(
    polygon: &Polygon<S>,
    point: Vector3,
    tolerance: Real,
) -> bool {
    let normal = polygon.plane.normal;
    polygon.edges().all(|edge| {
        // Outward for a counter-clockwise loop
        let edge_normal = edge.direction().normalize().cross(normal);
        edge_normal.dot(point - edge.vertex1.pos) <= tolerance
    })
}

/// `candidate` lies in `outer`'s plane (either orientation) and inside its
/// boundary once both are projected onto that plane.
pub fn polygon_contains_polygon<S, T>(outer: &Polygon<S>, candidate: &Polygon<T>) -> bool
where
    S: Clone + Send + Sync + Debug,
    T: Clone + Send + Sync + Debug,
{
    if !outer.is_valid() || !candidate.is_valid() {
        return false;
    }
    candidate.vertices.iter().all(|v| {
        outer.plane.distance_to_point(v.pos).abs() <= EPSILON_LOWER_2
            && polygon_contains_point_on_plane(outer, outer.plane.closest_point(v.pos), EPSILON_LOWER_2)
    })
}

/// Distance along `direction` from `origin` to where the ray enters
/// `polygon`, if it hits. Rays parallel to the polygon never hit.
pub fn raycast_polygon<S: Clone + Send + Sync + Debug>(
    polygon: &Polygon<S>,
    origin: Vector3,
    direction: Vector3,
) -> Option<Real> {
    if !polygon.is_valid() {
        return None;
    }
    let direction = direction.normalize();
    let denominator = polygon.plane.normal.dot(direction);
    if denominator.abs() < EPSILON {
        return None;
    }
    let t = -polygon.plane.distance_to_point(origin) / denominator;
    if t < Real::ZERO {
        return None;
    }
    let hit = origin + direction * t;
    polygon_contains_point_on_plane(polygon, hit, EPSILON).then_some(t)
}

/// Nearest polygon hit by the ray, as `(index, distance)`.
pub fn raycast_polygons<S: Clone + Send + Sync + Debug>(
    polygons: &[Polygon<S>],
    origin: Vector3,
    direction: Vector3,
) -> Option<(usize, Real)> {
    polygons
        .iter()
        .enumerate()
        .filter_map(|(i, p)| raycast_polygon(p, origin, direction).map(|t| (i, t)))
        .min_by(|a, b| a.1.cmp(&b.1))
}

/// How far past an edge a point may lie and still count as inside a
/// triangle (0.1).
pub const TRIANGLE_EDGE_SLACK: Real = Real::from_raw(429_496_730);

/// Point-in-triangle with [`TRIANGLE_EDGE_SLACK`], the point assumed on its
/// plane.
pub fn triangle_contains_point<S: Clone + Send + Sync + Debug>(
    triangle: &Polygon<S>,
    point: Vector3,
) -> bool {
    let normal = triangle.plane.normal;
    triangle.edges().all(|edge| {
        let edge_normal = edge.direction().normalize().cross(normal);
        let to_edge_center = edge.center() - point;
        edge_normal.dot(to_edge_center) >= -TRIANGLE_EDGE_SLACK
    })
}

/// Sample the triangle `(vertex1, vertex2, vertex3)` at `position` with
/// signed barycentric weights.
///
/// Each weight is the sub-triangle's cross-product length over the main
/// triangle's, signed by whether the two crosses agree. Points slightly
/// outside the triangle therefore extrapolate instead of clamping.
pub fn vertex_for_position(
    vertex1: &Vertex,
    vertex2: &Vertex,
    vertex3: &Vertex,
    position: Vector3,
) -> Vertex {
    let (p1, p2, p3) = (vertex1.pos, vertex2.pos, vertex3.pos);
    let f1 = p1 - position;
    let f2 = p2 - position;
    let f3 = p3 - position;

    let main = (p1 - p2).cross(p1 - p3);
    let area = main.norm();
    let weight = |cross: Vector3| cross.norm() / area * main.dot(cross).signum();

    let weights = [weight(f2.cross(f3)), weight(f3.cross(f1)), weight(f1.cross(f2))];
    let mut vertex = Vertex::barycentric_blend(vertex1, vertex2, vertex3, weights);
    vertex.pos = position;
    vertex
}

/// Outcome of [`calculate_interpolated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interpolated {
    pub vertex: Vertex,
    /// False when no triangle contained the point and the fallback was used.
    pub matched: bool,
}

/// Attributes at `position` on the surface covered by `triangles`.
///
/// Uses the first triangle that contains the point. If none does (edge-exact
/// points can miss under fixed-point rounding), falls back to the first
/// triangle's first vertex and logs a warning.
pub fn calculate_interpolated<S: Clone + Send + Sync + Debug>(
    triangles: &[Polygon<S>],
    position: Vector3,
) -> Interpolated {
    if let Some(t) = triangles
        .iter()
        .find(|t| t.vertices.len() >= 3 && triangle_contains_point(t, position))
    {
        return Interpolated {
            vertex: vertex_for_position(&t.vertices[0], &t.vertices[1], &t.vertices[2], position),
            matched: true,
        };
    }

    tracing::warn!(
        x = %position.x,
        y = %position.y,
        z = %position.z,
        triangles = triangles.len(),
        "could not match point to any triangle, using fallback vertex"
    );
    let vertex = triangles
        .first()
        .and_then(|t| t.vertices.first())
        .copied()
        .unwrap_or_else(|| Vertex::new(position, Vector3::zeros()));
    Interpolated {
        vertex,
        matched: false,
    }
}
