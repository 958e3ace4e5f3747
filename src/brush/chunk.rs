//! Convex working pieces of a brush, split progressively during evaluation.

use crate::aabb::Aabb;
use crate::mesh::{NO_LINEAGE, Plane, PointPlaneRelation, Polygon, PolygonPlaneRelation, Vertex};
use crate::tolerance::Real;
use crate::vector::{Vector2, Vector3};
use crate::mesh::Color;
use std::cmp::Ordering;
use std::fmt::Debug;
use std::sync::OnceLock;

/// A closed convex polyhedron, stored as its polygons.
///
/// Chunks start as a copy of a brush's source polygons and are split by the
/// planes of other brushes. Each split closes both halves with a temporary
/// cap so containment tests keep working on the pieces.
#[derive(Debug, Clone)]
pub struct BrushChunk<S: Clone> {
    polygons: Vec<Polygon<S>>,

    /// Lazily calculated AABB that spans `polygons`.
    bounding_box: OnceLock<Aabb>,
}

impl<S: Clone + Send + Sync + Debug> BrushChunk<S> {
    pub fn new(polygons: Vec<Polygon<S>>) -> Self {
        BrushChunk {
            polygons,
            bounding_box: OnceLock::new(),
        }
    }

    pub fn polygons(&self) -> &[Polygon<S>] {
        &self.polygons
    }

    /// Mutable access for flag and attribute changes. Vertex positions must
    /// stay put, since the cached bounds are not recomputed.
    pub(crate) fn polygons_mut(&mut self) -> &mut [Polygon<S>] {
        &mut self.polygons
    }

    pub fn into_polygons(self) -> Vec<Polygon<S>> {
        self.polygons
    }

    /// Bounds over every vertex, computed once.
    pub fn bounds(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            Aabb::from_points(self.polygons.iter().flat_map(|p| p.vertices.iter().map(|v| v.pos)))
                .unwrap_or_else(|| Aabb::from_point(Vector3::zeros()))
        })
    }

    /// Split into the part behind `plane` ("in") and the part in front
    /// ("out").
    ///
    /// Returns `None` without touching anything unless the chunk has vertices
    /// strictly on both sides of the plane. Polygons coplanar with the plane
    /// go to the side their normal agrees with. A spanning polygon whose
    /// split only partly succeeds stays whole on the side of its surviving
    /// piece.
    pub fn split_by_plane(&self, plane: &Plane) -> Option<(BrushChunk<S>, BrushChunk<S>)> {
        if plane.is_degenerate() || !self.straddles(plane) {
            return None;
        }

        let mut inside: Vec<Polygon<S>> = Vec::with_capacity(self.polygons.len() + 1);
        let mut outside: Vec<Polygon<S>> = Vec::with_capacity(self.polygons.len() + 1);

        for polygon in &self.polygons {
            match plane.test_polygon(polygon) {
                PolygonPlaneRelation::InFront => outside.push(polygon.clone()),
                PolygonPlaneRelation::Behind => inside.push(polygon.clone()),
                PolygonPlaneRelation::Coplanar => {
                    if polygon.plane.normal.dot(plane.normal) > Real::ZERO {
                        inside.push(polygon.clone());
                    } else {
                        outside.push(polygon.clone());
                    }
                },
                PolygonPlaneRelation::Spanning => {
                    let split = plane.split_polygon(polygon);
                    match (split.back, split.front) {
                        (Some(back), Some(front)) => {
                            inside.push(back);
                            outside.push(front);
                        },
                        (Some(_), None) => inside.push(polygon.clone()),
                        (None, Some(_)) => outside.push(polygon.clone()),
                        (None, None) => {
                            tracing::warn!(
                                unique_index = polygon.unique_index,
                                "polygon split produced no valid piece, keeping it whole"
                            );
                            match plane.compare_point(polygon.center()) {
                                PointPlaneRelation::InFront => outside.push(polygon.clone()),
                                _ => inside.push(polygon.clone()),
                            }
                        },
                    }
                },
            }
        }

        if let Some(cap) = self.cap(plane) {
            outside.push(cap.flipped());
            inside.push(cap);
        }

        if inside.is_empty() || outside.is_empty() {
            return None;
        }
        Some((BrushChunk::new(inside), BrushChunk::new(outside)))
    }

    fn straddles(&self, plane: &Plane) -> bool {
        let mut in_front = false;
        let mut behind = false;
        for v in self.polygons.iter().flat_map(|p| p.vertices.iter()) {
            match plane.compare_point(v.pos) {
                PointPlaneRelation::InFront => in_front = true,
                PointPlaneRelation::Behind => behind = true,
                PointPlaneRelation::On => {},
            }
            if in_front && behind {
                return true;
            }
        }
        false
    }

    /// Temporary polygon closing the "in" half, facing along the plane normal.
    fn cap(&self, plane: &Plane) -> Option<Polygon<S>> {
        let mut points: Vec<Vector3> = Vec::new();
        for polygon in &self.polygons {
            if let Some((a, b)) = plane.polygon_intersection(polygon) {
                for p in [a, b] {
                    if !points.iter().any(|q| q.equals_with_epsilon_lower(p)) {
                        points.push(p);
                    }
                }
            }
        }
        if points.len() < 3 {
            return None;
        }

        sort_counter_clockwise(&mut points, plane.normal);

        let vertices = points
            .into_iter()
            .map(|p| Vertex {
                pos: p,
                normal: plane.normal,
                uv: Vector2::zeros(),
                color: Color::WHITE,
            })
            .collect();
        let cap = Polygon::from_parts(vertices, None, NO_LINEAGE, true, false);
        if !cap.is_valid() {
            tracing::warn!("chunk cap is degenerate, leaving halves open");
            return None;
        }
        Some(cap)
    }
}

/// Orthonormal `(u, v)` spanning the plane with normal `n`, with
/// `u × v = n`.
fn plane_basis(n: Vector3) -> (Vector3, Vector3) {
    let a = n.abs();
    let other = if a.x <= a.y && a.x <= a.z {
        Vector3::x()
    } else if a.y <= a.z {
        Vector3::y()
    } else {
        Vector3::z()
    };
    let u = other.cross(n).normalize();
    let v = n.cross(u);
    (u, v)
}

/// Order coplanar points counter-clockwise around their centroid, viewed
/// from the side `normal` points to.
fn sort_counter_clockwise(points: &mut [Vector3], normal: Vector3) {
    let centroid = points.iter().copied().sum::<Vector3>() / Real::from_int(points.len() as i32);
    let (u, v) = plane_basis(normal);
    let project = |p: &Vector3| {
        let d = *p - centroid;
        (d.dot(u), d.dot(v))
    };
    // Upper half-plane (angle in [0, π)) sorts first
    let half = |(x, y): (Real, Real)| -> u8 {
        if y > Real::ZERO || (y.is_zero() && x > Real::ZERO) { 0 } else { 1 }
    };

    points.sort_by(|a, b| {
        let pa = project(a);
        let pb = project(b);
        half(pa).cmp(&half(pb)).then_with(|| {
            let cross = pa.0 * pb.1 - pa.1 * pb.0;
            if cross > Real::ZERO {
                Ordering::Less
            } else if cross < Real::ZERO {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        })
    });
}
