//! Planes, point/polygon classification and polygon splitting.

use crate::mesh::edge::Edge;
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use crate::tolerance::{EPSILON, EPSILON_LOWER_2, Real, plane_epsilon};
use crate::vector::Vector3;
use std::fmt::Debug;

/// Where a point sits relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointPlaneRelation {
    /// On the side the normal points to.
    InFront,
    Behind,
    /// Within the classification tolerance of the plane.
    On,
}

/// Where a whole polygon sits relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolygonPlaneRelation {
    InFront,
    Behind,
    Spanning,
    Coplanar,
}

/// Result of [`Plane::split_polygon`].
///
/// A side that came out with fewer than three vertices or a degenerate normal
/// is `None`, and `complete` is false. Callers must then treat the unsplit
/// polygon as unaffected on the missing side.
#[derive(Debug, Clone)]
pub struct PolygonSplit<S: Clone> {
    pub front: Option<Polygon<S>>,
    pub back: Option<Polygon<S>>,
    pub complete: bool,
}

/// A plane `n·p = w` with a unit normal.
///
/// A zero normal marks a degenerate plane, built from collinear or coincident
/// points. Such a plane classifies nothing reliably and callers skip it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Plane {
    /// Unit normal vector of the plane
    pub normal: Vector3,
    /// Distance from origin along normal (plane equation: n·p = w)
    pub w: Real,
}

impl Plane {
    /// Create a new plane from a normal (normalized here) and offset.
    pub fn from_normal(normal: Vector3, w: Real) -> Self {
        Plane {
            normal: normal.normalize(),
            w,
        }
    }

    /// Plane with the given normal passing through `point`.
    pub fn from_normal_and_point(normal: Vector3, point: Vector3) -> Self {
        let normal = normal.normalize();
        Plane {
            normal,
            w: normal.dot(point),
        }
    }

    /// Create a plane from three points.
    /// The normal direction follows the right-hand rule: (p2-p1) × (p3-p1).
    /// Collinear points give a degenerate plane with a zero normal.
    pub fn from_points(p1: Vector3, p2: Vector3, p3: Vector3) -> Self {
        let normal = (p2 - p1).cross(p3 - p1).normalize();
        Plane {
            normal,
            w: normal.dot(p1),
        }
    }

    /// Robust plane through a vertex loop.
    ///
    /// Picks the longest chord, then the vertex farthest from that chord, and
    /// orients the result to agree with the loop's Newell normal. Thin or
    /// nearly collinear leading vertices therefore cannot tilt the plane.
    pub fn from_vertices(vertices: &[Vertex]) -> Self {
        let n = vertices.len();
        if n < 3 {
            return Plane {
                normal: Vector3::zeros(),
                w: Real::ZERO,
            };
        }

        let reference_plane = Self::from_points(vertices[0].pos, vertices[1].pos, vertices[2].pos);
        if n == 3 {
            return reference_plane;
        }

        // Find the longest chord (farthest pair of points)
        let Some((i0, i1, _)) = (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .map(|(i, j)| (i, j, (vertices[i].pos - vertices[j].pos).norm()))
            .max_by(|a, b| a.2.cmp(&b.2))
        else {
            return reference_plane;
        };

        let p0 = vertices[i0].pos;
        let p1 = vertices[i1].pos;
        let dir = p1 - p0;
        if dir.norm() < EPSILON {
            return reference_plane;
        }

        // Find vertex farthest from the line p0-p1
        let Some((i2, max_area)) = vertices
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != i0 && *idx != i1)
            .map(|(idx, v)| (idx, (v.pos - p0).cross(dir).norm()))
            .max_by(|a, b| a.1.cmp(&b.1))
        else {
            return reference_plane;
        };

        if max_area < EPSILON {
            return reference_plane;
        }

        let mut plane_hq = Self::from_points(p0, p1, vertices[i2].pos);

        // Newell normal, taken relative to the first vertex to stay in range
        let origin = vertices[0].pos;
        let reference_normal = vertices
            .iter()
            .zip(vertices.iter().cycle().skip(1))
            .fold(Vector3::zeros(), |acc, (curr, next)| {
                acc + (curr.pos - origin).cross(next.pos - origin)
            });

        if plane_hq.normal.dot(reference_normal) < Real::ZERO {
            plane_hq.flip();
        }

        plane_hq
    }

    #[inline]
    pub const fn normal(&self) -> Vector3 {
        self.normal
    }

    #[inline]
    pub const fn offset(&self) -> Real {
        self.w
    }

    /// Flip the plane (reverse normal and distance)
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Return a flipped copy of this plane
    pub fn flipped(&self) -> Self {
        Plane {
            normal: -self.normal,
            w: -self.w,
        }
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.normal.is_zero()
    }

    /// The normal points down exactly one axis.
    pub fn is_axis_aligned(&self) -> bool {
        self.normal.set_axis_count() == 1
    }

    /// Signed distance; positive in front of the plane.
    #[inline]
    pub fn distance_to_point(&self, point: Vector3) -> Real {
        self.normal.dot(point) - self.w
    }

    /// Projection of `point` onto the plane.
    pub fn closest_point(&self, point: Vector3) -> Vector3 {
        point - self.normal * self.distance_to_point(point)
    }

    /// Classify with the loose tolerance ([`plane_epsilon`]).
    pub fn compare_point(&self, point: Vector3) -> PointPlaneRelation {
        Self::classify(self.distance_to_point(point), plane_epsilon())
    }

    /// Classify with the tight tolerance ([`EPSILON`]).
    pub fn compare_point_tight(&self, point: Vector3) -> PointPlaneRelation {
        Self::classify(self.distance_to_point(point), EPSILON)
    }

    #[inline]
    fn classify(distance: Real, epsilon: Real) -> PointPlaneRelation {
        if distance > epsilon {
            PointPlaneRelation::InFront
        } else if distance < -epsilon {
            PointPlaneRelation::Behind
        } else {
            PointPlaneRelation::On
        }
    }

    pub fn equals_with_epsilon(&self, other: &Plane) -> bool {
        self.normal.equals_with_epsilon(other.normal) && (self.w - other.w).abs() < EPSILON
    }

    /// Equality with 1e-3 slack on normal and offset.
    pub fn equals_looser(&self, other: &Plane) -> bool {
        self.normal.equals_within(other.normal, EPSILON_LOWER_2)
            && (self.w - other.w).abs() < EPSILON_LOWER_2
    }

    /// Like [`Plane::equals_looser`] but also matches the opposite orientation.
    pub fn equals_looser_with_flip(&self, other: &Plane) -> bool {
        self.equals_looser(other) || self.equals_looser(&other.flipped())
    }

    /// Coplanar when the polygon's own plane matches this one; otherwise the
    /// vertices are counted on either side with the loose tolerance.
    pub fn test_polygon<S: Clone + Send + Sync + Debug>(
        &self,
        polygon: &Polygon<S>,
    ) -> PolygonPlaneRelation {
        if polygon.plane.equals_with_epsilon(self) {
            return PolygonPlaneRelation::Coplanar;
        }

        let mut in_front = 0usize;
        let mut behind = 0usize;
        for vertex in &polygon.vertices {
            match self.compare_point(vertex.pos) {
                PointPlaneRelation::InFront => in_front += 1,
                PointPlaneRelation::Behind => behind += 1,
                PointPlaneRelation::On => {},
            }
        }

        match (in_front > 0, behind > 0) {
            (true, true) => PolygonPlaneRelation::Spanning,
            (true, false) => PolygonPlaneRelation::InFront,
            (false, true) => PolygonPlaneRelation::Behind,
            (false, false) => PolygonPlaneRelation::Coplanar,
        }
    }

    /// Walk the loop pairwise and distribute vertices to the front and back
    /// pieces, inserting an interpolated vertex at every sign change.
    ///
    /// The crossing vertex is always interpolated from the front endpoint
    /// toward the back endpoint, so neighbouring polygons sharing an edge
    /// produce the identical point. Both pieces keep the source's metadata,
    /// lineage id and exclusion flags.
    pub fn split_polygon<S: Clone + Send + Sync + Debug>(
        &self,
        polygon: &Polygon<S>,
    ) -> PolygonSplit<S> {
        use PointPlaneRelation::{Behind, InFront, On};

        let vertices = &polygon.vertices;
        let count = vertices.len();
        let mut front: Vec<Vertex> = Vec::with_capacity(count + 1);
        let mut back: Vec<Vertex> = Vec::with_capacity(count + 1);

        for i in 0..count {
            let previous = &vertices[(i + count - 1) % count];
            let current = &vertices[i];
            let previous_relation = self.compare_point(previous.pos);
            let current_relation = self.compare_point(current.pos);

            match (previous_relation, current_relation) {
                (InFront, InFront) => front.push(*current),
                (Behind, Behind) => back.push(*current),
                (Behind, InFront) => {
                    let intersection = self.crossing(current, previous);
                    front.push(intersection);
                    front.push(*current);
                    back.push(intersection);
                },
                (InFront, Behind) => {
                    let intersection = self.crossing(previous, current);
                    front.push(intersection);
                    back.push(intersection);
                    back.push(*current);
                },
                (_, On) => {
                    front.push(*current);
                    back.push(*current);
                },
                (On, Behind) => back.push(*current),
                (On, InFront) => front.push(*current),
            }
        }

        let front = Self::validated_piece(polygon, front);
        let back = Self::validated_piece(polygon, back);
        let complete = front.is_some() && back.is_some();
        PolygonSplit {
            front,
            back,
            complete,
        }
    }

    #[inline]
    fn crossing(&self, front: &Vertex, back: &Vertex) -> Vertex {
        let t = Edge::intersects_plane(self, front.pos, back.pos);
        front.lerp(back, t)
    }

    fn validated_piece<S: Clone + Send + Sync + Debug>(
        source: &Polygon<S>,
        vertices: Vec<Vertex>,
    ) -> Option<Polygon<S>> {
        if vertices.len() < 3 {
            return None;
        }
        let piece = source.with_vertices(vertices);
        if piece.plane.is_degenerate() {
            return None;
        }
        Some(piece)
    }

    /// The two points where this plane crosses the polygon's boundary, in
    /// loop order (entering the back side first, then leaving it).
    pub fn polygon_intersection<S: Clone + Send + Sync + Debug>(
        &self,
        polygon: &Polygon<S>,
    ) -> Option<(Vector3, Vector3)> {
        use PointPlaneRelation::{Behind, InFront, On};

        let vertices = &polygon.vertices;
        let count = vertices.len();
        let mut first: Option<Vector3> = None;
        let mut second: Option<Vector3> = None;

        for i in 0..count {
            let previous = &vertices[(i + count - 1) % count];
            let current = &vertices[i];

            match (self.compare_point(previous.pos), self.compare_point(current.pos)) {
                (InFront, Behind) => {
                    let t = Edge::intersects_plane(self, previous.pos, current.pos);
                    first = Some(previous.pos.lerp(current.pos, t));
                },
                (Behind, InFront) => {
                    let t = Edge::intersects_plane(self, current.pos, previous.pos);
                    second = Some(current.pos.lerp(previous.pos, t));
                },
                (InFront, On) => first = Some(current.pos),
                (Behind, On) => second = Some(current.pos),
                _ => {},
            }
        }

        first.zip(second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_define_ccw_normal() {
        let plane = Plane::from_points(Vector3::zeros(), Vector3::x(), Vector3::y());
        assert_eq!(plane.normal, Vector3::z());
        assert_eq!(plane.w, Real::ZERO);
        assert!(plane.is_axis_aligned());
    }

    #[test]
    fn collinear_points_are_degenerate() {
        let plane = Plane::from_points(Vector3::zeros(), Vector3::x(), Vector3::x() * Real::from_int(2));
        assert!(plane.is_degenerate());
    }

    #[test]
    fn classification_uses_signed_distance() {
        let plane = Plane::from_normal(Vector3::y(), Real::ONE);
        assert_eq!(plane.compare_point(Vector3::from_f64(0.0, 2.0, 0.0)), PointPlaneRelation::InFront);
        assert_eq!(plane.compare_point(Vector3::from_f64(0.0, 0.0, 0.0)), PointPlaneRelation::Behind);
        assert_eq!(plane.compare_point(Vector3::from_f64(3.0, 1.0005, 0.0)), PointPlaneRelation::On);
        assert_eq!(
            plane.compare_point_tight(Vector3::from_f64(3.0, 1.0005, 0.0)),
            PointPlaneRelation::InFront
        );
        assert_eq!(
            plane.closest_point(Vector3::from_f64(2.0, 5.0, -1.0)),
            Vector3::from_f64(2.0, 1.0, -1.0)
        );
    }

    #[test]
    fn looser_equality_matches_flipped() {
        let a = Plane::from_normal(Vector3::x(), Real::HALF);
        let b = Plane::from_normal(-Vector3::x(), -Real::from_f64(0.5004));
        assert!(!a.equals_with_epsilon(&b.flipped()));
        assert!(a.equals_looser_with_flip(&b));
        assert!(!a.equals_looser(&b));
    }
}
