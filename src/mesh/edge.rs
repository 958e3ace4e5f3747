//! Borrowed polygon edges used for matching and intersection queries.

use crate::mesh::plane::Plane;
use crate::mesh::vertex::Vertex;
use crate::tolerance::{EPSILON, Real};
use crate::vector::Vector3;

/// An ordered pair of vertices borrowed from a polygon's loop.
///
/// Edges never own vertex data; they are views for comparisons only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge<'a> {
    pub vertex1: &'a Vertex,
    pub vertex2: &'a Vertex,
}

impl<'a> Edge<'a> {
    #[inline]
    pub const fn new(vertex1: &'a Vertex, vertex2: &'a Vertex) -> Self {
        Self { vertex1, vertex2 }
    }

    pub fn center(&self) -> Vector3 {
        (self.vertex1.pos + self.vertex2.pos) * Real::HALF
    }

    #[inline]
    pub fn direction(&self) -> Vector3 {
        self.vertex2.pos - self.vertex1.pos
    }

    /// Same endpoints within [`EPSILON`], in either order.
    pub fn matches(&self, other: &Edge) -> bool {
        let (a1, a2) = (self.vertex1.pos, self.vertex2.pos);
        let (b1, b2) = (other.vertex1.pos, other.vertex2.pos);
        (a1.equals_with_epsilon(b1) && a2.equals_with_epsilon(b2))
            || (a1.equals_with_epsilon(b2) && a2.equals_with_epsilon(b1))
    }

    /// Parallel edges that share an endpoint and run the same way from it,
    /// so they overlap along part of their length.
    pub fn intersects(&self, other: &Edge) -> bool {
        let dot = self.direction().normalize().dot(other.direction().normalize());
        if dot.abs() <= Real::ONE - EPSILON {
            return false;
        }

        let (a1, a2) = (self.vertex1.pos, self.vertex2.pos);
        let (b1, b2) = (other.vertex1.pos, other.vertex2.pos);

        // Deltas from the shared point to the far end of each edge
        let deltas = if a1.equals_with_epsilon(b1) {
            Some((a2 - a1, b2 - b1))
        } else if a2.equals_with_epsilon(b2) {
            Some((a1 - a2, b1 - b2))
        } else if a1.equals_with_epsilon(b2) {
            Some((a2 - a1, b1 - b2))
        } else if a2.equals_with_epsilon(b1) {
            Some((a1 - a2, b2 - b1))
        } else {
            None
        };

        match deltas {
            Some((d1, d2)) => d1.dot(d2) > Real::ZERO,
            None => false,
        }
    }

    /// Same direction and at least one shared endpoint.
    pub fn collinear(&self, other: &Edge) -> bool {
        let dot = self.direction().normalize().dot(other.direction().normalize());
        let parallel = dot > Real::ONE - EPSILON;

        let (a1, a2) = (self.vertex1.pos, self.vertex2.pos);
        let (b1, b2) = (other.vertex1.pos, other.vertex2.pos);
        let shared = a1.equals_with_epsilon(b1)
            || a2.equals_with_epsilon(b2)
            || a1.equals_with_epsilon(b2)
            || a2.equals_with_epsilon(b1);

        parallel && shared
    }

    /// Interpolant along `point1 → point2` where the segment meets `plane`.
    ///
    /// Not clamped; a segment that does not cross the plane yields a value
    /// outside [0, 1], and a segment parallel to it saturates.
    pub fn intersects_plane(plane: &Plane, point1: Vector3, point2: Vector3) -> Real {
        let d1 = plane.distance_to_point(point1);
        let d2 = plane.distance_to_point(point2);
        d1 / (d1 - d2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64, z: f64) -> Vertex {
        Vertex::new(Vector3::from_f64(x, y, z), Vector3::zeros())
    }

    #[test]
    fn matching_ignores_direction() {
        let (a, b) = (v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0));
        assert!(Edge::new(&a, &b).matches(&Edge::new(&b, &a)));
        let c = v(1.0, 0.1, 0.0);
        assert!(!Edge::new(&a, &b).matches(&Edge::new(&a, &c)));
    }

    #[test]
    fn overlapping_edges_intersect() {
        let (a, b, c) = (v(0.0, 0.0, 0.0), v(2.0, 0.0, 0.0), v(1.0, 0.0, 0.0));
        let d = v(-1.0, 0.0, 0.0);
        assert!(Edge::new(&a, &b).intersects(&Edge::new(&c, &a)));
        assert!(!Edge::new(&a, &b).intersects(&Edge::new(&a, &d)));
        assert!(Edge::new(&a, &b).collinear(&Edge::new(&a, &c)));
        assert!(!Edge::new(&a, &b).collinear(&Edge::new(&a, &d)));
    }

    #[test]
    fn plane_interpolant() {
        let plane = Plane::from_normal(Vector3::x(), Real::HALF);
        let t = Edge::intersects_plane(&plane, Vector3::zeros(), Vector3::from_f64(2.0, 0.0, 0.0));
        assert_eq!(t, Real::from_f64(0.25));
        assert_eq!(Edge::new(&v(0.0, 0.0, 0.0), &v(2.0, 2.0, 0.0)).center(), Vector3::from_f64(1.0, 1.0, 0.0));
    }
}
