//! Convex polygons carrying lineage ids and exclusion flags.

use crate::aabb::Aabb;
use crate::errors::ValidationError;
use crate::mesh::edge::Edge;
use crate::mesh::plane::Plane;
use crate::mesh::vertex::{Color, Vertex};
use crate::tolerance::Real;
use crate::vector::{Vector2, Vector3};
use std::fmt::Debug;

/// Lineage id carried by temporary polygons that trace back to no source face.
pub const NO_LINEAGE: i32 = -1;

/// A polygon, defined by an ordered loop of vertices.
///
/// The loop winds counter-clockwise when viewed from outside, and `plane` is
/// always derived from it (see [`Polygon::calculate_plane`]). Mutating
/// `vertices` directly requires calling `calculate_plane` afterwards;
/// [`Polygon::set_vertices`] does both.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<S: Clone> {
    /// Ordered vertex loop
    pub vertices: Vec<Vertex>,

    /// The plane on which this polygon lies
    pub plane: Plane,

    /// Generic metadata (the material)
    pub metadata: Option<S>,

    /// Lineage id, preserved through every split and copy
    pub unique_index: i32,

    /// Temporary face used only for classification; never emitted
    pub exclude_from_final: bool,

    /// Author-requested exclusion, independent of the CSG logic
    pub user_exclude_from_final: bool,
}

impl<S: Clone + Send + Sync + Debug> Polygon<S> {
    /// Create a polygon from a vertex loop. Fewer than three vertices is an
    /// error; a degenerate (collinear) loop is accepted but [`Polygon::is_valid`]
    /// reports false for it.
    pub fn new(vertices: Vec<Vertex>, metadata: Option<S>) -> Result<Self, ValidationError> {
        if vertices.len() < 3 {
            return Err(ValidationError::TooFewPoints {
                count: vertices.len(),
                at: vertices.first().map(|v| v.pos),
            });
        }
        Ok(Self::from_parts(vertices, metadata, NO_LINEAGE, false, false))
    }

    /// Polygon from bare positions, with every vertex normal set to the plane
    /// normal.
    pub fn from_positions(positions: &[Vector3], metadata: Option<S>) -> Result<Self, ValidationError> {
        let vertices = positions.iter().map(|p| Vertex::new(*p, Vector3::zeros())).collect();
        let mut polygon = Self::new(vertices, metadata)?;
        polygon.reset_vertex_normals();
        Ok(polygon)
    }

    pub(crate) fn from_parts(
        vertices: Vec<Vertex>,
        metadata: Option<S>,
        unique_index: i32,
        exclude_from_final: bool,
        user_exclude_from_final: bool,
    ) -> Self {
        let plane = Self::plane_for(&vertices);
        Polygon {
            vertices,
            plane,
            metadata,
            unique_index,
            exclude_from_final,
            user_exclude_from_final,
        }
    }

    /// Copy of this polygon's attributes around a new vertex loop.
    pub fn with_vertices(&self, vertices: Vec<Vertex>) -> Self {
        Self::from_parts(
            vertices,
            self.metadata.clone(),
            self.unique_index,
            self.exclude_from_final,
            self.user_exclude_from_final,
        )
    }

    pub fn with_unique_index(mut self, unique_index: i32) -> Self {
        self.unique_index = unique_index;
        self
    }

    /// Plane through the first valid vertex triple: (0, 1, 2), then
    /// (0, 1, i) for i ≥ 3. Zero normal when no triple is valid.
    fn plane_for(vertices: &[Vertex]) -> Plane {
        if vertices.len() < 3 {
            return Plane {
                normal: Vector3::zeros(),
                w: Real::ZERO,
            };
        }
        let plane = Plane::from_points(vertices[0].pos, vertices[1].pos, vertices[2].pos);
        if !plane.is_degenerate() {
            return plane;
        }
        vertices[3..]
            .iter()
            .map(|v| Plane::from_points(vertices[0].pos, vertices[1].pos, v.pos))
            .find(|p| !p.is_degenerate())
            .unwrap_or(plane)
    }

    pub fn calculate_plane(&mut self) {
        self.plane = Self::plane_for(&self.vertices);
    }

    pub fn set_vertices(&mut self, vertices: Vec<Vertex>) {
        self.vertices = vertices;
        self.calculate_plane();
    }

    /// At least three vertices and a non-degenerate normal.
    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= 3 && !self.plane.is_degenerate()
    }

    /// Reverse winding order, flip all normals and the plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        for v in &mut self.vertices {
            v.flip();
        }
        self.plane.flip();
    }

    pub fn flipped(&self) -> Self {
        let mut out = self.clone();
        out.flip();
        out
    }

    /// Average of the vertex positions.
    pub fn center(&self) -> Vector3 {
        if self.vertices.is_empty() {
            return Vector3::zeros();
        }
        let sum: Vector3 = self.vertices.iter().map(|v| v.pos).sum();
        sum / Real::from_int(self.vertices.len() as i32)
    }

    pub fn center_uv(&self) -> Vector2 {
        if self.vertices.is_empty() {
            return Vector2::zeros();
        }
        let sum = self
            .vertices
            .iter()
            .fold(Vector2::zeros(), |acc, v| acc + v.uv);
        sum / Real::from_int(self.vertices.len() as i32)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| v.pos))
            .unwrap_or_else(|| Aabb::from_point(Vector3::zeros()))
    }

    /// Area measured along the polygon's own normal. Negative if the loop
    /// disagrees with its plane, which only happens for non-convex input.
    pub fn area(&self) -> Real {
        if self.vertices.len() < 3 {
            return Real::ZERO;
        }
        let origin = self.vertices[0].pos;
        let twice = self
            .vertices
            .iter()
            .zip(self.vertices.iter().cycle().skip(1))
            .fold(Vector3::zeros(), |acc, (curr, next)| {
                acc + (curr.pos - origin).cross(next.pos - origin)
            });
        twice.dot(self.plane.normal) * Real::HALF
    }

    /// Direction of the first edge.
    pub fn tangent(&self) -> Vector3 {
        match self.vertices.as_slice() {
            [a, b, ..] => (b.pos - a.pos).normalize(),
            _ => Vector3::zeros(),
        }
    }

    pub fn edges(&self) -> impl Iterator<Item = Edge<'_>> + '_ {
        self.vertices
            .iter()
            .zip(self.vertices.iter().cycle().skip(1))
            .map(|(a, b)| Edge::new(a, b))
    }

    /// Fan triangulation from vertex 0. Every triangle keeps this polygon's
    /// lineage id, metadata and flags.
    pub fn triangulate(&self) -> Vec<Polygon<S>> {
        if self.vertices.len() < 3 {
            return Vec::new();
        }
        (1..self.vertices.len() - 1)
            .map(|i| {
                self.with_vertices(vec![self.vertices[0], self.vertices[i], self.vertices[i + 1]])
            })
            .collect()
    }

    /// Drop vertices that duplicate an earlier one within 1e-4.
    pub fn remove_extraneous_vertices(&mut self) {
        let mut unique: Vec<Vertex> = Vec::with_capacity(self.vertices.len());
        for v in &self.vertices {
            if !unique.iter().any(|u| u.pos.equals_with_epsilon_lower(v.pos)) {
                unique.push(*v);
            }
        }
        self.vertices = unique;
        if self.vertices.len() > 2 {
            self.calculate_plane();
        }
    }

    pub fn reset_vertex_normals(&mut self) {
        let normal = self.plane.normal;
        for v in &mut self.vertices {
            v.normal = normal;
        }
    }

    pub fn set_color(&mut self, color: Color) {
        for v in &mut self.vertices {
            v.color = color;
        }
    }

    /// Sets the metadata for the given polygon.
    pub fn set_metadata(&mut self, data: S) {
        self.metadata = Some(data);
    }

    /// Some edge of this polygon has exactly the candidate's endpoints, in
    /// either order.
    pub fn contains_edge(&self, candidate: &Edge) -> bool {
        self.find_edge(candidate).is_some()
    }

    pub fn find_edge(&self, candidate: &Edge) -> Option<Edge<'_>> {
        let (c1, c2) = (candidate.vertex1.pos, candidate.vertex2.pos);
        self.edges().find(|e| {
            (e.vertex1.pos == c1 && e.vertex2.pos == c2)
                || (e.vertex1.pos == c2 && e.vertex2.pos == c1)
        })
    }
}
