//! Brushes: convex solids tagged Add or Subtract, and the machinery that
//! evaluates them into a final polygon set.

use crate::errors::ValidationError;
use crate::mesh::{Polygon, Vertex};
use crate::vector::Vector3;
use nalgebra::{Matrix3, Matrix4, Point3};
use std::fmt::Debug;

pub mod builder;
pub mod cache;
pub mod chunk;
pub mod scene;

pub use builder::{BuildOutput, BuildStats, StolenPolygon, build_brush};
pub use cache::BrushCache;
pub use chunk::BrushChunk;
pub use scene::Scene;

/// How a brush combines with the brushes before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CsgMode {
    Add,
    Subtract,
}

/// Which output channel an evaluation produces. Both run the same algorithm
/// over separately filtered intersecting lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildPass {
    Visual,
    Collision,
}

/// A convex solid in brush-local space plus its world transform.
#[derive(Debug, Clone)]
pub struct Brush<S: Clone> {
    pub mode: CsgMode,
    /// Local-space polygons, counter-clockwise viewed from outside
    pub polygons: Vec<Polygon<S>>,
    transform: Matrix4<f64>,
    /// Inverse-transpose of the linear part, for normals
    normal_matrix: Matrix3<f64>,
    /// Takes part in the visual pass
    pub is_visible: bool,
    /// Takes part in the collision pass
    pub has_collision: bool,
}

impl<S: Clone + Send + Sync + Debug> Brush<S> {
    /// A visible, colliding brush at the origin. Every polygon must have at
    /// least three vertices and there must be at least one polygon.
    pub fn new(mode: CsgMode, polygons: Vec<Polygon<S>>) -> Result<Self, ValidationError> {
        if polygons.is_empty() {
            return Err(ValidationError::EmptyBrush);
        }
        if let Some(bad) = polygons.iter().find(|p| p.vertices.len() < 3) {
            return Err(ValidationError::TooFewPoints {
                count: bad.vertices.len(),
                at: bad.vertices.first().map(|v| v.pos),
            });
        }
        Ok(Brush {
            mode,
            polygons,
            transform: Matrix4::identity(),
            normal_matrix: Matrix3::identity(),
            is_visible: true,
            has_collision: true,
        })
    }

    /// Replace the world transform. The linear part must be invertible so
    /// normals can be carried through it.
    pub fn with_transform(mut self, transform: Matrix4<f64>) -> Result<Self, ValidationError> {
        if transform.iter().any(|c| !c.is_finite()) {
            return Err(ValidationError::NonInvertibleTransform);
        }
        let linear: Matrix3<f64> = transform.fixed_view::<3, 3>(0, 0).into_owned();
        let inverse = linear
            .try_inverse()
            .ok_or(ValidationError::NonInvertibleTransform)?;
        self.normal_matrix = inverse.transpose();
        self.transform = transform;
        Ok(self)
    }

    /// Shorthand for a pure translation.
    pub fn translated(self, offset: Vector3) -> Self {
        let translation = Matrix4::new_translation(&offset.to_nalgebra());
        // A translation always inverts
        Brush {
            transform: translation * self.transform,
            ..self
        }
    }

    /// Collision-only brushes are invisible but still collide.
    pub fn collision_only(mut self) -> Self {
        self.is_visible = false;
        self.has_collision = true;
        self
    }

    /// Visual-only brushes are drawn but skipped by the collision pass.
    pub fn without_collision(mut self) -> Self {
        self.has_collision = false;
        self
    }

    pub const fn transform(&self) -> &Matrix4<f64> {
        &self.transform
    }

    pub fn participates_in(&self, pass: BuildPass) -> bool {
        match pass {
            BuildPass::Visual => self.is_visible,
            BuildPass::Collision => self.has_collision,
        }
    }

    /// Polygons carried into world space. Mirroring transforms reverse each
    /// loop so the winding stays counter-clockwise from outside.
    pub fn world_polygons(&self) -> Vec<Polygon<S>> {
        if self.transform == Matrix4::identity() {
            return self.polygons.clone();
        }
        let mirrored = self.normal_matrix.determinant() < 0.0;
        self.polygons
            .iter()
            .map(|polygon| {
                let mut vertices: Vec<Vertex> = polygon
                    .vertices
                    .iter()
                    .map(|v| {
                        let pos = self.transform.transform_point(&Point3::from(v.pos));
                        let normal = self.normal_matrix * v.normal.to_nalgebra();
                        let normal = if normal.norm() > 0.0 {
                            normal.normalize()
                        } else {
                            normal
                        };
                        Vertex {
                            pos: Vector3::from(pos),
                            normal: Vector3::from(normal),
                            ..*v
                        }
                    })
                    .collect();
                if mirrored {
                    vertices.reverse();
                }
                polygon.with_vertices(vertices)
            })
            .collect()
    }
}
