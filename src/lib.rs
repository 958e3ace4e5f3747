//! Deterministic **brush-based Constructive Solid Geometry (CSG)**.
//!
//! A scene is an ordered list of convex brushes, each tagged *Add* or
//! *Subtract*. Every Add brush is evaluated on its own against the brushes
//! whose bounds it overlaps, producing the faces that remain visible. Faces
//! carved by a Subtract brush are "stolen" by the Add brushes around them
//! and re-attributed to the subtractive brush.
//!
//! All geometry runs on a Q32.32 fixed-point scalar ([`Fix64`]), so the same
//! input produces bit-identical output on every platform.
//!
//! # Features
//! #### Optional
//! - **parallel**: evaluate the brushes of a [`Scene`] rebuild with rayon
//!
//! # Example
//! ```
//! use brushcsg::{Brush, BuildPass, CsgMode, Scene, shapes, vector::Vector3};
//!
//! let room = Brush::new(CsgMode::Add, shapes::cube::<()>(None)).unwrap();
//! let hole = Brush::new(
//!     CsgMode::Subtract,
//!     shapes::cuboid(Vector3::zeros(), Vector3::from_f64(0.5, 0.5, 0.5), None),
//! )
//! .unwrap();
//!
//! let mut scene = Scene::new(vec![room, hole]).unwrap();
//! scene.rebuild_all();
//! assert_eq!(scene.all_built_polygons(BuildPass::Visual).len(), 12);
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod aabb;
pub mod brush;
pub mod errors;
pub mod fixed;
pub mod geometry;
pub mod mesh;
pub mod shapes;
pub mod tolerance;
pub mod vector;

pub use aabb::Aabb;
pub use brush::{
    Brush, BrushCache, BrushChunk, BuildOutput, BuildPass, BuildStats, CsgMode, Scene,
    StolenPolygon, build_brush,
};
pub use errors::ValidationError;
pub use fixed::Fix64;
pub use mesh::{Color, Plane, Polygon, Vertex};
pub use tolerance::Real;
pub use vector::{Vector2, Vector3};
