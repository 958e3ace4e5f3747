//! Polygon primitives: vertices, edges, planes and polygons.

pub mod edge;
pub mod plane;
pub mod polygon;
pub mod vertex;

pub use edge::Edge;
pub use plane::{Plane, PointPlaneRelation, PolygonPlaneRelation, PolygonSplit};
pub use polygon::{NO_LINEAGE, Polygon};
pub use vertex::{Color, Vertex};
