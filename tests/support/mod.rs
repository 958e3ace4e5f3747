//! Test support library
//! Provides brush builders and geometric checks shared by the integration tests.
#![allow(dead_code)]

use brushcsg::{
    Aabb, Brush, CsgMode, Polygon, Real, Vector3,
    geometry::polyhedron_contains_point_distance,
    shapes,
    tolerance::EPSILON,
};
use std::fmt::Debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install a test-friendly subscriber once. Honors `RUST_LOG`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer().compact())
        .with(filter)
        .try_init();
}

pub fn v(x: f64, y: f64, z: f64) -> Vector3 {
    Vector3::from_f64(x, y, z)
}

/// Axis-aligned box brush from its center and half extents.
pub fn box_brush(mode: CsgMode, center: [f64; 3], half: [f64; 3]) -> Brush<()> {
    box_brush_with(mode, center, half, None)
}

pub fn box_brush_with<S: Clone + Send + Sync + Debug>(
    mode: CsgMode,
    center: [f64; 3],
    half: [f64; 3],
    metadata: Option<S>,
) -> Brush<S> {
    let polygons = shapes::cuboid(
        v(center[0], center[1], center[2]),
        v(half[0], half[1], half[2]),
        metadata,
    );
    Brush::new(mode, polygons).unwrap()
}

/// Box brush spanning `min..max`.
pub fn span_brush(mode: CsgMode, min: [f64; 3], max: [f64; 3]) -> Brush<()> {
    let center = [
        (min[0] + max[0]) / 2.0,
        (min[1] + max[1]) / 2.0,
        (min[2] + max[2]) / 2.0,
    ];
    let half = [
        (max[0] - min[0]) / 2.0,
        (max[1] - min[1]) / 2.0,
        (max[2] - min[2]) / 2.0,
    ];
    box_brush(mode, center, half)
}

pub fn total_area<S: Clone + Send + Sync + Debug>(polygons: &[Polygon<S>]) -> f64 {
    polygons.iter().map(|p| p.area().to_f64()).sum()
}

pub fn bounding_box<S: Clone + Send + Sync + Debug>(polygons: &[Polygon<S>]) -> Aabb {
    Aabb::from_points(polygons.iter().flat_map(|p| p.vertices.iter().map(|v| v.pos))).unwrap()
}

/// Quick helper to compare fixed-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: f64) -> bool {
    (a - b).abs().to_f64() < eps
}

/// Polygons whose center lies strictly inside the convex `solid`.
pub fn polygons_inside<'a, S, T>(polygons: &'a [Polygon<S>], solid: &[Polygon<T>]) -> Vec<&'a Polygon<S>>
where
    S: Clone + Send + Sync + Debug,
    T: Clone + Send + Sync + Debug,
{
    polygons
        .iter()
        .filter(|p| polyhedron_contains_point_distance(solid, p.center()) > EPSILON)
        .collect()
}

/// Polygons whose plane normal matches `normal` and center lies on the
/// plane `normal·p = offset`.
pub fn faces_on<S: Clone + Send + Sync + Debug>(
    polygons: &[Polygon<S>],
    normal: Vector3,
    offset: f64,
) -> Vec<&Polygon<S>> {
    polygons
        .iter()
        .filter(|p| p.plane.normal.equals_within(normal, Real::from_f64(1e-6)))
        .filter(|p| (p.plane.normal.dot(p.center()).to_f64() - offset).abs() < 1e-6)
        .collect()
}
