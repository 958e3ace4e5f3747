//! Convex brush primitives.
//!
//! All shapes are y-up and wind counter-clockwise viewed from outside.
//! Round shapes have radius 1 and span `y ∈ [-1, 1]`; side `i` runs from
//! angle `i·δ` to `(i+1)·δ` with positions `(sin θ, y, cos θ)`.

use crate::errors::ValidationError;
use crate::mesh::{NO_LINEAGE, Polygon, Vertex};
use crate::tolerance::{Real, TAU};
use crate::vector::{Vector2, Vector3};
use std::fmt::Debug;

/// Cube spanning `[-1, 1]` on every axis.
pub fn cube<S: Clone + Send + Sync + Debug>(metadata: Option<S>) -> Vec<Polygon<S>> {
    cuboid(Vector3::zeros(), Vector3::one(), metadata)
}

/// Axis-aligned box around `center`.
///
/// ## Corner layout
/// ```text
///       7-------6
///      /|      /|
///     4-------5 |
///     | 3-----|-2
///     |/      |/
///     0-------1
/// ```
/// Corner 0 is `center - half_extents`, x runs 0→1, y runs 0→4 and z
/// runs 0→3.
pub fn cuboid<S: Clone + Send + Sync + Debug>(
    center: Vector3,
    half_extents: Vector3,
    metadata: Option<S>,
) -> Vec<Polygon<S>> {
    let corner = |x: i32, y: i32, z: i32| {
        center
            + Vector3::new(
                half_extents.x * Real::from_int(x),
                half_extents.y * Real::from_int(y),
                half_extents.z * Real::from_int(z),
            )
    };
    let corners = [
        corner(-1, -1, -1),
        corner(1, -1, -1),
        corner(1, -1, 1),
        corner(-1, -1, 1),
        corner(-1, 1, -1),
        corner(1, 1, -1),
        corner(1, 1, 1),
        corner(-1, 1, 1),
    ];

    // (corner indices, normal), each loop counter-clockwise from outside
    let faces = [
        ([3, 2, 6, 7], Vector3::z()),
        ([0, 3, 7, 4], -Vector3::x()),
        ([2, 1, 5, 6], Vector3::x()),
        ([1, 0, 4, 5], -Vector3::z()),
        ([0, 1, 2, 3], -Vector3::y()),
        ([4, 7, 6, 5], Vector3::y()),
    ];
    // Bottom-right, bottom-left, top-left, top-right
    let uvs = [
        Vector2::new(Real::ONE, Real::ZERO),
        Vector2::zeros(),
        Vector2::new(Real::ZERO, Real::ONE),
        Vector2::new(Real::ONE, Real::ONE),
    ];

    faces
        .iter()
        .map(|(indices, normal)| {
            let vertices = indices
                .iter()
                .zip(uvs)
                .map(|(&i, uv)| Vertex::new(corners[i], *normal).with_uv(uv))
                .collect();
            Polygon::from_parts(vertices, metadata.clone(), NO_LINEAGE, false, false)
        })
        .collect()
}

/// Prism with `sides` flat faces. Each side's vertices share the facet
/// normal at the middle of its arc.
pub fn prism<S: Clone + Send + Sync + Debug>(
    sides: usize,
    metadata: Option<S>,
) -> Result<Vec<Polygon<S>>, ValidationError> {
    let delta = angle_delta(sides)?;
    let mut polygons = Vec::with_capacity(sides * 3);

    for i in 0..sides {
        let a = Real::from_int(i as i32) * delta;
        let b = Real::from_int(i as i32 + 1) * delta;
        let mid = (Real::from_int(i as i32) + Real::HALF) * delta;
        let normal = Vector3::new(mid.sin(), Real::ZERO, mid.cos());

        let vertices = vec![
            Vertex::new(rim(a, -Real::ONE), normal).with_uv(Vector2::zeros()),
            Vertex::new(rim(b, -Real::ONE), normal).with_uv(Vector2::new(Real::ONE, Real::ZERO)),
            Vertex::new(rim(b, Real::ONE), normal).with_uv(Vector2::new(Real::ONE, Real::ONE)),
            Vertex::new(rim(a, Real::ONE), normal).with_uv(Vector2::new(Real::ZERO, Real::ONE)),
        ];
        polygons.push(Polygon::from_parts(vertices, metadata.clone(), NO_LINEAGE, false, false));
    }

    push_caps(&mut polygons, sides, delta, &metadata);
    Ok(polygons)
}

/// Like [`prism`], but side normals point radially from each vertex so
/// the sides shade smoothly.
pub fn cylinder<S: Clone + Send + Sync + Debug>(
    sides: usize,
    metadata: Option<S>,
) -> Result<Vec<Polygon<S>>, ValidationError> {
    let delta = angle_delta(sides)?;
    let count = Real::from_int(sides as i32);
    let mut polygons = Vec::with_capacity(sides * 3);

    for i in 0..sides {
        let a = Real::from_int(i as i32) * delta;
        let b = Real::from_int(i as i32 + 1) * delta;
        let u0 = Real::from_int(i as i32) / count;
        let u1 = Real::from_int(i as i32 + 1) / count;
        let radial = |angle: Real| Vector3::new(angle.sin(), Real::ZERO, angle.cos());

        let vertices = vec![
            Vertex::new(rim(a, -Real::ONE), radial(a)).with_uv(Vector2::new(u0, Real::ZERO)),
            Vertex::new(rim(b, -Real::ONE), radial(b)).with_uv(Vector2::new(u1, Real::ZERO)),
            Vertex::new(rim(b, Real::ONE), radial(b)).with_uv(Vector2::new(u1, Real::ONE)),
            Vertex::new(rim(a, Real::ONE), radial(a)).with_uv(Vector2::new(u0, Real::ONE)),
        ];
        polygons.push(Polygon::from_parts(vertices, metadata.clone(), NO_LINEAGE, false, false));
    }

    push_caps(&mut polygons, sides, delta, &metadata);
    Ok(polygons)
}

fn angle_delta(sides: usize) -> Result<Real, ValidationError> {
    if sides < 3 || sides > i32::MAX as usize {
        return Err(ValidationError::TooFewPoints {
            count: sides,
            at: None,
        });
    }
    Ok(TAU / Real::from_int(sides as i32))
}

fn rim(angle: Real, y: Real) -> Vector3 {
    Vector3::new(angle.sin(), y, angle.cos())
}

/// Triangle fans closing the top (`y = 1`) and bottom (`y = -1`). The
/// bottom walks the angles backwards so it faces down.
fn push_caps<S: Clone + Send + Sync + Debug>(
    polygons: &mut Vec<Polygon<S>>,
    sides: usize,
    delta: Real,
    metadata: &Option<S>,
) {
    for (y, step) in [(Real::ONE, delta), (-Real::ONE, -delta)] {
        let normal = Vector3::new(Real::ZERO, y, Real::ZERO);
        let center = Vertex::new(Vector3::new(Real::ZERO, y, Real::ZERO), normal);
        for i in 0..sides {
            let a = Real::from_int(i as i32) * step;
            let b = Real::from_int(i as i32 + 1) * step;
            let vertices = vec![
                Vertex::new(rim(a, y), normal).with_uv(Vector2::new(a.abs().sin(), a.cos())),
                Vertex::new(rim(b, y), normal).with_uv(Vector2::new(b.abs().sin(), b.cos())),
                center,
            ];
            polygons.push(Polygon::from_parts(vertices, metadata.clone(), NO_LINEAGE, false, false));
        }
    }
}
