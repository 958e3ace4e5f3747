mod support;

use brushcsg::{
    Polygon, Real, ValidationError, Vertex,
    mesh::{Color, NO_LINEAGE, edge::Edge},
    shapes,
};
use support::*;

fn unit_square(metadata: Option<&'static str>) -> Polygon<&'static str> {
    Polygon::from_positions(
        &[v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(1.0, 1.0, 0.0), v(0.0, 1.0, 0.0)],
        metadata,
    )
    .unwrap()
}

#[test]
fn construction() {
    let polygon = unit_square(None);
    assert_eq!(polygon.vertices.len(), 4);
    assert_eq!(polygon.unique_index, NO_LINEAGE);
    assert!(!polygon.exclude_from_final && !polygon.user_exclude_from_final);
    assert_eq!(polygon.plane.normal, v(0.0, 0.0, 1.0));
    assert!(polygon.vertices.iter().all(|vertex| vertex.normal == polygon.plane.normal));
    assert!(approx_eq(polygon.area(), Real::ONE, 1e-9));
}

#[test]
fn cube_faces_point_outward() {
    for face in shapes::cube::<()>(None) {
        assert!(face.is_valid());
        assert!(face.plane.normal.dot(face.center()) > Real::ZERO);
        assert!(approx_eq(face.plane.offset(), Real::ONE, 1e-9));
        assert!(approx_eq(face.area(), Real::from_int(4), 1e-9));
    }
}

#[test]
fn too_few_points() {
    let err = Polygon::<()>::new(
        vec![
            Vertex::new(v(2.0, 0.0, 0.0), v(0.0, 0.0, 1.0)),
            Vertex::new(v(3.0, 0.0, 0.0), v(0.0, 0.0, 1.0)),
        ],
        None,
    )
    .unwrap_err();
    assert_eq!(
        err,
        ValidationError::TooFewPoints {
            count: 2,
            at: Some(v(2.0, 0.0, 0.0))
        }
    );
    assert!(err.to_string().starts_with("(TooFewPoints)"));
}

#[test]
fn collinear_loop_is_not_valid() {
    let polygon: Polygon<()> =
        Polygon::from_positions(&[v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(2.0, 0.0, 0.0)], None)
            .unwrap();
    assert!(!polygon.is_valid());
    assert!(polygon.plane.is_degenerate());
}

#[test]
fn flip() {
    let polygon = unit_square(Some("wall")).with_unique_index(3);
    let flipped = polygon.flipped();
    assert_eq!(flipped.plane.normal, v(0.0, 0.0, -1.0));
    assert_eq!(flipped.vertices[0].pos, polygon.vertices[3].pos);
    assert!(flipped.vertices.iter().all(|vertex| vertex.normal == v(0.0, 0.0, -1.0)));
    assert_eq!(flipped.unique_index, 3);
    assert_eq!(flipped.metadata, Some("wall"));
    assert!(approx_eq(flipped.area(), Real::ONE, 1e-9));
    assert_eq!(flipped.flipped(), polygon);
}

#[test]
fn triangulate_keeps_lineage() {
    let mut polygon = unit_square(Some("floor")).with_unique_index(11);
    polygon.user_exclude_from_final = true;
    let triangles = polygon.triangulate();

    assert_eq!(triangles.len(), 2);
    for triangle in &triangles {
        assert_eq!(triangle.vertices.len(), 3);
        assert_eq!(triangle.unique_index, 11);
        assert_eq!(triangle.metadata, Some("floor"));
        assert!(triangle.user_exclude_from_final);
        assert_eq!(triangle.plane.normal, polygon.plane.normal);
    }
    let area: f64 = triangles.iter().map(|t| t.area().to_f64()).sum();
    assert!((area - 1.0).abs() < 1e-9);
}

#[test]
fn center_and_bounds() {
    let polygon = unit_square(None);
    assert_eq!(polygon.center(), v(0.5, 0.5, 0.0));
    let bounds = polygon.bounds();
    assert_eq!(bounds.mins, v(0.0, 0.0, 0.0));
    assert_eq!(bounds.maxs, v(1.0, 1.0, 0.0));
    assert_eq!(polygon.tangent(), v(1.0, 0.0, 0.0));
}

#[test]
fn remove_extraneous_vertices() {
    let mut polygon: Polygon<()> = Polygon::from_positions(
        &[
            v(0.0, 0.0, 0.0),
            v(1.0, 0.0, 0.0),
            v(1.0, 0.000_01, 0.0),
            v(1.0, 1.0, 0.0),
            v(0.0, 1.0, 0.0),
        ],
        None,
    )
    .unwrap();
    polygon.remove_extraneous_vertices();
    assert_eq!(polygon.vertices.len(), 4);
    assert_eq!(polygon.plane.normal, v(0.0, 0.0, 1.0));
}

#[test]
fn edges_are_matched_in_either_direction() {
    let polygon = unit_square(None);
    assert_eq!(polygon.edges().count(), 4);

    let a = Vertex::new(v(1.0, 1.0, 0.0), v(0.0, 0.0, 1.0));
    let b = Vertex::new(v(1.0, 0.0, 0.0), v(0.0, 0.0, 1.0));
    let reversed = Edge::new(&a, &b);
    assert!(polygon.contains_edge(&reversed));
    let found = polygon.find_edge(&reversed).unwrap();
    assert_eq!(found.vertex1.pos, v(1.0, 0.0, 0.0));

    let c = Vertex::new(v(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0));
    assert!(!polygon.contains_edge(&Edge::new(&a, &c)));
}

#[test]
fn attributes_can_be_rewritten() {
    let mut polygon = unit_square(None);
    polygon.set_metadata("ceiling");
    polygon.set_color(Color::BLACK);
    assert_eq!(polygon.metadata, Some("ceiling"));
    assert!(polygon.vertices.iter().all(|vertex| vertex.color == Color::BLACK));

    let moved: Vec<Vertex> = polygon
        .vertices
        .iter()
        .map(|vertex| Vertex::new(vertex.pos + v(0.0, 0.0, 2.0), vertex.normal))
        .collect();
    polygon.set_vertices(moved);
    assert!(approx_eq(polygon.plane.offset(), Real::from_int(2), 1e-9));
}
