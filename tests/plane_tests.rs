mod support;

use brushcsg::{
    Polygon, Real, Vertex,
    mesh::{Color, Plane, PointPlaneRelation, PolygonPlaneRelation},
    tolerance::{EPSILON, TAU},
    vector::Vector2,
};
use support::*;

/// Regular N-gon of radius 1 in the z = 0 plane, counter-clockwise from +z.
fn regular_polygon(sides: i32) -> Polygon<()> {
    let step = TAU / Real::from_int(sides);
    let positions: Vec<_> = (0..sides)
        .map(|i| {
            let angle = Real::from_int(i) * step;
            brushcsg::Vector3::new(angle.cos(), angle.sin(), Real::ZERO)
        })
        .collect();
    Polygon::from_positions(&positions, None).unwrap()
}

#[test]
fn flip() {
    let mut plane = Plane::from_normal(v(0.0, 1.0, 0.0), Real::from_int(2));
    plane.flip();
    assert_eq!(plane.normal(), v(0.0, -1.0, 0.0));
    assert_eq!(plane.offset(), Real::from_int(-2));
}

#[test]
fn split_adds_exactly_two_vertices() {
    let planes = [
        Plane::from_normal(v(1.0, 0.0, 0.0), Real::from_f64(0.1)),
        Plane::from_normal(v(1.0, 1.0, 0.0), Real::from_f64(-0.2)),
        Plane::from_normal(v(0.3, -1.0, 0.5), Real::from_f64(0.04)),
    ];
    for sides in 3..=9 {
        let polygon = regular_polygon(sides);
        for plane in &planes {
            assert_eq!(plane.test_polygon(&polygon), PolygonPlaneRelation::Spanning);
            let split = plane.split_polygon(&polygon);
            assert!(split.complete, "{sides}-gon failed to split");
            let front = split.front.unwrap();
            let back = split.back.unwrap();

            assert_eq!(front.vertices.len() + back.vertices.len(), sides as usize + 2);
            for piece in [&front, &back] {
                assert!(piece.is_valid());
                assert_eq!(piece.plane.normal, polygon.plane.normal);
                assert!(piece.area() > Real::ZERO);
            }
            assert!(front.vertices.iter().all(|v| plane.distance_to_point(v.pos) >= -EPSILON));
            assert!(back.vertices.iter().all(|v| plane.distance_to_point(v.pos) <= EPSILON));
        }
    }
}

#[test]
fn split_pieces_share_the_crossing_vertices() {
    let polygon = regular_polygon(6);
    let plane = Plane::from_normal(v(0.0, 1.0, 0.0), Real::from_f64(0.3));
    let split = plane.split_polygon(&polygon);
    let front = split.front.unwrap();
    let back = split.back.unwrap();

    let shared: Vec<_> = front
        .vertices
        .iter()
        .filter(|f| back.vertices.iter().any(|b| b.pos == f.pos))
        .collect();
    assert_eq!(shared.len(), 2);
    for vertex in shared {
        assert_eq!(plane.compare_point(vertex.pos), PointPlaneRelation::On);
    }
}

#[test]
fn split_interpolates_attributes() {
    let polygon: Polygon<()> = Polygon::new(
        vec![
            Vertex::new(v(-1.0, -1.0, 0.0), v(0.0, 0.0, 1.0))
                .with_uv(Vector2::from_f64(0.0, 0.0))
                .with_color(Color::BLACK),
            Vertex::new(v(1.0, -1.0, 0.0), v(0.0, 0.0, 1.0))
                .with_uv(Vector2::from_f64(1.0, 0.0))
                .with_color(Color::WHITE),
            Vertex::new(v(1.0, 1.0, 0.0), v(0.0, 0.0, 1.0))
                .with_uv(Vector2::from_f64(1.0, 1.0))
                .with_color(Color::WHITE),
            Vertex::new(v(-1.0, 1.0, 0.0), v(0.0, 0.0, 1.0))
                .with_uv(Vector2::from_f64(0.0, 1.0))
                .with_color(Color::BLACK),
        ],
        None,
    )
    .unwrap()
    .with_unique_index(7);

    let plane = Plane::from_normal(v(1.0, 0.0, 0.0), Real::ZERO);
    let split = plane.split_polygon(&polygon);
    let back = split.back.unwrap();
    assert_eq!(back.unique_index, 7);

    let midpoint = back.vertices.iter().find(|vertex| vertex.pos == v(0.0, -1.0, 0.0)).unwrap();
    assert!(midpoint.uv.equals_within(Vector2::from_f64(0.5, 0.0), Real::from_f64(1e-6)));
    assert_eq!(midpoint.color, Color::new(128, 128, 128, 255));
}

#[test]
fn coplanar_and_one_sided_polygons() {
    let polygon = regular_polygon(5);
    let same = Plane::from_normal(v(0.0, 0.0, 1.0), Real::ZERO);
    assert_eq!(same.test_polygon(&polygon), PolygonPlaneRelation::Coplanar);
    assert_eq!(same.flipped().test_polygon(&polygon), PolygonPlaneRelation::Coplanar);

    let below = Plane::from_normal(v(0.0, 0.0, 1.0), Real::from_int(-1));
    assert_eq!(below.test_polygon(&polygon), PolygonPlaneRelation::InFront);
    assert_eq!(below.flipped().test_polygon(&polygon), PolygonPlaneRelation::Behind);
}

#[test]
fn grazing_plane_reports_a_partial_split() {
    // The plane only touches one corner
    let polygon = regular_polygon(4);
    let plane = Plane::from_normal(v(1.0, 0.0, 0.0), Real::ONE);
    let split = plane.split_polygon(&polygon);
    assert!(!split.complete);
    assert!(split.front.is_none());
    assert!(split.back.is_some());
}

#[test]
fn plane_through_polygon_yields_its_chord() {
    let polygon = regular_polygon(4);
    let plane = Plane::from_normal(v(0.0, 1.0, 0.0), Real::ZERO);
    let (a, b) = plane.polygon_intersection(&polygon).unwrap();
    assert!(approx_eq(a.distance(b), Real::from_int(2), 1e-4));
    assert!(a.y.abs() < EPSILON && b.y.abs() < EPSILON);
    let outside = Plane::from_normal(v(0.0, 1.0, 0.0), Real::from_int(3));
    assert!(outside.polygon_intersection(&polygon).is_none());
}

#[test]
fn robust_plane_ignores_a_thin_leading_sliver() {
    let vertices = [
        v(0.0, 0.0, 0.0),
        v(1.0, 0.0, 0.0),
        v(1.0, 0.000_01, 0.0),
        v(1.0, 1.0, 0.0),
        v(0.0, 1.0, 0.0),
    ]
    .map(|p| Vertex::new(p, v(0.0, 0.0, 1.0)));
    let plane = Plane::from_vertices(&vertices);
    assert!(plane.normal.equals_within(v(0.0, 0.0, 1.0), Real::from_f64(1e-9)));
    assert!(plane.is_axis_aligned());
}
