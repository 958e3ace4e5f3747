mod support;

use brushcsg::{BuildPass, CsgMode, Scene, ValidationError, shapes};
use support::*;

fn carved_room() -> Scene<()> {
    Scene::new(vec![
        box_brush(CsgMode::Add, [0.0; 3], [1.0; 3]),
        box_brush(CsgMode::Subtract, [0.0; 3], [0.5; 3]),
    ])
    .unwrap()
}

#[test]
fn rebuild_hands_stolen_faces_to_their_owner() {
    init_tracing();
    let mut scene = carved_room();
    let stats = scene.rebuild(BuildPass::Visual);
    assert_eq!(stats.stolen, 6);

    let hole = scene.cache(1).unwrap();
    assert_eq!(hole.stolen_polygons(BuildPass::Visual).len(), 6);
    assert_eq!(scene.built_polygons(1, BuildPass::Visual).unwrap().len(), 6);
    // The collision pass has not run yet
    assert!(hole.stolen_polygons(BuildPass::Collision).is_empty());

    // Stolen faces are not counted twice
    assert_eq!(scene.all_built_polygons(BuildPass::Visual).len(), 12);
}

#[test]
fn rebuild_all_fills_both_passes() {
    let mut scene = carved_room();
    scene.rebuild_all();
    for pass in [BuildPass::Visual, BuildPass::Collision] {
        let polygons = scene.all_built_polygons(pass);
        assert_eq!(polygons.len(), 12);
        // 6 outer faces of area 4 plus 6 inner faces of area 1
        assert!((total_area(&polygons) - 30.0).abs() < 1e-6);
    }
}

#[test]
fn rebuild_is_deterministic() {
    let build = || {
        let mut scene = Scene::new(vec![
            box_brush(CsgMode::Add, [0.0; 3], [1.0; 3]),
            box_brush(CsgMode::Add, [0.7, 0.3, -0.2], [0.6, 0.9, 0.4]),
            box_brush(CsgMode::Subtract, [0.2, 0.1, 0.0], [0.3, 0.3, 1.5]),
        ])
        .unwrap();
        scene.rebuild(BuildPass::Visual);
        scene.all_built_polygons(BuildPass::Visual)
    };
    assert_eq!(build(), build());
}

#[test]
fn collision_only_brushes_stay_out_of_the_visual_pass() {
    let mut scene = Scene::new(vec![
        box_brush(CsgMode::Add, [0.0; 3], [0.5; 3]),
        box_brush(CsgMode::Add, [0.5, 0.0, 0.0], [0.5; 3]).collision_only(),
    ])
    .unwrap();
    scene.rebuild_all();

    let visual = scene.all_built_polygons(BuildPass::Visual);
    assert_eq!(visual.len(), 6);
    assert!(scene.built_polygons(1, BuildPass::Visual).unwrap().is_empty());

    let collision = scene.all_built_polygons(BuildPass::Collision);
    assert_eq!(collision.len(), 10);
}

#[test]
fn replacing_a_brush_moves_its_geometry() {
    let mut scene = carved_room();
    scene.rebuild(BuildPass::Visual);

    // Move the hole out of the room: nothing is stolen any more
    scene
        .replace_brush(1, box_brush(CsgMode::Subtract, [5.0, 0.0, 0.0], [0.5; 3]))
        .unwrap();
    assert!(scene.caches()[0].intersecting(BuildPass::Visual).is_empty());
    scene.rebuild(BuildPass::Visual);
    assert_eq!(scene.all_built_polygons(BuildPass::Visual).len(), 6);
    assert!(scene.built_polygons(1, BuildPass::Visual).unwrap().is_empty());
}

#[test]
fn prism_brushes_build() {
    let prism = brushcsg::Brush::new(CsgMode::Add, shapes::prism(8, None).unwrap()).unwrap();
    let mut scene = Scene::new(vec![prism]).unwrap();
    scene.push_brush(box_brush(CsgMode::Subtract, [0.0, 1.0, 0.0], [0.25; 3])).unwrap();
    let stats = scene.rebuild(BuildPass::Visual);

    // The notch in the top cap is lined with the subtraction's faces
    assert_eq!(stats.unmatched_interpolations, 0);
    assert_eq!(scene.cache(1).unwrap().stolen_polygons(BuildPass::Visual).len(), 5);
    assert!(
        scene
            .all_built_polygons(BuildPass::Visual)
            .iter()
            .all(|p| p.is_valid())
    );
}

#[test]
fn out_of_range_lookups_are_errors() {
    let scene = carved_room();
    assert_eq!(
        scene.built_polygons(2, BuildPass::Visual).unwrap_err(),
        ValidationError::BrushIndexOutOfRange { index: 2, len: 2 }
    );
    assert!(scene.cache(7).is_err());
}

#[test]
fn empty_brush_is_rejected_by_the_scene() {
    let mut scene = carved_room();
    let polygons = shapes::cube::<()>(None);
    let mut brush = brushcsg::Brush::new(CsgMode::Add, polygons).unwrap();
    brush.polygons.clear();
    assert_eq!(scene.push_brush(brush).unwrap_err(), ValidationError::EmptyBrush);
    assert_eq!(scene.len(), 2);
}
