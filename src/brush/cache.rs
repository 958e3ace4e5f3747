//! Per-brush evaluation state shared between passes.

use crate::aabb::Aabb;
use crate::brush::builder::StolenPolygon;
use crate::brush::{Brush, BuildPass, CsgMode};
use crate::errors::ValidationError;
use crate::mesh::{Plane, Polygon};
use crate::vector::Vector3;
use std::fmt::Debug;

/// Everything the builder needs about one brush, precomputed once.
///
/// Source polygons get consecutive lineage ids starting at `first_uid`, so
/// source `i` owns id `first_uid + i`. The split planes are recomputed from
/// each polygon's vertices with the robust fit in [`Plane::from_vertices`].
#[derive(Debug, Clone)]
pub struct BrushCache<S: Clone> {
    mode: CsgMode,
    polygons: Vec<Polygon<S>>,
    split_planes: Vec<Plane>,
    bounds: Aabb,
    first_uid: i32,

    intersecting_visual: Vec<usize>,
    intersecting_collision: Vec<usize>,

    built_visual: Vec<Polygon<S>>,
    built_collision: Vec<Polygon<S>>,

    stolen_visual: Vec<StolenPolygon<S>>,
    stolen_collision: Vec<StolenPolygon<S>>,
}

impl<S: Clone + Send + Sync + Debug> BrushCache<S> {
    /// Build the cache for world-space `polygons`. Exclusion flags are
    /// cleared, since a source face is never temporary.
    pub fn new(mode: CsgMode, polygons: Vec<Polygon<S>>, first_uid: i32) -> Result<Self, ValidationError> {
        if polygons.is_empty() {
            return Err(ValidationError::EmptyBrush);
        }

        let polygons: Vec<Polygon<S>> = polygons
            .into_iter()
            .enumerate()
            .map(|(i, mut polygon)| {
                polygon.unique_index = first_uid + i as i32;
                polygon.exclude_from_final = false;
                polygon
            })
            .collect();

        let split_planes = polygons
            .iter()
            .map(|polygon| {
                let plane = Plane::from_vertices(&polygon.vertices);
                if plane.is_degenerate() {
                    tracing::warn!(
                        unique_index = polygon.unique_index,
                        "brush polygon has a degenerate plane and will not split anything"
                    );
                }
                plane
            })
            .collect();

        let bounds = Aabb::from_points(polygons.iter().flat_map(|p| p.vertices.iter().map(|v| v.pos)))
            .unwrap_or_else(|| Aabb::from_point(Vector3::zeros()));

        Ok(BrushCache {
            mode,
            built_visual: polygons.clone(),
            built_collision: polygons.clone(),
            polygons,
            split_planes,
            bounds,
            first_uid,
            intersecting_visual: Vec::new(),
            intersecting_collision: Vec::new(),
            stolen_visual: Vec::new(),
            stolen_collision: Vec::new(),
        })
    }

    /// Cache for a brush's world-space polygons.
    pub fn from_brush(brush: &Brush<S>, first_uid: i32) -> Result<Self, ValidationError> {
        Self::new(brush.mode, brush.world_polygons(), first_uid)
    }

    pub const fn mode(&self) -> CsgMode {
        self.mode
    }

    pub fn polygons(&self) -> &[Polygon<S>] {
        &self.polygons
    }

    pub fn split_planes(&self) -> &[Plane] {
        &self.split_planes
    }

    pub const fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub const fn first_uid(&self) -> i32 {
        self.first_uid
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Indices of the brushes overlapping this one for `pass`, ascending.
    pub fn intersecting(&self, pass: BuildPass) -> &[usize] {
        match pass {
            BuildPass::Visual => &self.intersecting_visual,
            BuildPass::Collision => &self.intersecting_collision,
        }
    }

    /// Replace the intersecting list for `pass`. The list is sorted and
    /// deduplicated, since evaluation depends on brush order.
    pub fn set_intersecting(&mut self, pass: BuildPass, mut indices: Vec<usize>) {
        indices.sort_unstable();
        indices.dedup();
        match pass {
            BuildPass::Visual => self.intersecting_visual = indices,
            BuildPass::Collision => self.intersecting_collision = indices,
        }
    }

    /// Result of the most recent evaluation for `pass`. Before any
    /// evaluation this is the source polygon set.
    pub fn built_polygons(&self, pass: BuildPass) -> &[Polygon<S>] {
        match pass {
            BuildPass::Visual => &self.built_visual,
            BuildPass::Collision => &self.built_collision,
        }
    }

    pub fn set_built_polygons(&mut self, pass: BuildPass, polygons: Vec<Polygon<S>>) {
        match pass {
            BuildPass::Visual => self.built_visual = polygons,
            BuildPass::Collision => self.built_collision = polygons,
        }
    }

    /// Faces later Add brushes took from this (Subtract) brush.
    pub fn stolen_polygons(&self, pass: BuildPass) -> &[StolenPolygon<S>] {
        match pass {
            BuildPass::Visual => &self.stolen_visual,
            BuildPass::Collision => &self.stolen_collision,
        }
    }

    /// Record the faces stolen from this brush. The built set of a Subtract
    /// brush is exactly its stolen faces, so it is replaced too.
    pub fn set_stolen_polygons(&mut self, pass: BuildPass, stolen: Vec<StolenPolygon<S>>) {
        let built = stolen.iter().map(|s| s.polygon.clone()).collect();
        self.set_built_polygons(pass, built);
        match pass {
            BuildPass::Visual => self.stolen_visual = stolen,
            BuildPass::Collision => self.stolen_collision = stolen,
        }
    }

    /// Lineage id range `first_uid .. first_uid + polygon_count`.
    pub fn owns_unique_index(&self, unique_index: i32) -> bool {
        unique_index >= self.first_uid && unique_index < self.first_uid + self.polygons.len() as i32
    }
}
