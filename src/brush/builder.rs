//! The per-brush CSG evaluator.
//!
//! An Add brush is evaluated against its intersecting brushes in two passes
//! over a set of convex chunks:
//!
//! 1. Structural splitting. Earlier brushes split the chunks. Later brushes
//!    split them and drop any piece that ends up fully inside.
//! 2. Interior classification. Add brushes (earlier or later) exclude the
//!    faces they contain. Earlier Subtract brushes restore faces an Add
//!    excluded. Later Subtract brushes steal the excluded faces lying on
//!    their surface and re-attribute them.
//!
//! The surviving faces are then merged. A source face whose removal counter
//! nets to zero is emitted as an exact copy of the source rather than as its
//! chunk fragments.
//!
//! Evaluation reads other brushes' source data only, never their built
//! results, so brushes can be evaluated in any order (or concurrently) as
//! long as the caches are not modified meanwhile.

use crate::brush::cache::BrushCache;
use crate::brush::chunk::BrushChunk;
use crate::brush::{BuildPass, CsgMode};
use crate::geometry::{
    calculate_interpolated, polygon_contains_polygon, polyhedron_contains_point_distance,
    polyhedron_contains_polyhedron,
};
use crate::mesh::{NO_LINEAGE, Polygon};
use crate::tolerance::{EPSILON, Real};
use crate::vector::Vector3;
use std::fmt::Debug;
use tracing::{debug, trace, warn};

/// A face taken over from a later Subtract brush, tagged with the index of
/// the brush it now belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct StolenPolygon<S: Clone> {
    pub owner: usize,
    pub polygon: Polygon<S>,
}

/// Counters gathered during one evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Chunks left after structural splitting
    pub chunks: usize,
    /// Source faces replaced by their fragments (non-zero removal counter)
    pub removed_sources: usize,
    pub stolen: usize,
    /// Stolen vertices that matched no triangle and used the fallback
    pub unmatched_interpolations: usize,
}

/// Result of [`build_brush`].
#[derive(Debug, Clone)]
pub struct BuildOutput<S: Clone> {
    pub polygons: Vec<Polygon<S>>,
    pub stolen: Vec<StolenPolygon<S>>,
    pub stats: BuildStats,
}

impl<S: Clone> BuildOutput<S> {
    fn unchanged(polygons: Vec<Polygon<S>>) -> Self {
        BuildOutput {
            polygons,
            stolen: Vec::new(),
            stats: BuildStats::default(),
        }
    }
}

/// Evaluate brush `index` of `caches` for `pass`.
///
/// Subtract brushes return their previously built set unchanged. Their
/// visible faces come from the Add brushes that steal them. An index outside
/// `caches` yields an empty output.
pub fn build_brush<S: Clone + Send + Sync + Debug>(
    index: usize,
    caches: &[BrushCache<S>],
    pass: BuildPass,
) -> BuildOutput<S> {
    let Some(cache) = caches.get(index) else {
        warn!(index, len = caches.len(), "build requested for a brush that does not exist");
        return BuildOutput::unchanged(Vec::new());
    };

    let span = tracing::debug_span!("build_brush", index, mode = ?cache.mode(), pass = ?pass);
    let _enter = span.enter();

    if cache.mode() == CsgMode::Subtract {
        return BuildOutput::unchanged(cache.built_polygons(pass).to_vec());
    }

    let others: Vec<(usize, &BrushCache<S>)> = cache
        .intersecting(pass)
        .iter()
        .copied()
        .filter(|&other| other != index)
        .filter_map(|other| caches.get(other).map(|c| (other, c)))
        .collect();

    let mut context = BuildContext::new(cache);

    for &(other_index, other) in &others {
        if other_index < index {
            context.split_by(other);
        } else {
            context.split_and_remove(other);
        }
    }
    trace!(chunks = context.chunks.len(), "structural split done");

    for &(other_index, other) in &others {
        match (other_index < index, other.mode()) {
            (_, CsgMode::Add) => context.remove_interior(other),
            (true, CsgMode::Subtract) => context.restore_interior(other),
            (false, CsgMode::Subtract) => context.extract_subtraction(other_index, other),
        }
    }
    trace!(
        chunks = context.chunks.len(),
        excluded = context.excluded.len(),
        "interior classification done"
    );

    let output = context.merge(cache);
    debug!(
        polygons = output.polygons.len(),
        stolen = output.stolen.len(),
        removed_sources = output.stats.removed_sources,
        "brush built"
    );
    output
}

/// Working state for one brush evaluation.
struct BuildContext<S: Clone> {
    chunks: Vec<BrushChunk<S>>,

    /// Net removals per source polygon, indexed by `unique_index - first_polygon_uid`
    polygons_removed: Vec<i32>,
    first_polygon_uid: i32,

    /// `(chunk, polygon)` handles of faces excluded by interior removal.
    /// Chunks are not split after pass 1, so handles stay valid.
    excluded: Vec<(usize, usize)>,

    stolen: Vec<StolenPolygon<S>>,
    unmatched_interpolations: usize,
}

impl<S: Clone + Send + Sync + Debug> BuildContext<S> {
    fn new(cache: &BrushCache<S>) -> Self {
        BuildContext {
            chunks: vec![BrushChunk::new(cache.polygons().to_vec())],
            polygons_removed: vec![0; cache.polygon_count()],
            first_polygon_uid: cache.first_uid(),
            excluded: Vec::new(),
            stolen: Vec::new(),
            unmatched_interpolations: 0,
        }
    }

    /// Slot for `unique_index`, if it belongs to this brush. Stolen faces
    /// carry foreign ids and have no slot.
    fn slot(&self, unique_index: i32) -> Option<usize> {
        let relative = unique_index.checked_sub(self.first_polygon_uid)?;
        usize::try_from(relative)
            .ok()
            .filter(|&i| i < self.polygons_removed.len())
    }

    fn mark_removed(&mut self, unique_index: i32) {
        if let Some(i) = self.slot(unique_index) {
            self.polygons_removed[i] += 1;
        }
    }

    fn mark_restored(&mut self, unique_index: i32) {
        if let Some(i) = self.slot(unique_index) {
            self.polygons_removed[i] -= 1;
        }
    }

    /// Split every chunk by each polygon plane of an earlier brush.
    fn split_by(&mut self, splitter: &BrushCache<S>) {
        let bounds = *splitter.bounds();
        for polygon in splitter.polygons() {
            let plane = polygon.plane;
            if plane.is_degenerate() {
                continue;
            }
            let mut next = Vec::with_capacity(self.chunks.len() + 1);
            for chunk in self.chunks.drain(..) {
                if !chunk.bounds().intersects_approximate(&bounds) {
                    next.push(chunk);
                    continue;
                }
                match chunk.split_by_plane(&plane) {
                    Some((inside, outside)) => {
                        next.push(outside);
                        next.push(inside);
                    },
                    None => next.push(chunk),
                }
            }
            self.chunks = next;
        }
    }

    /// Split by a later brush's planes and drop the pieces it contains.
    fn split_and_remove(&mut self, removee: &BrushCache<S>) {
        let bounds = *removee.bounds();
        for plane in removee.split_planes() {
            if plane.is_degenerate() {
                continue;
            }
            let chunks = std::mem::take(&mut self.chunks);
            let mut next = Vec::with_capacity(chunks.len() + 1);
            for chunk in chunks {
                if !chunk.bounds().intersects_approximate(&bounds) {
                    next.push(chunk);
                    continue;
                }
                match chunk.split_by_plane(plane) {
                    Some((inside, outside)) => {
                        next.push(outside);
                        if polyhedron_contains_polyhedron(removee.polygons(), inside.polygons()) {
                            self.discard(&inside);
                        } else {
                            next.push(inside);
                        }
                    },
                    None => {
                        if polyhedron_contains_polyhedron(removee.polygons(), chunk.polygons()) {
                            self.discard(&chunk);
                        } else {
                            next.push(chunk);
                        }
                    },
                }
            }
            self.chunks = next;
        }
    }

    fn discard(&mut self, chunk: &BrushChunk<S>) {
        for polygon in chunk.polygons() {
            if polygon.unique_index != NO_LINEAGE {
                self.mark_removed(polygon.unique_index);
            }
        }
    }

    /// Exclude faces lying inside `removee`, or on its boundary facing in.
    fn remove_interior(&mut self, removee: &BrushCache<S>) {
        let bounds = *removee.bounds();
        for chunk_index in 0..self.chunks.len() {
            if !self.chunks[chunk_index].bounds().intersects_approximate(&bounds) {
                continue;
            }
            for polygon_index in 0..self.chunks[chunk_index].polygons().len() {
                let polygon = &self.chunks[chunk_index].polygons()[polygon_index];
                if polygon.exclude_from_final || !lies_inside(removee, polygon) {
                    continue;
                }
                let unique_index = polygon.unique_index;
                self.chunks[chunk_index].polygons_mut()[polygon_index].exclude_from_final = true;
                self.mark_removed(unique_index);
                self.excluded.push((chunk_index, polygon_index));
            }
        }
    }

    /// Bring back excluded faces that an earlier subtraction carves free.
    fn restore_interior(&mut self, removee: &BrushCache<S>) {
        let bounds = *removee.bounds();
        let mut i = 0;
        while i < self.excluded.len() {
            let (chunk_index, polygon_index) = self.excluded[i];
            let polygon = &self.chunks[chunk_index].polygons()[polygon_index];
            if !bounds.contains_approximate(polygon.center()) || !lies_inside(removee, polygon) {
                i += 1;
                continue;
            }
            let unique_index = polygon.unique_index;
            self.chunks[chunk_index].polygons_mut()[polygon_index].exclude_from_final = false;
            self.mark_restored(unique_index);
            self.excluded.remove(i);
        }
    }

    /// Take over excluded faces lying on a later subtraction's surface.
    ///
    /// A stolen face gets the subtractive face's lineage, material and user
    /// exclusion. Its vertex attributes are sampled from that face, with the
    /// normal flipped since the face now bounds the cavity.
    fn extract_subtraction(&mut self, owner: usize, removee: &BrushCache<S>) {
        let bounds = *removee.bounds();
        let triangles: Vec<Vec<Polygon<S>>> = removee.polygons().iter().map(Polygon::triangulate).collect();

        for chunk in &mut self.chunks {
            if !chunk.bounds().intersects_approximate(&bounds) {
                continue;
            }
            for polygon in chunk.polygons_mut() {
                if !polygon.exclude_from_final {
                    continue;
                }
                let Some(k) = removee
                    .polygons()
                    .iter()
                    .position(|source| polygon_contains_polygon(source, &*polygon))
                else {
                    continue;
                };
                let source = &removee.polygons()[k];

                let mut stolen = polygon.clone();
                stolen.unique_index = source.unique_index;
                stolen.metadata = source.metadata.clone();
                stolen.exclude_from_final = false;
                stolen.user_exclude_from_final = source.user_exclude_from_final;
                for vertex in &mut stolen.vertices {
                    let sample = calculate_interpolated(&triangles[k], vertex.pos);
                    if !sample.matched {
                        self.unmatched_interpolations += 1;
                    }
                    vertex.normal = -sample.vertex.normal;
                    vertex.uv = sample.vertex.uv;
                    vertex.color = sample.vertex.color;
                }

                *polygon = stolen.clone();
                self.stolen.push(StolenPolygon {
                    owner,
                    polygon: stolen,
                });
            }
        }
    }

    /// Concatenate the chunks, swap untouched sources back in whole and
    /// strip everything still excluded.
    fn merge(self, source: &BrushCache<S>) -> BuildOutput<S> {
        let chunks = self.chunks.len();
        let mut polygons: Vec<Polygon<S>> = self
            .chunks
            .into_iter()
            .flat_map(BrushChunk::into_polygons)
            .collect();

        let mut removed_sources = 0;
        for (i, (&removed, source_polygon)) in self.polygons_removed.iter().zip(source.polygons()).enumerate() {
            if removed != 0 {
                removed_sources += 1;
                continue;
            }
            let unique_index = self.first_polygon_uid + i as i32;
            polygons.retain(|p| p.unique_index != unique_index);
            polygons.push(source_polygon.clone());
        }

        polygons.retain(|p| !p.exclude_from_final);

        BuildOutput {
            polygons,
            stats: BuildStats {
                chunks,
                removed_sources,
                stolen: self.stolen.len(),
                unmatched_interpolations: self.unmatched_interpolations,
            },
            stolen: self.stolen,
        }
    }
}

/// Interior test shared by removal and restoration: strictly inside, or on
/// the boundary with the face turned toward the brush's bounds centre.
fn lies_inside<S: Clone + Send + Sync + Debug>(removee: &BrushCache<S>, polygon: &Polygon<S>) -> bool {
    let center: Vector3 = polygon.center();
    let distance = polyhedron_contains_point_distance(removee.polygons(), center);
    if distance > EPSILON {
        return true;
    }
    distance >= -EPSILON && (removee.bounds().center() - center).dot(polygon.plane.normal) > Real::ZERO
}
