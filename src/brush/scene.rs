//! Ordered brush list with cached evaluation state.

use crate::brush::builder::{BuildOutput, BuildStats, StolenPolygon, build_brush};
use crate::brush::cache::BrushCache;
use crate::brush::{Brush, BuildPass, CsgMode};
use crate::errors::ValidationError;
use crate::mesh::Polygon;
use hashbrown::HashMap;
use std::fmt::Debug;
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A host-side scene: brushes in evaluation order plus their caches.
///
/// The index of a brush in the scene is its evaluation order. Every brush
/// gets a lineage id range of its own, so a polygon's `unique_index`
/// identifies its source face across the whole scene.
#[derive(Debug, Clone)]
pub struct Scene<S: Clone> {
    brushes: Vec<Brush<S>>,
    caches: Vec<BrushCache<S>>,
    next_uid: i32,
}

impl<S: Clone + Send + Sync + Debug> Default for Scene<S> {
    fn default() -> Self {
        Scene {
            brushes: Vec::new(),
            caches: Vec::new(),
            next_uid: 0,
        }
    }
}

impl<S: Clone + Send + Sync + Debug> Scene<S> {
    /// Scene from brushes in evaluation order. Nothing is built yet; call
    /// [`Scene::rebuild_all`].
    pub fn new(brushes: Vec<Brush<S>>) -> Result<Self, ValidationError> {
        let mut scene = Scene::default();
        for brush in brushes {
            scene.insert(brush)?;
        }
        scene.refresh_intersections();
        Ok(scene)
    }

    /// Append a brush at the end of the evaluation order and return its index.
    pub fn push_brush(&mut self, brush: Brush<S>) -> Result<usize, ValidationError> {
        let index = self.insert(brush)?;
        self.refresh_intersections();
        Ok(index)
    }

    fn insert(&mut self, brush: Brush<S>) -> Result<usize, ValidationError> {
        let cache = BrushCache::from_brush(&brush, self.next_uid)?;
        self.next_uid += cache.polygon_count() as i32;
        self.brushes.push(brush);
        self.caches.push(cache);
        Ok(self.brushes.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.brushes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brushes.is_empty()
    }

    pub fn brushes(&self) -> &[Brush<S>] {
        &self.brushes
    }

    pub fn caches(&self) -> &[BrushCache<S>] {
        &self.caches
    }

    pub fn cache(&self, index: usize) -> Result<&BrushCache<S>, ValidationError> {
        self.caches.get(index).ok_or(ValidationError::BrushIndexOutOfRange {
            index,
            len: self.caches.len(),
        })
    }

    /// Swap the brush at `index` for a new one.
    ///
    /// A brush with the same polygon count keeps its lineage range, so its
    /// faces keep their identity (a move or a resize). Anything else counts
    /// as a new brush and gets a fresh range.
    pub fn replace_brush(&mut self, index: usize, brush: Brush<S>) -> Result<(), ValidationError> {
        let len = self.brushes.len();
        let old = self
            .caches
            .get(index)
            .ok_or(ValidationError::BrushIndexOutOfRange { index, len })?;

        let first_uid = if old.polygon_count() == brush.polygons.len() {
            old.first_uid()
        } else {
            self.next_uid
        };
        let cache = BrushCache::from_brush(&brush, first_uid)?;
        if first_uid == self.next_uid {
            self.next_uid += cache.polygon_count() as i32;
        }

        self.brushes[index] = brush;
        self.caches[index] = cache;
        self.refresh_intersections();
        Ok(())
    }

    /// Recompute every intersecting list from approximate bounds overlap.
    ///
    /// Only brushes taking part in a pass appear in that pass's lists, and a
    /// brush that does not take part gets an empty list.
    pub fn refresh_intersections(&mut self) {
        for pass in [BuildPass::Visual, BuildPass::Collision] {
            let lists: Vec<Vec<usize>> = (0..self.caches.len())
                .map(|i| {
                    if !self.brushes[i].participates_in(pass) {
                        return Vec::new();
                    }
                    let bounds = self.caches[i].bounds();
                    (0..self.caches.len())
                        .filter(|&j| {
                            j != i
                                && self.brushes[j].participates_in(pass)
                                && bounds.intersects_approximate(self.caches[j].bounds())
                        })
                        .collect()
                })
                .collect();

            let pairs: usize = lists.iter().map(Vec::len).sum();
            debug!(?pass, brushes = lists.len(), pairs, "intersections refreshed");

            for (cache, list) in self.caches.iter_mut().zip(lists) {
                cache.set_intersecting(pass, list);
            }
        }
    }

    /// Evaluate every brush for `pass` and store the results.
    ///
    /// Faces stolen by Add brushes are handed to the Subtract brushes they
    /// came from, and become those brushes' built set.
    pub fn rebuild(&mut self, pass: BuildPass) -> BuildStats {
        let active: Vec<bool> = self.brushes.iter().map(|b| b.participates_in(pass)).collect();
        let outputs = evaluate_all(&self.caches, &active, pass);

        let mut totals = BuildStats::default();
        let mut stolen_by_owner: HashMap<usize, Vec<StolenPolygon<S>>> = HashMap::new();

        for (index, output) in outputs.into_iter().enumerate() {
            let Some(output) = output else {
                self.caches[index].set_built_polygons(pass, Vec::new());
                continue;
            };
            totals.chunks += output.stats.chunks;
            totals.removed_sources += output.stats.removed_sources;
            totals.stolen += output.stats.stolen;
            totals.unmatched_interpolations += output.stats.unmatched_interpolations;

            for stolen in output.stolen {
                stolen_by_owner.entry(stolen.owner).or_default().push(stolen);
            }
            if self.caches[index].mode() == CsgMode::Add {
                self.caches[index].set_built_polygons(pass, output.polygons);
            }
        }

        for (index, cache) in self.caches.iter_mut().enumerate() {
            if cache.mode() == CsgMode::Subtract && active[index] {
                let stolen = stolen_by_owner.remove(&index).unwrap_or_default();
                cache.set_stolen_polygons(pass, stolen);
            }
        }

        info!(
            ?pass,
            brushes = self.caches.len(),
            chunks = totals.chunks,
            stolen = totals.stolen,
            unmatched = totals.unmatched_interpolations,
            "scene rebuilt"
        );
        totals
    }

    /// Rebuild both passes.
    pub fn rebuild_all(&mut self) {
        self.rebuild(BuildPass::Visual);
        self.rebuild(BuildPass::Collision);
    }

    /// Built polygons of one brush for `pass`.
    pub fn built_polygons(&self, index: usize, pass: BuildPass) -> Result<&[Polygon<S>], ValidationError> {
        Ok(self.cache(index)?.built_polygons(pass))
    }

    /// Final geometry of the whole scene for `pass`.
    ///
    /// Only Add brushes contribute. Stolen faces already sit in the output
    /// of the Add brush that stole them.
    pub fn all_built_polygons(&self, pass: BuildPass) -> Vec<Polygon<S>> {
        self.caches
            .iter()
            .zip(&self.brushes)
            .filter(|(cache, brush)| cache.mode() == CsgMode::Add && brush.participates_in(pass))
            .flat_map(|(cache, _)| cache.built_polygons(pass).iter().cloned())
            .collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_all<S: Clone + Send + Sync + Debug>(
    caches: &[BrushCache<S>],
    active: &[bool],
    pass: BuildPass,
) -> Vec<Option<BuildOutput<S>>> {
    (0..caches.len())
        .map(|i| active[i].then(|| build_brush(i, caches, pass)))
        .collect()
}

#[cfg(feature = "parallel")]
fn evaluate_all<S: Clone + Send + Sync + Debug>(
    caches: &[BrushCache<S>],
    active: &[bool],
    pass: BuildPass,
) -> Vec<Option<BuildOutput<S>>> {
    (0..caches.len())
        .into_par_iter()
        .map(|i| active[i].then(|| build_brush(i, caches, pass)))
        .collect()
}
