//! Validation errors

use crate::vector::Vector3;

/// All the possible construction-time issues we might encounter.
///
/// Evaluation itself never fails; these only guard the data-model boundary
/// where polygons, brushes and scenes are created.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// (TooFewPoints) A polygon has fewer than three vertices
    #[error("(TooFewPoints) A polygon needs at least 3 vertices, got {count} near: {at:?}")]
    TooFewPoints { count: usize, at: Option<Vector3> },
    /// (InvalidCoordinate) A source coordinate is NaN or infinite
    #[error("(InvalidCoordinate) The coordinate ({x}, {y}, {z}) has a NaN or infinite")]
    InvalidCoordinate { x: f64, y: f64, z: f64 },
    /// (EmptyBrush) A brush has no polygons
    #[error("(EmptyBrush) A brush must have at least one polygon")]
    EmptyBrush,
    /// (BrushIndexOutOfRange) A scene index does not name a brush
    #[error("(BrushIndexOutOfRange) Brush index {index} is out of range (brushes.len = {len})")]
    BrushIndexOutOfRange { index: usize, len: usize },
    /// (NonInvertibleTransform) A world transform cannot be inverted for normals
    #[error("(NonInvertibleTransform) The brush transform has no inverse")]
    NonInvertibleTransform,
}
