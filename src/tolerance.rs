//! Scalar type and the tolerance tiers used by the CSG predicates.

use crate::fixed::Fix64;
use core::str::FromStr;
use std::sync::OnceLock;

/// Our Real scalar type.
pub type Real = Fix64;

/// Inside/outside band for the builder and general equality (≈1e-5).
pub const EPSILON: Real = Real::from_raw(42_950);
/// Vertex de-duplication distance (≈1e-4).
pub const EPSILON_LOWER: Real = Real::from_raw(429_497);
/// Point-plane classification, approximate bounds slack and polyhedron
/// containment (≈1e-3).
pub const EPSILON_LOWER_2: Real = Real::from_raw(4_294_967);
/// Loose vector comparison (≈1e-2).
pub const EPSILON_LOWER_3: Real = Real::from_raw(42_949_673);

/// Pi
pub const PI: Real = Real::PI;
/// π/2
pub const FRAC_PI_2: Real = Real::PI_OVER_2;
/// The full circle constant (τ)
pub const TAU: Real = Real::TAU;

/// Lazily-initialized plane classification tolerance.
/// Defaults to [`EPSILON_LOWER_2`], but can be overridden:
///  1) **Build-time**: set env var `BRUSHCSG_PLANE_EPSILON` (e.g. `BRUSHCSG_PLANE_EPSILON=5e-4 cargo build`)
///  2) **Runtime**: call [`set_plane_epsilon`] once before evaluating any brush
static PLANE_EPSILON_CELL: OnceLock<Real> = OnceLock::new();

/// Returns the current point-plane classification tolerance.
pub fn plane_epsilon() -> Real {
    *PLANE_EPSILON_CELL.get_or_init(|| {
        if let Some(environment_variable) = option_env!("BRUSHCSG_PLANE_EPSILON") {
            if let Ok(value) = f64::from_str(environment_variable) {
                return Real::from_f64(value).max(Real::PRECISION);
            }
        }
        EPSILON_LOWER_2
    })
}

/// Set the plane tolerance programmatically once (subsequent calls are ignored).
pub fn set_plane_epsilon(value: Real) {
    let _ = PLANE_EPSILON_CELL.set(value.max(Real::PRECISION));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_ordered() {
        assert!(EPSILON < EPSILON_LOWER);
        assert!(EPSILON_LOWER < EPSILON_LOWER_2);
        assert!(EPSILON_LOWER_2 < EPSILON_LOWER_3);
        assert!((EPSILON_LOWER_2.to_f64() - 1e-3).abs() < 1e-9);
    }
}
