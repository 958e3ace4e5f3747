//! Fixed-point vector types.

use crate::fixed::{Fix64, isqrt};
use crate::tolerance::{EPSILON, EPSILON_LOWER, EPSILON_LOWER_2, EPSILON_LOWER_3, Real};
use core::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};
use approx::{AbsDiffEq, RelativeEq};
use nalgebra::{Point3, Vector3 as NVector3};

/* ----------------------------- Vector3 ----------------------------- */

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vector3 {
    pub x: Real,
    pub y: Real,
    pub z: Real,
}

impl Vector3 {
    #[inline]
    pub const fn new(x: Real, y: Real, z: Real) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn from_f64(x: f64, y: f64, z: f64) -> Self {
        Self::new(Real::from_f64(x), Real::from_f64(y), Real::from_f64(z))
    }

    #[inline]
    pub const fn zeros() -> Self {
        Self::new(Real::ZERO, Real::ZERO, Real::ZERO)
    }

    #[inline]
    pub const fn one() -> Self {
        Self::new(Real::ONE, Real::ONE, Real::ONE)
    }

    #[inline]
    pub const fn x() -> Self {
        Self::new(Real::ONE, Real::ZERO, Real::ZERO)
    }

    #[inline]
    pub const fn y() -> Self {
        Self::new(Real::ZERO, Real::ONE, Real::ZERO)
    }

    #[inline]
    pub const fn z() -> Self {
        Self::new(Real::ZERO, Real::ZERO, Real::ONE)
    }

    /// Fixed point has no infinity; these stand in for it when seeding bounds.
    #[inline]
    pub const fn max_value() -> Self {
        Self::new(Real::MAX, Real::MAX, Real::MAX)
    }

    #[inline]
    pub const fn min_value() -> Self {
        Self::new(Real::MIN, Real::MIN, Real::MIN)
    }

    #[inline]
    pub fn dot(self, rhs: Self) -> Real {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline]
    pub fn cross(self, rhs: Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    #[inline]
    pub fn norm_squared(self) -> Real {
        self.dot(self)
    }

    /// Euclidean length, computed on the raw 128-bit sum of squares so short
    /// vectors keep their full precision.
    pub fn norm(self) -> Real {
        let sum = [self.x, self.y, self.z]
            .iter()
            .map(|c| {
                let raw = c.raw().unsigned_abs() as u128;
                raw * raw
            })
            .fold(0u128, |acc, sq| acc.saturating_add(sq));
        let root = isqrt(sum);
        if root > i64::MAX as u128 {
            Real::MAX
        } else {
            Real::from_raw(root as i64)
        }
    }

    /// Unit vector in the same direction, or zero when the length is below
    /// [`EPSILON`].
    pub fn normalize(self) -> Self {
        let n = self.norm();
        if n < EPSILON {
            return Self::zeros();
        }
        self / n
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.x.is_zero() && self.y.is_zero() && self.z.is_zero()
    }

    #[inline]
    pub fn distance(self, other: Self) -> Real {
        (other - self).norm()
    }

    #[inline]
    pub fn lerp(self, other: Self, t: Real) -> Self {
        self + (other - self) * t
    }

    #[inline]
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    #[inline]
    pub fn component_mul(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    #[inline]
    pub fn component_min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    #[inline]
    pub fn component_max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    /// Per-component comparison within `epsilon`.
    #[inline]
    pub fn equals_within(self, other: Self, epsilon: Real) -> bool {
        (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.z - other.z).abs() < epsilon
    }

    #[inline]
    pub fn equals_with_epsilon(self, other: Self) -> bool {
        self.equals_within(other, EPSILON)
    }

    #[inline]
    pub fn equals_with_epsilon_lower(self, other: Self) -> bool {
        self.equals_within(other, EPSILON_LOWER)
    }

    #[inline]
    pub fn equals_with_epsilon_lower_3(self, other: Self) -> bool {
        self.equals_within(other, EPSILON_LOWER_3)
    }

    /// Number of components whose magnitude exceeds 1e-3.
    pub fn set_axis_count(self) -> usize {
        [self.x, self.y, self.z]
            .iter()
            .filter(|c| c.abs() > EPSILON_LOWER_2)
            .count()
    }

    pub fn to_point3(self) -> Point3<f64> {
        Point3::new(self.x.to_f64(), self.y.to_f64(), self.z.to_f64())
    }

    pub fn to_nalgebra(self) -> NVector3<f64> {
        NVector3::new(self.x.to_f64(), self.y.to_f64(), self.z.to_f64())
    }
}

impl From<Point3<f64>> for Vector3 {
    fn from(p: Point3<f64>) -> Self {
        Self::from_f64(p.x, p.y, p.z)
    }
}

impl From<NVector3<f64>> for Vector3 {
    fn from(v: NVector3<f64>) -> Self {
        Self::from_f64(v.x, v.y, v.z)
    }
}

impl From<Vector3> for Point3<f64> {
    fn from(v: Vector3) -> Self {
        v.to_point3()
    }
}

impl Index<usize> for Vector3 {
    type Output = Real;
    fn index(&self, axis: usize) -> &Real {
        match axis {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vector3 axis {axis} out of range"),
        }
    }
}

impl IndexMut<usize> for Vector3 {
    fn index_mut(&mut self, axis: usize) -> &mut Real {
        match axis {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Vector3 axis {axis} out of range"),
        }
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, r: Self) -> Self {
        Self::new(self.x + r.x, self.y + r.y, self.z + r.z)
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, r: Self) -> Self {
        Self::new(self.x - r.x, self.y - r.y, self.z - r.z)
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<Real> for Vector3 {
    type Output = Self;

    fn mul(self, s: Real) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Mul<Vector3> for Real {
    type Output = Vector3;

    fn mul(self, v: Vector3) -> Vector3 {
        v * self
    }
}

impl Div<Real> for Vector3 {
    type Output = Self;

    fn div(self, s: Real) -> Self {
        Self::new(self.x / s, self.y / s, self.z / s)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, r: Self) {
        *self = *self + r;
    }
}

impl SubAssign for Vector3 {
    fn sub_assign(&mut self, r: Self) {
        *self = *self - r;
    }
}

impl MulAssign<Real> for Vector3 {
    fn mul_assign(&mut self, s: Real) {
        *self = *self * s;
    }
}

impl DivAssign<Real> for Vector3 {
    fn div_assign(&mut self, s: Real) {
        *self = *self / s;
    }
}

impl core::iter::Sum for Vector3 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zeros(), |acc, v| acc + v)
    }
}

impl AbsDiffEq for Vector3 {
    type Epsilon = Fix64;

    fn default_epsilon() -> Self::Epsilon {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}

impl RelativeEq for Vector3 {
    fn default_max_relative() -> Self::Epsilon {
        EPSILON
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
    }
}

/* ----------------------------- Vector2 ----------------------------- */

/// Texture coordinate pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vector2 {
    pub x: Real,
    pub y: Real,
}

impl Vector2 {
    #[inline]
    pub const fn new(x: Real, y: Real) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn from_f64(x: f64, y: f64) -> Self {
        Self::new(Real::from_f64(x), Real::from_f64(y))
    }

    #[inline]
    pub const fn zeros() -> Self {
        Self::new(Real::ZERO, Real::ZERO)
    }

    #[inline]
    pub fn lerp(self, other: Self, t: Real) -> Self {
        self + (other - self) * t
    }

    #[inline]
    pub fn equals_within(self, other: Self, epsilon: Real) -> bool {
        (self.x - other.x).abs() < epsilon && (self.y - other.y).abs() < epsilon
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, r: Self) -> Self {
        Self::new(self.x + r.x, self.y + r.y)
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, r: Self) -> Self {
        Self::new(self.x - r.x, self.y - r.y)
    }
}

impl Mul<Real> for Vector2 {
    type Output = Self;

    fn mul(self, s: Real) -> Self {
        Self::new(self.x * s, self.y * s)
    }
}

impl Div<Real> for Vector2 {
    type Output = Self;

    fn div(self, s: Real) -> Self {
        Self::new(self.x / s, self.y / s)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, r: Self) {
        *self = *self + r;
    }
}
