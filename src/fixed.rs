//! Deterministic Q32.32 fixed-point scalar.
//!
//! Every CSG decision in this crate is made on [`Fix64`] values so that two
//! machines fed the same brushes produce bit-identical output. All arithmetic
//! saturates at [`Fix64::MAX`] / [`Fix64::MIN`] instead of wrapping or
//! panicking, and division by zero saturates by the sign of the dividend.

use core::cmp::Ordering;
use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, Sub, SubAssign};

const FRACTIONAL_PLACES: u32 = 32;
const ONE_RAW: i64 = 1 << FRACTIONAL_PLACES;

/// Signed Q32.32 fixed-point number.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fix64(i64);

#[inline]
const fn saturate(value: i128) -> i64 {
    if value > i64::MAX as i128 {
        i64::MAX
    } else if value < i64::MIN as i128 {
        i64::MIN
    } else {
        value as i64
    }
}

/// Floor of the square root of `n`.
pub(crate) fn isqrt(n: u128) -> u128 {
    if n < 2 {
        return n;
    }
    let bits = 128 - n.leading_zeros();
    let mut x = 1u128 << bits.div_ceil(2);
    loop {
        let y = (x + n / x) >> 1;
        if y >= x {
            return x;
        }
        x = y;
    }
}

impl Fix64 {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(ONE_RAW);
    pub const HALF: Self = Self(ONE_RAW >> 1);
    pub const MAX: Self = Self(i64::MAX);
    pub const MIN: Self = Self(i64::MIN);
    /// Smallest representable positive step (2⁻³²).
    pub const PRECISION: Self = Self(1);
    pub const PI: Self = Self(0x3_243F_6A89);
    pub const TAU: Self = Self(0x6_487E_D511);
    pub const PI_OVER_2: Self = Self(0x1_921F_B544);

    #[inline]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn from_int(value: i32) -> Self {
        Self((value as i64) << FRACTIONAL_PLACES)
    }

    /// Converts from `f64`, rounding to the nearest step. NaN maps to zero and
    /// out-of-range values saturate.
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        // `as` saturates for floats, which is the clamping we want.
        Self((value * ONE_RAW as f64).round() as i64)
    }

    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / ONE_RAW as f64
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn abs(self) -> Self {
        if self.0 == i64::MIN {
            Self::MAX
        } else if self.0 < 0 {
            Self(-self.0)
        } else {
            self
        }
    }

    /// -1, 0 or 1 by the sign of the value.
    #[inline]
    pub const fn sign(self) -> i32 {
        if self.0 < 0 {
            -1
        } else if self.0 > 0 {
            1
        } else {
            0
        }
    }

    /// Like [`Fix64::sign`] but as a scalar, ready to be multiplied in.
    #[inline]
    pub const fn signum(self) -> Self {
        Self::from_int(self.sign())
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        if other < self { other } else { self }
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        if other > self { other } else { self }
    }

    #[inline]
    pub fn clamp(self, min: Self, max: Self) -> Self {
        self.max(min).min(max)
    }

    #[inline]
    pub fn clamp01(self) -> Self {
        self.clamp(Self::ZERO, Self::ONE)
    }

    #[inline]
    pub const fn floor(self) -> Self {
        Self(self.0 & !(ONE_RAW - 1))
    }

    #[inline]
    pub fn ceil(self) -> Self {
        if self.0 & (ONE_RAW - 1) != 0 {
            self.floor() + Self::ONE
        } else {
            self
        }
    }

    /// Rounds to the nearest integer, ties to even.
    pub fn round(self) -> Self {
        let fraction = self.0 & (ONE_RAW - 1);
        let integral = self.floor();
        match fraction.cmp(&(ONE_RAW >> 1)) {
            Ordering::Less => integral,
            Ordering::Greater => integral + Self::ONE,
            Ordering::Equal => {
                if (integral.0 >> FRACTIONAL_PLACES) & 1 == 0 {
                    integral
                } else {
                    integral + Self::ONE
                }
            },
        }
    }

    /// Exact (floored) square root. Negative inputs have no real root and
    /// yield zero.
    pub fn sqrt(self) -> Self {
        if self.0 <= 0 {
            return Self::ZERO;
        }
        let root = isqrt((self.0 as u128) << FRACTIONAL_PLACES);
        Self(saturate(root as i128))
    }

    /// Sine via range reduction to [-π/2, π/2] and a Taylor series.
    pub fn sin(self) -> Self {
        let mut x = self % Self::TAU;
        if x > Self::PI {
            x -= Self::TAU;
        } else if x < -Self::PI {
            x += Self::TAU;
        }
        if x > Self::PI_OVER_2 {
            x = Self::PI - x;
        } else if x < -Self::PI_OVER_2 {
            x = -Self::PI - x;
        }

        let x2 = x * x;
        let mut term = x;
        let mut sum = x;
        for k in 1..10 {
            let denominator = Self::from_int((2 * k) * (2 * k + 1));
            term = -(term * x2) / denominator;
            if term.is_zero() {
                break;
            }
            sum += term;
        }
        sum.clamp(-Self::ONE, Self::ONE)
    }

    #[inline]
    pub fn cos(self) -> Self {
        (self + Self::PI_OVER_2).sin()
    }

    pub fn tan(self) -> Self {
        self.sin() / self.cos()
    }

    pub fn atan(self) -> Self {
        if self.0 < 0 {
            return -(-self).atan();
        }
        if self > Self::ONE {
            return Self::PI_OVER_2 - (Self::ONE / self).atan();
        }

        // Halve the argument once so the series converges quickly:
        // atan(x) = 2·atan(x / (1 + √(1 + x²)))
        let reduced = self / (Self::ONE + (Self::ONE + self * self).sqrt());
        let x2 = reduced * reduced;
        let mut power = reduced;
        let mut sum = reduced;
        for k in 1..24 {
            power = -(power * x2);
            if power.is_zero() {
                break;
            }
            sum += power / Self::from_int(2 * k + 1);
        }
        sum + sum
    }

    pub fn atan2(y: Self, x: Self) -> Self {
        if x.0 > 0 {
            (y / x).atan()
        } else if x.0 < 0 {
            if y.0 >= 0 {
                (y / x).atan() + Self::PI
            } else {
                (y / x).atan() - Self::PI
            }
        } else if y.0 > 0 {
            Self::PI_OVER_2
        } else if y.0 < 0 {
            -Self::PI_OVER_2
        } else {
            Self::ZERO
        }
    }

    pub fn asin(self) -> Self {
        let x = self.clamp(-Self::ONE, Self::ONE);
        Self::atan2(x, (Self::ONE - x * x).sqrt())
    }

    pub fn acos(self) -> Self {
        let x = self.clamp(-Self::ONE, Self::ONE);
        Self::atan2((Self::ONE - x * x).sqrt(), x)
    }

    /// `self + (other - self) * t`, unclamped.
    #[inline]
    pub fn lerp(self, other: Self, t: Self) -> Self {
        self + (other - self) * t
    }

    /// Where `value` sits between `from` and `to`, without clamping.
    pub fn inverse_lerp_unclamped(from: Self, to: Self, value: Self) -> Self {
        if from < to {
            (value - from) / (to - from)
        } else {
            Self::ONE - (value - to) / (from - to)
        }
    }
}

impl From<i32> for Fix64 {
    #[inline]
    fn from(value: i32) -> Self {
        Self::from_int(value)
    }
}

impl From<Fix64> for f64 {
    #[inline]
    fn from(value: Fix64) -> Self {
        value.to_f64()
    }
}

impl fmt::Debug for Fix64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

impl fmt::Display for Fix64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f64(), f)
    }
}

impl Add for Fix64 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Fix64 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Mul for Fix64 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let product = self.0 as i128 * rhs.0 as i128;
        Self(saturate((product + (1 << (FRACTIONAL_PLACES - 1))) >> FRACTIONAL_PLACES))
    }
}

impl Div for Fix64 {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        if rhs.0 == 0 {
            return if self.0 >= 0 { Self::MAX } else { Self::MIN };
        }
        Self(saturate(((self.0 as i128) << FRACTIONAL_PLACES) / rhs.0 as i128))
    }
}

impl Rem for Fix64 {
    type Output = Self;
    #[inline]
    fn rem(self, rhs: Self) -> Self {
        if rhs.0 == 0 {
            return Self::ZERO;
        }
        Self(self.0.wrapping_rem(rhs.0))
    }
}

impl Neg for Fix64 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl AddAssign for Fix64 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fix64 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fix64 {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl DivAssign for Fix64 {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl Sum for Fix64 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Fix64> for Fix64 {
    fn sum<I: Iterator<Item = &'a Fix64>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + *x)
    }
}

impl approx::AbsDiffEq for Fix64 {
    type Epsilon = Fix64;

    fn default_epsilon() -> Self::Epsilon {
        crate::tolerance::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        (*self - *other).abs() <= epsilon
    }
}

impl approx::RelativeEq for Fix64 {
    fn default_max_relative() -> Self::Epsilon {
        crate::tolerance::EPSILON
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        let diff = (*self - *other).abs();
        if diff <= epsilon {
            return true;
        }
        let largest = self.abs().max(other.abs());
        diff <= largest * max_relative
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Fix64, b: f64, eps: f64) -> bool {
        (a.to_f64() - b).abs() < eps
    }

    #[test]
    fn arithmetic_is_exact_for_dyadic_values() {
        let a = Fix64::from_f64(1.5);
        let b = Fix64::from_f64(0.25);
        assert_eq!(a + b, Fix64::from_f64(1.75));
        assert_eq!(a - b, Fix64::from_f64(1.25));
        assert_eq!(a * b, Fix64::from_f64(0.375));
        assert_eq!(a / b, Fix64::from_int(6));
    }

    #[test]
    fn saturates_instead_of_overflowing() {
        assert_eq!(Fix64::MAX + Fix64::ONE, Fix64::MAX);
        assert_eq!(Fix64::MIN - Fix64::ONE, Fix64::MIN);
        assert_eq!(Fix64::MAX * Fix64::from_int(2), Fix64::MAX);
        assert_eq!(Fix64::ONE / Fix64::ZERO, Fix64::MAX);
        assert_eq!(-Fix64::ONE / Fix64::ZERO, Fix64::MIN);
        assert_eq!(Fix64::MIN.abs(), Fix64::MAX);
    }

    #[test]
    fn sqrt_of_perfect_squares() {
        assert_eq!(Fix64::from_int(16).sqrt(), Fix64::from_int(4));
        assert_eq!(Fix64::from_f64(0.25).sqrt(), Fix64::HALF);
        assert_eq!(Fix64::from_int(-4).sqrt(), Fix64::ZERO);
        assert!(close(Fix64::from_int(2).sqrt(), core::f64::consts::SQRT_2, 1e-9));
    }

    #[test]
    fn trigonometry() {
        assert!(close(Fix64::ZERO.sin(), 0.0, 1e-9));
        assert!(close(Fix64::PI_OVER_2.sin(), 1.0, 1e-8));
        assert!(close(Fix64::PI.cos(), -1.0, 1e-8));
        assert!(close(Fix64::from_f64(1.0).sin(), 1.0f64.sin(), 1e-8));
        assert!(close(Fix64::from_f64(-2.5).cos(), (-2.5f64).cos(), 1e-8));
        assert!(close(Fix64::from_f64(7.0).sin(), 7.0f64.sin(), 1e-8));
        assert!(close(Fix64::ONE.atan(), core::f64::consts::FRAC_PI_4, 1e-8));
        assert!(close(Fix64::from_int(3).atan(), 3.0f64.atan(), 1e-8));
        assert!(close(
            Fix64::atan2(Fix64::from_int(-1), Fix64::from_int(-1)),
            (-1.0f64).atan2(-1.0),
            1e-8
        ));
        assert!(close(Fix64::ZERO.acos(), core::f64::consts::FRAC_PI_2, 1e-8));
        assert!(close(Fix64::HALF.asin(), 0.5f64.asin(), 1e-8));
    }

    #[test]
    fn rounding() {
        assert_eq!(Fix64::from_f64(2.5).round(), Fix64::from_int(2));
        assert_eq!(Fix64::from_f64(3.5).round(), Fix64::from_int(4));
        assert_eq!(Fix64::from_f64(-1.25).floor(), Fix64::from_int(-2));
        assert_eq!(Fix64::from_f64(-1.25).ceil(), Fix64::from_int(-1));
        assert_eq!(Fix64::from_f64(1.75).round(), Fix64::from_int(2));
    }

    #[test]
    fn signum_and_clamp() {
        assert_eq!(Fix64::from_f64(-0.3).signum(), -Fix64::ONE);
        assert_eq!(Fix64::ZERO.signum(), Fix64::ZERO);
        assert_eq!(Fix64::from_int(5).clamp01(), Fix64::ONE);
        assert_eq!(
            Fix64::inverse_lerp_unclamped(Fix64::ZERO, Fix64::from_int(4), Fix64::ONE),
            Fix64::from_f64(0.25)
        );
    }
}
