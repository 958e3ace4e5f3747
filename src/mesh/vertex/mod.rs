//! Struct and functions for working with `Vertex`s from which `Polygon`s are composed.

use crate::tolerance::Real;
use crate::vector::{Vector2, Vector3};

mod interpolation_methods;

/// 8-bit RGBA vertex color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    fn channels(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    fn from_channels(c: [u8; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }

    /// Channel-wise blend with `t` clamped to [0, 1].
    pub fn lerp(self, other: Self, t: Real) -> Self {
        let t = t.clamp01();
        let a = self.channels();
        let b = other.channels();
        Self::from_channels(core::array::from_fn(|i| {
            let from = Real::from_int(a[i] as i32);
            let to = Real::from_int(b[i] as i32);
            to_channel(from.lerp(to, t))
        }))
    }

    /// Weighted sum of three colors. Weights may be negative or exceed one;
    /// the result is clamped per channel.
    pub fn weighted(colors: [Self; 3], weights: [Real; 3]) -> Self {
        Self::from_channels(core::array::from_fn(|i| {
            let sum = colors
                .iter()
                .zip(weights.iter())
                .map(|(c, w)| Real::from_int(c.channels()[i] as i32) * *w)
                .sum::<Real>();
            to_channel(sum)
        }))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

fn to_channel(value: Real) -> u8 {
    let rounded = value.round().clamp(Real::ZERO, Real::from_int(255));
    (rounded.raw() >> 32) as u8
}

/// A vertex of a polygon, holding position, normal, texture coordinate and color.
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub struct Vertex {
    pub pos: Vector3,
    pub normal: Vector3,
    pub uv: Vector2,
    pub color: Color,
}

impl Vertex {
    /// Create a new [`Vertex`] with a zero texture coordinate and white color.
    ///
    /// The normal is copied verbatim, so make sure it is oriented the way you
    /// need it for lighting.
    #[inline]
    pub const fn new(pos: Vector3, normal: Vector3) -> Self {
        Vertex {
            pos,
            normal,
            uv: Vector2::zeros(),
            color: Color::WHITE,
        }
    }

    #[inline]
    pub const fn with_uv(mut self, uv: Vector2) -> Self {
        self.uv = uv;
        self
    }

    #[inline]
    pub const fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Build a vertex from `f64` coordinates, rejecting NaN and infinities.
    pub fn from_f64(
        pos: [f64; 3],
        normal: [f64; 3],
    ) -> Result<Self, crate::errors::ValidationError> {
        if pos.iter().chain(normal.iter()).any(|c| !c.is_finite()) {
            return Err(crate::errors::ValidationError::InvalidCoordinate {
                x: pos[0],
                y: pos[1],
                z: pos[2],
            });
        }
        Ok(Self::new(
            Vector3::from_f64(pos[0], pos[1], pos[2]),
            Vector3::from_f64(normal[0], normal[1], normal[2]),
        ))
    }

    /// Flip vertex normal in place.
    pub fn flip(&mut self) {
        self.normal = -self.normal;
    }

    pub fn distance_to(&self, other: &Vertex) -> Real {
        (self.pos - other.pos).norm()
    }
}
