use crate::tolerance::{EPSILON_LOWER_2, Real};
use crate::vector::Vector3;

/// Axis-aligned bounding box in fixed point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Aabb {
    pub mins: Vector3,
    pub maxs: Vector3,
}

impl Aabb {
    #[inline]
    pub const fn new(mins: Vector3, maxs: Vector3) -> Self {
        Self { mins, maxs }
    }

    /// Degenerate box around a single point.
    #[inline]
    pub const fn from_point(point: Vector3) -> Self {
        Self::new(point, point)
    }

    /// Smallest box holding every point, or `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vector3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut aabb = Self::from_point(first);
        for p in iter {
            aabb.encapsulate_point(p);
        }
        Some(aabb)
    }

    #[inline]
    pub fn encapsulate_point(&mut self, point: Vector3) {
        self.mins = self.mins.component_min(point);
        self.maxs = self.maxs.component_max(point);
    }

    #[inline]
    pub fn encapsulate(&mut self, other: &Self) {
        self.mins = self.mins.component_min(other.mins);
        self.maxs = self.maxs.component_max(other.maxs);
    }

    #[inline]
    pub fn merged(&self, other: &Self) -> Self {
        let mut out = *self;
        out.encapsulate(other);
        out
    }

    #[inline]
    pub fn center(&self) -> Vector3 {
        (self.mins + self.maxs) * Real::HALF
    }

    #[inline]
    pub fn size(&self) -> Vector3 {
        self.maxs - self.mins
    }

    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.maxs.x >= other.mins.x
            && self.mins.x <= other.maxs.x
            && self.maxs.y >= other.mins.y
            && self.mins.y <= other.maxs.y
            && self.maxs.z >= other.mins.z
            && self.mins.z <= other.maxs.z
    }

    /// Overlap test that tolerates 1e-3 of separation, so touching brushes
    /// count as intersecting after transform drift.
    pub fn intersects_approximate(&self, other: &Self) -> bool {
        let e = EPSILON_LOWER_2;
        self.mins.x - e <= other.maxs.x
            && self.maxs.x + e >= other.mins.x
            && self.mins.y - e <= other.maxs.y
            && self.maxs.y + e >= other.mins.y
            && self.mins.z - e <= other.maxs.z
            && self.maxs.z + e >= other.mins.z
    }

    /// Point test with 1e-3 slack on every face.
    pub fn contains_approximate(&self, point: Vector3) -> bool {
        let e = EPSILON_LOWER_2;
        point.x >= self.mins.x - e
            && point.x <= self.maxs.x + e
            && point.y >= self.mins.y - e
            && point.y <= self.maxs.y + e
            && point.z >= self.mins.z - e
            && point.z <= self.maxs.z + e
    }

    /// `other` lies inside or on the faces of `self`.
    pub fn contains(&self, other: &Self) -> bool {
        other.mins.x >= self.mins.x
            && other.maxs.x <= self.maxs.x
            && other.mins.y >= self.mins.y
            && other.maxs.y <= self.maxs.y
            && other.mins.z >= self.mins.z
            && other.maxs.z <= self.maxs.z
    }

    /// `other` lies strictly inside `self`, clear of every face.
    pub fn contains_within(&self, other: &Self) -> bool {
        other.mins.x > self.mins.x
            && other.maxs.x < self.maxs.x
            && other.mins.y > self.mins.y
            && other.maxs.y < self.maxs.y
            && other.mins.z > self.mins.z
            && other.maxs.z < self.maxs.z
    }
}
