// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal 3-component point.
//!
//! Joints only need translations, world positions, and bone lengths, so this
//! covers addition, subtraction, scaling, and Euclidean length without pulling
//! in a full linear-algebra crate.

use core::ops::{Add, Div, Mul, Neg, Sub};

/// A point (or offset) in 3-D space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Point3 {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a point from its components.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns the Euclidean length of this offset.
    #[inline]
    #[must_use]
    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Returns the Euclidean distance to `other`.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (other - self).length()
    }
}

impl Add for Point3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Point3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f64> for Point3 {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Point3 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_of_axis_offsets() {
        assert_eq!(Point3::new(3.0, 4.0, 0.0).length(), 5.0);
        assert_eq!(Point3::new(0.0, 0.0, -2.0).length(), 2.0);
    }

    #[test]
    fn arithmetic_is_componentwise() {
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(0.5, -1.0, 2.0);
        assert_eq!(a + b, Point3::new(1.5, 1.0, 5.0));
        assert_eq!(a - b, Point3::new(0.5, 3.0, 1.0));
        assert_eq!(a * 2.0, Point3::new(2.0, 4.0, 6.0));
        assert_eq!(a / 2.0, Point3::new(0.5, 1.0, 1.5));
        assert_eq!(-a, Point3::new(-1.0, -2.0, -3.0));
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Point3::new(1.0, 1.0, 1.0);
        let b = Point3::new(1.0, 4.0, 5.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(a), 5.0);
    }
}
