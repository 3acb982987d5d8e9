// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Body sides and side detection from world position.
//!
//! A joint's [`Side`] is either forced by the caller (props are always
//! [`Side::None`]) or derived from where the joint sits relative to the
//! character's sagittal plane. The plane is implied by the [`FrontAxis`]: a
//! character facing `+z` is split by `x = 0`, one facing `+x` by `z = 0`.
//! Positions within a small tolerance band of the plane are [`Side::Center`].

use core::fmt;
use core::str::FromStr;

use crate::point::Point3;

/// Default half-width of the center band, in world units.
pub const DEFAULT_SIDE_TOLERANCE: f64 = 0.0001;

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// Which side of the body a joint belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    /// On the sagittal plane.
    Center,
    /// Character's left.
    Left,
    /// Character's right.
    Right,
    /// Sideless (props, accessories).
    None,
}

impl Side {
    /// All sides in host label order.
    pub const ALL: [Self; 4] = [Self::Center, Self::Left, Self::Right, Self::None];

    /// Returns the single-letter code used in generated names.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Center => "C",
            Self::Left => "L",
            Self::Right => "R",
            Self::None => "N",
        }
    }

    /// Parses a single-letter side code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|side| side.code() == code)
    }

    /// Returns the host's joint-label side index.
    #[must_use]
    pub const fn label_index(self) -> u8 {
        match self {
            Self::Center => 0,
            Self::Left => 1,
            Self::Right => 2,
            Self::None => 3,
        }
    }

    /// Returns the override color index used when colorizing by side.
    #[must_use]
    pub const fn color_index(self) -> u8 {
        match self {
            Self::Center => 30,
            Self::Left => 15,
            Self::Right => 4,
            Self::None => 26,
        }
    }

    /// Derives a side from a world position.
    ///
    /// For [`FrontAxis::Z`] the sign of `x` decides (positive is left); for
    /// [`FrontAxis::X`] the sign of `z` decides (negative is left). Anything
    /// within `tolerance` of the plane is [`Side::Center`].
    #[must_use]
    pub fn from_position(position: Point3, front: FrontAxis, tolerance: f64) -> Self {
        let lateral = match front {
            FrontAxis::Z => position.x,
            FrontAxis::X => -position.z,
        };
        if lateral > tolerance {
            Self::Left
        } else if lateral < -tolerance {
            Self::Right
        } else {
            Self::Center
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Center => "Center",
            Self::Left => "Left",
            Self::Right => "Right",
            Self::None => "None",
        })
    }
}

// ---------------------------------------------------------------------------
// FrontAxis
// ---------------------------------------------------------------------------

/// The world axis a character faces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FrontAxis {
    /// Facing `+x`.
    X,
    /// Facing `+z`.
    #[default]
    Z,
}

impl FrontAxis {
    /// Returns the lower-case axis letter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Z => "z",
        }
    }
}

impl fmt::Display for FrontAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrontAxis {
    type Err = FrontAxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" | "X" => Ok(Self::X),
            "z" | "Z" => Ok(Self::Z),
            _ => Err(FrontAxisError(s.to_owned())),
        }
    }
}

/// Returned when parsing a front axis other than `x` or `z`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrontAxisError(pub String);

impl fmt::Display for FrontAxisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "only front axes 'x' and 'z' are supported, got '{}'",
            self.0
        )
    }
}

impl core::error::Error for FrontAxisError {}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = DEFAULT_SIDE_TOLERANCE;

    #[test]
    fn z_front_uses_x_sign() {
        let at = |x| Side::from_position(Point3::new(x, 10.0, 3.0), FrontAxis::Z, TOL);
        assert_eq!(at(5.0), Side::Left);
        assert_eq!(at(-5.0), Side::Right);
        assert_eq!(at(0.0), Side::Center);
    }

    #[test]
    fn x_front_uses_negated_z_sign() {
        let at = |z| Side::from_position(Point3::new(7.0, 10.0, z), FrontAxis::X, TOL);
        assert_eq!(at(-5.0), Side::Left);
        assert_eq!(at(5.0), Side::Right);
        assert_eq!(at(0.0), Side::Center);
    }

    #[test]
    fn tolerance_band_is_center() {
        let front = FrontAxis::Z;
        assert_eq!(
            Side::from_position(Point3::new(0.000_05, 0.0, 0.0), front, TOL),
            Side::Center
        );
        assert_eq!(
            Side::from_position(Point3::new(-0.000_05, 0.0, 0.0), front, TOL),
            Side::Center
        );
        assert_eq!(
            Side::from_position(Point3::new(0.001, 0.0, 0.0), front, TOL),
            Side::Left
        );
    }

    #[test]
    fn codes_round_trip() {
        for side in Side::ALL {
            assert_eq!(Side::from_code(side.code()), Some(side));
        }
        assert_eq!(Side::from_code("Q"), None);
    }

    #[test]
    fn colors_match_host_palette() {
        assert_eq!(Side::Center.color_index(), 30);
        assert_eq!(Side::Left.color_index(), 15);
        assert_eq!(Side::Right.color_index(), 4);
        assert_eq!(Side::None.color_index(), 26);
    }

    #[test]
    fn front_axis_parsing() {
        assert_eq!("x".parse::<FrontAxis>(), Ok(FrontAxis::X));
        assert_eq!("z".parse::<FrontAxis>(), Ok(FrontAxis::Z));
        let err = "y".parse::<FrontAxis>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "only front axes 'x' and 'z' are supported, got 'y'"
        );
    }
}
