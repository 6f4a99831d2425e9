//! Small value types shared by the packer, the outline code and the GPU layer.

use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

use thiserror::Error;

/// A 2D point (or vector) in whatever space the caller is working in:
/// font design units, glyph pixels, or atlas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation between `self` and `other`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Integer pixel dimensions of a render target, atlas region or bin request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A square of side `side`.
    pub const fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    /// Width and height swapped (a 90° rotation of the footprint).
    pub const fn transposed(self) -> Self {
        Self::new(self.height, self.width)
    }

    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub const fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl std::fmt::Display for PixelSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Error from parsing a [`PixelSize`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected WIDTHxHEIGHT or a single side length, got {0:?}")]
pub struct ParseSizeError(pub String);

impl FromStr for PixelSize {
    type Err = ParseSizeError;

    /// Parses `"64x32"`, or `"64"` for a square.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSizeError(s.to_owned());
        let side = |v: &str| v.trim().parse::<u32>().map_err(|_| err());
        match s.split_once(['x', 'X']) {
            Some((w, h)) => Ok(Self::new(side(w)?, side(h)?)),
            None => side(s).map(Self::square),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ParseSizeError, PixelSize, Point};

    #[test]
    fn pixel_size_parses_both_forms() {
        assert_eq!("64x32".parse(), Ok(PixelSize::new(64, 32)));
        assert_eq!("8X8".parse(), Ok(PixelSize::square(8)));
        assert_eq!("128".parse(), Ok(PixelSize::square(128)));
        assert_eq!(
            "64x".parse::<PixelSize>(),
            Err(ParseSizeError("64x".to_owned()))
        );
        assert!("-3x4".parse::<PixelSize>().is_err());
    }

    #[test]
    fn pixel_size_display_matches_parse() {
        let size = PixelSize::new(300, 20);
        assert_eq!(size.to_string().parse(), Ok(size));
        assert_eq!(size.area(), 6000);
        assert_eq!(size.transposed(), PixelSize::new(20, 300));
    }

    #[test]
    fn point_lerp_midpoint() {
        let mid = Point::new(0.0, 10.0).lerp(Point::new(4.0, 0.0), 0.5);
        assert_eq!(mid, Point::new(2.0, 5.0));
    }
}
