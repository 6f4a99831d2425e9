//! Cache keys and atlas texture coordinates.

use crate::geometry::Point;
use crate::outline::YDirection;
use crate::packer::PackedBin;

/// Convert a font size in pixels to a 26.6 fixed-point key.
///
/// Keys compare exactly, so two requests that differ only by float noise
/// below 1/64 px share an entry, while genuinely different fractional
/// sizes stay apart.
///
/// Sizes above [`MAX_KEYED_SIZE`] saturate and would share a key; the
/// cache rejects them before keying.
pub fn size_key(size: f32) -> u32 {
    (size * 64.0).round() as u32
}

/// Largest font size, in pixels, that [`size_key`] represents exactly.
pub const MAX_KEYED_SIZE: f32 = (u32::MAX / 64) as f32;

/// Identity of one baked glyph.
///
/// Everything that changes the rendered field is part of the key: the font
/// (and the face inside a collection), the glyph, the size and padding, and
/// the y direction the outline was read with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphKey {
    pub font_id: u32,
    pub font_index: u32,
    pub glyph_id: u16,
    /// Font size in 26.6 fixed point.
    pub size: u32,
    /// Padding in target pixels, rounded up the way the layout rounds it.
    pub padding: u32,
    pub y_direction: YDirection,
}

/// A glyph's rectangle in normalized atlas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    pub min: Point,
    pub max: Point,
}

impl UvRect {
    /// Zero-area rectangle: quads using it draw nothing.
    pub const EMPTY: Self = Self {
        min: Point::ZERO,
        max: Point::ZERO,
    };

    /// Normalize a placement inside a square atlas of `atlas_size` pixels.
    pub fn from_placement(placement: &PackedBin, atlas_size: u32) -> Self {
        let inv = 1.0 / atlas_size as f32;
        Self {
            min: Point::new(placement.x as f32 * inv, placement.y as f32 * inv),
            max: Point::new(placement.right() as f32 * inv, placement.top() as f32 * inv),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    /// The four corners as a flat `[u, v]` list, wound
    /// min/min, min/max, max/max, max/min.
    pub fn corners(&self) -> [f32; 8] {
        let Self { min, max } = *self;
        [min.x, min.y, min.x, max.y, max.x, max.y, max.x, min.y]
    }
}
