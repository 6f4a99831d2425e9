//! Pixel layout of a glyph inside its distance-field render.

use crate::curve::{CurvePrimitive, Winding};
use crate::geometry::{PixelSize, Point};

use super::{Bounds, GlyphOutline, OutlineError, Segment, YDirection};

/// Where a glyph's outline lands inside a `size` pixel render.
///
/// Design-unit coordinates map to pixels as `p * scale + offset` after the
/// y direction has been applied. The tight outline bounds end up exactly
/// `padding` pixels away from every edge of the render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphLayout {
    pub size: PixelSize,
    pub scale: f32,
    pub offset: Point,
    /// Padding in target pixels (already multiplied by pixel density).
    pub padding: f32,
    pub y_direction: YDirection,
}

impl GlyphLayout {
    /// Measure `outline` at `font_size` with `padding` on every side.
    ///
    /// Font-reported bounds are used when the outline carries them, so the
    /// commands themselves are only walked by [`curves`](Self::curves).
    /// Returns `None` for outlines with nothing to draw, such as the space
    /// glyph.
    pub fn measure(
        outline: &GlyphOutline,
        font_size: f32,
        padding: f32,
        pixel_density: f32,
        y_direction: YDirection,
    ) -> Result<Option<Self>, OutlineError> {
        if outline.units_per_em == 0 {
            return Err(OutlineError::ZeroUnitsPerEm);
        }
        if outline.is_empty() {
            return Ok(None);
        }
        let bounds = match outline.bounds {
            Some(b) => y_direction.apply_bounds(b),
            None => Bounds::of_segments(&outline.segments(y_direction)?),
        };
        if bounds.is_empty() {
            return Ok(None);
        }

        let scale = font_size * pixel_density / f32::from(outline.units_per_em);
        let pad = (padding * pixel_density).ceil().max(0.0);
        let inner_w = (bounds.width() * scale).ceil();
        let inner_h = (bounds.height() * scale).ceil();

        let size = PixelSize::new(
            (inner_w + 2.0 * pad) as u32,
            (inner_h + 2.0 * pad) as u32,
        );

        Ok(Some(Self {
            size,
            scale,
            offset: Point::new(pad - bounds.min.x * scale, pad - bounds.min.y * scale),
            padding: pad,
            y_direction,
        }))
    }

    /// Map a design-unit point (y direction already applied) to pixels.
    pub fn to_pixels(&self, p: Point) -> Point {
        p * self.scale + self.offset
    }

    /// Decompose `outline` into curve primitives in this layout's pixel
    /// space, each inflated by the layout padding.
    pub fn curves(
        &self,
        outline: &GlyphOutline,
        winding: Winding,
    ) -> Result<Vec<CurvePrimitive>, OutlineError> {
        let px = |p: Point| self.to_pixels(p);
        let pad = self.padding;
        Ok(outline
            .segments(self.y_direction)?
            .into_iter()
            .map(|seg| match seg {
                Segment::Line(a, b) => CurvePrimitive::linear(px(a), px(b), winding, pad),
                Segment::Quad(a, c, b) => {
                    CurvePrimitive::quadratic(px(a), px(c), px(b), winding, pad)
                }
                Segment::Cubic(a, c1, c2, b) => {
                    CurvePrimitive::cubic(px(a), px(c1), px(c2), px(b), winding, pad)
                }
            })
            .collect())
    }
}
