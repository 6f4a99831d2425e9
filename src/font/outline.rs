//! Outline extraction through `ttf_parser`'s builder callbacks.

use rustybuzz::ttf_parser::OutlineBuilder;

use crate::outline::GlyphOutline;

/// Collects `ttf_parser` outline callbacks into a [`GlyphOutline`].
#[derive(Debug)]
pub struct OutlineCollector {
    outline: GlyphOutline,
}

impl OutlineCollector {
    pub fn new(units_per_em: u16) -> Self {
        Self {
            outline: GlyphOutline::new(units_per_em),
        }
    }

    pub fn finish(self) -> GlyphOutline {
        self.outline
    }
}

impl OutlineBuilder for OutlineCollector {
    fn move_to(&mut self, x: f32, y: f32) {
        self.outline.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.outline.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.outline.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.outline.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.outline.close();
    }
}
