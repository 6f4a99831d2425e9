//! Font loading, text shaping and outline extraction.
//!
//! [`FontFace`] owns the raw font bytes and creates transient `rustybuzz`
//! faces on demand, the same way for shaping ([`shape`]) and for pulling
//! glyph outlines ([`FontFace::outline`]). Outlines come out in design
//! units with the font's own bounding box attached, ready for
//! [`GlyphAtlasCache::request_glyph`](crate::atlas::GlyphAtlasCache::request_glyph).

mod outline;
mod shaper;

pub use outline::OutlineCollector;
pub use shaper::{ShapedGlyph, shape};

use std::path::Path;

use rustybuzz::ttf_parser;
use thiserror::Error;

use crate::geometry::Point;
use crate::outline::{Bounds, GlyphOutline};

/// Errors from loading a font.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("not a usable font face: {0}")]
    Parse(ttf_parser::FaceParsingError),
}

/// One face of a font file.
#[derive(Debug, Clone)]
pub struct FontFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
}

impl FontFace {
    /// Parse face `index` of `data` (0 for plain font files).
    pub fn from_bytes(data: Vec<u8>, index: u32) -> Result<Self, FontError> {
        let units_per_em = ttf_parser::Face::parse(&data, index)
            .map_err(FontError::Parse)?
            .units_per_em();
        Ok(Self {
            data,
            index,
            units_per_em,
        })
    }

    pub fn load(path: &Path, index: u32) -> Result<Self, FontError> {
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let face = Self::from_bytes(data, index)?;
        log::info!(
            "font: loaded {} (face {index}, {} units/em)",
            path.display(),
            face.units_per_em,
        );
        Ok(face)
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// Transient shaping face borrowing the stored bytes.
    pub fn shaping_face(&self) -> rustybuzz::Face<'_> {
        rustybuzz::Face::from_slice(&self.data, self.index)
            .expect("font bytes were validated in from_bytes")
    }

    pub fn glyph_index(&self, ch: char) -> Option<u16> {
        self.shaping_face().glyph_index(ch).map(|id| id.0)
    }

    /// Outline of `glyph_id` in design units, y up.
    ///
    /// Glyphs without an outline (spaces, missing ids) give an empty
    /// outline, which the atlas caches as an invisible glyph.
    pub fn outline(&self, glyph_id: u16) -> GlyphOutline {
        let face = self.shaping_face();
        let mut collector = OutlineCollector::new(self.units_per_em);
        match face.outline_glyph(ttf_parser::GlyphId(glyph_id), &mut collector) {
            Some(rect) => collector.finish().with_bounds(Bounds {
                min: Point::new(f32::from(rect.x_min), f32::from(rect.y_min)),
                max: Point::new(f32::from(rect.x_max), f32::from(rect.y_max)),
            }),
            None => GlyphOutline::new(self.units_per_em),
        }
    }
}

#[cfg(test)]
mod tests;
