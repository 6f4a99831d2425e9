//! Glyph atlas: an on-demand cache of distance-field glyphs packed into one
//! texture.
//!
//! [`GlyphAtlasCache::request_glyph`] answers immediately with the texture
//! coordinates a glyph will occupy, reserving the space on first sight and
//! queueing the bake. [`GlyphAtlasCache::drain_queue`] does the GPU work in
//! FIFO order until a time budget runs out, so a frame never stalls on a
//! burst of new glyphs.

mod cache;
mod key;
mod texture;

pub use cache::{DrainReport, GlyphAtlasCache, GlyphRequest, GlyphState};
pub use key::{GlyphKey, MAX_KEYED_SIZE, UvRect, size_key};
pub use texture::TextureAtlas;

use std::time::Duration;

use thiserror::Error;

use crate::curve::Winding;
use crate::gpu::TextureFilter;
use crate::outline::OutlineError;
use crate::packer::PackError;
use crate::sdf::DistanceFieldMode;

/// Default atlas edge length in pixels.
pub const DEFAULT_ATLAS_SIZE: u32 = 2048;

/// Default time a single frame may spend baking queued glyphs.
pub const DEFAULT_FRAME_BUDGET: Duration = Duration::from_millis(5);

/// Errors returned by [`GlyphAtlasCache::request_glyph`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AtlasError {
    #[error("no atlas space: {0}")]
    Pack(#[from] PackError),
    #[error("malformed glyph outline: {0}")]
    Outline(#[from] OutlineError),
    #[error("invalid glyph request: {0}")]
    InvalidRequest(&'static str),
}

/// Everything a [`GlyphAtlasCache`] needs to know up front.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheSettings {
    pub atlas_size: u32,
    pub mode: DistanceFieldMode,
    /// Edge length the generator starts at before the first glyph resizes it.
    pub initial_size: u32,
    pub pixel_density: f32,
    pub winding: Winding,
    pub filter: TextureFilter,
    pub frame_budget: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            atlas_size: DEFAULT_ATLAS_SIZE,
            mode: DistanceFieldMode::Sdf,
            initial_size: 64,
            pixel_density: 1.0,
            winding: Winding::Positive,
            filter: TextureFilter::Linear,
            frame_budget: DEFAULT_FRAME_BUDGET,
        }
    }
}
