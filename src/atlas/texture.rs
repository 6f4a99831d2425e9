//! The atlas render target and its packer.

use crate::geometry::PixelSize;
use crate::gpu::{
    FIELD_CLEAR, RenderBackend, TargetDesc, TargetId, TextureFilter, with_clear_color,
};
use crate::packer::{BinPacker, PackError, PackedBin};
use crate::sdf::PreviewQuad;

use super::UvRect;

/// A square render target that glyph fields are blitted into, with a
/// [`BinPacker`] handing out its space.
///
/// Space is never freed: the atlas lives as long as the glyphs in it.
#[derive(Debug)]
pub struct TextureAtlas {
    size: u32,
    target: TargetId,
    packer: BinPacker,
}

impl TextureAtlas {
    pub fn new(backend: &mut dyn RenderBackend, size: u32) -> Self {
        let target = backend.create_target(&TargetDesc::new(
            "glyph_atlas",
            PixelSize::square(size),
            TextureFilter::Linear,
        ));
        with_clear_color(backend, FIELD_CLEAR, |backend| backend.clear(target));
        log::info!("glyph atlas: {size}x{size}");
        Self {
            size,
            target,
            packer: BinPacker::new(size, size),
        }
    }

    /// Reserve a `size` region. The glyph cache always passes
    /// `allow_rotation = false` so blits and texture coordinates stay
    /// axis-aligned.
    pub fn find_space(
        &mut self,
        size: PixelSize,
        allow_rotation: bool,
    ) -> Result<PackedBin, PackError> {
        self.packer.reserve(size, allow_rotation)
    }

    pub fn uv_rect(&self, placement: &PackedBin) -> UvRect {
        UvRect::from_placement(placement, self.size)
    }

    pub fn texture(&self) -> TargetId {
        self.target
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn packer(&self) -> &BinPacker {
        &self.packer
    }

    pub fn raw_preview(&self) -> PreviewQuad {
        PreviewQuad::raw(self.target)
    }

    pub fn release(self, backend: &mut dyn RenderBackend) {
        backend.release_target(self.target);
    }
}
