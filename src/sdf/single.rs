//! Single-channel distance field generator.

use crate::curve::CurvePrimitive;
use crate::geometry::PixelSize;
use crate::gpu::{
    Camera, FIELD_CLEAR, RenderBackend, TargetDesc, TargetId, TextureFilter, with_clear_color,
};

use super::preview::{self, PreviewQuad};
use super::{DistanceFieldMode, DoubleBuffer};

/// Builds one distance field from a batch of curves.
///
/// Each curve is drawn alone into a scratch target, then folded into the
/// accumulated field with a double-buffered combine pass. After
/// [`render`](Self::render) the back buffer holds the finished field.
#[derive(Debug)]
pub struct SdfGenerator {
    size: PixelSize,
    pixel_density: f32,
    filter: TextureFilter,
    curves: Vec<CurvePrimitive>,
    scratch: TargetId,
    buffers: DoubleBuffer,
}

fn scratch_desc(size: PixelSize, filter: TextureFilter) -> TargetDesc {
    TargetDesc::new("field_scratch", size, filter).with_depth()
}

impl SdfGenerator {
    pub fn new(
        backend: &mut dyn RenderBackend,
        size: PixelSize,
        pixel_density: f32,
        filter: TextureFilter,
    ) -> Self {
        Self {
            size,
            pixel_density,
            filter,
            curves: Vec::new(),
            scratch: backend.create_target(&scratch_desc(size, filter)),
            buffers: DoubleBuffer::new(backend, size),
        }
    }

    /// Queue a curve for the next render. Nothing is drawn yet.
    pub fn add(&mut self, curve: CurvePrimitive) {
        self.curves.push(curve);
    }

    /// Curves queued since the last render.
    pub fn queued(&self) -> &[CurvePrimitive] {
        &self.curves
    }

    pub fn size(&self) -> PixelSize {
        self.size
    }

    pub fn pixel_density(&self) -> f32 {
        self.pixel_density
    }

    /// The finished field (the back buffer).
    pub fn texture(&self) -> TargetId {
        self.buffers.back()
    }

    /// Draw every queued curve into a fresh field.
    ///
    /// With nothing queued this does nothing and the previous field stays.
    pub fn render(&mut self, backend: &mut dyn RenderBackend) {
        if self.curves.is_empty() {
            return;
        }
        let camera = Camera::pixels(self.size);
        let scratch = self.scratch;
        let curves = std::mem::take(&mut self.curves);
        let buffers = &mut self.buffers;

        with_clear_color(backend, FIELD_CLEAR, |backend| {
            buffers.clear(backend);
            for curve in &curves {
                backend.clear(scratch);
                backend.draw_curve(scratch, curve, &camera);
                buffers.accumulate(backend, scratch);
                buffers.swap();
            }
        });
    }

    /// Clear the field without drawing anything.
    pub fn clear(&mut self, backend: &mut dyn RenderBackend) {
        self.curves.clear();
        let buffers = &self.buffers;
        with_clear_color(backend, FIELD_CLEAR, |backend| buffers.clear(backend));
    }

    /// Reallocate every target at `size`. Returns `false` (and keeps the
    /// current targets) if the size is unchanged.
    pub fn resize(
        &mut self,
        backend: &mut dyn RenderBackend,
        size: PixelSize,
        pixel_density: f32,
    ) -> bool {
        if size == self.size {
            return false;
        }
        backend.release_target(self.scratch);
        self.scratch = backend.create_target(&scratch_desc(size, self.filter));
        self.buffers.resize(backend, size);
        self.size = size;
        self.pixel_density = pixel_density;
        true
    }

    pub fn release(self, backend: &mut dyn RenderBackend) {
        backend.release_target(self.scratch);
        self.buffers.release(backend);
    }

    pub fn raw_preview(&self) -> PreviewQuad {
        PreviewQuad::raw(self.texture())
    }

    pub fn distance_test_preview(&self) -> PreviewQuad {
        PreviewQuad::distance_test(self.texture(), DistanceFieldMode::Sdf)
    }

    /// Back, front and scratch targets stacked vertically.
    pub fn channels_preview(&self) -> Vec<PreviewQuad> {
        preview::channel_column(&[self.buffers.back(), self.buffers.front(), self.scratch])
    }
}
