//! Multi-channel distance field compositor.

use crate::curve::CurvePrimitive;
use crate::geometry::{PixelSize, Point};
use crate::gpu::{
    CombinePass, FIELD_CLEAR, RenderBackend, TargetDesc, TargetId, TextureFilter,
    with_clear_color,
};

use super::preview::{PreviewQuad, stack_offsets};
use super::{DistanceFieldMode, SdfGenerator};

const CHANNELS: usize = 3;

/// Three single-channel generators merged into one RGB field.
///
/// Curve `i` of a batch goes to channels `i % 3` and `(i + 1) % 3`, so
/// every channel sees two thirds of the outline and adjacent curves never
/// share exactly the same pair. Where channels disagree the median keeps
/// corners sharp.
#[derive(Debug)]
pub struct MsdfGenerator {
    size: PixelSize,
    pixel_density: f32,
    filter: TextureFilter,
    channels: [SdfGenerator; CHANNELS],
    output: TargetId,
    /// Curves added since the last render.
    batch_len: usize,
}

fn output_desc(size: PixelSize, filter: TextureFilter) -> TargetDesc {
    TargetDesc::new("msdf_output", size, filter)
}

impl MsdfGenerator {
    pub fn new(
        backend: &mut dyn RenderBackend,
        size: PixelSize,
        pixel_density: f32,
        filter: TextureFilter,
    ) -> Self {
        let channels =
            [(); CHANNELS].map(|()| SdfGenerator::new(backend, size, pixel_density, filter));
        Self {
            size,
            pixel_density,
            filter,
            channels,
            output: backend.create_target(&output_desc(size, filter)),
            batch_len: 0,
        }
    }

    pub fn add(&mut self, curve: CurvePrimitive) {
        let i = self.batch_len;
        self.channels[i % CHANNELS].add(curve);
        self.channels[(i + 1) % CHANNELS].add(curve);
        self.batch_len += 1;
    }

    pub fn channel(&self, index: usize) -> &SdfGenerator {
        &self.channels[index]
    }

    /// Curves added since the last render.
    pub fn queued(&self) -> usize {
        self.batch_len
    }

    pub fn size(&self) -> PixelSize {
        self.size
    }

    pub fn pixel_density(&self) -> f32 {
        self.pixel_density
    }

    /// The merged RGB field.
    pub fn texture(&self) -> TargetId {
        self.output
    }

    /// Render every channel, then merge them into the output.
    ///
    /// With nothing queued this does nothing. Channels that received no
    /// curves in a non-empty batch are cleared rather than left holding the
    /// previous glyph.
    pub fn render(&mut self, backend: &mut dyn RenderBackend) {
        if self.batch_len == 0 {
            return;
        }
        for channel in &mut self.channels {
            if channel.queued().is_empty() {
                channel.clear(backend);
            } else {
                channel.render(backend);
            }
        }
        let pass = CombinePass::MergeChannels {
            channels: [
                self.channels[0].texture(),
                self.channels[1].texture(),
                self.channels[2].texture(),
            ],
        };
        let output = self.output;
        with_clear_color(backend, FIELD_CLEAR, |backend| backend.combine(&pass, output));
        self.batch_len = 0;
    }

    /// Resize to `width` x `height`, rounded up to whole pixels. Returns
    /// `false` if the rounded size is unchanged.
    pub fn resize(
        &mut self,
        backend: &mut dyn RenderBackend,
        width: f32,
        height: f32,
        pixel_density: f32,
    ) -> bool {
        self.pixel_density = pixel_density;
        let size = PixelSize::new(width.ceil().max(0.0) as u32, height.ceil().max(0.0) as u32);
        if size == self.size {
            return false;
        }
        backend.release_target(self.output);
        self.output = backend.create_target(&output_desc(size, self.filter));
        for channel in &mut self.channels {
            channel.resize(backend, size, pixel_density);
        }
        self.size = size;
        true
    }

    pub fn release(self, backend: &mut dyn RenderBackend) {
        backend.release_target(self.output);
        for channel in self.channels {
            channel.release(backend);
        }
    }

    pub fn raw_preview(&self) -> PreviewQuad {
        PreviewQuad::raw(self.output)
    }

    pub fn distance_test_preview(&self) -> PreviewQuad {
        PreviewQuad::distance_test(self.output, DistanceFieldMode::Msdf)
    }

    /// Each channel's back/front/scratch column, placed side by side.
    pub fn channels_preview(&self) -> Vec<PreviewQuad> {
        self.channels
            .iter()
            .zip(stack_offsets(CHANNELS))
            .flat_map(|(channel, x)| {
                channel.channels_preview().into_iter().map(move |q| PreviewQuad {
                    center: Point::new(x, q.center.y),
                    ..q
                })
            })
            .collect()
    }
}
