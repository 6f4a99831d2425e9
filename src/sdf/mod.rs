//! Distance field generation by GPU rasterization of curve ribbons.
//!
//! Each curve is drawn as a ribbon whose fragments encode the signed,
//! padding-normalized distance to the curve: 0.5 on the curve itself,
//! toward 0 or 1 on either side depending on winding. Curves are folded
//! together by keeping, per texel, the value nearest 0.5.
//!
//! [`SdfGenerator`] produces one such field. [`MsdfGenerator`] runs three of
//! them with overlapping curve subsets and merges them into RGB.

mod double_buffer;
mod multi;
mod preview;
mod single;

pub use double_buffer::DoubleBuffer;
pub use multi::MsdfGenerator;
pub use preview::{PreviewKind, PreviewQuad};
pub use single::SdfGenerator;

use serde::{Deserialize, Serialize};

use crate::curve::CurvePrimitive;
use crate::geometry::PixelSize;
use crate::gpu::{RenderBackend, TargetId, TextureFilter};

/// Which generator bakes glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceFieldMode {
    #[default]
    Sdf,
    Msdf,
}

/// Either generator behind one interface.
#[derive(Debug)]
pub enum FieldGenerator {
    Sdf(SdfGenerator),
    Msdf(MsdfGenerator),
}

impl FieldGenerator {
    pub fn new(
        backend: &mut dyn RenderBackend,
        mode: DistanceFieldMode,
        size: PixelSize,
        pixel_density: f32,
        filter: TextureFilter,
    ) -> Self {
        match mode {
            DistanceFieldMode::Sdf => {
                Self::Sdf(SdfGenerator::new(backend, size, pixel_density, filter))
            }
            DistanceFieldMode::Msdf => {
                Self::Msdf(MsdfGenerator::new(backend, size, pixel_density, filter))
            }
        }
    }

    pub fn mode(&self) -> DistanceFieldMode {
        match self {
            Self::Sdf(_) => DistanceFieldMode::Sdf,
            Self::Msdf(_) => DistanceFieldMode::Msdf,
        }
    }

    pub fn add(&mut self, curve: CurvePrimitive) {
        match self {
            Self::Sdf(g) => g.add(curve),
            Self::Msdf(g) => g.add(curve),
        }
    }

    pub fn render(&mut self, backend: &mut dyn RenderBackend) {
        match self {
            Self::Sdf(g) => g.render(backend),
            Self::Msdf(g) => g.render(backend),
        }
    }

    pub fn resize(
        &mut self,
        backend: &mut dyn RenderBackend,
        size: PixelSize,
        pixel_density: f32,
    ) -> bool {
        match self {
            Self::Sdf(g) => g.resize(backend, size, pixel_density),
            Self::Msdf(g) => {
                g.resize(backend, size.width as f32, size.height as f32, pixel_density)
            }
        }
    }

    pub fn size(&self) -> PixelSize {
        match self {
            Self::Sdf(g) => g.size(),
            Self::Msdf(g) => g.size(),
        }
    }

    /// The finished field, valid after [`render`](Self::render).
    pub fn texture(&self) -> TargetId {
        match self {
            Self::Sdf(g) => g.texture(),
            Self::Msdf(g) => g.texture(),
        }
    }

    pub fn raw_preview(&self) -> PreviewQuad {
        match self {
            Self::Sdf(g) => g.raw_preview(),
            Self::Msdf(g) => g.raw_preview(),
        }
    }

    pub fn distance_test_preview(&self) -> PreviewQuad {
        match self {
            Self::Sdf(g) => g.distance_test_preview(),
            Self::Msdf(g) => g.distance_test_preview(),
        }
    }

    pub fn channels_preview(&self) -> Vec<PreviewQuad> {
        match self {
            Self::Sdf(g) => g.channels_preview(),
            Self::Msdf(g) => g.channels_preview(),
        }
    }

    pub fn release(self, backend: &mut dyn RenderBackend) {
        match self {
            Self::Sdf(g) => g.release(backend),
            Self::Msdf(g) => g.release(backend),
        }
    }
}

#[cfg(test)]
mod tests;
