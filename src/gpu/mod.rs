//! GPU seam: the render backend trait the distance-field generators drive,
//! plus the wgpu implementation and a headless recording backend.
//!
//! Render targets live in a backend-owned arena and are referred to by
//! [`TargetId`]. Every operation takes the backend explicitly; nothing here
//! holds global GPU state.

pub mod pipeline;
mod recording;
mod state;
mod uniform_writer;
mod wgpu_backend;

pub use recording::{RecordedCommand, RecordingBackend};
pub use state::{GpuError, GpuState};
pub use wgpu_backend::WgpuBackend;

use crate::curve::CurvePrimitive;
use crate::geometry::PixelSize;

/// Linear RGBA color.
pub type Rgba = [f32; 4];

/// Clear color used for distance-field targets: "no curve here".
pub const FIELD_CLEAR: Rgba = [0.0, 0.0, 0.0, 0.0];

/// Handle to a backend-owned render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u32);

impl TargetId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Sampling filter for a target when it is read by a later pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureFilter {
    Nearest,
    #[default]
    Linear,
}

/// Parameters for [`RenderBackend::create_target`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetDesc {
    pub label: &'static str,
    pub size: PixelSize,
    pub filter: TextureFilter,
    /// Attach a depth buffer so overlapping ribbon triangles keep the
    /// sample nearest the curve.
    pub depth: bool,
}

impl TargetDesc {
    pub const fn new(label: &'static str, size: PixelSize, filter: TextureFilter) -> Self {
        Self {
            label,
            size,
            filter,
            depth: false,
        }
    }

    #[must_use]
    pub const fn with_depth(mut self) -> Self {
        self.depth = true;
        self
    }
}

/// Pixel rectangle inside a target, origin at the target's first row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Orthographic camera over a pixel-space rectangle `[0, width] x [0, height]`
/// with y growing upward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub width: f32,
    pub height: f32,
}

impl Camera {
    pub fn pixels(size: PixelSize) -> Self {
        Self {
            width: size.width as f32,
            height: size.height as f32,
        }
    }

    /// Column-major projection matrix mapping camera pixels to clip space.
    #[rustfmt::skip]
    pub fn projection(&self) -> [f32; 16] {
        let w = self.width.max(1.0);
        let h = self.height.max(1.0);
        [
            2.0 / w, 0.0, 0.0, 0.0,
            0.0, 2.0 / h, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            -1.0, -1.0, 0.0, 1.0,
        ]
    }
}

/// Full-target passes that read other targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinePass {
    /// Per texel, keep whichever of `previous` and `incoming` lies closer to
    /// a curve. Incoming texels with no coverage leave `previous` intact.
    Accumulate {
        previous: TargetId,
        incoming: TargetId,
    },
    /// Write the first color component of channel `k` into component `k`
    /// of the output.
    MergeChannels { channels: [TargetId; 3] },
}

impl CombinePass {
    /// Every target the pass samples.
    pub fn inputs(&self) -> Vec<TargetId> {
        match *self {
            Self::Accumulate { previous, incoming } => vec![previous, incoming],
            Self::MergeChannels { channels } => channels.to_vec(),
        }
    }
}

/// The rasterization primitive the distance-field pipeline is built on.
///
/// Implementations own every render target and keep a current clear color,
/// which [`clear`](Self::clear) and [`blit`](Self::blit) use.
pub trait RenderBackend {
    fn create_target(&mut self, desc: &TargetDesc) -> TargetId;

    fn release_target(&mut self, target: TargetId);

    /// Size of a live target, `None` once released.
    fn target_size(&self, target: TargetId) -> Option<PixelSize>;

    fn clear_color(&self) -> Rgba;

    fn set_clear_color(&mut self, color: Rgba);

    /// Fill the whole target (and its depth buffer) with the clear color.
    fn clear(&mut self, target: TargetId);

    /// Draw one curve as a distance ribbon.
    fn draw_curve(&mut self, target: TargetId, curve: &CurvePrimitive, camera: &Camera);

    /// Run a combine pass writing every texel of `target`.
    fn combine(&mut self, pass: &CombinePass, target: TargetId);

    /// Copy `source` into `viewport` of `target` (the whole target when
    /// `None`), clearing that region first.
    fn blit(&mut self, source: TargetId, target: TargetId, viewport: Option<Viewport>);
}

/// Run `f` with the backend's clear color set to `color`, restoring the
/// previous color afterwards.
pub fn with_clear_color<B, R>(backend: &mut B, color: Rgba, f: impl FnOnce(&mut B) -> R) -> R
where
    B: RenderBackend + ?Sized,
{
    let saved = backend.clear_color();
    backend.set_clear_color(color);
    let out = f(backend);
    backend.set_clear_color(saved);
    out
}
