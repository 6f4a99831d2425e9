//! GPU distance-field glyph atlas.
//!
//! Glyph outlines are decomposed into curve primitives ([`outline`],
//! [`curve`]), rasterized into signed distance fields by drawing each curve
//! as a ribbon ([`sdf`]), and packed into one shared texture ([`packer`],
//! [`atlas`]). All GPU work goes through the [`gpu::RenderBackend`] trait so
//! the pipeline runs the same on wgpu and on the recording backend used in
//! tests.

pub mod atlas;
pub mod config;
pub mod curve;
pub mod font;
pub mod geometry;
pub mod gpu;
pub mod outline;
pub mod packer;
pub mod sdf;
