//! Uniform byte buffer writer for the curve pass.

use crate::curve::CurvePrimitive;

use super::Camera;

/// Curve uniform block size in bytes.
///
/// Layout:
///   [0..64]    projection: mat4x4<f32>
///   [64..80]   `ahha_x`:   vec4<f32>  (anchor1, handle1, handle2, anchor2 x)
///   [80..96]   `ahha_y`:   vec4<f32>  (same, y)
///   [96..100]  padding:  f32
///   [100..104] winding:  f32  (+1 / -1)
///   [104..108] kind:     u32  (0 linear, 1 quadratic, 2 cubic)
///   [108..112] segments: u32
pub const CURVE_UNIFORM_SIZE: u64 = 112;

/// Reuse an existing uniform buffer when it is large enough, otherwise
/// create a new one. Writes `data` either way.
pub(super) fn reuse_or_create_buffer(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    existing: Option<wgpu::Buffer>,
    data: &[u8],
    label: &str,
) -> wgpu::Buffer {
    let needed = data.len() as u64;
    if let Some(buf) = existing {
        if buf.size() >= needed {
            queue.write_buffer(&buf, 0, data);
            return buf;
        }
    }
    let buf = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: needed,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    queue.write_buffer(&buf, 0, data);
    buf
}

/// Writes uniform data to a byte buffer without unsafe code.
pub(super) struct UniformWriter {
    data: Vec<u8>,
}

impl UniformWriter {
    pub(super) fn new() -> Self {
        Self {
            data: Vec::with_capacity(CURVE_UNIFORM_SIZE as usize),
        }
    }

    pub(super) fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn push_f32(&mut self, v: f32) {
        self.data.extend_from_slice(&v.to_ne_bytes());
    }

    fn push_u32(&mut self, v: u32) {
        self.data.extend_from_slice(&v.to_ne_bytes());
    }

    pub(super) fn push_matrix(&mut self, m: &[f32; 16]) {
        for &v in m {
            self.push_f32(v);
        }
    }

    /// Full curve uniform block for one draw.
    pub(super) fn push_curve(&mut self, curve: &CurvePrimitive, camera: &Camera, segments: u32) {
        self.push_matrix(&camera.projection());
        let points = curve.points();
        for p in &points {
            self.push_f32(p.x);
        }
        for p in &points {
            self.push_f32(p.y);
        }
        self.push_f32(curve.padding);
        self.push_f32(curve.winding.sign());
        self.push_u32(curve.kind.shader_index());
        self.push_u32(segments);
    }
}
