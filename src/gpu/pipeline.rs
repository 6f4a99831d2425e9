//! WGSL shaders and pipeline builders for the distance-field passes.

use super::uniform_writer::CURVE_UNIFORM_SIZE;

/// Color format of every field and atlas target.
pub const FIELD_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Depth format of curve scratch targets.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Ribbon subdivisions per curve unless configured otherwise.
pub const DEFAULT_CURVE_SEGMENTS: u32 = 32;

/// Blit uniform block: the clear color the copied region is composited over.
pub const BLIT_UNIFORM_SIZE: u64 = 16;

/// Vertices in a ribbon of `segments` segments: three per chunk (outer
/// left, on-curve, outer right), one chunk per segment boundary.
pub const fn ribbon_vertex_count(segments: u32) -> u32 {
    (segments + 1) * 3
}

/// Triangle-list indices for a ribbon of `segments` segments.
///
/// Each segment joins chunk `i` to chunk `i + 1` with four triangles, two on
/// each side of the curve, so no triangle straddles the curve itself.
pub fn ribbon_indices(segments: u32) -> Vec<u32> {
    let mut out = Vec::with_capacity(segments as usize * 12);
    for i in 0..segments {
        let b = i * 3;
        out.extend_from_slice(&[
            b,
            b + 3,
            b + 1,
            b + 1,
            b + 3,
            b + 4,
            b + 1,
            b + 4,
            b + 2,
            b + 2,
            b + 4,
            b + 5,
        ]);
    }
    out
}

// --- WGSL Shaders ---

const CURVE_SHADER_SRC: &str = "
struct Curve {
    projection: mat4x4<f32>,
    ahha_x: vec4<f32>,
    ahha_y: vec4<f32>,
    padding: f32,
    winding: f32,
    kind: u32,
    segments: u32,
}

@group(0) @binding(0) var<uniform> curve: Curve;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) side: f32,
}

fn cubic_at(v: vec4<f32>, t: f32) -> f32 {
    let mt = 1.0 - t;
    return mt * mt * mt * v.x + 3.0 * mt * mt * t * v.y + 3.0 * mt * t * t * v.z + t * t * t * v.w;
}

fn cubic_slope(v: vec4<f32>, t: f32) -> f32 {
    let mt = 1.0 - t;
    return 3.0 * mt * mt * (v.y - v.x) + 6.0 * mt * t * (v.z - v.y) + 3.0 * t * t * (v.w - v.z);
}

// Quadratics keep their control point in the first handle.
fn quadratic_at(v: vec4<f32>, t: f32) -> f32 {
    let mt = 1.0 - t;
    return mt * mt * v.x + 2.0 * mt * t * v.y + t * t * v.w;
}

fn quadratic_slope(v: vec4<f32>, t: f32) -> f32 {
    return 2.0 * (1.0 - t) * (v.y - v.x) + 2.0 * t * (v.w - v.y);
}

fn point_at(t: f32) -> vec2<f32> {
    switch curve.kind {
        case 0u: {
            let a = vec2<f32>(curve.ahha_x.x, curve.ahha_y.x);
            let b = vec2<f32>(curve.ahha_x.w, curve.ahha_y.w);
            return mix(a, b, t);
        }
        case 1u: {
            return vec2<f32>(quadratic_at(curve.ahha_x, t), quadratic_at(curve.ahha_y, t));
        }
        default: {
            return vec2<f32>(cubic_at(curve.ahha_x, t), cubic_at(curve.ahha_y, t));
        }
    }
}

fn tangent_at(t: f32) -> vec2<f32> {
    let chord = vec2<f32>(curve.ahha_x.w - curve.ahha_x.x, curve.ahha_y.w - curve.ahha_y.x);
    var d = chord;
    switch curve.kind {
        case 1u: {
            d = vec2<f32>(quadratic_slope(curve.ahha_x, t), quadratic_slope(curve.ahha_y, t));
        }
        case 2u: {
            d = vec2<f32>(cubic_slope(curve.ahha_x, t), cubic_slope(curve.ahha_y, t));
        }
        default: {}
    }
    // Handles coinciding with an anchor give a zero derivative at that end.
    if (dot(d, d) < 1e-12) {
        d = chord;
    }
    if (dot(d, d) < 1e-12) {
        d = vec2<f32>(1.0, 0.0);
    }
    return normalize(d);
}

@vertex
fn vs_main(@builtin(vertex_index) vi: u32) -> VertexOutput {
    let chunk = vi / 3u;
    let side = f32(vi % 3u) - 1.0;
    let t = f32(chunk) / f32(max(curve.segments, 1u));

    let dir = tangent_at(t);
    let normal = vec2<f32>(-dir.y, dir.x);
    let pos = point_at(t) + normal * side * curve.padding;

    var out: VertexOutput;
    out.position = curve.projection * vec4<f32>(pos, 0.0, 1.0);
    // Nearest-to-curve wins where the ribbon folds over itself.
    out.position.z = abs(side);
    out.side = side;
    return out;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let v = 0.5 + 0.5 * input.side * curve.winding;
    return vec4<f32>(v, v, v, 1.0);
}
";

/// Shared full-target quad, drawn as a 4-vertex triangle strip.
const FULLSCREEN_VS: &str = "
struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_main(@builtin(vertex_index) vi: u32) -> VertexOutput {
    let corner = vec2<f32>(f32(vi & 1u), f32((vi >> 1u) & 1u));
    var out: VertexOutput;
    out.position = vec4<f32>(corner * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(corner.x, 1.0 - corner.y);
    return out;
}
";

const ACCUMULATE_FS: &str = "
@group(0) @binding(0) var previous_field: texture_2d<f32>;
@group(0) @binding(1) var incoming_field: texture_2d<f32>;

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let p = vec2<i32>(floor(input.position.xy));
    let prev = textureLoad(previous_field, p, 0);
    let inc = textureLoad(incoming_field, p, 0);
    if (inc.a <= 0.0) {
        return prev;
    }
    if (prev.a <= 0.0) {
        return inc;
    }
    if (abs(inc.r - 0.5) < abs(prev.r - 0.5)) {
        return inc;
    }
    return prev;
}
";

const MERGE_FS: &str = "
@group(0) @binding(0) var channel_r: texture_2d<f32>;
@group(0) @binding(1) var channel_g: texture_2d<f32>;
@group(0) @binding(2) var channel_b: texture_2d<f32>;

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let p = vec2<i32>(floor(input.position.xy));
    let r = textureLoad(channel_r, p, 0);
    let g = textureLoad(channel_g, p, 0);
    let b = textureLoad(channel_b, p, 0);
    return vec4<f32>(r.r, g.r, b.r, max(r.a, max(g.a, b.a)));
}
";

const BLIT_FS: &str = "
@group(0) @binding(0) var source: texture_2d<f32>;
@group(0) @binding(1) var source_sampler: sampler;
@group(0) @binding(2) var<uniform> clear_color: vec4<f32>;

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let s = textureSample(source, source_sampler, input.uv);
    return mix(clear_color, vec4<f32>(s.rgb, 1.0), s.a);
}
";

/// Full-target passes built on [`FULLSCREEN_VS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenPass {
    Accumulate,
    Merge,
    Blit,
}

impl FullscreenPass {
    fn label(self) -> &'static str {
        match self {
            Self::Accumulate => "accumulate",
            Self::Merge => "merge",
            Self::Blit => "blit",
        }
    }

    fn fragment_src(self) -> &'static str {
        match self {
            Self::Accumulate => ACCUMULATE_FS,
            Self::Merge => MERGE_FS,
            Self::Blit => BLIT_FS,
        }
    }

    /// Full WGSL module source.
    pub fn shader_src(self) -> String {
        format!("{FULLSCREEN_VS}\n{}", self.fragment_src())
    }
}

// --- Bind group layouts ---

/// Curve uniform layout: group(0) binding(0) = curve block.
pub fn create_curve_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("curve_bind_group_layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(CURVE_UNIFORM_SIZE),
            },
            count: None,
        }],
    })
}

fn field_texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

/// Layout for `count` loaded (unsampled) field textures at bindings `0..count`.
pub fn create_fields_bind_group_layout(
    device: &wgpu::Device,
    count: u32,
    label: &str,
) -> wgpu::BindGroupLayout {
    let entries: Vec<_> = (0..count).map(field_texture_entry).collect();
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &entries,
    })
}

/// Blit layout: binding(0) = source texture, binding(1) = sampler,
/// binding(2) = clear color uniform.
pub fn create_blit_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("blit_bind_group_layout"),
        entries: &[
            field_texture_entry(0),
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(BLIT_UNIFORM_SIZE),
                },
                count: None,
            },
        ],
    })
}

// --- Pipeline creation ---

/// Curve ribbon pipeline: indexed triangle list, depth-tested, no blending.
pub fn create_curve_pipeline(
    device: &wgpu::Device,
    curve_layout: &wgpu::BindGroupLayout,
    pipeline_cache: Option<&wgpu::PipelineCache>,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("curve_shader"),
        source: wgpu::ShaderSource::Wgsl(CURVE_SHADER_SRC.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("curve_pipeline_layout"),
        bind_group_layouts: &[curve_layout],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("curve_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers: &[],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: FIELD_FORMAT,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: pipeline_cache,
    })
}

/// Full-target pipeline for one of the combine or blit passes.
pub fn create_fullscreen_pipeline(
    device: &wgpu::Device,
    pass: FullscreenPass,
    layout: &wgpu::BindGroupLayout,
    pipeline_cache: Option<&wgpu::PipelineCache>,
) -> wgpu::RenderPipeline {
    let label = pass.label();
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(pass.shader_src().into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[layout],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers: &[],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: FIELD_FORMAT,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: pipeline_cache,
    })
}

#[cfg(test)]
mod tests {
    use super::{FullscreenPass, ribbon_indices, ribbon_vertex_count};

    #[test]
    fn ribbon_indices_stay_in_range() {
        let segments = 32;
        let indices = ribbon_indices(segments);
        assert_eq!(indices.len(), 32 * 12);
        let max = indices.iter().copied().max().unwrap();
        assert_eq!(max, ribbon_vertex_count(segments) - 1);
    }

    #[test]
    fn ribbon_triangles_never_straddle_the_curve() {
        // Vertex `i % 3` is the side: 0 outer left, 1 on-curve, 2 outer right.
        for tri in ribbon_indices(8).chunks(3) {
            let sides: Vec<u32> = tri.iter().map(|i| i % 3).collect();
            assert!(
                !(sides.contains(&0) && sides.contains(&2)),
                "triangle {tri:?} spans both sides"
            );
        }
    }

    #[test]
    fn first_segment_pattern() {
        assert_eq!(ribbon_indices(1), vec![0, 3, 1, 1, 3, 4, 1, 4, 2, 2, 4, 5]);
    }

    #[test]
    fn fullscreen_shaders_share_vertex_stage() {
        for pass in [FullscreenPass::Accumulate, FullscreenPass::Merge, FullscreenPass::Blit] {
            let src = pass.shader_src();
            assert!(src.contains("fn vs_main"));
            assert!(src.contains("fn fs_main"));
        }
    }
}
