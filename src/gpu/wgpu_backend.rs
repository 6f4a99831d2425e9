//! [`RenderBackend`] on top of wgpu.
//!
//! Each operation records into its own encoder and submits immediately.

use wgpu::util::DeviceExt;

use crate::curve::CurvePrimitive;
use crate::geometry::PixelSize;

use super::pipeline::{
    self, BLIT_UNIFORM_SIZE, DEPTH_FORMAT, FIELD_FORMAT, FullscreenPass,
};
use super::uniform_writer::{UniformWriter, reuse_or_create_buffer};
use super::{
    Camera, CombinePass, GpuState, RenderBackend, Rgba, TargetDesc, TargetId, TextureFilter,
    Viewport,
};

/// One arena slot.
struct Target {
    desc: TargetDesc,
    view: wgpu::TextureView,
    depth: Option<wgpu::TextureView>,
}

/// GPU implementation of the render backend.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    targets: Vec<Option<Target>>,
    clear_color: Rgba,
    curve_segments: u32,

    curve_layout: wgpu::BindGroupLayout,
    accumulate_layout: wgpu::BindGroupLayout,
    merge_layout: wgpu::BindGroupLayout,
    blit_layout: wgpu::BindGroupLayout,
    curve_pipeline: wgpu::RenderPipeline,
    accumulate_pipeline: wgpu::RenderPipeline,
    merge_pipeline: wgpu::RenderPipeline,
    blit_pipeline: wgpu::RenderPipeline,

    ribbon_indices: wgpu::Buffer,
    ribbon_index_count: u32,
    curve_uniforms: Option<wgpu::Buffer>,
    blit_uniforms: Option<wgpu::Buffer>,
    linear_sampler: wgpu::Sampler,
    nearest_sampler: wgpu::Sampler,
}

fn to_wgpu_color(c: Rgba) -> wgpu::Color {
    wgpu::Color {
        r: f64::from(c[0]),
        g: f64::from(c[1]),
        b: f64::from(c[2]),
        a: f64::from(c[3]),
    }
}

fn create_sampler(device: &wgpu::Device, filter: wgpu::FilterMode, label: &str) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: filter,
        min_filter: filter,
        ..Default::default()
    })
}

impl WgpuBackend {
    /// Build every pipeline up front. Curves are tessellated into
    /// `curve_segments` ribbon segments.
    pub fn new(gpu: &GpuState, curve_segments: u32) -> Self {
        let device = gpu.device.clone();
        let curve_segments = curve_segments.max(1);

        let curve_layout = pipeline::create_curve_bind_group_layout(&device);
        let accumulate_layout =
            pipeline::create_fields_bind_group_layout(&device, 2, "accumulate_bind_group_layout");
        let merge_layout =
            pipeline::create_fields_bind_group_layout(&device, 3, "merge_bind_group_layout");
        let blit_layout = pipeline::create_blit_bind_group_layout(&device);

        let curve_pipeline = pipeline::create_curve_pipeline(&device, &curve_layout, None);
        let accumulate_pipeline = pipeline::create_fullscreen_pipeline(
            &device,
            FullscreenPass::Accumulate,
            &accumulate_layout,
            None,
        );
        let merge_pipeline = pipeline::create_fullscreen_pipeline(
            &device,
            FullscreenPass::Merge,
            &merge_layout,
            None,
        );
        let blit_pipeline =
            pipeline::create_fullscreen_pipeline(&device, FullscreenPass::Blit, &blit_layout, None);

        let indices = pipeline::ribbon_indices(curve_segments);
        let index_bytes: Vec<u8> = indices.iter().flat_map(|i| i.to_ne_bytes()).collect();
        let ribbon_indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ribbon_indices"),
            contents: &index_bytes,
            usage: wgpu::BufferUsages::INDEX,
        });

        let linear_sampler = create_sampler(&device, wgpu::FilterMode::Linear, "field_linear");
        let nearest_sampler = create_sampler(&device, wgpu::FilterMode::Nearest, "field_nearest");

        log::debug!("wgpu backend ready: {curve_segments} segments per curve");

        Self {
            device,
            queue: gpu.queue.clone(),
            targets: Vec::new(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            curve_segments,
            curve_layout,
            accumulate_layout,
            merge_layout,
            blit_layout,
            curve_pipeline,
            accumulate_pipeline,
            merge_pipeline,
            blit_pipeline,
            ribbon_indices,
            ribbon_index_count: indices.len() as u32,
            curve_uniforms: None,
            blit_uniforms: None,
            linear_sampler,
            nearest_sampler,
        }
    }

    /// The color texture behind a live target, for handing to a material.
    pub fn texture_view(&self, target: TargetId) -> Option<&wgpu::TextureView> {
        self.target(target).map(|t| &t.view)
    }

    fn target(&self, id: TargetId) -> Option<&Target> {
        self.targets.get(id.index()).and_then(Option::as_ref)
    }

    /// Look up a target, logging instead of panicking on stale handles.
    fn live(&self, id: TargetId, op: &str) -> Option<&Target> {
        let t = self.target(id);
        if t.is_none() {
            log::warn!("{op}: unknown or released render target {id:?}");
        }
        t
    }

    fn submit(&self, label: &str, record: impl FnOnce(&mut wgpu::CommandEncoder)) {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) });
        record(&mut encoder);
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_view(&self, desc: &TargetDesc, format: wgpu::TextureFormat) -> wgpu::TextureView {
        let size = desc.size;
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(desc.label),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Full-target pass over `target` reading the views bound in `bind_group`.
    fn run_fullscreen(
        &self,
        label: &str,
        pipeline: &wgpu::RenderPipeline,
        bind_group: &wgpu::BindGroup,
        target: &Target,
        viewport: Option<Viewport>,
    ) {
        let load = match viewport {
            // Region writes keep the rest of the target.
            Some(_) => wgpu::LoadOp::Load,
            None => wgpu::LoadOp::Clear(to_wgpu_color(self.clear_color)),
        };
        self.submit(label, |encoder| {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(label),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            if let Some(vp) = viewport {
                rpass.set_viewport(
                    vp.x as f32,
                    vp.y as f32,
                    vp.width as f32,
                    vp.height as f32,
                    0.0,
                    1.0,
                );
                rpass.set_scissor_rect(vp.x, vp.y, vp.width, vp.height);
            }
            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, bind_group, &[]);
            rpass.draw(0..4, 0..1);
        });
    }

    fn fields_bind_group(
        &self,
        layout: &wgpu::BindGroupLayout,
        views: &[&wgpu::TextureView],
        label: &str,
    ) -> wgpu::BindGroup {
        let entries: Vec<_> = views
            .iter()
            .enumerate()
            .map(|(i, view)| wgpu::BindGroupEntry {
                binding: i as u32,
                resource: wgpu::BindingResource::TextureView(view),
            })
            .collect();
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &entries,
        })
    }
}

impl RenderBackend for WgpuBackend {
    fn create_target(&mut self, desc: &TargetDesc) -> TargetId {
        let view = self.create_view(desc, FIELD_FORMAT);
        let depth = desc.depth.then(|| self.create_view(desc, DEPTH_FORMAT));
        let id = TargetId(self.targets.len() as u32);
        self.targets.push(Some(Target {
            desc: *desc,
            view,
            depth,
        }));
        log::debug!("render target {id:?} '{}' {}", desc.label, desc.size);
        id
    }

    fn release_target(&mut self, target: TargetId) {
        let released = self.targets.get_mut(target.index()).and_then(Option::take);
        if released.is_none() {
            log::warn!("release: unknown or released render target {target:?}");
        }
    }

    fn target_size(&self, target: TargetId) -> Option<PixelSize> {
        self.target(target).map(|t| t.desc.size)
    }

    fn clear_color(&self) -> Rgba {
        self.clear_color
    }

    fn set_clear_color(&mut self, color: Rgba) {
        self.clear_color = color;
    }

    fn clear(&mut self, target: TargetId) {
        let Some(t) = self.live(target, "clear") else {
            return;
        };
        let color = to_wgpu_color(self.clear_color);
        self.submit("clear", |encoder| {
            let _rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("clear_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &t.view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: t.depth.as_ref().map(|view| {
                    wgpu::RenderPassDepthStencilAttachment {
                        view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        });
    }

    fn draw_curve(&mut self, target: TargetId, curve: &CurvePrimitive, camera: &Camera) {
        if self.live(target, "draw_curve").is_none() {
            return;
        }

        let mut writer = UniformWriter::new();
        writer.push_curve(curve, camera, self.curve_segments);
        let buffer = reuse_or_create_buffer(
            &self.device,
            &self.queue,
            self.curve_uniforms.take(),
            &writer.into_bytes(),
            "curve_uniforms",
        );
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("curve_bind_group"),
            layout: &self.curve_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        self.curve_uniforms = Some(buffer);

        let Some(t) = self.target(target) else {
            return;
        };
        self.submit("draw_curve", |encoder| {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("curve_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &t.view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: t.depth.as_ref().map(|view| {
                    wgpu::RenderPassDepthStencilAttachment {
                        view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            rpass.set_pipeline(&self.curve_pipeline);
            rpass.set_bind_group(0, &bind_group, &[]);
            rpass.set_index_buffer(self.ribbon_indices.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..self.ribbon_index_count, 0, 0..1);
        });
    }

    fn combine(&mut self, pass: &CombinePass, target: TargetId) {
        let Some(out) = self.live(target, "combine") else {
            return;
        };
        let inputs: Option<Vec<&wgpu::TextureView>> = pass
            .inputs()
            .into_iter()
            .map(|id| self.live(id, "combine input").map(|t| &t.view))
            .collect();
        let Some(inputs) = inputs else {
            return;
        };

        let (layout, pipeline, label) = match pass {
            CombinePass::Accumulate { .. } => {
                (&self.accumulate_layout, &self.accumulate_pipeline, "accumulate")
            }
            CombinePass::MergeChannels { .. } => {
                (&self.merge_layout, &self.merge_pipeline, "merge")
            }
        };
        let bind_group = self.fields_bind_group(layout, &inputs, label);
        self.run_fullscreen(label, pipeline, &bind_group, out, None);
    }

    fn blit(&mut self, source: TargetId, target: TargetId, viewport: Option<Viewport>) {
        if self.live(source, "blit source").is_none() || self.live(target, "blit").is_none() {
            return;
        }

        let color_bytes: Vec<u8> = self.clear_color.iter().flat_map(|c| c.to_ne_bytes()).collect();
        debug_assert_eq!(color_bytes.len() as u64, BLIT_UNIFORM_SIZE);
        let buffer = reuse_or_create_buffer(
            &self.device,
            &self.queue,
            self.blit_uniforms.take(),
            &color_bytes,
            "blit_uniforms",
        );

        let (Some(src), Some(dst)) = (self.target(source), self.target(target)) else {
            return;
        };
        let sampler = match src.desc.filter {
            TextureFilter::Linear => &self.linear_sampler,
            TextureFilter::Nearest => &self.nearest_sampler,
        };
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("blit_bind_group"),
            layout: &self.blit_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&src.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: buffer.as_entire_binding(),
                },
            ],
        });
        self.run_fullscreen("blit", &self.blit_pipeline, &bind_group, dst, viewport);
        self.blit_uniforms = Some(buffer);
    }
}
