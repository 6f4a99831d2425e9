//! Headless wgpu device setup.

use thiserror::Error;

/// Failures while bringing up a GPU device.
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("no compatible GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}

/// Instance, adapter, device and queue for offscreen rendering.
pub struct GpuState {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuState {
    /// Initialize without a surface. Distance fields only ever render into
    /// offscreen textures, so any adapter will do.
    pub fn new_headless() -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))?;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("glyphfield"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            ..Default::default()
        }))?;

        log::info!("GPU init: adapter={}", adapter.get_info().name);

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }
}
