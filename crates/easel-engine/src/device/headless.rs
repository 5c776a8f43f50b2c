use anyhow::{Context, Result};

use super::init::instance_flags;
use super::Backend;

/// Device and queue acquired without a presentation surface.
pub struct HeadlessGpu {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub adapter_info: wgpu::AdapterInfo,
}

/// Acquires a device for off-screen rendering.
///
/// Hardware adapters are tried first; when none is available a fallback
/// (software) adapter is requested so CI machines without a GPU can still
/// render.
pub async fn request_headless(backend: Backend, debug: bool) -> Result<HeadlessGpu> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: backend.wgpu_backends(),
        flags: instance_flags(debug),
        ..Default::default()
    });

    let adapter = match request_adapter(&instance, false).await {
        Ok(adapter) => adapter,
        Err(err) => {
            log::debug!("no hardware adapter ({err:#}); trying fallback adapter");
            request_adapter(&instance, true).await?
        }
    };

    let adapter_info = adapter.get_info();
    log::info!(
        "headless adapter: {} ({:?}, {:?})",
        adapter_info.name,
        adapter_info.backend,
        adapter_info.device_type
    );

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("easel headless device"),
            required_features: wgpu::Features::empty(),
            required_limits: backend.required_limits().using_resolution(adapter.limits()),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        })
        .await
        .context("failed to create wgpu device/queue")?;

    Ok(HeadlessGpu {
        device,
        queue,
        adapter_info,
    })
}

async fn request_adapter(instance: &wgpu::Instance, fallback: bool) -> Result<wgpu::Adapter> {
    instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: fallback,
        })
        .await
        .context("failed to find a suitable GPU adapter")
}
