//! Thin `wgpu` glue for the values this crate computes.
//!
//! Nothing here decides geometry. It answers whether a GPU compute backend
//! is usable at all, bundles the layout objects a compute pipeline is built
//! from, and records a [`DispatchCount`] into a compute pass.
//!
//! The support check runs once per process and is cached via `lazy_static`.

use crate::dispatch::DispatchCount;
use crate::error::Result;

/// Failure to bring up a GPU device.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    /// An error in requesting the adapter.
    #[error("adapter error: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    /// An error in requesting the device.
    #[error("device error: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

/// A device and its queue.
pub struct GpuContext {
    /// The GPU device.
    pub device: wgpu::Device,
    /// Command queue for `device`.
    pub queue: wgpu::Queue,
}

impl GpuContext {
    /// Selects the default adapter and creates a device and queue.
    ///
    /// Blocks on the async `wgpu` requests with `pollster`.
    ///
    /// # Errors
    ///
    /// [`GpuError`] if adapter or device acquisition fails.
    pub fn new() -> Result<Self, GpuError> {
        let instance = wgpu::Instance::default();
        let adapter =
            pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))?;
        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("wgdispatch"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::default(),
        }))?;

        Ok(Self { device, queue })
    }
}

lazy_static::lazy_static! {
    static ref GPU_SUPPORTED: bool = match GpuContext::new() {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!(%err, "no usable GPU compute backend");
            false
        }
    };
}

/// Whether a GPU compute backend can be brought up on this machine.
///
/// The first call requests an adapter and device; later calls return the
/// cached answer.
#[must_use]
pub fn is_gpu_supported() -> bool {
    *GPU_SUPPORTED
}

/// The layout objects a compute pipeline is created from.
pub struct GpuLayout {
    /// Layout of the single bind group the kernel uses.
    pub bind_group_layout: wgpu::BindGroupLayout,
    /// Pipeline layout wrapping `bind_group_layout`.
    pub pipeline_layout: wgpu::PipelineLayout,
}

impl GpuLayout {
    /// Creates a bind group layout from `entries` and a pipeline layout
    /// around it, both labeled after `label`.
    #[must_use]
    pub fn new(device: &wgpu::Device, label: &str, entries: &[wgpu::BindGroupLayoutEntry]) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{label}_bgl")),
            entries,
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{label}_pipeline_layout")),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        Self {
            bind_group_layout,
            pipeline_layout,
        }
    }
}

/// Records `count` into `pass` with `dispatch_workgroups`.
///
/// An empty count records nothing. Returns whether a dispatch was recorded.
///
/// # Errors
///
/// [`DispatchError::DispatchTooLarge`](crate::DispatchError::DispatchTooLarge)
/// if an axis does not fit in `u32`.
pub fn record_dispatch(pass: &mut wgpu::ComputePass<'_>, count: DispatchCount) -> Result<bool> {
    if count.is_empty() {
        tracing::trace!(dispatch = ?count.as_array(), "skipping empty dispatch");
        return Ok(false);
    }

    let [x, y, z] = count.to_u32()?;
    pass.dispatch_workgroups(x, y, z);
    Ok(true)
}
