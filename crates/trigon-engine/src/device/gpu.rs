use std::sync::Arc;

use anyhow::{Context, Result};
use winit::window::Window;

use crate::present::{Extent, ExecutionContext};

use super::chain::SurfaceChain;
use super::init::GpuInit;
use super::recording::FrameRecording;

/// Device objects shared by the context, the chain and every recording slot.
pub(crate) struct GpuShared {
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,
    /// Declared before `window` so the surface is released first.
    pub(crate) surface: wgpu::Surface<'static>,
    pub(crate) window: Arc<Window>,
}

/// Owns wgpu core objects and acts as the execution context for the frame
/// orchestrator:
/// - creates and stores Instance/Adapter/Device/Queue
/// - creates the Surface and builds presentation chains for it
/// - allocates per-frame recording slots
pub struct Gpu {
    /// wgpu instance used to create the adapter and surface.
    _instance: wgpu::Instance,

    /// Selected adapter; re-queried for surface capabilities on every rebuild.
    adapter: wgpu::Adapter,

    shared: Arc<GpuShared>,
    init: GpuInit,
}

impl Gpu {
    /// Creates a GPU context bound to a window.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu. The surface is
    /// created but not configured; that happens when the first chain is built.
    pub async fn new(window: Arc<Window>, init: GpuInit) -> Result<Self> {
        // Use all backends to allow wgpu to select the optimal platform backend.
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("trigon-engine device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        Ok(Self {
            _instance: instance,
            adapter,
            shared: Arc::new(GpuShared {
                device,
                queue,
                surface,
                window,
            }),
            init,
        })
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.shared.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.shared.queue
    }

}

impl ExecutionContext for Gpu {
    type Chain = SurfaceChain;

    fn create_chain(
        &mut self,
        extent: Extent,
        previous: Option<&SurfaceChain>,
    ) -> Result<SurfaceChain> {
        SurfaceChain::new(
            self.shared.clone(),
            &self.adapter,
            &self.init,
            extent,
            previous,
        )
    }

    fn allocate_recordings(&mut self, count: usize) -> Result<Vec<FrameRecording>> {
        Ok((0..count)
            .map(|slot| FrameRecording::new(self.shared.clone(), slot))
            .collect())
    }

    fn wait_idle(&mut self) -> Result<()> {
        self.shared
            .device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: None,
            })
            .context("failed waiting for the device to go idle")?;
        Ok(())
    }
}
