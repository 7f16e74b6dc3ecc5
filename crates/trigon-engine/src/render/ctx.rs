use crate::device::Gpu;
use crate::present::{ChainFormat, RenderPassLayout};

/// Renderer-facing context (device/queue + the chain's render-pass layout).
///
/// This is intentionally small and stable.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub layout: &'a RenderPassLayout,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        layout: &'a RenderPassLayout,
    ) -> Self {
        Self {
            device,
            queue,
            layout,
        }
    }

    #[inline]
    pub fn from_gpu(gpu: &'a Gpu, layout: &'a RenderPassLayout) -> Self {
        Self::new(gpu.device(), gpu.queue(), layout)
    }

    #[inline]
    pub fn format(&self) -> ChainFormat {
        self.layout.format
    }
}
