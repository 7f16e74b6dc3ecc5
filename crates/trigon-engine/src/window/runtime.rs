use anyhow::{Context, Result};

use crate::core::{App, FrameStats, run_frames};
use crate::device::{Gpu, GpuInit};
use crate::present::FrameOrchestrator;
use crate::render::RenderCtx;

use super::{WindowConfig, WinitHost};

/// Entry point wiring window, GPU and frame loop together.
pub struct Runtime;

impl Runtime {
    /// Opens the window, builds the GPU context and the orchestrator, lets
    /// `build` create the application against the chain's render-pass layout,
    /// then runs the frame loop until the window closes.
    pub fn run<A, F>(window: WindowConfig, gpu_init: GpuInit, build: F) -> Result<FrameStats>
    where
        A: App<Gpu>,
        F: FnOnce(&RenderCtx<'_>) -> Result<A>,
    {
        let mut host = WinitHost::new(window)?;

        let gpu = pollster::block_on(Gpu::new(host.window().clone(), gpu_init))
            .context("GPU initialization failed")?;
        let mut orchestrator = FrameOrchestrator::new(gpu, &mut host)?;

        // Dropped before the orchestrator, which waits for the device on drop.
        let mut app = {
            let ctx = RenderCtx::from_gpu(orchestrator.context(), orchestrator.render_pass());
            build(&ctx).context("failed to build the application")?
        };

        run_frames(&mut orchestrator, &mut host, &mut app)
    }
}
