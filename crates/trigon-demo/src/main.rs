use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use winit::dpi::LogicalSize;

use trigon_engine::core::{App, AppControl, FrameStats};
use trigon_engine::device::{Gpu, GpuInit};
use trigon_engine::logging::{LoggingConfig, init_logging};
use trigon_engine::present::FrameTarget;
use trigon_engine::render::{Model, RenderCtx, SimpleRenderSystem, Vertex};
use trigon_engine::scene::{GameObject, RevealAnimation};
use trigon_engine::time::{FpsMeter, FrameTime};
use trigon_engine::window::{Runtime, WindowConfig};

/// Number of nested layers in the scene.
const LAYERS: i32 = 8;

/// Each layer is this much smaller than the one around it.
const LAYER_SHRINK: f32 = 0.8;

const BASE_COLOR: [f32; 3] = [0.1, 0.8, 0.1];

struct RevealDemo {
    system: SimpleRenderSystem,
    objects: Vec<GameObject>,
    animation: RevealAnimation,
    fps: FpsMeter,
}

impl RevealDemo {
    fn new(ctx: &RenderCtx<'_>) -> Result<Self> {
        Ok(Self {
            system: SimpleRenderSystem::new(ctx),
            objects: nested_triangles(ctx.device)?,
            animation: RevealAnimation::new(LAYERS),
            fps: FpsMeter::new(),
        })
    }
}

impl App<Gpu> for RevealDemo {
    fn update(&mut self, time: FrameTime) -> AppControl {
        self.animation.advance(time.dt, &mut self.objects);
        AppControl::Continue
    }

    fn draw(&mut self, target: &mut FrameTarget<'_, Gpu>) {
        let ctx = RenderCtx::from_gpu(target.context, target.layout);
        if let Some(pass) = target.recording.pass_mut() {
            self.system.render_game_objects(&ctx, pass, &self.objects);
        }
    }

    fn frame_presented(&mut self) {
        if let Some(fps) = self.fps.frame() {
            log::info!("fps: {fps:.1}, objects: {}", self.objects.len());
        }
    }
}

/// One triangle per layer, outermost first, all sharing one model.
fn nested_triangles(device: &wgpu::Device) -> Result<Vec<GameObject>> {
    let model = Arc::new(Model::new(
        device,
        &[
            Vertex::at(0.0, 0.9),
            Vertex::at(-0.9, -0.9),
            Vertex::at(0.9, -0.9),
        ],
    )?);

    Ok((0..LAYERS)
        .map(|depth| {
            let scale = LAYER_SHRINK.powi(depth);
            // Darken inner layers slightly so the nesting stays visible.
            let shade = 1.0 - 0.08 * depth as f32;

            let mut obj = GameObject::with_model(model.clone());
            obj.depth = depth;
            obj.color = BASE_COLOR.map(|c| c * shade);
            obj.transform.scale = [scale, scale];
            obj
        })
        .collect())
}

fn run() -> Result<FrameStats> {
    let window = WindowConfig {
        title: "trigon".to_string(),
        initial_size: LogicalSize::new(800.0, 600.0),
    };
    Runtime::run(window, GpuInit::default(), RevealDemo::new)
}

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    match run() {
        Ok(stats) => {
            log::info!(
                "exiting after {} frames ({} rebuilds)",
                stats.presented,
                stats.rebuilds
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
