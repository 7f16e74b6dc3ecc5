use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::present::Extent;

use super::SurfaceHost;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "trigon".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
        }
    }
}

/// Single-window host driven by pumping the winit event loop from the frame
/// loop, instead of handing control to `EventLoop::run_app`.
///
/// Fields drop in declaration order: the window goes before its event loop.
pub struct WinitHost {
    window: Arc<Window>,
    state: HostState,
    event_loop: EventLoop<()>,
}

struct HostState {
    config: WindowConfig,
    window: Option<Arc<Window>>,
    create_error: Option<anyhow::Error>,

    close_requested: bool,
    resized: bool,
}

impl WinitHost {
    /// Creates the event loop and pumps it until the window exists.
    pub fn new(config: WindowConfig) -> Result<Self> {
        let mut event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = HostState {
            config,
            window: None,
            create_error: None,
            close_requested: false,
            resized: false,
        };

        let window = loop {
            let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut state);
            if let Some(err) = state.create_error.take() {
                return Err(err);
            }
            if let Some(window) = state.window.clone() {
                break window;
            }
            if let PumpStatus::Exit(code) = status {
                anyhow::bail!("event loop exited with code {code} before the window was created");
            }
        };

        // Window creation itself may have produced a resize; the first chain is
        // built from the current size anyway.
        state.resized = false;
        Ok(Self {
            window,
            state,
            event_loop,
        })
    }

    /// The host window. Cloned into the GPU context for surface creation.
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    fn pump(&mut self, timeout: Option<Duration>) {
        if let PumpStatus::Exit(code) = self.event_loop.pump_app_events(timeout, &mut self.state) {
            log::debug!("event loop exited with code {code}");
            self.state.close_requested = true;
        }
    }
}

impl SurfaceHost for WinitHost {
    fn should_terminate(&self) -> bool {
        self.state.close_requested
    }

    fn was_resized(&self) -> bool {
        self.state.resized
    }

    fn clear_resized_flag(&mut self) {
        self.state.resized = false;
    }

    fn current_extent(&self) -> Extent {
        Extent::from(self.window.inner_size())
    }

    fn poll_events(&mut self) {
        self.pump(Some(Duration::ZERO));
    }

    fn wait_events(&mut self) {
        self.pump(None);
    }
}

impl ApplicationHandler for HostState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        match event_loop.create_window(attrs) {
            Ok(window) => {
                let size = window.inner_size();
                log::info!("window created: {}x{}", size.width, size.height);
                self.window = Some(Arc::new(window));
            }
            Err(e) => {
                self.create_error = Some(anyhow::Error::new(e).context("failed to create window"));
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.close_requested = true,

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.close_requested = true,

            WindowEvent::Resized(size) => {
                log::debug!("window resized to {}x{}", size.width, size.height);
                self.resized = true;
            }

            WindowEvent::ScaleFactorChanged { .. } => self.resized = true,

            _ => {}
        }
    }
}
