//! Window host + runtime entry point.
//!
//! The frame orchestrator only sees the [`SurfaceHost`] trait; [`WinitHost`]
//! implements it over a pumped winit event loop.

mod host;
mod runtime;
mod winit_host;

pub use host::SurfaceHost;
pub use runtime::Runtime;
pub use winit_host::{WindowConfig, WinitHost};
