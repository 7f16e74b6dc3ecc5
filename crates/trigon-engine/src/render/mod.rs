//! GPU rendering subsystem.
//!
//! Renderers record into the swapchain render pass opened by the frame
//! orchestrator. Each renderer is responsible for its own GPU resources
//! (pipelines, buffers) and builds its pipeline against the chain's
//! [`RenderPassLayout`](crate::present::RenderPassLayout).
//!
//! Convention:
//! - geometry is in normalized device coordinates (+Y up).

mod ctx;
mod model;
mod simple;

pub use ctx::RenderCtx;
pub use model::{Model, Vertex};
pub use simple::SimpleRenderSystem;
