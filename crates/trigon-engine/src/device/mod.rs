//! wgpu implementation of the presentation collaborators.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue ([`Gpu`])
//! - configuring the window surface and its depth attachments ([`SurfaceChain`])
//! - per-frame command encoding and submission fencing ([`FrameRecording`])

mod chain;
mod gpu;
mod init;
mod recording;
mod surface;

pub use chain::{ChainFrameBuffer, SurfaceChain};
pub use gpu::Gpu;
pub use init::GpuInit;
pub use recording::FrameRecording;
