//! Frame orchestration and presentation-chain lifecycle.
//!
//! This module is responsible for:
//! - owning the presentation chain and rebuilding it when the surface goes stale
//! - owning one command-recording slot per frame in flight
//! - sequencing acquire → record → submit/present and advancing the frame index
//!
//! It is written against the collaborator traits in [`backend`]; the wgpu
//! implementation lives in `crate::device`.

mod backend;
mod error;
mod orchestrator;
mod rebuild;
mod sequencer;
mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use backend::{CommandRecorder, ExecutionContext, PresentationChain, Recording};
pub use error::FrameError;
pub use orchestrator::{CommandBufferHandle, FrameOrchestrator, FrameState, FrameTarget};
pub use rebuild::{verify_compatible, wait_for_usable_extent};
pub use sequencer::CommandSequencer;
pub use types::{
    ChainFormat, ChainStatus, Extent, ImageIndex, MAX_FRAMES_IN_FLIGHT, RenderPassLayout,
    ScissorRect, ViewportState,
};
