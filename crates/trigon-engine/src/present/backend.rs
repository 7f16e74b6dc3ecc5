//! Collaborator contracts consumed by the frame orchestrator.
//!
//! The orchestrator is generic over these traits. `device` provides the wgpu
//! implementation; tests drive the same state machine with a scripted backend.

use anyhow::Result;

use super::{
    ChainFormat, ChainStatus, Extent, ImageIndex, RenderPassLayout, ScissorRect, ViewportState,
};

/// A reusable command-recording slot.
///
/// One recorder exists per frame in flight. Implementations must not start a new
/// recording while the previous submission from the same slot is still executing.
pub trait CommandRecorder {
    /// Attachments a render pass draws into.
    type FrameBuffer;

    fn begin_recording(&mut self) -> Result<()>;
    fn end_recording(&mut self) -> Result<()>;

    /// Opens the render pass on the current recording. Fails when there is no
    /// open recording or `target` has nothing to draw into.
    fn begin_render_pass(
        &mut self,
        layout: &RenderPassLayout,
        target: &Self::FrameBuffer,
        extent: Extent,
    ) -> Result<()>;
    fn set_viewport(&mut self, viewport: ViewportState);
    fn set_scissor(&mut self, scissor: ScissorRect);
    fn end_render_pass(&mut self);
}

/// The rotating set of presentable images negotiated with the surface.
pub trait PresentationChain {
    type FrameBuffer;
    type Recording: CommandRecorder<FrameBuffer = Self::FrameBuffer>;

    /// Number of presentable images (2 or 3).
    fn image_count(&self) -> usize;
    fn format(&self) -> ChainFormat;
    fn extent(&self) -> Extent;
    fn render_pass(&self) -> &RenderPassLayout;
    fn frame_buffer(&self, image: ImageIndex) -> Option<&Self::FrameBuffer>;

    fn acquire_next_image(&mut self) -> (ImageIndex, ChainStatus);

    /// Submits the finished recording and presents `image`.
    fn submit_and_present(&mut self, recording: &mut Self::Recording, image: ImageIndex)
    -> ChainStatus;

    /// `true` when both chains render into identical formats.
    fn compare_formats_with(&self, other: &Self) -> bool {
        self.format() == other.format()
    }
}

/// Recording slot type produced by an execution context.
pub type Recording<C> = <<C as ExecutionContext>::Chain as PresentationChain>::Recording;

/// Device/context layer: builds chains, allocates recording slots, synchronizes.
pub trait ExecutionContext {
    type Chain: PresentationChain;

    /// Builds a chain for `extent`. `previous`, when present, is the chain being
    /// replaced and serves as the format reference.
    fn create_chain(&mut self, extent: Extent, previous: Option<&Self::Chain>)
    -> Result<Self::Chain>;

    fn allocate_recordings(&mut self, count: usize) -> Result<Vec<Recording<Self>>>;

    /// Blocks until all submitted work has finished executing.
    fn wait_idle(&mut self) -> Result<()>;
}
