use anyhow::Result;

use crate::window::SurfaceHost;

use super::backend::{CommandRecorder, ExecutionContext, PresentationChain, Recording};
use super::rebuild::{self, RebuildCause};
use super::sequencer::CommandSequencer;
use super::{
    ChainStatus, Extent, FrameError, ImageIndex, MAX_FRAMES_IN_FLIGHT, RenderPassLayout,
    ScissorRect, ViewportState,
};

/// Orchestrator state.
///
/// `Idle → Acquiring → Recording → Presenting → Idle`, with `Rebuilding`
/// entered from `Acquiring` or `Presenting` when the chain goes stale.
/// `Failed` is terminal: it is entered when an operation returns `Err`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameState {
    Idle,
    Acquiring,
    Recording,
    Presenting,
    Rebuilding,
    Failed,
}

/// Handle to the command buffer of the frame currently being recorded.
///
/// Only valid between the `begin_frame` that returned it and the matching
/// `end_frame`; using it in any other frame is a contract violation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct CommandBufferHandle {
    slot: usize,
    frame: u64,
}

impl CommandBufferHandle {
    /// Recording slot (frame-in-flight index) this handle refers to.
    #[inline]
    pub fn slot(self) -> usize {
        self.slot
    }
}

/// Borrowed view of the open frame handed to draw code.
pub struct FrameTarget<'a, C: ExecutionContext> {
    pub context: &'a C,
    pub layout: &'a RenderPassLayout,
    pub extent: Extent,
    pub recording: &'a mut Recording<C>,
}

/// Owns the presentation chain and sequences per-frame GPU work.
///
/// Field order matters: recording slots and the chain are dropped before the
/// execution context that created them.
pub struct FrameOrchestrator<C: ExecutionContext> {
    sequencer: CommandSequencer<Recording<C>>,
    chain: C::Chain,
    context: C,

    state: FrameState,
    frame_index: usize,
    current_image: Option<ImageIndex>,
    active: Option<CommandBufferHandle>,
    in_render_pass: bool,

    frame_serial: u64,
    rebuild_count: u64,
}

impl<C: ExecutionContext> FrameOrchestrator<C> {
    /// Builds the initial chain and allocates one recording slot per frame in
    /// flight.
    ///
    /// Blocks while the host reports a degenerate surface.
    pub fn new<H>(mut context: C, host: &mut H) -> Result<Self>
    where
        H: SurfaceHost + ?Sized,
    {
        let chain = rebuild::build_initial_chain(&mut context, host)?;
        let sequencer = CommandSequencer::allocate(&mut context, MAX_FRAMES_IN_FLIGHT)?;

        Ok(Self {
            sequencer,
            chain,
            context,
            state: FrameState::Idle,
            frame_index: 0,
            current_image: None,
            active: None,
            in_render_pass: false,
            frame_serial: 0,
            rebuild_count: 0,
        })
    }

    #[inline]
    pub fn state(&self) -> FrameState {
        self.state
    }

    #[inline]
    pub fn is_frame_started(&self) -> bool {
        self.active.is_some()
    }

    /// Active frame-in-flight index, in `[0, MAX_FRAMES_IN_FLIGHT)`.
    #[inline]
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Image acquired for the open frame.
    #[inline]
    pub fn current_image(&self) -> Option<ImageIndex> {
        self.current_image
    }

    /// Number of chain rebuilds performed so far.
    #[inline]
    pub fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }

    #[inline]
    pub fn chain(&self) -> &C::Chain {
        &self.chain
    }

    #[inline]
    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn extent(&self) -> Extent {
        self.chain.extent()
    }

    /// Render-pass layout pipelines must be created against.
    pub fn render_pass(&self) -> &RenderPassLayout {
        self.chain.render_pass()
    }

    /// Context, render-pass layout and recording slot of the open frame at once.
    ///
    /// # Panics
    /// Panics if `handle` does not belong to the open frame.
    pub fn target(&mut self, handle: CommandBufferHandle) -> FrameTarget<'_, C> {
        self.assert_current(handle, "draw into");
        FrameTarget {
            context: &self.context,
            layout: self.chain.render_pass(),
            extent: self.chain.extent(),
            recording: self.sequencer.slot_mut(handle.slot),
        }
    }

    /// Acquires the next image and opens a recording.
    ///
    /// Returns `Ok(None)` when the chain was stale and had to be rebuilt; the
    /// caller must skip rendering for this iteration.
    ///
    /// # Panics
    /// Panics if a frame is already in progress.
    pub fn begin_frame<H>(&mut self, host: &mut H) -> Result<Option<CommandBufferHandle>>
    where
        H: SurfaceHost + ?Sized,
    {
        self.ensure_usable()?;
        assert!(
            !self.is_frame_started() && self.state == FrameState::Idle,
            "can't call begin_frame while a frame is already in progress"
        );

        self.state = FrameState::Acquiring;
        let (image, status) = self.chain.acquire_next_image();

        if status == ChainStatus::OutOfDate {
            self.rebuild_chain(host, RebuildCause::AcquireStale)
                .map_err(|e| self.fail(e))?;
            self.state = FrameState::Idle;
            return Ok(None);
        }
        if !status.is_usable() {
            return Err(self.fail(FrameError::AcquireFailed.into()));
        }
        if status == ChainStatus::Suboptimal {
            log::debug!("acquired suboptimal image {image}");
        }

        self.sequencer
            .begin_recording(self.frame_index)
            .map_err(|e| self.fail(e))?;

        self.frame_serial = self.frame_serial.wrapping_add(1);
        let handle = CommandBufferHandle {
            slot: self.frame_index,
            frame: self.frame_serial,
        };

        self.current_image = Some(image);
        self.active = Some(handle);
        self.state = FrameState::Recording;

        Ok(Some(handle))
    }

    /// Begins the chain's render pass on `handle` and resets viewport and
    /// scissor to the chain's current extent.
    ///
    /// # Panics
    /// Panics outside an open frame, on a handle from another frame, or if the
    /// render pass is already open.
    pub fn begin_swap_chain_render_pass(&mut self, handle: CommandBufferHandle) -> Result<()> {
        self.ensure_usable()?;
        self.assert_current(handle, "begin render pass on");
        assert!(
            !self.in_render_pass,
            "render pass already begun for this frame"
        );

        let image = self
            .current_image
            .expect("open frame always has an acquired image");
        let target = match self.chain.frame_buffer(image) {
            Some(target) => target,
            None => return Err(self.fail(FrameError::MissingFrameBuffer(image).into())),
        };

        // Extent may differ from the last frame after a rebuild; reassert every time.
        let extent = self.chain.extent();
        let began = self.sequencer.slot_mut(handle.slot).begin_render_pass(
            self.chain.render_pass(),
            target,
            extent,
        );
        if let Err(e) = began {
            return Err(self.fail(e));
        }

        let recorder = self.sequencer.slot_mut(handle.slot);
        recorder.set_viewport(ViewportState::covering(extent));
        recorder.set_scissor(ScissorRect::covering(extent));

        self.in_render_pass = true;
        Ok(())
    }

    /// Ends the render pass opened by [`begin_swap_chain_render_pass`].
    ///
    /// # Panics
    /// Panics outside an open frame, on a handle from another frame, or if no
    /// render pass is open.
    ///
    /// [`begin_swap_chain_render_pass`]: Self::begin_swap_chain_render_pass
    pub fn end_swap_chain_render_pass(&mut self, handle: CommandBufferHandle) {
        self.assert_current(handle, "end render pass on");
        assert!(self.in_render_pass, "no render pass open for this frame");

        self.sequencer.slot_mut(handle.slot).end_render_pass();
        self.in_render_pass = false;
    }

    /// Closes the recording, submits it, presents, and advances the
    /// frame-in-flight index.
    ///
    /// A stale chain or a pending resize triggers a rebuild before returning.
    ///
    /// # Panics
    /// Panics if no frame is in progress or its render pass is still open.
    pub fn end_frame<H>(&mut self, host: &mut H) -> Result<()>
    where
        H: SurfaceHost + ?Sized,
    {
        self.ensure_usable()?;
        assert!(
            self.is_frame_started(),
            "can't call end_frame while frame is not in progress"
        );
        assert!(
            !self.in_render_pass,
            "can't call end_frame while the render pass is still open"
        );

        self.sequencer
            .end_recording(self.frame_index)
            .map_err(|e| self.fail(e))?;

        self.state = FrameState::Presenting;
        let image = self
            .current_image
            .expect("open frame always has an acquired image");
        let status = self
            .chain
            .submit_and_present(self.sequencer.slot_mut(self.frame_index), image);

        let resized = host.was_resized();
        if status.is_stale() || resized {
            host.clear_resized_flag();
            let cause = if status.is_stale() {
                RebuildCause::PresentStale
            } else {
                RebuildCause::Resized
            };
            self.rebuild_chain(host, cause).map_err(|e| self.fail(e))?;
        } else if status != ChainStatus::Ok {
            return Err(self.fail(FrameError::PresentFailed.into()));
        }

        self.active = None;
        self.current_image = None;
        self.frame_index = (self.frame_index + 1) % MAX_FRAMES_IN_FLIGHT;
        self.state = FrameState::Idle;
        Ok(())
    }

    /// Rebuilds the chain outside of a frame, e.g. after a configuration change.
    ///
    /// # Panics
    /// Panics if a frame is in progress.
    pub fn rebuild<H>(&mut self, host: &mut H) -> Result<()>
    where
        H: SurfaceHost + ?Sized,
    {
        self.ensure_usable()?;
        assert!(
            !self.is_frame_started() && self.state == FrameState::Idle,
            "can't rebuild the presentation chain while a frame is in progress"
        );
        self.rebuild_chain(host, RebuildCause::Requested)
            .map_err(|e| self.fail(e))?;
        self.state = FrameState::Idle;
        Ok(())
    }

    /// Blocks until the device has finished all submitted work.
    pub fn wait_idle(&mut self) -> Result<()> {
        self.context.wait_idle()
    }

    fn rebuild_chain<H>(&mut self, host: &mut H, cause: RebuildCause) -> Result<()>
    where
        H: SurfaceHost + ?Sized,
    {
        log::debug!("rebuilding presentation chain ({cause:?})");
        self.state = FrameState::Rebuilding;

        let Some(new) = rebuild::build_replacement_chain(&mut self.context, host, &self.chain)?
        else {
            return Ok(());
        };

        // Old chain is released here, after the replacement was verified.
        self.chain = new;
        self.rebuild_count += 1;
        Ok(())
    }

    /// Moves to `Failed` and drops the open frame, if any.
    fn fail(&mut self, err: anyhow::Error) -> anyhow::Error {
        log::error!("frame orchestrator failed: {err:#}");
        self.state = FrameState::Failed;
        self.active = None;
        self.current_image = None;
        self.in_render_pass = false;
        err
    }

    fn ensure_usable(&self) -> Result<()> {
        if self.state == FrameState::Failed {
            return Err(FrameError::Poisoned.into());
        }
        Ok(())
    }

    fn assert_current(&self, handle: CommandBufferHandle, action: &str) {
        assert!(
            self.is_frame_started(),
            "can't {action} a command buffer while frame is not in progress"
        );
        assert_eq!(
            self.active,
            Some(handle),
            "can't {action} a command buffer from a different frame"
        );
    }
}

impl<C: ExecutionContext> Drop for FrameOrchestrator<C> {
    fn drop(&mut self) {
        if let Err(e) = self.context.wait_idle() {
            log::warn!("wait_idle failed during teardown: {e:#}");
        }
    }
}
