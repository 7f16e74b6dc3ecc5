//! Scripted backend and host used by the present-core tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use anyhow::Result;

use crate::window::SurfaceHost;

use super::backend::{CommandRecorder, ExecutionContext, PresentationChain};
use super::{
    ChainFormat, ChainStatus, Extent, ImageIndex, RenderPassLayout, ScissorRect, ViewportState,
};

pub const DEFAULT_FORMAT: ChainFormat = ChainFormat {
    color: wgpu::TextureFormat::Bgra8UnormSrgb,
    depth: Some(wgpu::TextureFormat::Depth32Float),
};

/// Everything the backend was asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    WaitIdle,
    AllocateRecordings(usize),
    CreateChain {
        id: u32,
        extent: Extent,
        previous: Option<u32>,
    },
    DropChain(u32),
    Acquire { chain: u32 },
    BeginRecording(usize),
    EndRecording(usize),
    BeginRenderPass {
        slot: usize,
        image: ImageIndex,
        extent: Extent,
    },
    SetViewport {
        slot: usize,
        viewport: ViewportState,
    },
    SetScissor { slot: usize, scissor: ScissorRect },
    EndRenderPass(usize),
    Present {
        chain: u32,
        slot: usize,
        image: ImageIndex,
    },
}

#[derive(Default)]
struct Shared {
    log: RefCell<Vec<Event>>,
    acquire: RefCell<VecDeque<ChainStatus>>,
    present: RefCell<VecDeque<ChainStatus>>,
    formats: RefCell<VecDeque<ChainFormat>>,
    next_chain_id: Cell<u32>,
    no_frame_buffers: Cell<bool>,
    failing_render_pass: Cell<bool>,
    withheld_slots: Cell<usize>,
}

impl Shared {
    fn push(&self, event: Event) {
        self.log.borrow_mut().push(event);
    }
}

/// Cloneable view onto the backend's script and event log.
#[derive(Clone, Default)]
pub struct Probe {
    shared: Rc<Shared>,
}

impl Probe {
    pub fn events(&self) -> Vec<Event> {
        self.shared.log.borrow().clone()
    }

    pub fn clear(&self) {
        self.shared.log.borrow_mut().clear();
    }

    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.shared.log.borrow().iter().filter(|e| pred(e)).count()
    }

    pub fn chains_created(&self) -> usize {
        self.count(|e| matches!(e, Event::CreateChain { .. }))
    }

    /// Status returned by the next acquisitions (default `Ok`).
    pub fn script_acquire(&self, statuses: impl IntoIterator<Item = ChainStatus>) {
        self.shared.acquire.borrow_mut().extend(statuses);
    }

    /// Status returned by the next presentations (default `Ok`).
    pub fn script_present(&self, statuses: impl IntoIterator<Item = ChainStatus>) {
        self.shared.present.borrow_mut().extend(statuses);
    }

    /// Format negotiated by the next chains (default [`DEFAULT_FORMAT`]).
    pub fn script_formats(&self, formats: impl IntoIterator<Item = ChainFormat>) {
        self.shared.formats.borrow_mut().extend(formats);
    }

    /// Makes every chain report no framebuffer for any image.
    pub fn drop_frame_buffers(&self) {
        self.shared.no_frame_buffers.set(true);
    }

    /// Makes every recorder refuse to open a render pass.
    pub fn fail_render_passes(&self) {
        self.shared.failing_render_pass.set(true);
    }

    /// Makes the next allocation hand out `count` fewer slots than asked for.
    pub fn withhold_slots(&self, count: usize) {
        self.shared.withheld_slots.set(count);
    }
}

pub struct MockContext {
    shared: Rc<Shared>,
}

impl MockContext {
    pub fn new() -> (Self, Probe) {
        let probe = Probe::default();
        (
            Self {
                shared: probe.shared.clone(),
            },
            probe,
        )
    }
}

impl ExecutionContext for MockContext {
    type Chain = MockChain;

    fn create_chain(
        &mut self,
        extent: Extent,
        previous: Option<&MockChain>,
    ) -> Result<MockChain> {
        assert!(!extent.is_degenerate(), "chain built for degenerate extent");

        let id = self.shared.next_chain_id.get();
        self.shared.next_chain_id.set(id + 1);

        let format = self
            .shared
            .formats
            .borrow_mut()
            .pop_front()
            .unwrap_or(DEFAULT_FORMAT);

        self.shared.push(Event::CreateChain {
            id,
            extent,
            previous: previous.map(|p| p.id),
        });

        let images = 3;
        Ok(MockChain {
            id,
            extent,
            layout: RenderPassLayout {
                format,
                clear_color: wgpu::Color::BLACK,
                clear_depth: 1.0,
            },
            frame_buffers: (0..images).map(|image| MockFrameBuffer { image }).collect(),
            next_image: 0,
            shared: self.shared.clone(),
        })
    }

    fn allocate_recordings(&mut self, count: usize) -> Result<Vec<MockRecorder>> {
        self.shared.push(Event::AllocateRecordings(count));
        let count = count.saturating_sub(self.shared.withheld_slots.take());
        Ok((0..count)
            .map(|slot| MockRecorder {
                slot,
                open: false,
                shared: self.shared.clone(),
            })
            .collect())
    }

    fn wait_idle(&mut self) -> Result<()> {
        self.shared.push(Event::WaitIdle);
        Ok(())
    }
}

pub struct MockFrameBuffer {
    image: ImageIndex,
}

pub struct MockChain {
    id: u32,
    extent: Extent,
    layout: RenderPassLayout,
    frame_buffers: Vec<MockFrameBuffer>,
    next_image: ImageIndex,
    shared: Rc<Shared>,
}

impl MockChain {
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl PresentationChain for MockChain {
    type FrameBuffer = MockFrameBuffer;
    type Recording = MockRecorder;

    fn image_count(&self) -> usize {
        self.frame_buffers.len()
    }

    fn format(&self) -> ChainFormat {
        self.layout.format
    }

    fn extent(&self) -> Extent {
        self.extent
    }

    fn render_pass(&self) -> &RenderPassLayout {
        &self.layout
    }

    fn frame_buffer(&self, image: ImageIndex) -> Option<&MockFrameBuffer> {
        if self.shared.no_frame_buffers.get() {
            return None;
        }
        self.frame_buffers.get(image as usize)
    }

    fn acquire_next_image(&mut self) -> (ImageIndex, ChainStatus) {
        self.shared.push(Event::Acquire { chain: self.id });
        let status = self
            .shared
            .acquire
            .borrow_mut()
            .pop_front()
            .unwrap_or(ChainStatus::Ok);

        let image = self.next_image;
        if status.is_usable() {
            self.next_image = (self.next_image + 1) % self.frame_buffers.len() as ImageIndex;
        }
        (image, status)
    }

    fn submit_and_present(
        &mut self,
        recording: &mut MockRecorder,
        image: ImageIndex,
    ) -> ChainStatus {
        assert!(!recording.open, "submitted a recording that is still open");
        self.shared.push(Event::Present {
            chain: self.id,
            slot: recording.slot,
            image,
        });
        self.shared
            .present
            .borrow_mut()
            .pop_front()
            .unwrap_or(ChainStatus::Ok)
    }
}

impl Drop for MockChain {
    fn drop(&mut self) {
        self.shared.push(Event::DropChain(self.id));
    }
}

pub struct MockRecorder {
    slot: usize,
    open: bool,
    shared: Rc<Shared>,
}

impl CommandRecorder for MockRecorder {
    type FrameBuffer = MockFrameBuffer;

    fn begin_recording(&mut self) -> Result<()> {
        self.open = true;
        self.shared.push(Event::BeginRecording(self.slot));
        Ok(())
    }

    fn end_recording(&mut self) -> Result<()> {
        self.open = false;
        self.shared.push(Event::EndRecording(self.slot));
        Ok(())
    }

    fn begin_render_pass(
        &mut self,
        _layout: &RenderPassLayout,
        target: &MockFrameBuffer,
        extent: Extent,
    ) -> Result<()> {
        anyhow::ensure!(
            !self.shared.failing_render_pass.get(),
            "render target unavailable"
        );
        self.shared.push(Event::BeginRenderPass {
            slot: self.slot,
            image: target.image,
            extent,
        });
        Ok(())
    }

    fn set_viewport(&mut self, viewport: ViewportState) {
        self.shared.push(Event::SetViewport {
            slot: self.slot,
            viewport,
        });
    }

    fn set_scissor(&mut self, scissor: ScissorRect) {
        self.shared.push(Event::SetScissor {
            slot: self.slot,
            scissor,
        });
    }

    fn end_render_pass(&mut self) {
        self.shared.push(Event::EndRenderPass(self.slot));
    }
}

/// Scripted window: extents queued with [`MockHost::queue_extents`] are
/// revealed one per `wait_events` call.
pub struct MockHost {
    extent: Extent,
    pending: VecDeque<Extent>,
    resized: bool,
    terminate: bool,
    terminate_after_polls: Option<usize>,
    pub polls: usize,
    pub waits: usize,
}

impl MockHost {
    pub fn new(extent: Extent) -> Self {
        Self {
            extent,
            pending: VecDeque::new(),
            resized: false,
            terminate: false,
            terminate_after_polls: None,
            polls: 0,
            waits: 0,
        }
    }

    pub fn queue_extents(&mut self, extents: impl IntoIterator<Item = Extent>) {
        self.pending.extend(extents);
    }

    /// Simulates a window resize notification.
    pub fn resize(&mut self, extent: Extent) {
        self.extent = extent;
        self.resized = true;
    }

    pub fn terminate_after_polls(&mut self, polls: usize) {
        self.terminate_after_polls = Some(polls);
    }

    pub fn request_terminate(&mut self) {
        self.terminate = true;
    }
}

impl SurfaceHost for MockHost {
    fn should_terminate(&self) -> bool {
        self.terminate
    }

    fn was_resized(&self) -> bool {
        self.resized
    }

    fn clear_resized_flag(&mut self) {
        self.resized = false;
    }

    fn current_extent(&self) -> Extent {
        self.extent
    }

    fn poll_events(&mut self) {
        self.polls += 1;
        if self.terminate_after_polls.is_some_and(|n| self.polls >= n) {
            self.terminate = true;
        }
    }

    fn wait_events(&mut self) {
        self.waits += 1;
        if let Some(next) = self.pending.pop_front() {
            self.extent = next;
        }
    }
}
