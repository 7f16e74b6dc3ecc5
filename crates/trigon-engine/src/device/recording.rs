use std::sync::Arc;

use anyhow::{Context, Result};

use crate::present::{CommandRecorder, Extent, RenderPassLayout, ScissorRect, ViewportState};

use super::chain::ChainFrameBuffer;
use super::gpu::GpuShared;

/// One frame-in-flight worth of command recording.
///
/// The slot remembers the submission that last consumed it and blocks on it
/// before recording again, so a slot's resources are never reused while the
/// GPU still reads them.
pub struct FrameRecording {
    shared: Arc<GpuShared>,
    slot: usize,
    encoder: Option<wgpu::CommandEncoder>,
    pass: Option<wgpu::RenderPass<'static>>,
    finished: Option<wgpu::CommandBuffer>,
    in_flight: Option<wgpu::SubmissionIndex>,
}

impl FrameRecording {
    pub(crate) fn new(shared: Arc<GpuShared>, slot: usize) -> Self {
        Self {
            shared,
            slot,
            encoder: None,
            pass: None,
            finished: None,
            in_flight: None,
        }
    }

    #[inline]
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// The open render pass, if any. Draw calls go here.
    pub fn pass_mut(&mut self) -> Option<&mut wgpu::RenderPass<'static>> {
        self.pass.as_mut()
    }

    pub(crate) fn take_finished(&mut self) -> Option<wgpu::CommandBuffer> {
        self.finished.take()
    }

    pub(crate) fn mark_submitted(&mut self, index: wgpu::SubmissionIndex) {
        self.in_flight = Some(index);
    }

    fn wait_for_previous_submission(&mut self) -> Result<()> {
        let Some(index) = self.in_flight.take() else {
            return Ok(());
        };
        self.shared
            .device
            .poll(wgpu::PollType::Wait {
                submission_index: Some(index),
                timeout: None,
            })
            .with_context(|| format!("waiting on frame slot {}", self.slot))?;
        Ok(())
    }
}

impl CommandRecorder for FrameRecording {
    type FrameBuffer = ChainFrameBuffer;

    fn begin_recording(&mut self) -> Result<()> {
        self.wait_for_previous_submission()?;

        // An unsubmitted buffer from an abandoned frame is simply discarded.
        self.finished = None;
        self.encoder = Some(self.shared.device.create_command_encoder(
            &wgpu::CommandEncoderDescriptor {
                label: Some("trigon frame encoder"),
            },
        ));
        Ok(())
    }

    fn end_recording(&mut self) -> Result<()> {
        anyhow::ensure!(
            self.pass.is_none(),
            "frame slot {} ended with an open render pass",
            self.slot
        );
        let encoder = self
            .encoder
            .take()
            .with_context(|| format!("frame slot {} has no open recording", self.slot))?;
        self.finished = Some(encoder.finish());
        Ok(())
    }

    fn begin_render_pass(
        &mut self,
        layout: &RenderPassLayout,
        target: &ChainFrameBuffer,
        _extent: Extent,
    ) -> Result<()> {
        let slot = self.slot;
        let encoder = self
            .encoder
            .as_mut()
            .with_context(|| format!("render pass begun on slot {slot} outside a recording"))?;
        let color = target
            .color()
            .context("render pass target has no acquired color image")?;

        let depth_stencil_attachment =
            target
                .depth()
                .map(|view| wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(layout.clear_depth),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                });

        let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("trigon swapchain pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color,
                resolve_target: None,
                depth_slice: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(layout.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        // The encoder stays locked until the pass is dropped in end_render_pass.
        self.pass = Some(pass.forget_lifetime());
        Ok(())
    }

    fn set_viewport(&mut self, viewport: ViewportState) {
        if let Some(pass) = self.pass.as_mut() {
            pass.set_viewport(
                viewport.x,
                viewport.y,
                viewport.width,
                viewport.height,
                viewport.min_depth,
                viewport.max_depth,
            );
        }
    }

    fn set_scissor(&mut self, scissor: ScissorRect) {
        if let Some(pass) = self.pass.as_mut() {
            pass.set_scissor_rect(scissor.x, scissor.y, scissor.width, scissor.height);
        }
    }

    fn end_render_pass(&mut self) {
        self.pass = None;
    }
}
