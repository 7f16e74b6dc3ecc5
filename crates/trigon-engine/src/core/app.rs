use crate::present::{ExecutionContext, FrameTarget};
use crate::time::FrameTime;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`run_frames`](super::run_frames).
pub trait App<C: ExecutionContext> {
    /// Called once per loop iteration, whether or not a frame is drawn.
    fn update(&mut self, time: FrameTime) -> AppControl {
        let _ = time;
        AppControl::Continue
    }

    /// Called inside the swapchain render pass of every acquired frame.
    fn draw(&mut self, target: &mut FrameTarget<'_, C>);

    /// Called after a frame was submitted and presented.
    fn frame_presented(&mut self) {}
}
