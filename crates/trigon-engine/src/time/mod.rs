//! Time subsystem.
//!
//! Frame timing utilities with no coupling to the window or GPU:
//! - `FrameClock`: ticked once per loop iteration, yields clamped `FrameTime`
//! - `FpsMeter`: ticked once per presented frame, reports a rate per window

mod fps;
mod frame_clock;

pub use fps::FpsMeter;
pub use frame_clock::{FrameClock, FrameTime};
