//! Frame loop driver.
//!
//! Defines the application contract and the loop that pumps the host and drives
//! the frame orchestrator through acquire → record → present.

mod app;
mod frame_loop;

pub use app::{App, AppControl};
pub use frame_loop::{FrameStats, run_frames};
