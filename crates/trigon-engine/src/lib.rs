//! Trigon engine crate.
//!
//! Frame orchestration over a wgpu presentation chain: acquire → record →
//! submit/present with bounded frames in flight, and chain rebuilds when the
//! window surface goes stale.

pub mod core;
pub mod device;
pub mod logging;
pub mod present;
pub mod render;
pub mod scene;
pub mod time;
pub mod window;
