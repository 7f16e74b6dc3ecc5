use std::fmt;

use super::{ChainFormat, ImageIndex};

/// Unrecoverable frame-orchestration failure.
///
/// Staleness never shows up here; it is handled by rebuilding the chain.
/// Errors travel inside `anyhow::Error` and can be recovered with
/// `err.downcast_ref::<FrameError>()`.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameError {
    /// Acquisition failed for a reason other than staleness.
    AcquireFailed,
    /// Submission or presentation failed for a reason other than staleness.
    PresentFailed,
    /// A rebuilt chain negotiated different formats than its predecessor.
    FormatDrift {
        previous: ChainFormat,
        current: ChainFormat,
    },
    /// The host asked to terminate while waiting for a usable surface.
    SurfaceClosed,
    /// The chain has no framebuffer for the image it handed out.
    MissingFrameBuffer(ImageIndex),
    /// An earlier operation failed; the orchestrator takes no further frames.
    Poisoned,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::AcquireFailed => write!(f, "failed to acquire presentation image"),
            FrameError::PresentFailed => write!(f, "failed to present presentation image"),
            FrameError::FormatDrift { previous, current } => write!(
                f,
                "presentation chain format changed across rebuild ({previous:?} -> {current:?})"
            ),
            FrameError::SurfaceClosed => {
                write!(f, "surface closed before it became presentable")
            }
            FrameError::MissingFrameBuffer(image) => {
                write!(f, "no framebuffer for presentation image {image}")
            }
            FrameError::Poisoned => {
                write!(f, "frame orchestrator is unusable after an earlier failure")
            }
        }
    }
}

impl std::error::Error for FrameError {}
