//! Chain construction and the two-phase rebuild protocol.
//!
//! Rebuild order:
//! 1. wait (cooperatively) for a non-degenerate surface
//! 2. wait for the device to go idle
//! 3. build the replacement chain with the current chain as format reference
//! 4. verify format compatibility
//! 5. hand the new chain back; the caller drops the old one

use anyhow::Result;

use crate::window::SurfaceHost;

use super::backend::{ExecutionContext, PresentationChain};
use super::{Extent, FrameError};

/// Why a rebuild was requested. Logged only.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RebuildCause {
    AcquireStale,
    PresentStale,
    Resized,
    Requested,
}

/// Blocks until the host reports a usable extent.
///
/// Returns `None` if the host asks to terminate while the surface is still
/// degenerate.
pub fn wait_for_usable_extent<H>(host: &mut H) -> Option<Extent>
where
    H: SurfaceHost + ?Sized,
{
    let mut extent = host.current_extent();
    if !extent.is_degenerate() {
        return Some(extent);
    }

    log::info!("surface is {}x{}; waiting for a usable size", extent.width, extent.height);

    while extent.is_degenerate() {
        if host.should_terminate() {
            return None;
        }
        host.wait_events();
        extent = host.current_extent();
    }

    Some(extent)
}

/// Builds the very first chain.
pub fn build_initial_chain<C, H>(context: &mut C, host: &mut H) -> Result<C::Chain>
where
    C: ExecutionContext,
    H: SurfaceHost + ?Sized,
{
    let extent = wait_for_usable_extent(host).ok_or(FrameError::SurfaceClosed)?;
    let chain = context.create_chain(extent, None)?;
    log_chain("created", &chain);
    Ok(chain)
}

/// Builds a replacement for `old` and checks it is format-compatible.
///
/// `Ok(None)` means the host terminated while the surface was degenerate; the
/// old chain stays installed and the caller's loop will exit.
pub fn build_replacement_chain<C, H>(
    context: &mut C,
    host: &mut H,
    old: &C::Chain,
) -> Result<Option<C::Chain>>
where
    C: ExecutionContext,
    H: SurfaceHost + ?Sized,
{
    let Some(extent) = wait_for_usable_extent(host) else {
        log::debug!("rebuild abandoned: host terminating");
        return Ok(None);
    };

    // Old images may still be referenced by in-flight submissions.
    context.wait_idle()?;

    let new = context.create_chain(extent, Some(old))?;
    verify_compatible(old, &new)?;
    log_chain("rebuilt", &new);
    Ok(Some(new))
}

/// Fails with [`FrameError::FormatDrift`] if `new` renders into different
/// formats than `old`.
pub fn verify_compatible<P>(old: &P, new: &P) -> Result<(), FrameError>
where
    P: PresentationChain,
{
    if old.compare_formats_with(new) {
        Ok(())
    } else {
        Err(FrameError::FormatDrift {
            previous: old.format(),
            current: new.format(),
        })
    }
}

fn log_chain<P: PresentationChain>(what: &str, chain: &P) {
    let extent = chain.extent();
    log::info!(
        "presentation chain {what}: {}x{}, {} images, {:?}",
        extent.width,
        extent.height,
        chain.image_count(),
        chain.format()
    );
}
