use anyhow::Result;

use crate::present::{ExecutionContext, FrameOrchestrator};
use crate::time::FrameClock;
use crate::window::SurfaceHost;

use super::{App, AppControl};

/// Counters reported when the frame loop exits.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    /// Frames submitted and presented.
    pub presented: u64,
    /// Iterations where acquisition found the chain stale.
    pub skipped: u64,
    /// Chain rebuilds performed while the loop ran.
    pub rebuilds: u64,
}

/// Runs poll → update → acquire → record → present until the host or the app
/// asks to stop, then waits for the device to go idle.
///
/// An iteration whose acquisition returned no frame skips drawing and goes
/// straight to the next poll.
pub fn run_frames<C, H, A>(
    orchestrator: &mut FrameOrchestrator<C>,
    host: &mut H,
    app: &mut A,
) -> Result<FrameStats>
where
    C: ExecutionContext,
    H: SurfaceHost + ?Sized,
    A: App<C> + ?Sized,
{
    let mut stats = FrameStats::default();
    let rebuilds_at_start = orchestrator.rebuild_count();
    let mut clock = FrameClock::new();

    loop {
        host.poll_events();
        if host.should_terminate() {
            log::debug!("host requested termination");
            break;
        }

        if app.update(clock.tick()) == AppControl::Exit {
            log::debug!("application requested exit");
            break;
        }

        let Some(cb) = orchestrator.begin_frame(host)? else {
            stats.skipped += 1;
            continue;
        };

        orchestrator.begin_swap_chain_render_pass(cb)?;
        app.draw(&mut orchestrator.target(cb));
        orchestrator.end_swap_chain_render_pass(cb);
        orchestrator.end_frame(host)?;

        stats.presented += 1;
        app.frame_presented();
    }

    orchestrator.wait_idle()?;
    stats.rebuilds = orchestrator.rebuild_count() - rebuilds_at_start;

    log::info!(
        "frame loop finished: {} presented, {} skipped, {} rebuilds",
        stats.presented,
        stats.skipped,
        stats.rebuilds
    );
    Ok(stats)
}
