use crate::present::Extent;

/// Windowing layer as seen by the frame orchestrator.
///
/// The orchestrator only polls; it never owns the window.
pub trait SurfaceHost {
    /// The user (or platform) asked the application to close.
    fn should_terminate(&self) -> bool;

    /// The surface was resized since the flag was last cleared.
    fn was_resized(&self) -> bool;
    fn clear_resized_flag(&mut self);

    /// Current drawable size in physical pixels.
    fn current_extent(&self) -> Extent;

    /// Dispatches pending events without blocking.
    fn poll_events(&mut self);

    /// Blocks until at least one event has been dispatched.
    fn wait_events(&mut self);
}
