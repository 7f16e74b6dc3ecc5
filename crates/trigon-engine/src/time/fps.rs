use std::time::{Duration, Instant};

/// Counts presented frames and reports a rate once per window.
#[derive(Debug, Clone)]
pub struct FpsMeter {
    window: Duration,
    window_start: Instant,
    frames: u32,
}

impl FpsMeter {
    pub fn new() -> Self {
        Self::with_window(Duration::from_secs(1))
    }

    pub fn with_window(window: Duration) -> Self {
        Self::starting_at(Instant::now(), window)
    }

    fn starting_at(start: Instant, window: Duration) -> Self {
        assert!(!window.is_zero(), "fps window must be non-zero");
        Self {
            window,
            window_start: start,
            frames: 0,
        }
    }

    /// Records one frame. Returns frames-per-second when a window closes.
    pub fn frame(&mut self) -> Option<f32> {
        self.frame_at(Instant::now())
    }

    fn frame_at(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.window {
            return None;
        }

        let fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.window_start = now;
        Some(fps)
    }
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_window() {
        let t0 = Instant::now();
        let mut m = FpsMeter::starting_at(t0, Duration::from_secs(1));

        for i in 1..60 {
            assert_eq!(m.frame_at(t0 + Duration::from_millis(i * 16)), None);
        }
        let fps = m.frame_at(t0 + Duration::from_secs(1)).unwrap();
        assert!((fps - 60.0).abs() < 1e-3);

        // New window starts empty.
        assert_eq!(m.frame_at(t0 + Duration::from_millis(1500)), None);
    }
}
