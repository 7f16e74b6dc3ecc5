use std::time::Duration;

use super::GameObject;

/// Peels the scene one layer at a time.
///
/// Once per step interval the front object is erased (while more than two
/// layers remain to reveal) and the revealed depth advances. Between steps the
/// front object fades out linearly. Holds no time source of its own; feed it
/// frame deltas through [`advance`](Self::advance).
#[derive(Debug, Clone)]
pub struct RevealAnimation {
    depth: i32,
    max_depth: i32,
    step_interval: f32,
    since_step: f32,
}

impl RevealAnimation {
    pub const DEFAULT_STEP: Duration = Duration::from_secs(1);

    pub fn new(max_depth: i32) -> Self {
        Self::with_step_interval(max_depth, Self::DEFAULT_STEP)
    }

    pub fn with_step_interval(max_depth: i32, step: Duration) -> Self {
        assert!(!step.is_zero(), "reveal step interval must be non-zero");
        Self {
            depth: -1,
            max_depth,
            step_interval: step.as_secs_f32(),
            since_step: 0.0,
        }
    }

    /// Depth revealed so far; starts at -1.
    #[inline]
    pub fn depth(&self) -> i32 {
        self.depth
    }

    /// `true` once the innermost layer is reached and nothing changes anymore.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.depth >= self.max_depth - 1
    }

    /// Advances by `dt` seconds and applies the result to `objects`.
    ///
    /// Returns `true` when a step happened during this call. At most one step
    /// is taken per call, however large `dt` is.
    pub fn advance(&mut self, dt: f32, objects: &mut Vec<GameObject>) -> bool {
        self.since_step += dt.max(0.0);

        let stepped = self.since_step >= self.step_interval;
        if stepped {
            self.since_step = 0.0;
            if self.depth < self.max_depth - 2 && !objects.is_empty() {
                let erased = objects.remove(0);
                log::debug!("reveal: erased object {} (depth {})", erased.id(), erased.depth);
            }
            if self.depth < self.max_depth - 1 {
                self.depth += 1;
                log::info!("reveal depth {}", self.depth);
            }
        }

        if !self.is_finished() {
            if let Some(front) = objects.first_mut() {
                front.alpha = self.front_alpha();
            }
        }

        stepped
    }

    /// Opacity of the front object: 1 right after a step, approaching 0 just
    /// before the next one.
    pub fn front_alpha(&self) -> f32 {
        1.0 - (self.since_step / self.step_interval).fract()
    }
}
