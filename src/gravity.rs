/// Seconds between automatic descents unless configured otherwise.
pub const DEFAULT_FALL_INTERVAL: f32 = 1.0;

/// Fixed-interval fall timer.
///
/// Once the accumulated time reaches the interval, a step is due and the
/// accumulator goes back to exactly zero. Any surplus is dropped, so a long
/// frame never yields more than one step.
#[derive(Clone, Debug, PartialEq)]
pub struct GravityScheduler {
    elapsed: f32,
    interval: f32,
}

impl GravityScheduler {
    pub fn new(interval: f32) -> Self {
        Self {
            elapsed: 0.0,
            interval,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Adds `dt` and reports whether a gravity step is due.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

impl Default for GravityScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_FALL_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_when_interval_reached() {
        let mut gravity = GravityScheduler::new(1.0);
        assert!(!gravity.advance(0.5));
        assert!(gravity.advance(0.5));
        assert_eq!(gravity.elapsed(), 0.0);
    }

    #[test]
    fn surplus_is_discarded() {
        let mut gravity = GravityScheduler::new(1.0);
        assert!(gravity.advance(1.9));
        assert_eq!(gravity.elapsed(), 0.0);
        assert!(!gravity.advance(0.5));
    }

    #[test]
    fn huge_frame_yields_single_step() {
        let mut gravity = GravityScheduler::new(1.0);
        assert!(gravity.advance(10.0));
        assert!(!gravity.advance(0.0));
    }
}
