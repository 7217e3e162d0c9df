use std::time::{Duration, Instant};

/// Source of per-tick elapsed time.
pub trait Clock {
    /// Time since the previous call (or since creation for the first call).
    fn delta(&mut self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug)]
pub struct SystemClock {
    last: Instant,
}

impl SystemClock {
    pub fn start() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn delta(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now.duration_since(self.last);
        self.last = now;
        delta
    }
}

/// Deterministic clock that advances by a fixed step per tick.
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    step: Duration,
    elapsed: Duration,
}

impl FixedStepClock {
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            elapsed: Duration::ZERO,
        }
    }

    /// Clock running at `fps` ticks per second.
    pub fn from_fps(fps: u32) -> Self {
        Self::new(Duration::from_secs(1) / fps.max(1))
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Total time handed out so far.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

impl Clock for FixedStepClock {
    fn delta(&mut self) -> Duration {
        self.elapsed += self.step;
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_step_accumulates() {
        let mut clock = FixedStepClock::from_fps(50);
        assert_eq!(clock.step(), Duration::from_millis(20));
        for _ in 0..5 {
            assert_eq!(clock.delta(), Duration::from_millis(20));
        }
        assert_eq!(clock.elapsed(), Duration::from_millis(100));
        clock.reset();
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let mut clock = SystemClock::start();
        let first = clock.delta();
        let second = clock.delta();
        assert!(first >= Duration::ZERO);
        assert!(second >= Duration::ZERO);
    }
}
