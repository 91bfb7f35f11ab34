// Copyright (c) 2026 rezky_nightky

use std::time::Instant;

/// Milliseconds on a monotonic timeline. Only differences are meaningful.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock. Clones share the same time.
#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: std::rc::Rc<std::cell::Cell<f64>>,
}

#[cfg(test)]
impl ManualClock {
    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_clock_never_goes_back() {
        let clock = MonotonicClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(a >= 0.0 && b >= a);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::default();
        let view = clock.clone();
        clock.advance(250.0);
        clock.advance(250.0);
        assert_eq!(view.now_ms(), 500.0);
        view.set(10.0);
        assert_eq!(clock.now_ms(), 10.0);
    }
}
