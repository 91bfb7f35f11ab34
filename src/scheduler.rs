// Copyright (c) 2026 rezky_nightky

use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    WindShift,
    VortexSpawn,
}

/// Fires once, then waits a fresh random interval in `[min_ms, max_ms]`.
#[derive(Clone, Copy, Debug)]
struct PeriodicTask {
    task: Task,
    min_ms: f64,
    max_ms: f64,
    next_ms: f64,
    cancelled: bool,
}

impl PeriodicTask {
    fn interval<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let ms = self.min_ms + rng.random::<f64>() * (self.max_ms - self.min_ms);
        ms.max(1.0)
    }
}

/// Timers polled from the frame loop instead of firing on their own.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    tasks: Vec<PeriodicTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `task` to fire first at `first_ms`. Re-registering replaces
    /// the earlier entry.
    pub fn every(&mut self, task: Task, min_ms: f64, max_ms: f64, first_ms: f64) {
        let (min_ms, max_ms) = if min_ms <= max_ms {
            (min_ms, max_ms)
        } else {
            (max_ms, min_ms)
        };
        let entry = PeriodicTask {
            task,
            min_ms,
            max_ms,
            next_ms: first_ms,
            cancelled: false,
        };
        match self.tasks.iter_mut().find(|t| t.task == task) {
            Some(t) => *t = entry,
            None => self.tasks.push(entry),
        }
    }

    #[allow(dead_code)]
    pub fn cancel(&mut self, task: Task) {
        for t in self.tasks.iter_mut().filter(|t| t.task == task) {
            t.cancelled = true;
        }
    }

    pub fn cancel_all(&mut self) {
        for t in &mut self.tasks {
            t.cancelled = true;
        }
    }

    pub fn next_due(&self, task: Task) -> Option<f64> {
        self.tasks
            .iter()
            .find(|t| t.task == task && !t.cancelled)
            .map(|t| t.next_ms)
    }

    /// Returns one task due at `now_ms` and reschedules it from `now_ms`.
    /// Call until it yields `None`; each task fires at most once per instant.
    pub fn poll<R: Rng + ?Sized>(&mut self, now_ms: f64, rng: &mut R) -> Option<Task> {
        let t = self
            .tasks
            .iter_mut()
            .find(|t| !t.cancelled && t.next_ms <= now_ms)?;
        t.next_ms = now_ms + t.interval(rng);
        Some(t.task)
    }
}
