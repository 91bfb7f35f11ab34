// Copyright (c) 2026 rezky_nightky

use rand::{rngs::StdRng, Rng};
use tracing::{debug, info, warn};

use crate::{
    clock::{Clock, MonotonicClock},
    flake::{Flake, Viewport},
    pool::FlakePool,
    render::{draw_flake, Canvas, FlakeShades},
    scheduler::{Scheduler, Task},
    vortex::{self, VortexField},
    wind::{self, Wind},
};

pub const DEFAULT_FLAKES: f64 = 600.0;
pub const DEFAULT_VERTICAL: f32 = 1.0;
pub const DEFAULT_WIND: f32 = 1.0;

/// Control values the outside world can change while snow is falling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
    pub flakes: f64,
    pub vertical_multiplier: f32,
    pub wind_multiplier: f32,
    pub daylight: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            flakes: DEFAULT_FLAKES,
            vertical_multiplier: DEFAULT_VERTICAL,
            wind_multiplier: DEFAULT_WIND,
            daylight: false,
        }
    }
}

/// The whole simulation: flakes, wind, vortices and the two timers that
/// drive wind shifts and vortex spawns. Randomness and time come from the
/// injected `R` and `C`.
pub struct Snowfall<R = StdRng, C = MonotonicClock> {
    view: Viewport,
    pool: FlakePool,
    wind: Wind,
    vortices: VortexField,
    scheduler: Scheduler,
    vertical_multiplier: f32,
    daylight: bool,
    rng: R,
    clock: C,
}

impl<R: Rng, C: Clock> Snowfall<R, C> {
    pub fn new(settings: Settings, view: Viewport, mut rng: R, clock: C) -> Self {
        let now = clock.now_ms();

        let mut pool = FlakePool::new();
        pool.set_desired_count(settings.flakes, &mut rng, view);

        // Both timers fire on the first poll, then settle into their cadence.
        let mut scheduler = Scheduler::new();
        scheduler.every(Task::WindShift, wind::CHANGE_MIN_MS, wind::CHANGE_MAX_MS, now);
        scheduler.every(
            Task::VortexSpawn,
            vortex::SPAWN_MIN_MS,
            vortex::SPAWN_MAX_MS,
            now,
        );

        info!(
            width = view.width,
            height = view.height,
            flakes = pool.len(),
            daylight = settings.daylight,
            "snowfall started"
        );

        Self {
            view,
            pool,
            wind: Wind::new(settings.wind_multiplier),
            vortices: VortexField::new(),
            scheduler,
            vertical_multiplier: settings.vertical_multiplier,
            daylight: settings.daylight,
            rng,
            clock,
        }
    }

    #[allow(dead_code)]
    pub fn viewport(&self) -> Viewport {
        self.view
    }

    pub fn flakes(&self) -> &[Flake] {
        self.pool.as_slice()
    }

    pub fn wind(&self) -> &Wind {
        &self.wind
    }

    #[allow(dead_code)]
    pub fn vortices(&self) -> &VortexField {
        &self.vortices
    }

    pub fn vertical_multiplier(&self) -> f32 {
        self.vertical_multiplier
    }

    pub fn daylight(&self) -> bool {
        self.daylight
    }

    pub fn set_flake_count(&mut self, n: f64) -> usize {
        if !n.is_finite() {
            warn!(value = n, "ignoring non-finite flake count");
            return self.pool.len();
        }
        let count = self.pool.set_desired_count(n, &mut self.rng, self.view);
        debug!(count, "flake count changed");
        count
    }

    pub fn set_vertical_multiplier(&mut self, m: f32) {
        if !m.is_finite() {
            warn!(value = m, "ignoring non-finite vertical multiplier");
            return;
        }
        self.vertical_multiplier = m;
    }

    pub fn set_wind_multiplier(&mut self, m: f32) {
        if !m.is_finite() {
            warn!(value = m, "ignoring non-finite wind multiplier");
            return;
        }
        self.wind.set_multiplier(m);
        debug!(multiplier = m, target = self.wind.target(), "wind rescaled");
    }

    pub fn set_daylight(&mut self, on: bool) {
        self.daylight = on;
    }

    pub fn toggle_daylight(&mut self) {
        self.set_daylight(!self.daylight);
    }

    /// New surface size. Flakes keep their positions; the ones now outside
    /// come back through recycling or wrapping.
    pub fn resize(&mut self, view: Viewport) {
        info!(width = view.width, height = view.height, "viewport resized");
        self.view = view;
    }

    pub fn stop_timers(&mut self) {
        self.scheduler.cancel_all();
    }

    /// Fires whichever timers are due right now.
    pub fn run_timers(&mut self) {
        let now = self.clock.now_ms();
        while let Some(task) = self.scheduler.poll(now, &mut self.rng) {
            match task {
                Task::WindShift => {
                    let target = self.wind.shift(&mut self.rng);
                    debug!(
                        base = self.wind.base_target(),
                        target,
                        next_ms = ?self.scheduler.next_due(task),
                        "wind shifted"
                    );
                }
                Task::VortexSpawn => {
                    if let Some(v) = self.vortices.roll(&mut self.rng, self.view, now) {
                        debug!(
                            x = v.x,
                            y = v.y,
                            radius = v.radius,
                            strength = v.strength,
                            direction = v.direction,
                            life_ms = v.end_ms - v.start_ms,
                            "vortex spawned"
                        );
                    }
                }
            }
        }
    }

    /// One frame: ease the wind, drop dead vortices, then draw and move every
    /// flake.
    pub fn step<V: Canvas + ?Sized>(&mut self, canvas: &mut V) {
        self.wind.ease();

        let expired = self.vortices.prune(self.clock.now_ms());
        if expired > 0 {
            debug!(expired, live = self.vortices.len(), "vortices expired");
        }

        let view = self.view;
        let shades = FlakeShades::new(self.daylight);
        let swirling = !self.vortices.is_empty();

        for flake in self.pool.iter_mut() {
            draw_flake(canvas, flake, &shades);

            flake.fall(self.vertical_multiplier);
            if swirling {
                self.vortices.push(flake);
            }
            self.wind.push(flake);

            if flake.is_below(view) {
                flake.respawn(&mut self.rng, view);
            }
            flake.wrap_x(view);
        }
    }

    /// Current control values, formatted like slider labels.
    pub fn status_line(&self) -> String {
        format!(
            "flakes {}  vert {:.1}  wind {:.1}  {}  gust {:+.2}  flurries {}",
            self.pool.len(),
            self.vertical_multiplier,
            self.wind.multiplier(),
            if self.daylight { "day" } else { "night" },
            self.wind.speed(),
            self.vortices.len(),
        )
    }
}
