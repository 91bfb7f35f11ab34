// Copyright (c) 2026 rezky_nightky

use rand::Rng;

use crate::flake::{uniform, Flake};

pub const CHANGE_MIN_MS: f64 = 5000.0;
pub const CHANGE_MAX_MS: f64 = 10000.0;

const BASE_LIMIT: f32 = 5.0;
const SMOOTHING: f32 = 0.02;
const INFLUENCE_SMALL: f32 = 0.01;
const INFLUENCE_LARGE: f32 = INFLUENCE_SMALL / 3.0;
/// Flakes at or above this fall speed count as large.
const LARGE_SPEED: f32 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wind {
    base_target: f32,
    target: f32,
    speed: f32,
    multiplier: f32,
}

impl Wind {
    pub fn new(multiplier: f32) -> Self {
        Self {
            base_target: 0.0,
            target: 0.0,
            speed: 0.0,
            multiplier,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn base_target(&self) -> f32 {
        self.base_target
    }

    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    /// Picks a new base target in `[-5, 5)`; returns the scaled target.
    pub fn shift<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f32 {
        self.base_target = uniform(rng, -BASE_LIMIT, BASE_LIMIT);
        self.target = self.base_target * self.multiplier;
        self.target
    }

    /// Rescales the current target right away instead of waiting for the
    /// next shift.
    pub fn set_multiplier(&mut self, multiplier: f32) {
        self.multiplier = multiplier;
        self.target = self.base_target * multiplier;
    }

    pub fn ease(&mut self) {
        self.speed += (self.target - self.speed) * SMOOTHING;
    }

    pub fn influence_rate(fall_speed: f32) -> f32 {
        if fall_speed < LARGE_SPEED {
            INFLUENCE_SMALL
        } else {
            INFLUENCE_LARGE
        }
    }

    #[cfg(test)]
    pub(crate) fn force_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn push(&self, flake: &mut Flake) {
        let rate = Self::influence_rate(flake.speed);
        flake.vx += (self.speed - flake.vx) * rate;
        flake.x += flake.vx;
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn calm_flake(speed: f32) -> Flake {
        Flake {
            x: 100.0,
            y: 100.0,
            radius: 2.0,
            speed,
            vx: 0.0,
        }
    }

    #[test]
    fn shift_scales_base_by_multiplier() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut wind = Wind::new(2.0);
        for _ in 0..500 {
            let target = wind.shift(&mut rng);
            assert!((-5.0..5.0).contains(&wind.base_target()));
            assert_eq!(target, wind.base_target() * 2.0);
        }
    }

    #[test]
    fn multiplier_change_rescales_immediately() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut wind = Wind::new(1.0);
        wind.shift(&mut rng);
        let base = wind.base_target();

        wind.set_multiplier(0.5);
        assert_eq!(wind.target(), base * 0.5);
        assert_eq!(wind.base_target(), base);
    }

    #[test]
    fn ease_moves_strictly_toward_target() {
        let mut wind = Wind::new(1.0);
        wind.base_target = 4.0;
        wind.target = 4.0;
        let mut prev = wind.speed();
        for _ in 0..200 {
            wind.ease();
            assert!(wind.speed() > prev && wind.speed() < 4.0);
            prev = wind.speed();
        }

        wind.set_multiplier(-1.0);
        let prev = wind.speed();
        wind.ease();
        assert!(wind.speed() < prev && wind.speed() > -4.0);
    }

    #[test]
    fn large_flakes_feel_a_third_of_the_wind() {
        assert_eq!(Wind::influence_rate(2.99), 0.01);
        assert_eq!(Wind::influence_rate(3.0), 0.01 / 3.0);

        let mut wind = Wind::new(1.0);
        wind.speed = 3.0;

        let mut small = calm_flake(1.5);
        wind.push(&mut small);
        assert!((small.vx - 0.03).abs() < 1e-6);
        assert!((small.x - 100.03).abs() < 1e-4);

        let mut large = calm_flake(4.0);
        wind.push(&mut large);
        assert!((large.vx - 0.01).abs() < 1e-6);
    }
}
