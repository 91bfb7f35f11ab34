// Copyright (c) 2026 rezky_nightky

use rand::Rng;

/// Flakes this far past an edge are recycled (bottom) or wrapped (sides).
pub const EDGE_MARGIN: f32 = 10.0;

pub const MIN_RADIUS: f32 = 1.0;
pub const MAX_RADIUS: f32 = 4.0;
pub const MIN_SPEED: f32 = 1.0;
pub const MAX_SPEED: f32 = 5.0;

/// Recycled flakes re-enter somewhere in `[-40, -10)`.
const RESPAWN_Y_LOW: f32 = -40.0;
const RESPAWN_Y_HIGH: f32 = -10.0;

/// Drawing surface size in virtual pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

/// Uniform sample in `[low, high)`. Never panics on an empty span.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    low + rng.random::<f32>() * (high - low)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Flake {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Fall speed in pixels per frame; doubles as the size class.
    pub speed: f32,
    pub vx: f32,
}

impl Flake {
    /// New flake at a random column. `y: None` scatters it over the whole
    /// viewport height.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, view: Viewport, y: Option<f32>) -> Self {
        let x = uniform(rng, 0.0, view.width);
        let y = match y {
            Some(y) => y,
            None => uniform(rng, 0.0, view.height),
        };
        Self {
            x,
            y,
            radius: uniform(rng, MIN_RADIUS, MAX_RADIUS),
            speed: uniform(rng, MIN_SPEED, MAX_SPEED),
            vx: 0.0,
        }
    }

    /// Overwrites every attribute in place with a fresh flake above the top edge.
    pub fn respawn<R: Rng + ?Sized>(&mut self, rng: &mut R, view: Viewport) {
        let y = uniform(rng, RESPAWN_Y_LOW, RESPAWN_Y_HIGH);
        *self = Flake::spawn(rng, view, Some(y));
    }

    pub fn fall(&mut self, vertical_multiplier: f32) {
        self.y += self.speed * vertical_multiplier;
    }

    pub fn is_below(&self, view: Viewport) -> bool {
        self.y > view.height + EDGE_MARGIN
    }

    pub fn wrap_x(&mut self, view: Viewport) {
        if self.x > view.width + EDGE_MARGIN {
            self.x = -EDGE_MARGIN;
        }
        if self.x < -EDGE_MARGIN {
            self.x = view.width + EDGE_MARGIN;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    const VIEW: Viewport = Viewport {
        width: 640.0,
        height: 480.0,
    };

    #[test]
    fn spawn_stays_in_documented_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let f = Flake::spawn(&mut rng, VIEW, None);
            assert!((0.0..VIEW.width).contains(&f.x));
            assert!((0.0..VIEW.height).contains(&f.y));
            assert!((MIN_RADIUS..MAX_RADIUS).contains(&f.radius));
            assert!((MIN_SPEED..MAX_SPEED).contains(&f.speed));
            assert_eq!(f.vx, 0.0);
        }
    }

    #[test]
    fn spawn_honours_y_override() {
        let mut rng = StdRng::seed_from_u64(7);
        let f = Flake::spawn(&mut rng, VIEW, Some(-25.0));
        assert_eq!(f.y, -25.0);
    }

    #[test]
    fn respawn_rerolls_everything_above_the_top() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let mut f = Flake {
                x: 1.0,
                y: VIEW.height + 11.0,
                radius: 1.0,
                speed: 1.0,
                vx: 3.5,
            };
            f.respawn(&mut rng, VIEW);
            assert!((-40.0..-10.0).contains(&f.y), "y = {}", f.y);
            assert_eq!(f.vx, 0.0);
            assert_ne!(f.x, 1.0);
            assert_ne!(f.radius, 1.0);
            assert_ne!(f.speed, 1.0);
        }
    }

    #[test]
    fn wrap_is_exact_on_both_sides() {
        let mut f = Flake::spawn(&mut StdRng::seed_from_u64(1), VIEW, None);
        f.x = VIEW.width + 11.0;
        f.wrap_x(VIEW);
        assert_eq!(f.x, -10.0);

        f.x = -10.5;
        f.wrap_x(VIEW);
        assert_eq!(f.x, VIEW.width + 10.0);

        f.x = -10.0;
        f.wrap_x(VIEW);
        assert_eq!(f.x, -10.0);
    }

    #[test]
    fn zero_sized_viewport_does_not_panic() {
        let mut rng = StdRng::seed_from_u64(3);
        let f = Flake::spawn(&mut rng, Viewport::new(0.0, 0.0), None);
        assert_eq!((f.x, f.y), (0.0, 0.0));
    }
}
