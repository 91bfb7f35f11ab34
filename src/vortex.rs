// Copyright (c) 2026 rezky_nightky

use rand::Rng;

use crate::flake::{uniform, Flake, Viewport};

pub const SPAWN_MIN_MS: f64 = 4000.0;
pub const SPAWN_MAX_MS: f64 = 12000.0;
pub const SPAWN_CHANCE: f32 = 0.5;

const MIN_RADIUS: f32 = 200.0;
const MAX_RADIUS: f32 = 500.0;
const MIN_STRENGTH: f32 = 0.25;
const MAX_STRENGTH: f32 = 1.0;
const MIN_DURATION_MS: f64 = 3000.0;
const MAX_DURATION_MS: f64 = 8000.0;
/// Centers are kept to the upper part of the viewport.
const CENTER_BAND: f32 = 0.6;

const DIST_EPSILON: f32 = 1e-4;
const DOWNWARD_BIAS: f32 = 0.25;
const VX_SCALE: f32 = 0.02;
const VY_SCALE: f32 = 0.02;

/// A short-lived swirl. Pushes flakes around its center and slightly down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vortex {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub strength: f32,
    /// `1.0` or `-1.0`; picks the sense of rotation.
    pub direction: f32,
    pub start_ms: f64,
    pub end_ms: f64,
}

impl Vortex {
    pub fn random<R: Rng + ?Sized>(rng: &mut R, view: Viewport, now_ms: f64) -> Self {
        let radius = uniform(rng, MIN_RADIUS, MAX_RADIUS);
        let strength = uniform(rng, MIN_STRENGTH, MAX_STRENGTH);
        let duration =
            MIN_DURATION_MS + rng.random::<f64>() * (MAX_DURATION_MS - MIN_DURATION_MS);
        let direction = if rng.random::<f32>() < 0.5 { -1.0 } else { 1.0 };
        let x = uniform(rng, 0.0, view.width);
        let y = uniform(rng, 0.0, view.height * CENTER_BAND);
        Self {
            x,
            y,
            radius,
            strength,
            direction,
            start_ms: now_ms,
            end_ms: now_ms + duration,
        }
    }

    pub fn is_expired(&self, now_ms: f64) -> bool {
        self.end_ms < now_ms
    }

    /// Acceleration this vortex exerts at `(px, py)`; zero outside the radius.
    pub fn acceleration(&self, px: f32, py: f32) -> (f32, f32) {
        let dx = px - self.x;
        let dy = py - self.y;
        let dist = dx.hypot(dy) + DIST_EPSILON;
        if dist >= self.radius {
            return (0.0, 0.0);
        }

        let falloff = 1.0 - dist / self.radius;
        let tangential = self.direction * self.strength * falloff;
        let ax = (-dy / dist) * tangential;
        let ay = (dx / dist) * tangential + DOWNWARD_BIAS * self.strength * falloff;
        (ax, ay)
    }
}

#[derive(Clone, Debug, Default)]
pub struct VortexField {
    vortices: Vec<Vortex>,
}

impl VortexField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.vortices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vortices.is_empty()
    }

    #[allow(dead_code)]
    pub fn as_slice(&self) -> &[Vortex] {
        &self.vortices
    }

    pub fn insert(&mut self, vortex: Vortex) {
        self.vortices.push(vortex);
    }

    /// One roll of the spawn timer: adds a random vortex with 50% chance.
    pub fn roll<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        view: Viewport,
        now_ms: f64,
    ) -> Option<Vortex> {
        if rng.random::<f32>() >= SPAWN_CHANCE {
            return None;
        }
        let v = Vortex::random(rng, view, now_ms);
        self.insert(v);
        Some(v)
    }

    /// Drops every vortex that ended before `now_ms`; returns how many went.
    pub fn prune(&mut self, now_ms: f64) -> usize {
        let before = self.vortices.len();
        self.vortices.retain(|v| !v.is_expired(now_ms));
        before - self.vortices.len()
    }

    pub fn acceleration(&self, px: f32, py: f32) -> (f32, f32) {
        self.vortices.iter().fold((0.0, 0.0), |(ax, ay), v| {
            let (vx, vy) = v.acceleration(px, py);
            (ax + vx, ay + vy)
        })
    }

    /// Horizontal pull goes into velocity; vertical pull moves the flake
    /// directly for this frame only.
    pub fn push(&self, flake: &mut Flake) {
        let (ax, ay) = self.acceleration(flake.x, flake.y);
        flake.vx += ax * VX_SCALE;
        flake.y += ay * VY_SCALE;
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    const VIEW: Viewport = Viewport {
        width: 1200.0,
        height: 800.0,
    };

    fn still(x: f32, y: f32, direction: f32) -> Vortex {
        Vortex {
            x,
            y,
            radius: 300.0,
            strength: 0.8,
            direction,
            start_ms: 0.0,
            end_ms: 5000.0,
        }
    }

    #[test]
    fn random_vortex_respects_ranges() {
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..500 {
            let v = Vortex::random(&mut rng, VIEW, 1000.0);
            assert!((200.0..500.0).contains(&v.radius));
            assert!((0.25..1.0).contains(&v.strength));
            assert!(v.direction == 1.0 || v.direction == -1.0);
            assert!((0.0..VIEW.width).contains(&v.x));
            assert!((0.0..VIEW.height * 0.6).contains(&v.y));
            let life = v.end_ms - v.start_ms;
            assert!((3000.0..=8000.0).contains(&life));
            assert_eq!(v.start_ms, 1000.0);
        }
    }

    #[test]
    fn roll_spawns_about_half_the_time() {
        let mut rng = StdRng::seed_from_u64(77);
        let mut field = VortexField::new();
        let spawned = (0..2000)
            .filter(|_| field.roll(&mut rng, VIEW, 0.0).is_some())
            .count();
        assert_eq!(spawned, field.len());
        assert!((800..1200).contains(&spawned), "spawned {}", spawned);
    }

    #[test]
    fn expiry_is_exclusive_of_the_end_instant() {
        let mut field = VortexField::new();
        field.insert(still(0.0, 0.0, 1.0));

        assert_eq!(field.prune(4999.0), 0);
        assert_eq!(field.prune(5000.0), 0);
        assert_eq!(field.len(), 1);
        assert_eq!(field.prune(5000.5), 1);
        assert!(field.is_empty());
    }

    #[test]
    fn prune_keeps_live_vortices_in_order() {
        let mut field = VortexField::new();
        for (i, end) in [100.0, 900.0, 50.0, 2000.0].into_iter().enumerate() {
            let mut v = still(i as f32, 0.0, 1.0);
            v.end_ms = end;
            field.insert(v);
        }
        assert_eq!(field.prune(500.0), 2);
        let xs: Vec<f32> = field.as_slice().iter().map(|v| v.x).collect();
        assert_eq!(xs, vec![1.0, 3.0]);
    }

    #[test]
    fn no_force_at_or_beyond_the_radius() {
        let v = still(500.0, 300.0, 1.0);
        assert_eq!(v.acceleration(800.0, 300.0), (0.0, 0.0));
        assert_eq!(v.acceleration(500.0, 1000.0), (0.0, 0.0));
    }

    #[test]
    fn center_gets_full_strength() {
        let v = still(500.0, 300.0, -1.0);
        let (ax, ay) = v.acceleration(500.0, 300.0);
        assert!(ax.abs() < 1e-6);
        assert!((ay - 0.25 * 0.8).abs() < 1e-3);

        // One pixel right of center the tangent points straight up or down.
        let (ax, ay) = v.acceleration(501.0, 300.0);
        assert!(ax.abs() < 1e-6);
        assert!((ay - (-0.8 + 0.25 * 0.8)).abs() < 1e-2, "ay = {}", ay);
    }

    #[test]
    fn direction_sets_the_sense_of_rotation() {
        let cw = still(0.0, 0.0, 1.0);
        let ccw = still(0.0, 0.0, -1.0);
        // Above the center (negative dy), direction +1 pushes to the right.
        let (ax_cw, _) = cw.acceleration(0.0, -100.0);
        let (ax_ccw, _) = ccw.acceleration(0.0, -100.0);
        assert!(ax_cw > 0.0);
        assert!((ax_cw + ax_ccw).abs() < 1e-6);
    }

    #[test]
    fn overlapping_vortices_sum() {
        let mut field = VortexField::new();
        let a = still(0.0, 0.0, 1.0);
        let b = still(50.0, 20.0, -1.0);
        field.insert(a);
        field.insert(b);

        let (ax, ay) = field.acceleration(10.0, 40.0);
        let (a1, a2) = a.acceleration(10.0, 40.0);
        let (b1, b2) = b.acceleration(10.0, 40.0);
        assert!((ax - (a1 + b1)).abs() < 1e-6);
        assert!((ay - (a2 + b2)).abs() < 1e-6);
    }

    #[test]
    fn push_feeds_velocity_and_nudges_position() {
        let mut field = VortexField::new();
        field.insert(still(0.0, 0.0, 1.0));
        let mut flake = Flake {
            x: 0.0,
            y: -100.0,
            radius: 2.0,
            speed: 2.0,
            vx: 0.0,
        };
        let (ax, ay) = field.acceleration(flake.x, flake.y);
        field.push(&mut flake);
        assert!((flake.vx - ax * 0.02).abs() < 1e-6);
        assert!((flake.y - (-100.0 + ay * 0.02)).abs() < 1e-5);
        assert_eq!(flake.x, 0.0);
    }
}
