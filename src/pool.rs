// Copyright (c) 2026 rezky_nightky

use rand::Rng;

use crate::flake::{uniform, Flake, Viewport};

/// Flakes added to a running pool start somewhere in `[-100, 0)`.
const GROW_Y_LOW: f32 = -100.0;

#[derive(Clone, Debug, Default)]
pub struct FlakePool {
    flakes: Vec<Flake>,
}

impl FlakePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.flakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flakes.is_empty()
    }

    pub fn as_slice(&self) -> &[Flake] {
        &self.flakes
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Flake> {
        self.flakes.iter_mut()
    }

    /// Resizes to `floor(max(1, n))` flakes and returns the new size.
    ///
    /// An empty pool is filled across the whole viewport so the first frame
    /// is not blank. A running pool grows by appending flakes staggered above
    /// the top edge and shrinks by dropping the tail; surviving flakes are
    /// left untouched either way.
    pub fn set_desired_count<R: Rng + ?Sized>(
        &mut self,
        n: f64,
        rng: &mut R,
        view: Viewport,
    ) -> usize {
        // Non-finite requests shrink to a single flake.
        let n = if n.is_finite() {
            n.max(1.0).floor() as usize
        } else {
            1
        };

        if self.is_empty() {
            self.flakes.reserve_exact(n);
            self.flakes.extend((0..n).map(|_| Flake::spawn(rng, view, None)));
            return n;
        }

        let cur = self.flakes.len();
        if n > cur {
            self.flakes.reserve(n - cur);
            for _ in cur..n {
                let y = uniform(rng, GROW_Y_LOW, 0.0);
                self.flakes.push(Flake::spawn(rng, view, Some(y)));
            }
        } else if n < cur {
            self.flakes.truncate(n);
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    const VIEW: Viewport = Viewport {
        width: 800.0,
        height: 600.0,
    };

    fn filled(n: f64) -> (FlakePool, StdRng) {
        let mut rng = StdRng::seed_from_u64(42);
        let mut pool = FlakePool::new();
        pool.set_desired_count(n, &mut rng, VIEW);
        (pool, rng)
    }

    #[test]
    fn size_is_floor_of_clamped_request() {
        for (req, want) in [(600.0, 600), (12.9, 12), (1.0, 1), (0.0, 1), (-5.0, 1), (0.4, 1)] {
            let (pool, _) = filled(req);
            assert_eq!(pool.len(), want, "request {}", req);
        }

        let (mut pool, mut rng) = filled(10.0);
        for (req, want) in [(25.7, 25), (3.2, 3), (-1.0, 1), (f64::NAN, 1)] {
            assert_eq!(pool.set_desired_count(req, &mut rng, VIEW), want);
            assert_eq!(pool.len(), want);
        }
    }

    #[test]
    fn infinite_request_does_not_overflow() {
        let (pool, _) = filled(f64::INFINITY);
        assert_eq!(pool.len(), 1);

        let (mut pool, mut rng) = filled(10.0);
        assert_eq!(pool.set_desired_count(f64::INFINITY, &mut rng, VIEW), 1);
        assert_eq!(pool.set_desired_count(f64::NEG_INFINITY, &mut rng, VIEW), 1);
    }

    #[test]
    fn first_fill_covers_the_viewport() {
        let (pool, _) = filled(500.0);
        assert!(pool
            .as_slice()
            .iter()
            .all(|f| (0.0..VIEW.height).contains(&f.y)));
    }

    #[test]
    fn shrink_keeps_the_head_unchanged() {
        let (mut pool, mut rng) = filled(50.0);
        let before = pool.as_slice().to_vec();
        pool.set_desired_count(20.0, &mut rng, VIEW);
        assert_eq!(pool.as_slice(), &before[..20]);
    }

    #[test]
    fn grow_appends_above_the_top_edge() {
        let (mut pool, mut rng) = filled(30.0);
        let before = pool.as_slice().to_vec();
        pool.set_desired_count(80.0, &mut rng, VIEW);

        assert_eq!(pool.len(), 80);
        assert_eq!(&pool.as_slice()[..30], &before[..]);
        for f in &pool.as_slice()[30..] {
            assert!((-100.0..0.0).contains(&f.y), "y = {}", f.y);
            assert_eq!(f.vx, 0.0);
        }
    }

    #[test]
    fn same_size_is_a_no_op() {
        let (mut pool, mut rng) = filled(40.0);
        let before = pool.as_slice().to_vec();
        pool.set_desired_count(40.9, &mut rng, VIEW);
        assert_eq!(pool.as_slice(), &before[..]);
    }
}
