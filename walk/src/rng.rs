use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait WalkRng {
    /// `[min, max)`, or `min` when the range is empty.
    fn range(&mut self, min: i32, max: i32) -> i32;

    fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let max = i32::try_from(len).unwrap_or(i32::MAX);
        Some(self.range(0, max) as usize)
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        self.pick_index(items.len()).and_then(|i| items.get(i))
    }
}

impl<R: WalkRng + ?Sized> WalkRng for &mut R {
    fn range(&mut self, min: i32, max: i32) -> i32 {
        (**self).range(min, max)
    }
}

#[derive(Clone, Debug)]
pub struct StdRandom {
    rng: StdRng,
    seed: u64,
}

impl StdRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl WalkRng for StdRandom {
    fn range(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.rng.random_range(min..max)
    }
}

/// Replays fixed draws, clamped into range. Returns `min` once exhausted.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRandom {
    values: VecDeque<i32>,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = i32>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl WalkRng for ScriptedRandom {
    fn range(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        match self.values.pop_front() {
            Some(value) => value.clamp(min, max - 1),
            None => min,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_stays_in_bounds() {
        let mut rng = StdRandom::from_seed(42);

        for _ in 0..1000 {
            let value = rng.range(-3, 7);
            assert!((-3..7).contains(&value), "value {value} out of range [-3, 7)");
        }
    }

    #[test]
    fn empty_range_returns_min() {
        let mut rng = StdRandom::from_seed(1);

        assert_eq!(rng.range(5, 5), 5);
        assert_eq!(rng.range(5, 2), 5);
    }

    #[test]
    fn pick_from_empty_slice_is_none() {
        let mut rng = StdRandom::from_seed(1);
        let empty: [u8; 0] = [];

        assert_eq!(rng.pick(&empty), None);
        assert_eq!(rng.pick_index(0), None);
    }

    #[test]
    fn pick_reaches_every_item() {
        let mut rng = StdRandom::from_seed(9);
        let items = ['a', 'b', 'c', 'd'];
        let mut seen = [false; 4];

        for _ in 0..200 {
            let i = rng.pick_index(items.len()).unwrap();
            seen[i] = true;
        }

        assert!(seen.iter().all(|&hit| hit));
    }

    #[test]
    fn same_seed_gives_same_sequence() {
        let mut rng1 = StdRandom::from_seed(123);
        let mut rng2 = StdRandom::from_seed(123);

        for _ in 0..100 {
            assert_eq!(rng1.range(0, 1000), rng2.range(0, 1000));
        }
        assert_eq!(rng1.seed(), 123);
    }

    #[test]
    fn entropy_seed_is_reproducible() {
        let mut first = StdRandom::from_entropy();
        let mut replay = StdRandom::from_seed(first.seed());

        for _ in 0..50 {
            assert_eq!(first.range(0, 64), replay.range(0, 64));
        }
    }

    #[test]
    fn borrowed_generator_advances_the_owner() {
        fn draw(mut rng: impl WalkRng) -> i32 {
            rng.range(0, 100)
        }

        let mut rng = StdRandom::from_seed(5);
        let mut reference = StdRandom::from_seed(5);

        assert_eq!(draw(&mut rng), reference.range(0, 100));
        assert_eq!(rng.range(0, 100), reference.range(0, 100));
    }

    #[test]
    fn scripted_draws_replay_in_order_and_clamp() {
        let mut rng = ScriptedRandom::new([2, 9, -4]);

        assert_eq!(rng.range(0, 4), 2);
        assert_eq!(rng.range(0, 4), 3);
        assert_eq!(rng.range(0, 4), 0);
        assert_eq!(rng.remaining(), 0);
        assert_eq!(rng.range(1, 4), 1);
        assert_eq!(rng.pick(&['x', 'y']), Some(&'x'));
    }
}
