use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Highest level index used when no explicit maximum is given.
pub const DEFAULT_MAX_LEVEL: usize = 16;

/// Probability of a node being promoted one level further up.
pub const DEFAULT_UPGRADE_PROBABILITY: f64 = 0.5;

/// Decides the level of every node inserted in a skip list.
///
/// Levels are 0-based: a node of level `L` takes part in the chains
/// `0..=L`. Implementations must never return a level greater than
/// `max_height()`.
pub trait HeightControl<K> {
    fn max_height(&self) -> usize;
    fn get_height(&mut self, key: &K) -> usize;
}

pub struct GeometricalGenerator {
    upgrade_probability_: f64,
    max_height_: usize,
    rng_: StdRng,
}

impl GeometricalGenerator {
    /// Creates a generator seeded from the operating system.
    pub fn new(max_height: usize, upgrade_probability: f64) -> GeometricalGenerator {
        Self::with_rng(max_height, upgrade_probability, StdRng::from_entropy())
    }

    /// Creates a generator producing the same sequence of heights for the
    /// same seed.
    pub fn with_seed(max_height: usize, upgrade_probability: f64, seed: u64) -> GeometricalGenerator {
        Self::with_rng(max_height, upgrade_probability, StdRng::seed_from_u64(seed))
    }

    fn with_rng(max_height: usize, upgrade_probability: f64, rng: StdRng) -> GeometricalGenerator {
        assert!(
            (0.0..1.0).contains(&upgrade_probability),
            "upgrade probability must be in [0, 1)"
        );

        GeometricalGenerator {
            upgrade_probability_: upgrade_probability,
            max_height_: max_height,
            rng_: rng,
        }
    }

    pub fn upgrade_probability(&self) -> f64 {
        self.upgrade_probability_
    }
}

impl Default for GeometricalGenerator {
    fn default() -> Self {
        GeometricalGenerator::new(DEFAULT_MAX_LEVEL, DEFAULT_UPGRADE_PROBABILITY)
    }
}

impl<K> HeightControl<K> for GeometricalGenerator {
    #[inline(always)]
    fn max_height(&self) -> usize {
        self.max_height_
    }

    fn get_height(&mut self, _key: &K) -> usize {
        // Simulates a random variate with geometric distribution. The idea is
        // that we are modelling number of successes until the first failure.
        let mut h = 0;

        while h < self.max_height_ {
            let throw: f64 = self.rng_.gen();
            if throw >= self.upgrade_probability_ {
                return h;
            }

            h += 1;
        }

        h
    }
}

/// Hands out a fixed sequence of heights, starting over once exhausted.
/// Heights above the maximum are capped. Useful when the exact shape of the
/// list matters, e.g. in tests.
pub struct FixedHeights {
    heights_: Vec<usize>,
    position_: usize,
    max_height_: usize,
}

impl FixedHeights {
    pub fn new(max_height: usize, heights: Vec<usize>) -> FixedHeights {
        assert!(!heights.is_empty(), "at least one height is required");

        FixedHeights {
            heights_: heights,
            position_: 0,
            max_height_: max_height,
        }
    }
}

impl<K> HeightControl<K> for FixedHeights {
    #[inline(always)]
    fn max_height(&self) -> usize {
        self.max_height_
    }

    fn get_height(&mut self, _key: &K) -> usize {
        let height = self.heights_[self.position_];
        self.position_ = (self.position_ + 1) % self.heights_.len();
        std::cmp::min(height, self.max_height_)
    }
}
