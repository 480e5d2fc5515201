//! # Zipf Delay Model
//!
//! Extra delivery delay drawn from a Zipf distribution over `0..size`
//! milliseconds: rank `k` (delay `k - 1`) has weight `1 / k^skew`, so short
//! delays dominate and long ones form a thin tail.

use rand::Rng;

use callsim_core::SimulationError;

#[derive(Debug, Clone)]
pub struct ZipfDelay {
    size: u64,
    skew: f64,
    /// Sum of `1 / k^skew` over all ranks, computed once.
    normalizer: f64,
}

impl ZipfDelay {
    pub fn new(size: u64, skew: f64) -> Result<Self, SimulationError> {
        if size == 0 {
            return Err(SimulationError::Config(
                "delay distribution needs at least one value".into(),
            ));
        }
        if !skew.is_finite() || skew < 0.0 {
            return Err(SimulationError::Config(format!(
                "delay skew must be a non-negative number, got {skew}"
            )));
        }

        let normalizer = (1..=size).map(|rank| weight(rank, skew)).sum();
        Ok(Self {
            size,
            skew,
            normalizer,
        })
    }

    /// Samples by rejection: a uniform rank is accepted when a uniform dice
    /// falls under its normalized weight.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        if self.size == 1 {
            return 0;
        }
        loop {
            let rank = rng.random_range(1..=self.size);
            let frequency = weight(rank, self.skew) / self.normalizer;
            let dice: f64 = rng.random();
            if dice < frequency {
                return rank - 1;
            }
        }
    }

    /// Number of distinct delays.
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }
}

#[inline]
fn weight(rank: u64, skew: f64) -> f64 {
    1.0 / (rank as f64).powf(skew)
}
