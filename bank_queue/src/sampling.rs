//! Randomness for inter-arrival and service times
//!
//! The engine draws every duration through one injected [`Sampler`], so a
//! seeded generator gives a repeatable run and a scripted sampler gives a
//! fully deterministic one.

use des::Time;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use crate::SimulationError;

/// Inclusive integer range `mean - variance ..= mean + variance`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniformSpec {
    pub mean: Time,
    pub variance: Time,
}

impl UniformSpec {
    pub fn new(mean: Time, variance: Time) -> UniformSpec {
        UniformSpec { mean, variance }
    }

    /// `(low, high)`, or `None` if either end overflows
    pub fn checked_bounds(&self) -> Option<(Time, Time)> {
        let low = self.mean.checked_sub(self.variance)?;
        let high = self.mean.checked_add(self.variance)?;
        Some((low, high))
    }
}

/// Draw uniformly from `[mean - variance, mean + variance]`
pub fn uniform_random<R: Rng + ?Sized>(
    rng: &mut R,
    mean: Time,
    variance: Time,
) -> Result<Time, SimulationError> {
    let (low, high) = UniformSpec::new(mean, variance)
        .checked_bounds()
        .ok_or(SimulationError::InvalidRange { mean, variance })?;
    let dist = Uniform::new_inclusive(low, high)
        .map_err(|_| SimulationError::InvalidRange { mean, variance })?;
    Ok(dist.sample(rng))
}

/// Source of sampled durations
pub trait Sampler {
    fn sample(&mut self, spec: UniformSpec) -> Result<Time, SimulationError>;
}

/// Samples from a real random number generator
#[derive(Debug, Clone)]
pub struct RngSampler<R> {
    rng: R,
}

impl<R: Rng> RngSampler<R> {
    pub fn new(rng: R) -> Self {
        RngSampler { rng }
    }
}

impl RngSampler<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        RngSampler::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Sampler for RngSampler<R> {
    fn sample(&mut self, spec: UniformSpec) -> Result<Time, SimulationError> {
        uniform_random(&mut self.rng, spec.mean, spec.variance)
    }
}

/// Replays a fixed cycle of values and ignores the requested range
///
/// The engine draws the inter-arrival time first and the service time
/// second, so `ScriptedSampler::new(vec![5, 3])` means "a customer every 5
/// ticks, each needing 3 ticks of service".
#[derive(Debug, Clone)]
pub struct ScriptedSampler {
    values: Vec<Time>,
    next: usize,
}

impl ScriptedSampler {
    pub fn new(values: Vec<Time>) -> Self {
        ScriptedSampler { values, next: 0 }
    }
}

impl Sampler for ScriptedSampler {
    fn sample(&mut self, _spec: UniformSpec) -> Result<Time, SimulationError> {
        if self.values.is_empty() {
            return Err(SimulationError::InvalidConfiguration(
                "scripted sampler has no values".to_string(),
            ));
        }
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_stay_within_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        for (mean, variance) in [(3, 2), (8, 3), (10, 0), (0, 0), (100, 99)] {
            for _ in 0..2_000 {
                let x = uniform_random(&mut rng, mean, variance).unwrap();
                assert!(
                    (mean - variance..=mean + variance).contains(&x),
                    "{x} outside {mean} ± {variance}"
                );
            }
        }
    }

    #[test]
    fn every_value_in_range_is_reachable() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 5];
        for _ in 0..1_000 {
            let x = uniform_random(&mut rng, 3, 2).unwrap();
            seen[(x - 1) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s), "not all of 1..=5 drawn: {seen:?}");
    }

    #[test]
    fn zero_variance_is_constant() {
        let mut sampler = RngSampler::seeded(1);
        for _ in 0..100 {
            assert_eq!(sampler.sample(UniformSpec::new(4, 0)).unwrap(), 4);
        }
    }

    #[test]
    fn negative_variance_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            uniform_random(&mut rng, 5, -1),
            Err(SimulationError::InvalidRange {
                mean: 5,
                variance: -1
            })
        ));
    }

    #[test]
    fn overflowing_range_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            uniform_random(&mut rng, Time::MAX, 1),
            Err(SimulationError::InvalidRange { .. })
        ));
        assert!(matches!(
            uniform_random(&mut rng, Time::MIN, 1),
            Err(SimulationError::InvalidRange { .. })
        ));
        assert_eq!(
            UniformSpec::new(Time::MAX, 0).checked_bounds(),
            Some((Time::MAX, Time::MAX))
        );
    }

    #[test]
    fn same_seed_same_stream() {
        let spec = UniformSpec::new(50, 40);
        let mut a = RngSampler::seeded(99);
        let mut b = RngSampler::seeded(99);
        for _ in 0..100 {
            assert_eq!(a.sample(spec).unwrap(), b.sample(spec).unwrap());
        }
    }

    #[test]
    fn scripted_sampler_cycles() {
        let spec = UniformSpec::new(0, 0);
        let mut sampler = ScriptedSampler::new(vec![5, 3]);
        let drawn: Vec<Time> = (0..5).map(|_| sampler.sample(spec).unwrap()).collect();
        assert_eq!(drawn, vec![5, 3, 5, 3, 5]);
    }

    #[test]
    fn empty_script_is_an_error() {
        let mut sampler = ScriptedSampler::new(Vec::new());
        assert!(sampler.sample(UniformSpec::new(1, 0)).is_err());
    }
}
