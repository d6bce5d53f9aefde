//! Random tuples with per-value bounds and a fixed sum.
//!
//! [`ConstrainedRandom`] draws one value per range so that every value lies
//! within its own range and all values add up to a target total. It is used
//! to seed the initial population only; later generations come from
//! crossover and mutation.
//!
//! # Strategy
//!
//! Every value but the last is drawn uniformly within its range, and the last
//! value is whatever remains to reach the target. When the remainder falls
//! outside the last range, the whole tuple is drawn again.
//!
//! Rejection alone can take arbitrarily long when the feasible region is
//! thin (for example when the target equals the sum of all maximums). After
//! [`MAX_REJECTED_DRAWS`] rejections the generator switches to drawing each
//! value from its range narrowed to what keeps the remainder reachable, which
//! cannot fail once the ranges were validated. Infeasible ranges are rejected
//! by [`ConstrainedRandom::new`], so sampling always terminates.
//!
//! Every value lies inside its range exactly; the sum equals the target up
//! to floating-point rounding.

use rand::{Rng, distr::Distribution};

use crate::{ConfigurationError, course::Bounds};

/// Number of rejected tuples before falling back to narrowed ranges.
pub const MAX_REJECTED_DRAWS: usize = 1000;

/// Sampler of bounded tuples with a fixed sum.
///
/// # Examples
///
/// ```
/// use rand::Rng as _;
/// use weightopt_engine::{constrained_random::ConstrainedRandom, course::Bounds};
///
/// let generator = ConstrainedRandom::new(
///     [Bounds::new(40.0, 60.0), Bounds::new(10.0, 30.0), Bounds::new(20.0, 40.0)],
///     100.0,
/// )
/// .unwrap();
/// let values = rand::rng().sample(&generator);
/// assert_eq!(values.len(), 3);
/// assert!((values.iter().sum::<f64>() - 100.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct ConstrainedRandom {
    ranges: Vec<Bounds>,
    target: f64,
}

impl ConstrainedRandom {
    /// Creates a generator after checking that `target` is reachable.
    ///
    /// Fails when no range is given, when a range is not a finite
    /// `min <= max` interval, or when `target` lies outside
    /// `[Σmin, Σmax]`.
    pub fn new<I>(ranges: I, target: f64) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = Bounds>,
    {
        let ranges = ranges.into_iter().collect::<Vec<_>>();
        if ranges.is_empty() {
            return Err(ConfigurationError::EmptyRanges);
        }
        for (index, range) in ranges.iter().enumerate() {
            if !(range.min.is_finite() && range.max.is_finite() && range.min <= range.max) {
                return Err(ConfigurationError::InvalidRange {
                    index,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        let min_sum = ranges.iter().map(|r| r.min).sum::<f64>();
        let max_sum = ranges.iter().map(|r| r.max).sum::<f64>();
        if !(min_sum <= target && target <= max_sum) {
            return Err(ConfigurationError::Infeasible {
                target,
                min_sum,
                max_sum,
            });
        }
        Ok(Self { ranges, target })
    }

    #[must_use]
    pub fn ranges(&self) -> &[Bounds] {
        &self.ranges
    }

    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    fn try_draw<R>(&self, rng: &mut R) -> Option<Vec<f64>>
    where
        R: Rng + ?Sized,
    {
        let (last, init) = self.ranges.split_last()?;
        let mut values = init
            .iter()
            .map(|r| rng.random_range(r.min..=r.max))
            .collect::<Vec<_>>();
        let remainder = self.target - values.iter().sum::<f64>();
        if !last.contains(remainder) {
            return None;
        }
        values.push(remainder);
        Some(values)
    }

    fn draw_narrowed<R>(&self, rng: &mut R) -> Vec<f64>
    where
        R: Rng + ?Sized,
    {
        let mut values = Vec::with_capacity(self.ranges.len());
        let mut rest = self.target;
        for (i, range) in self.ranges.iter().enumerate() {
            let after = &self.ranges[i + 1..];
            if after.is_empty() {
                // Rounding in `rest` can leave it an ulp outside the range.
                values.push(rest.clamp(range.min, range.max));
                break;
            }
            let min_after = after.iter().map(|r| r.min).sum::<f64>();
            let max_after = after.iter().map(|r| r.max).sum::<f64>();
            let lower = f64::max(range.min, rest - max_after);
            let upper = f64::min(range.max, rest - min_after);
            let value = if lower < upper {
                rng.random_range(lower..=upper)
            } else {
                lower.clamp(range.min, range.max)
            };
            values.push(value);
            rest -= value;
        }
        values
    }
}

impl Distribution<Vec<f64>> for ConstrainedRandom {
    fn sample<R>(&self, rng: &mut R) -> Vec<f64>
    where
        R: Rng + ?Sized,
    {
        for _ in 0..MAX_REJECTED_DRAWS {
            if let Some(values) = self.try_draw(rng) {
                return values;
            }
        }
        self.draw_narrowed(rng)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;

    fn default_ranges() -> [Bounds; 3] {
        [
            Bounds::new(40.0, 60.0),
            Bounds::new(10.0, 30.0),
            Bounds::new(20.0, 40.0),
        ]
    }

    fn assert_valid(generator: &ConstrainedRandom, values: &[f64]) {
        assert_eq!(values.len(), generator.ranges().len());
        for (value, range) in values.iter().zip(generator.ranges()) {
            assert!(
                range.contains(*value),
                "{value} outside [{}, {}]",
                range.min,
                range.max
            );
        }
        let sum = values.iter().sum::<f64>();
        assert!((sum - generator.target()).abs() < 1e-9, "sum is {sum}");
    }

    #[test]
    fn test_draws_respect_ranges_and_sum() {
        let generator = ConstrainedRandom::new(default_ranges(), 100.0).unwrap();
        let mut rng = Pcg64::seed_from_u64(1);
        for _ in 0..10_000 {
            let values = rng.sample(&generator);
            assert_valid(&generator, &values);
        }
    }

    #[test]
    fn test_minimums_above_target_fail_fast() {
        let result = ConstrainedRandom::new(
            [
                Bounds::new(60.0, 70.0),
                Bounds::new(30.0, 40.0),
                Bounds::new(20.0, 40.0),
            ],
            100.0,
        );
        assert!(matches!(
            result,
            Err(ConfigurationError::Infeasible { min_sum, max_sum, .. })
                if min_sum == 110.0 && max_sum == 150.0
        ));
    }

    #[test]
    fn test_empty_and_invalid_ranges() {
        assert!(matches!(
            ConstrainedRandom::new(Vec::new(), 100.0),
            Err(ConfigurationError::EmptyRanges)
        ));
        assert!(matches!(
            ConstrainedRandom::new([Bounds::new(0.0, 100.0), Bounds::new(5.0, f64::NAN)], 100.0),
            Err(ConfigurationError::InvalidRange { index: 1, .. })
        ));
    }

    #[test]
    fn test_target_on_boundary_terminates() {
        // Only (60, 30, 10) reaches 100, so rejection never succeeds.
        let generator = ConstrainedRandom::new(
            [
                Bounds::new(40.0, 60.0),
                Bounds::new(10.0, 30.0),
                Bounds::new(0.0, 10.0),
            ],
            100.0,
        )
        .unwrap();
        let mut rng = Pcg64::seed_from_u64(2);
        for _ in 0..20 {
            let values = rng.sample(&generator);
            assert_valid(&generator, &values);
        }
    }

    #[test]
    fn test_narrowed_draw_is_valid() {
        let generator = ConstrainedRandom::new(default_ranges(), 100.0).unwrap();
        let mut rng = Pcg64::seed_from_u64(3);
        for _ in 0..1000 {
            let values = generator.draw_narrowed(&mut rng);
            assert_valid(&generator, &values);
        }
    }

    #[test]
    fn test_narrowed_draw_stays_inside_thin_ranges() {
        // Fractional bounds whose sums are not exact in binary.
        let generator = ConstrainedRandom::new(
            [
                Bounds::new(0.1, 0.3),
                Bounds::new(0.2, 0.2),
                Bounds::new(0.3, 0.7),
            ],
            0.7,
        )
        .unwrap();
        let mut rng = Pcg64::seed_from_u64(5);
        for _ in 0..1000 {
            let values = generator.draw_narrowed(&mut rng);
            assert_valid(&generator, &values);
        }
    }

    #[test]
    fn test_single_range_returns_target() {
        let generator = ConstrainedRandom::new([Bounds::new(0.0, 100.0)], 42.0).unwrap();
        let values = rng_sample(&generator);
        assert_eq!(values, vec![42.0]);
    }

    fn rng_sample(generator: &ConstrainedRandom) -> Vec<f64> {
        Pcg64::seed_from_u64(4).sample(generator)
    }
}
