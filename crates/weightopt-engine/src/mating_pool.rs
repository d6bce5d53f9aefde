//! Fitness-proportional parent selection.
//!
//! Each candidate enters the pool `floor(fitness / 10)` times. Parents are
//! drawn uniformly from the resulting multiset, with replacement. The
//! multiset is never materialized: drawing uses a [`WeightedIndex`] over the
//! per-candidate entry counts, scaled by the largest count, which gives the
//! same distribution for any magnitude of fitness.

use rand::{
    Rng,
    distr::{Distribution, weighted::WeightedIndex},
};

use crate::candidate::Candidate;

/// Fitness represented by a single pool entry.
pub const FITNESS_PER_ENTRY: f64 = 10.0;

/// Entries for `fitness` as a float; zero below one entry or when not finite.
fn entries(fitness: f64) -> f64 {
    let count = (fitness / FITNESS_PER_ENTRY).floor();
    if count.is_finite() && count >= 1.0 {
        count
    } else {
        0.0
    }
}

/// Number of pool entries a candidate with `fitness` receives.
///
/// Truncates rather than rounds; candidates below [`FITNESS_PER_ENTRY`]
/// (including negative or NaN fitness) receive none. Saturates at
/// `usize::MAX`.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn entry_count(fitness: f64) -> usize {
    entries(fitness) as usize
}

/// Entry counts for each candidate, in order.
#[must_use]
pub fn entry_counts(members: &[Candidate]) -> Vec<usize> {
    members.iter().map(|m| entry_count(m.fitness())).collect()
}

#[derive(Debug, Clone)]
pub struct MatingPool<'a> {
    members: &'a [Candidate],
    counts: Vec<usize>,
    index: WeightedIndex<f64>,
}

impl<'a> MatingPool<'a> {
    /// Builds the pool for `members`.
    ///
    /// Returns `None` if no candidate earns an entry.
    #[must_use]
    pub fn build(members: &'a [Candidate]) -> Option<Self> {
        let weights = members
            .iter()
            .map(|m| entries(m.fitness()))
            .collect::<Vec<_>>();
        let largest = weights.iter().copied().fold(0.0, f64::max);
        if largest < 1.0 {
            return None;
        }
        // Relative weights in [0, 1], so the total cannot overflow.
        let index = WeightedIndex::new(weights.iter().map(|w| w / largest)).ok()?;
        Some(Self {
            members,
            counts: entry_counts(members),
            index,
        })
    }

    #[must_use]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Total number of entries in the pool, saturating at `usize::MAX`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.iter().fold(0, |acc, &c| acc.saturating_add(c))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Draws one parent.
    pub fn draw<R>(&self, rng: &mut R) -> &'a Candidate
    where
        R: Rng + ?Sized,
    {
        &self.members[self.index.sample(rng)]
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;
    use crate::course::{Grades, Weights};

    /// Candidates whose fitness equals the given values.
    ///
    /// With all grades equal to `g`, fitness is `g` for any valid weights.
    fn with_fitness(values: &[f64]) -> Vec<Candidate> {
        values
            .iter()
            .map(|&g| Candidate::new(Weights::new(0.5, 0.2, 0.3), &Grades::new(g, g, g)))
            .collect()
    }

    #[test]
    fn test_entry_count_truncates() {
        assert_eq!(entry_count(5.0), 0);
        assert_eq!(entry_count(9.999), 0);
        assert_eq!(entry_count(10.0), 1);
        assert_eq!(entry_count(65.8), 6);
        assert_eq!(entry_count(-20.0), 0);
        assert_eq!(entry_count(f64::NAN), 0);
    }

    #[test]
    fn test_counts_follow_fitness() {
        let members = with_fitness(&[5.0, 15.0, 25.0]);
        assert_eq!(entry_counts(&members), vec![0, 1, 2]);

        let pool = MatingPool::build(&members).unwrap();
        assert_eq!(pool.counts(), &[0, 1, 2]);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_low_fitness_pool_is_empty() {
        let members = with_fitness(&[1.0, 5.0, 9.9]);
        assert!(MatingPool::build(&members).is_none());
        assert!(MatingPool::build(&[]).is_none());
    }

    #[test]
    fn test_huge_fitness_still_builds_pool() {
        let members = with_fitness(&[1e20, 2e20, 5.0]);
        let pool = MatingPool::build(&members).unwrap();
        assert!(!pool.is_empty());
        assert_eq!(pool.counts()[2], 0);
        assert_eq!(pool.len(), usize::MAX);

        let members = with_fitness(&[1e300, 1e300]);
        let pool = MatingPool::build(&members).unwrap();
        let mut rng = Pcg64::seed_from_u64(21);
        let mut drawn = [0_u32; 2];
        for _ in 0..10_000 {
            let parent = pool.draw(&mut rng);
            let i = members
                .iter()
                .position(|m| std::ptr::eq(m, parent))
                .unwrap();
            drawn[i] += 1;
        }
        assert!((4_500..5_500).contains(&drawn[0]), "{drawn:?}");
    }

    #[test]
    fn test_draw_is_proportional_to_entries() {
        let members = with_fitness(&[5.0, 15.0, 25.0]);
        let pool = MatingPool::build(&members).unwrap();
        let mut rng = Pcg64::seed_from_u64(20);
        let mut drawn = [0_u32; 3];
        for _ in 0..30_000 {
            let parent = pool.draw(&mut rng);
            let i = members
                .iter()
                .position(|m| std::ptr::eq(m, parent))
                .unwrap();
            drawn[i] += 1;
        }
        assert_eq!(drawn[0], 0);
        // expected 10_000 and 20_000
        assert!((9_000..11_000).contains(&drawn[1]), "{drawn:?}");
        assert!((19_000..21_000).contains(&drawn[2]), "{drawn:?}");
    }
}
