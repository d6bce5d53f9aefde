use std::fmt;

use arrayvec::ArrayVec;
use rand::Rng;

use crate::{
    component::Component,
    course::{Bounds, Course, Grades, Weights},
};

/// Relative step a mutation scales the primary weight by.
pub const MUTATION_STEP: f64 = 0.1;

/// Weighted sum of the grades.
#[must_use]
pub fn calculate_fitness(weights: &Weights, grades: &Grades) -> f64 {
    Component::ALL
        .into_iter()
        .map(|c| grades[c] * weights[c])
        .sum()
}

/// One weight vector in the population, with its fitness.
///
/// The weights always sum to 1.0 and each lies within its component's
/// fractional limit. Fitness is kept in sync with the weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    weights: Weights,
    fitness: f64,
}

/// What a call to [`Candidate::mutate`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum MutationOutcome {
    /// The mutation roll failed; nothing was attempted.
    Skipped,
    /// A mutation was attempted but would have left a weight out of range.
    Abandoned,
    /// Two weights were adjusted and fitness recomputed.
    Applied,
}

impl Candidate {
    #[must_use]
    pub fn new(weights: Weights, grades: &Grades) -> Self {
        let fitness = calculate_fitness(&weights, grades);
        Self { weights, fitness }
    }

    #[must_use]
    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    #[must_use]
    pub fn calculate_fitness(&self, grades: &Grades) -> f64 {
        calculate_fitness(&self.weights, grades)
    }

    /// Creates a child whose weights are the component-wise mean of both parents.
    ///
    /// Averaging two vectors that sum to 1.0 yields a vector that sums to 1.0,
    /// and averaging two in-range values stays in range, so the child needs no
    /// repair.
    #[must_use]
    pub fn mate(&self, other: &Candidate, grades: &Grades) -> Candidate {
        let weights = Weights::from_fn(|c| f64::midpoint(self.weights[c], other.weights[c]));
        Candidate::new(weights, grades)
    }

    /// Randomly perturbs two weights in opposite directions, keeping the sum.
    ///
    /// With probability `rate`:
    ///
    /// 1. pick a primary component and scale its weight by +10%, or by -10%
    ///    if +10% exceeds its upper limit;
    /// 2. pick a different component and shift it by the opposite amount;
    /// 3. commit both changes only if every weight stays within its limit.
    ///
    /// A mutation that cannot be completed leaves the candidate untouched.
    /// The compensating component is drawn once; an out-of-range compensation
    /// is not retried with the remaining component.
    ///
    /// # Panics
    ///
    /// Panics if `rate` is not within `[0, 1]`.
    pub fn mutate<R>(&mut self, course: &Course, rate: f64, rng: &mut R) -> MutationOutcome
    where
        R: Rng + ?Sized,
    {
        if !rng.random_bool(rate) {
            return MutationOutcome::Skipped;
        }

        let limits = course.fraction_limits();
        let primary = rng.random::<Component>();
        let old = self.weights[primary];
        let Some(new) = scaled_within(old, limits[primary]) else {
            return MutationOutcome::Abandoned;
        };
        let delta = new - old;

        let others = Component::ALL
            .into_iter()
            .filter(|&c| c != primary)
            .collect::<ArrayVec<_, { Component::LEN }>>();
        let secondary = others[rng.random_range(0..others.len())];
        let compensated = self.weights[secondary] - delta;
        if !limits[secondary].contains(compensated) {
            return MutationOutcome::Abandoned;
        }

        self.weights[primary] = new;
        self.weights[secondary] = compensated;
        self.fitness = self.calculate_fitness(&course.grades);
        MutationOutcome::Applied
    }
}

/// Scales `value` up by [`MUTATION_STEP`], or down if up leaves `bounds`.
fn scaled_within(value: f64, bounds: Bounds) -> Option<f64> {
    let up = value * (1.0 + MUTATION_STEP);
    if up <= bounds.max {
        return Some(up);
    }
    let down = value * (1.0 - MUTATION_STEP);
    (down >= bounds.min).then_some(down)
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Weights {
            assignment,
            quiz,
            project,
        } = self.weights;
        match f.precision() {
            Some(p) => write!(
                f,
                "({assignment:.p$}, {quiz:.p$}, {project:.p$}), Fit: {:.p$}",
                self.fitness
            ),
            None => write!(
                f,
                "({assignment}, {quiz}, {project}), Fit: {}",
                self.fitness
            ),
        }
    }
}
