//! Evolutionary search for course grade weights.
//!
//! A course has three graded components (assignment, quiz, project), a fixed
//! achieved grade for each, and an allowed weight range for each. This crate
//! searches for the weights that maximize the overall grade
//! `Σ grade × weight`, subject to the ranges and to the weights summing to
//! 100%.
//!
//! # Algorithm
//!
//! 1. **Initialization** - [`ConstrainedRandom`](constrained_random::ConstrainedRandom)
//!    draws each candidate's weights within the limits, summing to 100%
//! 2. **Scan** - track the best candidate of the generation and of all time
//! 3. **Mating pool** - each candidate enters the pool `floor(fitness / 10)` times
//! 4. **Crossover** - each child averages two parents drawn from the pool
//! 5. **Mutation** - with a fixed probability, scale one weight by ±10% and
//!    compensate with another; abandoned if any limit would be violated
//! 6. **Repeat** - until the run's [`CancellationToken`](cancellation::CancellationToken)
//!    is cancelled
//!
//! Every operator keeps both constraints (ranges and sum) without any repair
//! step: averaging preserves them by linearity and mutation only commits
//! changes that respect them.
//!
//! # Modules
//!
//! - [`component`] - the graded components and per-component maps
//! - [`course`] - grades, limits, and run configuration
//! - [`constrained_random`] - bounded fixed-sum random tuples
//! - [`candidate`] - a weight vector with its fitness; mating and mutation
//! - [`mating_pool`] - fitness-proportional parent selection
//! - [`population`] - generation turnover and best-ever tracking
//! - [`driver`] - the unbounded `{crossover, mutate}` loop
//! - [`cancellation`] - stop flag for the loop
//!
//! # Example
//!
//! ```
//! use weightopt_engine::{
//!     cancellation::CancellationToken, course::OptimizerConfig, driver::Optimizer,
//! };
//!
//! let mut rng = rand::rng();
//! let config = OptimizerConfig { population_size: 50, ..OptimizerConfig::default() };
//! let mut optimizer = Optimizer::new(&config, &mut rng).unwrap();
//!
//! let token = CancellationToken::new();
//! let best = optimizer
//!     .run(&mut rng, &token, |step| {
//!         if step.report.generation == 10 {
//!             token.cancel();
//!         }
//!     })
//!     .unwrap()
//!     .unwrap();
//! assert!(best.fitness() > 55.0);
//! ```

pub mod cancellation;
pub mod candidate;
pub mod component;
pub mod constrained_random;
pub mod course;
pub mod driver;
pub mod mating_pool;
pub mod population;

use self::{candidate::Candidate, component::Component, course::Grades};

/// Configuration that cannot produce a valid run.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigurationError {
    #[display("no ranges to draw from")]
    EmptyRanges,
    #[display("range #{index} [{min}, {max}] is not a valid interval")]
    InvalidRange { index: usize, min: f64, max: f64 },
    #[display("target {target} is outside the reachable sums [{min_sum}, {max_sum}]")]
    Infeasible {
        target: f64,
        min_sum: f64,
        max_sum: f64,
    },
    #[display("grade {grade} of {component} is not a finite number")]
    InvalidGrade { component: Component, grade: f64 },
    #[display("grades {grades:?} can add up to more than the largest representable fitness")]
    GradeOverflow { grades: Grades },
    #[display("population size must be at least 1")]
    EmptyPopulation,
    #[display("mutation rate {rate} is outside [0, 1]")]
    InvalidMutationRate { rate: f64 },
}

/// No candidate of a generation is fit enough to enter the mating pool.
///
/// Carries what the scan of the failed generation found, so it can still be
/// reported.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
#[display(
    "mating pool of generation {generation} is empty: every fitness is below {}",
    mating_pool::FITNESS_PER_ENTRY
)]
pub struct DegeneratePopulationError {
    pub generation: usize,
    pub best_ever: Candidate,
    pub best_of_generation: Candidate,
}
