//! The generation loop.
//!
//! [`Optimizer`] repeats `{crossover, mutate}` on its population. The loop has
//! no convergence criterion; it ends only when its [`CancellationToken`] is
//! cancelled or a generation turns out to be degenerate.

use rand::Rng;

use crate::{
    ConfigurationError, DegeneratePopulationError,
    cancellation::CancellationToken,
    candidate::Candidate,
    course::OptimizerConfig,
    population::{GenerationReport, MutationSummary, Population},
};

/// Outcome of one `{crossover, mutate}` iteration.
#[derive(Debug, Clone)]
pub struct GenerationStep {
    pub report: GenerationReport,
    pub mutations: MutationSummary,
}

#[derive(Debug, Clone)]
pub struct Optimizer {
    population: Population,
}

impl Optimizer {
    /// Validates `config` and creates the first generation.
    pub fn new<R>(config: &OptimizerConfig, rng: &mut R) -> Result<Self, ConfigurationError>
    where
        R: Rng + ?Sized,
    {
        config.validate()?;
        let population = Population::create_first_generation(
            config.course.clone(),
            config.population_size,
            config.mutation_rate,
            rng,
        )?;
        Ok(Self { population })
    }

    #[must_use]
    pub fn from_population(population: Population) -> Self {
        Self { population }
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn step<R>(&mut self, rng: &mut R) -> Result<GenerationStep, DegeneratePopulationError>
    where
        R: Rng + ?Sized,
    {
        let report = self.population.crossover(rng)?;
        let mutations = self.population.mutate(rng);
        Ok(GenerationStep { report, mutations })
    }

    /// Runs generations until `token` is cancelled.
    ///
    /// `on_generation` is called after every step. The token is checked
    /// before each step, so cancelling from inside `on_generation` stops the
    /// run right after the current generation.
    ///
    /// Returns the best candidate ever seen, or `None` if cancelled before
    /// the first generation.
    pub fn run<R, F>(
        &mut self,
        rng: &mut R,
        token: &CancellationToken,
        mut on_generation: F,
    ) -> Result<Option<Candidate>, DegeneratePopulationError>
    where
        R: Rng + ?Sized,
        F: FnMut(&GenerationStep),
    {
        loop {
            if token.is_cancelled() {
                return Ok(self.population.best_ever().cloned());
            }
            let step = self.step(rng)?;
            on_generation(&step);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;
    use crate::course::{Course, Grades};

    #[test]
    fn test_cancelled_before_start() {
        let mut rng = Pcg64::seed_from_u64(40);
        let mut optimizer = Optimizer::new(&OptimizerConfig::default(), &mut rng).unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let mut calls = 0;
        let best = optimizer.run(&mut rng, &token, |_| calls += 1).unwrap();
        assert!(best.is_none());
        assert_eq!(calls, 0);
        assert_eq!(optimizer.population().generation(), 1);
    }

    #[test]
    fn test_cancel_from_callback_stops_between_generations() {
        let mut rng = Pcg64::seed_from_u64(41);
        let config = OptimizerConfig {
            population_size: 60,
            ..OptimizerConfig::default()
        };
        let mut optimizer = Optimizer::new(&config, &mut rng).unwrap();
        let token = CancellationToken::new();
        let mut generations = vec![];
        let mut best_fitness = vec![];
        let best = optimizer
            .run(&mut rng, &token, |step| {
                generations.push(step.report.generation);
                best_fitness.push(step.report.best_ever.fitness());
                if step.report.generation == 25 {
                    token.cancel();
                }
            })
            .unwrap()
            .unwrap();

        assert_eq!(generations, (1..=25).collect::<Vec<_>>());
        assert!(best_fitness.is_sorted());
        assert_eq!(best.fitness(), *best_fitness.last().unwrap());
        assert_eq!(optimizer.population().generation(), 26);
    }

    #[test]
    fn test_converges_towards_best_grade() {
        // Fitness is 55 + 18a + 9q once p = 1 - a - q, so the feasible
        // optimum is a = 0.6 and q = 0.2, with project at its 20% minimum.
        let mut rng = Pcg64::seed_from_u64(42);
        let config = OptimizerConfig {
            population_size: 200,
            mutation_rate: 0.2,
            ..OptimizerConfig::default()
        };
        let mut optimizer = Optimizer::new(&config, &mut rng).unwrap();
        for _ in 0..200 {
            optimizer.step(&mut rng).unwrap();
        }
        let best = optimizer.population().best_ever().unwrap();
        let optimum = 73.0 * 0.6 + 64.0 * 0.2 + 55.0 * 0.2;
        assert!(best.fitness() <= optimum + 1e-9);
        assert!(best.fitness() > optimum - 1.0, "best = {best}");
    }

    #[test]
    fn test_degenerate_population_stops_run() {
        let mut rng = Pcg64::seed_from_u64(43);
        let config = OptimizerConfig {
            course: Course {
                grades: Grades::new(5.0, 5.0, 5.0),
                ..Course::default()
            },
            population_size: 10,
            ..OptimizerConfig::default()
        };
        let mut optimizer = Optimizer::new(&config, &mut rng).unwrap();
        let token = CancellationToken::new();
        let err = optimizer.run(&mut rng, &token, |_| {}).unwrap_err();
        assert_eq!(err.generation, 1);
    }
}
