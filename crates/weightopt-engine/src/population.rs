use rand::Rng;
use weightopt_stats::descriptive::DescriptiveStats;

use crate::{
    ConfigurationError, DegeneratePopulationError,
    candidate::{Candidate, MutationOutcome},
    component::ComponentMap,
    constrained_random::ConstrainedRandom,
    course::{Course, TARGET_PERCENT, Weights, validate_population},
    mating_pool::MatingPool,
};

/// A fixed-size generation of candidates, plus the best candidate ever seen.
#[derive(Debug, Clone)]
pub struct Population {
    course: Course,
    members: Vec<Candidate>,
    best_ever: Option<Candidate>,
    generation: usize,
    mutation_rate: f64,
}

/// What a crossover step observed about the generation it replaced.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Number of the generation that was scanned (the first is 1).
    pub generation: usize,
    pub best_ever: Candidate,
    pub best_of_generation: Candidate,
    pub fitness_stats: DescriptiveStats,
    pub weight_stats: ComponentMap<DescriptiveStats>,
}

/// Tally of one mutation pass over the population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationSummary {
    pub applied: usize,
    pub abandoned: usize,
    pub skipped: usize,
}

impl MutationSummary {
    fn record(&mut self, outcome: MutationOutcome) {
        match outcome {
            MutationOutcome::Applied => self.applied += 1,
            MutationOutcome::Abandoned => self.abandoned += 1,
            MutationOutcome::Skipped => self.skipped += 1,
        }
    }
}

impl Population {
    /// Creates the first generation from constrained random draws.
    ///
    /// Each member's weights are drawn in percentage units within the course
    /// limits, summing to 100, then converted to fractions.
    pub fn create_first_generation<R>(
        course: Course,
        size: usize,
        mutation_rate: f64,
        rng: &mut R,
    ) -> Result<Self, ConfigurationError>
    where
        R: Rng + ?Sized,
    {
        course.validate()?;
        validate_population(size, mutation_rate)?;
        let generator = ConstrainedRandom::new(course.ordered_limits(), TARGET_PERCENT)?;
        let members = (0..size)
            .map(|_| {
                let percents = rng.sample(&generator);
                let weights = Weights::from_fn(|c| percents[c.index()] / TARGET_PERCENT);
                Candidate::new(weights, &course.grades)
            })
            .collect();
        Ok(Self {
            course,
            members,
            best_ever: None,
            generation: 1,
            mutation_rate,
        })
    }

    /// Creates a population from existing candidates.
    ///
    /// The candidates are trusted to satisfy the course limits.
    pub fn from_members(
        course: Course,
        members: Vec<Candidate>,
        mutation_rate: f64,
    ) -> Result<Self, ConfigurationError> {
        course.validate()?;
        validate_population(members.len(), mutation_rate)?;
        Ok(Self {
            course,
            members,
            best_ever: None,
            generation: 1,
            mutation_rate,
        })
    }

    #[must_use]
    pub fn course(&self) -> &Course {
        &self.course
    }

    #[must_use]
    pub fn members(&self) -> &[Candidate] {
        &self.members
    }

    /// Best candidate seen by any crossover so far.
    ///
    /// `None` until the first crossover.
    #[must_use]
    pub fn best_ever(&self) -> Option<&Candidate> {
        self.best_ever.as_ref()
    }

    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[must_use]
    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    /// Replaces the current members with the next generation.
    ///
    /// 1. Scan members for the best of this generation and update the best
    ///    ever (a candidate must be strictly fitter to replace it, so ties
    ///    keep the first one seen).
    /// 2. Build the mating pool.
    /// 3. Draw two parents per slot and mate them.
    ///
    /// Fails without replacing members if no candidate earns a pool entry.
    /// The best-ever update from the scan is kept in that case, and the error
    /// carries the scanned best candidates.
    pub fn crossover<R>(&mut self, rng: &mut R) -> Result<GenerationReport, DegeneratePopulationError>
    where
        R: Rng + ?Sized,
    {
        let first = &self.members[0];
        let best_ever = self.best_ever.get_or_insert_with(|| first.clone());
        let mut best_of_generation = first;
        for member in &self.members {
            if member.fitness() > best_of_generation.fitness() {
                best_of_generation = member;
            }
            if member.fitness() > best_ever.fitness() {
                *best_ever = member.clone();
            }
        }
        let best_ever = best_ever.clone();
        let best_of_generation = best_of_generation.clone();

        let Some(pool) = MatingPool::build(&self.members) else {
            return Err(DegeneratePopulationError {
                generation: self.generation,
                best_ever,
                best_of_generation,
            });
        };

        let report = GenerationReport {
            generation: self.generation,
            best_ever,
            best_of_generation,
            fitness_stats: self.fitness_stats(),
            weight_stats: self.weight_stats(),
        };

        let grades = &self.course.grades;
        let children = (0..self.members.len())
            .map(|_| {
                let p1 = pool.draw(rng);
                let p2 = pool.draw(rng);
                p1.mate(p2, grades)
            })
            .collect();
        self.members = children;
        self.generation += 1;

        Ok(report)
    }

    /// Gives every member one chance to mutate, in place.
    pub fn mutate<R>(&mut self, rng: &mut R) -> MutationSummary
    where
        R: Rng + ?Sized,
    {
        let mut summary = MutationSummary::default();
        for member in &mut self.members {
            summary.record(member.mutate(&self.course, self.mutation_rate, rng));
        }
        summary
    }

    /// Statistics of each weight component across the members.
    #[must_use]
    pub fn weight_stats(&self) -> ComponentMap<DescriptiveStats> {
        ComponentMap::from_fn(|c| {
            DescriptiveStats::new(self.members.iter().map(|m| m.weights()[c]))
                .expect("population is never empty")
        })
    }

    /// Statistics of the members' fitness.
    #[must_use]
    pub fn fitness_stats(&self) -> DescriptiveStats {
        DescriptiveStats::new(self.members.iter().map(Candidate::fitness))
            .expect("population is never empty")
    }
}
