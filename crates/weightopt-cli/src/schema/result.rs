use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use weightopt_engine::{
    candidate::Candidate,
    course::{Course, Weights},
};

/// Best weights found by an `evolve` run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OptimizationResult {
    pub found_at: DateTime<Utc>,
    pub generations: usize,
    pub fitness: f64,
    pub weights: Weights,
    pub course: Course,
}

/// One draw of the `sample` command.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SampledWeights {
    pub weights: Weights,
    pub fitness: f64,
}

impl From<&Candidate> for SampledWeights {
    fn from(candidate: &Candidate) -> Self {
        Self {
            weights: *candidate.weights(),
            fitness: candidate.fitness(),
        }
    }
}
