//! Immutable problem configuration.
//!
//! A [`Course`] bundles the achieved grade for each component with the range
//! each component's weight may take. It is built once before a run and
//! shared read-only by every candidate and population operation.

use serde::{Deserialize, Serialize};

use crate::{
    ConfigurationError,
    component::{Component, ComponentMap},
};

/// Achieved score per component.
pub type Grades = ComponentMap<f64>;

/// Weight per component, as fractions of 1.0.
pub type Weights = ComponentMap<f64>;

/// Allowed weight range per component, in percentage units.
pub type Limits = ComponentMap<Bounds>;

/// Total all weights add up to, in percentage units.
pub const TARGET_PERCENT: f64 = 100.0;

pub const DEFAULT_GRADES: Grades = Grades::new(73.0, 64.0, 55.0);
pub const DEFAULT_LIMITS: Limits = Limits::new(
    Bounds::new(40.0, 60.0),
    Bounds::new(10.0, 30.0),
    Bounds::new(20.0, 40.0),
);
pub const DEFAULT_POPULATION_SIZE: usize = 500;
pub const DEFAULT_MUTATION_RATE: f64 = 0.05;

/// An inclusive `[min, max]` interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Converts a percentage range into a fractional one (`40..=60` into `0.4..=0.6`).
    #[must_use]
    pub fn percent_to_fraction(self) -> Self {
        Self::new(self.min / 100.0, self.max / 100.0)
    }

    fn is_valid(self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Grades and weight limits of the course being optimized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub grades: Grades,
    /// Weight ranges in percentage units.
    pub limits: Limits,
}

impl Default for Course {
    fn default() -> Self {
        Self {
            grades: DEFAULT_GRADES,
            limits: DEFAULT_LIMITS,
        }
    }
}

impl Course {
    /// Weight ranges as fractions of 1.0.
    #[must_use]
    pub fn fraction_limits(&self) -> ComponentMap<Bounds> {
        self.limits.map(|b| b.percent_to_fraction())
    }

    /// Checks that every grade is finite, that no weighting of the grades
    /// overflows, that every limit is a well-formed non-negative percentage
    /// range, and that the ranges can jointly add up to 100%.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (component, &grade) in self.grades.iter() {
            if !grade.is_finite() {
                return Err(ConfigurationError::InvalidGrade { component, grade });
            }
        }
        if !self.grades.values().map(|g| g.abs()).sum::<f64>().is_finite() {
            return Err(ConfigurationError::GradeOverflow {
                grades: self.grades,
            });
        }
        for (component, bounds) in self.limits.iter() {
            if !bounds.is_valid() || bounds.min < 0.0 || bounds.max > TARGET_PERCENT {
                return Err(ConfigurationError::InvalidRange {
                    index: component.index(),
                    min: bounds.min,
                    max: bounds.max,
                });
            }
        }
        let min_sum = self.limits.values().map(|b| b.min).sum::<f64>();
        let max_sum = self.limits.values().map(|b| b.max).sum::<f64>();
        if TARGET_PERCENT < min_sum || TARGET_PERCENT > max_sum {
            return Err(ConfigurationError::Infeasible {
                target: TARGET_PERCENT,
                min_sum,
                max_sum,
            });
        }
        Ok(())
    }

    /// Weight ranges in canonical component order, as used for the initial draw.
    pub(crate) fn ordered_limits(&self) -> impl Iterator<Item = Bounds> + '_ {
        Component::ALL.into_iter().map(|c| self.limits[c])
    }
}

/// Everything needed to start an optimization run.
///
/// Missing fields in a deserialized config fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub course: Course,
    pub population_size: usize,
    /// Probability that a single candidate attempts a mutation per generation.
    pub mutation_rate: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            course: Course::default(),
            population_size: DEFAULT_POPULATION_SIZE,
            mutation_rate: DEFAULT_MUTATION_RATE,
        }
    }
}

impl OptimizerConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.course.validate()?;
        validate_population(self.population_size, self.mutation_rate)
    }
}

pub(crate) fn validate_population(size: usize, mutation_rate: f64) -> Result<(), ConfigurationError> {
    if size == 0 {
        return Err(ConfigurationError::EmptyPopulation);
    }
    if !(0.0..=1.0).contains(&mutation_rate) {
        return Err(ConfigurationError::InvalidMutationRate {
            rate: mutation_rate,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_course_is_valid() {
        assert_eq!(Course::default().validate(), Ok(()));
        assert_eq!(OptimizerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_non_finite_grades_are_rejected() {
        let course = Course {
            grades: Grades::new(f64::NAN, 64.0, 55.0),
            ..Course::default()
        };
        assert!(matches!(
            course.validate(),
            Err(ConfigurationError::InvalidGrade {
                component: Component::Assignment,
                ..
            })
        ));

        let course = Course {
            grades: Grades::new(73.0, 64.0, f64::INFINITY),
            ..Course::default()
        };
        assert!(matches!(
            course.validate(),
            Err(ConfigurationError::InvalidGrade {
                component: Component::Project,
                ..
            })
        ));
    }

    #[test]
    fn test_grades_overflowing_fitness_are_rejected() {
        let course = Course {
            grades: Grades::new(f64::MAX, f64::MAX, 1.0),
            ..Course::default()
        };
        assert!(matches!(
            course.validate(),
            Err(ConfigurationError::GradeOverflow { .. })
        ));

        let large = Course {
            grades: Grades::new(1e19, 1e19, 1e19),
            ..Course::default()
        };
        assert_eq!(large.validate(), Ok(()));
    }

    #[test]
    fn test_fraction_limits() {
        let limits = Course::default().fraction_limits();
        assert_eq!(limits.assignment, Bounds::new(0.4, 0.6));
        assert_eq!(limits.quiz, Bounds::new(0.1, 0.3));
        assert_eq!(limits.project, Bounds::new(0.2, 0.4));
    }

    #[test]
    fn test_minimums_above_target_are_infeasible() {
        let course = Course {
            limits: Limits::new(
                Bounds::new(50.0, 60.0),
                Bounds::new(30.0, 40.0),
                Bounds::new(30.0, 40.0),
            ),
            ..Course::default()
        };
        assert!(matches!(
            course.validate(),
            Err(ConfigurationError::Infeasible { min_sum, .. }) if min_sum == 110.0
        ));
    }

    #[test]
    fn test_maximums_below_target_are_infeasible() {
        let course = Course {
            limits: Limits::new(
                Bounds::new(10.0, 20.0),
                Bounds::new(10.0, 20.0),
                Bounds::new(10.0, 20.0),
            ),
            ..Course::default()
        };
        assert!(matches!(
            course.validate(),
            Err(ConfigurationError::Infeasible { max_sum, .. }) if max_sum == 60.0
        ));
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let course = Course {
            limits: Limits::new(
                Bounds::new(40.0, 60.0),
                Bounds::new(30.0, 10.0),
                Bounds::new(20.0, 40.0),
            ),
            ..Course::default()
        };
        assert_eq!(
            course.validate(),
            Err(ConfigurationError::InvalidRange {
                index: 1,
                min: 30.0,
                max: 10.0,
            })
        );
    }

    #[test]
    fn test_population_parameters() {
        assert_eq!(
            validate_population(0, 0.05),
            Err(ConfigurationError::EmptyPopulation)
        );
        assert_eq!(
            validate_population(10, 1.5),
            Err(ConfigurationError::InvalidMutationRate { rate: 1.5 })
        );
        assert_eq!(validate_population(1, 0.0), Ok(()));
        assert_eq!(validate_population(1, 1.0), Ok(()));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: OptimizerConfig =
            serde_json::from_str(r#"{"population_size": 40}"#).unwrap();
        assert_eq!(config.population_size, 40);
        assert_eq!(config.mutation_rate, DEFAULT_MUTATION_RATE);
        assert_eq!(config.course, Course::default());
    }
}
