//! Statistical helpers for the weight optimizer.
//!
//! - [`descriptive`]: summary statistics (mean, median, variance, spread) of a sample
//!
//! # Examples
//!
//! ```
//! use weightopt_stats::descriptive::DescriptiveStats;
//!
//! let fitness = [61.2, 63.5, 64.0, 65.8];
//! let stats = DescriptiveStats::new(fitness).unwrap();
//! assert_eq!(stats.max, 65.8);
//! assert_eq!(stats.count, 4);
//! ```

pub mod descriptive;
