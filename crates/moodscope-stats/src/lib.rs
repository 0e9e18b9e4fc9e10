//! Statistical primitives for the Moodscope survey charts.
//!
//! This crate provides the numeric building blocks every chart summary is
//! made of:
//!
//! - **Descriptive statistics**: mean, population variance and standard deviation
//! - **Quantiles**: linear-interpolation quantiles over sorted samples
//! - **Boxplot statistics**: five-number summary plus mean and standard deviation
//! - **Linear regression**: single-predictor ordinary least squares
//! - **Kernel density estimation**: per-group density curves on a shared grid
//! - **Extents**: axis domains, padding, "nice" bounds and tick generation
//!
//! Every statistic skips non-finite values before computing anything, and
//! reports [`error::StatsError`] instead of producing NaN when nothing is left.
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`quantile`]: Quantile computation and storage
//! - [`boxplot`]: Box-and-whisker summaries
//! - [`regression`]: Least-squares line fitting
//! - [`kde`]: Kernel density estimation
//! - [`extent`]: Value extents and ticks
//! - [`error`]: Error conditions
//!
//! # Examples
//!
//! ## Summarizing a group for a boxplot
//!
//! ```
//! use moodscope_stats::boxplot::BoxplotStats;
//!
//! let scores = [4.0, 5.0, 6.0, 7.0, 9.0];
//! let stats = BoxplotStats::new(scores).unwrap();
//! assert_eq!((stats.q1, stats.median, stats.q3), (5.0, 6.0, 7.0));
//! ```
//!
//! ## Fitting a trend line
//!
//! ```
//! use moodscope_stats::{error::StatsError, regression::RegressionLine};
//!
//! let line = RegressionLine::fit(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
//! assert!((line.slope - 2.0).abs() < 1e-9);
//!
//! let degenerate = RegressionLine::fit(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0]);
//! assert_eq!(degenerate, Err(StatsError::DegenerateInput));
//! ```
//!
//! ## Sizing an axis
//!
//! ```
//! use moodscope_stats::extent::Extent;
//!
//! let extent = Extent::from_values([3.2, 8.9, 6.1]).unwrap().pad(1.0);
//! assert!((extent.min - 2.2).abs() < 1e-12);
//! ```

pub mod boxplot;
pub mod descriptive;
pub mod error;
pub mod extent;
pub mod kde;
pub mod quantile;
pub mod regression;
