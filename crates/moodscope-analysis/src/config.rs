//! Analysis configuration
//!
//! Every knob that shapes a summary (bucket thresholds, density bandwidth,
//! grid resolution, stacking order) lives in [`AnalysisConfig`]. The JSON
//! form uses camelCase keys and every key is optional:
//!
//! ```
//! use moodscope_analysis::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::from_json(r#"{ "kdeBandwidth": 0.6, "kdeGridSize": 20 }"#).unwrap();
//! assert_eq!(config.kde_bandwidth, 0.6);
//! assert_eq!(config.bucket_thresholds, [3.0, 6.0]);
//! assert_eq!(config.stack_key_order, ["Low", "Moderate", "High"]);
//! ```
//!
//! Validation runs before any record is touched. A malformed configuration
//! is the only failure that stops a whole aggregation pass.

use std::collections::HashSet;

use moodscope_stats::quantile::QuantileMethod;
use serde::{Deserialize, Serialize};

/// Largest accepted density grid tick count.
pub const MAX_KDE_GRID_SIZE: usize = 10_000;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("stack key order must not be empty")]
    EmptyStackKeyOrder,
    #[display("stack key '{key}' appears more than once")]
    DuplicateStackKey { key: String },
    #[display("bucket thresholds must be finite and ascending, got [{lower}, {upper}]")]
    InvalidThresholds { lower: f64, upper: f64 },
    #[display("density bandwidth must be positive and finite, got {bandwidth}")]
    InvalidBandwidth { bandwidth: f64 },
    #[display("density grid size must be between 1 and 10000, got {size}")]
    InvalidGridSize { size: usize },
    #[display("extent padding must be finite and non-negative, got {padding}")]
    InvalidPadding { padding: f64 },
    #[display("count headroom must be finite and at least 1, got {headroom}")]
    InvalidHeadroom { headroom: f64 },
    #[display("invalid configuration JSON: {message}")]
    InvalidJson { message: String },
}

/// Parameters of one aggregation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Screen-time thresholds (hours) splitting Low / Moderate / High.
    pub bucket_thresholds: [f64; 2],
    /// Epanechnikov kernel bandwidth.
    pub kde_bandwidth: f64,
    /// Approximate number of support-grid ticks.
    pub kde_grid_size: usize,
    /// Stress level order used for counts, stacks and violin groups.
    pub stack_key_order: Vec<String>,
    pub quantile_method: QuantileMethod,
    /// Exercise level order of the density chart.
    pub exercise_level_order: Vec<String>,
    /// Mental health condition order of the stacked chart.
    pub condition_order: Vec<String>,
    /// Margin added to both ends of boxplot value axes.
    pub extent_padding: f64,
    /// Multiplier applied to the largest grouped count.
    pub count_headroom: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            bucket_thresholds: [3.0, 6.0],
            kde_bandwidth: 0.4,
            kde_grid_size: 40,
            stack_key_order: to_strings(&["Low", "Moderate", "High"]),
            quantile_method: QuantileMethod::LinearInterpolation,
            exercise_level_order: to_strings(&["Low", "Moderate", "High"]),
            condition_order: to_strings(&["None", "Depression", "Anxiety", "PTSD", "Bipolar"]),
            extent_padding: 1.0,
            count_headroom: 1.1,
        }
    }
}

impl AnalysisConfig {
    /// Parses a JSON configuration and validates it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::InvalidJson {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for values no pass could run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stack_key_order.is_empty() {
            return Err(ConfigError::EmptyStackKeyOrder);
        }
        let mut seen = HashSet::new();
        if let Some(key) = self
            .stack_key_order
            .iter()
            .find(|key| !seen.insert(key.as_str()))
        {
            return Err(ConfigError::DuplicateStackKey { key: key.clone() });
        }

        let [lower, upper] = self.bucket_thresholds;
        if !(lower.is_finite() && upper.is_finite() && lower < upper) {
            return Err(ConfigError::InvalidThresholds { lower, upper });
        }
        if !(self.kde_bandwidth.is_finite() && self.kde_bandwidth > 0.0) {
            return Err(ConfigError::InvalidBandwidth {
                bandwidth: self.kde_bandwidth,
            });
        }
        if !(1..=MAX_KDE_GRID_SIZE).contains(&self.kde_grid_size) {
            return Err(ConfigError::InvalidGridSize {
                size: self.kde_grid_size,
            });
        }
        if !(self.extent_padding.is_finite() && self.extent_padding >= 0.0) {
            return Err(ConfigError::InvalidPadding {
                padding: self.extent_padding,
            });
        }
        if !(self.count_headroom.is_finite() && self.count_headroom >= 1.0) {
            return Err(ConfigError::InvalidHeadroom {
                headroom: self.count_headroom,
            });
        }
        Ok(())
    }
}

fn to_strings(labels: &[&str]) -> Vec<String> {
    labels.iter().map(ToString::to_string).collect()
}
