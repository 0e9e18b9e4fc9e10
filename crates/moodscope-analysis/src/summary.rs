//! Chart-ready summaries of a survey
//!
//! [`SurveySummary::compute`] runs the whole engine once: it validates the
//! configuration, preprocesses the raw records, and builds the summary every
//! chart of the dashboard is drawn from.
//!
//! Statistics are computed per group. A group that is empty or degenerate
//! carries its own [`StatsError`] and the remaining groups are unaffected;
//! only a malformed [`AnalysisConfig`] fails the pass, and it does so before
//! any record is looked at.
//!
//! The pass is deterministic. Group orders come from the configuration or
//! from the record order, never from hash iteration, so the same input and
//! configuration always serialize to the same JSON.
//!
//! # Examples
//!
//! ```
//! use moodscope_analysis::{config::AnalysisConfig, record::RawRecord, summary::SurveySummary};
//!
//! let raw = [
//!     RawRecord::from_pairs([("Country", "Japan"), ("Stress Level", "Low"), ("Sleep Hours", "6"), ("Happiness Score", "5")]),
//!     RawRecord::from_pairs([("Country", "Japan"), ("Stress Level", "High"), ("Sleep Hours", "8"), ("Happiness Score", "7")]),
//! ];
//! let summary = SurveySummary::compute(&raw, &AnalysisConfig::default()).unwrap();
//!
//! let line = summary.sleep_vs_happiness.regression.unwrap();
//! assert!((line.slope - 1.0).abs() < 1e-9);
//! assert_eq!(summary.stress_by_country.table.results[0].count("Low"), 1);
//! ```

use std::collections::BTreeMap;

use moodscope_stats::{
    boxplot::BoxplotStats,
    error::StatsError,
    extent::Extent,
    kde::{DensitySet, Epanechnikov, KernelDensityEstimator},
    quantile::QuantileMethod,
    regression::RegressionLine,
};
use serde::Serialize;

use crate::{
    config::{AnalysisConfig, ConfigError},
    group::{self, CrossTab, GroupMean, KeyDomain},
    preprocess::Preprocessor,
    record::{Field, RawRecord, SurveyRecord},
    stack::{self, StackedSeries},
};

/// Tick count used when rounding axis extents.
const AXIS_TICKS: usize = 10;

/// Upper bound of a count axis when every count is zero.
const EMPTY_COUNT_AXIS: f64 = 10.0;

/// Sleep hours against happiness, with a trend line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterSummary {
    /// Records where both coordinates are finite.
    pub point_count: usize,
    pub x_extent: Option<Extent>,
    pub y_extent: Option<Extent>,
    pub regression: Result<RegressionLine, StatsError>,
}

/// Stress level counts per country and mental health condition, stacked.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackedCountSummary {
    pub table: CrossTab,
    /// One stack per country × condition cell, in table order.
    pub stacks: Vec<StackedSeries>,
    pub stack_max: usize,
    pub value_extent: Extent,
}

/// Stress level counts per country, drawn as grouped bars.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedCountSummary {
    pub table: CrossTab,
    pub value_extent: Extent,
}

/// Box-and-whisker statistics of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupBoxplot {
    pub key: String,
    pub stats: Result<BoxplotStats, StatsError>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxplotSummary {
    pub groups: Vec<GroupBoxplot>,
    /// Extent of every value across groups, padded.
    pub value_extent: Option<Extent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeanSummary {
    pub groups: Vec<GroupMean>,
    pub value_extent: Extent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DensitySummary {
    pub density: DensitySet<String>,
    pub value_extent: Extent,
}

/// Every chart summary of one survey.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveySummary {
    pub record_count: usize,
    /// Numeric cells that could not be read, per column.
    pub coercion_failures: BTreeMap<Field, usize>,
    pub sleep_vs_happiness: ScatterSummary,
    pub stress_by_country_condition: StackedCountSummary,
    pub stress_by_country: GroupedCountSummary,
    pub happiness_by_screen_time: BoxplotSummary,
    pub stress_by_diet: MeanSummary,
    pub happiness_by_exercise_level: DensitySummary,
    pub social_by_condition: BoxplotSummary,
}

impl SurveySummary {
    /// Validates `config`, then summarizes `raw` for every chart.
    pub fn compute(raw: &[RawRecord], config: &AnalysisConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        tracing::info!(records = raw.len(), "computing survey summary");

        let preprocessor = Preprocessor::from_config(config);
        let preprocessed = preprocessor.process(raw);
        let records = &preprocessed.records;
        let screen_time_labels = preprocessor.screen_time_rules().labels().to_vec();

        let summary = Self {
            record_count: records.len(),
            sleep_vs_happiness: scatter(records),
            stress_by_country_condition: stress_by_country_condition(records, config),
            stress_by_country: stress_by_country(records, config),
            happiness_by_screen_time: boxplots(
                records,
                |r| r.screen_time_category.as_str(),
                &KeyDomain::Fixed(screen_time_labels),
                |r| r.happiness_score,
                config,
            ),
            stress_by_diet: stress_by_diet(records),
            happiness_by_exercise_level: happiness_by_exercise_level(records, config),
            social_by_condition: boxplots(
                records,
                |r| r.mental_health_condition.as_str(),
                &KeyDomain::Observed,
                |r| r.social_interaction_score,
                config,
            ),
            coercion_failures: preprocessed.coercion_failures,
        };
        tracing::info!(records = summary.record_count, "survey summary computed");
        Ok(summary)
    }
}

fn scatter(records: &[SurveyRecord]) -> ScatterSummary {
    let xs = records.iter().map(|r| r.sleep_hours).collect::<Vec<_>>();
    let ys = records.iter().map(|r| r.happiness_score).collect::<Vec<_>>();
    let regression = RegressionLine::fit(&xs, &ys);
    if let Err(error) = &regression {
        tracing::debug!(%error, "sleep/happiness regression unavailable");
    }
    ScatterSummary {
        point_count: xs
            .iter()
            .zip(&ys)
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .count(),
        x_extent: Extent::from_values(xs).map(|e| e.nice(AXIS_TICKS)),
        y_extent: Extent::from_values(ys).map(|e| e.nice(AXIS_TICKS)),
        regression,
    }
}

#[expect(clippy::cast_precision_loss)]
fn stress_by_country_condition(
    records: &[SurveyRecord],
    config: &AnalysisConfig,
) -> StackedCountSummary {
    let table = group::cross_count_by(
        records,
        |r| r.country.as_str(),
        KeyDomain::ObservedSorted,
        |r| r.mental_health_condition.as_str(),
        KeyDomain::Fixed(config.condition_order.clone()),
        |r| r.stress_level.as_str(),
        config.stack_key_order.clone(),
    );
    let stacks = stack::stack_all(&table, &config.stack_key_order);
    let stack_max = stack::stack_max(&stacks);
    let top = if stack_max > 0 {
        stack_max as f64
    } else {
        EMPTY_COUNT_AXIS
    };
    StackedCountSummary {
        table,
        stacks,
        stack_max,
        value_extent: Extent::new(0.0, top).nice(AXIS_TICKS),
    }
}

#[expect(clippy::cast_precision_loss)]
fn stress_by_country(records: &[SurveyRecord], config: &AnalysisConfig) -> GroupedCountSummary {
    let table = group::count_by(
        records,
        |r| r.country.as_str(),
        KeyDomain::Observed,
        |r| r.stress_level.as_str(),
        config.stack_key_order.clone(),
    );
    let value_extent =
        Extent::new(0.0, table.max_count() as f64).scale_max(config.count_headroom);
    GroupedCountSummary {
        table,
        value_extent,
    }
}

fn boxplots<K, V>(
    records: &[SurveyRecord],
    key: K,
    domain: &KeyDomain,
    value: V,
    config: &AnalysisConfig,
) -> BoxplotSummary
where
    K: Fn(&SurveyRecord) -> &str,
    V: Fn(&SurveyRecord) -> f64,
{
    let values = group::values_by(records, key, domain, value);
    let value_extent = Extent::from_values(values.values().flatten().copied())
        .map(|e| e.pad(config.extent_padding));
    let groups = values
        .into_iter()
        .map(|(key, values)| GroupBoxplot {
            stats: group_boxplot(&key, values, config.quantile_method),
            key,
        })
        .collect();
    BoxplotSummary {
        groups,
        value_extent,
    }
}

fn group_boxplot(
    key: &str,
    values: Vec<f64>,
    method: QuantileMethod,
) -> Result<BoxplotStats, StatsError> {
    let stats = BoxplotStats::with_method(values, method);
    if let Err(error) = &stats {
        tracing::debug!(group = key, %error, "boxplot unavailable");
    }
    stats
}

fn stress_by_diet(records: &[SurveyRecord]) -> MeanSummary {
    let groups = group::mean_by(
        records,
        |r| r.diet_type.as_str(),
        &KeyDomain::Observed,
        |r| r.stress_score,
    );
    for mean in &groups {
        if let Err(error) = &mean.mean {
            tracing::debug!(group = %mean.key, %error, "mean unavailable");
        }
    }
    let top = groups
        .iter()
        .filter_map(|g| g.mean.as_ref().ok().copied())
        .fold(0.0, f64::max);
    MeanSummary {
        groups,
        value_extent: Extent::new(0.0, top).nice(AXIS_TICKS),
    }
}

fn happiness_by_exercise_level(
    records: &[SurveyRecord],
    config: &AnalysisConfig,
) -> DensitySummary {
    let top = Extent::from_values(records.iter().map(|r| r.happiness_score))
        .map_or(0.0, |e| e.max.max(0.0));
    let value_extent = Extent::new(0.0, top).nice(AXIS_TICKS);
    let grid = value_extent.ticks(config.kde_grid_size);

    let estimator = KernelDensityEstimator::new(Epanechnikov::new(config.kde_bandwidth), grid);
    let groups = group::values_by(
        records,
        |r| r.exercise_level.as_str(),
        &KeyDomain::Fixed(config.exercise_level_order.clone()),
        |r| r.happiness_score,
    );
    DensitySummary {
        density: estimator.estimate_groups(groups),
        value_extent,
    }
}
