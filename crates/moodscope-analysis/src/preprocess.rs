//! Raw record coercion and derived categories
//!
//! [`Preprocessor`] is the single boundary where untyped cells become typed
//! values. It never fails: a cell that cannot be read as a number becomes
//! NaN (and is counted in [`Preprocessed::coercion_failures`]), and a
//! missing category becomes [`UNKNOWN_LABEL`].
//!
//! # Bucketing
//!
//! [`BucketRules`] derives a label from a continuous value using ascending
//! thresholds. Each bucket includes its lower threshold and excludes its
//! upper one:
//!
//! ```
//! use moodscope_analysis::preprocess::BucketRules;
//!
//! let rules = BucketRules::screen_time([3.0, 6.0]);
//! assert_eq!(rules.label(2.5), "Low");
//! assert_eq!(rules.label(3.0), "Moderate");
//! assert_eq!(rules.label(7.0), "High");
//! assert_eq!(rules.label(f64::NAN), "Unknown");
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    config::AnalysisConfig,
    record::{Field, RawRecord, SurveyRecord, UNKNOWN_LABEL},
};

/// Ordered threshold rules mapping a number to a bucket label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketRules {
    thresholds: Vec<f64>,
    labels: Vec<String>,
}

impl BucketRules {
    /// Creates rules from ascending thresholds and one more label than thresholds.
    ///
    /// # Panics
    ///
    /// Panics if the label count is not `thresholds.len() + 1` or the
    /// thresholds are not strictly ascending.
    #[must_use]
    pub fn new(thresholds: Vec<f64>, labels: Vec<String>) -> Self {
        assert_eq!(
            labels.len(),
            thresholds.len() + 1,
            "bucket rules need one more label than thresholds"
        );
        assert!(
            thresholds.is_sorted_by(|a, b| a < b),
            "thresholds must be strictly ascending"
        );
        Self { thresholds, labels }
    }

    /// The Low / Moderate / High screen-time rule.
    #[must_use]
    pub fn screen_time(thresholds: [f64; 2]) -> Self {
        Self::new(
            thresholds.to_vec(),
            ["Low", "Moderate", "High"].map(String::from).to_vec(),
        )
    }

    /// Label of the bucket containing `value`, or [`UNKNOWN_LABEL`] if it is not finite.
    #[must_use]
    pub fn label(&self, value: f64) -> &str {
        if !value.is_finite() {
            return UNKNOWN_LABEL;
        }
        let index = self.thresholds.partition_point(|&t| t <= value);
        &self.labels[index]
    }

    /// Bucket labels in ascending order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// Reads a cell as a finite number; anything else becomes NaN.
///
/// ```
/// # use moodscope_analysis::preprocess::coerce_number;
/// assert_eq!(coerce_number(Some(" 7.5 ")), 7.5);
/// assert!(coerce_number(Some("seven")).is_nan());
/// assert!(coerce_number(Some("")).is_nan());
/// assert!(coerce_number(None).is_nan());
/// assert!(coerce_number(Some("inf")).is_nan());
/// ```
#[must_use]
pub fn coerce_number(cell: Option<&str>) -> f64 {
    cell.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(f64::NAN)
}

/// Trims a categorical cell; missing or blank cells become [`UNKNOWN_LABEL`].
#[must_use]
pub fn normalize_label(cell: Option<&str>) -> String {
    match cell.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_owned(),
        _ => UNKNOWN_LABEL.to_owned(),
    }
}

/// Maps a stress label to its ordinal score (1, 2, 3), NaN when unrecognised.
#[must_use]
pub fn stress_score(label: &str) -> f64 {
    match label.trim().to_ascii_lowercase().as_str() {
        "low" => 1.0,
        "moderate" => 2.0,
        "high" => 3.0,
        _ => f64::NAN,
    }
}

/// Output of [`Preprocessor::process`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preprocessed {
    pub records: Vec<SurveyRecord>,
    /// Number of cells per numeric column that could not be read as numbers.
    pub coercion_failures: BTreeMap<Field, usize>,
}

impl Preprocessed {
    /// Total number of failed numeric coercions.
    #[must_use]
    pub fn total_failures(&self) -> usize {
        self.coercion_failures.values().sum()
    }
}

/// Turns raw string records into typed [`SurveyRecord`]s.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    screen_time: BucketRules,
}

impl Preprocessor {
    #[must_use]
    pub fn new(screen_time: BucketRules) -> Self {
        Self { screen_time }
    }

    #[must_use]
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(BucketRules::screen_time(config.bucket_thresholds))
    }

    #[must_use]
    pub fn screen_time_rules(&self) -> &BucketRules {
        &self.screen_time
    }

    /// Converts one record.
    #[must_use]
    pub fn convert(&self, raw: &RawRecord) -> SurveyRecord {
        let stress_level = normalize_label(raw.get(Field::StressLevel));
        let screen_time_hours = coerce_number(raw.get(Field::ScreenTimeHours));
        SurveyRecord {
            country: normalize_label(raw.get(Field::Country)),
            diet_type: normalize_label(raw.get(Field::DietType)),
            exercise: normalize_label(raw.get(Field::Exercise)),
            exercise_level: normalize_label(raw.get(Field::ExerciseLevel)),
            mental_health_condition: normalize_label(raw.get(Field::MentalHealthCondition)),
            stress_score: stress_score(&stress_level),
            stress_level,
            happiness_score: coerce_number(raw.get(Field::HappinessScore)),
            sleep_hours: coerce_number(raw.get(Field::SleepHours)),
            social_interaction_score: coerce_number(raw.get(Field::SocialInteractionScore)),
            screen_time_category: self.screen_time.label(screen_time_hours).to_owned(),
            screen_time_hours,
        }
    }

    /// Converts every record and counts coercion failures per numeric column.
    #[must_use]
    pub fn process(&self, raw: &[RawRecord]) -> Preprocessed {
        let records = raw.iter().map(|r| self.convert(r)).collect::<Vec<_>>();

        let mut coercion_failures = BTreeMap::new();
        for field in Field::NUMERIC {
            let failures = records
                .iter()
                .filter(|r| r.number(field).is_some_and(|v| !v.is_finite()))
                .count();
            if failures > 0 {
                tracing::warn!(
                    field = %field,
                    failures,
                    total = records.len(),
                    "cells could not be read as numbers"
                );
                coercion_failures.insert(field, failures);
            }
        }
        tracing::debug!(records = records.len(), "preprocessed survey records");

        Preprocessed {
            records,
            coercion_failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawRecord {
        RawRecord::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn test_screen_time_buckets() {
        let rules = BucketRules::screen_time([3.0, 6.0]);
        assert_eq!(rules.label(2.5), "Low");
        assert_eq!(rules.label(4.0), "Moderate");
        assert_eq!(rules.label(7.0), "High");
        assert_eq!(rules.label(5.999), "Moderate");
        assert_eq!(rules.label(6.0), "High");
        assert_eq!(rules.label(-1.0), "Low");
        assert_eq!(rules.label(f64::INFINITY), UNKNOWN_LABEL);
    }

    #[test]
    fn test_general_bucket_rules() {
        let rules = BucketRules::new(
            vec![0.0],
            vec!["negative".to_owned(), "non-negative".to_owned()],
        );
        assert_eq!(rules.label(-0.5), "negative");
        assert_eq!(rules.label(0.0), "non-negative");
    }

    #[test]
    fn test_stress_score() {
        assert_eq!(stress_score("Low"), 1.0);
        assert_eq!(stress_score(" MODERATE "), 2.0);
        assert_eq!(stress_score("high"), 3.0);
        assert!(stress_score("Unknown").is_nan());
    }

    #[test]
    fn test_convert_full_record() {
        let preprocessor = Preprocessor::from_config(&AnalysisConfig::default());
        let record = preprocessor.convert(&raw(&[
            ("Country", " Canada "),
            ("Diet Type", "Vegan"),
            ("Exercise Level", "High"),
            ("Mental Health Condition", "Anxiety"),
            ("Stress Level", "Moderate"),
            ("Happiness Score", "7.2"),
            ("Sleep Hours", "6.5"),
            ("Social Interaction Score", "4"),
            ("Screen Time per Day (Hours)", "4.0"),
        ]));
        assert_eq!(record.country, "Canada");
        assert_eq!(record.exercise, UNKNOWN_LABEL);
        assert_eq!(record.stress_score, 2.0);
        assert_eq!(record.happiness_score, 7.2);
        assert_eq!(record.screen_time_category, "Moderate");
    }

    #[test]
    fn test_non_finite_spellings_are_coercion_failures() {
        let preprocessor = Preprocessor::from_config(&AnalysisConfig::default());
        let out = preprocessor.process(&[
            raw(&[("Sleep Hours", "inf"), ("Happiness Score", "NaN")]),
            raw(&[("Sleep Hours", "-infinity"), ("Happiness Score", "6")]),
        ]);
        assert!(out.records.iter().all(|r| r.sleep_hours.is_nan()));
        assert_eq!(out.coercion_failures[&Field::SleepHours], 2);
        assert_eq!(out.coercion_failures[&Field::HappinessScore], 1);
    }

    #[test]
    fn test_process_counts_coercion_failures() {
        let preprocessor = Preprocessor::from_config(&AnalysisConfig::default());
        let out = preprocessor.process(&[
            raw(&[("Sleep Hours", "n/a"), ("Happiness Score", "5")]),
            raw(&[("Sleep Hours", "7"), ("Happiness Score", "")]),
            raw(&[("Sleep Hours", "8"), ("Happiness Score", "6")]),
        ]);
        assert_eq!(out.records.len(), 3);
        assert!(out.records[0].sleep_hours.is_nan());
        assert_eq!(out.coercion_failures[&Field::SleepHours], 1);
        assert_eq!(out.coercion_failures[&Field::HappinessScore], 1);
        // neither social score nor screen time was present anywhere
        assert_eq!(out.coercion_failures[&Field::SocialInteractionScore], 3);
        assert_eq!(out.total_failures(), 8);
        assert!(
            out.records
                .iter()
                .all(|r| r.screen_time_category == UNKNOWN_LABEL)
        );
    }
}
