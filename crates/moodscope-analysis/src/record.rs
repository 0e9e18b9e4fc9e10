//! Survey record schema
//!
//! Records arrive from an external loader as [`RawRecord`]s: plain maps from
//! column header to string value. The preprocessor turns each one into a
//! [`SurveyRecord`], the typed schema every aggregation works on.
//!
//! # Columns
//!
//! The recognised columns are enumerated by [`Field`]. Their [`Display`]
//! output is the exact header text of the dataset, for example
//! `"Screen Time per Day (Hours)"`. Columns not listed there are ignored.
//!
//! [`Display`]: std::fmt::Display
//!
//! # Examples
//!
//! ```
//! use moodscope_analysis::record::{Field, RawRecord};
//!
//! let raw = RawRecord::from_pairs([
//!     ("Country", "Japan"),
//!     ("Stress Level", "Low"),
//!     ("Sleep Hours", "7.5"),
//! ]);
//!
//! assert_eq!(raw.get(Field::Country), Some("Japan"));
//! assert_eq!(raw.get(Field::DietType), None);
//! assert_eq!(Field::ScreenTimeHours.to_string(), "Screen Time per Day (Hours)");
//! ```

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// Label used for missing or unusable categorical values.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// A dataset column the engine knows how to interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    Country,
    DietType,
    Exercise,
    ExerciseLevel,
    HappinessScore,
    MentalHealthCondition,
    ScreenTimeHours,
    SleepHours,
    SocialInteractionScore,
    StressLevel,
}

impl Field {
    /// Columns coerced to numbers.
    pub const NUMERIC: [Field; 4] = [
        Field::HappinessScore,
        Field::ScreenTimeHours,
        Field::SleepHours,
        Field::SocialInteractionScore,
    ];

    /// Columns normalized to category labels.
    pub const CATEGORICAL: [Field; 6] = [
        Field::Country,
        Field::DietType,
        Field::Exercise,
        Field::ExerciseLevel,
        Field::MentalHealthCondition,
        Field::StressLevel,
    ];

    /// Header text of the column in the source dataset.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Field::Country => "Country",
            Field::DietType => "Diet Type",
            Field::Exercise => "Exercise",
            Field::ExerciseLevel => "Exercise Level",
            Field::HappinessScore => "Happiness Score",
            Field::MentalHealthCondition => "Mental Health Condition",
            Field::ScreenTimeHours => "Screen Time per Day (Hours)",
            Field::SleepHours => "Sleep Hours",
            Field::SocialInteractionScore => "Social Interaction Score",
            Field::StressLevel => "Stress Level",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.header(), f)
    }
}

/// One untyped survey row: column header to cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: BTreeMap<String, String>,
}

impl RawRecord {
    #[must_use]
    pub fn new(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }

    /// Builds a record from `(header, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Cell text of a recognised column, if present.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.fields.get(field.header()).map(String::as_str)
    }

    /// Cell text of an arbitrary column, if present.
    #[must_use]
    pub fn get_raw(&self, header: &str) -> Option<&str> {
        self.fields.get(header).map(String::as_str)
    }
}

/// A typed survey row produced by the preprocessor.
///
/// Numeric fields hold NaN where the source cell could not be read as a
/// number; consumers filter those out before computing statistics.
/// Categorical fields are trimmed labels, [`UNKNOWN_LABEL`] when absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyRecord {
    pub country: String,
    pub diet_type: String,
    pub exercise: String,
    pub exercise_level: String,
    pub mental_health_condition: String,
    pub stress_level: String,
    /// Ordinal stress score: 1 (low), 2 (moderate), 3 (high) or NaN.
    pub stress_score: f64,
    pub happiness_score: f64,
    pub sleep_hours: f64,
    pub social_interaction_score: f64,
    pub screen_time_hours: f64,
    /// Bucket label derived from `screen_time_hours`.
    pub screen_time_category: String,
}

impl SurveyRecord {
    /// Label of a categorical column.
    ///
    /// Returns `None` for numeric columns.
    #[must_use]
    pub fn category(&self, field: Field) -> Option<&str> {
        let label = match field {
            Field::Country => &self.country,
            Field::DietType => &self.diet_type,
            Field::Exercise => &self.exercise,
            Field::ExerciseLevel => &self.exercise_level,
            Field::MentalHealthCondition => &self.mental_health_condition,
            Field::StressLevel => &self.stress_level,
            Field::HappinessScore
            | Field::ScreenTimeHours
            | Field::SleepHours
            | Field::SocialInteractionScore => return None,
        };
        Some(label)
    }

    /// Value of a numeric column.
    ///
    /// Returns `None` for categorical columns.
    #[must_use]
    pub fn number(&self, field: Field) -> Option<f64> {
        let value = match field {
            Field::HappinessScore => self.happiness_score,
            Field::ScreenTimeHours => self.screen_time_hours,
            Field::SleepHours => self.sleep_hours,
            Field::SocialInteractionScore => self.social_interaction_score,
            Field::Country
            | Field::DietType
            | Field::Exercise
            | Field::ExerciseLevel
            | Field::MentalHealthCondition
            | Field::StressLevel => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_matches_display() {
        for field in Field::NUMERIC.into_iter().chain(Field::CATEGORICAL) {
            assert_eq!(field.to_string(), field.header());
        }
    }

    #[test]
    fn test_raw_record_deserializes_from_flat_object() {
        let raw: RawRecord =
            serde_json::from_str(r#"{"Country":"Brazil","Sleep Hours":"6.1","Age":"31"}"#)
                .unwrap();
        assert_eq!(raw.get(Field::Country), Some("Brazil"));
        assert_eq!(raw.get(Field::SleepHours), Some("6.1"));
        assert_eq!(raw.get_raw("Age"), Some("31"));
    }
}
