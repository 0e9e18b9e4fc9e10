//! Survey aggregation engine for the Moodscope charts
//!
//! This crate turns raw survey records into the summary objects a rendering
//! layer draws: counts per group, stacked layouts, boxplots, trend lines and
//! density curves. Numeric work is delegated to [`moodscope_stats`].
//!
//! # Overview
//!
//! A summary pass has three stages:
//!
//! 1. **Configure** ([`config::AnalysisConfig`]): bucket thresholds, kernel
//!    bandwidth, grid size and category orders, validated up front
//! 2. **Preprocess** ([`preprocess::Preprocessor`]): coerce string cells
//!    into a typed [`record::SurveyRecord`], derive the screen-time bucket
//!    and the stress ordinal, and report unreadable cells
//! 3. **Aggregate** ([`summary::SurveySummary`]): group records
//!    ([`group`]), stack counts ([`stack`]) and compute per-group statistics
//!
//! Per-group failures (an empty group, a degenerate regression) are stored
//! next to the successful groups instead of aborting the pass.
//!
//! # Examples
//!
//! ## Summarizing a survey
//!
//! ```
//! use moodscope_analysis::{config::AnalysisConfig, record::RawRecord, summary::SurveySummary};
//!
//! let raw = vec![
//!     RawRecord::from_pairs([("Country", "Japan"), ("Stress Level", "Low"), ("Exercise Level", "High")]),
//!     RawRecord::from_pairs([("Country", "Brazil"), ("Stress Level", "High"), ("Exercise Level", "Low")]),
//! ];
//! let config = AnalysisConfig::from_json(r#"{ "kdeBandwidth": 0.5 }"#).unwrap();
//! let summary = SurveySummary::compute(&raw, &config).unwrap();
//!
//! assert_eq!(summary.record_count, 2);
//! assert_eq!(summary.stress_by_country_condition.table.primary_domain, ["Brazil", "Japan"]);
//! ```
//!
//! ## Counting with explicit zeros
//!
//! ```
//! use moodscope_analysis::group::{KeyDomain, count_by};
//!
//! let records = [("Japan", "Low"), ("Japan", "Low"), ("Japan", "Moderate")];
//! let levels = ["Low", "Moderate", "High"].map(String::from).to_vec();
//! let table = count_by(&records, |r| r.0, KeyDomain::Observed, |r| r.1, levels);
//!
//! let counts = &table.results[0].counts;
//! assert_eq!((counts["Low"], counts["Moderate"], counts["High"]), (2, 1, 0));
//! ```
//!
//! # Logging
//!
//! Diagnostics go through [`tracing`]. The crate never installs a
//! subscriber; applications choose where events end up.

pub mod config;
pub mod group;
pub mod preprocess;
pub mod record;
pub mod stack;
pub mod summary;
