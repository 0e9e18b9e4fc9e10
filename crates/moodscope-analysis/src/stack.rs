//! Stacked-bar layout
//!
//! A stacked bar draws the sub-category counts of one group on top of each
//! other. [`stack_layout`] assigns every sub-category its `[start, end)`
//! offsets in the caller's key order, and [`stack_max`] gives the value
//! axis its upper bound.
//!
//! # Examples
//!
//! ```
//! use moodscope_analysis::{
//!     group::{KeyDomain, count_by},
//!     stack::stack_layout,
//! };
//!
//! let records = [("Japan", "High"), ("Japan", "Low"), ("Japan", "Low")];
//! let order = ["Low", "Moderate", "High"].map(String::from).to_vec();
//! let table = count_by(&records, |r| r.0, KeyDomain::Observed, |r| r.1, order.clone());
//!
//! let series = stack_layout(&table.results[0], &order);
//! let offsets = series
//!     .segments
//!     .iter()
//!     .map(|s| (s.key.as_str(), s.start, s.end))
//!     .collect::<Vec<_>>();
//! assert_eq!(offsets, [("Low", 0, 2), ("Moderate", 2, 2), ("High", 2, 3)]);
//! assert_eq!(series.total, 3);
//! ```

use serde::Serialize;

use crate::group::{AggregateResult, CrossTab, GroupKey};

/// Offsets of one sub-category within a stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackSegment {
    pub key: String,
    pub start: usize,
    pub end: usize,
}

impl StackSegment {
    #[must_use]
    pub fn height(&self) -> usize {
        self.end - self.start
    }
}

/// One stacking unit, segments in stacking order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackedSeries {
    pub key: GroupKey,
    pub segments: Vec<StackSegment>,
    /// End of the last segment.
    pub total: usize,
}

impl StackedSeries {
    #[must_use]
    pub fn segment(&self, key: &str) -> Option<&StackSegment> {
        self.segments.iter().find(|s| s.key == key)
    }
}

/// Stacks the counts of `result` in `order`.
///
/// Segment `i` starts where segment `i - 1` ends. Keys of `order` missing
/// from the counts stack as zero-height segments; counted keys that `order`
/// does not name are left out of the stack.
#[must_use]
pub fn stack_layout(result: &AggregateResult, order: &[String]) -> StackedSeries {
    let mut offset = 0;
    let segments = order
        .iter()
        .map(|key| {
            let start = offset;
            offset += result.count(key);
            StackSegment {
                key: key.clone(),
                start,
                end: offset,
            }
        })
        .collect();
    StackedSeries {
        key: result.key.clone(),
        segments,
        total: offset,
    }
}

/// Stacks every group of a cross tabulation, in result order.
#[must_use]
pub fn stack_all(table: &CrossTab, order: &[String]) -> Vec<StackedSeries> {
    table
        .results
        .iter()
        .map(|result| stack_layout(result, order))
        .collect()
}

/// Tallest stack (0 without any stack).
#[must_use]
pub fn stack_max(series: &[StackedSeries]) -> usize {
    series.iter().map(|s| s.total).max().unwrap_or(0)
}
