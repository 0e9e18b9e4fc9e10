//! Error conditions reported by the statistics in this crate.
//!
//! Every statistic that cannot be computed for a group returns one of these
//! variants instead of NaN-filled output. Callers keep the error next to the
//! group it belongs to, so one bad group never hides the others.

use serde::Serialize;

/// A statistic could not be computed over the given input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display, derive_more::Error)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StatsError {
    /// The input contains no finite values.
    #[display("group has no finite values")]
    EmptyGroup,
    /// The predictor has zero variance, so the fitted line is undefined.
    #[display("predictor has zero variance")]
    DegenerateInput,
    /// Paired sequences have different lengths.
    #[display("paired sequences differ in length ({x_len} vs {y_len})")]
    #[serde(rename_all = "camelCase")]
    LengthMismatch { x_len: usize, y_len: usize },
}
