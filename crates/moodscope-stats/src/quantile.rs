//! Quantile estimation over sorted samples.

use serde::{Deserialize, Serialize};

/// Quantile estimator used when summarizing a sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuantileMethod {
    /// Interpolates linearly between the two sorted values bracketing the
    /// fractional rank `(n - 1) * p`.
    #[default]
    #[serde(rename = "linear-interpolation")]
    LinearInterpolation,
}

impl QuantileMethod {
    /// Computes the `p`-quantile (`0.0..=1.0`) of ascending-sorted values.
    ///
    /// Returns `None` if `sorted_values` is empty or `p` is NaN.
    #[must_use]
    pub fn quantile_sorted(self, sorted_values: &[f64], p: f64) -> Option<f64> {
        match self {
            Self::LinearInterpolation => quantile_sorted(sorted_values, p),
        }
    }
}

/// Precomputed quantile values for a dataset.
///
/// # Examples
///
/// ```
/// use moodscope_stats::quantile::{QuantileMethod, Quantiles};
///
/// let values = [9.0, 4.0, 7.0, 5.0, 6.0];
/// let quantiles = Quantiles::new(&values, &[0.25, 0.5, 0.75], QuantileMethod::LinearInterpolation);
///
/// assert_eq!(quantiles.get(0.25), Some(5.0));
/// assert_eq!(quantiles.get(0.5), Some(6.0));
/// assert_eq!(quantiles.get(0.75), Some(7.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quantiles {
    /// (probability, value) pairs in the order they were requested.
    values: Vec<(f64, f64)>,
}

impl Quantiles {
    /// Computes quantiles from sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], points: &[f64], method: QuantileMethod) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let values = points
            .iter()
            .filter_map(|&p| method.quantile_sorted(sorted_values, p).map(|v| (p, v)))
            .collect();
        Self { values }
    }

    /// Computes quantiles from unsorted values.
    ///
    /// Non-finite values are dropped before sorting.
    #[must_use]
    pub fn new(values: &[f64], points: &[f64], method: QuantileMethod) -> Self {
        let mut sorted = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, points, method)
    }

    /// Gets the value at a precomputed probability.
    ///
    /// Returns `None` if the probability was not requested or the input was empty.
    #[must_use]
    pub fn get(&self, p: f64) -> Option<f64> {
        self.values
            .iter()
            .find_map(|&(q, value)| ((q - p).abs() < f64::EPSILON).then_some(value))
    }

    /// Returns an iterator over all (probability, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values.iter().copied()
    }
}

/// Computes a single quantile from sorted data by linear interpolation.
///
/// For `n` values the fractional rank is `h = (n - 1) * p`; the result blends
/// the values at `floor(h)` and `floor(h) + 1` by the fractional part of `h`.
/// Probabilities outside `0.0..=1.0` clamp to the minimum / maximum.
///
/// # Returns
///
/// `None` if `sorted_values` is empty or `p` is NaN.
///
/// # Examples
///
/// ```
/// use moodscope_stats::quantile::quantile_sorted;
///
/// let values = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(quantile_sorted(&values, 0.5), Some(2.5));
/// assert_eq!(quantile_sorted(&values, 0.0), Some(1.0));
/// assert_eq!(quantile_sorted(&values, 1.0), Some(4.0));
/// assert_eq!(quantile_sorted(&[], 0.5), None);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn quantile_sorted(sorted_values: &[f64], p: f64) -> Option<f64> {
    let first = *sorted_values.first()?;
    let last = *sorted_values.last()?;
    if p.is_nan() {
        return None;
    }
    let n = sorted_values.len();
    if p <= 0.0 || n < 2 {
        return Some(first);
    }
    if p >= 1.0 {
        return Some(last);
    }

    let rank = (n - 1) as f64 * p;
    let lower = rank.floor() as usize;
    let lower_value = sorted_values[lower];
    let upper_value = sorted_values[lower + 1];
    let value = lower_value + (upper_value - lower_value) * (rank - lower as f64);
    // rounding must not step outside the bracket
    Some(value.clamp(lower_value, upper_value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_ranks_hit_sorted_values() {
        let values = [4.0, 5.0, 6.0, 7.0, 9.0];
        assert_eq!(quantile_sorted(&values, 0.25), Some(5.0));
        assert_eq!(quantile_sorted(&values, 0.5), Some(6.0));
        assert_eq!(quantile_sorted(&values, 0.75), Some(7.0));
    }

    #[test]
    fn test_fractional_rank_interpolates() {
        // rank = 5 * 0.3 = 1.5, halfway between 20 and 30
        let values = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0];
        let q = quantile_sorted(&values, 0.3).unwrap();
        assert!((q - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_probability_clamps() {
        let values = [1.0, 2.0, 3.0];
        assert_eq!(quantile_sorted(&values, -0.5), Some(1.0));
        assert_eq!(quantile_sorted(&values, 1.5), Some(3.0));
        assert_eq!(quantile_sorted(&values, f64::NAN), None);
    }

    #[test]
    fn test_single_value() {
        assert_eq!(quantile_sorted(&[7.0], 0.75), Some(7.0));
    }

    #[test]
    fn test_quantiles_drop_non_finite() {
        let quantiles = Quantiles::new(
            &[3.0, f64::NAN, 1.0, 2.0],
            &[0.5],
            QuantileMethod::LinearInterpolation,
        );
        assert_eq!(quantiles.get(0.5), Some(2.0));
        assert_eq!(quantiles.get(0.9), None);
    }

    #[test]
    fn test_method_serializes_with_config_name() {
        let json = serde_json::to_string(&QuantileMethod::LinearInterpolation).unwrap();
        assert_eq!(json, "\"linear-interpolation\"");
    }
}
