use serde::Serialize;

use crate::{
    descriptive::DescriptiveStats,
    error::StatsError,
    quantile::{QuantileMethod, Quantiles},
};

/// Probabilities of the first quartile, the median and the third quartile.
pub const QUARTILES: [f64; 3] = [0.25, 0.5, 0.75];

/// Five-number summary plus mean and standard deviation of a sample.
///
/// This structure provides everything a box-and-whisker glyph needs by combining:
/// - The quartiles (`q1`, `median`, `q3`) from the chosen quantile method
/// - The extremes (`min`, `max`) and the sample size
/// - The mean and population standard deviation from [`DescriptiveStats`]
///
/// The fields always satisfy `min <= q1 <= median <= q3 <= max`.
///
/// # Examples
///
/// ```
/// use moodscope_stats::boxplot::BoxplotStats;
///
/// let stats = BoxplotStats::new([9.0, 4.0, 7.0, 5.0, 6.0]).unwrap();
///
/// assert_eq!(stats.min, 4.0);
/// assert_eq!(stats.q1, 5.0);
/// assert_eq!(stats.median, 6.0);
/// assert_eq!(stats.q3, 7.0);
/// assert_eq!(stats.max, 9.0);
/// assert_eq!(stats.count, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxplotStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation (divides by `n`).
    pub std_dev: f64,
    /// Number of finite values summarized.
    pub count: usize,
}

impl BoxplotStats {
    /// Summarizes unsorted values with linear-interpolation quartiles.
    ///
    /// Non-finite values are dropped first. If nothing finite remains the
    /// result is [`StatsError::EmptyGroup`].
    pub fn new<I>(values: I) -> Result<Self, StatsError>
    where
        I: IntoIterator<Item = f64>,
    {
        Self::with_method(values, QuantileMethod::default())
    }

    /// Summarizes unsorted values with the given quantile method.
    pub fn with_method<I>(values: I, method: QuantileMethod) -> Result<Self, StatsError>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values
            .into_iter()
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, method)
    }

    /// Summarizes finite values sorted in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted or contains non-finite values.
    pub fn from_sorted(sorted_values: &[f64], method: QuantileMethod) -> Result<Self, StatsError> {
        debug_assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let stats = DescriptiveStats::from_finite(sorted_values)?;
        let quartiles = Quantiles::from_sorted(sorted_values, &QUARTILES, method);
        let quartile = |p| quartiles.get(p).ok_or(StatsError::EmptyGroup);

        Ok(Self {
            min: stats.min,
            q1: quartile(0.25)?,
            median: quartile(0.5)?,
            q3: quartile(0.75)?,
            max: stats.max,
            mean: stats.mean,
            std_dev: stats.std_dev,
            count: stats.count,
        })
    }

    /// Interquartile range (`q3 - q1`).
    #[must_use]
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_even_count_interpolates_median() {
        let stats = BoxplotStats::new([1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.q1, 1.75);
        assert_eq!(stats.q3, 3.25);
        assert_eq!(stats.iqr(), 1.5);
    }

    #[test]
    fn test_mean_and_population_std_dev() {
        let stats = BoxplotStats::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.std_dev, 2.0);
    }

    #[test]
    fn test_non_finite_values_are_filtered() {
        let stats = BoxplotStats::new([f64::NAN, 4.0, 9.0, f64::INFINITY, 6.0, 5.0, 7.0]).unwrap();
        assert_eq!(stats.count, 5);
        assert_eq!(stats.median, 6.0);
        assert_eq!(stats.max, 9.0);
    }

    #[test]
    fn test_quartiles_match_quantile_table() {
        let values = [3.5, 1.0, 8.25, 6.0, 2.0, 9.5, 4.75];
        let stats = BoxplotStats::new(values).unwrap();
        let table = Quantiles::new(&values, &QUARTILES, QuantileMethod::LinearInterpolation);
        assert_eq!(
            table.iter().collect::<Vec<_>>(),
            [(0.25, stats.q1), (0.5, stats.median), (0.75, stats.q3)]
        );
    }

    #[test]
    fn test_empty_group() {
        assert_eq!(BoxplotStats::new([]), Err(StatsError::EmptyGroup));
        assert_eq!(BoxplotStats::new([f64::NAN]), Err(StatsError::EmptyGroup));
    }

    #[test]
    fn test_ordering_holds_for_random_samples() {
        let mut rng = Pcg32::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let len = rng.random_range(1..60);
            let values = (0..len)
                .map(|_| rng.random_range(-50.0..50.0))
                .collect::<Vec<f64>>();
            let stats = BoxplotStats::new(values).unwrap();
            assert!(stats.min <= stats.q1, "{stats:?}");
            assert!(stats.q1 <= stats.median, "{stats:?}");
            assert!(stats.median <= stats.q3, "{stats:?}");
            assert!(stats.q3 <= stats.max, "{stats:?}");
            assert_eq!(stats.count, len);
        }
    }
}
