use serde::Serialize;

use crate::error::StatsError;

/// Descriptive statistics summarizing a dataset.
///
/// This structure contains the measures of central tendency and dispersion
/// for the finite values of a dataset. Dispersion is descriptive: the
/// variance divides by `n`, not `n - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptiveStats {
    /// The minimum value in the dataset.
    pub min: f64,
    /// The maximum value in the dataset.
    pub max: f64,
    /// The arithmetic mean of the dataset.
    pub mean: f64,
    /// The population variance of the dataset.
    pub variance: f64,
    /// The population standard deviation of the dataset.
    pub std_dev: f64,
    /// The number of finite values the statistics were computed from.
    pub count: usize,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// Non-finite values (NaN and infinities left behind by failed numeric
    /// coercion) are skipped before anything is computed.
    ///
    /// # Arguments
    ///
    /// * `values` - An iterator over `f64` values.
    ///
    /// # Returns
    ///
    /// * `Ok(DescriptiveStats)` - if the dataset contains at least one finite value
    /// * `Err(StatsError::EmptyGroup)` - otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// # use moodscope_stats::descriptive::DescriptiveStats;
    /// let values = [5.0, 2.0, f64::NAN, 4.0, 1.0, 3.0];
    /// let stats = DescriptiveStats::new(values).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.variance, 2.0);
    /// assert_eq!(stats.count, 5);
    /// ```
    pub fn new<I>(values: I) -> Result<Self, StatsError>
    where
        I: IntoIterator<Item = f64>,
    {
        let values = finite_values(values);
        Self::from_finite(&values)
    }

    /// Computes descriptive statistics from values already known to be finite.
    ///
    /// # Panics
    ///
    /// Panics if any value is not finite.
    #[expect(clippy::cast_precision_loss)]
    pub fn from_finite(values: &[f64]) -> Result<Self, StatsError> {
        assert!(
            values.iter().all(|v| v.is_finite()),
            "values must be finite"
        );

        if values.is_empty() {
            return Err(StatsError::EmptyGroup);
        }

        let count = values.len();
        let n = count as f64;
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| {
                (min.min(v), max.max(v))
            });
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();

        Ok(Self {
            min,
            max,
            mean,
            variance,
            std_dev,
            count,
        })
    }
}

/// Arithmetic mean of the finite values.
///
/// Returns [`StatsError::EmptyGroup`] when no finite value remains.
///
/// ```
/// # use moodscope_stats::descriptive::mean;
/// assert_eq!(mean([1.0, 2.0, f64::NAN, 3.0]), Ok(2.0));
/// assert!(mean([f64::NAN]).is_err());
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn mean<I>(values: I) -> Result<f64, StatsError>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return Err(StatsError::EmptyGroup);
    }
    Ok(sum / count as f64)
}

/// Collects the finite values, dropping NaN and infinities.
#[must_use]
pub fn finite_values<I>(values: I) -> Vec<f64>
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().filter(|v| v.is_finite()).collect()
}
