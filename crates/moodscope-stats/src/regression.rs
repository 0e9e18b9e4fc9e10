//! Single-predictor ordinary least squares.

use serde::Serialize;

use crate::{error::StatsError, extent::Extent};

/// Fitted line `y = slope * x + intercept`.
///
/// `domain` is the extent of the predictor values the line was fitted on;
/// the line is only meaningful (and only drawn) over that interval.
///
/// # Examples
///
/// ```
/// use moodscope_stats::regression::RegressionLine;
///
/// let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let ys = [3.0, 5.0, 7.0, 9.0, 11.0];
/// let line = RegressionLine::fit(&xs, &ys).unwrap();
///
/// assert!((line.slope - 2.0).abs() < 1e-9);
/// assert!((line.intercept - 1.0).abs() < 1e-9);
/// assert_eq!(line.domain.min, 1.0);
/// assert_eq!(line.domain.max, 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegressionLine {
    pub slope: f64,
    pub intercept: f64,
    pub domain: Extent,
}

impl RegressionLine {
    /// Fits a least-squares line through the pairs `(xs[i], ys[i])`.
    ///
    /// Pairs where either coordinate is not finite are dropped first.
    ///
    /// # Errors
    ///
    /// * [`StatsError::LengthMismatch`] - `xs` and `ys` differ in length
    /// * [`StatsError::EmptyGroup`] - no finite pair remains
    /// * [`StatsError::DegenerateInput`] - every remaining `x` is equal
    ///   (this includes the single-pair case)
    #[expect(clippy::cast_precision_loss)]
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Self, StatsError> {
        if xs.len() != ys.len() {
            return Err(StatsError::LengthMismatch {
                x_len: xs.len(),
                y_len: ys.len(),
            });
        }

        let pairs = xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| (x, y))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect::<Vec<_>>();
        let domain = Extent::from_values(pairs.iter().map(|(x, _)| *x))
            .ok_or(StatsError::EmptyGroup)?;
        // constant fractional x leaves sxx at rounding noise instead of zero
        if domain.min == domain.max {
            return Err(StatsError::DegenerateInput);
        }

        let n = pairs.len() as f64;
        let x_mean = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
        let y_mean = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;
        let (sxy, sxx) = pairs.iter().fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
            let dx = x - x_mean;
            (sxy + dx * (y - y_mean), sxx + dx * dx)
        });

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;

        Ok(Self {
            slope,
            intercept,
            domain,
        })
    }

    /// Evaluates the line at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// The two end points of the line over its predictor domain.
    #[must_use]
    pub fn endpoints(&self) -> [(f64, f64); 2] {
        let Extent { min, max } = self.domain;
        [(min, self.predict(min)), (max, self.predict(max))]
    }
}
