//! Kernel density estimation over a shared support grid.
//!
//! Groups that are compared side by side (violins in one chart) must be
//! evaluated on the same support grid. [`KernelDensityEstimator`] owns that
//! grid and the kernel; [`KernelDensityEstimator::estimate_groups`] returns a
//! [`DensitySet`] carrying every group's curve and the global maximum density
//! the renderer scales widths by.
//!
//! # Examples
//!
//! ```
//! use moodscope_stats::{extent::ticks, kde::{Epanechnikov, KernelDensityEstimator}};
//!
//! let kde = KernelDensityEstimator::new(Epanechnikov::new(0.4), ticks(0.0, 10.0, 20.0));
//! let set = kde.estimate_groups([("Low", vec![6.0, 6.5, 7.0]), ("High", vec![])]);
//!
//! assert_eq!(set.estimates.len(), 2);
//! assert!(set.max_density > 0.0);
//! // an empty group is the zero function, not an error
//! assert!(set.estimates[1].points.iter().all(|p| p.density == 0.0));
//! ```

use serde::Serialize;

/// A smoothing kernel centered at zero.
pub trait Kernel {
    /// Kernel weight at offset `v` from a sample.
    fn evaluate(&self, v: f64) -> f64;
}

impl<F> Kernel for F
where
    F: Fn(f64) -> f64,
{
    fn evaluate(&self, v: f64) -> f64 {
        self(v)
    }
}

/// Epanechnikov kernel `0.75 * (1 - u²) / h` for `|u| <= 1` where `u = v / h`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Epanechnikov {
    bandwidth: f64,
}

impl Epanechnikov {
    /// Creates the kernel with bandwidth `h`.
    ///
    /// # Panics
    ///
    /// Panics if `bandwidth` is not a positive finite number.
    #[must_use]
    pub fn new(bandwidth: f64) -> Self {
        assert!(
            bandwidth.is_finite() && bandwidth > 0.0,
            "bandwidth must be positive and finite"
        );
        Self { bandwidth }
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }
}

impl Kernel for Epanechnikov {
    fn evaluate(&self, v: f64) -> f64 {
        let u = v / self.bandwidth;
        if u.abs() <= 1.0 {
            0.75 * (1.0 - u * u) / self.bandwidth
        } else {
            0.0
        }
    }
}

/// Density value at one support point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DensityPoint {
    pub value: f64,
    pub density: f64,
}

/// Estimated density curve of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityEstimate<K> {
    pub key: K,
    /// Number of finite samples behind the curve.
    pub sample_count: usize,
    /// One point per grid value, in grid order.
    pub points: Vec<DensityPoint>,
}

impl<K> DensityEstimate<K> {
    /// Largest density along the curve (0 for the zero function).
    #[must_use]
    pub fn peak(&self) -> f64 {
        self.points.iter().map(|p| p.density).fold(0.0, f64::max)
    }
}

/// Density curves of several groups evaluated on one shared grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DensitySet<K> {
    pub grid: Vec<f64>,
    pub estimates: Vec<DensityEstimate<K>>,
    /// Maximum density over every group and grid point.
    pub max_density: f64,
}

/// Kernel density estimator bound to a kernel and a support grid.
#[derive(Debug, Clone)]
pub struct KernelDensityEstimator<Q> {
    kernel: Q,
    grid: Vec<f64>,
}

impl<Q> KernelDensityEstimator<Q>
where
    Q: Kernel,
{
    #[must_use]
    pub fn new(kernel: Q, grid: Vec<f64>) -> Self {
        Self { kernel, grid }
    }

    #[must_use]
    pub fn grid(&self) -> &[f64] {
        &self.grid
    }

    /// Evaluates the density of `values` at every grid point.
    ///
    /// The density at `s` is the mean of `kernel(s - v)` over the finite
    /// values `v`. With no finite value the result is zero everywhere.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn estimate(&self, values: &[f64]) -> Vec<DensityPoint> {
        let finite = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();
        let n = finite.len() as f64;
        self.grid
            .iter()
            .map(|&value| {
                let density = if finite.is_empty() {
                    0.0
                } else {
                    finite
                        .iter()
                        .map(|v| self.kernel.evaluate(value - v))
                        .sum::<f64>()
                        / n
                };
                DensityPoint { value, density }
            })
            .collect()
    }

    /// Estimates one curve per group and the maximum density across them.
    pub fn estimate_groups<K, I, V>(&self, groups: I) -> DensitySet<K>
    where
        I: IntoIterator<Item = (K, V)>,
        V: AsRef<[f64]>,
    {
        let estimates = groups
            .into_iter()
            .map(|(key, values)| {
                let values = values.as_ref();
                DensityEstimate {
                    key,
                    sample_count: values.iter().filter(|v| v.is_finite()).count(),
                    points: self.estimate(values),
                }
            })
            .collect::<Vec<_>>();
        let max_density = estimates
            .iter()
            .map(DensityEstimate::peak)
            .fold(0.0, f64::max);

        DensitySet {
            grid: self.grid.clone(),
            estimates,
            max_density,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg32;

    use super::*;
    use crate::extent::ticks;

    #[test]
    fn test_epanechnikov_shape() {
        let kernel = Epanechnikov::new(0.5);
        assert_eq!(kernel.evaluate(0.0), 1.5);
        assert_eq!(kernel.evaluate(0.5), 0.0);
        assert_eq!(kernel.evaluate(-0.6), 0.0);
        assert_eq!(kernel.evaluate(0.25), kernel.evaluate(-0.25));
    }

    #[test]
    fn test_single_sample_density() {
        let kde = KernelDensityEstimator::new(Epanechnikov::new(1.0), vec![0.0, 0.5, 2.0]);
        let points = kde.estimate(&[0.0]);
        assert_eq!(points[0].density, 0.75);
        assert_eq!(points[1].density, 0.75 * 0.75);
        assert_eq!(points[2].density, 0.0);
    }

    #[test]
    fn test_density_integrates_to_about_one() {
        let grid = ticks(-5.0, 15.0, 2000.0);
        let step = grid[1] - grid[0];
        let kde = KernelDensityEstimator::new(Epanechnikov::new(0.8), grid);
        let points = kde.estimate(&[4.0, 5.0, 5.5, 7.0]);
        let area = points.iter().map(|p| p.density * step).sum::<f64>();
        assert!((area - 1.0).abs() < 0.01, "area = {area}");
    }

    #[test]
    fn test_empty_group_is_zero_function() {
        let grid = ticks(0.0, 10.0, 40.0);
        let kde = KernelDensityEstimator::new(Epanechnikov::new(0.4), grid.clone());
        let set = kde.estimate_groups([("Low", vec![f64::NAN]), ("High", vec![])]);
        for estimate in &set.estimates {
            assert_eq!(estimate.sample_count, 0);
            assert_eq!(estimate.points.len(), grid.len());
            assert!(estimate.points.iter().all(|p| p.density == 0.0));
        }
        assert_eq!(set.max_density, 0.0);
    }

    #[test]
    fn test_groups_share_grid_and_max() {
        let mut rng = Pcg32::seed_from_u64(7);
        let grid = ticks(0.0, 10.0, 40.0);
        let kde = KernelDensityEstimator::new(Epanechnikov::new(0.4), grid.clone());
        let groups = ["Low", "Moderate", "High"].map(|key| {
            let values = (0..80)
                .map(|_| rng.random_range(0.0..10.0))
                .collect::<Vec<f64>>();
            (key, values)
        });
        let set = kde.estimate_groups(groups);

        assert_eq!(set.grid, grid);
        let mut seen_max = 0.0_f64;
        for estimate in &set.estimates {
            assert_eq!(estimate.points.len(), grid.len());
            for (point, &value) in estimate.points.iter().zip(&grid) {
                assert_eq!(point.value, value);
                assert!(point.density >= 0.0);
            }
            seen_max = seen_max.max(estimate.peak());
        }
        assert_eq!(set.max_density, seen_max);
    }

    #[test]
    fn test_closure_kernel() {
        let uniform = |v: f64| if v.abs() <= 1.0 { 0.5 } else { 0.0 };
        let kde = KernelDensityEstimator::new(uniform, vec![0.0, 3.0]);
        let points = kde.estimate(&[0.5, 1.0]);
        assert_eq!(points[0].density, 0.5);
        assert_eq!(points[1].density, 0.0);
    }
}
