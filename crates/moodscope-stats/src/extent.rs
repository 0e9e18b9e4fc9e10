//! Value extents and tick generation for chart axes.
//!
//! [`Extent`] is the `(min, max)` pair a value axis is sized from. It can be
//! padded, anchored at zero, stretched by a headroom factor, or extended to
//! "nice" round bounds. [`ticks`] produces evenly spaced round values inside
//! a domain; the density estimator uses those ticks as its support grid.

use serde::Serialize;

const E10: f64 = 7.071_067_811_865_476; // sqrt(50)
const E5: f64 = 3.162_277_660_168_379_5; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Closed interval `[min, max]` covered by a set of values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    /// Creates an extent, swapping the bounds if they are reversed.
    #[must_use]
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Smallest extent covering every finite value.
    ///
    /// Returns `None` if there is no finite value.
    ///
    /// ```
    /// # use moodscope_stats::extent::Extent;
    /// let extent = Extent::from_values([3.0, f64::NAN, -1.0, 8.5]).unwrap();
    /// assert_eq!((extent.min, extent.max), (-1.0, 8.5));
    /// assert!(Extent::from_values([f64::NAN]).is_none());
    /// ```
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |extent, v| match extent {
                None => Some(Self { min: v, max: v }),
                Some(Self { min, max }) => Some(Self {
                    min: min.min(v),
                    max: max.max(v),
                }),
            })
    }

    /// Widens both ends by `margin`.
    #[must_use]
    pub fn pad(self, margin: f64) -> Self {
        Self {
            min: self.min - margin,
            max: self.max + margin,
        }
    }

    /// Extends the extent so that it contains zero.
    #[must_use]
    pub fn with_zero(self) -> Self {
        Self {
            min: self.min.min(0.0),
            max: self.max.max(0.0),
        }
    }

    /// Multiplies the upper bound by `factor`, leaving headroom above the data.
    #[must_use]
    pub fn scale_max(self, factor: f64) -> Self {
        Self {
            min: self.min,
            max: self.max * factor,
        }
    }

    /// Width of the interval.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Whether `value` lies inside the closed interval.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Extends the bounds outwards to multiples of the tick step for `count` ticks.
    ///
    /// ```
    /// # use moodscope_stats::extent::Extent;
    /// let nice = Extent::new(0.0, 9.7).nice(10);
    /// assert_eq!((nice.min, nice.max), (0.0, 10.0));
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn nice(self, count: usize) -> Self {
        let Self { mut min, mut max } = self;
        if min == max || !min.is_finite() || !max.is_finite() {
            return self;
        }

        let mut previous_step = None;
        for _ in 0..10 {
            let step = tick_increment(min, max, count as f64);
            if previous_step == Some(step) {
                break;
            }
            if step > 0.0 {
                min = (min / step).floor() * step;
                max = (max / step).ceil() * step;
            } else if step < 0.0 {
                min = (min * step).ceil() / step;
                max = (max * step).floor() / step;
            } else {
                break;
            }
            previous_step = Some(step);
        }
        Self { min, max }
    }

    /// Round values spaced evenly inside the extent; see [`ticks`].
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.min, self.max, count as f64)
    }
}

/// Generates approximately `count` round values between `start` and `stop`.
///
/// Tick values are multiples of 1, 2 or 5 times a power of ten and lie
/// inside the closed interval. Reversed bounds produce descending ticks.
///
/// ```
/// # use moodscope_stats::extent::ticks;
/// assert_eq!(ticks(0.0, 1.0, 5.0), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
/// assert_eq!(ticks(0.0, 10.0, 4.0), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
/// assert_eq!(ticks(2.0, 2.0, 10.0), vec![2.0]);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn ticks(start: f64, stop: f64, count: f64) -> Vec<f64> {
    if count.is_nan() || count <= 0.0 || start.is_nan() || stop.is_nan() {
        return vec![];
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (i1, i2, inc) = if reverse {
        tick_spec(stop, start, count)
    } else {
        tick_spec(start, stop, count)
    };
    if !(i2 >= i1) || !inc.is_finite() {
        return vec![];
    }

    let n = (i2 - i1 + 1.0) as usize;
    (0..n)
        .map(|i| {
            let i = i as f64;
            let index = if reverse { i2 - i } else { i1 + i };
            if inc < 0.0 { index / -inc } else { index * inc }
        })
        .collect()
}

/// Step between ticks for `count` ticks over `[start, stop]`.
///
/// A negative result `-k` denotes a step of `1 / k`, which keeps fractional
/// steps exact when multiplied back out.
#[must_use]
pub fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    if count.is_nan() || count <= 0.0 {
        return f64::NAN;
    }
    if start == stop {
        return f64::NEG_INFINITY;
    }
    let step = (stop - start) / count;
    if step == 0.0 {
        return f64::NAN;
    }
    let power = step.log10().floor();
    let factor = step_factor(step / 10f64.powf(power));
    if power >= 0.0 {
        10f64.powf(power) * factor
    } else {
        -(10f64.powf(-power)) / factor
    }
}

fn step_factor(error: f64) -> f64 {
    if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    }
}

fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count;
    let power = step.log10().floor();
    let factor = step_factor(step / 10f64.powf(power));

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let inverse = 10f64.powf(-power) / factor;
        i1 = (start * inverse).round();
        i2 = (stop * inverse).round();
        if i1 / inverse < start {
            i1 += 1.0;
        }
        if i2 / inverse > stop {
            i2 -= 1.0;
        }
        inc = -inverse;
    } else {
        inc = 10f64.powf(power) * factor;
        i1 = (start / inc).round();
        i2 = (stop / inc).round();
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_match_round_steps() {
        assert_eq!(
            ticks(0.0, 1.0, 10.0),
            vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0]
        );
        assert_eq!(ticks(0.0, 1.0, 3.0), vec![0.0, 0.5, 1.0]);
        assert_eq!(ticks(0.0, 1.0, 1.0), vec![0.0, 1.0]);
    }

    #[test]
    fn test_forty_ticks_over_score_domain() {
        // a raw step of 0.25 rounds down to the 2-multiple 0.2
        let grid = ticks(0.0, 10.0, 40.0);
        assert_eq!(grid.len(), 51);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[1], 0.2);
        assert_eq!(grid[50], 10.0);
    }

    #[test]
    fn test_reverse_ticks_descend() {
        assert_eq!(ticks(1.0, 0.0, 2.0), vec![1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_ticks_edge_cases() {
        assert!(ticks(f64::NAN, 1.0, 1.0).is_empty());
        assert!(ticks(0.0, 1.0, 0.0).is_empty());
        assert!(ticks(0.0, 1.0, -1.0).is_empty());
        assert!(ticks(0.0, 1.0, f64::INFINITY).is_empty());
    }

    #[test]
    fn test_tick_increment() {
        assert_eq!(tick_increment(0.0, 10.0, 10.0), 1.0);
        assert_eq!(tick_increment(0.0, 100.0, 10.0), 10.0);
        assert_eq!(tick_increment(0.0, 1.0, 10.0), -10.0);
        assert!(tick_increment(0.0, 1.0, 0.0).is_nan());
    }

    #[test]
    fn test_nice_extends_to_round_bounds() {
        let nice = Extent::new(0.3, 9.2).nice(10);
        assert_eq!((nice.min, nice.max), (0.0, 10.0));
        let nice = Extent::new(1.0, 1.0).nice(10);
        assert_eq!((nice.min, nice.max), (1.0, 1.0));
    }

    #[test]
    fn test_padding_and_headroom() {
        let extent = Extent::new(4.0, 9.0).pad(1.0);
        assert_eq!((extent.min, extent.max), (3.0, 10.0));
        let extent = Extent::new(5.0, 20.0).with_zero().scale_max(1.1);
        assert_eq!(extent.min, 0.0);
        assert!((extent.max - 22.0).abs() < 1e-12);
        assert!(extent.contains(0.0));
        assert_eq!(Extent::new(9.0, 4.0), Extent::new(4.0, 9.0));
    }
}
