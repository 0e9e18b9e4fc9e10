//! Record grouping and cross tabulation
//!
//! Every chart starts by partitioning records by one or two categorical keys.
//! All functions here make a single pass over the records and look groups up
//! by key, so the cost is linear in the number of records regardless of how
//! many groups there are.
//!
//! # Domains
//!
//! The set of groups reported is decided by a [`KeyDomain`]:
//!
//! - [`KeyDomain::Fixed`]: caller-specified labels in caller order. Labels
//!   without records are still reported (with zero counts / no values);
//!   records whose key is outside the list are left out.
//! - [`KeyDomain::Observed`]: distinct keys in first-seen order.
//! - [`KeyDomain::ObservedSorted`]: distinct keys in ascending order.
//!
//! # Explicit zeros
//!
//! [`count_by`], [`cross_count_by`] and [`GroupAggregator::count`] report
//! one [`AggregateResult`] for every primary × secondary combination of the
//! resolved domains, and every result carries a count for every
//! sub-category, zero included. Stacked and grouped layouts rely on that
//! uniform shape.
//!
//! # Examples
//!
//! ```
//! use moodscope_analysis::group::{GroupAggregator, KeyDomain};
//!
//! let records = [("Japan", "Low"), ("Japan", "Low"), ("Japan", "Moderate")];
//! let stress = ["Low", "Moderate", "High"].map(String::from).to_vec();
//!
//! let table = GroupAggregator::new(|r: &(&str, &str)| r.0, KeyDomain::Observed)
//!     .count_sub_categories(|r: &(&str, &str)| r.1, stress)
//!     .count(&records);
//!
//! let japan = &table.results[0];
//! assert_eq!(japan.count("Low"), 2);
//! assert_eq!(japan.count("Moderate"), 1);
//! assert_eq!(japan.count("High"), 0);
//! assert_eq!(japan.total(), 3);
//! ```

use std::{fmt, hash::Hash};

use indexmap::{IndexMap, IndexSet};
use moodscope_stats::{descriptive, error::StatsError};
use serde::Serialize;

type KeyFn<'k, R> = Box<dyn Fn(&R) -> &str + 'k>;

/// Which group keys a grouping reports, and in which order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum KeyDomain {
    Fixed(Vec<String>),
    Observed,
    ObservedSorted,
}

impl KeyDomain {
    /// A fixed domain from labels.
    pub fn fixed<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fixed(labels.into_iter().map(Into::into).collect())
    }

    /// Resolves the domain to its ordered, distinct labels.
    pub fn resolve<R, F>(&self, records: &[R], key: F) -> IndexSet<String>
    where
        F: Fn(&R) -> &str,
    {
        match self {
            Self::Fixed(labels) => labels.iter().cloned().collect(),
            Self::Observed => records.iter().map(|r| key(r).to_owned()).collect(),
            Self::ObservedSorted => {
                let mut labels = records
                    .iter()
                    .map(|r| key(r).to_owned())
                    .collect::<IndexSet<_>>();
                labels.sort();
                labels
            }
        }
    }
}

/// Partitions records by key, keeping groups in first-seen order.
///
/// Every record lands in exactly one group; record order is preserved
/// inside each group.
///
/// ```
/// # use moodscope_analysis::group::group_by;
/// let words = ["apple", "avocado", "banana", "blueberry", "apricot"];
/// let groups = group_by(&words, |w| w.as_bytes()[0]);
/// assert_eq!(groups[&b'a'], [&"apple", &"avocado", &"apricot"]);
/// assert_eq!(groups.keys().copied().collect::<Vec<_>>(), [b'a', b'b']);
/// ```
pub fn group_by<'a, R, K, F>(records: &'a [R], mut key: F) -> IndexMap<K, Vec<&'a R>>
where
    F: FnMut(&'a R) -> K,
    K: Hash + Eq,
{
    let mut groups: IndexMap<K, Vec<&'a R>> = IndexMap::new();
    for record in records {
        groups.entry(key(record)).or_default().push(record);
    }
    groups
}

/// Finite numeric values per group, in domain order.
///
/// Non-finite values are dropped. Groups of a fixed domain without any
/// finite value map to an empty vector.
pub fn values_by<R, K, V>(
    records: &[R],
    key: K,
    domain: &KeyDomain,
    value: V,
) -> IndexMap<String, Vec<f64>>
where
    K: Fn(&R) -> &str,
    V: Fn(&R) -> f64,
{
    let mut groups = domain
        .resolve(records, &key)
        .into_iter()
        .map(|label| (label, vec![]))
        .collect::<IndexMap<_, _>>();

    let mut excluded = 0;
    for record in records {
        let Some(values) = groups.get_mut(key(record)) else {
            excluded += 1;
            continue;
        };
        let v = value(record);
        if v.is_finite() {
            values.push(v);
        }
    }
    if excluded > 0 {
        tracing::debug!(excluded, "records outside the group domain");
    }
    groups
}

/// Mean of a numeric field within one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMean {
    pub key: String,
    /// Finite values averaged.
    pub count: usize,
    pub mean: Result<f64, StatsError>,
}

/// Arithmetic mean of the finite values of each group, in domain order.
///
/// A group without finite values reports [`StatsError::EmptyGroup`].
pub fn mean_by<R, K, V>(records: &[R], key: K, domain: &KeyDomain, value: V) -> Vec<GroupMean>
where
    K: Fn(&R) -> &str,
    V: Fn(&R) -> f64,
{
    values_by(records, key, domain, value)
        .into_iter()
        .map(|(key, values)| GroupMean {
            count: values.len(),
            mean: descriptive::mean(values),
            key,
        })
        .collect()
}

/// Group identity: one or two categorical values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GroupKey {
    pub primary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
}

/// Sub-category counts of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub key: GroupKey,
    /// One entry per sub-category, in sub-category order.
    pub counts: IndexMap<String, usize>,
    /// Records matching the group key.
    pub group_size: usize,
    /// Records of the group whose sub-category is outside the sub-category domain.
    pub unmatched: usize,
}

impl AggregateResult {
    /// Count of one sub-category (0 if it is not part of the domain).
    #[must_use]
    pub fn count(&self, sub_category: &str) -> usize {
        self.counts.get(sub_category).copied().unwrap_or(0)
    }

    /// Sum of all sub-category counts.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Result of [`GroupAggregator::count`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossTab {
    pub primary_domain: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_domain: Option<Vec<String>>,
    pub sub_categories: Vec<String>,
    /// Primary-major order: every secondary value of the first primary, then the next.
    pub results: Vec<AggregateResult>,
    /// Records whose primary or secondary key lies outside its domain.
    pub excluded: usize,
}

impl CrossTab {
    /// Result of one group.
    #[must_use]
    pub fn get(&self, primary: &str, secondary: Option<&str>) -> Option<&AggregateResult> {
        self.results
            .iter()
            .find(|r| r.key.primary == primary && r.key.secondary.as_deref() == secondary)
    }

    /// Largest single sub-category count across all groups.
    #[must_use]
    pub fn max_count(&self) -> usize {
        self.results
            .iter()
            .flat_map(|r| r.counts.values().copied())
            .max()
            .unwrap_or(0)
    }
}

struct Dimension<'k, R> {
    key: KeyFn<'k, R>,
    domain: KeyDomain,
}

/// Counts records per group and sub-category.
///
/// Built from a primary key extractor and domain, optionally refined by a
/// secondary key, and finally given the sub-category extractor together
/// with the enumerated sub-categories every group must report.
pub struct GroupAggregator<'k, R> {
    primary: Dimension<'k, R>,
    secondary: Option<Dimension<'k, R>>,
    sub_category: Option<KeyFn<'k, R>>,
    sub_categories: IndexSet<String>,
}

impl<R> fmt::Debug for GroupAggregator<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupAggregator")
            .field("primary_domain", &self.primary.domain)
            .field(
                "secondary_domain",
                &self.secondary.as_ref().map(|d| &d.domain),
            )
            .field("sub_categories", &self.sub_categories)
            .finish_non_exhaustive()
    }
}

impl<'k, R> GroupAggregator<'k, R> {
    pub fn new<F>(primary: F, domain: KeyDomain) -> Self
    where
        F: Fn(&R) -> &str + 'k,
    {
        Self {
            primary: Dimension {
                key: Box::new(primary),
                domain,
            },
            secondary: None,
            sub_category: None,
            sub_categories: IndexSet::new(),
        }
    }

    /// Splits every primary group further by a secondary key.
    #[must_use]
    pub fn then_by<F>(mut self, secondary: F, domain: KeyDomain) -> Self
    where
        F: Fn(&R) -> &str + 'k,
    {
        self.secondary = Some(Dimension {
            key: Box::new(secondary),
            domain,
        });
        self
    }

    /// Sets the sub-category extractor and the sub-categories to report.
    #[must_use]
    pub fn count_sub_categories<F>(mut self, sub_category: F, sub_categories: Vec<String>) -> Self
    where
        F: Fn(&R) -> &str + 'k,
    {
        self.sub_category = Some(Box::new(sub_category));
        self.sub_categories = sub_categories.into_iter().collect();
        self
    }

    /// Counts `records` in one pass.
    ///
    /// Without a sub-category extractor every result has empty `counts` and
    /// only `group_size` is meaningful.
    pub fn count(&self, records: &[R]) -> CrossTab {
        let primary_domain = self.primary.domain.resolve(records, &self.primary.key);
        let secondary_domain = self
            .secondary
            .as_ref()
            .map(|d| d.domain.resolve(records, &d.key));
        let secondary_len = secondary_domain.as_ref().map_or(1, IndexSet::len);
        let cells = primary_domain.len() * secondary_len;

        let mut counts = vec![vec![0_usize; self.sub_categories.len()]; cells];
        let mut sizes = vec![0_usize; cells];
        let mut unmatched = vec![0_usize; cells];
        let mut excluded = 0;

        for record in records {
            let Some(p) = primary_domain.get_index_of((self.primary.key)(record)) else {
                excluded += 1;
                continue;
            };
            let s = match (&self.secondary, &secondary_domain) {
                (Some(dimension), Some(domain)) => {
                    let Some(s) = domain.get_index_of((dimension.key)(record)) else {
                        excluded += 1;
                        continue;
                    };
                    s
                }
                _ => 0,
            };
            let cell = p * secondary_len + s;
            sizes[cell] += 1;
            if let Some(sub_category) = &self.sub_category {
                match self.sub_categories.get_index_of(sub_category(record)) {
                    Some(i) => counts[cell][i] += 1,
                    None => unmatched[cell] += 1,
                }
            }
        }
        if excluded > 0 {
            tracing::debug!(excluded, "records outside the grouping domains");
        }

        let mut results = Vec::with_capacity(cells);
        for (p, primary) in primary_domain.iter().enumerate() {
            for s in 0..secondary_len {
                let cell = p * secondary_len + s;
                let secondary = secondary_domain
                    .as_ref()
                    .and_then(|domain| domain.get_index(s))
                    .cloned();
                results.push(AggregateResult {
                    key: GroupKey {
                        primary: primary.clone(),
                        secondary,
                    },
                    counts: self
                        .sub_categories
                        .iter()
                        .cloned()
                        .zip(counts[cell].iter().copied())
                        .collect(),
                    group_size: sizes[cell],
                    unmatched: unmatched[cell],
                });
            }
        }

        CrossTab {
            primary_domain: primary_domain.into_iter().collect(),
            secondary_domain: secondary_domain.map(|d| d.into_iter().collect()),
            sub_categories: self.sub_categories.iter().cloned().collect(),
            results,
            excluded,
        }
    }
}

/// Counts sub-categories per primary group.
pub fn count_by<R, P, S>(
    records: &[R],
    primary: P,
    primary_domain: KeyDomain,
    sub_category: S,
    sub_categories: Vec<String>,
) -> CrossTab
where
    P: Fn(&R) -> &str,
    S: Fn(&R) -> &str,
{
    GroupAggregator::new(primary, primary_domain)
        .count_sub_categories(sub_category, sub_categories)
        .count(records)
}

/// Counts sub-categories per primary × secondary group.
pub fn cross_count_by<R, P, Q, S>(
    records: &[R],
    primary: P,
    primary_domain: KeyDomain,
    secondary: Q,
    secondary_domain: KeyDomain,
    sub_category: S,
    sub_categories: Vec<String>,
) -> CrossTab
where
    P: Fn(&R) -> &str,
    Q: Fn(&R) -> &str,
    S: Fn(&R) -> &str,
{
    GroupAggregator::new(primary, primary_domain)
        .then_by(secondary, secondary_domain)
        .count_sub_categories(sub_category, sub_categories)
        .count(records)
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _, seq::IndexedRandom as _};
    use rand_pcg::Pcg32;

    use super::*;

    #[derive(Debug)]
    struct Row {
        country: &'static str,
        condition: &'static str,
        stress: &'static str,
        score: f64,
    }

    fn row(country: &'static str, condition: &'static str, stress: &'static str, score: f64) -> Row {
        Row {
            country,
            condition,
            stress,
            score,
        }
    }

    fn stress_levels() -> Vec<String> {
        ["Low", "Moderate", "High"].map(String::from).to_vec()
    }

    #[test]
    fn test_explicit_zero_counts() {
        let rows = [
            row("Japan", "None", "Low", 1.0),
            row("Japan", "None", "Low", 2.0),
            row("Japan", "None", "Moderate", 3.0),
        ];
        let table = count_by(
            &rows,
            |r| r.country,
            KeyDomain::Observed,
            |r| r.stress,
            stress_levels(),
        );

        assert_eq!(table.results.len(), 1);
        let result = &table.results[0];
        assert_eq!(
            result.counts.iter().map(|(k, &v)| (k.as_str(), v)).collect::<Vec<_>>(),
            [("Low", 2), ("Moderate", 1), ("High", 0)]
        );
        assert_eq!(result.group_size, 3);
        assert_eq!(table.max_count(), 2);
    }

    #[test]
    fn test_fixed_domains_materialize_empty_cells() {
        let rows = [
            row("Japan", "Anxiety", "High", 1.0),
            row("Brazil", "None", "Low", 2.0),
            row("Chile", "None", "Low", 3.0),
        ];
        let table = cross_count_by(
            &rows,
            |r| r.country,
            KeyDomain::fixed(["Brazil", "Japan"]),
            |r| r.condition,
            KeyDomain::fixed(["None", "Anxiety"]),
            |r| r.stress,
            stress_levels(),
        );

        assert_eq!(table.results.len(), 4);
        assert_eq!(table.excluded, 1);
        let empty = table.get("Brazil", Some("Anxiety")).unwrap();
        assert_eq!(empty.group_size, 0);
        assert_eq!(empty.counts.len(), 3);
        assert_eq!(empty.total(), 0);
        assert_eq!(table.get("Japan", Some("Anxiety")).unwrap().count("High"), 1);
        assert_eq!(
            table
                .results
                .iter()
                .map(|r| (r.key.primary.as_str(), r.key.secondary.as_deref()))
                .collect::<Vec<_>>(),
            [
                ("Brazil", Some("None")),
                ("Brazil", Some("Anxiety")),
                ("Japan", Some("None")),
                ("Japan", Some("Anxiety")),
            ]
        );
    }

    #[test]
    fn test_unmatched_sub_category_is_reported() {
        let rows = [
            row("Japan", "None", "Low", 1.0),
            row("Japan", "None", "Unknown", 1.0),
        ];
        let table = GroupAggregator::new(|r: &Row| r.country, KeyDomain::Observed)
            .count_sub_categories(|r: &Row| r.stress, stress_levels())
            .count(&rows);
        let result = &table.results[0];
        assert_eq!(result.total(), 1);
        assert_eq!(result.unmatched, 1);
        assert_eq!(result.total() + result.unmatched, result.group_size);
    }

    #[test]
    fn test_sorted_observed_domain() {
        let rows = [
            row("Japan", "None", "Low", 1.0),
            row("Brazil", "None", "Low", 1.0),
            row("Canada", "None", "Low", 1.0),
            row("Brazil", "None", "Low", 1.0),
        ];
        let table = GroupAggregator::new(|r: &Row| r.country, KeyDomain::ObservedSorted)
            .count(&rows);
        assert_eq!(table.primary_domain, ["Brazil", "Canada", "Japan"]);
        assert_eq!(table.results[0].group_size, 2);
    }

    #[test]
    fn test_counts_partition_random_records() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let countries = ["Japan", "Brazil", "Canada", "India"];
        let conditions = ["None", "Anxiety", "Depression"];
        let stress = ["Low", "Moderate", "High", "Unknown"];
        let rows = (0..1000)
            .map(|_| {
                row(
                    *countries.choose(&mut rng).unwrap(),
                    *conditions.choose(&mut rng).unwrap(),
                    *stress.choose(&mut rng).unwrap(),
                    rng.random_range(0.0..10.0),
                )
            })
            .collect::<Vec<_>>();

        let table = GroupAggregator::new(|r: &Row| r.country, KeyDomain::ObservedSorted)
            .then_by(|r: &Row| r.condition, KeyDomain::Observed)
            .count_sub_categories(|r: &Row| r.stress, stress_levels())
            .count(&rows);

        assert_eq!(table.excluded, 0);
        assert_eq!(table.results.len(), countries.len() * conditions.len());
        for result in &table.results {
            let expected = rows
                .iter()
                .filter(|r| {
                    r.country == result.key.primary
                        && Some(r.condition) == result.key.secondary.as_deref()
                })
                .count();
            assert_eq!(result.group_size, expected);
            assert_eq!(result.total() + result.unmatched, result.group_size);
        }
        let sizes = table.results.iter().map(|r| r.group_size).sum::<usize>();
        assert_eq!(sizes, rows.len());
    }

    #[test]
    fn test_group_by_partitions_exactly() {
        let rows = [
            row("Japan", "None", "Low", 1.0),
            row("Brazil", "None", "High", 2.0),
            row("Japan", "None", "High", 3.0),
        ];
        let groups = group_by(&rows, |r| r.country);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["Japan"].len(), 2);
        assert_eq!(groups.values().map(Vec::len).sum::<usize>(), rows.len());
    }

    #[test]
    fn test_values_and_means_skip_non_finite() {
        let rows = [
            row("Japan", "None", "Low", 4.0),
            row("Japan", "None", "Low", f64::NAN),
            row("Japan", "None", "Low", 6.0),
            row("Brazil", "None", "Low", f64::NAN),
        ];
        let domain = KeyDomain::fixed(["Japan", "Brazil", "Chile"]);
        let values = values_by(&rows, |r: &Row| r.country, &domain, |r| r.score);
        assert_eq!(values["Japan"], [4.0, 6.0]);
        assert!(values["Brazil"].is_empty());
        assert!(values["Chile"].is_empty());

        let means = mean_by(&rows, |r: &Row| r.country, &domain, |r| r.score);
        assert_eq!(means[0].mean, Ok(5.0));
        assert_eq!(means[0].count, 2);
        assert_eq!(means[1].mean, Err(StatsError::EmptyGroup));
    }
}
