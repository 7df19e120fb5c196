//! # Grouped aggregation engine
//!
//! Tallies molecules by category while crediting each molecule **at most once per group**.
//!
//! ## Model
//!
//! An aggregation is the combination of:
//!
//! - a [`GroupingDimension`]: the set of known group keys, and for each molecule the keys it
//!   relates to (e.g. the source types of its sources, or its wavelength bands);
//! - a [`Contribution`]: what a molecule adds to each group it belongs to (a count of one, a
//!   numeric attribute, a structural tally, its id).
//!
//! For every molecule, [`aggregate`] collects the related keys, reduces them to the **set** of
//! distinct keys, then adds the contribution once to each of those groups:
//!
//! ```text
//! M2 ── sources ──► [S1: Dark Cloud, S2: SFR, S5: SFR]
//!                      │ map to keys
//!                      ▼
//!                 [Dark Cloud, SFR, SFR]
//!                      │ distinct
//!                      ▼
//!                 {Dark Cloud, SFR} ──► +1 Dark Cloud, +1 SFR
//! ```
//!
//! ## Policies
//!
//! - Every known key is present in the output, possibly with an empty accumulator.
//! - A molecule relating to no key contributes nowhere; this is not an error.
//! - Multi-group membership and per-group de-duplication hold at the same time.
//! - [`aggregate_parallel`] tallies two dimensions in one pass with **independent** per-molecule
//!   key sets; [`aggregate_joint`] nests one dimension inside another.
//! - Accumulators are local to each call. Calling twice on the same catalog gives identical
//!   results.
//!
//! ## Post-processing
//!
//! Numeric collections can be sorted ([`GroupedTally::sorted`]) and outlier-trimmed
//! ([`GroupedTally::trimmed`], [`trim_outliers`]). Trimming drops `ceil(n × fraction)` values
//! from each end of a group, but only when at least one value survives; smaller groups are
//! returned sorted and otherwise untouched.
//!
//! ## See also
//! ------------
//! * [`dimensions`] – Built-in grouping dimensions.
//! * [`reports`] – The report catalogue built on this engine.
pub mod dimensions;
pub mod reports;

use std::collections::BTreeMap;
use std::fmt::Debug;

use smallvec::SmallVec;
use tracing::debug;

use crate::catalog::Catalog;
use crate::constants::MoleculeId;
use crate::molecules::{Molecule, StructuralKind};

/// Keys related to one molecule, before de-duplication.
pub type RelatedKeys<K> = SmallVec<[K; 8]>;

/// A way of partitioning (non-exclusively) molecules into groups.
pub trait GroupingDimension {
    type Key: Ord + Clone + Debug;

    /// Every group reported by this dimension, even when empty.
    fn known_keys(&self, catalog: &Catalog) -> Vec<Self::Key>;

    /// Keys the molecule belongs to. Repetitions are allowed; the engine removes them.
    fn related_keys(&self, catalog: &Catalog, molecule: &Molecule) -> RelatedKeys<Self::Key>;
}

/// What a molecule adds to the accumulator of each group it belongs to.
pub trait Contribution {
    type Acc: Default + Clone + Debug;

    fn contribute(&self, id: MoleculeId, molecule: &Molecule, acc: &mut Self::Acc);
}

// -------------------------------------------------------------------------------------------------
// Contributions
// -------------------------------------------------------------------------------------------------

/// Count one per molecule.
#[derive(Debug, Clone, Copy, Default)]
pub struct Count;

impl Contribution for Count {
    type Acc = usize;

    fn contribute(&self, _id: MoleculeId, _molecule: &Molecule, acc: &mut usize) {
        *acc += 1;
    }
}

/// Count one per molecule accepted by a predicate.
#[derive(Debug, Clone, Copy)]
pub struct CountWhere<F>(pub F);

impl<F> Contribution for CountWhere<F>
where
    F: Fn(&Molecule) -> bool,
{
    type Acc = usize;

    fn contribute(&self, _id: MoleculeId, molecule: &Molecule, acc: &mut usize) {
        if (self.0)(molecule) {
            *acc += 1;
        }
    }
}

/// Collect a numeric attribute. `None` means the molecule adds nothing.
#[derive(Debug, Clone, Copy)]
pub struct Collect<F>(pub F);

impl<F> Contribution for Collect<F>
where
    F: Fn(&Molecule) -> Option<f64>,
{
    type Acc = Vec<f64>;

    fn contribute(&self, _id: MoleculeId, molecule: &Molecule, acc: &mut Vec<f64>) {
        if let Some(value) = (self.0)(molecule) {
            acc.push(value);
        }
    }
}

/// Collect molecule ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectIds;

impl Contribution for CollectIds {
    type Acc = Vec<MoleculeId>;

    fn contribute(&self, id: MoleculeId, _molecule: &Molecule, acc: &mut Vec<MoleculeId>) {
        acc.push(id);
    }
}

/// Per-kind counts of structural flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StructuralCounts([usize; 7]);

impl StructuralCounts {
    pub fn get(&self, kind: StructuralKind) -> usize {
        self.0[kind.index()]
    }

    /// Counts for neutral, cation, anion, radical and cyclic, in that order.
    pub fn tallied(&self) -> [usize; 5] {
        StructuralKind::TALLIED.map(|k| self.get(k))
    }
}

/// Add one to every structural kind flagged on the molecule.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralTally;

impl Contribution for StructuralTally {
    type Acc = StructuralCounts;

    fn contribute(&self, _id: MoleculeId, molecule: &Molecule, acc: &mut StructuralCounts) {
        for kind in molecule.flags().kinds() {
            acc.0[kind.index()] += 1;
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Result container
// -------------------------------------------------------------------------------------------------

/// Group key → accumulator, in key order.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedTally<K: Ord, A> {
    groups: BTreeMap<K, A>,
}

impl<K: Ord, A> Default for GroupedTally<K, A> {
    fn default() -> Self {
        GroupedTally {
            groups: BTreeMap::new(),
        }
    }
}

impl<K: Ord, A> GroupedTally<K, A> {
    fn with_keys(keys: impl IntoIterator<Item = K>) -> Self
    where
        A: Default,
    {
        GroupedTally {
            groups: keys.into_iter().map(|k| (k, A::default())).collect(),
        }
    }

    pub fn get(&self, key: &K) -> Option<&A> {
        self.groups.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &A)> {
        self.groups.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.groups.keys()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<K, A> {
        self.groups
    }

    /// Transform every accumulator, keeping the keys.
    pub fn map<B>(self, mut f: impl FnMut(&K, A) -> B) -> GroupedTally<K, B> {
        GroupedTally {
            groups: self
                .groups
                .into_iter()
                .map(|(k, a)| {
                    let b = f(&k, a);
                    (k, b)
                })
                .collect(),
        }
    }
}

impl<K: Ord + Debug> GroupedTally<K, Vec<f64>> {
    /// Sort every group ascending.
    pub fn sorted(self) -> Self {
        self.map(|_, mut values| {
            values.sort_by(f64::total_cmp);
            values
        })
    }

    /// Sort every group and drop `ceil(n × fraction)` values from each end.
    ///
    /// See [`trim_outliers`] for the small-group rule.
    pub fn trimmed(self, fraction: f64) -> Self {
        self.map(|key, mut values| {
            let before = values.len();
            trim_outliers(&mut values, fraction);
            debug!(group = ?key, before, after = values.len(), "outliers trimmed");
            values
        })
    }
}

impl<K: Ord> GroupedTally<K, usize> {
    pub fn count(&self, key: &K) -> usize {
        self.groups.get(key).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.groups.values().sum()
    }
}

impl<K: Ord, A> FromIterator<(K, A)> for GroupedTally<K, A> {
    fn from_iter<T: IntoIterator<Item = (K, A)>>(iter: T) -> Self {
        GroupedTally {
            groups: iter.into_iter().collect(),
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Engine
// -------------------------------------------------------------------------------------------------

/// Reduce related keys to the set of distinct keys.
fn distinct<K: Ord>(mut keys: RelatedKeys<K>) -> RelatedKeys<K> {
    keys.sort();
    keys.dedup();
    keys
}

/// Tally the catalog along one dimension.
///
/// Arguments
/// -----------------
/// * `catalog`: The finalized catalog.
/// * `dimension`: The grouping dimension.
/// * `contribution`: What each molecule adds to each of its groups.
///
/// Return
/// ----------
/// * One accumulator per known key (plus any related key the dimension did not announce),
///   where each molecule contributed at most once per group.
pub fn aggregate<D, C>(
    catalog: &Catalog,
    dimension: &D,
    contribution: &C,
) -> GroupedTally<D::Key, C::Acc>
where
    D: GroupingDimension,
    C: Contribution,
{
    let mut tally = GroupedTally::with_keys(dimension.known_keys(catalog));
    for (id, molecule) in catalog.iter_molecules() {
        for key in distinct(dimension.related_keys(catalog, molecule)) {
            contribution.contribute(id, molecule, tally.groups.entry(key).or_default());
        }
    }
    tally
}

/// Tally the catalog along two dimensions in a single pass.
///
/// Each dimension keeps its own per-molecule key set, so crediting a molecule along one
/// dimension never affects the other.
pub fn aggregate_parallel<D1, D2, C>(
    catalog: &Catalog,
    first: &D1,
    second: &D2,
    contribution: &C,
) -> (GroupedTally<D1::Key, C::Acc>, GroupedTally<D2::Key, C::Acc>)
where
    D1: GroupingDimension,
    D2: GroupingDimension,
    C: Contribution,
{
    let mut first_tally = GroupedTally::with_keys(first.known_keys(catalog));
    let mut second_tally = GroupedTally::with_keys(second.known_keys(catalog));

    for (id, molecule) in catalog.iter_molecules() {
        for key in distinct(first.related_keys(catalog, molecule)) {
            contribution.contribute(id, molecule, first_tally.groups.entry(key).or_default());
        }
        for key in distinct(second.related_keys(catalog, molecule)) {
            contribution.contribute(id, molecule, second_tally.groups.entry(key).or_default());
        }
    }
    (first_tally, second_tally)
}

/// Tally along `outer`, then inside each outer group along `inner`.
///
/// A molecule contributes once to every `(outer, inner)` pair of distinct keys it relates to.
pub fn aggregate_joint<D1, D2, C>(
    catalog: &Catalog,
    outer: &D1,
    inner: &D2,
    contribution: &C,
) -> GroupedTally<D1::Key, GroupedTally<D2::Key, C::Acc>>
where
    D1: GroupingDimension,
    D2: GroupingDimension,
    C: Contribution,
{
    let inner_keys = inner.known_keys(catalog);
    let mut tally: GroupedTally<D1::Key, GroupedTally<D2::Key, C::Acc>> = outer
        .known_keys(catalog)
        .into_iter()
        .map(|k| (k, GroupedTally::with_keys(inner_keys.iter().cloned())))
        .collect();

    for (id, molecule) in catalog.iter_molecules() {
        let inner_related = distinct(inner.related_keys(catalog, molecule));
        if inner_related.is_empty() {
            continue;
        }
        for outer_key in distinct(outer.related_keys(catalog, molecule)) {
            let sub = tally
                .groups
                .entry(outer_key)
                .or_insert_with(|| GroupedTally::with_keys(inner_keys.iter().cloned()));
            for inner_key in inner_related.iter().cloned() {
                contribution.contribute(id, molecule, sub.groups.entry(inner_key).or_default());
            }
        }
    }
    tally
}

/// Sort `values` ascending and drop `ceil(n × fraction)` entries from each end.
///
/// Nothing is dropped when that would leave the collection empty (`n − 2k < 1`), so groups of
/// zero, one or two values are only sorted. A fraction of zero only sorts.
///
/// Arguments
/// -----------------
/// * `values`: The collection, trimmed in place.
/// * `fraction`: Fraction of values dropped at each end, in `[0, 0.5)`. Values outside
///   `[0, 0.5]` are clamped and NaN counts as zero, so no fraction can panic.
pub fn trim_outliers(values: &mut Vec<f64>, fraction: f64) {
    values.sort_by(f64::total_cmp);

    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 0.5)
    };
    let n = values.len();
    // absorb representation error, e.g. 30 × 0.1 = 3.0000000000000004
    let k = ((n as f64) * fraction - 1e-9).ceil().max(0.0) as usize;
    if k == 0 || n <= k.saturating_mul(2) {
        return;
    }
    values.truncate(n - k);
    values.drain(..k);
}

#[cfg(test)]
mod aggregation_test {
    use super::*;

    #[test]
    fn test_trim_ten_values() {
        let mut values: Vec<f64> = (1..=10).rev().map(f64::from).collect();
        trim_outliers(&mut values, 0.1);
        assert_eq!(values, (2..=9).map(f64::from).collect::<Vec<_>>());
    }

    #[test]
    fn test_trim_small_groups_untouched() {
        let mut empty: Vec<f64> = vec![];
        trim_outliers(&mut empty, 0.1);
        assert!(empty.is_empty());

        let mut one = vec![4.0];
        trim_outliers(&mut one, 0.1);
        assert_eq!(one, vec![4.0]);

        let mut two = vec![9.0, 1.0];
        trim_outliers(&mut two, 0.1);
        assert_eq!(two, vec![1.0, 9.0]);

        let mut three = vec![3.0, 1.0, 2.0];
        trim_outliers(&mut three, 0.1);
        assert_eq!(three, vec![2.0]);
    }

    #[test]
    fn test_trim_avoids_float_overshoot() {
        let mut values: Vec<f64> = (1..=30).map(f64::from).collect();
        trim_outliers(&mut values, 0.1);
        assert_eq!(values.len(), 24);
        assert_eq!(values.first(), Some(&4.0));
        assert_eq!(values.last(), Some(&27.0));
    }

    #[test]
    fn test_trim_zero_fraction_only_sorts() {
        let mut values = vec![2.0, 1.0, 3.0];
        trim_outliers(&mut values, 0.0);
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_trim_out_of_range_fraction() {
        let sorted: Vec<f64> = (1..=10).map(f64::from).collect();
        for fraction in [1e300, f64::INFINITY, 0.5, -3.0, f64::NAN] {
            let mut values: Vec<f64> = (1..=10).rev().map(f64::from).collect();
            trim_outliers(&mut values, fraction);
            assert_eq!(values, sorted, "fraction {fraction}");
        }
    }

    #[test]
    fn test_distinct_keys() {
        let keys: RelatedKeys<u8> = smallvec::smallvec![3, 1, 3, 3, 2, 1];
        assert_eq!(distinct(keys).as_slice(), &[1, 2, 3]);
    }
}
