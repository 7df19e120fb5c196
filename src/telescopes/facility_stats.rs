//! # Temporal and facility statistics
//!
//! Detection histories over discovery years, and per-facility credit restricted to each
//! facility's [active window](crate::telescopes::ActiveWindow).
//!
//! ## Crediting rule
//!
//! A molecule discovered in year `Y` counts for a telescope only if the molecule lists the
//! telescope **and** `Y` lies in the telescope's active window intersected with the requested
//! reporting period. An open window ends at the evaluation year given by [`EvaluationEnv`],
//! resolved on every call.
//!
//! ## Shares
//!
//! [`facility_share`] divides a facility's credited detections by the total number of catalog
//! detections in the same period. A molecule usually lists several telescopes, so shares across
//! facilities do **not** sum to one. An empty period yields `None` instead of a division by zero.
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::aggregation::dimensions::{AtomBucket, ByAtomCount, ByYear};
use crate::aggregation::{aggregate, aggregate_joint, Contribution, Count, GroupedTally};
use crate::astromol_errors::AstromolError;
use crate::catalog::Catalog;
use crate::constants::{MoleculeId, TelescopeId, Year};
use crate::env_state::EvaluationEnv;
use crate::molecules::Molecule;
use crate::report_params::ReportParams;

/// Collect discovery years.
#[derive(Debug, Clone, Copy, Default)]
struct CollectYears;

impl Contribution for CollectYears {
    type Acc = Vec<Year>;

    fn contribute(&self, _id: MoleculeId, molecule: &Molecule, acc: &mut Vec<Year>) {
        acc.push(molecule.year());
    }
}

fn running_total(tally: GroupedTally<Year, usize>) -> GroupedTally<Year, usize> {
    let mut total = 0;
    tally.map(|_, n| {
        total += n;
        total
    })
}

/// Number of molecules discovered each year, from the first to the last discovery year.
pub fn detections_per_year(catalog: &Catalog) -> GroupedTally<Year, usize> {
    aggregate(catalog, &ByYear, &Count)
}

/// Number of molecules discovered up to and including each year.
pub fn cumulative_detections_per_year(catalog: &Catalog) -> GroupedTally<Year, usize> {
    running_total(detections_per_year(catalog))
}

/// Cumulative discoveries per year, split by atom-count bucket.
///
/// Arguments
/// -----------------
/// * `catalog`: The finalized catalog.
/// * `params`: `max_resolved_atoms` sets the last exact bucket; larger molecules share one.
///
/// Return
/// ----------
/// * Year → bucket → number of molecules in that bucket discovered up to that year. A bucket
///   that appears in any earlier year stays in every later row.
pub fn cumulative_detections_by_atoms(
    catalog: &Catalog,
    params: &ReportParams,
) -> GroupedTally<Year, GroupedTally<AtomBucket, usize>> {
    let buckets = ByAtomCount::new(params.max_resolved_atoms);
    let per_year = aggregate_joint(catalog, &ByYear, &buckets, &Count);

    let mut running: BTreeMap<AtomBucket, usize> = BTreeMap::new();
    per_year.map(|_, counts| {
        for (bucket, n) in counts.into_inner() {
            *running.entry(bucket).or_insert(0) += n;
        }
        running.iter().map(|(bucket, n)| (*bucket, *n)).collect()
    })
}

/// Discovery years of the molecules in each atom-count bucket, in registry order.
pub fn discovery_years_by_atoms(
    catalog: &Catalog,
    params: &ReportParams,
) -> GroupedTally<AtomBucket, Vec<Year>> {
    aggregate(
        catalog,
        &ByAtomCount::new(params.max_resolved_atoms),
        &CollectYears,
    )
}

/// Molecules discovered within `period`.
pub fn total_detections(catalog: &Catalog, period: &RangeInclusive<Year>) -> usize {
    catalog
        .molecules()
        .iter()
        .filter(|m| period.contains(&m.year()))
        .count()
}

/// Detections credited to a telescope within a period.
///
/// Arguments
/// -----------------
/// * `catalog`: The finalized catalog.
/// * `telescope`: The facility.
/// * `period`: Inclusive reporting range of discovery years.
/// * `env`: Resolves the end of an open active window.
///
/// Return
/// ----------
/// * The number of molecules listing the telescope whose discovery year lies in the active
///   window intersected with `period`.
///
/// Errors
/// ----------
/// * [`AstromolError::TelescopeNotFound`] for an unknown id, or a clock error.
pub fn facility_detections(
    catalog: &Catalog,
    telescope: TelescopeId,
    period: &RangeInclusive<Year>,
    env: &EvaluationEnv,
) -> Result<usize, AstromolError> {
    let window = catalog.telescope(telescope)?.window;
    let Some(creditable) = window.intersect(period, env)? else {
        return Ok(0);
    };

    let mut count = 0;
    for id in catalog.molecules_from_telescope(telescope)? {
        if creditable.contains(&catalog.molecule(*id)?.year()) {
            count += 1;
        }
    }
    Ok(count)
}

/// Fraction of the period's detections credited to a facility.
///
/// Return
/// ----------
/// * `Ok(None)` when no molecule was discovered in `period`; otherwise the share in `[0, 1]`.
pub fn facility_share(
    catalog: &Catalog,
    telescope: TelescopeId,
    period: &RangeInclusive<Year>,
    env: &EvaluationEnv,
) -> Result<Option<f64>, AstromolError> {
    let credited = facility_detections(catalog, telescope, period, env)?;
    Ok(match total_detections(catalog, period) {
        0 => None,
        total => Some(credited as f64 / total as f64),
    })
}

/// Share of every facility for the same period.
pub fn facility_shares(
    catalog: &Catalog,
    period: &RangeInclusive<Year>,
    env: &EvaluationEnv,
) -> Result<GroupedTally<TelescopeId, Option<f64>>, AstromolError> {
    catalog
        .telescope_ids()
        .map(|id| facility_share(catalog, id, period, env).map(|share| (id, share)))
        .collect()
}

/// Cumulative credited detections per year, for every facility with more than
/// `params.min_facility_detections` detections overall.
///
/// Return
/// ----------
/// * Facility → `(year, detections credited up to that year)` for each year of `period`.
pub fn cumulative_detections_by_facility(
    catalog: &Catalog,
    period: &RangeInclusive<Year>,
    params: &ReportParams,
    env: &EvaluationEnv,
) -> Result<GroupedTally<TelescopeId, Vec<(Year, usize)>>, AstromolError> {
    let mut rows = Vec::new();
    for telescope in catalog.telescope_ids() {
        if catalog.telescope_detections(telescope)? <= params.min_facility_detections {
            continue;
        }
        let window = catalog.telescope(telescope)?.window.resolve(env)?;

        let mut years = Vec::new();
        for id in catalog.molecules_from_telescope(telescope)? {
            let year = catalog.molecule(*id)?.year();
            if window.contains(&year) {
                years.push(year);
            }
        }

        let mut total = 0;
        let history: Vec<(Year, usize)> = period
            .clone()
            .map(|year| {
                total += years.iter().filter(|y| **y == year).count();
                (year, total)
            })
            .collect();
        rows.push((telescope, history));
    }
    Ok(rows.into_iter().collect())
}

#[cfg(test)]
mod facility_stats_test {
    use super::*;
    use crate::catalog::CatalogBuilder;
    use crate::molecules::{Composition, Element, MoleculeRecord};
    use crate::telescopes::{ActiveWindow, Telescope, TelescopeType};

    fn diatomic(year: Year, telescopes: &[TelescopeId]) -> MoleculeRecord {
        let comp = Composition::new().with(Element::C, 1).with(Element::S, 1);
        MoleculeRecord::new("carbon monosulfide", "CS", year, comp)
            .with_telescopes(telescopes.iter().copied())
    }

    #[test]
    fn test_cumulative_keeps_buckets_missing_later() {
        let mut b = CatalogBuilder::new();
        let argon = Composition::new().with(Element::Ar, 1);
        b.add_molecule(MoleculeRecord::new("argon", "Ar", 2000, argon)).unwrap();
        b.add_molecule(diatomic(2001, &[])).unwrap();
        let catalog = b.build();

        let rows = cumulative_detections_by_atoms(&catalog, &ReportParams::default());
        let first = rows.get(&2000).unwrap();
        assert_eq!(first.count(&AtomBucket::Exactly(1)), 1);
        assert_eq!(first.count(&AtomBucket::Exactly(2)), 0);

        let second = rows.get(&2001).unwrap();
        assert_eq!(second.count(&AtomBucket::Exactly(1)), 1);
        assert_eq!(second.count(&AtomBucket::Exactly(2)), 1);
        assert_eq!(second.total(), 2);
    }

    #[test]
    fn test_decommissioned_facility_not_credited() {
        let mut b = CatalogBuilder::new();
        let old = b
            .add_telescope(Telescope::new(
                "NRAO 36-ft",
                TelescopeType::SingleDish,
                ActiveWindow::new(1968, Some(1984)).unwrap(),
            ))
            .unwrap();
        b.add_molecule(diatomic(1985, &[old])).unwrap();
        b.add_molecule(diatomic(1984, &[old])).unwrap();
        let catalog = b.build();
        let env = EvaluationEnv::fixed(2020);

        assert_eq!(facility_detections(&catalog, old, &(1900..=2100), &env), Ok(1));
        assert_eq!(facility_share(&catalog, old, &(1985..=1985), &env), Ok(Some(0.0)));
        assert_eq!(facility_share(&catalog, old, &(1950..=1960), &env), Ok(None));
    }

    #[test]
    fn test_open_window_resolved_at_call_time() {
        let mut b = CatalogBuilder::new();
        let alma = b
            .add_telescope(Telescope::new(
                "ALMA",
                TelescopeType::Interferometer,
                ActiveWindow::new(2011, None).unwrap(),
            ))
            .unwrap();
        b.add_molecule(diatomic(2016, &[alma])).unwrap();
        let catalog = b.build();

        let period = 2000..=2030;
        assert_eq!(
            facility_detections(&catalog, alma, &period, &EvaluationEnv::fixed(2015)),
            Ok(0)
        );
        assert_eq!(
            facility_detections(&catalog, alma, &period, &EvaluationEnv::fixed(2016)),
            Ok(1)
        );
    }

    #[test]
    fn test_cumulative_years() {
        let mut b = CatalogBuilder::new();
        for year in [1970, 1970, 1972] {
            b.add_molecule(diatomic(year, &[])).unwrap();
        }
        let catalog = b.build();

        let per_year = detections_per_year(&catalog);
        assert_eq!(per_year.keys().copied().collect::<Vec<_>>(), vec![1970, 1971, 1972]);
        assert_eq!(per_year.count(&1971), 0);

        let cumulative = cumulative_detections_per_year(&catalog);
        assert_eq!(cumulative.count(&1970), 2);
        assert_eq!(cumulative.count(&1971), 2);
        assert_eq!(cumulative.count(&1972), 3);
    }

    #[test]
    fn test_unknown_telescope() {
        let catalog = CatalogBuilder::new().build();
        assert_eq!(
            facility_detections(
                &catalog,
                TelescopeId(0),
                &(1900..=2000),
                &EvaluationEnv::fixed(2000)
            ),
            Err(AstromolError::TelescopeNotFound(TelescopeId(0)))
        );
        assert!(detections_per_year(&catalog).is_empty());
    }
}
