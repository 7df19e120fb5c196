//! # Report catalogue
//!
//! Ready-made aggregations consumed by table and plot formatters. Every report is a pure
//! function of a finalized [`Catalog`] (and, where relevant, [`ReportParams`]); calling one twice
//! returns the same value.
//!
//! ## Per source type
//!
//! | Report | Output | Filter | Post-processing |
//! |---|---|---|---|
//! | [`molecules_per_source_type`] | count | none | none |
//! | [`molecule_ids_per_source_type`] | ids | none | registry order |
//! | [`structural_types_per_source_type`] | [`StructuralCounts`] | none | none |
//! | [`wavelengths_per_source_type`] | nested count | none | none |
//! | [`du_per_source_type`] | DU values | `du < du_ceiling` | sorted, trimmed if `trim_du_reports` |
//! | [`relative_du_per_source_type`] | relative DU | `du < du_ceiling` | sorted, trimmed if `trim_du_reports` |
//! | [`mass_per_source_type`] | masses | `C < max_carbon` | sorted, trimmed |
//! | [`atoms_per_source_type`] | atom counts | `natoms < max_natoms` | sorted, trimmed |
//! | [`mass_per_atom_per_source_type`] | mass / natoms | `natoms < max_natoms` | sorted, trimmed |
//!
//! The DU trimming switch exists because the census trims mass and atom-count collections but
//! not the DU ones. Both behaviours are available; neither is silently chosen for the caller.
//!
//! ## Other dimensions
//!
//! Element, structural kind, wavelength band, mass bucket, individual source (LOS clouds
//! lumped), external galaxy and environment tallies, plus flat DU lists.
use crate::catalog::Catalog;
use crate::constants::{Mass, MoleculeId};
use crate::molecules::{Detection, Element, Environment, Molecule, StructuralKind};
use crate::report_params::ReportParams;
use crate::sources::SourceType;
use crate::telescopes::Wavelength;

use super::dimensions::{
    ByElement, ByEnvironment, ByExternalGalaxy, ByMassBucket, BySourceLumpingLos, BySourceType,
    ByStructuralKind, ByWavelength, MassBucket, SourceGroup,
};
use super::{
    aggregate, aggregate_joint, aggregate_parallel, Collect, CollectIds, Count, GroupedTally,
    StructuralCounts, StructuralTally,
};

// -------------------------------------------------------------------------------------------------
// Per source type
// -------------------------------------------------------------------------------------------------

pub fn molecules_per_source_type(catalog: &Catalog) -> GroupedTally<SourceType, usize> {
    aggregate(catalog, &BySourceType, &Count)
}

pub fn molecule_ids_per_source_type(
    catalog: &Catalog,
) -> GroupedTally<SourceType, Vec<MoleculeId>> {
    aggregate(catalog, &BySourceType, &CollectIds)
}

pub fn structural_types_per_source_type(
    catalog: &Catalog,
) -> GroupedTally<SourceType, StructuralCounts> {
    aggregate(catalog, &BySourceType, &StructuralTally)
}

/// Source type → wavelength band → number of molecules.
pub fn wavelengths_per_source_type(
    catalog: &Catalog,
) -> GroupedTally<SourceType, GroupedTally<Wavelength, usize>> {
    aggregate_joint(catalog, &BySourceType, &ByWavelength, &Count)
}

/// Molecule counts per source type and per wavelength band, tallied in the same pass.
pub fn source_types_and_wavelengths(
    catalog: &Catalog,
) -> (GroupedTally<SourceType, usize>, GroupedTally<Wavelength, usize>) {
    aggregate_parallel(catalog, &BySourceType, &ByWavelength, &Count)
}

fn du_below_ceiling(molecule: &Molecule, ceiling: f64) -> Option<f64> {
    molecule.du().filter(|du| *du < ceiling)
}

fn finish(
    tally: GroupedTally<SourceType, Vec<f64>>,
    trim: bool,
    fraction: f64,
) -> GroupedTally<SourceType, Vec<f64>> {
    if trim {
        tally.trimmed(fraction)
    } else {
        tally.sorted()
    }
}

pub fn du_per_source_type(
    catalog: &Catalog,
    params: &ReportParams,
) -> GroupedTally<SourceType, Vec<f64>> {
    let ceiling = params.du_ceiling;
    let tally = aggregate(
        catalog,
        &BySourceType,
        &Collect(|m: &Molecule| du_below_ceiling(m, ceiling)),
    );
    finish(tally, params.trim_du_reports, params.outlier_fraction)
}

pub fn relative_du_per_source_type(
    catalog: &Catalog,
    params: &ReportParams,
) -> GroupedTally<SourceType, Vec<f64>> {
    let ceiling = params.du_ceiling;
    let tally = aggregate(
        catalog,
        &BySourceType,
        &Collect(|m: &Molecule| {
            du_below_ceiling(m, ceiling)?;
            m.relative_du()
        }),
    );
    finish(tally, params.trim_du_reports, params.outlier_fraction)
}

pub fn mass_per_source_type(
    catalog: &Catalog,
    params: &ReportParams,
) -> GroupedTally<SourceType, Vec<f64>> {
    let max_carbon = params.max_carbon;
    let tally = aggregate(
        catalog,
        &BySourceType,
        &Collect(|m: &Molecule| (m.count(Element::C) < max_carbon).then(|| m.mass() as f64)),
    );
    finish(tally, true, params.outlier_fraction)
}

pub fn atoms_per_source_type(
    catalog: &Catalog,
    params: &ReportParams,
) -> GroupedTally<SourceType, Vec<f64>> {
    let max_natoms = params.max_natoms;
    let tally = aggregate(
        catalog,
        &BySourceType,
        &Collect(|m: &Molecule| (m.natoms() < max_natoms).then(|| f64::from(m.natoms()))),
    );
    finish(tally, true, params.outlier_fraction)
}

pub fn mass_per_atom_per_source_type(
    catalog: &Catalog,
    params: &ReportParams,
) -> GroupedTally<SourceType, Vec<f64>> {
    let max_natoms = params.max_natoms;
    let tally = aggregate(
        catalog,
        &BySourceType,
        &Collect(|m: &Molecule| {
            if m.natoms() < max_natoms {
                m.mass_per_atom()
            } else {
                None
            }
        }),
    );
    finish(tally, true, params.outlier_fraction)
}

// -------------------------------------------------------------------------------------------------
// Other dimensions
// -------------------------------------------------------------------------------------------------

pub fn molecules_per_element(catalog: &Catalog) -> GroupedTally<Element, usize> {
    aggregate(catalog, &ByElement, &Count)
}

/// Number of molecules carrying each structural flag.
pub fn structural_totals(catalog: &Catalog) -> GroupedTally<StructuralKind, usize> {
    aggregate(catalog, &ByStructuralKind, &Count)
}

/// Mass bucket → wavelength band → number of molecules.
pub fn wavelengths_per_mass_bucket(
    catalog: &Catalog,
    params: &ReportParams,
) -> GroupedTally<MassBucket, GroupedTally<Wavelength, usize>> {
    let buckets = ByMassBucket::new(params.mass_bucket_width, params.mass_bucket_cap);
    aggregate_joint(catalog, &buckets, &ByWavelength, &Count)
}

/// Masses of the molecules detected in each band, in registry order.
pub fn mass_per_wavelength(catalog: &Catalog) -> GroupedTally<Wavelength, Vec<f64>> {
    aggregate(
        catalog,
        &ByWavelength,
        &Collect(|m: &Molecule| Some(m.mass() as f64)),
    )
}

/// Atom counts of the molecules detected in each band, in registry order.
pub fn atoms_per_wavelength(catalog: &Catalog) -> GroupedTally<Wavelength, Vec<f64>> {
    aggregate(
        catalog,
        &ByWavelength,
        &Collect(|m: &Molecule| Some(f64::from(m.natoms()))),
    )
}

/// Detections per individual source, with all line-of-sight clouds counted as one group.
pub fn detections_per_source(catalog: &Catalog) -> GroupedTally<SourceGroup, usize> {
    aggregate(catalog, &BySourceLumpingLos, &Count)
}

pub fn detections_per_external_galaxy(catalog: &Catalog) -> GroupedTally<String, usize> {
    aggregate(catalog, &ByExternalGalaxy, &Count)
}

/// Confirmed and tentative detection counts per environment.
pub fn environment_detections(
    catalog: &Catalog,
) -> GroupedTally<(Environment, Detection), usize> {
    aggregate(catalog, &ByEnvironment, &Count)
}

// -------------------------------------------------------------------------------------------------
// Flat lists
// -------------------------------------------------------------------------------------------------

/// `(id, du)` for every molecule with a defined DU and fewer than `max_natoms` atoms.
pub fn du_list(catalog: &Catalog, params: &ReportParams) -> Vec<(MoleculeId, f64)> {
    catalog
        .iter_molecules()
        .filter(|(_, m)| m.natoms() < params.max_natoms)
        .filter_map(|(id, m)| m.du().map(|du| (id, du)))
        .collect()
}

/// `(id, du / max_du)` for every molecule with a defined DU.
pub fn relative_du_list(catalog: &Catalog) -> Vec<(MoleculeId, f64)> {
    catalog
        .iter_molecules()
        .filter_map(|(id, m)| m.relative_du().map(|r| (id, r)))
        .collect()
}

/// `(id, mass, du / max_du)` for every molecule with a defined DU.
pub fn relative_du_vs_mass(catalog: &Catalog) -> Vec<(MoleculeId, Mass, f64)> {
    catalog
        .iter_molecules()
        .filter_map(|(id, m)| m.relative_du().map(|r| (id, m.mass(), r)))
        .collect()
}

/// Number of molecules whose DU is strictly greater than `threshold`.
pub fn count_du_above(catalog: &Catalog, threshold: f64) -> usize {
    catalog
        .molecules()
        .iter()
        .filter(|m| m.du().is_some_and(|du| du > threshold))
        .count()
}
