//! Built-in grouping dimensions.
//!
//! | Dimension | Key | A molecule relates to |
//! |---|---|---|
//! | [`BySourceType`] | [`SourceType`] | the types of its sources |
//! | [`ByWavelength`] | [`Wavelength`] | its detection bands |
//! | [`ByElement`] | [`Element`] | the elements it contains |
//! | [`ByStructuralKind`] | [`StructuralKind`] | its structural flags |
//! | [`ByMassBucket`] | [`MassBucket`] | the bucket holding its mass |
//! | [`ByAtomCount`] | [`AtomBucket`] | the bucket holding its atom count |
//! | [`ByTelescope`] | [`TelescopeId`] | its telescopes |
//! | [`BySourceLumpingLos`] | [`SourceGroup`] | its sources, every LOS cloud folded into one group |
//! | [`ByExternalGalaxy`] | `String` | the external galaxies it was seen in |
//! | [`ByEnvironment`] | `(Environment, Detection)` | its confirmed or tentative environments |
//! | [`ByYear`] | [`Year`] | its discovery year |
use std::collections::BTreeSet;

use smallvec::smallvec;

use crate::catalog::{name_registry::normalize_name, Catalog};
use crate::constants::{AtomCount, Mass, SourceId, TelescopeId, Year};
use crate::molecules::{Detection, Element, Environment, Molecule, StructuralKind};
use crate::sources::SourceType;
use crate::telescopes::Wavelength;

use super::{GroupingDimension, RelatedKeys};

#[derive(Debug, Clone, Copy, Default)]
pub struct BySourceType;

impl GroupingDimension for BySourceType {
    type Key = SourceType;

    fn known_keys(&self, _catalog: &Catalog) -> Vec<SourceType> {
        SourceType::ALL.to_vec()
    }

    fn related_keys(&self, catalog: &Catalog, molecule: &Molecule) -> RelatedKeys<SourceType> {
        molecule
            .sources()
            .iter()
            .filter_map(|s| catalog.source(*s).ok())
            .map(|s| s.source_type)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ByWavelength;

impl GroupingDimension for ByWavelength {
    type Key = Wavelength;

    fn known_keys(&self, _catalog: &Catalog) -> Vec<Wavelength> {
        Wavelength::ALL.to_vec()
    }

    fn related_keys(&self, _catalog: &Catalog, molecule: &Molecule) -> RelatedKeys<Wavelength> {
        molecule.wavelengths().iter().copied().collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ByElement;

impl GroupingDimension for ByElement {
    type Key = Element;

    fn known_keys(&self, _catalog: &Catalog) -> Vec<Element> {
        Element::ALL.to_vec()
    }

    fn related_keys(&self, _catalog: &Catalog, molecule: &Molecule) -> RelatedKeys<Element> {
        molecule.composition().elements().collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ByStructuralKind;

impl GroupingDimension for ByStructuralKind {
    type Key = StructuralKind;

    fn known_keys(&self, _catalog: &Catalog) -> Vec<StructuralKind> {
        StructuralKind::ALL.to_vec()
    }

    fn related_keys(&self, _catalog: &Catalog, molecule: &Molecule) -> RelatedKeys<StructuralKind> {
        molecule.flags().kinds().collect()
    }
}

// -------------------------------------------------------------------------------------------------
// Buckets
// -------------------------------------------------------------------------------------------------

/// Half-open mass interval `[lower, upper)`; `upper == None` is the open-ended last bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MassBucket {
    pub lower: Mass,
    pub upper: Option<Mass>,
}

impl MassBucket {
    pub fn contains(&self, mass: Mass) -> bool {
        mass >= self.lower && self.upper.map_or(true, |u| mass < u)
    }
}

impl std::fmt::Display for MassBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.upper {
            Some(upper) => write!(f, "{}-{}", self.lower, upper),
            None => write!(f, "{}+", self.lower),
        }
    }
}

/// Fixed-width mass buckets from 0 up to `cap`, plus one open bucket from `cap` upwards.
#[derive(Debug, Clone, Copy)]
pub struct ByMassBucket {
    width: Mass,
    cap: Mass,
}

impl ByMassBucket {
    /// `width` must be positive; validated upstream by
    /// [`ReportParamsBuilder::build`](crate::report_params::ReportParamsBuilder::build).
    pub fn new(width: Mass, cap: Mass) -> Self {
        ByMassBucket {
            width: width.max(1),
            cap,
        }
    }

    pub fn bucket_of(&self, mass: Mass) -> MassBucket {
        if mass >= self.cap {
            return MassBucket {
                lower: self.cap,
                upper: None,
            };
        }
        let lower = mass / self.width * self.width;
        MassBucket {
            lower,
            upper: Some(lower.saturating_add(self.width).min(self.cap)),
        }
    }
}

impl GroupingDimension for ByMassBucket {
    type Key = MassBucket;

    fn known_keys(&self, _catalog: &Catalog) -> Vec<MassBucket> {
        (0..self.cap)
            .step_by(self.width as usize)
            .map(|lower| self.bucket_of(lower))
            .chain(std::iter::once(self.bucket_of(self.cap)))
            .collect()
    }

    fn related_keys(&self, _catalog: &Catalog, molecule: &Molecule) -> RelatedKeys<MassBucket> {
        smallvec![self.bucket_of(molecule.mass())]
    }
}

/// Atom-count bucket: exact counts up to a limit, then everything larger together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AtomBucket {
    Exactly(AtomCount),
    Above(AtomCount),
}

impl std::fmt::Display for AtomBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtomBucket::Exactly(n) => write!(f, "{n}"),
            AtomBucket::Above(n) => write!(f, ">{n}"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ByAtomCount {
    max_resolved: AtomCount,
}

impl ByAtomCount {
    pub fn new(max_resolved: AtomCount) -> Self {
        ByAtomCount { max_resolved }
    }

    pub fn bucket_of(&self, natoms: AtomCount) -> AtomBucket {
        if natoms > self.max_resolved {
            AtomBucket::Above(self.max_resolved)
        } else {
            AtomBucket::Exactly(natoms)
        }
    }
}

impl GroupingDimension for ByAtomCount {
    type Key = AtomBucket;

    /// Diatomics upwards; a monatomic entry would still get its own group.
    fn known_keys(&self, _catalog: &Catalog) -> Vec<AtomBucket> {
        (2..=self.max_resolved)
            .map(AtomBucket::Exactly)
            .chain(std::iter::once(AtomBucket::Above(self.max_resolved)))
            .collect()
    }

    fn related_keys(&self, _catalog: &Catalog, molecule: &Molecule) -> RelatedKeys<AtomBucket> {
        smallvec![self.bucket_of(molecule.natoms())]
    }
}

// -------------------------------------------------------------------------------------------------
// Entities
// -------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct ByTelescope;

impl GroupingDimension for ByTelescope {
    type Key = TelescopeId;

    fn known_keys(&self, catalog: &Catalog) -> Vec<TelescopeId> {
        catalog.telescope_ids().collect()
    }

    fn related_keys(&self, _catalog: &Catalog, molecule: &Molecule) -> RelatedKeys<TelescopeId> {
        molecule.telescopes().iter().copied().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceGroup {
    Source(SourceId),
    LosClouds,
}

/// Individual sources, except that every line-of-sight cloud counts as one group.
///
/// A molecule seen toward several LOS clouds adds one to the LOS group, not one per cloud.
#[derive(Debug, Clone, Copy, Default)]
pub struct BySourceLumpingLos;

impl GroupingDimension for BySourceLumpingLos {
    type Key = SourceGroup;

    fn known_keys(&self, catalog: &Catalog) -> Vec<SourceGroup> {
        catalog
            .source_ids()
            .zip(catalog.sources())
            .filter(|(_, s)| s.source_type != SourceType::LosCloud)
            .map(|(id, _)| SourceGroup::Source(id))
            .chain(std::iter::once(SourceGroup::LosClouds))
            .collect()
    }

    fn related_keys(&self, catalog: &Catalog, molecule: &Molecule) -> RelatedKeys<SourceGroup> {
        molecule
            .sources()
            .iter()
            .filter_map(|id| catalog.source(*id).ok().map(|s| (*id, s.source_type)))
            .map(|(id, source_type)| match source_type {
                SourceType::LosCloud => SourceGroup::LosClouds,
                _ => SourceGroup::Source(id),
            })
            .collect()
    }
}

/// External galaxies named on molecules, whitespace-normalized.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByExternalGalaxy;

impl GroupingDimension for ByExternalGalaxy {
    type Key = String;

    fn known_keys(&self, catalog: &Catalog) -> Vec<String> {
        catalog
            .molecules()
            .iter()
            .flat_map(|m| m.external_galaxies().iter().map(|g| normalize_name(g)))
            .filter(|g| !g.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn related_keys(&self, _catalog: &Catalog, molecule: &Molecule) -> RelatedKeys<String> {
        molecule
            .external_galaxies()
            .iter()
            .map(|g| normalize_name(g))
            .filter(|g| !g.is_empty())
            .collect()
    }
}

/// Environments with a confirmed or tentative detection, keyed by `(environment, detection)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByEnvironment;

impl GroupingDimension for ByEnvironment {
    type Key = (Environment, Detection);

    fn known_keys(&self, _catalog: &Catalog) -> Vec<(Environment, Detection)> {
        Environment::ALL
            .iter()
            .flat_map(|e| [(*e, Detection::Confirmed), (*e, Detection::Tentative)])
            .collect()
    }

    fn related_keys(
        &self,
        _catalog: &Catalog,
        molecule: &Molecule,
    ) -> RelatedKeys<(Environment, Detection)> {
        Environment::ALL
            .iter()
            .map(|e| (*e, molecule.environments().get(*e)))
            .filter(|(_, d)| d.is_detected())
            .collect()
    }
}

/// Discovery years, spanning the first to the last year in the catalog without gaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByYear;

impl GroupingDimension for ByYear {
    type Key = Year;

    fn known_keys(&self, catalog: &Catalog) -> Vec<Year> {
        let years = catalog.molecules().iter().map(Molecule::year);
        match (years.clone().min(), years.max()) {
            (Some(first), Some(last)) => (first..=last).collect(),
            _ => Vec::new(),
        }
    }

    fn related_keys(&self, _catalog: &Catalog, molecule: &Molecule) -> RelatedKeys<Year> {
        smallvec![molecule.year()]
    }
}

#[cfg(test)]
mod dimensions_test {
    use super::*;

    #[test]
    fn test_mass_buckets() {
        let dim = ByMassBucket::new(10, 130);
        assert_eq!(dim.bucket_of(0).to_string(), "0-10");
        assert_eq!(dim.bucket_of(9).to_string(), "0-10");
        assert_eq!(dim.bucket_of(10).to_string(), "10-20");
        assert_eq!(dim.bucket_of(129).to_string(), "120-130");
        assert_eq!(dim.bucket_of(130).to_string(), "130+");
        assert_eq!(dim.bucket_of(720).to_string(), "130+");
        assert!(dim.bucket_of(44).contains(44));
        assert!(!dim.bucket_of(44).contains(50));
    }

    #[test]
    fn test_atom_buckets() {
        let dim = ByAtomCount::new(13);
        assert_eq!(dim.bucket_of(13), AtomBucket::Exactly(13));
        assert_eq!(dim.bucket_of(60), AtomBucket::Above(13));
        assert!(AtomBucket::Exactly(13) < AtomBucket::Above(13));
        assert_eq!(AtomBucket::Above(13).to_string(), ">13");
    }

    #[test]
    fn test_source_group_order() {
        assert!(SourceGroup::Source(SourceId(100)) < SourceGroup::LosClouds);
    }
}
