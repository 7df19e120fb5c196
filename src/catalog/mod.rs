//! # Catalog: registry, identity resolution, and relationship index
//!
//! This module defines the two-phase registry every other component reads from:
//!
//! 1. **[`CatalogBuilder`]**: sources and telescopes are registered first, then molecules. Each
//!    molecule's references are checked against the registered ids, and its derived attributes
//!    are computed on insertion.
//! 2. **[`Catalog`]**: produced by [`CatalogBuilder::build`], which runs the
//!    [relationship indexer](crate::catalog::indexer) over the complete molecule registry.
//!
//! A [`Catalog`] cannot exist without its index, so no consumer can observe source or telescope
//! counts computed before all molecules were known. After construction the catalog is read-only;
//! aggregation and statistics functions take it by shared reference and can be called from any
//! number of readers.
//!
//! ## Typical usage
//!
//! ```rust
//! use astromol::catalog::CatalogBuilder;
//! use astromol::molecules::{Composition, Element, MoleculeRecord};
//! use astromol::sources::{Source, SourceType};
//!
//! let mut builder = CatalogBuilder::new();
//! let tmc1 = builder.add_source(Source::new("TMC-1", SourceType::DarkCloud))?;
//! let hc3n = Composition::new()
//!     .with(Element::H, 1)
//!     .with(Element::C, 3)
//!     .with(Element::N, 1);
//! builder.add_molecule(
//!     MoleculeRecord::new("cyanoacetylene", "HC3N", 1971, hc3n).with_sources([tmc1]),
//! )?;
//!
//! let catalog = builder.build();
//! assert_eq!(catalog.source_detections(tmc1)?, 1);
//! # Ok::<(), astromol::astromol_errors::AstromolError>(())
//! ```
//!
//! ## See also
//! ------------
//! * [`RelationshipIndex`](crate::catalog::indexer::RelationshipIndex) – The back-reference pass.
//! * [`aggregation`](crate::aggregation) – Grouped tallies over a finalized catalog.
//! * [`fixtures`](crate::fixtures) – Builds a catalog from CSV tables.
pub mod bimap;
pub mod indexer;
pub(crate) mod name_registry;

use itertools::Itertools;
use tracing::info;

use crate::{
    astromol_errors::AstromolError,
    constants::{MoleculeId, SourceId, TelescopeId},
    molecules::{formula::parse_formula, Molecule, MoleculeRecord},
    sources::Source,
    telescopes::Telescope,
};

use indexer::RelationshipIndex;
use name_registry::NameRegistry;

/// Phase-one registry.
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    sources: Vec<Source>,
    telescopes: Vec<Telescope>,
    molecules: Vec<Molecule>,
    source_names: NameRegistry<SourceId>,
    telescope_names: NameRegistry<TelescopeId>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source.
    ///
    /// Return
    /// ----------
    /// * The new [`SourceId`], or [`AstromolError::DuplicateSource`] if a source with the same
    ///   (whitespace-normalized) name already exists.
    pub fn add_source(&mut self, source: Source) -> Result<SourceId, AstromolError> {
        let id = SourceId(self.sources.len());
        if !self.source_names.register(&source.name, id) {
            return Err(AstromolError::DuplicateSource(source.name));
        }
        self.sources.push(source);
        Ok(id)
    }

    /// Register a telescope. Same duplicate rule as [`CatalogBuilder::add_source`].
    pub fn add_telescope(&mut self, telescope: Telescope) -> Result<TelescopeId, AstromolError> {
        let id = TelescopeId(self.telescopes.len());
        if !self.telescope_names.register(&telescope.name, id) {
            return Err(AstromolError::DuplicateTelescope(telescope.name));
        }
        self.telescopes.push(telescope);
        Ok(id)
    }

    pub fn source_id(&self, name: &str) -> Result<SourceId, AstromolError> {
        self.source_names
            .resolve(name)
            .ok_or_else(|| AstromolError::SourceNameNotFound(name.to_string()))
    }

    pub fn telescope_id(&self, name: &str) -> Result<TelescopeId, AstromolError> {
        self.telescope_names
            .resolve(name)
            .ok_or_else(|| AstromolError::TelescopeNameNotFound(name.to_string()))
    }

    /// Construct a molecule from its record and add it to the registry.
    ///
    /// Arguments
    /// -----------------
    /// * `record`: Raw molecule data. Every referenced source and telescope must already be
    ///   registered in this builder.
    ///
    /// Return
    /// ----------
    /// * The new [`MoleculeId`].
    ///
    /// Errors
    /// ----------
    /// * [`AstromolError::SourceNotFound`] / [`AstromolError::TelescopeNotFound`] for a dangling
    ///   reference.
    pub fn add_molecule(&mut self, record: MoleculeRecord) -> Result<MoleculeId, AstromolError> {
        if let Some(missing) = record.sources.iter().find(|s| s.0 >= self.sources.len()) {
            return Err(AstromolError::SourceNotFound(*missing));
        }
        if let Some(missing) = record
            .telescopes
            .iter()
            .find(|t| t.0 >= self.telescopes.len())
        {
            return Err(AstromolError::TelescopeNotFound(*missing));
        }

        let id = MoleculeId(self.molecules.len());
        self.molecules.push(Molecule::new(record));
        Ok(id)
    }

    pub fn n_molecules(&self) -> usize {
        self.molecules.len()
    }

    /// Finish phase one and run the relationship indexer.
    pub fn build(self) -> Catalog {
        let index =
            RelationshipIndex::build(&self.molecules, self.sources.len(), self.telescopes.len());

        info!(
            molecules = self.molecules.len(),
            sources = self.sources.len(),
            telescopes = self.telescopes.len(),
            "catalog built"
        );

        Catalog {
            molecules: self.molecules,
            sources: self.sources,
            telescopes: self.telescopes,
            source_names: self.source_names,
            telescope_names: self.telescope_names,
            index,
        }
    }
}

/// Finalized, indexed registry.
#[derive(Debug, Clone)]
pub struct Catalog {
    molecules: Vec<Molecule>,
    sources: Vec<Source>,
    telescopes: Vec<Telescope>,
    source_names: NameRegistry<SourceId>,
    telescope_names: NameRegistry<TelescopeId>,
    index: RelationshipIndex,
}

impl Catalog {
    pub fn molecules(&self) -> &[Molecule] {
        &self.molecules
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn telescopes(&self) -> &[Telescope] {
        &self.telescopes
    }

    /// Molecules paired with their ids, in registry order.
    pub fn iter_molecules(&self) -> impl Iterator<Item = (MoleculeId, &Molecule)> {
        self.molecules
            .iter()
            .enumerate()
            .map(|(i, m)| (MoleculeId(i), m))
    }

    pub fn source_ids(&self) -> impl Iterator<Item = SourceId> {
        (0..self.sources.len()).map(SourceId)
    }

    pub fn telescope_ids(&self) -> impl Iterator<Item = TelescopeId> {
        (0..self.telescopes.len()).map(TelescopeId)
    }

    pub fn molecule(&self, id: MoleculeId) -> Result<&Molecule, AstromolError> {
        self.molecules
            .get(id.0)
            .ok_or(AstromolError::MoleculeNotFound(id))
    }

    pub fn source(&self, id: SourceId) -> Result<&Source, AstromolError> {
        self.sources
            .get(id.0)
            .ok_or(AstromolError::SourceNotFound(id))
    }

    pub fn telescope(&self, id: TelescopeId) -> Result<&Telescope, AstromolError> {
        self.telescopes
            .get(id.0)
            .ok_or(AstromolError::TelescopeNotFound(id))
    }

    pub fn source_id(&self, name: &str) -> Result<SourceId, AstromolError> {
        self.source_names
            .resolve(name)
            .ok_or_else(|| AstromolError::SourceNameNotFound(name.to_string()))
    }

    pub fn telescope_id(&self, name: &str) -> Result<TelescopeId, AstromolError> {
        self.telescope_names
            .resolve(name)
            .ok_or_else(|| AstromolError::TelescopeNameNotFound(name.to_string()))
    }

    pub fn source_name(&self, id: SourceId) -> Result<&str, AstromolError> {
        self.source_names
            .name_of(id)
            .ok_or(AstromolError::SourceNotFound(id))
    }

    pub fn telescope_name(&self, id: TelescopeId) -> Result<&str, AstromolError> {
        self.telescope_names
            .name_of(id)
            .ok_or(AstromolError::TelescopeNotFound(id))
    }

    /// Molecules detected in a source, in registry order.
    pub fn molecules_in_source(&self, id: SourceId) -> Result<&[MoleculeId], AstromolError> {
        self.index
            .molecules_in_source(id)
            .ok_or(AstromolError::SourceNotFound(id))
    }

    pub fn source_detections(&self, id: SourceId) -> Result<usize, AstromolError> {
        Ok(self.molecules_in_source(id)?.len())
    }

    /// Molecules detected with a telescope, in registry order.
    pub fn molecules_from_telescope(
        &self,
        id: TelescopeId,
    ) -> Result<&[MoleculeId], AstromolError> {
        self.index
            .molecules_from_telescope(id)
            .ok_or(AstromolError::TelescopeNotFound(id))
    }

    pub fn telescope_detections(&self, id: TelescopeId) -> Result<usize, AstromolError> {
        Ok(self.molecules_from_telescope(id)?.len())
    }

    /// Rerun the relationship indexer. The result is identical as long as the molecules are.
    pub fn reindex(&mut self) {
        self.index =
            RelationshipIndex::build(&self.molecules, self.sources.len(), self.telescopes.len());
    }

    /// Sources referenced by at least one molecule, in id order.
    pub fn referenced_sources(&self) -> Vec<SourceId> {
        self.source_ids()
            .filter(|id| {
                self.index
                    .molecules_in_source(*id)
                    .is_some_and(|m| !m.is_empty())
            })
            .collect()
    }

    /// Telescopes credited with at least one detection, in id order.
    pub fn referenced_telescopes(&self) -> Vec<TelescopeId> {
        self.telescope_ids()
            .filter(|id| {
                self.index
                    .molecules_from_telescope(*id)
                    .is_some_and(|m| !m.is_empty())
            })
            .collect()
    }

    /// Molecules whose composition matches a formula exactly (isomers included).
    ///
    /// Arguments
    /// -----------------
    /// * `formula`: A formula such as `C2H5OH`; isomer prefixes and charges are ignored.
    ///
    /// Return
    /// ----------
    /// * The matching ids in registry order, or a parse error.
    pub fn find_by_formula(&self, formula: &str) -> Result<Vec<MoleculeId>, AstromolError> {
        let wanted = parse_formula(formula)?;
        Ok(self
            .iter_molecules()
            .filter(|(_, m)| *m.composition() == wanted)
            .map(|(id, _)| id)
            .collect())
    }

    /// Groups of molecules sharing one composition, for compositions held by more than one
    /// molecule. Groups are ordered by their first member.
    pub fn isomer_groups(&self) -> Vec<Vec<MoleculeId>> {
        self.iter_molecules()
            .into_group_map_by(|(_, m)| m.composition().clone())
            .into_values()
            .filter(|group| group.len() > 1)
            .map(|group| group.into_iter().map(|(id, _)| id).collect::<Vec<_>>())
            .sorted_by_key(|group| group[0])
            .collect()
    }
}
