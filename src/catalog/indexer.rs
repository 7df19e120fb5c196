//! # Relationship indexer
//!
//! Batch pass linking every source and telescope to the molecules that reference it.
//!
//! The molecule lists are canonical. For each entity `e`, every molecule `m` is scanned and
//! appended to `e`'s list when `e` appears (by identity) in `m`'s own list, which costs
//! `O(|E| × |M|)` per entity kind. A molecule listing the same entity twice is still recorded
//! once. The pass rebuilds everything from scratch, so running it again over an unchanged
//! registry gives the same result. There is no incremental update path.
use tracing::debug;

use crate::constants::{MoleculeId, SourceId, TelescopeId};
use crate::molecules::Molecule;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipIndex {
    source_molecules: Vec<Vec<MoleculeId>>,
    telescope_molecules: Vec<Vec<MoleculeId>>,
}

impl RelationshipIndex {
    /// Build the back-references for `n_sources` sources and `n_telescopes` telescopes.
    ///
    /// Arguments
    /// -----------------
    /// * `molecules`: The complete molecule registry; position `i` has id `MoleculeId(i)`.
    /// * `n_sources`, `n_telescopes`: Number of registered entities of each kind.
    ///
    /// Return
    /// ----------
    /// * The index; molecule lists follow registry order.
    pub fn build(molecules: &[Molecule], n_sources: usize, n_telescopes: usize) -> Self {
        let source_molecules = (0..n_sources)
            .map(|s| scan(molecules, |m| m.sources().contains(&SourceId(s))))
            .collect();
        let telescope_molecules = (0..n_telescopes)
            .map(|t| scan(molecules, |m| m.telescopes().contains(&TelescopeId(t))))
            .collect();

        debug!(
            molecules = molecules.len(),
            sources = n_sources,
            telescopes = n_telescopes,
            "relationship index rebuilt"
        );

        RelationshipIndex {
            source_molecules,
            telescope_molecules,
        }
    }

    pub fn molecules_in_source(&self, source: SourceId) -> Option<&[MoleculeId]> {
        self.source_molecules.get(source.0).map(Vec::as_slice)
    }

    pub fn molecules_from_telescope(&self, telescope: TelescopeId) -> Option<&[MoleculeId]> {
        self.telescope_molecules.get(telescope.0).map(Vec::as_slice)
    }
}

fn scan(molecules: &[Molecule], references: impl Fn(&Molecule) -> bool) -> Vec<MoleculeId> {
    molecules
        .iter()
        .enumerate()
        .filter(|(_, m)| references(m))
        .map(|(i, _)| MoleculeId(i))
        .collect()
}
