//! # Constants and type definitions for astromol
//!
//! This module centralizes the **numeric constants** and **common type aliases** shared by the
//! catalog, the derived-attribute calculator, and the aggregation engine.
//!
//! ## Overview
//!
//! - Type aliases for years, nominal masses and atom counts
//! - Identity handles for catalog entities ([`MoleculeId`], [`SourceId`], [`TelescopeId`])
//! - Tolerances used by the derived-attribute calculator
//! - Default thresholds used by the report catalogue

use serde::{Deserialize, Serialize};

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Calendar year (discovery year, facility construction year, ...)
pub type Year = i32;
/// Nominal molecular mass in atomic mass units (integer masses, not isotope-weighted)
pub type Mass = u64;
/// Number of atoms of one element, or in a whole molecule
pub type AtomCount = u32;
/// Rotational constant, in MHz
pub type MHz = f64;
/// Dipole moment component, in Debye
pub type Debye = f64;

// -------------------------------------------------------------------------------------------------
// Derived-attribute constants
// -------------------------------------------------------------------------------------------------

/// Value of the asymmetry parameter used for symmetric/linear tops.
pub const KAPPA_SYMMETRIC_TOP: f64 = -1.0;

/// Relative tolerance under which `A` and `C` are treated as equal when computing kappa.
pub const KAPPA_DEGENERACY_EPS: f64 = 1e-12;

// -------------------------------------------------------------------------------------------------
// Report defaults
// -------------------------------------------------------------------------------------------------

/// Fraction of values dropped at each end of a trimmed collection
pub const DEFAULT_OUTLIER_FRACTION: f64 = 0.1;

/// DU values at or above this are excluded from DU collections
pub const DEFAULT_DU_CEILING: f64 = 20.0;

/// Molecules with this many carbons or more are excluded from mass collections
pub const DEFAULT_MAX_CARBON: AtomCount = 20;

/// Molecules with this many atoms or more are excluded from atom-count collections
pub const DEFAULT_MAX_NATOMS: AtomCount = 60;

/// Width of a mass bucket (amu)
pub const DEFAULT_MASS_BUCKET_WIDTH: Mass = 10;

/// Lower edge of the open-ended last mass bucket (amu)
pub const DEFAULT_MASS_BUCKET_CAP: Mass = 130;

/// Largest atom count reported in its own bucket
pub const DEFAULT_MAX_RESOLVED_ATOMS: AtomCount = 13;

/// Facilities need strictly more detections than this to appear in per-facility yearly tables
pub const DEFAULT_MIN_FACILITY_DETECTIONS: usize = 4;

// -------------------------------------------------------------------------------------------------
// Identifiers
// -------------------------------------------------------------------------------------------------

/// Stable identity of a molecule inside one [`Catalog`](crate::catalog::Catalog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MoleculeId(pub usize);

/// Stable identity of a source inside one [`Catalog`](crate::catalog::Catalog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(pub usize);

/// Stable identity of a telescope inside one [`Catalog`](crate::catalog::Catalog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TelescopeId(pub usize);

impl std::fmt::Display for MoleculeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "molecule#{}", self.0)
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "source#{}", self.0)
    }
}

impl std::fmt::Display for TelescopeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "telescope#{}", self.0)
    }
}
