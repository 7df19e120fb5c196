//! # Molecules
//!
//! Entity model for detected molecules: raw inputs ([`MoleculeRecord`]) and the constructed,
//! immutable [`Molecule`] carrying its eagerly computed [`DerivedAttributes`].
//!
//! ## Overview
//!
//! - [`Element`] / [`Composition`] – Elemental make-up with nominal integer masses.
//! - [`StructuralFlags`] / [`StructuralKind`] – Non-exclusive structural classification
//!   (neutral, cation, anion, radical, cyclic, fullerene, PAH).
//! - [`Detection`] / [`EnvironmentDetections`] – Tri-state detection flags for ices,
//!   protoplanetary disks, external galaxies and exoplanet atmospheres.
//! - [`RotationalConstants`] / [`DipoleMoments`] – Optional spectroscopic inputs, NaN-free.
//! - [`derived`] – Pure derived-attribute calculator.
//! - [`formula`] – Formula string → [`Composition`] parser.
//!
//! ## Lifecycle
//!
//! A [`MoleculeRecord`] is plain data; it only references sources and telescopes by identity
//! ([`SourceId`], [`TelescopeId`]). Turning it into a [`Molecule`] runs
//! [`DerivedAttributes::compute`] once. The derived values cannot be set independently; use
//! [`Molecule::rederive`] to recompute them from the stored inputs.
//!
//! ## See also
//! ------------
//! * [`CatalogBuilder::add_molecule`](crate::catalog::CatalogBuilder::add_molecule) – Validates
//!   references and constructs the molecule.
pub mod derived;
pub mod element;
pub mod formula;

use std::collections::BTreeSet;
use std::str::FromStr;

use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

use crate::astromol_errors::AstromolError;
use crate::constants::{AtomCount, Debye, MHz, Mass, SourceId, TelescopeId, Year};
use crate::telescopes::Wavelength;

pub use derived::{DerivedAttributes, Unsaturation};
pub use element::{Composition, Element};

/// Transform an optional float into an optional NaN-free float.
pub fn to_opt_notnan(x: Option<f64>) -> Result<Option<NotNan<f64>>, ordered_float::FloatIsNan> {
    x.map(NotNan::new).transpose()
}

// -------------------------------------------------------------------------------------------------
// Structural flags
// -------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StructuralKind {
    Neutral,
    Cation,
    Anion,
    Radical,
    Cyclic,
    Fullerene,
    Pah,
}

impl StructuralKind {
    pub const ALL: [StructuralKind; 7] = [
        StructuralKind::Neutral,
        StructuralKind::Cation,
        StructuralKind::Anion,
        StructuralKind::Radical,
        StructuralKind::Cyclic,
        StructuralKind::Fullerene,
        StructuralKind::Pah,
    ];

    /// Kinds reported in per-source-type structural tallies.
    pub const TALLIED: [StructuralKind; 5] = [
        StructuralKind::Neutral,
        StructuralKind::Cation,
        StructuralKind::Anion,
        StructuralKind::Radical,
        StructuralKind::Cyclic,
    ];

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

/// Structural classification. Flags are independent: a cyclic radical cation sets three of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructuralFlags {
    pub neutral: bool,
    pub cation: bool,
    pub anion: bool,
    pub radical: bool,
    pub cyclic: bool,
    pub fullerene: bool,
    pub pah: bool,
}

impl StructuralFlags {
    pub fn has(&self, kind: StructuralKind) -> bool {
        match kind {
            StructuralKind::Neutral => self.neutral,
            StructuralKind::Cation => self.cation,
            StructuralKind::Anion => self.anion,
            StructuralKind::Radical => self.radical,
            StructuralKind::Cyclic => self.cyclic,
            StructuralKind::Fullerene => self.fullerene,
            StructuralKind::Pah => self.pah,
        }
    }

    pub fn with(mut self, kind: StructuralKind) -> Self {
        match kind {
            StructuralKind::Neutral => self.neutral = true,
            StructuralKind::Cation => self.cation = true,
            StructuralKind::Anion => self.anion = true,
            StructuralKind::Radical => self.radical = true,
            StructuralKind::Cyclic => self.cyclic = true,
            StructuralKind::Fullerene => self.fullerene = true,
            StructuralKind::Pah => self.pah = true,
        }
        self
    }

    pub fn kinds(&self) -> impl Iterator<Item = StructuralKind> + '_ {
        StructuralKind::ALL.into_iter().filter(|k| self.has(*k))
    }
}

// -------------------------------------------------------------------------------------------------
// Environment detections
// -------------------------------------------------------------------------------------------------

/// Tri-state detection flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Detection {
    #[default]
    Absent,
    Confirmed,
    Tentative,
}

impl Detection {
    /// `true` for both confirmed and tentative detections.
    pub fn is_detected(&self) -> bool {
        !matches!(self, Detection::Absent)
    }
}

impl FromStr for Detection {
    type Err = AstromolError;

    /// Accepts empty/`false`/`no` for [`Detection::Absent`], `true`/`yes` for
    /// [`Detection::Confirmed`] and `tentative` (any case).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "false" | "no" | "absent" => Ok(Detection::Absent),
            "true" | "yes" | "confirmed" => Ok(Detection::Confirmed),
            "tentative" => Ok(Detection::Tentative),
            _ => Err(AstromolError::UnknownDetectionFlag(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Environment {
    Ice,
    ProtoplanetaryDisk,
    ExternalGalaxy,
    ExoplanetAtmosphere,
}

impl Environment {
    pub const ALL: [Environment; 4] = [
        Environment::Ice,
        Environment::ProtoplanetaryDisk,
        Environment::ExternalGalaxy,
        Environment::ExoplanetAtmosphere,
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnvironmentDetections {
    pub ice: Detection,
    pub ppd: Detection,
    pub exgal: Detection,
    pub exo: Detection,
}

impl EnvironmentDetections {
    pub fn get(&self, environment: Environment) -> Detection {
        match environment {
            Environment::Ice => self.ice,
            Environment::ProtoplanetaryDisk => self.ppd,
            Environment::ExternalGalaxy => self.exgal,
            Environment::ExoplanetAtmosphere => self.exo,
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Spectroscopic inputs
// -------------------------------------------------------------------------------------------------

/// Rotational constants A ≥ B ≥ C in MHz, any of which may be unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RotationalConstants {
    a: Option<NotNan<MHz>>,
    b: Option<NotNan<MHz>>,
    c: Option<NotNan<MHz>>,
}

impl RotationalConstants {
    /// Build a validated set of rotational constants.
    ///
    /// Arguments
    /// -----------------
    /// * `a`, `b`, `c`: Rotational constants in MHz; `None` when not measured.
    ///
    /// Return
    /// ----------
    /// * The constants, or an error when a value is NaN, not strictly positive, or when
    ///   `A` and `C` are both given without `B`.
    pub fn new(a: Option<MHz>, b: Option<MHz>, c: Option<MHz>) -> Result<Self, AstromolError> {
        let (a, b, c) = (to_opt_notnan(a)?, to_opt_notnan(b)?, to_opt_notnan(c)?);

        if [a, b, c].iter().flatten().any(|v| v.into_inner() <= 0.0) {
            return Err(AstromolError::InvalidRotationalConstants(
                "rotational constants must be strictly positive".into(),
            ));
        }
        if a.is_some() && c.is_some() && b.is_none() {
            return Err(AstromolError::InvalidRotationalConstants(
                "B is required when both A and C are given".into(),
            ));
        }

        Ok(RotationalConstants { a, b, c })
    }

    pub fn a(&self) -> Option<MHz> {
        self.a.map(NotNan::into_inner)
    }

    pub fn b(&self) -> Option<MHz> {
        self.b.map(NotNan::into_inner)
    }

    pub fn c(&self) -> Option<MHz> {
        self.c.map(NotNan::into_inner)
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_none() && self.b.is_none() && self.c.is_none()
    }
}

/// Dipole moment components along the principal axes, in Debye.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DipoleMoments {
    mu_a: Option<NotNan<Debye>>,
    mu_b: Option<NotNan<Debye>>,
    mu_c: Option<NotNan<Debye>>,
}

impl DipoleMoments {
    pub fn new(
        mu_a: Option<Debye>,
        mu_b: Option<Debye>,
        mu_c: Option<Debye>,
    ) -> Result<Self, AstromolError> {
        Ok(DipoleMoments {
            mu_a: to_opt_notnan(mu_a)?,
            mu_b: to_opt_notnan(mu_b)?,
            mu_c: to_opt_notnan(mu_c)?,
        })
    }

    pub fn mu_a(&self) -> Option<Debye> {
        self.mu_a.map(NotNan::into_inner)
    }

    pub fn mu_b(&self) -> Option<Debye> {
        self.mu_b.map(NotNan::into_inner)
    }

    pub fn mu_c(&self) -> Option<Debye> {
        self.mu_c.map(NotNan::into_inner)
    }
}

// -------------------------------------------------------------------------------------------------
// Records
// -------------------------------------------------------------------------------------------------

/// Raw molecule data, before derivation.
///
/// `sources` and `telescopes` are the canonical relationship lists; duplicates are allowed and
/// order is preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeRecord {
    pub name: String,
    pub formula: String,
    pub year: Year,
    pub composition: Composition,
    pub sources: Vec<SourceId>,
    pub telescopes: Vec<TelescopeId>,
    pub wavelengths: BTreeSet<Wavelength>,
    pub flags: StructuralFlags,
    pub rotational: RotationalConstants,
    pub dipole: DipoleMoments,
    pub environments: EnvironmentDetections,
    pub external_galaxies: Vec<String>,
}

impl MoleculeRecord {
    pub fn new(
        name: impl Into<String>,
        formula: impl Into<String>,
        year: Year,
        composition: Composition,
    ) -> Self {
        MoleculeRecord {
            name: name.into(),
            formula: formula.into(),
            year,
            composition,
            sources: Vec::new(),
            telescopes: Vec::new(),
            wavelengths: BTreeSet::new(),
            flags: StructuralFlags::default(),
            rotational: RotationalConstants::default(),
            dipole: DipoleMoments::default(),
            environments: EnvironmentDetections::default(),
            external_galaxies: Vec::new(),
        }
    }

    pub fn with_sources(mut self, sources: impl IntoIterator<Item = SourceId>) -> Self {
        self.sources.extend(sources);
        self
    }

    pub fn with_telescopes(mut self, telescopes: impl IntoIterator<Item = TelescopeId>) -> Self {
        self.telescopes.extend(telescopes);
        self
    }

    pub fn with_wavelengths(mut self, wavelengths: impl IntoIterator<Item = Wavelength>) -> Self {
        self.wavelengths.extend(wavelengths);
        self
    }

    pub fn with_flags(mut self, flags: StructuralFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_rotational_constants(mut self, rotational: RotationalConstants) -> Self {
        self.rotational = rotational;
        self
    }

    pub fn with_dipole_moments(mut self, dipole: DipoleMoments) -> Self {
        self.dipole = dipole;
        self
    }

    pub fn with_environments(mut self, environments: EnvironmentDetections) -> Self {
        self.environments = environments;
        self
    }

    pub fn with_external_galaxies<S: Into<String>>(
        mut self,
        galaxies: impl IntoIterator<Item = S>,
    ) -> Self {
        self.external_galaxies
            .extend(galaxies.into_iter().map(Into::into));
        self
    }
}

/// A constructed molecule: its record plus the derived attributes computed from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Molecule {
    record: MoleculeRecord,
    derived: DerivedAttributes,
}

impl Molecule {
    pub fn new(record: MoleculeRecord) -> Self {
        let derived = DerivedAttributes::compute(&record.composition, &record.rotational);
        Molecule { record, derived }
    }

    /// Recompute the derived attributes from the stored inputs.
    pub fn rederive(&self) -> DerivedAttributes {
        DerivedAttributes::compute(&self.record.composition, &self.record.rotational)
    }

    pub fn record(&self) -> &MoleculeRecord {
        &self.record
    }

    pub fn derived(&self) -> &DerivedAttributes {
        &self.derived
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn formula(&self) -> &str {
        &self.record.formula
    }

    pub fn year(&self) -> Year {
        self.record.year
    }

    pub fn composition(&self) -> &Composition {
        &self.record.composition
    }

    pub fn sources(&self) -> &[SourceId] {
        &self.record.sources
    }

    pub fn telescopes(&self) -> &[TelescopeId] {
        &self.record.telescopes
    }

    pub fn wavelengths(&self) -> &BTreeSet<Wavelength> {
        &self.record.wavelengths
    }

    pub fn flags(&self) -> &StructuralFlags {
        &self.record.flags
    }

    pub fn environments(&self) -> &EnvironmentDetections {
        &self.record.environments
    }

    pub fn external_galaxies(&self) -> &[String] {
        &self.record.external_galaxies
    }

    pub fn natoms(&self) -> AtomCount {
        self.derived.natoms
    }

    pub fn mass(&self) -> Mass {
        self.derived.mass
    }

    pub fn du(&self) -> Option<f64> {
        self.derived.du()
    }

    pub fn max_du(&self) -> Option<f64> {
        self.derived.max_du()
    }

    pub fn relative_du(&self) -> Option<f64> {
        self.derived.relative_du()
    }

    pub fn kappa(&self) -> Option<f64> {
        self.derived.kappa
    }

    /// Mass per atom, in amu.
    pub fn mass_per_atom(&self) -> Option<f64> {
        match self.derived.natoms {
            0 => None,
            n => Some(self.derived.mass as f64 / n as f64),
        }
    }

    pub fn count(&self, element: Element) -> AtomCount {
        self.record.composition.count(element)
    }
}
