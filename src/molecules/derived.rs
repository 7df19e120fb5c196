//! # Derived-attribute calculator
//!
//! Pure functions turning a molecule's elemental composition and rotational constants into the
//! scalar quantities used by every report:
//!
//! | Quantity | Definition | Absent when |
//! |---|---|---|
//! | `natoms` | Σ counts | never |
//! | `mass` | Σ count × nominal mass | never |
//! | `du` | `1 + ½(−H + 2C + N − Cl − F)` | no carbon, or any exotic element |
//! | `max_du` | `1 + ½(2C + N)` | whenever `du` is absent |
//! | `kappa` | `(2B − A − C)/(A − C)` | no rotational constant at all |
//!
//! Nothing here is memoized: [`DerivedAttributes::compute`] can be called as often as needed and
//! always returns the same value for the same inputs. [`Molecule`](crate::molecules::Molecule)
//! calls it once at construction and keeps the result.
//!
//! ## Kappa sentinel
//!
//! Linear molecules and symmetric tops get the conventional value `−1`
//! ([`KAPPA_SYMMETRIC_TOP`]). This happens when `A` or `C` is missing, or when `A` and `C` are
//! equal within a relative tolerance of [`KAPPA_DEGENERACY_EPS`]. The sentinel check always runs
//! before the general formula, so the division never sees a zero (or vanishing) denominator.

use serde::{Deserialize, Serialize};

use crate::constants::{AtomCount, Mass, KAPPA_DEGENERACY_EPS, KAPPA_SYMMETRIC_TOP};

use super::{element::Composition, Element, RotationalConstants};

/// Degree of unsaturation together with its theoretical maximum.
///
/// Only ever built as a pair, so `max_du` can never exist without `du`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Unsaturation {
    pub du: f64,
    pub max_du: f64,
}

impl Unsaturation {
    /// `du / max_du`. `max_du ≥ 1` because carbon is present.
    pub fn relative(&self) -> f64 {
        self.du / self.max_du
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedAttributes {
    pub natoms: AtomCount,
    pub mass: Mass,
    pub unsaturation: Option<Unsaturation>,
    pub kappa: Option<f64>,
}

impl DerivedAttributes {
    /// Compute every derived attribute from the raw inputs.
    ///
    /// Arguments
    /// -----------------
    /// * `composition`: Elemental composition.
    /// * `rotational`: Rotational constants (any subset may be missing).
    ///
    /// Return
    /// ----------
    /// * The derived attributes; calling twice with the same inputs gives identical results.
    pub fn compute(composition: &Composition, rotational: &RotationalConstants) -> Self {
        DerivedAttributes {
            natoms: natoms(composition),
            mass: nominal_mass(composition),
            unsaturation: unsaturation(composition),
            kappa: asymmetry_parameter(rotational),
        }
    }

    pub fn du(&self) -> Option<f64> {
        self.unsaturation.map(|u| u.du)
    }

    pub fn max_du(&self) -> Option<f64> {
        self.unsaturation.map(|u| u.max_du)
    }

    pub fn relative_du(&self) -> Option<f64> {
        self.unsaturation.map(|u| u.relative())
    }
}

/// Total atom count, saturating at `AtomCount::MAX`.
pub fn natoms(composition: &Composition) -> AtomCount {
    composition
        .iter()
        .fold(0, |total: AtomCount, (_, n)| total.saturating_add(n))
}

/// Nominal mass. Per-element counts fit in `AtomCount`, so the `u64` sum cannot overflow.
pub fn nominal_mass(composition: &Composition) -> Mass {
    composition
        .iter()
        .map(|(element, n)| element.nominal_mass() * Mass::from(n))
        .sum()
}

/// Degree of unsaturation, defined only for carbon-bearing species made of H, C, N, O, S and
/// halogens.
pub fn unsaturation(composition: &Composition) -> Option<Unsaturation> {
    let c = composition.count(Element::C) as f64;
    if c == 0.0 || Element::EXOTIC.iter().any(|e| composition.contains(*e)) {
        return None;
    }

    let h = composition.count(Element::H) as f64;
    let n = composition.count(Element::N) as f64;
    let cl = composition.count(Element::Cl) as f64;
    let f = composition.count(Element::F) as f64;

    Some(Unsaturation {
        du: 1.0 + 0.5 * (-h + 2.0 * c + n - cl - f),
        max_du: 1.0 + 0.5 * (2.0 * c + n),
    })
}

/// Ray's asymmetry parameter κ.
pub fn asymmetry_parameter(rotational: &RotationalConstants) -> Option<f64> {
    if rotational.is_empty() {
        return None;
    }

    let (Some(a), Some(c)) = (rotational.a(), rotational.c()) else {
        return Some(KAPPA_SYMMETRIC_TOP);
    };

    let scale = a.abs().max(c.abs());
    if (a - c).abs() <= KAPPA_DEGENERACY_EPS * scale {
        return Some(KAPPA_SYMMETRIC_TOP);
    }

    // B is guaranteed when both A and C are given
    let b = rotational.b()?;
    Some((2.0 * b - a - c) / (a - c))
}
