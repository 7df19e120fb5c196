//! # Telescopes and observing bands
//!
//! Entity model for the facilities credited with detections:
//!
//! - [`Wavelength`] – Closed set of observing bands (cm, mm, sub-mm, IR, Vis, UV).
//! - [`TelescopeType`] – Coarse facility class.
//! - [`ActiveWindow`] – Operational interval `[built, decommissioned]`, possibly open-ended.
//! - [`Telescope`] – Name, type, band coverage and active window.
//!
//! An open active window ends at the **evaluation year**, which is resolved through
//! [`EvaluationEnv`] every time it is needed. Nothing about "now" is captured at construction.
//!
//! ## See also
//! ------------
//! * [`facility_stats`] – Per-facility and per-year detection statistics.
pub mod facility_stats;

use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::astromol_errors::AstromolError;
use crate::constants::Year;
use crate::env_state::EvaluationEnv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Wavelength {
    Cm,
    Mm,
    SubMm,
    Ir,
    Vis,
    Uv,
}

impl Wavelength {
    pub const ALL: [Wavelength; 6] = [
        Wavelength::Cm,
        Wavelength::Mm,
        Wavelength::SubMm,
        Wavelength::Ir,
        Wavelength::Vis,
        Wavelength::Uv,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Wavelength::Cm => "cm",
            Wavelength::Mm => "mm",
            Wavelength::SubMm => "sub-mm",
            Wavelength::Ir => "IR",
            Wavelength::Vis => "Vis",
            Wavelength::Uv => "UV",
        }
    }
}

impl std::fmt::Display for Wavelength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Wavelength {
    type Err = AstromolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Wavelength::ALL
            .iter()
            .find(|w| w.label().eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| AstromolError::UnknownWavelength(wanted.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TelescopeType {
    SingleDish,
    Interferometer,
    Optical,
    Space,
    Airborne,
    Rocket,
}

impl TelescopeType {
    pub const ALL: [TelescopeType; 6] = [
        TelescopeType::SingleDish,
        TelescopeType::Interferometer,
        TelescopeType::Optical,
        TelescopeType::Space,
        TelescopeType::Airborne,
        TelescopeType::Rocket,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TelescopeType::SingleDish => "Single Dish",
            TelescopeType::Interferometer => "Interferometer",
            TelescopeType::Optical => "Optical",
            TelescopeType::Space => "Space",
            TelescopeType::Airborne => "Airborne",
            TelescopeType::Rocket => "Rocket",
        }
    }
}

impl std::fmt::Display for TelescopeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for TelescopeType {
    type Err = AstromolError;

    /// Case-insensitive; `Single-Dish` and `Single Dish` are both accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', " ");
        TelescopeType::ALL
            .iter()
            .find(|t| t.label().eq_ignore_ascii_case(&wanted))
            .copied()
            .ok_or_else(|| AstromolError::UnknownTelescopeType(s.trim().to_string()))
    }
}

/// Operational interval of a facility. Both ends are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveWindow {
    built: Year,
    decommissioned: Option<Year>,
}

impl ActiveWindow {
    /// Arguments
    /// -----------------
    /// * `built`: First year of operation.
    /// * `decommissioned`: Last year of operation, `None` if still active.
    ///
    /// Return
    /// ----------
    /// * The window, or [`AstromolError::InvalidActiveWindow`] when `decommissioned < built`.
    pub fn new(built: Year, decommissioned: Option<Year>) -> Result<Self, AstromolError> {
        match decommissioned {
            Some(end) if end < built => Err(AstromolError::InvalidActiveWindow {
                built,
                decommissioned: end,
            }),
            _ => Ok(ActiveWindow {
                built,
                decommissioned,
            }),
        }
    }

    pub fn built(&self) -> Year {
        self.built
    }

    pub fn decommissioned(&self) -> Option<Year> {
        self.decommissioned
    }

    pub fn is_open(&self) -> bool {
        self.decommissioned.is_none()
    }

    /// Last active year: the decommissioning year, or the evaluation year for an open window.
    pub fn end_year(&self, env: &EvaluationEnv) -> Result<Year, AstromolError> {
        match self.decommissioned {
            Some(end) => Ok(end),
            None => env.current_year(),
        }
    }

    /// Resolve the window into a concrete inclusive range of years.
    ///
    /// An open window evaluated before its construction year yields an empty range.
    pub fn resolve(&self, env: &EvaluationEnv) -> Result<RangeInclusive<Year>, AstromolError> {
        Ok(self.built..=self.end_year(env)?)
    }

    /// Intersect the window with a reporting range. Returns `None` when they do not overlap.
    pub fn intersect(
        &self,
        period: &RangeInclusive<Year>,
        env: &EvaluationEnv,
    ) -> Result<Option<RangeInclusive<Year>>, AstromolError> {
        let window = self.resolve(env)?;
        let start = *window.start().max(period.start());
        let end = *window.end().min(period.end());
        Ok((start <= end).then_some(start..=end))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Telescope {
    pub name: String,
    pub telescope_type: TelescopeType,
    pub wavelengths: BTreeSet<Wavelength>,
    pub window: ActiveWindow,
}

impl Telescope {
    pub fn new(
        name: impl Into<String>,
        telescope_type: TelescopeType,
        window: ActiveWindow,
    ) -> Self {
        Telescope {
            name: name.into(),
            telescope_type,
            wavelengths: BTreeSet::new(),
            window,
        }
    }

    pub fn with_wavelengths(mut self, wavelengths: impl IntoIterator<Item = Wavelength>) -> Self {
        self.wavelengths.extend(wavelengths);
        self
    }
}

#[cfg(test)]
mod telescopes_test {
    use super::*;

    #[test]
    fn test_wavelength_labels() {
        assert_eq!("sub-mm".parse::<Wavelength>(), Ok(Wavelength::SubMm));
        assert_eq!("ir".parse::<Wavelength>(), Ok(Wavelength::Ir));
        assert_eq!(
            "X-ray".parse::<Wavelength>(),
            Err(AstromolError::UnknownWavelength("X-ray".into()))
        );
    }

    #[test]
    fn test_telescope_type_aliases() {
        assert_eq!(
            "single-dish".parse::<TelescopeType>(),
            Ok(TelescopeType::SingleDish)
        );
        assert!("Balloon".parse::<TelescopeType>().is_err());
    }

    #[test]
    fn test_window_rejects_reversed_interval() {
        assert_eq!(
            ActiveWindow::new(2000, Some(1999)),
            Err(AstromolError::InvalidActiveWindow {
                built: 2000,
                decommissioned: 1999
            })
        );
        assert!(ActiveWindow::new(2000, Some(2000)).is_ok());
    }

    #[test]
    fn test_open_window_follows_evaluation_year() {
        let window = ActiveWindow::new(2011, None).unwrap();
        assert_eq!(window.resolve(&EvaluationEnv::fixed(2015)), Ok(2011..=2015));
        assert_eq!(window.resolve(&EvaluationEnv::fixed(2020)), Ok(2011..=2020));
    }

    #[test]
    fn test_intersect() {
        let window = ActiveWindow::new(1980, Some(1999)).unwrap();
        let env = EvaluationEnv::fixed(2020);
        assert_eq!(window.intersect(&(1990..=2010), &env), Ok(Some(1990..=1999)));
        assert_eq!(window.intersect(&(2000..=2010), &env), Ok(None));
    }
}
