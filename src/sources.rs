//! # Astronomical sources
//!
//! A [`Source`] is a named object in which molecules were detected, tagged with a coarse
//! [`SourceType`] used purely for statistical grouping.
//!
//! The source type set is closed: unrecognized labels are rejected when parsed, so no grouped
//! report ever needs an "other" bucket.
//!
//! Detection counts and the list of molecules seen in a source are not stored here. They are
//! derived by the relationship indexer and exposed through
//! [`Catalog::source_detections`](crate::catalog::Catalog::source_detections) and
//! [`Catalog::molecules_in_source`](crate::catalog::Catalog::molecules_in_source).
use std::str::FromStr;

use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

use crate::astromol_errors::AstromolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SourceType {
    CarbonStar,
    DarkCloud,
    Hii,
    LosCloud,
    OxygenStar,
    Pdr,
    Pn,
    Protostar,
    Sfr,
    Snr,
    SgrA,
    Yso,
}

impl SourceType {
    pub const ALL: [SourceType; 12] = [
        SourceType::CarbonStar,
        SourceType::DarkCloud,
        SourceType::Hii,
        SourceType::LosCloud,
        SourceType::OxygenStar,
        SourceType::Pdr,
        SourceType::Pn,
        SourceType::Protostar,
        SourceType::Sfr,
        SourceType::Snr,
        SourceType::SgrA,
        SourceType::Yso,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SourceType::CarbonStar => "Carbon Star",
            SourceType::DarkCloud => "Dark Cloud",
            SourceType::Hii => "HII",
            SourceType::LosCloud => "LOS Cloud",
            SourceType::OxygenStar => "Oxygen Star",
            SourceType::Pdr => "PDR",
            SourceType::Pn => "PN",
            SourceType::Protostar => "Protostar",
            SourceType::Sfr => "SFR",
            SourceType::Snr => "SNR",
            SourceType::SgrA => "Sgr A",
            SourceType::Yso => "YSO",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for SourceType {
    type Err = AstromolError;

    /// Case-insensitive match on the display label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SourceType::ALL
            .iter()
            .find(|t| t.label().eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| AstromolError::UnknownSourceType(wanted.to_string()))
    }
}

/// Equatorial J2000 position, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinates {
    ra: NotNan<f64>,
    dec: NotNan<f64>,
}

impl Coordinates {
    /// Arguments
    /// -----------------
    /// * `ra`: Right ascension in degrees, in `[0, 360)`.
    /// * `dec`: Declination in degrees, in `[-90, 90]`.
    pub fn new(ra: f64, dec: f64) -> Result<Self, AstromolError> {
        let (ra, dec) = (NotNan::new(ra)?, NotNan::new(dec)?);
        if !(0.0..360.0).contains(&ra.into_inner()) {
            return Err(AstromolError::InvalidCoordinates(format!(
                "right ascension {ra} outside [0, 360)"
            )));
        }
        if !(-90.0..=90.0).contains(&dec.into_inner()) {
            return Err(AstromolError::InvalidCoordinates(format!(
                "declination {dec} outside [-90, 90]"
            )));
        }
        Ok(Coordinates { ra, dec })
    }

    pub fn ra(&self) -> f64 {
        self.ra.into_inner()
    }

    pub fn dec(&self) -> f64 {
        self.dec.into_inner()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub source_type: SourceType,
    pub coordinates: Option<Coordinates>,
}

impl Source {
    pub fn new(name: impl Into<String>, source_type: SourceType) -> Self {
        Source {
            name: name.into(),
            source_type,
            coordinates: None,
        }
    }

    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }
}

#[cfg(test)]
mod sources_test {
    use super::*;

    #[test]
    fn test_source_type_round_trip_label() {
        for t in SourceType::ALL {
            assert_eq!(t.label().parse::<SourceType>(), Ok(t));
        }
        assert_eq!("dark cloud".parse::<SourceType>(), Ok(SourceType::DarkCloud));
    }

    #[test]
    fn test_unknown_source_type_is_rejected() {
        assert_eq!(
            "Galaxy".parse::<SourceType>(),
            Err(AstromolError::UnknownSourceType("Galaxy".into()))
        );
    }

    #[test]
    fn test_coordinates_range() {
        let sgr_b2 = Coordinates::new(266.8352, -28.3853).unwrap();
        assert_eq!(sgr_b2.ra(), 266.8352);
        assert!(matches!(
            Coordinates::new(360.0, 0.0),
            Err(AstromolError::InvalidCoordinates(_))
        ));
        assert!(matches!(
            Coordinates::new(10.0, 91.0),
            Err(AstromolError::InvalidCoordinates(_))
        ));
        assert_eq!(Coordinates::new(f64::NAN, 0.0), Err(AstromolError::NanValue));
    }
}
