use thiserror::Error;

use crate::constants::{MoleculeId, SourceId, TelescopeId, Year};

#[derive(Error, Debug)]
pub enum AstromolError {
    #[error("Negative count {count} for element {element}")]
    NegativeElementCount { element: String, count: i64 },

    #[error("Atom count overflow for element {0}")]
    ElementCountOverflow(String),

    #[error("Unknown element symbol: {0}")]
    UnknownElement(String),

    #[error("Unknown source type: {0}")]
    UnknownSourceType(String),

    #[error("Unknown telescope type: {0}")]
    UnknownTelescopeType(String),

    #[error("Unknown wavelength band: {0}")]
    UnknownWavelength(String),

    #[error("Unknown detection flag: {0}")]
    UnknownDetectionFlag(String),

    #[error("Source not found: {0}")]
    SourceNotFound(SourceId),

    #[error("Telescope not found: {0}")]
    TelescopeNotFound(TelescopeId),

    #[error("Molecule not found: {0}")]
    MoleculeNotFound(MoleculeId),

    #[error("Source name not found: {0}")]
    SourceNameNotFound(String),

    #[error("Telescope name not found: {0}")]
    TelescopeNameNotFound(String),

    #[error("Duplicate source name: {0}")]
    DuplicateSource(String),

    #[error("Duplicate telescope name: {0}")]
    DuplicateTelescope(String),

    #[error("Invalid rotational constants: {0}")]
    InvalidRotationalConstants(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("NaN value given for a numeric field")]
    NanValue,

    #[error("Invalid active window: built {built}, decommissioned {decommissioned}")]
    InvalidActiveWindow { built: Year, decommissioned: Year },

    #[error("Invalid report parameter: {0}")]
    InvalidReportParameter(String),

    #[error("Invalid molecular formula: {0}")]
    InvalidFormula(String),

    #[error("Unable to read the system clock: {0}")]
    ClockError(String),

    #[error("CSV fixture error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<ordered_float::FloatIsNan> for AstromolError {
    fn from(_: ordered_float::FloatIsNan) -> Self {
        AstromolError::NanValue
    }
}

impl PartialEq for AstromolError {
    fn eq(&self, other: &Self) -> bool {
        use AstromolError::*;
        match (self, other) {
            (
                NegativeElementCount {
                    element: e1,
                    count: c1,
                },
                NegativeElementCount {
                    element: e2,
                    count: c2,
                },
            ) => e1 == e2 && c1 == c2,
            (ElementCountOverflow(a), ElementCountOverflow(b)) => a == b,
            (UnknownElement(a), UnknownElement(b)) => a == b,
            (UnknownSourceType(a), UnknownSourceType(b)) => a == b,
            (UnknownTelescopeType(a), UnknownTelescopeType(b)) => a == b,
            (UnknownWavelength(a), UnknownWavelength(b)) => a == b,
            (UnknownDetectionFlag(a), UnknownDetectionFlag(b)) => a == b,
            (SourceNotFound(a), SourceNotFound(b)) => a == b,
            (TelescopeNotFound(a), TelescopeNotFound(b)) => a == b,
            (MoleculeNotFound(a), MoleculeNotFound(b)) => a == b,
            (SourceNameNotFound(a), SourceNameNotFound(b)) => a == b,
            (TelescopeNameNotFound(a), TelescopeNameNotFound(b)) => a == b,
            (DuplicateSource(a), DuplicateSource(b)) => a == b,
            (DuplicateTelescope(a), DuplicateTelescope(b)) => a == b,
            (InvalidRotationalConstants(a), InvalidRotationalConstants(b)) => a == b,
            (InvalidCoordinates(a), InvalidCoordinates(b)) => a == b,
            (
                InvalidActiveWindow {
                    built: b1,
                    decommissioned: d1,
                },
                InvalidActiveWindow {
                    built: b2,
                    decommissioned: d2,
                },
            ) => b1 == b2 && d1 == d2,
            (InvalidReportParameter(a), InvalidReportParameter(b)) => a == b,
            (InvalidFormula(a), InvalidFormula(b)) => a == b,
            (ClockError(a), ClockError(b)) => a == b,

            // not comparable: equal when the variant matches
            (CsvError(_), CsvError(_)) => true,
            (IoError(_), IoError(_)) => true,

            (NanValue, NanValue) => true,

            _ => false,
        }
    }
}
