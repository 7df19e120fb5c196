//! # Report configuration
//!
//! [`ReportParams`] gathers the filters and thresholds used by the
//! [report catalogue](crate::aggregation::reports) and the
//! [facility statistics](crate::telescopes::facility_stats). Use [`ReportParams::default`] for
//! the census defaults, or [`ReportParams::builder`] to override some of them with validation.
//!
//! ```rust
//! use astromol::report_params::ReportParams;
//!
//! let params = ReportParams::builder()
//!     .outlier_fraction(0.05)
//!     .trim_du_reports(true)
//!     .build()?;
//! assert_eq!(params.mass_bucket_width, 10);
//! # Ok::<(), astromol::astromol_errors::AstromolError>(())
//! ```
use std::fmt;

use crate::astromol_errors::AstromolError;
use crate::constants::{
    AtomCount, Mass, DEFAULT_DU_CEILING, DEFAULT_MASS_BUCKET_CAP, DEFAULT_MASS_BUCKET_WIDTH,
    DEFAULT_MAX_CARBON, DEFAULT_MAX_NATOMS, DEFAULT_MAX_RESOLVED_ATOMS,
    DEFAULT_MIN_FACILITY_DETECTIONS, DEFAULT_OUTLIER_FRACTION,
};

/// Filters and thresholds for grouped reports.
///
/// Invariants (checked by [`ReportParamsBuilder::build`])
/// -----------------
/// * `0 ≤ outlier_fraction < 0.5`.
/// * `du_ceiling` finite.
/// * `mass_bucket_width ≥ 1` and `mass_bucket_cap` a multiple of it.
/// * `max_resolved_atoms ≥ 2`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportParams {
    /// Fraction of values dropped at each end of trimmed collections.
    pub outlier_fraction: f64,
    /// Also trim the DU and relative-DU collections. Off by default: the census trims mass and
    /// atom-count collections but publishes untrimmed DU distributions.
    pub trim_du_reports: bool,
    /// DU collections keep values strictly below this.
    pub du_ceiling: f64,
    /// Mass collections keep molecules with strictly fewer carbons.
    pub max_carbon: AtomCount,
    /// Atom-count collections keep molecules with strictly fewer atoms.
    pub max_natoms: AtomCount,
    pub mass_bucket_width: Mass,
    pub mass_bucket_cap: Mass,
    /// Largest atom count with its own bucket.
    pub max_resolved_atoms: AtomCount,
    /// Facilities need strictly more detections than this to get a yearly row.
    pub min_facility_detections: usize,
}

impl ReportParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ReportParamsBuilder {
        ReportParamsBuilder::new()
    }
}

impl Default for ReportParams {
    fn default() -> Self {
        ReportParams {
            outlier_fraction: DEFAULT_OUTLIER_FRACTION,
            trim_du_reports: false,
            du_ceiling: DEFAULT_DU_CEILING,
            max_carbon: DEFAULT_MAX_CARBON,
            max_natoms: DEFAULT_MAX_NATOMS,
            mass_bucket_width: DEFAULT_MASS_BUCKET_WIDTH,
            mass_bucket_cap: DEFAULT_MASS_BUCKET_CAP,
            max_resolved_atoms: DEFAULT_MAX_RESOLVED_ATOMS,
            min_facility_detections: DEFAULT_MIN_FACILITY_DETECTIONS,
        }
    }
}

/// Builder for [`ReportParams`], with validation.
#[derive(Debug, Clone)]
pub struct ReportParamsBuilder {
    params: ReportParams,
}

impl Default for ReportParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: ReportParams::default(),
        }
    }

    // --- Trimming ---
    pub fn outlier_fraction(mut self, v: f64) -> Self {
        self.params.outlier_fraction = v;
        self
    }
    pub fn trim_du_reports(mut self, v: bool) -> Self {
        self.params.trim_du_reports = v;
        self
    }

    // --- Collection filters ---
    pub fn du_ceiling(mut self, v: f64) -> Self {
        self.params.du_ceiling = v;
        self
    }
    pub fn max_carbon(mut self, v: AtomCount) -> Self {
        self.params.max_carbon = v;
        self
    }
    pub fn max_natoms(mut self, v: AtomCount) -> Self {
        self.params.max_natoms = v;
        self
    }

    // --- Buckets ---
    pub fn mass_bucket_width(mut self, v: Mass) -> Self {
        self.params.mass_bucket_width = v;
        self
    }
    pub fn mass_bucket_cap(mut self, v: Mass) -> Self {
        self.params.mass_bucket_cap = v;
        self
    }
    pub fn max_resolved_atoms(mut self, v: AtomCount) -> Self {
        self.params.max_resolved_atoms = v;
        self
    }

    // --- Facilities ---
    pub fn min_facility_detections(mut self, v: usize) -> Self {
        self.params.min_facility_detections = v;
        self
    }

    /// Validate and return the parameters.
    ///
    /// Errors
    /// ----------
    /// * [`AstromolError::InvalidReportParameter`] naming the first violated constraint.
    pub fn build(self) -> Result<ReportParams, AstromolError> {
        let p = &self.params;

        if !(p.outlier_fraction.is_finite() && (0.0..0.5).contains(&p.outlier_fraction)) {
            return Err(AstromolError::InvalidReportParameter(
                "outlier_fraction must be in [0, 0.5)".into(),
            ));
        }
        if !p.du_ceiling.is_finite() {
            return Err(AstromolError::InvalidReportParameter(
                "du_ceiling must be finite".into(),
            ));
        }
        if p.mass_bucket_width == 0 {
            return Err(AstromolError::InvalidReportParameter(
                "mass_bucket_width must be >= 1".into(),
            ));
        }
        if p.mass_bucket_cap % p.mass_bucket_width != 0 {
            return Err(AstromolError::InvalidReportParameter(
                "mass_bucket_cap must be a multiple of mass_bucket_width".into(),
            ));
        }
        if p.max_resolved_atoms < 2 {
            return Err(AstromolError::InvalidReportParameter(
                "max_resolved_atoms must be >= 2".into(),
            ));
        }

        Ok(self.params)
    }
}

impl fmt::Display for ReportParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Report Parameters")?;
            writeln!(f, "-----------------")?;
            writeln!(f, "  outlier_fraction        = {}", self.outlier_fraction)?;
            writeln!(f, "  trim_du_reports         = {}", self.trim_du_reports)?;
            writeln!(f, "  du_ceiling              = {}", self.du_ceiling)?;
            writeln!(f, "  max_carbon              = {}", self.max_carbon)?;
            writeln!(f, "  max_natoms              = {}", self.max_natoms)?;
            writeln!(f, "  mass_bucket_width       = {}", self.mass_bucket_width)?;
            writeln!(f, "  mass_bucket_cap         = {}", self.mass_bucket_cap)?;
            writeln!(f, "  max_resolved_atoms      = {}", self.max_resolved_atoms)?;
            write!(f, "  min_facility_detections = {}", self.min_facility_detections)
        } else {
            write!(
                f,
                concat!(
                    "ReportParams(trim={}, du_trim={}, du<{}, C<{}, natoms<{}, ",
                    "mass/{}..{}+, atoms..{}, facilities>{})"
                ),
                self.outlier_fraction,
                self.trim_du_reports,
                self.du_ceiling,
                self.max_carbon,
                self.max_natoms,
                self.mass_bucket_width,
                self.mass_bucket_cap,
                self.max_resolved_atoms,
                self.min_facility_detections
            )
        }
    }
}

#[cfg(test)]
mod report_params_test {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = ReportParams::default();
        assert_eq!(params.outlier_fraction, 0.1);
        assert!(!params.trim_du_reports);
        assert_eq!(params.du_ceiling, 20.0);
        assert_eq!(params.max_carbon, 20);
        assert_eq!(params.max_natoms, 60);
        assert_eq!(params.mass_bucket_cap, 130);
        assert_eq!(params.min_facility_detections, 4);
        assert_eq!(ReportParams::builder().build(), Ok(params));
    }

    #[test]
    fn test_builder_overrides() {
        let params = ReportParams::builder()
            .outlier_fraction(0.2)
            .trim_du_reports(true)
            .mass_bucket_width(20)
            .mass_bucket_cap(200)
            .build()
            .unwrap();
        assert_eq!(params.outlier_fraction, 0.2);
        assert!(params.trim_du_reports);
        assert_eq!(params.mass_bucket_width, 20);
    }

    #[test]
    fn test_builder_validation() {
        let bad = [
            ReportParams::builder().outlier_fraction(0.5),
            ReportParams::builder().outlier_fraction(-0.1),
            ReportParams::builder().outlier_fraction(f64::NAN),
            ReportParams::builder().du_ceiling(f64::INFINITY),
            ReportParams::builder().mass_bucket_width(0),
            ReportParams::builder().mass_bucket_cap(125),
            ReportParams::builder().max_resolved_atoms(1),
        ];
        for builder in bad {
            assert!(matches!(
                builder.build(),
                Err(AstromolError::InvalidReportParameter(_))
            ));
        }
    }

    #[test]
    fn test_display_alternate() {
        let text = format!("{:#}", ReportParams::default());
        assert!(text.starts_with("Report Parameters"));
        assert!(text.contains("min_facility_detections = 4"));
    }
}
