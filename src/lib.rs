pub mod aggregation;
pub mod astromol_errors;
pub mod catalog;
pub mod constants;
pub mod env_state;
pub mod fixtures;
pub mod molecules;
pub mod report_params;
pub mod sources;
pub mod telescopes;

pub use aggregation::{aggregate, aggregate_joint, aggregate_parallel, GroupedTally};
pub use astromol_errors::AstromolError;
pub use catalog::{Catalog, CatalogBuilder};
pub use env_state::EvaluationEnv;
pub use report_params::ReportParams;
