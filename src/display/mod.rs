//! Display formatting for terminal output
//!
//! Plain-text tables for registries and import results; the catalog is
//! rendered with `tabled`.

pub mod audit;
pub mod catalog;
pub mod import;
pub mod registry;

pub use audit::format_audit_entries;
pub use catalog::format_catalog;
pub use import::{
    format_catalog_import_summary, format_classification, format_import_summary,
    format_seed_summary,
};
pub use registry::{format_commitment_list, format_expenditure_list};
