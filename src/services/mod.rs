//! Service layer for finreg
//!
//! Business operations on top of storage: importing registry sheets,
//! maintaining the reference catalog and troubleshooting label rules.

pub mod catalog;
pub mod classify;
pub mod import;

pub use catalog::{CatalogImportSummary, CatalogKind, CatalogSeed, CatalogService, SeedSummary};
pub use classify::{Classification, ClassifyService};
pub use import::{ImportService, ImportSummary};
