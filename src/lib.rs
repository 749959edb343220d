//! finreg - university financial registry
//!
//! Keeps the yearly expenditure and commitment registries of a university
//! and imports them from the legacy spreadsheets clerks have kept for
//! years. Free-text financing source and project labels are normalized
//! against a reference catalog through ordered rule tables; a sheet is
//! imported completely or not at all.
//!
//! # Architecture
//!
//! - `config`: path resolution and user settings
//! - `error`: `FinregError` and row-level `ImportError`
//! - `models`: reference entities, registry records, spreadsheet rows
//! - `import`: normalization, classification and the batch controller
//! - `storage`: JSON repositories with staged import transactions
//! - `services`: import, catalog and classification operations
//! - `audit`: append-only audit log
//! - `cli`, `display`: the command-line surface
//!
//! # Example
//!
//! ```rust,ignore
//! use finreg::config::{paths::FinregPaths, settings::Settings};
//! use finreg::import::RegistryTable;
//! use finreg::services::ImportService;
//! use finreg::storage::Storage;
//!
//! let paths = FinregPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut storage = Storage::new(paths)?;
//! storage.load_all()?;
//!
//! let summary = ImportService::new(&storage, &settings)
//!     .import_file(RegistryTable::Expenditures, "cheltuieli.xlsx".as_ref(), false)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod import;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{FinregError, FinregResult, ImportError};
