//! CLI command handlers
//!
//! Bridges the clap argument parsing with the service layer.

pub mod catalog;
pub mod classify;
pub mod import;
pub mod registry;

use clap::ValueEnum;

use crate::import::RegistryTable;

pub use catalog::{handle_catalog_command, CatalogCommands};
pub use classify::{handle_classify_command, ClassifyCommands};
pub use import::{handle_import_command, ImportCommands};
pub use registry::{handle_registry_command, RegistryCommands};

/// Registry selector shared by several commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TableArg {
    Expenditures,
    Commitments,
}

impl From<TableArg> for RegistryTable {
    fn from(arg: TableArg) -> Self {
        match arg {
            TableArg::Expenditures => RegistryTable::Expenditures,
            TableArg::Commitments => RegistryTable::Commitments,
        }
    }
}
