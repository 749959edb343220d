//! Catalog CLI commands
//!
//! Seeding, spreadsheet import and listing of the reference catalog.

use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use crate::config::settings::Settings;
use crate::display::{format_catalog, format_catalog_import_summary, format_seed_summary};
use crate::error::{FinregError, FinregResult};
use crate::services::{CatalogKind, CatalogService};
use crate::storage::Storage;

/// Reference table selector for `catalog import`
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CatalogKindArg {
    Sources,
    Categories,
    Articles,
    PaymentTypes,
}

impl From<CatalogKindArg> for CatalogKind {
    fn from(arg: CatalogKindArg) -> Self {
        match arg {
            CatalogKindArg::Sources => CatalogKind::FinancingSources,
            CatalogKindArg::Categories => CatalogKind::ProjectCategories,
            CatalogKindArg::Articles => CatalogKind::Articles,
            CatalogKindArg::PaymentTypes => CatalogKind::PaymentTypes,
        }
    }
}

/// Catalog subcommands
#[derive(Subcommand)]
pub enum CatalogCommands {
    /// Load reference entities from a YAML file (find-or-update)
    Seed {
        /// YAML seed file
        file: PathBuf,
    },

    /// Import one reference table from a spreadsheet with a header row
    Import {
        /// Which table the sheet holds
        #[arg(value_enum)]
        kind: CatalogKindArg,
        /// Spreadsheet file (.xlsx, .xls, .ods or .csv)
        file: PathBuf,
    },

    /// List the whole catalog
    List,
}

/// Handle a catalog command
pub fn handle_catalog_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CatalogCommands,
) -> FinregResult<()> {
    let service = CatalogService::new(storage, &settings.acting_user);

    match cmd {
        CatalogCommands::Seed { file } => {
            let summary = service.seed_from_yaml(&file)?;
            print!("{}", format_seed_summary(&summary));
        }

        CatalogCommands::Import { kind, file } => {
            let summary = service.import_spreadsheet(kind.into(), &file, settings.max_errors)?;
            print!("{}", format_catalog_import_summary(&summary));
            if summary.applied.is_none() {
                return Err(FinregError::Import(format!(
                    "{} row(s) rejected in {}",
                    summary.errors.len(),
                    file.display()
                )));
            }
        }

        CatalogCommands::List => {
            print!("{}", format_catalog(&service.list()?));
        }
    }

    Ok(())
}
