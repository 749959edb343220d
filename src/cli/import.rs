//! Import CLI commands

use std::path::PathBuf;

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_import_summary;
use crate::error::{FinregError, FinregResult};
use crate::import::RegistryTable;
use crate::services::ImportService;
use crate::storage::Storage;

/// Import subcommands
#[derive(Subcommand)]
pub enum ImportCommands {
    /// Import an expenditures registry sheet
    Expenditures {
        /// Spreadsheet file (.xlsx, .xls, .ods or .csv)
        file: PathBuf,
        /// Validate every row without saving anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Import a commitments registry sheet
    Commitments {
        /// Spreadsheet file (.xlsx, .xls, .ods or .csv)
        file: PathBuf,
        /// Validate every row without saving anything
        #[arg(long)]
        dry_run: bool,
    },
}

/// Handle an import command
pub fn handle_import_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ImportCommands,
) -> FinregResult<()> {
    let (table, file, dry_run) = match cmd {
        ImportCommands::Expenditures { file, dry_run } => {
            (RegistryTable::Expenditures, file, dry_run)
        }
        ImportCommands::Commitments { file, dry_run } => {
            (RegistryTable::Commitments, file, dry_run)
        }
    };

    let service = ImportService::new(storage, settings);
    let summary = service.import_file(table, &file, dry_run)?;
    print!("{}", format_import_summary(&summary));

    if summary.is_success() {
        Ok(())
    } else {
        Err(FinregError::Import(format!(
            "{} row(s) rejected in {}",
            summary.errors.len(),
            file.display()
        )))
    }
}
