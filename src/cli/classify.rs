//! Label troubleshooting command

use clap::Subcommand;

use crate::display::format_classification;
use crate::error::{FinregError, FinregResult};
use crate::import::RegistryTable;
use crate::services::ClassifyService;
use crate::storage::Storage;

use super::TableArg;

/// Classify subcommands
#[derive(Subcommand)]
pub enum ClassifyCommands {
    /// Show which financing source a label resolves to
    Financing {
        /// Label as typed in the sheet
        label: String,
        /// Rule table to use
        #[arg(short, long, value_enum, default_value = "expenditures")]
        table: TableArg,
    },

    /// Show which project category an expenditure project label resolves to
    Project {
        /// Project label as typed in the sheet
        label: String,
        /// Financing source label of the same row
        #[arg(short, long)]
        source: String,
    },
}

pub fn handle_classify_command(storage: &Storage, cmd: ClassifyCommands) -> FinregResult<()> {
    let service = ClassifyService::new(storage)?;

    let (label, result) = match cmd {
        ClassifyCommands::Financing { label, table } => {
            let result = service.financing(RegistryTable::from(table), &label);
            (label, result)
        }
        ClassifyCommands::Project { label, source } => {
            let result = service.project(&label, &source);
            (label, result)
        }
    };

    match result {
        Ok(classification) => {
            print!("{}", format_classification(&label, &classification));
            Ok(())
        }
        Err(e) => Err(FinregError::Import(e.message)),
    }
}
