//! Registry CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_commitment_list, format_expenditure_list};
use crate::error::FinregResult;
use crate::import::RegistryTable;
use crate::storage::Storage;

use super::TableArg;

/// Registry subcommands
#[derive(Subcommand)]
pub enum RegistryCommands {
    /// List the records of one registry year
    List {
        #[arg(value_enum)]
        table: TableArg,
        /// Registry year (defaults to the current one)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Show the next free registration number
    Next {
        #[arg(value_enum)]
        table: TableArg,
        /// Registry year (defaults to the current one)
        #[arg(short, long)]
        year: Option<i32>,
    },
}

pub fn handle_registry_command(
    storage: &Storage,
    settings: &Settings,
    cmd: RegistryCommands,
) -> FinregResult<()> {
    match cmd {
        RegistryCommands::List { table, year } => {
            let year = year.unwrap_or_else(|| settings.registry_year());
            let catalog = storage.catalog.data()?;
            match RegistryTable::from(table) {
                RegistryTable::Expenditures => {
                    let records = storage.expenditures.get_by_year(year)?;
                    print!("{}", format_expenditure_list(&records, &catalog));
                }
                RegistryTable::Commitments => {
                    let records = storage.commitments.get_by_year(year)?;
                    print!("{}", format_commitment_list(&records, &catalog));
                }
            }
        }

        RegistryCommands::Next { table, year } => {
            let year = year.unwrap_or_else(|| settings.registry_year());
            let next = match RegistryTable::from(table) {
                RegistryTable::Expenditures => storage.expenditures.next_registration_number(year)?,
                RegistryTable::Commitments => storage.commitments.next_registration_number(year)?,
            };
            println!("{}/{}", next, year);
        }
    }

    Ok(())
}
