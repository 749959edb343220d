use anyhow::Result;
use clap::{Parser, Subcommand};

use finreg::cli::{
    handle_catalog_command, handle_classify_command, handle_import_command,
    handle_registry_command, CatalogCommands, ClassifyCommands, ImportCommands, RegistryCommands,
};
use finreg::config::{paths::FinregPaths, settings::Settings};
use finreg::display::format_audit_entries;
use finreg::logging::init_tracing;
use finreg::storage::Storage;

#[derive(Parser)]
#[command(
    name = "finreg",
    version,
    about = "University financial registry",
    long_about = "finreg keeps the yearly expenditure and commitment registries and \
                  imports them from legacy spreadsheets, mapping free-text financing \
                  source and project labels onto the reference catalog."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a registry spreadsheet
    #[command(subcommand)]
    Import(ImportCommands),

    /// Reference catalog management
    #[command(subcommand)]
    Catalog(CatalogCommands),

    /// Troubleshoot how a label is classified
    #[command(subcommand)]
    Classify(ClassifyCommands),

    /// Inspect the registries
    #[command(subcommand)]
    Registry(RegistryCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = FinregPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings.log_filter);

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Import(cmd)) => handle_import_command(&storage, &settings, cmd)?,
        Some(Commands::Catalog(cmd)) => handle_catalog_command(&storage, &settings, cmd)?,
        Some(Commands::Classify(cmd)) => handle_classify_command(&storage, cmd)?,
        Some(Commands::Registry(cmd)) => handle_registry_command(&storage, &settings, cmd)?,
        Some(Commands::Audit { limit }) => {
            let entries = storage.audit().read_recent(limit)?;
            print!("{}", format_audit_entries(&entries));
        }
        Some(Commands::Init) => {
            println!("Initializing finreg at: {}", paths.data_dir().display());
            finreg::storage::initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'finreg catalog seed <file.yaml>' to load the reference catalog.");
        }
        Some(Commands::Config) => {
            println!("finreg Configuration");
            println!("====================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Acting user:       {}", settings.acting_user);
            println!("  Max errors:        {}", settings.max_errors);
            println!("  Date format:       {}", settings.date_format);
            println!("  Expenditure start: row {}", settings.expenditure_start_row);
            println!("  Commitment start:  row {}", settings.commitment_start_row);
            println!("  Row overrides:     {}", settings.row_overrides.len());
        }
        None => {
            println!("finreg - university financial registry");
            println!();
            println!("Run 'finreg --help' for usage information.");
        }
    }

    Ok(())
}
