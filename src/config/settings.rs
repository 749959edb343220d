//! User settings for finreg
//!
//! Holds the import tuning knobs (error ceiling, header rows, date format),
//! the acting user stamped on imported records, the logging filter and the
//! per-row override table used to patch known bad rows in legacy sheets.

use serde::{Deserialize, Serialize};

use super::paths::FinregPaths;
use crate::error::FinregError;
use crate::import::overrides::{default_row_overrides, OverrideAction, RowOverride};
use crate::import::{ImportOptions, RegistryTable, DEFAULT_MAX_ERRORS};

/// User settings for finreg
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Registry year used for manually created records (None = calendar year)
    #[serde(default)]
    pub current_year: Option<i32>,

    /// A batch stops once more than this many rows have been rejected
    #[serde(default = "default_max_errors")]
    pub max_errors: usize,

    /// First data row (1-based) of an expenditures sheet
    #[serde(default = "default_expenditure_start_row")]
    pub expenditure_start_row: usize,

    /// First data row (1-based) of a commitments sheet
    #[serde(default = "default_commitment_start_row")]
    pub commitment_start_row: usize,

    /// Format of date cells typed as text (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// tracing filter directive, overridden by RUST_LOG
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// User recorded as creator/updater of imported records
    #[serde(default = "default_acting_user")]
    pub acting_user: String,

    /// Hard-coded fixes for individual legacy rows
    #[serde(default = "default_row_overrides")]
    pub row_overrides: Vec<RowOverride>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_max_errors() -> usize {
    DEFAULT_MAX_ERRORS
}

fn default_expenditure_start_row() -> usize {
    2
}

fn default_commitment_start_row() -> usize {
    3
}

fn default_date_format() -> String {
    "%d.%m.%Y".to_string()
}

fn default_log_filter() -> String {
    "finreg=info".to_string()
}

fn default_acting_user() -> String {
    "import".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            current_year: None,
            max_errors: default_max_errors(),
            expenditure_start_row: default_expenditure_start_row(),
            commitment_start_row: default_commitment_start_row(),
            date_format: default_date_format(),
            log_filter: default_log_filter(),
            acting_user: default_acting_user(),
            row_overrides: default_row_overrides(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &FinregPaths) -> Result<Self, FinregError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| FinregError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                FinregError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FinregPaths) -> Result<(), FinregError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| FinregError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| FinregError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), FinregError> {
        if self.expenditure_start_row == 0 || self.commitment_start_row == 0 {
            return Err(FinregError::Config(
                "start rows are 1-based and must be at least 1".into(),
            ));
        }
        if self.date_format.trim().is_empty() {
            return Err(FinregError::Config("date_format cannot be empty".into()));
        }
        for entry in &self.row_overrides {
            if entry.table == RegistryTable::Expenditures
                && matches!(entry.action, OverrideAction::AddFinancingSource { .. })
            {
                return Err(FinregError::Config(format!(
                    "row override for expenditure {}: an expenditure has a single financing source",
                    entry.registration_number
                )));
            }
        }
        Ok(())
    }

    /// The registry year for new records
    pub fn registry_year(&self) -> i32 {
        use chrono::Datelike;
        self.current_year
            .unwrap_or_else(|| chrono::Local::now().date_naive().year())
    }

    /// Import options for one of the registry tables
    pub fn import_options(&self, table: RegistryTable) -> ImportOptions {
        let start_row = match table {
            RegistryTable::Expenditures => self.expenditure_start_row,
            RegistryTable::Commitments => self.commitment_start_row,
        };
        ImportOptions {
            start_row,
            max_errors: self.max_errors,
            date_format: self.date_format.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.max_errors, DEFAULT_MAX_ERRORS);
        assert_eq!(settings.expenditure_start_row, 2);
        assert_eq!(settings.commitment_start_row, 3);
        assert_eq!(settings.date_format, "%d.%m.%Y");
        assert_eq!(settings.row_overrides.len(), 3);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinregPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.max_errors = 3;
        settings.acting_user = "ana.popescu".into();
        settings.row_overrides.clear();

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.max_errors, 3);
        assert_eq!(loaded.acting_user, "ana.popescu");
        assert!(loaded.row_overrides.is_empty());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"max_errors": 0}"#).unwrap();
        assert_eq!(settings.max_errors, 0);
        assert_eq!(settings.commitment_start_row, 3);
        assert_eq!(settings.row_overrides.len(), 3);
    }

    #[test]
    fn test_invalid_start_row_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinregPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        std::fs::write(paths.settings_file(), r#"{"expenditure_start_row": 0}"#).unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, FinregError::Config(_)));
    }

    #[test]
    fn test_added_source_rejected_for_expenditures() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_ok());

        settings.row_overrides.push(RowOverride::new(
            RegistryTable::Expenditures,
            12,
            OverrideAction::AddFinancingSource {
                name: "Cercetare".into(),
            },
        ));
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, FinregError::Config(_)));
    }

    #[test]
    fn test_import_options_per_table() {
        let settings = Settings::default();
        assert_eq!(settings.import_options(RegistryTable::Expenditures).start_row, 2);
        assert_eq!(settings.import_options(RegistryTable::Commitments).start_row, 3);
    }
}
