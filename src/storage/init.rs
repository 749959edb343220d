//! First-run setup
//!
//! Creates the data directory and empty data files so later commands can
//! tell an initialized registry from a typo in `FINREG_DATA_DIR`.

use crate::config::paths::FinregPaths;
use crate::error::FinregError;

use super::catalog::CatalogData;
use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation; existing files are kept
pub fn initialize_storage(paths: &FinregPaths) -> Result<(), FinregError> {
    paths.ensure_directories()?;

    if !paths.catalog_file().exists() {
        write_json_atomic(paths.catalog_file(), &CatalogData::default())?;
    }
    for registry in [paths.expenditures_file(), paths.commitments_file()] {
        if !registry.exists() {
            write_json_atomic(&registry, &serde_json::json!({ "records": [] }))?;
        }
    }

    Ok(())
}

pub fn needs_initialization(paths: &FinregPaths) -> bool {
    !paths.catalog_file().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentType;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinregPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));
        initialize_storage(&paths).unwrap();

        assert!(!needs_initialization(&paths));
        assert!(paths.expenditures_file().exists());
        assert!(paths.commitments_file().exists());
    }

    #[test]
    fn test_doesnt_overwrite_existing_catalog() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinregPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();

        let data = CatalogData {
            payment_types: vec![PaymentType::new("Numerar")],
            ..CatalogData::default()
        };
        write_json_atomic(paths.catalog_file(), &data).unwrap();

        initialize_storage(&paths).unwrap();

        let content = std::fs::read_to_string(paths.catalog_file()).unwrap();
        let reloaded: CatalogData = serde_json::from_str(&content).unwrap();
        assert_eq!(reloaded.payment_types.len(), 1);
    }
}
