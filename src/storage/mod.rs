//! Storage layer for finreg
//!
//! JSON files with atomic writes: the reference catalog and one file per
//! registry, plus the audit log.

pub mod catalog;
pub mod file_io;
pub mod init;
pub mod registry;

pub use catalog::{CatalogData, CatalogRepository, CatalogTable};
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use registry::{CommitmentRepository, ExpenditureRepository, ImportTransaction, RegistryRepository};

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::paths::FinregPaths;
use crate::error::FinregError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: FinregPaths,
    pub catalog: CatalogRepository,
    pub expenditures: ExpenditureRepository,
    pub commitments: CommitmentRepository,
    audit: AuditLogger,
}

impl Storage {
    pub fn new(paths: FinregPaths) -> Result<Self, FinregError> {
        paths.ensure_directories()?;

        Ok(Self {
            catalog: CatalogRepository::new(paths.catalog_file()),
            expenditures: ExpenditureRepository::new(paths.expenditures_file()),
            commitments: CommitmentRepository::new(paths.commitments_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &FinregPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), FinregError> {
        self.catalog.load()?;
        self.expenditures.load()?;
        self.commitments.load()?;
        Ok(())
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Append entries to the audit log
    pub fn log_audit(&self, entries: &[AuditEntry]) -> Result<(), FinregError> {
        self.audit.log_batch(entries)
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinregPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
        storage.load_all().unwrap();
        assert_eq!(storage.expenditures.count().unwrap(), 0);
    }
}
