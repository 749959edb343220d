//! Path management for finreg
//!
//! Provides XDG-compliant path resolution for configuration, data and the
//! audit log.
//!
//! ## Path Resolution Order
//!
//! 1. `FINREG_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/finreg` or `~/.config/finreg`
//! 3. Windows: `%APPDATA%\finreg`

use std::path::PathBuf;

use crate::error::FinregError;

/// Manages all paths used by finreg
#[derive(Debug, Clone)]
pub struct FinregPaths {
    base_dir: PathBuf,
}

impl FinregPaths {
    /// Create a new FinregPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, FinregError> {
        let base_dir = if let Ok(custom) = std::env::var("FINREG_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create FinregPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/finreg/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to catalog.json (all reference entities)
    pub fn catalog_file(&self) -> PathBuf {
        self.data_dir().join("catalog.json")
    }

    pub fn expenditures_file(&self) -> PathBuf {
        self.data_dir().join("expenditures.json")
    }

    pub fn commitments_file(&self) -> PathBuf {
        self.data_dir().join("commitments.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), FinregError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| FinregError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| FinregError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if finreg has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, FinregError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME").map_err(|_| {
                FinregError::Config("HOME environment variable not set".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("finreg"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, FinregError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| FinregError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("finreg"))
}
