//! Append-only audit log
//!
//! One JSON object per line. Entries of a committed import batch are
//! written together and flushed once.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{FinregError, FinregResult};

use super::entry::AuditEntry;

pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    fn open(&self) -> FinregResult<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| FinregError::Io(format!("Failed to open audit log: {}", e)))
    }

    pub fn log(&self, entry: &AuditEntry) -> FinregResult<()> {
        self.log_batch(std::slice::from_ref(entry))
    }

    pub fn log_batch(&self, entries: &[AuditEntry]) -> FinregResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut file = self.open()?;
        for entry in entries {
            let json = serde_json::to_string(entry).map_err(|e| {
                FinregError::Json(format!("Failed to serialize audit entry: {}", e))
            })?;
            writeln!(file, "{}", json)
                .map_err(|e| FinregError::Io(format!("Failed to write audit entry: {}", e)))?;
        }
        file.flush()
            .map_err(|e| FinregError::Io(format!("Failed to flush audit log: {}", e)))
    }

    /// All entries, oldest first
    pub fn read_all(&self) -> FinregResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| FinregError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut entries = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                FinregError::Io(format!("Failed to read audit log line {}: {}", line_num + 1, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(&line).map_err(|e| {
                FinregError::Json(format!(
                    "Failed to parse audit entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// The last `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> FinregResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::{Action, TargetTable};
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        (logger, temp_dir)
    }

    fn insert(number: i64) -> AuditEntry {
        AuditEntry::insert(
            "import",
            TargetTable::Expenditures,
            format!("{}/2024", number),
            &json!({ "registration_number": number }),
        )
    }

    #[test]
    fn test_log_and_read() {
        let (logger, _temp) = create_test_logger();
        logger.log(&insert(1)).unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, Action::Insert);
        assert_eq!(entries[0].target, "1/2024");
    }

    #[test]
    fn test_batch_and_recent() {
        let (logger, _temp) = create_test_logger();
        let entries: Vec<_> = (1..=10).map(insert).collect();
        logger.log_batch(&entries).unwrap();

        let recent = logger.read_recent(3).unwrap();
        let targets: Vec<_> = recent.iter().map(|e| e.target.as_str()).collect();
        assert_eq!(targets, vec!["8/2024", "9/2024", "10/2024"]);
    }

    #[test]
    fn test_empty_log() {
        let (logger, _temp) = create_test_logger();
        assert!(logger.read_all().unwrap().is_empty());
        logger.log_batch(&[]).unwrap();
        assert!(!logger.path().exists());
    }

    #[test]
    fn test_appends_across_instances() {
        let (logger, temp) = create_test_logger();
        logger.log(&insert(1)).unwrap();
        AuditLogger::new(temp.path().join("audit.log"))
            .log(&insert(2))
            .unwrap();
        assert_eq!(logger.read_all().unwrap().len(), 2);
    }
}
