//! Registry repositories for expenditures and commitments
//!
//! Both registries are keyed by `(year, registration_number)`. Imports go
//! through an `ImportTransaction`: records are validated and staged one by
//! one, then either appended and written in a single atomic file write or
//! dropped.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::error::{FinregError, FinregResult};
use crate::import::RecordSink;
use crate::models::{Commitment, Expenditure, RegistryRecord};

use super::file_io::{read_json, write_json_atomic};

/// On-disk layout of a registry file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RegistryData<R> {
    #[serde(default = "Vec::new")]
    records: Vec<R>,
}

impl<R> Default for RegistryData<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

/// Repository for one registry
pub struct RegistryRepository<R> {
    path: PathBuf,
    data: RwLock<Vec<R>>,
}

pub type ExpenditureRepository = RegistryRepository<Expenditure>;
pub type CommitmentRepository = RegistryRepository<Commitment>;

impl<R> RegistryRepository<R>
where
    R: RegistryRecord + Clone + Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load records from disk
    pub fn load(&self) -> FinregResult<()> {
        let file_data: RegistryData<R> = read_json(&self.path)?;
        let mut data = self
            .data
            .write()
            .map_err(|e| FinregError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = file_data.records;
        Ok(())
    }

    /// Save records to disk, ordered by year and registration number
    pub fn save(&self) -> FinregResult<()> {
        let records = self.get_all()?;
        write_json_atomic(&self.path, &RegistryData { records })
    }

    /// All records ordered by year and registration number
    pub fn get_all(&self) -> FinregResult<Vec<R>> {
        let data = self
            .data
            .read()
            .map_err(|e| FinregError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let mut records = data.clone();
        records.sort_by_key(|r| (r.year(), r.registration_number()));
        Ok(records)
    }

    /// Records of one registry year
    pub fn get_by_year(&self, year: i32) -> FinregResult<Vec<R>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|r| r.year() == year)
            .collect())
    }

    pub fn get(&self, year: i32, registration_number: i64) -> FinregResult<Option<R>> {
        let data = self
            .data
            .read()
            .map_err(|e| FinregError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data
            .iter()
            .find(|r| r.year() == year && r.registration_number() == registration_number)
            .cloned())
    }

    pub fn exists(&self, year: i32, registration_number: i64) -> FinregResult<bool> {
        Ok(self.get(year, registration_number)?.is_some())
    }

    /// Highest registration number of the year plus one.
    ///
    /// Not reserved: two writers asking at the same time get the same number.
    pub fn next_registration_number(&self, year: i32) -> FinregResult<i64> {
        let data = self
            .data
            .read()
            .map_err(|e| FinregError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let max = data
            .iter()
            .filter(|r| r.year() == year)
            .map(|r| r.registration_number())
            .max()
            .unwrap_or(0);
        Ok(max + 1)
    }

    pub fn count(&self) -> FinregResult<usize> {
        let data = self
            .data
            .read()
            .map_err(|e| FinregError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }

    /// Start a staged batch of inserts
    pub fn begin(&self) -> ImportTransaction<'_, R> {
        ImportTransaction {
            repository: self,
            staged: Vec::new(),
            keys: HashSet::new(),
        }
    }

    /// Append records and write the file; memory is restored if the write
    /// fails
    fn append(&self, records: &[R]) -> FinregResult<()> {
        let previous_len = {
            let mut data = self.data.write().map_err(|e| {
                FinregError::Storage(format!("Failed to acquire write lock: {}", e))
            })?;
            let len = data.len();
            data.extend(records.iter().cloned());
            len
        };

        if let Err(e) = self.save() {
            if let Ok(mut data) = self.data.write() {
                data.truncate(previous_len);
            }
            return Err(e);
        }
        Ok(())
    }
}

/// Records validated and waiting for commit
pub struct ImportTransaction<'a, R> {
    repository: &'a RegistryRepository<R>,
    staged: Vec<R>,
    /// `(year, registration_number)` of the staged records
    keys: HashSet<(i32, i64)>,
}

impl<R> ImportTransaction<'_, R> {
    pub fn staged(&self) -> &[R] {
        &self.staged
    }
}

impl<R> RecordSink for ImportTransaction<'_, R>
where
    R: RegistryRecord + Clone + Serialize + DeserializeOwned,
{
    type Record = R;

    fn save(&mut self, record: R) -> Result<(), Vec<String>> {
        let mut messages = record.validation_messages();

        let key = (record.year(), record.registration_number());
        let taken = match self.repository.exists(key.0, key.1) {
            Ok(stored) => stored || self.keys.contains(&key),
            Err(e) => {
                messages.push(e.to_string());
                false
            }
        };
        if taken {
            messages.push(format!(
                "registration number {} already exists for year {}",
                key.1, key.0
            ));
        }

        if !messages.is_empty() {
            return Err(messages);
        }
        self.keys.insert(key);
        self.staged.push(record);
        Ok(())
    }

    fn commit(&mut self) -> FinregResult<Vec<R>> {
        let records = std::mem::take(&mut self.staged);
        self.keys.clear();
        self.repository.append(&records)?;
        debug!(records = records.len(), "registry batch written");
        Ok(records)
    }

    fn rollback(&mut self) {
        self.staged.clear();
        self.keys.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, CommitmentRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = CommitmentRepository::new(temp_dir.path().join("commitments.json"));
        (temp_dir, repo)
    }

    fn cancelled(number: i64, year: i32) -> Commitment {
        Commitment::cancelled(
            number,
            NaiveDate::from_ymd_opt(year, 2, 1).unwrap(),
            "import",
        )
    }

    #[test]
    fn test_commit_persists_batch() {
        let (_dir, repo) = create_test_repo();
        let mut tx = repo.begin();
        tx.save(cancelled(2, 2024)).unwrap();
        tx.save(cancelled(1, 2024)).unwrap();
        let committed = tx.commit().unwrap();
        assert_eq!(committed.len(), 2);

        let reloaded = CommitmentRepository::new(repo.path.clone());
        reloaded.load().unwrap();
        let numbers: Vec<_> = reloaded
            .get_all()
            .unwrap()
            .iter()
            .map(|c| c.registration_number)
            .collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_rollback_discards_staged() {
        let (_dir, repo) = create_test_repo();
        let mut tx = repo.begin();
        tx.save(cancelled(1, 2024)).unwrap();
        tx.rollback();
        assert_eq!(repo.count().unwrap(), 0);
        assert!(!repo.path.exists());
    }

    #[test]
    fn test_duplicate_numbers_rejected() {
        let (_dir, repo) = create_test_repo();
        let mut tx = repo.begin();
        tx.save(cancelled(5, 2024)).unwrap();
        tx.commit().unwrap();

        let mut tx = repo.begin();
        let messages = tx.save(cancelled(5, 2024)).unwrap_err();
        assert_eq!(
            messages,
            vec!["registration number 5 already exists for year 2024".to_string()]
        );

        tx.save(cancelled(5, 2023)).unwrap();
        assert!(tx.save(cancelled(5, 2023)).is_err());
        assert_eq!(tx.staged().len(), 1);
    }

    #[test]
    fn test_invalid_record_rejected() {
        let (_dir, repo) = create_test_repo();
        let mut tx = repo.begin();
        let record = Commitment::new(7, NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(), "import");
        let messages = tx.save(record).unwrap_err();
        assert!(!messages.is_empty());
    }

    #[test]
    fn test_next_registration_number() {
        let (_dir, repo) = create_test_repo();
        assert_eq!(repo.next_registration_number(2024).unwrap(), 1);
        let mut tx = repo.begin();
        tx.save(cancelled(41, 2024)).unwrap();
        tx.save(cancelled(90, 2023)).unwrap();
        tx.commit().unwrap();
        assert_eq!(repo.next_registration_number(2024).unwrap(), 42);
        assert_eq!(repo.next_registration_number(2023).unwrap(), 91);
        assert_eq!(repo.get_by_year(2023).unwrap().len(), 1);
    }
}
