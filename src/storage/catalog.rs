//! Reference catalog repository
//!
//! All four reference tables live in catalog.json. Entries keep their
//! creation order: the import-code fallback returns matches in that order,
//! so it has to be stable across loads.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{FinregError, FinregResult};
use crate::import::{CatalogEntry, CatalogSnapshot};
use crate::models::{ExpenditureArticle, FinancingSource, PaymentType, ProjectCategory};

use super::file_io::{read_json, write_json_atomic};

/// On-disk layout of catalog.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub financing_sources: Vec<FinancingSource>,
    #[serde(default)]
    pub project_categories: Vec<ProjectCategory>,
    #[serde(default)]
    pub articles: Vec<ExpenditureArticle>,
    #[serde(default)]
    pub payment_types: Vec<PaymentType>,
}

/// One reference table, keyed by `CatalogEntry::lookup_key`
pub struct CatalogTable<T> {
    rows: RwLock<Vec<T>>,
}

impl<T: CatalogEntry + Clone> CatalogTable<T> {
    fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> FinregResult<RwLockReadGuard<'_, Vec<T>>> {
        self.rows
            .read()
            .map_err(|e| FinregError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> FinregResult<RwLockWriteGuard<'_, Vec<T>>> {
        self.rows
            .write()
            .map_err(|e| FinregError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    fn replace(&self, rows: Vec<T>) -> FinregResult<()> {
        *self.write()? = rows;
        Ok(())
    }

    /// All entries in creation order
    pub fn get_all(&self) -> FinregResult<Vec<T>> {
        Ok(self.read()?.clone())
    }

    /// Entry whose key (name, or code for articles) matches exactly
    pub fn get_by_key(&self, key: &str) -> FinregResult<Option<T>> {
        let key = key.trim();
        Ok(self.read()?.iter().find(|e| e.lookup_key() == key).cloned())
    }

    /// Insert, or replace in place the entry with the same key.
    /// Returns the replaced entry.
    pub fn upsert(&self, entity: T) -> FinregResult<Option<T>> {
        let mut rows = self.write()?;
        match rows.iter_mut().find(|e| e.lookup_key() == entity.lookup_key()) {
            Some(existing) => Ok(Some(std::mem::replace(existing, entity))),
            None => {
                rows.push(entity);
                Ok(None)
            }
        }
    }

    pub fn count(&self) -> FinregResult<usize> {
        Ok(self.read()?.len())
    }
}

/// Repository for the reference catalog
pub struct CatalogRepository {
    path: PathBuf,
    pub financing_sources: CatalogTable<FinancingSource>,
    pub project_categories: CatalogTable<ProjectCategory>,
    pub articles: CatalogTable<ExpenditureArticle>,
    pub payment_types: CatalogTable<PaymentType>,
}

impl CatalogRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            financing_sources: CatalogTable::new(),
            project_categories: CatalogTable::new(),
            articles: CatalogTable::new(),
            payment_types: CatalogTable::new(),
        }
    }

    /// Load the catalog from disk
    pub fn load(&self) -> FinregResult<()> {
        let data: CatalogData = read_json(&self.path)?;
        self.replace(data)
    }

    /// Save the catalog to disk
    pub fn save(&self) -> FinregResult<()> {
        write_json_atomic(&self.path, &self.data()?)
    }

    /// Copy of every table
    pub fn data(&self) -> FinregResult<CatalogData> {
        Ok(CatalogData {
            financing_sources: self.financing_sources.get_all()?,
            project_categories: self.project_categories.get_all()?,
            articles: self.articles.get_all()?,
            payment_types: self.payment_types.get_all()?,
        })
    }

    /// Replace every table in memory
    pub fn replace(&self, data: CatalogData) -> FinregResult<()> {
        self.financing_sources.replace(data.financing_sources)?;
        self.project_categories.replace(data.project_categories)?;
        self.articles.replace(data.articles)?;
        self.payment_types.replace(data.payment_types)?;
        Ok(())
    }

    /// Frozen view used for one import batch; compiles import codes
    pub fn snapshot(&self) -> FinregResult<CatalogSnapshot> {
        let data = self.data()?;
        CatalogSnapshot::new(
            data.financing_sources,
            data.project_categories,
            data.articles,
            data.payment_types,
        )
    }

    pub fn is_empty(&self) -> FinregResult<bool> {
        Ok(self.financing_sources.count()? == 0
            && self.project_categories.count()? == 0
            && self.articles.count()? == 0
            && self.payment_types.count()? == 0)
    }
}
