//! Label troubleshooting
//!
//! Runs a single free-text label through the classifiers against the
//! stored catalog, so an operator can see which rule a label hits before
//! fixing a sheet or adding an import code.

use crate::error::{FinregResult, ImportError};
use crate::import::{
    CatalogSnapshot, FinancingSourceClassifier, ProjectCategoryClassifier, RegistryTable,
};
use crate::storage::Storage;

/// Owned result of classifying a label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub sources: Vec<String>,
    pub category: Option<String>,
    pub details: String,
    /// Position of the rule that fired; None for an import-code match
    pub rule: Option<usize>,
}

pub struct ClassifyService {
    catalog: CatalogSnapshot,
}

impl ClassifyService {
    pub fn new(storage: &Storage) -> FinregResult<Self> {
        Ok(Self {
            catalog: storage.catalog.snapshot()?,
        })
    }

    pub fn from_snapshot(catalog: CatalogSnapshot) -> Self {
        Self { catalog }
    }

    /// Classify a financing source label with the rule table of `table`
    pub fn financing(
        &self,
        table: RegistryTable,
        label: &str,
    ) -> Result<Classification, ImportError> {
        let classifier = FinancingSourceClassifier::for_table(&self.catalog, table);
        let m = classifier.classify(label, 0)?;
        Ok(Classification {
            sources: m.sources.iter().map(|s| s.name.clone()).collect(),
            category: m.category.map(|c| c.name.clone()),
            details: m.details,
            rule: m.rule,
        })
    }

    /// Classify an expenditure project label, given the row's source label
    pub fn project(
        &self,
        label: &str,
        source_label: &str,
    ) -> Result<Classification, ImportError> {
        let sources =
            FinancingSourceClassifier::for_table(&self.catalog, RegistryTable::Expenditures);
        let source = sources.classify(source_label, 0)?;

        let projects = ProjectCategoryClassifier::for_expenditures(&self.catalog);
        let m = projects.classify(label, &source, 0)?;
        let names = match m.source_override {
            Some(s) => vec![s.name.clone()],
            None => source.sources.iter().map(|s| s.name.clone()).collect(),
        };
        Ok(Classification {
            sources: names,
            category: m.category.map(|c| c.name.clone()),
            details: m.details.unwrap_or(source.details),
            rule: m.rule,
        })
    }
}
