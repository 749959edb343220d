//! Spreadsheet import core
//!
//! Legacy registry sheets carry a free-text financing source label and a
//! free-text project label typed by clerks over many years. The importers
//! map every row onto the reference catalog through ordered rule tables
//! and either produce a record or a row-addressed `ImportError`.
//!
//! Flow per batch: `sheet` reads the rows, a `CatalogSnapshot` is taken
//! once, each row goes through a row parser (`expenditure` or
//! `commitment`) and `batch::BatchImporter` decides to commit or roll back.

pub mod batch;
pub mod catalog;
pub mod codes;
pub mod commitment;
pub mod expenditure;
pub mod fields;
pub mod financing;
pub mod normalize;
pub mod overrides;
pub mod project;
pub mod rules;
pub mod sheet;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use batch::{BatchImporter, BatchReport, RecordSink, RowParser};
pub use catalog::{CatalogEntry, CatalogSnapshot, EntityIndex};
pub use commitment::CommitmentRowParser;
pub use expenditure::ExpenditureRowParser;
pub use financing::{FinancingSourceClassifier, SourceMatch};
pub use project::{ProjectCategoryClassifier, ProjectMatch};

/// Rejected rows tolerated before a batch stops reading
pub const DEFAULT_MAX_ERRORS: usize = 10;

/// The two registries that can be imported from a spreadsheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryTable {
    Expenditures,
    Commitments,
}

impl RegistryTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expenditures => "expenditures",
            Self::Commitments => "commitments",
        }
    }
}

impl fmt::Display for RegistryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-table knobs for one import run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// First data row, 1-based; earlier rows are headers
    pub start_row: usize,
    pub max_errors: usize,
    /// strftime format of dates typed as text
    pub date_format: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            start_row: 2,
            max_errors: DEFAULT_MAX_ERRORS,
            date_format: "%d.%m.%Y".to_string(),
        }
    }
}
