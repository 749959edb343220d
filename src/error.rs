//! Error types for finreg
//!
//! Two layers: `FinregError` for infrastructure and catalog failures, and
//! `ImportError` for row-addressed rejections raised while importing a
//! spreadsheet. Row errors never escape a batch on their own; they are
//! collected by the batch importer.

use std::fmt;

use thiserror::Error;

/// The main error type for finreg operations
#[derive(Error, Debug)]
pub enum FinregError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML catalog seed errors
    #[error("YAML error: {0}")]
    Yaml(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Invalid reference catalog contents (e.g. a bad import code pattern)
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Spreadsheet could not be opened or read
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Import aborted as a whole
    #[error("Import error: {0}")]
    Import(String),
}

impl FinregError {
    /// Create a "not found" error for financing sources
    pub fn financing_source_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Financing source",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for project categories
    pub fn project_category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Project category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for expenditure articles
    pub fn expenditure_article_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expenditure article",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for payment types
    pub fn payment_type_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Payment type",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for FinregError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FinregError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for FinregError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}

impl From<calamine::Error> for FinregError {
    fn from(err: calamine::Error) -> Self {
        Self::Spreadsheet(err.to_string())
    }
}

impl From<csv::Error> for FinregError {
    fn from(err: csv::Error) -> Self {
        Self::Spreadsheet(err.to_string())
    }
}

/// Result type alias for finreg operations
pub type FinregResult<T> = Result<T, FinregError>;

/// Category of a row-level import failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportErrorKind {
    /// Unparseable date, non-numeric registration number, bad amount
    RowFormat,
    /// Financing source or project category label not recognized
    Classification,
    /// Expenditure article or payment type code not found
    CodeLookup,
    /// Financing source and project category combination is not allowed
    Consistency,
    /// Record rejected by the storage-level validation on save
    PersistenceValidation,
}

impl fmt::Display for ImportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportErrorKind::RowFormat => write!(f, "row format"),
            ImportErrorKind::Classification => write!(f, "classification"),
            ImportErrorKind::CodeLookup => write!(f, "code lookup"),
            ImportErrorKind::Consistency => write!(f, "consistency"),
            ImportErrorKind::PersistenceValidation => write!(f, "validation"),
        }
    }
}

/// A rejection of a single spreadsheet row
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Error reading row {row_index}: {message}")]
pub struct ImportError {
    /// 1-based spreadsheet row number
    pub row_index: usize,
    pub kind: ImportErrorKind,
    pub message: String,
}

impl ImportError {
    pub fn new(row_index: usize, kind: ImportErrorKind, message: impl Into<String>) -> Self {
        Self {
            row_index,
            kind,
            message: message.into(),
        }
    }

    pub fn row_format(row_index: usize, message: impl Into<String>) -> Self {
        Self::new(row_index, ImportErrorKind::RowFormat, message)
    }

    pub fn classification(row_index: usize, message: impl Into<String>) -> Self {
        Self::new(row_index, ImportErrorKind::Classification, message)
    }

    pub fn code_lookup(row_index: usize, message: impl Into<String>) -> Self {
        Self::new(row_index, ImportErrorKind::CodeLookup, message)
    }

    pub fn consistency(row_index: usize, message: impl Into<String>) -> Self {
        Self::new(row_index, ImportErrorKind::Consistency, message)
    }

    pub fn persistence(row_index: usize, messages: &[String]) -> Self {
        Self::new(
            row_index,
            ImportErrorKind::PersistenceValidation,
            format!("could not save the record: {}", messages.join(", ")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FinregError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = FinregError::financing_source_not_found("PNRR");
        assert_eq!(err.to_string(), "Financing source not found: PNRR");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_import_error_display() {
        let err = ImportError::classification(7, "unrecognized financing source 'xyz123'");
        assert_eq!(
            err.to_string(),
            "Error reading row 7: unrecognized financing source 'xyz123'"
        );
        assert_eq!(err.kind, ImportErrorKind::Classification);
    }

    #[test]
    fn test_persistence_error_joins_messages() {
        let err = ImportError::persistence(3, &["value is required".into(), "partner is required".into()]);
        assert_eq!(
            err.to_string(),
            "Error reading row 3: could not save the record: value is required, partner is required"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FinregError = io_err.into();
        assert!(matches!(err, FinregError::Io(_)));
    }
}
