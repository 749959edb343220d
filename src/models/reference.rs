//! Reference entities
//!
//! Financing sources, project categories, expenditure articles and payment
//! types. They are maintained through catalog management and only read by
//! the spreadsheet importers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ExpenditureArticleId, FinancingSourceId, PaymentTypeId, ProjectCategoryId};

/// Normalize an admin-entered import code: trimmed and lowercased
pub fn normalize_import_code(code: &str) -> String {
    code.trim().to_lowercase()
}

/// Check that an import code compiles as a regular expression
fn validate_import_code(code: &str) -> Result<(), ReferenceValidationError> {
    if code.is_empty() {
        return Ok(());
    }
    regex::Regex::new(code)
        .map(|_| ())
        .map_err(|e| ReferenceValidationError::InvalidImportCode {
            code: code.to_string(),
            reason: e.to_string(),
        })
}

fn validate_name(name: &str) -> Result<(), ReferenceValidationError> {
    if name.trim().is_empty() {
        return Err(ReferenceValidationError::EmptyName);
    }
    if name.trim() != name {
        return Err(ReferenceValidationError::UntrimmedName(name.to_string()));
    }
    Ok(())
}

/// A budget or cost center funding registry records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingSource {
    pub id: FinancingSourceId,

    /// Unique canonical name
    pub name: String,

    /// Fallback matcher for spreadsheet labels (regex, may be empty)
    #[serde(default)]
    pub import_code: String,

    /// Whether expenditures funded from this source must name a project category
    #[serde(default)]
    pub requires_project_category: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FinancingSource {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: FinancingSourceId::new(),
            name: name.into().trim().to_string(),
            import_code: String::new(),
            requires_project_category: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_import_code(mut self, code: &str) -> Self {
        self.import_code = normalize_import_code(code);
        self
    }

    pub fn requiring_project_category(mut self) -> Self {
        self.requires_project_category = true;
        self
    }

    pub fn set_import_code(&mut self, code: &str) {
        self.import_code = normalize_import_code(code);
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), ReferenceValidationError> {
        validate_name(&self.name)?;
        validate_import_code(&self.import_code)
    }
}

impl fmt::Display for FinancingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Sub-classification of how a financing source's funds are used
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectCategory {
    pub id: ProjectCategoryId,
    pub name: String,
    #[serde(default)]
    pub import_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectCategory {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ProjectCategoryId::new(),
            name: name.into().trim().to_string(),
            import_code: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_import_code(mut self, code: &str) -> Self {
        self.import_code = normalize_import_code(code);
        self
    }

    pub fn set_import_code(&mut self, code: &str) {
        self.import_code = normalize_import_code(code);
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), ReferenceValidationError> {
        validate_name(&self.name)?;
        validate_import_code(&self.import_code)
    }
}

impl fmt::Display for ProjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A government budget-line classification code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenditureArticle {
    pub id: ExpenditureArticleId,

    /// Budget classification code, e.g. "10.01.01" or "59.40"
    pub code: String,

    pub name: String,

    /// Grouping code used when filtering expenditures
    #[serde(default)]
    pub expenditure_category_code: String,

    /// Grouping code used when filtering commitments
    #[serde(default)]
    pub commitment_category_code: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExpenditureArticle {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ExpenditureArticleId::new(),
            code: code.into().trim().to_string(),
            name: name.into().trim().to_string(),
            expenditure_category_code: String::new(),
            commitment_category_code: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), ReferenceValidationError> {
        if self.code.trim().is_empty() {
            return Err(ReferenceValidationError::EmptyCode);
        }
        validate_name(&self.name)
    }
}

impl fmt::Display for ExpenditureArticle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.name)
    }
}

/// How an expenditure was paid (cash, transfer, advance...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentType {
    pub id: PaymentTypeId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentType {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PaymentTypeId::new(),
            name: name.into().trim().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), ReferenceValidationError> {
        validate_name(&self.name)
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for reference entities
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceValidationError {
    EmptyName,
    UntrimmedName(String),
    EmptyCode,
    InvalidImportCode { code: String, reason: String },
}

impl fmt::Display for ReferenceValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name cannot be empty"),
            Self::UntrimmedName(name) => {
                write!(f, "Name '{}' has leading or trailing whitespace", name)
            }
            Self::EmptyCode => write!(f, "Code cannot be empty"),
            Self::InvalidImportCode { code, reason } => {
                write!(f, "Import code '{}' is not a valid pattern: {}", code, reason)
            }
        }
    }
}

impl std::error::Error for ReferenceValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_trimmed_on_creation() {
        let source = FinancingSource::new("  Venituri ");
        assert_eq!(source.name, "Venituri");
        assert!(source.validate().is_ok());
    }

    #[test]
    fn test_import_code_normalized() {
        let category = ProjectCategory::new("PNRR").with_import_code("  ^PNRR|^i\\d ");
        assert_eq!(category.import_code, "^pnrr|^i\\d");
        assert!(category.validate().is_ok());
    }

    #[test]
    fn test_invalid_import_code_rejected() {
        let source = FinancingSource::new("CIVIS").with_import_code("civis(");
        let err = source.validate().unwrap_err();
        assert!(matches!(err, ReferenceValidationError::InvalidImportCode { .. }));
        assert!(err.to_string().contains("civis("));
    }

    #[test]
    fn test_empty_names_rejected() {
        let mut payment = PaymentType::new("Virament");
        payment.name = String::new();
        assert_eq!(payment.validate(), Err(ReferenceValidationError::EmptyName));

        let article = ExpenditureArticle::new("", "Salarii");
        assert_eq!(article.validate(), Err(ReferenceValidationError::EmptyCode));
    }

    #[test]
    fn test_requires_project_category_flag() {
        let source = FinancingSource::new("Cercetare").requiring_project_category();
        assert!(source.requires_project_category);
        let json = serde_json::to_string(&source).unwrap();
        let back: FinancingSource = serde_json::from_str(&json).unwrap();
        assert!(back.requires_project_category);
    }
}
