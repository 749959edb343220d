//! Core data models for finreg
//!
//! Reference entities maintained through the catalog, the two registry
//! record types, and the raw spreadsheet rows the importers consume.

pub mod commitment;
pub mod expenditure;
pub mod ids;
pub mod money;
pub mod record;
pub mod reference;
pub mod row;

pub use commitment::Commitment;
pub use expenditure::Expenditure;
pub use ids::{
    CommitmentId, ExpenditureArticleId, ExpenditureId, FinancingSourceId, PaymentTypeId,
    ProjectCategoryId,
};
pub use money::{Money, MoneyParseError};
pub use record::RegistryRecord;
pub use reference::{
    normalize_import_code, ExpenditureArticle, FinancingSource, PaymentType, ProjectCategory,
    ReferenceValidationError,
};
pub use row::{Cell, RawRow};
