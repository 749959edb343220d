//! Expenditure model
//!
//! A paid expense booked against a budget line. Cancelled registration
//! numbers are kept as minimal records so the yearly numbering has no gaps.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{
    ExpenditureArticleId, ExpenditureId, FinancingSourceId, PaymentTypeId, ProjectCategoryId,
};
use super::money::Money;
use super::record::RegistryRecord;

/// An entry in the expenditures registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expenditure {
    pub id: ExpenditureId,

    /// Registry year, normally the year of the registration date
    pub year: i32,

    /// Sequential number within the year
    pub registration_number: i64,

    pub registration_date: NaiveDate,

    pub financing_source_id: Option<FinancingSourceId>,

    pub project_category_id: Option<ProjectCategoryId>,

    /// Free text left over from the project label after classification
    #[serde(default)]
    pub project_details: String,

    pub expenditure_article_id: Option<ExpenditureArticleId>,

    #[serde(default)]
    pub details: String,

    #[serde(default)]
    pub procurement_type: String,

    #[serde(default)]
    pub ordinance_number: String,

    pub ordinance_date: Option<NaiveDate>,

    #[serde(default)]
    pub value: Money,

    pub payment_type_id: Option<PaymentTypeId>,

    #[serde(default)]
    pub beneficiary: String,

    #[serde(default)]
    pub invoice: String,

    #[serde(default)]
    pub noncompliance: String,

    #[serde(default)]
    pub remarks: String,

    #[serde(default)]
    pub cancelled: bool,

    /// Created by a spreadsheet import rather than entered by hand
    #[serde(default)]
    pub imported: bool,

    pub created_by: String,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expenditure {
    /// Create an empty expenditure; the year follows the registration date
    pub fn new(registration_number: i64, registration_date: NaiveDate, user: &str) -> Self {
        let now = Utc::now();
        Self {
            id: ExpenditureId::new(),
            year: registration_date.year(),
            registration_number,
            registration_date,
            financing_source_id: None,
            project_category_id: None,
            project_details: String::new(),
            expenditure_article_id: None,
            details: String::new(),
            procurement_type: String::new(),
            ordinance_number: String::new(),
            ordinance_date: None,
            value: Money::zero(),
            payment_type_id: None,
            beneficiary: String::new(),
            invoice: String::new(),
            noncompliance: String::new(),
            remarks: String::new(),
            cancelled: false,
            imported: false,
            created_by: user.to_string(),
            updated_by: user.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// A cancelled registration number
    pub fn cancelled(registration_number: i64, registration_date: NaiveDate, user: &str) -> Self {
        let mut expenditure = Self::new(registration_number, registration_date, user);
        expenditure.cancelled = true;
        expenditure
    }
}

impl RegistryRecord for Expenditure {
    fn year(&self) -> i32 {
        self.year
    }

    fn registration_number(&self) -> i64 {
        self.registration_number
    }

    fn registration_date(&self) -> NaiveDate {
        self.registration_date
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    fn validation_messages(&self) -> Vec<String> {
        let mut messages = Vec::new();

        if self.registration_number <= 0 {
            messages.push("registration number must be positive".to_string());
        }
        if self.created_by.trim().is_empty() {
            messages.push("created by can't be blank".to_string());
        }
        if self.cancelled {
            return messages;
        }

        if self.financing_source_id.is_none() {
            messages.push("financing source can't be blank".to_string());
        }
        if self.expenditure_article_id.is_none() {
            messages.push("expenditure article can't be blank".to_string());
        }
        if self.payment_type_id.is_none() {
            messages.push("payment type can't be blank".to_string());
        }
        if !self.imported {
            if self.beneficiary.trim().is_empty() {
                messages.push("beneficiary can't be blank".to_string());
            }
            if let Some(ordinance_date) = self.ordinance_date {
                if ordinance_date > self.registration_date {
                    messages.push(
                        "ordinance date can't be after the registration date".to_string(),
                    );
                }
            }
        }

        messages
    }
}

impl fmt::Display for Expenditure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cancelled {
            write!(f, "{} (cancelled)", self.full_identifier())
        } else {
            write!(f, "{} {}", self.full_identifier(), self.value)
        }
    }
}
