//! Commitment model
//!
//! A pre-authorized obligation recorded before the matching expenditure is
//! paid. Legacy rows may name several financing sources at once.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CommitmentId, ExpenditureArticleId, FinancingSourceId};
use super::money::Money;
use super::record::RegistryRecord;

/// An entry in the commitments registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commitment {
    pub id: CommitmentId,
    pub year: i32,
    pub registration_number: i64,
    pub registration_date: NaiveDate,

    #[serde(default)]
    pub document_number: String,

    #[serde(default)]
    pub validity: String,

    #[serde(default)]
    pub financing_source_ids: Vec<FinancingSourceId>,

    #[serde(default)]
    pub project_details: String,

    #[serde(default)]
    pub partner: String,

    #[serde(default)]
    pub value: Money,

    #[serde(default)]
    pub procurement_type: String,

    pub expenditure_article_id: Option<ExpenditureArticleId>,

    #[serde(default)]
    pub remarks: String,

    #[serde(default)]
    pub noncompliance: String,

    #[serde(default)]
    pub cancelled: bool,

    #[serde(default)]
    pub imported: bool,

    pub created_by: String,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Commitment {
    pub fn new(registration_number: i64, registration_date: NaiveDate, user: &str) -> Self {
        let now = Utc::now();
        Self {
            id: CommitmentId::new(),
            year: registration_date.year(),
            registration_number,
            registration_date,
            document_number: String::new(),
            validity: String::new(),
            financing_source_ids: Vec::new(),
            project_details: String::new(),
            partner: String::new(),
            value: Money::zero(),
            procurement_type: String::new(),
            expenditure_article_id: None,
            remarks: String::new(),
            noncompliance: String::new(),
            cancelled: false,
            imported: false,
            created_by: user.to_string(),
            updated_by: user.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn cancelled(registration_number: i64, registration_date: NaiveDate, user: &str) -> Self {
        let mut commitment = Self::new(registration_number, registration_date, user);
        commitment.cancelled = true;
        commitment
    }
}

impl RegistryRecord for Commitment {
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

        if self.document_number.trim().is_empty() {
            messages.push("document number can't be blank".to_string());
        }
        if self.financing_source_ids.is_empty() {
            messages.push("financing sources can't be blank".to_string());
        }
        if self.expenditure_article_id.is_none() {
            messages.push("expenditure article can't be blank".to_string());
        }
        if !self.imported && self.partner.trim().is_empty() {
            messages.push("partner can't be blank".to_string());
        }

        messages
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cancelled {
            write!(f, "{} (cancelled)", self.full_identifier())
        } else {
            write!(f, "{} {} {}", self.full_identifier(), self.document_number, self.value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 6, 14).unwrap()
    }

    #[test]
    fn test_required_fields() {
        let c = Commitment::new(40, date(), "import");
        let messages = c.validation_messages();
        assert!(messages.contains(&"document number can't be blank".to_string()));
        assert!(messages.contains(&"financing sources can't be blank".to_string()));
    }

    #[test]
    fn test_multiple_sources_allowed() {
        let mut c = Commitment::new(40, date(), "import");
        c.document_number = "1234".into();
        c.financing_source_ids = vec![FinancingSourceId::new(), FinancingSourceId::new()];
        c.expenditure_article_id = Some(ExpenditureArticleId::new());
        c.imported = true;
        assert!(c.validation_messages().is_empty());
        assert_eq!(c.full_identifier(), "40/2023");
    }

    #[test]
    fn test_cancelled_commitment_is_minimal() {
        let c = Commitment::cancelled(41, date(), "import");
        assert!(c.validation_messages().is_empty());
        assert!(c.is_cancelled());
    }
}
