//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Insert,
    Update,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Insert => write!(f, "INSERT"),
            Action::Update => write!(f, "UPDATE"),
        }
    }
}

/// The table an audited record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetTable {
    Expenditures,
    Commitments,
    FinancingSources,
    ProjectCategories,
    ExpenditureArticles,
    PaymentTypes,
}

impl fmt::Display for TargetTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetTable::Expenditures => "expenditures",
            TargetTable::Commitments => "commitments",
            TargetTable::FinancingSources => "financing_sources",
            TargetTable::ProjectCategories => "project_categories",
            TargetTable::ExpenditureArticles => "expenditure_articles",
            TargetTable::PaymentTypes => "payment_types",
        };
        write!(f, "{}", name)
    }
}

/// One line of the audit log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,

    /// Acting user
    pub user: String,

    pub action: Action,

    pub table: TargetTable,

    /// Human identifier of the target: "<number>/<year>" for registry
    /// records, the name or code for catalog entries
    pub target: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,
}

impl AuditEntry {
    pub fn insert<T: Serialize>(
        user: impl Into<String>,
        table: TargetTable,
        target: impl Into<String>,
        record: &T,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            user: user.into(),
            action: Action::Insert,
            table,
            target: target.into(),
            before: None,
            after: serde_json::to_value(record).ok(),
        }
    }

    pub fn update<T: Serialize>(
        user: impl Into<String>,
        table: TargetTable,
        target: impl Into<String>,
        before: &T,
        after: &T,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            user: user.into(),
            action: Action::Update,
            table,
            target: target.into(),
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
        }
    }

    /// One-line form for the terminal
    pub fn format_human_readable(&self) -> String {
        format!(
            "[{}] {} {} {} by {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.action,
            self.table,
            self.target,
            self.user
        )
    }
}
