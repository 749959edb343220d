//! Per-row overrides for known bad legacy rows
//!
//! Kept as configuration so entries can be dropped once the source
//! spreadsheets are cleaned up. Keyed by registry table and registration
//! number.

use serde::{Deserialize, Serialize};

use super::RegistryTable;

/// What to do with an overridden row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OverrideAction {
    /// Book the record in this registry year regardless of its date
    ForceYear { year: i32 },
    /// Skip classification and use this financing source; the original
    /// label is kept as project details
    FinancingSource { name: String },
    /// Classify as usual and append this financing source; the original
    /// label is kept as project details. Commitments only
    AddFinancingSource { name: String },
    /// Leave the row out of the import
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowOverride {
    pub table: RegistryTable,
    pub registration_number: i64,
    #[serde(flatten)]
    pub action: OverrideAction,
    #[serde(default)]
    pub note: String,
}

impl RowOverride {
    pub fn new(table: RegistryTable, registration_number: i64, action: OverrideAction) -> Self {
        Self {
            table,
            registration_number,
            action,
            note: String::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// Overrides for the rows known to be wrong in the historical sheets
pub fn default_row_overrides() -> Vec<RowOverride> {
    vec![
        RowOverride::new(
            RegistryTable::Expenditures,
            1397,
            OverrideAction::ForceYear { year: 2024 },
        )
        .with_note("registration date typed with the previous year"),
        RowOverride::new(
            RegistryTable::Commitments,
            925,
            OverrideAction::AddFinancingSource {
                name: "Cercetare".into(),
            },
        )
        .with_note("research share missing from the source label"),
        RowOverride::new(
            RegistryTable::Commitments,
            1177,
            OverrideAction::AddFinancingSource {
                name: "Cercetare".into(),
            },
        )
        .with_note("research project"),
    ]
}

/// Overrides for one table
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    entries: Vec<RowOverride>,
}

impl OverrideTable {
    pub fn for_table(table: RegistryTable, overrides: &[RowOverride]) -> Self {
        Self {
            entries: overrides
                .iter()
                .filter(|o| o.table == table)
                .cloned()
                .collect(),
        }
    }

    /// All actions for a registration number, in configuration order
    pub fn actions(&self, registration_number: i64) -> impl Iterator<Item = &OverrideAction> {
        self.entries
            .iter()
            .filter(move |o| o.registration_number == registration_number)
            .map(|o| &o.action)
    }

    pub fn skips(&self, registration_number: i64) -> bool {
        self.actions(registration_number)
            .any(|a| matches!(a, OverrideAction::Skip))
    }

    pub fn forced_year(&self, registration_number: i64) -> Option<i32> {
        self.actions(registration_number).find_map(|a| match a {
            OverrideAction::ForceYear { year } => Some(*year),
            _ => None,
        })
    }

    pub fn financing_source(&self, registration_number: i64) -> Option<&str> {
        self.actions(registration_number).find_map(|a| match a {
            OverrideAction::FinancingSource { name } => Some(name.as_str()),
            _ => None,
        })
    }

    /// Sources appended to the classified ones, in configuration order
    pub fn added_sources(&self, registration_number: i64) -> Vec<&str> {
        self.actions(registration_number)
            .filter_map(|a| match a {
                OverrideAction::AddFinancingSource { name } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}
