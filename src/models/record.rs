//! Behaviour shared by registry records
//!
//! Expenditures and commitments are both numbered per year and identified
//! to operators as "<registration_number>/<year>".

use chrono::NaiveDate;

/// A record kept in one of the yearly registries
pub trait RegistryRecord {
    fn year(&self) -> i32;

    fn registration_number(&self) -> i64;

    fn registration_date(&self) -> NaiveDate;

    fn is_cancelled(&self) -> bool;

    /// Field-level validation messages; empty when the record can be saved
    fn validation_messages(&self) -> Vec<String>;

    /// Identifier shown to operators and written to the audit log
    fn full_identifier(&self) -> String {
        format!("{}/{}", self.registration_number(), self.year())
    }
}
