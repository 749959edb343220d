//! Registry display formatting

use std::collections::HashMap;

use crate::models::{Commitment, Expenditure, FinancingSourceId};
use crate::storage::CatalogData;

fn source_names(catalog: &CatalogData) -> HashMap<FinancingSourceId, &str> {
    catalog
        .financing_sources
        .iter()
        .map(|s| (s.id, s.name.as_str()))
        .collect()
}

fn status(cancelled: bool) -> &'static str {
    if cancelled {
        "cancelled"
    } else {
        ""
    }
}

/// Format expenditures as a table
pub fn format_expenditure_list(records: &[Expenditure], catalog: &CatalogData) -> String {
    if records.is_empty() {
        return "No expenditures found.".to_string();
    }

    let names = source_names(catalog);
    let mut output = String::new();
    output.push_str(&format!(
        "{:>10}  {:<10}  {:<30}  {:>14}  {}\n",
        "Number", "Date", "Financing source", "Value", "Status"
    ));
    output.push_str(&format!(
        "{:->10}  {:-<10}  {:-<30}  {:->14}  {:-<9}\n",
        "", "", "", "", ""
    ));

    for record in records {
        let source = record
            .financing_source_id
            .and_then(|id| names.get(&id).copied())
            .unwrap_or("-");
        output.push_str(&format!(
            "{:>10}  {:<10}  {:<30}  {:>14}  {}\n",
            format!("{}/{}", record.registration_number, record.year),
            record.registration_date.format("%d.%m.%Y"),
            source,
            record.value.to_string(),
            status(record.cancelled),
        ));
    }

    output
}

/// Format commitments as a table
pub fn format_commitment_list(records: &[Commitment], catalog: &CatalogData) -> String {
    if records.is_empty() {
        return "No commitments found.".to_string();
    }

    let names = source_names(catalog);
    let mut output = String::new();
    output.push_str(&format!(
        "{:>10}  {:<10}  {:<16}  {:<30}  {:>14}  {}\n",
        "Number", "Date", "Document", "Financing sources", "Value", "Status"
    ));
    output.push_str(&format!(
        "{:->10}  {:-<10}  {:-<16}  {:-<30}  {:->14}  {:-<9}\n",
        "", "", "", "", "", ""
    ));

    for record in records {
        let sources: Vec<&str> = record
            .financing_source_ids
            .iter()
            .filter_map(|id| names.get(id).copied())
            .collect();
        let sources = if sources.is_empty() {
            "-".to_string()
        } else {
            sources.join(", ")
        };
        output.push_str(&format!(
            "{:>10}  {:<10}  {:<16}  {:<30}  {:>14}  {}\n",
            format!("{}/{}", record.registration_number, record.year),
            record.registration_date.format("%d.%m.%Y"),
            record.document_number,
            sources,
            record.value.to_string(),
            status(record.cancelled),
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FinancingSource;
    use chrono::NaiveDate;

    #[test]
    fn test_expenditure_list_resolves_source_names() {
        let source = FinancingSource::new("Venituri");
        let date = NaiveDate::from_ymd_opt(2024, 3, 12).unwrap();
        let mut record = Expenditure::new(14, date, "import");
        record.financing_source_id = Some(source.id);

        let catalog = CatalogData {
            financing_sources: vec![source],
            ..CatalogData::default()
        };
        let output = format_expenditure_list(&[record], &catalog);
        assert!(output.contains("14/2024"));
        assert!(output.contains("12.03.2024"));
        assert!(output.contains("Venituri"));
    }

    #[test]
    fn test_cancelled_commitment() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 6).unwrap();
        let record = Commitment::cancelled(2, date, "import");
        let output = format_commitment_list(&[record], &CatalogData::default());
        assert!(output.contains("2/2024"));
        assert!(output.contains("cancelled"));
    }

    #[test]
    fn test_empty_lists() {
        assert_eq!(
            format_expenditure_list(&[], &CatalogData::default()),
            "No expenditures found."
        );
    }
}
