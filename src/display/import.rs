//! Import result formatting
//!
//! Rejected rows are listed with their spreadsheet row number so the
//! operator can fix the sheet and run the import again.

use crate::error::ImportError;
use crate::services::{CatalogImportSummary, Classification, ImportSummary, SeedSummary};

fn push_errors(output: &mut String, errors: &[ImportError]) {
    for error in errors {
        output.push_str(&format!("  row {:>5}  [{}] {}\n", error.row_index, error.kind, error.message));
    }
}

/// Format the outcome of a registry import
pub fn format_import_summary(summary: &ImportSummary) -> String {
    let mut output = String::new();

    output.push_str(&format!("Import of {}\n", summary.table));
    output.push_str(&format!("  Rows read:  {}\n", summary.rows_attempted));
    if summary.skipped > 0 {
        output.push_str(&format!("  Skipped:    {}\n", summary.skipped));
    }
    output.push_str(&format!("  Accepted:   {}\n", summary.accepted));
    output.push_str(&format!("  Saved:      {}\n", summary.saved));

    if summary.errors.is_empty() {
        if summary.dry_run {
            output.push_str("\nDry run: every row is valid, nothing was saved.\n");
        }
        return output;
    }

    output.push_str(&format!("\n{} row(s) rejected, nothing was saved:\n", summary.errors.len()));
    push_errors(&mut output, &summary.errors);
    if summary.aborted {
        output.push_str("\nToo many errors, the rest of the sheet was not read.\n");
    }

    output
}

/// Format the counts of a catalog seed
pub fn format_seed_summary(summary: &SeedSummary) -> String {
    format!(
        "Catalog updated: {} added, {} changed, {} unchanged\n",
        summary.inserted, summary.updated, summary.unchanged
    )
}

/// Format the outcome of a catalog spreadsheet import
pub fn format_catalog_import_summary(summary: &CatalogImportSummary) -> String {
    let mut output = format!(
        "Import of {}: {} row(s) read\n",
        summary.kind, summary.rows_attempted
    );
    match &summary.applied {
        Some(applied) => output.push_str(&format_seed_summary(applied)),
        None => {
            output.push_str(&format!(
                "\n{} row(s) rejected, the catalog was not changed:\n",
                summary.errors.len()
            ));
            push_errors(&mut output, &summary.errors);
        }
    }
    output
}

/// Format a label classification for troubleshooting
pub fn format_classification(label: &str, classification: &Classification) -> String {
    let mut output = format!("Label: {}\n", label);
    output.push_str(&format!("  Sources:  {}\n", classification.sources.join(", ")));
    output.push_str(&format!(
        "  Category: {}\n",
        classification.category.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!("  Details:  {}\n", classification.details));
    match classification.rule {
        Some(rule) => output.push_str(&format!("  Matched:  rule #{}\n", rule)),
        None => output.push_str("  Matched:  import code\n"),
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportErrorKind;
    use crate::import::RegistryTable;

    fn summary(errors: Vec<ImportError>) -> ImportSummary {
        ImportSummary {
            table: RegistryTable::Expenditures,
            rows_attempted: 12,
            skipped: 0,
            accepted: 11,
            saved: 0,
            errors,
            aborted: false,
            dry_run: false,
        }
    }

    #[test]
    fn test_rejected_rows_are_listed() {
        let output = format_import_summary(&summary(vec![ImportError::new(
            7,
            ImportErrorKind::Classification,
            "unrecognized financing source 'xyz'",
        )]));
        assert!(output.contains("Import of expenditures"));
        assert!(output.contains("row     7"));
        assert!(output.contains("[classification]"));
        assert!(output.contains("nothing was saved"));
    }

    #[test]
    fn test_dry_run_message() {
        let mut s = summary(Vec::new());
        s.dry_run = true;
        assert!(format_import_summary(&s).contains("Dry run"));
    }

    #[test]
    fn test_classification_by_import_code() {
        let classification = Classification {
            sources: vec!["Cercetare".into()],
            category: None,
            details: String::new(),
            rule: None,
        };
        let output = format_classification("cercetare 2024", &classification);
        assert!(output.contains("Sources:  Cercetare"));
        assert!(output.contains("import code"));
    }
}
