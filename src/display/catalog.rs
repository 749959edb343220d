//! Catalog display formatting
//!
//! Renders the four reference tables with `tabled`.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::storage::CatalogData;

#[derive(Tabled)]
struct SourceRow<'a> {
    #[tabled(rename = "Financing source")]
    name: &'a str,
    #[tabled(rename = "Import code")]
    import_code: &'a str,
    #[tabled(rename = "Needs category")]
    requires_category: &'a str,
}

#[derive(Tabled)]
struct CategoryRow<'a> {
    #[tabled(rename = "Project category")]
    name: &'a str,
    #[tabled(rename = "Import code")]
    import_code: &'a str,
}

#[derive(Tabled)]
struct ArticleRow<'a> {
    #[tabled(rename = "Code")]
    code: &'a str,
    #[tabled(rename = "Article")]
    name: &'a str,
    #[tabled(rename = "Expenditure cat.")]
    expenditure_category: &'a str,
    #[tabled(rename = "Commitment cat.")]
    commitment_category: &'a str,
}

#[derive(Tabled)]
struct PaymentTypeRow<'a> {
    #[tabled(rename = "Payment type")]
    name: &'a str,
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

/// Format the whole catalog, one table per reference kind
pub fn format_catalog(data: &CatalogData) -> String {
    if data.financing_sources.is_empty()
        && data.project_categories.is_empty()
        && data.articles.is_empty()
        && data.payment_types.is_empty()
    {
        return "The catalog is empty.\n\nRun 'finreg catalog seed <file.yaml>' to load it."
            .to_string();
    }

    let mut output = String::new();

    if !data.financing_sources.is_empty() {
        output.push_str(&render(
            data.financing_sources
                .iter()
                .map(|s| SourceRow {
                    name: &s.name,
                    import_code: &s.import_code,
                    requires_category: if s.requires_project_category { "yes" } else { "" },
                })
                .collect(),
        ));
        output.push('\n');
    }

    if !data.project_categories.is_empty() {
        output.push_str(&render(
            data.project_categories
                .iter()
                .map(|c| CategoryRow {
                    name: &c.name,
                    import_code: &c.import_code,
                })
                .collect(),
        ));
        output.push('\n');
    }

    if !data.articles.is_empty() {
        output.push_str(&render(
            data.articles
                .iter()
                .map(|a| ArticleRow {
                    code: &a.code,
                    name: &a.name,
                    expenditure_category: &a.expenditure_category_code,
                    commitment_category: &a.commitment_category_code,
                })
                .collect(),
        ));
        output.push('\n');
    }

    if !data.payment_types.is_empty() {
        output.push_str(&render(
            data.payment_types
                .iter()
                .map(|p| PaymentTypeRow { name: &p.name })
                .collect(),
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenditureArticle, FinancingSource, PaymentType};

    #[test]
    fn test_empty_catalog() {
        assert!(format_catalog(&CatalogData::default()).contains("catalog is empty"));
    }

    #[test]
    fn test_format_catalog() {
        let data = CatalogData {
            financing_sources: vec![
                FinancingSource::new("PNRR")
                    .with_import_code("^pnrr")
                    .requiring_project_category(),
            ],
            articles: vec![ExpenditureArticle::new("59.40", "Burse")],
            payment_types: vec![PaymentType::new("Numerar")],
            ..CatalogData::default()
        };

        let output = format_catalog(&data);
        assert!(output.contains("Financing source"));
        assert!(output.contains("^pnrr"));
        assert!(output.contains("59.40"));
        assert!(output.contains("Numerar"));
        assert!(!output.contains("Project category"));
    }
}
