//! Expenditure row parser
//!
//! Column layout of the historical expenditures sheet:
//!
//! | col | content                  | col | content            |
//! |-----|--------------------------|-----|--------------------|
//! | 0   | registration number      | 8   | ordinance date     |
//! | 1   | registration date        | 9   | value              |
//! | 2   | financing source label   | 10  | payment type       |
//! | 3   | expenditure article code | 11  | beneficiary        |
//! | 4   | project label            | 12  | invoice            |
//! | 5   | details                  | 13  | noncompliance      |
//! | 6   | procurement type         | 14  | remarks            |
//! | 7   | ordinance number         |     |                    |

use tracing::debug;

use super::batch::RowParser;
use super::catalog::CatalogSnapshot;
use super::codes::{resolve_article, resolve_payment_type};
use super::fields;
use super::financing::FinancingSourceClassifier;
use super::overrides::{OverrideTable, RowOverride};
use super::project::ProjectCategoryClassifier;
use super::RegistryTable;
use crate::error::ImportError;
use crate::models::{Expenditure, RawRow};

mod col {
    pub const NUMBER: usize = 0;
    pub const DATE: usize = 1;
    pub const SOURCE: usize = 2;
    pub const ARTICLE: usize = 3;
    pub const PROJECT: usize = 4;
    pub const DETAILS: usize = 5;
    pub const PROCUREMENT: usize = 6;
    pub const ORDINANCE_NUMBER: usize = 7;
    pub const ORDINANCE_DATE: usize = 8;
    pub const VALUE: usize = 9;
    pub const PAYMENT_TYPE: usize = 10;
    pub const BENEFICIARY: usize = 11;
    pub const INVOICE: usize = 12;
    pub const NONCOMPLIANCE: usize = 13;
    pub const REMARKS: usize = 14;
}

pub struct ExpenditureRowParser<'c> {
    catalog: &'c CatalogSnapshot,
    sources: FinancingSourceClassifier<'c>,
    projects: ProjectCategoryClassifier<'c>,
    overrides: OverrideTable,
    date_format: String,
    user: String,
}

impl<'c> ExpenditureRowParser<'c> {
    pub fn new(
        catalog: &'c CatalogSnapshot,
        overrides: &[RowOverride],
        date_format: impl Into<String>,
        user: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            sources: FinancingSourceClassifier::for_table(catalog, RegistryTable::Expenditures),
            projects: ProjectCategoryClassifier::for_expenditures(catalog),
            overrides: OverrideTable::for_table(RegistryTable::Expenditures, overrides),
            date_format: date_format.into(),
            user: user.into(),
        }
    }

    fn classify_into(&self, row: &RawRow, expenditure: &mut Expenditure) -> Result<(), ImportError> {
        let index = row.row_index;
        let number = expenditure.registration_number;
        let label = row.text(col::SOURCE);

        let matched = match self.overrides.financing_source(number) {
            Some(name) => self.sources.forced(name, &label, index)?,
            None => self.sources.classify(&label, index)?,
        };
        let mut source = matched.single(&label, index)?;

        let project_label = match matched.project_label {
            Some(rewritten) => rewritten.to_string(),
            None => row.text(col::PROJECT),
        };
        let project = self.projects.classify(&project_label, &matched, index)?;
        if let Some(replacement) = project.source_override {
            debug!(row = index, from = %source.name, to = %replacement.name, "financing source replaced by project label");
            source = replacement;
        }

        if source.requires_project_category && project.category.is_none() {
            return Err(ImportError::consistency(
                index,
                format!(
                    "financing source '{}' requires a project category, got '{}'",
                    source.name,
                    project_label.trim()
                ),
            ));
        }

        expenditure.financing_source_id = Some(source.id);
        expenditure.project_category_id = project.category.map(|c| c.id);
        expenditure.project_details = project.details.unwrap_or(matched.details);
        Ok(())
    }
}

impl RowParser for ExpenditureRowParser<'_> {
    type Record = Expenditure;

    fn parse(&self, row: &RawRow) -> Result<Option<Expenditure>, ImportError> {
        let index = row.row_index;
        let number = fields::registration_number(row, col::NUMBER)?;
        if self.overrides.skips(number) {
            return Ok(None);
        }
        let date = fields::date(row, col::DATE, &self.date_format, "registration date")?;

        let mut expenditure = if fields::is_cancelled_marker(row.cell(col::SOURCE)) {
            Expenditure::cancelled(number, date, &self.user)
        } else {
            Expenditure::new(number, date, &self.user)
        };
        expenditure.imported = true;
        if let Some(year) = self.overrides.forced_year(number) {
            debug!(row = index, number, year, "registry year forced by row override");
            expenditure.year = year;
        }
        if expenditure.cancelled {
            return Ok(Some(expenditure));
        }

        self.classify_into(row, &mut expenditure)?;

        let article = resolve_article(self.catalog, row.cell(col::ARTICLE), index)?;
        expenditure.expenditure_article_id = Some(article.id);

        expenditure.details = row.text(col::DETAILS);
        expenditure.procurement_type = row.text(col::PROCUREMENT);
        expenditure.ordinance_number = row.text(col::ORDINANCE_NUMBER);
        expenditure.ordinance_date =
            fields::optional_date(row, col::ORDINANCE_DATE, &self.date_format, "ordinance date")?;
        expenditure.value = fields::money(row, col::VALUE)?;

        let payment_type = resolve_payment_type(self.catalog, &row.text(col::PAYMENT_TYPE), index)?;
        expenditure.payment_type_id = Some(payment_type.id);

        expenditure.beneficiary = row.text(col::BENEFICIARY);
        expenditure.invoice = row.text(col::INVOICE);
        expenditure.noncompliance = row.text(col::NONCOMPLIANCE);
        expenditure.remarks = row.text(col::REMARKS);

        Ok(Some(expenditure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportErrorKind;
    use crate::import::catalog::fixtures;
    use crate::import::overrides::{default_row_overrides, OverrideAction};
    use crate::models::{Cell, FinancingSource, RegistryRecord};
    use crate::raw_row;

    fn parser(catalog: &CatalogSnapshot) -> ExpenditureRowParser<'_> {
        ExpenditureRowParser::new(catalog, &default_row_overrides(), "%d.%m.%Y", "import")
    }

    fn row(number: i64, source: &str, project: &str) -> RawRow {
        raw_row![7;
            number, "12.03.2024", source, "10.01.01", project, "lucrari renovare",
            "licitatie", "OP 14", "10.03.2024", 1250.5, "Virament",
            "SC Constructii SRL", "F 221", "", ""
        ]
    }

    fn source_name(catalog: &CatalogSnapshot, e: &Expenditure) -> String {
        let id = e.financing_source_id.unwrap();
        catalog
            .financing_sources
            .iter()
            .find(|s| s.id == id)
            .unwrap()
            .name
            .clone()
    }

    fn category_name(catalog: &CatalogSnapshot, e: &Expenditure) -> Option<String> {
        e.project_category_id.map(|id| {
            catalog
                .project_categories
                .iter()
                .find(|c| c.id == id)
                .unwrap()
                .name
                .clone()
        })
    }

    #[test]
    fn test_pnrr_row() {
        let catalog = fixtures::catalog();
        let e = parser(&catalog)
            .parse(&row(12, "pnrr", "pnrr/renovare A"))
            .unwrap()
            .unwrap();

        assert_eq!(source_name(&catalog, &e), "PNRR");
        assert_eq!(category_name(&catalog, &e), Some("PNRR".into()));
        assert_eq!(e.project_details, "renovare A");
        assert_eq!(
            e.expenditure_article_id,
            catalog.articles.find_by_name("10.01.01").map(|a| a.id)
        );
        assert_eq!(e.year, 2024);
        assert_eq!(e.value.bani(), 125050);
        assert_eq!(e.beneficiary, "SC Constructii SRL");
        assert!(e.imported);
        assert!(e.validation_messages().is_empty());
    }

    #[test]
    fn test_revenue_row_has_no_category() {
        let catalog = fixtures::catalog();
        let e = parser(&catalog)
            .parse(&row(13, "venituri ub", "buget"))
            .unwrap()
            .unwrap();
        assert_eq!(source_name(&catalog, &e), "Venituri");
        assert_eq!(category_name(&catalog, &e), None);
        assert_eq!(e.project_details, "buget");
    }

    #[test]
    fn test_empty_project_keeps_source_category() {
        let catalog = fixtures::catalog();
        let e = parser(&catalog)
            .parse(&row(14, "drept universal", ""))
            .unwrap()
            .unwrap();
        assert_eq!(source_name(&catalog, &e), "Venituri");
        assert_eq!(category_name(&catalog, &e), Some("Drept Universal".into()));
    }

    #[test]
    fn test_project_label_replaces_source() {
        let catalog = fixtures::catalog();
        let e = parser(&catalog)
            .parse(&row(15, "venituri", "editura ub"))
            .unwrap()
            .unwrap();
        assert_eq!(source_name(&catalog, &e), "Editura UB");
        assert_eq!(category_name(&catalog, &e), None);
    }

    #[test]
    fn test_unknown_source_is_classification_error() {
        let catalog = fixtures::catalog();
        let err = parser(&catalog)
            .parse(&row(16, "xyz123", ""))
            .unwrap_err();
        assert_eq!(err.kind, ImportErrorKind::Classification);
        assert_eq!(err.row_index, 7);
        assert_eq!(
            err.to_string(),
            "Error reading row 7: unrecognized financing source 'xyz123'"
        );
    }

    #[test]
    fn test_unknown_article_and_payment_type() {
        let catalog = fixtures::catalog();
        let mut r = row(17, "pnrr", "");
        r.set(3, Cell::from("99.99"));
        let err = parser(&catalog).parse(&r).unwrap_err();
        assert_eq!(err.kind, ImportErrorKind::CodeLookup);
        assert!(err.message.contains("'99.99'"));

        let mut r = row(17, "pnrr", "");
        r.set(10, Cell::from("cec"));
        let err = parser(&catalog).parse(&r).unwrap_err();
        assert_eq!(err.message, "unknown payment type code 'cec'");
    }

    #[test]
    fn test_numeric_article_code_cell() {
        let catalog = fixtures::catalog();
        let mut r = row(18, "pnrr", "");
        r.set(3, Cell::Number(59.4));
        let e = parser(&catalog).parse(&r).unwrap().unwrap();
        assert_eq!(
            e.expenditure_article_id,
            catalog.articles.find_by_name("59.40").map(|a| a.id)
        );
    }

    #[test]
    fn test_source_requiring_category() {
        let catalog = fixtures::catalog_with(
            |sources| {
                for s in sources.iter_mut().filter(|s| s.name == "Cercetare") {
                    s.requires_project_category = true;
                }
            },
            |_| {},
        );
        let err = parser(&catalog)
            .parse(&row(19, "cercetare", ""))
            .unwrap_err();
        assert_eq!(err.kind, ImportErrorKind::Consistency);

        let e = parser(&catalog)
            .parse(&row(19, "cercetare", "pfe/ctr 12"))
            .unwrap()
            .unwrap();
        assert_eq!(category_name(&catalog, &e), Some("PFE".into()));
        assert_eq!(e.project_details, "ctr 12");
    }

    #[test]
    fn test_multi_source_import_code_rejected() {
        let catalog = fixtures::catalog_with(
            |sources| {
                sources.push(FinancingSource::new("Lifewatch").with_import_code("^lw"));
                sources.push(FinancingSource::new("Horizon").with_import_code("lw"));
            },
            |_| {},
        );
        let err = parser(&catalog).parse(&row(20, "lw 2", "")).unwrap_err();
        assert_eq!(err.kind, ImportErrorKind::Consistency);
    }

    #[test]
    fn test_cancelled_number() {
        let catalog = fixtures::catalog();
        let r = raw_row![9; 21i64, "02.04.2024", "NUMAR ANULAT"];
        let e = parser(&catalog).parse(&r).unwrap().unwrap();
        assert!(e.cancelled);
        assert_eq!(e.financing_source_id, None);
        assert!(e.validation_messages().is_empty());
    }

    #[test]
    fn test_forced_year_override() {
        let catalog = fixtures::catalog();
        let mut r = row(1397, "pnrr", "");
        r.set(1, Cell::from("03.01.2023"));
        let e = parser(&catalog).parse(&r).unwrap().unwrap();
        assert_eq!(e.year, 2024);
        assert_eq!(e.full_identifier(), "1397/2024");
    }

    #[test]
    fn test_skip_and_forced_source_overrides() {
        let catalog = fixtures::catalog();
        let overrides = vec![
            RowOverride::new(RegistryTable::Expenditures, 30, OverrideAction::Skip),
            RowOverride::new(
                RegistryTable::Expenditures,
                31,
                OverrideAction::FinancingSource {
                    name: "Cercetare".into(),
                },
            ),
        ];
        let parser = ExpenditureRowParser::new(&catalog, &overrides, "%d.%m.%Y", "import");

        assert!(parser.parse(&row(30, "xyz", "")).unwrap().is_none());

        let e = parser.parse(&row(31, "Grant XYZ", "")).unwrap().unwrap();
        assert_eq!(source_name(&catalog, &e), "Cercetare");
        assert_eq!(e.project_details, "Grant XYZ");
    }

    #[test]
    fn test_bad_registration_date() {
        let catalog = fixtures::catalog();
        let mut r = row(22, "pnrr", "");
        r.set(1, Cell::from("31.02.2024"));
        let err = parser(&catalog).parse(&r).unwrap_err();
        assert_eq!(err.kind, ImportErrorKind::RowFormat);
    }
}
