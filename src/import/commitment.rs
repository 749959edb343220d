//! Commitment row parser
//!
//! Columns: 0 registration number, 1 registration date, 2 document number
//! (or `NUMAR ANULAT`), 3 validity, 4 financing source label, 5 partner,
//! 6 value, 7 procurement type, 8 expenditure article code, 9 remarks,
//! 10 noncompliance.
//!
//! Commitments have no project category; whatever the financing-source
//! classifier leaves over becomes the project details.

use tracing::debug;

use super::batch::RowParser;
use super::catalog::CatalogSnapshot;
use super::codes::resolve_article;
use super::fields;
use super::financing::FinancingSourceClassifier;
use super::overrides::{OverrideTable, RowOverride};
use super::RegistryTable;
use crate::error::ImportError;
use crate::models::{Commitment, RawRow};

mod col {
    pub const NUMBER: usize = 0;
    pub const DATE: usize = 1;
    pub const DOCUMENT: usize = 2;
    pub const VALIDITY: usize = 3;
    pub const SOURCE: usize = 4;
    pub const PARTNER: usize = 5;
    pub const VALUE: usize = 6;
    pub const PROCUREMENT: usize = 7;
    pub const ARTICLE: usize = 8;
    pub const REMARKS: usize = 9;
    pub const NONCOMPLIANCE: usize = 10;
}

pub struct CommitmentRowParser<'c> {
    catalog: &'c CatalogSnapshot,
    sources: FinancingSourceClassifier<'c>,
    overrides: OverrideTable,
    date_format: String,
    user: String,
}

impl<'c> CommitmentRowParser<'c> {
    pub fn new(
        catalog: &'c CatalogSnapshot,
        overrides: &[RowOverride],
        date_format: impl Into<String>,
        user: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            sources: FinancingSourceClassifier::for_table(catalog, RegistryTable::Commitments),
            overrides: OverrideTable::for_table(RegistryTable::Commitments, overrides),
            date_format: date_format.into(),
            user: user.into(),
        }
    }
}

impl RowParser for CommitmentRowParser<'_> {
    type Record = Commitment;

    fn parse(&self, row: &RawRow) -> Result<Option<Commitment>, ImportError> {
        let index = row.row_index;
        let number = fields::registration_number(row, col::NUMBER)?;
        if self.overrides.skips(number) {
            return Ok(None);
        }
        let date = fields::date(row, col::DATE, &self.date_format, "registration date")?;

        let mut commitment = if fields::is_cancelled_marker(row.cell(col::DOCUMENT)) {
            Commitment::cancelled(number, date, &self.user)
        } else {
            Commitment::new(number, date, &self.user)
        };
        commitment.imported = true;
        if let Some(year) = self.overrides.forced_year(number) {
            debug!(row = index, number, year, "registry year forced by row override");
            commitment.year = year;
        }
        if commitment.cancelled {
            return Ok(Some(commitment));
        }

        commitment.document_number = row.text(col::DOCUMENT);
        commitment.validity = row.text(col::VALIDITY);

        let label = row.text(col::SOURCE);
        let added = self.overrides.added_sources(number);
        let matched = match self.overrides.financing_source(number) {
            Some(name) => self.sources.forced(name, &label, index)?,
            None if !added.is_empty() => self.sources.with_added(&added, &label, index)?,
            None => self.sources.classify(&label, index)?,
        };
        commitment.financing_source_ids = matched.sources.iter().map(|s| s.id).collect();
        commitment.project_details = matched.details;

        commitment.partner = row.text(col::PARTNER);
        commitment.value = fields::money(row, col::VALUE)?;
        commitment.procurement_type = row.text(col::PROCUREMENT);

        let article = resolve_article(self.catalog, row.cell(col::ARTICLE), index)?;
        commitment.expenditure_article_id = Some(article.id);

        commitment.remarks = row.text(col::REMARKS);
        commitment.noncompliance = row.text(col::NONCOMPLIANCE);

        Ok(Some(commitment))
    }
}
