//! Registry import service
//!
//! One call imports one spreadsheet into one registry: read the rows, take
//! a catalog snapshot, run the batch through the table's row parser into a
//! staged transaction, and audit whatever was committed.

use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{info, warn};

use crate::audit::{AuditEntry, TargetTable};
use crate::config::settings::Settings;
use crate::error::{FinregResult, ImportError};
use crate::import::{
    sheet, BatchImporter, BatchReport, CommitmentRowParser, ExpenditureRowParser, RegistryTable,
    RowParser,
};
use crate::models::{RawRow, RegistryRecord};
use crate::storage::{RegistryRepository, Storage};

/// Outcome of importing one spreadsheet
#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub table: RegistryTable,
    pub rows_attempted: usize,
    pub skipped: usize,
    pub accepted: usize,
    /// Records written to the registry
    pub saved: usize,
    pub errors: Vec<ImportError>,
    pub aborted: bool,
    pub dry_run: bool,
}

impl ImportSummary {
    fn from_report<R>(table: RegistryTable, report: &BatchReport<R>) -> Self {
        Self {
            table,
            rows_attempted: report.rows_attempted,
            skipped: report.skipped,
            accepted: report.accepted,
            saved: report.saved(),
            errors: report.errors.clone(),
            aborted: report.aborted,
            dry_run: report.dry_run,
        }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Service for importing registry spreadsheets
pub struct ImportService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Import a spreadsheet file into a registry
    pub fn import_file(
        &self,
        table: RegistryTable,
        path: &Path,
        dry_run: bool,
    ) -> FinregResult<ImportSummary> {
        let options = self.settings.import_options(table);
        let rows = sheet::read_rows(path, options.start_row)?;
        info!(%table, file = %path.display(), rows = rows.len(), dry_run, "import started");
        self.import_rows(table, rows, dry_run)
    }

    /// Import rows already read from a sheet
    pub fn import_rows(
        &self,
        table: RegistryTable,
        rows: Vec<RawRow>,
        dry_run: bool,
    ) -> FinregResult<ImportSummary> {
        let options = self.settings.import_options(table);
        let catalog = self.storage.catalog.snapshot()?;
        if catalog.financing_sources.is_empty() {
            warn!("the reference catalog has no financing sources; seed it first");
        }

        let importer = BatchImporter::new(options.max_errors).dry_run(dry_run);
        let overrides = &self.settings.row_overrides;
        let user = self.settings.acting_user.as_str();

        let summary = match table {
            RegistryTable::Expenditures => {
                let parser =
                    ExpenditureRowParser::new(&catalog, overrides, &options.date_format, user);
                self.run(
                    table,
                    &importer,
                    &parser,
                    rows,
                    &self.storage.expenditures,
                    TargetTable::Expenditures,
                )?
            }
            RegistryTable::Commitments => {
                let parser =
                    CommitmentRowParser::new(&catalog, overrides, &options.date_format, user);
                self.run(
                    table,
                    &importer,
                    &parser,
                    rows,
                    &self.storage.commitments,
                    TargetTable::Commitments,
                )?
            }
        };

        info!(
            %table,
            saved = summary.saved,
            errors = summary.errors.len(),
            "import finished"
        );
        Ok(summary)
    }

    fn run<P, R>(
        &self,
        table: RegistryTable,
        importer: &BatchImporter,
        parser: &P,
        rows: Vec<RawRow>,
        repository: &RegistryRepository<R>,
        target: TargetTable,
    ) -> FinregResult<ImportSummary>
    where
        P: RowParser<Record = R>,
        R: RegistryRecord + Clone + Serialize + DeserializeOwned,
    {
        let mut transaction = repository.begin();
        let report = importer.run(parser, rows, &mut transaction)?;

        let entries: Vec<AuditEntry> = report
            .committed
            .iter()
            .map(|record| {
                AuditEntry::insert(
                    self.settings.acting_user.as_str(),
                    target,
                    record.full_identifier(),
                    record,
                )
            })
            .collect();
        self.storage.log_audit(&entries)?;

        Ok(ImportSummary::from_report(table, &report))
    }
}
