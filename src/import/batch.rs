//! Batch import controller
//!
//! Reads rows in file order, hands each to a row parser and saves the
//! result into a staged sink. Row errors are collected, not propagated.
//! The batch is all-or-nothing: a single rejected row rolls back every
//! record staged so far.

use tracing::{debug, info, warn};

use crate::error::{FinregResult, ImportError};
use crate::models::RawRow;

/// Turns one spreadsheet row into a record
pub trait RowParser {
    type Record;

    /// `Ok(None)` means the row is deliberately left out
    fn parse(&self, row: &RawRow) -> Result<Option<Self::Record>, ImportError>;

    /// The table ends at the first row whose date and first label cells are
    /// both blank
    fn is_end_of_table(&self, row: &RawRow) -> bool {
        row.is_blank(1) && row.is_blank(2)
    }
}

/// Staged persistence for one batch
pub trait RecordSink {
    type Record;

    /// Validate and stage a record; Err carries field-level messages
    fn save(&mut self, record: Self::Record) -> Result<(), Vec<String>>;

    /// Persist everything staged, returning the committed records
    fn commit(&mut self) -> FinregResult<Vec<Self::Record>>;

    /// Drop everything staged
    fn rollback(&mut self);
}

/// Outcome of one batch
#[derive(Debug, Clone)]
pub struct BatchReport<R> {
    /// Rows handed to the parser
    pub rows_attempted: usize,
    pub skipped: usize,
    /// Rows that parsed and validated, whether or not they were committed
    pub accepted: usize,
    pub errors: Vec<ImportError>,
    /// Reading stopped because the error ceiling was crossed
    pub aborted: bool,
    pub committed: Vec<R>,
    pub dry_run: bool,
}

impl<R> BatchReport<R> {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn saved(&self) -> usize {
        self.committed.len()
    }

    /// Error lines as shown to the operator
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BatchImporter {
    max_errors: usize,
    dry_run: bool,
}

impl BatchImporter {
    pub fn new(max_errors: usize) -> Self {
        Self {
            max_errors,
            dry_run: false,
        }
    }

    /// Validate everything but always roll back
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn run<P, S, I>(&self, parser: &P, rows: I, sink: &mut S) -> FinregResult<BatchReport<P::Record>>
    where
        P: RowParser,
        S: RecordSink<Record = P::Record>,
        I: IntoIterator<Item = RawRow>,
    {
        let mut report = BatchReport {
            rows_attempted: 0,
            skipped: 0,
            accepted: 0,
            errors: Vec::new(),
            aborted: false,
            committed: Vec::new(),
            dry_run: self.dry_run,
        };

        for row in rows {
            if parser.is_end_of_table(&row) {
                debug!(row = row.row_index, "end of table");
                break;
            }
            report.rows_attempted += 1;

            let result = match parser.parse(&row) {
                Ok(Some(record)) => sink
                    .save(record)
                    .map_err(|messages| ImportError::persistence(row.row_index, &messages)),
                Ok(None) => {
                    debug!(row = row.row_index, "row skipped by override");
                    report.skipped += 1;
                    continue;
                }
                Err(e) => Err(e),
            };

            match result {
                Ok(()) => report.accepted += 1,
                Err(e) => {
                    warn!(row = e.row_index, kind = %e.kind, "{}", e.message);
                    report.errors.push(e);
                    if report.errors.len() > self.max_errors {
                        warn!(
                            errors = report.errors.len(),
                            max_errors = self.max_errors,
                            "too many errors, stopping"
                        );
                        report.aborted = true;
                        break;
                    }
                }
            }
        }

        if !report.errors.is_empty() {
            sink.rollback();
            info!(
                errors = report.errors.len(),
                rows = report.rows_attempted,
                "batch rolled back"
            );
        } else if self.dry_run {
            sink.rollback();
            info!(accepted = report.accepted, "dry run, nothing saved");
        } else {
            report.committed = sink.commit()?;
            info!(saved = report.committed.len(), "batch committed");
        }

        Ok(report)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// In-memory sink that rejects records with a chosen marker
    #[derive(Default)]
    pub struct VecSink<T> {
        pub staged: Vec<T>,
        pub stored: Vec<T>,
        pub rolled_back: bool,
        pub reject: Option<fn(&T) -> Option<String>>,
    }

    impl<T: Clone> RecordSink for VecSink<T> {
        type Record = T;

        fn save(&mut self, record: T) -> Result<(), Vec<String>> {
            if let Some(reject) = self.reject {
                if let Some(message) = reject(&record) {
                    return Err(vec![message]);
                }
            }
            self.staged.push(record);
            Ok(())
        }

        fn commit(&mut self) -> FinregResult<Vec<T>> {
            let committed: Vec<T> = self.staged.drain(..).collect();
            self.stored.extend(committed.iter().cloned());
            Ok(committed)
        }

        fn rollback(&mut self) {
            self.staged.clear();
            self.rolled_back = true;
        }
    }
}
