//! Audit log
//!
//! Every record committed by an import and every catalog change is written
//! to an append-only JSONL file with the acting user and a human target
//! identifier ("<number>/<year>" for registry records).

mod entry;
mod logger;

pub use entry::{Action, AuditEntry, TargetTable};
pub use logger::AuditLogger;
