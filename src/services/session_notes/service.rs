use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, Transaction, TransactionBehavior};

use super::parser::{self, BlockError};
use crate::models::event::Event;
use crate::services::event::EventService;

/// Result of importing one notes file.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: Vec<Event>,
    /// Records whose day had to be clamped onto the calendar.
    pub clamped: usize,
    pub errors: Vec<BlockError>,
}

/// Imports Session Notes files into the events table.
pub struct SessionNotesService<'a> {
    conn: &'a Connection,
}

impl<'a> SessionNotesService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse `content` and insert every readable block in one transaction.
    ///
    /// Impossible days are clamped rather than rejected. Unreadable blocks
    /// end up in [`ImportReport::errors`] and do not stop the batch.
    pub fn import_str(&self, content: &str) -> Result<ImportReport> {
        let parsed = parser::parse(content);
        let mut report = ImportReport {
            errors: parsed.errors,
            ..ImportReport::default()
        };

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)
            .context("Failed to start import transaction")?;
        {
            let events = EventService::new(&tx);
            for record in &parsed.records {
                if record.is_clamped() {
                    log::warn!(
                        "Session notes block at line {}: clamped {}-{}-{} to {}",
                        record.line,
                        record.year,
                        record.month,
                        record.day,
                        record.date()
                    );
                    report.clamped += 1;
                }
                let created = events
                    .create_normalized(record.to_event())
                    .with_context(|| format!("Failed to import block at line {}", record.line))?;
                report.imported.push(created);
            }
        }
        tx.commit().context("Failed to commit import")?;

        for error in &report.errors {
            log::warn!("Skipped session notes {}", error);
        }
        log::info!(
            "Imported {} event(s) from session notes ({} clamped, {} skipped)",
            report.imported.len(),
            report.clamped,
            report.errors.len()
        );

        Ok(report)
    }

    /// Import a notes file from disk.
    pub fn import_file(&self, path: &Path) -> Result<ImportReport> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session notes file: {:?}", path))?;
        self.import_str(&content)
    }
}
