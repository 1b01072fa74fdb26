use thiserror::Error;

use super::LedgerError;

/// A non-fatal problem met while importing one sheet or record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportIssue {
    #[error("Sheet '{sheet}' skipped: missing column(s) {}", .missing.join(", "))]
    MissingColumns {
        sheet: String,
        missing: Vec<&'static str>,
    },

    #[error("Sheet '{sheet}' could not be read: {reason}")]
    Unreadable { sheet: String, reason: String },

    /// The sheet was imported without this row.
    #[error("Sheet '{sheet}' row {row} skipped: {reason}")]
    RowSkipped {
        sheet: String,
        row: usize,
        reason: String,
    },

    #[error(transparent)]
    Failed(#[from] LedgerError),
}

/// Outcome of a bulk import: regions written plus everything skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: Vec<String>,
    pub issues: Vec<ImportIssue>,
}

impl ImportReport {
    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Put issues found before parsing (e.g. sheets the reader could not
    /// open) ahead of the ones found while parsing.
    pub fn prepend_issues(&mut self, mut earlier: Vec<ImportIssue>) {
        earlier.append(&mut self.issues);
        self.issues = earlier;
    }

    /// One-line summary for status bars and CLI output.
    pub fn describe(&self) -> String {
        let count = self.imported_count();
        let mut msg = format!(
            "Imported {count} region{}",
            if count == 1 { "" } else { "s" }
        );
        if self.has_issues() {
            let n = self.issues.len();
            msg.push_str(&format!(" ({n} warning{})", if n == 1 { "" } else { "s" }));
        }
        msg
    }
}
