//! Append-only, human-readable purchase audit log.
//!
//! Every purchase appends one line naming the buyer and every event they have
//! bought so far in the session. Prior lines are never rewritten. The log is
//! diagnostic history; the ledger is the authoritative record.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::codec;
use crate::error::Error;

/// Handle to the audit log file.
///
/// Holds only the path: the file is opened in append mode for each line and
/// closed again before [`PurchaseAuditLog::append`] returns, on success and on
/// error alike. Cloning is cheap and every clone appends to the same file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseAuditLog {
    path: PathBuf,
}

impl PurchaseAuditLog {
    /// Create a handle for the log at `path`. The file is created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one snapshot line for `email`.
    ///
    /// # Arguments
    ///
    /// * `email` - Buyer identity.
    /// * `names` - Names of all events purchased so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if the file cannot be opened for append or
    /// the line cannot be written.
    pub fn append<'a>(
        &self,
        email: &str,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), Error> {
        let line = codec::encode_audit_line(email, names);
        let persistence = |source| Error::Persistence {
            path: self.path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(persistence)?;
        file.write_all(line.as_bytes()).map_err(persistence)?;
        file.flush().map_err(persistence)?;

        metrics::counter!("boxoffice_audit_lines_total").increment(1);
        tracing::debug!(email, path = %self.path.display(), "audit line appended");
        Ok(())
    }
}
