//! Error types for boxoffice.
//!
//! This module defines the unified error enum used throughout the crate. All fallible
//! operations return `Result<T, Error>`. The CLI loop decides per variant whether the
//! failure is reported and recovered from or ends the current operation.

use std::path::PathBuf;

/// Unified error type for all boxoffice operations.
///
/// - `InvalidKind` -> event construction rejected
/// - `IndexOutOfRange` -> reported to the caller, loop continues
/// - `Persistence` -> the enclosing operation fails with a visible message
/// - `MalformedRecord` -> collected as a load warning, never returned from `open`
/// - `Io` -> terminal I/O failure in the CLI loop
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested event kind is not one of the supported kinds.
    #[error("invalid event kind: {0}")]
    InvalidKind(String),

    /// A 1-based position fell outside `1..=len`.
    #[error("index out of range: position {position}, catalog has {len} entries")]
    IndexOutOfRange {
        /// The rejected 1-based position.
        position: i64,
        /// Number of entries at the time of the lookup.
        len: usize,
    },

    /// A ledger or audit log file could not be opened or written.
    #[error("persistence error on {}: {source}", .path.display())]
    Persistence {
        /// File the failed operation targeted.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A ticket token in the ledger file was not a decimal index, or a whole
    /// line was not valid UTF-8.
    #[error("malformed record on line {line}: '{token}'")]
    MalformedRecord {
        /// 1-based line number in the ledger file.
        line: usize,
        /// The offending token, trimmed, or the undecodable line.
        token: String,
    },

    /// An I/O error outside the ledger/audit files (terminal input and output).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
