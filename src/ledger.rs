//! Persistent ticket ledger.
//!
//! This module owns the ledger file and its in-memory mapping from user email
//! to purchased ticket indices. The mapping is loaded once when the ledger is
//! opened and the whole file is rewritten after every mutation.
//!
//! # Concurrency
//!
//! There is no file locking and no write-to-temp-then-rename. Two processes
//! sharing one ledger file will overwrite each other's changes. The program is
//! single-user and single-process, and the ledger is built for that.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::audit::PurchaseAuditLog;
use crate::codec::{self, LedgerMap};
use crate::error::Error;
use crate::session::ClientSession;

/// Whether [`TicketLedger::get_client`] found an existing account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    /// The email was unknown; an empty account was created and saved.
    Created,
    /// The email already had an account.
    Returning,
}

impl AccountStatus {
    /// Greeting shown to the user after sign-in.
    pub fn message(self) -> &'static str {
        match self {
            AccountStatus::Created => "User does not exist. A new account was created.",
            AccountStatus::Returning => "Welcome back!",
        }
    }
}

/// Email -> ticket index mapping backed by a line-oriented text file.
///
/// Construct exactly one per process with [`TicketLedger::open`] and pass it
/// by reference to whoever needs it. Indices are stored as given; they are
/// not checked against the catalog, so they may point past its end if the
/// catalog shrank between runs.
#[derive(Debug)]
pub struct TicketLedger {
    /// Ledger file, rewritten in full by every save.
    path: PathBuf,
    /// In-memory mapping. Mutations whose save fails are rolled back.
    users: LedgerMap,
    /// Tokens and lines rejected while loading.
    load_warnings: Vec<Error>,
}

impl TicketLedger {
    /// Open the ledger at `path`, loading any existing contents.
    ///
    /// # Recovery behavior
    ///
    /// - **Missing file**: starts empty. The file is created on the first save.
    /// - **Unreadable file** (permissions, a directory): logged with
    ///   `tracing::warn!`, starts empty.
    /// - **Malformed ticket token**: logged with `tracing::warn!`, dropped from
    ///   that user's list and kept in [`TicketLedger::load_warnings`]. Loading
    ///   continues with the next token.
    /// - **Line that is not UTF-8**: logged and recorded the same way. Only that
    ///   line is dropped; every other user still loads and survives the next save.
    pub fn open(path: impl Into<PathBuf>) -> TicketLedger {
        let path = path.into();

        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no ledger file, starting empty");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "could not read ledger file, starting empty"
                );
                Vec::new()
            }
        };

        let decoded = codec::decode_ledger_bytes(&bytes);
        for warning in &decoded.malformed {
            if let Error::MalformedRecord { line, token } = warning {
                tracing::warn!(
                    path = %path.display(),
                    line,
                    token = %token,
                    "skipping malformed ledger data"
                );
            }
        }
        metrics::counter!("boxoffice_ledger_malformed_tokens_total")
            .increment(decoded.malformed.len() as u64);
        tracing::info!(
            users = decoded.users.len(),
            skipped = decoded.malformed.len(),
            "ledger loaded"
        );

        TicketLedger {
            path,
            users: decoded.users,
            load_warnings: decoded.malformed,
        }
    }

    /// Path of the ledger file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The [`Error::MalformedRecord`] warnings collected by [`TicketLedger::open`].
    pub fn load_warnings(&self) -> &[Error] {
        &self.load_warnings
    }

    /// Whether `email` has an account. Emails are compared exactly.
    pub fn user_exists(&self, email: &str) -> bool {
        self.users.contains_key(email)
    }

    /// Number of known users.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Register `email` with an empty ticket list and save.
    ///
    /// Does nothing, and does not touch the file, if the user already exists.
    /// If the save fails the user is not kept in memory either.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if the ledger file cannot be written.
    pub fn add_user(&mut self, email: &str) -> Result<(), Error> {
        if self.user_exists(email) {
            return Ok(());
        }
        self.users.insert(email.to_string(), Vec::new());
        self.save().inspect_err(|_| {
            self.users.remove(email);
        })
    }

    /// Append `ticket_index` to the user's list and save.
    ///
    /// Unknown users are ignored without error and without touching the file;
    /// callers register the user first (see [`TicketLedger::get_client`]).
    /// Duplicates are kept. If the save fails the ticket is not kept in memory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if the ledger file cannot be written.
    pub fn add_ticket(&mut self, email: &str, ticket_index: u32) -> Result<(), Error> {
        let Some(tickets) = self.users.get_mut(email) else {
            tracing::debug!(email, ticket_index, "ignoring ticket for unknown user");
            return Ok(());
        };
        tickets.push(ticket_index);
        if let Err(e) = self.save() {
            if let Some(tickets) = self.users.get_mut(email) {
                tickets.pop();
            }
            return Err(e);
        }
        Ok(())
    }

    /// Sign in `email`, creating the account if needed.
    ///
    /// The returned session always starts with an empty purchase history.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if a new account cannot be saved.
    pub fn get_client(
        &mut self,
        email: &str,
        audit_log: &PurchaseAuditLog,
    ) -> Result<(ClientSession, AccountStatus), Error> {
        let status = if self.user_exists(email) {
            AccountStatus::Returning
        } else {
            self.add_user(email)?;
            AccountStatus::Created
        };
        tracing::info!(email, ?status, "user signed in");
        Ok((ClientSession::new(email, audit_log.clone()), status))
    }

    /// Ticket indices bought by `email`, oldest first. Empty for unknown users.
    pub fn get_user_tickets(&self, email: &str) -> Vec<u32> {
        self.users.get(email).cloned().unwrap_or_default()
    }

    /// Rewrite the whole ledger file from the in-memory mapping.
    ///
    /// The file handle is dropped before returning on every path.
    fn save(&self) -> Result<(), Error> {
        let persistence = |source| Error::Persistence {
            path: self.path.clone(),
            source,
        };
        let text = codec::encode_ledger(&self.users);

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(persistence)?;
        file.write_all(text.as_bytes()).map_err(persistence)?;
        file.sync_all().map_err(persistence)?;

        metrics::counter!("boxoffice_ledger_saves_total").increment(1);
        tracing::debug!(path = %self.path.display(), users = self.users.len(), "ledger saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("users.txt")
    }

    #[test]
    fn open_missing_file_starts_empty() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let ledger = TicketLedger::open(ledger_path(&dir));

        assert_eq!(ledger.user_count(), 0);
        assert!(ledger.load_warnings().is_empty());
        assert!(!ledger_path(&dir).exists(), "open must not create the file");
    }

    #[test]
    fn open_unreadable_file_starts_empty() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        // Reading a directory as a file fails with something other than NotFound.
        let ledger = TicketLedger::open(dir.path());
        assert_eq!(ledger.user_count(), 0);
    }

    #[test]
    fn open_non_utf8_line_keeps_other_users_through_save() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let path = ledger_path(&dir);
        std::fs::write(&path, b"a@x.com: 1,2\nb@y.com: 3\ncaf\xe9@x.com: 2\n")
            .expect("write fixture");

        let mut ledger = TicketLedger::open(&path);
        assert_eq!(ledger.user_count(), 2);
        assert_eq!(ledger.get_user_tickets("a@x.com"), vec![1, 2]);
        assert_eq!(ledger.get_user_tickets("b@y.com"), vec![3]);
        assert_eq!(ledger.load_warnings().len(), 1);
        assert!(matches!(
            ledger.load_warnings()[0],
            Error::MalformedRecord { line: 3, .. }
        ));

        ledger.add_user("new@x.com").expect("add new");
        drop(ledger);

        let reopened = TicketLedger::open(&path);
        assert_eq!(reopened.user_count(), 3);
        assert_eq!(reopened.get_user_tickets("a@x.com"), vec![1, 2]);
        assert_eq!(reopened.get_user_tickets("b@y.com"), vec![3]);
        assert!(reopened.user_exists("new@x.com"));
        assert!(reopened.load_warnings().is_empty());
    }

    #[test]
    fn email_with_colon_round_trips() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let path = ledger_path(&dir);

        let mut ledger = TicketLedger::open(&path);
        ledger.add_user("a:b@x.com").expect("add user");
        ledger.add_ticket("a:b@x.com", 1).expect("ticket");
        drop(ledger);

        let reopened = TicketLedger::open(&path);
        assert!(reopened.user_exists("a:b@x.com"));
        assert!(!reopened.user_exists("a"));
        assert_eq!(reopened.get_user_tickets("a:b@x.com"), vec![1]);
        assert!(reopened.load_warnings().is_empty());
    }

    #[test]
    fn save_and_reopen_round_trips() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let path = ledger_path(&dir);

        let mut ledger = TicketLedger::open(&path);
        ledger.add_user("a@x.com").expect("add a");
        ledger.add_ticket("a@x.com", 1).expect("ticket 1");
        ledger.add_ticket("a@x.com", 2).expect("ticket 2");
        ledger.add_user("b@y.com").expect("add b");
        drop(ledger);

        let reopened = TicketLedger::open(&path);
        assert_eq!(reopened.user_count(), 2);
        assert_eq!(reopened.get_user_tickets("a@x.com"), vec![1, 2]);
        assert!(reopened.user_exists("b@y.com"));
        assert_eq!(reopened.get_user_tickets("b@y.com"), Vec::<u32>::new());
    }

    #[test]
    fn add_user_twice_keeps_tickets() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let mut ledger = TicketLedger::open(ledger_path(&dir));

        ledger.add_user("a@x.com").expect("first add");
        ledger.add_ticket("a@x.com", 3).expect("ticket");
        ledger.add_user("a@x.com").expect("second add");

        assert_eq!(ledger.get_user_tickets("a@x.com"), vec![3]);
    }

    #[test]
    fn add_ticket_for_unknown_user_leaves_file_untouched() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let path = ledger_path(&dir);
        let mut ledger = TicketLedger::open(&path);
        ledger.add_user("a@x.com").expect("add a");
        let before = std::fs::read(&path).expect("ledger saved");

        ledger.add_ticket("ghost@x.com", 1).expect("no-op is not an error");

        let after = std::fs::read(&path).expect("ledger still present");
        assert_eq!(before, after);
        assert!(!ledger.user_exists("ghost@x.com"));
    }

    #[test]
    fn add_ticket_keeps_duplicates_in_order() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let mut ledger = TicketLedger::open(ledger_path(&dir));
        ledger.add_user("a@x.com").expect("add a");
        for index in [2, 1, 2] {
            ledger.add_ticket("a@x.com", index).expect("ticket");
        }
        assert_eq!(ledger.get_user_tickets("a@x.com"), vec![2, 1, 2]);
    }

    #[test]
    fn emails_are_case_sensitive() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let mut ledger = TicketLedger::open(ledger_path(&dir));
        ledger.add_user("A@x.com").expect("add");
        assert!(!ledger.user_exists("a@x.com"));
    }

    #[test]
    fn open_skips_malformed_tokens_and_records_warning() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let path = ledger_path(&dir);
        std::fs::write(&path, "c@z.com: 3,abc,5\n").expect("write fixture");

        let ledger = TicketLedger::open(&path);

        assert_eq!(ledger.get_user_tickets("c@z.com"), vec![3, 5]);
        match ledger.load_warnings() {
            [Error::MalformedRecord { line: 1, token }] => assert_eq!(token, "abc"),
            other => panic!("expected one MalformedRecord, got: {other:?}"),
        }
    }

    #[test]
    fn get_client_creates_then_welcomes_back() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let audit = PurchaseAuditLog::new(dir.path().join("users_tickets.txt"));
        let mut ledger = TicketLedger::open(ledger_path(&dir));

        let (session, status) = ledger.get_client("u@test.com", &audit).expect("sign in");
        assert_eq!(status, AccountStatus::Created);
        assert_eq!(session.email(), "u@test.com");
        assert!(ledger.user_exists("u@test.com"));

        ledger.add_ticket("u@test.com", 1).expect("ticket");
        let (session, status) = ledger.get_client("u@test.com", &audit).expect("sign in");
        assert_eq!(status, AccountStatus::Returning);
        assert!(session.history().is_empty());
    }

    #[test]
    fn save_failure_is_persistence_error() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        // Parent directory does not exist, so the ledger cannot be created.
        let path = dir.path().join("missing").join("users.txt");
        let mut ledger = TicketLedger::open(&path);

        match ledger.add_user("a@x.com") {
            Err(Error::Persistence { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected Persistence, got: {other:?}"),
        }
        assert!(!ledger.user_exists("a@x.com"), "failed add must be rolled back");
    }

    #[test]
    fn unknown_user_has_no_tickets() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let ledger = TicketLedger::open(ledger_path(&dir));
        assert!(ledger.get_user_tickets("nobody@x.com").is_empty());
    }
}
