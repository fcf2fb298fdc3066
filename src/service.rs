//! Purchase flows over the catalog, ledger and audit log.
//!
//! [`BoxOffice`] holds the three pieces of state a session needs and exposes
//! the operations the interactive loop drives: sign in, list events, buy a
//! ticket, and list the tickets a user owns.

use crate::audit::PurchaseAuditLog;
use crate::catalog::EventCatalog;
use crate::error::Error;
use crate::ledger::{AccountStatus, TicketLedger};
use crate::session::ClientSession;
use crate::types::Event;

/// The catalog, ledger and audit log for one process.
///
/// - `catalog` -- populated once at startup, read-only afterwards.
/// - `ledger` -- the single ledger instance; every mutation rewrites its file.
/// - `audit_log` -- handed to each signed-in session.
pub struct BoxOffice {
    catalog: EventCatalog,
    ledger: TicketLedger,
    audit_log: PurchaseAuditLog,
}

impl BoxOffice {
    pub fn new(catalog: EventCatalog, ledger: TicketLedger, audit_log: PurchaseAuditLog) -> Self {
        Self {
            catalog,
            ledger,
            audit_log,
        }
    }

    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &TicketLedger {
        &self.ledger
    }

    /// Sign in `email`, creating the account on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if a new account cannot be saved.
    pub fn sign_in(&mut self, email: &str) -> Result<(ClientSession, AccountStatus), Error> {
        self.ledger.get_client(email, &self.audit_log)
    }

    /// Buy the event at 1-based `position` for the session's user.
    ///
    /// The position is checked against the catalog first. The ledger records
    /// the index and saves, then the session keeps a copy of the event and
    /// appends to the audit log. A failed audit append does not undo the
    /// ledger entry.
    ///
    /// # Returns
    ///
    /// A copy of the purchased event.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `position` is not in the catalog.
    /// Returns [`Error::Persistence`] if the ledger or the audit log cannot be written.
    pub fn purchase(&mut self, session: &mut ClientSession, position: i64) -> Result<Event, Error> {
        let event = self.catalog.get(position)?.clone();
        let ticket_index = u32::try_from(position).map_err(|_| Error::IndexOutOfRange {
            position,
            len: self.catalog.count(),
        })?;

        self.ledger.add_ticket(session.email(), ticket_index)?;
        session.buy_ticket(&event)?;

        metrics::counter!("boxoffice_tickets_purchased_total").increment(1);
        tracing::info!(
            email = session.email(),
            ticket_index,
            event = event.name(),
            "ticket purchased"
        );
        Ok(event)
    }

    /// Resolve every ticket `email` owns against the current catalog.
    ///
    /// Each entry resolves on its own: an index the catalog no longer has
    /// yields an [`Error::IndexOutOfRange`] for that entry only. Unknown users
    /// get an empty list.
    pub fn my_tickets(&self, email: &str) -> Vec<Result<&Event, Error>> {
        self.ledger
            .get_user_tickets(email)
            .into_iter()
            .map(|index| self.catalog.get(i64::from(index)))
            .collect()
    }
}
