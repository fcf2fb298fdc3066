//! The signed-in user's in-memory purchase history.

use crate::audit::PurchaseAuditLog;
use crate::error::Error;
use crate::types::Event;

/// A signed-in user and the events they bought during this run.
///
/// History starts empty on every sign-in, even for returning users; tickets
/// from earlier runs are read from the ledger instead. Each entry is an owned
/// copy, so later changes to the catalog cannot affect it.
#[derive(Debug, Clone)]
pub struct ClientSession {
    email: String,
    history: Vec<Event>,
    audit_log: PurchaseAuditLog,
}

impl ClientSession {
    /// Start a session with an empty history.
    pub fn new(email: impl Into<String>, audit_log: PurchaseAuditLog) -> Self {
        Self {
            email: email.into(),
            history: Vec::new(),
            audit_log,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn history(&self) -> &[Event] {
        &self.history
    }

    /// Record a purchased event and append the updated history to the audit log.
    ///
    /// The copy stays in the history even when the audit write fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if the audit log cannot be appended to.
    pub fn buy_ticket(&mut self, event: &Event) -> Result<(), Error> {
        self.history.push(event.clone());
        self.audit_log
            .append(&self.email, self.history.iter().map(Event::name))
    }

    /// Email header followed by one block per purchased event.
    pub fn render(&self) -> String {
        let mut out = format!("User: {}\nPurchased tickets:\n", self.email);
        for event in &self.history {
            out.push_str(&event.to_string());
            out.push('\n');
        }
        out
    }
}
