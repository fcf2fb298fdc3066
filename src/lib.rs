//! boxoffice: an event catalog with a flat-file ticket ledger and purchase audit log.

pub mod audit;
pub mod catalog;
pub mod cli;
pub mod codec;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod service;
pub mod session;
pub mod types;

pub use audit::PurchaseAuditLog;
pub use catalog::{Catalog, EventCatalog, default_catalog};
pub use error::Error;
pub use ledger::{AccountStatus, TicketLedger};
pub use service::BoxOffice;
pub use session::ClientSession;
pub use types::{Event, EventDetails, EventKind};
