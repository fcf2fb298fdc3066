use std::path::PathBuf;

use anyhow::Context;

use boxoffice::{BoxOffice, PurchaseAuditLog, TicketLedger, cli, default_catalog, metrics};

/// Program configuration parsed from environment variables.
///
/// # Environment Variables
///
/// | Variable              | Required | Default             | Description              |
/// |-----------------------|----------|---------------------|--------------------------|
/// | `BOXOFFICE_LEDGER`    | No       | `users.txt`         | Ticket ledger file       |
/// | `BOXOFFICE_AUDIT_LOG` | No       | `users_tickets.txt` | Purchase audit log file  |
#[derive(Debug, Clone, PartialEq)]
struct Config {
    /// Path to the ledger file, rewritten after every purchase.
    ledger_path: PathBuf,
    /// Path to the append-only purchase audit log.
    audit_log_path: PathBuf,
}

/// Default ledger path when `BOXOFFICE_LEDGER` is not set.
const DEFAULT_LEDGER_PATH: &str = "users.txt";

/// Default audit log path when `BOXOFFICE_AUDIT_LOG` is not set.
const DEFAULT_AUDIT_LOG_PATH: &str = "users_tickets.txt";

/// Read a path variable, falling back to `default` when unset.
fn path_from_env(var: &str, default: &str) -> Result<PathBuf, String> {
    match std::env::var(var) {
        Ok(val) if val.trim().is_empty() => Err(format!("{var} is set but empty")),
        Ok(val) => Ok(PathBuf::from(val)),
        Err(std::env::VarError::NotPresent) => Ok(PathBuf::from(default)),
        Err(std::env::VarError::NotUnicode(_)) => Err(format!("{var} is not valid UTF-8")),
    }
}

impl Config {
    /// Parse configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `Err(String)` naming the variable if `BOXOFFICE_LEDGER` or
    /// `BOXOFFICE_AUDIT_LOG` is set but empty or not valid UTF-8.
    fn from_env() -> Result<Config, String> {
        Ok(Config {
            ledger_path: path_from_env("BOXOFFICE_LEDGER", DEFAULT_LEDGER_PATH)?,
            audit_log_path: path_from_env("BOXOFFICE_AUDIT_LOG", DEFAULT_AUDIT_LOG_PATH)?,
        })
    }
}

/// Initialize the global `tracing` subscriber with an `EnvFilter`.
///
/// Reads `RUST_LOG`, defaulting to `"warn"` so log lines do not interleave
/// with the menu. Logs go to stderr. Uses `try_init()` so repeated calls are
/// a silent no-op.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(1);
        }
    };

    let metrics_handle = metrics::install_recorder()
        .inspect_err(|e| tracing::warn!(error = %e, "metrics disabled"))
        .ok();

    tracing::info!(ledger = %config.ledger_path.display(), "Ledger path");
    tracing::info!(audit_log = %config.audit_log_path.display(), "Audit log path");

    let ledger = TicketLedger::open(&config.ledger_path);
    let audit_log = PurchaseAuditLog::new(&config.audit_log_path);
    let mut office = BoxOffice::new(default_catalog(), ledger, audit_log);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    cli::run(&mut office, &mut stdin.lock(), &mut stdout.lock())
        .context("interactive session failed")?;

    if let Some(handle) = metrics_handle {
        tracing::debug!(snapshot = %handle.render(), "final metrics");
    }
    Ok(())
}
