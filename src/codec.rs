//! Text codec for the ledger file and the purchase audit log.
//!
//! Pure data transformation: no file I/O and no logging. The ledger format is
//! one line per user:
//!
//! ```text
//! <email>: <idx1>,<idx2>,...,<idxN>
//! ```
//!
//! The audit log format is one line per purchase, naming every event bought so
//! far in the session, with a trailing `", "` after the last name:
//!
//! ```text
//! <email>: <name1>, <name2>,
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::error::Error;

/// Characters trimmed from emails and ticket tokens.
const FIELD_PADDING: [char; 2] = [' ', '\t'];

/// In-memory form of the ledger: email -> ticket indices in purchase order.
pub type LedgerMap = BTreeMap<String, Vec<u32>>;

/// Result of decoding a ledger file.
///
/// Decoding never fails as a whole. Tokens that are not decimal indices are
/// dropped from their user's list, lines that are not UTF-8 are dropped
/// entirely, and both are reported in `malformed`.
#[derive(Debug, Default)]
pub struct DecodedLedger {
    /// Users and the tickets that survived validation.
    pub users: LedgerMap,
    /// One [`Error::MalformedRecord`] per rejected token or undecodable line,
    /// in file order.
    pub malformed: Vec<Error>,
}

/// Returns `true` if `token` is a non-empty run of ASCII decimal digits.
pub fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// Decode the full text of a ledger file.
///
/// Each non-blank line is split on its last `:`. The part before it, trimmed
/// of spaces and tabs, is the email, so an email may itself contain `:`. A
/// line with no `:` names a user with no tickets. The remainder is split on
/// `,`; each token is trimmed, empty tokens are ignored, and a token must be
/// all digits and fit in a `u32` to be kept. When an email appears on several
/// lines the last line wins.
///
/// # Arguments
///
/// * `text` - Whole ledger file contents.
///
/// # Returns
///
/// The decoded users plus a [`Error::MalformedRecord`] for every rejected token.
pub fn decode_ledger(text: &str) -> DecodedLedger {
    decode_ledger_bytes(text.as_bytes())
}

/// Decode raw ledger file bytes, one line at a time.
///
/// Same rules as [`decode_ledger`]. A line that is not valid UTF-8 is skipped
/// as a whole and reported as one [`Error::MalformedRecord`] carrying the
/// line with invalid bytes replaced; every other line still loads.
pub fn decode_ledger_bytes(bytes: &[u8]) -> DecodedLedger {
    let mut decoded = DecodedLedger::default();

    for (idx, raw_line) in bytes.split(|&b| b == b'\n').enumerate() {
        let line = idx + 1;
        let raw_line = raw_line.strip_suffix(b"\r").unwrap_or(raw_line);
        match std::str::from_utf8(raw_line) {
            Ok(text) => decode_line(line, text, &mut decoded),
            Err(_) => decoded.malformed.push(Error::MalformedRecord {
                line,
                token: String::from_utf8_lossy(raw_line).into_owned(),
            }),
        }
    }

    decoded
}

/// Decode one ledger line into `decoded`.
fn decode_line(line: usize, raw_line: &str, decoded: &mut DecodedLedger) {
    if raw_line.trim().is_empty() {
        return;
    }
    let (email, tickets_part) = raw_line.rsplit_once(':').unwrap_or((raw_line, ""));
    let email = email.trim_matches(FIELD_PADDING).to_string();

    let mut tickets = Vec::new();
    for token in tickets_part.split(',') {
        let token = token.trim_matches(FIELD_PADDING);
        if token.is_empty() {
            continue;
        }
        match token.parse::<u32>() {
            Ok(index) if is_numeric(token) => tickets.push(index),
            _ => decoded.malformed.push(Error::MalformedRecord {
                line,
                token: token.to_string(),
            }),
        }
    }

    decoded.users.insert(email, tickets);
}

/// Encode the ledger as file text, one line per user in key order.
pub fn encode_ledger(users: &LedgerMap) -> String {
    let mut out = String::new();
    for (email, tickets) in users {
        let joined = tickets
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{email}: {joined}");
    }
    out
}

/// Encode one audit log line, including the trailing newline.
pub fn encode_audit_line<'a>(email: &str, names: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = format!("{email}: ");
    for name in names {
        out.push_str(name);
        out.push_str(", ");
    }
    out.push('\n');
    out
}
