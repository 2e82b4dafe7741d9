//! Sentinel-line protocol the oracle uses to hand back a value.
//!
//! A terminal oracle message ends with:
//!
//! ```text
//! FINAL_NUMBER=<numeric literal>
//! FINAL_UNIT=<unit label>
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::decimal::Decimal;

pub const NUMBER_MARKER: &str = "FINAL_NUMBER=";
pub const UNIT_MARKER: &str = "FINAL_UNIT=";
pub const DEFAULT_UNIT: &str = "unitless";

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)FINAL_NUMBER\s*=\s*([^\n\r]+)").expect("invalid number marker regex")
});
static UNIT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)FINAL_UNIT\s*=\s*([^\n\r]+)").expect("invalid unit marker regex")
});

/// A value/unit pair suggested by the oracle, awaiting confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    pub value: Decimal,
    pub unit: String,
}

/// Pulls the proposal out of free-form oracle text.
///
/// An unparsable `FINAL_NUMBER` discards the whole proposal; a missing
/// `FINAL_UNIT` falls back to [`DEFAULT_UNIT`].
pub fn extract_proposal(text: &str) -> Option<Proposal> {
    let raw_value = NUMBER_RE.captures(text)?.get(1)?.as_str().trim();
    let value = match Decimal::parse(raw_value) {
        Ok(value) => value,
        Err(err) => {
            debug!(raw_value, error = %err, "discarding unparsable proposal");
            return None;
        }
    };

    let unit = UNIT_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| DEFAULT_UNIT.to_string());

    Some(Proposal { value, unit })
}

/// Text with the sentinel lines removed, for showing to the user.
pub fn strip_proposal_lines(text: &str) -> String {
    text.lines()
        .filter(|line| {
            let folded = line.trim().to_uppercase();
            !folded.starts_with(NUMBER_MARKER) && !folded.starts_with(UNIT_MARKER)
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
