//! Transfer direction inference relative to a viewed address.
//!
//! Upstream list endpoints disagree on how they describe direction, so the
//! classifier walks a fixed sequence of heuristics. The order matters:
//! ambiguous records classify differently if the steps are reordered.

use serde::Serialize;
use serde_json::Value;

use super::fields::{as_number, first_present, first_string, str_field, AMOUNT_FIELDS, COUNTERPARTY_FIELDS, DIRECTION_FIELDS};

/// Raw amounts are expressed in micro-units.
pub const AMOUNT_DIVISOR: f64 = 1_000_000.0;

const INBOUND_KEYWORDS: [&str; 4] = ["in", "receive", "incoming", "credit"];
const OUTBOUND_KEYWORDS: [&str; 5] = ["out", "send", "sent", "outgoing", "debit"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }
}

/// Classify a transaction as inbound or outbound for `address`.
///
/// 1. A direction-like field containing an inbound keyword, then an
///    outbound keyword.
/// 2. Sender/recipient equal to the address, for each naming convention.
/// 3. A raw amount string with a leading minus sign.
/// 4. Outbound.
pub fn classify(tx: &Value, address: &str) -> Direction {
    if let Some(direction) = keyword_direction(tx) {
        return direction;
    }
    if let Some(direction) = counterparty_direction(tx, address) {
        return direction;
    }
    if let Some(Value::String(raw)) = first_present(tx, &AMOUNT_FIELDS) {
        if raw.starts_with('-') {
            return Direction::Out;
        }
    }
    Direction::Out
}

fn keyword_direction(tx: &Value) -> Option<Direction> {
    // Only the first string-typed field is consulted, even if it is empty
    let hint = first_string(tx, &DIRECTION_FIELDS)?.to_lowercase();
    if hint.is_empty() {
        return None;
    }
    if INBOUND_KEYWORDS.iter().any(|keyword| hint.contains(keyword)) {
        Some(Direction::In)
    } else if OUTBOUND_KEYWORDS.iter().any(|keyword| hint.contains(keyword)) {
        Some(Direction::Out)
    } else {
        None
    }
}

fn counterparty_direction(tx: &Value, address: &str) -> Option<Direction> {
    if address.is_empty() {
        return None;
    }
    let matches = |field: &str| matches!(str_field(tx, field), Some(value) if !value.is_empty() && value == address);

    for (from, to) in COUNTERPARTY_FIELDS {
        if matches(from) {
            return Some(Direction::Out);
        }
        if matches(to) {
            return Some(Direction::In);
        }
    }
    None
}

/// Display amount of a list row: the raw amount scaled down by 10^6, or
/// `-` when it is missing or not numeric.
pub fn display_amount(tx: &Value) -> String {
    first_present(tx, &AMOUNT_FIELDS)
        .and_then(as_number)
        .map(|raw| format_amount(raw / AMOUNT_DIVISOR))
        .unwrap_or_else(|| "-".to_string())
}

/// Thousands-grouped decimal with at most six fraction digits.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.6}", value.abs());
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    let (integer, fraction) = match trimmed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (trimmed, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let negative = value < 0.0 && trimmed != "0";
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}
