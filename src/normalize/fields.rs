//! Ordered field probes over untyped upstream records.
//!
//! Every probe is a fixed list of field names tried in order; the first hit
//! wins and the documented fallback applies when none matches. Keeping the
//! lists as constants makes the precedence itself testable.

use serde_json::{Map, Value};
use tracing::warn;

/// Fields that may carry a textual direction hint, in priority order.
pub const DIRECTION_FIELDS: [&str; 4] = ["direction", "in_out", "side", "type"];

/// Fields that may carry the raw (micro-unit) amount, in priority order.
pub const AMOUNT_FIELDS: [&str; 4] = ["amount_raw", "amount", "value", "amount_oct"];

/// Sender/recipient field pairs, checked pair by pair.
pub const COUNTERPARTY_FIELDS: [(&str, &str); 2] = [("from", "to"), ("from_address", "to_address")];

/// Fields that identify a transaction record. Fallback: the canonical JSON text.
pub const IDENTITY_FIELDS: [&str; 3] = ["hash", "tx_hash", "txid"];

/// Fields that may hold the item array of a page. Fallback: a top-level array.
pub const ITEM_LIST_FIELDS: [&str; 4] = ["items", "transactions", "txs", "data"];

/// Returns the named field as a string slice, if it is a string.
pub fn str_field<'a>(record: &'a Value, name: &str) -> Option<&'a str> {
    record.get(name).and_then(Value::as_str)
}

/// First field in `names` holding a string, empty strings included.
pub fn first_string<'a>(record: &'a Value, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| str_field(record, name))
}

/// First field in `names` that is present and not null.
pub fn first_present<'a>(record: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| record.get(*name))
        .find(|value| !value.is_null())
}

/// Numeric coercion: JSON numbers and numeric strings only.
///
/// Blank strings, booleans, arrays and objects are not numbers here, and
/// non-finite results are rejected.
pub fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Renders a scalar for display. Null is unknown; structured values are
/// serialized as JSON text.
pub fn display(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Displays a named field, or `None` when absent/null.
pub fn display_field(record: &Value, name: &str) -> Option<String> {
    record.get(name).and_then(display)
}

/// Reads a non-negative integer from a number or numeric string.
pub fn as_u64(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let number = as_number(value)?;
    (number >= 0.0 && number.fract() == 0.0 && number <= u64::MAX as f64).then_some(number as u64)
}

/// Derives the de-duplication key of a transaction record.
pub fn identity_key(record: &Value) -> String {
    for name in IDENTITY_FIELDS {
        match record.get(name) {
            Some(Value::String(s)) if !s.is_empty() => return s.clone(),
            Some(Value::Number(n)) => return n.to_string(),
            _ => continue,
        }
    }
    // serde_json keeps object keys sorted, so this text is stable per record
    format!("record:{}", record)
}

/// Pulls the item array out of a page response.
pub fn extract_items(page: Value) -> Vec<Value> {
    match page {
        Value::Array(items) => items,
        Value::Object(mut object) => ITEM_LIST_FIELDS
            .iter()
            .find_map(|name| match object.remove(*name) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Parses the embedded `data` payload of a transaction.
///
/// The payload is either an object or a string holding JSON. Anything that
/// does not yield an object is replaced by an empty object.
pub fn embedded_object(payload: Option<&Value>) -> Map<String, Value> {
    match payload {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(object)) => object.clone(),
        Some(Value::String(text)) if text.is_empty() => Map::new(),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(object)) => object,
            Ok(_) => {
                warn!("Embedded transaction payload is not an object, ignoring it");
                Map::new()
            }
            Err(e) => {
                warn!("Malformed embedded transaction payload: {}", e);
                Map::new()
            }
        },
        Some(_) => {
            warn!("Embedded transaction payload has unexpected type, ignoring it");
            Map::new()
        }
    }
}

/// Loose truthiness for flag-like fields (`true`, `1`, `"yes"`).
pub fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}
