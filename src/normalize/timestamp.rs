use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::fields::as_number;

/// Values above this are already in milliseconds.
pub const MILLIS_THRESHOLD: f64 = 1e12;

pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Scale a raw epoch value to milliseconds.
pub fn to_millis(raw: f64) -> f64 {
    if raw > MILLIS_THRESHOLD {
        raw
    } else {
        raw * 1000.0
    }
}

/// Format a millisecond instant, or `None` if it is not a calendar date.
pub fn format_millis(millis: f64) -> Option<String> {
    if !millis.is_finite() {
        return None;
    }
    let millis = millis.trunc();
    if millis.abs() > i64::MAX as f64 {
        return None;
    }
    let instant = DateTime::<Utc>::from_timestamp_millis(millis as i64)?;
    Some(instant.format(DISPLAY_FORMAT).to_string())
}

/// Resolve the first usable timestamp out of an ordered candidate list.
///
/// Absent, null and non-numeric candidates are skipped. The first one that
/// lands on a valid calendar instant is formatted; `None` if none does.
pub fn resolve_timestamp(candidates: &[Option<&Value>]) -> Option<String> {
    candidates
        .iter()
        .flatten()
        .filter_map(|value| as_number(value))
        .find_map(|raw| format_millis(to_millis(raw)))
}

/// Timestamp of a transaction record, in priority order: explicit
/// `timestamp`, `parsed_tx.timestamp`, the embedded payload's `timestamp`,
/// then the generic `time` and `date` fields.
pub fn transaction_timestamp(tx: &Value, payload: &Map<String, Value>) -> Option<String> {
    let candidates = [
        tx.get("timestamp"),
        tx.get("parsed_tx").and_then(|parsed| parsed.get("timestamp")),
        payload.get("timestamp"),
        tx.get("time"),
        tx.get("date"),
    ];
    resolve_timestamp(&candidates)
}

/// Format a single instant that may be numeric or RFC 3339 text.
pub fn format_instant(value: &Value) -> Option<String> {
    if let Some(formatted) = resolve_timestamp(&[Some(value)]) {
        return Some(formatted);
    }
    let text = value.as_str()?;
    DateTime::parse_from_rfc3339(text.trim())
        .ok()
        .map(|instant| instant.with_timezone(&Utc).format(DISPLAY_FORMAT).to_string())
}
