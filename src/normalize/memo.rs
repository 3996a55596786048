/// Marker the ledger uses for "no message".
pub const EMPTY_MEMO_MARKER: &str = "[]";

/// Decode a hex-encoded transaction memo into readable text.
///
/// Absent input and the `"[]"` marker pass through untouched. A string made
/// only of hex digits is decoded pair by pair, each byte mapped to the
/// character with the same code point; a trailing lone digit is a byte of
/// its own. Anything else comes back unchanged.
pub fn decode_memo(memo: Option<&str>) -> Option<String> {
    let memo = memo?;
    if memo.is_empty() || memo == EMPTY_MEMO_MARKER {
        return Some(memo.to_string());
    }
    if !memo.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Some(memo.to_string());
    }

    let paired = memo.len() - memo.len() % 2;
    let mut bytes = match hex::decode(&memo[..paired]) {
        Ok(bytes) => bytes,
        Err(_) => return Some(memo.to_string()),
    };
    if let Some(nibble) = memo[paired..].chars().next().and_then(|c| c.to_digit(16)) {
        bytes.push(nibble as u8);
    }
    Some(bytes.into_iter().map(char::from).collect())
}

/// True when a decoded memo carries something worth showing.
pub fn has_content(decoded: Option<&str>) -> bool {
    matches!(decoded, Some(text) if !text.is_empty() && text != EMPTY_MEMO_MARKER)
}
