#[cfg(test)]
mod tests {
    use crate::normalize::{
        classify, decode_memo, display_amount, extract_items, format_amount, format_instant,
        identity_key, resolve_timestamp, transaction_timestamp, Direction,
        fields::{embedded_object, first_string, DIRECTION_FIELDS},
    };
    use chrono::{DateTime, Utc};
    use proptest::prelude::*;
    use serde_json::{json, Map, Value};

    const ME: &str = "octMyAddressUnderViewWithEnoughCharactersToCount";

    fn expected(millis: i64) -> String {
        DateTime::<Utc>::from_timestamp_millis(millis)
            .unwrap()
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
    }

    fn reencode(decoded: &str) -> String {
        decoded.chars().map(|c| format!("{:02x}", c as u32)).collect()
    }

    // ---- memo ----

    #[test]
    fn test_decode_memo_hex_text() {
        assert_eq!(decode_memo(Some("48656c6c6f")).as_deref(), Some("Hello"));
        assert_eq!(decode_memo(Some("48454C4C4F")).as_deref(), Some("HELLO"));
    }

    #[test]
    fn test_decode_memo_passthrough() {
        assert_eq!(decode_memo(None), None);
        assert_eq!(decode_memo(Some("")).as_deref(), Some(""));
        assert_eq!(decode_memo(Some("[]")).as_deref(), Some("[]"));
        assert_eq!(decode_memo(Some("thanks for lunch")).as_deref(), Some("thanks for lunch"));
    }

    #[test]
    fn test_decode_memo_odd_length_keeps_last_digit_as_byte() {
        assert_eq!(decode_memo(Some("48656c6c6f7")).as_deref(), Some("Hello\u{7}"));
        assert_eq!(decode_memo(Some("abc")).as_deref(), Some("\u{ab}\u{c}"));
        assert_eq!(decode_memo(Some("f")).as_deref(), Some("\u{f}"));
    }

    #[test]
    fn test_decode_memo_high_bytes_map_to_code_points() {
        assert_eq!(decode_memo(Some("e9ff")).as_deref(), Some("\u{e9}\u{ff}"));
    }

    proptest! {
        #[test]
        fn prop_hex_memo_round_trips(bytes in proptest::collection::vec(any::<u8>(), 1..64)) {
            let encoded = hex::encode(&bytes);
            let decoded = decode_memo(Some(&encoded)).unwrap();
            prop_assert_eq!(reencode(&decoded), encoded);
        }

        #[test]
        fn prop_non_hex_memo_is_unchanged(
            prefix in "[0-9a-f]{0,8}",
            bad in "[g-zG-Z !#%\\-]",
            suffix in "[0-9a-f]{0,8}",
        ) {
            let memo = format!("{}{}{}", prefix, bad, suffix);
            prop_assert_eq!(decode_memo(Some(&memo)), Some(memo.clone()));
        }

        #[test]
        fn prop_seconds_are_scaled(secs in 0u64..=1_000_000_000_000u64) {
            let value = json!(secs);
            prop_assert_eq!(resolve_timestamp(&[Some(&value)]), Some(expected(secs as i64 * 1000)));
        }

        #[test]
        fn prop_milliseconds_are_kept(millis in 1_000_000_000_001u64..=8_000_000_000_000_000u64) {
            let value = json!(millis);
            prop_assert_eq!(resolve_timestamp(&[Some(&value)]), Some(expected(millis as i64)));
        }
    }

    // ---- timestamps ----

    #[test]
    fn test_resolve_timestamp_scales_seconds_and_keeps_millis() {
        let secs = json!(1_700_000_000u64);
        let millis = json!(1_700_000_000_123u64);
        assert_eq!(resolve_timestamp(&[Some(&secs)]).as_deref(), Some("2023-11-14 22:13:20 UTC"));
        assert_eq!(resolve_timestamp(&[Some(&millis)]).as_deref(), Some("2023-11-14 22:13:20 UTC"));
    }

    #[test]
    fn test_resolve_timestamp_skips_unusable_candidates() {
        let null = Value::Null;
        let word = json!("soon");
        let blank = json!("  ");
        let flag = json!(true);
        let good = json!("1700000000");
        assert_eq!(
            resolve_timestamp(&[None, Some(&null), Some(&word), Some(&blank), Some(&flag), Some(&good)]).as_deref(),
            Some("2023-11-14 22:13:20 UTC")
        );
        assert_eq!(resolve_timestamp(&[None, Some(&word)]), None);
        assert_eq!(resolve_timestamp(&[]), None);
    }

    #[test]
    fn test_transaction_timestamp_priority() {
        let tx = json!({
            "timestamp": null,
            "parsed_tx": { "timestamp": 1_600_000_000u64 },
            "time": 1_700_000_000u64,
        });
        assert_eq!(transaction_timestamp(&tx, &Map::new()), Some(expected(1_600_000_000_000)));

        let mut payload = Map::new();
        payload.insert("timestamp".to_string(), json!(1_650_000_000u64));
        let tx = json!({ "date": 1_700_000_000u64 });
        assert_eq!(transaction_timestamp(&tx, &payload), Some(expected(1_650_000_000_000)));

        assert_eq!(transaction_timestamp(&json!({}), &Map::new()), None);
    }

    #[test]
    fn test_format_instant_accepts_rfc3339() {
        assert_eq!(
            format_instant(&json!("2024-01-02T03:04:05Z")).as_deref(),
            Some("2024-01-02 03:04:05 UTC")
        );
        assert_eq!(format_instant(&json!("yesterday")), None);
    }

    // ---- direction ----

    #[test]
    fn test_direction_field_wins_over_address() {
        let tx = json!({ "direction": "in", "from": ME });
        assert_eq!(classify(&tx, ME), Direction::In);
    }

    #[test]
    fn test_direction_keywords() {
        assert_eq!(classify(&json!({ "in_out": "Received" }), ME), Direction::In);
        assert_eq!(classify(&json!({ "side": "CREDIT" }), ME), Direction::In);
        assert_eq!(classify(&json!({ "side": "debit", "to": ME }), ME), Direction::Out);
        assert_eq!(classify(&json!({ "type": "sent", "to": ME }), ME), Direction::Out);
    }

    #[test]
    fn test_inbound_keywords_match_as_substrings_first() {
        // "sending" contains "in", which is checked before the outbound list
        assert_eq!(classify(&json!({ "type": "sending" }), ME), Direction::In);
    }

    #[test]
    fn test_only_first_string_hint_is_consulted() {
        assert_eq!(first_string(&json!({ "direction": 1, "side": "x" }), &DIRECTION_FIELDS), Some("x"));
        // Empty direction shadows the keyword in `type`
        let tx = json!({ "direction": "", "type": "credit", "from": ME });
        assert_eq!(classify(&tx, ME), Direction::Out);
        let tx = json!({ "direction": 5, "in_out": "incoming" });
        assert_eq!(classify(&tx, ME), Direction::In);
    }

    #[test]
    fn test_direction_from_counterparties() {
        assert_eq!(classify(&json!({ "type": "transfer", "to": ME }), ME), Direction::In);
        assert_eq!(classify(&json!({ "from": ME, "to": ME }), ME), Direction::Out);
        assert_eq!(classify(&json!({ "from_address": "octX", "to_address": ME }), ME), Direction::In);
        assert_eq!(classify(&json!({ "to": "octX", "from_address": ME }), ME), Direction::Out);
    }

    #[test]
    fn test_direction_fallbacks() {
        assert_eq!(classify(&json!({ "amount_raw": "-5000" }), ME), Direction::Out);
        assert_eq!(classify(&json!({ "amount": "5000", "to": "octX" }), ME), Direction::Out);
        assert_eq!(classify(&json!({}), ME), Direction::Out);
        // no viewed address means no counterparty match
        assert_eq!(classify(&json!({ "to": "" }), ""), Direction::Out);
    }

    #[test]
    fn test_display_amount() {
        assert_eq!(display_amount(&json!({ "amount_raw": "1234567890" })), "1,234.56789");
        assert_eq!(display_amount(&json!({ "amount_raw": null, "value": 1_500_000 })), "1.5");
        assert_eq!(display_amount(&json!({ "amount_oct": 1 })), "0.000001");
        assert_eq!(display_amount(&json!({ "amount": "abc" })), "-");
        assert_eq!(display_amount(&json!({})), "-");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(1_000_000.0), "1,000,000");
        assert_eq!(format_amount(-1234.5), "-1,234.5");
        assert_eq!(format_amount(0.0000004), "0");
        assert_eq!(format_amount(123.0), "123");
    }

    // ---- fields ----

    #[test]
    fn test_identity_key_probes() {
        assert_eq!(identity_key(&json!({ "hash": "h1", "tx_hash": "h2" })), "h1");
        assert_eq!(identity_key(&json!({ "hash": "", "tx_hash": "h2" })), "h2");
        assert_eq!(identity_key(&json!({ "txid": 99 })), "99");

        let record = json!({ "from": "a", "to": "b", "nonce": 1 });
        let key = identity_key(&record);
        assert!(key.starts_with("record:"));
        assert_eq!(key, identity_key(&record.clone()));
        assert_ne!(key, identity_key(&json!({ "from": "a", "to": "b", "nonce": 2 })));
    }

    #[test]
    fn test_extract_items() {
        assert_eq!(extract_items(json!({ "items": [1, 2] })), vec![json!(1), json!(2)]);
        assert_eq!(extract_items(json!({ "transactions": [3] })), vec![json!(3)]);
        assert_eq!(extract_items(json!({ "items": null, "data": [4] })), vec![json!(4)]);
        assert_eq!(extract_items(json!([5])), vec![json!(5)]);
        assert!(extract_items(json!({ "total": 10 })).is_empty());
        assert!(extract_items(json!("nope")).is_empty());
    }

    #[test]
    fn test_embedded_object_recovers_from_bad_payloads() {
        let parsed = embedded_object(Some(&json!("{\"signature\":\"s\"}")));
        assert_eq!(parsed.get("signature"), Some(&json!("s")));

        let object = embedded_object(Some(&json!({ "public_key": "pk" })));
        assert_eq!(object.get("public_key"), Some(&json!("pk")));

        assert!(embedded_object(Some(&json!("{not json"))).is_empty());
        assert!(embedded_object(Some(&json!("[1,2]"))).is_empty());
        assert!(embedded_object(Some(&json!(""))).is_empty());
        assert!(embedded_object(Some(&json!(12))).is_empty());
        assert!(embedded_object(None).is_empty());
    }
}
