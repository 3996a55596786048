//! Normalization of loosely-typed upstream records into display values.
//!
//! Upstream responses have no guaranteed schema, so everything here works on
//! `serde_json::Value` and treats absent or mistyped fields as unknown.

pub mod direction;
pub mod fields;
pub mod memo;
pub mod timestamp;

pub use direction::{classify, display_amount, format_amount, Direction};
pub use fields::{extract_items, identity_key};
pub use memo::decode_memo;
pub use timestamp::{format_instant, resolve_timestamp, transaction_timestamp};
