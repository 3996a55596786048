// View models served by the API.
// Each one is assembled from an upstream record after normalization, so the
// front-end only ever sees display-ready values.

use crate::blockchain::models::{AddressRecord, EpochRecord, OperationKind, TransactionRecord};
use crate::blockchain::pagination::{FeedSnapshot, FeedState};
use crate::normalize::fields::{display_field, identity_key, str_field};
use crate::normalize::memo::has_content;
use crate::normalize::{classify, decode_memo, display_amount, Direction};
use crate::validation::SearchTarget;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub target: SearchTarget,
    pub route: String,
}

impl From<SearchTarget> for SearchResult {
    fn from(target: SearchTarget) -> Self {
        let route = target.route();
        Self { target, route }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusView {
    pub latest_epoch: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct MemoView {
    /// Message exactly as stored on the ledger.
    pub raw: Option<String>,
    /// Decoded text, `None` when there is nothing to show.
    pub decoded: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PayloadView {
    pub public_key: Option<String>,
    pub signature: Option<String>,
    pub encrypted_data: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TxView {
    pub hash: String,
    pub operation: OperationKind,
    pub label: &'static str,
    pub status: Option<String>,
    pub epoch: Option<u64>,
    pub timestamp: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub self_transfer: bool,
    pub amount: Option<String>,
    pub amount_raw: Option<String>,
    pub nonce: Option<String>,
    pub fee: Option<String>,
    pub memo: MemoView,
    pub payload: PayloadView,
}

impl TxView {
    pub fn from_record(record: &TransactionRecord, requested_hash: &str) -> Self {
        let raw_memo = record.memo().map(str::to_string);
        let decoded = decode_memo(raw_memo.as_deref()).filter(|text| has_content(Some(text.as_str())));

        Self {
            hash: record.hash().unwrap_or_else(|| requested_hash.to_string()),
            operation: record.operation(),
            label: record.operation().label(),
            status: record.field("status"),
            epoch: record.epoch(),
            timestamp: record.timestamp(),
            from: record.field("from"),
            to: record.field("to"),
            self_transfer: record.is_self_transfer(),
            amount: record.field("amount"),
            amount_raw: record.field("amount_raw"),
            nonce: record.field("nonce"),
            fee: record.fee(),
            memo: MemoView { raw: raw_memo, decoded },
            payload: PayloadView {
                public_key: record.payload_field("public_key"),
                signature: record.payload_field("signature"),
                encrypted_data: record.payload_field("encrypted_data"),
            },
        }
    }
}

/// One line of a transaction list.
#[derive(Debug, Serialize)]
pub struct TxRow {
    pub id: String,
    pub hash: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub amount: String,
    /// Only meaningful when the list belongs to an address.
    pub direction: Option<Direction>,
}

impl TxRow {
    pub fn from_value(tx: &Value, viewed_address: Option<&str>) -> Self {
        let hash = str_field(tx, "hash")
            .or_else(|| str_field(tx, "tx_hash"))
            .filter(|hash| !hash.is_empty())
            .map(str::to_string);

        Self {
            id: identity_key(tx),
            hash,
            from: display_field(tx, "from").or_else(|| display_field(tx, "from_address")),
            to: display_field(tx, "to").or_else(|| display_field(tx, "to_address")),
            amount: display_amount(tx),
            direction: viewed_address.map(|address| classify(tx, address)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeedView {
    pub status: FeedState,
    pub has_more: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub items: Vec<TxRow>,
}

impl FeedView {
    pub fn from_snapshot<K>(snapshot: &FeedSnapshot<K>, viewed_address: Option<&str>) -> Self {
        Self {
            status: snapshot.state.clone(),
            has_more: snapshot.has_more(),
            loading: snapshot.is_loading(),
            error: snapshot.error().map(str::to_string),
            items: snapshot
                .items
                .iter()
                .map(|tx| TxRow::from_value(tx, viewed_address))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddressView {
    pub address: String,
    /// Main API balance when available, otherwise the indexer's.
    pub balance: Option<String>,
    pub nonce: Option<String>,
    pub transactions: Option<String>,
    pub has_public_key: bool,
    pub recent: FeedView,
}

impl AddressView {
    pub fn new(record: AddressRecord, balance_overlay: Option<String>, recent: FeedView) -> Self {
        Self {
            address: record.address,
            balance: balance_overlay.or(record.balance),
            nonce: record.nonce,
            transactions: record.transactions,
            has_public_key: record.has_public_key,
            recent,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EpochView {
    #[serde(flatten)]
    pub epoch: EpochRecord,
    pub feed: FeedView,
}
