use crate::normalize::fields::{as_u64, display, display_field, embedded_object, str_field, truthy};
use crate::normalize::{format_instant, transaction_timestamp};
use serde::Serialize;
use serde_json::{Map, Value};

/// Fee units are priced at 10^-6 per unit.
pub const FEE_UNIT_PRICE: f64 = 0.000001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Standard,
    Private,
    Decrypt,
    Encrypt,
    Call,
    Other,
}

impl OperationKind {
    pub fn from_op_type(op_type: Option<&str>) -> Self {
        match op_type {
            Some("standard") => Self::Standard,
            Some("private") => Self::Private,
            Some("decrypt") => Self::Decrypt,
            Some("encrypt") => Self::Encrypt,
            Some("call") => Self::Call,
            _ => Self::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Standard => "Public Transfer",
            Self::Private => "Private Transfer",
            Self::Decrypt => "Balance Decrypt",
            Self::Encrypt => "Balance Encrypt",
            Self::Call => "Contract Call",
            Self::Other => "Transaction",
        }
    }
}

/// A transaction as returned by the main API, with its embedded payload
/// parsed once up front.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    raw: Value,
    payload: Map<String, Value>,
}

impl TransactionRecord {
    pub fn from_value(raw: Value) -> Self {
        let payload = embedded_object(raw.get("data"));
        Self { raw, payload }
    }

    pub fn field(&self, name: &str) -> Option<String> {
        display_field(&self.raw, name)
    }

    pub fn hash(&self) -> Option<String> {
        self.field("tx_hash").or_else(|| self.field("hash"))
    }

    pub fn operation(&self) -> OperationKind {
        OperationKind::from_op_type(str_field(&self.raw, "op_type"))
    }

    pub fn epoch(&self) -> Option<u64> {
        self.raw.get("epoch").and_then(as_u64)
    }

    pub fn timestamp(&self) -> Option<String> {
        transaction_timestamp(&self.raw, &self.payload)
    }

    /// Fee derived from the integer part of `ou`; a missing `ou` counts as zero.
    pub fn fee(&self) -> Option<String> {
        let units = match self.raw.get("ou") {
            None | Some(Value::Null) => 0,
            Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64))?,
            Some(Value::String(s)) if s.is_empty() => 0,
            Some(Value::String(s)) => leading_integer(s)?,
            Some(_) => return None,
        };
        Some(format!("{:.6}", units as f64 * FEE_UNIT_PRICE))
    }

    pub fn memo(&self) -> Option<&str> {
        str_field(&self.raw, "message")
    }

    pub fn is_self_transfer(&self) -> bool {
        match (self.raw.get("from"), self.raw.get("to")) {
            (Some(from), Some(to)) => from == to,
            _ => false,
        }
    }

    /// A payload field for display; non-string values are shown as JSON text.
    pub fn payload_field(&self, name: &str) -> Option<String> {
        self.payload.get(name).and_then(display)
    }
}

/// Parses an optionally signed run of leading digits, ignoring the rest.
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Address details from the scan API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressRecord {
    pub address: String,
    pub balance: Option<String>,
    pub nonce: Option<String>,
    pub transactions: Option<String>,
    pub has_public_key: bool,
}

impl AddressRecord {
    pub fn from_value(raw: &Value, requested: &str) -> Self {
        Self {
            address: str_field(raw, "address")
                .filter(|address| !address.is_empty())
                .unwrap_or(requested)
                .to_string(),
            balance: display_field(raw, "balance_oct"),
            nonce: display_field(raw, "nonce"),
            transactions: display_field(raw, "transactions"),
            has_public_key: truthy(raw.get("has_public_key")),
        }
    }
}

/// Epoch details from the scan API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpochRecord {
    pub epoch_number: u64,
    pub finalized_at: Option<String>,
    pub validator_address: Option<String>,
    pub transactions: Option<u64>,
    pub nodes: Option<String>,
    pub tree_hash: Option<String>,
}

impl EpochRecord {
    pub fn from_value(raw: &Value, requested: u64) -> Self {
        // Some deployments return the transaction list, others only the count
        let transactions = match raw.get("transactions") {
            Some(Value::Array(list)) => Some(list.len() as u64),
            Some(other) => as_u64(other),
            None => None,
        };

        Self {
            epoch_number: raw.get("epoch_number").and_then(as_u64).unwrap_or(requested),
            finalized_at: raw.get("finalized_at").and_then(format_instant),
            validator_address: display_field(raw, "validator_address"),
            transactions,
            nodes: display_field(raw, "nodes"),
            tree_hash: display_field(raw, "tree_hash"),
        }
    }
}
