use serde::Serialize;
use thiserror::Error;

/// Length of a transaction hash.
pub const TX_HASH_LEN: usize = 64;
/// Prefix every account address carries.
pub const ADDRESS_PREFIX: &str = "oct";
/// Addresses are longer than this.
pub const ADDRESS_MIN_LEN: usize = 40;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Empty search query")]
    EmptyQuery,

    #[error("Invalid search query: {0}")]
    InvalidSearchQuery(String),

    #[error("Invalid transaction hash: {0}")]
    InvalidTxHash(String),

    #[error("Invalid address format: {0}")]
    InvalidAddress(String),

    #[error("Invalid epoch number: {0}")]
    InvalidEpoch(String),
}

/// Where a search query leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum SearchTarget {
    Tx(String),
    Address(String),
    /// Any finite number; the epoch view itself only accepts integers.
    Epoch(String),
}

impl SearchTarget {
    /// Front-end route of the view this target opens.
    pub fn route(&self) -> String {
        match self {
            SearchTarget::Tx(hash) => format!("/tx/{}", hash),
            SearchTarget::Address(address) => format!("/address/{}", address),
            SearchTarget::Epoch(epoch) => format!("/epoch/{}", epoch),
        }
    }
}

/// Classify a search query: a 64-character string is a transaction hash, a
/// long `oct`-prefixed string an address, any finite number an epoch.
pub fn classify_query(query: &str) -> Result<SearchTarget, ValidationError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ValidationError::EmptyQuery);
    }

    if query.chars().count() == TX_HASH_LEN {
        Ok(SearchTarget::Tx(query.to_string()))
    } else if is_address(query) {
        Ok(SearchTarget::Address(query.to_string()))
    } else if is_number(query) {
        Ok(SearchTarget::Epoch(query.to_string()))
    } else {
        Err(ValidationError::InvalidSearchQuery(query.to_string()))
    }
}

fn is_number(candidate: &str) -> bool {
    candidate.parse::<f64>().is_ok_and(f64::is_finite)
}

fn is_address(candidate: &str) -> bool {
    candidate.starts_with(ADDRESS_PREFIX) && candidate.chars().count() > ADDRESS_MIN_LEN
}

pub fn validate_tx_hash(hash: &str) -> Result<(), ValidationError> {
    if hash.chars().count() != TX_HASH_LEN {
        return Err(ValidationError::InvalidTxHash(hash.to_string()));
    }
    Ok(())
}

pub fn validate_address(address: &str) -> Result<(), ValidationError> {
    if !is_address(address) {
        return Err(ValidationError::InvalidAddress(address.to_string()));
    }
    Ok(())
}

pub fn validate_epoch(epoch: &str) -> Result<u64, ValidationError> {
    epoch
        .trim()
        .parse::<u64>()
        .map_err(|_| ValidationError::InvalidEpoch(epoch.to_string()))
}
