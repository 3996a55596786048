//! View assembly: fetch what a view needs, normalize it, build the model.
//!
//! Failures of a view's primary record are returned as errors. Enrichment
//! (the balance overlay) degrades to the indexer's value instead.

use crate::api::ApiError;
use crate::blockchain::models::{AddressRecord, EpochRecord, TransactionRecord};
use crate::models::{AddressView, EpochView, FeedView, SearchResult, StatusView, TxView};
use crate::state::AppState;
use crate::validation::{classify_query, validate_address, validate_epoch, validate_tx_hash};
use tracing::{info, warn};

pub fn search(query: &str) -> Result<SearchResult, ApiError> {
    let target = classify_query(query)?;
    info!("Search {:?} resolved to {}", query.trim(), target.route());
    Ok(target.into())
}

pub fn status(state: &AppState) -> StatusView {
    StatusView {
        latest_epoch: state.epoch_indicator.latest(),
    }
}

pub async fn tx_view(state: &AppState, hash: &str) -> Result<TxView, ApiError> {
    validate_tx_hash(hash)?;
    info!("Loading transaction {}", hash);

    let raw = state.main.get_transaction(hash).await?;
    let record = TransactionRecord::from_value(raw);
    Ok(TxView::from_record(&record, hash))
}

pub async fn address_view(state: &AppState, address: &str) -> Result<AddressView, ApiError> {
    validate_address(address)?;
    info!("Loading address {}", address);

    let (record, balance, recent) = tokio::join!(
        state.scan.get_address(address),
        state.main.get_balance(address),
        state.address_feed.navigate(address.to_string()),
    );

    let record = AddressRecord::from_value(&record?, address);
    let balance = balance.unwrap_or_else(|e| {
        warn!("Balance overlay for {} unavailable: {}", address, e);
        None
    });
    let recent = recent?;

    Ok(AddressView::new(
        record,
        balance,
        FeedView::from_snapshot(&recent, Some(address)),
    ))
}

pub async fn address_more(state: &AppState, address: &str) -> Result<FeedView, ApiError> {
    validate_address(address)?;
    let snapshot = state.address_feed.load_more(&address.to_string()).await?;
    Ok(FeedView::from_snapshot(&snapshot, Some(address)))
}

pub async fn epoch_view(state: &AppState, epoch: &str) -> Result<EpochView, ApiError> {
    let epoch = validate_epoch(epoch)?;
    info!("Loading epoch {}", epoch);

    let (record, feed) = tokio::join!(state.scan.get_epoch(epoch), state.epoch_feed.navigate(epoch));
    let record = EpochRecord::from_value(&record?, epoch);
    let feed = feed?;

    Ok(EpochView {
        epoch: record,
        feed: FeedView::from_snapshot(&feed, None),
    })
}

pub async fn epoch_more(state: &AppState, epoch: &str) -> Result<FeedView, ApiError> {
    let epoch = validate_epoch(epoch)?;
    let snapshot = state.epoch_feed.load_more(&epoch).await?;
    Ok(FeedView::from_snapshot(&snapshot, None))
}
