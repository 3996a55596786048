//! Fake upstream APIs served in-process, plus helpers to run the service
//! against them.

use crate::{
    api::create_router,
    blockchain::{start_epoch_polling, MainClient, ScanClient},
    config::Config,
    state::AppState,
};
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub const PAGE_SIZE: u32 = 10;
pub const LATEST_EPOCH: u64 = 777;
pub const OTHER_PARTY: &str = "octOtherPartyAddressUsedAsCounterpartyInTests";

/// Address with a full history: a full first page, a short second page.
pub fn address() -> String {
    format!("oct{}", "A".repeat(41))
}

/// Address whose balance lookup on the main API fails.
pub fn unbalanced_address() -> String {
    format!("oct{}", "B".repeat(41))
}

pub fn known_tx() -> String {
    "ab".repeat(32)
}

pub fn test_config(main_url: &str, scan_url: &str) -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        main_rpc_url: main_url.to_string(),
        scan_rpc_url: scan_url.to_string(),
        rpc_timeout_secs: 5,
        epoch_poll_interval: Duration::from_millis(50),
        tx_page_size: PAGE_SIZE,
    }
}

/// Serve a router on an ephemeral local port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    format!("http://{}", addr)
}

pub fn sample_transaction(hash: &str) -> Value {
    let payload = json!({
        "public_key": "pk-base64",
        "signature": "sig-base64",
        "encrypted_data": { "blob": "00ff", "cipher": "aes" },
    });
    json!({
        "tx_hash": hash,
        "op_type": "private",
        "status": "confirmed",
        "epoch": 42,
        "from": address(),
        "to": address(),
        "amount": "1.5",
        "amount_raw": "1500000",
        "nonce": 7,
        "ou": "1000",
        "message": "48656c6c6f",
        "timestamp": 1_700_000_000u64,
        "data": payload.to_string(),
    })
}

/// Transactions of `address` numbered `range`; odd ones are sent, even ones received.
pub fn history(address: &str, range: std::ops::RangeInclusive<u32>) -> Vec<Value> {
    range
        .map(|i| {
            if i % 2 == 1 {
                json!({ "hash": format!("tx-{}", i), "from": address, "to": OTHER_PARTY, "amount_raw": "2000000" })
            } else {
                json!({ "hash": format!("tx-{}", i), "from": OTHER_PARTY, "to": address, "amount_raw": "1000000" })
            }
        })
        .collect()
}

#[derive(Deserialize)]
struct PageParams {
    page: u32,
    page_size: u32,
}

async fn main_tx(Path(hash): Path<String>) -> Response {
    if hash == known_tx() {
        Json(sample_transaction(&hash)).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn main_balance(Path(address): Path<String>) -> Response {
    if address == unbalanced_address() {
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    } else {
        Json(json!({ "address": address, "balance": "1500000" })).into_response()
    }
}

async fn scan_address(Path(address): Path<String>) -> Json<Value> {
    Json(json!({
        "address": address,
        "balance_oct": "99",
        "nonce": 3,
        "transactions": 16,
        "has_public_key": true,
    }))
}

async fn scan_address_transactions(
    Path(address): Path<String>,
    Query(params): Query<PageParams>,
) -> Json<Value> {
    let items = match params.page {
        1 => history(&address, 1..=params.page_size),
        // Repeats the last item of page 1, then six new ones
        2 => history(&address, params.page_size..=params.page_size + 6),
        _ => Vec::new(),
    };
    Json(json!({ "items": items }))
}

async fn scan_epoch(Path(epoch): Path<u64>) -> Json<Value> {
    Json(json!({
        "epoch_number": epoch,
        "finalized_at": "2024-01-02T03:04:05Z",
        "validator_address": "octValidator",
        "transactions": [{ "hash": "e-1" }, { "hash": "e-2" }, { "hash": "e-3" }],
        "nodes": 12,
        "tree_hash": "deadbeef",
    }))
}

async fn scan_epoch_transactions(Path(_epoch): Path<u64>, Query(params): Query<PageParams>) -> Json<Value> {
    let items: Vec<Value> = match params.page {
        1 => (1..=3).map(|i| json!({ "hash": format!("e-{}", i), "amount": "5000000" })).collect(),
        _ => Vec::new(),
    };
    Json(json!({ "items": items }))
}

async fn scan_metrics() -> Json<Value> {
    Json(json!({ "latest_epoch": LATEST_EPOCH }))
}

pub fn fake_main() -> Router {
    Router::new()
        .route("/tx/{hash}", get(main_tx))
        .route("/address/{address}", get(main_balance))
}

pub fn fake_scan() -> Router {
    Router::new()
        .route("/addresses/{address}", get(scan_address))
        .route("/addresses/{address}/transactions", get(scan_address_transactions))
        .route("/epochs/metrics", get(scan_metrics))
        .route("/epochs/{epoch}", get(scan_epoch))
        .route("/epochs/{epoch}/transactions", get(scan_epoch_transactions))
}

/// Upstreams that fail every request.
pub fn broken_upstream() -> Router {
    Router::new().fallback(|| async { StatusCode::SERVICE_UNAVAILABLE })
}

pub struct Upstreams {
    pub main_url: String,
    pub scan_url: String,
}

pub async fn spawn_upstreams() -> Upstreams {
    Upstreams {
        main_url: serve(fake_main()).await,
        scan_url: serve(fake_scan()).await,
    }
}

pub struct TestApp {
    pub url: String,
    pub state: Arc<AppState>,
    pub shutdown: CancellationToken,
    pub poller: JoinHandle<()>,
}

/// Run the whole service against the given upstreams.
pub async fn spawn_app(upstreams: &Upstreams) -> TestApp {
    let config = test_config(&upstreams.main_url, &upstreams.scan_url);
    let main = MainClient::new(&config).expect("main client");
    let scan = ScanClient::new(&config).expect("scan client");

    let shutdown = CancellationToken::new();
    let (indicator, poller) = start_epoch_polling(scan.clone(), config.epoch_poll_interval, shutdown.clone());
    let state = Arc::new(AppState::new(config, main, scan, indicator));
    let url = serve(create_router(state.clone())).await;

    TestApp {
        url,
        state,
        shutdown,
        poller,
    }
}
