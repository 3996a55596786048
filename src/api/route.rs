use crate::{
    api::{error::ApiError, response::ApiResponse},
    models::{AddressView, EpochView, FeedView, SearchResult, StatusView, TxView},
    service,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

// GET /api/search query parameters
#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

// Create router with all routes
pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/search", get(search))
        .route("/api/status", get(status))
        .route("/api/tx/{hash}", get(tx_view))
        .route("/api/address/{address}", get(address_view))
        .route("/api/address/{address}/more", post(address_more))
        .route("/api/epoch/{epoch}", get(epoch_view))
        .route("/api/epoch/{epoch}/more", post(epoch_more))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

// GET /api/search handler
async fn search(Query(params): Query<SearchQuery>) -> Result<ApiResponse<SearchResult>, ApiError> {
    service::search(&params.q).map(ApiResponse::new)
}

// GET /api/status handler
async fn status(State(state): State<Arc<AppState>>) -> ApiResponse<StatusView> {
    ApiResponse::new(service::status(&state))
}

// GET /api/tx/{hash} handler
async fn tx_view(
    State(state): State<Arc<AppState>>,
    Path(hash): Path<String>,
) -> Result<ApiResponse<TxView>, ApiError> {
    service::tx_view(&state, &hash).await.map(ApiResponse::new)
}

// GET /api/address/{address} handler
async fn address_view(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<ApiResponse<AddressView>, ApiError> {
    service::address_view(&state, &address).await.map(ApiResponse::new)
}

// POST /api/address/{address}/more handler
async fn address_more(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<ApiResponse<FeedView>, ApiError> {
    service::address_more(&state, &address).await.map(ApiResponse::new)
}

// GET /api/epoch/{epoch} handler
async fn epoch_view(
    State(state): State<Arc<AppState>>,
    Path(epoch): Path<String>,
) -> Result<ApiResponse<EpochView>, ApiError> {
    service::epoch_view(&state, &epoch).await.map(ApiResponse::new)
}

// POST /api/epoch/{epoch}/more handler
async fn epoch_more(
    State(state): State<Arc<AppState>>,
    Path(epoch): Path<String>,
) -> Result<ApiResponse<FeedView>, ApiError> {
    service::epoch_more(&state, &epoch).await.map(ApiResponse::new)
}
