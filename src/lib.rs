pub mod api;
pub mod blockchain;
pub mod config;
pub mod models;
pub mod normalize;
pub mod service;
pub mod state;
pub mod validation;

#[cfg(test)]
pub mod tests;

// Re-export specific items for convenience
pub use api::error::ApiError;
pub use api::response::ApiResponse;
pub use api::route::create_router;
pub use blockchain::{start_epoch_polling, ClientError, MainClient, ScanClient};
pub use validation::{classify_query, SearchTarget};
