pub mod client;
pub mod models;
pub mod pagination;
pub mod polling;

// Re-exports for convenience
pub use client::{ClientError, MainClient, ScanClient};
pub use pagination::{AddressTransactions, EpochTransactions, Feed, FeedError, FeedSnapshot, FeedState, PaginatedList};
pub use polling::{start_epoch_polling, EpochIndicator};
