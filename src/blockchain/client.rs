use crate::config::Config;
use crate::normalize::{extract_items, fields::display_field};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{what} not found (upstream status {status})")]
    NotFound { what: &'static str, status: StatusCode },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },

    #[error("Invalid upstream base URL: {0}")]
    InvalidBaseUrl(String),
}

/// JSON-over-HTTP access to one upstream API.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    http: Client,
    base_url: Url,
}

impl UpstreamClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|_| ClientError::InvalidBaseUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Build an endpoint URL; each segment is percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET an endpoint and parse its body as JSON.
    ///
    /// Any non-success status is reported as `NotFound` for `what`.
    pub async fn get_json(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
        what: &'static str,
    ) -> Result<Value, ClientError> {
        let url = self.endpoint(segments)?;
        debug!("GET {} {:?}", url, query);

        let response = self.http.get(url.clone()).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!("{} returned {}", url, status);
            return Err(ClientError::NotFound { what, status });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ClientError::InvalidResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Client for the primary ledger API.
#[derive(Clone, Debug)]
pub struct MainClient {
    upstream: UpstreamClient,
}

impl MainClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        info!("Initializing main API client with endpoint: {}", config.main_rpc_url);
        let upstream = UpstreamClient::new(
            &config.main_rpc_url,
            Duration::from_secs(config.rpc_timeout_secs),
        )?;
        Ok(Self { upstream })
    }

    /// Get a transaction by hash
    pub async fn get_transaction(&self, hash: &str) -> Result<Value, ClientError> {
        self.upstream.get_json(&["tx", hash], &[], "Transaction").await
    }

    /// Get the balance of an address, `None` when the response has none
    pub async fn get_balance(&self, address: &str) -> Result<Option<String>, ClientError> {
        let account = self.upstream.get_json(&["address", address], &[], "Balance").await?;
        Ok(display_field(&account, "balance"))
    }
}

/// Client for the scan indexer API.
#[derive(Clone, Debug)]
pub struct ScanClient {
    upstream: UpstreamClient,
}

impl ScanClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        info!("Initializing scan API client with endpoint: {}", config.scan_rpc_url);
        let upstream = UpstreamClient::new(
            &config.scan_rpc_url,
            Duration::from_secs(config.rpc_timeout_secs),
        )?;
        Ok(Self { upstream })
    }

    /// Get address details
    pub async fn get_address(&self, address: &str) -> Result<Value, ClientError> {
        self.upstream.get_json(&["addresses", address], &[], "Address").await
    }

    /// Get one page of an address's recent transactions
    pub async fn get_address_transactions(
        &self,
        address: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Value>, ClientError> {
        let query = [
            ("status", "recent".to_string()),
            ("page", page.to_string()),
            ("page_size", page_size.to_string()),
        ];
        let body = self
            .upstream
            .get_json(&["addresses", address, "transactions"], &query, "Address transactions")
            .await?;
        Ok(extract_items(body))
    }

    /// Get epoch details
    pub async fn get_epoch(&self, epoch: u64) -> Result<Value, ClientError> {
        let epoch = epoch.to_string();
        self.upstream.get_json(&["epochs", &epoch], &[], "Epoch").await
    }

    /// Get network-wide epoch metrics
    pub async fn get_epoch_metrics(&self) -> Result<Value, ClientError> {
        self.upstream.get_json(&["epochs", "metrics"], &[], "Epoch metrics").await
    }

    /// Get one page of the transactions finalized in an epoch
    pub async fn get_epoch_transactions(
        &self,
        epoch: u64,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Value>, ClientError> {
        let epoch = epoch.to_string();
        let query = [("page", page.to_string()), ("page_size", page_size.to_string())];
        let body = self
            .upstream
            .get_json(&["epochs", &epoch, "transactions"], &query, "Epoch transactions")
            .await?;
        Ok(extract_items(body))
    }
}
