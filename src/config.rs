// Service configuration:
// - Upstream API base URLs (main RPC and scan indexer)
// - Server listening address/port
// - Upstream request timeout
// - Epoch metrics polling interval
// - Transaction list page size

use dotenv::dotenv;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub main_rpc_url: String,
    pub scan_rpc_url: String,
    pub rpc_timeout_secs: u64,
    pub epoch_poll_interval: Duration,
    pub tx_page_size: u32,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);
        let main_rpc_url = env::var("MAIN_RPC_URL")
            .unwrap_or_else(|_| "https://octra.network".to_string());
        let scan_rpc_url = env::var("SCAN_RPC_URL")
            .unwrap_or_else(|_| "https://network.octrascan.com".to_string());
        let rpc_timeout_secs = env::var("RPC_TIMEOUT_SECS")
            .map(|v| v.parse().unwrap_or(30))
            .unwrap_or(30);
        let epoch_poll_interval = env::var("EPOCH_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|secs: &u64| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(60));
        // Page size must be positive
        let tx_page_size = env::var("TX_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|size: &u32| *size > 0)
            .unwrap_or(10);

        Self {
            server_host,
            server_port,
            main_rpc_url: trim_base_url(main_rpc_url),
            scan_rpc_url: trim_base_url(scan_rpc_url),
            rpc_timeout_secs,
            epoch_poll_interval,
            tx_page_size,
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
