// Manual smoke check against the live upstream APIs.
//
// Usage: probe_upstream [address] [tx_hash]

use explorer_service::{
    blockchain::{
        models::{AddressRecord, EpochRecord, TransactionRecord},
        polling::parse_latest_epoch,
        MainClient, ScanClient,
    },
    config::Config,
    models::{TxRow, TxView},
};
use tracing::{error, info, warn, Level};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Starting upstream probe...");

    let config = Config::from_env();
    let main_client = MainClient::new(&config)?;
    let scan_client = ScanClient::new(&config)?;
    let mut args = std::env::args().skip(1);
    let address = args.next();
    let tx_hash = args.next();

    // 1. Epoch metrics
    info!("Testing epoch metrics...");
    let latest = match scan_client.get_epoch_metrics().await {
        Ok(metrics) => {
            let latest = parse_latest_epoch(&metrics);
            info!("✅ Latest epoch: {:?}", latest);
            latest
        }
        Err(e) => {
            error!("❌ Failed to get epoch metrics: {}", e);
            None
        }
    };

    // 2. Latest epoch details and its first page of transactions
    if let Some(epoch) = latest {
        match scan_client.get_epoch(epoch).await {
            Ok(raw) => {
                let record = EpochRecord::from_value(&raw, epoch);
                info!("✅ Epoch {} finalized at {:?}", record.epoch_number, record.finalized_at);
                info!("   Validator: {:?}", record.validator_address);
                info!("   Transactions: {:?}", record.transactions);
            }
            Err(e) => error!("❌ Failed to get epoch {}: {}", epoch, e),
        }

        match scan_client.get_epoch_transactions(epoch, 1, config.tx_page_size).await {
            Ok(items) => info!("✅ Epoch {} page 1 returned {} transactions", epoch, items.len()),
            Err(e) => warn!("Epoch transaction list unavailable: {}", e),
        }
    }

    // 3. Address details, balance and recent transactions
    if let Some(address) = address.as_deref() {
        info!("Testing address {}...", address);
        match scan_client.get_address(address).await {
            Ok(raw) => {
                let record = AddressRecord::from_value(&raw, address);
                info!("✅ Address nonce {:?}, indexer balance {:?}", record.nonce, record.balance);
            }
            Err(e) => error!("❌ Failed to get address: {}", e),
        }

        match main_client.get_balance(address).await {
            Ok(balance) => info!("✅ Balance: {:?}", balance),
            Err(e) => warn!("Balance unavailable: {}", e),
        }

        match scan_client.get_address_transactions(address, 1, config.tx_page_size).await {
            Ok(items) => {
                info!("✅ Retrieved {} recent transactions", items.len());
                for tx in &items {
                    let row = TxRow::from_value(tx, Some(address));
                    info!("   {:?} {} {}", row.direction, row.amount, row.id);
                }
            }
            Err(e) => error!("❌ Failed to get recent transactions: {}", e),
        }
    }

    // 4. Transaction details
    if let Some(hash) = tx_hash.as_deref() {
        info!("Testing transaction {}...", hash);
        match main_client.get_transaction(hash).await {
            Ok(raw) => {
                let view = TxView::from_record(&TransactionRecord::from_value(raw), hash);
                info!("✅ {} in epoch {:?} at {:?}", view.label, view.epoch, view.timestamp);
                info!("   Memo: {:?}", view.memo.decoded);
                info!("   Fee: {:?}", view.fee);
            }
            Err(e) => error!("❌ Failed to get transaction: {}", e),
        }
    }

    info!("Upstream probe finished");
    Ok(())
}
