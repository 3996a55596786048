use crate::blockchain::pagination::{AddressTransactions, EpochTransactions, Feed};
use crate::blockchain::{EpochIndicator, MainClient, ScanClient};
use crate::config::Config;

/// Everything a request handler can reach.
///
/// The two feeds are the transient list state of the address and epoch
/// views; navigating to another address or epoch resets them.
pub struct AppState {
    pub config: Config,
    pub main: MainClient,
    pub scan: ScanClient,
    pub epoch_indicator: EpochIndicator,
    pub address_feed: Feed<AddressTransactions>,
    pub epoch_feed: Feed<EpochTransactions>,
}

impl AppState {
    pub fn new(
        config: Config,
        main: MainClient,
        scan: ScanClient,
        epoch_indicator: EpochIndicator,
    ) -> Self {
        let page_size = config.tx_page_size;
        let address_feed = Feed::new(AddressTransactions { scan: scan.clone() }, page_size);
        let epoch_feed = Feed::new(EpochTransactions { scan: scan.clone() }, page_size);

        Self {
            config,
            main,
            scan,
            epoch_indicator,
            address_feed,
            epoch_feed,
        }
    }
}
