use crate::blockchain::client::ScanClient;
use crate::normalize::fields::as_u64;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Read side of the current-epoch indicator.
#[derive(Clone, Debug)]
pub struct EpochIndicator {
    receiver: watch::Receiver<Option<u64>>,
}

impl EpochIndicator {
    /// Latest epoch seen by the poller, `None` until the first good poll.
    pub fn latest(&self) -> Option<u64> {
        *self.receiver.borrow()
    }

    /// Wait until the indicator changes. Errors once the poller is gone.
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.receiver.changed().await
    }
}

/// Extract `latest_epoch` from an epoch metrics response. Only non-negative
/// integers count; anything else reads as no value.
pub fn parse_latest_epoch(metrics: &Value) -> Option<u64> {
    metrics.get("latest_epoch").and_then(as_u64)
}

/// Poll once and publish the result. Failures leave the indicator as is.
pub async fn poll_epoch_metrics(scan: &ScanClient, sender: &watch::Sender<Option<u64>>) {
    match scan.get_epoch_metrics().await {
        Ok(metrics) => match parse_latest_epoch(&metrics) {
            Some(epoch) => {
                sender.send_if_modified(|current| {
                    if *current == Some(epoch) {
                        return false;
                    }
                    debug!("Latest epoch is now {}", epoch);
                    *current = Some(epoch);
                    true
                });
            }
            None => warn!("Epoch metrics response has no usable latest_epoch"),
        },
        Err(e) => warn!("Failed to fetch epoch metrics: {}", e),
    }
}

/// Start the periodic epoch metrics poll.
///
/// Polls immediately, then once per `period`, until `shutdown` is cancelled.
pub fn start_epoch_polling(
    scan: ScanClient,
    period: Duration,
    shutdown: CancellationToken,
) -> (EpochIndicator, JoinHandle<()>) {
    let (sender, receiver) = watch::channel(None);

    let handle = tokio::spawn(async move {
        info!("Starting epoch metrics polling every {:?}", period);
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    poll_epoch_metrics(&scan, &sender).await;
                }
                _ = shutdown.cancelled() => {
                    info!("Shutting down epoch metrics polling");
                    break;
                }
            }
        }
    });

    (EpochIndicator { receiver }, handle)
}
