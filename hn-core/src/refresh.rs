use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::error::FetchError;
use crate::loader::FeedLoader;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Owns the periodic refresh task. Stopping or dropping it guarantees no
/// further fetch cycle is started by the timer.
#[derive(Debug)]
pub struct RefreshHandle {
    cancel_tx: broadcast::Sender<()>,
    join: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    pub async fn stop(mut self) -> Result<(), FetchError> {
        let _ = self.cancel_tx.send(());
        match self.join.take() {
            Some(join) => join.await.map_err(FetchError::from),
            None => Ok(()),
        }
    }
}

impl Drop for RefreshHandle {
    // The task finishes a cycle already in flight, then exits without
    // starting another one.
    fn drop(&mut self) {
        if self.join.is_some() {
            let _ = self.cancel_tx.send(());
        }
    }
}

/// Calls [`FeedLoader::refresh`] every `interval`, first one interval after
/// activation. Must be called from within a tokio runtime.
pub fn spawn_refresher(loader: FeedLoader, interval: Duration) -> RefreshHandle {
    // A zero period makes the tokio ticker panic.
    let interval = interval.max(MIN_INTERVAL);
    let (cancel_tx, mut cancel_rx) = broadcast::channel(1);
    let join = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(interval_ms = interval.as_millis() as u64, "auto refresh started");

        loop {
            tokio::select! {
                biased;
                _ = cancel_rx.recv() => {
                    info!("auto refresh stopped");
                    break;
                }
                _ = ticker.tick() => {
                    debug!("auto refresh tick");
                    loader.refresh().await;
                }
            }
        }
    });

    RefreshHandle {
        cancel_tx,
        join: Some(join),
    }
}
