use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::client::HnClient;
use crate::loader::{FeedLoader, FeedOptions, FeedState, LoadMode};
use crate::refresh::{spawn_refresher, RefreshHandle};

/// The feed as the presentation layer sees it: a loader plus the refresh
/// timer whose lifetime is bound to this value.
#[derive(Debug)]
pub struct StoryFeed {
    loader: FeedLoader,
    refresher: Option<RefreshHandle>,
    auto_refresh: bool,
}

impl StoryFeed {
    /// Starts the initial load and, if configured, the refresh timer.
    /// Must be called from within a tokio runtime.
    pub fn mount(client: HnClient, options: FeedOptions) -> Self {
        let loader = FeedLoader::new(client, options);
        let initial = loader.clone();
        tokio::spawn(async move { initial.load(LoadMode::Initial).await });

        let mut feed = Self {
            loader,
            refresher: None,
            auto_refresh: false,
        };
        feed.set_auto_refresh(options.auto_refresh);
        feed
    }

    pub fn options(&self) -> FeedOptions {
        self.loader.options()
    }

    pub fn state(&self) -> FeedState {
        self.loader.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.loader.subscribe()
    }

    pub fn auto_refresh(&self) -> bool {
        self.auto_refresh
    }

    /// Background reload; current stories stay visible meanwhile.
    pub fn refresh(&self) -> JoinHandle<()> {
        let loader = self.loader.clone();
        tokio::spawn(async move { loader.refresh().await })
    }

    /// Blanking reload, used after an error.
    pub fn retry(&self) -> JoinHandle<()> {
        let loader = self.loader.clone();
        tokio::spawn(async move { loader.retry().await })
    }

    /// Turning auto refresh on always starts a fresh timer; turning it off
    /// drops the running one.
    pub fn set_auto_refresh(&mut self, enabled: bool) {
        self.auto_refresh = enabled;
        // Dropping the handle cancels the old timer.
        self.refresher = None;
        if enabled {
            self.refresher = Some(spawn_refresher(
                self.loader.clone(),
                self.loader.options().refresh_interval,
            ));
        }
    }

    pub async fn teardown(mut self) {
        if let Some(handle) = self.refresher.take() {
            if let Err(err) = handle.stop().await {
                warn!(error = %err, "refresh task ended abnormally");
            }
        }
    }
}
