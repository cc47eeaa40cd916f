use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::client::{FeedKind, HnClient};
use crate::error::FetchError;
use crate::story::Story;

pub const LOAD_ERROR_MESSAGE: &str = "Failed to load stories. Please try again.";
pub const DEFAULT_LIMIT: NonZeroUsize = match NonZeroUsize::new(30) {
    Some(limit) => limit,
    None => unreachable!(),
};
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedOptions {
    pub limit: NonZeroUsize,
    pub auto_refresh: bool,
    pub refresh_interval: Duration,
    pub feed: FeedKind,
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            auto_refresh: false,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            feed: FeedKind::Top,
        }
    }
}

/// What the presentation layer observes. `error` and `stories` are set
/// independently: a failed refresh keeps the previous stories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedState {
    pub stories: Vec<Story>,
    pub loading: bool,
    pub refreshing: bool,
    pub error: Option<String>,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            stories: Vec::new(),
            loading: true,
            refreshing: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    InitialLoading,
    Content,
    Error,
}

impl FeedState {
    pub fn phase(&self) -> FeedPhase {
        if self.error.is_some() {
            FeedPhase::Error
        } else if self.loading {
            FeedPhase::InitialLoading
        } else {
            FeedPhase::Content
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// First mount or retry: raises `loading`.
    Initial,
    /// Timer or manual refresh: raises `refreshing`, content stays visible.
    Background,
}

/// Runs fetch cycles and publishes their outcome. Cheap to clone; clones
/// share the same state and the same load queue.
#[derive(Debug, Clone)]
pub struct FeedLoader {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    client: HnClient,
    options: FeedOptions,
    state: watch::Sender<FeedState>,
    // Overlapping loads queue here and run one after another.
    cycle: Mutex<()>,
}

impl FeedLoader {
    pub fn new(client: HnClient, options: FeedOptions) -> Self {
        let (state, _) = watch::channel(FeedState::default());
        Self {
            inner: Arc::new(Inner {
                client,
                options,
                state,
                cycle: Mutex::new(()),
            }),
        }
    }

    pub fn options(&self) -> FeedOptions {
        self.inner.options
    }

    pub fn state(&self) -> FeedState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.inner.state.subscribe()
    }

    pub async fn refresh(&self) {
        self.load(LoadMode::Background).await
    }

    pub async fn retry(&self) {
        self.load(LoadMode::Initial).await
    }

    /// One full fetch cycle. Never fails: errors end up in `FeedState::error`
    /// and in the log.
    pub async fn load(&self, mode: LoadMode) {
        let _cycle = self.inner.cycle.lock().await;

        self.inner.state.send_modify(|state| {
            state.error = None;
            match mode {
                LoadMode::Initial => state.loading = true,
                LoadMode::Background => state.refreshing = true,
            }
        });

        let outcome = self.fetch_stories().await;

        self.inner.state.send_modify(|state| {
            match outcome {
                Ok(stories) => {
                    info!(count = stories.len(), ?mode, "stories loaded");
                    state.stories = stories;
                }
                Err(err) => {
                    warn!(error = %err, ?mode, "failed to load stories");
                    state.error = Some(LOAD_ERROR_MESSAGE.to_owned());
                }
            }
            state.loading = false;
            state.refreshing = false;
        });
    }

    async fn fetch_stories(&self) -> Result<Vec<Story>, FetchError> {
        let options = self.inner.options;
        let mut ids = self.inner.client.fetch_index(options.feed).await?;
        ids.truncate(options.limit.get());
        let mut seen = HashSet::with_capacity(ids.len());
        ids.retain(|id| seen.insert(*id));

        let client = &self.inner.client;
        let details = join_all(ids.iter().map(|&id| async move {
            match client.fetch_item(id).await {
                Ok(story) => story,
                Err(err) => {
                    debug!(id, error = %err, "dropping item after failed fetch");
                    None
                }
            }
        }))
        .await;

        Ok(details.into_iter().flatten().collect())
    }
}
