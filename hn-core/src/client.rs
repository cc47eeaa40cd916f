use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::FetchError;
use crate::story::{RawItem, Story};

pub const DEFAULT_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Which ranked list the index fetch reads.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    #[default]
    Top,
    New,
    Best,
    Ask,
    Show,
    Job,
}

impl FeedKind {
    pub const ALL: [FeedKind; 6] = [
        FeedKind::Top,
        FeedKind::New,
        FeedKind::Best,
        FeedKind::Ask,
        FeedKind::Show,
        FeedKind::Job,
    ];

    fn endpoint(self) -> &'static str {
        match self {
            FeedKind::Top => "topstories",
            FeedKind::New => "newstories",
            FeedKind::Best => "beststories",
            FeedKind::Ask => "askstories",
            FeedKind::Show => "showstories",
            FeedKind::Job => "jobstories",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FeedKind::Top => "Top",
            FeedKind::New => "New",
            FeedKind::Best => "Best",
            FeedKind::Ask => "Ask HN",
            FeedKind::Show => "Show HN",
            FeedKind::Job => "Jobs",
        }
    }
}

/// Thin wrapper over the read-only Hacker News Firebase API.
#[derive(Debug, Clone)]
pub struct HnClient {
    http: Client,
    base_url: String,
    request_timeout: Duration,
}

impl HnClient {
    pub fn new(http: Client, base_url: &str) -> Result<Self, FetchError> {
        Url::parse(base_url)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Ordered identifiers of the requested list, most relevant first.
    pub async fn fetch_index(&self, kind: FeedKind) -> Result<Vec<u64>, FetchError> {
        let url = format!("{}/{}.json", self.base_url, kind.endpoint());
        self.get_json(&url).await
    }

    /// One item by id. `Ok(None)` covers both a JSON `null` body and a
    /// record that does not validate as a feed entry.
    pub async fn fetch_item(&self, id: u64) -> Result<Option<Story>, FetchError> {
        let url = format!("{}/item/{}.json", self.base_url, id);
        let raw: Option<RawItem> = self.get_json(&url).await?;
        let Some(raw) = raw else {
            debug!(id, "item is null");
            return Ok(None);
        };
        match Story::try_from(raw) {
            Ok(story) if story.id != id => {
                debug!(id, returned = story.id, "item id does not match request");
                Ok(None)
            }
            Ok(story) => Ok(Some(story)),
            Err(reason) => {
                debug!(id, %reason, "item rejected");
                Ok(None)
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self
            .http
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_owned(),
            });
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
