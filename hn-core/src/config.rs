use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::{redirect, ClientBuilder};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::client::{FeedKind, HnClient, DEFAULT_BASE_URL};
use crate::error::{ConfigError, FetchError};
use crate::loader::{FeedOptions, DEFAULT_LIMIT};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedConfig {
    pub limit: NonZeroUsize,
    pub auto_refresh: bool,
    pub refresh_interval_seconds: u64,
    pub kind: FeedKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    pub base_url: String,
    pub request_timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            auto_refresh: false,
            refresh_interval_seconds: 300,
            kind: FeedKind::Top,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            request_timeout_seconds: 10,
            user_agent: concat!("hn-feed/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl AppConfig {
    /// `<config dir>/hn-feed/config.json`, creating the directory if needed.
    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        let app_config_dir = config_dir.join("hn-feed");
        std::fs::create_dir_all(&app_config_dir)?;
        Ok(app_config_dir.join("config.json"))
    }

    /// Loads the user's configuration, falling back to (and writing out)
    /// the defaults when it is missing or unreadable.
    pub fn load() -> Self {
        let loaded = Self::config_file_path().and_then(|path| Self::load_from(&path));
        match loaded {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "could not load configuration, using defaults");
                let default_config = Self::default();
                if let Err(save_err) = default_config.save() {
                    warn!(error = %save_err, "could not save default configuration");
                }
                default_config
            }
        }
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config_content = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_file_path()?;
        self.save_to(config_path)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let config_json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, config_json)?;
        Ok(())
    }

    pub fn feed_options(&self) -> FeedOptions {
        FeedOptions {
            limit: self.feed.limit,
            auto_refresh: self.feed.auto_refresh,
            // A zero interval would make the ticker panic.
            refresh_interval: Duration::from_secs(self.feed.refresh_interval_seconds.max(1)),
            feed: self.feed.kind,
        }
    }

    pub fn build_client(&self) -> Result<HnClient, ConfigError> {
        let http = ClientBuilder::new()
            .redirect(redirect::Policy::limited(5))
            .user_agent(self.network.user_agent.as_str())
            .build()
            .map_err(FetchError::from)?;
        let client = HnClient::new(http, &self.network.base_url)?
            .with_request_timeout(Duration::from_secs(
                self.network.request_timeout_seconds.max(1),
            ));
        Ok(client)
    }
}
