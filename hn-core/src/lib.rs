pub mod client;
pub mod component;
pub mod config;
pub mod error;
pub mod format;
pub mod loader;
pub mod refresh;
pub mod story;

pub use client::{FeedKind, HnClient, DEFAULT_BASE_URL};
pub use component::StoryFeed;
pub use config::{AppConfig, FeedConfig, NetworkConfig};
pub use error::{ConfigError, FetchError};
pub use format::{hostname_of, relative_age, relative_age_at};
pub use loader::{FeedLoader, FeedOptions, FeedPhase, FeedState, LoadMode, LOAD_ERROR_MESSAGE};
pub use refresh::{spawn_refresher, RefreshHandle};
pub use story::{RawItem, RejectReason, Story, StoryKind};
