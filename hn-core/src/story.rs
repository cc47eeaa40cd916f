use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::format::{hostname_of, relative_age};

const DISCUSSION_BASE: &str = "https://news.ycombinator.com/item?id=";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoryKind {
    #[default]
    Story,
    Job,
    Poll,
    Comment,
    PollOpt,
    #[serde(other)]
    Other,
}

/// A validated feed item. Only ever built from a [`RawItem`] that passed
/// [`Story::try_from`], or by hand in tests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Story {
    pub id: u64,
    pub title: String,
    pub url: Option<String>,
    pub text: Option<String>,
    pub by: String,
    pub time: i64,
    pub score: i64,
    pub descendants: u64,
    #[serde(rename = "type")]
    pub kind: StoryKind,
}

/// The item record exactly as the API returns it; nothing is trusted yet.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawItem {
    pub id: u64,
    pub title: Option<String>,
    pub url: Option<String>,
    pub text: Option<String>,
    pub by: Option<String>,
    pub time: Option<i64>,
    pub score: Option<i64>,
    pub descendants: Option<u64>,
    #[serde(rename = "type")]
    pub kind: Option<StoryKind>,
    pub deleted: Option<bool>,
    pub dead: Option<bool>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RejectReason {
    #[error("item {0} is deleted")]
    Deleted(u64),
    #[error("item {0} is dead")]
    Dead(u64),
    #[error("item id is zero")]
    ZeroId,
    #[error("item {0} has no title")]
    MissingTitle(u64),
    #[error("item {0} has no timestamp")]
    MissingTime(u64),
    #[error("item {id} is a {kind:?}, not a feed entry")]
    NotFeedEntry { id: u64, kind: StoryKind },
}

impl TryFrom<RawItem> for Story {
    type Error = RejectReason;

    fn try_from(raw: RawItem) -> Result<Self, Self::Error> {
        let id = raw.id;
        if id == 0 {
            return Err(RejectReason::ZeroId);
        }
        if raw.deleted.unwrap_or(false) {
            return Err(RejectReason::Deleted(id));
        }
        if raw.dead.unwrap_or(false) {
            return Err(RejectReason::Dead(id));
        }

        let kind = raw.kind.unwrap_or_default();
        if matches!(kind, StoryKind::Comment | StoryKind::PollOpt) {
            return Err(RejectReason::NotFeedEntry { id, kind });
        }

        let title = raw
            .title
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .ok_or(RejectReason::MissingTitle(id))?;
        let time = raw.time.ok_or(RejectReason::MissingTime(id))?;

        // Empty strings from the API mean "no link" just like a missing field.
        let url = raw.url.filter(|u| !u.trim().is_empty());
        let text = raw.text.filter(|t| !t.is_empty());

        Ok(Self {
            id,
            title,
            url,
            text,
            by: raw.by.unwrap_or_default(),
            time,
            score: raw.score.unwrap_or(0),
            descendants: raw.descendants.unwrap_or(0),
            kind,
        })
    }
}

impl Story {
    pub fn hostname(&self) -> String {
        hostname_of(self.url.as_deref())
    }

    pub fn age(&self) -> String {
        relative_age(self.time)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.time, 0)
    }

    pub fn discussion_url(&self) -> String {
        format!("{DISCUSSION_BASE}{}", self.id)
    }

    /// External link when there is one, otherwise the discussion page.
    pub fn link(&self) -> String {
        self.url.clone().unwrap_or_else(|| self.discussion_url())
    }
}
