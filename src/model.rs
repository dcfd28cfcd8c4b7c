//! Records owned by the repository and shown on the home screen.
//!
//! The view model only ever holds snapshots of these; the repository stays
//! the source of truth.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A subscribed feed. Identity is the feed `link`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub homepage_link: String,
    /// Unique feed URL.
    pub link: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Feed {
    /// Whether `other` refers to the same feed, regardless of metadata drift.
    pub fn same_feed(&self, other: &Feed) -> bool {
        self.link == other.link
    }
}

/// A post together with the metadata of the feed it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub date: DateTime<Utc>,
    pub link: String,
    #[serde(default)]
    pub feed_name: String,
    #[serde(default)]
    pub feed_icon: String,
    /// Link of the origin feed.
    pub feed_link: String,
}

impl Post {
    pub fn belongs_to(&self, feed_link: &str) -> bool {
        self.feed_link == feed_link
    }
}
