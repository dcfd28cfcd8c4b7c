//! JSON fixtures for seeding an [`InMemoryRepository`](super::InMemoryRepository).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Feed, Post};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read fixture '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse fixture '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Post '{post}' references unknown feed '{feed}'")]
    UnknownFeed { post: String, feed: String },
}

/// Feeds and posts loaded from disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub feeds: Vec<Feed>,
    #[serde(default)]
    pub posts: Vec<Post>,
}

impl Fixture {
    /// Read and validate a fixture file.
    pub fn load_from(path: &Path) -> Result<Self, FixtureError> {
        let content = fs::read_to_string(path).map_err(|e| FixtureError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let fixture: Fixture =
            serde_json::from_str(&content).map_err(|e| FixtureError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

        fixture.validate()?;
        Ok(fixture)
    }

    /// Every post must belong to a listed feed.
    pub fn validate(&self) -> Result<(), FixtureError> {
        for post in &self.posts {
            if !self.feeds.iter().any(|f| f.link == post.feed_link) {
                return Err(FixtureError::UnknownFeed {
                    post: post.link.clone(),
                    feed: post.feed_link.clone(),
                });
            }
        }
        Ok(())
    }
}
