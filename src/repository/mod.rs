//! Upstream repository contract.
//!
//! The home view model never talks to storage or the network directly.
//! It consumes two live queries and one mutation through [`RssRepository`]:
//!
//! - `posts(filter)`: re-emits whenever matching posts change, must tolerate
//!   being dropped and re-opened rapidly as the filter switches
//! - `all_feeds()`: re-emits whenever the feed list changes
//! - `update_feeds()`: refreshes every feed, resolves on completion

mod error;
mod fixture;
mod memory;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::model::{Feed, Post};

pub use error::RepositoryError;
pub use fixture::{Fixture, FixtureError};
pub use memory::InMemoryRepository;

#[async_trait]
pub trait RssRepository: Send + Sync + 'static {
    /// Live query of posts, newest first. `None` means every feed.
    ///
    /// Dropping the stream cancels the query.
    fn posts(&self, selected_feed_link: Option<String>) -> BoxStream<'static, Vec<Post>>;

    /// Live query of every subscribed feed.
    fn all_feeds(&self) -> BoxStream<'static, Vec<Feed>>;

    /// Refresh all feeds from their sources.
    async fn update_feeds(&self) -> Result<(), RepositoryError>;
}
