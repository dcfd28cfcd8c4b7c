//! In-memory repository backed by a `watch` channel.
//!
//! Every mutation replaces the whole store and wakes all open queries, which
//! then re-run their filter against the new snapshot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_stream::stream;
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::model::{Feed, Post};

use super::error::RepositoryError;
use super::fixture::Fixture;
use super::RssRepository;

#[derive(Debug, Clone, Default)]
struct Store {
    feeds: Vec<Feed>,
    posts: Vec<Post>,
}

impl Store {
    fn posts_for(&self, selected_feed_link: Option<&str>) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .filter(|p| selected_feed_link.map_or(true, |link| p.belongs_to(link)))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        posts
    }
}

/// Repository that keeps feeds and posts in memory.
///
/// Cheap to clone; clones share the same store.
#[derive(Clone)]
pub struct InMemoryRepository {
    store: Arc<watch::Sender<Store>>,
    refresh_latency: Arc<Mutex<Duration>>,
    pending_failure: Arc<Mutex<Option<RepositoryError>>>,
    refresh_count: Arc<AtomicU64>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        let (store, _) = watch::channel(Store::default());
        Self {
            store: Arc::new(store),
            refresh_latency: Arc::new(Mutex::new(Duration::ZERO)),
            pending_failure: Arc::new(Mutex::new(None)),
            refresh_count: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn from_fixture(fixture: Fixture) -> Self {
        let repo = Self::new();
        repo.store.send_modify(|store| {
            store.feeds = fixture.feeds;
            store.posts = fixture.posts;
        });
        repo
    }

    /// Add a feed, replacing any feed with the same link.
    pub fn add_feed(&self, feed: Feed) {
        tracing::debug!(feed = %feed.link, "Adding feed");
        self.store.send_modify(|store| {
            store.feeds.retain(|f| !f.same_feed(&feed));
            store.feeds.push(feed);
        });
    }

    /// Remove a feed and every post that belongs to it.
    pub fn remove_feed(&self, link: &str) {
        tracing::debug!(feed = %link, "Removing feed");
        self.store.send_modify(|store| {
            store.feeds.retain(|f| f.link != link);
            store.posts.retain(|p| !p.belongs_to(link));
        });
    }

    /// Insert posts, replacing existing posts with the same link.
    pub fn add_posts(&self, posts: impl IntoIterator<Item = Post>) {
        self.store.send_modify(|store| {
            for post in posts {
                store.posts.retain(|p| p.link != post.link);
                store.posts.push(post);
            }
        });
    }

    /// Simulated duration of [`RssRepository::update_feeds`].
    pub fn set_refresh_latency(&self, latency: Duration) {
        *self.refresh_latency.lock() = latency;
    }

    /// Make the next refresh fail with `error`.
    pub fn fail_next_refresh(&self, error: RepositoryError) {
        *self.pending_failure.lock() = Some(error);
    }

    /// Number of refreshes that completed successfully.
    pub fn refresh_count(&self) -> u64 {
        self.refresh_count.load(Ordering::SeqCst)
    }

    fn query<T, F>(&self, project: F) -> BoxStream<'static, T>
    where
        T: Send + 'static,
        F: Fn(&Store) -> T + Send + 'static,
    {
        let mut rx = self.store.subscribe();
        stream! {
            loop {
                let value = project(&rx.borrow_and_update());
                yield value;
                if rx.changed().await.is_err() {
                    break;
                }
            }
        }
        .boxed()
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RssRepository for InMemoryRepository {
    fn posts(&self, selected_feed_link: Option<String>) -> BoxStream<'static, Vec<Post>> {
        self.query(move |store| store.posts_for(selected_feed_link.as_deref()))
    }

    fn all_feeds(&self) -> BoxStream<'static, Vec<Feed>> {
        self.query(|store| store.feeds.clone())
    }

    async fn update_feeds(&self) -> Result<(), RepositoryError> {
        let latency = *self.refresh_latency.lock();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if let Some(error) = self.pending_failure.lock().take() {
            return Err(error);
        }

        self.refresh_count.fetch_add(1, Ordering::SeqCst);
        // Wake open queries the way a real refresh touching every row would.
        self.store.send_modify(|_| {});
        Ok(())
    }
}
