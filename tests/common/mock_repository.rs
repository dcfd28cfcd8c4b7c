//! Scripted repository for exercising the home view model.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_stream::stream;
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use parking_lot::Mutex;
use rss_home::model::{Feed, Post};
use rss_home::repository::{RepositoryError, RssRepository};
use tokio::sync::watch;

#[derive(Debug, Clone, Default)]
struct Data {
    feeds: Vec<Feed>,
    posts: Vec<Post>,
}

/// Decrements a live-query counter when the query stream is dropped.
struct LiveGuard(Arc<AtomicUsize>);

impl LiveGuard {
    fn new(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Repository whose query latency and refresh outcome are set by the test.
pub struct ScriptedRepository {
    data: watch::Sender<Data>,
    post_delays: Mutex<HashMap<Option<String>, Duration>>,
    opened_post_queries: Mutex<Vec<Option<String>>>,
    live_post_queries: Arc<AtomicUsize>,
    live_feed_queries: Arc<AtomicUsize>,
    refresh_delay: Mutex<Duration>,
    refresh_error: Mutex<Option<RepositoryError>>,
    refresh_calls: AtomicUsize,
}

impl ScriptedRepository {
    pub fn new(feeds: Vec<Feed>, posts: Vec<Post>) -> Arc<Self> {
        let (data, _) = watch::channel(Data { feeds, posts });
        Arc::new(Self {
            data,
            post_delays: Mutex::new(HashMap::new()),
            opened_post_queries: Mutex::new(Vec::new()),
            live_post_queries: Arc::new(AtomicUsize::new(0)),
            live_feed_queries: Arc::new(AtomicUsize::new(0)),
            refresh_delay: Mutex::new(Duration::ZERO),
            refresh_error: Mutex::new(None),
            refresh_calls: AtomicUsize::new(0),
        })
    }

    /// Delay every emission of the posts query for `filter`.
    pub fn delay_posts(&self, filter: Option<&str>, delay: Duration) {
        self.post_delays
            .lock()
            .insert(filter.map(str::to_string), delay);
    }

    pub fn set_refresh_delay(&self, delay: Duration) {
        *self.refresh_delay.lock() = delay;
    }

    /// Every subsequent refresh fails with `error`.
    pub fn fail_refresh(&self, error: RepositoryError) {
        *self.refresh_error.lock() = Some(error);
    }

    pub fn push_posts(&self, posts: Vec<Post>) {
        self.data.send_modify(|d| d.posts.extend(posts));
    }

    pub fn push_feed(&self, feed: Feed) {
        self.data.send_modify(|d| d.feeds.push(feed));
    }

    pub fn opened_post_queries(&self) -> Vec<Option<String>> {
        self.opened_post_queries.lock().clone()
    }

    pub fn live_post_queries(&self) -> usize {
        self.live_post_queries.load(Ordering::SeqCst)
    }

    pub fn live_feed_queries(&self) -> usize {
        self.live_feed_queries.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RssRepository for ScriptedRepository {
    fn posts(&self, selected_feed_link: Option<String>) -> BoxStream<'static, Vec<Post>> {
        self.opened_post_queries
            .lock()
            .push(selected_feed_link.clone());
        let delay = self
            .post_delays
            .lock()
            .get(&selected_feed_link)
            .copied()
            .unwrap_or(Duration::ZERO);
        let guard = LiveGuard::new(&self.live_post_queries);
        let mut rx = self.data.subscribe();

        stream! {
            let _guard = guard;
            loop {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                let posts: Vec<Post> = rx
                    .borrow_and_update()
                    .posts
                    .iter()
                    .filter(|p| selected_feed_link.as_deref().map_or(true, |l| p.feed_link == l))
                    .cloned()
                    .collect();
                yield posts;
                if rx.changed().await.is_err() {
                    break;
                }
            }
        }
        .boxed()
    }

    fn all_feeds(&self) -> BoxStream<'static, Vec<Feed>> {
        let guard = LiveGuard::new(&self.live_feed_queries);
        let mut rx = self.data.subscribe();

        stream! {
            let _guard = guard;
            loop {
                let feeds = rx.borrow_and_update().feeds.clone();
                yield feeds;
                if rx.changed().await.is_err() {
                    break;
                }
            }
        }
        .boxed()
    }

    async fn update_feeds(&self) -> Result<(), RepositoryError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.refresh_delay.lock();
        tokio::time::sleep(delay).await;
        match self.refresh_error.lock().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
