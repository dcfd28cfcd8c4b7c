//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_repository;

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use rss_home::config::HomeConfig;
use rss_home::dispatchers::DispatchersProvider;
use rss_home::lifecycle::LifecycleRegistry;
use rss_home::model::{Feed, Post};
use rss_home::repository::RssRepository;
use rss_home::ui::home::HomeViewModel;

pub use mock_repository::ScriptedRepository;

pub const FEED_A: &str = "https://a.example/feed.xml";
pub const FEED_B: &str = "https://b.example/feed.xml";

pub fn feed(link: &str) -> Feed {
    Feed {
        name: link.to_string(),
        icon: format!("{link}/icon.png"),
        description: String::new(),
        homepage_link: link.to_string(),
        link: link.to_string(),
        created_at: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn post(feed_link: &str, n: u32) -> Post {
    Post {
        title: format!("{feed_link} #{n}"),
        description: String::new(),
        image_url: None,
        date: Utc.with_ymd_and_hms(2023, 1, 1, n % 24, 0, 0).unwrap(),
        link: format!("{feed_link}/posts/{n}"),
        feed_name: feed_link.to_string(),
        feed_icon: String::new(),
        feed_link: feed_link.to_string(),
    }
}

/// Two feeds with two posts each.
pub fn sample_repository() -> Arc<ScriptedRepository> {
    ScriptedRepository::new(
        vec![feed(FEED_A), feed(FEED_B)],
        vec![post(FEED_A, 1), post(FEED_A, 2), post(FEED_B, 3), post(FEED_B, 4)],
    )
}

pub struct Harness {
    pub registry: LifecycleRegistry,
    pub view_model: HomeViewModel,
    pub repository: Arc<ScriptedRepository>,
}

/// View model wired to `repository`, not yet created. Must be called
/// inside a Tokio runtime.
pub fn harness_with(repository: Arc<ScriptedRepository>, config: HomeConfig) -> Harness {
    let registry = LifecycleRegistry::new();
    let view_model = HomeViewModel::new(
        &registry.lifecycle(),
        DispatchersProvider::current(),
        Arc::clone(&repository) as Arc<dyn RssRepository>,
        config,
    );
    Harness {
        registry,
        view_model,
        repository,
    }
}

pub fn harness() -> Harness {
    harness_with(sample_repository(), HomeConfig::default())
}

/// Let spawned tasks run and short timers fire.
pub async fn settle() {
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    tokio::time::sleep(Duration::from_millis(1)).await;
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
}
