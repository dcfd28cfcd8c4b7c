mod common;

use std::time::Duration;

use common::{feed, harness, post, settle, FEED_A};
use rss_home::lifecycle::LifecycleState;
use rss_home::ui::home::{HomeEvent, HomeLoadingState};

#[tokio::test(start_paused = true)]
async fn destroy_signal_stops_all_emissions() {
    let h = harness();
    let mut observer = h.view_model.state();
    let mut effects = h.view_model.effects();
    h.registry.create();
    settle().await;
    let before = h.view_model.current_state();

    h.registry.destroy();
    assert!(h.view_model.is_destroyed());
    assert_eq!(h.registry.state(), LifecycleState::Destroyed);

    h.repository.push_posts(vec![post(FEED_A, 7)]);
    settle().await;

    assert_eq!(h.view_model.current_state(), before);
    assert!(effects.recv().await.is_none());
    // Whatever was unseen before destroy may still be read once, then the
    // subscription ends.
    while observer.changed().await.is_some() {}
    assert_eq!(observer.current(), before);
}

#[tokio::test(start_paused = true)]
async fn destroy_cancels_queries_and_refreshes() {
    let h = harness();
    let _observer = h.view_model.state();
    h.repository.set_refresh_delay(Duration::from_secs(10));
    h.registry.create();
    settle().await;

    h.view_model.dispatch(HomeEvent::SwipeToRefresh);
    settle().await;
    assert_eq!(h.repository.live_post_queries(), 1);
    assert!(h.view_model.active_tasks() >= 2);

    h.view_model.destroy();
    settle().await;

    assert_eq!(h.repository.live_post_queries(), 0);
    assert_eq!(h.repository.live_feed_queries(), 0);
    assert_eq!(h.view_model.active_tasks(), 0);

    // The aborted refresh never flips loading back.
    tokio::time::sleep(Duration::from_secs(20)).await;
    assert_eq!(
        h.view_model.current_state().loading_state,
        HomeLoadingState::Loading
    );
}

#[tokio::test(start_paused = true)]
async fn events_after_destroy_are_ignored() {
    let h = harness();
    h.registry.create();
    settle().await;
    h.view_model.destroy();

    let before = h.view_model.current_state();
    let mut effects = h.view_model.effects();

    h.view_model.dispatch(HomeEvent::FeedSelected(feed(FEED_A)));
    h.view_model.dispatch(HomeEvent::PostClicked(post(FEED_A, 1)));
    h.view_model.dispatch(HomeEvent::SwipeToRefresh);
    h.view_model.dispatch(HomeEvent::LoadContent);
    settle().await;

    assert_eq!(h.view_model.current_state(), before);
    assert!(effects.try_recv().is_none());
    assert_eq!(h.repository.refresh_calls(), 0);
    assert_eq!(h.view_model.active_tasks(), 0);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_view_model_tears_it_down() {
    let h = harness();
    h.registry.create();
    settle().await;
    assert_eq!(h.repository.live_post_queries(), 1);

    let common::Harness {
        registry,
        view_model,
        repository,
    } = h;
    drop(view_model);
    settle().await;

    assert_eq!(repository.live_post_queries(), 0);
    assert_eq!(repository.live_feed_queries(), 0);

    // Lifecycle callbacks only hold a weak reference.
    registry.destroy();
}

#[tokio::test(start_paused = true)]
async fn destroy_before_create_never_loads() {
    let h = harness();
    h.registry.destroy();
    h.registry.create();
    settle().await;

    assert!(h.view_model.is_destroyed());
    assert!(h.repository.opened_post_queries().is_empty());
}
