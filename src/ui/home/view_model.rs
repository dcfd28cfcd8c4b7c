//! Home screen view model.
//!
//! Owns the home state, turns events into state changes and effects, and
//! keeps the posts and feeds queries attached for as long as it lives.
//!
//! All work is spawned into one [`TaskScope`]; [`HomeViewModel::destroy`]
//! (or the host's destroy signal) closes the state and effect flows first,
//! so nothing is published afterwards, then aborts every task.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Instant;

use futures::future::FutureExt;
use futures::stream::StreamExt;
use parking_lot::Mutex;

use crate::config::{HomeConfig, RefreshPolicy};
use crate::dispatchers::DispatchersProvider;
use crate::flow::{
    share_while, switch_latest, EffectFlow, EffectSubscriber, StateFlow, StateSubscription,
    TaskScope,
};
use crate::lifecycle::Lifecycle;
use crate::model::{Feed, Post};
use crate::repository::RssRepository;
use crate::ui::mvi::Reducer;

use super::effect::HomeEffect;
use super::intent::HomeEvent;
use super::reducer::{HomeMutation, HomeReducer};
use super::state::HomeState;

pub struct HomeViewModel {
    inner: Arc<Inner>,
}

struct Inner {
    repository: Arc<dyn RssRepository>,
    dispatchers: DispatchersProvider,
    config: HomeConfig,
    state: Arc<StateFlow<HomeState>>,
    effects: EffectFlow<HomeEffect>,
    scope: TaskScope,
    content_loaded: AtomicBool,
    refreshes_in_flight: Arc<Mutex<usize>>,
    destroyed: AtomicBool,
}

impl HomeViewModel {
    /// Build the view model and hook it to `lifecycle`.
    ///
    /// `LoadContent` is dispatched once when the lifecycle is created (right
    /// away if it already is); the view model tears itself down when the
    /// lifecycle is destroyed.
    pub fn new(
        lifecycle: &Lifecycle,
        dispatchers: DispatchersProvider,
        repository: Arc<dyn RssRepository>,
        config: HomeConfig,
    ) -> Self {
        let inner = Arc::new(Inner {
            repository,
            scope: TaskScope::new(dispatchers.main.clone()),
            dispatchers,
            effects: EffectFlow::new(config.effects_buffer),
            config,
            state: Arc::new(StateFlow::new(HomeState::DEFAULT)),
            content_loaded: AtomicBool::new(false),
            refreshes_in_flight: Arc::new(Mutex::new(0)),
            destroyed: AtomicBool::new(false),
        });

        let weak = Arc::downgrade(&inner);
        lifecycle.do_on_destroy(move || with_inner(&weak, Inner::destroy));

        let weak = Arc::downgrade(&inner);
        lifecycle.do_on_create(move || {
            with_inner(&weak, |inner| inner.dispatch(HomeEvent::LoadContent))
        });

        Self { inner }
    }

    /// Handle an event. Never blocks; any asynchronous work it starts runs
    /// on its own.
    pub fn dispatch(&self, event: HomeEvent) {
        self.inner.dispatch(event);
    }

    /// Observe the state. Yields the latest value first.
    ///
    /// Holding the subscription keeps the upstream queries running.
    pub fn state(&self) -> StateSubscription<HomeState> {
        self.inner.state.subscribe()
    }

    /// Snapshot of the latest state without registering as an observer.
    pub fn current_state(&self) -> HomeState {
        self.inner.state.value()
    }

    pub fn effects(&self) -> EffectSubscriber<HomeEffect> {
        self.inner.effects.subscribe()
    }

    /// Tear down: stop publishing, cancel every query and refresh.
    ///
    /// The view model cannot be used again afterwards.
    pub fn destroy(&self) {
        self.inner.destroy();
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.load(Ordering::SeqCst)
    }

    /// Tasks owned by this view model that are still running.
    pub fn active_tasks(&self) -> usize {
        self.inner.scope.active_tasks()
    }
}

fn with_inner(weak: &Weak<Inner>, f: impl FnOnce(&Inner)) {
    if let Some(inner) = weak.upgrade() {
        f(&inner);
    }
}

impl Inner {
    fn dispatch(&self, event: HomeEvent) {
        if self.destroyed.load(Ordering::SeqCst) {
            tracing::debug!(event = event.name(), "Dropping event after destroy");
            return;
        }
        tracing::trace!(event = event.name(), "Dispatch");

        match event {
            HomeEvent::LoadContent => self.load_content(),
            HomeEvent::SwipeToRefresh => self.refresh_content(),
            HomeEvent::FeedSelected(feed) => self.on_feed_selected(feed),
            HomeEvent::HomeSelected => self.on_home_selected(),
            HomeEvent::AddClicked => self.on_add_clicked(),
            HomeEvent::PostClicked(post) => self.on_post_clicked(post),
        }
    }

    fn reduce(&self, mutation: HomeMutation) {
        self.state.update(|state| HomeReducer::reduce(state, mutation));
    }

    fn load_content(&self) {
        if self.content_loaded.swap(true, Ordering::SeqCst) {
            tracing::debug!("Content already loading, ignoring LoadContent");
            return;
        }

        let state = Arc::clone(&self.state);
        let repository = Arc::clone(&self.repository);
        let policy = self.config.sharing_policy();
        let subscribers = self.state.watch_subscribers();

        tracing::debug!(?policy, "Starting content queries");
        self.scope.spawn(
            "home-content",
            share_while(policy, subscribers, move || {
                let state = Arc::clone(&state);
                let repository = Arc::clone(&repository);
                async move {
                    futures::join!(
                        collect_posts(&state, repository.as_ref()),
                        collect_feeds(&state, repository.as_ref()),
                    );
                }
                .boxed()
            }),
        );
    }

    fn on_post_clicked(&self, post: Post) {
        tracing::debug!(post = %post.link, "Opening post");
        self.effects.emit(HomeEffect::OpenPost(post));
    }

    fn on_add_clicked(&self) {
        self.effects.emit(HomeEffect::NavigateToAddScreen);
    }

    fn on_home_selected(&self) {
        self.reduce(HomeMutation::ClearSelection);
    }

    fn on_feed_selected(&self, feed: Feed) {
        tracing::debug!(feed = %feed.link, "Feed selected");
        self.reduce(HomeMutation::SelectFeed(feed));
    }

    fn refresh_content(&self) {
        {
            let mut in_flight = self.refreshes_in_flight.lock();
            if *in_flight > 0 && self.config.refresh == RefreshPolicy::SkipWhileInFlight {
                tracing::debug!("Refresh already running, skipping");
                return;
            }
            *in_flight += 1;
            if *in_flight == 1 {
                self.reduce(HomeMutation::RefreshStarted);
            }
        }

        let state = Arc::clone(&self.state);
        let repository = Arc::clone(&self.repository);
        let in_flight = Arc::clone(&self.refreshes_in_flight);

        self.scope.spawn_on(&self.dispatchers.io, "refresh-feeds", async move {
            let started = Instant::now();
            match repository.update_feeds().await {
                Ok(()) => tracing::info!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Feeds refreshed"
                ),
                // Not surfaced to the view: loading just goes back to idle.
                Err(error) => tracing::warn!(%error, "Feed refresh failed"),
            }

            let mut in_flight = in_flight.lock();
            *in_flight = in_flight.saturating_sub(1);
            if *in_flight == 0 {
                state.update(|s| HomeReducer::reduce(s, HomeMutation::RefreshFinished));
            }
        });
    }

    fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.state.close();
        self.effects.close();
        self.scope.cancel();
        tracing::debug!("Home view model destroyed");
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Keep `state.posts` in sync with the posts query for the selected feed.
async fn collect_posts(state: &StateFlow<HomeState>, repository: &dyn RssRepository) {
    let selected = state.watch_distinct(HomeState::selected_feed_link);
    switch_latest(
        selected,
        |link| {
            tracing::debug!(feed = ?link, "Switching posts query");
            repository.posts(link)
        },
        |posts| {
            state.update(|s| HomeReducer::reduce(s, HomeMutation::PostsLoaded(posts)));
        },
    )
    .await;
}

/// Keep `state.feeds` in sync with the feeds query.
async fn collect_feeds(state: &StateFlow<HomeState>, repository: &dyn RssRepository) {
    let mut feeds = repository.all_feeds();
    while let Some(feeds) = feeds.next().await {
        if !state.update(|s| HomeReducer::reduce(s, HomeMutation::FeedsLoaded(feeds))) {
            break;
        }
    }
    tracing::debug!("Feeds query ended");
}
