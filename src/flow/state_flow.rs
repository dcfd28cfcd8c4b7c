//! Current-value observable built on `tokio::sync::watch`.
//!
//! Writers replace the whole value; readers always see the latest snapshot
//! and never a history. Public subscriptions are counted so that upstream
//! work can be parked while nobody is looking (see [`super::share`]).

use std::sync::Arc;

use async_stream::stream;
use futures::stream::{BoxStream, StreamExt};
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::ui::mvi::UiState;

/// Owner side of a current-value observable.
pub struct StateFlow<S> {
    sender: Mutex<Option<watch::Sender<S>>>,
    // Kept so new subscribers can attach (and read the last value) after close.
    receiver: watch::Receiver<S>,
    subscribers: Arc<watch::Sender<usize>>,
}

impl<S: UiState> StateFlow<S> {
    pub fn new(initial: S) -> Self {
        let (sender, receiver) = watch::channel(initial);
        let (subscribers, _) = watch::channel(0usize);
        Self {
            sender: Mutex::new(Some(sender)),
            receiver,
            subscribers: Arc::new(subscribers),
        }
    }

    /// Latest value.
    pub fn value(&self) -> S {
        self.receiver.borrow().clone()
    }

    /// Replace the value with `f(previous)`.
    ///
    /// Observers are only woken when the new value differs. Returns `false`
    /// once the flow is closed, in which case nothing happens.
    pub fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(S) -> S,
    {
        let guard = self.sender.lock();
        let Some(sender) = guard.as_ref() else {
            return false;
        };
        sender.send_if_modified(|current| {
            let next = f(current.clone());
            if next == *current {
                return false;
            }
            *current = next;
            true
        });
        true
    }

    /// Attach a counted observer.
    pub fn subscribe(&self) -> StateSubscription<S> {
        self.subscribers.send_modify(|n| *n += 1);
        StateSubscription {
            receiver: self.receiver.clone(),
            subscribers: Arc::clone(&self.subscribers),
        }
    }

    /// Number of counted observers currently attached.
    pub fn subscriber_count(&self) -> usize {
        *self.subscribers.borrow()
    }

    /// Change notifications for the observer count.
    pub fn watch_subscribers(&self) -> watch::Receiver<usize> {
        self.subscribers.subscribe()
    }

    /// Distinct-until-changed stream of a projection of the state.
    ///
    /// Yields the current projection first. Does not count as an observer.
    /// Ends when the flow is closed.
    pub fn watch_distinct<T, F>(&self, project: F) -> BoxStream<'static, T>
    where
        T: Clone + PartialEq + Send + Sync + 'static,
        F: Fn(&S) -> T + Send + 'static,
    {
        let mut rx = self.receiver.clone();
        rx.mark_changed();
        stream! {
            let mut last: Option<T> = None;
            while rx.changed().await.is_ok() {
                let next = project(&rx.borrow_and_update());
                if last.as_ref() != Some(&next) {
                    last = Some(next.clone());
                    yield next;
                }
            }
        }
        .boxed()
    }

    /// Stop accepting updates and end every subscription.
    pub fn close(&self) {
        if self.sender.lock().take().is_some() {
            tracing::trace!("State flow closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.lock().is_none()
    }
}

/// Counted observer of a [`StateFlow`].
///
/// Dropping it releases its share of demand.
pub struct StateSubscription<S> {
    receiver: watch::Receiver<S>,
    subscribers: Arc<watch::Sender<usize>>,
}

impl<S: UiState> StateSubscription<S> {
    /// Latest value, without marking it seen.
    pub fn current(&self) -> S {
        self.receiver.borrow().clone()
    }

    /// Wait for a value newer than the last one returned and return it.
    ///
    /// Returns `None` once the flow is closed.
    pub async fn changed(&mut self) -> Option<S> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Stream that yields the current value immediately, then every update.
    pub fn into_stream(self) -> BoxStream<'static, S> {
        let mut subscription = self;
        subscription.receiver.mark_changed();
        stream! {
            while let Some(state) = subscription.changed().await {
                yield state;
            }
        }
        .boxed()
    }
}

impl<S> Drop for StateSubscription<S> {
    fn drop(&mut self) {
        self.subscribers.send_modify(|n| *n = n.saturating_sub(1));
    }
}
