//! Host lifecycle signals.
//!
//! The host owns a [`LifecycleRegistry`] and fires `create` then `destroy`,
//! each at most once. Components receive a [`Lifecycle`] handle and register
//! callbacks on it.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LifecycleState {
    Initialized = 0,
    Created = 1,
    Destroyed = 2,
}

impl LifecycleState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LifecycleState::Initialized,
            1 => LifecycleState::Created,
            _ => LifecycleState::Destroyed,
        }
    }
}

type Callback = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct Callbacks {
    on_create: Vec<Callback>,
    on_destroy: Vec<Callback>,
}

struct Shared {
    state: AtomicU8,
    callbacks: Mutex<Callbacks>,
    notify: Notify,
}

impl Shared {
    fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::SeqCst))
    }
}

/// Host side: drives the lifecycle.
pub struct LifecycleRegistry {
    shared: Arc<Shared>,
}

impl LifecycleRegistry {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: AtomicU8::new(LifecycleState::Initialized as u8),
                callbacks: Mutex::new(Callbacks::default()),
                notify: Notify::new(),
            }),
        }
    }

    /// Handle for components that observe this lifecycle.
    pub fn lifecycle(&self) -> Lifecycle {
        Lifecycle {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.shared.state()
    }

    /// Fire the created signal. Ignored unless the lifecycle is still
    /// `Initialized`.
    pub fn create(&self) {
        let callbacks = {
            let mut callbacks = self.shared.callbacks.lock();
            if self
                .shared
                .state
                .compare_exchange(
                    LifecycleState::Initialized as u8,
                    LifecycleState::Created as u8,
                    Ordering::SeqCst,
                    Ordering::SeqCst,
                )
                .is_err()
            {
                tracing::debug!(state = ?self.shared.state(), "Ignoring repeated create");
                return;
            }
            std::mem::take(&mut callbacks.on_create)
        };

        tracing::debug!(callbacks = callbacks.len(), "Lifecycle created");
        for callback in callbacks {
            callback();
        }
    }

    /// Fire the destroyed signal. Pending create callbacks are discarded
    /// if `create` never happened.
    pub fn destroy(&self) {
        let callbacks = {
            let mut callbacks = self.shared.callbacks.lock();
            let previous = self
                .shared
                .state
                .swap(LifecycleState::Destroyed as u8, Ordering::SeqCst);
            if previous == LifecycleState::Destroyed as u8 {
                return;
            }
            callbacks.on_create.clear();
            std::mem::take(&mut callbacks.on_destroy)
        };

        tracing::debug!(callbacks = callbacks.len(), "Lifecycle destroyed");
        for callback in callbacks {
            callback();
        }
        self.shared.notify.notify_waiters();
    }
}

impl Default for LifecycleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer side of a lifecycle. Cheap to clone.
#[derive(Clone)]
pub struct Lifecycle {
    shared: Arc<Shared>,
}

impl Lifecycle {
    pub fn state(&self) -> LifecycleState {
        self.shared.state()
    }

    /// Run `callback` on create, or right away if already created.
    ///
    /// Never runs if the lifecycle is already destroyed.
    pub fn do_on_create<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut callbacks = self.shared.callbacks.lock();
            match self.shared.state() {
                LifecycleState::Initialized => {
                    callbacks.on_create.push(Box::new(callback));
                    return;
                }
                LifecycleState::Destroyed => return,
                LifecycleState::Created => {}
            }
        }
        callback();
    }

    /// Run `callback` on destroy, or right away if already destroyed.
    pub fn do_on_destroy<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut callbacks = self.shared.callbacks.lock();
            if self.shared.state() != LifecycleState::Destroyed {
                callbacks.on_destroy.push(Box::new(callback));
                return;
            }
        }
        callback();
    }

    /// Wait until the lifecycle is destroyed.
    pub async fn destroyed(&self) {
        // Subscribe before checking the state so a destroy in between
        // cannot be missed.
        let notified = self.shared.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.state() == LifecycleState::Destroyed {
            return;
        }
        notified.await;
    }
}
