//! Bounded broadcast of one-shot effects.
//!
//! A fixed-capacity ring holds the most recent effects. Each subscriber
//! reads through its own cursor. When the ring is full the oldest entry is
//! dropped; the emitter never waits for slow or absent subscribers.
//!
//! A subscriber that attaches late starts at the oldest entry that no
//! subscriber has consumed yet, so effects emitted while the view was
//! detached are still delivered (up to capacity) but effects somebody
//! already handled are not replayed.

use std::collections::VecDeque;
use std::sync::Arc;

use async_stream::stream;
use futures::stream::{BoxStream, StreamExt};
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::ui::mvi::Effect;

struct Ring<E> {
    entries: VecDeque<E>,
    capacity: usize,
    /// Sequence number of `entries[0]`.
    head: u64,
    /// Highest sequence number handed to any subscriber, plus one.
    delivered: u64,
    closed: bool,
}

impl<E: Clone> Ring<E> {
    fn tail(&self) -> u64 {
        self.head + self.entries.len() as u64
    }

    fn push(&mut self, effect: E) -> bool {
        let overflow = self.entries.len() == self.capacity;
        if overflow {
            self.entries.pop_front();
            self.head += 1;
        }
        self.entries.push_back(effect);
        overflow
    }

    fn read(&mut self, cursor: &mut u64) -> Option<E> {
        if *cursor < self.head {
            tracing::debug!(skipped = self.head - *cursor, "Effect subscriber lagged");
            *cursor = self.head;
        }
        let index = usize::try_from(*cursor - self.head).ok()?;
        let effect = self.entries.get(index)?.clone();
        *cursor += 1;
        self.delivered = self.delivered.max(*cursor);
        Some(effect)
    }
}

struct Shared<E> {
    ring: Mutex<Ring<E>>,
    notify: Notify,
}

/// Emitter side of the effect broadcast. Cheap to clone.
pub struct EffectFlow<E> {
    shared: Arc<Shared<E>>,
}

impl<E> Clone for EffectFlow<E> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<E: Effect> EffectFlow<E> {
    /// Create a flow holding at most `capacity` pending effects.
    ///
    /// A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            shared: Arc::new(Shared {
                ring: Mutex::new(Ring {
                    entries: VecDeque::with_capacity(capacity),
                    capacity,
                    head: 0,
                    delivered: 0,
                    closed: false,
                }),
                notify: Notify::new(),
            }),
        }
    }

    /// Publish an effect without waiting.
    ///
    /// Returns `false` when the flow is closed and the effect was discarded.
    pub fn emit(&self, effect: E) -> bool {
        {
            let mut ring = self.shared.ring.lock();
            if ring.closed {
                return false;
            }
            if ring.push(effect) {
                tracing::debug!(capacity = ring.capacity, "Effect buffer full, dropped oldest");
            }
        }
        self.shared.notify.notify_waiters();
        true
    }

    pub fn subscribe(&self) -> EffectSubscriber<E> {
        let ring = self.shared.ring.lock();
        let cursor = ring.delivered.max(ring.head);
        EffectSubscriber {
            shared: Arc::clone(&self.shared),
            cursor,
        }
    }

    /// Effects buffered that no subscriber has consumed yet.
    pub fn pending(&self) -> usize {
        let ring = self.shared.ring.lock();
        (ring.tail() - ring.delivered.max(ring.head)) as usize
    }

    /// Discard buffered effects and end every subscriber.
    pub fn close(&self) {
        {
            let mut ring = self.shared.ring.lock();
            ring.closed = true;
            ring.head = ring.tail();
            ring.entries.clear();
        }
        self.shared.notify.notify_waiters();
    }
}

/// One independent reader of an [`EffectFlow`].
pub struct EffectSubscriber<E> {
    shared: Arc<Shared<E>>,
    cursor: u64,
}

impl<E: Effect> EffectSubscriber<E> {
    /// Next effect, or `None` once the flow is closed.
    pub async fn recv(&mut self) -> Option<E> {
        loop {
            // Register interest before checking the ring so an emit that
            // lands in between still wakes us.
            let notified = self.shared.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut ring = self.shared.ring.lock();
                if ring.closed {
                    return None;
                }
                if let Some(effect) = ring.read(&mut self.cursor) {
                    return Some(effect);
                }
            }

            notified.await;
        }
    }

    /// Next effect if one is already buffered.
    pub fn try_recv(&mut self) -> Option<E> {
        let mut ring = self.shared.ring.lock();
        if ring.closed {
            return None;
        }
        ring.read(&mut self.cursor)
    }

    pub fn into_stream(self) -> BoxStream<'static, E> {
        let mut subscriber = self;
        stream! {
            while let Some(effect) = subscriber.recv().await {
                yield effect;
            }
        }
        .boxed()
    }
}
