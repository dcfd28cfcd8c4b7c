//! Switch-on-key stream combinator.

use std::future::pending;

use futures::stream::{BoxStream, Stream, StreamExt};

/// Follow the inner stream opened for the most recent key.
///
/// For every key yielded by `keys`, the inner stream for the previous key is
/// dropped (which cancels it) before the stream for the new key is polled.
/// When a key change and a value from the old inner stream are ready at the
/// same time, the key change wins, so a value for a superseded key never
/// reaches `sink`.
///
/// Runs until `keys` ends. An inner stream that ends simply leaves the
/// combinator idle until the next key.
pub async fn switch_latest<K, V, Ks, Open, Sink>(keys: Ks, mut open: Open, mut sink: Sink)
where
    Ks: Stream<Item = K>,
    Open: FnMut(K) -> BoxStream<'static, V>,
    Sink: FnMut(V),
{
    let keys = keys.fuse();
    futures::pin_mut!(keys);
    let mut current: Option<BoxStream<'static, V>> = None;

    loop {
        tokio::select! {
            biased;

            key = keys.next() => match key {
                Some(key) => {
                    drop(current.take());
                    current = Some(open(key));
                }
                None => break,
            },

            value = next_value(&mut current) => match value {
                Some(value) => sink(value),
                None => current = None,
            },
        }
    }
}

async fn next_value<V>(current: &mut Option<BoxStream<'static, V>>) -> Option<V> {
    match current {
        Some(stream) => stream.next().await,
        None => pending().await,
    }
}
