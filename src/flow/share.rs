//! Demand-driven supervision of upstream work.

use std::future::Future;
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::watch;

/// When upstream work feeding a state flow is kept running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharingPolicy {
    /// Suspend once nobody has observed the state for `stop_timeout`,
    /// restart on the next observer.
    WhileSubscribed { stop_timeout: Duration },
    /// Keep running until the owner is torn down.
    Eagerly,
}

impl SharingPolicy {
    pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_millis(5000);
}

impl Default for SharingPolicy {
    fn default() -> Self {
        SharingPolicy::WhileSubscribed {
            stop_timeout: Self::DEFAULT_STOP_TIMEOUT,
        }
    }
}

/// Run the work produced by `start` while `policy` says there is demand.
///
/// Work starts immediately. Under [`SharingPolicy::WhileSubscribed`], once
/// `subscribers` has stayed at zero for the stop timeout the running work is
/// dropped (cancelling it), and `start` is called again as soon as an
/// observer shows up. Returns when the work completes on its own or when
/// the subscriber count channel closes.
pub async fn share_while<F>(policy: SharingPolicy, mut subscribers: watch::Receiver<usize>, mut start: F)
where
    F: FnMut() -> BoxFuture<'static, ()>,
{
    loop {
        let mut work = start();
        tokio::select! {
            _ = &mut work => {
                tracing::debug!("Upstream work completed");
                return;
            }
            idle = idle_for(policy, &mut subscribers) => {
                drop(work);
                if !idle {
                    return;
                }
                tracing::debug!("No observers, upstream work suspended");
            }
        }

        if !wait_for_demand(&mut subscribers).await {
            return;
        }
        tracing::debug!("Observer attached, upstream work resumed");
    }
}

/// Resolve with `true` once nobody has subscribed for the stop timeout.
/// Resolves with `false` if the count channel closes. Never resolves under
/// [`SharingPolicy::Eagerly`].
fn idle_for<'a>(
    policy: SharingPolicy,
    subscribers: &'a mut watch::Receiver<usize>,
) -> impl Future<Output = bool> + Send + 'a {
    async move {
        let stop_timeout = match policy {
            SharingPolicy::WhileSubscribed { stop_timeout } => stop_timeout,
            SharingPolicy::Eagerly => return std::future::pending::<bool>().await,
        };

        loop {
            if *subscribers.borrow_and_update() > 0 {
                if subscribers.changed().await.is_err() {
                    return false;
                }
                continue;
            }

            tokio::select! {
                _ = tokio::time::sleep(stop_timeout) => return true,
                changed = subscribers.changed() => {
                    if changed.is_err() {
                        return false;
                    }
                }
            }
        }
    }
}

async fn wait_for_demand(subscribers: &mut watch::Receiver<usize>) -> bool {
    subscribers.wait_for(|n| *n > 0).await.is_ok()
}
