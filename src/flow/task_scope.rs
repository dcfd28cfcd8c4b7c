//! Registry of tasks owned by one view model.
//!
//! Every long-running piece of work (live queries, refreshes) is spawned
//! through a [`TaskScope`] so that a single [`TaskScope::cancel`] tears all
//! of it down. The lock guards handle storage only and is never held across
//! an `.await`.

use std::future::Future;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

#[derive(Default)]
struct Handles {
    cancelled: bool,
    tasks: Vec<(&'static str, JoinHandle<()>)>,
}

pub struct TaskScope {
    runtime: Handle,
    handles: Mutex<Handles>,
}

impl TaskScope {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            handles: Mutex::new(Handles::default()),
        }
    }

    /// Spawn `fut` as a child of this scope.
    ///
    /// Returns `false` without spawning when the scope is already cancelled.
    pub fn spawn<F>(&self, name: &'static str, fut: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.spawn_on(&self.runtime, name, fut)
    }

    /// Like [`TaskScope::spawn`], but on another runtime. The task still
    /// belongs to this scope.
    pub fn spawn_on<F>(&self, runtime: &Handle, name: &'static str, fut: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut handles = self.handles.lock();
        if handles.cancelled {
            tracing::debug!(task = name, "Scope cancelled, not spawning");
            return false;
        }
        handles.tasks.retain(|(_, h)| !h.is_finished());
        handles.tasks.push((name, runtime.spawn(fut)));
        true
    }

    /// Abort every child and refuse further spawns.
    pub fn cancel(&self) {
        let mut handles = self.handles.lock();
        if handles.cancelled {
            return;
        }
        handles.cancelled = true;
        for (name, handle) in handles.tasks.drain(..) {
            if !handle.is_finished() {
                tracing::trace!(task = name, "Aborting task");
            }
            handle.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.handles.lock().cancelled
    }

    /// Number of children that have not finished yet.
    pub fn active_tasks(&self) -> usize {
        self.handles
            .lock()
            .tasks
            .iter()
            .filter(|(_, h)| !h.is_finished())
            .count()
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        self.cancel();
    }
}
