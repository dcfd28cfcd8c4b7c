//! Runtime handles a view model schedules its work on.

use tokio::runtime::Handle;

/// Where a view model runs its work.
///
/// `main` hosts live queries and state publication, `io` hosts repository
/// mutations. Both may point at the same runtime.
#[derive(Clone, Debug)]
pub struct DispatchersProvider {
    pub main: Handle,
    pub io: Handle,
}

impl DispatchersProvider {
    pub fn new(main: Handle, io: Handle) -> Self {
        Self { main, io }
    }

    /// Use the runtime of the calling context for everything.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime.
    pub fn current() -> Self {
        let handle = Handle::current();
        Self {
            main: handle.clone(),
            io: handle,
        }
    }
}
