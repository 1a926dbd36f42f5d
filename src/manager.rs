// manager.rs
// ZfsManager: runs library calls for request handlers off the async reactor

use crate::utils::AgentError;
use crate::zfs::{self, Session};
use tracing::debug;

/// Handed to every handler.
/// Holds no native handle: each call opens its own session on a blocking
/// thread, so nothing native crosses requests or threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZfsManager {
    print_on_error: bool,
}

impl ZfsManager {
    pub fn new(print_on_error: bool) -> Self {
        ZfsManager { print_on_error }
    }

    /// Run `f` against a fresh session inside `spawn_blocking`
    pub async fn run<T, F>(&self, operation: &'static str, f: F) -> Result<T, AgentError>
    where
        F: FnOnce(&Session) -> zfs::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let print_on_error = self.print_on_error;
        debug!(operation, "dispatching to blocking pool");
        let result = tokio::task::spawn_blocking(move || {
            let session = Session::new()?;
            session.print_on_error(print_on_error);
            f(&session)
        })
        .await?;
        Ok(result?)
    }
}
