//! Background work tied to the lifetime of a screen.
//!
//! A screen that starts a request owns a [`ScreenScope`]. Results come back
//! through a oneshot channel. Closing or dropping the scope aborts whatever is
//! still running, so a result never lands in a screen that has gone away.

use std::future::Future;

use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinSet;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScopeError {
    #[error("Task was cancelled because its screen closed")]
    Cancelled,
}

impl From<oneshot::error::RecvError> for ScopeError {
    fn from(_: oneshot::error::RecvError) -> Self {
        ScopeError::Cancelled
    }
}

/// Owns the tasks started on behalf of one screen.
#[derive(Debug)]
pub struct ScreenScope {
    name: String,
    tasks: JoinSet<()>,
}

impl ScreenScope {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: JoinSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs `future` in the background. Must be called from within a tokio
    /// runtime.
    pub fn spawn<F, T>(&mut self, future: F) -> oneshot::Receiver<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        self.reap();
        let (tx, rx) = oneshot::channel();
        self.tasks.spawn(async move {
            // The receiver may already be gone; nothing to report then.
            let _ = tx.send(future.await);
        });
        rx
    }

    /// Number of tasks that have not finished yet.
    pub fn active(&mut self) -> usize {
        self.reap();
        self.tasks.len()
    }

    /// Aborts every task still running.
    pub fn close(&mut self) {
        if !self.tasks.is_empty() {
            tracing::debug!(
                "Closing scope '{}', aborting {} task(s)",
                self.name,
                self.tasks.len()
            );
        }
        self.tasks.abort_all();
    }

    fn reap(&mut self) {
        while self.tasks.try_join_next().is_some() {}
    }
}

impl Drop for ScreenScope {
    fn drop(&mut self) {
        self.close();
    }
}

/// Waits for a result handed out by [`ScreenScope::spawn`].
pub async fn join<T>(rx: oneshot::Receiver<T>) -> Result<T, ScopeError> {
    Ok(rx.await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_spawned_result_is_delivered() {
        let mut scope = ScreenScope::new("preview");
        let rx = scope.spawn(async { 40 + 2 });
        assert_eq!(join(rx).await, Ok(42));
    }

    #[tokio::test]
    async fn test_drop_cancels_in_flight_work() {
        let mut scope = ScreenScope::new("menu editor");
        let rx = scope.spawn(async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            "late"
        });
        assert_eq!(scope.active(), 1);

        drop(scope);

        assert_eq!(join(rx).await, Err(ScopeError::Cancelled));
    }

    #[tokio::test]
    async fn test_close_keeps_scope_usable() {
        let mut scope = ScreenScope::new("dish form");
        let slow = scope.spawn(std::future::pending::<()>());
        scope.close();
        assert_eq!(join(slow).await, Err(ScopeError::Cancelled));

        let fast = scope.spawn(async { "again" });
        assert_eq!(join(fast).await, Ok("again"));
    }

    #[tokio::test]
    async fn test_finished_tasks_are_not_counted() {
        let mut scope = ScreenScope::new("restaurants");
        let rx = scope.spawn(async {});
        join(rx).await.unwrap();
        tokio::task::yield_now().await;
        assert_eq!(scope.active(), 0);
    }
}
