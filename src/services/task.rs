//! Cancellable background task handle.
//!
//! DESIGN
//! ======
//! Each periodic process (simulator ticks, live polling) runs as one tokio
//! task. Cancelling sets a shared flag that the task checks after every
//! await point before mutating state, then aborts the task outright. The
//! flag covers the window where a response has already resolved but the
//! abort has not landed yet.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::task::JoinHandle;

/// Cheap, cloneable view of a task's cancellation state.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }
}

/// Owns a spawned task. Dropping the guard cancels the task.
pub struct TaskGuard {
    name: &'static str,
    flag: CancelFlag,
    handle: JoinHandle<()>,
}

impl TaskGuard {
    pub fn spawn<F, Fut>(name: &'static str, task: F) -> Self
    where
        F: FnOnce(CancelFlag) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let flag = CancelFlag::default();
        let handle = tokio::spawn(task(flag.clone()));
        Self { name, flag, handle }
    }

    /// Stop the task; no state mutates after this returns.
    pub fn cancel(&self) {
        if !self.is_cancelled() {
            tracing::info!(task = self.name, "background task cancelled");
        }
        self.flag.cancel();
        self.handle.abort();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.is_cancelled()
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
#[path = "task_test.rs"]
mod tests;
