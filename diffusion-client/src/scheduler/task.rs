//! Scoped background tasks

use tokio::task::JoinHandle;

/// Owns a spawned task and aborts it when dropped
#[derive(Debug)]
pub(crate) struct TaskGuard {
    handle: JoinHandle<()>,
}

impl TaskGuard {
    pub(crate) fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
        }
    }

    #[cfg(test)]
    pub(crate) fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
