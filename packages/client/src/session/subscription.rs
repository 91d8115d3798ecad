//! Handle to a background listener that is cancelled when dropped.

use std::future::Future;

use tokio::task::JoinHandle;

/// Owned background task; dropping the subscription aborts it
#[derive(Debug)]
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    pub fn spawn(listener: impl Future<Output = ()> + Send + 'static) -> Self {
        Self {
            task: tokio::spawn(listener),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
