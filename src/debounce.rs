use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use thiserror::Error;
use tokio::{runtime::Handle, task::JoinHandle};

#[derive(Error, Debug)]
pub enum DebounceError {
    #[error("debounce requires a running tokio runtime")]
    NoRuntime,
}

/// Trailing-edge debounced wrapper around a callback.
///
/// Each [`call`](Debounced::call) cancels whatever invocation is still pending and
/// schedules a new one `wait` from now with the latest argument. Clones share the
/// pending slot. Dropping the wrapper leaves a scheduled invocation in place.
pub struct Debounced<T> {
    callback: Arc<dyn Fn(T) + Send + Sync>,
    wait: Duration,
    pending: Arc<Mutex<Option<JoinHandle<()>>>>,
    runtime: Handle,
}

impl<T> Clone for Debounced<T> {
    fn clone(&self) -> Self {
        Self {
            callback: self.callback.clone(),
            wait: self.wait,
            pending: self.pending.clone(),
            runtime: self.runtime.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Debounced<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debounced")
            .field("wait", &self.wait)
            .field("pending", &self.pending.lock().is_some())
            .finish()
    }
}

pub fn debounce<T, F>(callback: F, wait: Duration) -> Result<Debounced<T>, DebounceError>
where
    T: Send + 'static,
    F: Fn(T) + Send + Sync + 'static,
{
    let runtime = Handle::try_current().map_err(|_| DebounceError::NoRuntime)?;

    Ok(Debounced {
        callback: Arc::new(callback),
        wait,
        pending: Arc::new(Mutex::new(None)),
        runtime,
    })
}

impl<T: Send + 'static> Debounced<T> {
    pub fn call(&self, arg: T) {
        let mut pending = self.pending.lock();

        if let Some(handle) = pending.take() {
            handle.abort();
            tracing::trace!("debounce: superseded pending call");
        }

        let callback = self.callback.clone();
        let wait = self.wait;

        *pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(wait).await;
            tracing::trace!(wait_ms = wait.as_millis() as u64, "debounce: firing");
            callback(arg);
        }));
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_requires_runtime() {
        assert_err!(debounce(|_: u32| {}, Duration::from_millis(10)));
    }

    #[tokio::test]
    async fn test_only_last_call_fires() {
        let calls = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(AtomicUsize::new(0));

        let debounced = {
            let calls = calls.clone();
            let last = last.clone();
            assert_ok!(debounce(
                move |v: usize| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    last.store(v, Ordering::SeqCst);
                },
                Duration::from_millis(50),
            ))
        };

        for i in 1..=5 {
            debounced.call(i);
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(debounced.is_pending());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(last.load(Ordering::SeqCst), 5);
        assert!(!debounced.is_pending());
    }

    #[tokio::test]
    async fn test_separate_bursts_fire_separately() {
        let calls = Arc::new(AtomicUsize::new(0));
        let debounced = {
            let calls = calls.clone();
            assert_ok!(debounce(
                move |_: ()| {
                    calls.fetch_add(1, Ordering::SeqCst);
                },
                Duration::from_millis(30),
            ))
        };

        debounced.call(());
        tokio::time::sleep(Duration::from_millis(150)).await;
        debounced.call(());
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_clones_share_pending_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let debounced = {
            let calls = calls.clone();
            assert_ok!(debounce(
                move |_: ()| {
                    calls.fetch_add(1, Ordering::SeqCst);
                },
                Duration::from_millis(40),
            ))
        };
        let other = debounced.clone();

        debounced.call(());
        other.call(());
        assert_eq!(other.wait(), Duration::from_millis(40));

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
