use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Trailing-edge debounce.
///
/// Each [`call`](Debouncer::call) restarts the quiet window; when it elapses
/// the callback runs once with the most recent value. Must be used inside a
/// Tokio runtime.
pub struct Debouncer<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    window: Duration,
    callback: Box<dyn Fn(T) + Send + Sync>,
    generation: AtomicU64,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(window: Duration, callback: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                window,
                callback: Box::new(callback),
                generation: AtomicU64::new(0),
                pending: Mutex::new(None),
            }),
        }
    }

    /// Schedule `value`, superseding any pending call
    pub fn call(&self, value: T) {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let inner = Arc::clone(&self.inner);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(inner.window).await;
            // a newer call or cancel() may have raced the abort
            if inner.generation.load(Ordering::SeqCst) == generation {
                (inner.callback)(value);
            }
        });

        if let Some(previous) = self.inner.lock_pending().replace(handle) {
            if !previous.is_finished() {
                debug!("Debounced call superseded");
            }
            previous.abort();
        }
    }

    /// Discard the pending call, if any
    pub fn cancel(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(previous) = self.inner.lock_pending().take() {
            previous.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.inner
            .lock_pending()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl<T> Inner<T> {
    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(pending) = self.inner.lock_pending().take() {
            pending.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, impl Fn(&'static str) + Send + Sync) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        (calls, move |value| sink.lock().unwrap().push(value))
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_calls_collapse_to_last() {
        let (calls, callback) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(500), callback);

        debouncer.call("arg1");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.call("arg2");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.call("arg3");
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(calls.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(*calls.lock().unwrap(), vec!["arg3"]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_windows_fire_separately() {
        let (calls, callback) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(100), callback);

        debouncer.call("first");
        tokio::time::sleep(Duration::from_millis(150)).await;
        debouncer.call("second");
        tokio::time::sleep(Duration::from_millis(150)).await;
        tokio::task::yield_now().await;

        assert_eq!(*calls.lock().unwrap(), vec!["first", "second"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_pending() {
        let (calls, callback) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(500), callback);

        debouncer.call("dropped");
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_discards_pending() {
        let (calls, callback) = recorder();
        {
            let debouncer = Debouncer::new(Duration::from_millis(500), callback);
            debouncer.call("dropped");
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(calls.lock().unwrap().is_empty());
    }
}
