//! Non-blocking waits and cancellable background work
//!
//! [`sleep`] suspends the current task without holding up the runtime.
//! [`TimerRegistry`] runs "wait, then act" tasks on a bound runtime and keeps
//! an abort handle for each of them, so the owner can drop everything still
//! pending when it shuts down.
//!
//! Host listeners may fire on threads that are not part of any runtime, so
//! the registry spawns through a stored [`Handle`] rather than the ambient
//! runtime context.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::{debug, error};

/// Suspend the current task for `delay`
pub async fn sleep(delay: Duration) {
    tokio::time::sleep(delay).await;
}

/// Handle to one spawned task
#[derive(Debug, Clone)]
pub struct TimerHandle {
    abort: AbortHandle,
}

impl TimerHandle {
    /// Abort the task if it has not finished yet
    pub fn cancel(&self) {
        self.abort.abort();
    }

    /// Whether the task completed or was cancelled
    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

/// Tracks background tasks spawned on behalf of one owner
#[derive(Debug, Clone)]
pub struct TimerRegistry {
    runtime: Arc<Mutex<Option<Handle>>>,
    pending: Arc<Mutex<Vec<AbortHandle>>>,
}

impl TimerRegistry {
    /// Create a registry bound to the current runtime, if there is one
    pub fn new() -> Self {
        Self {
            runtime: Arc::new(Mutex::new(Handle::try_current().ok())),
            pending: Arc::default(),
        }
    }

    /// Bind the registry to the runtime of the calling task
    ///
    /// Must be called from within a tokio runtime.
    pub fn bind_current(&self) {
        *self.runtime.lock() = Some(Handle::current());
    }

    /// Run `task` on the bound runtime
    ///
    /// Safe to call from any thread. Returns `None`, and drops the task, when
    /// the registry was never bound to a runtime.
    pub fn spawn<F>(&self, task: F) -> Option<TimerHandle>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Some(runtime) = self.runtime.lock().clone() else {
            error!("No runtime bound, dropping task");
            return None;
        };

        let abort = runtime.spawn(task).abort_handle();
        let mut pending = self.pending.lock();
        pending.retain(|h| !h.is_finished());
        pending.push(abort.clone());
        Some(TimerHandle { abort })
    }

    /// Number of tasks that have not finished yet
    pub fn pending(&self) -> usize {
        self.pending.lock().iter().filter(|h| !h.is_finished()).count()
    }

    /// Abort every unfinished task; returns how many were aborted
    pub fn cancel_all(&self) -> usize {
        let handles: Vec<AbortHandle> = std::mem::take(&mut *self.pending.lock());
        let mut cancelled = 0;
        for handle in handles {
            if !handle.is_finished() {
                handle.abort();
                cancelled += 1;
            }
        }
        debug!(cancelled, "Cancelled pending timers");
        cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn delayed_count(counter: Arc<AtomicUsize>, delay: Duration, amount: usize) -> impl Future<Output = ()> {
        async move {
            sleep(delay).await;
            counter.fetch_add(amount, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_wait_runs_after_delay() {
        let registry = TimerRegistry::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let handle = registry
            .spawn(delayed_count(fired.clone(), Duration::from_millis(500), 1))
            .unwrap();
        assert_eq!(registry.pending(), 1);

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(handle.is_finished());
        assert_eq!(registry.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_drops_pending_work() {
        let registry = TimerRegistry::new();
        let fired = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            registry.spawn(delayed_count(fired.clone(), Duration::from_secs(1), 1));
        }
        // let the spawned tasks reach their sleep
        tokio::task::yield_now().await;

        assert_eq!(registry.cancel_all(), 3);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(registry.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_handle_cancel() {
        let registry = TimerRegistry::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let first = registry
            .spawn(delayed_count(fired.clone(), Duration::from_secs(1), 1))
            .unwrap();
        registry.spawn(delayed_count(fired.clone(), Duration::from_secs(1), 10));

        first.cancel();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_from_thread_outside_runtime() {
        let registry = TimerRegistry::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let remote = registry.clone();
        let counter = fired.clone();
        let spawned = std::thread::spawn(move || {
            remote
                .spawn(delayed_count(counter, Duration::from_millis(100), 1))
                .is_some()
        })
        .join()
        .unwrap();
        assert!(spawned);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unbound_registry_drops_task_without_panicking() {
        let registry = TimerRegistry::new();
        assert!(registry.spawn(async {}).is_none());
        assert_eq!(registry.pending(), 0);
    }

    #[test]
    fn test_bind_current_attaches_runtime() {
        let registry = TimerRegistry::new();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async { registry.bind_current() });
        let handle = registry.spawn(async {}).unwrap();
        runtime.block_on(async {
            while !handle.is_finished() {
                tokio::task::yield_now().await;
            }
        });
        assert_eq!(registry.pending(), 0);
    }
}
