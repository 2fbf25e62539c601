//! Scheduled task registry
//!
//! Every timer the dashboard arms (metrics ticker, upload progress,
//! notification expiry) runs as a tokio task whose handle is kept here under
//! a typed key. Tasks can be cancelled one by one or all together on
//! shutdown. A finished task removes its own entry.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::error::{DashboardError, DashboardResult};

/// What a scheduled task is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKey {
    MetricsTicker,
    Upload(u64),
    NotificationExpiry(u64),
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKey::MetricsTicker => f.write_str("metrics-ticker"),
            TaskKey::Upload(id) => write!(f, "upload-{}", id),
            TaskKey::NotificationExpiry(id) => write!(f, "notification-{}", id),
        }
    }
}

struct TrackedTask {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct RegistryInner {
    tasks: Mutex<HashMap<TaskKey, TrackedTask>>,
    next_generation: AtomicU64,
    closed: AtomicBool,
}

/// Retained handles of running scheduled tasks
#[derive(Clone, Default)]
pub struct TaskRegistry {
    inner: Arc<RegistryInner>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `future` under `key`, aborting any task previously registered
    /// under the same key.
    pub async fn spawn<F>(&self, key: TaskKey, future: F) -> DashboardResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.is_closed() {
            return Err(DashboardError::ShutDown);
        }

        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
        let registry = self.clone();

        // Held across the spawn so the task cannot release its entry before it exists
        let mut tasks = self.inner.tasks.lock().await;
        let handle = tokio::spawn(async move {
            future.await;
            registry.release(key, generation).await;
        });

        if let Some(previous) = tasks.insert(key, TrackedTask { generation, handle }) {
            tracing::debug!(task = %key, "Replacing running task");
            previous.handle.abort();
        }

        Ok(())
    }

    /// Abort the task registered under `key`. Returns false if none was running.
    pub async fn cancel(&self, key: TaskKey) -> bool {
        match self.inner.tasks.lock().await.remove(&key) {
            Some(task) => {
                task.handle.abort();
                tracing::debug!(task = %key, "Cancelled task");
                true
            }
            None => false,
        }
    }

    /// Abort every task and refuse new ones. Returns how many were aborted.
    pub async fn shutdown(&self) -> usize {
        self.inner.closed.store(true, Ordering::SeqCst);

        let mut tasks = self.inner.tasks.lock().await;
        let count = tasks.len();
        for (_, task) in tasks.drain() {
            task.handle.abort();
        }
        count
    }

    pub async fn contains(&self, key: TaskKey) -> bool {
        self.inner.tasks.lock().await.contains_key(&key)
    }

    pub async fn len(&self) -> usize {
        self.inner.tasks.lock().await.len()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    async fn release(&self, key: TaskKey, generation: u64) {
        let mut tasks = self.inner.tasks.lock().await;
        if tasks.get(&key).map(|t| t.generation) == Some(generation) {
            tasks.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_finished_task_releases_entry() {
        let registry = TaskRegistry::new();
        registry
            .spawn(TaskKey::Upload(1), async {
                tokio::time::sleep(Duration::from_millis(100)).await;
            })
            .await
            .unwrap();

        assert!(registry.contains(TaskKey::Upload(1)).await);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!registry.contains(TaskKey::Upload(1)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_task() {
        let registry = TaskRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        registry
            .spawn(TaskKey::NotificationExpiry(9), async move {
                tokio::time::sleep(Duration::from_secs(5)).await;
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await
            .unwrap();

        assert!(registry.cancel(TaskKey::NotificationExpiry(9)).await);
        assert!(!registry.cancel(TaskKey::NotificationExpiry(9)).await);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_replacing_key_aborts_previous() {
        let registry = TaskRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let counter = Arc::clone(&hits);
            registry
                .spawn(TaskKey::MetricsTicker, async move {
                    tokio::time::sleep(Duration::from_secs(1)).await;
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .await
                .unwrap();
        }

        assert_eq!(registry.len().await, 1);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test]
    async fn test_shutdown_refuses_new_tasks() {
        let registry = TaskRegistry::new();
        registry
            .spawn(TaskKey::MetricsTicker, std::future::pending())
            .await
            .unwrap();

        assert_eq!(registry.shutdown().await, 1);
        assert!(registry.is_closed());

        let result = registry.spawn(TaskKey::Upload(2), async {}).await;
        assert!(matches!(result, Err(DashboardError::ShutDown)));
    }

    #[test]
    fn test_key_display() {
        assert_eq!(TaskKey::Upload(3).to_string(), "upload-3");
        assert_eq!(TaskKey::MetricsTicker.to_string(), "metrics-ticker");
    }
}
