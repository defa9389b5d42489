//! 临时提示消息（成功后显示，超时自动清除）

use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;

#[derive(Debug, Default)]
struct Inner {
    message: Option<String>,
    /// Bumped on every `show`; a clear task only acts on its own generation.
    generation: u64,
    clear_task: Option<JoinHandle<()>>,
}

impl Inner {
    /// Clear the message shown as `generation`, unless a newer one replaced it.
    fn expire(&mut self, generation: u64) -> bool {
        if self.generation != generation {
            return false;
        }
        self.message = None;
        self.clear_task = None;
        true
    }
}

/// A single transient message slot.
///
/// Showing a new message replaces the old one and restarts the clear timer.
/// Clones share the same slot.
#[derive(Debug, Clone)]
pub struct Notice {
    ttl: Duration,
    inner: Arc<Mutex<Inner>>,
}

impl Notice {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Display `message` until the TTL elapses. Must be called within a tokio runtime.
    pub fn show(&self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{message}");

        let mut inner = self.lock();
        inner.generation = inner.generation.wrapping_add(1);
        let generation = inner.generation;

        let weak: Weak<Mutex<Inner>> = Arc::downgrade(&self.inner);
        let ttl = self.ttl;
        let task = tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Some(inner) = weak.upgrade() {
                inner
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .expire(generation);
            }
        });

        if let Some(old) = inner.clear_task.replace(task) {
            old.abort();
        }
        inner.message = Some(message);
    }

    pub fn current(&self) -> Option<String> {
        self.lock().message.clone()
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.generation = inner.generation.wrapping_add(1);
        inner.message = None;
        if let Some(task) = inner.clear_task.take() {
            task.abort();
        }
    }
}
