//! Deferred, cancelable deletion of persisted spreadsheets
//!
//! One pending deletion per chat. Scheduling again for the same chat cancels
//! the previous deletion, so a fresh upload is never removed by a timer that
//! belonged to the upload it replaced.
//!
//! Writers and the deleting task serialise on a per-chat lock: the task
//! checks its cancellation and deletes while holding it, and `save` cancels
//! and writes while holding it.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use teloxide::types::ChatId;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

struct PendingCleanup {
    generation: u64,
    cancel: CancellationToken,
}

#[derive(Clone)]
pub struct CleanupScheduler {
    delay: Duration,
    pending: Arc<DashMap<ChatId, PendingCleanup>>,
    locks: Arc<DashMap<ChatId, Arc<Mutex<()>>>>,
    generation: Arc<AtomicU64>,
}

impl CleanupScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Arc::new(DashMap::new()),
            locks: Arc::new(DashMap::new()),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Exclusive access to a chat's file with respect to its cleanup task
    pub async fn lock(&self, chat_id: ChatId) -> OwnedMutexGuard<()> {
        lock_chat(&self.locks, chat_id).await
    }

    /// Schedules removal of `path` after the configured delay, replacing any
    /// pending removal for the same chat.
    ///
    /// Removal is best effort: a missing file is fine, other IO errors are
    /// logged and dropped.
    pub fn schedule(&self, chat_id: ChatId, path: PathBuf) -> JoinHandle<()> {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();

        if let Some(previous) = self.pending.insert(
            chat_id,
            PendingCleanup {
                generation,
                cancel: cancel.clone(),
            },
        ) {
            previous.cancel.cancel();
            log::debug!("Replaced pending cleanup for chat {}", chat_id);
        }

        let pending = Arc::clone(&self.pending);
        let locks = Arc::clone(&self.locks);
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    log::debug!("Cleanup of {} cancelled", path.display());
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }

            let _guard = lock_chat(&locks, chat_id).await;

            // A save or a newer schedule may have cancelled us while we waited
            if cancel.is_cancelled() {
                log::debug!("Cleanup of {} cancelled", path.display());
                return;
            }
            pending.remove_if(&chat_id, |_, entry| entry.generation == generation);

            match tokio::fs::remove_file(&path).await {
                Ok(()) => log::info!("🧹 Removed {} after {}s", path.display(), delay.as_secs()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    log::debug!("Cleanup: {} already gone", path.display());
                }
                Err(e) => log::warn!("Failed to delete {}: {}", path.display(), e),
            }
        })
    }

    /// Cancels the pending removal for a chat. Returns `true` if one was pending.
    pub fn cancel(&self, chat_id: ChatId) -> bool {
        match self.pending.remove(&chat_id) {
            Some((_, entry)) => {
                entry.cancel.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, chat_id: ChatId) -> bool {
        self.pending.contains_key(&chat_id)
    }
}

async fn lock_chat(locks: &DashMap<ChatId, Arc<Mutex<()>>>, chat_id: ChatId) -> OwnedMutexGuard<()> {
    let lock = Arc::clone(&locks.entry(chat_id).or_default());
    lock.lock_owned().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_removed_after_delay() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.xlsx");
        std::fs::write(&path, b"x").unwrap();

        let scheduler = CleanupScheduler::new(Duration::from_millis(20));
        let handle = scheduler.schedule(ChatId(1), path.clone());
        assert!(scheduler.is_pending(ChatId(1)));

        handle.await.unwrap();
        assert!(!path.exists());
        assert!(!scheduler.is_pending(ChatId(1)));
    }

    #[tokio::test]
    async fn test_reschedule_cancels_previous() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.xlsx");
        std::fs::write(&path, b"x").unwrap();

        let scheduler = CleanupScheduler::new(Duration::from_secs(60));
        let first = scheduler.schedule(ChatId(1), path.clone());
        let _second = scheduler.schedule(ChatId(1), path.clone());

        // First task returns promptly because it was cancelled, not because the timer fired
        tokio::time::timeout(Duration::from_secs(5), first).await.unwrap().unwrap();
        assert!(path.exists());
        assert!(scheduler.is_pending(ChatId(1)));
    }

    #[tokio::test]
    async fn test_cancel() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.xlsx");
        std::fs::write(&path, b"x").unwrap();

        let scheduler = CleanupScheduler::new(Duration::from_millis(20));
        let handle = scheduler.schedule(ChatId(7), path.clone());

        assert!(scheduler.cancel(ChatId(7)));
        assert!(!scheduler.cancel(ChatId(7)));
        handle.await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_missing_file_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let scheduler = CleanupScheduler::new(Duration::from_millis(1));
        scheduler
            .schedule(ChatId(3), dir.path().join("never-written.xlsx"))
            .await
            .unwrap();
        assert!(!scheduler.is_pending(ChatId(3)));
    }

    #[tokio::test]
    async fn test_cancel_while_timer_waits_for_lock() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.xlsx");
        std::fs::write(&path, b"old").unwrap();

        let scheduler = CleanupScheduler::new(Duration::from_millis(20));
        let handle = scheduler.schedule(ChatId(4), path.clone());

        // Hold the chat like a save would, and let the timer fire meanwhile
        let guard = scheduler.lock(ChatId(4)).await;
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(scheduler.cancel(ChatId(4)));
        std::fs::write(&path, b"new").unwrap();
        drop(guard);

        handle.await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }
}
