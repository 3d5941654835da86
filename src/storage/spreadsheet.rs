//! Per-chat persisted spreadsheet files
//!
//! Layout: `<root>/<chat_id>/data.xlsx`. Writes replace the whole file; there
//! is no versioning. Different chats never share a path.

use std::path::{Path, PathBuf};
use std::time::Duration;

use teloxide::types::ChatId;

use super::cleanup::CleanupScheduler;
use crate::core::config;
use crate::core::error::AppResult;

pub struct SpreadsheetStore {
    root: PathBuf,
    cleanup: CleanupScheduler,
}

impl SpreadsheetStore {
    pub fn new(root: impl Into<PathBuf>, cleanup_delay: Duration) -> Self {
        Self {
            root: root.into(),
            cleanup: CleanupScheduler::new(cleanup_delay),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cleanup(&self) -> &CleanupScheduler {
        &self.cleanup
    }

    /// Path of the spreadsheet for a chat (the file may not exist)
    pub fn path_for(&self, chat_id: ChatId) -> PathBuf {
        self.root.join(chat_id.0.to_string()).join(config::storage::FILE_NAME)
    }

    /// Writes `bytes` as the chat's current spreadsheet, overwriting any prior content.
    ///
    /// Holds the chat's cleanup lock and cancels a pending cleanup first, so
    /// the old timer cannot delete the new file.
    pub async fn save(&self, chat_id: ChatId, bytes: &[u8]) -> AppResult<PathBuf> {
        let _guard = self.cleanup.lock(chat_id).await;
        self.cleanup.cancel(chat_id);

        let path = self.path_for(chat_id);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        log::info!("💾 Saved {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }

    /// Reads the chat's spreadsheet. `Ok(None)` if nothing is stored.
    pub async fn load(&self, chat_id: ChatId) -> AppResult<Option<Vec<u8>>> {
        match tokio::fs::read(self.path_for(chat_id)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Schedules deletion of the chat's spreadsheet after the configured delay
    pub fn schedule_cleanup(&self, chat_id: ChatId) {
        let path = self.path_for(chat_id);
        log::debug!(
            "Scheduling cleanup of {} in {}s",
            path.display(),
            self.cleanup.delay().as_secs()
        );
        // Detached: the task logs its own outcome
        drop(self.cleanup.schedule(chat_id, path));
    }
}
