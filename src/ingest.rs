//! Spreadsheet ingestion: validate, resolve, download, persist
//!
//! Each step is a hard gate. The first failing step decides the outcome and
//! nothing after it runs:
//!
//! 1. declared MIME type must be xlsx (checked before any network call)
//! 2. `resolve` the file id
//! 3. `download` the resolved path
//! 4. persist the bytes, overwriting the chat's previous file
//!
//! Replying is left to the caller, which then hands the outcome back to
//! `schedule_cleanup_for`.

use std::path::PathBuf;
use std::sync::Arc;

use teloxide::types::{ChatId, Document};

use crate::core::config::EXCEL_MIME;
use crate::files::FileSource;
use crate::storage::SpreadsheetStore;
use crate::telegram::messages;

/// The fields of an inbound document the ingestion flow consumes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub file_id: String,
    pub mime_type: Option<String>,
    pub file_size: u32,
}

impl DocumentRef {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            file_id: doc.file.id.to_string(),
            mime_type: doc.mime_type.as_ref().map(|m| m.to_string()),
            file_size: doc.file.size,
        }
    }

    pub fn is_spreadsheet(&self) -> bool {
        self.mime_type.as_deref() == Some(EXCEL_MIME)
    }
}

/// Why an ingestion stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    WrongMimeType,
    ResolveFailed,
    DownloadFailed,
    PersistFailed,
}

impl Rejection {
    /// Reply shown to the sender; distinct per stage
    pub fn user_message(self) -> &'static str {
        match self {
            Rejection::WrongMimeType => messages::WRONG_MIME_TYPE,
            Rejection::ResolveFailed => messages::RESOLVE_FAILED,
            Rejection::DownloadFailed => messages::DOWNLOAD_FAILED,
            Rejection::PersistFailed => messages::SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    Stored(PathBuf),
    Rejected(Rejection),
}

impl IngestOutcome {
    pub fn reply_text(&self) -> &'static str {
        match self {
            IngestOutcome::Stored(_) => messages::FILE_SAVED,
            IngestOutcome::Rejected(rejection) => rejection.user_message(),
        }
    }
}

/// Drives a `FileSource` and a `SpreadsheetStore` for one inbound document
#[derive(Clone)]
pub struct Ingestor {
    source: Arc<dyn FileSource>,
    store: Arc<SpreadsheetStore>,
}

impl Ingestor {
    pub fn new(source: Arc<dyn FileSource>, store: Arc<SpreadsheetStore>) -> Self {
        Self { source, store }
    }

    pub fn store(&self) -> &Arc<SpreadsheetStore> {
        &self.store
    }

    pub async fn ingest(&self, chat_id: ChatId, doc: &DocumentRef) -> IngestOutcome {
        if !doc.is_spreadsheet() {
            log::debug!(
                "Chat {}: rejecting document with MIME type {:?}",
                chat_id,
                doc.mime_type
            );
            return IngestOutcome::Rejected(Rejection::WrongMimeType);
        }

        log::info!(
            "📥 Chat {}: ingesting spreadsheet {} ({} bytes)",
            chat_id,
            doc.file_id,
            doc.file_size
        );

        let resolved = match self.source.resolve(&doc.file_id).await {
            Ok(resolved) => resolved,
            Err(e) => {
                log::warn!("Chat {}: getFile for {} failed: {}", chat_id, doc.file_id, e);
                return IngestOutcome::Rejected(Rejection::ResolveFailed);
            }
        };

        let bytes = match self.source.download(&resolved.file_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Chat {}: download of {} failed: {}", chat_id, resolved.file_path, e);
                return IngestOutcome::Rejected(Rejection::DownloadFailed);
            }
        };

        match self.store.save(chat_id, &bytes).await {
            Ok(path) => IngestOutcome::Stored(path),
            Err(e) => {
                log::error!("Chat {}: failed to persist spreadsheet: {}", chat_id, e);
                IngestOutcome::Rejected(Rejection::PersistFailed)
            }
        }
    }

    /// Schedules deletion of the stored file. Only a `Stored` outcome left a
    /// file behind; returns whether a cleanup was scheduled.
    pub fn schedule_cleanup_for(&self, chat_id: ChatId, outcome: &IngestOutcome) -> bool {
        match outcome {
            IngestOutcome::Stored(path) => {
                log::info!("✅ Chat {}: spreadsheet stored at {}", chat_id, path.display());
                self.store.schedule_cleanup(chat_id);
                true
            }
            IngestOutcome::Rejected(_) => false,
        }
    }
}
