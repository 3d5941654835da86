//! Remote file access through the Telegram Bot API
//!
//! Two calls, both plain request/response without retry:
//! - `resolve`: exchange a `file_id` for a transient server-side `file_path` (getFile)
//! - `download`: fetch the raw bytes behind a `file_path`

pub mod client;

pub use client::{FileSource, ResolvedFile, TelegramFileClient};
