//! Kipubot - Telegram bot for MobilePay raffle spreadsheets
//!
//! Users send the bot an Excel export; the bot downloads it through the Bot
//! API, keeps it on disk for a while and summarises it on `/kuvaaja`.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors and logging
//! - `files`: getFile + download against the Bot API
//! - `storage`: per-chat spreadsheet files and their deferred cleanup
//! - `ingest`: the document ingestion flow
//! - `sheet`: Excel parsing into payment records
//! - `chart`: rendering records for the chat
//! - `telegram`: Telegram bot integration and handlers

pub mod chart;
pub mod cli;
pub mod core;
pub mod files;
pub mod ingest;
pub mod sheet;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult, BotConfig};
pub use ingest::{DocumentRef, IngestOutcome, Ingestor, Rejection};
pub use storage::SpreadsheetStore;
