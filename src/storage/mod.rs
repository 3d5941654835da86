//! Local persistence of ingested spreadsheets

pub mod cleanup;
pub mod spreadsheet;

// Re-exports for convenience
pub use cleanup::CleanupScheduler;
pub use spreadsheet::SpreadsheetStore;
