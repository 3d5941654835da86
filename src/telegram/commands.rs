//! Command logic, kept free of `Message` so it can be tested without Telegram

use teloxide::types::ChatId;

use crate::chart::{ChartError, ChartRenderer};
use crate::core::error::{AppError, AppResult};
use crate::sheet::{parse_records_from_bytes, ParsedSheet};
use crate::storage::SpreadsheetStore;
use crate::telegram::messages;

/// Reads and parses the chat's persisted spreadsheet.
///
/// `Ok(None)` when the chat has no file (never uploaded, or already cleaned up).
pub async fn load_records(store: &SpreadsheetStore, chat_id: ChatId) -> AppResult<Option<ParsedSheet>> {
    let Some(bytes) = store.load(chat_id).await? else {
        return Ok(None);
    };

    // calamine is synchronous; keep the unzip + XML walk off the reactor
    let parsed = tokio::task::spawn_blocking(move || parse_records_from_bytes(bytes)).await??;
    Ok(Some(parsed))
}

/// Builds the reply for /kuvaaja
pub async fn chart_reply(store: &SpreadsheetStore, renderer: &dyn ChartRenderer, chat_id: ChatId) -> String {
    let parsed = match load_records(store, chat_id).await {
        Ok(Some(parsed)) => parsed,
        Ok(None) => {
            log::info!("Chat {}: chart requested without a spreadsheet", chat_id);
            return messages::NO_DATA.to_string();
        }
        Err(AppError::Sheet(e)) => {
            log::warn!("Chat {}: unusable spreadsheet: {}", chat_id, e);
            return messages::INVALID_FILE.to_string();
        }
        Err(e) => {
            log::error!("Chat {}: failed to read spreadsheet: {}", chat_id, e);
            return messages::SERVER_ERROR.to_string();
        }
    };

    log::info!(
        "📊 Chat {}: parsed {} records ({} rows skipped)",
        chat_id,
        parsed.records.len(),
        parsed.skipped_rows
    );

    match renderer.render(&parsed.records) {
        Ok(artifact) => artifact.text,
        Err(ChartError::NoEntries) => messages::NO_ENTRIES.to_string(),
        Err(e @ ChartError::TotalOutOfRange) => {
            log::warn!("Chat {}: cannot summarise spreadsheet: {}", chat_id, e);
            messages::INVALID_FILE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::TextSummaryRenderer;
    use pretty_assertions::assert_eq;
    use rust_xlsxwriter::Workbook;
    use std::time::Duration;
    use tempfile::TempDir;

    fn workbook_bytes(rows: &[(&str, &str, &str, f64)]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (i, (date, name, msg, amount)) in rows.iter().enumerate() {
            let row = i as u32;
            sheet.write_string(row, 0, *date).unwrap();
            sheet.write_string(row, 1, *name).unwrap();
            sheet.write_string(row, 2, *msg).unwrap();
            sheet.write_number(row, 3, *amount).unwrap();
        }
        workbook.save_to_buffer().unwrap()
    }

    #[tokio::test]
    async fn test_no_file_replies_no_data() {
        let dir = TempDir::new().unwrap();
        let store = SpreadsheetStore::new(dir.path(), Duration::from_secs(60));

        assert!(load_records(&store, ChatId(1)).await.unwrap().is_none());
        assert_eq!(chart_reply(&store, &TextSummaryRenderer, ChatId(1)).await, messages::NO_DATA);
    }

    #[tokio::test]
    async fn test_summary_for_stored_file() {
        let dir = TempDir::new().unwrap();
        let store = SpreadsheetStore::new(dir.path(), Duration::from_secs(60));
        let bytes = workbook_bytes(&[
            ("2023-05-01 10:00:00", "Matti", "arpa", 2.0),
            ("2023-05-02 11:00:00", "Liisa", "", 3.0),
        ]);
        store.save(ChatId(1), &bytes).await.unwrap();

        let reply = chart_reply(&store, &TextSummaryRenderer, ChatId(1)).await;

        assert_eq!(reply, "📊 Merkintöjä: 2\n💶 Yhteensä: 5 €\n📅 01.05.2023 - 02.05.2023");
    }

    #[tokio::test]
    async fn test_corrupt_file_replies_invalid() {
        let dir = TempDir::new().unwrap();
        let store = SpreadsheetStore::new(dir.path(), Duration::from_secs(60));
        store.save(ChatId(1), b"not an xlsx").await.unwrap();

        assert_eq!(
            chart_reply(&store, &TextSummaryRenderer, ChatId(1)).await,
            messages::INVALID_FILE
        );
    }

    #[tokio::test]
    async fn test_only_refunds_replies_no_entries() {
        let dir = TempDir::new().unwrap();
        let store = SpreadsheetStore::new(dir.path(), Duration::from_secs(60));
        let bytes = workbook_bytes(&[("2023-05-01 10:00:00", "Matti", "palautus", -2.0)]);
        store.save(ChatId(1), &bytes).await.unwrap();

        assert_eq!(
            chart_reply(&store, &TextSummaryRenderer, ChatId(1)).await,
            messages::NO_ENTRIES
        );
    }

    #[tokio::test]
    async fn test_absurd_amounts_reply_invalid() {
        let dir = TempDir::new().unwrap();
        let store = SpreadsheetStore::new(dir.path(), Duration::from_secs(60));
        let bytes = workbook_bytes(&[
            ("2023-05-01 10:00:00", "Matti", "", 1e300),
            ("2023-05-02 10:00:00", "Liisa", "", 1e300),
        ]);
        store.save(ChatId(1), &bytes).await.unwrap();

        assert_eq!(
            chart_reply(&store, &TextSummaryRenderer, ChatId(1)).await,
            messages::INVALID_FILE
        );
    }
}
