//! /kuvaaja against spreadsheets written to the store

use std::time::Duration;

use kipubot::chart::{ChartArtifact, ChartError, ChartRenderer, TextSummaryRenderer};
use kipubot::sheet::SheetRecord;
use kipubot::telegram::commands::{chart_reply, load_records};
use kipubot::telegram::messages;
use kipubot::SpreadsheetStore;
use pretty_assertions::assert_eq;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use teloxide::types::ChatId;
use tempfile::TempDir;

/// MobilePay-shaped export: header row, then one payment per row
fn mobilepay_export() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("dd.mm.yyyy hh:mm");
    let sheet = workbook.add_worksheet();

    for (col, title) in ["Päivämäärä", "Nimi", "Viesti", "Summa"].iter().enumerate() {
        sheet.write_string(0, col as u16, *title).unwrap();
    }

    let rows = [
        ((2023, 4, 28, 18), "Matti", "arpa 1", 2.0),
        ((2023, 4, 29, 9), "Liisa", "", 4.5),
        ((2023, 4, 30, 21), "Pekka", "kaks", 2.0),
    ];
    for (i, ((y, m, d, h), name, msg, amount)) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        let when = ExcelDateTime::from_ymd(*y, *m, *d).unwrap().and_hms(*h, 0, 0).unwrap();
        sheet.write_datetime_with_format(row, 0, &when, &date_format).unwrap();
        sheet.write_string(row, 1, *name).unwrap();
        sheet.write_string(row, 2, *msg).unwrap();
        sheet.write_number(row, 3, *amount).unwrap();
    }

    workbook.save_to_buffer().unwrap()
}

#[tokio::test]
async fn test_command_without_upload_replies_no_data() {
    let dir = TempDir::new().unwrap();
    let store = SpreadsheetStore::new(dir.path(), Duration::from_secs(60));

    let reply = chart_reply(&store, &TextSummaryRenderer, ChatId(77)).await;

    assert_eq!(reply, messages::NO_DATA);
}

#[tokio::test]
async fn test_records_keep_sheet_order_and_fields() {
    let dir = TempDir::new().unwrap();
    let store = SpreadsheetStore::new(dir.path(), Duration::from_secs(60));
    store.save(ChatId(5), &mobilepay_export()).await.unwrap();

    let parsed = load_records(&store, ChatId(5)).await.unwrap().unwrap();

    let names: Vec<&str> = parsed.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Matti", "Liisa", "Pekka"]);
    assert_eq!(parsed.records[0].message, "arpa 1");
    assert_eq!(parsed.records[1].amount, 4.5);
    assert_eq!(parsed.records[2].date.format("%Y-%m-%d %H:%M").to_string(), "2023-04-30 21:00");
    assert_eq!(parsed.skipped_rows, 1);
}

#[tokio::test]
async fn test_summary_reply() {
    let dir = TempDir::new().unwrap();
    let store = SpreadsheetStore::new(dir.path(), Duration::from_secs(60));
    store.save(ChatId(5), &mobilepay_export()).await.unwrap();

    let reply = chart_reply(&store, &TextSummaryRenderer, ChatId(5)).await;

    assert_eq!(reply, "📊 Merkintöjä: 3\n💶 Yhteensä: 8.5 €\n📅 28.04.2023 - 30.04.2023");
}

/// Renderer that only reports how many records it was handed
struct CountingRenderer;

impl ChartRenderer for CountingRenderer {
    fn render(&self, records: &[SheetRecord]) -> Result<ChartArtifact, ChartError> {
        Ok(ChartArtifact {
            text: format!("{} records", records.len()),
        })
    }
}

#[tokio::test]
async fn test_renderer_is_pluggable() {
    let dir = TempDir::new().unwrap();
    let store = SpreadsheetStore::new(dir.path(), Duration::from_secs(60));
    store.save(ChatId(5), &mobilepay_export()).await.unwrap();

    assert_eq!(chart_reply(&store, &CountingRenderer, ChatId(5)).await, "3 records");
}
