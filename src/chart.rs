//! Turning parsed payment rows into something to show the chat
//!
//! Rendering sits behind `ChartRenderer` so the command handler only deals
//! with "records in, artifact out". The bundled renderer produces a text
//! summary; an image renderer can replace it without touching parsing.

use thiserror::Error;

use crate::sheet::SheetRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChartError {
    /// No row carries a positive amount
    #[error("no paid entries to chart")]
    NoEntries,
    /// The summed amount does not fit in whole cents
    #[error("total amount out of range")]
    TotalOutOfRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartArtifact {
    pub text: String,
}

pub trait ChartRenderer: Send + Sync {
    fn render(&self, records: &[SheetRecord]) -> Result<ChartArtifact, ChartError>;
}

/// Plain-text summary: entry count, total and date range of paid entries
#[derive(Debug, Default, Clone, Copy)]
pub struct TextSummaryRenderer;

impl ChartRenderer for TextSummaryRenderer {
    fn render(&self, records: &[SheetRecord]) -> Result<ChartArtifact, ChartError> {
        // Refunds and zero rows are not entries
        let paid: Vec<&SheetRecord> = records.iter().filter(|r| r.amount > 0.0).collect();

        let first = paid.iter().map(|r| r.date).min().ok_or(ChartError::NoEntries)?;
        let last = paid.iter().map(|r| r.date).max().ok_or(ChartError::NoEntries)?;
        let total_cents = paid
            .iter()
            .try_fold(0i64, |acc, r| to_cents(r.amount).and_then(|c| acc.checked_add(c)))
            .ok_or(ChartError::TotalOutOfRange)?;

        let text = format!(
            "📊 Merkintöjä: {}\n💶 Yhteensä: {} €\n📅 {} - {}",
            paid.len(),
            format_cents(total_cents),
            first.format("%d.%m.%Y"),
            last.format("%d.%m.%Y"),
        );

        Ok(ChartArtifact { text })
    }
}

/// `None` when the amount has no exact i64 cent value
fn to_cents(amount: f64) -> Option<i64> {
    let cents = (amount * 100.0).round();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if cents.is_finite() && cents >= i64::MIN as f64 && cents < i64::MAX as f64 {
        Some(cents as i64)
    } else {
        None
    }
}

/// Formats a price in cents, dropping zero cents: `150 -> "1.5"`, `100 -> "1"`, `-50 -> "-0.5"`
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let euros = abs / 100;
    let rest = abs % 100;

    match rest {
        0 => format!("{}{}", sign, euros),
        r if r % 10 == 0 => format!("{}{}.{}", sign, euros, r / 10),
        r => format!("{}{}.{:02}", sign, euros, r),
    }
}
