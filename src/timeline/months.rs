//! Month aggregation for the secondary header row.

use chrono::Datelike;
use serde::Serialize;

use crate::timeline::grid::GridTick;

/// Run of consecutive ticks that share a calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthSpan {
    /// Header text, e.g. `"Jan 2025"`.
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub start_tick_index: usize,
    pub tick_count: usize,
}

impl MonthSpan {
    /// Left edge of the merged header cell.
    #[must_use]
    pub fn left(&self, tick_width: f64) -> f64 {
        self.start_tick_index as f64 * tick_width
    }

    /// Width of the merged header cell.
    #[must_use]
    pub fn width(&self, tick_width: f64) -> f64 {
        self.tick_count as f64 * tick_width
    }
}

/// Group consecutive ticks by `(year, month)`.
#[must_use]
pub fn aggregate_months(ticks: &[GridTick]) -> Vec<MonthSpan> {
    let mut spans: Vec<MonthSpan> = Vec::new();
    for (index, tick) in ticks.iter().enumerate() {
        let (year, month) = (tick.date.year(), tick.date.month());
        match spans.last_mut() {
            Some(span) if span.year == year && span.month == month => span.tick_count += 1,
            _ => spans.push(MonthSpan {
                label: tick.date.format("%b %Y").to_string(),
                year,
                month,
                start_tick_index: index,
                tick_count: 1,
            }),
        }
    }
    spans
}
