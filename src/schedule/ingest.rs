//! Ingestion of raw, string-dated records into [`ScheduleItem`]s.
//!
//! A record with an unparseable date is excluded and reported back to the
//! caller in the [`IngestReport`]; it never aborts the batch.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::errors::{PtlError, Result};
use crate::schedule::item::{ScheduleFlags, ScheduleItem};

/// Record as delivered by the production-data collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScheduleItem {
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub forecast_date: Option<String>,
    #[serde(default)]
    pub delivery_date: Option<String>,
    #[serde(default)]
    pub flags: ScheduleFlags,
}

/// A record excluded during ingestion.
#[derive(Debug)]
pub struct RejectedItem {
    pub item_id: String,
    pub error: PtlError,
}

/// Outcome of one ingestion batch, in input order.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub items: Vec<ScheduleItem>,
    pub rejected: Vec<RejectedItem>,
}

impl IngestReport {
    /// True when every record was accepted.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Convert raw records, keeping valid items and reporting the rest.
pub fn ingest<I>(records: I) -> IngestReport
where
    I: IntoIterator<Item = RawScheduleItem>,
{
    let mut report = IngestReport::default();
    for record in records {
        match convert(&record) {
            Ok(item) => report.items.push(item),
            Err(error) => {
                tracing::warn!(
                    item_id = %record.id,
                    code = error.code(),
                    "excluding schedule item: {error}"
                );
                report.rejected.push(RejectedItem {
                    item_id: record.id,
                    error,
                });
            }
        }
    }
    report
}

/// Parse a JSON array of raw records and ingest it.
///
/// Only malformed JSON fails the whole call; bad dates are per-item rejections.
pub fn ingest_json(text: &str) -> Result<IngestReport> {
    let records: Vec<RawScheduleItem> = serde_json::from_str(text)?;
    Ok(ingest(records))
}

fn convert(record: &RawScheduleItem) -> Result<ScheduleItem> {
    let start_date = parse_date(&record.id, "startDate", &record.start_date)?;
    let end_date = parse_date(&record.id, "endDate", &record.end_date)?;
    let forecast_date =
        parse_optional_date(&record.id, "forecastDate", record.forecast_date.as_deref())?;
    let delivery_date =
        parse_optional_date(&record.id, "deliveryDate", record.delivery_date.as_deref())?;

    if end_date < start_date {
        tracing::debug!(item_id = %record.id, %start_date, %end_date, "item ends before it starts");
    }

    Ok(ScheduleItem {
        id: record.id.clone(),
        label: record.label.clone(),
        start_date,
        end_date,
        forecast_date,
        delivery_date,
        flags: record.flags,
    })
}

fn parse_optional_date(
    item_id: &str,
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_date(item_id, field, raw).map(Some),
    }
}

/// Parse an ISO-8601 calendar date, or the date part of an RFC 3339 timestamp.
pub fn parse_date(item_id: &str, field: &'static str, value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|ts| ts.date_naive())
        })
        .ok_or_else(|| PtlError::InvalidDate {
            item_id: item_id.to_string(),
            field,
            value: value.to_string(),
        })
}
