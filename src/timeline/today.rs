//! "Today" marker placement.

use chrono::NaiveDate;
use serde::Serialize;

use crate::timeline::projection::Projection;
use crate::timeline::range::DateRange;

/// Vertical marker at the centre of today's tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TodayMarker {
    pub date: NaiveDate,
    pub position: f64,
}

/// Marker for `now`, or `None` when `now` lies outside the range.
#[must_use]
pub fn today_marker(
    range: DateRange,
    projection: &Projection,
    now: NaiveDate,
) -> Option<TodayMarker> {
    range.contains(now).then(|| TodayMarker {
        date: now,
        position: projection.date_to_x(now) + projection.unit_width() / 2.0,
    })
}
