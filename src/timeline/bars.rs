//! Bar geometry, visual category, urgency, and date-edit requests.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::schedule::item::{ProductionStage, ScheduleFlags, ScheduleItem};
use crate::timeline::projection::Projection;

/// Visual category of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "stage")]
pub enum BarCategory {
    Shortage,
    Problem,
    InProgress,
    Stage(ProductionStage),
}

impl BarCategory {
    /// Stable key, e.g. `"shortage"` or `"stage-sewing"`.
    #[must_use]
    pub fn key(self) -> String {
        match self {
            Self::Shortage => "shortage".to_string(),
            Self::Problem => "problem".to_string(),
            Self::InProgress => "in-progress".to_string(),
            Self::Stage(stage) => format!("stage-{}", stage.key()),
        }
    }
}

type CategoryRule = (fn(&ScheduleFlags) -> bool, BarCategory);

/// Evaluated top to bottom; the first matching predicate wins.
const CATEGORY_RULES: [CategoryRule; 3] = [
    (has_shortage, BarCategory::Shortage),
    (has_problem, BarCategory::Problem),
    (is_in_progress, BarCategory::InProgress),
];

const fn has_shortage(flags: &ScheduleFlags) -> bool {
    flags.shortage
}

const fn has_problem(flags: &ScheduleFlags) -> bool {
    flags.problem
}

const fn is_in_progress(flags: &ScheduleFlags) -> bool {
    flags.in_progress
}

/// Category for a set of flags; falls back to the production stage.
#[must_use]
pub fn categorize(flags: &ScheduleFlags) -> BarCategory {
    CATEGORY_RULES
        .iter()
        .find(|(matches, _)| matches(flags))
        .map_or(BarCategory::Stage(flags.stage), |(_, category)| *category)
}

/// True when `due` falls `0..=window_days` days after `today`.
#[must_use]
pub fn is_urgent(due: NaiveDate, today: NaiveDate, window_days: i64) -> bool {
    (0..=window_days).contains(&(due - today).num_days())
}

/// Rectangle and styling of one item's bar, in content coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarGeometry {
    pub item_id: String,
    pub left: f64,
    pub width: f64,
    pub category: BarCategory,
    pub urgent: bool,
}

impl BarGeometry {
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Build the bar for one item.
#[must_use]
pub fn build_bar(
    item: &ScheduleItem,
    projection: &Projection,
    today: NaiveDate,
    urgency_window_days: i64,
) -> BarGeometry {
    BarGeometry {
        item_id: item.id.clone(),
        left: projection.date_to_x(item.start_date),
        width: projection.interval_to_width(item.start_date, item.end_date),
        category: categorize(&item.flags),
        urgent: is_urgent(item.due_date(), today, urgency_window_days),
    }
}

/// Build bars for every item, in input order.
#[must_use]
pub fn build_bars(
    items: &[ScheduleItem],
    projection: &Projection,
    today: NaiveDate,
    urgency_window_days: i64,
) -> Vec<BarGeometry> {
    items
        .iter()
        .map(|item| build_bar(item, projection, today, urgency_window_days))
        .collect()
}

// ──────────────────── edits ────────────────────

/// A committed user interaction with a bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BarInteraction {
    /// Drag the whole bar horizontally.
    Move { delta_px: f64 },
    /// Drag the left edge.
    ResizeStart { delta_px: f64 },
    /// Drag the right edge.
    ResizeEnd { delta_px: f64 },
    /// Dates typed into the edit form.
    SetDates { start: NaiveDate, end: NaiveDate },
}

/// Proposed new dates for an item; persisting them is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateEditRequest {
    pub item_id: String,
    pub proposed_start: NaiveDate,
    pub proposed_end: NaiveDate,
}

/// Receiver of `onDateEdit` events.
pub trait DateEditSink {
    fn on_date_edit(&mut self, request: DateEditRequest);
}

impl<F> DateEditSink for F
where
    F: FnMut(DateEditRequest),
{
    fn on_date_edit(&mut self, request: DateEditRequest) {
        self(request);
    }
}

/// Translate an interaction into proposed dates, snapped to whole ticks.
///
/// Edge drags never move one edge past the other.
#[must_use]
pub fn propose_edit(
    item: &ScheduleItem,
    interaction: BarInteraction,
    projection: &Projection,
) -> DateEditRequest {
    let shift = |date: NaiveDate, delta_px: f64| {
        shift_days(date, projection.pixels_to_days(delta_px))
    };
    let (proposed_start, proposed_end) = match interaction {
        BarInteraction::Move { delta_px } => {
            // One delta for both edges, clamped so neither leaves the calendar.
            let lo = item.start_date.min(item.end_date);
            let hi = item.start_date.max(item.end_date);
            let days = projection.pixels_to_days(delta_px).clamp(
                days_between(lo, NaiveDate::MIN),
                days_between(hi, NaiveDate::MAX),
            );
            (shift_days(item.start_date, days), shift_days(item.end_date, days))
        }
        BarInteraction::ResizeStart { delta_px } => {
            let start = shift(item.start_date, delta_px);
            (start.min(item.end_date), item.end_date)
        }
        BarInteraction::ResizeEnd { delta_px } => {
            let end = shift(item.end_date, delta_px);
            (item.start_date, end.max(item.start_date))
        }
        BarInteraction::SetDates { start, end } => (start.min(end), start.max(end)),
    };
    DateEditRequest {
        item_id: item.id.clone(),
        proposed_start,
        proposed_end,
    }
}

fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// `date` moved by `days`, saturating at the calendar bounds.
fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    let days = days.clamp(
        days_between(date, NaiveDate::MIN),
        days_between(date, NaiveDate::MAX),
    );
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(date)
}

/// Compute the edit for `interaction` and hand it to `sink`.
pub fn emit_edit<S>(
    item: &ScheduleItem,
    interaction: BarInteraction,
    projection: &Projection,
    sink: &mut S,
) -> DateEditRequest
where
    S: DateEditSink + ?Sized,
{
    let request = propose_edit(item, interaction, projection);
    tracing::debug!(
        item_id = %request.item_id,
        start = %request.proposed_start,
        end = %request.proposed_end,
        "date edit requested"
    );
    sink.on_date_edit(request.clone());
    request
}
