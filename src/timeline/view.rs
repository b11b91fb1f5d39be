//! One timeline view: the controller plus the render pass built from it.
//!
//! `render` copies the viewport once and derives everything from that copy,
//! so the header, month row, bars and today marker always agree.

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::config::TimelineConfig;
use crate::core::errors::{PtlError, Result};
use crate::schedule::item::ScheduleItem;
use crate::timeline::bars::{
    BarGeometry, BarInteraction, DateEditRequest, DateEditSink, build_bars, emit_edit,
};
use crate::timeline::grid::{GridSpec, GridTick};
use crate::timeline::months::{MonthSpan, aggregate_months};
use crate::timeline::projection::Projection;
use crate::timeline::range::{DateRange, RangePolicy, resolve_range};
use crate::timeline::resolution::Resolution;
use crate::timeline::today::{TodayMarker, today_marker};
use crate::timeline::viewport::{Pane, PaneView, ViewportMsg, ViewportState, ZoomScrollController};

/// Everything one render pass produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineFrame {
    pub range: DateRange,
    pub resolution: Resolution,
    pub viewport: ViewportState,
    pub unit_width: f64,
    pub ticks: Vec<GridTick>,
    pub month_spans: Vec<MonthSpan>,
    pub bars: Vec<BarGeometry>,
    pub today: Option<TodayMarker>,
    pub content_width: f64,
}

impl TimelineFrame {
    /// Bars overlapping the scrolled pane `[scroll, scroll + pane_width)`.
    pub fn visible_bars(&self, pane_width: f64) -> impl Iterator<Item = &BarGeometry> {
        let lo = self.viewport.scroll_offset() as f64;
        let hi = lo + pane_width;
        self.bars
            .iter()
            .filter(move |bar| bar.right() > lo && bar.left < hi)
    }
}

/// Mounted timeline: owns the viewport controller for one session.
#[derive(Debug, Clone)]
pub struct TimelineView {
    controller: ZoomScrollController,
    range_policy: RangePolicy,
    urgency_window_days: i64,
}

impl Default for TimelineView {
    fn default() -> Self {
        Self::new(&TimelineConfig::default())
    }
}

impl TimelineView {
    #[must_use]
    pub fn new(cfg: &TimelineConfig) -> Self {
        Self {
            controller: ZoomScrollController::new(cfg.default_resolution),
            range_policy: RangePolicy::from(cfg),
            urgency_window_days: i64::from(cfg.urgency_window_days),
        }
    }

    /// Read access to the controller; mutation goes through [`Self::dispatch`].
    #[must_use]
    pub const fn controller(&self) -> &ZoomScrollController {
        &self.controller
    }

    /// Apply a control message. Returns `true` when the viewport changed.
    pub fn dispatch(&mut self, msg: ViewportMsg) -> bool {
        self.controller.apply(msg)
    }

    #[must_use]
    pub const fn pane(&self, pane: Pane) -> PaneView<'_> {
        self.controller.pane(pane)
    }

    /// Range the next render would use for `items`.
    #[must_use]
    pub fn range_for(&self, items: &[ScheduleItem], today: NaiveDate) -> DateRange {
        resolve_range(items, today, self.range_policy)
    }

    /// Projection the next render would use for `items`.
    #[must_use]
    pub fn projection_for(&self, items: &[ScheduleItem], today: NaiveDate) -> Projection {
        self.controller.projection(self.range_for(items, today))
    }

    /// Full render pass for the current items.
    #[must_use]
    pub fn render(&self, items: &[ScheduleItem], today: NaiveDate) -> TimelineFrame {
        let viewport = self.controller.snapshot();
        let resolution = self.controller.resolution();
        let range = self.range_for(items, today);
        let projection = Projection::new(range.min, resolution, viewport);
        let unit_width = projection.unit_width();

        let ticks: Vec<GridTick> = GridSpec::new(range, resolution, unit_width).ticks().collect();
        let month_spans = aggregate_months(&ticks);
        let bars = build_bars(items, &projection, today, self.urgency_window_days);
        let today_marker = today_marker(range, &projection, today);
        let content_width = ticks.len() as f64 * unit_width;

        tracing::trace!(
            %resolution,
            zoom = viewport.zoom_factor(),
            scroll = viewport.scroll_offset(),
            ticks = ticks.len(),
            bars = bars.len(),
            "timeline rendered"
        );

        TimelineFrame {
            range,
            resolution,
            viewport,
            unit_width,
            ticks,
            month_spans,
            bars,
            today: today_marker,
            content_width,
        }
    }

    /// Resolve an interaction on `item_id` and emit the resulting edit.
    pub fn edit<S>(
        &self,
        items: &[ScheduleItem],
        item_id: &str,
        interaction: BarInteraction,
        today: NaiveDate,
        sink: &mut S,
    ) -> Result<DateEditRequest>
    where
        S: DateEditSink + ?Sized,
    {
        let item = items
            .iter()
            .find(|item| item.id == item_id)
            .ok_or_else(|| PtlError::UnknownItem {
                item_id: item_id.to_string(),
            })?;
        let projection = self.projection_for(items, today);
        Ok(emit_edit(item, interaction, &projection, sink))
    }
}
