//! Date → pixel projection.
//!
//! Positions snap to whole ticks: a date maps to the left edge of the tick
//! that contains it, and an interval is widened to whole ticks with a floor
//! of one tick. For a fixed resolution and zoom, `date_to_x` is monotonic
//! non-decreasing in the date.

use chrono::{Duration, NaiveDate};

use crate::timeline::resolution::Resolution;
use crate::timeline::viewport::ViewportState;

/// Coordinate mapping for one render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    range_min: NaiveDate,
    resolution: Resolution,
    unit_width: f64,
    scroll_offset: i64,
}

impl Projection {
    #[must_use]
    pub fn new(range_min: NaiveDate, resolution: Resolution, viewport: ViewportState) -> Self {
        Self {
            range_min,
            resolution,
            unit_width: resolution.base_unit_width() * viewport.zoom_factor(),
            scroll_offset: viewport.scroll_offset(),
        }
    }

    #[must_use]
    pub const fn range_min(&self) -> NaiveDate {
        self.range_min
    }

    #[must_use]
    pub const fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Pixel width of one tick (`base_unit_width × zoom`).
    #[must_use]
    pub const fn unit_width(&self) -> f64 {
        self.unit_width
    }

    /// Left edge, in content coordinates, of the tick containing `date`.
    #[must_use]
    pub fn date_to_x(&self, date: NaiveDate) -> f64 {
        let days = (date - self.range_min).num_days();
        days.div_euclid(self.resolution.increment_days()) as f64 * self.unit_width
    }

    /// Bar width for `start..end`, rounded up to whole ticks, at least one tick.
    #[must_use]
    pub fn interval_to_width(&self, start: NaiveDate, end: NaiveDate) -> f64 {
        let days = (end - start).num_days();
        let ticks = ceil_div(days, self.resolution.increment_days());
        (ticks as f64 * self.unit_width).max(self.unit_width)
    }

    /// First date of the tick under content coordinate `x`.
    #[must_use]
    pub fn x_to_date(&self, x: f64) -> NaiveDate {
        let tick = (x / self.unit_width).floor() as i64;
        tick.checked_mul(self.resolution.increment_days())
            .and_then(Duration::try_days)
            .and_then(|delta| self.range_min.checked_add_signed(delta))
            .unwrap_or(if tick < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
    }

    /// Content coordinate translated into the scrolled pane.
    #[must_use]
    pub fn pane_x(&self, x: f64) -> f64 {
        x - self.scroll_offset as f64
    }

    /// Whole-tick day delta for a horizontal drag of `delta_px`.
    #[must_use]
    pub fn pixels_to_days(&self, delta_px: f64) -> i64 {
        // `as` saturates out-of-range floats and maps NaN to 0.
        let ticks = (delta_px / self.unit_width).round() as i64;
        ticks.saturating_mul(self.resolution.increment_days())
    }
}

fn ceil_div(numerator: i64, denominator: i64) -> i64 {
    -(-numerator).div_euclid(denominator)
}
