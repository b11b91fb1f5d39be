//! Grid generation: the ordered tick dates spanning a range.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::timeline::range::DateRange;
use crate::timeline::resolution::Resolution;

/// One grid column, anchored to a date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridTick {
    pub date: NaiveDate,
    /// Left edge of the column in content coordinates.
    pub pixel_offset: f64,
}

/// Inputs that fully determine a grid; iterate it as often as needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub range: DateRange,
    pub resolution: Resolution,
    pub unit_width: f64,
}

impl GridSpec {
    #[must_use]
    pub const fn new(range: DateRange, resolution: Resolution, unit_width: f64) -> Self {
        Self {
            range,
            resolution,
            unit_width,
        }
    }

    /// Fresh iterator from `range.min`.
    #[must_use]
    pub fn ticks(&self) -> GridTicks {
        GridTicks {
            next: Some(self.range.min),
            max: self.range.max,
            step: Duration::days(self.resolution.increment_days()),
            index: 0,
            unit_width: self.unit_width,
        }
    }

    /// Number of ticks the grid holds.
    #[must_use]
    pub fn len(&self) -> usize {
        let steps = self
            .range
            .span_days()
            .div_euclid(self.resolution.increment_days());
        usize::try_from(steps).map_or(0, |n| n + 1)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Iterator over ticks from `range.min` to `range.max` inclusive.
#[derive(Debug, Clone)]
pub struct GridTicks {
    next: Option<NaiveDate>,
    max: NaiveDate,
    step: Duration,
    index: usize,
    unit_width: f64,
}

impl Iterator for GridTicks {
    type Item = GridTick;

    fn next(&mut self) -> Option<Self::Item> {
        let date = self.next.filter(|d| *d <= self.max)?;
        let tick = GridTick {
            date,
            pixel_offset: self.index as f64 * self.unit_width,
        };
        self.index += 1;
        self.next = date.checked_add_signed(self.step);
        Some(tick)
    }
}

/// Materialize the grid for one render pass.
#[must_use]
pub fn generate_grid(range: DateRange, resolution: Resolution, unit_width: f64) -> Vec<GridTick> {
    GridSpec::new(range, resolution, unit_width).ticks().collect()
}
