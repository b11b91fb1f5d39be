//! Visible date window derived from the item set.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::config::TimelineConfig;
use crate::schedule::item::ScheduleItem;

/// Inclusive `[min, max]` calendar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

impl DateRange {
    /// Build a range; bounds given in the wrong order are swapped.
    #[must_use]
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.min..=self.max).contains(&date)
    }

    /// Number of days from `min` to `max`.
    #[must_use]
    pub fn span_days(&self) -> i64 {
        (self.max - self.min).num_days()
    }
}

/// Padding and empty-set fallback applied when resolving a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangePolicy {
    pub padding_days: i64,
    pub fallback_half_window_days: i64,
}

impl Default for RangePolicy {
    fn default() -> Self {
        Self::from(&TimelineConfig::default())
    }
}

impl From<&TimelineConfig> for RangePolicy {
    fn from(cfg: &TimelineConfig) -> Self {
        Self {
            padding_days: i64::from(cfg.padding_days),
            fallback_half_window_days: i64::from(cfg.fallback_half_window_days),
        }
    }
}

/// Resolve the padded window covering every relevant date of every item.
///
/// With no items the window is `today ± fallback_half_window_days`.
#[must_use]
pub fn resolve_range(items: &[ScheduleItem], today: NaiveDate, policy: RangePolicy) -> DateRange {
    let bounds = items
        .iter()
        .flat_map(ScheduleItem::relevant_dates)
        .fold(None, |acc: Option<(NaiveDate, NaiveDate)>, date| {
            Some(acc.map_or((date, date), |(lo, hi)| (lo.min(date), hi.max(date))))
        });

    match bounds {
        Some((lo, hi)) => {
            let pad = Duration::days(policy.padding_days);
            DateRange::new(saturating_sub(lo, pad), saturating_add(hi, pad))
        }
        None => {
            let half = Duration::days(policy.fallback_half_window_days);
            DateRange::new(saturating_sub(today, half), saturating_add(today, half))
        }
    }
}

fn saturating_add(date: NaiveDate, delta: Duration) -> NaiveDate {
    date.checked_add_signed(delta).unwrap_or(NaiveDate::MAX)
}

fn saturating_sub(date: NaiveDate, delta: Duration) -> NaiveDate {
    date.checked_sub_signed(delta).unwrap_or(NaiveDate::MIN)
}
