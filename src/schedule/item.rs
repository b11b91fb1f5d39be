//! Schedulable production items as the timeline sees them.
//!
//! Items are owned by the production-data collaborator; the timeline only
//! reads them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Production stage of an order, used as the default bar category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionStage {
    #[default]
    Planned,
    Cutting,
    Sewing,
    Finishing,
    QualityControl,
    Packing,
    Shipped,
}

impl ProductionStage {
    /// Stable kebab-case key for renderers and logs.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Cutting => "cutting",
            Self::Sewing => "sewing",
            Self::Finishing => "finishing",
            Self::QualityControl => "quality-control",
            Self::Packing => "packing",
            Self::Shipped => "shipped",
        }
    }
}

/// Status flags that drive bar coloring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScheduleFlags {
    /// A BOM component is short for this order.
    pub shortage: bool,
    /// An open problem is recorded against the order.
    pub problem: bool,
    /// Work on the order has started.
    pub in_progress: bool,
    /// Current production stage.
    pub stage: ProductionStage,
}

/// One scheduled work item (typically a production order).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    pub id: String,
    pub label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub flags: ScheduleFlags,
}

impl ScheduleItem {
    /// Build an item spanning `start..=end` with default flags.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            start_date,
            end_date,
            forecast_date: None,
            delivery_date: None,
            flags: ScheduleFlags::default(),
        }
    }

    #[must_use]
    pub fn with_forecast(mut self, date: NaiveDate) -> Self {
        self.forecast_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_delivery(mut self, date: NaiveDate) -> Self {
        self.delivery_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: ScheduleFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Every date that must fall inside the visible window.
    pub fn relevant_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        [self.start_date, self.end_date]
            .into_iter()
            .chain(self.forecast_date)
            .chain(self.delivery_date)
    }

    /// Date the order is due; delivery when known, otherwise the planned end.
    #[must_use]
    pub fn due_date(&self) -> NaiveDate {
        self.delivery_date.unwrap_or(self.end_date)
    }
}
