//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use planning_timeline::prelude::*;
//! ```

// Core
pub use crate::core::config::{Config, TimelineConfig};
pub use crate::core::errors::{PtlError, Result};

// Schedule
pub use crate::schedule::ingest::{
    IngestReport, RawScheduleItem, RejectedItem, ingest, ingest_json,
};
pub use crate::schedule::item::{ProductionStage, ScheduleFlags, ScheduleItem};

// Timeline
pub use crate::timeline::bars::{
    BarCategory, BarGeometry, BarInteraction, DateEditRequest, DateEditSink,
};
pub use crate::timeline::clock::{Clock, FixedClock, SystemClock};
pub use crate::timeline::grid::{GridSpec, GridTick};
pub use crate::timeline::months::MonthSpan;
pub use crate::timeline::projection::Projection;
pub use crate::timeline::range::DateRange;
pub use crate::timeline::resolution::Resolution;
pub use crate::timeline::today::TodayMarker;
pub use crate::timeline::view::{TimelineFrame, TimelineView};
pub use crate::timeline::viewport::{Pane, ViewportMsg, ViewportState, ZoomScrollController};
