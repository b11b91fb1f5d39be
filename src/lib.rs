#![forbid(unsafe_code)]

//! Planning Timeline (ptl): the Gantt engine of a production-tracking
//! application.
//!
//! Projects scheduled production orders onto a zoomable, scrollable calendar
//! grid at day, week or month resolution:
//! 1. **Range + grid**: padded date window, tick sequence and merged month header
//! 2. **Viewport**: one zoom/scroll state shared by the header and every row
//! 3. **Bars**: date→pixel projection, category colour, urgency and edit requests
//!
//! The engine performs no I/O; callers feed items in and persist the
//! [`timeline::bars::DateEditRequest`]s that come out.
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use planning_timeline::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use planning_timeline::core::config::Config;
//! use planning_timeline::timeline::view::TimelineView;
//! ```

pub mod prelude;

pub mod core;
pub mod logger;
pub mod schedule;
pub mod timeline;
