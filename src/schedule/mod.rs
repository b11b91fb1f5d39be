//! Schedule items consumed by the timeline, and their ingestion.

pub mod ingest;
pub mod item;
