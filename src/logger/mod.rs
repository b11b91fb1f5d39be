//! Activity logging: append-only JSONL with graceful degradation.
//!
//! Diagnostics go through `tracing`; this module records what a user did.

pub mod jsonl;
