//! Batch processing: session configuration, parallel dispatch, reports.

pub mod report;
pub mod session;

/// Fixed cap on images per batch. Excess inputs are truncated, not
/// rejected, before any decode or metric computation begins.
pub const MAX_BATCH: usize = 10;
