//! Metrics collection.
//!
//! # Metrics
//! - `pixelproof_submissions_total` (counter): submissions by mode, outcome
//! - `pixelproof_submission_duration_seconds` (histogram): time in `Uploading`
//! - `pixelproof_rejected_submits_total` (counter): guard rejections by reason
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; no exporter is installed here, so
//!   an embedding application decides where they go
//! - Label values come from fixed enums, never from user input

use std::time::Instant;

use ::metrics::{counter, histogram};

use crate::client::types::SubmitMode;

/// Record a finished submission. `outcome` is `success` or an error kind.
pub fn record_submission(mode: SubmitMode, outcome: &'static str, started: Instant) {
    counter!(
        "pixelproof_submissions_total",
        "mode" => mode.as_str(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!(
        "pixelproof_submission_duration_seconds",
        "mode" => mode.as_str()
    )
    .record(started.elapsed().as_secs_f64());
}

/// Record a `submit` call refused before any state change.
pub fn record_rejected_submit(mode: SubmitMode, reason: &'static str) {
    counter!(
        "pixelproof_rejected_submits_total",
        "mode" => mode.as_str(),
        "reason" => reason
    )
    .increment(1);
}
