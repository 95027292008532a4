//! Core error types for tracklane-core.
//!
//! The engine recovers locally wherever it can: missing or empty schedule
//! data degrades to "no capacity", and out-of-bounds drag results are
//! reported as [`RangeValidation`](crate::timeline::RangeValidation) values
//! rather than errors. Only constructors that would otherwise produce a
//! nonsensical value reject outright.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// Core error type for tracklane-core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// An inclusive date range with start after end.
    #[error("Invalid date range: start ({start}) must not be after end ({end})")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// A timestamp interval with end before start.
    #[error("Invalid time range: end ({end}) must not precede start ({start})")]
    InvalidTimeRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// A work slot whose wall-clock end precedes its start.
    #[error("Invalid work slot: end ({end}) precedes start ({start})")]
    InvalidSlot { start: NaiveTime, end: NaiveTime },

    /// A bounded project whose start date falls after its end date.
    #[error("Invalid project dates for '{id}': start ({start}) is after end ({end})")]
    InvalidProjectDates {
        id: String,
        start: NaiveDate,
        end: NaiveDate,
    },
}

/// Result type alias for EngineError.
pub type Result<T, E = EngineError> = std::result::Result<T, E>;
