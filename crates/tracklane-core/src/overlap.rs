//! Overlap resolution between tracked time and planned events.
//!
//! When a user tracks time over an interval, planned events in the way are
//! deleted, split, or trimmed. This module only decides; the proposals it
//! returns are applied by the collaborating event store.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::{CalendarEvent, EventKind};

/// Remnants shorter than this are discarded instead of kept.
pub const MIN_VIABLE_MINUTES: i64 = 6;

/// The proposed tail of a split event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitTail {
    /// Freshly generated id for the tail event.
    pub id: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

/// Proposed mutation of a planned event hit by a tracked interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OverlapAction {
    /// Tracking covers the whole event.
    Delete { event_id: String },
    /// Tracking lands strictly inside: truncate the original and, when the
    /// remainder is viable, create a tail event after the tracked interval.
    Split {
        event_id: String,
        new_end: NaiveDateTime,
        tail: Option<SplitTail>,
    },
    /// Tracking covers the start: push the event's start forward.
    TrimStart {
        event_id: String,
        new_start: NaiveDateTime,
    },
    /// Tracking covers the end: pull the event's end back.
    TrimEnd {
        event_id: String,
        new_end: NaiveDateTime,
    },
    /// The intervals do not touch.
    NoOverlap { event_id: String },
}

impl OverlapAction {
    pub fn is_no_overlap(&self) -> bool {
        matches!(self, Self::NoOverlap { .. })
    }
}

/// Decide how a tracked interval `[tracking_start, tracking_end)` mutates
/// one planned event.
///
/// Trims that would leave less than [`MIN_VIABLE_MINUTES`] degrade to
/// delete; a split tail below the threshold is silently discarded.
pub fn resolve(
    event: &CalendarEvent,
    tracking_start: NaiveDateTime,
    tracking_end: NaiveDateTime,
) -> OverlapAction {
    let event_id = event.id.clone();
    let (es, ee) = (event.start_time, event.end_time);

    if tracking_start <= es && tracking_end >= ee {
        return OverlapAction::Delete { event_id };
    }

    if tracking_start > es && tracking_end < ee {
        let tail_minutes = (ee - tracking_end).num_minutes();
        let tail = (tail_minutes >= MIN_VIABLE_MINUTES).then(|| SplitTail {
            id: Uuid::new_v4().to_string(),
            start_time: tracking_end,
            end_time: ee,
        });
        return OverlapAction::Split {
            event_id,
            new_end: tracking_start,
            tail,
        };
    }

    if tracking_start <= es && tracking_end > es {
        // Overlaps the start only.
        if (ee - tracking_end).num_minutes() < MIN_VIABLE_MINUTES {
            return OverlapAction::Delete { event_id };
        }
        return OverlapAction::TrimStart {
            event_id,
            new_start: tracking_end,
        };
    }

    if tracking_end >= ee && tracking_start < ee {
        // Overlaps the end only.
        if (tracking_start - es).num_minutes() < MIN_VIABLE_MINUTES {
            return OverlapAction::Delete { event_id };
        }
        return OverlapAction::TrimEnd {
            event_id,
            new_end: tracking_start,
        };
    }

    OverlapAction::NoOverlap { event_id }
}

/// Resolve a batch of events against one tracked interval.
///
/// Only planned events are considered, and no-overlap results are filtered
/// out of the proposal list.
pub fn resolve_all(
    events: &[CalendarEvent],
    tracking_start: NaiveDateTime,
    tracking_end: NaiveDateTime,
) -> Vec<OverlapAction> {
    events
        .iter()
        .filter(|e| e.kind == EventKind::Planned)
        .map(|e| resolve(e, tracking_start, tracking_end))
        .filter(|action| !action.is_no_overlap())
        .collect()
}
