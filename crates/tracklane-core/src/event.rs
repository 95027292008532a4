//! Calendar event model.
//!
//! Events are owned by the collaborating store; the engine reads them and
//! proposes mutations (see [`crate::overlap`]). The one piece of temporal
//! logic that lives here is [`CalendarEvent::duration_on_date`], which clamps
//! midnight-crossing events to the day under inspection.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::date_math::{day_bounds, overlap_minutes, round_hours};
use crate::error::EngineError;

/// Category of a calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Habit,
    Task,
    Event,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Habit => "habit",
            Self::Task => "task",
            Self::Event => "event",
        }
    }

    /// Whether hours in this category count as planned project time.
    /// Habits and standalone tasks do not.
    pub fn counts_as_planned(&self) -> bool {
        matches!(self, Self::Event)
    }
}

/// Lifecycle kind of a calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Planned,
    Tracked,
    Completed,
}

/// A calendar event as supplied by the collaborating store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub category: EventCategory,
    #[serde(default)]
    pub completed: bool,
    pub kind: EventKind,
}

impl CalendarEvent {
    /// Create a new event.
    ///
    /// # Panics
    /// Panics if `end_time` precedes `start_time`. Use
    /// [`try_new`](Self::try_new) for a non-panicking version.
    pub fn new(
        id: impl Into<String>,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        category: EventCategory,
        kind: EventKind,
    ) -> Self {
        Self::try_new(id, start_time, end_time, category, kind)
            .expect("CalendarEvent::new: end_time must not precede start_time")
    }

    /// Create a new event, returning a Result.
    ///
    /// # Errors
    /// Returns an error if `end_time` precedes `start_time`.
    pub fn try_new(
        id: impl Into<String>,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        category: EventCategory,
        kind: EventKind,
    ) -> Result<Self, EngineError> {
        if end_time < start_time {
            return Err(EngineError::InvalidTimeRange {
                start: start_time,
                end: end_time,
            });
        }
        Ok(Self {
            id: id.into(),
            project_id: None,
            start_time,
            end_time,
            category,
            completed: false,
            kind,
        })
    }

    /// Attribute the event to a project.
    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Mark as completed.
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes().max(0)
    }

    pub fn duration_hours(&self) -> f64 {
        round_hours(self.duration_minutes() as f64 / 60.0)
    }

    /// Check if this event overlaps a half-open interval.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start_time < end && self.end_time > start
    }

    /// Hours of this event falling on the given calendar date.
    ///
    /// Midnight-crossing events are clamped to the day's bounds, so a
    /// 22:00-02:00 event contributes 2.0 h to each of its two days.
    pub fn duration_on_date(&self, date: NaiveDate) -> f64 {
        let (day_start, day_end) = day_bounds(date);
        let minutes = overlap_minutes(self.start_time, self.end_time, day_start, day_end);
        round_hours(minutes as f64 / 60.0)
    }

    /// Whether this event's hours count as planned time for `project_id`.
    pub fn planned_for(&self, project_id: &str) -> bool {
        self.category.counts_as_planned() && self.project_id.as_deref() == Some(project_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn rejects_inverted_times() {
        let err = CalendarEvent::try_new(
            "e1",
            dt(2024, 1, 1, 10, 0),
            dt(2024, 1, 1, 9, 0),
            EventCategory::Event,
            EventKind::Planned,
        );
        assert!(matches!(err, Err(EngineError::InvalidTimeRange { .. })));
    }

    #[test]
    fn midnight_crossing_splits_across_days() {
        let event = CalendarEvent::new(
            "e1",
            dt(2024, 1, 1, 22, 0),
            dt(2024, 1, 2, 2, 0),
            EventCategory::Event,
            EventKind::Planned,
        );
        assert_eq!(event.duration_on_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()), 2.0);
        assert_eq!(event.duration_on_date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()), 2.0);
        assert_eq!(event.duration_on_date(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()), 0.0);
    }

    #[test]
    fn habit_and_task_hours_are_not_planned_time() {
        let base = |category| {
            CalendarEvent::new(
                "e1",
                dt(2024, 1, 1, 9, 0),
                dt(2024, 1, 1, 10, 0),
                category,
                EventKind::Planned,
            )
            .with_project("p1")
        };
        assert!(base(EventCategory::Event).planned_for("p1"));
        assert!(!base(EventCategory::Habit).planned_for("p1"));
        assert!(!base(EventCategory::Task).planned_for("p1"));
        assert!(!base(EventCategory::Event).planned_for("p2"));
    }

    #[test]
    fn event_serialization_round_trips() {
        let event = CalendarEvent::new(
            "e1",
            dt(2024, 1, 1, 9, 0),
            dt(2024, 1, 1, 10, 0),
            EventCategory::Event,
            EventKind::Tracked,
        )
        .with_project("p1")
        .with_completed(true);

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"tracked\""));
        let decoded: CalendarEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn overlap_is_half_open() {
        let event = CalendarEvent::new(
            "e1",
            dt(2024, 1, 1, 9, 0),
            dt(2024, 1, 1, 10, 0),
            EventCategory::Event,
            EventKind::Planned,
        );
        assert!(event.overlaps(dt(2024, 1, 1, 9, 30), dt(2024, 1, 1, 11, 0)));
        assert!(!event.overlaps(dt(2024, 1, 1, 10, 0), dt(2024, 1, 1, 11, 0)));
    }
}
