//! Project and milestone records.
//!
//! Continuous projects carry no fixed end date; calculations use a rolling
//! effective horizon of `max(start + 2 years, today + 1 year)` so the
//! auto-estimate distribution always has a bounded working-day set.

use chrono::{Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::date_math::DateRange;
use crate::error::EngineError;

/// A fixed per-weekday opt-in set, Monday-first.
///
/// Used for a project's auto-estimate days: a weekday set to `false`
/// excludes that weekday from distribution even when the schedule marks it
/// as working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdaySet([bool; 7]);

impl WeekdaySet {
    /// Every weekday enabled.
    pub fn all() -> Self {
        Self([true; 7])
    }

    /// Every weekday disabled.
    pub fn none() -> Self {
        Self([false; 7])
    }

    pub fn contains(&self, weekday: Weekday) -> bool {
        self.0[weekday.num_days_from_monday() as usize]
    }

    pub fn set(&mut self, weekday: Weekday, enabled: bool) {
        self.0[weekday.num_days_from_monday() as usize] = enabled;
    }

    /// Builder-style variant of [`set`](Self::set).
    pub fn with(mut self, weekday: Weekday, enabled: bool) -> Self {
        self.set(weekday, enabled);
        self
    }

    /// Bitmask fingerprint (bit 0 = Monday).
    pub fn fingerprint(&self) -> u8 {
        self.0
            .iter()
            .enumerate()
            .fold(0u8, |acc, (i, on)| if *on { acc | (1 << i) } else { acc })
    }
}

impl Default for WeekdaySet {
    fn default() -> Self {
        Self::all()
    }
}

/// A project with a committed hour budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub estimated_hours: f64,
    #[serde(default)]
    pub continuous: bool,
    #[serde(default)]
    pub auto_estimate_days: WeekdaySet,
}

impl Project {
    /// Create a bounded project.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidProjectDates`] if `start_date` is after
    /// `end_date`.
    pub fn try_new(
        id: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        estimated_hours: f64,
    ) -> Result<Self, EngineError> {
        let id = id.into();
        if start_date > end_date {
            return Err(EngineError::InvalidProjectDates {
                id,
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            id,
            start_date,
            end_date,
            estimated_hours,
            continuous: false,
            auto_estimate_days: WeekdaySet::all(),
        })
    }

    /// Create a continuous project. The stored `end_date` is ignored by
    /// calculations in favor of the rolling horizon.
    pub fn continuous(
        id: impl Into<String>,
        start_date: NaiveDate,
        estimated_hours: f64,
    ) -> Self {
        Self {
            id: id.into(),
            start_date,
            end_date: start_date,
            estimated_hours,
            continuous: true,
            auto_estimate_days: WeekdaySet::all(),
        }
    }

    /// Restrict auto-estimate distribution to the given weekdays.
    pub fn with_auto_estimate_days(mut self, days: WeekdaySet) -> Self {
        self.auto_estimate_days = days;
        self
    }

    /// The end date used by calculations.
    ///
    /// Bounded projects use their own `end_date`; continuous projects use
    /// `max(start_date + 2 years, today + 1 year)`.
    pub fn effective_end(&self, today: NaiveDate) -> NaiveDate {
        if !self.continuous {
            return self.end_date;
        }
        let from_start = self
            .start_date
            .checked_add_months(Months::new(24))
            .unwrap_or(self.start_date);
        let from_today = today
            .checked_add_months(Months::new(12))
            .unwrap_or(today);
        from_start.max(from_today)
    }

    /// The full calculation horizon `[start_date, effective_end]`.
    pub fn horizon(&self, today: NaiveDate) -> DateRange {
        let end = self.effective_end(today).max(self.start_date);
        DateRange::new(self.start_date, end).expect("end is clamped to start")
    }
}

/// A milestone with an hour allocation distributed over its span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub project_id: String,
    pub due_date: NaiveDate,
    pub time_allocation_hours: f64,
}

impl Milestone {
    pub fn new(
        id: impl Into<String>,
        project_id: impl Into<String>,
        due_date: NaiveDate,
        time_allocation_hours: f64,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            due_date,
            time_allocation_hours,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn bounded_project_rejects_inverted_dates() {
        let err = Project::try_new("p1", date(2024, 2, 1), date(2024, 1, 1), 10.0);
        assert!(matches!(err, Err(EngineError::InvalidProjectDates { .. })));
    }

    #[test]
    fn continuous_horizon_takes_the_later_bound() {
        let project = Project::continuous("p1", date(2024, 1, 1), 100.0);
        // start + 2y = 2026-01-01, today + 1y = 2026-06-01.
        assert_eq!(
            project.effective_end(date(2025, 6, 1)),
            date(2026, 6, 1)
        );
        // Evaluated right at the start, start + 2y wins.
        assert_eq!(
            project.effective_end(date(2024, 1, 2)),
            date(2026, 1, 1)
        );
    }

    #[test]
    fn bounded_project_keeps_its_end() {
        let project = Project::try_new("p1", date(2024, 1, 1), date(2024, 3, 1), 10.0).unwrap();
        assert_eq!(project.effective_end(date(2030, 1, 1)), date(2024, 3, 1));
    }

    #[test]
    fn weekday_set_fingerprint_distinguishes_days() {
        let all = WeekdaySet::all();
        let no_friday = WeekdaySet::all().with(Weekday::Fri, false);
        assert_ne!(all.fingerprint(), no_friday.fingerprint());
        assert!(!no_friday.contains(Weekday::Fri));
        assert!(no_friday.contains(Weekday::Mon));
    }
}
