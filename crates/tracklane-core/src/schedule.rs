//! Weekly work schedules, holidays, and working-day resolution.
//!
//! A [`WeeklySchedule`] maps each weekday to an ordered list of wall-clock
//! [`WorkSlot`]s. The [`ScheduleResolver`] turns the schedule plus a holiday
//! list (and any per-week overrides) into concrete answers: is a date a
//! working day, and which [`WorkHour`] intervals does it carry.
//!
//! An empty or missing schedule is not an error -- it simply yields no
//! working days and no capacity.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::date_math::{week_start, weekday_index, DateRange};
use crate::error::EngineError;

/// Short weekday labels, Monday-first, used for stable work-hour ids.
const WEEKDAY_LABELS: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

/// A wall-clock time slot owned by a weekly schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl WorkSlot {
    /// Create a slot.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidSlot`] if `end` precedes `start`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, EngineError> {
        if end < start {
            return Err(EngineError::InvalidSlot { start, end });
        }
        Ok(Self { start, end })
    }

    /// Slot length in hours, never negative even for malformed
    /// deserialized slots.
    pub fn duration_hours(&self) -> f64 {
        (self.end - self.start).num_minutes().max(0) as f64 / 60.0
    }
}

/// Weekly availability template: an ordered slot list per weekday.
///
/// Backed by a fixed Monday-first array, so every weekday is always
/// addressable and match-exhaustiveness is free.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    days: [Vec<WorkSlot>; 7],
}

impl WeeklySchedule {
    /// A schedule with no slots on any day.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Replace the slot list for one weekday.
    pub fn set_day(&mut self, weekday: Weekday, slots: Vec<WorkSlot>) {
        self.days[weekday.num_days_from_monday() as usize] = slots;
    }

    /// Builder-style variant of [`set_day`](Self::set_day).
    pub fn with_day(mut self, weekday: Weekday, slots: Vec<WorkSlot>) -> Self {
        self.set_day(weekday, slots);
        self
    }

    pub fn slots(&self, weekday: Weekday) -> &[WorkSlot] {
        &self.days[weekday.num_days_from_monday() as usize]
    }

    /// Total slot hours for one weekday.
    pub fn day_hours(&self, weekday: Weekday) -> f64 {
        self.slots(weekday)
            .iter()
            .map(WorkSlot::duration_hours)
            .sum()
    }

    /// Structural fingerprint for memoization keys.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.days.hash(&mut hasher);
        hasher.finish()
    }
}

/// An inclusive holiday range. Overrides the weekly schedule to
/// non-working for every date it covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Holiday {
    pub id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Holiday {
    /// Create a holiday range.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidRange`] if `start_date` is after
    /// `end_date`.
    pub fn new(
        id: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, EngineError> {
        if start_date > end_date {
            return Err(EngineError::InvalidRange {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            id: id.into(),
            start_date,
            end_date,
        })
    }

    /// Single-day holiday.
    pub fn single(id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            start_date: date,
            end_date: date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
            .expect("holiday constructor enforces start <= end")
    }
}

/// A date-concretized work slot.
///
/// Derived on demand and never persisted; the id is stable across calls
/// (`"<weekday>-<slot index>"`) so callers can diff successive results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkHour {
    pub id: String,
    pub date: NaiveDate,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub duration_hours: f64,
}

impl WorkHour {
    fn from_slot(date: NaiveDate, slot: &WorkSlot, index: usize) -> Self {
        let label = WEEKDAY_LABELS[weekday_index(date)];
        Self {
            id: format!("{label}-{index}"),
            date,
            start: date.and_time(slot.start),
            end: date.and_time(slot.start.max(slot.end)),
            duration_hours: slot.duration_hours(),
        }
    }
}

/// Per-week schedule overrides, keyed by the week's Monday.
///
/// Mutated only through explicit edit calls; there is no implicit
/// population. An override replaces the whole week's slot map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeekOverrideStore {
    overrides: HashMap<NaiveDate, WeeklySchedule>,
}

impl WeekOverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install an override for the week containing `date`.
    pub fn set_week(&mut self, date: NaiveDate, schedule: WeeklySchedule) {
        self.overrides.insert(week_start(date), schedule);
    }

    /// Remove the override for the week containing `date`.
    pub fn remove_week(&mut self, date: NaiveDate) -> Option<WeeklySchedule> {
        self.overrides.remove(&week_start(date))
    }

    pub fn get(&self, date: NaiveDate) -> Option<&WeeklySchedule> {
        self.overrides.get(&week_start(date))
    }

    pub fn clear(&mut self) {
        self.overrides.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// Order-independent structural fingerprint.
    pub fn fingerprint(&self) -> u64 {
        let mut entries: Vec<_> = self.overrides.iter().collect();
        entries.sort_by_key(|(week, _)| **week);
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        for (week, schedule) in entries {
            week.hash(&mut hasher);
            schedule.fingerprint().hash(&mut hasher);
        }
        hasher.finish()
    }
}

/// Resolves concrete working days and work hours from a weekly schedule,
/// a holiday list, and optional per-week overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleResolver {
    schedule: WeeklySchedule,
    holidays: Vec<Holiday>,
    #[serde(default)]
    overrides: WeekOverrideStore,
}

impl ScheduleResolver {
    pub fn new(schedule: WeeklySchedule, holidays: Vec<Holiday>) -> Self {
        Self {
            schedule,
            holidays,
            overrides: WeekOverrideStore::new(),
        }
    }

    pub fn schedule(&self) -> &WeeklySchedule {
        &self.schedule
    }

    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }

    pub fn overrides(&self) -> &WeekOverrideStore {
        &self.overrides
    }

    /// Explicit user edit: override the week containing `date`.
    pub fn override_week(&mut self, date: NaiveDate, schedule: WeeklySchedule) {
        self.overrides.set_week(date, schedule);
    }

    /// Explicit user edit: drop the override for the week containing `date`.
    pub fn clear_week_override(&mut self, date: NaiveDate) {
        self.overrides.remove_week(date);
    }

    /// The slot source for a date: week override if present, else the
    /// weekly schedule.
    fn effective_schedule(&self, date: NaiveDate) -> &WeeklySchedule {
        self.overrides.get(date).unwrap_or(&self.schedule)
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.iter().any(|h| h.contains(date))
    }

    /// A date is a working day when it is not inside any holiday range and
    /// its weekday's slots sum to more than zero hours.
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        if self.is_holiday(date) {
            return false;
        }
        self.effective_schedule(date).day_hours(date.weekday()) > 0.0
    }

    /// Concrete work hours for a date: empty on holidays, else one
    /// [`WorkHour`] per slot with ids stable across calls.
    pub fn work_hours_for(&self, date: NaiveDate) -> Vec<WorkHour> {
        if self.is_holiday(date) {
            return Vec::new();
        }
        self.effective_schedule(date)
            .slots(date.weekday())
            .iter()
            .enumerate()
            .map(|(index, slot)| WorkHour::from_slot(date, slot, index))
            .collect()
    }

    /// Total scheduled hours for a date (zero on holidays).
    pub fn day_hours(&self, date: NaiveDate) -> f64 {
        if self.is_holiday(date) {
            return 0.0;
        }
        self.effective_schedule(date).day_hours(date.weekday())
    }

    /// Inclusive scan of a range, keeping working days only.
    pub fn working_days_in_range(&self, range: &DateRange) -> Vec<NaiveDate> {
        range.days().filter(|d| self.is_working_day(*d)).collect()
    }

    /// Holidays whose ranges intersect the given range.
    pub fn holidays_in_range(&self, range: &DateRange) -> Vec<&Holiday> {
        self.holidays
            .iter()
            .filter(|h| h.range().intersects(range))
            .collect()
    }

    pub fn schedule_fingerprint(&self) -> u64 {
        self.schedule.fingerprint()
    }

    /// Fingerprint of the holiday set, insensitive to list order.
    pub fn holiday_fingerprint(&self) -> u64 {
        let mut sorted: Vec<_> = self.holidays.iter().collect();
        sorted.sort_by(|a, b| {
            (a.start_date, a.end_date, &a.id).cmp(&(b.start_date, b.end_date, &b.id))
        });
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        for holiday in sorted {
            holiday.hash(&mut hasher);
        }
        hasher.finish()
    }

    pub fn override_fingerprint(&self) -> u64 {
        self.overrides.fingerprint()
    }
}

/// Convenience builder for the common Mon-Fri single-slot schedule.
pub fn weekday_schedule(start: NaiveTime, end: NaiveTime) -> Result<WeeklySchedule, EngineError> {
    let slot = WorkSlot::new(start, end)?;
    let mut schedule = WeeklySchedule::empty();
    for weekday in [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ] {
        schedule.set_day(weekday, vec![slot]);
    }
    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn mon_fri_9_to_5() -> WeeklySchedule {
        weekday_schedule(time(9, 0), time(17, 0)).unwrap()
    }

    #[test]
    fn slot_rejects_inverted_times() {
        let err = WorkSlot::new(time(17, 0), time(9, 0));
        assert!(matches!(err, Err(EngineError::InvalidSlot { .. })));
    }

    #[test]
    fn weekday_with_slots_is_working() {
        let resolver = ScheduleResolver::new(mon_fri_9_to_5(), Vec::new());
        // 2024-01-01 is a Monday, 2024-01-06 a Saturday.
        assert!(resolver.is_working_day(date(2024, 1, 1)));
        assert!(!resolver.is_working_day(date(2024, 1, 6)));
    }

    #[test]
    fn holiday_overrides_schedule() {
        let holiday = Holiday::new("h1", date(2024, 1, 1), date(2024, 1, 2)).unwrap();
        let resolver = ScheduleResolver::new(mon_fri_9_to_5(), vec![holiday]);
        assert!(!resolver.is_working_day(date(2024, 1, 1)));
        assert!(!resolver.is_working_day(date(2024, 1, 2)));
        assert!(resolver.is_working_day(date(2024, 1, 3)));
        assert!(resolver.work_hours_for(date(2024, 1, 1)).is_empty());
    }

    #[test]
    fn work_hour_ids_are_stable() {
        let resolver = ScheduleResolver::new(mon_fri_9_to_5(), Vec::new());
        let first = resolver.work_hours_for(date(2024, 1, 1));
        let second = resolver.work_hours_for(date(2024, 1, 1));
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, "mon-0");
        assert_eq!(first[0].id, second[0].id);
        assert_eq!(first[0].duration_hours, 8.0);
    }

    #[test]
    fn working_days_scan_is_inclusive() {
        let resolver = ScheduleResolver::new(mon_fri_9_to_5(), Vec::new());
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 7)).unwrap();
        let days = resolver.working_days_in_range(&range);
        assert_eq!(days.len(), 5);
        assert_eq!(days[0], date(2024, 1, 1));
        assert_eq!(days[4], date(2024, 1, 5));
    }

    #[test]
    fn empty_schedule_has_no_working_days() {
        let resolver = ScheduleResolver::new(WeeklySchedule::empty(), Vec::new());
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        assert!(resolver.working_days_in_range(&range).is_empty());
        assert_eq!(resolver.day_hours(date(2024, 1, 1)), 0.0);
    }

    #[test]
    fn week_override_replaces_whole_week() {
        let mut resolver = ScheduleResolver::new(mon_fri_9_to_5(), Vec::new());
        // Saturday-only week for the week of 2024-01-01.
        let weekend_week = WeeklySchedule::empty()
            .with_day(Weekday::Sat, vec![WorkSlot::new(time(10, 0), time(14, 0)).unwrap()]);
        resolver.override_week(date(2024, 1, 3), weekend_week);

        assert!(!resolver.is_working_day(date(2024, 1, 1)));
        assert!(resolver.is_working_day(date(2024, 1, 6)));
        // Next week is untouched.
        assert!(resolver.is_working_day(date(2024, 1, 8)));

        resolver.clear_week_override(date(2024, 1, 3));
        assert!(resolver.is_working_day(date(2024, 1, 1)));
    }

    #[test]
    fn fingerprints_track_edits() {
        let mut resolver = ScheduleResolver::new(mon_fri_9_to_5(), Vec::new());
        let before = resolver.override_fingerprint();
        resolver.override_week(date(2024, 1, 1), WeeklySchedule::empty());
        assert_ne!(before, resolver.override_fingerprint());

        let a = ScheduleResolver::new(mon_fri_9_to_5(), Vec::new());
        let b = ScheduleResolver::new(mon_fri_9_to_5(), Vec::new());
        assert_eq!(a.schedule_fingerprint(), b.schedule_fingerprint());
    }

    #[test]
    fn holiday_fingerprint_is_order_independent() {
        let h1 = Holiday::single("h1", date(2024, 1, 1));
        let h2 = Holiday::single("h2", date(2024, 5, 1));
        let a = ScheduleResolver::new(mon_fri_9_to_5(), vec![h1.clone(), h2.clone()]);
        let b = ScheduleResolver::new(mon_fri_9_to_5(), vec![h2, h1]);
        assert_eq!(a.holiday_fingerprint(), b.holiday_fingerprint());
    }
}
