//! Per-date time allocation for a project.
//!
//! For each (project, date) pair exactly one allocation is produced:
//! planned hours from explicit calendar events, an auto-estimate share of
//! the remaining budget, or nothing. Planned time is ground truth and wins
//! over everything, including holidays and non-working days.
//!
//! Results are memoized in a bounded cache keyed by a structural tuple that
//! includes schedule, holiday, override, and weekday-set fingerprints, so a
//! changed input can never satisfy a stale key. The cache is still
//! explicitly clearable -- invalidation is caller-driven (settings edits
//! should call [`AllocationEngine::clear_cache`]) and eviction only ever
//! costs recomputation.

use std::collections::{HashMap, VecDeque};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::date_math::round_hours;
use crate::event::CalendarEvent;
use crate::project::Project;
use crate::schedule::ScheduleResolver;

/// Default bound on cached allocations.
const DEFAULT_CACHE_CAPACITY: usize = 4096;

/// Kind of allocation shown for a (project, date) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationKind {
    /// Hours committed via explicit calendar events.
    Planned,
    /// Evenly distributed share of the project budget.
    AutoEstimate,
    /// Nothing allocated on this date.
    None,
}

/// The allocation for one (project, date) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeAllocation {
    pub kind: AllocationKind,
    pub hours: f64,
    pub is_working_day: bool,
}

impl TimeAllocation {
    fn planned(hours: f64) -> Self {
        Self {
            kind: AllocationKind::Planned,
            hours,
            is_working_day: true,
        }
    }

    fn auto_estimate(hours: f64) -> Self {
        Self {
            kind: AllocationKind::AutoEstimate,
            hours,
            is_working_day: true,
        }
    }

    fn none(is_working_day: bool) -> Self {
        Self {
            kind: AllocationKind::None,
            hours: 0.0,
            is_working_day,
        }
    }
}

/// Structural memoization key.
///
/// Every input that can change the result is part of the key; a hand-built
/// concatenated string would risk collisions between ambiguous
/// serializations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AllocationKey {
    project_id: String,
    date: NaiveDate,
    estimated_hours_bits: u64,
    start_date: NaiveDate,
    effective_end: NaiveDate,
    schedule_fingerprint: u64,
    holiday_fingerprint: u64,
    override_fingerprint: u64,
    auto_days_fingerprint: u8,
}

/// Bounded FIFO memoization cache with explicit invalidation.
#[derive(Debug)]
pub struct AllocationCache {
    entries: HashMap<AllocationKey, TimeAllocation>,
    order: VecDeque<AllocationKey>,
    capacity: usize,
}

impl AllocationCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Drop every cached allocation for one project.
    pub fn invalidate_project(&mut self, project_id: &str) {
        self.entries.retain(|key, _| key.project_id != project_id);
        self.order.retain(|key| key.project_id != project_id);
    }

    fn get(&self, key: &AllocationKey) -> Option<&TimeAllocation> {
        self.entries.get(key)
    }

    fn insert(&mut self, key: AllocationKey, value: TimeAllocation) {
        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        if self.entries.insert(key.clone(), value).is_none() {
            self.order.push_back(key);
        }
    }
}

impl Default for AllocationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

/// Per-date allocation engine for projects.
pub struct AllocationEngine {
    resolver: ScheduleResolver,
    cache: AllocationCache,
}

impl AllocationEngine {
    pub fn new(resolver: ScheduleResolver) -> Self {
        Self {
            resolver,
            cache: AllocationCache::new(DEFAULT_CACHE_CAPACITY),
        }
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = AllocationCache::new(capacity);
        self
    }

    pub fn resolver(&self) -> &ScheduleResolver {
        &self.resolver
    }

    /// Mutable resolver access for schedule/holiday/override edits.
    /// Call [`clear_cache`](Self::clear_cache) afterwards to release stale
    /// entries.
    pub fn resolver_mut(&mut self) -> &mut ScheduleResolver {
        &mut self.resolver
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn invalidate_project(&mut self, project_id: &str) {
        self.cache.invalidate_project(project_id);
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// The allocation for one (project, date) pair.
    ///
    /// Decision order:
    /// 1. Planned event hours for the project win outright, even on
    ///    holidays and non-working days.
    /// 2. Non-working days get nothing.
    /// 3. Dates outside `[start, effective_end]` get nothing.
    /// 4. Working days excluded via `auto_estimate_days` get nothing.
    /// 5. Otherwise the date carries an even share of `estimated_hours`
    ///    over the project's whole auto-estimate day set.
    pub fn allocation_for(
        &mut self,
        project: &Project,
        date: NaiveDate,
        events: &[CalendarEvent],
        today: NaiveDate,
    ) -> TimeAllocation {
        let key = self.key_for(project, date, today);
        if let Some(hit) = self.cache.get(&key) {
            // Planned hours come from events, which are not part of the
            // key; recompute them cheaply and only trust the cache for the
            // schedule-derived outcome.
            let planned = planned_hours(project, date, events);
            if planned > 0.0 {
                return TimeAllocation::planned(planned);
            }
            if hit.kind != AllocationKind::Planned {
                return hit.clone();
            }
        }

        let allocation = self.compute(project, date, events, today);
        self.cache.insert(key, allocation.clone());
        allocation
    }

    fn compute(
        &self,
        project: &Project,
        date: NaiveDate,
        events: &[CalendarEvent],
        today: NaiveDate,
    ) -> TimeAllocation {
        let planned = planned_hours(project, date, events);
        if planned > 0.0 {
            return TimeAllocation::planned(planned);
        }

        if !self.resolver.is_working_day(date) {
            return TimeAllocation::none(false);
        }

        let horizon = project.horizon(today);
        if !horizon.contains(date) {
            return TimeAllocation::none(true);
        }

        let estimate_days = self.auto_estimate_days(project, today);
        if !estimate_days.contains(&date) {
            return TimeAllocation::none(true);
        }

        let hours = round_hours(project.estimated_hours / estimate_days.len() as f64);
        TimeAllocation::auto_estimate(hours)
    }

    /// The project's auto-estimate day set: working days across the whole
    /// horizon, minus weekdays opted out via `auto_estimate_days`.
    pub fn auto_estimate_days(&self, project: &Project, today: NaiveDate) -> Vec<NaiveDate> {
        let horizon = project.horizon(today);
        self.resolver
            .working_days_in_range(&horizon)
            .into_iter()
            .filter(|d| project.auto_estimate_days.contains(d.weekday()))
            .collect()
    }

    fn key_for(&self, project: &Project, date: NaiveDate, today: NaiveDate) -> AllocationKey {
        AllocationKey {
            project_id: project.id.clone(),
            date,
            estimated_hours_bits: project.estimated_hours.to_bits(),
            start_date: project.start_date,
            effective_end: project.effective_end(today),
            schedule_fingerprint: self.resolver.schedule_fingerprint(),
            holiday_fingerprint: self.resolver.holiday_fingerprint(),
            override_fingerprint: self.resolver.override_fingerprint(),
            auto_days_fingerprint: project.auto_estimate_days.fingerprint(),
        }
    }
}

fn planned_hours(project: &Project, date: NaiveDate, events: &[CalendarEvent]) -> f64 {
    round_hours(
        events
            .iter()
            .filter(|e| e.planned_for(&project.id))
            .map(|e| e.duration_on_date(date))
            .sum(),
    )
}
