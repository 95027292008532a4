//! Multi-day capacity reporting.
//!
//! Aggregates the per-day analyzer over a date range and reports how
//! holidays cut into a project's working days.

use serde::{Deserialize, Serialize};

use crate::capacity::{CapacityAnalyzer, DayCapacity};
use crate::date_math::{round_hours, DateRange};
use crate::event::CalendarEvent;
use crate::project::Project;
use crate::schedule::{Holiday, ScheduleResolver};

use chrono::{Datelike, NaiveDate};

/// Aggregated capacity over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityReport {
    pub range: DateRange,
    pub days: Vec<DayCapacity>,
    pub total_hours: f64,
    pub allocated_hours: f64,
    pub available_hours: f64,
    /// Mean utilization over days with capacity, in percent.
    pub average_utilization: f64,
    pub working_day_count: usize,
}

/// How one holiday cuts into a project's range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolidayImpact {
    pub holiday: Holiday,
    /// The part of the holiday inside the project's range.
    pub overlap: DateRange,
    /// Days the holiday removes: dates that would be working per the
    /// weekly schedule were the holiday absent.
    pub working_days_removed: usize,
}

/// Range-level aggregation of [`CapacityAnalyzer`].
pub struct CapacityPlanner {
    resolver: ScheduleResolver,
    analyzer: CapacityAnalyzer,
}

impl CapacityPlanner {
    pub fn new(resolver: ScheduleResolver) -> Self {
        Self {
            resolver,
            analyzer: CapacityAnalyzer::new(),
        }
    }

    pub fn resolver(&self) -> &ScheduleResolver {
        &self.resolver
    }

    /// Per-day capacities plus aggregate totals for a range.
    ///
    /// Holiday days are forced to zero capacity without consulting slots.
    pub fn capacity_over_range(
        &self,
        range: &DateRange,
        events: &[CalendarEvent],
    ) -> CapacityReport {
        let days: Vec<DayCapacity> = range
            .days()
            .map(|date| self.day_capacity(date, events))
            .collect();

        let total_hours = round_hours(days.iter().map(|d| d.total_hours).sum());
        let allocated_hours = round_hours(days.iter().map(|d| d.allocated_hours).sum());
        let available_hours = round_hours(days.iter().map(|d| d.available_hours).sum());

        let with_capacity: Vec<&DayCapacity> =
            days.iter().filter(|d| d.total_hours > 0.0).collect();
        let average_utilization = if with_capacity.is_empty() {
            0.0
        } else {
            with_capacity.iter().map(|d| d.utilization()).sum::<f64>()
                / with_capacity.len() as f64
        };

        CapacityReport {
            range: *range,
            working_day_count: range
                .days()
                .filter(|d| self.resolver.is_working_day(*d))
                .count(),
            days,
            total_hours,
            allocated_hours,
            available_hours,
            average_utilization,
        }
    }

    fn day_capacity(&self, date: NaiveDate, events: &[CalendarEvent]) -> DayCapacity {
        if self.resolver.is_holiday(date) {
            return self.analyzer.holiday_capacity(date);
        }
        let work_hours = self.resolver.work_hours_for(date);
        self.analyzer.analyze(&work_hours, events, date)
    }

    /// Holidays intersecting a project's range, with the number of
    /// otherwise-working days each one removes.
    pub fn holiday_overlap(&self, project: &Project, today: NaiveDate) -> Vec<HolidayImpact> {
        let horizon = project.horizon(today);
        self.resolver
            .holidays_in_range(&horizon)
            .into_iter()
            .filter_map(|holiday| {
                let overlap = holiday.range().intersection(&horizon)?;
                let working_days_removed = overlap
                    .days()
                    .filter(|d| self.resolver.schedule().day_hours(d.weekday()) > 0.0)
                    .count();
                Some(HolidayImpact {
                    holiday: holiday.clone(),
                    overlap,
                    working_days_removed,
                })
            })
            .collect()
    }
}
