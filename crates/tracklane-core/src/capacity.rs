//! Per-day capacity analysis.
//!
//! Sums clipped event/work-hour overlaps into allocated hours, reports
//! availability, and classifies utilization. Classification carries advisory
//! text only and never feeds back into the numbers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date_math::{overlap_minutes, round_hours};
use crate::event::CalendarEvent;
use crate::schedule::WorkHour;

/// Ceiling on reported allocated hours relative to capacity (110 %).
pub const OVERBOOK_TOLERANCE: f64 = 1.1;

/// Utilization classification for a day.
///
/// Display-only: the advisory text is for the UI, and no calculation reads
/// the level back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilizationLevel {
    /// Raw allocation exceeds capacity.
    Overbooked,
    /// More than 90 % of capacity allocated.
    High,
    /// 70-90 % allocated.
    Optimal,
    /// 50-70 % allocated.
    Moderate,
    /// Less than 50 % allocated.
    Low,
}

impl UtilizationLevel {
    /// Classify a raw (pre-cap) utilization percentage.
    pub fn from_utilization(pct: f64) -> Self {
        if pct > 100.0 {
            Self::Overbooked
        } else if pct > 90.0 {
            Self::High
        } else if pct >= 70.0 {
            Self::Optimal
        } else if pct >= 50.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Human-readable advisory text.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Overbooked => "Allocated time exceeds capacity; move work to another day",
            Self::High => "Nearly full; avoid adding more work",
            Self::Optimal => "Well utilized",
            Self::Moderate => "Room for more focused work",
            Self::Low => "Mostly free",
        }
    }
}

/// Capacity figures for one date.
///
/// `allocated_hours` is capped at `total_hours * 1.1`; the pre-cap value is
/// reflected only through `level`, which is classified before capping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayCapacity {
    pub date: NaiveDate,
    pub total_hours: f64,
    pub allocated_hours: f64,
    pub available_hours: f64,
    pub level: UtilizationLevel,
    /// Ids of events contributing allocated time on this date.
    pub overlapping_event_ids: Vec<String>,
}

impl DayCapacity {
    /// Allocated share of capacity in percent (0 when there is no capacity).
    pub fn utilization(&self) -> f64 {
        if self.total_hours == 0.0 {
            return 0.0;
        }
        self.allocated_hours / self.total_hours * 100.0
    }
}

/// Computes [`DayCapacity`] from concrete work hours and events.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapacityAnalyzer;

impl CapacityAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze one date.
    ///
    /// Allocated hours are the sum over (event, work-hour) pairs of the
    /// clipped interval overlap, rounded to two decimals, capped at
    /// `total * 1.1`. Available hours never go negative.
    pub fn analyze(
        &self,
        work_hours: &[WorkHour],
        events: &[CalendarEvent],
        date: NaiveDate,
    ) -> DayCapacity {
        let total_hours = round_hours(work_hours.iter().map(|wh| wh.duration_hours).sum());

        let mut overlap_total_minutes = 0i64;
        let mut overlapping_event_ids = Vec::new();
        for event in events {
            let mut event_minutes = 0i64;
            for wh in work_hours {
                event_minutes +=
                    overlap_minutes(event.start_time, event.end_time, wh.start, wh.end);
            }
            if event_minutes > 0 {
                overlap_total_minutes += event_minutes;
                overlapping_event_ids.push(event.id.clone());
            }
        }

        let raw_allocated = round_hours(overlap_total_minutes as f64 / 60.0);
        let cap = round_hours(total_hours * OVERBOOK_TOLERANCE);
        let allocated_hours = raw_allocated.min(cap);
        let available_hours = round_hours((total_hours - allocated_hours).max(0.0));

        let raw_utilization = if total_hours == 0.0 {
            0.0
        } else {
            raw_allocated / total_hours * 100.0
        };

        DayCapacity {
            date,
            total_hours,
            allocated_hours,
            available_hours,
            level: UtilizationLevel::from_utilization(raw_utilization),
            overlapping_event_ids,
        }
    }

    /// Forced-zero capacity for a holiday, without consulting any slots.
    pub fn holiday_capacity(&self, date: NaiveDate) -> DayCapacity {
        DayCapacity {
            date,
            total_hours: 0.0,
            allocated_hours: 0.0,
            available_hours: 0.0,
            level: UtilizationLevel::Low,
            overlapping_event_ids: Vec::new(),
        }
    }
}
