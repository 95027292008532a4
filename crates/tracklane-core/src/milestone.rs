//! Milestone time distribution.
//!
//! Each milestone's hour allocation is spread evenly across the working
//! days of its span. Spans chain: a milestone's span starts the day after
//! the previous milestone's due date (or at the project start for the
//! first one) and ends on its own due date, inclusive.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::date_math::DateRange;
use crate::project::{Milestone, Project};
use crate::schedule::ScheduleResolver;

/// One day's share of a milestone's allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneDay {
    pub date: NaiveDate,
    pub estimated_hours: f64,
    /// True on the final distributed day of the span.
    pub is_deadline_day: bool,
    /// The milestone record, attached only on the deadline day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<Milestone>,
}

/// Spread milestone allocations across the working days of their spans.
///
/// When a resolver is supplied, span days are filtered exactly like the
/// allocation engine's auto-estimate set (schedule + holidays + the
/// project's weekday opt-outs); without one, every calendar day counts.
/// A span with no qualifying days contributes nothing.
pub fn distribute_milestones(
    project: &Project,
    milestones: &[Milestone],
    resolver: Option<&ScheduleResolver>,
) -> Vec<MilestoneDay> {
    let mut sorted: Vec<&Milestone> = milestones.iter().collect();
    sorted.sort_by_key(|m| m.due_date);

    let mut records = Vec::new();
    let mut span_start = project.start_date;

    for milestone in sorted {
        if milestone.due_date < span_start {
            // Due before the span even opens (duplicate due dates or a due
            // date before the project start): nothing to distribute.
            continue;
        }
        let span = DateRange::new(span_start, milestone.due_date)
            .expect("span start is never after due date here");
        span_start = milestone.due_date.succ_opt().unwrap_or(milestone.due_date);

        let days = span_days(project, &span, resolver);
        if days.is_empty() {
            continue;
        }

        let hours_per_day = milestone.time_allocation_hours / days.len() as f64;
        let last_index = days.len() - 1;
        for (index, date) in days.into_iter().enumerate() {
            let is_deadline_day = index == last_index;
            records.push(MilestoneDay {
                date,
                estimated_hours: hours_per_day,
                is_deadline_day,
                milestone: is_deadline_day.then(|| milestone.clone()),
            });
        }
    }

    records
}

fn span_days(
    project: &Project,
    span: &DateRange,
    resolver: Option<&ScheduleResolver>,
) -> Vec<NaiveDate> {
    match resolver {
        Some(resolver) => resolver
            .working_days_in_range(span)
            .into_iter()
            .filter(|d| project.auto_estimate_days.contains(d.weekday()))
            .collect(),
        None => span.days().collect(),
    }
}
