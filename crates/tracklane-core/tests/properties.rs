//! Cross-module guarantees, exercised over generated inputs.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use proptest::prelude::*;

use tracklane_core::{
    distribute_milestones, overlap, AllocationEngine, AllocationKind, CalendarEvent,
    CapacityAnalyzer, DateRange, EventCategory, EventKind, Holiday, Milestone, Project,
    ScheduleResolver, Viewport, WeeklySchedule, WorkSlot, ZoomMode, OVERBOOK_TOLERANCE,
};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn mon_fri_resolver(holidays: Vec<Holiday>) -> ScheduleResolver {
    let slot = WorkSlot::new(
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
    )
    .unwrap();
    let mut schedule = WeeklySchedule::empty();
    for weekday in [
        chrono::Weekday::Mon,
        chrono::Weekday::Tue,
        chrono::Weekday::Wed,
        chrono::Weekday::Thu,
        chrono::Weekday::Fri,
    ] {
        schedule.set_day(weekday, vec![slot]);
    }
    ScheduleResolver::new(schedule, holidays)
}

proptest! {
    /// Reported allocation never exceeds capacity times the overbook
    /// tolerance, no matter how much event time piles onto one day.
    #[test]
    fn allocated_hours_respect_tolerance(
        starts in prop::collection::vec(0i64..20 * 60, 0..8),
        lengths in prop::collection::vec(1i64..12 * 60, 0..8),
    ) {
        let date = base_date();
        let day = date.and_hms_opt(0, 0, 0).unwrap();
        let events: Vec<CalendarEvent> = starts
            .iter()
            .zip(lengths.iter())
            .enumerate()
            .map(|(i, (start, len))| {
                CalendarEvent::new(
                    format!("e{i}"),
                    day + Duration::minutes(*start),
                    day + Duration::minutes(start + len),
                    EventCategory::Event,
                    EventKind::Planned,
                )
            })
            .collect();

        let resolver = mon_fri_resolver(Vec::new());
        let work_hours = resolver.work_hours_for(date);
        let capacity = CapacityAnalyzer::new().analyze(&work_hours, &events, date);

        prop_assert!(capacity.allocated_hours <= capacity.total_hours * OVERBOOK_TOLERANCE + 1e-9);
        prop_assert!(capacity.available_hours >= 0.0);
    }

    /// Every date inside a holiday range is non-working, whatever the
    /// schedule says.
    #[test]
    fn holidays_always_win(start_offset in 0i64..366, len in 0i64..30, probe in 0i64..30) {
        let start = base_date() + Duration::days(start_offset);
        let end = start + Duration::days(len);
        let holiday = Holiday::new("h", start, end).unwrap();
        let resolver = mon_fri_resolver(vec![holiday]);

        let inside = start + Duration::days(probe.min(len));
        prop_assert!(!resolver.is_working_day(inside));
        prop_assert!(resolver.work_hours_for(inside).is_empty());
    }

    /// A tracking interval that contains the event always proposes delete.
    #[test]
    fn containment_always_deletes(
        event_start in 0i64..24 * 60,
        event_len in 1i64..8 * 60,
        lead in 0i64..120,
        tail in 0i64..120,
    ) {
        let day = base_date().and_hms_opt(0, 0, 0).unwrap();
        let es = day + Duration::minutes(event_start);
        let ee = es + Duration::minutes(event_len);
        let event = CalendarEvent::new("e", es, ee, EventCategory::Event, EventKind::Planned);

        let action = overlap::resolve(
            &event,
            es - Duration::minutes(lead),
            ee + Duration::minutes(tail),
        );
        let is_delete = matches!(action, overlap::OverlapAction::Delete { .. });
        prop_assert!(is_delete);
    }

    /// date -> pixel -> date round-trips exactly on day-aligned values in
    /// both zoom modes.
    #[test]
    fn pixel_mapping_round_trips(offset in -200i64..400, weeks_mode in any::<bool>()) {
        let mode = if weeks_mode { ZoomMode::Weeks } else { ZoomMode::Days };
        let viewport = Viewport::new(base_date(), mode, 800.0);
        let date = base_date() + Duration::days(offset);

        let px = viewport.date_to_pixel(date);
        prop_assert_eq!(viewport.pixel_to_date(px), date);
        // And a second trip through the mapping is stable.
        prop_assert_eq!(viewport.date_to_pixel(viewport.pixel_to_date(px)), px);
    }

    /// Milestone distribution conserves the allocated hours whenever the
    /// span has any qualifying days.
    #[test]
    fn milestone_hours_are_conserved(span_days in 0i64..60, hours in 0.5f64..200.0) {
        let project = Project::try_new(
            "p",
            base_date(),
            base_date() + Duration::days(90),
            100.0,
        )
        .unwrap();
        let due = base_date() + Duration::days(span_days);
        let milestones = vec![Milestone::new("m", "p", due, hours)];
        let resolver = mon_fri_resolver(Vec::new());

        let records = distribute_milestones(&project, &milestones, Some(&resolver));
        if !records.is_empty() {
            let total: f64 = records.iter().map(|r| r.estimated_hours).sum();
            prop_assert!((total - hours).abs() < 1e-6);
        }
    }

    /// The allocation engine never emits planned with zero hours, and
    /// never auto-estimates on an excluded weekday.
    #[test]
    fn allocation_kind_invariants(day_offset in 0i64..40) {
        let mut engine = AllocationEngine::new(mon_fri_resolver(Vec::new()));
        let project = Project::try_new(
            "p",
            base_date(),
            base_date() + Duration::days(30),
            60.0,
        )
        .unwrap()
        .with_auto_estimate_days(
            tracklane_core::WeekdaySet::all().with(chrono::Weekday::Wed, false),
        );

        let date = base_date() + Duration::days(day_offset);
        let allocation = engine.allocation_for(&project, date, &[], base_date());

        if allocation.kind == AllocationKind::Planned {
            prop_assert!(allocation.hours > 0.0);
        }
        if date.weekday() == Weekday::Wed {
            prop_assert_ne!(allocation.kind, AllocationKind::AutoEstimate);
        }
    }
}

#[test]
fn forty_hours_over_five_working_days_is_eight_per_day() {
    let mut engine = AllocationEngine::new(mon_fri_resolver(Vec::new()));
    let project = Project::try_new(
        "p",
        base_date(),
        base_date() + Duration::days(4),
        40.0,
    )
    .unwrap();

    for offset in 0..5 {
        let allocation =
            engine.allocation_for(&project, base_date() + Duration::days(offset), &[], base_date());
        assert_eq!(allocation.kind, AllocationKind::AutoEstimate);
        assert_eq!(allocation.hours, 8.0);
    }
}

#[test]
fn working_day_scan_matches_direct_checks() {
    let holiday = Holiday::new(
        "h",
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
    )
    .unwrap();
    let resolver = mon_fri_resolver(vec![holiday]);
    let range = DateRange::new(base_date(), base_date() + Duration::days(20)).unwrap();

    for day in range.days() {
        let in_scan = resolver.working_days_in_range(&range).contains(&day);
        assert_eq!(in_scan, resolver.is_working_day(day));
    }
}
