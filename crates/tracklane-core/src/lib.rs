//! # Tracklane Core Library
//!
//! This library is the temporal capacity and allocation engine for the
//! Tracklane planning tool: given a project's hour budget, a weekly
//! availability schedule, holiday exclusions, and a log of calendar events,
//! it computes how much time is allocated or consumed per day, distributes
//! the remaining budget across qualifying working days, and keeps that
//! allocation consistent while the user drags items on a zoomable timeline.
//!
//! All computation is synchronous, single-threaded, and pure given
//! read-only inputs; the UI, persistence, and sync layers are external
//! collaborators that feed data in and apply the mutation proposals this
//! crate returns.
//!
//! ## Key Components
//!
//! - [`ScheduleResolver`]: working-day and work-hour resolution from a
//!   weekly schedule, holidays, and per-week overrides
//! - [`CapacityAnalyzer`]: per-day total/allocated/available hours and
//!   utilization classification
//! - [`AllocationEngine`]: planned / auto-estimate / none decision per
//!   (project, date), memoized with explicit invalidation
//! - [`distribute_milestones`]: even spread of milestone hours over span
//!   working days
//! - [`overlap`]: delete/split/trim proposals when tracked time hits
//!   planned events
//! - [`timeline`]: date-to-pixel mapping and the drag interaction engine

pub mod allocation;
pub mod capacity;
pub mod date_math;
pub mod error;
pub mod event;
pub mod milestone;
pub mod overlap;
pub mod planner;
pub mod project;
pub mod schedule;
pub mod timeline;

pub use allocation::{AllocationCache, AllocationEngine, AllocationKind, TimeAllocation};
pub use capacity::{CapacityAnalyzer, DayCapacity, UtilizationLevel, OVERBOOK_TOLERANCE};
pub use date_math::DateRange;
pub use error::{EngineError, Result};
pub use event::{CalendarEvent, EventCategory, EventKind};
pub use milestone::{distribute_milestones, MilestoneDay};
pub use overlap::{resolve_all, OverlapAction, SplitTail, MIN_VIABLE_MINUTES};
pub use planner::{CapacityPlanner, CapacityReport, HolidayImpact};
pub use project::{Milestone, Project, WeekdaySet};
pub use schedule::{
    Holiday, ScheduleResolver, WeekOverrideStore, WeeklySchedule, WorkHour, WorkSlot,
};
pub use timeline::{
    BarGeometry, DragCommit, DragInteractionEngine, DragKind, DragPreview, PointerThrottle,
    RangeValidation, Viewport, ZoomMode,
};
