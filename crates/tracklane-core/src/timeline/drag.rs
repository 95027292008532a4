//! Drag interaction state machine.
//!
//! Pointer-driven, caller-ticked: the engine holds at most one
//! [`DragState`] between pointer-down and pointer-up, converts pixel deltas
//! into whole-day deltas, and validates the resulting range on commit. A
//! new pointer-down replaces any in-flight drag (last-writer-wins).
//!
//! Days mode snaps only after cumulative movement comes within 30 % of a
//! column width of the next boundary, which keeps the bar from jittering
//! around day edges. Weeks mode tracks the pointer continuously for visual
//! smoothness while the committed value is still whole-day rounded.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::date_math::{days_between, DateRange};

use super::coords::{Viewport, ZoomMode};

/// Minimum range duration, in days, inclusive of both endpoints.
pub const MIN_PROJECT_DURATION_DAYS: i64 = 1;
/// Maximum committable range length in days.
pub const MAX_RANGE_DAYS: i64 = 365;
/// Fraction of a column width used as the snap hysteresis band.
pub const SNAP_THRESHOLD_RATIO: f64 = 0.3;

/// What the pointer grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragKind {
    Move,
    ResizeStart,
    ResizeEnd,
}

/// Ephemeral per-drag state, created at pointer-down and discarded at
/// pointer-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragState {
    pub kind: DragKind,
    pub origin_x: f64,
    pub original_start: NaiveDate,
    pub original_end: NaiveDate,
    /// Committed whole-day delta so far.
    pub day_delta: i64,
    /// Raw pixel offset for smooth rendering (weeks mode).
    pub visual_offset_px: f64,
}

impl DragState {
    fn is_point(&self) -> bool {
        self.original_start == self.original_end
    }
}

/// Preview emitted on every accepted pointer-move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragPreview {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub day_delta: i64,
    pub visual_offset_px: f64,
}

/// Validation outcome for a proposed range.
///
/// Invalid results carry a reason and, where possible, adjusted dates the
/// caller can snap to instead of silently failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeValidation {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjusted_start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjusted_end_date: Option<NaiveDate>,
}

impl RangeValidation {
    fn valid() -> Self {
        Self {
            is_valid: true,
            reason: None,
            adjusted_start_date: None,
            adjusted_end_date: None,
        }
    }

    fn invalid(
        reason: impl Into<String>,
        adjusted_start_date: Option<NaiveDate>,
        adjusted_end_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            is_valid: false,
            reason: Some(reason.into()),
            adjusted_start_date,
            adjusted_end_date,
        }
    }
}

/// Result of a committed drag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragCommit {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub day_delta: i64,
    pub validation: RangeValidation,
}

/// Validate a proposed date range against duration and bound limits.
pub fn validate_range(
    start: NaiveDate,
    end: NaiveDate,
    bounds: Option<&DateRange>,
) -> RangeValidation {
    if start > end {
        return RangeValidation::invalid("start date is after end date", Some(end), Some(start));
    }
    if days_between(start, end) > MAX_RANGE_DAYS {
        return RangeValidation::invalid(
            format!("range exceeds {MAX_RANGE_DAYS} days"),
            None,
            Some(start + Duration::days(MAX_RANGE_DAYS)),
        );
    }
    if let Some(bounds) = bounds {
        if start < bounds.start() || end > bounds.end() {
            return RangeValidation::invalid(
                "range is outside the allowed bounds",
                (start < bounds.start()).then(|| bounds.start()),
                (end > bounds.end()).then(|| bounds.end()),
            );
        }
    }
    RangeValidation::valid()
}

/// Pointer-delta to date-range drag engine.
pub struct DragInteractionEngine {
    viewport: Viewport,
    bounds: Option<DateRange>,
    state: Option<DragState>,
}

impl DragInteractionEngine {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            bounds: None,
            state: None,
        }
    }

    /// Constrain committed ranges to the given bounds.
    pub fn with_bounds(mut self, bounds: DateRange) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&DragState> {
        self.state.as_ref()
    }

    /// Begin a drag. Any in-flight drag is replaced.
    pub fn pointer_down(
        &mut self,
        kind: DragKind,
        pointer_x: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) {
        self.state = Some(DragState {
            kind,
            origin_x: pointer_x,
            original_start: start,
            original_end: end,
            day_delta: 0,
            visual_offset_px: 0.0,
        });
    }

    /// Process a pointer move. Returns the preview to render, or `None`
    /// when no drag is active or the delta is rejected (point events being
    /// resized).
    pub fn pointer_move(&mut self, pointer_x: f64) -> Option<DragPreview> {
        let viewport = self.viewport;
        let state = self.state.as_mut()?;

        let pixel_delta = pointer_x - state.origin_x;
        let day_delta = snapped_day_delta(viewport.mode, pixel_delta);

        let (start, end) = match apply_delta(state, day_delta) {
            Some(range) => range,
            None => return None,
        };

        state.day_delta = day_delta;
        state.visual_offset_px = match viewport.mode {
            // Snapped rendering: the bar sits on day boundaries.
            ZoomMode::Days => day_delta as f64 * viewport.mode.day_width_px(),
            // Continuous rendering while the commit stays whole-day.
            ZoomMode::Weeks => pixel_delta,
        };

        Some(DragPreview {
            start_date: start,
            end_date: end,
            day_delta,
            visual_offset_px: state.visual_offset_px,
        })
    }

    /// Commit the drag and discard its state.
    ///
    /// The returned dates are the proposal; when `validation.is_valid` is
    /// false the caller should snap back (or adopt the adjusted dates).
    pub fn pointer_up(&mut self, pointer_x: f64) -> Option<DragCommit> {
        let viewport = self.viewport;
        let state = self.state.take()?;

        let pixel_delta = pointer_x - state.origin_x;
        let day_delta = snapped_day_delta(viewport.mode, pixel_delta);
        let (start_date, end_date, day_delta) = match apply_delta(&state, day_delta) {
            Some((start, end)) => (start, end, day_delta),
            // Rejected delta (point event resized apart): commit unchanged.
            None => (state.original_start, state.original_end, 0),
        };

        Some(DragCommit {
            start_date,
            end_date,
            day_delta,
            validation: validate_range(start_date, end_date, self.bounds.as_ref()),
        })
    }

    /// Abandon an in-flight drag without committing.
    pub fn cancel(&mut self) {
        self.state = None;
    }
}

/// Convert a pixel delta into a whole-day delta.
///
/// Days mode holds the current snap until the pointer comes within
/// [`SNAP_THRESHOLD_RATIO`] of a column width of the next boundary; weeks
/// mode rounds to the nearest day.
fn snapped_day_delta(mode: ZoomMode, pixel_delta: f64) -> i64 {
    let day_width = mode.day_width_px();
    match mode {
        ZoomMode::Days => {
            let band = day_width * SNAP_THRESHOLD_RATIO;
            let magnitude = ((pixel_delta.abs() + band) / day_width).floor() as i64;
            if pixel_delta < 0.0 {
                -magnitude
            } else {
                magnitude
            }
        }
        ZoomMode::Weeks => (pixel_delta / day_width).round() as i64,
    }
}

/// Apply a day delta per operation kind.
///
/// Returns `None` when the delta is rejected outright (a point event being
/// resized apart). Resizes clamp so the range keeps at least
/// [`MIN_PROJECT_DURATION_DAYS`], with the opposite endpoint tracking if an
/// inversion would otherwise occur.
fn apply_delta(state: &DragState, day_delta: i64) -> Option<(NaiveDate, NaiveDate)> {
    let delta = Duration::days(day_delta);
    let (start, end) = (state.original_start, state.original_end);

    let range = match state.kind {
        DragKind::Move => (start + delta, end + delta),
        DragKind::ResizeStart => {
            let new_start = start + delta;
            if new_start > end {
                // Inversion: the end tracks to preserve minimum duration.
                (new_start, new_start)
            } else {
                (new_start, end)
            }
        }
        DragKind::ResizeEnd => {
            let new_end = end + delta;
            if new_end < start {
                (new_end, new_end)
            } else {
                (start, new_end)
            }
        }
    };

    if state.is_point() && range.0 != range.1 {
        return None;
    }
    Some(range)
}

/// Coalescing pointer-move throttle with a trailing debounce.
///
/// Move events arrive faster than the engine needs them; only the latest
/// position in each window is kept, and [`flush`](Self::flush) emits a
/// pending position after roughly one frame so the final commit reflects
/// the last pointer position. A newer move simply supersedes a pending one.
#[derive(Debug, Clone)]
pub struct PointerThrottle {
    min_interval_ms: u64,
    debounce_ms: u64,
    last_emit_ms: Option<u64>,
    pending_x: Option<f64>,
    pending_since_ms: u64,
}

impl PointerThrottle {
    /// Mode-appropriate rates: ~60 Hz in days mode, ~20 Hz in weeks mode,
    /// with a one-frame trailing debounce.
    pub fn for_mode(mode: ZoomMode) -> Self {
        let min_interval_ms = match mode {
            ZoomMode::Days => 16,
            ZoomMode::Weeks => 50,
        };
        Self {
            min_interval_ms,
            debounce_ms: 16,
            last_emit_ms: None,
            pending_x: None,
            pending_since_ms: 0,
        }
    }

    /// Offer a pointer position at `now_ms`. Returns the position to apply
    /// now, or `None` when it was coalesced into the pending slot.
    pub fn submit(&mut self, now_ms: u64, pointer_x: f64) -> Option<f64> {
        let due = match self.last_emit_ms {
            Some(last) => now_ms.saturating_sub(last) >= self.min_interval_ms,
            None => true,
        };
        if due {
            self.last_emit_ms = Some(now_ms);
            self.pending_x = None;
            Some(pointer_x)
        } else {
            self.pending_x = Some(pointer_x);
            self.pending_since_ms = now_ms;
            None
        }
    }

    /// Emit the pending position once the trailing debounce has elapsed.
    pub fn flush(&mut self, now_ms: u64) -> Option<f64> {
        let pending = self.pending_x?;
        if now_ms.saturating_sub(self.pending_since_ms) < self.debounce_ms {
            return None;
        }
        self.pending_x = None;
        self.last_emit_ms = Some(now_ms);
        Some(pending)
    }

    /// Drop any pending position (pointer-up or drag cancel).
    pub fn reset(&mut self) {
        self.last_emit_ms = None;
        self.pending_x = None;
    }
}
