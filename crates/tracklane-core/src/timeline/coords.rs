//! Date <-> pixel mapping for the zoomable timeline.
//!
//! Days mode renders one 40 px column per day. Weeks mode renders one 77 px
//! column per week at 11 px per day, so handles can still sit on exact day
//! positions inside a week column.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::date_math::days_between;

/// Column width in days mode (one day).
pub const DAY_COLUMN_WIDTH_PX: f64 = 40.0;
/// Column width in weeks mode (seven days).
pub const WEEK_COLUMN_WIDTH_PX: f64 = 77.0;
/// Per-day sub-resolution inside a weeks-mode column.
pub const WEEK_DAY_WIDTH_PX: f64 = 11.0;

/// Timeline zoom mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomMode {
    Days,
    Weeks,
}

impl ZoomMode {
    /// Horizontal pixels covered by one day.
    pub fn day_width_px(&self) -> f64 {
        match self {
            Self::Days => DAY_COLUMN_WIDTH_PX,
            Self::Weeks => WEEK_DAY_WIDTH_PX,
        }
    }

    /// Width of one rendered column.
    pub fn column_width_px(&self) -> f64 {
        match self {
            Self::Days => DAY_COLUMN_WIDTH_PX,
            Self::Weeks => WEEK_COLUMN_WIDTH_PX,
        }
    }
}

/// Ephemeral view state for the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub start_date: NaiveDate,
    pub mode: ZoomMode,
    pub total_width_px: f64,
}

impl Viewport {
    pub fn new(start_date: NaiveDate, mode: ZoomMode, total_width_px: f64) -> Self {
        Self {
            start_date,
            mode,
            total_width_px,
        }
    }

    /// Pixel offset of a date's column edge. Negative for dates before the
    /// viewport start.
    pub fn date_to_pixel(&self, date: NaiveDate) -> f64 {
        days_between(self.start_date, date) as f64 * self.mode.day_width_px()
    }

    /// The date whose column contains (or is nearest to) a pixel offset.
    pub fn pixel_to_date(&self, x: f64) -> NaiveDate {
        let days = (x / self.mode.day_width_px()).round() as i64;
        self.start_date + Duration::days(days)
    }

    /// Geometry for a baseline bar spanning `start..=end`.
    ///
    /// The bar clips to the viewport: when the range starts before the
    /// viewport the left edge pins to column 0 while the start handle keeps
    /// its true (possibly negative) offset; symmetric on the right.
    pub fn bar_geometry(&self, start: NaiveDate, end: NaiveDate) -> BarGeometry {
        let day_width = self.mode.day_width_px();
        let start_px = self.date_to_pixel(start);
        // Inclusive end date: the bar extends to the far edge of the end
        // day's cell.
        let end_px = self.date_to_pixel(end) + day_width;

        let clipped_start = start_px < 0.0;
        let clipped_end = end_px > self.total_width_px;
        let left_px = start_px.max(0.0);
        let right_px = end_px.min(self.total_width_px);

        BarGeometry {
            left_px,
            width_px: (right_px - left_px).max(0.0),
            start_handle_px: start_px,
            end_handle_px: end_px,
            clipped_start,
            clipped_end,
        }
    }
}

/// Rendered geometry of a timeline bar and its resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarGeometry {
    /// Left edge of the visible bar, clipped to the viewport.
    pub left_px: f64,
    /// Visible width, never negative.
    pub width_px: f64,
    /// True start offset, negative when the range begins off-screen.
    pub start_handle_px: f64,
    /// True end offset, beyond `total_width_px` when the range ends
    /// off-screen.
    pub end_handle_px: f64,
    pub clipped_start: bool,
    pub clipped_end: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn days_viewport() -> Viewport {
        Viewport::new(date(2024, 1, 1), ZoomMode::Days, 800.0)
    }

    #[test]
    fn days_mode_column_offsets() {
        let viewport = days_viewport();
        assert_eq!(viewport.date_to_pixel(date(2024, 1, 1)), 0.0);
        assert_eq!(viewport.date_to_pixel(date(2024, 1, 2)), 40.0);
        assert_eq!(viewport.date_to_pixel(date(2023, 12, 31)), -40.0);
    }

    #[test]
    fn weeks_mode_day_subresolution() {
        let viewport = Viewport::new(date(2024, 1, 1), ZoomMode::Weeks, 770.0);
        assert_eq!(viewport.date_to_pixel(date(2024, 1, 2)), 11.0);
        assert_eq!(viewport.date_to_pixel(date(2024, 1, 8)), 77.0);
    }

    #[test]
    fn pixel_date_round_trip() {
        for viewport in [
            days_viewport(),
            Viewport::new(date(2024, 1, 1), ZoomMode::Weeks, 770.0),
        ] {
            for offset in 0..30 {
                let d = date(2024, 1, 1) + Duration::days(offset);
                let px = viewport.date_to_pixel(d);
                assert_eq!(viewport.pixel_to_date(px), d);
                // Anywhere inside the same day cell maps back within a day.
                let wobble = viewport.mode.day_width_px() * 0.49;
                assert_eq!(viewport.pixel_to_date(px + wobble), d);
            }
        }
    }

    #[test]
    fn bar_clips_but_handles_keep_true_offsets() {
        let viewport = days_viewport();
        let geometry = viewport.bar_geometry(date(2023, 12, 28), date(2024, 1, 3));
        assert_eq!(geometry.left_px, 0.0);
        assert!(geometry.clipped_start);
        assert!(!geometry.clipped_end);
        assert_eq!(geometry.start_handle_px, -160.0);
        assert_eq!(geometry.end_handle_px, 120.0);
        assert_eq!(geometry.width_px, 120.0);
    }

    #[test]
    fn bar_clips_at_the_right_edge() {
        let viewport = days_viewport(); // 800 px = 20 day columns.
        let geometry = viewport.bar_geometry(date(2024, 1, 15), date(2024, 2, 15));
        assert!(geometry.clipped_end);
        assert_eq!(geometry.left_px, 560.0);
        assert_eq!(geometry.width_px, 240.0);
        assert!(geometry.end_handle_px > 800.0);
    }

    #[test]
    fn single_day_bar_is_one_column_wide() {
        let viewport = days_viewport();
        let geometry = viewport.bar_geometry(date(2024, 1, 5), date(2024, 1, 5));
        assert_eq!(geometry.width_px, 40.0);
    }
}
