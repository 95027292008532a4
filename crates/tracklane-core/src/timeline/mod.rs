//! Timeline geometry and drag interaction.
//!
//! [`coords`] maps dates to pixels for the two zoom modes; [`drag`] turns
//! pointer deltas into validated date-range changes with snapping.

pub mod coords;
pub mod drag;

pub use coords::{BarGeometry, Viewport, ZoomMode};
pub use drag::{
    DragCommit, DragInteractionEngine, DragKind, DragPreview, DragState, PointerThrottle,
    RangeValidation,
};
