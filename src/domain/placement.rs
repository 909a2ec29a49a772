//! AppBar rectangle calculations
//!
//! The shell negotiates AppBar space in two steps: a query that may move or
//! shrink the requested rectangle, and a set that reserves the final one.
//! This module computes the rectangle to request, repairs the docked
//! dimension after the query, and validates what the shell finally granted.
//!
//! All functions are pure; the orchestration lives in `app::controller`.

use crate::domain::core::Rect;
use crate::domain::edge::{Axis, ScreenEdge};

/// Smallest docked extent, in pixels, of a hidden auto-hide strip
///
/// A thinner strip could not be reached by the pointer.
pub const MIN_HIDDEN_EXTENT: i32 = 2;

/// Length of the monitor along the edge's anchored axis
fn anchored_length(rect: &Rect, edge: ScreenEdge) -> i32 {
    match edge.anchored_axis() {
        Axis::Horizontal => rect.width(),
        Axis::Vertical => rect.height(),
    }
}

/// Converts a margin in `(0, 1]` into a docked extent in pixels
///
/// The result is rounded to the nearest pixel, raised to `min_extent` and
/// never exceeds the monitor dimension.
pub fn docked_extent(monitor_length: i32, margin: f64, min_extent: i32) -> i32 {
    let extent = (f64::from(monitor_length) * margin).round() as i32;
    extent.max(min_extent).min(monitor_length)
}

/// Builds a rectangle of `extent` pixels anchored to `edge` of `monitor`
///
/// The docked-to edge keeps the monitor's coordinate, the opposite edge is
/// offset by `extent`, and the orthogonal dimension spans the monitor.
pub fn anchored_rect(edge: ScreenEdge, extent: i32, monitor: &Rect) -> Rect {
    let mut rect = *monitor;
    match edge {
        ScreenEdge::Left => rect.right = monitor.left + extent,
        ScreenEdge::Right => rect.left = monitor.right - extent,
        ScreenEdge::Top => rect.bottom = monitor.top + extent,
        ScreenEdge::Bottom => rect.top = monitor.bottom - extent,
    }
    rect
}

/// Rectangle to request for a bar docked to `edge` at `margin` of `monitor`
pub fn compute_desired_rect(edge: ScreenEdge, margin: f64, monitor: &Rect) -> Rect {
    let extent = docked_extent(anchored_length(monitor, edge), margin, 1);
    anchored_rect(edge, extent, monitor)
}

/// Rectangle for the hidden strip of an auto-hide bar
///
/// Same as [`compute_desired_rect`] but never thinner than
/// [`MIN_HIDDEN_EXTENT`].
pub fn compute_hidden_rect(edge: ScreenEdge, margin: f64, monitor: &Rect) -> Rect {
    let extent = docked_extent(anchored_length(monitor, edge), margin, MIN_HIDDEN_EXTENT);
    anchored_rect(edge, extent, monitor)
}

/// Restores the docked dimension after the shell answered a position query
///
/// The shell may move the anchored edge (for instance to make room for the
/// taskbar) and shrink the far side. The anchored edge the shell chose is
/// kept and the far edge is recomputed so the docked dimension matches
/// `desired` again. The orthogonal coordinates are taken from the shell.
pub fn reconcile_after_query(queried: &Rect, desired: &Rect, edge: ScreenEdge) -> Rect {
    let mut rect = *queried;
    match edge {
        ScreenEdge::Left => rect.right = queried.left + desired.width(),
        ScreenEdge::Right => rect.left = queried.right - desired.width(),
        ScreenEdge::Top => rect.bottom = queried.top + desired.height(),
        ScreenEdge::Bottom => rect.top = queried.bottom - desired.height(),
    }
    rect
}

/// Checks the rectangle reserved by the shell against the caller's intent
///
/// Accepted only if the docked dimension equals the desired one exactly and
/// the rectangle stays inside the monitor along the anchored axis. Anything
/// else means the requested margin could not be honoured.
pub fn is_accepted(granted: &Rect, desired: &Rect, monitor: &Rect, edge: ScreenEdge) -> bool {
    if !granted.is_valid() {
        return false;
    }

    match edge.anchored_axis() {
        Axis::Horizontal => {
            granted.width() == desired.width()
                && granted.left >= monitor.left
                && granted.right <= monitor.right
        }
        Axis::Vertical => {
            granted.height() == desired.height()
                && granted.top >= monitor.top
                && granted.bottom <= monitor.bottom
        }
    }
}

/// Resizes a docked window rectangle to a new extent without moving its anchor
///
/// Used for auto-hide transitions: the shell reservation is unchanged, only
/// the visible part of the window grows or shrinks. The edge touching the
/// screen edge stays where it is and the far edge never leaves `monitor`, so
/// a bar shifted inward (e.g. by a taskbar) ends up narrower than `extent`.
pub fn resize_docked(window: &Rect, edge: ScreenEdge, monitor: &Rect, extent: i32) -> Rect {
    let mut rect = *window;
    match edge {
        ScreenEdge::Left => rect.right = (window.left + extent).min(monitor.right),
        ScreenEdge::Right => rect.left = (window.right - extent).max(monitor.left),
        ScreenEdge::Top => rect.bottom = (window.top + extent).min(monitor.bottom),
        ScreenEdge::Bottom => rect.top = (window.bottom - extent).max(monitor.top),
    }
    rect
}

/// Docked extent for `margin` on `monitor`, honouring the hidden-strip floor when `hidden`
pub fn extent_for(edge: ScreenEdge, margin: f64, monitor: &Rect, hidden: bool) -> i32 {
    let floor = if hidden { MIN_HIDDEN_EXTENT } else { 1 };
    docked_extent(anchored_length(monitor, edge), margin, floor)
}
