//! Crosshair and snap-marker overlay.
//!
//! The overlay is three primitives positioned from the latest pointer sample.
//! Updating it never touches the grid or the document layers.

use serde::Serialize;

use crate::geometry::{Point, Rect, Segment};

/// Positions and visibility of the overlay primitives, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct OverlayState {
    /// Spans the visible width at the effective pointer y.
    pub horizontal: Segment,
    /// Spans the visible height at the effective pointer x.
    pub vertical: Segment,
    /// The pointer is over the canvas.
    pub pointer_inside: bool,
    pub marker: Point,
    pub marker_visible: bool,
}

/// A primitive ready for the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum OverlayPrimitive {
    CrosshairHorizontal(Segment),
    CrosshairVertical(Segment),
    SnapMarker(Point),
}

impl OverlayState {
    /// The primitives that should currently be drawn.
    pub fn primitives(&self, show_crosshair: bool) -> Vec<OverlayPrimitive> {
        let mut out = Vec::with_capacity(3);
        if show_crosshair && self.pointer_inside {
            out.push(OverlayPrimitive::CrosshairHorizontal(self.horizontal));
            out.push(OverlayPrimitive::CrosshairVertical(self.vertical));
        }
        if self.marker_visible {
            out.push(OverlayPrimitive::SnapMarker(self.marker));
        }
        out
    }

    /// Hide everything, keeping the last positions.
    pub fn hide(&mut self) {
        self.pointer_inside = false;
        self.marker_visible = false;
    }
}

/// Derives an `OverlayState` from each pointer sample.
#[derive(Debug, Clone, Default)]
pub struct OverlayTracker {
    state: OverlayState,
}

impl OverlayTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    /// Reposition the crosshair and marker.
    ///
    /// The crosshair follows the snapped point when there is one and the raw
    /// pointer otherwise.
    pub fn update(
        &mut self,
        pointer: Point,
        snap_result: Option<Point>,
        visible: Rect,
        snap_active: bool,
    ) -> OverlayState {
        let effective = snap_result.unwrap_or(pointer);

        self.state = OverlayState {
            horizontal: Segment::new(
                Point::new(visible.min.x, effective.y),
                Point::new(visible.max.x, effective.y),
            ),
            vertical: Segment::new(
                Point::new(effective.x, visible.min.y),
                Point::new(effective.x, visible.max.y),
            ),
            pointer_inside: true,
            marker: snap_result.unwrap_or(self.state.marker),
            marker_visible: snap_active && snap_result.is_some(),
        };
        self.state
    }

    pub fn hide(&mut self) {
        self.state.hide();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rect() -> Rect {
        Rect::from_bounds(-100.0, -50.0, 300.0, 250.0)
    }

    #[test]
    fn test_crosshair_spans_visible_rect() {
        let mut tracker = OverlayTracker::new();
        let state = tracker.update(Point::new(37.0, 12.0), None, rect(), true);

        assert_eq!(state.horizontal.start, Point::new(-100.0, 12.0));
        assert_eq!(state.horizontal.end, Point::new(300.0, 12.0));
        assert_eq!(state.vertical.start, Point::new(37.0, -50.0));
        assert_eq!(state.vertical.end, Point::new(37.0, 250.0));
        assert!(!state.marker_visible);
    }

    #[test]
    fn test_crosshair_follows_snapped_point() {
        let mut tracker = OverlayTracker::new();
        let snapped = Point::new(25.0, 0.0);
        let state = tracker.update(Point::new(24.0, 1.0), Some(snapped), rect(), true);

        assert_eq!(state.horizontal.start.y, 0.0);
        assert_eq!(state.vertical.start.x, 25.0);
        assert_eq!(state.marker, snapped);
        assert!(state.marker_visible);
    }

    #[test]
    fn test_marker_hidden_when_snap_inactive() {
        let mut tracker = OverlayTracker::new();
        let state = tracker.update(Point::new(24.0, 1.0), Some(Point::new(25.0, 0.0)), rect(), false);
        assert!(!state.marker_visible);
    }

    #[test]
    fn test_primitives_respect_crosshair_toggle() {
        let mut tracker = OverlayTracker::new();
        let state = tracker.update(Point::new(24.0, 1.0), Some(Point::new(25.0, 0.0)), rect(), true);

        assert_eq!(state.primitives(true).len(), 3);
        assert_eq!(
            state.primitives(false),
            vec![OverlayPrimitive::SnapMarker(Point::new(25.0, 0.0))]
        );
    }

    #[test]
    fn test_hide_removes_all_primitives() {
        let mut tracker = OverlayTracker::new();
        tracker.update(Point::new(24.0, 1.0), Some(Point::new(25.0, 0.0)), rect(), true);
        tracker.hide();
        assert!(tracker.state().primitives(true).is_empty());
    }
}
