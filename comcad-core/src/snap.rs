//! Grid snapping with a pixel-space tolerance.
//!
//! Candidates are the nearest grid intersection, found by rounding each
//! coordinate to a multiple of the minor spacing. Ties round half away from
//! zero (`f64::round`), so a raw coordinate of exactly `spacing / 2` snaps to
//! `spacing` and `-spacing / 2` snaps to `-spacing`.
//!
//! Distance is measured in pixels with the Manhattan metric `|dx| + |dy|`.

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_SNAP_TOLERANCE_PX;
use crate::error::{CadError, Result};
use crate::geometry::Point;
use crate::grid::GridSpec;
use crate::view::ViewTransform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapMode {
    None,
    #[default]
    Grid,
}

/// User-facing snap settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapSettings {
    pub enabled: bool,
    pub mode: SnapMode,
    pub tolerance_px: f64,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: SnapMode::Grid,
            tolerance_px: DEFAULT_SNAP_TOLERANCE_PX,
        }
    }
}

impl SnapSettings {
    /// True when grid snapping should be attempted at all.
    pub fn is_active(&self) -> bool {
        self.enabled && self.mode == SnapMode::Grid
    }
}

/// Round each coordinate of `raw` to the nearest grid multiple.
pub fn grid_candidate(raw: Point, grid: &GridSpec) -> Point {
    let spacing = grid.minor_spacing();
    Point::new(
        (raw.x / spacing).round() * spacing,
        (raw.y / spacing).round() * spacing,
    )
}

/// Snap `raw` to the grid if the candidate lies within `tolerance_px` pixels.
pub fn snap(
    raw: Point,
    grid: &GridSpec,
    view: &ViewTransform,
    tolerance_px: f64,
) -> Option<Point> {
    let candidate = grid_candidate(raw, grid);
    let distance = view
        .world_to_pixel(candidate)
        .manhattan_distance(view.world_to_pixel(raw));

    if distance <= tolerance_px {
        Some(candidate)
    } else {
        None
    }
}

/// Snap settings plus the most recent successful snap.
#[derive(Debug, Clone, Default)]
pub struct SnapState {
    settings: SnapSettings,
    last_snap_point: Option<Point>,
}

impl SnapState {
    pub fn new(settings: SnapSettings) -> Self {
        Self {
            settings,
            last_snap_point: None,
        }
    }

    pub fn settings(&self) -> &SnapSettings {
        &self.settings
    }

    pub fn last_snap_point(&self) -> Option<Point> {
        self.last_snap_point
    }

    pub fn is_active(&self) -> bool {
        self.settings.is_active()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.settings.enabled = enabled;
        if !enabled {
            self.last_snap_point = None;
        }
    }

    pub fn set_mode(&mut self, mode: SnapMode) {
        self.settings.mode = mode;
        if mode == SnapMode::None {
            self.last_snap_point = None;
        }
    }

    /// Change the tolerance; negative or non-finite values are rejected.
    pub fn set_tolerance(&mut self, tolerance_px: f64) -> Result<()> {
        if !tolerance_px.is_finite() || tolerance_px < 0.0 {
            return Err(CadError::InvalidTolerance { tolerance_px });
        }
        self.settings.tolerance_px = tolerance_px;
        Ok(())
    }

    /// Run the snap for a new pointer position and remember the outcome.
    ///
    /// Returns immediately without touching the geometry when snapping is
    /// disabled or the mode is `None`.
    pub fn update(&mut self, raw: Point, grid: &GridSpec, view: &ViewTransform) -> Option<Point> {
        self.last_snap_point = if self.settings.is_active() {
            snap(raw, grid, view, self.settings.tolerance_px)
        } else {
            None
        };
        self.last_snap_point
    }

    /// Forget the last snap point (pointer left the canvas).
    pub fn clear(&mut self) {
        self.last_snap_point = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vector;

    fn unit_view() -> ViewTransform {
        ViewTransform::new(800.0, 600.0)
    }

    fn grid() -> GridSpec {
        GridSpec::new(25.0, 5).unwrap()
    }

    #[test]
    fn test_candidate_rounds_to_nearest_multiple() {
        let candidate = grid_candidate(Point::new(37.0, 12.0), &grid());
        assert_eq!(candidate, Point::new(25.0, 0.0));
    }

    #[test]
    fn test_candidate_ties_round_away_from_zero() {
        let candidate = grid_candidate(Point::new(12.5, -12.5), &grid());
        assert_eq!(candidate, Point::new(25.0, -25.0));
    }

    #[test]
    fn test_far_point_does_not_snap() {
        // |37-25| + |12-0| = 24 > 14
        assert_eq!(snap(Point::new(37.0, 12.0), &grid(), &unit_view(), 14.0), None);
    }

    #[test]
    fn test_near_point_snaps() {
        // |24-25| + |1-0| = 2 <= 14
        assert_eq!(
            snap(Point::new(24.0, 1.0), &grid(), &unit_view(), 14.0),
            Some(Point::new(25.0, 0.0))
        );
    }

    #[test]
    fn test_distance_on_tolerance_boundary_snaps() {
        // |32-25| + |7-0| = 14
        assert_eq!(
            snap(Point::new(32.0, 7.0), &grid(), &unit_view(), 14.0),
            Some(Point::new(25.0, 0.0))
        );
    }

    #[test]
    fn test_tolerance_measured_in_pixels() {
        // 2 world units of offset: 8px at scale 4, 16px at scale 8.
        let zoomed = unit_view().with_scale(4.0, Vector::ZERO).unwrap();
        assert_eq!(snap(Point::new(24.0, 1.0), &grid(), &zoomed, 14.0), Some(Point::new(25.0, 0.0)));
        let far = unit_view().with_scale(0.25, Vector::ZERO).unwrap();
        assert_eq!(snap(Point::new(37.0, 12.0), &grid(), &far, 14.0), Some(Point::new(25.0, 0.0)));
        let near = unit_view().with_scale(8.0, Vector::ZERO).unwrap();
        assert_eq!(snap(Point::new(24.0, 1.0), &grid(), &near, 14.0), None);
    }

    #[test]
    fn test_snap_is_idempotent() {
        let view = unit_view();
        for (x, y) in [(0.0, 0.0), (25.0, -50.0), (-125.0, 75.0), (1000.0, 2500.0)] {
            let p = Point::new(x, y);
            assert_eq!(snap(p, &grid(), &view, 0.0), Some(p));
            let snapped = snap(Point::new(x + 3.0, y - 2.0), &grid(), &view, 14.0).unwrap();
            assert_eq!(snap(snapped, &grid(), &view, 14.0), Some(snapped));
        }
    }

    #[test]
    fn test_tolerance_monotonicity() {
        let view = unit_view().with_scale(1.7, Vector::new(13.0, -4.0)).unwrap();
        let points = [
            Point::new(37.0, 12.0),
            Point::new(24.0, 1.0),
            Point::new(-61.3, 88.8),
            Point::new(12.4, 12.6),
        ];
        let tolerances = [0.0, 1.0, 5.0, 14.0, 30.0, 60.0, 1e6];
        for p in points {
            let mut snapped_before = false;
            for tolerance in tolerances {
                let snapped = snap(p, &grid(), &view, tolerance).is_some();
                assert!(!snapped_before || snapped, "{:?} lost snap at {}", p, tolerance);
                snapped_before = snapped;
            }
        }
    }

    #[test]
    fn test_disabled_state_never_snaps() {
        let mut state = SnapState::new(SnapSettings {
            enabled: false,
            ..Default::default()
        });
        let view = unit_view();
        for p in [Point::new(25.0, 0.0), Point::new(24.0, 1.0), Point::ORIGIN] {
            assert_eq!(state.update(p, &grid(), &view), None);
            assert_eq!(state.last_snap_point(), None);
        }
    }

    #[test]
    fn test_mode_none_never_snaps() {
        let mut state = SnapState::default();
        state.set_mode(SnapMode::None);
        assert_eq!(state.update(Point::new(25.0, 0.0), &grid(), &unit_view()), None);
    }

    #[test]
    fn test_state_tracks_last_snap_point() {
        let mut state = SnapState::default();
        let view = unit_view();
        assert_eq!(
            state.update(Point::new(24.0, 1.0), &grid(), &view),
            Some(Point::new(25.0, 0.0))
        );
        assert_eq!(state.last_snap_point(), Some(Point::new(25.0, 0.0)));

        // Moving out of tolerance resets it.
        assert_eq!(state.update(Point::new(37.0, 12.0), &grid(), &view), None);
        assert_eq!(state.last_snap_point(), None);
    }

    #[test]
    fn test_disabling_clears_last_snap_point() {
        let mut state = SnapState::default();
        state.update(Point::new(24.0, 1.0), &grid(), &unit_view());
        assert!(state.last_snap_point().is_some());
        state.set_enabled(false);
        assert_eq!(state.last_snap_point(), None);
    }

    #[test]
    fn test_set_tolerance_validation() {
        let mut state = SnapState::default();
        assert!(state.set_tolerance(-1.0).is_err());
        assert!(state.set_tolerance(f64::NAN).is_err());
        assert!(state.set_tolerance(0.0).is_ok());
        assert_eq!(state.settings().tolerance_px, 0.0);
    }
}
