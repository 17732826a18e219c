//! Canvas controller: owns the view, snap and overlay state and turns input
//! events into pointer samples and repaint requests.

use crate::config::{CanvasConfig, DEFAULT_EXTENT, ZOOM_STEP};
use crate::error::Result;
use crate::events::{Notifier, PointerSample, SubscriptionId};
use crate::geometry::{Point, Rect, Vector};
use crate::grid::{self, GridLine, GridSpec};
use crate::overlay::{OverlayPrimitive, OverlayState, OverlayTracker};
use crate::snap::{SnapMode, SnapSettings, SnapState};
use crate::view::ViewTransform;

/// Layers that changed since the last `take_dirty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirtyRegions {
    /// Crosshair and snap marker only.
    pub overlay: bool,
    /// Grid and document content.
    pub scene: bool,
}

impl DirtyRegions {
    pub fn is_clean(&self) -> bool {
        !self.overlay && !self.scene
    }
}

/// Interactive state of one drawing canvas.
#[derive(Debug)]
pub struct CanvasController {
    view: ViewTransform,
    grid: GridSpec,
    snap: SnapState,
    overlay: OverlayTracker,
    show_crosshair: bool,
    /// Last pointer position in pixels, `None` when outside the canvas.
    pointer: Option<Point>,
    last_sample: Option<PointerSample>,
    notifier: Notifier<PointerSample>,
    dirty: DirtyRegions,
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::new(ViewTransform::default(), GridSpec::default(), SnapSettings::default())
    }
}

impl CanvasController {
    pub fn new(view: ViewTransform, grid: GridSpec, snap: SnapSettings) -> Self {
        Self {
            view,
            grid,
            snap: SnapState::new(snap),
            overlay: OverlayTracker::new(),
            show_crosshair: true,
            pointer: None,
            last_sample: None,
            notifier: Notifier::new(),
            dirty: DirtyRegions {
                overlay: true,
                scene: true,
            },
        }
    }

    /// Build a controller from persisted settings for a viewport of the given size.
    pub fn from_config(config: &CanvasConfig, width: f64, height: f64) -> Self {
        let mut controller = Self::new(
            ViewTransform::new(width, height),
            config.grid_spec(),
            config.snap_settings(),
        );
        controller.show_crosshair = config.show_crosshair;
        controller
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn snap_settings(&self) -> &SnapSettings {
        self.snap.settings()
    }

    pub fn last_snap_point(&self) -> Option<Point> {
        self.snap.last_snap_point()
    }

    pub fn show_crosshair(&self) -> bool {
        self.show_crosshair
    }

    pub fn overlay_state(&self) -> &OverlayState {
        self.overlay.state()
    }

    /// The most recent sample, `None` after the pointer left the canvas.
    pub fn last_sample(&self) -> Option<PointerSample> {
        self.last_sample
    }

    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&PointerSample) + 'static,
    {
        self.notifier.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Handle a pointer move at `pixel` (viewport relative).
    ///
    /// Only the overlay is marked dirty.
    pub fn on_pointer_move(&mut self, pixel: Point) -> PointerSample {
        self.pointer = Some(pixel);
        let raw = self.view.pixel_to_world(pixel);
        let snap_result = self.snap.update(raw, &self.grid, &self.view);
        self.overlay.update(
            raw,
            snap_result,
            self.view.visible_rect(),
            self.snap.is_active(),
        );

        let sample = PointerSample::new(raw, snap_result);
        self.last_sample = Some(sample);
        self.notifier.publish(&sample);
        self.dirty.overlay = true;
        sample
    }

    pub fn on_pointer_leave(&mut self) {
        self.pointer = None;
        self.last_sample = None;
        self.snap.clear();
        self.overlay.hide();
        self.dirty.overlay = true;
    }

    /// Zoom one step in (`delta > 0`) or out (`delta < 0`) anchored at `pixel`.
    pub fn on_wheel(&mut self, delta: f64, pixel: Point) -> bool {
        let factor = if delta > 0.0 {
            ZOOM_STEP
        } else if delta < 0.0 {
            1.0 / ZOOM_STEP
        } else {
            return false;
        };

        self.pointer = Some(pixel);
        let changed = self.view.zoom_at(pixel, factor);
        if changed {
            tracing::debug!("Wheel zoom to {}", self.view.zoom_percent());
            self.view_changed();
        }
        changed
    }

    /// Zoom anchored at the viewport centre; invalid factors are ignored.
    pub fn zoom_by(&mut self, factor: f64) -> bool {
        let changed = self.view.zoom_at_center(factor);
        if changed {
            tracing::debug!("Zoom to {}", self.view.zoom_percent());
            self.view_changed();
        }
        changed
    }

    /// Pan by a pixel delta.
    pub fn pan(&mut self, delta: Vector) {
        if delta == Vector::ZERO || !(delta.x.is_finite() && delta.y.is_finite()) {
            return;
        }
        self.view.pan(delta);
        self.view_changed();
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        if self.view.viewport_size() == (width, height) {
            return;
        }
        self.view.set_viewport_size(width, height);
        self.view_changed();
    }

    /// Fit `content` (or the default extent) inside the viewport.
    ///
    /// Zero-width or zero-height content is padded so it stays visible.
    pub fn fit_to_content(&mut self, content: Option<Rect>) -> bool {
        let target = content.map(inflate_degenerate).unwrap_or(DEFAULT_EXTENT);
        let changed = self.view.fit_rect(target);
        if changed {
            tracing::debug!(
                "Fit to ({:.2}, {:.2})-({:.2}, {:.2}) at {}",
                target.min.x,
                target.min.y,
                target.max.x,
                target.max.y,
                self.view.zoom_percent()
            );
            self.view_changed();
        }
        changed
    }

    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.snap.set_enabled(enabled);
        self.refresh_overlay();
    }

    pub fn set_snap_mode(&mut self, mode: SnapMode) {
        self.snap.set_mode(mode);
        self.refresh_overlay();
    }

    pub fn set_snap_tolerance(&mut self, tolerance_px: f64) -> Result<()> {
        self.snap.set_tolerance(tolerance_px)?;
        self.refresh_overlay();
        Ok(())
    }

    pub fn toggle_crosshair(&mut self, show: bool) {
        if self.show_crosshair != show {
            self.show_crosshair = show;
            self.dirty.overlay = true;
        }
    }

    pub fn set_grid(&mut self, grid: GridSpec) {
        self.grid = grid;
        self.dirty.scene = true;
        self.refresh_overlay();
    }

    /// Grid lines for the current view with level of detail applied.
    pub fn grid_lines(&self, min_pixel_spacing: f64) -> Vec<GridLine> {
        grid::lines_for_view(&self.view, &self.grid, min_pixel_spacing)
    }

    pub fn overlay_primitives(&self) -> Vec<OverlayPrimitive> {
        self.overlay.state().primitives(self.show_crosshair)
    }

    /// Return and reset the dirty flags.
    pub fn take_dirty(&mut self) -> DirtyRegions {
        std::mem::take(&mut self.dirty)
    }

    fn view_changed(&mut self) {
        self.dirty.scene = true;
        self.refresh_overlay();
    }

    /// Re-run snap and overlay for the last pointer position so the overlay
    /// tracks the current projection.
    fn refresh_overlay(&mut self) {
        match self.pointer {
            Some(pixel) => {
                self.on_pointer_move(pixel);
            }
            None => self.dirty.overlay = true,
        }
    }
}

fn inflate_degenerate(rect: Rect) -> Rect {
    if !(rect.min.is_finite() && rect.max.is_finite()) {
        return DEFAULT_EXTENT;
    }
    let (width, height) = (rect.width(), rect.height());
    if width > 0.0 && height > 0.0 {
        return rect;
    }

    let fallback = DEFAULT_EXTENT.width().max(DEFAULT_EXTENT.height());
    let size = width.max(height);
    let size = if size > 0.0 { size } else { fallback };
    let center = rect.center();
    let half_w = if width > 0.0 { width } else { size } / 2.0;
    let half_h = if height > 0.0 { height } else { size } / 2.0;
    Rect::from_bounds(
        center.x - half_w,
        center.y - half_h,
        center.x + half_w,
        center.y + half_h,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn controller() -> CanvasController {
        CanvasController::from_config(&CanvasConfig::default(), 800.0, 600.0)
    }

    fn assert_crosshair_spans_view(controller: &CanvasController) {
        let visible = controller.view().visible_rect();
        let state = controller.overlay_state();
        let eps = 1e-6;
        assert!((state.horizontal.start.x - visible.min.x).abs() < eps);
        assert!((state.horizontal.end.x - visible.max.x).abs() < eps);
        assert!((state.vertical.start.y - visible.min.y).abs() < eps);
        assert!((state.vertical.end.y - visible.max.y).abs() < eps);
    }

    #[test]
    fn test_pointer_move_snaps_and_publishes() {
        let mut controller = controller();
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&received);
        controller.subscribe(move |s: &PointerSample| sink.borrow_mut().push(*s));

        // Pixel (24, 599) is world (24, 1) at scale 1 in a 600px tall view.
        let sample = controller.on_pointer_move(Point::new(24.0, 599.0));
        assert!(sample.snapped);
        assert_eq!(sample.effective, Point::new(25.0, 0.0));
        assert_eq!(sample.raw, Point::new(24.0, 1.0));
        assert_eq!(*received.borrow(), vec![sample]);
        assert_eq!(controller.last_snap_point(), Some(Point::new(25.0, 0.0)));
    }

    #[test]
    fn test_pointer_move_outside_tolerance_reports_raw() {
        let mut controller = controller();
        let sample = controller.on_pointer_move(Point::new(37.0, 588.0));
        assert!(!sample.snapped);
        assert_eq!(sample.effective, Point::new(37.0, 12.0));
        assert_eq!(controller.last_snap_point(), None);
        assert!(!controller.overlay_state().marker_visible);
    }

    #[test]
    fn test_pointer_move_marks_only_overlay_dirty() {
        let mut controller = controller();
        controller.take_dirty();
        controller.on_pointer_move(Point::new(100.0, 100.0));
        assert_eq!(
            controller.take_dirty(),
            DirtyRegions {
                overlay: true,
                scene: false
            }
        );
        assert!(controller.take_dirty().is_clean());
    }

    #[test]
    fn test_wheel_zooms_around_pointer() {
        let mut controller = controller();
        let pixel = Point::new(200.0, 150.0);
        let before = controller.view().pixel_to_world(pixel);
        assert!(controller.on_wheel(1.0, pixel));
        assert!((controller.view().scale() - ZOOM_STEP).abs() < 1e-12);
        let after = controller.view().pixel_to_world(pixel);
        assert!((before.x - after.x).abs() < 1e-9 && (before.y - after.y).abs() < 1e-9);

        assert!(controller.on_wheel(-1.0, pixel));
        assert!((controller.view().scale() - 1.0).abs() < 1e-12);
        assert!(!controller.on_wheel(0.0, pixel));
        assert!(controller.take_dirty().scene);
    }

    #[test]
    fn test_overlay_tracks_projection_after_zoom_and_resize() {
        let mut controller = controller();
        controller.on_pointer_move(Point::new(400.0, 300.0));
        assert_crosshair_spans_view(&controller);

        controller.on_wheel(1.0, Point::new(10.0, 20.0));
        assert_crosshair_spans_view(&controller);

        controller.zoom_by(0.5);
        assert_crosshair_spans_view(&controller);

        controller.resize(1280.0, 200.0);
        assert_crosshair_spans_view(&controller);

        controller.pan(Vector::new(-35.0, 12.0));
        assert_crosshair_spans_view(&controller);
    }

    #[test]
    fn test_zoom_changes_snap_under_fixed_pointer() {
        let mut controller = controller();
        // World (24, 1): 2px from (25, 0) at scale 1.
        let pixel = Point::new(24.0, 599.0);
        assert!(controller.on_pointer_move(pixel).snapped);

        // 15 steps about the pointer is ~8.14x, putting the candidate ~16px away.
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&received);
        controller.subscribe(move |s: &PointerSample| sink.borrow_mut().push(*s));
        for _ in 0..15 {
            controller.on_wheel(1.0, pixel);
        }
        assert_eq!(received.borrow().len(), 15);
        assert_eq!(controller.last_snap_point(), None);
        assert!(!received.borrow().last().unwrap().snapped);
    }

    #[test]
    fn test_disabling_snap_hides_marker() {
        let mut controller = controller();
        controller.on_pointer_move(Point::new(24.0, 599.0));
        assert!(controller.overlay_state().marker_visible);

        controller.set_snap_enabled(false);
        assert!(!controller.overlay_state().marker_visible);
        assert_eq!(controller.last_snap_point(), None);
        assert!(!controller.last_sample().unwrap().snapped);

        controller.set_snap_enabled(true);
        controller.set_snap_mode(SnapMode::None);
        assert_eq!(controller.last_snap_point(), None);
    }

    #[test]
    fn test_crosshair_toggle_filters_primitives() {
        let mut controller = controller();
        controller.on_pointer_move(Point::new(24.0, 599.0));
        assert_eq!(controller.overlay_primitives().len(), 3);

        controller.take_dirty();
        controller.toggle_crosshair(false);
        assert!(controller.take_dirty().overlay);
        assert_eq!(
            controller.overlay_primitives(),
            vec![OverlayPrimitive::SnapMarker(Point::new(25.0, 0.0))]
        );
    }

    #[test]
    fn test_pointer_leave_clears_overlay() {
        let mut controller = controller();
        controller.on_pointer_move(Point::new(24.0, 599.0));
        controller.on_pointer_leave();
        assert!(controller.overlay_primitives().is_empty());
        assert_eq!(controller.last_sample(), None);
        assert_eq!(controller.last_snap_point(), None);
    }

    #[test]
    fn test_fit_to_content_and_default_extent() {
        let mut controller = controller();
        let content = Rect::from_bounds(100.0, 100.0, 300.0, 200.0);
        assert!(controller.fit_to_content(Some(content)));
        let visible = controller.view().visible_rect();
        assert!(visible.min.x <= 100.0 && visible.max.x >= 300.0);
        assert!(visible.min.y <= 100.0 && visible.max.y >= 200.0);

        assert!(controller.fit_to_content(None));
        let visible = controller.view().visible_rect();
        assert!(visible.min.x <= 0.0 && visible.max.x >= 1000.0);
        assert!(visible.min.y <= 0.0 && visible.max.y >= 1000.0);
    }

    #[test]
    fn test_fit_degenerate_content_is_inflated() {
        let mut controller = controller();
        assert!(controller.fit_to_content(Some(Rect::from_bounds(0.0, 5.0, 200.0, 5.0))));
        let visible = controller.view().visible_rect();
        assert!(visible.contains(Point::new(0.0, 5.0)));
        assert!(visible.contains(Point::new(200.0, 5.0)));

        let point = Rect::from_bounds(50.0, 50.0, 50.0, 50.0);
        assert!(controller.fit_to_content(Some(point)));
        assert!(controller.view().visible_rect().contains(Point::new(50.0, 50.0)));
    }

    #[test]
    fn test_fit_without_viewport_is_noop() {
        let mut controller = CanvasController::default();
        assert!(!controller.fit_to_content(None));
    }

    #[test]
    fn test_invalid_tolerance_rejected() {
        let mut controller = controller();
        assert!(controller.set_snap_tolerance(-2.0).is_err());
        assert!(controller.set_snap_tolerance(0.0).is_ok());
        assert!(!controller.on_pointer_move(Point::new(24.0, 599.0)).snapped);
    }

    #[test]
    fn test_set_grid_marks_scene_dirty() {
        let mut controller = controller();
        controller.take_dirty();
        controller.set_grid(GridSpec::new(10.0, 10).unwrap());
        assert!(controller.take_dirty().scene);
        let lines = controller.grid_lines(6.0);
        assert!(lines.iter().any(|l| l.coordinate == 10.0));
    }
}
