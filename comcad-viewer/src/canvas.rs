//! Canvas rendering functions.
//!
//! Everything arrives in world coordinates from `comcad_core`; these helpers
//! map it through the controller's `ViewTransform` into screen space.

use comcad_core::grid::Axis;
use comcad_core::{GridLine, OverlayPrimitive, Point, Rect, ViewTransform};
use egui::{Align2, Color32, FontId, Painter, Pos2, Shape, Stroke, TextureId};

use crate::theme;

/// Convert a world point to a screen position inside `canvas_rect`.
pub fn world_to_screen(view: &ViewTransform, canvas_rect: egui::Rect, world: Point) -> Pos2 {
    let pixel = view.world_to_pixel(world);
    Pos2::new(
        canvas_rect.min.x + pixel.x as f32,
        canvas_rect.min.y + pixel.y as f32,
    )
}

/// Convert a screen position to a viewport-relative pixel.
pub fn screen_to_pixel(canvas_rect: egui::Rect, screen: Pos2) -> Point {
    Point::new(
        f64::from(screen.x - canvas_rect.min.x),
        f64::from(screen.y - canvas_rect.min.y),
    )
}

/// Screen rectangle covering a world rectangle.
fn world_rect_to_screen(view: &ViewTransform, canvas_rect: egui::Rect, rect: Rect) -> egui::Rect {
    egui::Rect::from_two_pos(
        world_to_screen(view, canvas_rect, rect.min),
        world_to_screen(view, canvas_rect, rect.max),
    )
}

/// Grid lines as shapes, ready to cache until the scene changes.
pub fn grid_shapes(lines: &[GridLine], view: &ViewTransform, canvas_rect: egui::Rect) -> Vec<Shape> {
    lines
        .iter()
        .map(|line| {
            let color = if line.is_major() {
                theme::GRID_MAJOR
            } else {
                theme::GRID_MINOR
            };
            let a = world_to_screen(view, canvas_rect, line.segment.start);
            let b = world_to_screen(view, canvas_rect, line.segment.end);
            // Snap to the pixel centre so 1px lines stay crisp.
            let (a, b) = match line.axis {
                Axis::Vertical => {
                    let x = a.x.round() + 0.5;
                    (Pos2::new(x, a.y), Pos2::new(x, b.y))
                }
                Axis::Horizontal => {
                    let y = a.y.round() + 0.5;
                    (Pos2::new(a.x, y), Pos2::new(b.x, y))
                }
            };
            Shape::line_segment([a, b], Stroke::new(theme::GRID_STROKE_WIDTH, color))
        })
        .collect()
}

/// Draw the world X and Y axes when they are in view.
pub fn render_origin(painter: &Painter, view: &ViewTransform, canvas_rect: egui::Rect) {
    let visible = view.visible_rect();
    let stroke = Stroke::new(1.0, theme::ORIGIN_AXIS);
    if visible.min.y <= 0.0 && visible.max.y >= 0.0 {
        painter.line_segment(
            [
                world_to_screen(view, canvas_rect, Point::new(visible.min.x, 0.0)),
                world_to_screen(view, canvas_rect, Point::new(visible.max.x, 0.0)),
            ],
            stroke,
        );
    }
    if visible.min.x <= 0.0 && visible.max.x >= 0.0 {
        painter.line_segment(
            [
                world_to_screen(view, canvas_rect, Point::new(0.0, visible.min.y)),
                world_to_screen(view, canvas_rect, Point::new(0.0, visible.max.y)),
            ],
            stroke,
        );
    }
}

/// Outline the loaded document's extents.
pub fn render_extents(
    painter: &Painter,
    extents: Rect,
    view: &ViewTransform,
    canvas_rect: egui::Rect,
) {
    let rect = world_rect_to_screen(view, canvas_rect, extents);
    painter.rect_stroke(
        rect,
        0.0,
        Stroke::new(theme::EXTENTS_STROKE_WIDTH, theme::EXTENTS_BORDER),
    );
}

/// Draw a rendered page image stretched over its world rectangle.
pub fn render_preview(
    painter: &Painter,
    texture: TextureId,
    page: Rect,
    view: &ViewTransform,
    canvas_rect: egui::Rect,
) {
    let rect = world_rect_to_screen(view, canvas_rect, page);
    let uv = egui::Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
    painter.image(texture, rect, uv, Color32::WHITE);
}

/// Draw the crosshair and snap marker.
pub fn render_overlay(
    painter: &Painter,
    primitives: &[OverlayPrimitive],
    view: &ViewTransform,
    canvas_rect: egui::Rect,
) {
    let crosshair = Stroke::new(theme::CROSSHAIR_STROKE_WIDTH, theme::CROSSHAIR);
    for primitive in primitives {
        match primitive {
            OverlayPrimitive::CrosshairHorizontal(segment)
            | OverlayPrimitive::CrosshairVertical(segment) => {
                painter.line_segment(
                    [
                        world_to_screen(view, canvas_rect, segment.start),
                        world_to_screen(view, canvas_rect, segment.end),
                    ],
                    crosshair,
                );
            }
            OverlayPrimitive::SnapMarker(point) => {
                painter.circle_stroke(
                    world_to_screen(view, canvas_rect, *point),
                    theme::SNAP_MARKER_RADIUS,
                    Stroke::new(theme::SNAP_MARKER_STROKE_WIDTH, theme::SNAP_MARKER),
                );
            }
        }
    }
}

/// Hint shown on an empty canvas.
pub fn render_placeholder(painter: &Painter, canvas_rect: egui::Rect, text: &str) {
    painter.text(
        canvas_rect.center(),
        Align2::CENTER_CENTER,
        text,
        FontId::proportional(20.0),
        theme::DIM_TEXT,
    );
}
