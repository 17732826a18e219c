//! View transformation between world and pixel coordinates.

use crate::config::{FIT_PADDING_PX, MAX_SCALE, MIN_SCALE};
use crate::error::{CadError, Result};
use crate::geometry::{Point, Rect, Vector};

/// Pan/zoom state of the canvas plus the size of the viewport it maps into.
///
/// World coordinates have Y increasing upward. Pixel coordinates are relative
/// to the viewport's top-left corner with Y increasing downward.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewTransform {
    /// Pan offset in pixels, measured from the viewport's bottom-left corner.
    offset: Vector,
    /// Pixels per world unit.
    scale: f64,
    viewport_width: f64,
    viewport_height: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            offset: Vector::ZERO,
            scale: 1.0,
            viewport_width: 0.0,
            viewport_height: 0.0,
        }
    }
}

impl ViewTransform {
    /// Create a transform for a viewport of the given pixel size.
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            viewport_width: sanitize_extent(viewport_width),
            viewport_height: sanitize_extent(viewport_height),
            ..Default::default()
        }
    }

    /// Create a transform with an explicit scale and offset.
    pub fn with_scale(mut self, scale: f64, offset: Vector) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(CadError::InvalidScale { scale });
        }
        self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        self.offset = offset;
        Ok(self)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> Vector {
        self.offset
    }

    pub fn viewport_size(&self) -> (f64, f64) {
        (self.viewport_width, self.viewport_height)
    }

    /// Convert world coordinates to pixel coordinates.
    pub fn world_to_pixel(&self, world: Point) -> Point {
        Point::new(
            world.x * self.scale + self.offset.x,
            self.viewport_height - (world.y * self.scale + self.offset.y),
        )
    }

    /// Convert pixel coordinates to world coordinates.
    pub fn pixel_to_world(&self, pixel: Point) -> Point {
        Point::new(
            (pixel.x - self.offset.x) / self.scale,
            (self.viewport_height - pixel.y - self.offset.y) / self.scale,
        )
    }

    /// The part of the world currently visible in the viewport.
    ///
    /// Degenerate (zero area) when the viewport has no size.
    pub fn visible_rect(&self) -> Rect {
        Rect::from_corners(
            self.pixel_to_world(Point::new(0.0, self.viewport_height)),
            self.pixel_to_world(Point::new(self.viewport_width, 0.0)),
        )
    }

    /// Pixel position of the viewport centre.
    pub fn viewport_center(&self) -> Point {
        Point::new(self.viewport_width / 2.0, self.viewport_height / 2.0)
    }

    /// Multiply the scale by `factor`, keeping the world point under `pixel` fixed.
    ///
    /// Returns false when the scale did not change (clamped or invalid factor).
    pub fn zoom_at(&mut self, pixel: Point, factor: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let old_scale = self.scale;
        let new_scale = (old_scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        if (new_scale - old_scale).abs() <= f64::EPSILON * old_scale {
            return false;
        }

        let anchor = self.pixel_to_world(pixel);
        self.scale = new_scale;
        self.offset.x = pixel.x - anchor.x * new_scale;
        self.offset.y = self.viewport_height - pixel.y - anchor.y * new_scale;
        true
    }

    /// Zoom anchored at the viewport centre.
    pub fn zoom_at_center(&mut self, factor: f64) -> bool {
        self.zoom_at(self.viewport_center(), factor)
    }

    /// Pan the view by a pixel-space delta.
    pub fn pan(&mut self, delta: Vector) {
        self.offset.x += delta.x;
        self.offset.y -= delta.y; // pixel Y is flipped
    }

    /// Resize the viewport, keeping the world point at its centre fixed.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        let width = sanitize_extent(width);
        let height = sanitize_extent(height);
        let had_size = self.viewport_width > 0.0 && self.viewport_height > 0.0;
        let center_world = self.pixel_to_world(self.viewport_center());

        self.viewport_width = width;
        self.viewport_height = height;

        if had_size {
            let center = self.viewport_center();
            self.offset.x = center.x - center_world.x * self.scale;
            self.offset.y = height - center.y - center_world.y * self.scale;
        }
    }

    /// Fit `rect` inside the viewport with padding, preserving aspect ratio.
    ///
    /// Returns false when the viewport has no size or `rect` is degenerate.
    pub fn fit_rect(&mut self, rect: Rect) -> bool {
        if self.viewport_width <= 0.0 || self.viewport_height <= 0.0 || rect.is_degenerate() {
            return false;
        }

        let padding = FIT_PADDING_PX
            .min(self.viewport_width / 4.0)
            .min(self.viewport_height / 4.0);
        let available_width = self.viewport_width - padding * 2.0;
        let available_height = self.viewport_height - padding * 2.0;

        let scale_x = available_width / rect.width();
        let scale_y = available_height / rect.height();
        self.scale = scale_x.min(scale_y).clamp(MIN_SCALE, MAX_SCALE);

        let center = rect.center();
        self.offset.x = self.viewport_width / 2.0 - center.x * self.scale;
        self.offset.y = self.viewport_height / 2.0 - center.y * self.scale;
        true
    }

    /// Get the zoom level as a percentage string.
    pub fn zoom_percent(&self) -> String {
        format!("{:.0}%", self.scale * 100.0)
    }
}

fn sanitize_extent(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}
