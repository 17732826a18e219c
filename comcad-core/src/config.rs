//! Configuration constants and user-adjustable canvas settings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::Rect;
use crate::grid::{GridAnchor, GridSpec};
use crate::snap::{SnapMode, SnapSettings};

/// Floating-point comparison epsilon.
pub const EPS: f64 = 1e-9;

/// Default distance between minor grid lines, in world units.
pub const DEFAULT_GRID_SPACING: f64 = 25.0;

/// Default number of minor lines per major line.
pub const DEFAULT_MAJOR_EVERY: u32 = 5;

/// Smallest grid spacing accepted after clamping.
pub const MIN_GRID_SPACING: f64 = 1e-6;

/// Default snap tolerance in pixels (Manhattan distance).
pub const DEFAULT_SNAP_TOLERANCE_PX: f64 = 14.0;

/// Scale multiplier for one zoom step (wheel notch, toolbar, shortcut).
pub const ZOOM_STEP: f64 = 1.15;

/// Minimum view scale (pixels per world unit).
pub const MIN_SCALE: f64 = 0.001;

/// Maximum view scale (pixels per world unit).
pub const MAX_SCALE: f64 = 1000.0;

/// Padding left around content by fit-to-content, in pixels.
pub const FIT_PADDING_PX: f64 = 40.0;

/// Extent shown by fit-to-content when there is no content.
pub const DEFAULT_EXTENT: Rect = Rect {
    min: crate::geometry::Point { x: 0.0, y: 0.0 },
    max: crate::geometry::Point {
        x: 1000.0,
        y: 1000.0,
    },
};

/// Minor lines closer than this on screen are coarsened away.
pub const DEFAULT_MIN_GRID_PIXEL_SPACING: f64 = 6.0;

/// Upper bound on grid lines generated per axis for one frame.
pub const MAX_LINES_PER_AXIS: usize = 4096;

/// How many times the grid may be coarsened by `major_every`.
pub const MAX_LOD_STEPS: u32 = 8;

/// Longest side of a PDF preview image, in pixels.
pub const DEFAULT_PREVIEW_MAX_PX: u32 = 1600;

/// PDF pages smaller than this (longest side, points) are rendered upscaled.
pub const PDF_RENDER_MIN_SIDE: f64 = 600.0;

/// PDF pages larger than this (longest side, points) are rendered downscaled.
pub const PDF_RENDER_MAX_SIDE: f64 = 2000.0;

/// Canvas settings persisted by the viewer and accepted by the CLI.
///
/// Values are clamped, never rejected, when converted into runtime types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub minor_spacing: f64,
    pub major_every: u32,
    pub major_anchor: GridAnchor,
    pub snap_enabled: bool,
    pub snap_mode: SnapMode,
    pub snap_tolerance_px: f64,
    pub show_crosshair: bool,
    pub show_grid: bool,
    pub min_grid_pixel_spacing: f64,
    pub preview_max_px: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            minor_spacing: DEFAULT_GRID_SPACING,
            major_every: DEFAULT_MAJOR_EVERY,
            major_anchor: GridAnchor::default(),
            snap_enabled: true,
            snap_mode: SnapMode::Grid,
            snap_tolerance_px: DEFAULT_SNAP_TOLERANCE_PX,
            show_crosshair: true,
            show_grid: true,
            min_grid_pixel_spacing: DEFAULT_MIN_GRID_PIXEL_SPACING,
            preview_max_px: DEFAULT_PREVIEW_MAX_PX,
        }
    }
}

impl CanvasConfig {
    /// Read settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        tracing::debug!("Loaded canvas config from {}", path.display());
        Ok(config)
    }

    /// Write settings to a JSON file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::debug!("Saved canvas config to {}", path.display());
        Ok(())
    }

    /// Grid parameters, clamped to safe values.
    pub fn grid_spec(&self) -> GridSpec {
        GridSpec::clamped(self.minor_spacing, self.major_every).with_anchor(self.major_anchor)
    }

    /// Snap parameters, with the tolerance clamped to a finite value >= 0.
    pub fn snap_settings(&self) -> SnapSettings {
        let tolerance_px = if self.snap_tolerance_px.is_finite() {
            self.snap_tolerance_px.max(0.0)
        } else {
            DEFAULT_SNAP_TOLERANCE_PX
        };
        SnapSettings {
            enabled: self.snap_enabled,
            mode: self.snap_mode,
            tolerance_px,
        }
    }

    /// Preview size limit, never below one pixel.
    pub fn preview_max_px(&self) -> u32 {
        self.preview_max_px.max(1)
    }
}

/// Utility functions for floating-point comparisons.
pub mod float_cmp {
    use super::EPS;

    /// Check if two floats are approximately equal.
    #[inline]
    pub fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS.max(EPS * a.abs().max(b.abs()))
    }

    /// Check if a float is approximately zero.
    #[inline]
    pub fn approx_zero(a: f64) -> bool {
        a.abs() < EPS
    }
}
