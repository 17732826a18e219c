//! Color palette and styling constants for the viewer.
//!
//! The plan canvas is white paper with a light grid, like the drafting sheet
//! the plans are printed on. Interaction overlays use a saturated blue so they
//! never read as part of the drawing.

use egui::Color32;

// =============================================================================
// SPLASH - Deep teal gradient with a translucent card
// =============================================================================
pub const SPLASH_BACKDROP: Color32 = Color32::from_rgb(18, 24, 30);
pub const SPLASH_TOP: Color32 = Color32::from_rgb(5, 47, 79);
pub const SPLASH_MID: Color32 = Color32::from_rgb(14, 75, 102);
pub const SPLASH_BOTTOM: Color32 = Color32::from_rgb(43, 122, 143);
pub const SPLASH_CARD: Color32 = Color32::from_rgba_premultiplied(28, 28, 28, 28);
pub const SPLASH_TEXT: Color32 = Color32::WHITE;
pub const SPLASH_SUBTEXT: Color32 = Color32::from_rgb(230, 230, 230);
pub const PROGRESS_TRACK: Color32 = Color32::from_rgba_premultiplied(8, 8, 8, 20);
pub const PROGRESS_FILL: Color32 = Color32::from_rgb(110, 193, 255);

// =============================================================================
// BACKGROUND
// =============================================================================
pub const CANVAS_BG: Color32 = Color32::from_rgb(255, 255, 255);
pub const CANVAS_BORDER: Color32 = Color32::from_rgb(221, 221, 221);
pub const CARD_BG: Color32 = Color32::from_rgb(246, 248, 250);

// =============================================================================
// GRID
// =============================================================================
pub const GRID_MINOR: Color32 = Color32::from_rgb(232, 236, 240);
pub const GRID_MAJOR: Color32 = Color32::from_rgb(200, 208, 216);

// =============================================================================
// DOCUMENT
// =============================================================================
pub const EXTENTS_BORDER: Color32 = Color32::from_rgb(120, 130, 140);
pub const ORIGIN_AXIS: Color32 = Color32::from_rgb(230, 120, 110);

// =============================================================================
// OVERLAY - Crosshair and snap marker
// =============================================================================
pub const CROSSHAIR: Color32 = Color32::from_rgb(30, 120, 230);
pub const SNAP_MARKER: Color32 = Color32::from_rgb(30, 120, 230);
pub const SNAP_MARKER_RADIUS: f32 = 4.0;

// =============================================================================
// TEXT
// =============================================================================
pub const DIM_TEXT: Color32 = Color32::from_rgb(140, 145, 150);

// =============================================================================
// STROKE WIDTHS
// =============================================================================
pub const GRID_STROKE_WIDTH: f32 = 1.0;
pub const EXTENTS_STROKE_WIDTH: f32 = 1.5;
pub const CROSSHAIR_STROKE_WIDTH: f32 = 1.0;
pub const SNAP_MARKER_STROKE_WIDTH: f32 = 1.5;
