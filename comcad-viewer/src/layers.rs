//! Layer visibility controls.

/// Controls which visual layers are displayed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerVisibility {
    /// Show the background grid
    pub grid: bool,
    /// Show the outline of the loaded document's extents
    pub extents: bool,
    /// Show the PDF page preview, when one was rendered
    pub preview: bool,
    /// Show the world X/Y axes through the origin
    pub origin: bool,
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self {
            grid: true,
            extents: true,
            preview: true,
            origin: false,
        }
    }
}

impl LayerVisibility {
    /// Start from the persisted grid setting.
    pub fn with_grid(grid: bool) -> Self {
        Self {
            grid,
            ..Default::default()
        }
    }
}
