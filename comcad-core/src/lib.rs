//! comcad-core - Drawing canvas core and plan file loading for ComCAD.
//!
//! The canvas half is toolkit independent: it turns pointer, wheel and resize
//! events into world coordinates, grid snaps and a list of primitives (grid
//! lines, crosshair, snap marker) for whatever renderer hosts it.
//!
//! The loader half reads DWG (DXF encoded) and PDF files into plain metadata
//! records for display.
//!
//! # Example
//!
//! ```
//! use comcad_core::{CanvasConfig, CanvasController, Point};
//!
//! let mut canvas = CanvasController::from_config(&CanvasConfig::default(), 800.0, 600.0);
//! canvas.subscribe(|sample| println!("{}", sample.status_text()));
//!
//! // World (24, 1) is within 14px of the grid point (25, 0).
//! let sample = canvas.on_pointer_move(Point::new(24.0, 599.0));
//! assert!(sample.snapped);
//! assert_eq!(sample.effective, Point::new(25.0, 0.0));
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod geometry;
pub mod grid;
pub mod loader;
pub mod overlay;
pub mod snap;
pub mod view;

// Re-exports for convenience
pub use config::CanvasConfig;
pub use controller::{CanvasController, DirtyRegions};
pub use error::{CadError, ErrorCode, LoadError, Result};
pub use events::{Notifier, PointerSample, SubscriptionId};
pub use geometry::{Point, Rect, Segment, Vector};
pub use grid::{GridAnchor, GridLine, GridSpec, LineKind};
pub use loader::{
    load_file, Capabilities, FileKind, LoadOptions, LoadResult, LoadedDocument, PdfBackends,
};
pub use overlay::{OverlayPrimitive, OverlayState};
pub use snap::{snap, SnapMode, SnapSettings};
pub use view::ViewTransform;

/// Load a file with the available backends and default options.
///
/// Backends and capabilities are detected on each call; long-running hosts
/// should detect them once and call `load_file` directly.
pub fn load_with_defaults(path: &std::path::Path) -> LoadResult {
    let backends = PdfBackends::detect();
    let caps = Capabilities::detect(&backends);
    load_file(path, &LoadOptions::default(), &caps, &backends)
}
