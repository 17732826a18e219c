//! Which file backends are available, decided once at startup.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

/// Page count, document information and first-page size reported by a
/// preview renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub page_count: usize,
    pub metadata: std::collections::BTreeMap<String, String>,
    /// Width and height of the first page in points, `None` for empty documents.
    pub first_page_size: Option<(f64, f64)>,
}

/// A PDF rasterizer able to render the first page of a document.
///
/// None is built in; hosts register one through `PdfBackends`.
pub trait PagePreviewRenderer: Send + Sync {
    /// Name reported in `PdfInfo::library`.
    fn library(&self) -> &str;

    fn layout(&self, path: &Path) -> Result<PageLayout, String>;

    /// Render the first page at `zoom` (1.0 = one pixel per point).
    fn render_first_page(&self, path: &Path, zoom: f64) -> Result<image::RgbImage, String>;
}

/// Registered PDF backends.
#[derive(Clone, Default)]
pub struct PdfBackends {
    pub preview: Option<Arc<dyn PagePreviewRenderer>>,
}

impl PdfBackends {
    /// Register the preview renderers compiled in and found at runtime.
    pub fn detect() -> Self {
        #[cfg(feature = "pdf-preview")]
        let preview = super::pdfium::PdfiumRenderer::detect()
            .map(|renderer| Arc::new(renderer) as Arc<dyn PagePreviewRenderer>);
        #[cfg(not(feature = "pdf-preview"))]
        let preview = None;
        Self { preview }
    }

    pub fn with_preview(renderer: Arc<dyn PagePreviewRenderer>) -> Self {
        Self {
            preview: Some(renderer),
        }
    }
}

impl fmt::Debug for PdfBackends {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfBackends")
            .field("preview", &self.preview.as_ref().map(|r| r.library().to_string()))
            .finish()
    }
}

/// Available loader features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub can_render_dwg: bool,
    pub can_render_pdf_preview: bool,
    pub can_read_pdf_metadata: bool,
}

impl Capabilities {
    /// Probe compiled-in features and registered backends.
    pub fn detect(backends: &PdfBackends) -> Self {
        let caps = Self {
            can_render_dwg: cfg!(feature = "dwg"),
            can_render_pdf_preview: backends.preview.is_some(),
            can_read_pdf_metadata: cfg!(feature = "pdf"),
        };
        tracing::debug!(
            "Capabilities: dwg={} pdf_preview={} pdf_metadata={}",
            caps.can_render_dwg,
            caps.can_render_pdf_preview,
            caps.can_read_pdf_metadata
        );
        caps
    }

    /// Nothing available.
    pub fn none() -> Self {
        Self {
            can_render_dwg: false,
            can_render_pdf_preview: false,
            can_read_pdf_metadata: false,
        }
    }

    pub fn can_load_pdf(&self) -> bool {
        self.can_render_pdf_preview || self.can_read_pdf_metadata
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let yes_no = |b: bool| if b { "yes" } else { "no" };
        writeln!(f, "DWG/DXF metadata:  {}", yes_no(self.can_render_dwg))?;
        writeln!(f, "PDF preview:       {}", yes_no(self.can_render_pdf_preview))?;
        write!(f, "PDF metadata:      {}", yes_no(self.can_read_pdf_metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullRenderer;

    impl PagePreviewRenderer for NullRenderer {
        fn library(&self) -> &str {
            "null"
        }

        fn layout(&self, _path: &Path) -> Result<PageLayout, String> {
            Ok(PageLayout::default())
        }

        fn render_first_page(&self, _path: &Path, _zoom: f64) -> Result<image::RgbImage, String> {
            Err("nothing to render".to_string())
        }
    }

    #[test]
    fn test_detect_follows_features() {
        let caps = Capabilities::detect(&PdfBackends::default());
        assert_eq!(caps.can_render_dwg, cfg!(feature = "dwg"));
        assert_eq!(caps.can_read_pdf_metadata, cfg!(feature = "pdf"));
        assert!(!caps.can_render_pdf_preview);
    }

    #[test]
    fn test_detected_backends_drive_preview_capability() {
        let backends = PdfBackends::detect();
        let caps = Capabilities::detect(&backends);
        assert_eq!(caps.can_render_pdf_preview, backends.preview.is_some());
        if cfg!(feature = "pdf-preview") {
            if let Some(renderer) = &backends.preview {
                assert_eq!(renderer.library(), "pdfium");
            }
        } else {
            assert!(backends.preview.is_none());
        }
    }

    #[test]
    fn test_detect_sees_registered_renderer() {
        let backends = PdfBackends::with_preview(Arc::new(NullRenderer));
        let caps = Capabilities::detect(&backends);
        assert!(caps.can_render_pdf_preview);
        assert!(caps.can_load_pdf());
    }

    #[test]
    fn test_none_loads_nothing() {
        let caps = Capabilities::none();
        assert!(!caps.can_load_pdf());
        assert!(caps.to_string().contains("PDF preview:       no"));
    }
}
