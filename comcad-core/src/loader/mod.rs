//! DWG/PDF loading for display.
//!
//! `load_file` dispatches on the file extension and the detected
//! `Capabilities`. It never panics; every failure comes back as a `LoadError`
//! inside the `LoadResult`.

mod capabilities;
mod dwg;
mod pdf;
#[cfg(feature = "pdf-preview")]
mod pdfium;

pub use capabilities::{Capabilities, PageLayout, PagePreviewRenderer, PdfBackends};
pub use dwg::{DwgInfo, DwgLayerInfo};
pub use pdf::{limit_preview_size, preview_zoom, PdfInfo};
#[cfg(feature = "pdf-preview")]
pub use pdfium::{PdfiumRenderer, PDFIUM_DIR_ENV};

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::DEFAULT_PREVIEW_MAX_PX;
use crate::error::LoadError;
use crate::geometry::Rect;

/// Extensions accepted by `load_file`, lower case with the dot.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".dwg", ".dxf", ".pdf"];

/// File type decided from the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Dwg,
    Pdf,
    Unknown,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Self {
        match extension_of(path).as_str() {
            ".dwg" | ".dxf" => FileKind::Dwg,
            ".pdf" => FileKind::Pdf,
            _ => FileKind::Unknown,
        }
    }
}

/// Lower-cased extension with its leading dot, or an empty string.
fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Longest side of the PDF preview image.
    pub preview_max_px: u32,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            preview_max_px: DEFAULT_PREVIEW_MAX_PX,
        }
    }
}

/// Successfully loaded document.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoadedDocument {
    Dwg(DwgInfo),
    Pdf(PdfInfo),
}

impl LoadedDocument {
    /// World-space rectangle to fit the canvas to, when known.
    ///
    /// PDFs report their first page, placed with its lower-left corner at the
    /// origin.
    pub fn content_extents(&self) -> Option<Rect> {
        match self {
            LoadedDocument::Dwg(info) => info.extents,
            LoadedDocument::Pdf(info) => info
                .page_size
                .filter(|(w, h)| *w > 0.0 && *h > 0.0)
                .map(|(w, h)| Rect::from_bounds(0.0, 0.0, w, h)),
        }
    }

    /// Number of drawable elements: entities for DWG, pages for PDF.
    pub fn element_count(&self) -> usize {
        match self {
            LoadedDocument::Dwg(info) => info.total_entities,
            LoadedDocument::Pdf(info) => info.page_count,
        }
    }
}

/// Outcome of `load_file`.
#[derive(Debug, Clone, Serialize)]
pub struct LoadResult {
    pub path: PathBuf,
    pub kind: FileKind,
    #[serde(serialize_with = "serialize_outcome")]
    pub outcome: Result<LoadedDocument, LoadError>,
}

fn serialize_outcome<S>(
    outcome: &Result<LoadedDocument, LoadError>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match outcome {
        Ok(doc) => doc.serialize(serializer),
        Err(err) => err.serialize(serializer),
    }
}

impl LoadResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn is_dwg(&self) -> bool {
        matches!(self.outcome, Ok(LoadedDocument::Dwg(_)))
    }

    pub fn is_pdf(&self) -> bool {
        matches!(self.outcome, Ok(LoadedDocument::Pdf(_)))
    }

    pub fn document(&self) -> Option<&LoadedDocument> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&LoadError> {
        self.outcome.as_ref().err()
    }

    pub fn dwg(&self) -> Option<&DwgInfo> {
        match &self.outcome {
            Ok(LoadedDocument::Dwg(info)) => Some(info),
            _ => None,
        }
    }

    pub fn pdf(&self) -> Option<&PdfInfo> {
        match &self.outcome {
            Ok(LoadedDocument::Pdf(info)) => Some(info),
            _ => None,
        }
    }

    /// One-line summary for the status bar.
    pub fn short_description(&self) -> String {
        match &self.outcome {
            Ok(LoadedDocument::Dwg(info)) => format!(
                "DWG: {} layers, {} entities",
                info.layers.len(),
                info.total_entities
            ),
            Ok(LoadedDocument::Pdf(info)) => format!("PDF: {} pages", info.page_count),
            Err(err) => format!("Error: {}", err.message()),
        }
    }

    /// File name for display.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Load `path` as DWG or PDF according to its extension.
pub fn load_file(
    path: &Path,
    options: &LoadOptions,
    caps: &Capabilities,
    backends: &PdfBackends,
) -> LoadResult {
    let kind = FileKind::from_path(path);
    tracing::debug!("Loading {} as {:?}", path.display(), kind);

    let outcome = match kind {
        FileKind::Unknown => Err(LoadError::UnsupportedExtension {
            path: path.to_path_buf(),
            extension: extension_of(path),
        }),
        FileKind::Dwg => load_dwg(path, caps).map(LoadedDocument::Dwg),
        FileKind::Pdf => load_pdf(path, options, caps, backends).map(LoadedDocument::Pdf),
    };

    if let Err(err) = &outcome {
        match err.detail() {
            Some(detail) => tracing::error!("{}: {} ({})", path.display(), err, detail),
            None => tracing::error!("{}: {}", path.display(), err),
        }
    }

    LoadResult {
        path: path.to_path_buf(),
        kind,
        outcome,
    }
}

fn load_dwg(path: &Path, caps: &Capabilities) -> Result<DwgInfo, LoadError> {
    if !caps.can_render_dwg {
        return Err(LoadError::MissingDependency {
            path: path.to_path_buf(),
            message: "DWG support not available (build with the `dwg` feature)".to_string(),
        });
    }
    if !path.is_file() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    read_dwg(path)
}

#[cfg(feature = "dwg")]
fn read_dwg(path: &Path) -> Result<DwgInfo, LoadError> {
    dwg::read_dwg(path)
}

#[cfg(not(feature = "dwg"))]
fn read_dwg(path: &Path) -> Result<DwgInfo, LoadError> {
    Err(LoadError::MissingDependency {
        path: path.to_path_buf(),
        message: "DWG support not compiled in".to_string(),
    })
}

fn load_pdf(
    path: &Path,
    options: &LoadOptions,
    caps: &Capabilities,
    backends: &PdfBackends,
) -> Result<PdfInfo, LoadError> {
    if !path.is_file() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    pdf::load_pdf(path, options.preview_max_px, caps, backends)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn load(path: &Path, caps: &Capabilities) -> LoadResult {
        load_file(path, &LoadOptions::default(), caps, &PdfBackends::default())
    }

    fn all_caps() -> Capabilities {
        Capabilities::detect(&PdfBackends::default())
    }

    #[test]
    fn test_file_kind_from_extension() {
        assert_eq!(FileKind::from_path(Path::new("a/plan.DWG")), FileKind::Dwg);
        assert_eq!(FileKind::from_path(Path::new("plan.dxf")), FileKind::Dwg);
        assert_eq!(FileKind::from_path(Path::new("plan.Pdf")), FileKind::Pdf);
        assert_eq!(FileKind::from_path(Path::new("plan.txt")), FileKind::Unknown);
        assert_eq!(FileKind::from_path(Path::new("plan")), FileKind::Unknown);
        for ext in SUPPORTED_EXTENSIONS {
            let path = PathBuf::from(format!("plan{}", ext));
            assert_ne!(FileKind::from_path(&path), FileKind::Unknown, "{}", ext);
        }
    }

    #[test]
    fn test_unsupported_extension() {
        let result = load(Path::new("notes.TXT"), &all_caps());
        assert!(!result.is_ok());
        assert_eq!(result.kind, FileKind::Unknown);
        assert_eq!(result.short_description(), "Error: Unsupported extension: .txt");
    }

    #[test]
    fn test_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let caps = Capabilities {
            can_render_dwg: true,
            can_render_pdf_preview: false,
            can_read_pdf_metadata: true,
        };
        for name in ["gone.dwg", "gone.pdf"] {
            let result = load(&dir.path().join(name), &caps);
            assert!(matches!(result.error(), Some(LoadError::FileNotFound { .. })));
            assert_eq!(result.short_description(), "Error: File not found");
        }
    }

    #[test]
    fn test_dwg_without_capability_is_missing_dependency() {
        let result = load(Path::new("plan.dwg"), &Capabilities::none());
        assert!(matches!(result.error(), Some(LoadError::MissingDependency { .. })));
        assert!(!result.is_dwg());
    }

    #[test]
    fn test_pdf_without_backends_is_missing_dependency() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.pdf");
        std::fs::write(&path, b"%PDF-1.4\n").unwrap();
        let result = load(&path, &Capabilities::none());
        assert!(matches!(result.error(), Some(LoadError::MissingDependency { .. })));
    }

    #[test]
    fn test_short_description_formats() {
        let dwg = LoadResult {
            path: PathBuf::from("plan.dwg"),
            kind: FileKind::Dwg,
            outcome: Ok(LoadedDocument::Dwg(DwgInfo {
                path: PathBuf::from("plan.dwg"),
                layers: vec![DwgLayerInfo {
                    name: "0".to_string(),
                    color: Some(7),
                    frozen: None,
                    locked: None,
                    on: true,
                    entity_count: 12,
                }],
                total_entities: 12,
                entity_types: BTreeMap::new(),
                extents: None,
                library: "dxf".to_string(),
            })),
        };
        assert_eq!(dwg.short_description(), "DWG: 1 layers, 12 entities");
        assert!(dwg.is_dwg() && !dwg.is_pdf());
        assert_eq!(dwg.file_name(), "plan.dwg");

        let pdf = LoadResult {
            path: PathBuf::from("plan.pdf"),
            kind: FileKind::Pdf,
            outcome: Ok(LoadedDocument::Pdf(PdfInfo {
                path: PathBuf::from("plan.pdf"),
                page_count: 3,
                metadata: BTreeMap::new(),
                page_size: Some((612.0, 792.0)),
                preview: None,
                library: "lopdf".to_string(),
            })),
        };
        assert_eq!(pdf.short_description(), "PDF: 3 pages");
        assert_eq!(
            pdf.document().unwrap().content_extents(),
            Some(Rect::from_bounds(0.0, 0.0, 612.0, 792.0))
        );
    }

    #[test]
    fn test_error_result_serializes_with_tag() {
        let result = load(Path::new("notes.txt"), &all_caps());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["kind"], "unknown");
        assert_eq!(json["outcome"]["error"], "unsupported_extension");
        assert_eq!(json["outcome"]["extension"], ".txt");
    }
}
