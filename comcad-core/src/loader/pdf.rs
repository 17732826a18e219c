//! PDF loading: first-page preview through a registered renderer, falling
//! back to a metadata-only read.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::capabilities::{Capabilities, PagePreviewRenderer, PdfBackends};
use crate::config::{PDF_RENDER_MAX_SIDE, PDF_RENDER_MIN_SIDE};
use crate::error::LoadError;

/// Summary of a PDF document.
#[derive(Debug, Clone, Serialize)]
pub struct PdfInfo {
    pub path: PathBuf,
    pub page_count: usize,
    /// Document information entries (`Title`, `Author`, ...) plus `format`.
    pub metadata: BTreeMap<String, String>,
    /// First page size in points.
    pub page_size: Option<(f64, f64)>,
    /// Rendered first page, only when a preview renderer succeeded.
    #[serde(skip)]
    pub preview: Option<image::RgbImage>,
    pub library: String,
}

impl PdfInfo {
    pub fn has_preview(&self) -> bool {
        self.preview.is_some()
    }
}

/// Zoom that brings the longest page side into `[600, 2000]` pixels.
pub fn preview_zoom(width: f64, height: f64) -> f64 {
    let max_side = width.max(height);
    if !max_side.is_finite() || max_side <= 0.0 {
        return 1.0;
    }
    if max_side < PDF_RENDER_MIN_SIDE {
        PDF_RENDER_MIN_SIDE / max_side
    } else if max_side > PDF_RENDER_MAX_SIDE {
        PDF_RENDER_MAX_SIDE / max_side
    } else {
        1.0
    }
}

/// Scale `image` down so its longest side is at most `max_px`, keeping aspect.
pub fn limit_preview_size(image: image::RgbImage, max_px: u32) -> image::RgbImage {
    let max_px = max_px.max(1);
    if image.width().max(image.height()) <= max_px {
        return image;
    }
    image::DynamicImage::ImageRgb8(image)
        .resize(max_px, max_px, image::imageops::FilterType::Triangle)
        .to_rgb8()
}

pub(crate) fn load_pdf(
    path: &Path,
    preview_max_px: u32,
    caps: &Capabilities,
    backends: &PdfBackends,
) -> Result<PdfInfo, LoadError> {
    let mut preview_error = None;

    if caps.can_render_pdf_preview {
        if let Some(renderer) = backends.preview.as_deref() {
            match render_with(renderer, path, preview_max_px) {
                Ok(info) => return Ok(info),
                Err(detail) => {
                    tracing::warn!(
                        "{} could not render {}: {}",
                        renderer.library(),
                        path.display(),
                        detail
                    );
                    preview_error = Some((renderer.library().to_string(), detail));
                }
            }
        }
    }

    if caps.can_read_pdf_metadata {
        return read_metadata(path);
    }

    Err(match preview_error {
        Some((library, detail)) => LoadError::ParseFailed {
            path: path.to_path_buf(),
            message: format!("Failed to load PDF with {}", library),
            detail: Some(detail),
        },
        None => LoadError::MissingDependency {
            path: path.to_path_buf(),
            message: "No PDF backend available (build with the `pdf` feature or register a renderer)"
                .to_string(),
        },
    })
}

fn render_with(
    renderer: &dyn PagePreviewRenderer,
    path: &Path,
    preview_max_px: u32,
) -> Result<PdfInfo, String> {
    let layout = renderer.layout(path)?;

    let preview = match layout.first_page_size {
        Some((width, height)) if layout.page_count > 0 => {
            let zoom = preview_zoom(width, height);
            let image = renderer.render_first_page(path, zoom)?;
            tracing::debug!(
                "Rendered {} at zoom {:.3} ({}x{})",
                path.display(),
                zoom,
                image.width(),
                image.height()
            );
            Some(limit_preview_size(image, preview_max_px))
        }
        _ => None,
    };

    tracing::info!(
        "Loaded PDF {} with {}: {} pages",
        path.display(),
        renderer.library(),
        layout.page_count
    );

    Ok(PdfInfo {
        path: path.to_path_buf(),
        page_count: layout.page_count,
        metadata: layout.metadata,
        page_size: layout.first_page_size,
        preview,
        library: renderer.library().to_string(),
    })
}

#[cfg(feature = "pdf")]
fn read_metadata(path: &Path) -> Result<PdfInfo, LoadError> {
    metadata::read(path)
}

#[cfg(not(feature = "pdf"))]
fn read_metadata(path: &Path) -> Result<PdfInfo, LoadError> {
    Err(LoadError::MissingDependency {
        path: path.to_path_buf(),
        message: "PDF metadata support not compiled in".to_string(),
    })
}

#[cfg(feature = "pdf")]
mod metadata {
    use std::collections::BTreeMap;
    use std::path::Path;

    use lopdf::{Dictionary, Document, Object, ObjectId};

    use super::PdfInfo;
    use crate::error::LoadError;

    /// Page tree depth searched for an inherited `MediaBox`.
    const MAX_PARENT_DEPTH: usize = 32;

    pub(super) fn read(path: &Path) -> Result<PdfInfo, LoadError> {
        let doc = Document::load(path).map_err(|e| LoadError::ParseFailed {
            path: path.to_path_buf(),
            message: "Failed to load PDF with lopdf".to_string(),
            detail: Some(e.to_string()),
        })?;

        let pages = doc.get_pages();
        let mut metadata = info_dictionary(&doc);
        metadata.insert("format".to_string(), format!("PDF-{}", doc.version));

        let page_size = pages
            .values()
            .next()
            .and_then(|&page_id| media_box(&doc, page_id));

        tracing::info!(
            "Loaded PDF metadata {}: {} pages",
            path.display(),
            pages.len()
        );

        Ok(PdfInfo {
            path: path.to_path_buf(),
            page_count: pages.len(),
            metadata,
            page_size,
            preview: None,
            library: "lopdf".to_string(),
        })
    }

    fn info_dictionary(doc: &Document) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        let dict = match doc.trailer.get(b"Info").ok().and_then(|o| resolve_dict(doc, o)) {
            Some(dict) => dict,
            None => return out,
        };

        for (key, value) in dict.iter() {
            if let Some(text) = text_value(doc, value) {
                out.insert(String::from_utf8_lossy(key).into_owned(), text);
            }
        }
        out
    }

    fn resolve_dict<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Dictionary> {
        match object {
            Object::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok(),
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    fn text_value(doc: &Document, value: &Object) -> Option<String> {
        match value {
            Object::String(bytes, _) => Some(decode_text(bytes)),
            Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
            Object::Integer(i) => Some(i.to_string()),
            Object::Real(r) => Some(r.to_string()),
            Object::Boolean(b) => Some(b.to_string()),
            Object::Reference(id) => {
                let target = doc.get_object(*id).ok()?;
                match target {
                    Object::Reference(_) => None,
                    other => text_value(doc, other),
                }
            }
            _ => None,
        }
    }

    /// PDF text strings are UTF-16BE with a BOM or PDFDocEncoding.
    fn decode_text(bytes: &[u8]) -> String {
        if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
            let units: Vec<u16> = bytes[2..]
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        } else {
            String::from_utf8_lossy(bytes).into_owned()
        }
    }

    fn media_box(doc: &Document, page_id: ObjectId) -> Option<(f64, f64)> {
        let mut dict = doc.get_dictionary(page_id).ok()?;
        for _ in 0..MAX_PARENT_DEPTH {
            if let Ok(object) = dict.get(b"MediaBox") {
                let object = match object {
                    Object::Reference(id) => doc.get_object(*id).ok()?,
                    direct => direct,
                };
                let numbers: Vec<f64> = match object {
                    Object::Array(values) => values.iter().filter_map(number).collect(),
                    _ => return None,
                };
                if let [x0, y0, x1, y1] = numbers[..] {
                    return Some(((x1 - x0).abs(), (y1 - y0).abs()));
                }
                return None;
            }
            let parent = dict.get(b"Parent").ok()?;
            dict = resolve_dict(doc, parent)?;
        }
        None
    }

    fn number(object: &Object) -> Option<f64> {
        match object {
            Object::Integer(i) => Some(*i as f64),
            Object::Real(r) => Some(f64::from(*r)),
            _ => None,
        }
    }

}
