//! First-page PDF previews through a system pdfium library.
//!
//! pdfium is bound at runtime. When no library can be found the renderer is
//! simply not registered and PDFs fall back to the metadata reader.

use std::path::{Path, PathBuf};

use pdfium_render::prelude::*;

use super::capabilities::{PageLayout, PagePreviewRenderer};

/// Environment variable naming a directory that holds the pdfium library.
pub const PDFIUM_DIR_ENV: &str = "COMCAD_PDFIUM_DIR";

const METADATA_TAGS: &[(PdfDocumentMetadataTagType, &str)] = &[
    (PdfDocumentMetadataTagType::Title, "Title"),
    (PdfDocumentMetadataTagType::Author, "Author"),
    (PdfDocumentMetadataTagType::Subject, "Subject"),
    (PdfDocumentMetadataTagType::Keywords, "Keywords"),
    (PdfDocumentMetadataTagType::Creator, "Creator"),
    (PdfDocumentMetadataTagType::Producer, "Producer"),
    (PdfDocumentMetadataTagType::CreationDate, "CreationDate"),
    (PdfDocumentMetadataTagType::ModificationDate, "ModDate"),
];

/// Renders with pdfium, binding the library for each document.
#[derive(Debug, Clone)]
pub struct PdfiumRenderer {
    library_dir: Option<PathBuf>,
}

impl PdfiumRenderer {
    /// Probe for pdfium in `$COMCAD_PDFIUM_DIR`, the working directory and
    /// the system library path. `None` when none of them has it.
    pub fn detect() -> Option<Self> {
        let library_dir = std::env::var_os(PDFIUM_DIR_ENV).map(PathBuf::from);
        let renderer = Self { library_dir };
        match renderer.bind() {
            Ok(_) => {
                tracing::info!("pdfium available for PDF previews");
                Some(renderer)
            }
            Err(e) => {
                tracing::debug!("pdfium not available: {}", e);
                None
            }
        }
    }

    fn bind(&self) -> Result<Pdfium, PdfiumError> {
        let dir = self
            .library_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("./"));
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir))
            .or_else(|_| Pdfium::bind_to_system_library())?;
        Ok(Pdfium::new(bindings))
    }

    fn with_document<T>(
        &self,
        path: &Path,
        f: impl FnOnce(&PdfDocument<'_>) -> Result<T, PdfiumError>,
    ) -> Result<T, String> {
        let pdfium = self.bind().map_err(|e| e.to_string())?;
        let document = pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| e.to_string())?;
        f(&document).map_err(|e| e.to_string())
    }
}

impl PagePreviewRenderer for PdfiumRenderer {
    fn library(&self) -> &str {
        "pdfium"
    }

    fn layout(&self, path: &Path) -> Result<PageLayout, String> {
        self.with_document(path, |document| {
            let pages = document.pages();
            let first_page_size = match pages.len() {
                0 => None,
                _ => {
                    let page = pages.get(0)?;
                    Some((f64::from(page.width().value), f64::from(page.height().value)))
                }
            };

            let info = document.metadata();
            let metadata = METADATA_TAGS
                .iter()
                .filter_map(|(tag, key)| {
                    let value = info.get(*tag)?.value().to_string();
                    (!value.is_empty()).then(|| (key.to_string(), value))
                })
                .collect();

            Ok(PageLayout {
                page_count: pages.len() as usize,
                metadata,
                first_page_size,
            })
        })
    }

    fn render_first_page(&self, path: &Path, zoom: f64) -> Result<image::RgbImage, String> {
        let (width, height, rgba) = self.with_document(path, |document| {
            let page = document.pages().get(0)?;
            let config = PdfRenderConfig::new().scale_page_by_factor(zoom as f32);
            let bitmap = page.render_with_config(&config)?;
            Ok((bitmap.width(), bitmap.height(), bitmap.as_rgba_bytes()))
        })?;

        let (width, height) = (
            u32::try_from(width).map_err(|e| e.to_string())?,
            u32::try_from(height).map_err(|e| e.to_string())?,
        );
        rgba_to_rgb(width, height, &rgba)
            .ok_or_else(|| format!("pdfium returned a truncated {}x{} bitmap", width, height))
    }
}

/// Drop the alpha channel of a tightly packed RGBA buffer.
fn rgba_to_rgb(width: u32, height: u32, rgba: &[u8]) -> Option<image::RgbImage> {
    let rgb: Vec<u8> = rgba
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();
    image::RgbImage::from_raw(width, height, rgb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rgba_to_rgb_drops_alpha() {
        let rgba = [10, 20, 30, 255, 40, 50, 60, 0];
        let image = rgba_to_rgb(2, 1, &rgba).unwrap();
        assert_eq!(image.as_raw(), &vec![10, 20, 30, 40, 50, 60]);
    }

    #[test]
    fn test_rgba_to_rgb_rejects_short_buffer() {
        assert!(rgba_to_rgb(2, 2, &[0; 8]).is_none());
    }

    #[test]
    fn test_missing_file_is_an_error_not_a_panic() {
        // Only meaningful where pdfium is installed.
        if let Some(renderer) = PdfiumRenderer::detect() {
            let dir = tempfile::tempdir().unwrap();
            assert!(renderer.layout(&dir.path().join("missing.pdf")).is_err());
        }
    }
}
