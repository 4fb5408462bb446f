//! PDF rasterisation: render selected pages to pixel buffers via pdfium.
//!
//! ## Why per-page callbacks instead of a Vec?
//!
//! A page is rendered, bled and written before the next page is touched,
//! so peak memory stays at one page's raster plus its bled copy no
//! matter how long the document is. Collecting every render up front
//! would be simpler but holds the whole deck in memory for no benefit —
//! pages are processed strictly in order either way.
//!
//! ## Why derive pixel size from page points?
//!
//! Card sheets are laid out physically (a poker card is 2.5 × 3.5 in).
//! Rendering at `points × dpi / 72` keeps the pixel size faithful to the
//! physical page, with `max_pixels` capping the longest edge so a
//! mis-sized page cannot exhaust memory.

use crate::error::CardbleedError;
use crate::output::DocumentMetadata;
use image::RgbaImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Rasterisation options, extracted from the run config.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Render resolution in dots per inch.
    pub dpi: u32,
    /// Cap on the longest rendered edge, in pixels.
    pub max_pixels: u32,
    /// PDF user password, if the document is encrypted.
    pub password: Option<String>,
}

/// Bind to a pdfium library.
///
/// Honours `PDFIUM_DYNAMIC_LIB_PATH` when set, otherwise falls back to
/// the system loader's search path.
fn bind_pdfium() -> Result<Pdfium, CardbleedError> {
    let bindings = match std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        Ok(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir)),
        Err(_) => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| CardbleedError::PdfiumBindingFailed(format!("{e:?}")))?;

    Ok(Pdfium::new(bindings))
}

/// Open a document, mapping pdfium load failures onto specific errors.
fn load_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, CardbleedError> {
    pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                CardbleedError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                CardbleedError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            CardbleedError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })
}

/// Rasterise the selected pages of a PDF, handing each to `on_page` in
/// strictly ascending page order.
///
/// `page_indices` are 0-based and must be within the document (use
/// [`crate::config::PageSelection::to_indices`]). The callback receives
/// the 1-based page number with the pixel buffer; its first `Err` aborts
/// the remaining pages.
pub fn render_document<F>(
    pdf_path: &Path,
    options: &RenderOptions,
    page_indices: &[usize],
    mut on_page: F,
) -> Result<(), CardbleedError>
where
    F: FnMut(usize, RgbaImage) -> Result<(), CardbleedError>,
{
    let pdfium = bind_pdfium()?;
    let document = load_document(&pdfium, pdf_path, options.password.as_deref())?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    for &idx in page_indices {
        if idx >= total_pages {
            return Err(CardbleedError::PageOutOfRange {
                page: idx + 1,
                total: total_pages,
            });
        }

        let page = pages
            .get(idx as u16)
            .map_err(|e| CardbleedError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            })?;

        let (target_w, target_h) = page_pixel_size(
            page.width().value,
            page.height().value,
            options.dpi,
            options.max_pixels,
        );

        let render_config = PdfRenderConfig::new()
            .set_target_width(target_w as i32)
            .set_maximum_height(target_h as i32);

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            CardbleedError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            }
        })?;

        let image = bitmap.as_image().into_rgba8();
        debug!(
            "Rendered page {} → {}x{} px",
            idx + 1,
            image.width(),
            image.height()
        );

        on_page(idx + 1, image)?;
    }

    Ok(())
}

/// Pixel dimensions for a page of `w_pts` × `h_pts` PDF points at `dpi`,
/// with the longest edge capped at `max_pixels` (aspect preserved).
fn page_pixel_size(w_pts: f32, h_pts: f32, dpi: u32, max_pixels: u32) -> (u32, u32) {
    let mut w = (w_pts * dpi as f32 / 72.0).round().max(1.0);
    let mut h = (h_pts * dpi as f32 / 72.0).round().max(1.0);

    let longest = w.max(h);
    if longest > max_pixels as f32 {
        let scale = max_pixels as f32 / longest;
        w = (w * scale).round().max(1.0);
        h = (h * scale).round().max(1.0);
    }

    (w as u32, h as u32)
}

/// Read document metadata from a PDF without rendering any page.
pub fn read_metadata(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentMetadata, CardbleedError> {
    let pdfium = bind_pdfium()?;
    let document = load_document(&pdfium, pdf_path, password)?;

    let metadata = document.metadata();
    let pages = document.pages();

    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    Ok(DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        page_count: pages.len() as usize,
        pdf_version: format!("{:?}", document.version()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_pixel_size_scales_points_by_dpi() {
        // Poker card: 2.5in × 3.5in = 180 × 252 points.
        assert_eq!(page_pixel_size(180.0, 252.0, 300, 4096), (750, 1050));
        assert_eq!(page_pixel_size(180.0, 252.0, 72, 4096), (180, 252));
    }

    #[test]
    fn page_pixel_size_caps_the_longest_edge() {
        let (w, h) = page_pixel_size(180.0, 252.0, 1200, 2100);
        assert_eq!(h, 2100);
        assert_eq!(w, 1500); // aspect preserved: 2100 × 180/252
    }

    #[test]
    fn page_pixel_size_never_hits_zero() {
        let (w, h) = page_pixel_size(0.5, 10_000.0, 72, 100);
        assert!(w >= 1 && h >= 1);
    }
}
