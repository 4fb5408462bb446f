//! Sequential batch processing: strip, bleed and persist pages in order.
//!
//! The batch is all-or-nothing: the first failing page aborts the run
//! with an error naming that page. Pages written before the failure
//! remain on disk (each one was complete and correct when written); the
//! failing page itself never appears because writes are atomic.
//!
//! Output names are the zero-padded 1-based page number (`001.png`,
//! `002.png`, …) so a lexical directory listing reproduces PDF page
//! order for any page count.

use crate::bleed;
use crate::config::{BleedConfig, OutputFormat};
use crate::error::CardbleedError;
use crate::output::PageOutput;
use crate::pipeline::persist;
use crate::progress::ProgressHandle;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Per-page processing options, resolved once per run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Bleed margin in pixels (already resolved against the render DPI).
    pub bleed_px: u32,
    /// Edges to strip before bleeding.
    pub strip: Vec<bleed::Edge>,
    /// Band width removed from each stripped edge.
    pub strip_px: u32,
    /// Destination directory for output images.
    pub output_dir: PathBuf,
    /// Output image format.
    pub format: OutputFormat,
    /// Total pages in the source document; drives the zero-pad width.
    pub page_count: usize,
}

impl BatchOptions {
    /// Resolve a run config against a destination and document size.
    pub fn new(config: &BleedConfig, output_dir: impl Into<PathBuf>, page_count: usize) -> Self {
        Self {
            bleed_px: config.bleed_px(),
            strip: config.strip.clone(),
            strip_px: config.strip_px,
            output_dir: output_dir.into(),
            format: config.format,
            page_count,
        }
    }

    /// The output path for a given 1-based page number.
    pub fn page_path(&self, page_num: usize) -> PathBuf {
        self.output_dir
            .join(ordinal_name(page_num, self.page_count, self.format))
    }
}

/// Zero-pad width for a document of `page_count` pages.
///
/// At least three digits (the human-sized common case), growing as
/// needed so lexical and numeric ordering always agree.
pub fn pad_width(page_count: usize) -> usize {
    let digits = page_count.max(1).to_string().len();
    digits.max(3)
}

/// Deterministic ordinal filename for a page, e.g. `001.png`.
pub fn ordinal_name(page_num: usize, page_count: usize, format: OutputFormat) -> String {
    format!(
        "{:0width$}.{}",
        page_num,
        format.extension(),
        width = pad_width(page_count)
    )
}

/// Strip, bleed and persist a single page image.
///
/// Any failure is wrapped with the 1-based page number so the caller
/// knows exactly where the batch stopped.
pub fn process_page(
    page_num: usize,
    image: &RgbaImage,
    opts: &BatchOptions,
) -> Result<PageOutput, CardbleedError> {
    let run = || -> Result<PageOutput, CardbleedError> {
        let stripped;
        let source = if opts.strip.is_empty() || opts.strip_px == 0 {
            image
        } else {
            stripped = bleed::strip_edges(image, &opts.strip, opts.strip_px)?;
            &stripped
        };

        let bled = bleed::add_bleed(source, opts.bleed_px)?;
        let path = opts.page_path(page_num);
        persist::write_image(&bled, &path, opts.format)?;

        Ok(PageOutput {
            page_num,
            width: bled.width(),
            height: bled.height(),
            bleed_px: opts.bleed_px,
            path,
        })
    };

    run().map_err(|e| e.for_page(page_num))
}

/// Run the batch over a sequence of `(page_num, image)` results.
///
/// This is the entry point for callers that already hold rasterised
/// pages; [`crate::process`] streams pdfium output through the same
/// [`process_page`] step. Rasteriser failures travel through the items
/// as `Err` and abort the batch exactly like a bleed or write failure.
///
/// `total_selected` is the number of pages the sequence is expected to
/// yield, used only for progress reporting.
///
/// # Errors
/// [`CardbleedError::EmptyDocument`] if the sequence yields nothing —
/// an empty batch is an explicit failure, never a silent no-op.
pub fn run<I>(
    pages: I,
    total_selected: usize,
    opts: &BatchOptions,
    source: &Path,
    progress: Option<&ProgressHandle>,
) -> Result<Vec<PageOutput>, CardbleedError>
where
    I: IntoIterator<Item = Result<(usize, RgbaImage), CardbleedError>>,
{
    persist::ensure_output_dir(&opts.output_dir)?;

    if let Some(cb) = progress {
        cb.on_batch_start(total_selected);
    }

    let mut outputs = Vec::new();
    for item in pages {
        let (page_num, image) = item?;

        if let Some(cb) = progress {
            cb.on_page_start(page_num, total_selected);
        }

        let page_output = process_page(page_num, &image, opts)?;
        debug!(
            "Page {} → {} ({}x{})",
            page_num,
            page_output.path.display(),
            page_output.width,
            page_output.height
        );

        if let Some(cb) = progress {
            cb.on_page_done(page_num, total_selected, &page_output.path);
        }

        outputs.push(page_output);
    }

    if outputs.is_empty() {
        return Err(CardbleedError::EmptyDocument {
            path: source.to_path_buf(),
        });
    }

    if let Some(cb) = progress {
        cb.on_batch_done(total_selected, outputs.len());
    }

    info!(
        "Batch complete: {} pages → {}",
        outputs.len(),
        opts.output_dir.display()
    );

    Ok(outputs)
}
