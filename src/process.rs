//! Top-level entry points: run the full PDF-to-bled-cards pipeline.
//!
//! Pages stream straight from the rasteriser into the bleed-and-persist
//! step, one at a time, so peak memory is a single page regardless of
//! document length. All errors are fatal to the batch — the first
//! failing page aborts the run with its page number attached, and
//! already-written pages are left on disk.

use crate::batch::{self, BatchOptions};
use crate::config::BleedConfig;
use crate::error::CardbleedError;
use crate::output::{BatchOutput, BatchStats, DocumentMetadata, PageOutput};
use crate::pipeline::render::RenderOptions;
use crate::pipeline::{input, persist, render};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Rasterise a PDF's pages, add bleed to each, and write them to
/// `output_dir` as ordinal-named images.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input_str`  — Local file path or HTTP/HTTPS URL to a PDF
/// * `output_dir` — Destination directory, created if missing
/// * `config`     — Run configuration
///
/// # Errors
/// Any failure aborts the whole run: unreadable or empty input,
/// rasterisation failure (with the failing page number), or a write
/// failure. No partial file is left behind for the failing page.
pub fn process(
    input_str: impl AsRef<str>,
    output_dir: impl AsRef<Path>,
    config: &BleedConfig,
) -> Result<BatchOutput, CardbleedError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Starting bleed run: {}", input_str);

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let resolved = input::resolve_input(input_str, config.download_timeout_secs)?;
    let pdf_path = resolved.path().to_path_buf();

    // ── Step 2: Read metadata, reject empty documents ────────────────────
    let metadata = render::read_metadata(&pdf_path, config.password.as_deref())?;
    let total_pages = metadata.page_count;
    if total_pages == 0 {
        return Err(CardbleedError::EmptyDocument { path: pdf_path });
    }
    info!("PDF has {} pages", total_pages);

    // ── Step 3: Expand page selection ────────────────────────────────────
    let page_indices = config.pages.to_indices(total_pages);
    if page_indices.is_empty() {
        return Err(CardbleedError::PageOutOfRange {
            page: 0,
            total: total_pages,
        });
    }
    let selected = page_indices.len();
    debug!("Selected {} pages", selected);

    let opts = BatchOptions::new(config, output_dir.as_ref(), total_pages);
    persist::ensure_output_dir(&opts.output_dir)?;

    if let Some(ref cb) = config.progress {
        cb.on_batch_start(selected);
    }

    // ── Step 4: Render → strip → bleed → persist, page by page ───────────
    let render_options = RenderOptions {
        dpi: config.dpi,
        max_pixels: config.max_rendered_pixels,
        password: config.password.clone(),
    };

    let mut pages: Vec<PageOutput> = Vec::with_capacity(selected);
    let mut bleed_duration = Duration::ZERO;
    let pipeline_start = Instant::now();

    render::render_document(&pdf_path, &render_options, &page_indices, |page_num, image| {
        if let Some(ref cb) = config.progress {
            cb.on_page_start(page_num, selected);
        }

        let page_start = Instant::now();
        let page_output = batch::process_page(page_num, &image, &opts)?;
        bleed_duration += page_start.elapsed();

        if let Some(ref cb) = config.progress {
            cb.on_page_done(page_num, selected, &page_output.path);
        }

        pages.push(page_output);
        Ok(())
    })?;

    let pipeline_duration = pipeline_start.elapsed();

    if let Some(ref cb) = config.progress {
        cb.on_batch_done(selected, pages.len());
    }

    // ── Step 5: Stats ────────────────────────────────────────────────────
    let stats = BatchStats {
        total_pages,
        processed_pages: pages.len(),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        render_duration_ms: pipeline_duration.saturating_sub(bleed_duration).as_millis() as u64,
        bleed_duration_ms: bleed_duration.as_millis() as u64,
    };

    info!(
        "Bleed run complete: {}/{} pages, {}ms total",
        stats.processed_pages, total_pages, stats.total_duration_ms
    );

    Ok(BatchOutput {
        pages,
        stats,
        metadata,
    })
}

/// Read PDF metadata without rendering or writing anything.
pub fn inspect(input_str: impl AsRef<str>) -> Result<DocumentMetadata, CardbleedError> {
    let resolved = input::resolve_input(input_str.as_ref(), 120)?;
    render::read_metadata(resolved.path(), None)
}
