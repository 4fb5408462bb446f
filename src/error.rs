//! Error types for the cardbleed library.
//!
//! A single fatal error enum: every failure aborts the batch. Producing
//! some bled cards and silently skipping others would be worse than
//! stopping, so there is deliberately no non-fatal page-error channel —
//! a per-page failure is wrapped in [`CardbleedError::PageFailed`] with
//! its 1-based page number and propagated to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the cardbleed library.
#[derive(Debug, Error)]
pub enum CardbleedError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// The document has no pages; nothing to process, no files written.
    #[error("PDF '{path}' contains no pages — nothing to process")]
    EmptyDocument { path: PathBuf },

    /// Selected page numbers exceed the actual page count.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    // ── Image errors ──────────────────────────────────────────────────────
    /// A source image has a zero width or height; there is no edge to
    /// replicate from.
    #[error("Invalid source dimensions {width}x{height}: width and height must both be positive")]
    InvalidDimension { width: u32, height: u32 },

    /// Processing a specific page failed; wraps the underlying error with
    /// the 1-based page number so the user knows exactly where the batch
    /// stopped.
    #[error("Page {page} failed: {source}")]
    PageFailed {
        page: usize,
        #[source]
        source: Box<CardbleedError>,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output image file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Set PDFIUM_DYNAMIC_LIB_PATH=/path/to/libpdfium or install pdfium where\n\
the system loader can find it (see the pdfium-render documentation).\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CardbleedError {
    /// Wrap an error with the 1-based page number it occurred on.
    ///
    /// Errors that already carry a page number are passed through
    /// unchanged so messages never report a page twice.
    pub fn for_page(self, page: usize) -> Self {
        match self {
            e @ (CardbleedError::PageFailed { .. } | CardbleedError::RasterisationFailed { .. }) => e,
            e => CardbleedError::PageFailed {
                page,
                source: Box::new(e),
            },
        }
    }
}
