//! Result types returned by the batch pipeline.
//!
//! Everything here is plain serialisable data so the CLI's `--json` mode
//! and library callers see the same structures.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The full result of a bleed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutput {
    /// One record per written page, in page order.
    pub pages: Vec<PageOutput>,
    /// Timing and size statistics.
    pub stats: BatchStats,
    /// Document information read from the PDF.
    pub metadata: DocumentMetadata,
}

/// One successfully written page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageOutput {
    /// 1-indexed page number within the source PDF.
    pub page_num: usize,
    /// Where the bled image was written.
    pub path: PathBuf,
    /// Final image width in pixels (source plus bleed).
    pub width: u32,
    /// Final image height in pixels (source plus bleed).
    pub height: u32,
    /// Bleed margin applied, in pixels.
    pub bleed_px: u32,
}

/// Statistics for one bleed run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchStats {
    /// Pages in the source document.
    pub total_pages: usize,
    /// Pages selected and written.
    pub processed_pages: usize,
    /// Wall-clock time for the whole run in milliseconds.
    pub total_duration_ms: u64,
    /// Time spent inside pdfium rasterisation.
    pub render_duration_ms: u64,
    /// Time spent stripping, bleeding and encoding.
    pub bleed_duration_ms: u64,
}

/// PDF document information, read without rendering any page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_output_serialises_to_json() {
        let output = BatchOutput {
            pages: vec![PageOutput {
                page_num: 1,
                path: PathBuf::from("out/001.png"),
                width: 826,
                height: 1126,
                bleed_px: 38,
            }],
            stats: BatchStats {
                total_pages: 1,
                processed_pages: 1,
                total_duration_ms: 120,
                render_duration_ms: 90,
                bleed_duration_ms: 30,
            },
            metadata: DocumentMetadata {
                title: Some("Deck".into()),
                author: None,
                subject: None,
                creator: None,
                producer: None,
                page_count: 1,
                pdf_version: "1.7".into(),
            },
        };

        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"page_num\":1"));
        assert!(json.contains("001.png"));
        assert!(json.contains("\"bleed_px\":38"));
    }
}
