//! Configuration types for the bleed pipeline.
//!
//! All behaviour is controlled through [`BleedConfig`], built via its
//! [`BleedConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share a config between the CLI and library callers and to
//! log exactly what a run was asked to do.

use crate::bleed::Edge;
use crate::error::CardbleedError;
use crate::progress::ProgressHandle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for one bleed run.
///
/// Built via [`BleedConfig::builder()`] or [`BleedConfig::default()`].
///
/// # Example
/// ```rust
/// use cardbleed::{BleedConfig, BleedWidth};
///
/// let config = BleedConfig::builder()
///     .bleed(BleedWidth::Pixels(36))
///     .dpi(300)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct BleedConfig {
    /// Bleed margin added to every edge. Default: 0.125 in, the standard
    /// print bleed. See [`BleedWidth`].
    pub bleed: BleedWidth,

    /// Rendering DPI used when rasterising each PDF page. Range: 72–1200.
    /// Default: 300.
    ///
    /// 300 DPI is the usual print resolution; a poker-size card renders to
    /// roughly 750 × 1050 px. Go higher for fine linework, lower for
    /// quick proofs.
    pub dpi: u32,

    /// Maximum rendered image dimension (width or height) in pixels.
    /// Default: 4096.
    ///
    /// A safety cap independent of DPI: a 600-DPI render of an A3 sheet
    /// would otherwise allocate hundreds of megapixels. Caps the longest
    /// edge, scaling the other proportionally.
    pub max_rendered_pixels: u32,

    /// Edges to trim before bleeding (removes cut lines and scanner
    /// fringes so they are not replicated into the margin). Default: none.
    pub strip: Vec<Edge>,

    /// Width in pixels of the band removed from each stripped edge.
    /// Default: 1. Ignored when `strip` is empty.
    pub strip_px: u32,

    /// Page selection. Default: all pages.
    pub pages: PageSelection,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Output image format. Default: PNG.
    pub format: OutputFormat,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Progress event sink. Default: none.
    pub progress: Option<ProgressHandle>,
}

impl Default for BleedConfig {
    fn default() -> Self {
        Self {
            bleed: BleedWidth::Inches(0.125),
            dpi: 300,
            max_rendered_pixels: 4096,
            strip: Vec::new(),
            strip_px: 1,
            pages: PageSelection::default(),
            password: None,
            format: OutputFormat::default(),
            download_timeout_secs: 120,
            progress: None,
        }
    }
}

impl fmt::Debug for BleedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BleedConfig")
            .field("bleed", &self.bleed)
            .field("dpi", &self.dpi)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("strip", &self.strip)
            .field("strip_px", &self.strip_px)
            .field("pages", &self.pages)
            .field("format", &self.format)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("progress", &self.progress.as_ref().map(|_| "<dyn BleedProgress>"))
            .finish()
    }
}

impl BleedConfig {
    /// Create a new builder for `BleedConfig`.
    pub fn builder() -> BleedConfigBuilder {
        BleedConfigBuilder {
            config: Self::default(),
        }
    }

    /// The bleed margin in pixels at this config's render DPI.
    pub fn bleed_px(&self) -> u32 {
        self.bleed.resolve(self.dpi)
    }
}

/// Builder for [`BleedConfig`].
#[derive(Debug)]
pub struct BleedConfigBuilder {
    config: BleedConfig,
}

impl BleedConfigBuilder {
    pub fn bleed(mut self, bleed: BleedWidth) -> Self {
        self.config.bleed = bleed;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 1200);
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn strip(mut self, edges: Vec<Edge>) -> Self {
        self.config.strip = edges;
        self
    }

    pub fn strip_px(mut self, n: u32) -> Self {
        self.config.strip_px = n;
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress(mut self, progress: ProgressHandle) -> Self {
        self.config.progress = Some(progress);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BleedConfig, CardbleedError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 1200 {
            return Err(CardbleedError::InvalidConfig(format!(
                "DPI must be 72–1200, got {}",
                c.dpi
            )));
        }
        if let BleedWidth::Inches(inches) = c.bleed {
            if !inches.is_finite() || inches < 0.0 {
                return Err(CardbleedError::InvalidConfig(format!(
                    "Bleed must be a non-negative number of inches, got {inches}"
                )));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Bleed margin, in pixels or physical units.
///
/// Print shops specify bleed physically ("an eighth of an inch all
/// round"); pixel workflows specify it exactly. `Inches` resolves
/// against the render DPI so the same config produces the same physical
/// margin at any resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BleedWidth {
    /// Exact bleed in pixels.
    Pixels(u32),
    /// Physical bleed, converted via `round(inches * dpi)`.
    Inches(f32),
}

impl BleedWidth {
    /// The bleed in pixels at the given render DPI.
    pub fn resolve(&self, dpi: u32) -> u32 {
        match *self {
            BleedWidth::Pixels(px) => px,
            BleedWidth::Inches(inches) => (inches * dpi as f32).round().max(0.0) as u32,
        }
    }
}

/// Specifies which pages of the PDF to process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum PageSelection {
    /// Process all pages (default).
    #[default]
    All,
    /// A single page (1-indexed).
    Single(usize),
    /// A contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand into a sorted, deduplicated list of 0-indexed page numbers,
    /// clipped to the document's page count.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => (*p >= 1 && *p <= total_pages)
                .then(|| p - 1)
                .into_iter()
                .collect(),
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

/// Output raster format for persisted pages.
///
/// PNG is the default: bleed output feeds a print pipeline, and lossless
/// compression keeps line art crisp. JPEG exists for proofs where file
/// size matters more than edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    /// The file extension used for output names.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }

    /// The matching `image` crate format.
    pub fn image_format(&self) -> image::ImageFormat {
        match self {
            OutputFormat::Png => image::ImageFormat::Png,
            OutputFormat::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_clamps_dpi_and_max_pixels() {
        let config = BleedConfig::builder()
            .dpi(10)
            .max_rendered_pixels(1)
            .build()
            .unwrap();
        assert_eq!(config.dpi, 72);
        assert_eq!(config.max_rendered_pixels, 100);
    }

    #[test]
    fn negative_inch_bleed_is_rejected() {
        let result = BleedConfig::builder().bleed(BleedWidth::Inches(-0.5)).build();
        assert!(matches!(result, Err(CardbleedError::InvalidConfig(_))));
    }

    #[test]
    fn bleed_resolution() {
        assert_eq!(BleedWidth::Pixels(40).resolve(300), 40);
        assert_eq!(BleedWidth::Inches(0.125).resolve(300), 38);
        assert_eq!(BleedWidth::Inches(0.0).resolve(300), 0);
        // Pixel bleed ignores DPI entirely.
        assert_eq!(BleedWidth::Pixels(40).resolve(72), 40);
    }

    #[test]
    fn default_config_resolves_to_standard_print_bleed() {
        let config = BleedConfig::default();
        assert_eq!(config.bleed_px(), 38); // 0.125in × 300dpi
    }

    #[test]
    fn page_selection_to_indices() {
        assert_eq!(PageSelection::All.to_indices(5), vec![0, 1, 2, 3, 4]);
        assert_eq!(PageSelection::Single(3).to_indices(5), vec![2]);
        assert_eq!(PageSelection::Single(6).to_indices(5), Vec::<usize>::new());
        assert_eq!(PageSelection::Range(2, 4).to_indices(5), vec![1, 2, 3]);
        assert_eq!(PageSelection::Range(3, 10).to_indices(4), vec![2, 3]);
        assert_eq!(
            PageSelection::Set(vec![3, 1, 3]).to_indices(5),
            vec![0, 2] // deduplicated and sorted
        );
    }

    #[test]
    fn output_format_extensions() {
        assert_eq!(OutputFormat::Png.extension(), "png");
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
    }
}
