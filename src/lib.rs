//! # cardbleed
//!
//! Turn PDF pages into bleed-extended card images ready for print-and-cut.
//!
//! ## Why this crate?
//!
//! Home-printed card decks are cut by hand or on a hobby cutter, and
//! neither is pixel-accurate. If the artwork stops exactly at the card
//! edge, a cut that lands a fraction of a millimetre outside it leaves a
//! white sliver on the finished card. The fix is *bleed*: extend the
//! outermost pixels of each card outward so an imprecise cut still lands
//! on ink. This crate rasterises each PDF page (one card per page),
//! replicates its edge pixels outward by a configurable margin, and
//! writes the results as ordinal-named images a print tool can consume
//! in page order.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    resolve local file or download from URL
//!  ├─ 2. Render   rasterise pages via pdfium at the configured DPI
//!  ├─ 3. Strip    optionally trim cut lines from the page edges
//!  ├─ 4. Bleed    replicate edge pixels outward by the bleed margin
//!  └─ 5. Persist  atomic write of 001.png, 002.png, …
//! ```
//!
//! Pages are processed strictly in order, one at a time; the first
//! failure aborts the batch rather than shipping a mixed-quality deck.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cardbleed::{process, BleedConfig, BleedWidth};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BleedConfig::builder()
//!         .bleed(BleedWidth::Inches(0.125))
//!         .dpi(300)
//!         .build()?;
//!     let output = process("deck.pdf", "out/", &config)?;
//!     for page in &output.pages {
//!         println!("{} → {}", page.page_num, page.path.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `cardbleed` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! cardbleed = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod bleed;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use bleed::{add_bleed, strip_edges, Edge};
pub use config::{BleedConfig, BleedConfigBuilder, BleedWidth, OutputFormat, PageSelection};
pub use error::CardbleedError;
pub use output::{BatchOutput, BatchStats, DocumentMetadata, PageOutput};
pub use process::{inspect, process};
pub use progress::{BleedProgress, NoopProgress, ProgressHandle};
