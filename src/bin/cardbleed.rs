//! CLI binary for cardbleed.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `BleedConfig` and prints results.

use anyhow::{Context, Result};
use cardbleed::{
    inspect, process, BleedConfig, BleedProgress, BleedWidth, Edge, OutputFormat, PageSelection,
    ProgressHandle,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress: a spinner while the PDF is opened, switching to a
/// page-count bar once the batch starts. Pages arrive strictly in order,
/// so per-page log lines are printed as they complete.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    /// Create a callback whose progress-bar length is set by
    /// `on_batch_start` (called before any page is rendered).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_batch_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Bleeding");
    }

    /// Clear the bar so an error message is not garbled by it.
    fn clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl BleedProgress for CliProgress {
    fn on_batch_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Adding bleed to {total_pages} pages…"))
        ));
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_done(&self, page_num: usize, total: usize, path: &Path) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total,
            dim(&path.display().to_string()),
        ));
        self.bar.inc(1);
    }

    fn on_batch_done(&self, total_pages: usize, files_written: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} of {} pages written",
            green("✔"),
            bold(&files_written.to_string()),
            total_pages,
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Standard 1/8" print bleed at 300 DPI
  cardbleed deck.pdf out/

  # Exact pixel bleed
  cardbleed --bleed 40 deck.pdf out/

  # Strip a 2px cut line from every edge before bleeding
  cardbleed --strip top --strip bottom --strip left --strip right \
            --strip-px 2 deck.pdf out/

  # Only the face cards, at proofing resolution
  cardbleed --pages 1-12 --dpi 150 deck.pdf proofs/

  # Convert from URL
  cardbleed https://example.com/deck.pdf out/

  # Inspect page count and metadata (nothing written)
  cardbleed --inspect-only deck.pdf

  # Machine-readable run report
  cardbleed --json deck.pdf out/ > report.json

OUTPUT NAMING:
  Pages are written as 001.png, 002.png, … (the zero-padding widens
  automatically for documents of 1000+ pages), so a lexical directory
  listing always reproduces PDF page order.

ENVIRONMENT VARIABLES:
  CARDBLEED_BLEED         Override --bleed
  CARDBLEED_DPI           Override --dpi
  CARDBLEED_PAGES         Override --pages
  PDFIUM_DYNAMIC_LIB_PATH Directory containing libpdfium — skips the
                          system loader search
"#;

/// Add print bleed to card images rasterised from PDF pages.
#[derive(Parser, Debug)]
#[command(
    name = "cardbleed",
    version,
    about = "Add print bleed to card images rasterised from PDF pages",
    long_about = "Rasterise each page of a PDF (one printable card per page) and extend its \
edge pixels outward by a configurable bleed margin, so imprecise cutting never exposes a \
white border. Results are written as zero-padded ordinal images (001.png, 002.png, …).",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Destination directory for the bled images (created if missing).
    #[arg(required_unless_present = "inspect_only")]
    output_dir: Option<PathBuf>,

    /// Bleed margin in pixels.
    #[arg(long, env = "CARDBLEED_BLEED", conflicts_with = "bleed_inches")]
    bleed: Option<u32>,

    /// Bleed margin in inches, resolved against --dpi. Default: 0.125.
    #[arg(long, env = "CARDBLEED_BLEED_INCHES")]
    bleed_inches: Option<f32>,

    /// Rendering DPI (72–1200).
    #[arg(long, env = "CARDBLEED_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=1200))]
    dpi: u32,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "CARDBLEED_PAGES", default_value = "all")]
    pages: String,

    /// Strip this edge before bleeding (repeatable).
    #[arg(long, value_enum)]
    strip: Vec<EdgeArg>,

    /// Width in pixels of the band removed from each stripped edge.
    #[arg(long, default_value_t = 1)]
    strip_px: u32,

    /// Output image format.
    #[arg(long, value_enum, default_value = "png")]
    format: FormatArg,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "CARDBLEED_PASSWORD")]
    password: Option<String>,

    /// Cap on the longest rendered edge in pixels.
    #[arg(long, env = "CARDBLEED_MAX_PIXELS", default_value_t = 4096)]
    max_pixels: u32,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "CARDBLEED_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Output a structured JSON run report instead of the summary.
    #[arg(long, env = "CARDBLEED_JSON")]
    json: bool,

    /// Print PDF metadata only, no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Disable progress bar.
    #[arg(long, env = "CARDBLEED_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "CARDBLEED_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "CARDBLEED_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum EdgeArg {
    Top,
    Bottom,
    Left,
    Right,
}

impl From<EdgeArg> for Edge {
    fn from(v: EdgeArg) -> Self {
        match v {
            EdgeArg::Top => Edge::Top,
            EdgeArg::Bottom => Edge::Bottom,
            EdgeArg::Left => Edge::Left,
            EdgeArg::Right => Edge::Right,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Png,
    Jpeg,
}

impl From<FormatArg> for OutputFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Jpeg => OutputFormat::Jpeg,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect(&cli.input).context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialise metadata")?
            );
        } else {
            println!("File:         {}", cli.input);
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    let Some(output_dir) = cli.output_dir.clone() else {
        anyhow::bail!("OUTPUT_DIR is required unless --inspect-only is set");
    };

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb = if show_progress {
        Some(CliProgress::new_dynamic())
    } else {
        None
    };

    let config = build_config(&cli, progress_cb.clone().map(|cb| cb as ProgressHandle))?;

    // ── Run ──────────────────────────────────────────────────────────────
    let result = process(&cli.input, &output_dir, &config);

    // A dangling progress bar would garble the error message.
    if let Some(ref cb) = progress_cb {
        cb.clear();
    }

    let output = match result {
        Ok(output) => output,
        Err(e) => {
            // Errors are printed even under --quiet.
            eprintln!("{} {}", red("✘"), e);
            std::process::exit(1);
        }
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if !cli.quiet && !show_progress {
        // Only print inline stats when the progress callback is disabled
        // (the callback already printed the per-page log and summary).
        eprintln!(
            "Wrote {}/{} pages in {}ms",
            output.stats.processed_pages, output.stats.total_pages, output.stats.total_duration_ms
        );
    }

    if !cli.quiet && !cli.json {
        eprintln!(
            "   {} bleed  —  render {}ms / bleed {}ms  →  {}",
            dim(&format!(
                "{}px",
                output.pages.first().map(|p| p.bleed_px).unwrap_or(0)
            )),
            output.stats.render_duration_ms,
            output.stats.bleed_duration_ms,
            bold(&output_dir.display().to_string()),
        );
    }

    Ok(())
}

/// Map CLI args to `BleedConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressHandle>) -> Result<BleedConfig> {
    let bleed = match (cli.bleed, cli.bleed_inches) {
        (Some(px), _) => BleedWidth::Pixels(px),
        (None, Some(inches)) => BleedWidth::Inches(inches),
        (None, None) => BleedWidth::Inches(0.125),
    };

    let pages = parse_pages(&cli.pages)?;

    let mut builder = BleedConfig::builder()
        .bleed(bleed)
        .dpi(cli.dpi)
        .max_rendered_pixels(cli.max_pixels)
        .strip(cli.strip.iter().map(|&e| e.into()).collect())
        .strip_px(cli.strip_px)
        .pages(pages)
        .format(cli.format.into())
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--pages` string into `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start.trim().parse().context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;

        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!("Invalid page range '{}-{}': start must be <= end", start, end);
        }

        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let pages: Vec<usize> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .context(format!("Invalid page number: '{}'", p.trim()))
            })
            .collect::<Result<Vec<_>>>()?;

        for &p in &pages {
            if p < 1 {
                anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", p);
            }
        }

        return Ok(PageSelection::Set(pages));
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
    }

    Ok(PageSelection::Single(page))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pages_accepts_the_documented_forms() {
        assert!(matches!(parse_pages("all").unwrap(), PageSelection::All));
        assert!(matches!(
            parse_pages("5").unwrap(),
            PageSelection::Single(5)
        ));
        assert!(matches!(
            parse_pages("3-15").unwrap(),
            PageSelection::Range(3, 15)
        ));
        assert!(matches!(
            parse_pages("1,3,5").unwrap(),
            PageSelection::Set(_)
        ));
    }

    #[test]
    fn parse_pages_rejects_nonsense() {
        assert!(parse_pages("0").is_err());
        assert!(parse_pages("9-2").is_err());
        assert!(parse_pages("five").is_err());
    }

    #[test]
    fn cli_args_parse() {
        let cli = Cli::try_parse_from([
            "cardbleed",
            "--bleed",
            "40",
            "--strip",
            "left",
            "--strip",
            "right",
            "deck.pdf",
            "out",
        ])
        .unwrap();
        assert_eq!(cli.bleed, Some(40));
        assert_eq!(cli.strip.len(), 2);
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn bleed_px_and_inches_conflict() {
        let result = Cli::try_parse_from([
            "cardbleed",
            "--bleed",
            "40",
            "--bleed-inches",
            "0.125",
            "deck.pdf",
            "out",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn output_dir_optional_only_for_inspect() {
        assert!(Cli::try_parse_from(["cardbleed", "deck.pdf"]).is_err());
        assert!(Cli::try_parse_from(["cardbleed", "--inspect-only", "deck.pdf"]).is_ok());
    }
}
