//! CLI binary for pdf2text.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig`, runs the pre-flight dependency check, and prints
//! results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2text::{
    check_dependencies, extract_to_file, ExtractionConfig, ExtractionMethod,
    ExtractionProgressCallback, ProgressCallback,
};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
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

/// Terminal progress callback: renders a live progress bar and per-page log
/// lines using [indicatif]. Pages are OCRed strictly in order, so a single
/// start-time slot is enough.
struct CliProgressCallback {
    /// The single progress bar anchored at the bottom of the terminal.
    bar: ProgressBar,
    /// Wall-clock start time of the page currently being recognised.
    page_start: Mutex<Option<Instant>>,
    /// Count of pages that errored out.
    errors: AtomicUsize,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set dynamically by
    /// `on_extraction_start` (rasterisation has to finish before the page
    /// count is known).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_extraction_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Rasterising PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            page_start: Mutex::new(None),
            errors: AtomicUsize::new(0),
        })
    }

    fn elapsed_secs(&self) -> f64 {
        self.page_start
            .lock()
            .unwrap()
            .take()
            .map(|t| t.elapsed().as_millis() as f64 / 1000.0)
            .unwrap_or(0.0)
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, total_pages: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("OCR");
        self.bar.reset_eta();
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Recognising {total_pages} pages…"))
        ));
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        *self.page_start.lock().unwrap() = Some(Instant::now());
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, text_len: usize) {
        let secs = self.elapsed_secs();
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {:<8}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{text_len:>5} chars")),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, total: usize, error: String) {
        let secs = self.elapsed_secs();
        self.errors.fetch_add(1, Ordering::SeqCst);

        // Truncate very long error messages to keep output tidy.
        let msg = if error.len() > 80 {
            format!("{}\u{2026}", &error[..79])
        } else {
            error
        };

        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}  {}",
            red("✗"),
            page_num,
            total,
            red(&msg),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_extraction_complete(&self, total_pages: usize, success_count: usize) {
        let failed = total_pages.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} pages recognised successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} pages recognised  ({} failed)",
                if failed == total_pages {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_pages,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic extraction (writes document.txt next to the input)
  pdf2text document.pdf

  # Explicit output path
  pdf2text document.pdf output.txt

  # Lower DPI, force OCR even if a text layer exists
  pdf2text document.pdf --dpi 300 --force-ocr

  # Strip additional running headers (regex, matched from line start)
  pdf2text document.pdf --patterns "RUNNING HEADER" "AUTHOR NAME"

  # Keep every line, boilerplate included
  pdf2text document.pdf --no-clean

  # Stats as JSON on stdout
  pdf2text document.pdf --json

EXTRACTION METHOD:
  By default the first 2 pages are sampled with pdftotext; more than 50
  words there means the document is treated as text-based. --force-ocr and
  --force-text skip the check entirely.

DEPENDENCIES:
  pdftotext, pdftoppm    sudo apt install poppler-utils
  tesseract              sudo apt install tesseract-ocr
"#;

/// Extract text from PDF files (handles both text and scanned PDFs).
#[derive(Parser, Debug)]
#[command(
    name = "pdf2text",
    version,
    about = "Extract text from PDF files (handles both text and scanned PDFs)",
    long_about = "Extract plain text from PDF documents. Text-bearing PDFs go through \
pdftotext with layout preserved; scanned PDFs are rasterised with pdftoppm and read \
page by page with tesseract. Recurring publisher boilerplate is stripped unless \
--no-clean is given.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input PDF file.
    input: PathBuf,

    /// Output text file (default: input path with .txt extension).
    output: Option<PathBuf>,

    /// Rasterisation DPI for OCR (72–600).
    #[arg(long, env = "PDF2TEXT_DPI", default_value_t = 400,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Force OCR even if text is extractable. Wins over --force-text.
    #[arg(long)]
    force_ocr: bool,

    /// Force text-layer extraction even if the PDF appears scanned.
    #[arg(long)]
    force_text: bool,

    /// Additional removal patterns (regex, matched from the start of each line).
    #[arg(long, num_args = 1.., value_name = "REGEX")]
    patterns: Vec<String>,

    /// Skip header/footer cleaning.
    #[arg(long)]
    no_clean: bool,

    /// OCR recognition language.
    #[arg(long, env = "PDF2TEXT_LANG", default_value = "eng")]
    lang: String,

    /// Print extraction statistics as JSON to stdout.
    #[arg(long)]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "PDF2TEXT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2TEXT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2TEXT_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress;
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
        .with_writer(io::stderr)
        .init();

    // ── Pre-flight: all external tools present, or abort with the list ───
    check_dependencies()?;

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.with_extension("txt"));

    if !cli.quiet {
        eprintln!("Input:  {}", cli.input.display());
        eprintln!("Output: {}", output_path.display());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new_dynamic() as Arc<dyn ExtractionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run extraction ───────────────────────────────────────────────────
    let stats = extract_to_file(&cli.input, &output_path, &config)
        .await
        .context("Extraction failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).context("Failed to serialise stats")?
        );
    } else if !cli.quiet {
        eprintln!(
            "\n{} {} lines, {} words  {}  →  {}",
            if stats.failed_pages == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            stats.lines,
            stats.words,
            dim(&format!("{}ms", stats.total_duration_ms)),
            bold(&output_path.display().to_string()),
        );
        if stats.failed_pages > 0 {
            eprintln!(
                "   {} of {} OCR pages failed (see [OCR ERROR …] markers in the output)",
                red(&stats.failed_pages.to_string()),
                stats.ocr_pages,
            );
        }
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .dpi(cli.dpi)
        .clean(!cli.no_clean)
        .extra_patterns(cli.patterns.iter().cloned())
        .language(cli.lang.clone());

    // Decision order: force-OCR wins over force-text; neither means the
    // classifier decides.
    if cli.force_ocr {
        builder = builder.method(ExtractionMethod::Ocr);
    } else if cli.force_text {
        builder = builder.method(ExtractionMethod::TextLayer);
    }

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
