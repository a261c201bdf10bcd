//! CLI binary for quickdocs.
//!
//! A thin shim over the library crate: subcommands map onto the pipeline
//! stages and print results or write output files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use quickdocs::pipeline::crop::crop_asset;
use quickdocs::pipeline::{extract, generate};
use quickdocs::{
    qr_png, render, CropRegion, GeminiProvider, ImageAsset, PipelineConfig, RenderOptions,
    TemplateKind, VisionProvider, QR_FILENAME,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract text from a photographed document (stdout)
  quickdocs extract receipt.jpg

  # Extract from a cropped region (source-pixel coordinates)
  quickdocs extract receipt.jpg --crop 120,80,900,600

  # Crop drawn on a scaled-down preview: map from the displayed size
  quickdocs extract receipt.jpg --crop 50,50,100,100 --display 800,600

  # Full pipeline: photo → structured data → formatted PDF
  quickdocs generate invoice-photo.jpg --template invoice -o invoice.pdf

  # Resume from a scanned CV, default output name (resume.pdf)
  quickdocs generate cv-scan.png --template resume

  # QR code for a URL
  quickdocs qr "https://example.com" -o qrcode.png

TEMPLATES:
  invoice    Branded invoice with line-item table and totals
  report     Titled report with introduction, sections, conclusion
  resume     Resume with summary, experience, education, skills

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY    API key for the remote vision service

SETUP:
  1. Set API key:   export GEMINI_API_KEY=...
  2. Generate:      quickdocs generate photo.jpg --template invoice
"#;

/// Turn photographed documents into formatted PDFs using a vision LLM.
#[derive(Parser, Debug)]
#[command(
    name = "quickdocs",
    version,
    about = "Turn photographed documents into formatted PDFs using a vision LLM",
    long_about = "Extract text from photos and scans of documents with a vision language \
model, structure it against an invoice, report, or resume schema, and lay it out as a clean \
paginated PDF. Also generates QR codes, entirely offline.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Vision model ID.
    #[arg(long, global = true, env = "QUICKDOCS_MODEL")]
    model: Option<String>,

    /// Per-remote-call timeout in seconds.
    #[arg(long, global = true, env = "QUICKDOCS_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "QUICKDOCS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and results.
    #[arg(short, long, global = true, env = "QUICKDOCS_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract text from an image (PNG, JPEG, or WEBP).
    Extract {
        /// Path to the image file.
        image: PathBuf,

        /// Crop region: x,y,width,height (source pixels unless --display is given).
        #[arg(long, value_name = "X,Y,W,H")]
        crop: Option<String>,

        /// Size the image was displayed at when the crop was drawn: width,height.
        #[arg(long, value_name = "W,H", requires = "crop")]
        display: Option<String>,

        /// Write extracted text to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the full pipeline: extract, structure, and render a PDF.
    Generate {
        /// Path to the image file.
        image: PathBuf,

        /// Target template: invoice, report, or resume.
        #[arg(short, long)]
        template: String,

        /// Crop region: x,y,width,height (source pixels unless --display is given).
        #[arg(long, value_name = "X,Y,W,H")]
        crop: Option<String>,

        /// Size the image was displayed at when the crop was drawn: width,height.
        #[arg(long, value_name = "W,H", requires = "crop")]
        display: Option<String>,

        /// Company name printed on invoice letterheads.
        #[arg(long, env = "QUICKDOCS_LETTERHEAD")]
        letterhead: Option<String>,

        /// Output PDF path. Default: <template>.pdf in the current directory.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a QR code PNG from text (no API key needed).
    Qr {
        /// Text or URL to encode.
        text: String,

        /// Output PNG path.
        #[arg(short, long, default_value = QR_FILENAME)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match &cli.command {
        Command::Extract {
            image,
            crop,
            display,
            output,
        } => {
            let config = build_config(&cli, None)?;
            let provider = provider(&config)?;
            let asset = load_asset(image, crop.as_deref(), display.as_deref())?;

            let text = with_spinner(!cli.quiet, "Extracting text", async {
                extract::extract_text(&provider, &asset).await
            })
            .await
            .context("Extraction failed")?;

            match output {
                Some(path) => {
                    std::fs::write(path, &text)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    if !cli.quiet {
                        eprintln!(
                            "{} {} chars  →  {}",
                            green("✔"),
                            text.len(),
                            bold(&path.display().to_string())
                        );
                    }
                }
                None => {
                    let stdout = io::stdout();
                    let mut handle = stdout.lock();
                    handle.write_all(text.as_bytes())?;
                    if !text.ends_with('\n') {
                        handle.write_all(b"\n").ok();
                    }
                }
            }
        }

        Command::Generate {
            image,
            template,
            crop,
            display,
            letterhead,
            output,
        } => {
            let template: TemplateKind = template
                .parse()
                .context("Unknown template (expected invoice, report, or resume)")?;
            let config = build_config(&cli, letterhead.as_deref())?;
            let provider = provider(&config)?;
            let asset = load_asset(image, crop.as_deref(), display.as_deref())?;

            let text = with_spinner(!cli.quiet, "Extracting text", async {
                extract::extract_text(&provider, &asset).await
            })
            .await
            .context("Extraction failed")?;

            let document = with_spinner(!cli.quiet, "Structuring document", async {
                generate::generate_document(&provider, &text, template).await
            })
            .await
            .context("Document generation failed")?;

            let rendered =
                render(&document, &RenderOptions::from_config(&config)).context("PDF rendering failed")?;

            let path = output
                .clone()
                .unwrap_or_else(|| PathBuf::from(rendered.filename()));
            rendered.save_to(&path).context("Failed to write PDF")?;

            if !cli.quiet {
                eprintln!(
                    "{} {} page{}  {}  →  {}",
                    green("✔"),
                    rendered.page_count,
                    if rendered.page_count == 1 { "" } else { "s" },
                    dim(&format!("{} bytes", rendered.pdf_bytes.len())),
                    bold(&path.display().to_string()),
                );
            }
        }

        Command::Qr { text, output } => {
            let png = qr_png(text).context("QR code generation failed")?;
            std::fs::write(output, &png)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            if !cli.quiet {
                eprintln!(
                    "{} QR code  {}  →  {}",
                    green("✔"),
                    dim(&format!("{} bytes", png.len())),
                    bold(&output.display().to_string()),
                );
            }
        }
    }

    Ok(())
}

/// Map global CLI flags to a `PipelineConfig`.
fn build_config(cli: &Cli, letterhead: Option<&str>) -> Result<PipelineConfig> {
    let mut builder = PipelineConfig::builder().api_timeout_secs(cli.api_timeout);
    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(name) = letterhead {
        builder = builder.letterhead(name);
    }
    builder.build().context("Invalid configuration")
}

fn provider(config: &PipelineConfig) -> Result<Arc<dyn VisionProvider>> {
    let provider = GeminiProvider::from_config(config)
        .context("Could not initialise the vision provider")?;
    Ok(Arc::new(provider))
}

/// Load the image and apply an optional crop.
///
/// Without `--display`, crop coordinates are source pixels (the displayed
/// size equals the natural size, scale factor 1). With `--display`, they are
/// mapped from that displayed space exactly as an on-screen selection would
/// be.
fn load_asset(path: &PathBuf, crop: Option<&str>, display: Option<&str>) -> Result<ImageAsset> {
    let asset = ImageAsset::from_file(path)
        .with_context(|| format!("Failed to load image {}", path.display()))?;

    match crop {
        Some(region) => {
            let region = parse_crop(region)?;
            let displayed = match display {
                Some(size) => parse_size(size)?,
                None => {
                    let (w, h) = asset.natural_size();
                    (w as f32, h as f32)
                }
            };
            crop_asset(&asset, &region, displayed).context("Crop failed")
        }
        None => Ok(asset),
    }
}

fn parse_numbers(s: &str, what: &str) -> Result<Vec<f32>> {
    s.split(',')
        .map(|p| {
            p.trim()
                .parse::<f32>()
                .with_context(|| format!("Invalid {} component: '{}'", what, p.trim()))
        })
        .collect()
}

/// Parse `--crop` "x,y,w,h" into a `CropRegion`.
fn parse_crop(s: &str) -> Result<CropRegion> {
    let parts = parse_numbers(s, "crop")?;
    if parts.len() != 4 {
        anyhow::bail!("Crop must be four numbers: x,y,width,height (got '{}')", s);
    }
    Ok(CropRegion::new(parts[0], parts[1], parts[2], parts[3]))
}

/// Parse `--display` "w,h".
fn parse_size(s: &str) -> Result<(f32, f32)> {
    let parts = parse_numbers(s, "display size")?;
    if parts.len() != 2 || parts[0] <= 0.0 || parts[1] <= 0.0 {
        anyhow::bail!("Display size must be two positive numbers: width,height (got '{}')", s);
    }
    Ok((parts[0], parts[1]))
}

/// Run a future behind a terminal spinner.
async fn with_spinner<T>(show: bool, label: &str, fut: impl std::future::Future<Output = T>) -> T {
    if !show {
        return fut.await;
    }

    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_prefix(label.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));

    let result = fut.await;
    bar.finish_and_clear();
    result
}
