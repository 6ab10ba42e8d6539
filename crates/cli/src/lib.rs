//! `covgap` command line: load a coverage report, print the uncovered
//! segments as JSON or text.

use anyhow::{Context as AnyhowContext, Result};
use clap::{Parser, ValueEnum};
use covgap_segmenter::{Segmenter, SegmenterConfig};
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

mod report;

#[derive(Parser, Debug)]
#[command(name = "covgap")]
#[command(about = "Split uncovered code into reviewable segments", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Coverage report (SlipCover or coverage.py JSON)
    #[arg(value_name = "REPORT")]
    pub report: PathBuf,

    /// Largest class/function span (in lines) reported as one segment
    #[arg(long, short = 'l')]
    pub line_limit: Option<usize>,

    /// Configuration file (defaults to ./covgap.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Do not report top-level statements outside any definition
    #[arg(long)]
    pub no_module_residuals: bool,

    /// Directory that relative paths in the report are resolved against
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Include source excerpts in the output
    #[arg(long)]
    pub excerpt: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

/// Parse arguments, set up logging, and run
pub fn main_entry() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&cli, &mut out)
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

/// Segment the report named by `cli` and write the result to `out`
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let config = build_config(cli)?;
    let segmenter = Segmenter::new(config).context("Invalid segmentation settings")?;

    let segments = segmenter
        .missing_coverage(&cli.report)
        .with_context(|| format!("Failed to segment {}", cli.report.display()))?;
    log::info!(
        "{} segment(s) with missing coverage (line limit {})",
        segments.len(),
        segmenter.config().line_limit
    );

    let rendered = match cli.format {
        OutputFormat::Json => report::render_json(&segments, cli.excerpt, cli.pretty)?,
        OutputFormat::Text => report::render_text(&segments, cli.excerpt)?,
    };
    writeln!(out, "{rendered}")?;
    Ok(())
}

/// Configuration file values overridden by command line flags
fn build_config(cli: &Cli) -> Result<SegmenterConfig> {
    let mut config = match &cli.config {
        Some(path) => SegmenterConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SegmenterConfig::discover(env::current_dir()?)?,
    };

    if let Some(line_limit) = cli.line_limit {
        config.line_limit = line_limit;
    }
    if cli.no_module_residuals {
        config.module_residuals = false;
    }
    if let Some(root) = &cli.source_root {
        config.source_root = Some(root.clone());
    }

    Ok(config)
}
