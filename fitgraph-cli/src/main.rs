mod charts;
mod reports;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use fitgraph_core::{FitnessReport, GenerationOrder, ResultLoader, analyze};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FileOrder {
    /// Raw directory listing order
    Listing,
    /// Sort by file name (zero-padded indices)
    Lexical,
    /// Sort by the number in each file name
    Numeric,
}

impl From<FileOrder> for GenerationOrder {
    fn from(order: FileOrder) -> Self {
        match order {
            FileOrder::Listing => Self::Listing,
            FileOrder::Lexical => Self::Lexical,
            FileOrder::Numeric => Self::Numeric,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
    Csv,
}

#[derive(Debug, Parser)]
#[command(name = "fitgraph", version)]
#[command(about = "Average and highest fitness per generation from simulation result files")]
struct Args {
    /// Directory holding one JSON array of bot records per generation
    #[arg(long, default_value = "simulations/current")]
    results_dir: PathBuf,

    /// How generation files are ordered
    #[arg(long, value_enum, default_value_t = FileOrder::Lexical)]
    order: FileOrder,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Directory for the rendered SVG charts
    #[arg(long, default_value = "target/fitness-charts")]
    chart_dir: PathBuf,

    /// Skip chart rendering
    #[arg(long)]
    no_charts: bool,

    /// Chart width in pixels
    #[arg(long, default_value_t = 1000)]
    width: u32,

    /// Chart height in pixels
    #[arg(long, default_value_t = 300)]
    height: u32,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Progress lines would corrupt a machine-readable report on stdout.
    const fn chatty(&self) -> bool {
        self.output.is_some() || matches!(self.report, ReportFormat::Console)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let start_time = Instant::now();
    if args.chatty() {
        announce_banner();
    }

    let loader = ResultLoader::new(&args.results_dir).with_order(args.order.into());
    let report = analyze(&loader)
        .with_context(|| format!("failed to analyze {}", args.results_dir.display()))?;

    if args.chatty() {
        println!(
            "📂 Loaded {} generations ({} bots) from {}",
            report.generations,
            report.bots,
            args.results_dir.display()
        );
    }

    render_charts(args, &report)?;
    write_report(args, &report, start_time)?;
    Ok(())
}

fn announce_banner() {
    println!("{}", "🧬 Fitness Graphs".bright_cyan().bold());
    println!("{}", "=================".cyan());
}

fn render_charts(args: &Args, report: &FitnessReport) -> Result<Vec<PathBuf>> {
    if args.no_charts {
        return Ok(Vec::new());
    }
    if report.is_empty() {
        log::warn!(
            "no generations in {}; skipping charts",
            args.results_dir.display()
        );
        return Ok(Vec::new());
    }

    let written = charts::render_report_charts(report, &args.chart_dir, (args.width, args.height))?;
    for path in &written {
        log::info!("wrote chart {}", path.display());
        if args.chatty() {
            println!("📈 Wrote {}", path.display().to_string().green());
        }
    }
    Ok(written)
}

fn write_report(args: &Args, report: &FitnessReport, start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    let out = output_target.writer();

    match args.report {
        ReportFormat::Json => reports::generate_json_report(out, report)?,
        ReportFormat::Markdown => {
            reports::generate_markdown_report(out, report, &args.results_dir)?;
        }
        ReportFormat::Csv => reports::generate_csv_report(out, report)?,
        ReportFormat::Console => reports::generate_console_report(
            out,
            report,
            &args.results_dir,
            args.verbose,
            start_time.elapsed(),
        )?,
    }

    output_target.flush()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}
