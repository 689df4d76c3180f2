use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

use swipe_report::app::{ReportUseCase, UploadReport, UploadUseCase};
use swipe_report::config::{Config, CONFIG_PATH_ENV};
use swipe_report::infra::CsvFileOutputAdapter;
use swipe_report::observability::{logging, metrics};
use swipe_report::report::EventFilter;
use swipe_report::session::{Session, UploadResult};

/// Exit status when an upload is rejected by the schema gates
const EXIT_REJECTED: u8 = 2;

#[derive(Parser)]
#[command(name = "swipe_report")]
#[command(about = "Clean, anonymize and summarize door-access swipe logs")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $SWIPE_REPORT_CONFIG, then ./config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write Prometheus-format metrics to this file on exit
    #[arg(long, global = true)]
    metrics_out: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a single baseline upload and write the anonymized CSV
    Clean {
        /// Upload to clean (.csv or .xlsx)
        input: PathBuf,
        /// Where to write the cleaned CSV (defaults to the output directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Load a baseline and a comparison upload in one session
    Compare {
        baseline: PathBuf,
        comparison: PathBuf,
        /// Directory for the cleaned CSVs (defaults to the configured one)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Print chart-ready aggregates for a baseline and optional comparison
    Report {
        baseline: PathBuf,
        #[arg(long)]
        comparison: Option<PathBuf>,
        /// Keep Saturday and Sunday swipes
        #[arg(long)]
        keep_weekends: bool,
        /// Keep swipes inside the configured holiday range
        #[arg(long)]
        keep_holidays: bool,
        /// Only include these person types (repeatable); default is all
        #[arg(long = "person-type")]
        person_types: Vec<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let env_path = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
    let config = match path.map(Path::to_path_buf).or(env_path) {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Print the outcome of one upload; returns false on rejection
fn print_upload(label: &str, report: &UploadReport) -> bool {
    match &report.result {
        UploadResult::Accepted { role, stats } => {
            println!("✅ {} accepted as {}", label, role);
            println!(
                "   Rows read: {}  dropped (incomplete): {}  swipes collapsed: {}",
                stats.rows_read, stats.rows_dropped_incomplete, stats.swipes_collapsed
            );
            println!("   Events: {}  people: {}", stats.events, stats.people);
            if let Some(path) = &report.output {
                println!("   Output file: {}", path.display());
            }
            true
        }
        UploadResult::Rejected { rejection } => {
            println!("❌ {} rejected", label);
            println!("{}", rejection);
            false
        }
    }
}

fn run_clean(config: &Config, input: &Path, output: Option<PathBuf>) -> Result<ExitCode> {
    let adapter = match &output {
        Some(path) => CsvFileOutputAdapter::new(path.parent().unwrap_or(Path::new("."))),
        None => CsvFileOutputAdapter::new(&config.output.directory),
    };
    let use_case = UploadUseCase::new(Box::new(adapter));
    let mut session = Session::new();
    let mut report = use_case.upload_file(&mut session, input)?;

    // Honour an explicit output file name
    if let (Some(target), Some(written)) = (&output, &report.output) {
        if target != written {
            fs::rename(written, target)
                .with_context(|| format!("Failed to move output to {}", target.display()))?;
            report.output = Some(target.clone());
        }
    }

    if print_upload(&input.display().to_string(), &report) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_REJECTED))
    }
}

fn run_compare(config: &Config, baseline: &Path, comparison: &Path, output_dir: Option<PathBuf>) -> Result<ExitCode> {
    let directory = output_dir.unwrap_or_else(|| config.output.directory.clone());
    let use_case = UploadUseCase::new(Box::new(CsvFileOutputAdapter::new(directory)));
    let mut session = Session::new();

    let report = use_case.upload_file(&mut session, baseline)?;
    if !print_upload(&baseline.display().to_string(), &report) {
        return Ok(ExitCode::from(EXIT_REJECTED));
    }

    let report = use_case.upload_file(&mut session, comparison)?;
    if !print_upload(&comparison.display().to_string(), &report) {
        return Ok(ExitCode::from(EXIT_REJECTED));
    }
    Ok(ExitCode::SUCCESS)
}

struct ReportArgs {
    baseline: PathBuf,
    comparison: Option<PathBuf>,
    keep_weekends: bool,
    keep_holidays: bool,
    person_types: Vec<String>,
    format: OutputFormat,
}

fn run_report(config: &Config, args: ReportArgs) -> Result<ExitCode> {
    let use_case = UploadUseCase::new(Box::new(CsvFileOutputAdapter::new(&config.output.directory)));
    let mut session = Session::new();

    for path in std::iter::once(&args.baseline).chain(args.comparison.iter()) {
        let report = use_case.upload_file(&mut session, path)?;
        if let Some(rejection) = report.result.rejection() {
            eprintln!("❌ {} rejected\n{}", path.display(), rejection);
            return Ok(ExitCode::from(EXIT_REJECTED));
        }
    }

    let mut filter = EventFilter::from_config(&config.filters);
    if args.keep_weekends {
        filter.remove_weekends = false;
    }
    if args.keep_holidays {
        filter.holidays = None;
    }
    if !args.person_types.is_empty() {
        filter = filter.with_person_types(args.person_types);
    }

    let report = ReportUseCase::from_config(config).build(&session, &filter)?;
    match args.format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let _log_guard = logging::init_logging(&config.logging);

    if cli.metrics_out.is_some() {
        if let Err(e) = metrics::init() {
            error!("Metrics disabled: {}", e);
        }
    }

    let outcome = match cli.command {
        Commands::Clean { input, output } => run_clean(&config, &input, output),
        Commands::Compare {
            baseline,
            comparison,
            output_dir,
        } => run_compare(&config, &baseline, &comparison, output_dir),
        Commands::Report {
            baseline,
            comparison,
            keep_weekends,
            keep_holidays,
            person_types,
            format,
        } => run_report(
            &config,
            ReportArgs {
                baseline,
                comparison,
                keep_weekends,
                keep_holidays,
                person_types,
                format,
            },
        ),
    };

    if let Some(path) = &cli.metrics_out {
        if let Some(rendered) = metrics::render() {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write metrics to {}", path.display()))?;
            info!(path = %path.display(), "Wrote metrics");
        }
    }

    if let Err(e) = &outcome {
        error!("Run failed: {:#}", e);
    }
    outcome
}
