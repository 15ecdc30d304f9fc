use crate::engine::{QuietContainedPanics, RunnableSuite, run_suites};
use crate::narration;
use crate::report::{OutputKind, print_report};
use crate::settings::{Settings, load_settings};
use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use colored::control::set_override as set_color_override;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Normal,
    Terse,
    Final,
}

impl From<OutputFormat> for OutputKind {
    fn from(v: OutputFormat) -> Self {
        match v {
            OutputFormat::Normal => OutputKind::Normal,
            OutputFormat::Terse => OutputKind::Terse,
            OutputFormat::Final => OutputKind::Final,
        }
    }
}

#[derive(Parser, Debug, Clone, Default)]
#[command(version, about = "Runs table-driven test suites and reports the tally")]
pub struct Cli {
    /// YAML file with run settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suite to run, by label or 1-based number. Repeatable. `0` or `list` lists the suites.
    #[arg(short = 't', long = "suite", value_name = "SUITE")]
    pub suites: Vec<String>,

    /// Run independent suites on a thread pool. Their hooks may then overlap.
    #[arg(long = "parallel")]
    pub parallel: bool,

    /// Report format
    #[arg(short = 'o', long = "output", value_enum)]
    pub output: Option<OutputFormat>,

    /// Print nothing; only the exit code tells the outcome
    #[arg(short = 'q', long = "silent")]
    pub silent: bool,

    /// Log progress to stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Force coloured output
    #[arg(short = 'c', long = "color", alias = "colour", conflicts_with = "no_color")]
    pub color: bool,

    #[arg(long = "no-color")]
    pub no_color: bool,
}

/// Settings after the command line has been laid over the settings file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub parallel: bool,
    pub output: OutputKind,
    pub suites: Vec<String>,
    pub color: Option<bool>,
    pub verbose: bool,
    pub silent: bool,
}

impl RunOptions {
    pub fn merge(cli: &Cli, settings: Settings) -> Self {
        let color = if cli.no_color {
            Some(false)
        } else if cli.color {
            Some(true)
        } else {
            settings.color
        };
        Self {
            parallel: cli.parallel || settings.parallel,
            output: cli.output.map(Into::into).unwrap_or(settings.output),
            suites: if cli.suites.is_empty() {
                settings.suites
            } else {
                cli.suites.clone()
            },
            color,
            verbose: cli.verbose || settings.verbose,
            silent: cli.silent || settings.silent,
        }
    }
}

pub enum Selection {
    /// The user asked for the suite list.
    List,
    Run(Vec<Box<dyn RunnableSuite>>),
}

/// Narrows `suites` to the requested ones, keeping declaration order.
pub fn select(suites: Vec<Box<dyn RunnableSuite>>, wanted: &[String]) -> Result<Selection> {
    if wanted.is_empty() {
        return Ok(Selection::Run(suites));
    }
    let mut keep = vec![false; suites.len()];
    for sel in wanted {
        let trimmed = sel.trim();
        if trimmed == "0" || trimmed.eq_ignore_ascii_case("list") {
            return Ok(Selection::List);
        }
        if let Ok(n) = trimmed.parse::<usize>() {
            if n == 0 || n > suites.len() {
                return Err(anyhow!(
                    "Invalid suite number {n}, there are {} suites",
                    suites.len()
                ));
            }
            keep[n - 1] = true;
            continue;
        }
        let mut found = false;
        for (idx, suite) in suites.iter().enumerate() {
            if suite.label() == trimmed {
                keep[idx] = true;
                found = true;
            }
        }
        if !found {
            return Err(anyhow!("No suite named '{trimmed}'"));
        }
    }
    let selected = suites
        .into_iter()
        .zip(keep)
        .filter_map(|(suite, keep)| keep.then_some(suite))
        .collect();
    Ok(Selection::Run(selected))
}

pub fn list_suites(suites: &[Box<dyn RunnableSuite>]) -> String {
    let mut out = String::from("Available suites:\n");
    for (idx, suite) in suites.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {} ({} cases)\n",
            idx + 1,
            suite.label(),
            suite.case_count()
        ));
    }
    out
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "tinytest=info".to_string())
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "tinytest=warn".to_string())
    };
    // A subscriber may already be installed when the harness is embedded.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Exit status when any case failed or raised an error.
pub const EXIT_FAILED: u8 = 1;
/// Exit status when a requested suite does not exist.
pub const EXIT_BAD_SELECTION: u8 = 2;

/// Entry point for a test binary: parses the process arguments and runs `suites`.
pub fn run(suites: Vec<Box<dyn RunnableSuite>>) -> Result<ExitCode> {
    run_with(Cli::parse(), suites)
}

pub fn run_with(cli: Cli, suites: Vec<Box<dyn RunnableSuite>>) -> Result<ExitCode> {
    run_status(cli, suites).map(ExitCode::from)
}

/// Same as [`run_with`], returning the raw exit status.
pub fn run_status(cli: Cli, suites: Vec<Box<dyn RunnableSuite>>) -> Result<u8> {
    let settings = match &cli.config {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };
    let options = RunOptions::merge(&cli, settings);

    init_logging(options.verbose);
    if let Some(color) = options.color {
        set_color_override(color);
    }

    let listing = list_suites(&suites);
    let suites = match select(suites, &options.suites) {
        Ok(Selection::List) => {
            print!("{listing}");
            return Ok(0);
        }
        Ok(Selection::Run(suites)) => suites,
        Err(e) => {
            error!("{e}");
            eprint!("{listing}");
            return Ok(EXIT_BAD_SELECTION);
        }
    };

    info!(
        suites = suites.len(),
        parallel = options.parallel,
        "{} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let parallel = options.parallel;
    let quiet = QuietContainedPanics::install();
    let results = if options.silent || !options.output.shows_narration() {
        narration::capture_with(|| run_suites(&suites, parallel)).0
    } else {
        run_suites(&suites, parallel)
    };
    drop(quiet);

    info!(
        total = results.total(),
        passed = results.passed(),
        failed = results.failed(),
        skipped = results.skipped(),
        errors = results.errors(),
        "all suites finished"
    );

    if !options.silent {
        print_report(&results, options.output);
    }

    if results.is_success() {
        Ok(0)
    } else {
        Ok(EXIT_FAILED)
    }
}
