//! Home Assistant configuration validator
//!
//! Main entry point: checks a configuration directory and prints a report.
//!
//! Usage: `ha-validate [CONFIG_DIR] [--settings FILE] [--suite NAME]... [--format text|json]`
//!
//! Exit status is 0 when no check failed, 1 when at least one did, and 2 when
//! the run could not start (unreadable settings, missing directory).

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use ha_check::{Report, Suite};
use ha_config::{ValidatorSettings, YamlLoader};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "ha-validate")]
#[command(about = "Validate a Home Assistant configuration directory")]
#[command(version)]
struct Args {
    /// Configuration directory to check
    #[arg(default_value = "config")]
    config_dir: PathBuf,

    /// Validator settings file (YAML); built-in defaults when omitted
    #[arg(long, env = "HA_VALIDATE_SETTINGS")]
    settings: Option<PathBuf>,

    /// Suite to run; repeat to run several (default: all)
    #[arg(long = "suite", value_enum)]
    suites: Vec<SuiteArg>,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SuiteArg {
    Syntax,
    Entities,
    Automations,
}

impl From<SuiteArg> for Suite {
    fn from(arg: SuiteArg) -> Self {
        match arg {
            SuiteArg::Syntax => Suite::Syntax,
            SuiteArg::Entities => Suite::Entities,
            SuiteArg::Automations => Suite::Automations,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Install the stderr logger; `RUST_LOG` wins over `--verbose`
fn init_logging(verbose: bool) -> Result<()> {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn load_settings(path: Option<&PathBuf>) -> Result<ValidatorSettings> {
    match path {
        Some(path) => ValidatorSettings::load(path)
            .with_context(|| format!("cannot use settings file {}", path.display())),
        None => Ok(ValidatorSettings::default()),
    }
}

fn render(report: &Report, format: Format) -> Result<String> {
    match format {
        Format::Text => Ok(report.to_string()),
        Format::Json => {
            let value = serde_json::json!({
                "findings": report.findings(),
                "summary": report.summary(),
            });
            Ok(serde_json::to_string_pretty(&value)?)
        }
    }
}

fn run(args: &Args) -> Result<Report> {
    init_logging(args.verbose)?;

    if !args.config_dir.is_dir() {
        bail!(
            "configuration directory '{}' does not exist",
            args.config_dir.display()
        );
    }

    let settings = load_settings(args.settings.as_ref())?;
    debug!("Validator settings: {:?}", settings);

    let suites: Vec<Suite> = args.suites.iter().copied().map(Suite::from).collect();
    let loader = YamlLoader::new(&args.config_dir);

    info!("Validating {}", args.config_dir.display());
    Ok(ha_check::run(&loader, &settings, &suites))
}

fn main() -> ExitCode {
    let args = Args::parse();

    let report = match run(&args) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(2);
        }
    };

    match render(&report, args.format) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(2);
        }
    }

    if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
