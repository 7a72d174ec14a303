//! Mirador: command-line runner for storefront probes
//!
//! ## Usage
//!
//! ```bash
//! mirador run --url https://store.example      # Run all scenarios
//! mirador run --url ... --scenario about_page  # Run a subset
//! mirador list                                 # List scenarios
//! ```
//!
//! The storefront access password is read from `--password` or the
//! `MIRAR_STORE_PASSWORD` environment variable, never embedded here.

use clap::{Args, Parser, Subcommand};
use console::style;
use mirar::{Scenario, StoreConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// CLI errors
#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Generic(String),

    #[error(transparent)]
    Mirar(#[from] mirar::MirarError),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Parser)]
#[command(name = "mirador", version, about = "E2E probes for hosted storefronts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run scenarios against a store
    Run(RunArgs),
    /// List available scenarios
    List,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Store root URL (absolute)
    #[arg(long, env = "MIRAR_STORE_URL")]
    url: String,

    /// Storefront access password for staging gates
    #[arg(long, env = "MIRAR_STORE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Brand name used for banner and copy checks
    #[arg(long)]
    brand: Option<String>,

    /// Run only the named scenario (repeatable)
    #[arg(long = "scenario", value_name = "NAME")]
    scenarios: Vec<String>,

    /// Run with a visible browser window
    #[arg(long)]
    headed: bool,

    /// Keep browser web security enabled
    #[arg(long)]
    keep_web_security: bool,

    /// Path to the chromium binary
    #[arg(long, env = "CHROMIUM_PATH")]
    chromium_path: Option<String>,

    /// Write the JSON report to this path
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Directory for failure screenshots and reports
    #[arg(long, default_value = "mirar-artifacts")]
    artifacts_dir: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {e}", style("error:").red().bold());
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(cli: &Cli) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> CliResult<bool> {
    match cli.command {
        Commands::Run(args) => run_suite(args).await,
        Commands::List => {
            list_scenarios();
            Ok(true)
        }
    }
}

fn list_scenarios() {
    for scenario in Scenario::ALL {
        println!("{}", scenario.name());
    }
}

fn resolve_scenarios(names: &[String]) -> CliResult<Vec<Scenario>> {
    if names.is_empty() {
        return Ok(Scenario::ALL.to_vec());
    }
    names
        .iter()
        .map(|name| {
            Scenario::from_name(name).ok_or_else(|| {
                let known = Scenario::ALL
                    .iter()
                    .map(|s| s.name())
                    .collect::<Vec<_>>()
                    .join(", ");
                CliError::Generic(format!("unknown scenario {name:?} (known: {known})"))
            })
        })
        .collect()
}

fn build_config(args: &RunArgs) -> StoreConfig {
    let mut config = StoreConfig::new(args.url.clone())
        .with_headless(!args.headed)
        .with_artifacts_dir(args.artifacts_dir.clone());
    if let Some(ref password) = args.password {
        config = config.with_password(password.clone());
    }
    if let Some(ref brand) = args.brand {
        config = config.with_brand(brand.clone());
    }
    if let Some(ref path) = args.chromium_path {
        config = config.with_chromium_path(path.clone());
    }
    if args.keep_web_security {
        config.disable_web_security = false;
    }
    config
}

#[cfg(feature = "browser")]
async fn run_suite(args: RunArgs) -> CliResult<bool> {
    use mirar::{Browser, Harness, Reporter};

    let scenarios = resolve_scenarios(&args.scenarios)?;
    let json = args.json.clone();
    let config = build_config(&args);

    tracing::info!(url = %config.base_url, headless = config.headless, "launching browser");
    let browser = Browser::launch(config.clone()).await?;
    let mut page = browser.new_page().await?;

    let harness = Harness::with_scenarios(config, scenarios);
    let report = harness.run_all(&mut page).await;

    drop(page);
    browser.close().await?;

    let reporter = Reporter::new();
    print!("{}", reporter.summary(&report));
    if let Some(path) = json {
        reporter.write_json(&report, &path)?;
    }

    Ok(report.all_passed())
}

#[cfg(not(feature = "browser"))]
async fn run_suite(_args: RunArgs) -> CliResult<bool> {
    Err(CliError::Generic(
        "browser control not enabled. Rebuild with --features browser".to_string(),
    ))
}
