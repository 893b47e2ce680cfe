use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use mc_ondemand::config::ConfigLoader;
use mc_ondemand::error::{describe_error_code, OnDemandError};
use mc_ondemand::plan::{derive, watchdog_image};
use mc_ondemand::probe;
use mc_ondemand::resolve::{resolve_identifiers, StaticIdentifiers};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, error, info, trace};

/// Plan an on-demand Minecraft server from a single config file
#[derive(Parser)]
#[command(name = "mc-ondemand")]
#[command(about = "Validate config.yml and derive the deployment plan for an on-demand Minecraft server", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the config file and print it with defaults applied
    Validate {
        /// Path to configuration file (default: config.yml in the working directory)
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,
    },
    /// Derive the deployment plan
    Plan {
        /// Path to configuration file (default: config.yml in the working directory)
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// Hosted zone id published by the domain stack
        #[arg(long)]
        zone_id: Option<String>,

        /// Notification topic ARN (required when snsEmailAddress is set)
        #[arg(long)]
        topic_arn: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,

        /// Use the locally built watchdog image when a container runtime is available
        #[arg(long)]
        probe_runtime: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    // Plans go to stdout, so diagnostics stay on stderr
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(cli.verbose >= 2)
        .with_writer(std::io::stderr)
        .init();

    debug!("mc-ondemand started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    let result = match cli.command {
        Commands::Validate { config } => run_validate(config),
        Commands::Plan {
            config,
            zone_id,
            topic_arn,
            format,
            probe_runtime,
        } => run_plan(config, zone_id, topic_arn, format, probe_runtime),
    };

    if let Err(e) = result {
        let exit_code = match e.downcast_ref::<OnDemandError>() {
            Some(err) => {
                error!(
                    code = err.code(),
                    category = describe_error_code(err.code()),
                    "Fatal error"
                );
                err.exit_code()
            }
            None => {
                error!("Fatal error: {:#}", e);
                1
            }
        };
        eprintln!("Error: {e}");
        std::process::exit(exit_code);
    }
}

fn run_validate(config: Option<PathBuf>) -> anyhow::Result<()> {
    let validated = loader_for(config)?.load()?;
    info!(server = %validated.server_name(), "Configuration is valid");
    print_output(&validated, OutputFormat::Yaml)
}

fn run_plan(
    config: Option<PathBuf>,
    zone_id: Option<String>,
    topic_arn: Option<String>,
    format: OutputFormat,
    probe_runtime: bool,
) -> anyhow::Result<()> {
    let validated = loader_for(config)?.load()?;

    let identifiers = StaticIdentifiers::new(zone_id, topic_arn);
    let (zone_id, topic_arn) =
        resolve_identifiers(&identifiers, validated.notifications_enabled())
            .map_err(OnDemandError::from)?;

    let mut plan = derive(&validated, &zone_id, &topic_arn).map_err(OnDemandError::from)?;
    if probe_runtime {
        plan = plan.with_watchdog_image(watchdog_image(probe::container_runtime_available()));
    }

    info!(
        server = %validated.server_name(),
        region = %plan.region,
        "Deployment plan ready"
    );
    print_output(&plan, format)
}

fn loader_for(config: Option<PathBuf>) -> mc_ondemand::Result<ConfigLoader> {
    match config {
        Some(path) => Ok(ConfigLoader::new(path)),
        None => ConfigLoader::from_working_dir(),
    }
}

fn print_output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = match format {
        OutputFormat::Yaml => serde_yaml::to_string(value).context("Failed to render YAML")?,
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).context("Failed to render JSON")? + "\n"
        }
    };
    print!("{rendered}");
    Ok(())
}
