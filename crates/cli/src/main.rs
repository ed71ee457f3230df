//! Telco TCO CLI
//!
//! A command-line tool for estimating the cost of running telco workloads
//! on AWS, locally or against a tco-server.

mod args;
mod client;
mod commands;
mod config;
mod estimator;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use commands::{analyze, compare, optimize, settings, template};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use args::DeploymentArgs;
use estimator::Estimator;
use output::OutputFormat;

/// Telco TCO CLI
#[derive(Parser)]
#[command(name = "telco-tco")]
#[command(author, version, about = "Total cost of ownership estimates for telco workloads on AWS", long_about = None)]
pub struct Cli {
    /// Server URL; computes locally when unset (can also be set via TELCO_TCO_API_URL)
    #[arg(long, env = "TELCO_TCO_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Pricing catalog override file
    #[arg(long, global = true)]
    pub pricing: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Full cost analysis of a deployment
    Analyze(DeploymentArgs),

    /// Cost optimization recommendations, highest priority first
    Optimize(DeploymentArgs),

    /// Compare in-region and Outposts user plane placement
    Compare(DeploymentArgs),

    /// Print an example deployment JSON
    Template,

    /// View or update stored settings
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show stored settings
    Show,

    /// Update stored settings
    Set {
        /// Server URL
        #[arg(long = "server-url")]
        server_url: Option<String>,

        /// Pricing catalog override file
        #[arg(long = "pricing-file")]
        pricing_file: Option<PathBuf>,

        /// Default output format
        #[arg(long = "default-format")]
        default_format: Option<OutputFormat>,
    },
}

fn init_tracing(verbose: bool) {
    if !verbose {
        return;
    }
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stored = config::Config::load().unwrap_or_else(|err| {
        warn!(error = %err, "Ignoring unreadable CLI config");
        config::Config::default()
    });

    let format = cli.format.unwrap_or_else(|| {
        stored
            .default_format
            .as_deref()
            .and_then(|f| OutputFormat::from_str(f, true).ok())
            .unwrap_or_default()
    });
    let api_url = cli.api_url.or(stored.api_url);
    let pricing = cli.pricing.or(stored.pricing_file);

    // Execute command
    match cli.command {
        Commands::Analyze(deployment) => {
            let estimator = Estimator::from_options(api_url.as_deref(), pricing.as_deref())?;
            analyze::analyze(&estimator, &deployment.to_deployment()?, format).await?;
        }
        Commands::Optimize(deployment) => {
            let estimator = Estimator::from_options(api_url.as_deref(), pricing.as_deref())?;
            optimize::optimize(&estimator, &deployment.to_deployment()?, format).await?;
        }
        Commands::Compare(deployment) => {
            let estimator = Estimator::from_options(api_url.as_deref(), pricing.as_deref())?;
            compare::compare(&estimator, &deployment.to_deployment()?, format).await?;
        }
        Commands::Template => template::template()?,
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Show => settings::show(format)?,
            ConfigCommands::Set {
                server_url,
                pricing_file,
                default_format,
            } => settings::set(server_url, pricing_file, default_format)?,
        },
    }

    Ok(())
}
