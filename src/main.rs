//! `lptag` CLI - Add tags to every metric of an InfluxDB line protocol file

mod cmd;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use lptag::{ConfigFile, RunConfig, TagSet};

#[derive(Parser)]
#[command(name = "lptag")]
#[command(about = "Add custom tags to every metric of an InfluxDB line protocol file")]
#[command(version)]
#[command(after_help = "Example:\n  lptag --input data.influx --output holochain.influx \
                        --tag env=production --tag region=europe --tag version=1.2.3")]
struct Cli {
    /// Input line protocol file
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output line protocol file [default: <INPUT> with extension tmp.influx]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Add a tag in format 'key=value' (can be used multiple times)
    #[arg(short, long = "tag", value_name = "KEY=VALUE")]
    tags: Vec<String>,

    /// TOML file with default input, output and tags
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Summary format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Text,
    /// One JSON object
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = build_config(&cli)?;
    cmd::tag::cmd_tag(&config, cli.format)
}

/// `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Merge `--config` defaults under the command-line flags and validate.
fn build_config(cli: &Cli) -> Result<RunConfig> {
    let file = match &cli.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };

    let mut tags = TagSet::from_pairs(&cli.tags).context("invalid --tag")?;
    file.merge_tags_into(&mut tags)
        .context("invalid tag in config file")?;

    let input = cli.input.clone().or(file.input).unwrap_or_default();
    let output = cli.output.clone().or(file.output);

    Ok(RunConfig::new(input, output, tags)?)
}
